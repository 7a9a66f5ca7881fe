//! Writes a deterministic `data/pca_<year>.csv` for trying the viewer offline.
//!
//! Usage: `generate_sample [year] [rows]` (defaults: 2025, 300).

use std::path::PathBuf;

use anyhow::Context;

const HEADER: [&str; 13] = [
    "Unidade Responsável",
    "UASG",
    "Id do item no PCA",
    "Categoria do Item",
    "Identificador da Futura Contratação",
    "Classificação do Catálogo",
    "Código da Classificação Superior (Classe/Grupo)",
    "Nome do PDM do Item",
    "Código do Item",
    "Descrição do Item",
    "Quantidade Estimada",
    "Valor Total Estimado (R$)",
    "Data Desejada",
];

const UNITS: [(&str, &str); 3] = [
    ("250052", "INSTITUTO NACIONAL DE CARDIOLOGIA"),
    ("250057", "INSTITUTO NACIONAL DE CÂNCER"),
    ("250110", "HOSPITAL FEDERAL DE BONSUCESSO"),
];

const ITEMS: [(&str, &str, &str); 6] = [
    ("Material", "Luva cirúrgica estéril", "LUVA CIRÚRGICA"),
    ("Material", "Seringa descartável 10 ml", "SERINGA"),
    ("Material", "Cateter venoso central", "CATETER"),
    ("Serviço", "Manutenção preventiva de equipamentos", "MANUTENÇÃO"),
    ("Serviço", "Limpeza hospitalar", "LIMPEZA"),
    ("Material", "Papel A4 resma", "PAPEL"),
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }
}

/// Brazilian-style amount with two decimals, e.g. `1.234,56`.
fn brl(cents: u64) -> String {
    let units = (cents / 100).to_string();
    let mut grouped = String::new();
    for (i, c) in units.chars().enumerate() {
        if i > 0 && (units.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    format!("{grouped},{:02}", cents % 100)
}

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let year: u32 = match args.next() {
        Some(y) => y.parse().with_context(|| format!("invalid year '{y}'"))?,
        None => 2025,
    };
    let rows: u64 = match args.next() {
        Some(n) => n.parse().with_context(|| format!("invalid row count '{n}'"))?,
        None => 300,
    };

    let mut rng = SimpleRng::new(u64::from(year));
    let dir = PathBuf::from("data");
    std::fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
    let path = dir.join(format!("pca_{year}.csv"));

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_path(&path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(HEADER)?;

    for i in 0..rows {
        let (code, unit) = UNITS[rng.below(UNITS.len() as u64) as usize];
        let (category, description, pdm) = ITEMS[rng.below(ITEMS.len() as u64) as usize];
        let quantity = 1 + rng.below(500);
        let cents = 1_000 + rng.below(5_000_000);
        let day = 1 + rng.below(28);
        let month = 1 + rng.below(12);

        writer.write_record([
            unit.to_string(),
            code.to_string(),
            (i + 1).to_string(),
            category.to_string(),
            format!("{code}-{}/{year}", 1 + i / 4),
            category.to_string(),
            (1000 + rng.below(9000)).to_string(),
            pdm.to_string(),
            (100_000 + rng.below(900_000)).to_string(),
            description.to_string(),
            quantity.to_string(),
            brl(cents),
            format!("{day:02}/{month:02}/{year}"),
        ])?;
    }
    writer.flush()?;

    println!("Wrote {rows} rows to {}", path.display());
    Ok(())
}
