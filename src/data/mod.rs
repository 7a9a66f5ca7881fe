/// Data layer: core types, loading, and the filter/sort/paginate pipeline.
///
/// Architecture:
/// ```text
///   data/pca_<year>.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse `;` CSV → Table (all cells text)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  substring fields + exact date → row indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │   sort    │  numeric-first, text fallback → reordered indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────────────┐
///   │ page / aggregate  │  50-row slice, record count, amount sum
///   └──────────────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod format;
pub mod loader;
pub mod model;
pub mod page;
pub mod sort;
