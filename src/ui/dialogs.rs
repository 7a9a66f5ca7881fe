use eframe::egui::{self, Align2, Color32, RichText, Ui};

use crate::state::{AppState, Dialog, Pending};

/// Render the open dialog, if any, and apply its outcome.
pub fn show(ctx: &egui::Context, state: &mut AppState) {
    let Some(dialog) = state.dialog.take() else {
        return;
    };
    state.dialog = match dialog {
        Dialog::ConfirmDownload => confirm_download(ctx, state),
        Dialog::AddYear { year, url, error } => add_year(ctx, state, year, url, error),
        Dialog::RemoveYear {
            selected,
            confirming,
        } => remove_year(ctx, state, selected, confirming),
    };
}

fn modal(title: &str) -> egui::Window<'static> {
    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
}

/// Yes/No row; `Some(true)` for yes, `Some(false)` for no.
fn yes_no(ui: &mut Ui, yes: &str, no: &str) -> Option<bool> {
    let mut answer = None;
    ui.horizontal(|ui: &mut Ui| {
        if ui.button(yes).clicked() {
            answer = Some(true);
        }
        if ui.button(no).clicked() {
            answer = Some(false);
        }
    });
    answer
}

// ---------------------------------------------------------------------------
// Download confirmation
// ---------------------------------------------------------------------------

fn confirm_download(ctx: &egui::Context, state: &mut AppState) -> Option<Dialog> {
    let mut answer = None;
    modal("Confirmar Atualização").show(ctx, |ui: &mut Ui| {
        ui.label("Isso fará o download e otimização dos dados.\nDeseja continuar?");
        answer = yes_no(ui, "Sim", "Não");
    });

    match answer {
        Some(true) => {
            state.schedule(Pending::Download);
            None
        }
        Some(false) => None,
        None => Some(Dialog::ConfirmDownload),
    }
}

// ---------------------------------------------------------------------------
// Add year
// ---------------------------------------------------------------------------

fn add_year(
    ctx: &egui::Context,
    state: &mut AppState,
    mut year: String,
    mut url: String,
    mut error: Option<String>,
) -> Option<Dialog> {
    let mut answer = None;
    modal("Adicionar Ano").show(ctx, |ui: &mut Ui| {
        egui::Grid::new("add_year").num_columns(2).show(ui, |ui: &mut Ui| {
            ui.label("Ano:");
            ui.add(egui::TextEdit::singleline(&mut year).hint_text("ex: 2027"));
            ui.end_row();
            ui.label("URL do CSV:");
            ui.add(
                egui::TextEdit::singleline(&mut url)
                    .hint_text("https://...")
                    .desired_width(420.0),
            );
            ui.end_row();
        });
        if let Some(msg) = &error {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
        answer = yes_no(ui, "Adicionar", "Cancelar");
    });

    match answer {
        Some(true) => match state.add_year(&year, &url) {
            Ok(()) => None,
            Err(e) => {
                error = Some(e.to_string());
                Some(Dialog::AddYear { year, url, error })
            }
        },
        Some(false) => None,
        None => Some(Dialog::AddYear { year, url, error }),
    }
}

// ---------------------------------------------------------------------------
// Remove year
// ---------------------------------------------------------------------------

fn remove_year(
    ctx: &egui::Context,
    state: &mut AppState,
    mut selected: String,
    confirming: bool,
) -> Option<Dialog> {
    let years = state.prefs.years();
    let mut answer = None;

    modal("Excluir Ano").show(ctx, |ui: &mut Ui| {
        if confirming {
            ui.label(format!(
                "Tem certeza que deseja excluir o ano {selected} e seus dados permanentemente?"
            ));
            answer = yes_no(ui, "Sim", "Não");
        } else {
            ui.label("Selecione o ano para excluir:");
            egui::ComboBox::from_id_salt("remove_year")
                .selected_text(&selected)
                .show_ui(ui, |ui: &mut Ui| {
                    for year in &years {
                        ui.selectable_value(&mut selected, year.clone(), year);
                    }
                });
            answer = yes_no(ui, "Excluir", "Cancelar");
        }
    });

    match (answer, confirming) {
        (Some(true), false) => Some(Dialog::RemoveYear {
            selected,
            confirming: true,
        }),
        (Some(true), true) => {
            // Errors are reported as notices by `remove_year`.
            let _ = state.remove_year(&selected);
            None
        }
        (Some(false), _) => None,
        (None, _) => Some(Dialog::RemoveYear {
            selected,
            confirming,
        }),
    }
}
