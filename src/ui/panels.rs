use eframe::egui::{self, Color32, RichText, Ui};

use crate::state::{AppState, Dialog, NoticeKind, Pending};

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the "Dados" menu and the busy indicator.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("Dados", |ui: &mut Ui| {
            if ui.button("Atualizar Todos os Dados").clicked() {
                state.dialog = Some(Dialog::ConfirmDownload);
                ui.close_menu();
            }
            if ui.button("Recarregar Arquivos Locais").clicked() {
                state.schedule(Pending::Reload);
                ui.close_menu();
            }

            ui.separator();

            if ui.button("Adicionar Ano...").clicked() {
                state.dialog = Some(Dialog::AddYear {
                    year: String::new(),
                    url: String::new(),
                    error: None,
                });
                ui.close_menu();
            }
            if ui.button("Excluir Ano...").clicked() {
                match state.prefs.years().into_iter().next() {
                    Some(first) => {
                        state.dialog = Some(Dialog::RemoveYear {
                            selected: first,
                            confirming: false,
                        });
                    }
                    None => state.notify(NoticeKind::Info, "Nenhum ano para excluir."),
                }
                ui.close_menu();
            }
        });

        ui.separator();

        if state.is_busy() {
            ui.spinner();
            ui.label("Processando...");
        }
    });
}

// ---------------------------------------------------------------------------
// Year tabs
// ---------------------------------------------------------------------------

/// One selectable label per loaded year. Returns `false` when there is nothing to show.
pub fn tab_strip(ui: &mut Ui, state: &mut AppState) -> bool {
    if state.tabs.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Nenhum dado carregado  (Dados → Atualizar Todos os Dados)");
        });
        return false;
    }

    ui.horizontal(|ui: &mut Ui| {
        for (i, tab) in state.tabs.iter().enumerate() {
            ui.selectable_value(&mut state.active_tab, i, RichText::new(&tab.year).strong());
        }
    });
    ui.separator();
    true
}

// ---------------------------------------------------------------------------
// Notices
// ---------------------------------------------------------------------------

const VISIBLE_NOTICES: usize = 3;

/// Most recent notices, newest last, with a button to dismiss them.
pub fn notice_bar(ui: &mut Ui, state: &mut AppState) {
    if state.notices.is_empty() {
        return;
    }

    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("✖").on_hover_text("Limpar mensagens").clicked() {
            state.notices.clear();
            return;
        }
        ui.vertical(|ui: &mut Ui| {
            let skip = state.notices.len().saturating_sub(VISIBLE_NOTICES);
            for notice in state.notices.iter().skip(skip) {
                let color = match notice.kind {
                    NoticeKind::Info => ui.visuals().text_color(),
                    NoticeKind::Warning => Color32::from_rgb(0xd0, 0x90, 0x20),
                    NoticeKind::Error => Color32::RED,
                };
                ui.label(RichText::new(&notice.text).color(color));
            }
        });
    });
}
