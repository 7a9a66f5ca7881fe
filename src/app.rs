use eframe::egui;

use crate::config::{AppPaths, HTTP_TIMEOUT};
use crate::downloader::HttpFetcher;
use crate::state::{AppState, NoticeKind, Pending, TabAction};
use crate::ui::{dialogs, panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct PcaApp {
    pub state: AppState,
}

impl PcaApp {
    pub fn new(paths: AppPaths) -> Self {
        Self {
            state: AppState::new(paths),
        }
    }

    /// Run work scheduled on an earlier frame.
    fn run_pending(&mut self) {
        match self.state.take_ready() {
            Some(Pending::Download) => match HttpFetcher::new(HTTP_TIMEOUT) {
                Ok(fetcher) => self.state.download(&fetcher),
                Err(e) => self.state.notify(NoticeKind::Error, e.to_string()),
            },
            Some(Pending::Reload) => {
                self.state.reload_tables();
                self.state.notify(NoticeKind::Info, "Arquivos locais recarregados.");
            }
            None => {}
        }
    }
}

impl eframe::App for PcaApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.run_pending();

        if self.state.is_busy() {
            ctx.set_cursor_icon(egui::CursorIcon::Wait);
            ctx.request_repaint();
        }

        let mut actions: Vec<TabAction> = Vec::new();

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Bottom panels: notices, then record count and paging ----
        egui::TopBottomPanel::bottom("notices").show(ctx, |ui| {
            panels::notice_bar(ui, &mut self.state);
        });
        if let Some(tab) = self.state.tabs.get(self.state.active_tab) {
            egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
                table::footer(ui, tab, &mut actions);
            });
        }

        // ---- Central panel: year tabs, filters and the table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if !panels::tab_strip(ui, &mut self.state) {
                return;
            }
            if let Some(tab) = self.state.active_tab_mut() {
                ui.push_id(tab.year.clone(), |ui| {
                    table::filter_panel(ui, tab, &mut actions);
                    ui.add_space(4.0);
                    table::data_table(ui, tab, &mut actions);
                });
            }
        });

        for action in actions {
            self.state.apply(action);
        }

        dialogs::show(ctx, &mut self.state);
    }
}
