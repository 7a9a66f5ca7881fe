use eframe::egui::{self, Align, Button, Label, Layout, RichText, ScrollArea, Sense, Ui};
use egui_extras::{Column, DatePickerButton, TableBuilder};

use crate::state::{TabAction, YearTab};

const ROW_HEIGHT: f32 = 20.0;
const HEADER_HEIGHT: f32 = 24.0;
const MENU_PREVIEW_CHARS: usize = 30;

// ---------------------------------------------------------------------------
// Filter panel
// ---------------------------------------------------------------------------

/// Text fields per filter column, the date picker and "Limpar Filtros".
pub fn filter_panel(ui: &mut Ui, tab: &mut YearTab, actions: &mut Vec<TabAction>) {
    let mut edited = false;
    let mut date = tab.filters.date;

    ui.group(|ui: &mut Ui| {
        ui.strong("Filtros");
        egui::Grid::new("filters")
            .num_columns(4)
            .spacing([12.0, 6.0])
            .show(ui, |ui: &mut Ui| {
                for (i, field) in tab.filters.fields.iter_mut().enumerate() {
                    ui.label(format!("{}:", field.column.replace(" (R$)", "")));
                    let edit = egui::TextEdit::singleline(&mut field.text)
                        .hint_text(format!("Filtrar por {}...", field.column))
                        .interactive(!field.read_only)
                        .desired_width(240.0);
                    if ui.add(edit).changed() {
                        edited = true;
                    }
                    if i % 2 == 1 {
                        ui.end_row();
                    }
                }
                if tab.filters.fields.len() % 2 == 1 {
                    ui.end_row();
                }

                ui.label("Data Desejada:");
                ui.horizontal(|ui: &mut Ui| {
                    let mut enabled = date.is_some();
                    if ui.checkbox(&mut enabled, "").changed() {
                        date = enabled.then(|| chrono::Local::now().date_naive());
                    }
                    if let Some(selected) = date.as_mut() {
                        ui.add(DatePickerButton::new(selected).format("%d/%m/%Y"));
                    }
                });
                ui.end_row();
            });

        if ui.button("Limpar Filtros 🗑").clicked() {
            actions.push(TabAction::ClearFilters);
        }
    });

    if edited {
        actions.push(TabAction::Refilter);
    }
    if date != tab.filters.date {
        actions.push(TabAction::SetDate(date));
    }
}

// ---------------------------------------------------------------------------
// Data table
// ---------------------------------------------------------------------------

fn preview(text: &str) -> String {
    text.chars().take(MENU_PREVIEW_CHARS).collect()
}

/// The current page of the view, restricted to the display columns.
pub fn data_table(ui: &mut Ui, tab: &YearTab, actions: &mut Vec<TabAction>) {
    let columns = &tab.display_columns;
    if columns.is_empty() {
        ui.label("Nenhuma coluna conhecida neste arquivo.");
        return;
    }
    let rows = tab.page_rows();

    ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(Layout::left_to_right(Align::Center))
            .columns(
                Column::auto().at_least(60.0).at_most(420.0).clip(true),
                columns.len(),
            )
            .header(HEADER_HEIGHT, |mut header| {
                for &col in columns {
                    header.col(|ui: &mut Ui| {
                        let name = tab.column_name(col);
                        let icon = match &tab.sort {
                            Some(sort) if sort.column == name => sort.direction.icon(),
                            _ => "↕",
                        };
                        let label = Label::new(RichText::new(format!("{name} {icon}")).strong())
                            .selectable(false)
                            .sense(Sense::click());
                        if ui.add(label).clicked() {
                            actions.push(TabAction::Sort(name.to_string()));
                        }
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                    let r = rows[row.index()];
                    for &col in columns {
                        row.col(|ui: &mut Ui| {
                            cell(ui, tab, r, col, actions);
                        });
                    }
                });
            });
    });
}

/// One cell: double-click copies the row id, right-click opens the menu.
fn cell(ui: &mut Ui, tab: &YearTab, row: usize, col: usize, actions: &mut Vec<TabAction>) {
    let text = tab.table.cell(row, col);
    let response = ui.add(
        Label::new(text)
            .truncate()
            .selectable(false)
            .sense(Sense::click()),
    );

    if response.double_clicked() {
        if let Some(id) = tab.row_id(row) {
            ui.ctx().copy_text(id.to_string());
            actions.push(TabAction::Copied(format!("O ID '{id}' foi copiado.")));
        }
    }

    response.context_menu(|ui: &mut Ui| {
        if ui.button(format!("Copiar \"{}...\"", preview(text))).clicked() {
            ui.ctx().copy_text(text.to_string());
            actions.push(TabAction::Copied("Célula copiada.".to_string()));
            ui.close_menu();
        }
        if ui.button("Copiar Linha Inteira").clicked() {
            ui.ctx().copy_text(tab.display_values(row).join("\t"));
            actions.push(TabAction::Copied("Linha copiada.".to_string()));
            ui.close_menu();
        }

        let column = tab.column_name(col);
        if tab.filters.is_editable(column) {
            ui.separator();
            if ui.button(format!("Filtrar por \"{}...\"", preview(text))).clicked() {
                actions.push(TabAction::FilterByCell {
                    column: column.to_string(),
                    value: text.to_string(),
                });
                ui.close_menu();
            }
        }
    });
}

// ---------------------------------------------------------------------------
// Footer
// ---------------------------------------------------------------------------

/// Record count, amount sum and page navigation.
pub fn footer(ui: &mut Ui, tab: &YearTab, actions: &mut Vec<TabAction>) {
    let info = tab.page_info();
    ui.horizontal(|ui: &mut Ui| {
        ui.label(tab.summary().label());
        ui.with_layout(Layout::right_to_left(Align::Center), |ui: &mut Ui| {
            if ui
                .add_enabled(info.has_next, Button::new("Próxima >>"))
                .clicked()
            {
                actions.push(TabAction::NextPage);
            }
            ui.label(format!("Página {} de {}", info.current, info.total));
            if ui
                .add_enabled(info.has_prev, Button::new("<< Anterior"))
                .clicked()
            {
                actions.push(TabAction::PrevPage);
            }
        });
    });
}
