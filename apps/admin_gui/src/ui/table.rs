//! Category table with per-row actions and the pagination bar under it.

use eframe::egui;
use shared::domain::{Category, CategoryField, CategoryId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowAction {
    View(CategoryId),
    Delete(CategoryId),
}

pub fn show_category_table(ui: &mut egui::Ui, items: &[Category]) -> Option<RowAction> {
    let mut action = None;

    egui::ScrollArea::vertical()
        .id_salt("category_table_scroll")
        .auto_shrink([false, true])
        .show(ui, |ui| {
            egui::Grid::new("category_table")
                .striped(true)
                .num_columns(CategoryField::TABLE_COLUMNS.len() + 1)
                .spacing(egui::vec2(18.0, 8.0))
                .min_col_width(80.0)
                .show(ui, |ui| {
                    for field in CategoryField::TABLE_COLUMNS {
                        ui.strong(field.label());
                    }
                    ui.strong("Actions");
                    ui.end_row();

                    if items.is_empty() {
                        ui.weak("No categories found");
                        ui.end_row();
                    }

                    for category in items {
                        for field in CategoryField::TABLE_COLUMNS {
                            ui.label(category.field_text(field));
                        }
                        ui.horizontal(|ui| {
                            if ui.small_button("View").clicked() {
                                action = Some(RowAction::View(category.id.clone()));
                            }
                            ui.add_enabled(false, egui::Button::new("Edit").small())
                                .on_disabled_hover_text("Editing is not available yet");
                            if ui.small_button("Delete").clicked() {
                                action = Some(RowAction::Delete(category.id.clone()));
                            }
                        });
                        ui.end_row();
                    }
                });
        });

    action
}

pub fn show_loading_placeholder(ui: &mut egui::Ui) {
    ui.horizontal(|ui| {
        ui.spinner();
        ui.label("Loading...");
    });
}

/// Returns the page the user navigated to, if any.
pub fn show_pagination(ui: &mut egui::Ui, page: u32, page_count: u32, total: u64) -> Option<u32> {
    let (previous, next) = neighbour_pages(page, page_count);
    let mut target = None;

    ui.horizontal(|ui| {
        if ui
            .add_enabled(previous.is_some(), egui::Button::new("< Previous"))
            .clicked()
        {
            target = previous;
        }
        ui.label(format!("Page {page} of {page_count}"));
        if ui
            .add_enabled(next.is_some(), egui::Button::new("Next >"))
            .clicked()
        {
            target = next;
        }
        ui.separator();
        ui.weak(format!("{total} items"));
    });

    target
}

fn neighbour_pages(page: u32, page_count: u32) -> (Option<u32>, Option<u32>) {
    let previous = (page > 1).then(|| page - 1);
    let next = (page < page_count).then(|| page + 1);
    (previous, next)
}

#[cfg(test)]
mod tests {
    use super::neighbour_pages;

    #[test]
    fn first_and_last_pages_disable_one_direction() {
        assert_eq!(neighbour_pages(1, 1), (None, None));
        assert_eq!(neighbour_pages(1, 3), (None, Some(2)));
        assert_eq!(neighbour_pages(2, 3), (Some(1), Some(3)));
        assert_eq!(neighbour_pages(3, 3), (Some(2), None));
    }
}
