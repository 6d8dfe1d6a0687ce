//! Toolbar above the table: search box, sort controls, page size and add-navigation.

use eframe::egui;
use shared::domain::{CategoryField, ListQuery, SortOrder};

const LIMIT_OPTIONS: [u32; 4] = [5, 10, 20, 50];

/// Edits made in the toolbar this frame.
#[derive(Debug, Default, PartialEq)]
pub struct ToolbarChanges {
    pub search_query: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
    pub limit: Option<u32>,
    pub add_requested: bool,
}

pub fn show_toolbar(
    ui: &mut egui::Ui,
    search_draft: &mut String,
    query: &ListQuery,
) -> ToolbarChanges {
    let mut changes = ToolbarChanges::default();

    ui.horizontal(|ui| {
        ui.heading("Categories");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("Add Category").clicked() {
                changes.add_requested = true;
            }
        });
    });
    ui.add_space(6.0);

    ui.horizontal_wrapped(|ui| {
        ui.label("Search");
        let search = ui.add(
            egui::TextEdit::singleline(search_draft)
                .hint_text("Search by prefix, name or description")
                .desired_width(260.0),
        );
        if search.changed() {
            changes.search_query = Some(search_draft.clone());
        }

        ui.separator();
        ui.label("Sort by");
        let mut sort_by = query.sort_by.clone();
        egui::ComboBox::from_id_salt("category_sort_by")
            .selected_text(sort_by_label(&sort_by))
            .show_ui(ui, |ui| {
                for field in CategoryField::SORTABLE {
                    ui.selectable_value(&mut sort_by, field.key().to_string(), field.label());
                }
            });
        if sort_by != query.sort_by {
            changes.sort_by = Some(sort_by);
        }

        let mut sort_order = query.sort_order;
        egui::ComboBox::from_id_salt("category_sort_order")
            .selected_text(sort_order.label())
            .show_ui(ui, |ui| {
                for order in [SortOrder::Asc, SortOrder::Desc] {
                    ui.selectable_value(&mut sort_order, order, order.label());
                }
            });
        if sort_order != query.sort_order {
            changes.sort_order = Some(sort_order);
        }

        ui.separator();
        ui.label("Rows per page");
        let mut limit = query.limit;
        egui::ComboBox::from_id_salt("category_page_size")
            .selected_text(limit.to_string())
            .show_ui(ui, |ui| {
                for option in limit_options(query.limit) {
                    ui.selectable_value(&mut limit, option, option.to_string());
                }
            });
        if limit != query.limit {
            changes.limit = Some(limit);
        }
    });

    changes
}

fn sort_by_label(sort_by: &str) -> &str {
    CategoryField::from_key(sort_by)
        .map(CategoryField::label)
        .unwrap_or(sort_by)
}

/// Fixed choices plus the configured size when it is not one of them.
fn limit_options(current: u32) -> Vec<u32> {
    let mut options = LIMIT_OPTIONS.to_vec();
    if !options.contains(&current) {
        options.push(current);
        options.sort_unstable();
    }
    options
}
