//! Detail and delete-confirmation dialogs.

use eframe::egui;
use shared::domain::{Category, CategoryField};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteDecision {
    Confirm,
    Cancel,
}

fn modal_frame(ctx: &egui::Context) -> egui::Frame {
    egui::Frame::NONE
        .fill(ctx.style().visuals.window_fill)
        .stroke(egui::Stroke::new(
            1.0,
            ctx.style().visuals.window_stroke().color,
        ))
        .corner_radius(10.0)
        .inner_margin(egui::Margin::symmetric(16, 12))
}

/// Returns `true` when the user asked to close the dialog.
pub fn show_detail_window(ctx: &egui::Context, category: &Category) -> bool {
    let mut open = true;
    let mut close_requested = false;

    egui::Window::new("Category details")
        .id(egui::Id::new("category_detail_window"))
        .frame(modal_frame(ctx))
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .open(&mut open)
        .show(ctx, |ui| {
            egui::Grid::new("category_detail_grid")
                .num_columns(2)
                .spacing(egui::vec2(16.0, 6.0))
                .show(ui, |ui| {
                    ui.strong("ID");
                    ui.label(category.id.as_str());
                    ui.end_row();

                    for field in CategoryField::TABLE_COLUMNS {
                        ui.strong(field.label());
                        ui.label(category.field_text(field));
                        ui.end_row();
                    }

                    if category.created_at.is_some() {
                        ui.strong(CategoryField::CreatedAt.label());
                        ui.label(category.field_text(CategoryField::CreatedAt));
                        ui.end_row();
                    }

                    for (key, value) in &category.extra {
                        ui.weak(key);
                        ui.label(extra_value_text(value));
                        ui.end_row();
                    }
                });

            ui.add_space(8.0);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Close").clicked() {
                    close_requested = true;
                }
            });
        });

    !open || close_requested
}

pub fn show_delete_confirmation(
    ctx: &egui::Context,
    category: &Category,
    delete_in_flight: bool,
) -> Option<DeleteDecision> {
    let mut decision = None;

    egui::Window::new("Delete category")
        .id(egui::Id::new("category_delete_window"))
        .frame(modal_frame(ctx))
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            ui.label(format!(
                "Delete \"{}\" ({})?",
                category.name, category.prefix
            ));
            ui.label(
                "Are you sure you want to delete this category? This action cannot be undone.",
            );
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                let confirm = ui.add_enabled(
                    !delete_in_flight,
                    egui::Button::new(
                        egui::RichText::new("Delete").color(egui::Color32::WHITE),
                    )
                    .fill(egui::Color32::from_rgb(170, 60, 60)),
                );
                if confirm.clicked() {
                    decision = Some(DeleteDecision::Confirm);
                }
                if ui.button("Cancel").clicked() {
                    decision = Some(DeleteDecision::Cancel);
                }
                if delete_in_flight {
                    ui.spinner();
                }
            });
        });

    decision
}

fn extra_value_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}
