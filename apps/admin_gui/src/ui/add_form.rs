//! "Add Category" form shown in place of the list.

use eframe::egui;
use shared::protocol::CreateCategoryRequest;

pub const MISSING_FIELDS_MESSAGE: &str = "Prefix and name are required";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddCategoryForm {
    pub prefix: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    Submit,
    Cancel,
}

impl AddCategoryForm {
    /// Trimmed request body, or the validation message when a required field is blank.
    pub fn to_request(&self) -> Result<CreateCategoryRequest, &'static str> {
        let prefix = self.prefix.trim();
        let name = self.name.trim();
        if prefix.is_empty() || name.is_empty() {
            return Err(MISSING_FIELDS_MESSAGE);
        }
        Ok(CreateCategoryRequest {
            prefix: prefix.to_string(),
            name: name.to_string(),
            description: self.description.trim().to_string(),
        })
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn show(&mut self, ui: &mut egui::Ui, submitting: bool) -> Option<FormAction> {
        let mut action = None;

        ui.horizontal(|ui| {
            if ui.button("< Back").clicked() {
                action = Some(FormAction::Cancel);
            }
            ui.heading("Add Category");
        });
        ui.add_space(8.0);

        egui::Grid::new("add_category_form")
            .num_columns(2)
            .spacing(egui::vec2(12.0, 8.0))
            .show(ui, |ui| {
                ui.label("Prefix");
                ui.add(egui::TextEdit::singleline(&mut self.prefix).desired_width(240.0));
                ui.end_row();

                ui.label("Name");
                ui.add(egui::TextEdit::singleline(&mut self.name).desired_width(240.0));
                ui.end_row();

                ui.label("Description");
                ui.add(
                    egui::TextEdit::multiline(&mut self.description)
                        .desired_rows(4)
                        .desired_width(240.0),
                );
                ui.end_row();
            });

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui
                .add_enabled(!submitting, egui::Button::new("Save"))
                .clicked()
            {
                action = Some(FormAction::Submit);
            }
            if ui.button("Cancel").clicked() {
                action = Some(FormAction::Cancel);
            }
            if submitting {
                ui.spinner();
            }
        });

        action
    }
}
