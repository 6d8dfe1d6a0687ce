//! Application shell: owns the list state, drains backend events each frame and turns widget
//! interactions into backend commands.

use std::time::Duration;

use client_core::{
    list_state::mutation_failure_message, ClientError, FetchOutcome, FetchTicket, ListState,
    Notification, NotificationSink,
};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use serde::{Deserialize, Serialize};
use shared::domain::{ListQuery, SortOrder};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::{UiError, UiErrorContext, UiEvent},
    orchestration::dispatch_backend_command,
};
use crate::ui::{
    add_form::{AddCategoryForm, FormAction},
    header::{show_toolbar, ToolbarChanges},
    modals::{show_delete_confirmation, show_detail_window, DeleteDecision},
    table::{show_category_table, show_loading_placeholder, show_pagination, RowAction},
    toasts::ToastQueue,
};

pub const PREFERENCES_STORAGE_KEY: &str = "category_admin.list_preferences";

/// List preferences kept between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedListPreferences {
    limit: u32,
    sort_by: String,
    sort_order: SortOrder,
}

impl PersistedListPreferences {
    fn from_query(query: &ListQuery) -> Self {
        Self {
            limit: query.limit,
            sort_by: query.sort_by.clone(),
            sort_order: query.sort_order,
        }
    }

    fn apply(self, query: &mut ListQuery) {
        query.limit = self.limit.max(1);
        if !self.sort_by.trim().is_empty() {
            query.sort_by = self.sort_by;
        }
        query.sort_order = self.sort_order;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AppView {
    Categories,
    AddCategory,
}

#[derive(Debug, Clone)]
struct StatusBanner {
    message: String,
}

pub struct CategoriesAdminApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    list: ListState,
    toasts: ToastQueue,
    view: AppView,
    search_draft: String,
    add_form: AddCategoryForm,
    create_in_flight: bool,
    status: String,
    status_banner: Option<StatusBanner>,
}

impl CategoriesAdminApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        page_size: u32,
        persisted: Option<PersistedListPreferences>,
    ) -> Self {
        let mut query = ListQuery::with_limit(page_size);
        if let Some(preferences) = persisted {
            preferences.apply(&mut query);
        }

        let mut app = Self {
            cmd_tx,
            ui_rx,
            list: ListState::new(query),
            toasts: ToastQueue::new(),
            view: AppView::Categories,
            search_draft: String::new(),
            add_form: AddCategoryForm::default(),
            create_in_flight: false,
            status: "Starting".to_string(),
            status_banner: None,
        };
        let initial = app.list.begin_fetch();
        app.dispatch_fetch(Some(initial));
        app
    }

    fn dispatch(&mut self, cmd: BackendCommand) -> bool {
        let is_fetch = matches!(cmd, BackendCommand::FetchCategories(_));
        let is_delete = matches!(cmd, BackendCommand::DeleteCategory { .. });
        match dispatch_backend_command(&self.cmd_tx, cmd) {
            Ok(()) => true,
            Err(err) => {
                if is_fetch {
                    self.list.abandon_fetch();
                }
                if is_delete {
                    self.list.abandon_delete();
                }
                self.report_error(err);
                false
            }
        }
    }

    fn dispatch_fetch(&mut self, ticket: Option<FetchTicket>) {
        if let Some(ticket) = ticket {
            self.dispatch(BackendCommand::FetchCategories(ticket));
        }
    }

    fn report_error(&mut self, err: UiError) {
        self.status = err.message().to_string();
        self.status_banner = Some(StatusBanner {
            message: err.banner_text(),
        });
    }

    fn report_request_failure(&mut self, context: UiErrorContext, err: &ClientError) {
        if let Some(err) = UiError::from_client_error(context, err) {
            self.report_error(err);
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::Error(err) => {
                    tracing::error!(context = ?err.context(), "{}", err.message());
                    self.report_error(err);
                }
                UiEvent::CategoriesFetched { generation, result } => {
                    let banner = result
                        .as_ref()
                        .err()
                        .and_then(|err| {
                            UiError::from_client_error(UiErrorContext::FetchCategories, err)
                        });
                    match self.list.apply_fetch(generation, result) {
                        FetchOutcome::Applied | FetchOutcome::Stale => {}
                        FetchOutcome::PageOutOfRange(ticket) => self.dispatch_fetch(Some(ticket)),
                        FetchOutcome::Failed(notification) => {
                            self.toasts.notify(notification);
                            if let Some(err) = banner {
                                self.report_error(err);
                            }
                        }
                    }
                }
                UiEvent::CategoryDeleted => {
                    let notification = self.list.delete_succeeded();
                    self.toasts.notify(notification);
                }
                UiEvent::DeleteFailed(err) => {
                    let notification = self.list.delete_failed(&err);
                    self.toasts.notify(notification);
                    self.report_request_failure(UiErrorContext::DeleteCategory, &err);
                }
                UiEvent::DeleteSettled { category_id } => {
                    let ticket = self.list.finish_delete(&category_id);
                    self.dispatch_fetch(Some(ticket));
                }
                UiEvent::CategoryCreated { name } => {
                    self.create_in_flight = false;
                    self.add_form.clear();
                    self.view = AppView::Categories;
                    self.toasts.notify(Notification::success(format!(
                        "Category {name} created Successfully"
                    )));
                    let ticket = self.list.begin_fetch();
                    self.dispatch_fetch(Some(ticket));
                }
                UiEvent::CreateFailed(err) => {
                    self.create_in_flight = false;
                    tracing::error!("error when creating category: {err}");
                    self.toasts
                        .notify(Notification::error(mutation_failure_message(&err)));
                    self.report_request_failure(UiErrorContext::CreateCategory, &err);
                }
            }
        }
    }

    fn apply_toolbar(&mut self, changes: ToolbarChanges) {
        if changes.add_requested {
            self.view = AppView::AddCategory;
        }
        if let Some(search_query) = changes.search_query {
            let ticket = self.list.set_search_query(search_query);
            self.dispatch_fetch(ticket);
        }
        if let Some(sort_by) = changes.sort_by {
            let ticket = self.list.set_sort_by(sort_by);
            self.dispatch_fetch(ticket);
        }
        if let Some(sort_order) = changes.sort_order {
            let ticket = self.list.set_sort_order(sort_order);
            self.dispatch_fetch(ticket);
        }
        if let Some(limit) = changes.limit {
            let ticket = self.list.set_limit(limit);
            self.dispatch_fetch(ticket);
        }
    }

    fn apply_row_action(&mut self, action: RowAction) {
        match action {
            RowAction::View(id) => {
                self.list.request_view_detail(&id);
            }
            RowAction::Delete(id) => {
                self.list.request_delete(&id);
            }
        }
    }

    fn change_page(&mut self, page: u32) {
        let ticket = self.list.set_page(page);
        self.dispatch_fetch(ticket);
    }

    fn confirm_delete(&mut self) {
        let selected = self.list.delete_confirmation().selection().cloned();
        match self.list.begin_delete(selected.as_ref()) {
            Ok(Some(category_id)) => {
                self.dispatch(BackendCommand::DeleteCategory { category_id });
            }
            Ok(None) => {}
            Err(notification) => self.toasts.notify(notification),
        }
    }

    fn submit_add_form(&mut self) {
        if self.create_in_flight {
            return;
        }
        match self.add_form.to_request() {
            Ok(request) => {
                self.create_in_flight = self.dispatch(BackendCommand::CreateCategory(request));
            }
            Err(message) => self.toasts.notify(Notification::error(message)),
        }
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        if let Some(banner) = self.status_banner.clone() {
            egui::Frame::NONE
                .fill(egui::Color32::from_rgb(111, 53, 53))
                .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)))
                .corner_radius(8.0)
                .inner_margin(egui::Margin::symmetric(10, 8))
                .show(ui, |ui| {
                    ui.horizontal_wrapped(|ui| {
                        ui.label(egui::RichText::new(&banner.message).color(egui::Color32::WHITE));
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.button("Dismiss").clicked() {
                                self.status_banner = None;
                            }
                        });
                    });
                });
            ui.add_space(8.0);
        }
    }

    fn show_categories(&mut self, ui: &mut egui::Ui) {
        let changes = show_toolbar(ui, &mut self.search_draft, self.list.query());
        self.apply_toolbar(changes);
        ui.separator();

        if self.list.is_loading() {
            show_loading_placeholder(ui);
            return;
        }

        if let Some(action) = show_category_table(ui, self.list.items()) {
            self.apply_row_action(action);
        }
        ui.add_space(8.0);
        if let Some(page) = show_pagination(
            ui,
            self.list.query().page,
            self.list.page_count(),
            self.list.total(),
        ) {
            self.change_page(page);
        }
    }

    fn show_add_category(&mut self, ui: &mut egui::Ui) {
        match self.add_form.show(ui, self.create_in_flight) {
            Some(FormAction::Submit) => self.submit_add_form(),
            Some(FormAction::Cancel) => {
                self.add_form.clear();
                self.view = AppView::Categories;
            }
            None => {}
        }
    }

    fn show_modals(&mut self, ctx: &egui::Context) {
        if let Some(category) = self.list.view_detail().selection().cloned() {
            if show_detail_window(ctx, &category) {
                self.list.close_view_detail();
            }
        }

        if let Some(category) = self.list.delete_confirmation().selection().cloned() {
            match show_delete_confirmation(ctx, &category, self.list.is_delete_in_flight()) {
                Some(DeleteDecision::Confirm) => self.confirm_delete(),
                Some(DeleteDecision::Cancel) => self.list.close_delete_confirmation(),
                None => {}
            }
        }
    }
}

impl eframe::App for CategoriesAdminApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.small(&self.status);
        });
        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_status_banner(ui);
            match self.view {
                AppView::Categories => self.show_categories(ui),
                AppView::AddCategory => self.show_add_category(ui),
            }
        });
        self.show_modals(ctx);
        self.toasts.show(ctx);

        ctx.request_repaint_after(Duration::from_millis(100));
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let preferences = PersistedListPreferences::from_query(self.list.query());
        if let Ok(serialized) = serde_json::to_string(&preferences) {
            storage.set_string(PREFERENCES_STORAGE_KEY, serialized);
        }
    }
}

#[cfg(test)]
#[path = "../tests/app_tests.rs"]
mod app_tests;
