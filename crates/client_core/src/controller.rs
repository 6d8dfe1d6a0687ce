use std::time::Duration;

use shared::domain::{Category, CategoryId, SortOrder};
use tracing::info;

use crate::{
    config::ClientSettings,
    list_state::{FetchOutcome, FetchTicket, ListState, ModalState},
    notification::NotificationSink,
    CategoryApi,
};

/// Drives a [`ListState`] against a [`CategoryApi`], one awaited request at a time.
pub struct CategoryListController<A, N> {
    api: A,
    notifier: N,
    state: ListState,
    delete_close_delay: Duration,
}

impl<A, N> CategoryListController<A, N>
where
    A: CategoryApi,
    N: NotificationSink,
{
    pub fn new(api: A, notifier: N, settings: &ClientSettings) -> Self {
        Self {
            api,
            notifier,
            state: ListState::new(shared::domain::ListQuery::with_limit(settings.page_size)),
            delete_close_delay: settings.delete_close_delay(),
        }
    }

    pub fn with_state(api: A, notifier: N, state: ListState, delete_close_delay: Duration) -> Self {
        Self {
            api,
            notifier,
            state,
            delete_close_delay,
        }
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub async fn fetch_all_categories(&mut self) {
        let ticket = self.state.begin_fetch();
        self.run_fetch(ticket).await;
    }

    pub async fn set_page(&mut self, page: u32) {
        if let Some(ticket) = self.state.set_page(page) {
            self.run_fetch(ticket).await;
        }
    }

    pub async fn set_limit(&mut self, limit: u32) {
        if let Some(ticket) = self.state.set_limit(limit) {
            self.run_fetch(ticket).await;
        }
    }

    pub async fn set_sort_by(&mut self, sort_by: impl Into<String>) {
        if let Some(ticket) = self.state.set_sort_by(sort_by) {
            self.run_fetch(ticket).await;
        }
    }

    pub async fn set_sort_order(&mut self, sort_order: SortOrder) {
        if let Some(ticket) = self.state.set_sort_order(sort_order) {
            self.run_fetch(ticket).await;
        }
    }

    pub async fn set_search_query(&mut self, search_query: impl Into<String>) {
        if let Some(ticket) = self.state.set_search_query(search_query) {
            self.run_fetch(ticket).await;
        }
    }

    pub fn open_view_detail(&mut self, category: Category) {
        self.state.open_view_detail(category);
    }

    pub fn close_view_detail(&mut self) {
        self.state.close_view_detail();
    }

    pub fn request_delete(&mut self, id: &CategoryId) -> bool {
        self.state.request_delete(id)
    }

    pub fn close_delete_confirmation(&mut self) {
        self.state.close_delete_confirmation();
    }

    /// Deletes whatever the confirmation modal currently holds.
    pub async fn confirm_delete(&mut self) {
        let selected = match self.state.delete_confirmation() {
            ModalState::Open(category) => Some(category.clone()),
            ModalState::Closed => None,
        };
        self.handle_deleted_category(selected.as_ref()).await;
    }

    pub async fn handle_deleted_category(&mut self, category: Option<&Category>) {
        let category_id = match self.state.begin_delete(category) {
            Ok(Some(category_id)) => category_id,
            Ok(None) => return,
            Err(notification) => {
                self.notifier.notify(notification);
                return;
            }
        };

        match self.api.delete_category(&category_id).await {
            Ok(()) => {
                info!(category_id = %category_id, "category deleted");
                let notification = self.state.delete_succeeded();
                self.notifier.notify(notification);

                if !self.delete_close_delay.is_zero() {
                    tokio::time::sleep(self.delete_close_delay).await;
                }
                let ticket = self.state.finish_delete(&category_id);
                self.run_fetch(ticket).await;
            }
            Err(err) => {
                let notification = self.state.delete_failed(&err);
                self.notifier.notify(notification);
            }
        }
    }

    async fn run_fetch(&mut self, mut ticket: FetchTicket) {
        loop {
            let result = self.api.list_categories(&ticket.query).await;
            match self.state.apply_fetch(ticket.generation, result) {
                FetchOutcome::PageOutOfRange(next) => ticket = next,
                FetchOutcome::Failed(notification) => {
                    self.notifier.notify(notification);
                    return;
                }
                FetchOutcome::Applied | FetchOutcome::Stale => return,
            }
        }
    }
}
