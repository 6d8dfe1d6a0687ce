//! Sans-IO state of the category list: query parameters, the current page of rows, loading
//! status and the two modal selections.
//!
//! Every operation that needs the network hands back a [`FetchTicket`] (or a delete target)
//! instead of performing I/O, so the same state drives both the async controller and the GUI
//! worker bridge. Fetches are stamped with a generation; only the latest one is ever applied.

use shared::domain::{Category, CategoryId, CategoryPage, ListQuery, SortOrder};
use tracing::{debug, warn};

use crate::{error::ClientError, notification::Notification};

pub const FETCH_FAILED_MESSAGE: &str = "Error when fetching data categories";
pub const NO_SELECTION_MESSAGE: &str = "No Category selected for deletion";
pub const DELETE_SUCCEEDED_MESSAGE: &str = "Category deleted Successfully";
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred. Please try again.";

#[derive(Debug, Clone, PartialEq)]
pub enum ModalState<T> {
    Closed,
    Open(T),
}

impl<T> Default for ModalState<T> {
    fn default() -> Self {
        ModalState::Closed
    }
}

impl<T> ModalState<T> {
    pub fn open(&mut self, selection: T) {
        *self = ModalState::Open(selection);
    }

    pub fn close(&mut self) {
        *self = ModalState::Closed;
    }

    pub fn is_open(&self) -> bool {
        matches!(self, ModalState::Open(_))
    }

    pub fn selection(&self) -> Option<&T> {
        match self {
            ModalState::Open(selection) => Some(selection),
            ModalState::Closed => None,
        }
    }
}

/// A fetch the caller must perform, carrying the query snapshot it was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub query: ListQuery,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Applied,
    /// The requested page no longer exists; the state moved to the last page and wants it fetched.
    PageOutOfRange(FetchTicket),
    Failed(Notification),
    Stale,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListState {
    query: ListQuery,
    items: Vec<Category>,
    total: u64,
    loading: bool,
    latest_generation: u64,
    view_detail: ModalState<Category>,
    delete_confirmation: ModalState<Category>,
    delete_in_flight: bool,
}

impl Default for ListState {
    fn default() -> Self {
        Self::new(ListQuery::default())
    }
}

impl ListState {
    pub fn new(mut query: ListQuery) -> Self {
        query.page = query.page.max(1);
        query.limit = query.limit.max(1);
        Self {
            query,
            items: Vec::new(),
            total: 0,
            loading: false,
            latest_generation: 0,
            view_detail: ModalState::Closed,
            delete_confirmation: ModalState::Closed,
            delete_in_flight: false,
        }
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    pub fn items(&self) -> &[Category] {
        &self.items
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn page_count(&self) -> u32 {
        self.query.page_count(self.total)
    }

    pub fn latest_generation(&self) -> u64 {
        self.latest_generation
    }

    pub fn view_detail(&self) -> &ModalState<Category> {
        &self.view_detail
    }

    pub fn delete_confirmation(&self) -> &ModalState<Category> {
        &self.delete_confirmation
    }

    pub fn is_delete_in_flight(&self) -> bool {
        self.delete_in_flight
    }

    pub fn find(&self, id: &CategoryId) -> Option<&Category> {
        self.items.iter().find(|category| &category.id == id)
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.latest_generation += 1;
        self.loading = true;
        FetchTicket {
            generation: self.latest_generation,
            query: self.query.clone(),
        }
    }

    pub fn set_page(&mut self, page: u32) -> Option<FetchTicket> {
        let page = page.max(1);
        if self.query.page == page {
            return None;
        }
        self.query.page = page;
        Some(self.begin_fetch())
    }

    /// Changing the page size returns to the first page.
    pub fn set_limit(&mut self, limit: u32) -> Option<FetchTicket> {
        let limit = limit.max(1);
        if self.query.limit == limit {
            return None;
        }
        self.query.limit = limit;
        self.query.page = 1;
        Some(self.begin_fetch())
    }

    pub fn set_sort_by(&mut self, sort_by: impl Into<String>) -> Option<FetchTicket> {
        let sort_by = sort_by.into();
        if self.query.sort_by == sort_by {
            return None;
        }
        self.query.sort_by = sort_by;
        Some(self.begin_fetch())
    }

    pub fn set_sort_order(&mut self, sort_order: SortOrder) -> Option<FetchTicket> {
        if self.query.sort_order == sort_order {
            return None;
        }
        self.query.sort_order = sort_order;
        Some(self.begin_fetch())
    }

    /// Changing the search text returns to the first page.
    pub fn set_search_query(&mut self, search_query: impl Into<String>) -> Option<FetchTicket> {
        let search_query = search_query.into();
        if self.query.search_query == search_query {
            return None;
        }
        self.query.search_query = search_query;
        self.query.page = 1;
        Some(self.begin_fetch())
    }

    pub fn apply_fetch(
        &mut self,
        generation: u64,
        result: Result<CategoryPage, ClientError>,
    ) -> FetchOutcome {
        if generation != self.latest_generation {
            debug!(
                generation,
                latest = self.latest_generation,
                "dropping superseded category fetch result"
            );
            return FetchOutcome::Stale;
        }
        self.loading = false;

        let page = match result {
            Ok(page) => page,
            Err(err) => {
                tracing::error!("error when fetching categories: {err}");
                return FetchOutcome::Failed(Notification::error(FETCH_FAILED_MESSAGE));
            }
        };

        let limit = self.query.limit as usize;
        let mut items = page.items;
        if items.len() > limit {
            warn!(
                received = items.len(),
                limit, "server returned more categories than requested; truncating"
            );
            items.truncate(limit);
        }

        self.items = items;
        self.total = page.total;

        if self.items.is_empty() && self.query.page > 1 && self.total > 0 {
            let last_page = self.page_count();
            if last_page < self.query.page {
                self.query.page = last_page;
                return FetchOutcome::PageOutOfRange(self.begin_fetch());
            }
        }

        FetchOutcome::Applied
    }

    pub fn open_view_detail(&mut self, category: Category) {
        self.view_detail.open(category);
    }

    pub fn close_view_detail(&mut self) {
        self.view_detail.close();
    }

    pub fn open_delete_confirmation(&mut self, category: Category) {
        self.delete_confirmation.open(category);
    }

    pub fn close_delete_confirmation(&mut self) {
        self.delete_confirmation.close();
    }

    /// Opens the delete confirmation for the displayed row with `id`.
    pub fn request_delete(&mut self, id: &CategoryId) -> bool {
        match self.find(id).cloned() {
            Some(category) => {
                self.open_delete_confirmation(category);
                true
            }
            None => {
                warn!(category_id = %id, "delete requested for a category that is not displayed");
                false
            }
        }
    }

    /// Same as [`Self::request_delete`] for the detail modal.
    pub fn request_view_detail(&mut self, id: &CategoryId) -> bool {
        match self.find(id).cloned() {
            Some(category) => {
                self.open_view_detail(category);
                true
            }
            None => false,
        }
    }

    /// Validates the delete target and marks a delete in flight.
    ///
    /// `Ok(None)` means a delete is already running and this request is ignored.
    pub fn begin_delete(
        &mut self,
        category: Option<&Category>,
    ) -> Result<Option<CategoryId>, Notification> {
        let Some(category) = category else {
            return Err(Notification::error(NO_SELECTION_MESSAGE));
        };
        if self.delete_in_flight {
            debug!(category_id = %category.id, "delete already in flight; ignoring");
            return Ok(None);
        }
        self.delete_in_flight = true;
        Ok(Some(category.id.clone()))
    }

    /// The delete stays in flight until [`ListState::finish_delete`] so the still-open
    /// confirmation cannot issue a second request.
    pub fn delete_succeeded(&mut self) -> Notification {
        Notification::success(DELETE_SUCCEEDED_MESSAGE)
    }

    pub fn delete_failed(&mut self, err: &ClientError) -> Notification {
        self.delete_in_flight = false;
        tracing::error!("error when deleting category: {err}");
        Notification::error(mutation_failure_message(err))
    }

    /// Ends the delete of `deleted` after the post-delete delay and asks for a fresh page.
    /// The confirmation closes only while it still shows the deleted record.
    pub fn finish_delete(&mut self, deleted: &CategoryId) -> FetchTicket {
        self.delete_in_flight = false;
        let shows_deleted = self
            .delete_confirmation
            .selection()
            .is_some_and(|category| &category.id == deleted);
        if shows_deleted {
            self.delete_confirmation.close();
        } else {
            debug!(category_id = %deleted, "confirmation moved on; leaving it open");
        }
        self.begin_fetch()
    }

    /// A fetch could not be handed to a worker: clear loading and drop the outstanding ticket.
    pub fn abandon_fetch(&mut self) {
        if self.loading {
            self.latest_generation += 1;
        }
        self.loading = false;
    }

    /// A delete could not be handed to a worker. Fetches in flight are unaffected.
    pub fn abandon_delete(&mut self) {
        self.delete_in_flight = false;
    }
}

/// Server-provided message when present, generic fallback otherwise.
pub fn mutation_failure_message(err: &ClientError) -> String {
    err.server_message()
        .map(str::to_string)
        .unwrap_or_else(|| UNEXPECTED_ERROR_MESSAGE.to_string())
}
