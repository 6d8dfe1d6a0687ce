use super::*;
use std::time::Duration;

use reqwest::StatusCode;
use shared::domain::{Category, SortOrder};
use tokio::{sync::Mutex, time::Instant};

use crate::{
    list_state::{
        DELETE_SUCCEEDED_MESSAGE, FETCH_FAILED_MESSAGE, NO_SELECTION_MESSAGE,
        UNEXPECTED_ERROR_MESSAGE,
    },
    notification::RecordingNotificationSink,
};

const CLOSE_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, PartialEq)]
enum Call {
    List(ListQuery, Instant),
    Delete(CategoryId, Instant),
}

/// In-memory category service: a fixed catalogue served page by page.
struct FakeCategoryApi {
    catalogue: Mutex<Vec<Category>>,
    calls: Mutex<Vec<Call>>,
    fail_list: Mutex<bool>,
    delete_error: Mutex<Option<Option<String>>>,
}

impl FakeCategoryApi {
    fn with_rows(count: usize) -> Arc<Self> {
        let catalogue = (1..=count)
            .map(|n| {
                Category::new(
                    CategoryId::new(n.to_string()),
                    &format!("P{n}"),
                    &format!("Category {n}"),
                    "",
                )
            })
            .collect();
        Arc::new(Self {
            catalogue: Mutex::new(catalogue),
            calls: Mutex::new(Vec::new()),
            fail_list: Mutex::new(false),
            delete_error: Mutex::new(None),
        })
    }

    async fn calls(&self) -> Vec<Call> {
        self.calls.lock().await.clone()
    }

    async fn list_calls(&self) -> usize {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|call| matches!(call, Call::List(..)))
            .count()
    }
}

#[async_trait]
impl CategoryApi for FakeCategoryApi {
    async fn list_categories(&self, query: &ListQuery) -> ClientResult<CategoryPage> {
        self.calls
            .lock()
            .await
            .push(Call::List(query.clone(), Instant::now()));

        if *self.fail_list.lock().await {
            return Err(ClientError::Api {
                endpoint: "GET /api/v1/categories".to_string(),
                status: StatusCode::SERVICE_UNAVAILABLE,
                message: None,
            });
        }

        let catalogue = self.catalogue.lock().await;
        let start = (query.page as usize - 1) * query.limit as usize;
        Ok(CategoryPage {
            items: catalogue
                .iter()
                .skip(start)
                .take(query.limit as usize)
                .cloned()
                .collect(),
            total: catalogue.len() as u64,
        })
    }

    async fn delete_category(&self, id: &CategoryId) -> ClientResult<()> {
        self.calls
            .lock()
            .await
            .push(Call::Delete(id.clone(), Instant::now()));

        if let Some(message) = self.delete_error.lock().await.clone() {
            return Err(ClientError::Api {
                endpoint: format!("DELETE /api/v1/categories/{id}"),
                status: StatusCode::CONFLICT,
                message,
            });
        }

        self.catalogue.lock().await.retain(|c| &c.id != id);
        Ok(())
    }

    async fn create_category(&self, _request: &CreateCategoryRequest) -> ClientResult<()> {
        Ok(())
    }
}

fn controller(
    api: &Arc<FakeCategoryApi>,
) -> CategoryListController<Arc<FakeCategoryApi>, Arc<RecordingNotificationSink>> {
    CategoryListController::with_state(
        api.clone(),
        Arc::new(RecordingNotificationSink::new()),
        ListState::default(),
        CLOSE_DELAY,
    )
}

#[tokio::test]
async fn initial_fetch_uses_default_query_and_fills_page() {
    let api = FakeCategoryApi::with_rows(12);
    let mut controller = controller(&api);

    controller.fetch_all_categories().await;

    let state = controller.state();
    assert!(!state.is_loading());
    assert_eq!(state.items().len(), 5);
    assert!(state.items().len() <= state.query().limit as usize);
    assert_eq!(state.total(), 12);
    match &api.calls().await[..] {
        [Call::List(query, _)] => assert_eq!(query, &ListQuery::default()),
        other => panic!("unexpected calls {other:?}"),
    }
}

#[tokio::test]
async fn query_changes_refetch_once_each_and_total_never_triggers() {
    let api = FakeCategoryApi::with_rows(12);
    let mut controller = controller(&api);

    controller.fetch_all_categories().await;
    controller.set_page(3).await;
    controller.set_sort_by("name").await;
    controller.set_sort_order(SortOrder::Desc).await;
    controller.set_search_query("Category").await;
    controller.set_search_query("Category").await;

    assert_eq!(api.list_calls().await, 5);
    let query = controller.state().query();
    assert_eq!(query.sort_by, "name");
    assert_eq!(query.sort_order, SortOrder::Desc);
    assert_eq!(query.page, 1);
}

#[tokio::test]
async fn failed_fetch_notifies_and_keeps_previous_rows() {
    let api = FakeCategoryApi::with_rows(6);
    let mut controller = controller(&api);
    controller.fetch_all_categories().await;

    *api.fail_list.lock().await = true;
    controller.set_page(2).await;

    assert_eq!(controller.state().items().len(), 5);
    assert!(!controller.state().is_loading());
    assert_eq!(
        controller.notifier().messages(),
        vec![FETCH_FAILED_MESSAGE.to_string()]
    );
}

#[tokio::test]
async fn delete_without_selection_sends_no_request() {
    let api = FakeCategoryApi::with_rows(3);
    let mut controller = controller(&api);

    controller.handle_deleted_category(None).await;

    assert!(api.calls().await.is_empty());
    let notifications = controller.notifier().take();
    assert_eq!(notifications.len(), 1);
    assert!(notifications[0].is_error());
    assert_eq!(notifications[0].message, NO_SELECTION_MESSAGE);
}

#[tokio::test]
async fn confirm_with_closed_modal_behaves_like_missing_selection() {
    let api = FakeCategoryApi::with_rows(3);
    let mut controller = controller(&api);

    controller.confirm_delete().await;

    assert!(api.calls().await.is_empty());
    assert_eq!(
        controller.notifier().messages(),
        vec![NO_SELECTION_MESSAGE.to_string()]
    );
}

#[tokio::test(start_paused = true)]
async fn successful_delete_closes_modal_and_refetches_after_delay() {
    let api = FakeCategoryApi::with_rows(7);
    let mut controller = controller(&api);
    controller.fetch_all_categories().await;

    assert!(controller.request_delete(&CategoryId::new("3")));
    controller.confirm_delete().await;

    let calls = api.calls().await;
    let deleted_at = match &calls[1] {
        Call::Delete(id, at) => {
            assert_eq!(id, &CategoryId::new("3"));
            *at
        }
        other => panic!("expected delete, got {other:?}"),
    };
    let refetched_at = match &calls[2] {
        Call::List(_, at) => *at,
        other => panic!("expected refetch, got {other:?}"),
    };
    assert!(refetched_at - deleted_at >= CLOSE_DELAY);
    assert_eq!(calls.len(), 3);

    let state = controller.state();
    assert!(!state.delete_confirmation().is_open());
    assert!(!state.is_delete_in_flight());
    assert_eq!(state.total(), 6);
    assert!(state.items().iter().all(|c| c.id != CategoryId::new("3")));

    let notifications = controller.notifier().take();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].message, DELETE_SUCCEEDED_MESSAGE);
    assert_eq!(notifications[0].duration, Duration::from_millis(2000));
}

#[tokio::test(start_paused = true)]
async fn modal_stays_open_until_delay_elapses() {
    let api = FakeCategoryApi::with_rows(2);
    let mut controller = controller(&api);
    controller.fetch_all_categories().await;
    assert!(controller.request_delete(&CategoryId::new("1")));

    let started = Instant::now();
    let in_flight = controller.confirm_delete();
    let timed_out = tokio::time::timeout(CLOSE_DELAY / 2, in_flight).await;
    assert!(timed_out.is_err());
    assert!(Instant::now() - started < CLOSE_DELAY);

    let selected = controller.state().delete_confirmation().selection();
    assert_eq!(selected.map(|c| c.id.as_str()), Some("1"));
    assert_eq!(api.list_calls().await, 1);
}

#[tokio::test]
async fn delete_failure_uses_server_message_then_fallback() {
    let api = FakeCategoryApi::with_rows(2);
    let mut controller = controller(&api);
    controller.fetch_all_categories().await;
    let target = controller.state().items()[0].clone();

    *api.delete_error.lock().await = Some(Some("Category is in use".to_string()));
    controller.handle_deleted_category(Some(&target)).await;

    *api.delete_error.lock().await = Some(None);
    controller.handle_deleted_category(Some(&target)).await;

    assert_eq!(
        controller.notifier().messages(),
        vec![
            "Category is in use".to_string(),
            UNEXPECTED_ERROR_MESSAGE.to_string()
        ]
    );
    assert_eq!(api.list_calls().await, 1);
    assert_eq!(controller.state().total(), 2);
}

#[tokio::test]
async fn deleting_last_row_of_last_page_steps_back_a_page() {
    let api = FakeCategoryApi::with_rows(6);
    let mut controller = CategoryListController::with_state(
        api.clone(),
        Arc::new(RecordingNotificationSink::new()),
        ListState::default(),
        Duration::ZERO,
    );
    controller.fetch_all_categories().await;
    controller.set_page(2).await;
    assert_eq!(controller.state().items().len(), 1);

    assert!(controller.request_delete(&CategoryId::new("6")));
    controller.confirm_delete().await;

    let state = controller.state();
    assert_eq!(state.query().page, 1);
    assert_eq!(state.items().len(), 5);
    assert_eq!(state.total(), 5);
}

#[tokio::test]
async fn view_detail_open_close_round_trip() {
    let api = FakeCategoryApi::with_rows(2);
    let mut controller = controller(&api);
    controller.fetch_all_categories().await;
    let target = controller.state().items()[1].clone();

    controller.open_view_detail(target.clone());
    assert_eq!(controller.state().view_detail().selection(), Some(&target));

    controller.close_view_detail();
    assert_eq!(controller.state().view_detail(), &ModalState::Closed);
}
