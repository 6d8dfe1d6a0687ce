use super::*;
use axum::{
    extract::{Path, RawQuery, State},
    http::{HeaderMap, StatusCode},
    routing::{delete, get},
    Json, Router,
};
use serde_json::{json, Value};
use shared::domain::SortOrder;
use tokio::{net::TcpListener, sync::Mutex};

use crate::list_state::{mutation_failure_message, UNEXPECTED_ERROR_MESSAGE};

#[derive(Debug, Clone, PartialEq, Eq)]
struct RecordedMutation {
    target: String,
    authorization: Option<String>,
    cookie: Option<String>,
}

#[derive(Clone)]
struct ServerState {
    seen_queries: Arc<Mutex<Vec<String>>>,
    deletes: Arc<Mutex<Vec<RecordedMutation>>>,
    creates: Arc<Mutex<Vec<(RecordedMutation, Value)>>>,
    list_body: Arc<Mutex<Value>>,
    mutation_reply: Arc<Mutex<(StatusCode, Option<Value>)>>,
}

impl ServerState {
    fn new() -> Self {
        Self {
            seen_queries: Arc::new(Mutex::new(Vec::new())),
            deletes: Arc::new(Mutex::new(Vec::new())),
            creates: Arc::new(Mutex::new(Vec::new())),
            list_body: Arc::new(Mutex::new(json!({
                "data": [
                    { "categoryId": 1, "prefix": "ELC", "name": "Electronics", "description": "Gadgets" },
                    { "categoryId": "2", "prefix": "BK", "name": "Books", "description": null }
                ],
                "total": 7
            }))),
            mutation_reply: Arc::new(Mutex::new((StatusCode::OK, None))),
        }
    }
}

fn header_text(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

async fn list_categories(
    State(state): State<ServerState>,
    RawQuery(query): RawQuery,
) -> Json<Value> {
    state.seen_queries.lock().await.push(query.unwrap_or_default());
    Json(state.list_body.lock().await.clone())
}

async fn mutation_reply(state: &ServerState) -> (StatusCode, String) {
    let (status, body) = state.mutation_reply.lock().await.clone();
    (status, body.map(|b| b.to_string()).unwrap_or_default())
}

async fn delete_category(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> (StatusCode, String) {
    state.deletes.lock().await.push(RecordedMutation {
        target: id,
        authorization: header_text(&headers, "authorization"),
        cookie: header_text(&headers, "cookie"),
    });
    mutation_reply(&state).await
}

async fn create_category(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, String) {
    state.creates.lock().await.push((
        RecordedMutation {
            target: "collection".to_string(),
            authorization: header_text(&headers, "authorization"),
            cookie: header_text(&headers, "cookie"),
        },
        body,
    ));
    mutation_reply(&state).await
}

async fn spawn_category_server() -> anyhow::Result<(String, ServerState)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = ServerState::new();
    let app = Router::new()
        .route(
            "/api/v1/categories",
            get(list_categories).post(create_category),
        )
        .route("/api/v1/categories/:id", delete(delete_category))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}"), state))
}

fn credentialed_client(base_url: &str) -> CategoryClient {
    CategoryClient::new(&ClientSettings {
        api_base_url: base_url.to_string(),
        auth_token: Some("token-1".to_string()),
        session_cookie: Some("session=abc".to_string()),
        ..ClientSettings::default()
    })
    .expect("client")
}

#[tokio::test]
async fn list_request_query_string_reflects_all_five_parameters() {
    let (base_url, state) = spawn_category_server().await.expect("spawn server");
    let client = CategoryClient::from_base_url(&base_url).expect("client");

    let queries = [
        ListQuery::default(),
        ListQuery {
            page: 3,
            limit: 10,
            sort_by: "name".to_string(),
            sort_order: SortOrder::Desc,
            search_query: "office chairs & desks".to_string(),
        },
        ListQuery {
            page: 12,
            limit: 50,
            sort_by: "prefix".to_string(),
            sort_order: SortOrder::Asc,
            search_query: "100% cotton?".to_string(),
        },
    ];

    for query in &queries {
        client.list_categories(query).await.expect("list categories");
    }

    let seen = state.seen_queries.lock().await.clone();
    assert_eq!(seen.len(), queries.len());
    for (raw, query) in seen.iter().zip(&queries) {
        let decoded: Vec<(String, String)> = url::form_urlencoded::parse(raw.as_bytes())
            .into_owned()
            .collect();
        let expected: Vec<(String, String)> = query
            .query_pairs()
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect();
        assert_eq!(decoded, expected);
    }
}

#[tokio::test]
async fn list_response_is_normalized_with_server_total() {
    let (base_url, _state) = spawn_category_server().await.expect("spawn server");
    let client = CategoryClient::from_base_url(format!("{base_url}/")).expect("client");

    let page = client
        .list_categories(&ListQuery::default())
        .await
        .expect("list categories");

    assert_eq!(page.total, 7);
    let ids: Vec<&str> = page.items.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2"]);
    assert_eq!(page.items[1].description, None);
}

#[tokio::test]
async fn malformed_list_body_is_a_decode_error() {
    let (base_url, state) = spawn_category_server().await.expect("spawn server");
    *state.list_body.lock().await = json!({ "data": "not-a-list", "total": 1 });
    let client = CategoryClient::from_base_url(&base_url).expect("client");

    let err = client
        .list_categories(&ListQuery::default())
        .await
        .expect_err("decode failure");
    assert!(matches!(err, ClientError::Decode { .. }), "got {err:?}");
}

#[tokio::test]
async fn delete_forwards_credentials_to_item_endpoint() {
    let (base_url, state) = spawn_category_server().await.expect("spawn server");
    let client = credentialed_client(&base_url);

    client
        .delete_category(&CategoryId::new("cat-42"))
        .await
        .expect("delete");

    let deletes = state.deletes.lock().await.clone();
    assert_eq!(
        deletes,
        vec![RecordedMutation {
            target: "cat-42".to_string(),
            authorization: Some("Bearer token-1".to_string()),
            cookie: Some("session=abc".to_string()),
        }]
    );
}

#[tokio::test]
async fn delete_failure_carries_server_message() {
    let (base_url, state) = spawn_category_server().await.expect("spawn server");
    *state.mutation_reply.lock().await = (
        StatusCode::CONFLICT,
        Some(json!({ "message": "Category is in use" })),
    );
    let client = credentialed_client(&base_url);

    let err = client
        .delete_category(&CategoryId::new("7"))
        .await
        .expect_err("conflict");

    assert_eq!(err.status(), Some(StatusCode::CONFLICT));
    assert_eq!(err.server_message(), Some("Category is in use"));
    assert_eq!(mutation_failure_message(&err), "Category is in use");
}

#[tokio::test]
async fn delete_failure_without_message_falls_back_to_generic_text() {
    let (base_url, state) = spawn_category_server().await.expect("spawn server");
    *state.mutation_reply.lock().await = (StatusCode::INTERNAL_SERVER_ERROR, None);
    let client = credentialed_client(&base_url);

    let err = client
        .delete_category(&CategoryId::new("7"))
        .await
        .expect_err("server error");

    assert_eq!(err.server_message(), None);
    assert_eq!(mutation_failure_message(&err), UNEXPECTED_ERROR_MESSAGE);
}

#[tokio::test]
async fn create_posts_camel_case_body_with_credentials() {
    let (base_url, state) = spawn_category_server().await.expect("spawn server");
    *state.mutation_reply.lock().await = (StatusCode::CREATED, Some(json!({ "categoryId": 9 })));
    let client = credentialed_client(&base_url);

    client
        .create_category(&CreateCategoryRequest {
            prefix: "TOY".to_string(),
            name: "Toys".to_string(),
            description: "Games and puzzles".to_string(),
        })
        .await
        .expect("create");

    let creates = state.creates.lock().await.clone();
    assert_eq!(creates.len(), 1);
    let (recorded, body) = &creates[0];
    assert_eq!(recorded.authorization.as_deref(), Some("Bearer token-1"));
    assert_eq!(body["name"], "Toys");
    assert_eq!(body["prefix"], "TOY");
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let client = CategoryClient::from_base_url(format!("http://{addr}")).expect("client");
    let err = client
        .list_categories(&ListQuery::default())
        .await
        .expect_err("connection refused");

    assert!(matches!(err, ClientError::Transport { .. }), "got {err:?}");
    assert_eq!(mutation_failure_message(&err), UNEXPECTED_ERROR_MESSAGE);
}

#[test]
fn base_url_without_scheme_is_rejected() {
    let err = CategoryClient::from_base_url("localhost:8080").expect_err("invalid base");
    assert!(
        matches!(
            err,
            ClientError::InvalidBaseUrl { .. } | ClientError::UnsupportedBaseUrl(_)
        ),
        "got {err:?}"
    );
}

#[test]
fn item_url_escapes_identifier() {
    let client = CategoryClient::from_base_url("http://admin.local/backend/").expect("client");
    let url = client
        .item_url(&CategoryId::new("a b/1"))
        .expect("item url");
    assert_eq!(
        url.as_str(),
        "http://admin.local/backend/api/v1/categories/a%20b%2F1"
    );
}
