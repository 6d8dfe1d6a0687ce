use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{header::COOKIE, Client, RequestBuilder, Response};
use shared::{
    domain::{CategoryId, CategoryPage, ListQuery},
    error::ApiErrorBody,
    protocol::{CreateCategoryRequest, ListCategoriesResponse},
};
use tracing::debug;
use url::Url;

pub mod config;
pub mod controller;
pub mod error;
pub mod list_state;
pub mod notification;

pub use config::ClientSettings;
pub use controller::CategoryListController;
pub use error::{ClientError, ClientResult};
pub use list_state::{FetchOutcome, FetchTicket, ListState, ModalState};
pub use notification::{Notification, NotificationLevel, NotificationSink};

const CATEGORIES_PATH: &str = "api/v1/categories";

#[async_trait]
pub trait CategoryApi: Send + Sync {
    async fn list_categories(&self, query: &ListQuery) -> ClientResult<CategoryPage>;
    async fn delete_category(&self, id: &CategoryId) -> ClientResult<()>;
    async fn create_category(&self, request: &CreateCategoryRequest) -> ClientResult<()>;
}

#[async_trait]
impl<T> CategoryApi for Arc<T>
where
    T: CategoryApi + ?Sized,
{
    async fn list_categories(&self, query: &ListQuery) -> ClientResult<CategoryPage> {
        (**self).list_categories(query).await
    }

    async fn delete_category(&self, id: &CategoryId) -> ClientResult<()> {
        (**self).delete_category(id).await
    }

    async fn create_category(&self, request: &CreateCategoryRequest) -> ClientResult<()> {
        (**self).create_category(request).await
    }
}

/// Credentials forwarded on mutating requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub bearer_token: Option<String>,
    pub session_cookie: Option<String>,
}

impl Credentials {
    pub fn from_settings(settings: &ClientSettings) -> Self {
        Self {
            bearer_token: settings.auth_token.clone(),
            session_cookie: settings.session_cookie.clone(),
        }
    }

    fn apply(&self, mut builder: RequestBuilder) -> RequestBuilder {
        if let Some(token) = &self.bearer_token {
            builder = builder.bearer_auth(token);
        }
        if let Some(cookie) = &self.session_cookie {
            builder = builder.header(COOKIE, cookie);
        }
        builder
    }
}

fn build_client_user_agent() -> String {
    format!("category_admin / v{}", env!("CARGO_PKG_VERSION"))
}

/// HTTP implementation of [`CategoryApi`] for `{base}/api/v1/categories`.
#[derive(Debug, Clone)]
pub struct CategoryClient {
    http: Client,
    categories_url: Url,
    credentials: Credentials,
}

impl CategoryClient {
    pub fn new(settings: &ClientSettings) -> ClientResult<Self> {
        let http = Client::builder()
            .user_agent(build_client_user_agent())
            .timeout(settings.request_timeout())
            .build()
            .map_err(ClientError::HttpClientInit)?;

        Ok(Self {
            http,
            categories_url: categories_url(&settings.api_base_url)?,
            credentials: Credentials::from_settings(settings),
        })
    }

    pub fn from_base_url(api_base_url: impl Into<String>) -> ClientResult<Self> {
        Self::new(&ClientSettings {
            api_base_url: api_base_url.into(),
            ..ClientSettings::default()
        })
    }

    pub fn list_url(&self, query: &ListQuery) -> Url {
        let mut url = self.categories_url.clone();
        url.query_pairs_mut().extend_pairs(query.query_pairs());
        url
    }

    pub fn item_url(&self, id: &CategoryId) -> ClientResult<Url> {
        let mut url = self.categories_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::UnsupportedBaseUrl(self.categories_url.to_string()))?
            .push(id.as_str());
        Ok(url)
    }

    async fn send(&self, endpoint: &str, builder: RequestBuilder) -> ClientResult<Response> {
        let response = builder.send().await.map_err(|source| ClientError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.bytes().await.unwrap_or_default();
        Err(ClientError::Api {
            endpoint: endpoint.to_string(),
            status,
            message: ApiErrorBody::parse_message(&body),
        })
    }
}

#[async_trait]
impl CategoryApi for CategoryClient {
    async fn list_categories(&self, query: &ListQuery) -> ClientResult<CategoryPage> {
        let url = self.list_url(query);
        let endpoint = format!("GET {}", url.path());
        debug!(%url, "fetching categories");

        let response = self.send(&endpoint, self.http.get(url)).await?;
        let body = response
            .bytes()
            .await
            .map_err(|source| ClientError::Transport {
                endpoint: endpoint.clone(),
                source,
            })?;
        let parsed: ListCategoriesResponse = serde_json::from_slice(&body)
            .map_err(|source| ClientError::Decode { endpoint, source })?;

        Ok(parsed.into())
    }

    async fn delete_category(&self, id: &CategoryId) -> ClientResult<()> {
        let url = self.item_url(id)?;
        let endpoint = format!("DELETE {}", url.path());
        let request = self.credentials.apply(self.http.delete(url));
        self.send(&endpoint, request).await?;
        Ok(())
    }

    async fn create_category(&self, request: &CreateCategoryRequest) -> ClientResult<()> {
        let url = self.categories_url.clone();
        let endpoint = format!("POST {}", url.path());
        let builder = self.credentials.apply(self.http.post(url).json(request));
        self.send(&endpoint, builder).await?;
        Ok(())
    }
}

fn categories_url(api_base_url: &str) -> ClientResult<Url> {
    let trimmed = api_base_url.trim().trim_end_matches('/');
    let url = Url::parse(&format!("{trimmed}/{CATEGORIES_PATH}")).map_err(|source| {
        ClientError::InvalidBaseUrl {
            url: api_base_url.to_string(),
            source,
        }
    })?;
    if url.cannot_be_a_base() {
        return Err(ClientError::UnsupportedBaseUrl(api_base_url.to_string()));
    }
    Ok(url)
}

#[cfg(test)]
#[path = "tests/client_tests.rs"]
mod client_tests;

#[cfg(test)]
#[path = "tests/list_state_tests.rs"]
mod list_state_tests;

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod controller_tests;
