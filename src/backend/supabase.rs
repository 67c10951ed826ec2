use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Method, RequestBuilder, Response};
use serde_json::{json, Value};
use tracing::debug;
use url::Url;

use super::{BackendError, BackingService, Session};
use crate::config::BackendConfig;
use crate::types::{Filter, Order};

const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// Client for a hosted Supabase project (PostgREST tables + GoTrue auth).
///
/// Built once at startup and shared read-only between handlers.
#[derive(Clone)]
pub struct SupabaseClient {
    http: reqwest::Client,
    base_url: Url,
    key: String,
}

impl SupabaseClient {
    pub fn new(base_url: &str, key: impl Into<String>, connect_timeout: Duration) -> Result<Self, BackendError> {
        let mut base_url = Url::parse(base_url).map_err(|_| BackendError::InvalidUrl)?;
        if base_url.cannot_be_a_base() {
            return Err(BackendError::InvalidUrl);
        }
        // Url::join replaces the last path segment unless the base ends in '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = reqwest::Client::builder().connect_timeout(connect_timeout).build()?;

        Ok(Self { http, base_url, key: key.into() })
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self, BackendError> {
        let url = config
            .url
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or(BackendError::ConfigMissing("SUPABASE_URL"))?;
        let key = config
            .key
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or(BackendError::ConfigMissing("SUPABASE_KEY"))?;

        Self::new(url, key, Duration::from_secs(config.connect_timeout_secs))
    }

    fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        self.base_url.join(path).map_err(|_| BackendError::InvalidUrl)
    }

    fn table_url(&self, table: &str) -> Result<Url, BackendError> {
        self.endpoint(&format!("rest/v1/{}", table))
    }

    fn list_url(&self, table: &str, order: Order) -> Result<Url, BackendError> {
        let mut url = self.table_url(table)?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("order", &format!("{}.{}", order.column, order.direction.as_str()));
        Ok(url)
    }

    fn filtered_url(&self, table: &str, filter: &Filter) -> Result<Url, BackendError> {
        let mut url = self.table_url(table)?;
        url.query_pairs_mut()
            .append_pair(filter.column, &format!("eq.{}", filter.value));
        Ok(url)
    }

    /// Request carrying the project key, used for table access and auth endpoints alike
    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!("{} {}", method, url);
        self.http
            .request(method, url)
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
    }

    async fn expect_success(response: Response) -> Result<Response, BackendError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await?;
        let body = serde_json::from_str(&text).unwrap_or_else(|_| json!({ "message": text }));
        Err(BackendError::Rejected { status: status.as_u16(), body })
    }

    async fn rows(response: Response) -> Result<Vec<Value>, BackendError> {
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&text).map_err(|e| BackendError::Decode(e.to_string()))
    }
}

#[async_trait]
impl BackingService for SupabaseClient {
    async fn select(&self, table: &str, order: Order) -> Result<Vec<Value>, BackendError> {
        let response = self.request(Method::GET, self.list_url(table, order)?).send().await?;
        Self::rows(Self::expect_success(response).await?).await
    }

    async fn select_single(&self, table: &str) -> Result<Option<Value>, BackendError> {
        let mut url = self.table_url(table)?;
        url.query_pairs_mut().append_pair("select", "*");

        let response = self
            .request(Method::GET, url)
            .header(ACCEPT, SINGLE_OBJECT)
            .send()
            .await?;

        // PostgREST answers 406 when the result is not exactly one row
        if response.status() == reqwest::StatusCode::NOT_ACCEPTABLE {
            return Ok(None);
        }

        let response = Self::expect_success(response).await?;
        let row = response
            .json::<Value>()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))?;
        Ok(Some(row))
    }

    async fn insert(&self, table: &str, row: Value, returning: bool) -> Result<Vec<Value>, BackendError> {
        let prefer = if returning { "return=representation" } else { "return=minimal" };
        let response = self
            .request(Method::POST, self.table_url(table)?)
            .header("Prefer", prefer)
            .json(&Value::Array(vec![row]))
            .send()
            .await?;

        let response = Self::expect_success(response).await?;
        if returning {
            Self::rows(response).await
        } else {
            Ok(Vec::new())
        }
    }

    async fn update(&self, table: &str, filter: Filter, patch: Value) -> Result<Vec<Value>, BackendError> {
        let response = self
            .request(Method::PATCH, self.filtered_url(table, &filter)?)
            .header("Prefer", "return=representation")
            .json(&patch)
            .send()
            .await?;

        Self::rows(Self::expect_success(response).await?).await
    }

    async fn delete(&self, table: &str, filter: Filter) -> Result<(), BackendError> {
        let response = self
            .request(Method::DELETE, self.filtered_url(table, &filter)?)
            .send()
            .await?;

        Self::expect_success(response).await?;
        Ok(())
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, BackendError> {
        let mut url = self.endpoint("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");

        let response = self
            .request(Method::POST, url)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        Self::expect_success(response)
            .await?
            .json::<Session>()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))
    }

    async fn get_user(&self, token: &str) -> Result<Option<Value>, BackendError> {
        let response = self
            .http
            .get(self.endpoint("auth/v1/user")?)
            .header("apikey", &self.key)
            .bearer_auth(token)
            .send()
            .await?;

        let user = Self::expect_success(response)
            .await?
            .json::<Value>()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))?;

        // GoTrue answers with the user object itself; an id is required to count as resolved
        if user.get("id").map_or(true, Value::is_null) {
            return Ok(None);
        }
        Ok(Some(user))
    }

    async fn health(&self) -> Result<(), BackendError> {
        let response = self.request(Method::GET, self.endpoint("auth/v1/health")?).send().await?;
        Self::expect_success(response).await?;
        Ok(())
    }
}
