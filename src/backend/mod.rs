pub mod supabase;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::types::{Filter, Order};

pub use supabase::SupabaseClient;

/// Errors from the backing data service
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid backing service URL")]
    InvalidUrl,

    /// The service answered with a non-success status; `body` is its raw error payload
    #[error("Backing service rejected the request with status {status}")]
    Rejected { status: u16, body: Value },

    #[error("Unexpected response from backing service: {0}")]
    Decode(String),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

impl BackendError {
    /// Error payload as forwarded to API clients
    pub fn raw(&self) -> Value {
        match self {
            BackendError::Rejected { body, .. } => body.clone(),
            other => json!({ "message": other.to_string() }),
        }
    }

    /// Best-effort human readable message from the raw payload.
    ///
    /// PostgREST uses `message`, GoTrue uses `error_description`, `msg` or `message`
    /// depending on the endpoint and version.
    pub fn message(&self) -> String {
        match self {
            BackendError::Rejected { body, status } => ["error_description", "msg", "message", "error"]
                .iter()
                .find_map(|key| body.get(*key).and_then(Value::as_str))
                .map(str::to_string)
                .unwrap_or_else(|| format!("Request failed with status {}", status)),
            other => other.to_string(),
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, BackendError::Transport(_))
    }
}

/// Session returned by a successful password login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user: Value,
}

/// Table storage and authentication provided by the hosted backend.
///
/// Rows are opaque JSON objects; the only column the gateway relies on is the
/// one named in a [`Filter`] or [`Order`].
#[async_trait]
pub trait BackingService: Send + Sync {
    /// All rows of `table` in the given order
    async fn select(&self, table: &str, order: Order) -> Result<Vec<Value>, BackendError>;

    /// The single row of `table`, or `None` when the table does not hold exactly one row
    async fn select_single(&self, table: &str) -> Result<Option<Value>, BackendError>;

    /// Insert one row. The stored row is returned only when `returning` is set.
    async fn insert(&self, table: &str, row: Value, returning: bool) -> Result<Vec<Value>, BackendError>;

    /// Apply `patch` to every row matching `filter`, returning the updated rows
    async fn update(&self, table: &str, filter: Filter, patch: Value) -> Result<Vec<Value>, BackendError>;

    async fn delete(&self, table: &str, filter: Filter) -> Result<(), BackendError>;

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, BackendError>;

    /// Resolve the identity behind an access token
    async fn get_user(&self, token: &str) -> Result<Option<Value>, BackendError>;

    async fn health(&self) -> Result<(), BackendError>;
}
