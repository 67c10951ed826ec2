#![allow(dead_code)]

use std::cmp::Ordering as CmpOrdering;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::{json, Value};

use portfolio_gateway::backend::{BackendError, BackingService, Session};
use portfolio_gateway::config::AppConfig;
use portfolio_gateway::types::{Direction, Filter, Order};
use portfolio_gateway::AppState;

pub const ADMIN_EMAIL: &str = "owner@example.com";
pub const ADMIN_PASSWORD: &str = "correct-horse";
pub const ADMIN_TOKEN: &str = "stub-admin-token";
pub const ADMIN_ID: &str = "6a1f7c2e-1111-4000-8000-00000000a001";
/// Token the stub accepts but resolves to no identity
pub const ORPHAN_TOKEN: &str = "stub-orphan-token";

/// In-memory stand-in for the hosted backend: PostgREST-like tables and a
/// single password user.
pub struct StubBackend {
    tables: Mutex<HashMap<String, Vec<Value>>>,
    next_id: AtomicU64,
    verifications: AtomicUsize,
    rejected_writes: Mutex<HashSet<String>>,
    update_filters: Mutex<Vec<(String, Filter)>>,
    offline: AtomicBool,
}

impl StubBackend {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(100),
            verifications: AtomicUsize::new(0),
            rejected_writes: Mutex::new(HashSet::new()),
            update_filters: Mutex::new(Vec::new()),
            offline: AtomicBool::new(false),
        }
    }

    pub fn with_rows(self, table: &str, rows: Vec<Value>) -> Self {
        self.tables.lock().unwrap().insert(table.to_string(), rows);
        self
    }

    /// Every write to `table` fails the way a row-level security policy would
    pub fn rejecting_writes(self, table: &str) -> Self {
        self.rejected_writes.lock().unwrap().insert(table.to_string());
        self
    }

    /// Login, token verification and health fail at the transport level,
    /// as if the identity service could not be reached
    pub fn unreachable(self) -> Self {
        self.offline.store(true, Ordering::SeqCst);
        self
    }

    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.tables.lock().unwrap().get(table).cloned().unwrap_or_default()
    }

    /// Number of token verifications requested so far
    pub fn verifications(&self) -> usize {
        self.verifications.load(Ordering::SeqCst)
    }

    pub fn update_filters(&self) -> Vec<(String, Filter)> {
        self.update_filters.lock().unwrap().clone()
    }

    fn check_writable(&self, table: &str) -> Result<(), BackendError> {
        if self.rejected_writes.lock().unwrap().contains(table) {
            return Err(BackendError::Rejected {
                status: 401,
                body: json!({
                    "code": "42501",
                    "details": null,
                    "hint": null,
                    "message": format!("new row violates row-level security policy for table \"{}\"", table)
                }),
            });
        }
        Ok(())
    }

    async fn check_reachable(&self) -> Result<(), BackendError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(connection_refused().await);
        }
        Ok(())
    }

    fn admin_user() -> Value {
        json!({ "id": ADMIN_ID, "email": ADMIN_EMAIL, "role": "authenticated", "aud": "authenticated" })
    }
}

/// A genuine transport failure: a request to a port nothing listens on
async fn connection_refused() -> BackendError {
    let port = portpicker::pick_unused_port().unwrap_or(9);
    match reqwest::Client::new()
        .get(format!("http://127.0.0.1:{}/auth/v1/health", port))
        .send()
        .await
    {
        Err(err) => BackendError::Transport(err),
        Ok(res) => BackendError::Decode(format!("unexpected answer from port {}: {}", port, res.status())),
    }
}

fn key_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn matches(row: &Value, filter: &Filter) -> bool {
    row.get(filter.column).map(key_of).as_deref() == Some(filter.value.as_str())
}

fn compare(a: &Value, b: &Value) -> CmpOrdering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(CmpOrdering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => CmpOrdering::Equal,
    }
}

#[async_trait]
impl BackingService for StubBackend {
    async fn select(&self, table: &str, order: Order) -> Result<Vec<Value>, BackendError> {
        let mut rows = self.rows(table);
        rows.sort_by(|a, b| {
            let ord = compare(&a[order.column], &b[order.column]);
            match order.direction {
                Direction::Asc => ord,
                Direction::Desc => ord.reverse(),
            }
        });
        Ok(rows)
    }

    async fn select_single(&self, table: &str) -> Result<Option<Value>, BackendError> {
        let rows = self.rows(table);
        if rows.len() == 1 {
            Ok(rows.into_iter().next())
        } else {
            Ok(None)
        }
    }

    async fn insert(&self, table: &str, row: Value, returning: bool) -> Result<Vec<Value>, BackendError> {
        self.check_writable(table)?;

        let Value::Object(mut fields) = row else {
            return Err(BackendError::Rejected {
                status: 400,
                body: json!({ "code": "PGRST102", "details": null, "hint": null, "message": "All object keys must match" }),
            });
        };

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        fields.entry("id").or_insert(json!(id));
        fields
            .entry("created_at")
            .or_insert(json!(format!("2025-01-01T00:00:00.{:06}+00:00", id)));

        let stored = Value::Object(fields);
        self.tables
            .lock()
            .unwrap()
            .entry(table.to_string())
            .or_default()
            .push(stored.clone());

        Ok(if returning { vec![stored] } else { Vec::new() })
    }

    async fn update(&self, table: &str, filter: Filter, patch: Value) -> Result<Vec<Value>, BackendError> {
        self.check_writable(table)?;
        self.update_filters
            .lock()
            .unwrap()
            .push((table.to_string(), filter.clone()));

        let mut tables = self.tables.lock().unwrap();
        let rows = tables.entry(table.to_string()).or_default();

        let mut updated = Vec::new();
        for row in rows.iter_mut().filter(|row| matches(row, &filter)) {
            if let (Value::Object(target), Value::Object(changes)) = (&mut *row, &patch) {
                // identity column: never rewritten by a patch
                for (key, value) in changes.iter().filter(|(key, _)| key.as_str() != "id") {
                    target.insert(key.clone(), value.clone());
                }
            }
            updated.push(row.clone());
        }
        Ok(updated)
    }

    async fn delete(&self, table: &str, filter: Filter) -> Result<(), BackendError> {
        self.check_writable(table)?;
        if let Some(rows) = self.tables.lock().unwrap().get_mut(table) {
            rows.retain(|row| !matches(row, &filter));
        }
        Ok(())
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, BackendError> {
        self.check_reachable().await?;
        if email == ADMIN_EMAIL && password == ADMIN_PASSWORD {
            return Ok(Session {
                access_token: ADMIN_TOKEN.to_string(),
                token_type: Some("bearer".to_string()),
                expires_in: Some(3600),
                refresh_token: Some("stub-refresh".to_string()),
                user: Self::admin_user(),
            });
        }
        Err(BackendError::Rejected {
            status: 400,
            body: json!({ "error": "invalid_grant", "error_description": "Invalid login credentials" }),
        })
    }

    async fn get_user(&self, token: &str) -> Result<Option<Value>, BackendError> {
        self.verifications.fetch_add(1, Ordering::SeqCst);
        self.check_reachable().await?;
        match token {
            ADMIN_TOKEN => Ok(Some(Self::admin_user())),
            ORPHAN_TOKEN => Ok(None),
            _ => Err(BackendError::Rejected {
                status: 401,
                body: json!({ "code": 401, "msg": "invalid JWT: unable to parse or verify signature" }),
            }),
        }
    }

    async fn health(&self) -> Result<(), BackendError> {
        self.check_reachable().await
    }
}

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub backend: Arc<StubBackend>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Serve the real router on a free port, backed by `backend`
pub async fn spawn_server(backend: StubBackend) -> Result<TestServer> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let base_url = format!("http://127.0.0.1:{}", port);

    let backend = Arc::new(backend);
    let mut config = AppConfig::development();
    config.api.enable_request_logging = false;
    let app = portfolio_gateway::app(AppState::from_arc(backend.clone()), &config);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .with_context(|| format!("failed to bind {}", base_url))?;
    tokio::spawn(async move { axum::serve(listener, app).await });

    Ok(TestServer { port, base_url, backend })
}

/// Portfolio content seeded the way the site is usually populated
pub fn seeded_backend() -> StubBackend {
    StubBackend::new()
        .with_rows(
            "about",
            vec![json!({ "id": 1, "name": "Ann Example", "headline": "Systems engineer" })],
        )
        .with_rows(
            "skills",
            vec![
                json!({ "id": 3, "name": "Rust", "level": 90 }),
                json!({ "id": 1, "name": "SQL", "level": 80 }),
                json!({ "id": 2, "name": "TypeScript", "level": 70 }),
            ],
        )
        .with_rows(
            "projects",
            vec![
                json!({ "id": 1, "title": "Tile server" }),
                json!({ "id": 2, "title": "Chat backend" }),
            ],
        )
        .with_rows(
            "messages",
            vec![
                json!({ "id": 1, "name": "Bo", "message": "older", "created_at": "2024-05-01T10:00:00+00:00" }),
                json!({ "id": 2, "name": "Cy", "message": "newer", "created_at": "2024-06-01T10:00:00+00:00" }),
            ],
        )
}

pub fn ids(rows: &Value) -> Vec<i64> {
    rows.as_array()
        .map(|rows| rows.iter().filter_map(|row| row["id"].as_i64()).collect())
        .unwrap_or_default()
}
