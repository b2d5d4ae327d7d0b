//! Harness shared by the integration tests: a real server on an ephemeral
//! port, in-memory stores and stub scoring peers.
#![allow(dead_code)]

use std::convert::Infallible;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use server::AppState;
use server::database::{CredentialStore, NewScan, NewUser, SqliteStore, StoreError, UserAuth};
use server::scoring::{PeerRequest, PeerResponse, ScoringError, ScoringPeer};
use shared::config::parse_config;
use shared::types::ScanRecord;
use shared::types::server_config::AppConfig;

pub const SECRET: &str = "integration-test-secret-at-least-32-characters";

pub fn test_config() -> AppConfig {
    parse_config(&format!(
        r#"
[server]
bind = "127.0.0.1"
port = 0
request_timeout_secs = 5
max_body_bytes = 65536

[auth]
token_expiry_hours = 24
jwt_secret = "{SECRET}"

[scoring]
endpoint = "http://127.0.0.1:9/analyze"
timeout_ms = 1000

[database]
path = ":memory:"
"#
    ))
    .unwrap()
}

// ---------------------------------------------------------------------------
// Running server
// ---------------------------------------------------------------------------

pub struct TestServer {
    pub base: String,
    pub client: reqwest::Client,
    pub state: AppState,
    handle: JoinHandle<()>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl TestServer {
    pub async fn start(store: Arc<dyn CredentialStore>, peer: Arc<dyn ScoringPeer>) -> Self {
        let state = AppState::new(test_config(), store, peer).unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());

        let serve_state = state.clone();
        let handle = tokio::spawn(async move {
            let _ = server::server::serve(listener, serve_state).await;
        });

        Self {
            base,
            client: reqwest::Client::new(),
            state,
            handle,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub async fn register(&self, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/register"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .unwrap()
    }

    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .unwrap()
    }

    /// Register and log in, returning `(user_id, token)`.
    pub async fn signed_in(&self, email: &str) -> (i64, String) {
        let reg: Value = self.register(email, "correct horse").await.json().await.unwrap();
        let login: Value = self.login(email, "correct horse").await.json().await.unwrap();
        (
            reg["user_id"].as_i64().unwrap(),
            login["token"].as_str().unwrap().to_string(),
        )
    }

    pub async fn analyze(&self, token: &str, url: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/analyze"))
            .bearer_auth(token)
            .json(&json!({ "url": url, "dom_content": "<html><body>hi</body></html>" }))
            .send()
            .await
            .unwrap()
    }

    pub async fn get_auth(&self, path: &str, token: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .unwrap()
    }
}

// ---------------------------------------------------------------------------
// Stub scoring peers
// ---------------------------------------------------------------------------

/// Answers `Phishing` for any URL containing "phish", `Legitimate` otherwise.
#[derive(Default)]
pub struct StubPeer {
    pub calls: AtomicUsize,
}

impl StubPeer {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScoringPeer for StubPeer {
    async fn invoke(&self, req: PeerRequest) -> Result<PeerResponse, ScoringError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let phishing = req.url.contains("phish");
        Ok(PeerResponse {
            verdict: if phishing { "Phishing" } else { "Legitimate" }.to_string(),
            phishing_probability: if phishing { 0.93 } else { 0.04 },
            analyzed_features: json!({ "html_len": req.html.len() }),
        })
    }
}

/// Always unreachable.
pub struct DownPeer;

#[async_trait]
impl ScoringPeer for DownPeer {
    async fn invoke(&self, _req: PeerRequest) -> Result<PeerResponse, ScoringError> {
        Err(ScoringError::Timeout)
    }
}

/// A real HTTP scoring service answering every request with `status` and
/// `body` after `delay`.  Returns its analyze URL.
pub async fn spawn_http_peer(status: u16, body: &'static str, delay: Duration) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                return;
            };
            tokio::spawn(async move {
                let service = hyper::service::service_fn(move |_req: Request<Incoming>| async move {
                    tokio::time::sleep(delay).await;
                    Ok::<_, Infallible>(
                        Response::builder()
                            .status(status)
                            .header("content-type", "application/json")
                            .body(Full::new(Bytes::from_static(body.as_bytes())))
                            .unwrap(),
                    )
                });
                let _ = http1::Builder::new()
                    .serve_connection(TokioIo::new(stream), service)
                    .await;
            });
        }
    });

    format!("http://{}/analyze", addr)
}

// ---------------------------------------------------------------------------
// Stores
// ---------------------------------------------------------------------------

pub async fn memory_store() -> Arc<SqliteStore> {
    Arc::new(SqliteStore::in_memory().await.unwrap())
}

/// Delegates to SQLite but refuses every scan write.
pub struct ReadOnlyScans {
    pub inner: SqliteStore,
}

#[async_trait]
impl CredentialStore for ReadOnlyScans {
    async fn create_user(&self, user: NewUser) -> Result<i64, StoreError> {
        self.inner.create_user(user).await
    }

    async fn email_exists(&self, email: &str) -> Result<bool, StoreError> {
        self.inner.email_exists(email).await
    }

    async fn get_user_auth(&self, email: &str) -> Result<Option<UserAuth>, StoreError> {
        self.inner.get_user_auth(email).await
    }

    async fn insert_scan(&self, _scan: NewScan) -> Result<i64, StoreError> {
        Err(StoreError::Database("disk I/O error".to_string()))
    }

    async fn list_scans(
        &self,
        user_id: i64,
        limit: Option<u32>,
    ) -> Result<Vec<ScanRecord>, StoreError> {
        self.inner.list_scans(user_id, limit).await
    }

    async fn count_scans(&self, user_id: i64) -> Result<i64, StoreError> {
        self.inner.count_scans(user_id).await
    }

    async fn count_blocked(&self, user_id: i64) -> Result<i64, StoreError> {
        self.inner.count_blocked(user_id).await
    }
}
