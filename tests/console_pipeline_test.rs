//! End-to-end tests against an in-process mock of the detection backend.
//!
//! The mock mirrors the backend contract: `/auth/login` sets an HTTP-only
//! session cookie, and every `/v1/*` list endpoint answers 401 without it.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::Query;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use guard_console::client::http::HttpBackend;
use guard_console::config::ConsoleConfig;
use guard_console::models::auth::LoginForm;
use guard_console::models::pagination::ListQuery;
use guard_console::render::{LocalClock, Node};
use guard_console::router::shell::{Screen, ShellExit};
use guard_console::router::PageKind;
use guard_console::services::auth::{AuthForms, FormOutcome, MessageArea, MessageKind};
use guard_console::services::session::{RecordingNavigator, SessionGuard};
use guard_console::views::{AgentsTable, AlertsList, DetectionsFeed, ViewContext, ViewController, ViewState};
use guard_console::Console;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

const EMAIL: &str = "demo@cluelyguard.com";
const PASSWORD: &str = "demo123456";
const SESSION: &str = "session=demo-token";

#[derive(Debug, Deserialize)]
struct Paging {
    page: Option<u32>,
    per_page: Option<u32>,
}

fn has_session(headers: &HeaderMap) -> bool {
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|c| c.contains(SESSION))
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"error": "Authentication required"})),
    )
        .into_response()
}

fn list(headers: HeaderMap, paging: Paging, data: Value) -> Response {
    if !has_session(&headers) {
        return unauthorized();
    }
    if paging.page != Some(1) || paging.per_page != Some(20) {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "bad paging"}))).into_response();
    }
    Json(json!({"data": data, "meta": {"page": 1, "per_page": 20}})).into_response()
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["email"] == EMAIL && body["password"] == PASSWORD {
        (
            [(header::SET_COOKIE, format!("{SESSION}; HttpOnly; Path=/"))],
            Json(json!({
                "success": true,
                "message": "Login successful",
                "user": {"id": "user_001", "email": EMAIL, "name": "Demo User", "org_id": "demo_org_001"},
            })),
        )
            .into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"success": false, "message": "Invalid email or password"})),
        )
            .into_response()
    }
}

async fn forgot_password(Json(body): Json<Value>) -> Response {
    if body["email"].as_str().is_some_and(|e| e.contains('@')) {
        Json(json!({"success": true})).into_response()
    } else {
        (StatusCode::BAD_REQUEST, Json(json!({"message": "Email is required"}))).into_response()
    }
}

async fn detections(headers: HeaderMap, Query(paging): Query<Paging>) -> Response {
    list(
        headers,
        paging,
        json!([{
            "id": "det_001",
            "agent_id": "agent_001",
            "detection_type": "process",
            "severity": "critical",
            "title": "Aimbot process",
            "description": "Injected into game client",
            "created_at": "2026-10-15T08:30:00Z",
            "metadata": {"pid": 4242},
        }]),
    )
}

async fn agents(headers: HeaderMap, Query(paging): Query<Paging>) -> Response {
    list(
        headers,
        paging,
        json!([
            {"name": "gs-eu-1", "platform": "Linux", "version": "1.2.0", "status": "online", "last_heartbeat": "2026-10-15T10:00:00Z"},
            {"name": "gs-us-1", "platform": "Windows", "version": "1.1.9", "status": "offline", "last_heartbeat": null},
        ]),
    )
}

async fn alerts(headers: HeaderMap, Query(paging): Query<Paging>) -> Response {
    list(headers, paging, json!([]))
}

/// Spin up the mock backend on a random port, returning its base URL.
async fn start_server() -> (String, tokio::task::JoinHandle<()>) {
    let app = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/forgot-password", post(forgot_password))
        .route("/v1/detections", get(detections))
        .route("/v1/agents", get(agents))
        .route("/v1/alerts", get(alerts));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), handle)
}

fn config(api_url: &str) -> ConsoleConfig {
    ConsoleConfig {
        api_url: api_url.to_string(),
        request_timeout_secs: 2,
        ..ConsoleConfig::default()
    }
}

fn context(backend: Arc<HttpBackend>) -> (ViewContext<HttpBackend>, Arc<RecordingNavigator>) {
    let nav = Arc::new(RecordingNavigator::new());
    let ctx = ViewContext {
        backend,
        guard: SessionGuard::new(nav.clone(), "/login.html"),
        clock: LocalClock::utc(),
        query: ListQuery::default(),
    };
    (ctx, nav)
}

#[tokio::test]
async fn fetch_without_session_redirects_to_login() {
    let (url, server) = start_server().await;
    let backend = Arc::new(tokio_test::assert_ok!(HttpBackend::new(&config(&url))));
    let (ctx, nav) = context(backend);

    let feed = Arc::new(DetectionsFeed::new(ctx, Duration::from_secs(5)));
    let mut handle = Arc::clone(&feed).activate();

    assert_eq!(handle.settled().await, ViewState::Unauthorized);
    assert_eq!(nav.visits(), vec!["/login.html"]);
    assert!(feed.container().snapshot().is_empty());

    server.abort();
}

#[tokio::test]
async fn login_cookie_is_replayed_on_list_fetches() {
    let (url, server) = start_server().await;
    let backend = Arc::new(HttpBackend::new(&config(&url)).unwrap());
    let (ctx, nav) = context(Arc::clone(&backend));

    let mut forms = AuthForms::new(Arc::clone(&backend), nav.clone(), "/index.html");
    let outcome = forms.submit_login(&LoginForm::new(EMAIL, PASSWORD)).await;
    assert_eq!(outcome, FormOutcome::Redirected("/index.html".to_string()));

    let table = Arc::new(AgentsTable::new(ctx));
    let mut handle = Arc::clone(&table).activate();
    assert_eq!(handle.settled().await, ViewState::Rendered);

    let content = table.container().snapshot();
    assert_eq!(content[0].text_content(), "Active Agents");
    let cells: Vec<String> = content[1]
        .find_by_tag("td")
        .into_iter()
        .map(|td| Node::Element(td.clone()).text_content())
        .collect();
    assert_eq!(cells[0], "gs-eu-1");
    assert_eq!(cells[3], "online");
    assert_eq!(cells[4], "2026-10-15 10:00:00");
    assert_eq!(cells[9], "Never");
    assert_eq!(nav.visits(), vec!["/index.html"]);

    server.abort();
}

#[tokio::test]
async fn empty_alerts_render_placeholder() {
    let (url, server) = start_server().await;
    let backend = Arc::new(HttpBackend::new(&config(&url)).unwrap());
    let (ctx, nav) = context(Arc::clone(&backend));

    let mut forms = AuthForms::new(Arc::clone(&backend), nav, "/index.html");
    forms.submit_login(&LoginForm::new(EMAIL, PASSWORD)).await;

    let view = Arc::new(AlertsList::new(ctx));
    let mut handle = Arc::clone(&view).activate();
    assert_eq!(handle.settled().await, ViewState::Rendered);
    assert_eq!(view.container().snapshot()[0].text_content(), "No alerts found.");

    server.abort();
}

#[tokio::test]
async fn wrong_password_stays_on_login_page() {
    let (url, server) = start_server().await;
    let backend = Arc::new(HttpBackend::new(&config(&url)).unwrap());
    let nav = Arc::new(RecordingNavigator::new());

    let mut forms = AuthForms::new(backend, nav.clone(), "/index.html");
    let outcome = forms
        .submit_login(&LoginForm::new(EMAIL, "not-the-password"))
        .await;

    assert_eq!(outcome, FormOutcome::Stayed);
    assert_eq!(forms.message().text, "Invalid email or password");
    assert_eq!(forms.message().kind, MessageKind::Error);
    assert!(nav.visits().is_empty());

    server.abort();
}

#[tokio::test]
async fn forgot_password_reports_outcome() {
    let (url, server) = start_server().await;
    let backend = Arc::new(HttpBackend::new(&config(&url)).unwrap());
    let mut forms = AuthForms::new(backend, Arc::new(RecordingNavigator::new()), "/index.html");

    forms.submit_forgot_password(EMAIL).await;
    assert_eq!(forms.message().kind, MessageKind::Success);
    assert!(forms.message().text.starts_with("If an account with that email exists"));

    forms.submit_forgot_password("").await;
    assert_eq!(forms.message().text, "Password reset failed: Email is required");
    assert!(forms.message().is_error());

    server.abort();
}

#[tokio::test]
async fn unreachable_backend_is_silent() {
    // Bind then drop to get a port nobody listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let backend = Arc::new(HttpBackend::new(&config(&url)).unwrap());
    let (ctx, nav) = context(Arc::clone(&backend));

    let view = Arc::new(AlertsList::new(ctx));
    let mut handle = Arc::clone(&view).activate();
    assert_eq!(handle.settled().await, ViewState::Failed);
    assert!(view.container().snapshot().is_empty());
    assert!(nav.visits().is_empty());

    let mut forms = AuthForms::new(backend, nav, "/index.html");
    forms.submit_login(&LoginForm::new(EMAIL, PASSWORD)).await;
    assert_eq!(
        forms.message().text,
        "An error occurred during login. Please try again."
    );
}

struct FirstRender {
    shown: Vec<(PageKind, Vec<Node>)>,
    done: Option<oneshot::Sender<()>>,
}

impl Screen for FirstRender {
    fn show(&mut self, page: PageKind, content: &[Node]) {
        self.shown.push((page, content.to_vec()));
        if let Some(done) = self.done.take() {
            let _ = done.send(());
        }
    }

    fn message(&mut self, _area: &MessageArea) {}
}

#[tokio::test]
async fn shell_logs_in_after_expiry_and_shows_dashboard() {
    let (url, server) = start_server().await;
    let config = ConsoleConfig {
        email: Some(EMAIL.to_string()),
        password: Some(PASSWORD.to_string()),
        ..config(&url)
    };
    let backend = HttpBackend::new(&config).unwrap();
    let shell = Console::new(config, backend).into_shell(LocalClock::utc());

    let (tx, rx) = oneshot::channel();
    let mut screen = FirstRender {
        shown: Vec::new(),
        done: Some(tx),
    };
    let shutdown = async {
        let _ = rx.await;
    };

    let exit = tokio::time::timeout(
        Duration::from_secs(10),
        shell.run("/index.html", &mut screen, shutdown),
    )
    .await
    .expect("shell did not settle");

    assert_eq!(exit, ShellExit::Shutdown);
    let (page, content) = &screen.shown[0];
    assert_eq!(*page, PageKind::Dashboard);
    let text = content[1].text_content();
    assert!(text.contains("CRITICAL"));
    assert!(text.contains("Agent: agent_001 | Type: process"));

    server.abort();
}
