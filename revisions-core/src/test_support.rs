//! Test doubles: an in-process gist API and recording collaborators.

use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{header::AUTHORIZATION, HeaderMap, StatusCode, Uri};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::host::{Clipboard, Confirm, DocumentEnv, DocumentHost, Downloads, Notifier};

pub const GIST_HTML_BASE: &str = "https://gist.github.com/tester";
pub const CREATED_ID: &str = "abc123";

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

#[derive(Clone, Default)]
pub struct FakeGists {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    content: Arc<Mutex<Option<String>>>,
    failure: Arc<Mutex<Option<String>>>,
}

impl FakeGists {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn content(&self) -> Option<String> {
        self.content.lock().unwrap().clone()
    }

    pub fn set_content(&self, content: &str) {
        *self.content.lock().unwrap() = Some(content.to_string());
    }

    /// Makes every request fail with a service `message`.
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    /// Serves on an ephemeral port and returns the API base URL.
    pub async fn spawn(&self) -> String {
        let app = Router::new()
            .route("/gists", post(create))
            .route("/gists/{id}", get(read).patch(update))
            .with_state(self.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}", addr)
    }

    fn record(&self, method: &str, uri: &Uri, headers: &HeaderMap, body: Option<Value>) {
        if let Some(content) = body
            .as_ref()
            .and_then(|b| b["files"]["excalidraw-revisions"]["content"].as_str())
        {
            self.set_content(content);
        }

        self.requests.lock().unwrap().push(RecordedRequest {
            method: method.to_string(),
            path: uri.path().to_string(),
            authorization: headers
                .get(AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .map(String::from),
            body,
        });
    }

    fn failure(&self) -> Option<(StatusCode, Json<Value>)> {
        self.failure
            .lock()
            .unwrap()
            .as_ref()
            .map(|message| (StatusCode::UNAUTHORIZED, Json(json!({ "message": message }))))
    }
}

async fn create(
    State(fake): State<FakeGists>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if let Some(failure) = fake.failure() {
        return failure;
    }
    fake.record("POST", &uri, &headers, Some(body));

    (
        StatusCode::CREATED,
        Json(json!({
            "id": CREATED_ID,
            "html_url": format!("{}/{}", GIST_HTML_BASE, CREATED_ID),
        })),
    )
}

async fn read(
    State(fake): State<FakeGists>,
    Path(id): Path<String>,
    uri: Uri,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    if let Some(failure) = fake.failure() {
        return failure;
    }
    fake.record("GET", &uri, &headers, None);

    match fake.content() {
        Some(content) => (
            StatusCode::OK,
            Json(json!({
                "id": id,
                "html_url": format!("{}/{}", GIST_HTML_BASE, id),
                "files": {
                    "excalidraw-revisions": {
                        "filename": "excalidraw-revisions",
                        "content": content,
                    }
                }
            })),
        ),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Not Found" })),
        ),
    }
}

async fn update(
    State(fake): State<FakeGists>,
    Path(id): Path<String>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if let Some(failure) = fake.failure() {
        return failure;
    }
    fake.record("PATCH", &uri, &headers, Some(body));

    (
        StatusCode::OK,
        Json(json!({ "html_url": format!("{}/{}", GIST_HTML_BASE, id) })),
    )
}

/// Scriptable collaborators that record what the surfaces asked of them.
#[derive(Clone, Default)]
pub struct TestEnv {
    state: Rc<RefCell<EnvState>>,
}

#[derive(Default)]
struct EnvState {
    decline: bool,
    questions: Vec<String>,
    clipboard: Option<String>,
    notifications: Vec<String>,
    downloads: Vec<(String, String)>,
    reloads: usize,
}

impl TestEnv {
    /// Answer "no" to every confirmation from now on.
    pub fn decline(&self) {
        self.state.borrow_mut().decline = true;
    }

    pub fn questions(&self) -> Vec<String> {
        self.state.borrow().questions.clone()
    }

    pub fn clipboard(&self) -> Option<String> {
        self.state.borrow().clipboard.clone()
    }

    pub fn set_clipboard(&self, text: &str) {
        self.state.borrow_mut().clipboard = Some(text.to_string());
    }

    pub fn notifications(&self) -> Vec<String> {
        self.state.borrow().notifications.clone()
    }

    pub fn downloads(&self) -> Vec<(String, String)> {
        self.state.borrow().downloads.clone()
    }

    pub fn reloads(&self) -> usize {
        self.state.borrow().reloads
    }

    pub fn document_env(&self) -> DocumentEnv {
        DocumentEnv {
            confirm: Box::new(self.clone()),
            clipboard: Box::new(self.clone()),
            notifier: Box::new(self.clone()),
            downloads: Box::new(self.clone()),
        }
    }
}

impl Confirm for TestEnv {
    fn confirm(&self, question: &str) -> bool {
        let mut state = self.state.borrow_mut();
        state.questions.push(question.to_string());
        !state.decline
    }
}

impl Clipboard for TestEnv {
    fn write_text(&self, text: &str) -> io::Result<()> {
        self.set_clipboard(text);
        Ok(())
    }

    fn read_text(&self) -> io::Result<String> {
        self.clipboard()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "clipboard is empty"))
    }
}

impl Notifier for TestEnv {
    fn notify(&self, message: &str) {
        self.state
            .borrow_mut()
            .notifications
            .push(message.to_string());
    }
}

impl Downloads for TestEnv {
    fn save(&self, filename: &str, contents: &str) -> io::Result<PathBuf> {
        self.state
            .borrow_mut()
            .downloads
            .push((filename.to_string(), contents.to_string()));
        Ok(PathBuf::from(filename))
    }
}

impl DocumentHost for TestEnv {
    fn reload(&self) {
        self.state.borrow_mut().reloads += 1;
    }
}
