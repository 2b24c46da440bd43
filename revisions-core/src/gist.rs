//! Remote backup of the revision store to a private GitHub gist.
//!
//! Each call is a single attempt: no retry, no backoff. The gist holds one
//! file whose content is the pretty-printed store.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::store::RevisionStore;

/// Default GitHub REST API base.
pub const DEFAULT_API_URL: &str = "https://api.github.com";
/// Host every gist HTML URL lives on.
pub const GIST_DOMAIN: &str = "gist.github.com";
/// Name of the single file inside the gist.
pub const GIST_FILENAME: &str = "excalidraw-revisions";

const CREATE_DESCRIPTION: &str = "Gist generated by excalidraw revisions extension";
const UPDATE_DESCRIPTION: &str = "Gist updated by excalidraw revisions extension";
const CLIENT_USER_AGENT: &str = concat!("excalidraw-revisions/", env!("CARGO_PKG_VERSION"));

/// Errors from gist operations.
#[derive(Error, Debug)]
pub enum GistError {
    #[error("Gist token not set. Save one with the token command first.")]
    MissingToken,

    #[error("Can not find a gist id in url: {0}")]
    InvalidUrl(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server returned status {0}")]
    Status(StatusCode),

    #[error("Gist service error: {0}")]
    Service(String),

    #[error("Failed to decode gist response: {0}")]
    Decode(serde_json::Error),

    #[error("Failed to encode revisions: {0}")]
    Encode(serde_json::Error),

    #[error("Gist response has no html_url")]
    MissingUrl,

    #[error("Gist has no file content")]
    MissingContent,
}

/// Extracts the gist id: the last path segment of a gist URL.
///
/// Scheme, host, trailing slashes, query and fragment are ignored.
pub fn gist_id(url: &str) -> Result<&str, GistError> {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let id = path
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default();

    if id.is_empty() || id.contains(':') {
        return Err(GistError::InvalidUrl(url.to_string()));
    }
    Ok(id)
}

#[derive(Serialize)]
struct GistBody<'a> {
    description: &'a str,
    public: bool,
    files: BTreeMap<&'a str, FileBody>,
}

#[derive(Serialize)]
struct FileBody {
    content: String,
}

#[derive(Debug, Default, Deserialize)]
struct GistResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    html_url: Option<String>,
    /// Kept in response order.
    #[serde(default)]
    files: Map<String, Value>,
}

/// Client for the gist endpoints, authenticated with a bearer token.
#[derive(Debug, Clone)]
pub struct GistClient {
    client: reqwest::Client,
    api_url: String,
    token: String,
}

impl GistClient {
    /// Creates a client. `timeout` of `None` keeps reqwest's default.
    pub fn new(api_url: &str, token: &str, timeout: Option<Duration>) -> Result<Self, GistError> {
        let mut builder = reqwest::Client::builder().user_agent(CLIENT_USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    /// Returns the API base URL.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// API endpoint for the gist behind an HTML URL.
    pub fn gist_endpoint(&self, gist_url: &str) -> Result<String, GistError> {
        Ok(format!("{}/gists/{}", self.api_url, gist_id(gist_url)?))
    }

    /// Creates a private gist holding `store` and returns its HTML URL.
    pub async fn create(&self, store: &RevisionStore) -> Result<String, GistError> {
        let body = gist_body(CREATE_DESCRIPTION, store)?;
        let request = self
            .client
            .post(format!("{}/gists", self.api_url))
            .json(&body);

        self.send(request).await?.html_url.ok_or(GistError::MissingUrl)
    }

    /// Returns the stored revisions text of the gist at `gist_url`.
    ///
    /// Reads the `excalidraw-revisions` file, or else the first file the
    /// API lists.
    pub async fn fetch(&self, gist_url: &str) -> Result<String, GistError> {
        let request = self.client.get(self.gist_endpoint(gist_url)?);
        let response = self.send(request).await?;

        file_content(response.files).ok_or(GistError::MissingContent)
    }

    /// Overwrites the gist at `gist_url` and returns its canonical HTML URL.
    pub async fn update(&self, gist_url: &str, store: &RevisionStore) -> Result<String, GistError> {
        let body = gist_body(UPDATE_DESCRIPTION, store)?;
        let request = self.client.patch(self.gist_endpoint(gist_url)?).json(&body);

        let response = self.send(request).await?;
        Ok(response.html_url.unwrap_or_else(|| gist_url.to_string()))
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<GistResponse, GistError> {
        let response = request
            .header(AUTHORIZATION, format!("token {}", self.token))
            .header(ACCEPT, "application/vnd.github+json")
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        let body: GistResponse = match serde_json::from_str(&text) {
            Ok(body) => body,
            Err(_) if !status.is_success() => return Err(GistError::Status(status)),
            Err(e) => return Err(GistError::Decode(e)),
        };

        if let Some(message) = body.message {
            return Err(GistError::Service(message));
        }
        if !status.is_success() {
            return Err(GistError::Status(status));
        }

        Ok(body)
    }
}

fn file_content(mut files: Map<String, Value>) -> Option<String> {
    let file = match files.remove(GIST_FILENAME) {
        Some(file) => file,
        None => files.into_iter().next()?.1,
    };
    file.get("content")?.as_str().map(String::from)
}

fn gist_body<'a>(description: &'a str, store: &RevisionStore) -> Result<GistBody<'a>, GistError> {
    let content = store.to_text().map_err(GistError::Encode)?;
    Ok(GistBody {
        description,
        public: false,
        files: BTreeMap::from([(GIST_FILENAME, FileBody { content })]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Snapshot;
    use crate::test_support::FakeGists;
    use serde_json::json;

    fn sample_store() -> RevisionStore {
        let mut store = RevisionStore::new();
        store.push(Snapshot::capture(vec![json!({"id": "a"})]));
        store
    }

    #[test]
    fn test_gist_id_from_html_url() {
        assert_eq!(
            gist_id("https://gist.github.com/tester/abc123").unwrap(),
            "abc123"
        );
    }

    #[test]
    fn test_gist_id_ignores_prefix_variations() {
        for url in [
            "http://gist.github.com/tester/abc123",
            "gist.github.com/tester/abc123",
            "https://gist.github.com/abc123/",
            "https://gist.github.com/tester/abc123?tab=revisions",
            "https://gist.github.com/tester/abc123#file-excalidraw-revisions",
            "abc123",
        ] {
            assert_eq!(gist_id(url).unwrap(), "abc123", "url: {}", url);
        }
    }

    #[test]
    fn test_gist_id_rejects_empty() {
        assert!(matches!(gist_id(""), Err(GistError::InvalidUrl(_))));
        assert!(matches!(gist_id("https://"), Err(GistError::InvalidUrl(_))));
    }

    #[test]
    fn test_gist_endpoint_trims_api_slash() {
        let client = GistClient::new("https://api.example.com/", "t", None).unwrap();
        assert_eq!(
            client
                .gist_endpoint("https://gist.github.com/me/abc123")
                .unwrap(),
            "https://api.example.com/gists/abc123"
        );
    }

    #[tokio::test]
    async fn test_create_posts_private_gist() {
        let fake = FakeGists::default();
        let api = fake.spawn().await;
        let client = GistClient::new(&api, "secret", None).unwrap();

        let url = client.create(&sample_store()).await.unwrap();
        assert_eq!(url, "https://gist.github.com/tester/abc123");

        let requests = fake.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].path, "/gists");
        assert_eq!(requests[0].authorization.as_deref(), Some("token secret"));

        let body = requests[0].body.as_ref().unwrap();
        assert_eq!(body["public"], json!(false));
        assert_eq!(
            body["description"],
            json!("Gist generated by excalidraw revisions extension")
        );
        assert_eq!(
            body["files"]["excalidraw-revisions"]["content"],
            json!(sample_store().to_text().unwrap())
        );
    }

    fn files(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_file_content_prefers_named_file() {
        let listed = files(json!({
            "a-notes.md": {"content": "notes"},
            "excalidraw-revisions": {"content": "revisions"},
        }));
        assert_eq!(file_content(listed).as_deref(), Some("revisions"));
    }

    #[test]
    fn test_file_content_falls_back_to_first_listed() {
        let listed: Map<String, Value> =
            serde_json::from_str(r#"{"zeta.json":{"content":"z"},"alpha.json":{"content":"a"}}"#)
                .unwrap();
        assert_eq!(file_content(listed).as_deref(), Some("z"));
    }

    #[test]
    fn test_file_content_missing() {
        assert!(file_content(Map::new()).is_none());
        assert!(file_content(files(json!({"excalidraw-revisions": {}}))).is_none());
    }

    #[tokio::test]
    async fn test_fetch_returns_file_content() {
        let fake = FakeGists::default();
        fake.set_content("stored text");
        let api = fake.spawn().await;
        let client = GistClient::new(&api, "secret", None).unwrap();

        let text = client
            .fetch("https://gist.github.com/tester/abc123")
            .await
            .unwrap();
        assert_eq!(text, "stored text");
        assert_eq!(fake.requests()[0].path, "/gists/abc123");
    }

    #[tokio::test]
    async fn test_update_targets_gist_id_regardless_of_prefix() {
        let fake = FakeGists::default();
        let api = fake.spawn().await;
        let client = GistClient::new(&api, "secret", None).unwrap();

        for url in [
            "https://gist.github.com/tester/abc123",
            "http://gist.github.com/tester/abc123/",
            "gist.github.com/tester/abc123",
        ] {
            let canonical = client.update(url, &sample_store()).await.unwrap();
            assert_eq!(canonical, "https://gist.github.com/tester/abc123");
        }

        for request in fake.requests() {
            assert_eq!(request.method, "PATCH");
            assert_eq!(request.path, "/gists/abc123");
        }
    }

    #[tokio::test]
    async fn test_service_message_is_error() {
        let fake = FakeGists::default();
        fake.fail_with("Bad credentials");
        let api = fake.spawn().await;
        let client = GistClient::new(&api, "wrong", None).unwrap();

        let err = client.create(&sample_store()).await.unwrap_err();
        assert!(matches!(err, GistError::Service(ref m) if m == "Bad credentials"));
    }

    #[tokio::test]
    async fn test_fetch_missing_gist_is_error() {
        let fake = FakeGists::default();
        let api = fake.spawn().await;
        let client = GistClient::new(&api, "secret", None).unwrap();

        let err = client.fetch("https://gist.github.com/u/abc123").await.unwrap_err();
        assert!(matches!(err, GistError::Service(ref m) if m == "Not Found"));
    }
}
