//! Wires the tiers, surfaces and relay for one CLI invocation.

use std::error::Error;
use std::rc::Rc;

use revisions_core::{
    Confirm, Coordinator, DirectoryDownloads, DocumentEnv, DocumentSurface, Envelope, FileTier,
    Message, MirrorIndex, PageStore, PopupState, PrivilegedStore, Relay, Revisions,
};
use tracing::debug;

use crate::config::Config;
use crate::host::{ReloadNotice, StderrNotifier, StdioClipboard};

pub struct Session {
    relay: Relay,
    privileged: Rc<PrivilegedStore>,
}

impl Session {
    /// Opens both tiers under the data directory and runs the document's
    /// load hook, as when the editor page opens.
    pub fn open(config: &Config, confirm: Box<dyn Confirm>) -> Result<Self, Box<dyn Error>> {
        std::fs::create_dir_all(&config.data_dir.value)?;
        debug!(data_dir = %config.data_dir.value.display(), "Opening session");

        let privileged = Rc::new(PrivilegedStore::new(Box::new(FileTier::new(
            config.privileged_dir(),
        ))));
        let page = PageStore::new(Box::new(FileTier::new(config.page_dir())));
        let revisions = Revisions::new(page, MirrorIndex::new(privileged.clone()));

        let env = DocumentEnv {
            confirm,
            clipboard: Box::new(StdioClipboard),
            notifier: Box::new(StderrNotifier),
            downloads: Box::new(DirectoryDownloads::new(config.download_dir.value.clone())),
        };
        let document = DocumentSurface::new(revisions, env);
        document.on_load();

        let coordinator = Coordinator::new(
            privileged.clone(),
            config.gist.api_url.value.clone(),
            config.gist.request_timeout(),
            Box::new(ReloadNotice),
        );
        let popup = PopupState::load(&privileged)?;

        Ok(Self {
            relay: Relay::new(document, coordinator, popup),
            privileged,
        })
    }

    pub fn privileged(&self) -> &PrivilegedStore {
        &self.privileged
    }

    pub fn page(&self) -> &PageStore {
        self.relay.document().revisions().page()
    }

    pub fn document(&self) -> &DocumentSurface {
        self.relay.document()
    }

    pub fn popup(&self) -> &PopupState {
        self.relay.popup()
    }

    /// Sends one envelope and returns what the UI received as a result.
    pub async fn dispatch(&mut self, envelope: Envelope) -> Vec<Message> {
        self.relay.send(envelope.to, envelope.message);
        self.relay.run_until_idle().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::AssumeYes;
    use revisions_core::Surface;
    use serde_json::json;
    use std::io::Write;
    use tempfile::{tempdir, TempDir};

    fn config(temp_dir: &TempDir) -> Config {
        let config_path = temp_dir.path().join("config.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "data_dir: data").unwrap();
        writeln!(file, "download_dir: downloads").unwrap();
        Config::load(Some(config_path)).unwrap()
    }

    fn open(config: &Config) -> Session {
        Session::open(config, Box::new(AssumeYes)).unwrap()
    }

    #[tokio::test]
    async fn test_revisions_persist_across_sessions() {
        let temp_dir = tempdir().unwrap();
        let config = config(&temp_dir);

        let mut session = open(&config);
        session.page().set_document(&[json!({"id": "a"})]).unwrap();
        let delivered = session
            .dispatch(Envelope {
                to: Surface::Document,
                message: Message::GenerateRevision,
            })
            .await;
        assert_eq!(
            delivered,
            vec![Message::UpdateRevisionsSelect {
                revisions: vec!["0".to_string()]
            }]
        );
        drop(session);

        let session = open(&config);
        assert_eq!(session.popup().revisions(), ["0"]);
        assert!(config.page_dir().join("excalidraw-revisions.json").exists());
        assert!(config
            .privileged_dir()
            .join("excalidraw-revisions.json")
            .exists());
    }

    #[tokio::test]
    async fn test_download_writes_into_download_dir() {
        let temp_dir = tempdir().unwrap();
        let config = config(&temp_dir);

        let mut session = open(&config);
        session.page().set_document(&[json!({"id": "a"})]).unwrap();
        for message in [Message::GenerateRevision, Message::DownloadRevisions] {
            session
                .dispatch(Envelope {
                    to: Surface::Document,
                    message,
                })
                .await;
        }

        let files: Vec<_> = std::fs::read_dir(&config.download_dir.value)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(files.len(), 1);
        assert!(files[0].starts_with("excalidraw-revisions-"));
    }

    #[test]
    fn test_open_mirrors_page_theme() {
        let temp_dir = tempdir().unwrap();
        let config = config(&temp_dir);

        let session = open(&config);
        session.page().set_theme("dark").unwrap();
        drop(session);

        let session = open(&config);
        assert_eq!(session.privileged().theme().unwrap().as_deref(), Some("dark"));
        assert_eq!(session.popup().theme(), Some("dark"));
    }
}
