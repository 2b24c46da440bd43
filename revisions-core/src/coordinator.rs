//! The privileged coordinator: owns credentials and performs remote backup.
//!
//! Only this surface reads the gist token. Failures are logged and no reply
//! is sent, so the document and UI keep their previous state.

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use tracing::{debug, error, info};

use crate::gist::{GistClient, GistError};
use crate::host::DocumentHost;
use crate::message::Message;
use crate::privileged::PrivilegedStore;
use crate::relay::{Outbox, Surface};
use crate::store::RevisionStore;
use crate::tier::TierError;

/// Error type for backup operations.
#[derive(Debug)]
pub enum BackupError {
    Tier(TierError),
    Gist(GistError),
}

impl fmt::Display for BackupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackupError::Tier(e) => write!(f, "Storage error: {}", e),
            BackupError::Gist(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for BackupError {}

impl From<TierError> for BackupError {
    fn from(e: TierError) -> Self {
        BackupError::Tier(e)
    }
}

impl From<GistError> for BackupError {
    fn from(e: GistError) -> Self {
        BackupError::Gist(e)
    }
}

pub struct Coordinator {
    privileged: Rc<PrivilegedStore>,
    api_url: String,
    timeout: Option<Duration>,
    host: Box<dyn DocumentHost>,
}

impl Coordinator {
    pub fn new(
        privileged: Rc<PrivilegedStore>,
        api_url: String,
        timeout: Option<Duration>,
        host: Box<dyn DocumentHost>,
    ) -> Self {
        Self {
            privileged,
            api_url,
            timeout,
            host,
        }
    }

    pub async fn handle(&self, message: Message, outbox: &Outbox) {
        match message {
            Message::CreateGist {
                revisions: Some(store),
            } => {
                if let Err(e) = self.create(&store, outbox).await {
                    error!("Error to create gist: {}", e);
                }
            }
            Message::UpdateGist {
                gist_url,
                revisions: Some(store),
            } => {
                if let Err(e) = self.update(&gist_url, &store, outbox).await {
                    error!(gist_url = %gist_url, "Error to update gist: {}", e);
                }
            }
            Message::ImportGist { gist_url } => {
                if let Err(e) = self.import(&gist_url, outbox).await {
                    error!(gist_url = %gist_url, "Error to import gist: {}", e);
                }
            }
            Message::ReloadPage => {
                debug!("Reloading document host");
                self.host.reload();
            }
            other => debug!(event = other.event(), "Coordinator ignores message"),
        }
    }

    fn client(&self) -> Result<GistClient, BackupError> {
        let token = self
            .privileged
            .gist_token()?
            .filter(|t| !t.is_empty())
            .ok_or(GistError::MissingToken)?;
        Ok(GistClient::new(&self.api_url, &token, self.timeout)?)
    }

    async fn create(&self, store: &RevisionStore, outbox: &Outbox) -> Result<(), BackupError> {
        let gist_url = self.client()?.create(store).await?;
        info!(gist_url = %gist_url, "Created gist");
        self.remember(gist_url, outbox)
    }

    async fn update(
        &self,
        gist_url: &str,
        store: &RevisionStore,
        outbox: &Outbox,
    ) -> Result<(), BackupError> {
        let gist_url = self.client()?.update(gist_url, store).await?;
        info!(gist_url = %gist_url, "Updated gist");
        self.remember(gist_url, outbox)
    }

    async fn import(&self, gist_url: &str, outbox: &Outbox) -> Result<(), BackupError> {
        let revisions = self.client()?.fetch(gist_url).await?;
        info!(gist_url, "Fetched gist");
        outbox.send(Surface::Document, Message::ImportRevisions { revisions });
        Ok(())
    }

    /// Persists the gist URL, then hands it to the document and the UI.
    fn remember(&self, gist_url: String, outbox: &Outbox) -> Result<(), BackupError> {
        self.privileged.set_gist_url(&gist_url)?;
        outbox.send(
            Surface::Document,
            Message::CopyGistUrl {
                gist_url: gist_url.clone(),
            },
        );
        outbox.send(Surface::Ui, Message::UpdateGistInput { gist_url });
        Ok(())
    }
}
