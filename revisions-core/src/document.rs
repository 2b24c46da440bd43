//! The document surface: owns the page tier and runs revision commands.
//!
//! Failures are logged and swallowed so the surface stays ready for the
//! next message.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::host::{download_filename, DocumentEnv};
use crate::message::Message;
use crate::relay::{Outbox, Surface};
use crate::revisions::{GenerateOutcome, Revisions, RevisionsError};
use crate::store::RevisionKey;

pub struct DocumentSurface {
    revisions: Revisions,
    env: DocumentEnv,
}

impl DocumentSurface {
    pub fn new(revisions: Revisions, env: DocumentEnv) -> Self {
        Self { revisions, env }
    }

    pub fn revisions(&self) -> &Revisions {
        &self.revisions
    }

    /// Runs when the host page loads: mirrors the theme and the key list
    /// into the privileged tier.
    pub fn on_load(&self) {
        if let Err(e) = self.load() {
            warn!("Failed to mirror page state: {}", e);
        }
    }

    fn load(&self) -> Result<(), RevisionsError> {
        if let Some(theme) = self.revisions.page().theme()? {
            self.revisions.index().mirror_theme(&theme)?;
        }
        self.revisions.refresh_index(None)?;
        Ok(())
    }

    pub fn handle(&self, message: Message, outbox: &Outbox) {
        let event = message.event();

        let result = match message {
            Message::GenerateRevision => self.generate(outbox),
            Message::ChangeRevision { revision } => self.change(&revision, outbox),
            Message::ClearRevisions => self.clear(outbox),
            Message::ImportRevisions { revisions } => {
                self.import(&revisions, "Revisions imported correctly", outbox)
            }
            Message::DownloadRevisions => self.download(),
            Message::CopyRevisions => self.copy(),
            Message::PasteRevisions => self.paste(outbox),
            Message::CreateGist { .. } => self.request_backup(None, outbox),
            Message::UpdateGist { gist_url, .. } => self.request_backup(Some(gist_url), outbox),
            Message::CopyGistUrl { gist_url } => self.copy_gist_url(&gist_url),
            other => {
                debug!(event = other.event(), "Document surface ignores message");
                Ok(())
            }
        };

        match result {
            Ok(()) => {}
            Err(e @ (RevisionsError::Import(_) | RevisionsError::Absent)) => {
                info!(event, "{}", e)
            }
            Err(e) => warn!(event, "{}", e),
        }
    }

    fn generate(&self, outbox: &Outbox) -> Result<(), RevisionsError> {
        if let GenerateOutcome::Created { keys, .. } = self.revisions.generate()? {
            outbox.send(Surface::Ui, Message::UpdateRevisionsSelect { revisions: keys });
        }
        Ok(())
    }

    fn change(&self, revision: &str, outbox: &Outbox) -> Result<(), RevisionsError> {
        let Ok(key) = revision.parse::<RevisionKey>() else {
            warn!(revision, "Revision key is not a number");
            return Ok(());
        };

        let question = format!("Are you sure to change to revision \"{}\"?", revision);
        if !self.env.confirm.confirm(&question) {
            debug!(revision, "Change revision declined");
            return Ok(());
        }

        self.revisions.apply(key)?;
        outbox.send(Surface::Coordinator, Message::ReloadPage);
        Ok(())
    }

    fn clear(&self, outbox: &Outbox) -> Result<(), RevisionsError> {
        if !self.env.confirm.confirm("Are you sure to clear revisions?") {
            debug!("Clear revisions declined");
            return Ok(());
        }

        self.revisions.clear()?;
        outbox.send(Surface::Ui, Message::ClearRevisionsSelect);
        Ok(())
    }

    fn import(&self, text: &str, notice: &str, outbox: &Outbox) -> Result<(), RevisionsError> {
        let keys = match self.revisions.import_from_text(text) {
            Ok(keys) => keys,
            Err(e @ RevisionsError::Import(_)) => {
                self.env.notifier.notify("Revisions could not be imported");
                return Err(e);
            }
            Err(e) => return Err(e),
        };

        outbox.send(Surface::Ui, Message::UpdateRevisionsSelect { revisions: keys });
        self.env.notifier.notify(notice);
        Ok(())
    }

    fn download(&self) -> Result<(), RevisionsError> {
        let text = self.revisions.export_to_text()?;
        let filename = download_filename(Utc::now());

        match self.env.downloads.save(&filename, &text) {
            Ok(path) => info!(path = %path.display(), "Downloaded revisions"),
            Err(e) => warn!(filename = %filename, "Failed to save download: {}", e),
        }
        Ok(())
    }

    fn copy(&self) -> Result<(), RevisionsError> {
        let text = self.revisions.export_to_text()?;

        match self.env.clipboard.write_text(&text) {
            Ok(()) => self.env.notifier.notify("Revisions copied to clipboard"),
            Err(e) => warn!("Failed to write clipboard: {}", e),
        }
        Ok(())
    }

    fn paste(&self, outbox: &Outbox) -> Result<(), RevisionsError> {
        match self.env.clipboard.read_text() {
            Ok(text) => self.import(&text, "Revisions pasted from clipboard", outbox),
            Err(e) => {
                warn!("Failed to read clipboard: {}", e);
                Ok(())
            }
        }
    }

    /// Attaches the store to a backup request and forwards it to the coordinator.
    fn request_backup(&self, gist_url: Option<String>, outbox: &Outbox) -> Result<(), RevisionsError> {
        let store = self.revisions.non_empty()?;

        let message = match gist_url {
            Some(gist_url) => Message::UpdateGist {
                gist_url,
                revisions: Some(store),
            },
            None => Message::CreateGist {
                revisions: Some(store),
            },
        };
        outbox.send(Surface::Coordinator, message);
        Ok(())
    }

    fn copy_gist_url(&self, gist_url: &str) -> Result<(), RevisionsError> {
        match self.env.clipboard.write_text(gist_url) {
            Ok(()) => self.env.notifier.notify("Gist url copied to clipboard"),
            Err(e) => warn!("Failed to write clipboard: {}", e),
        }
        Ok(())
    }
}
