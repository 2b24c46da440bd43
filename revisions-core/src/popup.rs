//! State of the user-facing control surface.
//!
//! The popup reads only the credential-free mirror: the key list, the theme
//! and the last gist URL. Its actions produce envelopes for the relay.

use tracing::warn;

use crate::gist::GIST_DOMAIN;
use crate::message::Message;
use crate::privileged::PrivilegedStore;
use crate::relay::{Envelope, Surface};
use crate::tier::TierError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PopupState {
    revisions: Vec<String>,
    gist_url: String,
    theme: Option<String>,
    backup_enabled: bool,
}

impl PopupState {
    /// Reads the popup's initial state from the privileged tier.
    ///
    /// Backup controls are enabled only when a token has been saved.
    pub fn load(privileged: &PrivilegedStore) -> Result<Self, TierError> {
        Ok(Self {
            revisions: privileged.mirror_index()?.unwrap_or_default(),
            gist_url: privileged.gist_url()?.unwrap_or_default(),
            theme: privileged.theme()?,
            backup_enabled: privileged
                .gist_token()?
                .is_some_and(|t| !t.is_empty()),
        })
    }

    pub fn revisions(&self) -> &[String] {
        &self.revisions
    }

    pub fn gist_url(&self) -> &str {
        &self.gist_url
    }

    pub fn theme(&self) -> Option<&str> {
        self.theme.as_deref()
    }

    pub fn backup_enabled(&self) -> bool {
        self.backup_enabled
    }

    /// Applies a message addressed to the UI. Returns false for anything
    /// the UI does not handle.
    pub fn apply(&mut self, message: &Message) -> bool {
        match message {
            Message::UpdateRevisionsSelect { revisions } => {
                self.revisions = revisions.clone();
            }
            Message::ClearRevisionsSelect => self.revisions.clear(),
            Message::UpdateGistInput { gist_url } => {
                self.gist_url = gist_url.clone();
            }
            _ => return false,
        }
        true
    }

    /// Picking a revision in the selector.
    pub fn select(&self, revision: &str) -> Envelope {
        Envelope {
            to: Surface::Document,
            message: Message::ChangeRevision {
                revision: revision.to_string(),
            },
        }
    }

    /// "Save" creates a gist; "Update" overwrites the one in the input.
    pub fn save_label(&self) -> &'static str {
        if self.gist_url.is_empty() {
            "Save"
        } else {
            "Update"
        }
    }

    /// The save button. Routed through the document, which attaches the store.
    pub fn save_backup(&self) -> Envelope {
        let message = if self.gist_url.is_empty() {
            Message::CreateGist { revisions: None }
        } else {
            self.warn_foreign_url();
            Message::UpdateGist {
                gist_url: self.gist_url.clone(),
                revisions: None,
            }
        };

        Envelope {
            to: Surface::Document,
            message,
        }
    }

    /// The import button; `None` when the gist input is empty.
    pub fn import_backup(&self) -> Option<Envelope> {
        if self.gist_url.is_empty() {
            return None;
        }
        self.warn_foreign_url();

        Some(Envelope {
            to: Surface::Coordinator,
            message: Message::ImportGist {
                gist_url: self.gist_url.clone(),
            },
        })
    }

    fn warn_foreign_url(&self) {
        if !self.gist_url.contains(GIST_DOMAIN) {
            warn!(gist_url = %self.gist_url, "Url is not from {}", GIST_DOMAIN);
        }
    }
}
