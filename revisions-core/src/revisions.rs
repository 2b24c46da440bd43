//! Revision operations over the page tier and the mirror index.
//!
//! Every mutation persists the store first and then rebuilds the mirror
//! index from it, so the two never drift.

use tracing::info;

use crate::mirror::MirrorIndex;
use crate::page::PageStore;
use crate::snapshot::Snapshot;
use crate::store::{ImportError, RevisionKey, RevisionStore};
use crate::tier::TierError;

/// Error type for revision operations.
#[derive(Debug)]
pub enum RevisionsError {
    /// Reading or writing a tier failed.
    Tier(TierError),
    /// Imported text was rejected.
    Import(ImportError),
    /// No revision with this key.
    NotFound(RevisionKey),
    /// There are no revisions to export.
    Absent,
    /// The store could not be serialized.
    Encode(serde_json::Error),
}

impl std::fmt::Display for RevisionsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RevisionsError::Tier(e) => write!(f, "Storage error: {}", e),
            RevisionsError::Import(e) => write!(f, "Import rejected: {}", e),
            RevisionsError::NotFound(key) => write!(f, "Revision not found: {}", key),
            RevisionsError::Absent => write!(f, "No revisions stored"),
            RevisionsError::Encode(e) => write!(f, "Failed to encode revisions: {}", e),
        }
    }
}

impl std::error::Error for RevisionsError {}

impl From<TierError> for RevisionsError {
    fn from(e: TierError) -> Self {
        RevisionsError::Tier(e)
    }
}

impl From<ImportError> for RevisionsError {
    fn from(e: ImportError) -> Self {
        RevisionsError::Import(e)
    }
}

/// What [`Revisions::generate`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerateOutcome {
    /// A snapshot was stored under `key`; `keys` is the new key list.
    Created { key: RevisionKey, keys: Vec<String> },
    /// The document matches the latest snapshot.
    Unchanged,
    /// The host has not saved a document yet.
    NoDocument,
}

/// The revision store as seen by the document surface.
pub struct Revisions {
    page: PageStore,
    index: MirrorIndex,
}

impl Revisions {
    pub fn new(page: PageStore, index: MirrorIndex) -> Self {
        Self { page, index }
    }

    pub fn page(&self) -> &PageStore {
        &self.page
    }

    pub fn index(&self) -> &MirrorIndex {
        &self.index
    }

    /// Current store; empty when nothing has been captured.
    pub fn load(&self) -> Result<RevisionStore, RevisionsError> {
        Ok(self.page.revisions()?.unwrap_or_default())
    }

    /// Captures the current document unless it matches the latest snapshot.
    pub fn generate(&self) -> Result<GenerateOutcome, RevisionsError> {
        let Some(elements) = self.page.document()? else {
            info!("Skip save new revision because there is no document");
            return Ok(GenerateOutcome::NoDocument);
        };

        let mut store = self.load()?;
        if !store.should_capture(&elements) {
            info!("Skip save new revision because it is same as last");
            return Ok(GenerateOutcome::Unchanged);
        }

        let key = store.push(Snapshot::capture(elements));
        self.page.set_revisions(&store)?;
        let keys = self.index.rebuild(&store)?;

        info!(revision = key, "Saved new revision");
        Ok(GenerateOutcome::Created { key, keys })
    }

    /// Overwrites the document with revision `key`.
    ///
    /// Confirmation is the caller's job; so is reloading the host.
    pub fn apply(&self, key: RevisionKey) -> Result<(), RevisionsError> {
        let store = self.load()?;
        let snapshot = store.get(key).ok_or(RevisionsError::NotFound(key))?;

        self.page.set_document(&snapshot.elements)?;
        info!(revision = key, "Applied revision");
        Ok(())
    }

    /// Removes the store from the page tier and the index from the privileged tier.
    pub fn clear(&self) -> Result<(), RevisionsError> {
        self.page.remove_revisions()?;
        self.index.clear()?;
        info!("Cleared revisions");
        Ok(())
    }

    /// Replaces the store with the parsed `text`, returning the new key list.
    ///
    /// Rejected text leaves both tiers untouched.
    pub fn import_from_text(&self, text: &str) -> Result<Vec<String>, RevisionsError> {
        let store = RevisionStore::from_text(text)?;

        self.page.set_revisions(&store)?;
        let keys = self.index.rebuild(&store)?;

        info!(count = keys.len(), "Imported revisions");
        Ok(keys)
    }

    /// Serializes the store for download, clipboard or backup.
    pub fn export_to_text(&self) -> Result<String, RevisionsError> {
        let store = self.non_empty()?;
        store.to_text().map_err(RevisionsError::Encode)
    }

    /// Current store, or [`RevisionsError::Absent`] when there is nothing to back up.
    pub fn non_empty(&self) -> Result<RevisionStore, RevisionsError> {
        match self.page.revisions()? {
            Some(store) if !store.is_empty() => Ok(store),
            _ => Err(RevisionsError::Absent),
        }
    }

    /// Rebuilds the index from `store`, or from the page tier when `None`.
    pub fn refresh_index(&self, store: Option<&RevisionStore>) -> Result<Vec<String>, RevisionsError> {
        let keys = match store {
            Some(store) => self.index.rebuild(store)?,
            None => self.index.rebuild(&self.load()?)?,
        };
        Ok(keys)
    }
}
