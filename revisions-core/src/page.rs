//! Page-scoped persistence: the document, its revisions and its theme.

use serde_json::Value;

use crate::store::RevisionStore;
use crate::tier::{read_typed, write_typed, KeyValueTier, TierError};

/// Key of the host application's own document state.
pub const DOCUMENT_KEY: &str = "excalidraw";
/// Key of the revision store.
pub const REVISIONS_KEY: &str = "excalidraw-revisions";
/// Key of the host application's theme.
pub const THEME_KEY: &str = "excalidraw-theme";

/// Typed access to the page-scoped tier.
pub struct PageStore {
    tier: Box<dyn KeyValueTier>,
}

impl PageStore {
    pub fn new(tier: Box<dyn KeyValueTier>) -> Self {
        Self { tier }
    }

    /// Current document elements, as last saved by the host application.
    pub fn document(&self) -> Result<Option<Vec<Value>>, TierError> {
        read_typed(self.tier.as_ref(), DOCUMENT_KEY)
    }

    /// Overwrites the document. The host only sees it after a reload.
    pub fn set_document(&self, elements: &[Value]) -> Result<(), TierError> {
        write_typed(self.tier.as_ref(), DOCUMENT_KEY, &elements)
    }

    pub fn revisions(&self) -> Result<Option<RevisionStore>, TierError> {
        read_typed(self.tier.as_ref(), REVISIONS_KEY)
    }

    pub fn set_revisions(&self, store: &RevisionStore) -> Result<(), TierError> {
        write_typed(self.tier.as_ref(), REVISIONS_KEY, store)
    }

    pub fn remove_revisions(&self) -> Result<(), TierError> {
        self.tier.remove(REVISIONS_KEY)
    }

    pub fn theme(&self) -> Result<Option<String>, TierError> {
        read_typed(self.tier.as_ref(), THEME_KEY)
    }

    pub fn set_theme(&self, theme: &str) -> Result<(), TierError> {
        write_typed(self.tier.as_ref(), THEME_KEY, &theme)
    }
}
