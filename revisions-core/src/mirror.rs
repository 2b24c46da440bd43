//! Mirror index: the revision key list, projected into the privileged tier.
//!
//! The coordinating surface cannot read the page tier, so the selector UI is
//! rendered from this projection. It is always rewritten in full.

use std::rc::Rc;

use crate::privileged::PrivilegedStore;
use crate::store::RevisionStore;
use crate::tier::TierError;

/// Write access to the mirrored parts of the privileged tier.
///
/// Unlike [`PrivilegedStore`], exposes no credentials.
#[derive(Clone)]
pub struct MirrorIndex {
    privileged: Rc<PrivilegedStore>,
}

impl MirrorIndex {
    pub fn new(privileged: Rc<PrivilegedStore>) -> Self {
        Self { privileged }
    }

    /// Replaces the index with the keys of `store`, returning them.
    pub fn rebuild(&self, store: &RevisionStore) -> Result<Vec<String>, TierError> {
        let keys = store.keys();
        self.privileged.set_mirror_index(&keys)?;
        Ok(keys)
    }

    /// Removes the index entirely.
    pub fn clear(&self) -> Result<(), TierError> {
        self.privileged.remove_mirror_index()
    }

    /// Last persisted key list; empty when absent.
    pub fn keys(&self) -> Result<Vec<String>, TierError> {
        Ok(self.privileged.mirror_index()?.unwrap_or_default())
    }

    /// Copies the page theme so privileged UIs render to match.
    pub fn mirror_theme(&self, theme: &str) -> Result<(), TierError> {
        self.privileged.set_theme(theme)
    }
}
