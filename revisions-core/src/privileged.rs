//! Privileged-scoped persistence, owned by the coordinating surface.
//!
//! Holds the mirror index, the mirrored theme and the gist credentials.
//! None of these are visible to the page-scoped tier.

use crate::tier::{read_typed, write_typed, KeyValueTier, TierError};

/// Key of the mirror index (revision keys only).
pub const MIRROR_INDEX_KEY: &str = "excalidraw-revisions";
/// Key of the mirrored theme.
pub const THEME_KEY: &str = "excalidraw-theme";
/// Key of the gist bearer token.
pub const GIST_TOKEN_KEY: &str = "gist-token";
/// Key of the last used gist URL.
pub const GIST_URL_KEY: &str = "gist-url";

/// Typed access to the privileged-scoped tier.
pub struct PrivilegedStore {
    tier: Box<dyn KeyValueTier>,
}

impl PrivilegedStore {
    pub fn new(tier: Box<dyn KeyValueTier>) -> Self {
        Self { tier }
    }

    pub fn mirror_index(&self) -> Result<Option<Vec<String>>, TierError> {
        read_typed(self.tier.as_ref(), MIRROR_INDEX_KEY)
    }

    pub fn set_mirror_index(&self, keys: &[String]) -> Result<(), TierError> {
        write_typed(self.tier.as_ref(), MIRROR_INDEX_KEY, &keys)
    }

    pub fn remove_mirror_index(&self) -> Result<(), TierError> {
        self.tier.remove(MIRROR_INDEX_KEY)
    }

    pub fn theme(&self) -> Result<Option<String>, TierError> {
        read_typed(self.tier.as_ref(), THEME_KEY)
    }

    pub fn set_theme(&self, theme: &str) -> Result<(), TierError> {
        write_typed(self.tier.as_ref(), THEME_KEY, &theme)
    }

    pub fn gist_token(&self) -> Result<Option<String>, TierError> {
        read_typed(self.tier.as_ref(), GIST_TOKEN_KEY)
    }

    pub fn set_gist_token(&self, token: &str) -> Result<(), TierError> {
        write_typed(self.tier.as_ref(), GIST_TOKEN_KEY, &token)
    }

    pub fn remove_gist_token(&self) -> Result<(), TierError> {
        self.tier.remove(GIST_TOKEN_KEY)
    }

    pub fn gist_url(&self) -> Result<Option<String>, TierError> {
        read_typed(self.tier.as_ref(), GIST_URL_KEY)
    }

    pub fn set_gist_url(&self, url: &str) -> Result<(), TierError> {
        write_typed(self.tier.as_ref(), GIST_URL_KEY, &url)
    }
}
