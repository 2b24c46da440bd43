//! The revision store: snapshots keyed by sequential integer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::snapshot::Snapshot;

/// Key of a stored revision.
pub type RevisionKey = u64;

/// Reasons an imported text is rejected.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("String can not parse: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Object is empty")]
    Empty,

    #[error("Expected revision '{expected}' but found '{found}'")]
    MissingRevision { expected: RevisionKey, found: RevisionKey },

    #[error("Element '{0}' has incorrect structure")]
    Malformed(RevisionKey),
}

/// All snapshots of a document, ordered by key.
///
/// Serializes as a JSON object with string keys: `{"0": {...}, "1": {...}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RevisionStore {
    revisions: BTreeMap<RevisionKey, Snapshot>,
}

impl RevisionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.revisions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.revisions.len()
    }

    pub fn get(&self, key: RevisionKey) -> Option<&Snapshot> {
        self.revisions.get(&key)
    }

    /// Returns the snapshot with the highest key.
    pub fn latest(&self) -> Option<(RevisionKey, &Snapshot)> {
        self.revisions.iter().next_back().map(|(k, s)| (*k, s))
    }

    /// Key the next captured snapshot will receive.
    pub fn next_key(&self) -> RevisionKey {
        self.latest().map(|(key, _)| key + 1).unwrap_or(0)
    }

    /// Keys in ascending order, formatted the way they are stored.
    pub fn keys(&self) -> Vec<String> {
        self.revisions.keys().map(|k| k.to_string()).collect()
    }

    /// Diff guard: false when `elements` matches the latest snapshot.
    pub fn should_capture(&self, elements: &[Value]) -> bool {
        match self.latest() {
            Some((_, latest)) => !latest.same_elements(elements),
            None => true,
        }
    }

    /// Appends a snapshot under [`next_key`](Self::next_key) and returns that key.
    pub fn push(&mut self, snapshot: Snapshot) -> RevisionKey {
        let key = self.next_key();
        self.revisions.insert(key, snapshot);
        key
    }

    /// Parses and validates the exported text form of a store.
    ///
    /// Keys must run `0..n` without gaps and every entry must be a
    /// well-formed excalidraw snapshot. Nothing is returned on failure.
    pub fn from_text(text: &str) -> Result<Self, ImportError> {
        let revisions: BTreeMap<RevisionKey, Snapshot> = serde_json::from_str(text)?;

        if revisions.is_empty() {
            return Err(ImportError::Empty);
        }

        for (expected, (key, snapshot)) in (0..).zip(revisions.iter()) {
            if *key != expected {
                return Err(ImportError::MissingRevision {
                    expected,
                    found: *key,
                });
            }
            if !snapshot.is_well_formed() {
                return Err(ImportError::Malformed(*key));
            }
        }

        Ok(Self { revisions })
    }

    /// Serializes with two-space indentation.
    pub fn to_text(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
