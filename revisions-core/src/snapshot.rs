//! Snapshot records: one captured copy of a document's element list.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Document format tag written into every snapshot.
pub const SNAPSHOT_KIND: &str = "excalidraw";

/// A single revision of the document.
///
/// Elements are opaque: they are stored, compared and restored verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Document format tag, always [`SNAPSHOT_KIND`] for snapshots we write.
    #[serde(rename = "type")]
    pub kind: String,
    /// Ordered document elements.
    pub elements: Vec<Value>,
    /// Attachment id -> payload. Written empty; kept as-is on import.
    #[serde(rename = "files", default)]
    pub attachments: Map<String, Value>,
}

impl Snapshot {
    /// Captures the given elements as a new snapshot with no attachments.
    pub fn capture(elements: Vec<Value>) -> Self {
        Self {
            kind: SNAPSHOT_KIND.to_string(),
            elements,
            attachments: Map::new(),
        }
    }

    /// Returns true if this snapshot holds `elements` exactly, in order.
    ///
    /// Attachments are not compared.
    pub fn same_elements(&self, elements: &[Value]) -> bool {
        self.elements.as_slice() == elements
    }

    /// Checks the shape required for an imported snapshot.
    pub fn is_well_formed(&self) -> bool {
        self.kind == SNAPSHOT_KIND && !self.elements.is_empty()
    }
}
