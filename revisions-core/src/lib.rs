//! Excalidraw Revisions Core Library
//!
//! Snapshot history for an Excalidraw document, a credential-free mirror of
//! its keys, gist backup and the relay that connects the surfaces.

pub mod coordinator;
pub mod document;
pub mod gist;
pub mod host;
pub mod message;
pub mod mirror;
pub mod options;
pub mod page;
pub mod popup;
pub mod privileged;
pub mod relay;
pub mod revisions;
pub mod snapshot;
pub mod store;
pub mod tier;

#[cfg(test)]
mod test_support;

pub use coordinator::{BackupError, Coordinator};
pub use document::DocumentSurface;
pub use gist::{gist_id, GistClient, GistError, DEFAULT_API_URL, GIST_DOMAIN};
pub use host::{
    download_filename, Clipboard, Confirm, DirectoryDownloads, DocumentEnv, DocumentHost,
    Downloads, Notifier,
};
pub use message::Message;
pub use mirror::MirrorIndex;
pub use page::PageStore;
pub use popup::PopupState;
pub use privileged::PrivilegedStore;
pub use relay::{Envelope, Outbox, Relay, Surface};
pub use revisions::{GenerateOutcome, Revisions, RevisionsError};
pub use snapshot::{Snapshot, SNAPSHOT_KIND};
pub use store::{ImportError, RevisionKey, RevisionStore};
pub use tier::{FileTier, KeyValueTier, MemoryTier, TierError};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
