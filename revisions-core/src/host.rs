//! External collaborators of the surfaces: user prompts, clipboard,
//! notifications, downloads and the document host.

use std::fs;
use std::io;
use std::path::PathBuf;

use chrono::{DateTime, Utc};

/// Asks the user to confirm a destructive action.
pub trait Confirm {
    fn confirm(&self, question: &str) -> bool;
}

pub trait Clipboard {
    fn write_text(&self, text: &str) -> io::Result<()>;
    fn read_text(&self) -> io::Result<String>;
}

/// Transient user feedback.
pub trait Notifier {
    fn notify(&self, message: &str);
}

/// Saves exported files for the user.
pub trait Downloads {
    /// Returns where the file ended up.
    fn save(&self, filename: &str, contents: &str) -> io::Result<PathBuf>;
}

/// The application that owns the document.
///
/// It reads the document only at load time, so overwriting it must be
/// followed by an explicit reload.
pub trait DocumentHost {
    fn reload(&self);
}

/// Everything the document surface talks to besides storage.
pub struct DocumentEnv {
    pub confirm: Box<dyn Confirm>,
    pub clipboard: Box<dyn Clipboard>,
    pub notifier: Box<dyn Notifier>,
    pub downloads: Box<dyn Downloads>,
}

/// Name of a downloaded export: `excalidraw-revisions-<unix millis>.json`.
pub fn download_filename(now: DateTime<Utc>) -> String {
    format!("excalidraw-revisions-{}.json", now.timestamp_millis())
}

/// Writes downloads into a directory.
#[derive(Clone, Debug)]
pub struct DirectoryDownloads {
    dir: PathBuf,
}

impl DirectoryDownloads {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

impl Downloads for DirectoryDownloads {
    fn save(&self, filename: &str, contents: &str) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(filename);
        fs::write(&path, contents)?;
        Ok(path)
    }
}
