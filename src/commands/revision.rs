use std::error::Error;
use std::path::Path;

use revisions_core::{Envelope, Message, Surface};

use super::{report, OutputFormat};
use crate::session::Session;

async fn to_document(session: &mut Session, message: Message) -> Vec<Message> {
    session
        .dispatch(Envelope {
            to: Surface::Document,
            message,
        })
        .await
}

/// Captures the current document as a new revision.
pub async fn generate(session: &mut Session) -> Result<(), Box<dyn Error>> {
    let delivered = to_document(session, Message::GenerateRevision).await;
    if delivered.is_empty() {
        println!("No new revision saved");
    }
    report(&delivered);
    Ok(())
}

pub fn list(session: &Session, format: &OutputFormat) -> Result<(), Box<dyn Error>> {
    let popup = session.popup();
    match format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "revisions": popup.revisions(),
                "gist_url": popup.gist_url(),
                "theme": popup.theme(),
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Text => {
            if popup.revisions().is_empty() {
                println!("No revisions found.");
            } else {
                for key in popup.revisions() {
                    println!("{}", key);
                }
            }
        }
    }
    Ok(())
}

/// Overwrites the document with a stored revision.
pub async fn apply(session: &mut Session, key: &str) -> Result<(), Box<dyn Error>> {
    let envelope = session.popup().select(key);
    let delivered = session.dispatch(envelope).await;
    report(&delivered);
    Ok(())
}

pub async fn clear(session: &mut Session) -> Result<(), Box<dyn Error>> {
    let delivered = to_document(session, Message::ClearRevisions).await;
    report(&delivered);
    Ok(())
}

pub async fn download(session: &mut Session) -> Result<(), Box<dyn Error>> {
    to_document(session, Message::DownloadRevisions).await;
    Ok(())
}

/// Imports revisions from a previously downloaded file.
pub async fn upload(session: &mut Session, file: &Path) -> Result<(), Box<dyn Error>> {
    let revisions = std::fs::read_to_string(file)
        .map_err(|e| format!("Failed to read '{}': {}", file.display(), e))?;
    let delivered = to_document(session, Message::ImportRevisions { revisions }).await;
    report(&delivered);
    Ok(())
}

pub async fn copy(session: &mut Session) -> Result<(), Box<dyn Error>> {
    to_document(session, Message::CopyRevisions).await;
    Ok(())
}

pub async fn paste(session: &mut Session) -> Result<(), Box<dyn Error>> {
    let delivered = to_document(session, Message::PasteRevisions).await;
    report(&delivered);
    Ok(())
}
