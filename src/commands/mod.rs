mod config_cmd;
mod document;
mod gist;
mod revision;
mod theme;
mod token;

use clap::ValueEnum;
use revisions_core::Message;

pub use config_cmd::ConfigCommand;
pub use document::DocumentCommand;
pub use gist::GistCommand;
pub use revision::{apply, clear, copy, download, generate, list, paste, upload};
pub use theme::ThemeCommand;
pub use token::TokenCommand;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Prints what the UI received.
pub fn report(delivered: &[Message]) {
    for message in delivered {
        match message {
            Message::UpdateRevisionsSelect { revisions } => {
                println!("Revisions: {}", revisions.join(", "))
            }
            Message::ClearRevisionsSelect => println!("Revisions cleared"),
            Message::UpdateGistInput { gist_url } => println!("Gist: {}", gist_url),
            _ => {}
        }
    }
}
