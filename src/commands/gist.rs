use clap::{Args, Subcommand};
use std::error::Error;

use revisions_core::{Envelope, Message, Surface};

use super::report;
use crate::session::Session;

#[derive(Args)]
pub struct GistCommand {
    #[command(subcommand)]
    pub command: GistSubcommand,
}

#[derive(Subcommand)]
pub enum GistSubcommand {
    /// Back up all revisions to a private gist
    Save {
        /// Gist to overwrite (defaults to the last saved gist; creates a new one if none)
        #[arg(long)]
        url: Option<String>,
    },

    /// Replace all revisions with the contents of a gist
    Import {
        /// Gist to read (defaults to the last saved gist)
        #[arg(long)]
        url: Option<String>,
    },
}

impl GistCommand {
    pub async fn run(&self, session: &mut Session) -> Result<(), Box<dyn Error>> {
        if !session.popup().backup_enabled() {
            return Err("Gist backup is disabled. Save a token with `exrev token set` first.".into());
        }

        match &self.command {
            GistSubcommand::Save { url } => {
                fill_url(session, url).await;
                println!("{}...", session.popup().save_label());

                let envelope = session.popup().save_backup();
                let delivered = session.dispatch(envelope).await;
                if delivered.is_empty() {
                    eprintln!("Gist was not saved. See the log above for the cause.");
                    return Ok(());
                }
                report(&delivered);
            }
            GistSubcommand::Import { url } => {
                fill_url(session, url).await;

                let envelope = session
                    .popup()
                    .import_backup()
                    .ok_or("No gist url. Pass --url or save a gist first.")?;
                let delivered = session.dispatch(envelope).await;
                if delivered.is_empty() {
                    eprintln!("Gist was not imported. See the log above for the cause.");
                    return Ok(());
                }
                report(&delivered);
            }
        }
        Ok(())
    }
}

/// Types `url` into the popup's gist input.
async fn fill_url(session: &mut Session, url: &Option<String>) {
    if let Some(gist_url) = url {
        session
            .dispatch(Envelope {
                to: Surface::Ui,
                message: Message::UpdateGistInput {
                    gist_url: gist_url.trim().to_string(),
                },
            })
            .await;
    }
}
