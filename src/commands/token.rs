use clap::{Args, Subcommand};
use std::error::Error;

use revisions_core::options;

use crate::session::Session;

#[derive(Args)]
pub struct TokenCommand {
    #[command(subcommand)]
    pub command: TokenSubcommand,
}

#[derive(Subcommand)]
pub enum TokenSubcommand {
    /// Save the GitHub token used for gist backup (needs the gist scope)
    Set {
        /// Personal access token
        token: String,
    },

    /// Forget the saved token
    Remove,

    /// Show the saved token, masked
    Show,
}

impl TokenCommand {
    pub fn run(&self, session: &Session) -> Result<(), Box<dyn Error>> {
        let privileged = session.privileged();
        match &self.command {
            TokenSubcommand::Set { token } => {
                if !options::save_token(privileged, token)? {
                    return Err("Token is empty".into());
                }
                println!("Gist token saved");
            }
            TokenSubcommand::Remove => {
                options::remove_token(privileged)?;
                println!("Gist token removed");
            }
            TokenSubcommand::Show => match options::masked_token(privileged)? {
                Some(token) => println!("{}", token),
                None => println!("No gist token set"),
            },
        }
        Ok(())
    }
}
