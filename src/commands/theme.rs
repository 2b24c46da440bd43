use clap::{Args, Subcommand, ValueEnum};
use std::error::Error;

use crate::session::Session;

#[derive(Clone, ValueEnum)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

#[derive(Args)]
pub struct ThemeCommand {
    #[command(subcommand)]
    pub command: ThemeSubcommand,
}

#[derive(Subcommand)]
pub enum ThemeSubcommand {
    /// Set the editor theme, as the host application does
    Set {
        #[arg(value_enum)]
        theme: Theme,
    },
}

impl ThemeCommand {
    pub fn run(&self, session: &Session) -> Result<(), Box<dyn Error>> {
        match &self.command {
            ThemeSubcommand::Set { theme } => {
                session.page().set_theme(theme.as_str())?;
                session.document().on_load();
                println!("Theme: {}", theme.as_str());
            }
        }
        Ok(())
    }
}
