use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod host;
mod session;

use commands::{ConfigCommand, DocumentCommand, GistCommand, OutputFormat, ThemeCommand, TokenCommand};
use config::Config;
use host::{AssumeYes, PromptConfirm};
use revisions_core::Confirm;
use session::Session;

#[derive(Parser)]
#[command(name = "exrev")]
#[command(version)]
#[command(about = "Revision history and gist backup for Excalidraw documents", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Save the current document as a new revision
    Generate,

    /// List revision keys
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Restore a revision into the document
    Apply {
        /// Revision key
        key: String,

        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },

    /// Delete all revisions
    Clear {
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },

    /// Write all revisions to a JSON file in the download directory
    Download,

    /// Replace all revisions with the contents of a downloaded file
    Upload {
        /// Path to the file
        file: PathBuf,
    },

    /// Print all revisions to stdout
    Copy,

    /// Replace all revisions with JSON read from stdin
    Paste,

    /// Back up or restore revisions through a GitHub gist
    Gist(GistCommand),

    /// Manage the gist token
    Token(TokenCommand),

    /// Act as the editor: load or show the current document
    Document(DocumentCommand),

    /// Act as the editor: change its theme
    Theme(ThemeCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "exrev=info,revisions_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config)?;

    let Some(command) = cli.command else {
        println!("Use --help to see available commands");
        return Ok(());
    };

    let open = |yes: bool| {
        let confirm: Box<dyn Confirm> = if yes {
            Box::new(AssumeYes)
        } else {
            Box::new(PromptConfirm)
        };
        Session::open(&config, confirm)
    };

    match command {
        Commands::Config(cmd) => cmd.run(&config)?,
        Commands::Generate => commands::generate(&mut open(false)?).await?,
        Commands::List { format } => commands::list(&open(false)?, &format)?,
        Commands::Apply { key, yes } => commands::apply(&mut open(yes)?, &key).await?,
        Commands::Clear { yes } => commands::clear(&mut open(yes)?).await?,
        Commands::Download => commands::download(&mut open(false)?).await?,
        Commands::Upload { file } => commands::upload(&mut open(false)?, &file).await?,
        Commands::Copy => commands::copy(&mut open(false)?).await?,
        Commands::Paste => commands::paste(&mut open(false)?).await?,
        Commands::Gist(cmd) => cmd.run(&mut open(false)?).await?,
        Commands::Token(cmd) => cmd.run(&open(false)?)?,
        Commands::Document(cmd) => cmd.run(&open(false)?)?,
        Commands::Theme(cmd) => cmd.run(&open(false)?)?,
    }

    Ok(())
}
