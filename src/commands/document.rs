use clap::{Args, Subcommand};
use serde_json::Value;
use std::error::Error;
use std::path::PathBuf;

use crate::session::Session;

#[derive(Args)]
pub struct DocumentCommand {
    #[command(subcommand)]
    pub command: DocumentSubcommand,
}

#[derive(Subcommand)]
pub enum DocumentSubcommand {
    /// Replace the current document with an .excalidraw file or an element array
    Load {
        /// Path to the file
        file: PathBuf,
    },

    /// Print the current document's elements
    Show,
}

impl DocumentCommand {
    pub fn run(&self, session: &Session) -> Result<(), Box<dyn Error>> {
        match &self.command {
            DocumentSubcommand::Load { file } => {
                let contents = std::fs::read_to_string(file)
                    .map_err(|e| format!("Failed to read '{}': {}", file.display(), e))?;
                let elements = elements_of(serde_json::from_str(&contents)?)?;

                session.page().set_document(&elements)?;
                session.document().on_load();
                println!("Loaded {} elements", elements.len());
            }
            DocumentSubcommand::Show => match session.page().document()? {
                Some(elements) => println!("{}", serde_json::to_string_pretty(&elements)?),
                None => println!("No document"),
            },
        }
        Ok(())
    }
}

/// Accepts a bare element array or a `{"elements": [...]}` scene file.
fn elements_of(value: Value) -> Result<Vec<Value>, String> {
    match value {
        Value::Array(elements) => Ok(elements),
        Value::Object(mut scene) => match scene.remove("elements") {
            Some(Value::Array(elements)) => Ok(elements),
            _ => Err("Scene file has no elements array".to_string()),
        },
        _ => Err("Expected an element array or a scene object".to_string()),
    }
}
