//! Terminal stand-ins for the browser side channels.

use std::io::{self, BufRead, Read, Write};

use revisions_core::{Clipboard, Confirm, DocumentHost, Notifier};
use tracing::info;

/// Asks on stderr and reads a y/N answer from stdin.
pub struct PromptConfirm;

impl Confirm for PromptConfirm {
    fn confirm(&self, question: &str) -> bool {
        eprint!("{} [y/N] ", question);
        let _ = io::stderr().flush();

        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        is_yes(&answer)
    }
}

/// Pre-confirmed, for `--yes`.
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, _question: &str) -> bool {
        true
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Copy prints to stdout; paste reads all of stdin.
pub struct StdioClipboard;

impl Clipboard for StdioClipboard {
    fn write_text(&self, text: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", text)?;
        stdout.flush()
    }

    fn read_text(&self) -> io::Result<String> {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        Ok(text)
    }
}

pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, message: &str) {
        info!("{}", message);
        eprintln!("{}", message);
    }
}

/// The document lives in a file that an editor reads on open.
pub struct ReloadNotice;

impl DocumentHost for ReloadNotice {
    fn reload(&self) {
        info!("Document overwritten");
        eprintln!("Document changed. Reopen it in the editor to see the revision.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes("\n"));
        assert!(!is_yes("no"));
    }

    #[test]
    fn test_assume_yes() {
        assert!(AssumeYes.confirm("Are you sure to clear revisions?"));
    }
}
