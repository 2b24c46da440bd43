//! The options surface: manages the gist token in the privileged tier.

use crate::privileged::PrivilegedStore;
use crate::tier::TierError;

/// Saves a trimmed token. Returns false, storing nothing, when it is blank.
pub fn save_token(privileged: &PrivilegedStore, token: &str) -> Result<bool, TierError> {
    let token = token.trim();
    if token.is_empty() {
        return Ok(false);
    }
    privileged.set_gist_token(token)?;
    Ok(true)
}

pub fn remove_token(privileged: &PrivilegedStore) -> Result<(), TierError> {
    privileged.remove_gist_token()
}

/// The stored token with all but its last four characters masked.
pub fn masked_token(privileged: &PrivilegedStore) -> Result<Option<String>, TierError> {
    Ok(privileged.gist_token()?.map(|token| mask(&token)))
}

fn mask(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    let visible = chars.len().saturating_sub(4);
    chars
        .iter()
        .enumerate()
        .map(|(i, c)| if i < visible { '*' } else { *c })
        .collect()
}
