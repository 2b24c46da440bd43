//! Key/value persistence tiers.
//!
//! A tier maps string keys to JSON values. The page-scoped and the
//! privileged-scoped stores each own one tier; neither can see the other's.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// A string-keyed store of JSON values.
pub trait KeyValueTier {
    /// Returns `Ok(None)` when the key is absent.
    fn get(&self, key: &str) -> Result<Option<Value>, TierError>;

    fn set(&self, key: &str, value: &Value) -> Result<(), TierError>;

    /// Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), TierError>;
}

/// Reads `key` and decodes it into `T`.
pub fn read_typed<T: DeserializeOwned>(
    tier: &dyn KeyValueTier,
    key: &str,
) -> Result<Option<T>, TierError> {
    match tier.get(key)? {
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|e| TierError::Decode(key.to_string(), e)),
        None => Ok(None),
    }
}

/// Encodes `value` and writes it under `key`.
pub fn write_typed<T: Serialize>(
    tier: &dyn KeyValueTier,
    key: &str,
    value: &T,
) -> Result<(), TierError> {
    let value = serde_json::to_value(value).map_err(|e| TierError::Encode(key.to_string(), e))?;
    tier.set(key, &value)
}

/// Tier backed by a directory with one JSON file per key.
#[derive(Clone, Debug)]
pub struct FileTier {
    dir: PathBuf,
}

impl FileTier {
    /// Creates a tier rooted at `dir`. The directory is created on first write.
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Returns the tier directory path.
    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    /// Returns the file path for a key.
    pub fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueTier for FileTier {
    fn get(&self, key: &str) -> Result<Option<Value>, TierError> {
        let path = self.path(key);

        match fs::read_to_string(&path) {
            Ok(contents) => {
                let value = serde_json::from_str(&contents)
                    .map_err(|e| TierError::Decode(key.to_string(), e))?;
                Ok(Some(value))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(TierError::Io(path, e)),
        }
    }

    fn set(&self, key: &str, value: &Value) -> Result<(), TierError> {
        fs::create_dir_all(&self.dir).map_err(|e| TierError::Io(self.dir.clone(), e))?;

        let path = self.path(key);
        let contents = serde_json::to_string_pretty(value)
            .map_err(|e| TierError::Encode(key.to_string(), e))?;

        fs::write(&path, contents).map_err(|e| TierError::Io(path, e))
    }

    fn remove(&self, key: &str) -> Result<(), TierError> {
        let path = self.path(key);

        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(TierError::Io(path, e)),
        }
    }
}

/// In-memory tier, used by tests and embedders without a filesystem.
#[derive(Debug, Default)]
pub struct MemoryTier {
    values: RefCell<HashMap<String, Value>>,
}

impl MemoryTier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueTier for MemoryTier {
    fn get(&self, key: &str) -> Result<Option<Value>, TierError> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &Value) -> Result<(), TierError> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.clone());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), TierError> {
        self.values.borrow_mut().remove(key);
        Ok(())
    }
}

/// Errors that can occur while reading or writing a tier.
#[derive(Debug)]
pub enum TierError {
    /// I/O error reading or writing a file.
    Io(PathBuf, io::Error),
    /// Stored value is not valid JSON, or not the expected shape.
    Decode(String, serde_json::Error),
    /// Value could not be encoded.
    Encode(String, serde_json::Error),
}

impl std::fmt::Display for TierError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TierError::Io(path, e) => write!(f, "I/O error for {}: {}", path.display(), e),
            TierError::Decode(key, e) => write!(f, "Failed to decode '{}': {}", key, e),
            TierError::Encode(key, e) => write!(f, "Failed to encode '{}': {}", key, e),
        }
    }
}

impl std::error::Error for TierError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TierError::Io(_, e) => Some(e),
            TierError::Decode(_, e) | TierError::Encode(_, e) => Some(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn test_tier() -> (FileTier, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let tier = FileTier::new(temp_dir.path().join("page"));
        (tier, temp_dir)
    }

    #[test]
    fn test_path_uses_key_as_file_stem() {
        let (tier, _temp) = test_tier();
        assert!(tier
            .path("excalidraw-revisions")
            .ends_with("excalidraw-revisions.json"));
    }

    #[test]
    fn test_get_missing_returns_none() {
        let (tier, _temp) = test_tier();
        assert!(tier.get("excalidraw").unwrap().is_none());
    }

    #[test]
    fn test_set_creates_directory_and_roundtrips() {
        let (tier, _temp) = test_tier();
        tier.set("excalidraw", &json!([{"id": "a"}])).unwrap();

        assert!(tier.dir().exists());
        assert_eq!(tier.get("excalidraw").unwrap(), Some(json!([{"id": "a"}])));
    }

    #[test]
    fn test_remove_missing_is_ok() {
        let (tier, _temp) = test_tier();
        tier.remove("gist-url").unwrap();
    }

    #[test]
    fn test_remove_deletes_value() {
        let (tier, _temp) = test_tier();
        tier.set("gist-url", &json!("https://gist.github.com/u/1"))
            .unwrap();
        tier.remove("gist-url").unwrap();
        assert!(tier.get("gist-url").unwrap().is_none());
    }

    #[test]
    fn test_corrupt_file_is_decode_error() {
        let (tier, _temp) = test_tier();
        fs::create_dir_all(tier.dir()).unwrap();
        fs::write(tier.path("excalidraw"), "{not json").unwrap();

        let err = tier.get("excalidraw").unwrap_err();
        assert!(matches!(err, TierError::Decode(ref key, _) if key == "excalidraw"));
    }

    #[test]
    fn test_read_typed_wrong_shape_is_decode_error() {
        let tier = MemoryTier::new();
        tier.set("excalidraw-revisions", &json!("oops")).unwrap();

        let result: Result<Option<Vec<String>>, _> = read_typed(&tier, "excalidraw-revisions");
        assert!(matches!(result, Err(TierError::Decode(_, _))));
    }

    #[test]
    fn test_write_then_read_typed() {
        let tier = MemoryTier::new();
        write_typed(&tier, "keys", &vec!["0", "1"]).unwrap();

        let keys: Option<Vec<String>> = read_typed(&tier, "keys").unwrap();
        assert_eq!(keys, Some(vec!["0".to_string(), "1".to_string()]));
    }

    #[test]
    fn test_memory_tier_roundtrip() {
        let tier = MemoryTier::new();
        tier.set("k", &json!(1)).unwrap();
        assert_eq!(tier.get("k").unwrap(), Some(json!(1)));
        tier.remove("k").unwrap();
        assert!(tier.get("k").unwrap().is_none());
    }
}
