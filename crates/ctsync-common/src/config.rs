//! Configuration model for a state observation session.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SyncError};

/// Tunables for the state listener.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Upper bound on the bytes buffered while waiting for one message to
    /// complete. Exceeding it ends the session as a decode failure.
    pub max_message_bytes: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            max_message_bytes: crate::constants::DEFAULT_MAX_MESSAGE_BYTES,
        }
    }
}

impl SyncConfig {
    /// Loads a configuration from a JSON file. Missing keys take defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// holds an invalid value.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| SyncError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Config`] if the message cap is zero.
    pub fn validate(&self) -> Result<()> {
        if self.max_message_bytes == 0 {
            return Err(SyncError::Config {
                message: "max_message_bytes must be greater than zero".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        SyncConfig::default().validate().expect("valid");
    }

    #[test]
    fn load_fills_missing_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("ctsync.json");
        std::fs::write(&path, "{}").expect("write");

        let config = SyncConfig::load(&path).expect("load");
        assert_eq!(config, SyncConfig::default());
    }

    #[test]
    fn load_reads_message_cap() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("ctsync.json");
        std::fs::write(&path, r#"{"max_message_bytes": 512}"#).expect("write");

        let config = SyncConfig::load(&path).expect("load");
        assert_eq!(config.max_message_bytes, 512);
    }

    #[test]
    fn load_rejects_zero_cap() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("ctsync.json");
        std::fs::write(&path, r#"{"max_message_bytes": 0}"#).expect("write");

        let err = SyncConfig::load(&path).unwrap_err();
        assert!(matches!(err, SyncError::Config { .. }));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = SyncConfig::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, SyncError::Io { .. }));
    }
}
