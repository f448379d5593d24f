//! Settings store error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading or writing the settings file.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Home directory could not be determined.
    #[error("home directory not found")]
    HomeDirectoryNotFound,

    /// The settings file exists but could not be read.
    #[error("failed to read settings {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The settings file could not be written.
    #[error("failed to write settings {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The settings file is not valid JSON.
    #[error("invalid settings file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Serialization of the settings failed.
    #[error("failed to encode settings: {0}")]
    Encode(#[from] serde_json::Error),

    /// Injected failure from a test double.
    #[error("settings store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::HomeDirectoryNotFound => "pass --settings <PATH> to choose a settings file",
            Self::Read { .. } | Self::Write { .. } => "check the permissions of the settings file",
            Self::Parse { .. } => "delete the settings file to restore the default interval",
            Self::Encode(_) | Self::Unavailable(_) => "try again",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_includes_path() {
        let err = StoreError::Read {
            path: PathBuf::from("/tmp/settings.json"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        let message = err.to_string();
        assert!(message.contains("/tmp/settings.json"));
        assert!(message.contains("denied"));
    }

    #[test]
    fn test_suggestion() {
        assert!(StoreError::HomeDirectoryNotFound
            .suggestion()
            .contains("--settings"));
    }
}
