//! Common types shared between nasctl-console and nasctl-cli
//!
//! Every record the NAS backend returns is modelled here with explicit
//! field types, together with the response envelope and the NFS export
//! option set.

pub mod accounts;
pub mod envelope;
pub mod export_options;
pub mod jobs;
pub mod sharing;
pub mod storage;
pub mod syslib;
pub mod system;

pub use envelope::{ApiResponse, ErrorInfo};
pub use export_options::{check_token, group_of, toggle, ExportOptions, EXCLUSION_GROUPS};
pub use sharing::{NfsExport, SambaShare};

/// Common error types
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid export option: {0:?}")]
    InvalidOption(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Serde helpers for the backend's JSON quirks
pub(crate) mod de {
    use serde::{Deserialize, Deserializer};

    /// Go encodes nil slices and maps as `null`
    pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Default + Deserialize<'de>,
    {
        Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
    }

    /// Optional strings arrive as `""` rather than being omitted
    pub fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.filter(|s| !s.trim().is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidOption("rw ro".to_string());
        assert_eq!(err.to_string(), "Invalid export option: \"rw ro\"");

        let err = Error::Validation("path is required".to_string());
        assert_eq!(err.to_string(), "Validation error: path is required");
    }

    #[test]
    fn test_null_lists_decode_as_empty() {
        let json = r#"{"name":"media","path":"/srv/media","valid_users":null,"valid_groups":null}"#;
        let share: SambaShare = serde_json::from_str(json).unwrap();
        assert!(share.valid_users.is_empty());
        assert!(share.valid_groups.is_empty());
    }

    #[test]
    fn test_blank_comment_decodes_as_none() {
        let json = r#"{"name":"media","path":"/srv/media","comment":"  "}"#;
        let share: SambaShare = serde_json::from_str(json).unwrap();
        assert_eq!(share.comment, None);
    }
}
