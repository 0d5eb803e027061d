use dropsearch_types::DescriptorError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    /// A host-supplied index descriptor has the wrong shape.
    #[error("Index descriptor #{position} ({label}): {source}")]
    Descriptor {
        position: usize,
        label: String,
        #[source]
        source: DescriptorError,
    },
}

impl Error {
    pub(crate) fn descriptor(
        position: usize,
        label: impl Into<String>,
        source: DescriptorError,
    ) -> Self {
        Self::Descriptor {
            position,
            label: label.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_read_failure_wraps_io() {
        let err: Error = std::fs::read_to_string("/nonexistent/dropsearch/dataset.json")
            .unwrap_err()
            .into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().starts_with("IO error"));
    }

    #[test]
    fn test_malformed_config_wraps_json() {
        let err: Error = serde_json::from_str::<serde_json::Value>("{\"indices\": [")
            .unwrap_err()
            .into();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_config_message() {
        let err = Error::Config("dataset must be an object".to_string());
        assert_eq!(err.to_string(), "Config error: dataset must be an object");
    }

    #[test]
    fn test_descriptor_message_names_position_and_label() {
        let err = Error::descriptor(1, "users", DescriptorError::MissingTitle);
        let msg = err.to_string();
        assert!(msg.starts_with("Index descriptor #1 (users)"));
        assert!(msg.contains("\"title\""));
    }

    #[test]
    fn test_descriptor_source_is_kept() {
        use std::error::Error as _;
        let err = Error::descriptor(0, "posts", DescriptorError::InvalidParams);
        let source = err.source().unwrap();
        assert!(source.to_string().contains("params"));
    }
}
