use thiserror::Error;

use crate::dom::ElementId;

pub type Result<T> = std::result::Result<T, FolioError>;

/// Errors raised by the behavior layer.
///
/// None of these are fatal to the page: callers log them and disable the
/// affected feature.
#[derive(Debug, Error)]
pub enum FolioError {
    #[error("element {element} has no `{name}` attribute")]
    MissingAttribute { element: ElementId, name: &'static str },

    #[error("element {element} has invalid `{name}` attribute: {value:?}")]
    InvalidAttribute {
        element: ElementId,
        name: &'static str,
        value: String,
    },

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

impl FolioError {
    #[must_use]
    pub fn invalid_attribute(element: ElementId, name: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidAttribute {
            element,
            name,
            value: value.into(),
        }
    }
}

/// Failure reported by a [`crate::theme::PreferenceStore`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("preference storage is unavailable")]
    Unavailable,

    #[error("preference write rejected for `{key}`: {reason}")]
    WriteRejected { key: String, reason: String },
}

/// Failure while loading a [`crate::config::FolioConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid config: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn invalid_attribute_message_names_element_and_value() {
        let err = FolioError::invalid_attribute(ElementId::new(7), "data-target", "abc");
        assert_eq!(
            err.to_string(),
            "element #7 has invalid `data-target` attribute: \"abc\""
        );
    }

    #[test]
    fn invalid_config_joins_messages() {
        let err = ConfigError::Invalid(vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "invalid config: a; b");
    }

    #[test]
    fn storage_error_converts_into_folio_error() {
        let err: FolioError = StorageError::Unavailable.into();
        assert!(matches!(err, FolioError::Storage(StorageError::Unavailable)));
    }
}
