//! Error types for the settings system

use thiserror::Error;

/// Errors that can occur when working with settings
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SettingError {
    /// Setting not found
    #[error("Setting not found: {0}")]
    NotFound(String),

    /// Abbreviated name matches more than one setting
    #[error("Setting '{name}' is ambiguous: {}", candidates.join(", "))]
    Ambiguous {
        name: String,
        candidates: Vec<String>,
    },

    /// Type mismatch when getting or setting a value
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// The text could not be converted to the setting's type.
    ///
    /// Only the offending raw text is kept; the underlying conversion
    /// failure is not exposed.
    #[error("invalid value: '{value}'")]
    InvalidValue { value: String },

    /// Value is outside the setting's declared range
    #[error("Invalid value for setting '{name}': {reason}")]
    OutOfRange { name: String, reason: String },

    /// Setting level mismatch (trying to apply setting at wrong level)
    #[error("Setting '{name}' cannot be applied at level '{level}'")]
    LevelMismatch { name: String, level: String },
}

impl SettingError {
    /// Create a not found error from a setting ID
    pub fn not_found_id(id: u16) -> Self {
        SettingError::NotFound(format!("id:{}", id))
    }

    /// Create a not found error from a setting name
    pub fn not_found_name(name: impl Into<String>) -> Self {
        SettingError::NotFound(name.into())
    }

    /// Create an invalid value error from the raw text
    pub fn invalid_value(value: impl Into<String>) -> Self {
        SettingError::InvalidValue {
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_value_only_quotes_raw_text() {
        let err = SettingError::invalid_value("abc");
        assert_eq!(err.to_string(), "invalid value: 'abc'");
    }

    #[test]
    fn test_ambiguous_lists_candidates() {
        let err = SettingError::Ambiguous {
            name: "st".to_string(),
            candidates: vec!["state".to_string(), "stick_radius".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Setting 'st' is ambiguous: state, stick_radius"
        );
    }
}
