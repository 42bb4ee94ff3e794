use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by the one-shot catalog load. All of them are fatal to
/// startup: the process must not serve lookups without a loaded catalog.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read catalog resource `{path}`: {source}")]
    Resource { path: PathBuf, source: std::io::Error },
    #[error("catalog resource is not well-formed: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("malformed catalog entry #{index}: field `{field}` {reason}")]
    Field { index: usize, field: &'static str, reason: String },
    #[error("duplicate product id `{id}` at entry #{index} (first seen at entry #{first_index})")]
    DuplicateId { id: String, first_index: usize, index: usize },
}

impl LoadError {
    /// Stable class label for structured CLI output and logs.
    pub fn class(&self) -> &'static str {
        match self {
            Self::Resource { .. } => "resource_unavailable",
            Self::Parse(_) => "parse_error",
            Self::Field { .. } => "field_error",
            Self::DuplicateId { .. } => "duplicate_id",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::LoadError;

    #[test]
    fn field_error_names_entry_and_field() {
        let error = LoadError::Field {
            index: 3,
            field: "price",
            reason: "is not a decimal number".to_string(),
        };

        let message = error.to_string();
        assert!(message.contains("#3"));
        assert!(message.contains("`price`"));
        assert_eq!(error.class(), "field_error");
    }

    #[test]
    fn duplicate_id_error_points_at_both_entries() {
        let error =
            LoadError::DuplicateId { id: "A1".to_string(), first_index: 0, index: 4 };

        let message = error.to_string();
        assert!(message.contains("`A1`"));
        assert!(message.contains("#4"));
        assert!(message.contains("#0"));
        assert_eq!(error.class(), "duplicate_id");
    }
}
