//! Error types shared by every generator.
//!
//! Library operations return [`GenError`]; binaries wrap it into
//! `color_eyre` reports with file-level context.

/// Errors that can occur while loading inputs or rendering outputs
#[derive(Debug, thiserror::Error)]
pub enum GenError {
    #[error("Failed to parse configuration {source_name}: {reason}")]
    ConfigParse { source_name: String, reason: String },

    #[error("Key '{key}' not found in {map}")]
    Lookup { map: String, key: String },

    #[error("Marker '{marker}' not found in {template}")]
    TemplateMarkerNotFound { marker: String, template: String },

    #[error("Malformed metric line {line_number}: '{line}' ({reason})")]
    MalformedMetricLine {
        line_number: usize,
        line: String,
        reason: String,
    },

    #[error("Inconsistent connection profile: {0}")]
    InconsistentProfile(String),
}

impl GenError {
    pub(crate) fn config_parse(source_name: impl Into<String>, reason: impl ToString) -> Self {
        GenError::ConfigParse {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn lookup(map: impl Into<String>, key: impl Into<String>) -> Self {
        GenError::Lookup {
            map: map.into(),
            key: key.into(),
        }
    }

    pub(crate) fn marker(marker: impl Into<String>, template: impl Into<String>) -> Self {
        GenError::TemplateMarkerNotFound {
            marker: marker.into(),
            template: template.into(),
        }
    }
}
