//! Error types for focal point parsing and configuration.

/// Why a field value could not be read as a focal point.
///
/// The synchronizer never surfaces these to the user: a malformed value
/// falls back to [`FocalPoint::CENTER`](crate::FocalPoint::CENTER). They
/// exist so callers that want strict validation can report the reason.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The field value was empty.
    #[error("focal point value is empty")]
    Empty,

    /// The value did not split into exactly two comma-separated parts.
    #[error("expected 2 comma-separated components, found {found}")]
    ComponentCount {
        /// Number of components present.
        found: usize,
    },

    /// A component did not start with an integer.
    #[error("component {component:?} is not an integer")]
    NotAnInteger {
        /// The offending component, as typed.
        component: String,
    },
}

/// A widget configuration could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The JSON document was malformed or had fields of the wrong type.
    #[error("invalid widget configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// A configured name was empty, which would match every element.
    #[error("widget configuration field `{0}` must not be empty")]
    EmptyName(&'static str),
}
