//! Error types for mdvdom.

/// Error while loading a source tree or configuration.
///
/// Compiling an in-memory [`Node`](crate::Node) never fails: dangling references,
/// unknown node types and an over-eager sanitizer all degrade to fallback output.
/// Errors only surface at the loading boundary.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A value in the source tree has no `type` discriminant.
    #[error("Expected node, got `{value}`")]
    MissingType {
        /// The offending value, serialized.
        value: String,
    },

    /// JSON deserialization error (includes nested missing discriminants).
    #[error("invalid source tree: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML configuration error.
    #[error("invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result alias for mdvdom operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
