//! Error types.
//!
//! Nothing in the serialization path surfaces these to end users: collaborator
//! failures degrade the affected field, and only a malformed root tree is
//! reported to the caller.

use thiserror::Error;

/// Failure reported by an injected collaborator (asset or reference service).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The referenced asset, page or document does not exist.
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: i64 },

    /// The collaborator could not answer.
    #[error("collaborator unavailable: {0}")]
    Unavailable(String),
}

/// Invalid serializer configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config YAML: {0}")]
    Yaml(#[from] serde_yml::Error),

    #[error("default rendition config '{0}' is not defined")]
    MissingDefaultConfig(String),
}

/// Top-level serialization failure.
#[derive(Debug, Error)]
pub enum SerializeError {
    /// The persisted page is not shaped like a page at all.
    #[error("malformed content tree: {0}")]
    MalformedTree(String),
}

/// Per-node failure, caught by the pipeline and converted to a pass-through.
#[derive(Debug, Error)]
pub(crate) enum NodeError {
    #[error("payload for '{0}' is not a mapping")]
    MalformedPayload(String),

    #[error("failed to encode node value: {0}")]
    Encode(#[from] serde_json::Error),
}
