//! Error types for tree construction.

use quill_config::ConfigError;

use crate::document::NodeId;

/// Semantic error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A caller passed a value the operation does not accept.
    InvalidArgument,
    /// The target is in a state the operation does not support.
    InvalidState,
}

/// Error raised while building or mutating a tree.
///
/// Rendering itself never fails.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Attribute name does not match `^[A-Za-z][A-Za-z0-9:_.-]*$`.
    #[error("invalid attribute name: {0:?}")]
    InvalidAttributeName(String),
    /// Dynamic input had a shape the conversion does not accept.
    #[error("unsupported {context} type: {found}")]
    UnsupportedType {
        /// What was being converted (e.g., "content", "attributes").
        context: &'static str,
        /// Runtime type that was received (e.g., "object").
        found: &'static str,
    },
    /// Node handle is not part of this document.
    #[error("node {0} does not belong to this document")]
    UnknownNode(NodeId),
    /// Value removal on an attribute that does not hold a list.
    #[error("attribute {name:?} does not hold a list value")]
    NotAList {
        /// Attribute name.
        name: String,
    },
    /// Configuration could not be applied.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    /// Semantic category of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotAList { .. } => ErrorKind::InvalidState,
            Self::InvalidAttributeName(_)
            | Self::UnsupportedType { .. }
            | Self::UnknownNode(_)
            | Self::Config(_) => ErrorKind::InvalidArgument,
        }
    }
}

/// Result alias for tree construction.
pub type Result<T> = std::result::Result<T, Error>;
