//! Error types for the `conduit` crate.
//!
//! Fallible operations return [`StoreError`] through the [`Result`] alias.

/// Errors surfaced synchronously by store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An update was given neither a string path nor a mapping of paths to values.
    #[error("update must be a string path or a mapping of paths to values, found {found}")]
    InvalidUpdateShape {
        /// JSON kind of the rejected argument.
        found: &'static str,
    },

    /// `connect` was called with something that is not a [`Store`](crate::Store).
    #[error("target store isn't an instance of Store")]
    InvalidTarget,

    /// An event name did not match any event a store emits.
    #[error("unknown event name: {0}")]
    UnknownEvent(String),

    /// A store configuration document could not be parsed.
    #[error("invalid store configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;
