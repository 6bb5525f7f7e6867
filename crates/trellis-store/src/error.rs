/// Errors from store construction and reconstruction.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A reconstruction path expected a container where a leaf is already
    /// assigned, or tried to write a leaf over an existing subtree.
    #[error("path conflict at \"{path}\": a leaf and a subtree cannot share a location")]
    PathConflict { path: String },

    /// A key contains the path separator and could not round-trip through
    /// the path codec.
    #[error("key \"{key}\" contains the path separator")]
    SeparatorInKey { key: String },

    /// Tried to build a store from a value that is not an object.
    #[error("expected an object, got {kind}")]
    NotAnObject { kind: &'static str },
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
