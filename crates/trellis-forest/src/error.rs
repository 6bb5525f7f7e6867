/// Errors from forest construction.
#[derive(Debug, thiserror::Error)]
pub enum ForestError {
    /// The children field name collides with an identifier field, so
    /// augmenting records would clobber the linking data.
    #[error("children field \"{field}\" collides with an identifier field")]
    ConflictingFields { field: String },
}

/// Result alias for forest operations.
pub type ForestResult<T> = Result<T, ForestError>;
