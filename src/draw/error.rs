use thiserror::Error;

/// Rejection of a scene edit. The scene is left untouched whenever one of
/// these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
    #[error("operation not available: {0}")]
    OutOfScope(String),
}

impl EditError {
    pub fn invalid_geometry(reason: impl Into<String>) -> Self {
        EditError::InvalidGeometry(reason.into())
    }

    pub fn out_of_scope(reason: impl Into<String>) -> Self {
        EditError::OutOfScope(reason.into())
    }
}
