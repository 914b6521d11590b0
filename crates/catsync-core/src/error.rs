use thiserror::Error;

/// Failures surfaced by the content-fetch collaborator.
///
/// The engine never retries; either kind aborts the whole reconciliation so
/// no partial operation set can desynchronize the catalog.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("descriptor not found: revision={revision}, path={path}")]
    NotFound { revision: String, path: String },

    #[error("transient fetch failure: {0}")]
    Transient(String),
}

impl FetchError {
    pub fn not_found(revision: impl Into<String>, path: impl Into<String>) -> Self {
        Self::NotFound {
            revision: revision.into(),
            path: path.into(),
        }
    }

    /// Convenience constructor for transient I/O errors — use with
    /// `.map_err(FetchError::transient)`.
    pub fn transient<E: std::fmt::Display>(e: E) -> Self {
        Self::Transient(e.to_string())
    }
}

#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("content fetch failed: {0}")]
    Fetch(#[from] FetchError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    NotFound { path: String },

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
