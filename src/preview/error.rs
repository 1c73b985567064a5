//! Preview load errors and outcome classification.

/// Errors a loader or materializer can report for a single key.
///
/// None of these are fatal to the cache; they are recorded against the
/// key that produced them and cleared by the next `ensure`.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode preview: {0}")]
    Decode(String),

    #[error("Load was cancelled")]
    Cancelled,

    #[error("Loader panicked: {0}")]
    Panicked(String),

    #[error("{0}")]
    Other(String),
}

impl LoadError {
    /// Build a `Panicked` error from a `catch_unwind` payload.
    pub fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic".to_string()
        };
        LoadError::Panicked(message)
    }
}

/// What a finished load means for its key.
#[derive(Debug)]
pub enum LoadOutcome {
    /// The loader produced bytes.
    Loaded(Vec<u8>),
    /// The loader succeeded but had nothing to show.
    EmptyResult,
    /// The loader (or the materializer) failed.
    LoadFailure(LoadError),
}

impl From<Result<Option<Vec<u8>>, LoadError>> for LoadOutcome {
    fn from(result: Result<Option<Vec<u8>>, LoadError>) -> Self {
        match result {
            Ok(Some(bytes)) => LoadOutcome::Loaded(bytes),
            Ok(None) => LoadOutcome::EmptyResult,
            Err(e) => LoadOutcome::LoadFailure(e),
        }
    }
}
