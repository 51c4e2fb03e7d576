use thiserror::Error;

/// Failure kinds surfaced by the upload surface and the answering gateway.
#[derive(Debug, Error)]
pub enum QnaError {
    #[error("invalid file type: expected application/pdf, got {0}")]
    InvalidFileType(String),

    #[error("failed to read file: {0}")]
    FileReadFailure(#[from] std::io::Error),

    #[error("missing input: {0}")]
    MissingInput(&'static str),

    #[error("model invocation failed: {0}")]
    ModelInvocationFailure(#[source] anyhow::Error),

    #[error("model returned malformed output: {0}")]
    InvalidOutput(String),
}
