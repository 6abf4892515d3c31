use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeltaError {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported input: {0}")]
    Input(#[from] jdelta_types::TypeError),

    #[error("diff error: {0}")]
    Diff(#[from] jdelta_diff::DiffError),

    #[error("patch error: {0}")]
    Patch(#[from] jdelta_types::PatchError),
}

pub type DeltaResult<T> = Result<T, DeltaError>;
