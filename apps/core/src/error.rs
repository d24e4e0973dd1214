use thiserror::Error;

#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("invalid dataset: {0}")]
    Dataset(String),

    #[error("failed to decode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid selection: {0}")]
    Selection(&'static str),
}

pub type Result<T, E = AtlasError> = std::result::Result<T, E>;
