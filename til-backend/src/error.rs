use thiserror::Error;

pub type TilResult<T> = Result<T, TilError>;

#[derive(Debug, Error)]
pub enum TilError {
    #[error("{0}")]
    NotFound(String),
    #[error("Invalid path: {0}")]
    InvalidPath(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

impl TilError {
    pub fn not_found() -> Self {
        Self::NotFound("TIL not found".to_string())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
