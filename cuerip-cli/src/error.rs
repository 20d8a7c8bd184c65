use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Extraction error: {0}")]
    Extraction(#[from] cuerip_engine::CueRipError),

    #[error("Initialization failed: {0}")]
    Initialization(String),
}
