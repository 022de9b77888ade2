use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CvError {
    #[error("CV not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("unsupported CV format '{0}', use .pdf or .docx")]
    UnsupportedFormat(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("pdf error: {0}")]
    Pdf(String),

    #[error("docx error: {0}")]
    Docx(String),
}
