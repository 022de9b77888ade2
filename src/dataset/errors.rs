use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("dataset not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("missing required column(s): {}", .0.join(", "))]
    Schema(Vec<String>),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("charset error: {0}")]
    Charset(String),
}
