//! CV text extraction.
//!
//! A CV arrives as a PDF or DOCX file. Both formats are reduced to a single
//! line of whitespace-normalized text that the matcher uses as its query.

pub mod docx;
pub mod errors;
pub mod pdf;

pub use errors::CvError;

use std::path::Path;
use tracing::{debug, instrument};

use crate::text::collapse_whitespace;

/// Document formats accepted for CV uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CvFormat {
    Pdf,
    Docx,
}

impl CvFormat {
    /// Pick the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, CvError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            _ => Err(CvError::UnsupportedFormat(format!(".{ext}"))),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
        }
    }
}

#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn extract_cv_text(path: impl AsRef<Path>) -> Result<String, CvError> {
    let path = path.as_ref();
    let format = CvFormat::from_path(path)?;

    if !path.exists() {
        return Err(CvError::NotFound(path.to_path_buf()));
    }

    let bytes = std::fs::read(path)?;
    let fragments = match format {
        CvFormat::Pdf => pdf::extract_pages(&bytes)?,
        CvFormat::Docx => docx::extract_paragraphs(&bytes)?,
    };

    let parts: Vec<&str> = fragments
        .iter()
        .map(String::as_str)
        .filter(|f| !f.trim().is_empty())
        .collect();
    debug!(format = format.extension(), fragments = parts.len(), "extracted CV text");

    Ok(collapse_whitespace(&parts.join("\n")))
}

/// Turn extracted CV text into the query used for matching.
///
/// Currently just whitespace normalization. Section weighting (skills,
/// experience) would slot in here.
pub fn build_profile_text(cv_text: &str) -> String {
    collapse_whitespace(cv_text)
}
