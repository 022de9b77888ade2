use crate::cv::errors::CvError;

/// Extract the text of a PDF document, one entry per non-empty line block.
pub fn extract_pages(bytes: &[u8]) -> Result<Vec<String>, CvError> {
    let text = pdf_extract::extract_text_from_mem(bytes).map_err(|e| CvError::Pdf(e.to_string()))?;

    // pdf-extract separates pages with blank lines
    Ok(text
        .split("\n\n")
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .map(str::to_string)
        .collect())
}
