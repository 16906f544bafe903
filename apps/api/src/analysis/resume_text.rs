use crate::errors::AppError;

/// Extracts the plain text of an uploaded resume PDF.
///
/// Unreadable PDFs and PDFs with no extractable text (scans, images) are
/// rejected as unprocessable. Call from a blocking thread.
pub fn extract_resume_text(pdf_bytes: &[u8]) -> Result<String, AppError> {
    let text = pdf_extract::extract_text_from_mem(pdf_bytes)
        .map_err(|e| AppError::UnprocessableEntity(format!("Could not read resume PDF: {e}")))?;

    if text.trim().is_empty() {
        return Err(AppError::UnprocessableEntity(
            "Resume PDF contains no extractable text".to_string(),
        ));
    }
    Ok(text)
}
