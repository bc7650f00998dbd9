//! Document extraction: uploaded PDF bytes → plain text.
//!
//! A thin wrapper over the `pdf-extract` crate. Uploads are processed
//! entirely from memory; nothing touches the filesystem. The wrapper's only
//! jobs are mapping library failures to a typed error and refusing
//! documents that extract to nothing (scanned/image-only PDFs), so callers
//! get a meaningful 400 instead of generating content from an empty string.

use crate::error::LearnForgeError;
use tracing::debug;

/// A document-to-text extractor.
///
/// The HTTP layer consumes this contract rather than a concrete library so
/// tests can substitute an extractor with known output. The production
/// implementation is [`PdfExtractor`].
pub trait DocumentExtractor: Send + Sync {
    /// Extract plain text from the uploaded bytes.
    fn extract(&self, bytes: &[u8]) -> Result<String, LearnForgeError>;
}

/// Production extractor backed by the `pdf-extract` crate.
#[derive(Default)]
pub struct PdfExtractor;

impl DocumentExtractor for PdfExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, LearnForgeError> {
        extract_text(bytes)
    }
}

/// Extract the full text of a PDF from its raw bytes.
///
/// Returns [`LearnForgeError::ExtractionFailed`] when the library cannot
/// parse the document and [`LearnForgeError::EmptyDocument`] when parsing
/// succeeds but yields no text.
pub fn extract_text(pdf_bytes: &[u8]) -> Result<String, LearnForgeError> {
    let text = pdf_extract::extract_text_from_mem(pdf_bytes).map_err(|e| {
        LearnForgeError::ExtractionFailed {
            detail: e.to_string(),
        }
    })?;

    if text.trim().is_empty() {
        return Err(LearnForgeError::EmptyDocument);
    }

    debug!("Extracted {} chars from {} PDF bytes", text.chars().count(), pdf_bytes.len());
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_fail_with_extraction_error() {
        let err = extract_text(b"this is not a pdf").unwrap_err();
        assert!(matches!(err, LearnForgeError::ExtractionFailed { .. }));
    }

    #[test]
    fn empty_input_fails() {
        assert!(extract_text(b"").is_err());
    }
}
