//! Upload decoding: turns PDF/DOCX bytes into plain text before the pipeline sees them.

pub mod docx;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Unsupported file format: '{0}'")]
    UnsupportedFormat(String),

    #[error("PDF text extraction failed: {0}")]
    Pdf(String),

    #[error("DOCX text extraction failed: {0}")]
    Docx(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Routes on the file extension. Legacy `.doc` goes to the DOCX decoder.
    pub fn from_filename(filename: &str) -> Result<Self, DecodeError> {
        let extension = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "docx" | "doc" => Ok(DocumentFormat::Docx),
            _ => Err(DecodeError::UnsupportedFormat(extension)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
        }
    }
}

/// Extracts plain text from an uploaded document. CPU-bound; call from a blocking task.
pub fn extract_text(bytes: &[u8], format: DocumentFormat) -> Result<String, DecodeError> {
    match format {
        DocumentFormat::Pdf => {
            pdf_extract::extract_text_from_mem(bytes).map_err(|e| DecodeError::Pdf(e.to_string()))
        }
        DocumentFormat::Docx => docx::extract_text(bytes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_filename() {
        let cases = [
            ("resume.pdf", Some(DocumentFormat::Pdf)),
            ("RESUME.PDF", Some(DocumentFormat::Pdf)),
            ("cv.final.docx", Some(DocumentFormat::Docx)),
            ("old.doc", Some(DocumentFormat::Docx)),
            ("resume.txt", None),
            ("resume", None),
            ("archive.pdf.zip", None),
        ];
        for (filename, expected) in cases {
            assert_eq!(DocumentFormat::from_filename(filename).ok(), expected, "{filename}");
        }
    }

    #[test]
    fn test_unsupported_format_names_extension() {
        let err = DocumentFormat::from_filename("resume.txt").unwrap_err();
        assert!(matches!(err, DecodeError::UnsupportedFormat(ref ext) if ext == "txt"));
    }

    #[test]
    fn test_garbage_pdf_is_decode_error() {
        let err = extract_text(b"definitely not a pdf", DocumentFormat::Pdf).unwrap_err();
        assert!(matches!(err, DecodeError::Pdf(_)));
    }
}
