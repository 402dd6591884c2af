// Document extraction: uploaded file bytes → plain text + hyperlink hints.
// Parsing is CPU-bound; callers run `extract` inside tokio::task::spawn_blocking.

pub mod docx;
pub mod pdf;

use std::collections::HashSet;

use thiserror::Error;

use crate::resume::HyperlinkHint;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("File type is missing")]
    MissingFileType,

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("DOCX archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("DOCX XML error: {0}")]
    Xml(String),

    #[error("DOCX is missing {0}")]
    MissingPart(&'static str),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Document parser crashed on malformed input")]
    ParserPanic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Docx,
}

impl FileKind {
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "pdf" => Some(FileKind::Pdf),
            "docx" => Some(FileKind::Docx),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Pdf => "pdf",
            FileKind::Docx => "docx",
        }
    }
}

/// Text and link annotations pulled out of one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedDocument {
    pub text: String,
    pub hints: Vec<HyperlinkHint>,
}

/// Resolves the file kind from the filename, honouring the configured allow-list.
pub fn validate_file_type(
    filename: &str,
    allowed: &HashSet<String>,
) -> Result<FileKind, ExtractionError> {
    let Some((_, extension)) = filename.rsplit_once('.') else {
        return Err(ExtractionError::MissingFileType);
    };
    let extension = extension.to_ascii_lowercase();
    if extension.is_empty() {
        return Err(ExtractionError::MissingFileType);
    }
    if !allowed.contains(&extension) {
        return Err(ExtractionError::UnsupportedFileType(extension));
    }
    FileKind::from_extension(&extension).ok_or(ExtractionError::UnsupportedFileType(extension))
}

pub fn extract(bytes: &[u8], kind: FileKind) -> Result<ExtractedDocument, ExtractionError> {
    match kind {
        FileKind::Pdf => pdf::extract_pdf(bytes),
        FileKind::Docx => docx::extract_docx(bytes),
    }
}
