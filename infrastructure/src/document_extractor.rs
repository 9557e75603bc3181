use docx_rs::{read_docx, DocumentChild};
use domain::{Document, DocumentKind, DocumentParseError, TextExtractor};
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use tracing::debug;

/// Reads PDF, DOCX and plain-text uploads.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentTextExtractor;

impl DocumentTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for DocumentTextExtractor {
    fn pages(&self, document: &Document) -> Result<Vec<String>, DocumentParseError> {
        let pages = match document.kind {
            DocumentKind::Pdf => pdf_pages(document)?,
            DocumentKind::Docx => vec![docx_text(document)?],
            DocumentKind::PlainText => vec![plain_text(document)?],
        };
        debug!(
            file = %document.file_name,
            pages = pages.len(),
            "extracted document text"
        );
        Ok(pages)
    }
}

/// Reads a file from disk into a [`Document`], classified by extension.
pub fn load_document(path: &Path) -> std::io::Result<Document> {
    let bytes = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(Document::new(file_name, bytes))
}

fn pdf_pages(document: &Document) -> Result<Vec<String>, DocumentParseError> {
    // pdf-extract panics on some malformed inputs instead of returning an error.
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(&document.bytes)
    }));
    match outcome {
        // Every page comes back with a leading page-break marker.
        Ok(Ok(pages)) => Ok(pages.iter().map(|p| p.trim().to_string()).collect()),
        Ok(Err(e)) => Err(DocumentParseError::new(&document.file_name, e.to_string())),
        Err(_) => Err(DocumentParseError::new(
            &document.file_name,
            "PDF parser aborted on malformed input",
        )),
    }
}

fn docx_text(document: &Document) -> Result<String, DocumentParseError> {
    let docx = read_docx(&document.bytes)
        .map_err(|e| DocumentParseError::new(&document.file_name, e.to_string()))?;
    let mut text = String::new();
    for child in &docx.document.children {
        if let DocumentChild::Paragraph(p) = child {
            text.push_str(&p.raw_text());
            text.push('\n');
        }
    }
    Ok(text)
}

fn plain_text(document: &Document) -> Result<String, DocumentParseError> {
    String::from_utf8(document.bytes.clone())
        .map_err(|e| DocumentParseError::new(&document.file_name, e.to_string()))
}
