use crate::errors::DocumentParseError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentKind {
    Pdf,
    Docx,
    PlainText,
}

impl DocumentKind {
    pub fn from_file_name(name: &str) -> Self {
        let ext = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "pdf" => DocumentKind::Pdf,
            "docx" => DocumentKind::Docx,
            _ => DocumentKind::PlainText,
        }
    }
}

/// An uploaded file, held only until its text has been extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub file_name: String,
    pub kind: DocumentKind,
    pub bytes: Vec<u8>,
}

impl Document {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let kind = DocumentKind::from_file_name(&file_name);
        Self {
            file_name,
            kind,
            bytes,
        }
    }
}

/// Normalized document text handed to the model as context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedContext(String);

impl NormalizedContext {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn token_count(&self) -> usize {
        self.0.split_whitespace().count()
    }
}

impl std::fmt::Display for NormalizedContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Turns a document into its plain text, page by page.
pub trait TextExtractor: Send + Sync {
    fn pages(&self, document: &Document) -> Result<Vec<String>, DocumentParseError>;

    /// All pages in order, trimmed and one per line, so the last word of a
    /// page never runs into the first word of the next. Blank pages are
    /// skipped; `""` when there is no document.
    fn extract(&self, document: Option<&Document>) -> Result<String, DocumentParseError> {
        let Some(doc) = document else {
            return Ok(String::new());
        };
        let pages = self.pages(doc)?;
        let text: Vec<&str> = pages
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .collect();
        Ok(text.join("\n"))
    }
}
