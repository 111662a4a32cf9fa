//! Text extraction from supported file formats.
//!
//! Dispatch is a closed enum over file extensions: adding a format means
//! adding a [`FileKind`] variant and its handler. PDF text comes from
//! `lopdf` page by page, DOCX paragraphs from the `word/document.xml` entry
//! of the zip archive, and plain text is read as strict UTF-8.

use std::io::Read;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::Event;
use tracing::debug;

use crate::error::{RagError, Result};

/// A supported file format, determined by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// PDF documents.
    Pdf,
    /// Word documents (`.docx`; `.doc` is accepted and parsed the same way).
    Docx,
    /// Plain UTF-8 text.
    Txt,
}

impl FileKind {
    /// The extensions this crate can extract text from, lowercase.
    pub const SUPPORTED: [&'static str; 4] = ["pdf", "docx", "doc", "txt"];

    /// Determine the file kind from a path's extension, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::UnsupportedFormat`] when the extension is missing
    /// or not in the supported set.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| RagError::UnsupportedFormat(path.display().to_string()))?;
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "docx" | "doc" => Ok(Self::Docx),
            "txt" => Ok(Self::Txt),
            other => Err(RagError::UnsupportedFormat(format!(".{other}"))),
        }
    }
}

/// Extract the raw text of a file, dispatching on its extension.
///
/// Extraction failures abort the whole operation; there is no per-chunk or
/// per-page recovery beyond PDF pages with no extractable text, which
/// contribute an empty string.
pub fn extract_text(path: &Path) -> Result<String> {
    let kind = FileKind::from_path(path)?;
    debug!(path = %path.display(), ?kind, "extracting text");
    match kind {
        FileKind::Pdf => extract_pdf(path),
        FileKind::Docx => extract_docx(path),
        FileKind::Txt => extract_txt(path),
    }
}

/// Concatenate per-page PDF text in page order, one newline after each page.
fn extract_pdf(path: &Path) -> Result<String> {
    let doc = lopdf::Document::load(path).map_err(|e| RagError::ExtractionError {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let mut text = String::new();
    for page_number in doc.get_pages().keys() {
        // A page without extractable text is not an error.
        let page_text = doc.extract_text(&[*page_number]).unwrap_or_default();
        text.push_str(&page_text);
        text.push('\n');
    }
    Ok(text)
}

/// Concatenate DOCX paragraph text in document order, newline-separated.
fn extract_docx(path: &Path) -> Result<String> {
    let file = std::fs::File::open(path)?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| RagError::ExtractionError {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| RagError::ExtractionError {
            path: path.display().to_string(),
            message: format!("missing word/document.xml: {e}"),
        })?
        .read_to_string(&mut xml)
        .map_err(|e| RagError::DecodeError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    docx_paragraph_text(&xml).map_err(|message| RagError::ExtractionError {
        path: path.display().to_string(),
        message,
    })
}

/// Pull the text runs out of a WordprocessingML body, one line per `w:p`.
fn docx_paragraph_text(xml: &str) -> std::result::Result<String, String> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();

    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"w:t" => in_text_run = true,
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"w:t" => in_text_run = false,
                b"w:p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            Ok(Event::Text(e)) if in_text_run => {
                let run = e.unescape().map_err(|e| e.to_string())?;
                current.push_str(&run);
            }
            // Empty paragraphs still contribute a line, as document order demands.
            Ok(Event::Empty(ref e)) if e.name().as_ref() == b"w:p" => {
                paragraphs.push(String::new());
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.to_string()),
            _ => {}
        }
        buf.clear();
    }

    Ok(paragraphs.join("\n"))
}

/// Read a plain-text file as strict UTF-8.
fn extract_txt(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    String::from_utf8(bytes).map_err(|e| RagError::DecodeError {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}
