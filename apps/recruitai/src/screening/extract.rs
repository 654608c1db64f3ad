//! Text extraction for staged uploads.
//!
//! Extraction never fails the request on its own: an unreadable file yields an
//! empty string and the caller decides whether empty text is acceptable.

use std::path::Path;

use anyhow::{Context, Result};
use docx_rs::{DocumentChild, ParagraphChild, RunChild};
use tracing::{error, warn};

use crate::screening::uploads::{file_extension, DocumentKind};

/// Extracts plain text from a staged PDF, DOCX or TXT file.
/// CPU-bound; callers on the async runtime go through `extract_text_blocking`.
pub fn extract_text(path: &Path) -> String {
    let ext = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(file_extension)
        .unwrap_or_default();

    let Some(kind) = DocumentKind::from_extension(&ext) else {
        warn!("Unsupported file type: .{ext}");
        return String::new();
    };

    let result = match kind {
        DocumentKind::Txt => read_txt(path),
        DocumentKind::Pdf => read_pdf(path),
        DocumentKind::Docx => read_docx(path),
    };

    result.unwrap_or_else(|e| {
        error!("Error extracting text from {}: {e:#}", path.display());
        String::new()
    })
}

/// Runs `extract_text` on the blocking pool.
pub async fn extract_text_blocking(path: &Path) -> String {
    let owned = path.to_path_buf();
    match tokio::task::spawn_blocking(move || extract_text(&owned)).await {
        Ok(text) => text,
        Err(e) => {
            error!("spawn_blocking failed extracting {}: {e}", path.display());
            String::new()
        }
    }
}

fn read_txt(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).context("reading text file")?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn read_pdf(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).context("reading PDF")?;
    pdf_extract::extract_text_from_mem(&bytes).context("parsing PDF")
}

fn read_docx(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).context("reading DOCX")?;
    let docx = docx_rs::read_docx(&bytes).context("parsing DOCX")?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(p) => Some(paragraph_text(&p.children)),
            _ => None,
        })
        .filter(|text| !text.trim().is_empty())
        .collect();

    Ok(paragraphs.join("\n"))
}

fn paragraph_text(children: &[ParagraphChild]) -> String {
    let mut text = String::new();
    for child in children {
        if let ParagraphChild::Run(run) = child {
            for run_child in &run.children {
                if let RunChild::Text(t) = run_child {
                    text.push_str(&t.text);
                }
            }
        }
    }
    text
}
