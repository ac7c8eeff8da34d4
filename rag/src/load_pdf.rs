//! PDF text extraction, one `Document` per page.
//!
//! `pdf-extract` handles font encodings better, so it goes first. `lopdf` is
//! the fallback for files it rejects or panics on.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;

use tracing::{info, warn};

use crate::error::{RagError, Result};
use crate::scan_files::scan_pdf_files;

/// Text of a single PDF page plus where it came from.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub text: String,
    pub source: String,
    /// Zero-based page number.
    pub page: u32,
}

pub fn load_pdf_dir(dir: &Path) -> Result<Vec<Document>> {
    let files = scan_pdf_files(dir)?;
    info!(dir = %dir.display(), files = files.len(), "found PDF files");

    let mut documents = Vec::new();
    for path in files {
        let pages = load_pdf_file(&path)?;
        info!(file = %path.display(), pages = pages.len(), "loaded PDF");
        documents.extend(pages);
    }
    Ok(documents)
}

pub fn load_pdf_file(path: &Path) -> Result<Vec<Document>> {
    let source = path.to_string_lossy().to_string();
    let pages = match extract_with_pdf_extract(path) {
        Ok(pages) => pages,
        Err(primary) => {
            warn!(file = %source, error = %primary, "pdf-extract failed, trying lopdf fallback");
            extract_with_lopdf(path).map_err(|fallback| RagError::Pdf {
                path: source.clone(),
                message: format!("{primary}; lopdf fallback: {fallback}"),
            })?
        }
    };

    Ok(pages
        .into_iter()
        .enumerate()
        .filter(|(_, text)| !text.trim().is_empty())
        .map(|(page, text)| Document {
            text,
            source: source.clone(),
            page: page as u32,
        })
        .collect())
}

fn extract_with_pdf_extract(path: &Path) -> std::result::Result<Vec<String>, String> {
    // pdf-extract panics on some malformed font tables
    match catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_by_pages(path))) {
        Ok(Ok(pages)) => Ok(pages),
        Ok(Err(e)) => Err(e.to_string()),
        Err(_) => Err("pdf-extract panicked".to_string()),
    }
}

fn extract_with_lopdf(path: &Path) -> std::result::Result<Vec<String>, String> {
    let doc = lopdf::Document::load(path).map_err(|e| e.to_string())?;
    let pages = doc
        .get_pages()
        .keys()
        .map(|page_num| (*page_num, doc.extract_text(&[*page_num])))
        .collect::<Vec<_>>();
    collect_pages(pages)
}

/// Failed pages become blank; the file only fails if every page did.
fn collect_pages<E: std::fmt::Display>(
    pages: Vec<(u32, std::result::Result<String, E>)>,
) -> std::result::Result<Vec<String>, String> {
    let total = pages.len();
    let mut failed = 0usize;
    let mut out = Vec::with_capacity(total);
    for (page_num, result) in pages {
        match result {
            Ok(text) => out.push(text),
            Err(e) => {
                warn!(page = page_num, error = %e, "lopdf could not extract page text");
                failed += 1;
                out.push(String::new());
            }
        }
    }
    if total > 0 && failed == total {
        return Err(format!("lopdf could not extract any of {total} pages"));
    }
    Ok(out)
}
