use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{RagError, Result};

/// PDF files directly inside `dir`, sorted by path. Subdirectories are ignored.
pub fn scan_pdf_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let walker = WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name();

    let mut results = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| RagError::Io {
            path: dir.display().to_string(),
            source: e.into(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if is_pdf(entry.path()) {
            results.push(entry.into_path());
        }
    }

    Ok(results)
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}
