use crate::config::Config;
use crate::load_pdf::Document;

#[derive(Clone, Debug, PartialEq)]
pub struct Chunk {
    pub text: String,
    pub source: String,
    pub page: u32,
}

pub fn split_documents(documents: &[Document], cfg: &Config) -> Vec<Chunk> {
    documents
        .iter()
        .flat_map(|doc| {
            chunk_text(&doc.text, cfg.chunk_size, cfg.chunk_overlap)
                .into_iter()
                .map(move |text| Chunk {
                    text,
                    source: doc.source.clone(),
                    page: doc.page,
                })
        })
        .collect()
}

pub fn chunk_text(text: &str, size: usize, overlap: usize) -> Vec<String> {
    let mut overlap = overlap;

    if size == 0 {
        return vec![text.to_string()];
    }
    if overlap >= size {
        overlap = size / 4;
    }

    let mut chunks = Vec::new();
    let mut start = 0usize;
    let chars: Vec<char> = text.chars().collect();
    let len_chars = chars.len();

    while start < len_chars {
        let end = (start + size).min(len_chars);
        let chunk_str: String = chars[start..end].iter().collect();
        let trimmed = chunk_str.trim();
        if !trimmed.is_empty() {
            chunks.push(trimmed.to_string());
        }
        if end == len_chars {
            break;
        }
        start = end - overlap;
    }

    chunks
}
