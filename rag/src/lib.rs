mod build_prompt;
mod chunk_text;
mod config;
mod embed_chunks;
mod embed_query;
mod error;
mod generate;
mod http;
mod load_pdf;
mod retrieve_chunks;
mod scan_files;
mod store_pinecone;

pub use build_prompt::{build_prompt_with_context, Message};
pub use chunk_text::{chunk_text, split_documents, Chunk};
pub use config::Config;
pub use embed_chunks::embed_texts;
pub use embed_query::embed_query;
pub use error::{RagError, Result};
pub use generate::generate_answer;
pub use load_pdf::{load_pdf_dir, load_pdf_file, Document};
pub use retrieve_chunks::{match_texts, retrieve_top, Match};
pub use scan_files::scan_pdf_files;
pub use store_pinecone::{connect_index, ensure_index, IndexHandle};

use store_pinecone::{upsert_vectors, Vector, VectorMetadata};

use tracing::info;

/// Outcome of one embed + upsert batch; `end` is exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchReport {
    pub start: usize,
    pub end: usize,
    pub upserted: usize,
}

pub fn upsert_chunks<F>(
    cfg: &Config,
    index: &IndexHandle,
    chunks: &[Chunk],
    mut on_batch: F,
) -> Result<usize>
where
    F: FnMut(BatchReport),
{
    let batch_size = cfg.batch_size.max(1);
    let mut total = 0usize;

    for (batch_no, batch) in chunks.chunks(batch_size).enumerate() {
        let start = batch_no * batch_size;
        let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
        let vectors = embed_texts(cfg, &texts)?;

        let records: Vec<Vector> = batch
            .iter()
            .zip(vectors)
            .enumerate()
            .map(|(idx, (chunk, values))| Vector {
                id: format!("chunk-{}", start + idx),
                values,
                metadata: VectorMetadata {
                    source: chunk.source.clone(),
                    page: chunk.page,
                    text: chunk.text.clone(),
                },
            })
            .collect();

        let upserted = upsert_vectors(cfg, index, &records)?;
        total += upserted;
        on_batch(BatchReport {
            start,
            end: start + batch.len(),
            upserted,
        });
    }

    Ok(total)
}

/// Embeds the question, retrieves the closest chunks and asks the model.
/// Returns `(context, answer)`.
pub fn answer_query(cfg: &Config, index: &IndexHandle, question: &str) -> Result<(String, String)> {
    info!(top_k = cfg.top_k, "retrieving similar chunks");
    let query_vec = embed_query(cfg, question)?;
    let matches = retrieve_top(cfg, index, &query_vec)?;
    info!(matches = matches.len(), "vector query completed");

    let texts = match_texts(&matches);
    info!(chunks = texts.len(), "retrieved context chunks");

    let (messages, context) = build_prompt_with_context(cfg, question, &texts);
    info!(model = %cfg.chat_model, "sending prompt to LLM");
    let answer = generate_answer(cfg, &messages)?;
    info!("LLM response generated");
    Ok((context, answer))
}
