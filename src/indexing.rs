use std::path::Path;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rag::{
    Config as RagConfig, connect_index, ensure_index, load_pdf_dir, split_documents,
    upsert_chunks,
};
use tracing::{error, info};

#[derive(Clone, Copy, Debug)]
pub enum Step {
    Start,
    Done,
    Skip,
    Error,
}

pub fn print_step(message: &str, status: Step) {
    match status {
        Step::Start => info!("🔄 {message}"),
        Step::Done => info!("✅ {message}"),
        Step::Skip => info!("⏩ {message}"),
        Step::Error => error!("❌ {message}"),
    }
}

/// Loads and splits the PDFs in `data_dir`, makes sure the index exists, then
/// embeds and upserts every chunk. Returns the number of upserted vectors.
pub fn run_indexing(cfg: &RagConfig, data_dir: &Path) -> Result<usize> {
    print_step(
        &format!("Loading PDF documents from {}...", data_dir.display()),
        Step::Start,
    );
    let documents = load_pdf_dir(data_dir)
        .with_context(|| format!("failed to load PDFs from {}", data_dir.display()))?;
    print_step(&format!("Loaded {} documents", documents.len()), Step::Done);

    print_step("Splitting documents into chunks...", Step::Start);
    let chunks = split_documents(&documents, cfg);
    print_step(&format!("Split into {} chunks", chunks.len()), Step::Done);

    print_step(
        &format!("Using embedding model '{}' at {}", cfg.embed_model, cfg.ollama_url),
        Step::Done,
    );

    print_step(
        &format!("Checking if index '{}' exists...", cfg.index_name),
        Step::Start,
    );
    if ensure_index(cfg)? {
        print_step(&format!("Index '{}' created and ready", cfg.index_name), Step::Done);
    } else {
        print_step(&format!("Index '{}' already exists.", cfg.index_name), Step::Skip);
    }
    let index = connect_index(cfg)?;

    if chunks.is_empty() {
        print_step("No text found, nothing to upsert", Step::Skip);
        return Ok(0);
    }

    print_step(
        &format!(
            "Upserting {} chunks to Pinecone in batches of {}...",
            chunks.len(),
            cfg.batch_size
        ),
        Step::Start,
    );
    let bar = ProgressBar::new(chunks.len() as u64);
    bar.set_style(
        ProgressStyle::with_template(
            "[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} chunks",
        )?
        .progress_chars("##-"),
    );
    let upserted = upsert_chunks(cfg, &index, &chunks, |report| {
        bar.println(format!(
            "✅ Upserted chunks {}-{} (upserted: {})",
            report.start,
            report.end - 1,
            report.upserted
        ));
        bar.inc((report.end - report.start) as u64);
    })
    .context("upsert failed")?;
    bar.finish_and_clear();

    print_step(
        &format!("Upsert completed successfully ({upserted} vectors)"),
        Step::Done,
    );
    Ok(upserted)
}
