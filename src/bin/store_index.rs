//! Builds the Pinecone index from the PDFs in the data directory.
//!
//! Only needs to run when the documents change: load PDFs, split them into
//! overlapping chunks, create the index if it is missing, then embed and
//! upsert every chunk in batches.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use medibot::indexing::{Step, print_step, run_indexing};
use medibot::init_tracing;
use rag::Config as RagConfig;
use tracing::info;

#[derive(Parser, Debug)]
#[command(version, about = "Index PDF documents into Pinecone")]
struct Args {
    /// Directory holding the PDF files (defaults to RAG_DATA_DIR or data/)
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();
    match run(args) {
        Ok(()) => {
            info!("Indexing process completed successfully!");
            ExitCode::SUCCESS
        }
        Err(err) => {
            print_step(&format!("An error occurred: {err:#}"), Step::Error);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    print_step("Loading environment variables...", Step::Start);
    let cfg = RagConfig::from_env();
    cfg.require_pinecone_key()?;
    print_step("Environment variables loaded", Step::Done);

    let data_dir = args.data_dir.unwrap_or_else(|| PathBuf::from(&cfg.data_dir));
    run_indexing(&cfg, &data_dir)?;
    Ok(())
}
