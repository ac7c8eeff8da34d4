use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use axum::Router;
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::{get, post};
use clap::Parser;
use medibot::init_tracing;
use rag::{Config as RagConfig, IndexHandle, answer_query, connect_index};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

const CHAT_PAGE: &str = include_str!("../templates/chat.html");

/// Medical chatbot web server.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Address to listen on
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    bind: String,
}

#[derive(Clone)]
struct AppState {
    rag_cfg: Arc<RagConfig>,
    index: Arc<IndexHandle>,
}

#[derive(Deserialize)]
struct ChatForm {
    msg: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let started = Instant::now();
    init_tracing();
    let args = Args::parse();

    info!("loading configuration");
    let rag_cfg = Arc::new(RagConfig::from_env());
    if rag_cfg.pinecone_api_key.is_none() {
        error!("PINECONE_API_KEY not found!");
    }
    if rag_cfg.openai_api_key.is_none() {
        error!("OPENAI_API_KEY not found!");
    }
    info!(model = %rag_cfg.embed_model, url = %rag_cfg.ollama_url, "using embedding model");

    info!(index = %rag_cfg.index_name, "connecting to Pinecone index");
    let cfg = rag_cfg.clone();
    let index = tokio::task::spawn_blocking(move || connect_index(&cfg))
        .await?
        .context("failed to connect to Pinecone index")?;

    info!(
        "app initialization completed in {:.2} seconds",
        started.elapsed().as_secs_f64()
    );

    let state = AppState {
        rag_cfg,
        index: Arc::new(index),
    };
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&args.bind)
        .await
        .with_context(|| format!("failed to bind {}", args.bind))?;
    info!("listening on http://{}/", args.bind);

    axum::serve(listener, app).await?;

    info!(
        "server exited, total runtime {:.2} seconds",
        started.elapsed().as_secs_f64()
    );
    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(chat_page))
        .route("/get", post(chat))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn chat_page() -> Html<&'static str> {
    Html(CHAT_PAGE)
}

async fn chat(
    State(state): State<AppState>,
    Form(form): Form<ChatForm>,
) -> Result<String, (StatusCode, String)> {
    if form.msg.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "msg must not be empty".to_string()));
    }

    info!(input = %form.msg, "running RAG chain");
    let rag_cfg = state.rag_cfg.clone();
    let index = state.index.clone();
    let msg = form.msg;
    let result = tokio::task::spawn_blocking(move || answer_query(&rag_cfg, &index, &msg)).await;

    match result {
        Ok(Ok((_context, answer))) => Ok(answer),
        Ok(Err(err)) => {
            error!(error = %err, "RAG chain failed");
            Err((StatusCode::INTERNAL_SERVER_ERROR, format!("Error: {err}")))
        }
        Err(err) => {
            error!(error = %err, "RAG task panicked");
            Err((StatusCode::INTERNAL_SERVER_ERROR, "Error: internal failure".to_string()))
        }
    }
}
