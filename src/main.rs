use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use call_coach::analysis::AnalysisCoordinator;
use call_coach::job::{InMemoryJobStore, JobStore};
use call_coach::knowledge::KnowledgeBase;
use call_coach::llm::{ChatCompletionsClient, LanguageModel};
use call_coach::pipeline::{Pipeline, PipelineConfig};
use call_coach::storage::{BlobStore, FsBlobStore, UploadSlots};
use call_coach::transcribe::{HttpTranscriber, Transcriber};
use call_coach::{create_router, AppState, Config};
use clap::Parser;
use tracing::info;

#[derive(Parser)]
#[command(name = "call-coach", about = "Sales call coaching pipeline service")]
struct Args {
    /// Config file (without extension), as understood by the config crate
    #[arg(long, default_value = "config/call-coach")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("{} starting", cfg.service.name);

    let store: Arc<dyn JobStore> = Arc::new(InMemoryJobStore::new());
    let blobs: Arc<dyn BlobStore> = Arc::new(FsBlobStore::new(&cfg.storage.root));
    let transcriber: Arc<dyn Transcriber> = Arc::new(HttpTranscriber::new(&cfg.transcribe.base_url));

    let llm: Arc<dyn LanguageModel> = Arc::new(ChatCompletionsClient::new(
        &cfg.llm.base_url,
        &cfg.llm.api_key,
        &cfg.llm.model,
        cfg.llm.temperature,
    ));

    let knowledge = Arc::new(KnowledgeBase::load(
        Path::new(&cfg.knowledge.path),
        cfg.knowledge.chunk_size,
        cfg.knowledge.chunk_overlap,
    ));

    let coordinator = AnalysisCoordinator::new(llm, knowledge, cfg.knowledge.top_k);

    let pipeline = Arc::new(Pipeline::new(
        Arc::clone(&store),
        Arc::clone(&blobs),
        transcriber,
        coordinator,
        PipelineConfig {
            poll_interval: Duration::from_secs(cfg.transcribe.poll_interval_secs),
            poll_timeout: Duration::from_secs(cfg.transcribe.timeout_secs),
            job_prefix: cfg.transcribe.job_prefix.clone(),
            audio_prefix: cfg.storage.audio_prefix.clone(),
            transcript_prefix: cfg.storage.transcript_prefix.clone(),
        },
    ));

    let uploads = Arc::new(UploadSlots::new(Duration::from_secs(
        cfg.storage.upload_ttl_secs,
    )));

    let state = AppState {
        store,
        blobs,
        pipeline,
        uploads,
        service_name: cfg.service.name.clone(),
        public_base_url: cfg.service.http.public_base_url.clone(),
    };

    let app = create_router(state);
    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);

    info!("HTTP server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
