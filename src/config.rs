use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub transcribe: TranscribeConfig,
    pub storage: StorageConfig,
    pub llm: LlmConfig,
    pub knowledge: KnowledgeConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
    /// Base URL minted upload URLs point back at
    pub public_base_url: String,
}

#[derive(Debug, Deserialize)]
pub struct TranscribeConfig {
    pub base_url: String,
    pub poll_interval_secs: u64,
    pub timeout_secs: u64,
    pub job_prefix: String,
}

#[derive(Debug, Deserialize)]
pub struct StorageConfig {
    pub root: String,
    pub audio_prefix: String,
    pub transcript_prefix: String,
    pub upload_ttl_secs: u64,
}

#[derive(Debug, Deserialize)]
pub struct LlmConfig {
    pub base_url: String,
    /// Usually supplied via CALL_COACH__LLM__API_KEY
    #[serde(default)]
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
}

#[derive(Debug, Deserialize)]
pub struct KnowledgeConfig {
    pub path: String,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub top_k: usize,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("CALL_COACH").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
