use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::rag::{DocumentPipeline, RagPipeline};
use crate::session::SessionStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub sessions: Arc<SessionStore>,
    pub pipeline: Arc<dyn DocumentPipeline>,
}

impl AppState {
    /// State backed by the real PDF → embeddings → LLM pipeline.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(120))
            .build()?;
        let pipeline = RagPipeline::new(http_client, &config);
        Ok(Self::with_pipeline(config, Arc::new(pipeline)))
    }

    /// State with a caller-provided pipeline.
    pub fn with_pipeline(config: Config, pipeline: Arc<dyn DocumentPipeline>) -> Self {
        let sessions = SessionStore::new(config.max_sessions);
        Self {
            config: Arc::new(config),
            sessions: Arc::new(sessions),
            pipeline,
        }
    }
}
