use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address
    pub bind_addr: String,
    /// Origin allowed to call the API from a browser (the upload UI)
    pub cors_origin: String,
    /// Maximum accepted upload size in MB
    pub max_upload_mb: usize,
    /// Maximum number of live sessions before the oldest is evicted
    pub max_sessions: usize,
    /// Text splitting and retrieval settings
    pub pipeline: PipelineConfig,
    /// LLM provider configuration
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Maximum characters per chunk
    pub chunk_size: usize,
    /// Characters shared between consecutive chunks
    pub chunk_overlap: usize,
    /// Number of chunks handed to the LLM per question
    pub retrieval_k: usize,
    /// Only the first N chunks are embedded (0 = all)
    pub max_index_chunks: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// "ollama" or "openai"
    pub provider: String,
    /// Base URL for the LLM API
    pub base_url: String,
    /// Model name for answering questions
    pub chat_model: String,
    /// Model name for embeddings
    pub embedding_model: String,
    /// API key (only needed for cloud providers)
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Sampling temperature for answers
    pub temperature: f32,
    /// Per-request timeout for chat completions, overriding the HTTP client's
    pub chat_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8000".to_string(),
            cors_origin: "http://localhost:5173".to_string(),
            max_upload_mb: 25,
            max_sessions: 64,
            pipeline: PipelineConfig::default(),
            llm: LlmConfig::default(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 100,
            retrieval_k: 4,
            max_index_chunks: 0,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            base_url: "http://localhost:11434".to_string(),
            chat_model: "llama3.2".to_string(),
            embedding_model: "nomic-embed-text".to_string(),
            api_key: None,
            temperature: 0.0,
            chat_timeout_secs: 300,
        }
    }
}

impl Config {
    /// Build the config from process environment, after loading `.env` if present.
    pub fn from_env() -> Self {
        if let Err(e) = dotenvy::dotenv() {
            tracing::debug!("No .env file loaded: {e}");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup. Unparseable values keep the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(addr) = lookup("DOCSENTRY_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Some(origin) = lookup("DOCSENTRY_CORS_ORIGIN") {
            config.cors_origin = origin;
        }
        if let Some(v) = parse(&lookup, "DOCSENTRY_MAX_UPLOAD_MB") {
            config.max_upload_mb = v;
        }
        if let Some(v) = parse(&lookup, "DOCSENTRY_MAX_SESSIONS") {
            config.max_sessions = v;
        }

        // Pipeline config
        if let Some(v) = parse(&lookup, "DOCSENTRY_CHUNK_SIZE") {
            config.pipeline.chunk_size = v;
        }
        if let Some(v) = parse(&lookup, "DOCSENTRY_CHUNK_OVERLAP") {
            config.pipeline.chunk_overlap = v;
        }
        if let Some(v) = parse(&lookup, "DOCSENTRY_RETRIEVAL_K") {
            config.pipeline.retrieval_k = v;
        }
        if let Some(v) = parse(&lookup, "DOCSENTRY_MAX_INDEX_CHUNKS") {
            config.pipeline.max_index_chunks = v;
        }

        // LLM config
        if let Some(provider) = lookup("LLM_PROVIDER") {
            config.llm.provider = provider;
        }
        if let Some(url) = lookup("LLM_BASE_URL") {
            config.llm.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(model) = lookup("LLM_CHAT_MODEL") {
            config.llm.chat_model = model;
        }
        if let Some(model) = lookup("LLM_EMBEDDING_MODEL") {
            config.llm.embedding_model = model;
        }
        config.llm.api_key = lookup("LLM_API_KEY").or_else(|| lookup("OPENAI_API_KEY"));
        if let Some(v) = parse::<f32, _>(&lookup, "LLM_TEMPERATURE") {
            config.llm.temperature = v.clamp(0.0, 2.0);
        }
        if let Some(v) = parse(&lookup, "LLM_CHAT_TIMEOUT_SECS") {
            config.llm.chat_timeout_secs = v;
        }

        config.normalize();
        config
    }

    /// Clamp values that would make the pipeline misbehave.
    fn normalize(&mut self) {
        let p = &mut self.pipeline;
        if p.chunk_size == 0 {
            p.chunk_size = PipelineConfig::default().chunk_size;
        }
        if p.chunk_overlap >= p.chunk_size {
            p.chunk_overlap = p.chunk_size / 10;
        }
        if p.retrieval_k == 0 {
            p.retrieval_k = 1;
        }
        if self.max_sessions == 0 {
            self.max_sessions = 1;
        }
        if self.llm.chat_timeout_secs == 0 {
            self.llm.chat_timeout_secs = LlmConfig::default().chat_timeout_secs;
        }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

fn parse<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_match_pipeline_settings() {
        let config = config_from(&[]);
        assert_eq!(config.pipeline.chunk_size, 1000);
        assert_eq!(config.pipeline.chunk_overlap, 100);
        assert_eq!(config.pipeline.retrieval_k, 4);
        assert_eq!(config.llm.temperature, 0.0);
        assert_eq!(config.bind_addr, "127.0.0.1:8000");
    }

    #[test]
    fn test_env_overrides() {
        let config = config_from(&[
            ("LLM_PROVIDER", "openai"),
            ("LLM_BASE_URL", "https://api.openai.com/"),
            ("DOCSENTRY_RETRIEVAL_K", "6"),
            ("DOCSENTRY_MAX_SESSIONS", "3"),
        ]);
        assert_eq!(config.llm.provider, "openai");
        assert_eq!(config.llm.base_url, "https://api.openai.com");
        assert_eq!(config.pipeline.retrieval_k, 6);
        assert_eq!(config.max_sessions, 3);
    }

    #[test]
    fn test_chat_timeout() {
        assert_eq!(config_from(&[]).llm.chat_timeout_secs, 300);
        let config = config_from(&[("LLM_CHAT_TIMEOUT_SECS", "45")]);
        assert_eq!(config.llm.chat_timeout_secs, 45);
        let config = config_from(&[("LLM_CHAT_TIMEOUT_SECS", "0")]);
        assert_eq!(config.llm.chat_timeout_secs, 300);
    }

    #[test]
    fn test_invalid_number_keeps_default() {
        let config = config_from(&[("DOCSENTRY_CHUNK_SIZE", "lots")]);
        assert_eq!(config.pipeline.chunk_size, 1000);
    }

    #[test]
    fn test_overlap_clamped_below_chunk_size() {
        let config = config_from(&[
            ("DOCSENTRY_CHUNK_SIZE", "200"),
            ("DOCSENTRY_CHUNK_OVERLAP", "500"),
        ]);
        assert_eq!(config.pipeline.chunk_overlap, 20);
    }

    #[test]
    fn test_openai_key_fallback() {
        let config = config_from(&[("OPENAI_API_KEY", "sk-test")]);
        assert_eq!(config.llm.api_key.as_deref(), Some("sk-test"));

        let config = config_from(&[("OPENAI_API_KEY", "sk-a"), ("LLM_API_KEY", "sk-b")]);
        assert_eq!(config.llm.api_key.as_deref(), Some("sk-b"));
    }

    #[test]
    fn test_api_key_not_serialized() {
        let config = config_from(&[("LLM_API_KEY", "secret")]);
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
    }
}
