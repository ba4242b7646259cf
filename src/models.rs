use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Query request
#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

/// Query response: pattern detections and contextual analysis as one text block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    pub answer: String,
}

/// Upload response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub status: String,
    pub message: String,
    pub session_id: String,
    pub document_id: Uuid,
    pub filename: String,
    pub pages: usize,
    pub chunks: usize,
    pub uploaded_at: DateTime<Utc>,
}

/// GET / response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
}

/// GET /health response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub sessions: usize,
}
