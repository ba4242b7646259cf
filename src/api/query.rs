use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use crate::detect::{format_answer, hybrid_analysis};
use crate::error::{ApiError, ApiResult};
use crate::models::{QueryRequest, QueryResponse};
use crate::session::SessionId;
use crate::state::AppState;

const MAX_QUERY_CHARS: usize = 2000;

/// POST /query - Answer a question about the caller's current document.
///
///   1. Retrieval chain produces the contextual (LLM) analysis
///   2. Regex rules scan the full document text
///   3. Both are rendered into one answer
pub async fn query(
    State(state): State<AppState>,
    session_id: SessionId,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> ApiResult<Json<QueryResponse>> {
    let Json(req) = payload?;
    let question = req.query.trim();
    if question.is_empty() {
        return Err(ApiError::validation("Query is required"));
    }
    let question = truncate_chars(question, MAX_QUERY_CHARS);

    let session = state
        .sessions
        .get(&session_id)
        .ok_or(ApiError::NoDocument)?;

    let contextual = session
        .document
        .chain
        .query(&question)
        .await
        .map_err(|e| ApiError::internal("Error processing query", e))?;

    let result = hybrid_analysis(&session.document.text, &contextual);
    Ok(Json(QueryResponse {
        answer: format_answer(&result),
    }))
}

/// Keep at most `max_chars` characters.
fn truncate_chars(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_string() {
        assert_eq!(truncate_chars("find emails", 100), "find emails");
    }

    #[test]
    fn test_truncate_long_string() {
        let long = "a".repeat(3000);
        assert_eq!(truncate_chars(&long, MAX_QUERY_CHARS).len(), MAX_QUERY_CHARS);
    }

    #[test]
    fn test_truncate_counts_characters_not_bytes() {
        let accented = "é".repeat(3000);
        assert_eq!(truncate_chars(&accented, MAX_QUERY_CHARS).chars().count(), MAX_QUERY_CHARS);

        let mixed = format!("{}{}", "a".repeat(1999), "🔒🔒");
        let result = truncate_chars(&mixed, MAX_QUERY_CHARS);
        assert_eq!(result.chars().count(), MAX_QUERY_CHARS);
        assert!(result.ends_with('🔒'));
    }
}
