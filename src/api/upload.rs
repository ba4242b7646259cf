use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;

use crate::error::{ApiError, ApiResult};
use crate::models::UploadResponse;
use crate::session::{Session, SessionId};
use crate::state::AppState;

/// Multipart field that carries the PDF.
const FILE_FIELD: &str = "file";

/// POST /upload - Process a PDF and make it the caller's current document.
///
/// The filename is checked before any bytes are handed to the pipeline. The
/// caller's previous document stays live until the new one is fully built.
pub async fn upload(
    State(state): State<AppState>,
    session_id: SessionId,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<UploadResponse>> {
    let mut multipart = multipart?;
    let (filename, bytes) = read_pdf_field(&mut multipart).await?;
    tracing::info!(
        "Session {session_id}: processing {filename} ({} bytes)",
        bytes.len()
    );

    let document = state
        .pipeline
        .build(&filename, bytes)
        .await
        .map_err(|e| ApiError::internal("Failed to process the document", e))?;

    let session = Session::new(session_id.clone(), document);
    let response = UploadResponse {
        status: "success".to_string(),
        message: "Document processed successfully.".to_string(),
        session_id: session_id.to_string(),
        document_id: session.document.id,
        filename: session.document.filename.clone(),
        pages: session.document.page_count,
        chunks: session.document.chunk_count,
        uploaded_at: session.uploaded_at,
    };
    state.sessions.replace(session);

    Ok(Json(response))
}

/// Pull the `file` field out of the form, rejecting anything that is not a PDF.
async fn read_pdf_field(multipart: &mut Multipart) -> ApiResult<(String, Vec<u8>)> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        check_pdf_filename(&filename)?;

        let bytes = field.bytes().await?;
        if bytes.is_empty() {
            return Err(ApiError::validation("Uploaded file is empty."));
        }
        return Ok((filename, bytes.to_vec()));
    }

    Err(ApiError::validation(format!(
        "No file uploaded. Send the PDF in a multipart field named \"{FILE_FIELD}\"."
    )))
}

/// Only `.pdf` filenames are accepted (case-insensitive).
pub fn check_pdf_filename(filename: &str) -> ApiResult<()> {
    if filename.to_ascii_lowercase().ends_with(".pdf") {
        Ok(())
    } else {
        Err(ApiError::validation("Only PDF files are allowed."))
    }
}
