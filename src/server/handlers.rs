// HTTP handlers

use axum::{
    extract::{multipart::Field, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::ForgeError;
use crate::ingest::compose_task;

use super::AppState;

/// Error responses, all rendered as `{"detail": ...}`
#[derive(Debug)]
pub enum ApiError {
    PayloadTooLarge,
    MissingDescription,
    BadRequest(String),
    Run(ForgeError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::PayloadTooLarge => (StatusCode::PAYLOAD_TOO_LARGE, "File too large".to_string()),
            ApiError::MissingDescription => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "description field is required".to_string(),
            ),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Run(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("error:{e}")),
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

impl From<axum::extract::multipart::MultipartError> for ApiError {
    fn from(e: axum::extract::multipart::MultipartError) -> Self {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge
        } else {
            ApiError::BadRequest(format!("invalid multipart body: {}", e.body_text()))
        }
    }
}

struct Upload {
    filename: String,
    bytes: Vec<u8>,
}

/// Read a file field, stopping as soon as it exceeds `limit` bytes
async fn read_limited(mut field: Field<'_>, limit: usize) -> Result<Vec<u8>, ApiError> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.chunk().await? {
        if bytes.len() + chunk.len() > limit {
            return Err(ApiError::PayloadTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

/// `POST /api/generate`
///
/// Multipart form with an optional `file` and a required `description`.
pub async fn handle_generate(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut upload: Option<Upload> = None;
    let mut description: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = read_limited(field, state.max_upload_bytes).await?;
                // A file input left empty by the browser arrives with no name and no bytes
                if !(filename.is_empty() && bytes.is_empty()) {
                    upload = Some(Upload { filename, bytes });
                }
            }
            "description" => {
                description = Some(field.text().await?);
            }
            _ => {}
        }
    }

    let description = description.ok_or(ApiError::MissingDescription)?;

    let task = compose_task(
        upload
            .as_ref()
            .map(|u| (u.filename.as_str(), u.bytes.as_slice())),
        &description,
    );

    info!(
        upload = ?upload.as_ref().map(|u| u.filename.as_str()),
        task_chars = task.len(),
        "Generation requested"
    );

    match state.coordinator.run(&task).await {
        Ok(result) => Ok(Json(json!({ "status": "success", "result": result }))),
        Err(e) => {
            warn!(error = %e, "Generation failed");
            Err(ApiError::Run(e))
        }
    }
}

/// `GET /health`
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "provider": state.provider,
        "model": state.model,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::Role;

    async fn detail(response: Response) -> (StatusCode, String) {
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        (status, value["detail"].as_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn test_error_responses() {
        assert_eq!(
            detail(ApiError::PayloadTooLarge.into_response()).await,
            (StatusCode::PAYLOAD_TOO_LARGE, "File too large".to_string())
        );
        assert_eq!(
            detail(ApiError::MissingDescription.into_response()).await.0,
            StatusCode::UNPROCESSABLE_ENTITY
        );

        let err = ForgeError::MaxRevisionsExceeded {
            role: Role::Backend,
            revisions: 3,
        };
        let (status, msg) = detail(ApiError::Run(err).into_response()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(msg, "error:max revisions exceeded for backend after 3 revision(s)");
    }
}
