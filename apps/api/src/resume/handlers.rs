use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::{HeaderValue, StatusCode},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::resume::ingest::{parse_resume, UploadedResume};
use crate::resume::ResumeRecord;
use crate::state::AppState;

pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Debug, Serialize)]
pub struct ParseResumeResponse {
    pub success: bool,
    pub message: &'static str,
    pub data: ResumeRecord,
}

/// POST /api/resume-parse
///
/// Multipart form with a `user_id` text field and a `file` part (PDF or DOCX).
#[tracing::instrument(
    skip_all,
    fields(request_id = %uuid::Uuid::new_v4(), user_id = tracing::field::Empty)
)]
pub async fn handle_parse_resume(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<([(&'static str, HeaderValue); 1], Json<ParseResumeResponse>), AppError> {
    let upload = read_upload(multipart, &state).await?;
    let user_header = HeaderValue::from_str(&upload.user_id)
        .map_err(|_| AppError::Validation("user_id contains invalid characters".to_string()))?;

    tracing::Span::current().record("user_id", upload.user_id.as_str());
    info!(filename = %upload.filename, "resume upload received");
    let record = parse_resume(upload, state.llm.as_ref(), &state.config).await?;

    Ok((
        [(USER_ID_HEADER, user_header)],
        Json(ParseResumeResponse {
            success: true,
            message: "Resume parsed successfully",
            data: record,
        }),
    ))
}

async fn read_upload(mut multipart: Multipart, state: &AppState) -> Result<UploadedResume, AppError> {
    let mut user_id: Option<String> = None;
    let mut file: Option<(String, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, state))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("user_id") => {
                let value = field.text().await.map_err(|e| multipart_error(e, state))?;
                user_id = Some(value.trim().to_string());
            }
            Some("file") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let data = field.bytes().await.map_err(|e| multipart_error(e, state))?;
                file = Some((filename, data));
            }
            _ => {}
        }
    }

    let user_id = user_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::Validation("user_id is required".to_string()))?;
    let (filename, data) =
        file.ok_or_else(|| AppError::Validation("file is required".to_string()))?;
    if data.is_empty() {
        return Err(AppError::Validation("file is empty".to_string()));
    }

    Ok(UploadedResume {
        user_id,
        filename,
        data,
    })
}

fn multipart_error(err: MultipartError, state: &AppState) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::FileTooLarge {
            max_mb: state.config.max_file_size_mb,
        }
    } else {
        AppError::Validation(format!("Invalid multipart body: {}", err.body_text()))
    }
}
