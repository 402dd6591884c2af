use bytes::Bytes;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::document::{self, ExtractionError, FileKind};
use crate::errors::AppError;
use crate::llm_client::CompletionBackend;
use crate::resume::prompts::{build_parse_prompt, resume_parse_system};
use crate::resume::{parse_model_output, ResumeRecord};

/// One uploaded resume file as received from the multipart form.
#[derive(Debug, Clone)]
pub struct UploadedResume {
    pub user_id: String,
    pub filename: String,
    pub data: Bytes,
}

/// Full parse flow for one upload:
/// 1. file type against the allow-list
/// 2. size limit
/// 3. text + hyperlink extraction (blocking pool)
/// 4. LLM call with the extracted text and hints
/// 5. normalize → validate the model output
pub async fn parse_resume(
    upload: UploadedResume,
    llm: &dyn CompletionBackend,
    config: &Config,
) -> Result<ResumeRecord, AppError> {
    let kind = document::validate_file_type(&upload.filename, &config.allowed_file_types)?;

    if upload.data.len() > config.max_file_size_bytes() {
        return Err(AppError::FileTooLarge {
            max_mb: config.max_file_size_mb,
        });
    }

    let file_hash = format!("{:x}", Sha256::digest(&upload.data));
    info!(
        user_id = %upload.user_id,
        file_type = kind.as_str(),
        size = upload.data.len(),
        file_hash = %file_hash,
        "parsing resume upload"
    );

    let extracted = extract_blocking(upload.data, kind).await?;
    if extracted.text.trim().is_empty() {
        return Err(AppError::EmptyDocument);
    }
    debug!(
        text_len = extracted.text.len(),
        hints = extracted.hints.len(),
        "document extracted"
    );

    let prompt = build_parse_prompt(&extracted.text, &extracted.hints);
    let raw = llm
        .complete(resume_parse_system(), &prompt)
        .await
        .map_err(|e| AppError::Llm(format!("Failed to parse resume: {e}")))?;
    debug!(model = llm.model(), response_len = raw.len(), "LLM responded");

    let record = parse_model_output(&raw, &extracted.hints)?;
    info!(user_id = %upload.user_id, file_hash = %file_hash, "resume parsed");
    Ok(record)
}

async fn extract_blocking(
    data: Bytes,
    kind: FileKind,
) -> Result<document::ExtractedDocument, AppError> {
    run_extraction(move || document::extract(&data, kind)).await
}

/// Runs an extraction job on the blocking pool. A parser panic is treated as
/// an unreadable document rather than a server fault.
async fn run_extraction<F>(job: F) -> Result<document::ExtractedDocument, AppError>
where
    F: FnOnce() -> Result<document::ExtractedDocument, ExtractionError> + Send + 'static,
{
    match tokio::task::spawn_blocking(job).await {
        Ok(result) => Ok(result?),
        Err(e) if e.is_panic() => {
            warn!("document parser panicked");
            Err(AppError::Extraction(ExtractionError::ParserPanic))
        }
        Err(e) => Err(AppError::Internal(anyhow::anyhow!(
            "extraction task failed: {e}"
        ))),
    }
}
