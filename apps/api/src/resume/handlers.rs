//! Axum route handlers for the Resume API.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use tracing::info;

use crate::errors::AppError;
use crate::profile::Profile;
use crate::state::AppState;

/// Multipart field carrying the document.
pub const RESUME_FIELD: &str = "resume";

struct Upload {
    filename: String,
    bytes: Bytes,
}

/// POST /api/v1/resumes/parse
///
/// Accepts a multipart upload with a `resume` file field and returns the parsed profile.
/// The upload lives in memory for the duration of the request only.
pub async fn handle_parse_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Profile>, AppError> {
    let upload = read_upload(&mut multipart).await?;
    info!(
        "Received resume upload '{}' ({} bytes)",
        upload.filename,
        upload.bytes.len()
    );

    let profile = state.parser.parse(upload.bytes).await?;
    Ok(Json(profile))
}

async fn read_upload(multipart: &mut Multipart) -> Result<Upload, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(invalid_multipart)? {
        if field.name() != Some(RESUME_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        if filename.is_empty() {
            return Err(AppError::Validation("No file selected".to_string()));
        }

        let bytes = field.bytes().await.map_err(invalid_multipart)?;
        return Ok(Upload {
            filename: secure_filename(&filename),
            bytes,
        });
    }

    Err(AppError::Validation("No file uploaded".to_string()))
}

/// The body limit surfaces as a multipart read error; it keeps its 413 status.
fn invalid_multipart(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge(e.body_text());
    }
    AppError::Validation(format!("Invalid multipart body: {}", e.body_text()))
}

/// Reduces a client-supplied filename to a safe, log-friendly form:
/// directory components dropped, whitespace → `_`, only `[A-Za-z0-9._-]` kept,
/// no leading dots or underscores.
pub fn secure_filename(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();
    cleaned.trim_start_matches(['.', '_']).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secure_filename_strips_directories() {
        assert_eq!(secure_filename("../../etc/passwd"), "passwd");
        assert_eq!(secure_filename("C:\\Users\\jane\\cv.pdf"), "cv.pdf");
    }

    #[test]
    fn test_secure_filename_replaces_whitespace_and_symbols() {
        assert_eq!(secure_filename("My Resume (final).pdf"), "My_Resume_final.pdf");
    }

    #[test]
    fn test_secure_filename_drops_leading_dots() {
        assert_eq!(secure_filename(".hidden.pdf"), "hidden.pdf");
        assert_eq!(secure_filename(".."), "");
    }

    #[test]
    fn test_secure_filename_drops_non_ascii() {
        assert_eq!(secure_filename("résumé.pdf"), "rsum.pdf");
    }
}
