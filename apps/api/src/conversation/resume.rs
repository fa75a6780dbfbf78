//! Résumé intake. Validates uploads and turns browser data URLs into plain text.
//!
//! The web client reads files with `FileReader.readAsDataURL`, so uploads arrive either
//! as plain text or as `data:<mime>;base64,<payload>`. PDFs are text-extracted;
//! text payloads are decoded; anything else is stored as received.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::{debug, warn};

use crate::errors::AppError;

pub const MIN_RESUME_CHARS: usize = 20;

/// A parsed `data:` URL. Only the parts the intake cares about.
#[derive(Debug, PartialEq, Eq)]
struct DataUrl<'a> {
    mime: &'a str,
    base64: bool,
    payload: &'a str,
}

fn parse_data_url(raw: &str) -> Option<DataUrl<'_>> {
    let rest = raw.strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    let mut parts = header.split(';');
    let mime = parts.next().unwrap_or_default();
    let base64 = parts.any(|p| p.eq_ignore_ascii_case("base64"));
    Some(DataUrl {
        mime,
        base64,
        payload,
    })
}

/// Validates and normalizes an uploaded résumé.
///
/// Rejects input shorter than `MIN_RESUME_CHARS` before any decoding, and rejects
/// decoded documents whose text is shorter than that. The result is truncated to
/// `max_chars` characters.
pub async fn normalize_resume(raw: &str, max_chars: usize) -> Result<String, AppError> {
    if raw.chars().count() < MIN_RESUME_CHARS {
        return Err(AppError::Validation(
            "Résumé is missing or too short".to_string(),
        ));
    }

    let text = match parse_data_url(raw) {
        Some(url) if url.base64 && url.mime.eq_ignore_ascii_case("application/pdf") => {
            let bytes = decode_payload(url.payload)?;
            extract_pdf_text(bytes).await?
        }
        Some(url) if url.base64 && url.mime.starts_with("text/") => {
            let bytes = decode_payload(url.payload)?;
            String::from_utf8_lossy(&bytes).into_owned()
        }
        Some(url) => {
            warn!(
                "Storing résumé with unsupported data URL type '{}' as received",
                url.mime
            );
            raw.to_string()
        }
        None => raw.to_string(),
    };

    let text = text.trim();
    if text.chars().count() < MIN_RESUME_CHARS {
        return Err(AppError::Validation(
            "Could not read enough text from the uploaded résumé".to_string(),
        ));
    }

    Ok(truncate_chars(text, max_chars).to_string())
}

fn decode_payload(payload: &str) -> Result<Vec<u8>, AppError> {
    STANDARD
        .decode(payload.trim())
        .map_err(|e| AppError::Validation(format!("Résumé is not valid base64: {e}")))
}

/// PDF parsing is CPU-bound, so it runs on the blocking pool.
async fn extract_pdf_text(bytes: Vec<u8>) -> Result<String, AppError> {
    let size = bytes.len();
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed reading PDF: {e}")))?
        .map_err(|e| AppError::Validation(format!("Could not read the uploaded PDF: {e}")))?;

    debug!(
        "Extracted {} chars from a {size}-byte PDF résumé",
        text.chars().count()
    );
    Ok(text)
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
