//! Body extraction and content validation for incoming pastes.
//!
//! Pastes are restricted to printable ASCII plus whitespace. This is a
//! deliberate content boundary against binary and control-character
//! smuggling, not a general Unicode text policy; do not widen it silently.
//!
//! Both functions are pure and run before any rate-limit or store call.

use crate::error::ApiError;

/// Pull the paste text out of a request body.
///
/// Raw bodies are taken verbatim. The legacy form variant carries the paste
/// in a `body` field. Structured uploads (multipart, octet-stream, json and
/// friends) are rejected outright.
pub fn extract(content_type: Option<&str>, body: &[u8]) -> crate::AppResult<String> {
    match content_type {
        Some(kind) if kind.starts_with("application/x-www-form-urlencoded") => {
            let form = std::str::from_utf8(body).map_err(|_| ApiError::WrongType)?;
            let field = form_field(form, "body").ok_or(ApiError::EmptyInput)?;
            validate(field.as_bytes())?;
            Ok(field)
        }
        Some(kind) if !kind.starts_with("text/") => Err(ApiError::WrongType),
        _ => Ok(validate(body)?.to_owned()),
    }
}

/// Validate raw paste bytes against the plain-text policy.
pub fn validate(raw: &[u8]) -> crate::AppResult<&str> {
    if raw.is_empty() {
        return Err(ApiError::EmptyInput);
    }

    if !raw.iter().all(|&byte| is_plain(byte)) {
        return Err(ApiError::NonPlainText);
    }

    // all bytes are ASCII at this point
    std::str::from_utf8(raw).map_err(|_| ApiError::NonPlainText)
}

fn is_plain(byte: u8) -> bool {
    matches!(byte, 0x20..=0x7e | b'\t' | b'\n' | b'\r')
}

fn form_field(form: &str, name: &str) -> Option<String> {
    for pair in form.split('&') {
        if let Some((key, value)) = pair.split_once('=') {
            if key == name {
                // form encoding spells spaces as '+'
                let value = value.replace('+', " ");
                return urlencoding::decode(&value).ok().map(|v| v.into_owned());
            }
        }
    }
    None
}
