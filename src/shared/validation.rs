use lazy_static::lazy_static;
use regex::Regex;

use crate::core::error::{AppError, Result};

lazy_static! {
    /// Characters not allowed in a stored upload name
    /// - Kept: ASCII letters, digits, '.', '_' and '-'
    /// - Replaced: spaces, path separators, unicode, shell metacharacters
    pub static ref UNSAFE_FILENAME_CHARS: Regex = Regex::new(r"[^A-Za-z0-9._-]").unwrap();
}

/// Reduce a client-supplied filename to a safe single path component.
///
/// Only the last component survives (both `/` and `\` count as separators),
/// unsafe characters become `_`, and names that end up empty or made only of
/// dots fall back to `photo`.
pub fn sanitize_filename(original: &str) -> String {
    let base = original.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned = UNSAFE_FILENAME_CHARS.replace_all(base.trim(), "_");

    if cleaned.chars().all(|c| c == '.') {
        "photo".to_string()
    } else {
        cleaned.into_owned()
    }
}

/// Trim a submitted text field, treating absent and blank alike
pub fn require_text(value: Option<String>, field: &'static str) -> Result<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::MissingField(field)),
    }
}

/// Parse a required numeric text field
pub fn require_number(value: Option<String>, field: &'static str) -> Result<f64> {
    let raw = require_text(value, field)?;
    raw.parse::<f64>()
        .map_err(|_| AppError::Validation(format!("{} must be a number", field)))
}
