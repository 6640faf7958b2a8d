//! Defensive structured-output extraction
//!
//! Model replies are loosely structured: JSON wrapped in markdown fences,
//! prefixed with prose, or not JSON at all. Extraction never fails; it ends
//! in the target type's [`Fallback`] value when nothing parses.

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// A type with a static default used when a model reply cannot be parsed
pub trait Fallback {
    fn fallback() -> Self;
}

/// Where an extracted value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// The whole (fence-stripped) reply parsed
    Direct,
    /// The first balanced `{...}` inside the reply parsed
    Embedded,
    /// Nothing parsed; the static default was substituted
    Fallback,
}

/// Result of an extraction - always holds a usable value
#[derive(Debug, Clone)]
pub struct Extraction<T> {
    pub value: T,
    pub source: Source,
}

/// Strip a surrounding markdown code fence and its optional language tag
///
/// An unclosed fence is stripped up to the end of the text.
pub fn strip_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    let body = match rest.find("```") {
        Some(end) => &rest[..end],
        None => rest,
    };
    body.trim()
}

/// Find the first balanced `{...}` substring
///
/// Braces inside JSON string literals are ignored.
pub fn find_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Try the strict and embedded parses without falling back
pub fn parse_json<T: DeserializeOwned>(raw: &str) -> Option<(T, Source)> {
    let body = strip_fences(raw);
    if body.is_empty() {
        debug!("parse_json: empty body");
        return None;
    }

    match serde_json::from_str::<T>(body) {
        Ok(value) => return Some((value, Source::Direct)),
        Err(e) => debug!(error = %e, "parse_json: strict parse failed"),
    }

    let candidate = find_json_object(body)?;
    match serde_json::from_str::<T>(candidate) {
        Ok(value) => Some((value, Source::Embedded)),
        Err(e) => {
            debug!(error = %e, "parse_json: embedded parse failed");
            None
        }
    }
}

/// Extract a `T` from a model reply, substituting `T::fallback()` on failure
pub fn extract<T: DeserializeOwned + Fallback>(stage: &str, raw: &str) -> Extraction<T> {
    debug!(%stage, raw_len = raw.len(), "extract: called");
    match parse_json::<T>(raw) {
        Some((value, source)) => {
            debug!(%stage, ?source, "extract: parsed");
            Extraction { value, source }
        }
        None => {
            warn!(%stage, raw_len = raw.len(), "extract: unparseable model reply, using fallback");
            Extraction {
                value: T::fallback(),
                source: Source::Fallback,
            }
        }
    }
}
