use crate::foundation::error::{DreamError, DreamResult};

/// Longest accepted filename hint, in bytes.
pub const MAX_FILENAME_HINT_LEN: usize = 128;

/// A validated generation request.
///
/// Construction is the single validation point for prompts: an orchestrator only ever sees a
/// trimmed, non-empty prompt.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct GenerationRequest {
    prompt: String,
    filename_hint: Option<String>,
}

impl GenerationRequest {
    /// Validate `prompt` and an optional filename stem (no extension).
    pub fn new(prompt: &str, filename_hint: Option<&str>) -> DreamResult<Self> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(DreamError::validation("prompt must not be empty"));
        }

        let filename_hint = match filename_hint {
            Some(hint) => Some(validate_filename_hint(hint)?),
            None => None,
        };

        Ok(Self {
            prompt: prompt.to_string(),
            filename_hint,
        })
    }

    /// The trimmed prompt.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Caller-supplied filename stem, if any.
    pub fn filename_hint(&self) -> Option<&str> {
        self.filename_hint.as_deref()
    }
}

fn validate_filename_hint(hint: &str) -> DreamResult<String> {
    let hint = hint.trim();
    if hint.is_empty() {
        return Err(DreamError::validation("filename hint must not be empty"));
    }
    if hint.len() > MAX_FILENAME_HINT_LEN {
        return Err(DreamError::validation(format!(
            "filename hint must be at most {MAX_FILENAME_HINT_LEN} bytes"
        )));
    }
    if let Some(bad) = hint
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        return Err(DreamError::validation(format!(
            "filename hint may only contain ASCII letters, digits, '-' and '_' (found {bad:?})"
        )));
    }
    Ok(hint.to_string())
}

#[cfg(test)]
#[path = "../tests/unit/request.rs"]
mod tests;
