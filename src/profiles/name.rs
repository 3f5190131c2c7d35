use crate::error::{AppError, AppResult};

/// Trims the input and replaces path separators and spaces with `_`.
/// Returns `None` when nothing usable is left.
pub fn sanitize_name(input: &str) -> Option<String> {
    let trimmed = input.trim();
    let name = trimmed.replace(['/', '\\', ' '], "_");

    if name.is_empty() || name == "." || name == ".." {
        return None;
    }

    Some(name)
}

pub fn require_name(input: &str, what: &str) -> AppResult<String> {
    sanitize_name(input).ok_or_else(|| AppError::InvalidInput(format!("{what} required")))
}
