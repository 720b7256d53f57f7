use crate::error::AppError;

/// Escape LIKE wildcard characters in a search string.
pub fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Validate a display string (title, alt text): at most 255 Unicode
/// characters, empty allowed.
pub fn validate_display_string(value: &str, name: &str) -> Result<(), AppError> {
    if value.chars().count() > 255 {
        return Err(AppError::Validation(format!(
            "{name} must be at most 255 characters"
        )));
    }
    Ok(())
}

/// Validate a display order (must be >= 0).
pub fn validate_display_order(order: i32) -> Result<(), AppError> {
    if order < 0 {
        return Err(AppError::Validation("display_order must be >= 0".into()));
    }
    Ok(())
}
