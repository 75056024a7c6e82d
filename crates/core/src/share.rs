//! Validation rules for publishing shares and commenting.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum allowed length for a share title.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum allowed length for a share description.
pub const MAX_DESCRIPTION_LENGTH: usize = 2000;

/// Maximum allowed length for a comment.
pub const MAX_COMMENT_LENGTH: usize = 2000;

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a share title: required, non-blank, within [`MAX_TITLE_LENGTH`].
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation(
            "Title must not be empty".to_string(),
        ));
    }
    if title.len() > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Title must not exceed {MAX_TITLE_LENGTH} characters, got {}",
            title.len()
        )));
    }
    Ok(())
}

/// Validate an optional share description against
/// [`MAX_DESCRIPTION_LENGTH`].
pub fn validate_description(description: Option<&str>) -> Result<(), CoreError> {
    if let Some(description) = description {
        if description.len() > MAX_DESCRIPTION_LENGTH {
            return Err(CoreError::Validation(format!(
                "Description must not exceed {MAX_DESCRIPTION_LENGTH} characters, got {}",
                description.len()
            )));
        }
    }
    Ok(())
}

/// Validate the recipient list for a publish action.
///
/// A private share must name at least one recipient; public shares carry
/// none.
pub fn validate_recipients(is_private: bool, recipient_count: usize) -> Result<(), CoreError> {
    if is_private && recipient_count == 0 {
        return Err(CoreError::Validation(
            "Select at least one user to share with".to_string(),
        ));
    }
    Ok(())
}

/// Validate a comment body: non-blank, within [`MAX_COMMENT_LENGTH`].
pub fn validate_comment_text(text: &str) -> Result<(), CoreError> {
    if text.trim().is_empty() {
        return Err(CoreError::Validation(
            "Comment must not be empty".to_string(),
        ));
    }
    if text.len() > MAX_COMMENT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Comment must not exceed {MAX_COMMENT_LENGTH} characters, got {}",
            text.len()
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
