use crate::constants::MAX_NAME_LEN;
use crate::error::ValidationError;

/// Reject names that are empty or longer than [`MAX_NAME_LEN`] characters.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    let len = name.chars().count();
    if len > MAX_NAME_LEN {
        return Err(ValidationError::NameTooLong {
            len,
            max: MAX_NAME_LEN,
        });
    }
    Ok(())
}

/// Map a blueprint name to its storage key: every character outside
/// `[a-zA-Z0-9_-]` becomes `_`, then the result is lowercased.
///
/// Distinct names can share a key ("Fort!" and "Fort@" both give "fort_");
/// the later save silently replaces the earlier one.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}
