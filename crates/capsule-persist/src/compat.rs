use crate::error::PersistError;
use crate::format::{BlueprintHeader, FORMAT_VERSION, MAGIC};

/// Validate a blueprint file header.
///
/// There is exactly one supported version; anything else is rejected rather
/// than migrated.
pub fn validate_header(header: &BlueprintHeader) -> Result<(), PersistError> {
    if header.magic != MAGIC {
        return Err(PersistError::InvalidMagic);
    }

    if header.version != FORMAT_VERSION {
        return Err(PersistError::UnsupportedVersion(header.version));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_header() -> BlueprintHeader {
        BlueprintHeader {
            magic: MAGIC,
            version: FORMAT_VERSION,
            name_len: 4,
            size: [3, 4, 5],
            block_count: 12,
            payload_len: 100,
        }
    }

    #[test]
    fn test_valid_header() {
        assert!(validate_header(&test_header()).is_ok());
    }

    #[test]
    fn test_invalid_magic_rejected() {
        let mut header = test_header();
        header.magic = *b"NOPE";
        let result = validate_header(&header);
        assert!(matches!(result, Err(PersistError::InvalidMagic)));
    }

    #[test]
    fn test_unsupported_version_rejected() {
        let mut header = test_header();
        header.version = 99;
        let result = validate_header(&header);
        assert!(matches!(result, Err(PersistError::UnsupportedVersion(99))));
    }
}
