use capsule_core::ValidationError;

/// Errors that can occur while encoding, decoding, or storing blueprints.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("blueprint '{0}' not found")]
    NotFound(String),

    #[error("invalid blueprint name: {0}")]
    InvalidName(#[from] ValidationError),

    #[error("blueprint I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid magic bytes (expected SCAP)")]
    InvalidMagic,

    #[error("unsupported blueprint format version {0}")]
    UnsupportedVersion(u16),

    #[error("file too small ({0} bytes, minimum {1})")]
    FileTooSmall(usize, usize),

    #[error("blueprint name is {0} bytes, header holds at most 65535")]
    HeaderNameTooLong(usize),

    #[error("blueprint name in header is not valid UTF-8")]
    MalformedHeaderName,

    #[error("LZ4 decompression failed: {0}")]
    DecompressError(String),

    #[error("payload length mismatch: header says {expected}, got {actual}")]
    PayloadLengthMismatch { expected: usize, actual: usize },

    #[error("malformed NBT payload: {0}")]
    Nbt(String),
}

impl PersistError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, PersistError::NotFound(_))
    }
}
