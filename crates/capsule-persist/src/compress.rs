use crate::error::PersistError;

/// Compress an encoded NBT payload using LZ4.
pub fn compress_payload(data: &[u8]) -> Vec<u8> {
    lz4_flex::compress_prepend_size(data)
}

/// Decompress an LZ4 payload, validating it against the length the header recorded.
pub fn decompress_payload(compressed: &[u8], expected_len: usize) -> Result<Vec<u8>, PersistError> {
    let decompressed = lz4_flex::decompress_size_prepended(compressed)
        .map_err(|e| PersistError::DecompressError(e.to_string()))?;

    if decompressed.len() != expected_len {
        return Err(PersistError::PayloadLengthMismatch {
            expected: expected_len,
            actual: decompressed.len(),
        });
    }

    Ok(decompressed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compress_decompress_roundtrip() {
        let mut data = vec![0u8; 4096];
        for (i, byte) in data.iter_mut().enumerate() {
            *byte = (i % 251) as u8;
        }

        let compressed = compress_payload(&data);
        let decompressed = decompress_payload(&compressed, data.len()).expect("decompress");
        assert_eq!(data, decompressed);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let compressed = compress_payload(b"minecraft:stone");
        let result = decompress_payload(&compressed, 3);
        assert!(matches!(
            result,
            Err(PersistError::PayloadLengthMismatch {
                expected: 3,
                actual: 15
            })
        ));
    }

    #[test]
    fn test_garbage_rejected() {
        let result = decompress_payload(&[0xFF, 0xFF, 0xFF, 0x7F, 0x01], 10);
        assert!(matches!(
            result,
            Err(PersistError::DecompressError(_) | PersistError::PayloadLengthMismatch { .. })
        ));
    }

    #[test]
    fn test_repetitive_payload_compresses() {
        // Long runs of the same block id are the common case.
        let data = "minecraft:cobblestone".repeat(500).into_bytes();
        let compressed = compress_payload(&data);
        assert!(
            compressed.len() < data.len() / 10,
            "repetitive payload should compress to <10% (got {} of {} bytes)",
            compressed.len(),
            data.len()
        );
    }
}
