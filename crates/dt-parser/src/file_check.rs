use crate::error::ParserError;

/// Default maximum source size in bytes (1 MB).
pub const DEFAULT_MAX_SOURCE_BYTES: u64 = 1_048_576;

/// Number of leading bytes to inspect for binary detection.
const BINARY_CHECK_SIZE: usize = 8192;

/// Check that a source text is within size limits.
pub fn check_source_size(size: u64, max: u64) -> Result<(), ParserError> {
    if size > max {
        return Err(ParserError::SourceTooLarge { size, max });
    }
    Ok(())
}

/// Returns `true` if the buffer appears to contain binary (non-text) data.
/// Detection: presence of null bytes in the first 8 KB.
pub fn is_binary(content: &[u8]) -> bool {
    let check_len = content.len().min(BINARY_CHECK_SIZE);
    content[..check_len].contains(&0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_at_limit() {
        assert!(check_source_size(DEFAULT_MAX_SOURCE_BYTES, DEFAULT_MAX_SOURCE_BYTES).is_ok());
    }

    #[test]
    fn source_over_limit() {
        let err = check_source_size(2_000, 1_000).unwrap_err();
        match err {
            ParserError::SourceTooLarge { size, max } => {
                assert_eq!(size, 2_000);
                assert_eq!(max, 1_000);
            }
            _ => panic!("expected SourceTooLarge"),
        }
    }

    #[test]
    fn script_is_not_binary() {
        assert!(!is_binary(b"function add(a, b) { return a + b; }\n"));
    }

    #[test]
    fn null_byte_is_binary() {
        assert!(is_binary(b"const a = 1;\x00"));
    }

    #[test]
    fn null_after_8kb_not_detected() {
        let mut data = vec![b'a'; 10_000];
        data[9000] = 0;
        assert!(!is_binary(&data));
    }
}
