//! Zstandard (RFC 8478) decompression.

use std::io::Read;

use crate::error::DecodeError;

/// Decompresses `input`, which may be one or more concatenated Zstd frames.
///
/// `zstd::Decoder` already walks frame boundaries on its own when reading to
/// exhaustion, so multi-frame concatenation (format 42's container shape)
/// falls out of a plain `read_to_end`.
pub fn decompress(input: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let mut decoder =
        zstd::Decoder::new(input).map_err(|e| DecodeError::ZstdDecodeFailed(e.to_string()))?;

    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(|e| DecodeError::ZstdDecodeFailed(e.to_string()))?;

    Ok(out)
}
