//! LZO1X-1 decompression.
//!
//! Delegates to `minilzo-rs`, a binding over the reference `minilzo`
//! implementation, chosen specifically so output is byte-identical to the
//! original LZO1X-1 decoder rather than merely LZO-compatible.

use crate::error::DecodeError;

/// Decompresses `input`, which must expand to exactly `expected_len` bytes.
pub fn decompress(input: &[u8], expected_len: usize) -> Result<Vec<u8>, DecodeError> {
    let lzo = minilzo_rs::LZO::init().map_err(|_| DecodeError::LzoLength {
        expected: expected_len,
        actual: 0,
    })?;

    let out = lzo
        .decompress_safe(input, expected_len)
        .map_err(|_| DecodeError::LzoLength {
            expected: expected_len,
            actual: 0,
        })?;

    if out.len() != expected_len {
        return Err(DecodeError::LzoLength {
            expected: expected_len,
            actual: out.len(),
        });
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_mismatch_reported_as_lzo_length() {
        // Garbage input can't plausibly decompress to a huge declared length.
        let err = decompress(&[0x11, 0x00, 0x00], 1 << 20).unwrap_err();
        assert!(matches!(err, DecodeError::LzoLength { .. }));
    }
}
