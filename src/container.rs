//! Top-level container parser and format dispatcher.
//!
//! Reads the fixed preamble (payload length, format tag), then hands the
//! remainder to exactly one codec through a closed `match` — never a
//! `Box<dyn Codec>` or registry, per the "no virtual table" design note.

use log::{debug, trace};

use crate::bean::PixelBean;
use crate::codec;
use crate::error::{DecodeError, Result};
use crate::transform;

/// Options controlling a single [`decode_with`] call.
///
/// The default (`DecodeOptions::default()`, used by plain [`decode`]) runs
/// to completion with no callback — identical behavior to the bare
/// `decode(bytes) -> PixelBean` entry point in the public interface.
#[derive(Default)]
pub struct DecodeOptions<'a> {
    /// Invoked after each frame is decoded (for formats where the frame
    /// decoder threads it through — see individual codec docs); returning
    /// `false` stops decoding early and returns the frames produced so far.
    ///
    /// Cancellation is cooperative only between frames: once a frame's
    /// bitstream is being read, the decoder runs it to completion.
    pub on_frame: Option<&'a mut dyn FnMut(usize) -> bool>,
}

/// Decodes a pixel-bean container into a [`PixelBean`].
pub fn decode(payload: &[u8]) -> Result<PixelBean> {
    decode_with(payload, &mut DecodeOptions::default())
}

/// Decodes a pixel-bean container, honoring `options`.
pub fn decode_with(payload: &[u8], options: &mut DecodeOptions<'_>) -> Result<PixelBean> {
    if payload.len() < 5 {
        return Err(DecodeError::TruncatedHeader {
            declared: 5,
            available: payload.len(),
        });
    }

    let declared_len = u32::from_be_bytes([payload[0], payload[1], payload[2], payload[3]]) as usize;
    let available = payload.len() - 4;
    if declared_len > available {
        return Err(DecodeError::TruncatedHeader {
            declared: declared_len,
            available,
        });
    }
    let rest = &payload[4..4 + declared_len];

    if rest.is_empty() {
        return Err(DecodeError::TruncatedHeader {
            declared: declared_len,
            available,
        });
    }
    let tag = rest[0];
    let body = &rest[1..];
    debug!("pixel-bean container: tag={tag}, body_len={}", body.len());

    let on_frame = options.on_frame.as_deref_mut();

    match tag {
        9 => {
            trace!("format 9: AES-CBC -> palette-bitstream, 16x16");
            let plaintext = transform::decrypt(body)?;
            codec::decode_palette_bitstream(&plaintext, 16, on_frame)
        }
        17 => {
            trace!("format 17: plaintext palette-bitstream, 16x16");
            codec::decode_palette_bitstream(body, 16, on_frame)
        }
        18 => {
            trace!("format 18: AES-CBC -> LZO -> palette-bitstream, 32x32");
            let decrypted = transform::decrypt(body)?;
            let plaintext = lzo_decompress_tail(&decrypted)?;
            codec::decode_palette_bitstream(&plaintext, 32, on_frame)
        }
        26 => {
            trace!("format 26: AES-CBC -> LZO -> hierarchical tile grid");
            let decrypted = transform::decrypt(body)?;
            let plaintext = lzo_decompress_tail(&decrypted)?;
            let grid_size = infer_tile_grid_size(&plaintext)?;
            codec::decode_format26(&plaintext, grid_size, on_frame)
        }
        31 => {
            trace!("format 31: JPEG sequence");
            codec::decode_jpeg_sequence(body)
        }
        42 => {
            trace!("format 42: Zstd -> JPEG sequence");
            codec::decode_zstd_jpeg_sequence(body)
        }
        43 => {
            trace!("format 43: embedded GIF or WebP");
            codec::decode_gif_or_webp(body)
        }
        other => Err(DecodeError::UnsupportedFormat(other)),
    }
}

/// Formats 18 and 26 carry a little-endian `u32` uncompressed length ahead
/// of the LZO stream, matching the container's own length-checked transform
/// contract (`LzoLength` on mismatch).
fn lzo_decompress_tail(decrypted: &[u8]) -> Result<Vec<u8>> {
    if decrypted.len() < 4 {
        return Err(DecodeError::LzoLength {
            expected: 4,
            actual: decrypted.len(),
        });
    }
    let expected_len =
        u32::from_le_bytes([decrypted[0], decrypted[1], decrypted[2], decrypted[3]]) as usize;
    transform::lzo_decompress(&decrypted[4..], expected_len)
}

/// Format 26 frames are either 64×64 or 128×128; the outer frame header
/// doesn't carry this directly; infer it from the high bit of the frame
/// subtype byte (bit 7: 1 selects the 128×128 grid).
fn infer_tile_grid_size(plaintext: &[u8]) -> Result<u32> {
    let subtype = *plaintext
        .first()
        .ok_or(DecodeError::TruncatedFrame {
            declared: 1,
            available: 0,
        })?;
    Ok(if subtype & 0b1000_0000 != 0 { 128 } else { 64 })
}
