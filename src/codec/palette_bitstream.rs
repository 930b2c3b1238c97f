//! Shared frame skeleton for formats 9, 17 and 18.
//!
//! All three apply their own transform pipeline (see [`crate::container`])
//! and then hand flat, already-plaintext bytes to [`decode_palette_bitstream`].
//! Format 26 reuses the rolling-palette and bit-unpacking primitives from
//! here but has its own hierarchical frame body, so it lives in
//! [`crate::codec::format26`] instead.

use crate::bean::{Frame, PixelBean};
use crate::bitreader::BitReader;
use crate::error::DecodeError;
use crate::palette::Palette;

const HEADER_LEN: usize = 5;
const HAS_PALETTE_DELTA: u8 = 0b0000_0001;

/// Decodes a full palette-bitstream plaintext into a [`PixelBean`].
///
/// `grid_size` is the frame's side length in pixels (16 for formats 9/17, 32
/// for format 18).
/// `on_frame`, if given, is called with the index of each frame as it is
/// produced; returning `false` stops decoding early and returns the frames
/// gathered so far (cooperative, between-frame cancellation — see
/// [`crate::DecodeOptions`]).
pub fn decode_palette_bitstream(
    plaintext: &[u8],
    grid_size: u32,
    mut on_frame: Option<&mut dyn FnMut(usize) -> bool>,
) -> Result<PixelBean, DecodeError> {
    let mut palette = Palette::new();
    let mut frames = Vec::new();
    let mut cursor = 0usize;
    let mut speed_ms = crate::constants::MIN_SPEED_MS;

    while cursor < plaintext.len() {
        let remaining = plaintext.len() - cursor;
        if remaining <= 1 {
            // Single trailing byte: matches observed container behavior.
            break;
        }
        if remaining < HEADER_LEN {
            // Not enough bytes left to read a full per-frame header, and
            // more than the one-byte trailing-padding tolerance: the bit
            // reader's implicit cursor has run past the plaintext end.
            return Err(DecodeError::BitstreamOverrun(HEADER_LEN - remaining));
        }

        let header = &plaintext[cursor..cursor + HEADER_LEN];
        let subtype = header[0];
        let frame_size = u16::from_le_bytes([header[1], header[2]]) as usize;
        let delay_ms = u16::from_le_bytes([header[3], header[4]]) as u32;

        if frame_size > remaining {
            if frame_size - remaining <= 1 {
                break;
            }
            return Err(DecodeError::TruncatedFrame {
                declared: frame_size,
                available: remaining,
            });
        }

        let mut body_pos = cursor + HEADER_LEN;
        if subtype & HAS_PALETTE_DELTA != 0 {
            let delta_count = *plaintext
                .get(body_pos)
                .ok_or(DecodeError::TruncatedFrame {
                    declared: frame_size,
                    available: remaining,
                })? as usize;
            body_pos += 1;

            let delta_bytes = delta_count * 3;
            let delta_slice =
                plaintext
                    .get(body_pos..body_pos + delta_bytes)
                    .ok_or(DecodeError::TruncatedFrame {
                        declared: frame_size,
                        available: remaining,
                    })?;

            let colors: Vec<[u8; 3]> = delta_slice
                .chunks_exact(3)
                .map(|c| [c[0], c[1], c[2]])
                .collect();

            if palette.is_empty() {
                palette.replace(&colors);
            } else {
                palette.append(&colors);
            }
            body_pos += delta_bytes;
        }

        let frame_end = cursor + frame_size;
        let pixel_count = (grid_size as usize) * (grid_size as usize);
        let bits = palette.index_bits();
        let bitstream_bytes = if body_pos <= frame_end {
            &plaintext[body_pos..frame_end]
        } else {
            &plaintext[body_pos..body_pos]
        };
        let mut reader = BitReader::new(bitstream_bytes);

        let mut rgb = vec![0u8; pixel_count * 3];
        for px in 0..pixel_count {
            let index = reader.read_bits(bits).ok_or(DecodeError::BitstreamOverrun(1))? as usize;
            let color = palette.get(index).ok_or_else(|| {
                DecodeError::InvariantViolation(format!(
                    "palette index {index} out of range (size {})",
                    palette.len()
                ))
            })?;
            rgb[px * 3..px * 3 + 3].copy_from_slice(&color);
        }

        frames.push(rgb as Frame);
        speed_ms = delay_ms;
        cursor += frame_size.max(HEADER_LEN);

        if let Some(cb) = on_frame.as_deref_mut() {
            if !cb(frames.len() - 1) {
                break;
            }
        }
    }

    if frames.is_empty() {
        return Err(DecodeError::TruncatedFrame {
            declared: HEADER_LEN,
            available: plaintext.len(),
        });
    }

    let row_count = (grid_size / 16).max(1);
    let column_count = (grid_size / 16).max(1);
    Ok(PixelBean::new(row_count, column_count, speed_ms, frames))
}
