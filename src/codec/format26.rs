//! Format 26: hierarchical tile-grid frame decoder.
//!
//! After the shared AES-CBC → LZO transform, the plaintext holds an outer
//! frame header (the same 5-byte shape as [`crate::codec::palette_bitstream`])
//! followed by a tree of block descriptors rooted at a 64×64 or 128×128
//! frame. Each block is one of three modes; `recurse` splits into four
//! equal quadrants down to an 8×8 leaf, bounded by [`MAX_TILE_DEPTH`].

use crate::bean::{Frame, PixelBean};
use crate::bitreader::BitReader;
use crate::constants::MAX_TILE_DEPTH;
use crate::error::DecodeError;
use crate::palette::Palette;

const HEADER_LEN: usize = 5;
const HAS_PALETTE_DELTA: u8 = 0b0000_0001;

const MODE_LITERAL: u8 = 0x00;
const MODE_RECURSE: u8 = 0x01;
const MODE_SUBSET: u8 = 0x02;

/// A block to decode, in the explicit work-queue form the design notes
/// recommend over raw recursion.
struct Block {
    origin_x: u32,
    origin_y: u32,
    size: u32,
    depth: u32,
}

/// Decodes a format-26 plaintext (already AES-CBC and LZO reversed) into a
/// [`PixelBean`] on a `grid_size`×`grid_size` frame (64 or 128).
///
/// `on_frame`, if given, is called after each frame; returning `false` stops
/// decoding early (see [`crate::DecodeOptions`]).
pub fn decode_format26(
    plaintext: &[u8],
    grid_size: u32,
    mut on_frame: Option<&mut dyn FnMut(usize) -> bool>,
) -> Result<PixelBean, DecodeError> {
    let mut global_palette = Palette::new();
    let mut frames = Vec::new();
    let mut cursor = 0usize;
    let mut speed_ms = crate::constants::MIN_SPEED_MS;

    while cursor < plaintext.len() {
        let remaining = plaintext.len() - cursor;
        if remaining <= 1 {
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
            let delta_slice = plaintext.get(body_pos..body_pos + delta_bytes).ok_or(
                DecodeError::TruncatedFrame {
                    declared: frame_size,
                    available: remaining,
                },
            )?;
            let colors: Vec<[u8; 3]> = delta_slice.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect();
            if global_palette.is_empty() {
                global_palette.replace(&colors);
            } else {
                global_palette.append(&colors);
            }
            body_pos += delta_bytes;
        }

        let frame_end = cursor + frame_size;
        let body = if body_pos <= frame_end {
            &plaintext[body_pos..frame_end]
        } else {
            &plaintext[body_pos..body_pos]
        };

        let mut rgb = vec![0u8; (grid_size as usize) * (grid_size as usize) * 3];
        let mut reader = BitReader::new(body);
        let mut queue = std::collections::VecDeque::from([Block {
            origin_x: 0,
            origin_y: 0,
            size: grid_size,
            depth: 0,
        }]);

        // FIFO, not a stack: the bitstream encodes blocks in the order a
        // breadth-first walk visits them (each recurse's four children
        // read back to back, in (0,0)/(1,0)/(0,1)/(1,1) order), so the
        // work queue must preserve that order rather than reverse it.
        while let Some(block) = queue.pop_front() {
            decode_block(&block, &mut reader, &global_palette, grid_size, &mut rgb, &mut queue)?;
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

fn decode_block(
    block: &Block,
    reader: &mut BitReader<'_>,
    global_palette: &Palette,
    grid_size: u32,
    rgb: &mut [u8],
    queue: &mut std::collections::VecDeque<Block>,
) -> Result<(), DecodeError> {
    if block.depth > MAX_TILE_DEPTH {
        return Err(DecodeError::MalformedTree(format!(
            "recursion depth {} exceeds limit {}",
            block.depth, MAX_TILE_DEPTH
        )));
    }

    let mode_bits = reader
        .read_bits(8)
        .ok_or(DecodeError::BitstreamOverrun(1))? as u8;

    match mode_bits {
        MODE_LITERAL => {
            let bits = reader
                .read_bits(8)
                .ok_or(DecodeError::BitstreamOverrun(1))? as u8;
            fill_block(block, reader, global_palette, bits, None, grid_size, rgb)
        }
        MODE_SUBSET => {
            let mut bitmap = [false; 256];
            let mut present = Vec::new();
            for i in 0..256usize {
                let bit = reader.read_bits(1).ok_or(DecodeError::BitstreamOverrun(1))?;
                bitmap[i] = bit != 0;
                if bitmap[i] {
                    present.push(i);
                }
            }
            let bits = crate::constants::bits_for_palette_size(present.len());
            fill_block(block, reader, global_palette, bits, Some(&present), grid_size, rgb)
        }
        MODE_RECURSE => {
            if block.size <= 8 {
                return Err(DecodeError::MalformedTree(
                    "recurse mode on an 8x8 leaf block".to_string(),
                ));
            }
            let half = block.size / 2;
            let next_depth = block.depth + 1;
            for (dx, dy) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
                queue.push_back(Block {
                    origin_x: block.origin_x + dx * half,
                    origin_y: block.origin_y + dy * half,
                    size: half,
                    depth: next_depth,
                });
            }
            Ok(())
        }
        other => Err(DecodeError::MalformedTree(format!(
            "block mode byte {other} out of range"
        ))),
    }
}

fn fill_block(
    block: &Block,
    reader: &mut BitReader<'_>,
    global_palette: &Palette,
    bits: u8,
    subset: Option<&[usize]>,
    grid_size: u32,
    rgb: &mut [u8],
) -> Result<(), DecodeError> {
    for y in 0..block.size {
        for x in 0..block.size {
            let raw_index = reader.read_bits(bits).ok_or(DecodeError::BitstreamOverrun(1))? as usize;
            let global_index = match subset {
                Some(present) => *present
                    .get(raw_index)
                    .ok_or_else(|| DecodeError::InvariantViolation(
                        "subset palette index out of range".to_string(),
                    ))?,
                None => raw_index,
            };
            let color = global_palette.get(global_index).ok_or_else(|| {
                DecodeError::InvariantViolation(format!(
                    "palette index {global_index} out of range"
                ))
            })?;

            let px = block.origin_x + x;
            let py = block.origin_y + y;
            let offset = ((py * grid_size + px) * 3) as usize;
            rgb[offset..offset + 3].copy_from_slice(&color);
        }
    }
    Ok(())
}
