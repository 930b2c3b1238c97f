//! Embedded-image frame decoders: formats 31 (JPEG), 42 (Zstd+JPEG) and 43
//! (embedded GIF or WebP).
//!
//! All three funnel into the same abstract capability the design notes
//! describe: `decode_image_sequence(bytes) -> list<(delay, rgb, (w, h))>`.
//! Here that capability is three concrete functions rather than a trait
//! object, kept in step with the "no virtual table" dispatch rule.

use crate::bean::{Frame, PixelBean};
use crate::error::DecodeError;
use crate::transform;

const GIF_MAGIC: &[u8] = b"GIF8";
const RIFF_MAGIC: &[u8] = b"RIFF";
const WEBP_MAGIC: &[u8] = b"WEBP";

/// One decoded sub-image plus its declared delay, before being assembled
/// into a [`PixelBean`].
struct DecodedFrame {
    delay_ms: u32,
    rgb: Frame,
    dims: (u32, u32),
}

/// Format 31: `[u16 delay][JPEG bytes]` repeated until the plaintext ends.
pub fn decode_jpeg_sequence(plaintext: &[u8]) -> Result<PixelBean, DecodeError> {
    let mut frames = Vec::new();
    let mut cursor = 0usize;

    while cursor + 2 <= plaintext.len() {
        let delay_ms = u16::from_le_bytes([plaintext[cursor], plaintext[cursor + 1]]) as u32;
        cursor += 2;

        let jpeg_len = jpeg_payload_len(&plaintext[cursor..])?;
        let jpeg_bytes = &plaintext[cursor..cursor + jpeg_len];
        cursor += jpeg_len;

        frames.push(decode_one_jpeg(jpeg_bytes, delay_ms)?);
    }

    assemble(frames)
}

/// Format 42: Zstd-wrapped JPEG sequence; unwrap, then parse as format 31.
pub fn decode_zstd_jpeg_sequence(ciphertext_or_plain: &[u8]) -> Result<PixelBean, DecodeError> {
    let plaintext = transform::zstd_decompress(ciphertext_or_plain)?;
    decode_jpeg_sequence(&plaintext)
}

/// Format 43: a complete embedded animated GIF or WebP file.
pub fn decode_gif_or_webp(payload: &[u8]) -> Result<PixelBean, DecodeError> {
    if payload.starts_with(GIF_MAGIC) {
        decode_embedded_gif(payload)
    } else if payload.len() >= 12 && &payload[0..4] == RIFF_MAGIC && &payload[8..12] == WEBP_MAGIC {
        decode_embedded_webp(payload)
    } else {
        Err(DecodeError::EmbeddedDecode(
            "payload is neither GIF8 nor RIFF....WEBP".to_string(),
        ))
    }
}

fn decode_embedded_gif(payload: &[u8]) -> Result<PixelBean, DecodeError> {
    let mut decoder = gif::DecodeOptions::new();
    decoder.set_color_output(gif::ColorOutput::RGBA);
    let mut reader = decoder
        .read_info(payload)
        .map_err(|e| DecodeError::EmbeddedDecode(e.to_string()))?;

    let width = u32::from(reader.width());
    let height = u32::from(reader.height());
    let mut frames = Vec::new();

    // GIF frames are deltas over a shared canvas, not independent full
    // images: each frame's buffer only covers its own (left, top, width,
    // height) sub-rectangle. Composite every frame onto a persistent
    // canvas, honoring each frame's disposal method, before handing full
    // canvas-sized RGB buffers on to `assemble`.
    let mut canvas = vec![0u8; (width as usize) * (height as usize) * 3];

    while let Some(frame) = reader
        .read_next_frame()
        .map_err(|e| DecodeError::EmbeddedDecode(e.to_string()))?
    {
        let restore_canvas = if frame.dispose == gif::DisposalMethod::Previous {
            Some(canvas.clone())
        } else {
            None
        };

        composite_frame_onto_canvas(&mut canvas, width, height, frame);

        let delay_ms = u32::from(frame.delay) * 10;
        frames.push(DecodedFrame {
            delay_ms,
            rgb: canvas.clone(),
            dims: (width, height),
        });

        match frame.dispose {
            gif::DisposalMethod::Background => {
                clear_rect(&mut canvas, width, frame.left, frame.top, frame.width, frame.height);
            }
            gif::DisposalMethod::Previous => {
                if let Some(previous) = restore_canvas {
                    canvas = previous;
                }
            }
            gif::DisposalMethod::Any | gif::DisposalMethod::Keep => {}
        }
    }

    assemble(frames)
}

/// Draws `frame`'s (possibly partially transparent) RGBA buffer onto
/// `canvas` at the frame's declared offset, leaving already-opaque pixels
/// under fully-transparent source pixels untouched.
fn composite_frame_onto_canvas(canvas: &mut [u8], canvas_width: u32, canvas_height: u32, frame: &gif::Frame<'_>) {
    let frame_width = u32::from(frame.width);
    let frame_height = u32::from(frame.height);
    let left = u32::from(frame.left);
    let top = u32::from(frame.top);

    for fy in 0..frame_height {
        let cy = top + fy;
        if cy >= canvas_height {
            break;
        }
        for fx in 0..frame_width {
            let cx = left + fx;
            if cx >= canvas_width {
                continue;
            }
            let src_offset = ((fy * frame_width + fx) * 4) as usize;
            let Some(px) = frame.buffer.get(src_offset..src_offset + 4) else {
                continue;
            };
            if px[3] == 0 {
                continue;
            }
            let dst_offset = ((cy * canvas_width + cx) * 3) as usize;
            canvas[dst_offset..dst_offset + 3].copy_from_slice(&px[0..3]);
        }
    }
}

/// Clears a sub-rectangle of `canvas` to background (black), as the
/// `Background` disposal method requires before the next frame is drawn.
fn clear_rect(canvas: &mut [u8], canvas_width: u32, left: u16, top: u16, width: u16, height: u16) {
    let (left, top, width, height) = (u32::from(left), u32::from(top), u32::from(width), u32::from(height));
    for y in top..top + height {
        for x in left..left + width {
            let offset = ((y * canvas_width + x) * 3) as usize;
            if offset + 3 <= canvas.len() {
                canvas[offset..offset + 3].fill(0);
            }
        }
    }
}

fn decode_embedded_webp(payload: &[u8]) -> Result<PixelBean, DecodeError> {
    let mut decoder = image_webp::WebPDecoder::new(std::io::Cursor::new(payload))
        .map_err(|e| DecodeError::EmbeddedDecode(e.to_string()))?;
    let (width, height) = decoder.dimensions();
    let has_alpha = decoder.has_alpha();
    let num_frames = decoder.num_frames();
    let channels = if has_alpha { 4 } else { 3 };

    let mut frames = Vec::with_capacity(num_frames as usize);
    for _ in 0..num_frames {
        let mut buf = vec![0u8; (width as usize) * (height as usize) * channels];
        let delay_ms = decoder
            .read_frame(&mut buf)
            .map_err(|e| DecodeError::EmbeddedDecode(e.to_string()))?;

        let rgb: Vec<u8> = if has_alpha {
            buf.chunks_exact(4).flat_map(|px| [px[0], px[1], px[2]]).collect()
        } else {
            buf
        };

        frames.push(DecodedFrame {
            delay_ms,
            rgb,
            dims: (width, height),
        });
    }

    assemble(frames)
}

fn decode_one_jpeg(bytes: &[u8], delay_ms: u32) -> Result<DecodedFrame, DecodeError> {
    let mut decoder = zune_jpeg::JpegDecoder::new(bytes);
    let pixels = decoder
        .decode()
        .map_err(|e| DecodeError::EmbeddedDecode(e.to_string()))?;
    let info = decoder
        .info()
        .ok_or_else(|| DecodeError::EmbeddedDecode("missing JPEG frame info".to_string()))?;

    Ok(DecodedFrame {
        delay_ms,
        rgb: pixels,
        dims: (u32::from(info.width), u32::from(info.height)),
    })
}

fn jpeg_payload_len(data: &[u8]) -> Result<usize, DecodeError> {
    if data.len() < 4 || data[0] != 0xFF || data[1] != 0xD8 {
        return Err(DecodeError::EmbeddedDecode(
            "expected JPEG SOI marker".to_string(),
        ));
    }
    let mut pos = 2;
    while pos + 4 <= data.len() {
        if data[pos] != 0xFF {
            return Err(DecodeError::EmbeddedDecode(
                "malformed JPEG marker sequence".to_string(),
            ));
        }
        let marker = data[pos + 1];
        if marker == 0xD9 {
            return Ok(pos + 2);
        }
        if (0xD0..=0xD7).contains(&marker) {
            pos += 2;
            continue;
        }
        let seg_len = u16::from_be_bytes([data[pos + 2], data[pos + 3]]) as usize;
        pos += 2 + seg_len;
        if marker == 0xDA {
            // Scan data follows; scan for the next marker that isn't a
            // restart marker or stuffed 0xFF00.
            while pos + 1 < data.len() {
                if data[pos] == 0xFF && data[pos + 1] != 0x00 && !(0xD0..=0xD7).contains(&data[pos + 1]) {
                    break;
                }
                pos += 1;
            }
        }
    }
    Ok(data.len())
}

fn assemble(frames: Vec<DecodedFrame>) -> Result<PixelBean, DecodeError> {
    if frames.is_empty() {
        return Err(DecodeError::InvariantViolation(
            "embedded sequence produced zero frames".to_string(),
        ));
    }

    let (w, h) = frames[0].dims;
    for f in &frames[1..] {
        if f.dims != (w, h) {
            return Err(DecodeError::DimensionMismatch {
                first: (w, h),
                found: f.dims,
            });
        }
    }

    let mean_delay = {
        let sum: u64 = frames.iter().map(|f| u64::from(f.delay_ms)).sum();
        ((sum as f64 / frames.len() as f64).round()) as u32
    };

    let row_count = (h / 16).max(1);
    let column_count = (w / 16).max(1);
    let rgb_frames: Vec<Frame> = frames.into_iter().map(|f| f.rgb).collect();

    Ok(PixelBean::new(row_count, column_count, mean_delay, rgb_frames))
}
