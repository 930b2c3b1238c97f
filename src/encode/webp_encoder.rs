//! Lossless animated WebP encoder.
//!
//! `image-webp` only exposes a single-frame lossless encoder (plain
//! `RIFF/WEBP/VP8L`, no extended/animation chunks). The animated container
//! — `VP8X`, `ANIM`, one `ANMF` per frame — is hand-written here the same
//! way `protocol.rs` hand-writes VNC wire structs; each `ANMF`'s payload is
//! the `VP8L` chunk lifted out of a single-frame encode via [`crate::riff`].

use bytes::BufMut;
use image_webp::{ColorType, WebPEncoder};

use crate::bean::PixelBean;
use crate::error::EncodeError;
use crate::riff;

/// Encodes `bean` as a lossless, infinitely-looping animated WebP.
pub fn encode_webp(bean: &PixelBean) -> Result<Vec<u8>, EncodeError> {
    let width = bean.width();
    let height = bean.height();

    let mut anmf_chunks = Vec::new();
    for frame in bean.frames() {
        let vp8l = single_frame_vp8l(frame, width, height)?;

        let mut anmf_payload = Vec::with_capacity(16 + vp8l.len());
        write_anmf_header(&mut anmf_payload, width, height, bean.speed_ms());
        let mut vp8l_chunk = bytes::BytesMut::new();
        riff::write_chunk(&mut vp8l_chunk, b"VP8L", &vp8l);
        anmf_payload.extend_from_slice(&vp8l_chunk);

        let mut chunk = bytes::BytesMut::new();
        riff::write_chunk(&mut chunk, b"ANMF", &anmf_payload);
        anmf_chunks.extend_from_slice(&chunk);
    }

    let mut body = bytes::BytesMut::new();
    riff::write_chunk(&mut body, b"VP8X", &vp8x_payload(width, height));
    riff::write_chunk(&mut body, b"ANIM", &anim_payload());
    body.extend_from_slice(&anmf_chunks);

    Ok(riff::wrap_riff_webp(&body))
}

/// Runs `image-webp`'s single-still lossless encoder and extracts the
/// `VP8L` payload, discarding the outer `RIFF/WEBP` wrapper it writes.
fn single_frame_vp8l(rgb: &[u8], width: u32, height: u32) -> Result<Vec<u8>, EncodeError> {
    let mut still = Vec::new();
    WebPEncoder::new(&mut still)
        .encode(rgb, width, height, ColorType::Rgb8)
        .map_err(|e| EncodeError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;

    riff::find_chunk(&still, b"VP8L")
        .map(<[u8]>::to_vec)
        .ok_or_else(|| {
            EncodeError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "image-webp did not produce a VP8L chunk",
            ))
        })
}

fn vp8x_payload(width: u32, height: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(10);
    out.push(0b0000_0010); // flags: ANIM bit set, no alpha/ICC/EXIF/XMP
    out.extend_from_slice(&[0u8; 3]);
    write_u24_le(&mut out, width - 1);
    write_u24_le(&mut out, height - 1);
    out
}

fn anim_payload() -> Vec<u8> {
    let mut out = Vec::with_capacity(6);
    out.extend_from_slice(&[0, 0, 0, 0]); // background color: transparent black
    out.put_u16_le(0); // loop count 0 = infinite
    out
}

fn write_anmf_header(out: &mut Vec<u8>, width: u32, height: u32, duration_ms: u32) {
    write_u24_le(out, 0); // frame X
    write_u24_le(out, 0); // frame Y
    write_u24_le(out, width - 1);
    write_u24_le(out, height - 1);
    write_u24_le(out, duration_ms);
    out.push(0b0000_0011); // dispose = background (bit 0), blend = no-blend (bit 1)
}

fn write_u24_le(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_le_bytes()[0..3]);
}
