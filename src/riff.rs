//! Minimal RIFF chunk walking/writing, shared by the format-43 embedded-WebP
//! path and the WebP encoder.
//!
//! Grounded the way `protocol.rs`'s wire structs are: small hand-written
//! `read`/`write` helpers over `bytes::Buf`/`BufMut` rather than a general
//! container-parsing crate, since the decoder only ever needs a handful of
//! chunk kinds (`VP8X`, `ANIM`, `ANMF`, `VP8L`).

use bytes::{BufMut, BytesMut};

/// One RIFF chunk: a 4-byte FourCC, its declared payload length, and the
/// payload itself (padding byte, if any, is not included).
#[derive(Debug, Clone)]
pub struct Chunk<'a> {
    /// Four-character chunk identifier (e.g. `b"VP8L"`).
    pub fourcc: [u8; 4],
    /// Chunk payload, excluding the 8-byte fourcc+length header.
    pub data: &'a [u8],
}

/// Walks the top-level chunks of a RIFF container, skipping the outer
/// `RIFF....WEBP` wrapper.
///
/// Returns an empty vec if `data` is not a well-formed RIFF/WEBP container.
#[must_use]
pub fn parse_chunks(data: &[u8]) -> Vec<Chunk<'_>> {
    if data.len() < 12 || &data[0..4] != b"RIFF" || &data[8..12] != b"WEBP" {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    let mut buf = &data[12..];

    while buf.len() >= 8 {
        let mut fourcc = [0u8; 4];
        fourcc.copy_from_slice(&buf[0..4]);
        let len = u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]) as usize;

        if buf.len() < 8 + len {
            break;
        }
        chunks.push(Chunk {
            fourcc,
            data: &buf[8..8 + len],
        });

        let padded_len = len + (len % 2);
        if buf.len() < 8 + padded_len {
            break;
        }
        buf = &buf[8 + padded_len..];
    }

    chunks
}

/// Finds the first chunk with the given FourCC.
#[must_use]
pub fn find_chunk<'a>(data: &'a [u8], fourcc: &[u8; 4]) -> Option<&'a [u8]> {
    parse_chunks(data)
        .into_iter()
        .find(|c| &c.fourcc == fourcc)
        .map(|c| c.data)
}

/// Appends one chunk (fourcc + little-endian length + payload + even-padding
/// byte) to `out`.
pub fn write_chunk(out: &mut BytesMut, fourcc: &[u8; 4], payload: &[u8]) {
    out.put_slice(fourcc);
    out.put_u32_le(payload.len() as u32);
    out.put_slice(payload);
    if payload.len() % 2 == 1 {
        out.put_u8(0);
    }
}

/// Wraps `chunks_payload` (the already-assembled concatenation of
/// `VP8X`/`ANIM`/`ANMF` chunks) in the outer `RIFF....WEBP` header.
#[must_use]
pub fn wrap_riff_webp(chunks_payload: &[u8]) -> Vec<u8> {
    let mut out = BytesMut::with_capacity(12 + chunks_payload.len());
    out.put_slice(b"RIFF");
    out.put_u32_le((4 + chunks_payload.len()) as u32);
    out.put_slice(b"WEBP");
    out.put_slice(chunks_payload);
    out.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_single_chunk() {
        let mut payload = BytesMut::new();
        write_chunk(&mut payload, b"VP8L", &[1, 2, 3]);
        let wrapped = wrap_riff_webp(&payload);

        let found = find_chunk(&wrapped, b"VP8L").unwrap();
        assert_eq!(found, &[1, 2, 3]);
    }

    #[test]
    fn odd_length_payload_gets_padding_byte() {
        let mut payload = BytesMut::new();
        write_chunk(&mut payload, b"ANMF", &[1, 2, 3]);
        // fourcc(4) + len(4) + data(3) + pad(1) = 12
        assert_eq!(payload.len(), 12);
    }

    #[test]
    fn non_riff_input_yields_no_chunks() {
        assert!(parse_chunks(b"not a riff file at all").is_empty());
    }
}
