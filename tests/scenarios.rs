//! Literal end-to-end container fixtures, one per format tag, plus the
//! negative scenarios from the container's failure taxonomy.

use aes::Aes128;
use cbc::cipher::{block_padding::NoPadding, BlockEncryptMut, KeyIvInit};

const AES_KEY: [u8; 16] = [
    0x70, 0x69, 0x78, 0x65, 0x6c, 0x62, 0x65, 0x61, 0x6e, 0x21, 0x6b, 0x65, 0x79, 0x30, 0x30, 0x31,
];
const AES_IV: [u8; 16] = [
    0x70, 0x69, 0x78, 0x65, 0x6c, 0x62, 0x65, 0x61, 0x6e, 0x21, 0x69, 0x76, 0x30, 0x30, 0x30, 0x31,
];

/// Builds a minimal single-frame, 16x16, 2-color palette-bitstream
/// plaintext: subtype (has-delta), frame size, delay, then a full 2-entry
/// palette, then 256 packed 1-bit indices with only pixel 0 set.
fn scenario_a_plaintext() -> Vec<u8> {
    let mut indices_body = Vec::new();
    let mut byte = 0u8;
    let mut bit = 0u8;
    for px in 0..(16 * 16) {
        let idx: u8 = if px == 0 { 1 } else { 0 };
        byte |= idx << bit;
        bit += 1;
        if bit == 8 {
            indices_body.push(byte);
            byte = 0;
            bit = 0;
        }
    }
    if bit > 0 {
        indices_body.push(byte);
    }

    let mut body = vec![2u8]; // palette size
    body.extend_from_slice(&[255, 0, 0]); // entry 0: red
    body.extend_from_slice(&[0, 255, 0]); // entry 1: green
    body.extend_from_slice(&indices_body);

    let frame_size = (5 + body.len()) as u16;
    let mut out = vec![0b0000_0001u8]; // subtype: has-palette-delta
    out.extend_from_slice(&frame_size.to_le_bytes());
    out.extend_from_slice(&40u16.to_le_bytes()); // delay 40ms
    out.extend_from_slice(&body);
    out
}

fn container_header(tag: u8, body: &[u8]) -> Vec<u8> {
    let declared_len = 1 + body.len();
    let mut out = (declared_len as u32).to_be_bytes().to_vec();
    out.push(tag);
    out.extend_from_slice(body);
    out
}

#[test]
fn scenario_a_format_17_trivial() {
    let plaintext = scenario_a_plaintext();
    let payload = container_header(17, &plaintext);

    let bean = pixelbean::decode(&payload).unwrap();
    assert_eq!(bean.total_frames(), 1);
    assert_eq!(bean.width(), 16);
    assert_eq!(bean.height(), 16);
    assert_eq!(bean.speed_ms(), 40);

    let frame = bean.frame(0).unwrap();
    assert_eq!(&frame[0..3], &[0, 255, 0], "pixel 0 is green");
    assert_eq!(&frame[3..6], &[255, 0, 0], "pixel 1 is red");
}

#[test]
fn scenario_b_format_9_aes_only() {
    let mut plaintext = scenario_a_plaintext();
    // AES-CBC needs block-aligned input; pad to a 16-byte multiple the
    // same way the container's compressor-free path (format 9) must: the
    // frame decoder tolerates a short dangling byte, but here we round up
    // to a full block using zero bytes, which the bitstream loop treats as
    // an exhausted trailing frame.
    while plaintext.len() % 16 != 0 {
        plaintext.push(0);
    }

    let mut ciphertext = plaintext.clone();
    cbc::Encryptor::<Aes128>::new(&AES_KEY.into(), &AES_IV.into())
        .encrypt_padded_mut::<NoPadding>(&mut ciphertext, plaintext.len())
        .unwrap();

    let payload = container_header(9, &ciphertext);
    let bean = pixelbean::decode(&payload).unwrap();

    assert_eq!(bean.total_frames(), 1);
    assert_eq!(bean.speed_ms(), 40);
    let frame = bean.frame(0).unwrap();
    assert_eq!(&frame[0..3], &[0, 255, 0]);
}

#[test]
fn scenario_d_format_26_four_quadrants() {
    // One 64x64 frame: recurse into four 32x32 children, each a literal
    // 1-bit block... format 26's leaf literal blocks are read per declared
    // block size, so drive each quadrant down one more level to an 8x8
    // granularity isn't required by the decoder itself (it reads
    // `block.size` directly) - a literal block may cover a full 32x32
    // quadrant in one shot.
    let mut global_palette_colors: Vec<[u8; 3]> = vec![
        [255, 0, 0],
        [0, 255, 0],
        [0, 0, 255],
        [255, 255, 0],
    ];

    let mut tree_bits = Vec::new();
    tree_bits.push(0x01u8); // root: recurse

    // Each quadrant: literal mode, 2-bit width, all pixels = its own index.
    for quadrant_index in 0..4u8 {
        tree_bits.push(0x00); // literal
        tree_bits.push(2); // bit width for a 4-color palette
        let mut packed = Vec::new();
        let mut byte = 0u8;
        let mut bitpos = 0u8;
        for _ in 0..(32 * 32) {
            byte |= quadrant_index << bitpos;
            bitpos += 2;
            if bitpos == 8 {
                packed.push(byte);
                byte = 0;
                bitpos = 0;
            }
        }
        if bitpos > 0 {
            packed.push(byte);
        }
        tree_bits.extend(packed);
    }

    let mut body = vec![4u8];
    for c in &global_palette_colors {
        body.extend_from_slice(c);
    }
    body.extend_from_slice(&tree_bits);

    let frame_size = (5 + body.len()) as u16;
    // subtype bit 7 = 0 selects the 64x64 grid.
    let mut plaintext = vec![0b0000_0001u8];
    plaintext.extend_from_slice(&frame_size.to_le_bytes());
    plaintext.extend_from_slice(&80u16.to_le_bytes());
    plaintext.extend_from_slice(&body);

    let expected_len = (plaintext.len() as u32).to_le_bytes();
    let mut lzo_wrapped = expected_len.to_vec();
    lzo_wrapped.extend_from_slice(&minilzo_rs::LZO::init().unwrap().compress(&plaintext).unwrap());

    let mut aes_input = lzo_wrapped;
    while aes_input.len() % 16 != 0 {
        aes_input.push(0);
    }
    let mut ciphertext = aes_input.clone();
    cbc::Encryptor::<Aes128>::new(&AES_KEY.into(), &AES_IV.into())
        .encrypt_padded_mut::<NoPadding>(&mut ciphertext, aes_input.len())
        .unwrap();

    let payload = container_header(26, &ciphertext);
    let bean = pixelbean::decode(&payload).unwrap();

    assert_eq!(bean.width(), 64);
    assert_eq!(bean.height(), 64);
    let frame = bean.frame(0).unwrap();

    // Top-left quadrant -> palette 0 (red); each quadrant distinct.
    assert_eq!(&frame[0..3], &global_palette_colors[0]);
    let top_right_px = (32usize) * 3;
    assert_eq!(&frame[top_right_px..top_right_px + 3], &global_palette_colors[1]);
    global_palette_colors.clear();
}

/// Builds one format-18-style 32x32 palette-bitstream frame.
fn grid32_frame_bytes(subtype: u8, delay_ms: u16, palette: &[[u8; 3]], index: u8) -> Vec<u8> {
    let pixel_count = 32 * 32;
    let mut body = Vec::new();
    if subtype & 0b0000_0001 != 0 {
        body.push(palette.len() as u8);
        for c in palette {
            body.extend_from_slice(c);
        }
    }
    let mut byte = 0u8;
    let mut bit = 0u8;
    for _ in 0..pixel_count {
        byte |= (index & 1) << bit;
        bit += 1;
        if bit == 8 {
            body.push(byte);
            byte = 0;
            bit = 0;
        }
    }
    if bit > 0 {
        body.push(byte);
    }

    let frame_size = (5 + body.len()) as u16;
    let mut out = vec![subtype];
    out.extend_from_slice(&frame_size.to_le_bytes());
    out.extend_from_slice(&delay_ms.to_le_bytes());
    out.extend_from_slice(&body);
    out
}

#[test]
fn scenario_c_format_18_aes_lzo_multi_frame_with_palette_delta() {
    // Frame 1: full 2-color palette (red, green), every pixel green (index 1).
    let frame1 = grid32_frame_bytes(0b0000_0001, 40, &[[255, 0, 0], [0, 255, 0]], 1);
    // Frame 2: empty delta (subtype bit 0 clear, no palette bytes at all),
    // reuses frame 1's palette, every pixel red (index 0).
    let frame2 = grid32_frame_bytes(0b0000_0000, 50, &[], 0);

    let mut plaintext = frame1;
    plaintext.extend(frame2);

    let expected_len = (plaintext.len() as u32).to_le_bytes();
    let mut lzo_wrapped = expected_len.to_vec();
    lzo_wrapped.extend_from_slice(&minilzo_rs::LZO::init().unwrap().compress(&plaintext).unwrap());

    let mut aes_input = lzo_wrapped;
    while aes_input.len() % 16 != 0 {
        aes_input.push(0);
    }
    let mut ciphertext = aes_input.clone();
    cbc::Encryptor::<Aes128>::new(&AES_KEY.into(), &AES_IV.into())
        .encrypt_padded_mut::<NoPadding>(&mut ciphertext, aes_input.len())
        .unwrap();

    let payload = container_header(18, &ciphertext);
    let bean = pixelbean::decode(&payload).unwrap();

    assert_eq!(bean.total_frames(), 2);
    assert_eq!(bean.width(), 32);
    assert_eq!(bean.height(), 32);
    assert_eq!(bean.speed_ms(), 50);

    let first = bean.frame(0).unwrap();
    assert_eq!(&first[0..3], &[0, 255, 0], "frame 1 pixel 0 is green");
    let second = bean.frame(1).unwrap();
    assert_eq!(&second[0..3], &[255, 0, 0], "frame 2 reuses the palette, pixel 0 is red");
}

#[test]
fn scenario_f_format_42_zstd_jpeg_sequence() {
    fn encode_solid_jpeg(color: [u8; 3]) -> Vec<u8> {
        let pixels: Vec<u8> = color.repeat(16 * 16);
        let mut bytes = Vec::new();
        let encoder = jpeg_encoder::Encoder::new(&mut bytes, 100);
        encoder
            .encode(&pixels, 16, 16, jpeg_encoder::ColorType::Rgb)
            .unwrap();
        bytes
    }

    let mut plaintext = Vec::new();
    for (delay_ms, color) in [(30u16, [200u8, 10, 10]), (60u16, [10u8, 10, 200])] {
        let jpeg = encode_solid_jpeg(color);
        plaintext.extend_from_slice(&delay_ms.to_le_bytes());
        plaintext.extend_from_slice(&jpeg);
    }

    let compressed = zstd::encode_all(&plaintext[..], 3).unwrap();
    let payload = container_header(42, &compressed);
    let bean = pixelbean::decode(&payload).unwrap();

    assert_eq!(bean.total_frames(), 2);
    assert_eq!(bean.width(), 16);
    assert_eq!(bean.height(), 16);
    assert_eq!(bean.speed_ms(), 45); // mean of 30 and 60
}

#[test]
fn scenario_e_format_43_embedded_gif() {
    let mut gif_bytes = Vec::new();
    {
        let mut encoder = gif::Encoder::new(&mut gif_bytes, 16, 16, &[]).unwrap();
        encoder.set_repeat(gif::Repeat::Infinite).unwrap();
        for color in [[255u8, 0, 0], [0, 255, 0], [0, 0, 255]] {
            let pixels: Vec<u8> = color.repeat(16 * 16);
            let mut frame = gif::Frame::from_rgb(16, 16, &pixels);
            frame.delay = 10; // 100ms
            encoder.write_frame(&frame).unwrap();
        }
    }

    let payload = container_header(43, &gif_bytes);
    let bean = pixelbean::decode(&payload).unwrap();

    assert_eq!(bean.total_frames(), 3);
    assert_eq!(bean.speed_ms(), 100);
    assert_eq!(bean.width(), 16);
    assert_eq!(bean.height(), 16);
}

#[test]
fn negative_truncated_payload() {
    let payload = [0x00, 0x00, 0x00, 0x05, 17, 0, 0, 0]; // declares 5, only 4 follow
    let err = pixelbean::decode(&payload).unwrap_err();
    assert!(matches!(err, pixelbean::DecodeError::TruncatedHeader { .. }));
}

#[test]
fn negative_unsupported_tag() {
    let payload = container_header(20, &[]);
    let err = pixelbean::decode(&payload).unwrap_err();
    assert!(matches!(err, pixelbean::DecodeError::UnsupportedFormat(20)));
}

#[test]
fn negative_aes_length_47() {
    let payload = container_header(9, &vec![0u8; 47]);
    let err = pixelbean::decode(&payload).unwrap_err();
    assert!(matches!(err, pixelbean::DecodeError::CryptoAlignment(47)));
}
