//! Error types for pixel-bean decoding and encoding.

use thiserror::Error;

/// Result type for decode operations.
pub type Result<T> = std::result::Result<T, DecodeError>;

/// Errors that can occur while decoding a pixel-bean container.
///
/// Every variant here corresponds to one row of the container's failure
/// taxonomy: a decode either succeeds with a fully-formed [`crate::PixelBean`]
/// or fails atomically with one of these. None are retried internally.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Declared payload length exceeds the bytes actually available.
    #[error("truncated header: declared {declared} bytes, only {available} available")]
    TruncatedHeader {
        /// Length declared by the 4-byte payload-length field.
        declared: usize,
        /// Bytes actually remaining after the length field.
        available: usize,
    },

    /// Format tag byte is not one of {9, 17, 18, 26, 31, 42, 43}.
    #[error("unsupported format tag: {0}")]
    UnsupportedFormat(u8),

    /// AES-CBC input length is not a multiple of the 16-byte block size.
    #[error("AES-CBC input length {0} is not a multiple of 16")]
    CryptoAlignment(usize),

    /// LZO1X-1 output length did not match the length declared by the container.
    #[error("LZO output length mismatch: expected {expected}, got {actual}")]
    LzoLength {
        /// Length declared by the container.
        expected: usize,
        /// Length actually produced by the decompressor.
        actual: usize,
    },

    /// The Zstd bitstream was malformed.
    #[error("Zstd decode failed: {0}")]
    ZstdDecodeFailed(String),

    /// Format-26 block tree exceeded its recursion depth or used an
    /// out-of-range block-mode byte.
    #[error("malformed format-26 tile tree: {0}")]
    MalformedTree(String),

    /// Bit reader advanced past the end of plaintext by more than the
    /// one-byte trailing-padding tolerance.
    #[error("bitstream overrun: read past end of plaintext by {0} bytes")]
    BitstreamOverrun(usize),

    /// Frame header declared a size exceeding remaining plaintext by more
    /// than the one-byte trailing-padding tolerance.
    #[error("truncated frame: declared size {declared}, only {available} bytes remain")]
    TruncatedFrame {
        /// Size declared by the per-frame header.
        declared: usize,
        /// Bytes actually remaining in the plaintext.
        available: usize,
    },

    /// Embedded images (formats 31, 42, 43) did not all share one dimension.
    #[error("embedded frames do not share dimensions: first {first:?}, found {found:?}")]
    DimensionMismatch {
        /// Dimensions of the first frame in the sequence.
        first: (u32, u32),
        /// Dimensions of the frame that differed.
        found: (u32, u32),
    },

    /// The underlying JPEG/GIF/WebP decoder rejected the embedded payload.
    #[error("embedded image decode failed: {0}")]
    EmbeddedDecode(String),

    /// A postcondition the decoder itself guarantees was not met; this
    /// indicates a decoder bug rather than malformed input.
    #[error("internal invariant violated: {0}")]
    InvariantViolation(String),
}

/// Errors that can occur while encoding a [`crate::PixelBean`] to WebP or GIF.
///
/// `PixelBean` upholds "at least one frame" as an internal invariant, so a
/// `PixelBean` built by this crate's own decoder never triggers
/// [`EncodeError::EmptyInput`]; it exists for callers who construct a
/// `PixelBean` by hand at the public API boundary.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The `PixelBean` passed to an encoder had zero frames.
    #[error("cannot encode a PixelBean with zero frames")]
    EmptyInput,

    /// The underlying GIF or WebP writer reported an I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
