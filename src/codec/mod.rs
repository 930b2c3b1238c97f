//! Per-format frame decoders.
//!
//! Each format tag maps to exactly one function here; [`crate::container`]
//! dispatches to them through a closed `match`, never a trait object — see
//! the "no virtual table" design note.

mod embedded;
mod format26;
mod palette_bitstream;

pub use embedded::{decode_jpeg_sequence, decode_zstd_jpeg_sequence, decode_gif_or_webp};
pub use format26::decode_format26;
pub use palette_bitstream::decode_palette_bitstream;
