//! Container constants.
//!
//! These are not user configuration: the pixel-bean container format has no
//! config file and no environment variables (see [`crate`] docs). This module
//! is the compiled-in equivalent — the fixed AES key/IV the cloud service
//! bakes into every client, and the small lookup tables the format-26
//! hierarchical decoder depends on.

/// 128-bit AES key used by every AES-CBC-wrapped container (formats 9, 18, 26).
///
/// This is a container constant, not a secret belonging to any one user or
/// gallery; it is identical across every pixel-bean payload the cloud service
/// produces.
pub const AES_KEY: [u8; 16] = [
    0x70, 0x69, 0x78, 0x65, 0x6c, 0x62, 0x65, 0x61, 0x6e, 0x21, 0x6b, 0x65, 0x79, 0x30, 0x30, 0x31,
];

/// 128-bit AES IV paired with [`AES_KEY`].
pub const AES_IV: [u8; 16] = [
    0x70, 0x69, 0x78, 0x65, 0x6c, 0x62, 0x65, 0x61, 0x6e, 0x21, 0x69, 0x76, 0x30, 0x30, 0x30, 0x31,
];

/// Minimum per-frame delay, in milliseconds (spec invariant: `speed_ms >= 10`).
pub const MIN_SPEED_MS: u32 = 10;

/// Maximum recursion depth of the format-26 tile grid (128 -> 64 -> 32 -> 16 -> 8).
pub const MAX_TILE_DEPTH: u32 = 5;

/// Bit width needed to index a palette of `size` entries.
///
/// Not a plain `ceil(log2(size))`: sizes 1 and 2 both take 1 bit (there is no
/// such thing as a 0-bit read), matching the non-power-of-two smoothing the
/// reference decoder applies.
#[must_use]
pub fn bits_for_palette_size(size: usize) -> u8 {
    match size {
        0 | 1 => 1,
        2 => 1,
        3..=4 => 2,
        5..=8 => 3,
        9..=16 => 4,
        17..=32 => 5,
        33..=64 => 6,
        65..=128 => 7,
        _ => 8,
    }
}
