//! The canonical decoded-animation value.

use std::fmt;

use crate::constants::MIN_SPEED_MS;

/// One decoded animation frame: an owned, immutable RGB buffer.
///
/// Row-major, top-left origin, channel order R, G, B. Length is always
/// `width * height * 3` for the [`PixelBean`] that owns it.
pub type Frame = Vec<u8>;

/// The result of decoding a pixel-bean container: an ordered sequence of
/// same-sized RGB frames plus a uniform per-frame delay.
///
/// Constructed exactly once by [`crate::decode`] (or assembled by hand via
/// [`PixelBean::new`] for callers feeding the encoders directly) and never
/// mutated afterward.
#[derive(Debug, Clone)]
pub struct PixelBean {
    row_count: u32,
    column_count: u32,
    speed_ms: u32,
    frames: Vec<Frame>,
}

impl PixelBean {
    /// Builds a `PixelBean` from its parts, clamping `speed_ms` to the
    /// invariant floor of [`MIN_SPEED_MS`].
    ///
    /// # Panics
    ///
    /// Panics if `frames` is empty, if any frame's length does not equal
    /// `column_count * 16 * row_count * 16 * 3`, or if frames differ in
    /// length from one another. These are the invariants every `PixelBean`
    /// upholds for its lifetime; a decoder that violates them has a bug.
    #[must_use]
    pub fn new(row_count: u32, column_count: u32, speed_ms: u32, frames: Vec<Frame>) -> Self {
        assert!(!frames.is_empty(), "PixelBean requires at least one frame");

        let expected_len = (column_count as usize * 16) * (row_count as usize * 16) * 3;
        for frame in &frames {
            assert_eq!(
                frame.len(),
                expected_len,
                "frame length does not match row_count/column_count"
            );
        }

        Self {
            row_count,
            column_count,
            speed_ms: speed_ms.max(MIN_SPEED_MS),
            frames,
        }
    }

    /// Grid height in 16-pixel units.
    #[must_use]
    pub fn row_count(&self) -> u32 {
        self.row_count
    }

    /// Grid width in 16-pixel units.
    #[must_use]
    pub fn column_count(&self) -> u32 {
        self.column_count
    }

    /// Frame width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.column_count * 16
    }

    /// Frame height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.row_count * 16
    }

    /// Number of frames; always equal to `self.frames().len()`.
    #[must_use]
    pub fn total_frames(&self) -> usize {
        self.frames.len()
    }

    /// Uniform per-frame delay in milliseconds, always `>= MIN_SPEED_MS`.
    #[must_use]
    pub fn speed_ms(&self) -> u32 {
        self.speed_ms
    }

    /// Borrows frame `i`'s RGB buffer.
    #[must_use]
    pub fn frame(&self, i: usize) -> Option<&[u8]> {
        self.frames.get(i).map(Vec::as_slice)
    }

    /// Borrows all frames in order.
    #[must_use]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }
}

impl fmt::Display for PixelBean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} grid, {} frames @ {}ms",
            self.column_count,
            self.row_count,
            self.total_frames(),
            self.speed_ms
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimensions_derive_from_counts() {
        let bean = PixelBean::new(1, 1, 40, vec![vec![0u8; 16 * 16 * 3]]);
        assert_eq!(bean.width(), 16);
        assert_eq!(bean.height(), 16);
        assert_eq!(bean.total_frames(), 1);
    }

    #[test]
    fn speed_is_clamped_to_floor() {
        let bean = PixelBean::new(1, 1, 1, vec![vec![0u8; 16 * 16 * 3]]);
        assert_eq!(bean.speed_ms(), MIN_SPEED_MS);
    }

    #[test]
    #[should_panic(expected = "at least one frame")]
    fn rejects_zero_frames() {
        PixelBean::new(1, 1, 40, vec![]);
    }

    #[test]
    #[should_panic(expected = "frame length")]
    fn rejects_mismatched_frame_length() {
        PixelBean::new(1, 1, 40, vec![vec![0u8; 10]]);
    }

    #[test]
    fn display_is_human_readable() {
        let bean = PixelBean::new(2, 2, 100, vec![vec![0u8; 32 * 32 * 3]]);
        assert_eq!(format!("{bean}"), "2x2 grid, 1 frames @ 100ms");
    }
}
