//! Rolling palette for palette-bitstream formats.
//!
//! The palette is owned by a single stream's frame-decoder loop, not a
//! shared cache: it is a value threaded through frames, mutated in place by
//! delta headers. Represented as a fixed-capacity 256-entry array with a
//! length cursor, per the design notes — no `Rc`/`Arc`, no interior
//! mutability.

use crate::constants::bits_for_palette_size;

/// An RGB triple.
pub type Rgb = [u8; 3];

/// Ordered palette of up to 256 RGB entries, mutated across frames by delta
/// updates.
#[derive(Clone)]
pub struct Palette {
    entries: [Rgb; 256],
    len: usize,
}

impl Palette {
    /// An empty palette.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: [[0, 0, 0]; 256],
            len: 0,
        }
    }

    /// Number of entries currently in the palette.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the palette has no entries yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bit width needed to index this palette (spec's non-power-of-two
    /// smoothing table).
    #[must_use]
    pub fn index_bits(&self) -> u8 {
        bits_for_palette_size(self.len)
    }

    /// Looks up entry `index`, if in range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Rgb> {
        if index < self.len {
            Some(self.entries[index])
        } else {
            None
        }
    }

    /// Replaces the whole palette with `colors` (a "full palette" frame
    /// header, always present on the first frame of a stream).
    ///
    /// Truncates to 256 entries if handed more; the wire format never
    /// declares more than that, but this keeps the fixed-capacity array
    /// panic-free against malformed input.
    pub fn replace(&mut self, colors: &[Rgb]) {
        let n = colors.len().min(self.entries.len());
        self.entries[..n].copy_from_slice(&colors[..n]);
        self.len = n;
    }

    /// Appends `colors` to the existing palette (a "delta palette" frame
    /// header). An empty delta is legal and leaves the palette unchanged.
    pub fn append(&mut self, colors: &[Rgb]) {
        for &c in colors {
            if self.len < self.entries.len() {
                self.entries[self.len] = c;
                self.len += 1;
            }
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let p = Palette::new();
        assert_eq!(p.len(), 0);
        assert!(p.is_empty());
        assert_eq!(p.get(0), None);
    }

    #[test]
    fn replace_then_append() {
        let mut p = Palette::new();
        p.replace(&[[255, 0, 0], [0, 255, 0]]);
        assert_eq!(p.len(), 2);
        assert_eq!(p.index_bits(), 1);

        p.append(&[[0, 0, 255]]);
        assert_eq!(p.len(), 3);
        assert_eq!(p.index_bits(), 2);
        assert_eq!(p.get(2), Some([0, 0, 255]));
    }

    #[test]
    fn empty_delta_leaves_palette_unchanged() {
        let mut p = Palette::new();
        p.replace(&[[1, 2, 3]]);
        p.append(&[]);
        assert_eq!(p.len(), 1);
        assert_eq!(p.get(0), Some([1, 2, 3]));
    }

    #[test]
    fn single_entry_palette_uses_one_bit() {
        let mut p = Palette::new();
        p.replace(&[[9, 9, 9]]);
        assert_eq!(p.index_bits(), 1);
    }
}
