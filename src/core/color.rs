use glam::Vec4;
use rand::Rng;

/// Number of entries in the default sparkle palette.
pub const SPARKLE_PALETTE_SIZE: usize = 3;

/// An ordered, non-empty list of RGBA colors that particles cycle through by index.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<Vec4>,
}

impl Palette {
    /// Creates a new [Palette] from the given colors. Returns `None` if `colors` is empty.
    pub fn new(colors: Vec<Vec4>) -> Option<Self> {
        if colors.is_empty() {
            return None;
        }
        Some(Self { colors })
    }

    /// Creates the cool blue palette of the shiny button: a single random
    /// color repeated in every entry, so the whole cloud shares one tint.
    ///
    /// Each channel is drawn from its own band: red in `[0, 0.3)`, green in
    /// `[0.3, 0.7)`, blue in `[0.7, 1)`, alpha fixed at 1.
    pub fn sparkle(rng: &mut impl Rng) -> Self {
        let color = Vec4::new(
            rng.gen_range(0.0..0.3),
            rng.gen_range(0.3..0.7),
            rng.gen_range(0.7..1.0),
            1.0,
        );
        Self {
            colors: vec![color; SPARKLE_PALETTE_SIZE],
        }
    }

    /// Returns the color assigned to the particle slot at `index`.
    #[inline]
    pub fn cycle(&self, index: usize) -> Vec4 {
        self.colors[index % self.colors.len()]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[Vec4] {
        &self.colors
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn test_empty_palette_is_rejected() {
        assert!(Palette::new(Vec::new()).is_none());
    }

    #[test]
    fn test_cycle_wraps_by_index() {
        let palette = Palette::new(vec![Vec4::X, Vec4::Y, Vec4::Z]).unwrap();
        assert_eq!(palette.cycle(0), Vec4::X);
        assert_eq!(palette.cycle(4), Vec4::Y);
        assert_eq!(palette.cycle(31), Vec4::Y);
        assert_eq!(palette.cycle(32), Vec4::Z);
    }

    #[test]
    fn test_sparkle_channels_stay_in_band() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..64 {
            let palette = Palette::sparkle(&mut rng);
            assert_eq!(palette.len(), SPARKLE_PALETTE_SIZE);
            assert!(palette.colors().iter().all(|c| *c == palette.cycle(0)));
            for color in palette.colors() {
                assert!((0.0..0.3).contains(&color.x));
                assert!((0.3..0.7).contains(&color.y));
                assert!((0.7..1.0).contains(&color.z));
                assert_eq!(color.w, 1.0);
            }
        }
    }
}
