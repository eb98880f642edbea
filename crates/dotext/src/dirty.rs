//! Change classification for repaints.

use bitflags::bitflags;

bitflags! {
    /// What a configuration patch actually changed.
    ///
    /// Only text, density and typeface affect the occupancy grid; every
    /// other flag can be satisfied by repainting the existing grid.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RepaintFlags: u16 {
        /// No changes
        const NONE      = 0b0000_0000;

        /// Text content changed. Requires re-sampling.
        const TEXT      = 0b0000_0001;

        /// Normalized sampling density changed. Requires re-sampling.
        const DENSITY   = 0b0000_0010;

        /// Typeface changed. Requires re-sampling.
        const TYPEFACE  = 0b0000_0100;

        /// Font size changed (surface size and dot spacing).
        const FONT_SIZE = 0b0000_1000;

        /// Dot color changed.
        const COLOR     = 0b0001_0000;

        /// Dot thickness factor changed.
        const WEIGHT    = 0b0010_0000;

        /// Custom shape callback was set or removed.
        const SHAPE     = 0b0100_0000;

        /// Animation request was set or removed.
        const ANIMATION = 0b1000_0000;
    }
}

impl RepaintFlags {
    /// Returns true if the occupancy grid must be rebuilt.
    #[inline]
    pub fn needs_resample(&self) -> bool {
        self.intersects(Self::TEXT | Self::DENSITY | Self::TYPEFACE)
    }

    /// Returns true if something changed but the grid can be reused.
    #[inline]
    pub fn is_paint_only(&self) -> bool {
        !self.is_empty() && !self.needs_resample()
    }
}

impl Default for RepaintFlags {
    fn default() -> Self {
        Self::NONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_flags() {
        assert!(RepaintFlags::TEXT.needs_resample());
        assert!(RepaintFlags::DENSITY.needs_resample());
        assert!(RepaintFlags::TYPEFACE.needs_resample());
        assert!(!RepaintFlags::COLOR.needs_resample());
        assert!(!(RepaintFlags::FONT_SIZE | RepaintFlags::WEIGHT).needs_resample());
    }

    #[test]
    fn test_paint_only() {
        assert!(RepaintFlags::COLOR.is_paint_only());
        assert!((RepaintFlags::ANIMATION | RepaintFlags::SHAPE).is_paint_only());
        assert!(!(RepaintFlags::COLOR | RepaintFlags::TEXT).is_paint_only());
        assert!(!RepaintFlags::NONE.is_paint_only());
        assert_eq!(RepaintFlags::default(), RepaintFlags::NONE);
    }
}
