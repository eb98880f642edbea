//! Pixel readback from a [`Pixmap`].
//!
//! The dot renderer reads the surface back to find "lit" pixels (alpha > 0),
//! which seed the fly-in and morph transitions.
//!
//! # Example
//!
//! ```
//! use dotext_core::math::Vec2;
//! use dotext_render::{Color, Pixmap, lit_pixels};
//!
//! let mut pixmap = Pixmap::new(4, 4);
//! pixmap.fill_rect(Vec2::new(1.0, 2.0), Vec2::ONE, Color::BLACK);
//! assert_eq!(lit_pixels(&pixmap).unwrap(), vec![Vec2::new(1.5, 2.5)]);
//! ```

use dotext_core::math::Vec2;
use dotext_core::profiling::profile_function;

use crate::Pixmap;

/// Pixel readback error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadbackError {
    /// The surface has a zero dimension.
    InvalidDimensions,
    /// Supplied pixel data does not match the surface dimensions.
    SizeMismatch { expected: usize, actual: usize },
}

impl std::fmt::Display for ReadbackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDimensions => write!(f, "Invalid dimensions for readback"),
            Self::SizeMismatch { expected, actual } => write!(
                f,
                "Pixel data size mismatch: expected {} bytes, got {}",
                expected, actual
            ),
        }
    }
}

impl std::error::Error for ReadbackError {}

/// Centers of every pixel with non-zero alpha, in row-major order.
pub fn lit_pixels(pixmap: &Pixmap) -> Result<Vec<Vec2>, ReadbackError> {
    profile_function!();
    if pixmap.is_empty() {
        return Err(ReadbackError::InvalidDimensions);
    }
    let width = pixmap.width() as usize;
    let lit: Vec<Vec2> = pixmap
        .pixels()
        .iter()
        .enumerate()
        .filter(|(_, p)| p[3] != 0)
        .map(|(i, _)| Vec2::new((i % width) as f32 + 0.5, (i / width) as f32 + 0.5))
        .collect();
    tracing::trace!(
        "Read back {} lit pixels from {}x{}",
        lit.len(),
        pixmap.width(),
        pixmap.height()
    );
    Ok(lit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color;

    #[test]
    fn test_readback_error_display() {
        let err = ReadbackError::InvalidDimensions;
        assert!(format!("{}", err).contains("Invalid dimensions"));

        let err = ReadbackError::SizeMismatch {
            expected: 16,
            actual: 12,
        };
        assert!(err.to_string().contains("expected 16"));
    }

    #[test]
    fn test_zero_sized_surface_is_an_error() {
        assert_eq!(
            lit_pixels(&Pixmap::new(0, 5)),
            Err(ReadbackError::InvalidDimensions)
        );
    }

    #[test]
    fn test_row_major_order() {
        let mut pixmap = Pixmap::new(3, 2);
        pixmap.fill_rect(Vec2::new(2.0, 0.0), Vec2::ONE, Color::BLACK);
        pixmap.fill_rect(Vec2::new(0.0, 1.0), Vec2::ONE, Color::BLACK);
        assert_eq!(
            lit_pixels(&pixmap).unwrap(),
            vec![Vec2::new(2.5, 0.5), Vec2::new(0.5, 1.5)]
        );
    }
}
