//! Math types backed by `glam`.
//!
//! Particle positions and velocities are [`Vec2`]; surface transforms are
//! [`Affine2`].
//!
//! ```
//! use dotext_core::math::{Vec2, lerp_vec2};
//!
//! let start = Vec2::new(-10.0, 4.0);
//! let target = Vec2::new(10.0, 4.0);
//! assert_eq!(lerp_vec2(start, target, 0.5), Vec2::new(0.0, 4.0));
//! ```

pub use glam::{Affine2, Mat2, Vec2};

/// Linear interpolation between `a` and `b`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Component-wise linear interpolation between two points.
#[inline]
pub fn lerp_vec2(a: Vec2, b: Vec2, t: f32) -> Vec2 {
    Vec2::new(lerp(a.x, b.x, t), lerp(a.y, b.y, t))
}

/// Axis-aligned rectangle in client (host) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// True when either side is zero (or negative), i.e. nothing is displayed.
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp(2.0, 8.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 8.0, 1.0), 8.0);
        assert_eq!(lerp(2.0, 8.0, 0.25), 3.5);
    }

    #[test]
    fn test_rect_degenerate() {
        assert!(Rect::new(0.0, 0.0, 0.0, 10.0).is_degenerate());
        assert!(Rect::new(0.0, 0.0, 10.0, -1.0).is_degenerate());
        assert!(!Rect::new(5.0, 5.0, 1.0, 1.0).is_degenerate());
    }
}
