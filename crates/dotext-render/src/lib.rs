//! dotext Render
//!
//! A small CPU raster surface with the subset of 2D-canvas semantics the dot
//! renderer needs: a save/restore state stack carrying global alpha and an
//! affine transform, anti-aliased circle batches, fractional rect fills, and
//! alpha readback.

mod color;
pub mod pixmap;
pub mod readback;

pub use color::{Color, ColorParseError};
pub use pixmap::Pixmap;
pub use readback::{ReadbackError, lit_pixels};
