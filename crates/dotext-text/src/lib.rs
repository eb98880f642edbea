//! Dotext Text - Glyph sampling into dot matrices
//!
//! This crate turns characters into binary occupancy grids:
//! - Font management with system fonts and custom fonts (cosmic-text)
//! - Pluggable glyph rasterization via [`GlyphRasterizer`]
//! - A shared, key-addressed [`GlyphCache`] with hit/miss statistics
//! - [`build_grid`] to combine per-character matrices for a whole string
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dotext_text::{GlyphSampler, Typeface, build_grid};
//!
//! let sampler = GlyphSampler::shared();
//! let grid = build_grid(&sampler, "Hi", 16.0, &Typeface::new("monospace"));
//!
//! assert_eq!(grid.rows(), 16);
//! println!("{grid}");
//! ```

mod error;
mod field;
mod font;
mod matrix;

pub mod cache;
pub mod raster;
pub mod sampler;

pub use cache::{GlyphCache, GlyphKey};
pub use error::{TextError, TextResult};
pub use field::{build_grid, char_count};
pub use font::{DEFAULT_TYPEFACE, FontDatabase, FontSystem, Typeface};
pub use matrix::OccupancyMatrix;
pub use raster::{CosmicRasterizer, GlyphBitmap, GlyphRasterizer};
pub use sampler::{DEFAULT_DENSITY, GlyphSampler, MAX_DENSITY, MIN_DENSITY, normalize_density};

static_assertions::assert_impl_all!(GlyphCache: Send, Sync, Clone);
static_assertions::assert_impl_all!(GlyphSampler: Send, Sync);
static_assertions::assert_impl_all!(CosmicRasterizer: GlyphRasterizer);
