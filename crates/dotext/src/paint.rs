//! Static dot-field rendering.
//!
//! A grid cell `(row, col)` maps to the surface point
//! `(cell * (col + 0.5), cell * (row + 0.5))` with `cell = font_size / rows`.
//! Dots are circles of radius `cell * font_weight / rows` unless the
//! configuration supplies a [`CustomShape`].

use dotext_core::math::Vec2;
use dotext_core::profiling::profile_function;
use dotext_render::{Color, Pixmap, lit_pixels};
use dotext_text::OccupancyMatrix;

use crate::config::{CustomShape, DotConfig};

/// Largest surface edge, in pixels.
pub const MAX_SURFACE_SIDE: u32 = 32_767;
/// Largest surface area, in pixels.
pub const MAX_SURFACE_AREA: u64 = 268_435_456;

/// Surface size for a text: `floor(font_size * chars) × floor(font_size)`.
///
/// Sizes beyond [`MAX_SURFACE_SIDE`] or [`MAX_SURFACE_AREA`] collapse to
/// `0 × 0`, which paints nothing and starts no animation.
pub fn surface_size(font_size: f32, char_count: usize) -> (u32, u32) {
    let px = |v: f32| if v.is_finite() && v > 0.0 { v.floor() } else { 0.0 };
    let (w, h) = (px(font_size * char_count as f32), px(font_size));
    let limit = MAX_SURFACE_SIDE as f32;
    if w > limit || h > limit || (w as u64) * (h as u64) > MAX_SURFACE_AREA {
        tracing::warn!("Surface {}x{} exceeds the size limit, painting nothing", w, h);
        return (0, 0);
    }
    (w as u32, h as u32)
}

/// Cell spacing and dot radius for one grid at one font size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DotLayout {
    pub cell_size: f32,
    pub dot_radius: f32,
}

impl DotLayout {
    pub fn new(rows: usize, font_size: f32, font_weight: f32) -> Self {
        let rows = rows.max(1) as f32;
        let cell_size = font_size / rows;
        Self {
            cell_size,
            dot_radius: cell_size * font_weight / rows,
        }
    }

    pub fn for_grid(grid: &OccupancyMatrix, config: &DotConfig) -> Self {
        Self::new(grid.rows(), config.font_size, config.font_weight)
    }

    /// Pixel coordinate of the centre of cell `index` along either axis.
    #[inline]
    pub fn center(&self, index: usize) -> f32 {
        self.cell_size * (index as f32 + 0.5)
    }

    pub fn cell_center(&self, row: usize, col: usize) -> Vec2 {
        Vec2::new(self.center(col), self.center(row))
    }

    /// Centres of the occupied cells in `row`, left to right.
    pub fn row_centers<'a>(
        &'a self,
        grid: &'a OccupancyMatrix,
        row: usize,
    ) -> impl Iterator<Item = Vec2> + 'a {
        grid.row(row)
            .iter()
            .enumerate()
            .filter(|(_, lit)| **lit)
            .map(move |(col, _)| self.cell_center(row, col))
    }

    /// Centres of every occupied cell, row-major.
    pub fn centers<'a>(&'a self, grid: &'a OccupancyMatrix) -> impl Iterator<Item = Vec2> + 'a {
        grid.lit_cells().map(move |(row, col)| self.cell_center(row, col))
    }
}

/// How dots are painted for one paint cycle.
#[derive(Clone)]
pub enum DotPaint {
    /// Filled circles, one batched path per call.
    Circle { color: Color, radius: f32 },
    /// Caller-supplied shape, invoked once per dot.
    Custom(CustomShape),
}

impl DotPaint {
    pub fn from_config(config: &DotConfig, layout: &DotLayout) -> Self {
        match &config.custom_shape {
            Some(shape) => DotPaint::Custom(shape.clone()),
            None => DotPaint::Circle {
                color: config.color,
                radius: layout.dot_radius,
            },
        }
    }

    /// Paint one dot at each centre.
    pub fn paint<I>(&self, pixmap: &mut Pixmap, centers: I)
    where
        I: IntoIterator<Item = Vec2>,
    {
        match self {
            DotPaint::Circle { color, radius } => pixmap.fill_circles(centers, *radius, *color),
            DotPaint::Custom(shape) => {
                for center in centers {
                    shape(pixmap, center);
                }
            }
        }
    }

    /// Paint at `centers` with the global alpha scaled to `opacity`.
    /// Nothing is drawn when `opacity` is not positive.
    pub fn paint_faded<I>(&self, pixmap: &mut Pixmap, centers: I, opacity: f32)
    where
        I: IntoIterator<Item = Vec2>,
    {
        if !(opacity > 0.0) {
            return;
        }
        pixmap.save();
        pixmap.set_global_alpha(opacity.clamp(0.0, 1.0));
        self.paint(pixmap, centers);
        pixmap.restore();
    }
}

impl std::fmt::Debug for DotPaint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DotPaint::Circle { color, radius } => f
                .debug_struct("Circle")
                .field("color", color)
                .field("radius", radius)
                .finish(),
            DotPaint::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Paint one grid row. This is the unit of idle-time work.
pub fn paint_row(
    pixmap: &mut Pixmap,
    grid: &OccupancyMatrix,
    layout: &DotLayout,
    paint: &DotPaint,
    row: usize,
) {
    profile_function!();
    if row >= grid.rows() {
        return;
    }
    paint.paint(pixmap, layout.row_centers(grid, row));
}

/// Paint the whole grid immediately, row by row.
pub fn paint_grid(
    pixmap: &mut Pixmap,
    grid: &OccupancyMatrix,
    layout: &DotLayout,
    paint: &DotPaint,
) {
    for row in 0..grid.rows() {
        paint_row(pixmap, grid, layout, paint, row);
    }
}

/// Lit pixel centres of the surface, or an empty set if it cannot be read.
pub fn collect_lit(pixmap: &Pixmap) -> Vec<Vec2> {
    lit_pixels(pixmap).unwrap_or_else(|err| {
        tracing::warn!("Surface could not be read back: {}", err);
        Vec::new()
    })
}

/// Render `grid` offscreen at `size` and return the lit pixel centres.
pub fn prerender_positions(
    grid: &OccupancyMatrix,
    layout: &DotLayout,
    paint: &DotPaint,
    size: (u32, u32),
) -> Vec<Vec2> {
    profile_function!();
    let mut offscreen = Pixmap::new(size.0, size.1);
    paint_grid(&mut offscreen, grid, layout, paint);
    collect_lit(&offscreen)
}
