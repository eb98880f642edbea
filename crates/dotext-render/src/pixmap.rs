//! RGBA8 raster surface with canvas-like drawing state.
//!
//! Rasterization is delegated to [`tiny_skia`]. This wrapper adds what the
//! dot renderer expects from a 2D canvas: zero-sized surfaces, a
//! save/restore stack of transform and global alpha, and circle batches
//! that fill as a single path.
//!
//! [`Pixmap::data`] exposes tiny-skia's premultiplied bytes;
//! [`Pixmap::pixel`] returns straight (unpremultiplied) RGBA like
//! `getImageData`.

use dotext_core::math::Vec2;
use dotext_core::profiling::profile_function;
use tiny_skia::{FillRule, Paint, PathBuilder, Transform};

use crate::Color;

/// Transform and alpha applied to subsequent fills.
#[derive(Debug, Clone, Copy, PartialEq)]
struct DrawState {
    transform: Transform,
    global_alpha: f32,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            transform: Transform::identity(),
            global_alpha: 1.0,
        }
    }
}

/// A CPU raster drawing surface.
#[derive(Debug, Clone)]
pub struct Pixmap {
    width: u32,
    height: u32,
    /// `None` for zero-sized surfaces, which tiny-skia cannot represent.
    surface: Option<tiny_skia::Pixmap>,
    state: DrawState,
    stack: Vec<DrawState>,
}

impl Pixmap {
    /// Create a fully transparent surface.
    ///
    /// A size tiny-skia refuses to allocate degrades to a 0×0 surface with
    /// a warning.
    pub fn new(width: u32, height: u32) -> Self {
        let (width, height, surface) = Self::allocate(width, height);
        Self {
            width,
            height,
            surface,
            state: DrawState::default(),
            stack: Vec::new(),
        }
    }

    /// Wrap existing premultiplied RGBA8 pixels.
    pub fn from_rgba8(
        width: u32,
        height: u32,
        data: Vec<u8>,
    ) -> Result<Self, crate::ReadbackError> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(crate::ReadbackError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        let surface = match tiny_skia::IntSize::from_wh(width, height) {
            Some(size) => Some(
                tiny_skia::Pixmap::from_vec(data, size)
                    .ok_or(crate::ReadbackError::InvalidDimensions)?,
            ),
            None => None,
        };
        Ok(Self {
            width,
            height,
            surface,
            state: DrawState::default(),
            stack: Vec::new(),
        })
    }

    fn allocate(width: u32, height: u32) -> (u32, u32, Option<tiny_skia::Pixmap>) {
        if width == 0 || height == 0 {
            return (width, height, None);
        }
        match tiny_skia::Pixmap::new(width, height) {
            Some(surface) => (width, height, Some(surface)),
            None => {
                tracing::warn!("Cannot allocate a {}x{} surface, using 0x0", width, height);
                (0, 0, None)
            }
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// True when either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.surface.is_none()
    }

    /// Resize the surface. Like assigning a canvas' width or height, this
    /// clears every pixel and resets the drawing state.
    pub fn resize(&mut self, width: u32, height: u32) {
        *self = Self::new(width, height);
    }

    /// Raw premultiplied RGBA8 bytes, row-major.
    pub fn data(&self) -> &[u8] {
        self.surface.as_ref().map_or(&[], |s| s.data())
    }

    /// Premultiplied pixels as `[r, g, b, a]` quads.
    pub fn pixels(&self) -> &[[u8; 4]] {
        bytemuck::cast_slice(self.data())
    }

    /// Straight RGBA of a pixel, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let c = self.surface.as_ref()?.pixel(x, y)?.demultiply();
        Some([c.red(), c.green(), c.blue(), c.alpha()])
    }

    /// Alpha of a pixel, or 0 outside the surface.
    pub fn alpha(&self, x: u32, y: u32) -> u8 {
        self.pixel(x, y).map_or(0, |p| p[3])
    }

    /// Number of pixels with non-zero alpha.
    pub fn lit_count(&self) -> usize {
        self.pixels().iter().filter(|p| p[3] != 0).count()
    }

    /// True when every pixel is fully transparent.
    pub fn is_blank(&self) -> bool {
        self.data().iter().all(|&b| b == 0)
    }

    /// Set every pixel to transparent black. Drawing state is untouched.
    pub fn clear(&mut self) {
        if let Some(surface) = self.surface.as_mut() {
            surface.fill(tiny_skia::Color::TRANSPARENT);
        }
    }

    /// Push the current drawing state.
    pub fn save(&mut self) {
        self.stack.push(self.state);
    }

    /// Pop the most recently saved drawing state. Unbalanced calls are ignored.
    pub fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    pub fn global_alpha(&self) -> f32 {
        self.state.global_alpha
    }

    /// Set the global alpha, clamped to `0.0..=1.0`. Non-finite values are ignored.
    pub fn set_global_alpha(&mut self, alpha: f32) {
        if alpha.is_finite() {
            self.state.global_alpha = alpha.clamp(0.0, 1.0);
        }
    }

    /// Post-multiply a translation onto the current transform.
    pub fn translate(&mut self, offset: Vec2) {
        self.state.transform = self.state.transform.pre_translate(offset.x, offset.y);
    }

    /// Post-multiply a scale onto the current transform.
    pub fn scale(&mut self, factor: Vec2) {
        self.state.transform = self.state.transform.pre_scale(factor.x, factor.y);
    }

    fn paint(&self, color: Color) -> Paint<'static> {
        let [r, g, b, a] = color.with_alpha_factor(self.state.global_alpha).to_rgba8();
        let mut paint = Paint::default();
        paint.set_color_rgba8(r, g, b, a);
        paint.anti_alias = true;
        paint
    }

    /// Fill a single anti-aliased circle.
    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.fill_circles(std::iter::once(center), radius, color);
    }

    /// Fill a batch of circles as one path.
    ///
    /// Overlapping circles in the same batch are unioned rather than
    /// blended twice, matching a single `fill()` over many `arc()` calls.
    pub fn fill_circles<I>(&mut self, centers: I, radius: f32, color: Color)
    where
        I: IntoIterator<Item = Vec2>,
    {
        profile_function!();
        if !(radius > 0.0 && radius.is_finite()) {
            return;
        }
        let paint = self.paint(color);
        let transform = self.state.transform;
        let Some(surface) = self.surface.as_mut() else {
            return;
        };

        let mut builder = PathBuilder::new();
        for center in centers.into_iter().filter(|c| c.is_finite()) {
            builder.push_circle(center.x, center.y, radius);
        }
        if let Some(path) = builder.finish() {
            surface.fill_path(&path, &paint, FillRule::Winding, transform, None);
        }
    }

    /// Fill an axis-aligned rectangle with anti-aliased edges.
    pub fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color) {
        let Some(rect) = tiny_skia::Rect::from_xywh(origin.x, origin.y, size.x, size.y) else {
            return;
        };
        let paint = self.paint(color);
        let transform = self.state.transform;
        if let Some(surface) = self.surface.as_mut() {
            surface.fill_rect(rect, &paint, transform, None);
        }
    }
}
