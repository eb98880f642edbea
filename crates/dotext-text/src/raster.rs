//! Single-glyph rasterization.
//!
//! A [`GlyphRasterizer`] draws one character into a square alpha bitmap. The
//! production implementation is [`CosmicRasterizer`]; tests inject their own.

use std::sync::Mutex;

use cosmic_text::{Buffer, Metrics, Shaping, SwashCache, SwashContent, Wrap};
use dotext_core::profiling::profile_function;

use crate::error::{TextError, TextResult};
use crate::font::{FontSystem, Typeface};

/// A square alpha bitmap produced by a [`GlyphRasterizer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphBitmap {
    /// Edge length in pixels.
    pub size: u32,
    /// Row-major alpha samples, `size * size` long.
    pub alpha: Vec<u8>,
}

impl GlyphBitmap {
    /// A fully transparent bitmap.
    pub fn blank(size: u32) -> Self {
        Self {
            size,
            alpha: vec![0; (size * size) as usize],
        }
    }

    /// Combine `alpha` into the pixel at `(x, y)`, ignoring out-of-range writes.
    pub fn blend(&mut self, x: i32, y: i32, alpha: u8) {
        if x < 0 || y < 0 || x >= self.size as i32 || y >= self.size as i32 {
            return;
        }
        let idx = (y as u32 * self.size + x as u32) as usize;
        self.alpha[idx] = self.alpha[idx].max(alpha);
    }
}

/// Draws a character into a `size × size` alpha bitmap.
///
/// The glyph is drawn left-aligned at `x = 0` with its baseline at
/// `size - 2 * device_pixel_ratio` from the top, matching how a 2D canvas
/// with `textBaseline = "alphabetic"` would lay it out.
pub trait GlyphRasterizer: Send + Sync {
    fn rasterize(
        &self,
        character: char,
        size: u32,
        typeface: &Typeface,
        device_pixel_ratio: f32,
    ) -> TextResult<GlyphBitmap>;
}

/// Glyph rasterizer backed by cosmic-text shaping and swash rendering.
pub struct CosmicRasterizer {
    font_system: FontSystem,
    swash_cache: Mutex<SwashCache>,
}

impl CosmicRasterizer {
    pub fn new(font_system: FontSystem) -> Self {
        Self {
            font_system,
            swash_cache: Mutex::new(SwashCache::new()),
        }
    }

    /// Rasterizer over the platform's installed fonts.
    pub fn with_system_fonts() -> Self {
        Self::new(FontSystem::with_system_fonts())
    }

    pub fn font_system(&self) -> &FontSystem {
        &self.font_system
    }
}

impl GlyphRasterizer for CosmicRasterizer {
    fn rasterize(
        &self,
        character: char,
        size: u32,
        typeface: &Typeface,
        device_pixel_ratio: f32,
    ) -> TextResult<GlyphBitmap> {
        profile_function!();

        let mut bitmap = GlyphBitmap::blank(size);
        if size == 0 {
            return Ok(bitmap);
        }

        let font_system = self.font_system.inner();
        let mut font_system = font_system.lock()?;
        let mut swash_cache = self.swash_cache.lock()?;

        let px = size as f32;
        let baseline = px - 2.0 * device_pixel_ratio;

        let mut buffer = Buffer::new(&mut font_system, Metrics::new(px, px));
        buffer.set_wrap(&mut font_system, Wrap::None);
        buffer.set_size(&mut font_system, Some(px), Some(px));
        let mut utf8 = [0u8; 4];
        buffer.set_text(
            &mut font_system,
            character.encode_utf8(&mut utf8),
            typeface.to_cosmic(),
            Shaping::Advanced,
        );
        buffer.shape_until_scroll(&mut font_system, false);

        for run in buffer.layout_runs() {
            for glyph in run.glyphs.iter() {
                let physical = glyph.physical((0.0, baseline), 1.0);
                let Some(image) = swash_cache
                    .get_image(&mut font_system, physical.cache_key)
                    .as_ref()
                else {
                    continue;
                };

                let left = physical.x + image.placement.left;
                let top = physical.y - image.placement.top;
                let width = image.placement.width as usize;
                let height = image.placement.height as usize;

                let stride = match image.content {
                    SwashContent::Mask => 1,
                    SwashContent::Color | SwashContent::SubpixelMask => 4,
                };
                if image.data.len() < width * height * stride {
                    return Err(TextError::RasterizationFailed {
                        character,
                        reason: format!(
                            "image data holds {} bytes for a {}x{} placement",
                            image.data.len(),
                            width,
                            height
                        ),
                    });
                }

                for iy in 0..height {
                    for ix in 0..width {
                        let i = (iy * width + ix) * stride;
                        let alpha = match image.content {
                            SwashContent::Mask => image.data[i],
                            SwashContent::Color => image.data[i + 3],
                            SwashContent::SubpixelMask => {
                                image.data[i].max(image.data[i + 1]).max(image.data[i + 2])
                            }
                        };
                        bitmap.blend(left + ix as i32, top + iy as i32, alpha);
                    }
                }
            }
        }

        Ok(bitmap)
    }
}
