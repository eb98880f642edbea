//! Mock glyph rasterizer for testing.
//!
//! Produces deterministic masks without touching fonts and records every
//! call so tests can assert on cache behaviour.

use dotext_core::alloc::HashSet;
use dotext_text::{GlyphBitmap, GlyphRasterizer, TextError, TextResult, Typeface};
use parking_lot::Mutex;

/// Records one rasterization request.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterCall {
    pub character: char,
    pub size: u32,
    pub typeface: String,
    pub device_pixel_ratio: f32,
}

/// Deterministic [`GlyphRasterizer`].
///
/// Each glyph is a solid block spanning rows `2..size-2` and columns
/// `0..width`, where `width` depends on the character code. Whitespace
/// renders blank. Characters registered with [`MockRasterizer::fail_on`]
/// return an error.
///
/// # Example
///
/// ```rust
/// use dotext_test_utils::MockRasterizer;
/// use dotext_text::{GlyphRasterizer, Typeface};
///
/// let mock = MockRasterizer::new();
/// let glyph = mock.rasterize('A', 8, &Typeface::default(), 1.0).unwrap();
/// assert_eq!(glyph.alpha.len(), 64);
/// assert_eq!(mock.calls_for('A').len(), 1);
/// ```
#[derive(Default)]
pub struct MockRasterizer {
    calls: Mutex<Vec<RasterCall>>,
    failing: Mutex<HashSet<char>>,
}

impl MockRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make rasterization of `character` fail from now on.
    pub fn fail_on(&self, character: char) {
        self.failing.lock().insert(character);
    }

    /// Number of lit columns the mock draws for `character` at `size`.
    pub fn glyph_width(character: char, size: u32) -> u32 {
        if character.is_whitespace() || size < 4 {
            return 0;
        }
        1 + (character as u32) % (size / 2)
    }

    pub fn calls(&self) -> Vec<RasterCall> {
        self.calls.lock().clone()
    }

    pub fn calls_for(&self, character: char) -> Vec<RasterCall> {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.character == character)
            .cloned()
            .collect()
    }

    pub fn count_calls(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }
}

impl GlyphRasterizer for MockRasterizer {
    fn rasterize(
        &self,
        character: char,
        size: u32,
        typeface: &Typeface,
        device_pixel_ratio: f32,
    ) -> TextResult<GlyphBitmap> {
        self.calls.lock().push(RasterCall {
            character,
            size,
            typeface: typeface.family.clone(),
            device_pixel_ratio,
        });

        if self.failing.lock().contains(&character) {
            return Err(TextError::RasterizationFailed {
                character,
                reason: "mock failure".to_string(),
            });
        }

        let mut bitmap = GlyphBitmap::blank(size);
        let width = Self::glyph_width(character, size) as i32;
        for y in 2..(size as i32 - 2) {
            for x in 0..width {
                bitmap.blend(x, y, 255);
            }
        }
        Ok(bitmap)
    }
}
