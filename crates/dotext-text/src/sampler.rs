use std::sync::{Arc, OnceLock};

use dotext_core::profiling::profile_scope;

use crate::cache::{GlyphCache, GlyphKey};
use crate::error::{TextError, TextResult};
use crate::font::Typeface;
use crate::matrix::OccupancyMatrix;
use crate::raster::{CosmicRasterizer, GlyphBitmap, GlyphRasterizer};

/// Density used when the requested value is not a finite number.
pub const DEFAULT_DENSITY: u32 = 16;
pub const MIN_DENSITY: u32 = 8;
pub const MAX_DENSITY: u32 = 64;

/// Normalize a requested sampling density.
///
/// Non-finite input falls back to [`DEFAULT_DENSITY`]; everything else is
/// rounded and clamped to `MIN_DENSITY..=MAX_DENSITY`.
///
/// ```
/// use dotext_text::normalize_density;
///
/// assert_eq!(normalize_density(200.0), 64);
/// assert_eq!(normalize_density(1.0), 8);
/// assert_eq!(normalize_density(f32::NAN), 16);
/// ```
pub fn normalize_density(density: f32) -> u32 {
    if !density.is_finite() {
        return DEFAULT_DENSITY;
    }
    (density.round().clamp(MIN_DENSITY as f32, MAX_DENSITY as f32)) as u32
}

/// Samples characters into occupancy matrices, memoized in a [`GlyphCache`].
///
/// Sampling is a pure function of `(density, typeface, character)` for a
/// given rasterizer and device pixel ratio.
#[derive(Clone)]
pub struct GlyphSampler {
    cache: GlyphCache,
    rasterizer: Arc<dyn GlyphRasterizer>,
    device_pixel_ratio: f32,
}

impl GlyphSampler {
    pub fn new(cache: GlyphCache, rasterizer: Arc<dyn GlyphRasterizer>) -> Self {
        Self {
            cache,
            rasterizer,
            device_pixel_ratio: 1.0,
        }
    }

    /// Sampler over the global cache and a process-wide system-font rasterizer.
    pub fn shared() -> Self {
        static RASTERIZER: OnceLock<Arc<CosmicRasterizer>> = OnceLock::new();
        let rasterizer = RASTERIZER
            .get_or_init(|| Arc::new(CosmicRasterizer::with_system_fonts()))
            .clone();
        Self::new(GlyphCache::global().clone(), rasterizer)
    }

    /// Set the device pixel ratio. Non-finite or non-positive ratios become 1.
    pub fn with_device_pixel_ratio(mut self, ratio: f32) -> Self {
        self.device_pixel_ratio = if ratio.is_finite() && ratio > 0.0 {
            ratio
        } else {
            1.0
        };
        self
    }

    pub fn device_pixel_ratio(&self) -> f32 {
        self.device_pixel_ratio
    }

    pub fn cache(&self) -> &GlyphCache {
        &self.cache
    }

    /// Edge length of the sampling grid for a normalized density.
    pub fn sample_size(&self, density: u32) -> u32 {
        ((density as f32 * self.device_pixel_ratio).round() as u32).max(1)
    }

    /// Sample one character.
    ///
    /// `density` is normalized first. A rasterizer failure is logged and
    /// yields an empty matrix that is not cached, so a later call retries.
    pub fn sample(
        &self,
        character: char,
        density: f32,
        typeface: &Typeface,
    ) -> Arc<OccupancyMatrix> {
        let density = normalize_density(density);
        let size = self.sample_size(density);
        let key = GlyphKey::new(density, size, typeface.family.as_str(), character);

        let sampled = self.cache.get_or_try_insert_with(key, || {
            profile_scope!("sample_glyph");
            let sampled = self
                .rasterizer
                .rasterize(character, size, typeface, self.device_pixel_ratio)
                .and_then(|bitmap| to_matrix(&bitmap, size as usize));
            match sampled {
                Ok(matrix) => {
                    tracing::trace!("Sampled {:?} at {}px", character, size);
                    Some(matrix)
                }
                Err(err) => {
                    tracing::warn!("Glyph {:?} could not be sampled: {}", character, err);
                    None
                }
            }
        });

        sampled.unwrap_or_else(|| Arc::new(OccupancyMatrix::new(size as usize, size as usize)))
    }
}

/// Threshold an `n × n` glyph bitmap into an occupancy matrix.
fn to_matrix(bitmap: &GlyphBitmap, n: usize) -> TextResult<OccupancyMatrix> {
    OccupancyMatrix::from_alpha(n, n, &bitmap.alpha).ok_or(TextError::BitmapSizeMismatch {
        expected: n * n,
        actual: bitmap.alpha.len(),
    })
}

impl std::fmt::Debug for GlyphSampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlyphSampler")
            .field("cache", &self.cache)
            .field("device_pixel_ratio", &self.device_pixel_ratio)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Lights the first column of every glyph. Fails for `'?'` and returns
    /// a short bitmap for `'!'`.
    #[derive(Default)]
    struct ColumnRasterizer {
        calls: AtomicUsize,
    }

    impl GlyphRasterizer for ColumnRasterizer {
        fn rasterize(
            &self,
            character: char,
            size: u32,
            _: &Typeface,
            _: f32,
        ) -> TextResult<GlyphBitmap> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if character == '?' {
                return Err(TextError::RasterizationFailed {
                    character,
                    reason: "unsupported".into(),
                });
            }
            if character == '!' {
                return Ok(GlyphBitmap::blank(size - 1));
            }
            let mut bitmap = GlyphBitmap::blank(size);
            for y in 0..size as i32 {
                bitmap.blend(0, y, 255);
            }
            Ok(bitmap)
        }
    }

    fn sampler() -> (GlyphSampler, Arc<ColumnRasterizer>) {
        let rasterizer = Arc::new(ColumnRasterizer::default());
        (GlyphSampler::new(GlyphCache::new(), rasterizer.clone()), rasterizer)
    }

    #[test]
    fn test_normalize_density() {
        assert_eq!(normalize_density(200.0), 64);
        assert_eq!(normalize_density(1.0), 8);
        assert_eq!(normalize_density(f32::NAN), 16);
        assert_eq!(normalize_density(f32::INFINITY), 16);
        assert_eq!(normalize_density(12.4), 12);
        assert_eq!(normalize_density(-5.0), 8);
    }

    #[test]
    fn test_sample_memoizes() {
        let (sampler, rasterizer) = sampler();
        let tf = Typeface::default();
        let a = sampler.sample('A', 16.0, &tf);
        let b = sampler.sample('A', 16.0, &tf);
        assert_eq!(a, b);
        assert_eq!(rasterizer.calls.load(Ordering::SeqCst), 1);
        assert_eq!(a.rows(), 16);
        assert_eq!(a.lit_count(), 16);
    }

    #[test]
    fn test_device_pixel_ratio_scales_grid() {
        let (sampler, _) = sampler();
        let sampler = sampler.with_device_pixel_ratio(2.0);
        assert_eq!(sampler.sample('A', 16.0, &Typeface::default()).rows(), 32);
        assert_eq!(sampler.clone().with_device_pixel_ratio(f32::NAN).device_pixel_ratio(), 1.0);
    }

    #[test]
    fn test_failure_yields_uncached_blank() {
        let (sampler, rasterizer) = sampler();
        let m = sampler.sample('?', 8.0, &Typeface::default());
        assert_eq!((m.rows(), m.cols()), (8, 8));
        assert_eq!(m.lit_count(), 0);
        assert!(sampler.cache().is_empty());

        sampler.sample('?', 8.0, &Typeface::default());
        assert_eq!(rasterizer.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_wrong_sized_bitmap_is_rejected() {
        let (sampler, _) = sampler();
        let m = sampler.sample('!', 8.0, &Typeface::default());
        assert_eq!((m.rows(), m.cols()), (8, 8));
        assert_eq!(m.lit_count(), 0);
        assert!(sampler.cache().is_empty());

        let err = to_matrix(&GlyphBitmap::blank(7), 8).unwrap_err();
        assert!(matches!(err, TextError::BitmapSizeMismatch { expected: 64, actual: 49 }));
    }

    #[test]
    fn test_shared_cache_keys_by_device_pixel_ratio() {
        let (base, rasterizer) = sampler();
        let hidpi = base.clone().with_device_pixel_ratio(2.0);
        let tf = Typeface::default();

        assert_eq!(base.sample('A', 16.0, &tf).rows(), 16);
        assert_eq!(hidpi.sample('A', 16.0, &tf).rows(), 32);
        assert_eq!(base.sample('A', 16.0, &tf).rows(), 16);
        assert_eq!(rasterizer.calls.load(Ordering::SeqCst), 2);
        assert_eq!(base.cache().len(), 2);
    }
}
