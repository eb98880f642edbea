//! Integration tests for glyph sampling, caching and grid building.

use std::sync::Arc;

use dotext_test_utils::MockRasterizer;
use dotext_text::{FontDatabase, GlyphCache, GlyphKey, GlyphSampler, Typeface, build_grid};

fn mock_sampler() -> (GlyphSampler, Arc<MockRasterizer>) {
    let mock = Arc::new(MockRasterizer::new());
    (GlyphSampler::new(GlyphCache::new(), mock.clone()), mock)
}

#[test]
fn test_sampling_is_deterministic() {
    let (sampler, _) = mock_sampler();
    let tf = Typeface::default();
    let first = sampler.sample('g', 24.0, &tf);

    // A second, independent cache must reproduce the same matrix bit for bit.
    let (other, _) = mock_sampler();
    let second = other.sample('g', 24.0, &tf);

    assert_eq!(*first, *second);
}

#[test]
fn test_cache_keys_separate_density_and_typeface() {
    let (sampler, mock) = mock_sampler();
    let serif = Typeface::new("serif");
    let mono = Typeface::new("monospace");

    let a = sampler.sample('A', 16.0, &serif);
    let b = sampler.sample('A', 32.0, &serif);
    let c = sampler.sample('A', 16.0, &mono);

    assert_eq!(mock.calls_for('A').len(), 3);
    assert_eq!(sampler.cache().len(), 3);
    assert_ne!(a.rows(), b.rows());
    assert!(!Arc::ptr_eq(&a, &c));

    assert!(sampler.cache().contains(&GlyphKey::new(16, 16, "serif", 'A')));
    assert!(sampler.cache().contains(&GlyphKey::new(32, 32, "serif", 'A')));
    assert!(sampler.cache().contains(&GlyphKey::new(16, 16, "monospace", 'A')));
}

#[test]
fn test_density_is_normalized_before_keying() {
    let (sampler, mock) = mock_sampler();
    let tf = Typeface::default();
    sampler.sample('x', 200.0, &tf);
    sampler.sample('x', 64.0, &tf);
    sampler.sample('x', f32::NAN, &tf);

    let sizes: Vec<u32> = mock.calls().iter().map(|c| c.size).collect();
    assert_eq!(sizes, vec![64, 16]);
}

#[test]
fn test_grid_row_count_matches_single_glyph() {
    let (sampler, _) = mock_sampler();
    let tf = Typeface::default();
    for density in [8.0, 16.0, 33.0, 64.0] {
        let glyph_rows = sampler.sample('Q', density, &tf).rows();
        for text in ["Q", "Hello", "文字", "a b"] {
            assert_eq!(build_grid(&sampler, text, density, &tf).rows(), glyph_rows);
        }
    }
}

#[test]
fn test_grid_width_is_per_character() {
    let (sampler, _) = mock_sampler();
    let grid = build_grid(&sampler, "AB", 16.0, &Typeface::default());
    assert_eq!(grid.cols(), 32);

    let expected =
        12 * (MockRasterizer::glyph_width('A', 16) + MockRasterizer::glyph_width('B', 16));
    assert_eq!(grid.lit_count() as u32, expected);
}

#[test]
fn test_failed_glyph_is_blank_and_retried() {
    let (sampler, mock) = mock_sampler();
    mock.fail_on('!');
    let tf = Typeface::default();

    let grid = build_grid(&sampler, "!!", 8.0, &tf);
    assert_eq!(grid.rows(), 8);
    assert_eq!(grid.cols(), 16);
    assert_eq!(grid.lit_count(), 0);
    assert_eq!(mock.calls_for('!').len(), 2);
    assert!(sampler.cache().is_empty());
}

#[test]
fn test_device_pixel_ratio_passed_through() {
    let (sampler, mock) = mock_sampler();
    let sampler = sampler.with_device_pixel_ratio(1.5);
    let m = sampler.sample('A', 16.0, &Typeface::default());
    assert_eq!(m.rows(), 24);

    let call = &mock.calls()[0];
    assert_eq!(call.size, 24);
    assert_eq!(call.device_pixel_ratio, 1.5);
}

/// Exercises the real rasterizer when the host has fonts installed.
#[test]
fn test_ratios_share_cache_without_aliasing() {
    let (base, mock) = mock_sampler();
    let hidpi = GlyphSampler::new(base.cache().clone(), mock.clone()).with_device_pixel_ratio(2.0);
    let tf = Typeface::new("serif");

    assert_eq!(base.sample('A', 16.0, &tf).rows(), 16);
    let sharp = hidpi.sample('A', 16.0, &tf);
    assert_eq!((sharp.rows(), sharp.cols()), (32, 32));
    assert_eq!(base.cache().len(), 2);
    assert!(base.cache().contains(&GlyphKey::new(16, 32, "serif", 'A')));

    let grid = build_grid(&hidpi, "BA", 16.0, &tf);
    assert_eq!(grid.rows(), 32);
    assert_eq!(grid.cols(), 64);
}

#[test]
fn test_system_font_sampling() {
    if FontDatabase::new().is_empty() {
        return;
    }
    let rasterizer = Arc::new(dotext_text::CosmicRasterizer::with_system_fonts());
    let sampler = GlyphSampler::new(GlyphCache::new(), rasterizer);
    let tf = Typeface::new("sans-serif");

    let glyph = sampler.sample('H', 16.0, &tf);
    assert_eq!((glyph.rows(), glyph.cols()), (16, 16));
    assert!(glyph.lit_count() > 0);
    assert_eq!(*glyph, *sampler.sample('H', 16.0, &tf));

    assert_eq!(sampler.sample(' ', 16.0, &tf).lit_count(), 0);
}
