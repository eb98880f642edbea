use dotext_core::profiling::profile_function;

use crate::font::Typeface;
use crate::matrix::OccupancyMatrix;
use crate::sampler::GlyphSampler;

/// Build the occupancy grid for a whole string.
///
/// Text is split into Unicode scalar values; each is sampled and its matrix
/// appended column-wise, so row `r` of the result is row `r` of every glyph
/// in order. The row count is the first glyph's. Empty text yields a single
/// empty row.
pub fn build_grid(
    sampler: &GlyphSampler,
    text: &str,
    density: f32,
    typeface: &Typeface,
) -> OccupancyMatrix {
    profile_function!();

    let mut chars = text.chars();
    let Some(first) = chars.next() else {
        return OccupancyMatrix::empty_row();
    };

    let mut grid = OccupancyMatrix::clone(&sampler.sample(first, density, typeface));
    for ch in chars {
        grid.append_columns(&sampler.sample(ch, density, typeface));
    }
    grid
}

/// Number of characters the grid builder sees in `text`.
pub fn char_count(text: &str) -> usize {
    text.chars().count()
}
