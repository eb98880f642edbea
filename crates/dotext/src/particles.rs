use dotext_core::math::Vec2;
use dotext_text::OccupancyMatrix;

use crate::paint::DotLayout;

/// One animated dot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Rest position derived from the grid.
    pub base: Vec2,
    pub pos: Vec2,
    pub vel: Vec2,
}

impl Particle {
    pub fn at_rest(base: Vec2) -> Self {
        Self {
            base,
            pos: base,
            vel: Vec2::ZERO,
        }
    }

    /// Displacement from the rest position.
    pub fn offset(&self) -> Vec2 {
        self.pos - self.base
    }
}

/// Particles for every occupied cell of a grid, plus the dot radius they
/// are drawn with.
#[derive(Debug, Clone, Default)]
pub struct ParticleField {
    pub particles: Vec<Particle>,
    pub dot_radius: f32,
}

impl ParticleField {
    /// One particle per occupied cell, at rest on the cell centre.
    pub fn build(grid: &OccupancyMatrix, font_size: f32, font_weight: f32) -> Self {
        let layout = DotLayout::new(grid.rows(), font_size, font_weight);
        Self {
            particles: layout.centers(grid).map(Particle::at_rest).collect(),
            dot_radius: layout.dot_radius,
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn bases(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.particles.iter().map(|p| p.base)
    }

    pub fn positions(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.particles.iter().map(|p| p.pos)
    }
}
