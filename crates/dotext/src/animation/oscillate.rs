//! Ambient looping modes: wave and breathe.

use std::f32::consts::TAU;

use dotext_core::math::Vec2;
use dotext_core::profiling::profile_function;
use dotext_render::Pixmap;

use super::params::{BreatheParams, WaveParams};
use super::{Anchor, AnimationKind, Motion, MotionStep};
use crate::paint::DotPaint;
use crate::particles::ParticleField;

/// Vertical weight of a particle's base position in the wave phase.
const WAVE_ROW_PHASE: f32 = 0.35;

fn elapsed_secs(start: &mut Anchor, now_ms: f64) -> f32 {
    (start.elapsed_ms(now_ms) / 1000.0) as f32
}

/// Dots bob vertically in a sine wave travelling along the text.
pub struct Wave {
    field: ParticleField,
    params: WaveParams,
    paint: DotPaint,
    start: Anchor,
}

impl Wave {
    pub fn new(field: ParticleField, params: WaveParams, paint: DotPaint) -> Self {
        Self {
            field,
            params,
            paint,
            start: Anchor::default(),
        }
    }

    /// Displaced position of a dot whose rest position is `base`, `t`
    /// seconds into the animation.
    pub fn displaced(&self, base: Vec2, t: f32) -> Vec2 {
        let p = self.params;
        let phase = base.x * p.frequency + base.y * p.frequency * WAVE_ROW_PHASE + t * p.speed;
        Vec2::new(base.x, base.y + p.amplitude * phase.sin())
    }
}

impl Motion for Wave {
    fn kind(&self) -> AnimationKind {
        AnimationKind::Wave
    }

    fn frame(&mut self, now_ms: f64, pixmap: &mut Pixmap) -> MotionStep {
        profile_function!();
        let t = elapsed_secs(&mut self.start, now_ms);

        pixmap.clear();
        self.paint
            .paint_faded(pixmap, self.field.bases(), self.params.ghost_opacity);
        let positions = self.field.bases().map(|base| self.displaced(base, t));
        self.paint.paint(pixmap, positions);
        MotionStep::Continue
    }
}

/// The whole field pulses in scale about the surface centre.
pub struct Breathe {
    field: ParticleField,
    params: BreatheParams,
    paint: DotPaint,
    center: Vec2,
    start: Anchor,
}

impl Breathe {
    pub fn new(
        field: ParticleField,
        params: BreatheParams,
        paint: DotPaint,
        size: (u32, u32),
    ) -> Self {
        Self {
            field,
            params,
            paint,
            center: Vec2::new(size.0 as f32, size.1 as f32) * 0.5,
            start: Anchor::default(),
        }
    }

    /// Scale factor `t` seconds in; oscillates over `[1, 1 + amplitude]`.
    pub fn scale_at(&self, t: f32) -> f32 {
        let p = self.params;
        1.0 + p.amplitude * (0.5 + 0.5 * (t * p.speed * TAU).sin())
    }
}

impl Motion for Breathe {
    fn kind(&self) -> AnimationKind {
        AnimationKind::Breathe
    }

    fn frame(&mut self, now_ms: f64, pixmap: &mut Pixmap) -> MotionStep {
        profile_function!();
        let t = elapsed_secs(&mut self.start, now_ms);
        let s = self.scale_at(t);

        pixmap.clear();
        self.paint
            .paint_faded(pixmap, self.field.bases(), self.params.ghost_opacity);

        pixmap.save();
        pixmap.translate(self.center);
        pixmap.scale(Vec2::splat(s));
        pixmap.translate(-self.center);
        self.paint.paint(pixmap, self.field.bases());
        pixmap.restore();
        MotionStep::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particles::Particle;
    use dotext_render::Color;

    fn field(bases: &[Vec2]) -> ParticleField {
        ParticleField {
            particles: bases.iter().copied().map(Particle::at_rest).collect(),
            dot_radius: 2.0,
        }
    }

    fn paint() -> DotPaint {
        DotPaint::Circle {
            color: Color::BLACK,
            radius: 2.0,
        }
    }

    #[test]
    fn test_wave_displacement_bounded_by_amplitude() {
        let params = WaveParams {
            amplitude: 5.0,
            frequency: 0.022,
            speed: 1.4,
            ghost_opacity: 0.18,
        };
        let wave = Wave::new(field(&[]), params, paint());
        let base = Vec2::new(40.0, 20.0);
        for i in 0..50 {
            let p = wave.displaced(base, i as f32 * 0.1);
            assert_eq!(p.x, base.x);
            assert!((p.y - base.y).abs() <= 5.0 + 1e-4);
        }
        assert_eq!(wave.displaced(Vec2::ZERO, 0.0), Vec2::ZERO);
    }

    #[test]
    fn test_wave_frame_draws_ghost_and_dots() {
        let params = WaveParams {
            amplitude: 4.0,
            frequency: 0.022,
            speed: 1.4,
            ghost_opacity: 0.5,
        };
        let mut wave = Wave::new(field(&[Vec2::new(10.0, 10.0)]), params, paint());
        let mut pixmap = Pixmap::new(20, 20);
        assert_eq!(wave.frame(500.0, &mut pixmap), MotionStep::Continue);
        assert!(!pixmap.is_blank());
        assert_eq!(pixmap.global_alpha(), 1.0);
    }

    #[test]
    fn test_breathe_scale_range() {
        let params = BreatheParams {
            amplitude: 0.1,
            speed: 1.0,
            ghost_opacity: 0.16,
        };
        let breathe = Breathe::new(field(&[]), params, paint(), (40, 20));
        assert!((breathe.scale_at(0.0) - 1.05).abs() < 1e-5);
        assert!((breathe.scale_at(0.25) - 1.1).abs() < 1e-5);
        assert!((breathe.scale_at(0.75) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_breathe_scales_about_centre() {
        let params = BreatheParams {
            amplitude: 0.2,
            speed: 1.0,
            ghost_opacity: 0.0,
        };
        let mut breathe =
            Breathe::new(field(&[Vec2::new(39.0, 10.0)]), params, paint(), (40, 20));
        let mut pixmap = Pixmap::new(40, 20);
        breathe.frame(2_000.0, &mut pixmap);
        assert!(!pixmap.is_blank());
        breathe.frame(2_250.0, &mut pixmap);
        // Scale 1.2 maps x = 39 to 42.8 with radius 2.4, off the right edge.
        assert!(pixmap.is_blank());
    }
}
