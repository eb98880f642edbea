//! Spring-driven interactive modes: pointer repel and click impulse.

use dotext_core::math::Vec2;
use dotext_core::profiling::profile_function;
use dotext_render::Pixmap;

use super::params::SpringParams;
use super::{AnimationKind, Motion, MotionStep, frame_dt};
use crate::paint::DotPaint;
use crate::particles::ParticleField;
use crate::surface::PointerKind;

/// Velocity retained when a particle hits its offset limit.
const OFFSET_LIMIT_DAMPING: f32 = 0.6;
/// Scales click strength into a velocity kick.
const IMPULSE_SCALE: f32 = 0.02;
/// Squared distances at or below this are treated as coincident.
const MIN_DISTANCE_SQ: f32 = 0.0001;

/// Radial falloff `(1 - d / r)` and unit direction from `origin` to `point`,
/// or `None` outside the radius or when the points coincide.
fn falloff(point: Vec2, origin: Vec2, radius: f32) -> Option<(Vec2, f32)> {
    let delta = point - origin;
    let dist_sq = delta.length_squared();
    if dist_sq <= MIN_DISTANCE_SQ || dist_sq >= radius * radius {
        return None;
    }
    let dist = dist_sq.sqrt();
    Some((delta / dist, 1.0 - dist / radius))
}

/// Particles on damped springs toward their base positions.
struct SpringField {
    field: ParticleField,
    params: SpringParams,
    paint: DotPaint,
    last_ms: Option<f64>,
}

impl SpringField {
    fn new(field: ParticleField, params: SpringParams, paint: DotPaint) -> Self {
        Self {
            field,
            params,
            paint,
            last_ms: None,
        }
    }

    /// Advance one step. `repel_from` adds an outward force from that point.
    fn step(&mut self, now_ms: f64, repel_from: Option<Vec2>) {
        profile_function!();
        // The first frame integrates the minimum step.
        let dt = frame_dt(now_ms, self.last_ms.unwrap_or(now_ms));
        self.last_ms = Some(now_ms);

        let p = self.params;
        let damping = p.damping.powf(dt * 60.0);
        for particle in &mut self.field.particles {
            let mut acc = (particle.base - particle.pos) * p.return_strength;
            let push = repel_from.and_then(|at| falloff(particle.pos, at, p.radius));
            if let Some((dir, fall)) = push {
                acc += dir * fall * p.strength;
            }

            particle.vel = (particle.vel + acc * dt) * damping;
            particle.pos += particle.vel * dt;

            let offset = particle.offset();
            let len = offset.length();
            if len > p.max_offset {
                particle.pos = particle.base + offset * (p.max_offset / len);
                particle.vel *= OFFSET_LIMIT_DAMPING;
            }
        }
    }

    /// Ghost of the rest layout under the live particles.
    fn draw(&self, pixmap: &mut Pixmap) {
        pixmap.clear();
        self.paint
            .paint_faded(pixmap, self.field.bases(), self.params.ghost_opacity);
        self.paint.paint(pixmap, self.field.positions());
    }
}

/// Dots flee the pointer while it hovers the surface.
pub struct PointerRepel {
    spring: SpringField,
    pointer: Vec2,
    active: bool,
}

impl PointerRepel {
    pub fn new(field: ParticleField, params: SpringParams, paint: DotPaint) -> Self {
        Self {
            spring: SpringField::new(field, params, paint),
            pointer: Vec2::ZERO,
            active: false,
        }
    }

    pub fn field(&self) -> &ParticleField {
        &self.spring.field
    }

    /// Pointer position while it is over the surface.
    pub fn pointer_position(&self) -> Option<Vec2> {
        self.active.then_some(self.pointer)
    }
}

impl Motion for PointerRepel {
    fn kind(&self) -> AnimationKind {
        AnimationKind::PointerRepel
    }

    fn subscriptions(&self) -> &'static [PointerKind] {
        &[PointerKind::Move, PointerKind::Down, PointerKind::Leave]
    }

    fn frame(&mut self, now_ms: f64, pixmap: &mut Pixmap) -> MotionStep {
        let repel_from = self.pointer_position();
        self.spring.step(now_ms, repel_from);
        self.spring.draw(pixmap);
        MotionStep::Continue
    }

    fn pointer(&mut self, kind: PointerKind, at: Option<Vec2>) {
        match (kind, at) {
            (PointerKind::Leave, _) => self.active = false,
            (_, Some(at)) => {
                self.pointer = at;
                self.active = true;
            }
            (_, None) => {}
        }
    }
}

/// Pointer-down kicks nearby dots outward; springs bring them home.
pub struct ClickImpulse {
    spring: SpringField,
}

impl ClickImpulse {
    pub fn new(field: ParticleField, params: SpringParams, paint: DotPaint) -> Self {
        Self {
            spring: SpringField::new(field, params, paint),
        }
    }

    pub fn field(&self) -> &ParticleField {
        &self.spring.field
    }

    /// Apply one outward velocity kick centred on `at`.
    pub fn kick(&mut self, at: Vec2) {
        let p = self.spring.params;
        for particle in &mut self.spring.field.particles {
            if let Some((dir, fall)) = falloff(particle.pos, at, p.radius) {
                particle.vel += dir * fall * p.strength * IMPULSE_SCALE;
            }
        }
    }
}

impl Motion for ClickImpulse {
    fn kind(&self) -> AnimationKind {
        AnimationKind::ClickImpulse
    }

    fn subscriptions(&self) -> &'static [PointerKind] {
        &[PointerKind::Down]
    }

    fn frame(&mut self, now_ms: f64, pixmap: &mut Pixmap) -> MotionStep {
        self.spring.step(now_ms, None);
        self.spring.draw(pixmap);
        MotionStep::Continue
    }

    fn pointer(&mut self, kind: PointerKind, at: Option<Vec2>) {
        if let (PointerKind::Down, Some(at)) = (kind, at) {
            self.kick(at);
        }
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
            dot_radius: 1.0,
        }
    }

    fn paint() -> DotPaint {
        DotPaint::Circle {
            color: Color::BLACK,
            radius: 1.0,
        }
    }

    fn params() -> SpringParams {
        SpringParams {
            radius: 50.0,
            strength: 1400.0,
            return_strength: 28.0,
            damping: 0.88,
            ghost_opacity: 0.12,
            max_offset: 8.0,
        }
    }

    #[test]
    fn test_falloff() {
        let (dir, fall) = falloff(Vec2::new(10.0, 0.0), Vec2::ZERO, 20.0).unwrap();
        assert_eq!(dir, Vec2::X);
        assert_eq!(fall, 0.5);
        assert!(falloff(Vec2::ZERO, Vec2::ZERO, 20.0).is_none());
        assert!(falloff(Vec2::new(30.0, 0.0), Vec2::ZERO, 20.0).is_none());
    }

    #[test]
    fn test_repel_pushes_away_and_respects_max_offset() {
        let base = Vec2::new(50.0, 50.0);
        let mut repel = PointerRepel::new(field(&[base]), params(), paint());
        repel.pointer(PointerKind::Move, Some(Vec2::new(45.0, 50.0)));

        let mut pixmap = Pixmap::new(100, 100);
        let mut now = 0.0;
        for _ in 0..120 {
            now += 16.0;
            assert_eq!(repel.frame(now, &mut pixmap), MotionStep::Continue);
            let offset = repel.field().particles[0].offset();
            assert!(offset.length() <= 8.0 + 1e-3);
        }
        assert!(repel.field().particles[0].pos.x > base.x);
        assert!(!pixmap.is_blank());
    }

    #[test]
    fn test_repel_returns_home_after_leave() {
        let base = Vec2::new(50.0, 50.0);
        let mut repel = PointerRepel::new(field(&[base]), params(), paint());
        let mut pixmap = Pixmap::new(100, 100);
        repel.pointer(PointerKind::Down, Some(Vec2::new(48.0, 50.0)));
        let mut now = 0.0;
        for _ in 0..30 {
            now += 16.0;
            repel.frame(now, &mut pixmap);
        }
        repel.pointer(PointerKind::Leave, None);
        assert_eq!(repel.pointer_position(), None);
        for _ in 0..600 {
            now += 16.0;
            repel.frame(now, &mut pixmap);
        }
        assert!(repel.field().particles[0].offset().length() < 0.05);
    }

    #[test]
    fn test_impulse_kicks_only_nearby() {
        let near = Vec2::new(10.0, 0.0);
        let far = Vec2::new(200.0, 0.0);
        let mut impulse = ClickImpulse::new(field(&[near, far]), params(), paint());
        impulse.pointer(PointerKind::Down, Some(Vec2::ZERO));
        impulse.pointer(PointerKind::Move, Some(Vec2::ZERO));

        let particles = &impulse.field().particles;
        // (1 - 10/50) * 1400 * 0.02
        assert!((particles[0].vel.x - 22.4).abs() < 1e-3);
        assert_eq!(particles[1].vel, Vec2::ZERO);
    }

    #[test]
    fn test_duplicate_timestamps_use_min_dt() {
        let mut impulse = ClickImpulse::new(field(&[Vec2::new(10.0, 10.0)]), params(), paint());
        let mut pixmap = Pixmap::new(20, 20);
        impulse.frame(100.0, &mut pixmap);
        assert_eq!(impulse.field().particles[0].offset(), Vec2::ZERO);

        impulse.kick(Vec2::new(5.0, 10.0));
        impulse.frame(100.0, &mut pixmap);
        let moved = impulse.field().particles[0].offset().length();
        assert!(moved > 0.0 && moved < 0.1);
    }
}
