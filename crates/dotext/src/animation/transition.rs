//! One-shot position transitions: fly-in and morph.
//!
//! Both interpolate a set of `(start, end)` pairs linearly over a fixed
//! duration, drawing a 1×1 pixel per pair each frame. Settling is handled
//! by the caller, which repaints the crisp grid in place of the last frame.

use dotext_core::math::{Vec2, lerp_vec2};
use dotext_core::profiling::profile_function;
use dotext_render::{Color, Pixmap};
use rand::Rng;

use super::{Anchor, AnimationKind, Motion, MotionStep};

/// Pair every target with a random start beyond one of the four surface
/// edges, up to one surface extent away.
pub fn fly_in_pairs<R: Rng>(targets: &[Vec2], size: (u32, u32), rng: &mut R) -> Vec<(Vec2, Vec2)> {
    let (w, h) = (size.0 as f32, size.1 as f32);
    targets
        .iter()
        .map(|&target| {
            let start = match rng.random_range(0..4u8) {
                0 => Vec2::new(-rng.random::<f32>() * w, rng.random::<f32>() * h),
                1 => Vec2::new(w + rng.random::<f32>() * w, rng.random::<f32>() * h),
                2 => Vec2::new(rng.random::<f32>() * w, -rng.random::<f32>() * h),
                _ => Vec2::new(rng.random::<f32>() * w, h + rng.random::<f32>() * h),
            };
            (start, target)
        })
        .collect()
}

/// Pair `from` with `to` by index, cycling the shorter list so every point
/// of both sets takes part. Empty if either side is empty.
///
/// ```
/// use dotext::animation::pair_positions;
/// use dotext_core::math::Vec2;
///
/// let from = [Vec2::ZERO];
/// let to = [Vec2::X, Vec2::Y];
/// let pairs = pair_positions(&from, &to);
/// assert_eq!(pairs, vec![(Vec2::ZERO, Vec2::X), (Vec2::ZERO, Vec2::Y)]);
/// ```
pub fn pair_positions(from: &[Vec2], to: &[Vec2]) -> Vec<(Vec2, Vec2)> {
    if from.is_empty() || to.is_empty() {
        return Vec::new();
    }
    let len = from.len().max(to.len());
    (0..len)
        .map(|i| (from[i % from.len()], to[i % to.len()]))
        .collect()
}

/// Linear interpolation of pixel-sized particles between two layouts.
pub struct Transition {
    kind: AnimationKind,
    pairs: Vec<(Vec2, Vec2)>,
    color: Color,
    start: Anchor,
    duration_ms: f64,
}

impl Transition {
    /// Fly-in toward `targets` from random off-surface starts.
    pub fn fly_in<R: Rng>(
        targets: &[Vec2],
        size: (u32, u32),
        color: Color,
        duration_ms: f32,
        rng: &mut R,
    ) -> Self {
        let pairs = fly_in_pairs(targets, size, rng);
        Self::new(AnimationKind::FlyIn, pairs, color, duration_ms)
    }

    /// Morph from `from` to `to`. `None` if either side is empty.
    pub fn morph(from: &[Vec2], to: &[Vec2], color: Color, duration_ms: f32) -> Option<Self> {
        let pairs = pair_positions(from, to);
        if pairs.is_empty() {
            return None;
        }
        Some(Self::new(AnimationKind::Morph, pairs, color, duration_ms))
    }

    fn new(kind: AnimationKind, pairs: Vec<(Vec2, Vec2)>, color: Color, duration_ms: f32) -> Self {
        Self {
            kind,
            pairs,
            color,
            start: Anchor::default(),
            duration_ms: duration_ms as f64,
        }
    }

    pub fn pairs(&self) -> &[(Vec2, Vec2)] {
        &self.pairs
    }

    /// Fraction of the duration elapsed at `now_ms`, in `[0, 1]`. Time runs
    /// from the first frame; before it the progress is zero.
    pub fn progress(&self, now_ms: f64) -> f32 {
        if !(self.duration_ms > 0.0) {
            return 1.0;
        }
        (self.start.peek_ms(now_ms) / self.duration_ms).clamp(0.0, 1.0) as f32
    }

    /// Interpolated particle positions at `now_ms`.
    pub fn positions_at(&self, now_ms: f64) -> impl Iterator<Item = Vec2> + '_ {
        let t = self.progress(now_ms);
        self.pairs.iter().map(move |&(from, to)| lerp_vec2(from, to, t))
    }
}

impl Motion for Transition {
    fn kind(&self) -> AnimationKind {
        self.kind
    }

    fn frame(&mut self, now_ms: f64, pixmap: &mut Pixmap) -> MotionStep {
        profile_function!();
        self.start.elapsed_ms(now_ms);
        pixmap.clear();
        for pos in self.positions_at(now_ms) {
            pixmap.fill_rect(pos, Vec2::ONE, self.color);
        }
        if self.progress(now_ms) < 1.0 {
            MotionStep::Continue
        } else {
            MotionStep::Settled
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_pair_positions_cycles_shorter_side() {
        let from = [Vec2::new(1.0, 1.0), Vec2::new(2.0, 2.0)];
        let to = [Vec2::new(5.0, 5.0), Vec2::new(6.0, 6.0), Vec2::new(7.0, 7.0)];
        let pairs = pair_positions(&from, &to);
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[2], (from[0], to[2]));
        assert!(pair_positions(&[], &to).is_empty());
        assert!(pair_positions(&from, &[]).is_empty());
    }

    #[test]
    fn test_fly_in_starts_off_surface() {
        let mut rng = StdRng::seed_from_u64(7);
        let targets: Vec<Vec2> = (0..500).map(|i| Vec2::new((i % 40) as f32 + 0.5, 4.5)).collect();
        let pairs = fly_in_pairs(&targets, (40, 10), &mut rng);
        assert_eq!(pairs.len(), targets.len());
        for (i, (start, target)) in pairs.iter().enumerate() {
            assert_eq!(*target, targets[i]);
            let outside = start.x <= 0.0 || start.x >= 40.0 || start.y <= 0.0 || start.y >= 10.0;
            assert!(outside, "start {start:?} is inside the surface");
            assert!(start.x >= -40.0 && start.x <= 80.0 && start.y >= -10.0 && start.y <= 20.0);
        }
    }

    #[test]
    fn test_fly_in_seeded_is_reproducible() {
        let targets = [Vec2::new(1.5, 1.5), Vec2::new(2.5, 1.5)];
        let a = fly_in_pairs(&targets, (10, 10), &mut StdRng::seed_from_u64(3));
        let b = fly_in_pairs(&targets, (10, 10), &mut StdRng::seed_from_u64(3));
        assert_eq!(a, b);
    }

    #[test]
    fn test_progress_and_settle() {
        let from = [Vec2::new(0.5, 0.5)];
        let to = [Vec2::new(8.5, 0.5)];
        let mut morph = Transition::morph(&from, &to, Color::BLACK, 100.0).unwrap();
        assert_eq!(morph.kind(), AnimationKind::Morph);
        assert_eq!(morph.progress(5000.0), 0.0);

        let mut pixmap = Pixmap::new(10, 1);
        assert_eq!(morph.frame(1000.0, &mut pixmap), MotionStep::Continue);
        assert!(pixmap.alpha(0, 0) > 0);
        assert_eq!(morph.progress(900.0), 0.0);
        assert_eq!(morph.progress(1050.0), 0.5);

        assert_eq!(morph.frame(1050.0, &mut pixmap), MotionStep::Continue);
        assert!(pixmap.alpha(4, 0) > 0);
        assert_eq!(pixmap.alpha(0, 0), 0);

        assert_eq!(morph.frame(1100.0, &mut pixmap), MotionStep::Settled);
        assert!(pixmap.alpha(8, 0) > 0);
        assert_eq!(pixmap.alpha(4, 0), 0);
    }

    #[test]
    fn test_morph_needs_both_sides() {
        assert!(Transition::morph(&[], &[Vec2::ONE], Color::BLACK, 100.0).is_none());
    }

    #[test]
    fn test_start_anchors_on_first_frame() {
        let from = [Vec2::new(0.5, 0.5)];
        let to = [Vec2::new(8.5, 0.5)];
        let mut morph = Transition::morph(&from, &to, Color::BLACK, 100.0).unwrap();
        let mut pixmap = Pixmap::new(10, 1);

        // Host timestamps far from zero still play the full duration.
        assert_eq!(morph.frame(1_000_000.0, &mut pixmap), MotionStep::Continue);
        assert!(pixmap.alpha(0, 0) > 0);
        assert_eq!(morph.frame(1_000_050.0, &mut pixmap), MotionStep::Continue);
        assert!(pixmap.alpha(4, 0) > 0);
        assert_eq!(morph.frame(1_000_100.0, &mut pixmap), MotionStep::Settled);
    }
}
