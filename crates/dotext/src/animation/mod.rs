//! Particle animation engine.
//!
//! Each mode is a [`Motion`]: a per-frame update of its own particle state
//! that redraws the surface. The [`AnimationEngine`] owns at most one running
//! motion per surface, along with its frame request, pointer subscriptions
//! and any style it changed for interaction.
//!
//! # State machine
//!
//! ```text
//! Idle ──start──▶ Running ──stop / settle / superseding start──▶ Stopped
//!                    ▲                                               │
//!                    └──────────── start (fresh motion) ─────────────┘
//! ```
//!
//! Starting always installs a freshly built motion; a stopped motion is
//! dropped and never resumed.
//!
//! Motions read time only from the `now_ms` passed to [`Motion::frame`]. A
//! timed motion anchors its start on the first frame it receives, so the
//! host's frame timestamps may use any time base.

mod config;
mod oscillate;
pub mod params;
mod spring;
mod transition;

pub use config::{AnimationConfig, AnimationKind, UnknownAnimation};
pub use oscillate::{Breathe, Wave};
pub use spring::{ClickImpulse, PointerRepel};
pub use transition::{Transition, fly_in_pairs, pair_positions};

use dotext_core::math::Vec2;
use dotext_core::profiling::profile_scope;
use dotext_render::Pixmap;

use crate::scheduler::{FrameHandle, FrameRequests};
use crate::surface::{ListenerId, PointerKind, SurfaceElement};

/// Outcome of one animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionStep {
    /// Request another frame.
    Continue,
    /// The motion finished; the engine stops it.
    Settled,
}

/// One animation mode's per-frame behaviour.
pub trait Motion {
    fn kind(&self) -> AnimationKind;

    /// Pointer events this motion needs while running.
    fn subscriptions(&self) -> &'static [PointerKind] {
        &[]
    }

    /// Advance to `now_ms` and redraw.
    fn frame(&mut self, now_ms: f64, pixmap: &mut Pixmap) -> MotionStep;

    /// A subscribed pointer event, already mapped to surface pixels.
    /// `at` is `None` for events without a usable position.
    fn pointer(&mut self, _kind: PointerKind, _at: Option<Vec2>) {}
}

/// Lifecycle of the engine's current motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Nothing has been started yet.
    Idle,
    Running,
    Stopped,
}

/// Drives at most one [`Motion`] against a surface.
pub struct AnimationEngine {
    state: EngineState,
    motion: Option<Box<dyn Motion>>,
    frame: Option<FrameHandle>,
    listeners: Vec<ListenerId>,
    /// Prior `touch-action`, present while it must be restored on stop.
    saved_touch_action: Option<Option<String>>,
    runs: u64,
}

impl AnimationEngine {
    pub fn new() -> Self {
        Self {
            state: EngineState::Idle,
            motion: None,
            frame: None,
            listeners: Vec::new(),
            saved_touch_action: None,
            runs: 0,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == EngineState::Running
    }

    /// Mode of the running motion.
    pub fn kind(&self) -> Option<AnimationKind> {
        self.motion.as_ref().map(|m| m.kind())
    }

    /// Number of motions started over the engine's lifetime.
    pub fn runs(&self) -> u64 {
        self.runs
    }

    /// Stop whatever is running, then install `motion`: subscribe its
    /// pointer events, claim `touch-action` if it is interactive, and request
    /// its first frame.
    pub fn start(
        &mut self,
        motion: Box<dyn Motion>,
        surface: &mut SurfaceElement,
        frames: &mut FrameRequests,
    ) {
        self.stop(surface, frames);

        let subscriptions = motion.subscriptions();
        if !subscriptions.is_empty() {
            let previous = surface.touch_action().map(str::to_owned);
            if previous.as_deref().is_none_or(str::is_empty) {
                surface.set_touch_action(Some("none".to_string()));
            }
            self.saved_touch_action = Some(previous);
            self.listeners = subscriptions.iter().map(|&kind| surface.add_listener(kind)).collect();
        }

        tracing::debug!("Animation started: {}", motion.kind());
        self.frame = Some(frames.request());
        self.motion = Some(motion);
        self.state = EngineState::Running;
        self.runs += 1;
    }

    /// Cancel the pending frame, remove pointer subscriptions and restore
    /// `touch-action`. Idempotent.
    pub fn stop(&mut self, surface: &mut SurfaceElement, frames: &mut FrameRequests) {
        if let Some(handle) = self.frame.take() {
            frames.cancel(handle);
        }
        for id in self.listeners.drain(..) {
            surface.remove_listener(id);
        }
        if let Some(previous) = self.saved_touch_action.take() {
            surface.set_touch_action(previous);
        }
        if let Some(motion) = self.motion.take() {
            tracing::debug!("Animation stopped: {}", motion.kind());
        }
        if self.state == EngineState::Running {
            self.state = EngineState::Stopped;
        }
    }

    /// Service a frame request. Frames that do not belong to the running
    /// motion are ignored. Returns the motion's kind when it settles.
    pub fn on_frame(
        &mut self,
        handle: FrameHandle,
        now_ms: f64,
        surface: &mut SurfaceElement,
        frames: &mut FrameRequests,
    ) -> Option<AnimationKind> {
        if self.state != EngineState::Running || self.frame != Some(handle) {
            return None;
        }
        self.frame = None;
        let motion = self.motion.as_mut()?;

        profile_scope!("animation_frame");
        match motion.frame(now_ms, surface.pixmap_mut()) {
            MotionStep::Continue => {
                self.frame = Some(frames.request());
                None
            }
            MotionStep::Settled => {
                let kind = motion.kind();
                self.stop(surface, frames);
                Some(kind)
            }
        }
    }

    /// Forward a pointer event to the running motion.
    pub fn handle_pointer(&mut self, kind: PointerKind, at: Option<Vec2>) {
        if self.state != EngineState::Running {
            return;
        }
        if let Some(motion) = self.motion.as_mut() {
            motion.pointer(kind, at);
        }
    }
}

impl Default for AnimationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AnimationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationEngine")
            .field("state", &self.state)
            .field("kind", &self.kind())
            .field("frame", &self.frame)
            .field("listeners", &self.listeners.len())
            .field("runs", &self.runs)
            .finish()
    }
}

/// Start time of a timed motion, fixed by the first frame that reads it.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Anchor(Option<f64>);

impl Anchor {
    /// Milliseconds since the anchored start, anchoring at `now_ms` if unset.
    pub(crate) fn elapsed_ms(&mut self, now_ms: f64) -> f64 {
        now_ms - *self.0.get_or_insert(now_ms)
    }

    /// Like [`Anchor::elapsed_ms`] without anchoring; zero before the first frame.
    pub(crate) fn peek_ms(&self, now_ms: f64) -> f64 {
        self.0.map_or(0.0, |start| now_ms - start)
    }
}

/// Seconds elapsed between frames for physics integration, clamped to
/// `[0.001, 0.033]` so stalls and duplicate timestamps stay stable.
pub(crate) fn frame_dt(now_ms: f64, last_ms: f64) -> f32 {
    (((now_ms - last_ms) / 1000.0) as f32).clamp(0.001, 0.033)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Settles after a fixed number of frames; subscribes to pointer-down.
    struct Countdown {
        frames_left: u32,
        pointers: u32,
    }

    impl Motion for Countdown {
        fn kind(&self) -> AnimationKind {
            AnimationKind::ClickImpulse
        }

        fn subscriptions(&self) -> &'static [PointerKind] {
            &[PointerKind::Down]
        }

        fn frame(&mut self, _now_ms: f64, _pixmap: &mut Pixmap) -> MotionStep {
            self.frames_left = self.frames_left.saturating_sub(1);
            if self.frames_left == 0 {
                MotionStep::Settled
            } else {
                MotionStep::Continue
            }
        }

        fn pointer(&mut self, _kind: PointerKind, _at: Option<Vec2>) {
            self.pointers += 1;
        }
    }

    fn countdown(frames_left: u32) -> Box<dyn Motion> {
        Box::new(Countdown {
            frames_left,
            pointers: 0,
        })
    }

    fn pump(
        engine: &mut AnimationEngine,
        surface: &mut SurfaceElement,
        frames: &mut FrameRequests,
    ) -> Option<AnimationKind> {
        let mut settled = None;
        for handle in frames.take_pending() {
            settled = settled.or(engine.on_frame(handle, 0.0, surface, frames));
        }
        settled
    }

    #[test]
    fn test_frame_dt_clamps() {
        assert_eq!(frame_dt(1000.0, 1000.0), 0.001);
        assert_eq!(frame_dt(2000.0, 1000.0), 0.033);
        assert!((frame_dt(1016.0, 1000.0) - 0.016).abs() < 1e-6);
    }

    #[test]
    fn test_start_installs_frame_and_listeners() {
        let mut engine = AnimationEngine::new();
        let mut surface = SurfaceElement::new(10, 10);
        let mut frames = FrameRequests::new();
        assert_eq!(engine.state(), EngineState::Idle);

        engine.start(countdown(3), &mut surface, &mut frames);
        assert!(engine.is_running());
        assert_eq!(frames.len(), 1);
        assert_eq!(surface.listener_count(), 1);
        assert_eq!(surface.touch_action(), Some("none"));
    }

    #[test]
    fn test_settles_and_cleans_up() {
        let mut engine = AnimationEngine::new();
        let mut surface = SurfaceElement::new(10, 10);
        let mut frames = FrameRequests::new();
        engine.start(countdown(2), &mut surface, &mut frames);

        assert_eq!(pump(&mut engine, &mut surface, &mut frames), None);
        assert_eq!(frames.len(), 1);
        assert_eq!(pump(&mut engine, &mut surface, &mut frames), Some(AnimationKind::ClickImpulse));
        assert_eq!(engine.state(), EngineState::Stopped);
        assert!(frames.is_empty());
        assert_eq!(surface.listener_count(), 0);
        assert_eq!(surface.touch_action(), None);
    }

    #[test]
    fn test_superseding_start_leaves_one_loop() {
        let mut engine = AnimationEngine::new();
        let mut surface = SurfaceElement::new(10, 10);
        let mut frames = FrameRequests::new();

        engine.start(countdown(10), &mut surface, &mut frames);
        let first: Vec<_> = surface.listener_ids().collect();
        engine.start(countdown(10), &mut surface, &mut frames);

        assert_eq!(frames.len(), 1);
        assert_eq!(surface.listener_count(), 1);
        assert!(surface.listener_ids().all(|id| !first.contains(&id)));
        assert_eq!(engine.runs(), 2);
    }

    #[test]
    fn test_stop_is_idempotent_and_restores_touch_action() {
        let mut engine = AnimationEngine::new();
        let mut surface = SurfaceElement::new(10, 10);
        surface.set_touch_action(Some("pan-y".to_string()));
        let mut frames = FrameRequests::new();

        engine.start(countdown(10), &mut surface, &mut frames);
        assert_eq!(surface.touch_action(), Some("pan-y"));
        engine.stop(&mut surface, &mut frames);
        engine.stop(&mut surface, &mut frames);
        assert_eq!(surface.touch_action(), Some("pan-y"));
        assert_eq!(engine.state(), EngineState::Stopped);
        assert!(frames.is_empty());
    }

    #[test]
    fn test_stale_frame_ignored() {
        let mut engine = AnimationEngine::new();
        let mut surface = SurfaceElement::new(10, 10);
        let mut frames = FrameRequests::new();
        let stale = frames.request();
        engine.start(countdown(1), &mut surface, &mut frames);
        assert_eq!(engine.on_frame(stale, 0.0, &mut surface, &mut frames), None);
        assert!(engine.is_running());
    }
}
