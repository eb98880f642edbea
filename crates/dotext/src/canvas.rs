//! The `DotCanvas` controller.
//!
//! Owns one surface, the current configuration and occupancy grid, and
//! decides on each repaint whether glyphs must be re-sampled or the existing
//! grid can simply be repainted. The host drives it by pulling idle work
//! ([`DotCanvas::run_idle`]) and frames ([`DotCanvas::on_frame`]).

use dotext_core::math::{Rect, Vec2};
use dotext_core::profiling::{self, profile_function};
use dotext_core::time::{Clock, SystemClock};
use dotext_text::{GlyphSampler, OccupancyMatrix, build_grid, char_count};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::animation::params::{
    self, BreatheParams, IMPULSE_PARTICLE_CEILING, OSCILLATION_PARTICLE_CEILING, SpringParams,
    WaveParams,
};
use crate::animation::{
    AnimationEngine, AnimationKind, Breathe, ClickImpulse, EngineState, Motion, PointerRepel,
    Transition, Wave,
};
use crate::config::{ConfigPatch, DotConfig};
use crate::paint::{
    DotLayout, DotPaint, collect_lit, paint_grid, paint_row, prerender_positions, surface_size,
};
use crate::particles::ParticleField;
use crate::scheduler::{FrameRequests, IdleDeadline, IdleQueue};
use crate::surface::{PointerEvent, PointerKind, SurfaceElement};

/// Paint progress of a canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// A paint cycle (or morph) has not finished yet.
    Pending,
    /// The static dot field is fully painted.
    Success,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Pending => f.write_str("pending"),
            Status::Success => f.write_str("success"),
        }
    }
}

/// Environment capabilities for a [`DotCanvas`].
pub struct CanvasOptions {
    pub sampler: GlyphSampler,
    pub clock: Box<dyn Clock>,
    /// Seed for fly-in start positions. Unseeded canvases draw from the OS.
    pub seed: Option<u64>,
}

impl CanvasOptions {
    pub fn with_sampler(mut self, sampler: GlyphSampler) -> Self {
        self.sampler = sampler;
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Default for CanvasOptions {
    /// Process-wide glyph cache, system fonts and the system clock.
    fn default() -> Self {
        Self {
            sampler: GlyphSampler::shared(),
            clock: Box::new(SystemClock::new()),
            seed: None,
        }
    }
}

/// One row of the static paint, tagged with the cycle that queued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RowTask {
    cycle: u64,
    row: usize,
}

/// Paint strategy and progress for the static cycle in flight.
#[derive(Debug)]
struct PaintCycle {
    id: u64,
    layout: DotLayout,
    paint: DotPaint,
    remaining: usize,
}

type LoadCallback = Box<dyn FnMut()>;

/// Renders text as a field of dots on an owned surface and animates it.
///
/// # Example
///
/// ```no_run
/// use dotext::scheduler::Unbounded;
/// use dotext::{AnimationKind, ConfigPatch, DotCanvas, DotConfig, Status};
/// use dotext_render::Color;
///
/// let config = DotConfig::new("Hi").font_size(32.0).animation(AnimationKind::Wave);
/// let mut canvas = DotCanvas::new(config);
/// assert_eq!(canvas.status(), Status::Pending);
///
/// canvas.run_idle(&mut Unbounded);
/// assert_eq!(canvas.status(), Status::Success);
///
/// // Color-only changes reuse the sampled grid.
/// canvas.repaint(ConfigPatch::new().color(Color::RED));
/// ```
pub struct DotCanvas {
    config: DotConfig,
    grid: OccupancyMatrix,
    surface: SurfaceElement,
    status: Status,

    sampler: GlyphSampler,
    clock: Box<dyn Clock>,
    rng: StdRng,

    idle: IdleQueue<RowTask>,
    frames: FrameRequests,
    engine: AnimationEngine,
    cycle: u64,
    paint_cycle: Option<PaintCycle>,

    last_particles: Vec<Vec2>,
    on_load: Vec<LoadCallback>,
    disposed: bool,
}

impl DotCanvas {
    /// Create a canvas with the default environment.
    pub fn new(config: DotConfig) -> Self {
        Self::with_options(config, CanvasOptions::default())
    }

    /// Create a canvas, sample its text and queue the first static paint.
    /// Status is [`Status::Pending`] until the idle queue drains.
    pub fn with_options(config: DotConfig, options: CanvasOptions) -> Self {
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let mut canvas = Self {
            config,
            grid: OccupancyMatrix::empty_row(),
            surface: SurfaceElement::new(0, 0),
            status: Status::Pending,
            sampler: options.sampler,
            clock: options.clock,
            rng,
            idle: IdleQueue::new(),
            frames: FrameRequests::new(),
            engine: AnimationEngine::new(),
            cycle: 0,
            paint_cycle: None,
            last_particles: Vec::new(),
            on_load: Vec::new(),
            disposed: false,
        };

        tracing::debug!("Creating dot canvas for {:?}", canvas.config.text);
        canvas.rebuild_grid();
        canvas.begin_static_cycle();
        canvas
    }

    // Accessors

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn config(&self) -> &DotConfig {
        &self.config
    }

    pub fn grid(&self) -> &OccupancyMatrix {
        &self.grid
    }

    pub fn surface(&self) -> &SurfaceElement {
        &self.surface
    }

    /// Host access to the surface element, for attribute passthrough.
    pub fn surface_mut(&mut self) -> &mut SurfaceElement {
        &mut self.surface
    }

    pub fn sampler(&self) -> &GlyphSampler {
        &self.sampler
    }

    /// Lit pixel positions captured when the last fly-in or morph settled.
    pub fn last_particles(&self) -> &[Vec2] {
        &self.last_particles
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn animation_state(&self) -> EngineState {
        self.engine.state()
    }

    /// Mode of the animation currently driving the surface.
    pub fn running_animation(&self) -> Option<AnimationKind> {
        self.engine.kind()
    }

    /// Outstanding frame requests.
    pub fn active_frame_requests(&self) -> usize {
        self.frames.len()
    }

    /// Whether the host should call [`DotCanvas::on_frame`] next frame.
    pub fn wants_frame(&self) -> bool {
        !self.disposed && !self.frames.is_empty()
    }

    /// Queued row tasks, including stale ones not yet discarded.
    pub fn pending_idle_tasks(&self) -> usize {
        self.idle.len()
    }

    pub fn has_idle_work(&self) -> bool {
        !self.disposed && !self.idle.is_empty()
    }

    /// Register a callback fired each time a paint cycle or morph completes.
    pub fn on_load(&mut self, callback: impl FnMut() + 'static) {
        self.on_load.push(Box::new(callback));
    }

    /// Where the host shows the surface; used to map pointer coordinates.
    pub fn set_display_rect(&mut self, rect: Rect) {
        self.surface.set_display_rect(rect);
    }

    // Operations

    /// Merge `patch` into the configuration and start a new paint cycle.
    ///
    /// Glyphs are re-sampled only when text, density or typeface changed.
    /// With a layout change and a morph animation requested, the current
    /// dots travel to the new layout instead of a static repaint.
    pub fn repaint(&mut self, patch: impl Into<ConfigPatch>) -> &mut Self {
        profile_function!();
        if self.disposed {
            tracing::warn!("Repaint ignored on a disposed dot canvas");
            return self;
        }

        self.status = Status::Pending;
        self.engine.stop(&mut self.surface, &mut self.frames);

        let flags = self.config.apply(patch.into());
        let layout_changed = flags.needs_resample();
        tracing::debug!("Repaint {:?} (layout changed: {})", flags, layout_changed);

        let morph = self
            .config
            .animation
            .is_some_and(|a| a.kind == AnimationKind::Morph);
        if layout_changed && morph {
            self.begin_morph();
            return self;
        }

        if layout_changed {
            self.rebuild_grid();
        }
        self.surface.pixmap_mut().clear();
        self.begin_static_cycle();
        self
    }

    /// Blank the surface. Configuration, grid and any running animation
    /// are left alone.
    pub fn clear(&mut self) {
        self.surface.pixmap_mut().clear();
    }

    /// Stop everything and make the canvas inert. Idempotent.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        tracing::debug!("Disposing dot canvas");
        self.disposed = true;
        self.engine.stop(&mut self.surface, &mut self.frames);
        self.frames.clear();
        self.idle.clear();
        self.paint_cycle = None;
        self.on_load.clear();
    }

    /// Run queued row tasks until `deadline` asks to yield. Returns the
    /// number of rows painted.
    pub fn run_idle<D: IdleDeadline + ?Sized>(&mut self, deadline: &mut D) -> usize {
        if self.disposed {
            return 0;
        }

        let mut painted = 0;
        while let Some(task) = self.idle.next_task(deadline) {
            let Some(cycle) = self.paint_cycle.as_mut().filter(|c| c.id == task.cycle) else {
                tracing::trace!("Discarding stale row task {} of cycle {}", task.row, task.cycle);
                continue;
            };

            paint_row(self.surface.pixmap_mut(), &self.grid, &cycle.layout, &cycle.paint, task.row);
            tracing::trace!("Painted row {}", task.row);
            painted += 1;
            cycle.remaining = cycle.remaining.saturating_sub(1);

            if cycle.remaining == 0 {
                self.paint_cycle = None;
                self.finish_static_cycle();
            }
        }
        painted
    }

    /// Service every pending frame request at `now_ms`. Returns the number
    /// of frames run.
    ///
    /// Timestamps only need to increase; each motion measures time from the
    /// first frame it runs.
    pub fn on_frame(&mut self, now_ms: f64) -> usize {
        if self.disposed {
            self.frames.clear();
            return 0;
        }
        profiling::new_frame();

        let mut ran = 0;
        for handle in self.frames.take_pending() {
            ran += 1;
            let (surface, frames) = (&mut self.surface, &mut self.frames);
            if let Some(kind) = self.engine.on_frame(handle, now_ms, surface, frames) {
                self.on_settled(kind);
            }
        }
        ran
    }

    /// [`DotCanvas::on_frame`] at the canvas clock's current time.
    pub fn tick(&mut self) -> usize {
        let now = self.clock.now_ms();
        self.on_frame(now)
    }

    /// Deliver a host pointer event. Only events the running animation
    /// subscribed to reach it.
    pub fn pointer_event(&mut self, event: PointerEvent) {
        if self.disposed || !self.surface.has_listener(event.kind) {
            return;
        }
        let at = match event.kind {
            PointerKind::Leave => None,
            _ => match self.surface.client_to_surface(event.client) {
                Some(at) => Some(at),
                None => return,
            },
        };
        self.engine.handle_pointer(event.kind, at);
    }

    // Paint cycle

    fn rebuild_grid(&mut self) {
        let typeface = self.config.typeface();
        self.grid = build_grid(&self.sampler, &self.config.text, self.config.density, &typeface);
        tracing::debug!(
            "Sampled {:?}: {}x{} grid, {} dots",
            self.config.text,
            self.grid.rows(),
            self.grid.cols(),
            self.grid.lit_count()
        );
    }

    fn target_size(&self) -> (u32, u32) {
        surface_size(self.config.font_size, char_count(&self.config.text))
    }

    fn layout_and_paint(&self) -> (DotLayout, DotPaint) {
        let layout = DotLayout::for_grid(&self.grid, &self.config);
        let paint = DotPaint::from_config(&self.config, &layout);
        (layout, paint)
    }

    /// Abandon any cycle in flight; its queued rows become stale.
    fn invalidate_cycle(&mut self) -> u64 {
        self.cycle += 1;
        self.paint_cycle = None;
        self.idle.clear();
        self.cycle
    }

    fn begin_static_cycle(&mut self) {
        let id = self.invalidate_cycle();
        let (w, h) = self.target_size();
        self.surface.resize(w, h);

        let (layout, paint) = self.layout_and_paint();
        let rows = self.grid.rows();
        self.status = Status::Pending;
        tracing::debug!("Paint cycle {} queued: {} rows on {}x{}", id, rows, w, h);

        if rows == 0 {
            self.finish_static_cycle();
            return;
        }
        self.paint_cycle = Some(PaintCycle {
            id,
            layout,
            paint,
            remaining: rows,
        });
        self.idle.extend((0..rows).map(|row| RowTask { cycle: id, row }));
    }

    fn finish_static_cycle(&mut self) {
        self.status = Status::Success;
        tracing::debug!("Paint cycle {} complete", self.cycle);
        self.notify_loaded();
        self.start_configured_animation();
    }

    fn notify_loaded(&mut self) {
        for callback in &mut self.on_load {
            callback();
        }
    }

    /// Replace the surface contents with the crisp static grid.
    fn paint_crisp(&mut self) {
        let (layout, paint) = self.layout_and_paint();
        let pixmap = self.surface.pixmap_mut();
        pixmap.clear();
        paint_grid(pixmap, &self.grid, &layout, &paint);
    }

    fn on_settled(&mut self, kind: AnimationKind) {
        tracing::debug!("{} settled", kind);
        self.paint_crisp();
        self.last_particles = collect_lit(self.surface.pixmap());
        if kind == AnimationKind::Morph {
            self.status = Status::Success;
            self.notify_loaded();
        }
    }

    // Animation starts

    fn start_configured_animation(&mut self) {
        let Some(kind) = self.config.animation.map(|a| a.kind) else {
            return;
        };
        match kind {
            AnimationKind::FlyIn => self.start_fly_in(),
            // Morph only runs from a layout-changing repaint.
            AnimationKind::Morph => {}
            kind => self.start_looping(kind),
        }
    }

    fn start_fly_in(&mut self) {
        let (w, h) = (self.surface.width(), self.surface.height());
        if w == 0 || h == 0 {
            tracing::debug!("Fly-in skipped on an empty surface");
            return;
        }
        let targets = collect_lit(self.surface.pixmap());
        let duration = params::duration_ms(self.config.animation.as_ref());
        let motion =
            Transition::fly_in(&targets, (w, h), self.config.color, duration, &mut self.rng);
        self.engine.start(Box::new(motion), &mut self.surface, &mut self.frames);
    }

    fn start_looping(&mut self, kind: AnimationKind) {
        let size = (self.surface.width(), self.surface.height());
        if size.0 == 0 || size.1 == 0 {
            tracing::debug!("{} skipped on an empty surface", kind);
            return;
        }

        let field =
            ParticleField::build(&self.grid, self.config.font_size, self.config.font_weight);
        if field.is_empty() {
            tracing::debug!("{} skipped: no particles", kind);
            return;
        }
        let ceiling = match kind {
            AnimationKind::ClickImpulse => Some(IMPULSE_PARTICLE_CEILING),
            AnimationKind::Wave | AnimationKind::Breathe => Some(OSCILLATION_PARTICLE_CEILING),
            _ => None,
        };
        if let Some(ceiling) = ceiling.filter(|c| field.len() > *c) {
            tracing::warn!("{} refused: {} particles exceeds {}", kind, field.len(), ceiling);
            return;
        }

        let (_, paint) = self.layout_and_paint();
        let cfg = self.config.animation.as_ref();
        let font_size = self.config.font_size;
        let dot_radius = field.dot_radius;

        let motion: Box<dyn Motion> = match kind {
            AnimationKind::PointerRepel => Box::new(PointerRepel::new(
                field,
                SpringParams::repel(cfg, font_size, dot_radius),
                paint,
            )),
            AnimationKind::ClickImpulse => Box::new(ClickImpulse::new(
                field,
                SpringParams::impulse(cfg, font_size, dot_radius),
                paint,
            )),
            AnimationKind::Wave => {
                Box::new(Wave::new(field, WaveParams::resolve(cfg, font_size), paint))
            }
            AnimationKind::Breathe => {
                Box::new(Breathe::new(field, BreatheParams::resolve(cfg), paint, size))
            }
            AnimationKind::FlyIn | AnimationKind::Morph => return,
        };
        self.engine.start(motion, &mut self.surface, &mut self.frames);
    }

    /// Layout-changing repaint with morph requested: move the visible dots
    /// to the new layout. Falls back to a crisp paint plus fly-in when
    /// either side has no dots.
    fn begin_morph(&mut self) {
        self.invalidate_cycle();
        let from = collect_lit(self.surface.pixmap());

        self.rebuild_grid();
        let (w, h) = self.target_size();
        self.surface.resize(w, h);

        let (layout, paint) = self.layout_and_paint();
        let to = prerender_positions(&self.grid, &layout, &paint, (w, h));
        let duration = params::duration_ms(self.config.animation.as_ref());
        tracing::debug!("Morph {} -> {} pixels over {}ms", from.len(), to.len(), duration);

        match Transition::morph(&from, &to, self.config.color, duration) {
            Some(motion) => {
                let (surface, frames) = (&mut self.surface, &mut self.frames);
                self.engine.start(Box::new(motion), surface, frames)
            }
            None => {
                self.paint_crisp();
                self.status = Status::Success;
                self.notify_loaded();
                self.start_fly_in();
            }
        }
    }
}

impl Drop for DotCanvas {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for DotCanvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DotCanvas")
            .field("config", &self.config)
            .field("grid", &(self.grid.rows(), self.grid.cols()))
            .field("surface", &(self.surface.width(), self.surface.height()))
            .field("status", &self.status)
            .field("engine", &self.engine)
            .field("pending_rows", &self.idle.len())
            .field("frames", &self.frames.len())
            .field("disposed", &self.disposed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::{TaskBudget, Unbounded};
    use dotext_test_utils::{ManualClock, MockRasterizer};
    use dotext_text::GlyphCache;
    use std::sync::Arc;

    fn canvas(config: DotConfig) -> (DotCanvas, ManualClock) {
        let clock = ManualClock::new(0.0);
        let options = CanvasOptions::default()
            .with_sampler(GlyphSampler::new(GlyphCache::new(), Arc::new(MockRasterizer::new())))
            .with_clock(clock.clone())
            .with_seed(1);
        (DotCanvas::with_options(config, options), clock)
    }

    #[test]
    fn test_status_pending_until_drained() {
        let (mut c, _) = canvas(DotConfig::new("AB").font_size(32.0));
        assert_eq!(c.status(), Status::Pending);
        assert_eq!(c.pending_idle_tasks(), 16);

        assert_eq!(c.run_idle(&mut TaskBudget::new(15)), 15);
        assert_eq!(c.status(), Status::Pending);
        assert_eq!(c.run_idle(&mut Unbounded), 1);
        assert_eq!(c.status(), Status::Success);
        assert!(!c.surface().pixmap().is_blank());
    }

    #[test]
    fn test_surface_sized_from_font() {
        let (c, _) = canvas(DotConfig::new("ABC").font_size(20.0));
        assert_eq!((c.surface().width(), c.surface().height()), (60, 20));
    }

    #[test]
    fn test_repaint_discards_stale_rows() {
        let (mut c, _) = canvas(DotConfig::new("AB").font_size(32.0));
        c.run_idle(&mut TaskBudget::new(4));
        c.repaint(ConfigPatch::new().color(dotext_render::Color::RED));
        assert_eq!(c.status(), Status::Pending);
        assert_eq!(c.run_idle(&mut Unbounded), 16);
        assert_eq!(c.status(), Status::Success);
    }

    #[test]
    fn test_dispose_is_terminal() {
        let (mut c, _) = canvas(DotConfig::new("A").font_size(16.0).animation(AnimationKind::Wave));
        c.run_idle(&mut Unbounded);
        assert!(c.wants_frame());
        c.dispose();
        c.dispose();
        assert!(!c.wants_frame());
        assert_eq!(c.on_frame(16.0), 0);
        assert_eq!(c.run_idle(&mut Unbounded), 0);
        assert_eq!(c.surface().listener_count(), 0);
        c.repaint(ConfigPatch::new().text("B"));
        assert_eq!(c.config().text, "A");
    }

    #[test]
    fn test_load_callback_fires_per_cycle() {
        use std::cell::Cell;
        use std::rc::Rc;

        let (mut c, _) = canvas(DotConfig::new("A").font_size(16.0));
        let loads = Rc::new(Cell::new(0));
        let counter = loads.clone();
        c.on_load(move || counter.set(counter.get() + 1));

        c.run_idle(&mut Unbounded);
        assert_eq!(loads.get(), 1);
        c.repaint(ConfigPatch::new().font_weight(3.0));
        c.run_idle(&mut Unbounded);
        assert_eq!(loads.get(), 2);
    }
}
