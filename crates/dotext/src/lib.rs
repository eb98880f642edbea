//! dotext - Render text as an animated field of dots
//!
//! Text is sampled glyph by glyph into a binary occupancy grid, painted as
//! one dot per occupied cell, and can then be animated:
//!
//! - **Fly-in**: dots arrive from beyond the surface edges
//! - **Morph**: dots travel from the previous text to the new one
//! - **Pointer repel** / **Click impulse**: spring physics driven by the pointer
//! - **Wave** / **Breathe**: ambient looping motion
//!
//! # Quick Start
//!
//! ```no_run
//! use dotext::prelude::*;
//!
//! let mut canvas = DotCanvas::new(
//!     DotConfig::new("Hello")
//!         .font_size(48.0)
//!         .animation(AnimationKind::PointerRepel),
//! );
//!
//! // Host loop: paint rows when idle, run frames on refresh.
//! canvas.run_idle(&mut Unbounded);
//! canvas.pointer_event(PointerEvent::moved(20.0, 24.0));
//! if canvas.wants_frame() {
//!     canvas.tick();
//! }
//! ```
//!
//! # Architecture
//!
//! The [`DotCanvas`] controller never owns a thread or a timer. The host
//! pulls idle work through [`DotCanvas::run_idle`] and frames through
//! [`DotCanvas::on_frame`]; at most one animation drives the surface at a
//! time, and repaints only re-sample glyphs when text, density or typeface
//! changed (see [`RepaintFlags`]).

pub mod animation;
pub mod scheduler;

mod canvas;
mod config;
mod dirty;
mod paint;
mod particles;
mod surface;

// Re-export core types
pub use dotext_core as core;
pub use dotext_core::math;
pub use dotext_render as render;
pub use dotext_text as text;

pub use animation::{
    AnimationConfig, AnimationEngine, AnimationKind, EngineState, Motion, MotionStep,
    UnknownAnimation,
};
pub use canvas::{CanvasOptions, DotCanvas, Status};
pub use config::{ConfigPatch, CustomShape, DotConfig};
pub use dirty::RepaintFlags;
pub use paint::{DotLayout, DotPaint, MAX_SURFACE_AREA, MAX_SURFACE_SIDE, surface_size};
pub use particles::{Particle, ParticleField};
pub use scheduler::{
    FrameHandle, FrameRequests, IdleDeadline, IdleQueue, TaskBudget, TimeBudget, Unbounded,
};
pub use surface::{ListenerId, PointerEvent, PointerKind, SurfaceElement};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::animation::{AnimationConfig, AnimationKind};
    pub use crate::canvas::{CanvasOptions, DotCanvas, Status};
    pub use crate::config::{ConfigPatch, DotConfig};
    pub use crate::scheduler::{TaskBudget, TimeBudget, Unbounded};
    pub use crate::surface::{PointerEvent, PointerKind};

    pub use dotext_core::math::Vec2;
    pub use dotext_render::Color;
}
