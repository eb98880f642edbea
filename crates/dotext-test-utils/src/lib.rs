//! Test utilities for dotext.
//!
//! This crate provides test doubles for the environment capabilities the
//! widget core depends on, so tests run without system fonts or real time.
//!
//! # Overview
//!
//! - `MockRasterizer` - deterministic glyph masks with call recording
//!   (requires the `mock` feature)
//! - [`ManualClock`] - a [`Clock`](dotext_core::time::Clock) advanced by hand
//!
//! # Example
//!
//! ```rust
//! # #[cfg(feature = "mock")]
//! # {
//! use std::sync::Arc;
//! use dotext_test_utils::MockRasterizer;
//! use dotext_text::{GlyphCache, GlyphSampler, Typeface};
//!
//! let mock = Arc::new(MockRasterizer::new());
//! let sampler = GlyphSampler::new(GlyphCache::new(), mock.clone());
//!
//! sampler.sample('A', 16.0, &Typeface::default());
//! sampler.sample('A', 16.0, &Typeface::default());
//!
//! // The second sample is served from the cache.
//! assert_eq!(mock.count_calls(), 1);
//! # }
//! ```
//!
//! # Design
//!
//! Mocks take `&self` and record into a `parking_lot::Mutex`, so they satisfy
//! the `Send + Sync` bound on [`GlyphRasterizer`](dotext_text::GlyphRasterizer)
//! and can be shared through `Arc` with the code under test.

mod clock;
#[cfg(feature = "mock")]
mod mock_raster;

pub use clock::ManualClock;
#[cfg(feature = "mock")]
pub use mock_raster::*;
