//! dotext Core
//!
//! Shared utilities for the dotext crates: hash collections, math types,
//! logging setup, profiling scopes and the clock abstraction used by the
//! animation loop.

pub mod alloc;
pub mod logging;
pub mod math;
pub mod profiling;
pub mod time;
