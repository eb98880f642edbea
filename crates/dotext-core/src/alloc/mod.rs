//! Hash collections used across dotext.
//!
//! Glyph cache lookups and listener bookkeeping sit on hot paths, so the
//! collections here use AHash instead of SipHash.

pub use ahash::{AHashMap as HashMap, AHashSet as HashSet, RandomState};
