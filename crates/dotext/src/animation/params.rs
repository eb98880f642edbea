//! Resolved per-mode animation parameters.
//!
//! Each `resolve` applies the mode's defaults and clamps to an optional
//! [`AnimationConfig`]. Defaults that scale with the text are derived from
//! the font size and the dot radius of the current grid.

use super::AnimationConfig;

/// Default transition length for fly-in and morph, in milliseconds.
pub const DEFAULT_DURATION_MS: f32 = 1000.0;
/// Click impulse refuses to start above this many particles.
pub const IMPULSE_PARTICLE_CEILING: usize = 15_000;
/// Wave and breathe refuse to start above this many particles.
pub const OSCILLATION_PARTICLE_CEILING: usize = 18_000;

/// Transition duration; unset, zero or non-finite values use the default.
pub fn duration_ms(config: Option<&AnimationConfig>) -> f32 {
    config
        .and_then(|c| c.duration)
        .filter(|d| d.is_finite() && *d > 0.0)
        .unwrap_or(DEFAULT_DURATION_MS)
}

/// Spring integrator tuning shared by pointer repel and click impulse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringParams {
    pub radius: f32,
    pub strength: f32,
    pub return_strength: f32,
    pub damping: f32,
    pub ghost_opacity: f32,
    pub max_offset: f32,
}

impl SpringParams {
    /// Pointer repel tuning.
    pub fn repel(config: Option<&AnimationConfig>, font_size: f32, dot_radius: f32) -> Self {
        let get = |f: fn(&AnimationConfig) -> Option<f32>| config.and_then(f);
        Self {
            radius: get(|c| c.radius).unwrap_or((font_size * 0.6).max(60.0)).max(20.0),
            strength: get(|c| c.strength).unwrap_or(1400.0),
            return_strength: get(|c| c.return_strength).unwrap_or(28.0),
            damping: get(|c| c.damping).unwrap_or(0.88).clamp(0.5, 0.995),
            ghost_opacity: get(|c| c.ghost_opacity).unwrap_or(0.12),
            max_offset: get(|c| c.max_offset)
                .unwrap_or((font_size * 0.12).max(dot_radius * 6.0))
                .max(4.0),
        }
    }

    /// Click impulse tuning.
    pub fn impulse(config: Option<&AnimationConfig>, font_size: f32, dot_radius: f32) -> Self {
        let get = |f: fn(&AnimationConfig) -> Option<f32>| config.and_then(f);
        Self {
            radius: get(|c| c.radius).unwrap_or((font_size * 0.75).max(90.0)).max(30.0),
            strength: get(|c| c.strength).unwrap_or(2600.0),
            return_strength: get(|c| c.return_strength).unwrap_or(26.0),
            damping: get(|c| c.damping).unwrap_or(0.86).clamp(0.5, 0.995),
            ghost_opacity: get(|c| c.ghost_opacity).unwrap_or(0.12),
            max_offset: get(|c| c.max_offset)
                .unwrap_or((font_size * 0.14).max(dot_radius * 7.0))
                .max(6.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveParams {
    /// Vertical displacement in pixels.
    pub amplitude: f32,
    /// Phase advance per pixel of base position.
    pub frequency: f32,
    /// Phase advance per second.
    pub speed: f32,
    pub ghost_opacity: f32,
}

impl WaveParams {
    pub fn resolve(config: Option<&AnimationConfig>, font_size: f32) -> Self {
        let get = |f: fn(&AnimationConfig) -> Option<f32>| config.and_then(f);
        Self {
            amplitude: get(|c| c.amplitude)
                .unwrap_or((font_size * 0.06).min(10.0).max(4.0))
                .max(0.0),
            frequency: get(|c| c.frequency).unwrap_or(0.022).max(0.0001),
            speed: get(|c| c.speed).unwrap_or(1.4),
            ghost_opacity: get(|c| c.ghost_opacity).unwrap_or(0.18),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreatheParams {
    /// Peak relative scale increase.
    pub amplitude: f32,
    /// Cycles per second.
    pub speed: f32,
    pub ghost_opacity: f32,
}

impl BreatheParams {
    pub fn resolve(config: Option<&AnimationConfig>) -> Self {
        let get = |f: fn(&AnimationConfig) -> Option<f32>| config.and_then(f);
        Self {
            amplitude: get(|c| c.amplitude).unwrap_or(0.04).clamp(0.0, 0.2),
            speed: get(|c| c.speed).unwrap_or(1.2),
            ghost_opacity: get(|c| c.ghost_opacity).unwrap_or(0.16),
        }
    }
}
