use std::str::FromStr;

/// Animation modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationKind {
    /// Dots fly in from beyond the surface edges.
    FlyIn,
    /// Dots travel from the previous text to the new one.
    Morph,
    /// Dots are pushed away from the pointer and spring back.
    PointerRepel,
    /// Pointer-down sends an outward burst through nearby dots.
    ClickImpulse,
    /// Dots bob vertically in a travelling sine wave.
    Wave,
    /// The whole field pulses in scale about its centre.
    Breathe,
}

impl AnimationKind {
    pub const ALL: [AnimationKind; 6] = [
        AnimationKind::FlyIn,
        AnimationKind::Morph,
        AnimationKind::PointerRepel,
        AnimationKind::ClickImpulse,
        AnimationKind::Wave,
        AnimationKind::Breathe,
    ];

    /// Canonical name.
    pub fn as_str(&self) -> &'static str {
        match self {
            AnimationKind::FlyIn => "fly-in",
            AnimationKind::Morph => "morph",
            AnimationKind::PointerRepel => "pointer-repel",
            AnimationKind::ClickImpulse => "click-impulse",
            AnimationKind::Wave => "wave",
            AnimationKind::Breathe => "breathe",
        }
    }

    /// Modes that run until stopped, as opposed to one-shot transitions.
    pub fn is_looping(&self) -> bool {
        !matches!(self, AnimationKind::FlyIn | AnimationKind::Morph)
    }
}

impl std::fmt::Display for AnimationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An animation name that matches no mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAnimation(pub String);

impl std::fmt::Display for UnknownAnimation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unknown animation type: {:?}", self.0)
    }
}

impl std::error::Error for UnknownAnimation {}

impl FromStr for AnimationKind {
    type Err = UnknownAnimation;

    /// Accepts canonical names and the legacy aliases
    /// `random-fly-in`, `mouse-repel`, `click-explode` and `breath`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fly-in" | "random-fly-in" => Ok(AnimationKind::FlyIn),
            "morph" => Ok(AnimationKind::Morph),
            "pointer-repel" | "mouse-repel" => Ok(AnimationKind::PointerRepel),
            "click-impulse" | "click-explode" => Ok(AnimationKind::ClickImpulse),
            "wave" => Ok(AnimationKind::Wave),
            "breathe" | "breath" => Ok(AnimationKind::Breathe),
            _ => Err(UnknownAnimation(s.to_string())),
        }
    }
}

/// Requested animation with optional tuning knobs.
///
/// Unset knobs fall back to per-mode defaults derived from the font size
/// and dot radius; see [`crate::animation::params`].
///
/// ```
/// use dotext::{AnimationConfig, AnimationKind};
///
/// let repel = AnimationConfig::new(AnimationKind::PointerRepel)
///     .radius(80.0)
///     .damping(0.9);
/// assert_eq!(repel.radius, Some(80.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationConfig {
    pub kind: AnimationKind,
    /// Transition length in milliseconds (fly-in, morph).
    pub duration: Option<f32>,
    pub radius: Option<f32>,
    pub strength: Option<f32>,
    pub return_strength: Option<f32>,
    pub damping: Option<f32>,
    pub amplitude: Option<f32>,
    pub frequency: Option<f32>,
    pub speed: Option<f32>,
    pub ghost_opacity: Option<f32>,
    pub max_offset: Option<f32>,
}

impl AnimationConfig {
    pub fn new(kind: AnimationKind) -> Self {
        Self {
            kind,
            duration: None,
            radius: None,
            strength: None,
            return_strength: None,
            damping: None,
            amplitude: None,
            frequency: None,
            speed: None,
            ghost_opacity: None,
            max_offset: None,
        }
    }

    pub fn duration(mut self, ms: f32) -> Self {
        self.duration = Some(ms);
        self
    }

    pub fn radius(mut self, radius: f32) -> Self {
        self.radius = Some(radius);
        self
    }

    pub fn strength(mut self, strength: f32) -> Self {
        self.strength = Some(strength);
        self
    }

    pub fn return_strength(mut self, strength: f32) -> Self {
        self.return_strength = Some(strength);
        self
    }

    pub fn damping(mut self, damping: f32) -> Self {
        self.damping = Some(damping);
        self
    }

    pub fn amplitude(mut self, amplitude: f32) -> Self {
        self.amplitude = Some(amplitude);
        self
    }

    pub fn frequency(mut self, frequency: f32) -> Self {
        self.frequency = Some(frequency);
        self
    }

    pub fn speed(mut self, speed: f32) -> Self {
        self.speed = Some(speed);
        self
    }

    pub fn ghost_opacity(mut self, opacity: f32) -> Self {
        self.ghost_opacity = Some(opacity);
        self
    }

    pub fn max_offset(mut self, offset: f32) -> Self {
        self.max_offset = Some(offset);
        self
    }
}

impl From<AnimationKind> for AnimationConfig {
    fn from(kind: AnimationKind) -> Self {
        Self::new(kind)
    }
}
