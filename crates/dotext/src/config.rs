use std::sync::Arc;

use dotext_core::math::Vec2;
use dotext_render::{Color, Pixmap};
use dotext_text::{DEFAULT_TYPEFACE, Typeface, normalize_density};

use crate::animation::AnimationConfig;
use crate::dirty::RepaintFlags;

/// Paints one dot centred at the given surface position.
///
/// The callback owns the look of the dot entirely: radius and color are up
/// to it. It draws through the pixmap, so the surface's current transform
/// and global alpha still apply.
pub type CustomShape = Arc<dyn Fn(&mut Pixmap, Vec2) + Send + Sync>;

/// Widget configuration.
///
/// # Example
///
/// ```
/// use dotext::{AnimationKind, DotConfig};
/// use dotext_render::Color;
///
/// let config = DotConfig::new("Hello")
///     .font_size(48.0)
///     .color(Color::from_hex(0x3366FF))
///     .density(24.0)
///     .animation(AnimationKind::Wave);
///
/// assert_eq!(config.normalized_density(), 24);
/// assert_eq!(config.font_family, "SimSun");
/// ```
#[derive(Clone)]
pub struct DotConfig {
    pub text: String,
    /// Pixel height of the rendered field.
    pub font_size: f32,
    pub color: Color,
    /// Dot thickness factor.
    pub font_weight: f32,
    /// Typeface used for glyph sampling only.
    pub font_family: String,
    /// Requested sampling resolution per character; see [`normalize_density`].
    pub density: f32,
    pub custom_shape: Option<CustomShape>,
    pub animation: Option<AnimationConfig>,
}

impl DotConfig {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn font_weight(mut self, weight: f32) -> Self {
        self.font_weight = weight;
        self
    }

    pub fn font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }

    pub fn density(mut self, density: f32) -> Self {
        self.density = density;
        self
    }

    pub fn custom_shape<F>(mut self, shape: F) -> Self
    where
        F: Fn(&mut Pixmap, Vec2) + Send + Sync + 'static,
    {
        self.custom_shape = Some(Arc::new(shape));
        self
    }

    pub fn animation(mut self, animation: impl Into<AnimationConfig>) -> Self {
        self.animation = Some(animation.into());
        self
    }

    pub fn normalized_density(&self) -> u32 {
        normalize_density(self.density)
    }

    pub fn typeface(&self) -> Typeface {
        Typeface::new(self.font_family.as_str())
    }

    /// Merge `patch` into this configuration and report what changed.
    ///
    /// Density and typeface are compared after normalization, so `16.2`
    /// over `16` or `""` over `"SimSun"` is not a layout change.
    pub fn apply(&mut self, patch: ConfigPatch) -> RepaintFlags {
        let mut flags = RepaintFlags::empty();

        if let Some(text) = patch.text {
            if text != self.text {
                flags |= RepaintFlags::TEXT;
            }
            self.text = text;
        }
        if let Some(density) = patch.density {
            if normalize_density(density) != self.normalized_density() {
                flags |= RepaintFlags::DENSITY;
            }
            self.density = density;
        }
        if let Some(family) = patch.font_family {
            if Typeface::new(family.as_str()) != self.typeface() {
                flags |= RepaintFlags::TYPEFACE;
            }
            self.font_family = family;
        }
        if let Some(size) = patch.font_size {
            if size != self.font_size {
                flags |= RepaintFlags::FONT_SIZE;
            }
            self.font_size = size;
        }
        if let Some(color) = patch.color {
            if color != self.color {
                flags |= RepaintFlags::COLOR;
            }
            self.color = color;
        }
        if let Some(weight) = patch.font_weight {
            if weight != self.font_weight {
                flags |= RepaintFlags::WEIGHT;
            }
            self.font_weight = weight;
        }
        if let Some(shape) = patch.custom_shape {
            flags |= RepaintFlags::SHAPE;
            self.custom_shape = shape;
        }
        if let Some(animation) = patch.animation {
            flags |= RepaintFlags::ANIMATION;
            self.animation = animation;
        }

        flags
    }
}

impl Default for DotConfig {
    fn default() -> Self {
        Self {
            text: String::new(),
            font_size: 12.0,
            color: Color::BLACK,
            font_weight: 5.0,
            font_family: DEFAULT_TYPEFACE.to_string(),
            density: 16.0,
            custom_shape: None,
            animation: None,
        }
    }
}

impl std::fmt::Debug for DotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DotConfig")
            .field("text", &self.text)
            .field("font_size", &self.font_size)
            .field("color", &self.color)
            .field("font_weight", &self.font_weight)
            .field("font_family", &self.font_family)
            .field("density", &self.density)
            .field("custom_shape", &self.custom_shape.is_some())
            .field("animation", &self.animation)
            .finish()
    }
}

/// Partial update for [`DotCanvas::repaint`](crate::DotCanvas::repaint).
///
/// Unset fields keep their current value. `custom_shape` and `animation`
/// can also be explicitly cleared.
#[derive(Clone, Default)]
pub struct ConfigPatch {
    pub text: Option<String>,
    pub font_size: Option<f32>,
    pub color: Option<Color>,
    pub font_weight: Option<f32>,
    pub font_family: Option<String>,
    pub density: Option<f32>,
    pub custom_shape: Option<Option<CustomShape>>,
    pub animation: Option<Option<AnimationConfig>>,
}

impl ConfigPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn font_size(mut self, size: f32) -> Self {
        self.font_size = Some(size);
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn font_weight(mut self, weight: f32) -> Self {
        self.font_weight = Some(weight);
        self
    }

    pub fn font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = Some(family.into());
        self
    }

    pub fn density(mut self, density: f32) -> Self {
        self.density = Some(density);
        self
    }

    pub fn custom_shape<F>(mut self, shape: F) -> Self
    where
        F: Fn(&mut Pixmap, Vec2) + Send + Sync + 'static,
    {
        self.custom_shape = Some(Some(Arc::new(shape)));
        self
    }

    pub fn clear_custom_shape(mut self) -> Self {
        self.custom_shape = Some(None);
        self
    }

    pub fn animation(mut self, animation: impl Into<AnimationConfig>) -> Self {
        self.animation = Some(Some(animation.into()));
        self
    }

    pub fn clear_animation(mut self) -> Self {
        self.animation = Some(None);
        self
    }
}

/// A full configuration as a patch that sets every field.
impl From<DotConfig> for ConfigPatch {
    fn from(config: DotConfig) -> Self {
        Self {
            text: Some(config.text),
            font_size: Some(config.font_size),
            color: Some(config.color),
            font_weight: Some(config.font_weight),
            font_family: Some(config.font_family),
            density: Some(config.density),
            custom_shape: Some(config.custom_shape),
            animation: Some(config.animation),
        }
    }
}
