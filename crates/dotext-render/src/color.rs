use std::str::FromStr;

/// An RGBA color with `f32` components in the `0.0..=1.0` range.
///
/// Colors can be constructed from floats, `u8` values, hex codes, or parsed
/// from CSS-style strings:
///
/// ```
/// use dotext_render::Color;
///
/// let red = Color::rgb(1.0, 0.0, 0.0);
/// let from_hex = Color::from_hex(0xFF8800);
/// let parsed: Color = "rgba(255, 136, 0, 0.5)".parse().unwrap();
/// assert_eq!(parsed.to_rgba8(), [255, 136, 0, 128]);
/// assert_eq!("black".parse::<Color>().unwrap(), Color::BLACK);
/// ```
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    /// Create a color from RGB components with full opacity (alpha = 1.0).
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a color from RGBA components.
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a color from 8-bit RGBA values (0–255 mapped to 0.0–1.0).
    pub fn from_rgba_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    /// Create a color from 8-bit RGB values with full opacity.
    pub fn from_rgb_u8(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgba_u8(r, g, b, 255)
    }

    /// Create a color from a 24-bit RGB hex value (e.g. `0xFF8800`).
    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xFF) as u8;
        let g = ((hex >> 8) & 0xFF) as u8;
        let b = (hex & 0xFF) as u8;
        Self::from_rgb_u8(r, g, b)
    }

    /// Create a color from a 32-bit RGBA hex value (e.g. `0xFF880080`).
    pub fn from_hex_alpha(hex: u32) -> Self {
        let r = ((hex >> 24) & 0xFF) as u8;
        let g = ((hex >> 16) & 0xFF) as u8;
        let b = ((hex >> 8) & 0xFF) as u8;
        let a = (hex & 0xFF) as u8;
        Self::from_rgba_u8(r, g, b, a)
    }

    /// Same color with its alpha multiplied by `factor`.
    pub fn with_alpha_factor(self, factor: f32) -> Self {
        Self {
            a: (self.a * factor).clamp(0.0, 1.0),
            ..self
        }
    }

    /// Quantize to 8-bit RGBA.
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    /// Convert to an `[r, g, b, a]` array.
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    fn named(name: &str) -> Option<Self> {
        let hex = match name {
            "black" => 0x000000,
            "white" => 0xFFFFFF,
            "red" => 0xFF0000,
            "green" => 0x008000,
            "lime" => 0x00FF00,
            "blue" => 0x0000FF,
            "yellow" => 0xFFFF00,
            "cyan" | "aqua" => 0x00FFFF,
            "magenta" | "fuchsia" => 0xFF00FF,
            "gray" | "grey" => 0x808080,
            "silver" => 0xC0C0C0,
            "maroon" => 0x800000,
            "navy" => 0x000080,
            "teal" => 0x008080,
            "olive" => 0x808000,
            "purple" => 0x800080,
            "orange" => 0xFFA500,
            "pink" => 0xFFC0CB,
            "transparent" => return Some(Self::TRANSPARENT),
            _ => return None,
        };
        Some(Self::from_hex(hex))
    }

    fn parse_hex(digits: &str) -> Option<Self> {
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let value = u32::from_str_radix(digits, 16).ok()?;
        // Short forms repeat each nibble: #f80 == #ff8800.
        let expand = |v: u32| ((v & 0xF) * 0x11) as u8;
        match digits.len() {
            3 => Some(Self::from_rgb_u8(
                expand(value >> 8),
                expand(value >> 4),
                expand(value),
            )),
            4 => Some(Self::from_rgba_u8(
                expand(value >> 12),
                expand(value >> 8),
                expand(value >> 4),
                expand(value),
            )),
            6 => Some(Self::from_hex(value)),
            8 => Some(Self::from_hex_alpha(value)),
            _ => None,
        }
    }

    fn parse_functional(body: &str, with_alpha: bool) -> Option<Self> {
        let parts: Vec<&str> = body.split(',').map(str::trim).collect();
        let expected = if with_alpha { 4 } else { 3 };
        if parts.len() != expected {
            return None;
        }
        let channel = |s: &str| -> Option<f32> {
            let v: f32 = s.parse().ok()?;
            v.is_finite().then(|| v.clamp(0.0, 255.0) / 255.0)
        };
        let alpha = if with_alpha {
            let a: f32 = parts[3].parse().ok()?;
            if !a.is_finite() {
                return None;
            }
            a.clamp(0.0, 1.0)
        } else {
            1.0
        };
        Some(Self::rgba(
            channel(parts[0])?,
            channel(parts[1])?,
            channel(parts[2])?,
            alpha,
        ))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl From<[f32; 4]> for Color {
    fn from(arr: [f32; 4]) -> Self {
        Self {
            r: arr[0],
            g: arr[1],
            b: arr[2],
            a: arr[3],
        }
    }
}

impl From<Color> for [f32; 4] {
    fn from(color: Color) -> Self {
        color.to_array()
    }
}

/// A color string that is not a known name, hex code, or `rgb()`/`rgba()` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorParseError {
    pub input: String,
}

impl std::fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unrecognized color: {:?}", self.input)
    }
}

impl std::error::Error for ColorParseError {}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let parsed = if let Some(digits) = normalized.strip_prefix('#') {
            Self::parse_hex(digits)
        } else if let Some(body) = normalized
            .strip_prefix("rgba(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            Self::parse_functional(body, true)
        } else if let Some(body) = normalized
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            Self::parse_functional(body, false)
        } else {
            Self::named(&normalized)
        };

        parsed.ok_or_else(|| ColorParseError {
            input: s.to_string(),
        })
    }
}
