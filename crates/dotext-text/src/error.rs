/// Errors that can occur while sampling glyphs.
#[derive(Debug, Clone)]
pub enum TextError {
    /// Font loading failed.
    FontLoadError(String),

    /// Font file not found.
    FontFileNotFound(std::path::PathBuf),

    /// Lock was poisoned (RwLock/Mutex).
    LockPoisoned(String),

    /// The rasterizer could not produce an image for a glyph it shaped.
    RasterizationFailed { character: char, reason: String },

    /// A rasterizer returned a bitmap whose size does not match the request.
    BitmapSizeMismatch { expected: usize, actual: usize },

    /// Generic IO error.
    IoError(String),
}

impl std::fmt::Display for TextError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextError::FontLoadError(msg) => write!(f, "Failed to load font: {}", msg),
            TextError::FontFileNotFound(path) => {
                write!(f, "Font file not found: {}", path.display())
            }
            TextError::LockPoisoned(msg) => {
                write!(
                    f,
                    "Lock was poisoned (likely due to panic in another thread): {}",
                    msg
                )
            }
            TextError::RasterizationFailed { character, reason } => {
                write!(f, "Failed to rasterize {:?}: {}", character, reason)
            }
            TextError::BitmapSizeMismatch { expected, actual } => write!(
                f,
                "Glyph bitmap has {} alpha samples, expected {}",
                actual, expected
            ),
            TextError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for TextError {}

impl From<std::io::Error> for TextError {
    fn from(err: std::io::Error) -> Self {
        TextError::IoError(err.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for TextError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        TextError::LockPoisoned(err.to_string())
    }
}

/// Result type for text operations.
pub type TextResult<T> = Result<T, TextError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = TextError::RasterizationFailed {
            character: 'A',
            reason: "no face".into(),
        };
        assert_eq!(err.to_string(), "Failed to rasterize 'A': no face");

        let err = TextError::BitmapSizeMismatch {
            expected: 256,
            actual: 255,
        };
        assert!(err.to_string().contains("expected 256"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: TextError = io.into();
        assert!(matches!(err, TextError::IoError(ref m) if m.contains("gone")));
    }
}
