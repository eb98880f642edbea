use cosmic_text::{Attrs, Family, fontdb};
use std::sync::{Arc, Mutex};

use crate::error::{TextError, TextResult};

/// Typeface used when a configuration leaves the family empty.
pub const DEFAULT_TYPEFACE: &str = "SimSun";

/// A font database that manages available fonts.
pub struct FontDatabase {
    inner: fontdb::Database,
}

impl FontDatabase {
    /// Create a new font database with system fonts loaded.
    pub fn new() -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        Self { inner: db }
    }

    /// Create an empty font database.
    pub fn empty() -> Self {
        Self {
            inner: fontdb::Database::new(),
        }
    }

    /// Load a font from a .ttf or .otf file.
    pub fn load_font_file(&mut self, path: impl AsRef<std::path::Path>) -> TextResult<()> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(TextError::FontFileNotFound(path.to_path_buf()));
        }
        let before = self.inner.len();
        self.inner.load_font_file(path)?;
        if self.inner.len() == before {
            return Err(TextError::FontLoadError(format!(
                "{}: no font faces found",
                path.display()
            )));
        }
        Ok(())
    }

    /// Returns true if the font family is available.
    pub fn has_family(&self, family: &str) -> bool {
        self.inner
            .faces()
            .any(|face| face.families.iter().any(|(f, _)| f == family))
    }

    /// Get the number of fonts loaded.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check if the database is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for FontDatabase {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared cosmic-text font system.
///
/// Cloning is cheap; clones share the same underlying system.
#[derive(Clone)]
pub struct FontSystem {
    inner: Arc<Mutex<cosmic_text::FontSystem>>,
}

impl FontSystem {
    /// Create a new font system with the given font database.
    pub fn new(db: FontDatabase) -> Self {
        let cosmic_font_system = cosmic_text::FontSystem::new_with_locale_and_db(
            sys_locale::get_locale().unwrap_or_else(|| String::from("en-US")),
            db.inner,
        );
        Self {
            inner: Arc::new(Mutex::new(cosmic_font_system)),
        }
    }

    /// Create a new font system with system fonts.
    pub fn with_system_fonts() -> Self {
        Self::new(FontDatabase::new())
    }

    pub(crate) fn inner(&self) -> Arc<Mutex<cosmic_text::FontSystem>> {
        self.inner.clone()
    }
}

impl Default for FontSystem {
    fn default() -> Self {
        Self::with_system_fonts()
    }
}

/// A typeface request by family name.
///
/// CSS generic names (`serif`, `sans-serif`, `monospace`, `cursive`,
/// `fantasy`) resolve to the platform's generic families; anything else is
/// looked up by exact family name, falling back to cosmic-text's defaults
/// when the family is missing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Typeface {
    pub family: String,
}

impl Typeface {
    /// Empty (or whitespace-only) names resolve to [`DEFAULT_TYPEFACE`].
    pub fn new(family: impl Into<String>) -> Self {
        let family = family.into();
        let trimmed = family.trim();
        Self {
            family: if trimmed.is_empty() {
                DEFAULT_TYPEFACE.to_string()
            } else {
                trimmed.to_string()
            },
        }
    }

    pub(crate) fn to_cosmic(&self) -> Attrs<'_> {
        let family = match self.family.to_ascii_lowercase().as_str() {
            "serif" => Family::Serif,
            "sans-serif" => Family::SansSerif,
            "monospace" => Family::Monospace,
            "cursive" => Family::Cursive,
            "fantasy" => Family::Fantasy,
            _ => Family::Name(&self.family),
        };
        Attrs::new().family(family)
    }
}

impl Default for Typeface {
    fn default() -> Self {
        Self::new(DEFAULT_TYPEFACE)
    }
}
