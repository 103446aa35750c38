//! Font abstractions and types
//!
//! This crate defines the boundary between font metric readers (like the `tfm` crate)
//!     and the code that consumes font metrics.
//! A metric reader implements [`Format`] for its parsed file type,
//!     and [`Font`] for that file loaded at a specific size.
//! A [`FontFactory`] turns font names into [`Font`] instances.

use std::collections::BTreeMap;

use texcraft_core::{Glue, Scaled};

/// Trait satisfied by font formats (like .tfm files).
pub trait Format: Sized {
    const DEFAULT_FILE_EXTENSION: &'static str;
    type Error: std::error::Error + 'static;

    /// Parse binary data into a font.
    fn parse(b: &[u8]) -> Result<Self, Self::Error>;
}

/// Metrics of a single character in a font loaded at a specific size.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub width: Scaled,
    pub height: Scaled,
    pub depth: Scaled,
    pub italic_correction: Scaled,
}

/// A font loaded at a specific size.
///
/// All dimensions returned by this trait are already scaled to [`Font::actual_size`].
pub trait Font {
    /// Name the font was loaded under.
    fn name(&self) -> &str;

    /// Design size of the font.
    fn design_size(&self) -> Scaled;

    /// Size the font was loaded at.
    fn actual_size(&self) -> Scaled;

    /// Checksum stored in the font file, if the format has one.
    fn checksum(&self) -> Option<u32>;

    /// Metrics for the character, or `None` if the character is not in the font.
    fn glyph(&self, c: char) -> Option<Glyph>;

    /// Kern to insert between the two characters, if any.
    fn kern(&self, left: char, right: char) -> Option<Scaled>;

    /// Ligature character that replaces the two characters, if any.
    fn ligature(&self, left: char, right: char) -> Option<char>;

    /// Returns the font dimension with the given 1-based number.
    ///
    /// This corresponds to `\fontdimen n`.
    fn font_dimen(&self, n: usize) -> Option<Scaled>;

    /// Sets the font dimension with the given 1-based number.
    ///
    /// Setting a number past the end of the parameter list extends the list.
    fn set_font_dimen(&mut self, n: usize, value: Scaled);

    fn hyphen_char(&self) -> Option<char>;

    fn set_hyphen_char(&mut self, c: Option<char>);

    fn skew_char(&self) -> Option<char>;

    fn set_skew_char(&mut self, c: Option<char>);

    fn is_defined(&self, c: char) -> bool {
        self.glyph(c).is_some()
    }

    fn width(&self, c: char) -> Option<Scaled> {
        self.glyph(c).map(|g| g.width)
    }

    fn height(&self, c: char) -> Option<Scaled> {
        self.glyph(c).map(|g| g.height)
    }

    fn depth(&self, c: char) -> Option<Scaled> {
        self.glyph(c).map(|g| g.depth)
    }

    fn italic_correction(&self, c: char) -> Option<Scaled> {
        self.glyph(c).map(|g| g.italic_correction)
    }

    /// Inter-word glue, built from font dimensions 2 (space), 3 (stretch) and 4 (shrink).
    fn space(&self) -> Glue {
        let dimen = |n| self.font_dimen(n).unwrap_or(Scaled::ZERO);
        Glue::new(dimen(2), dimen(3), dimen(4))
    }

    /// The x-height, font dimension 5.
    fn ex(&self) -> Scaled {
        self.font_dimen(5).unwrap_or(Scaled::ZERO)
    }

    /// The quad width, font dimension 6.
    fn em(&self) -> Scaled {
        self.font_dimen(6).unwrap_or(Scaled::ZERO)
    }
}

/// Source of fonts.
pub trait FontFactory {
    /// Loads the font with the given name.
    ///
    /// If no size is given the font is loaded at its design size.
    fn get_instance(
        &mut self,
        name: &str,
        size: Option<Scaled>,
    ) -> Result<Box<dyn Font>, FactoryError>;
}

/// Error returned when a font factory cannot provide a font.
#[derive(Debug)]
pub enum FactoryError {
    /// No file for the font was found in any of the searched locations.
    NotFound {
        name: String,
        searched: Vec<std::path::PathBuf>,
    },
    /// The font file exists but could not be read.
    Io {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
    /// The font file could be read but is not a valid font.
    InvalidFont {
        path: std::path::PathBuf,
        source: Box<dyn std::error::Error + 'static>,
    },
    /// The requested size is not positive.
    InvalidSize { name: String, size: Scaled },
}

impl std::fmt::Display for FactoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FactoryError::NotFound { name, searched } => {
                write!(f, "font `{name}` not found (searched {} locations)", searched.len())
            }
            FactoryError::Io { path, source } => {
                write!(f, "failed to read font file {}: {source}", path.display())
            }
            FactoryError::InvalidFont { path, source } => {
                write!(f, "invalid font file {}: {source}", path.display())
            }
            FactoryError::InvalidSize { name, size } => {
                write!(f, "improper `at` size ({size}) for font `{name}`")
            }
        }
    }
}

impl std::error::Error for FactoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FactoryError::Io { source, .. } => Some(source),
            FactoryError::InvalidFont { source, .. } => Some(source.as_ref()),
            FactoryError::NotFound { .. } | FactoryError::InvalidSize { .. } => None,
        }
    }
}

/// The null font.
///
/// This font contains no characters and all of its dimensions are zero.
/// Font dimensions can still be assigned, as in TeX.
#[derive(Debug, Clone, Default)]
pub struct NullFont {
    font_dimens: FontDimens,
    hyphen_char: Option<char>,
    skew_char: Option<char>,
}

impl Font for NullFont {
    fn name(&self) -> &str {
        "nullfont"
    }

    fn design_size(&self) -> Scaled {
        Scaled::ZERO
    }

    fn actual_size(&self) -> Scaled {
        Scaled::ZERO
    }

    fn checksum(&self) -> Option<u32> {
        None
    }

    fn glyph(&self, _: char) -> Option<Glyph> {
        None
    }

    fn kern(&self, _: char, _: char) -> Option<Scaled> {
        None
    }

    fn ligature(&self, _: char, _: char) -> Option<char> {
        None
    }

    fn font_dimen(&self, n: usize) -> Option<Scaled> {
        self.font_dimens.get(n)
    }

    fn set_font_dimen(&mut self, n: usize, value: Scaled) {
        self.font_dimens.set(n, value)
    }

    fn hyphen_char(&self) -> Option<char> {
        self.hyphen_char
    }

    fn set_hyphen_char(&mut self, c: Option<char>) {
        self.hyphen_char = c;
    }

    fn skew_char(&self) -> Option<char> {
        self.skew_char
    }

    fn set_skew_char(&mut self, c: Option<char>) {
        self.skew_char = c;
    }
}

/// Font dimensions of a font, numbered from 1 as in `\fontdimen`.
///
/// Dimensions are stored sparsely.
/// A number no larger than the largest assigned number reads as zero if it was never assigned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontDimens(BTreeMap<usize, Scaled>);

impl FontDimens {
    pub fn get(&self, n: usize) -> Option<Scaled> {
        if n == 0 || n > self.len() {
            return None;
        }
        Some(self.0.get(&n).copied().unwrap_or(Scaled::ZERO))
    }

    /// Sets a dimension; number 0 does not exist and is ignored.
    pub fn set(&mut self, n: usize, value: Scaled) {
        if n > 0 {
            self.0.insert(n, value);
        }
    }

    /// The largest dimension number that reads as a value.
    pub fn len(&self) -> usize {
        self.0.last_key_value().map_or(0, |(n, _)| *n)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Scaled> for FontDimens {
    /// Numbers the values from 1.
    fn from_iter<T: IntoIterator<Item = Scaled>>(iter: T) -> Self {
        FontDimens(iter.into_iter().enumerate().map(|(i, v)| (i + 1, v)).collect())
    }
}
