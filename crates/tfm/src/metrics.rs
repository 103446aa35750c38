use std::collections::BTreeMap;
use std::path::Path;
use std::rc::Rc;

use super::*;
use crate::error::Warnings;
use crate::format::File;
use font::{FactoryError, FontDimens, Glyph};

/// A fully decoded and validated .tfm file.
///
/// Dimensions are still relative to the design size.
/// Use [`ScaledFont`] to load the font at a specific size.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Font {
    pub header: Header,
    pub font_type: FontType,
    pub chars: BTreeMap<Char, CharInfo>,
    pub lig_kern_program: ligkern::Program,
    pub params: Params,
}

impl Font {
    /// Decodes, validates and assembles a .tfm file.
    ///
    /// Recoverable problems are returned as warnings alongside the font.
    pub fn from_tfm_bytes(b: &[u8]) -> Result<(Font, Vec<Warning>), Error> {
        let mut warnings = Warnings::default();
        let font = Font::assemble(b, &mut warnings)?;
        Ok((font, warnings.into_vec()))
    }

    fn assemble(b: &[u8], warnings: &mut Warnings) -> Result<Font, Error> {
        let file = format::deserialize(b, warnings)?;
        log::debug!(
            "decoded {} char infos and {} lig/kern instructions",
            file.char_infos.len(),
            file.lig_kern_instructions.len()
        );
        format::check_tables(&file, warnings)?;
        let (lig_kern_program, lig_kern_starts) = ligkern::build(&file, warnings)?;
        let chars = chartable::assemble(&file, &lig_kern_starts, warnings)?;
        let File { header, params, .. } = file;
        let font_type = FontType::from_coding_scheme(header.character_coding_scheme.as_deref());
        Ok(Font {
            header,
            font_type,
            chars,
            lig_kern_program,
            params,
        })
    }

    /// Reads and decodes the .tfm file at the given path.
    pub fn from_path(path: &Path) -> Result<(Font, Vec<Warning>), FactoryError> {
        let b = std::fs::read(path).map_err(|source| FactoryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Font::from_tfm_bytes(&b).map_err(|err| FactoryError::InvalidFont {
            path: path.to_path_buf(),
            source: Box::new(err),
        })
    }

    pub fn char_info(&self, c: Char) -> Option<&CharInfo> {
        self.chars.get(&c)
    }

    /// Iterates over the characters reachable from `c` through next larger links.
    ///
    /// The first element is `c` itself, if it exists.
    ///
    /// ```
    /// # use tfm::*;
    /// let mut font = Font::default();
    /// for (c, link) in [
    ///     (Char::A, CharLink::NextLarger(Char::B)),
    ///     (Char::B, CharLink::NextLarger(Char::C)),
    ///     (Char::C, CharLink::Plain),
    /// ] {
    ///     font.chars.insert(c, CharInfo {
    ///         width: Number::UNITY,
    ///         height: Number::ZERO,
    ///         depth: Number::ZERO,
    ///         italic_correction: Number::ZERO,
    ///         link,
    ///     });
    /// }
    /// let chain: Vec<Char> = font.next_larger_chain(Char::A).collect();
    /// assert_eq!(chain, vec![Char::A, Char::B, Char::C]);
    /// ```
    pub fn next_larger_chain(&self, c: Char) -> NextLargerChain<'_> {
        NextLargerChain {
            font: self,
            next: self.chars.contains_key(&c).then_some(c),
            remaining: self.chars.len(),
        }
    }

    /// Kern between the two characters, relative to the design size.
    pub fn kern(&self, left: Char, right: Char) -> Option<Number> {
        match self.char_info(left)?.link {
            CharLink::LigKernStart(start) => self.lig_kern_program.kern(start, right),
            _ => None,
        }
    }

    /// Ligature character replacing the two characters.
    pub fn ligature(&self, left: Char, right: Char) -> Option<Char> {
        match self.char_info(left)?.link {
            CharLink::LigKernStart(start) => self.lig_kern_program.ligature(start, right),
            _ => None,
        }
    }

    /// The parameter with the given 1-based number.
    pub fn param(&self, number: usize) -> Option<Number> {
        self.params.get(number)
    }
}

impl font::Format for Font {
    const DEFAULT_FILE_EXTENSION: &'static str = "tfm";
    type Error = Error;

    fn parse(b: &[u8]) -> Result<Self, Self::Error> {
        Font::from_tfm_bytes(b).map(|(font, _)| font)
    }
}

/// Iterator returned by [`Font::next_larger_chain`].
pub struct NextLargerChain<'a> {
    font: &'a Font,
    next: Option<Char>,
    // Bound on the walk; cycles are rejected while loading but fonts can be built by hand.
    remaining: usize,
}

impl<'a> Iterator for NextLargerChain<'a> {
    type Item = Char;

    fn next(&mut self) -> Option<Char> {
        let c = self.next.take()?;
        self.remaining = self.remaining.checked_sub(1)?;
        if let Some(CharLink::NextLarger(next)) = self.font.char_info(c).map(|info| &info.link) {
            self.next = Some(*next);
        }
        Some(c)
    }
}

/// A .tfm font loaded at a specific size.
///
/// All dimensions are converted to scaled points when queried.
/// Font dimensions are converted once, when the font is loaded,
///     because they can be changed afterwards.
#[derive(Debug, Clone)]
pub struct ScaledFont {
    name: String,
    font: Rc<Font>,
    size: Scaled,
    font_dimens: FontDimens,
    hyphen_char: Option<char>,
    skew_char: Option<char>,
}

impl ScaledFont {
    /// Loads the font at the given size, or at its design size if none is given.
    pub fn new(name: impl Into<String>, font: Rc<Font>, size: Option<Scaled>) -> ScaledFont {
        let size = size.unwrap_or_else(|| design_size_in_scaled(&font));
        let font_dimens = font
            .params
            .0
            .iter()
            .enumerate()
            .map(|(i, param)| {
                if i == 0 {
                    // The slant is a pure number and is not scaled. TeX.2021.575
                    Scaled(param.0 >> 4)
                } else {
                    param.scale(size).unwrap_or(Scaled::ZERO)
                }
            })
            .collect();
        ScaledFont {
            name: name.into(),
            font,
            size,
            font_dimens,
            hyphen_char: Some('-'),
            skew_char: None,
        }
    }

    /// The unscaled font.
    pub fn font(&self) -> &Font {
        &self.font
    }

    fn scale(&self, n: Number) -> Scaled {
        n.scale(self.size).unwrap_or(Scaled::ZERO)
    }
}

pub(crate) fn design_size_in_scaled(font: &Font) -> Scaled {
    Scaled(font.header.design_size.0 >> 4)
}

impl font::Font for ScaledFont {
    fn name(&self) -> &str {
        &self.name
    }

    fn design_size(&self) -> Scaled {
        design_size_in_scaled(&self.font)
    }

    fn actual_size(&self) -> Scaled {
        self.size
    }

    fn checksum(&self) -> Option<u32> {
        Some(self.font.header.checksum)
    }

    fn glyph(&self, c: char) -> Option<Glyph> {
        let info = self.font.char_info(Char::try_from(c).ok()?)?;
        Some(Glyph {
            width: self.scale(info.width),
            height: self.scale(info.height),
            depth: self.scale(info.depth),
            italic_correction: self.scale(info.italic_correction),
        })
    }

    fn kern(&self, left: char, right: char) -> Option<Scaled> {
        let kern = self
            .font
            .kern(Char::try_from(left).ok()?, Char::try_from(right).ok()?)?;
        Some(self.scale(kern))
    }

    fn ligature(&self, left: char, right: char) -> Option<char> {
        self.font
            .ligature(Char::try_from(left).ok()?, Char::try_from(right).ok()?)
            .map(char::from)
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
