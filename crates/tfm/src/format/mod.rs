//! The TeX font metric (.tfm) binary file format
//!
//! This module contains a faithful, uninterpreted representation of a .tfm file.
//! Lig/kern instructions are kept in their raw 4-byte form
//!     and character info records still hold indices into the other tables.
//! The [`crate::Font`] type is the interpreted form.

mod deserialize;
mod validate;

use super::*;
use crate::error::Warnings;

pub(crate) use deserialize::deserialize;
pub(crate) use validate::check_tables;

/// Complete contents of a TeX font metric (.tfm) file.
///
/// In TeX the font data for all fonts is stored in one contiguous piece of memory
///     (`font_info`, defined in TeX82.2021.549).
/// Here each sub-file gets its own vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    /// Header.
    pub header: Header,

    /// The smallest character in the font.
    ///
    /// If the font has no characters this is 0.
    pub smallest_char: Char,

    /// Character infos, one for each character from the smallest to the largest.
    pub char_infos: Vec<CharInfo>,

    /// Character widths
    pub widths: Vec<Number>,

    /// Character heights
    pub heights: Vec<Number>,

    /// Character depths
    pub depths: Vec<Number>,

    /// Character italic corrections
    pub italic_corrections: Vec<Number>,

    /// Lig kern instructions.
    pub lig_kern_instructions: Vec<LigKernInstruction>,

    /// Kerns. These are referenced from inside the lig kern instructions.
    pub kerns: Vec<Number>,

    /// Extensible recipes.
    pub extensible_recipes: Vec<ExtensibleRecipe>,

    /// Font parameters.
    pub params: Params,
}

impl Default for File {
    fn default() -> Self {
        Self {
            header: Default::default(),
            smallest_char: Char(0),
            char_infos: vec![],
            widths: vec![Number::ZERO],
            heights: vec![Number::ZERO],
            depths: vec![Number::ZERO],
            italic_corrections: vec![Number::ZERO],
            lig_kern_instructions: vec![],
            kerns: vec![],
            extensible_recipes: vec![],
            params: Default::default(),
        }
    }
}

impl File {
    /// Splits a .tfm file into its sub-files.
    ///
    /// No interpretation beyond checking the sub-file sizes is done.
    pub fn deserialize(b: &[u8]) -> Result<(File, Vec<Warning>), Error> {
        let mut warnings = Warnings::default();
        let file = deserialize::deserialize(b, &mut warnings)?;
        Ok((file, warnings.into_vec()))
    }

    /// Returns the info record for the character, if the character exists.
    pub fn char_info(&self, c: Char) -> Option<&CharInfo> {
        let i = (c.0 as usize).checked_sub(self.smallest_char.0 as usize)?;
        self.char_infos.get(i).filter(|info| info.exists())
    }

    pub fn char_exists(&self, c: Char) -> bool {
        self.char_info(c).is_some()
    }

    /// Iterator over all existing characters in increasing order.
    pub fn chars(&self) -> impl Iterator<Item = (Char, &CharInfo)> + '_ {
        let first = self.smallest_char.0 as usize;
        self.char_infos
            .iter()
            .enumerate()
            .filter(|(_, info)| info.exists())
            .map(move |(i, info)| (Char((first + i) as u8), info))
    }

    /// The smallest character that exists.
    ///
    /// Broken references to characters are redirected here.
    /// If no character exists this is the smallest character of the range.
    pub fn first_existing_char(&self) -> Char {
        self.chars()
            .map(|(c, _)| c)
            .next()
            .unwrap_or(self.smallest_char)
    }
}

/// Sizes of the sub-files, as given in the first 24 bytes of the file.
#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub struct SubFileSizes {
    /// Length of the header data, in words.
    pub lh: i16,
    /// Smallest character code in the font.
    pub bc: i16,
    /// Largest character code in the font.
    pub ec: i16,
    /// Number of words in the width table.
    pub nw: i16,
    /// Number of words in the height table.
    pub nh: i16,
    /// Number of words in the depth table.
    pub nd: i16,
    /// Number of words in the italic correction table.
    pub ni: i16,
    /// Number of words in the lig/kern table.
    pub nl: i16,
    /// Number of words in the kern table.
    pub nk: i16,
    /// Number of words in the extensible character table.
    pub ne: i16,
    /// Number of font parameter words.
    pub np: i16,
}

/// Data about one character in a .tfm file.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CharInfo {
    /// Index into the width table. Characters with width index 0 don't exist.
    pub width_index: u8,
    pub height_index: u8,
    pub depth_index: u8,
    pub italic_index: u8,
    pub tag: CharTag,
}

impl CharInfo {
    pub fn exists(&self) -> bool {
        self.width_index != 0
    }
}

/// Tag of a character in a .tfm file.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum CharTag {
    #[default]
    None,
    /// Index of the first lig/kern instruction for the character.
    Ligature(u8),
    /// Next larger character.
    List(Char),
    /// Index of the extensible recipe.
    Extension(u8),
}

/// A lig/kern instruction as it appears in a .tfm file.
///
/// The meaning of the four bytes depends on their values.
/// An instruction whose `skip` byte exceeds 128 is not executed;
///     instead it redirects to the instruction at [`LigKernInstruction::restart_index`].
/// This is how character programs starting past index 255 are reached.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LigKernInstruction {
    pub skip: u8,
    pub next_char: Char,
    pub op: u8,
    pub remainder: u8,
}

impl LigKernInstruction {
    pub fn new(bytes: [u8; 4]) -> LigKernInstruction {
        LigKernInstruction {
            skip: bytes[0],
            next_char: Char(bytes[1]),
            op: bytes[2],
            remainder: bytes[3],
        }
    }

    /// This is the last instruction of a program.
    pub fn means_stop(&self) -> bool {
        self.skip >= 128
    }

    /// This instruction redirects to [`LigKernInstruction::restart_index`].
    pub fn means_restart(&self) -> bool {
        self.skip > 128
    }

    /// This instruction holds boundary char data.
    ///
    /// Only meaningful for the first and last instructions of the table.
    pub fn means_boundary(&self) -> bool {
        self.skip == 255
    }

    /// Index of the instruction executed after this one if the next char doesn't match.
    pub fn next_index(&self, pos: usize) -> usize {
        pos + self.skip as usize + 1
    }

    pub fn restart_index(&self) -> usize {
        self.op as usize * 256 + self.remainder as usize
    }

    pub fn means_kern(&self) -> bool {
        self.op >= 128
    }

    pub fn kern_index(&self) -> usize {
        (self.op as usize - 128) * 256 + self.remainder as usize
    }

    /// For ligatures, whether the left character is kept.
    pub fn keep_left(&self) -> bool {
        self.op & 2 != 0
    }

    /// For ligatures, whether the right character is kept.
    pub fn keep_right(&self) -> bool {
        self.op & 1 != 0
    }

    /// For ligatures, how many characters the cursor moves over after insertion.
    pub fn step_over(&self) -> u8 {
        self.op >> 2
    }

    pub fn lig_char(&self) -> Char {
        Char(self.remainder)
    }
}

/// Extensible recipe instruction in a .tfm file.
///
/// Extensible characters are built from an optional top, middle and bottom piece,
///     with the repeated piece filling the gaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExtensibleRecipe {
    pub top: Option<Char>,
    pub middle: Option<Char>,
    pub bottom: Option<Char>,
    pub rep: Char,
}

impl ExtensibleRecipe {
    /// All characters the recipe refers to.
    pub fn chars(&self) -> impl Iterator<Item = Char> {
        [self.top, self.middle, self.bottom, Some(self.rep)]
            .into_iter()
            .flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lig_kern_instruction_fields() {
        let kern = LigKernInstruction::new([3, b'V', 130, 13]);
        assert!(!kern.means_stop());
        assert!(kern.means_kern());
        assert_eq!(kern.kern_index(), 2 * 256 + 13);
        assert_eq!(kern.next_index(10), 14);

        let lig = LigKernInstruction::new([128, b'i', 2 + 4, b'X']);
        assert!(lig.means_stop());
        assert!(!lig.means_restart());
        assert!(!lig.means_kern());
        assert!(lig.keep_left());
        assert!(!lig.keep_right());
        assert_eq!(lig.step_over(), 1);
        assert_eq!(lig.lig_char(), Char::X);

        let restart = LigKernInstruction::new([129, 0, 1, 4]);
        assert!(restart.means_restart());
        assert_eq!(restart.restart_index(), 260);
        assert!(LigKernInstruction::new([255, 0, 0, 0]).means_boundary());
    }

    #[test]
    fn char_lookup() {
        let file = File {
            smallest_char: Char(65),
            char_infos: vec![
                CharInfo::default(),
                CharInfo {
                    width_index: 1,
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        assert!(!file.char_exists(Char::A));
        assert!(file.char_exists(Char::B));
        assert!(!file.char_exists(Char::C));
        assert!(!file.char_exists(Char(0)));
        assert_eq!(file.first_existing_char(), Char::B);
        assert_eq!(file.chars().map(|(c, _)| c).collect::<Vec<_>>(), vec![Char::B]);
    }

    #[test]
    fn first_existing_char_of_empty_font() {
        let file = File::default();
        assert_eq!(file.first_existing_char(), Char(0));
    }
}
