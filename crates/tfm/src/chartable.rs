use std::collections::BTreeMap;

use super::*;
use crate::error::Warnings;
use crate::format::{CharTag, File};

/// Metrics of a single character.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharInfo {
    pub width: Number,
    pub height: Number,
    pub depth: Number,
    pub italic_correction: Number,
    pub link: CharLink,
}

/// Additional data attached to a character.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CharLink {
    #[default]
    Plain,
    /// Index of the character's program in the compacted lig/kern program.
    LigKernStart(usize),
    /// The next larger version of the character.
    NextLarger(Char),
    /// The character is built from pieces.
    Extensible(ExtensibleRecipe),
}

/// Joins the character info records of a file with its tables.
///
/// `lig_kern_starts` is the start of each character's compacted lig/kern program.
pub(crate) fn assemble(
    file: &File,
    lig_kern_starts: &BTreeMap<Char, usize>,
    warnings: &mut Warnings,
) -> Result<BTreeMap<Char, CharInfo>, Error> {
    let mut chars = BTreeMap::new();
    for (c, raw) in file.chars() {
        let mut dimen = |table: &[Number], index: u8, kind: DimensionTable| {
            // TFtoPL.2014.79
            match table.get(index as usize) {
                Some(value) => *value,
                None => {
                    warnings.push(Warning::DimensionIndexTooLarge {
                        c,
                        table: kind,
                        index,
                    });
                    Number::ZERO
                }
            }
        };
        let width = dimen(&file.widths, raw.width_index, DimensionTable::Width);
        let height = dimen(&file.heights, raw.height_index, DimensionTable::Height);
        let depth = dimen(&file.depths, raw.depth_index, DimensionTable::Depth);
        let italic_correction = dimen(
            &file.italic_corrections,
            raw.italic_index,
            DimensionTable::ItalicCorrection,
        );
        let link = match raw.tag {
            CharTag::None => CharLink::Plain,
            CharTag::Ligature(_) => lig_kern_starts
                .get(&c)
                .copied()
                .map(CharLink::LigKernStart)
                .unwrap_or_default(),
            CharTag::List(next_larger) => next_larger_link(file, c, next_larger, warnings)?,
            CharTag::Extension(index) => extensible_link(file, c, index, warnings),
        };
        chars.insert(
            c,
            CharInfo {
                width,
                height,
                depth,
                italic_correction,
                link,
            },
        );
    }
    log::debug!("assembled {} characters", chars.len());
    Ok(chars)
}

// TFtoPL.2014.84
fn next_larger_link(
    file: &File,
    c: Char,
    next_larger: Char,
    warnings: &mut Warnings,
) -> Result<CharLink, Error> {
    if !file.char_exists(next_larger) {
        warnings.push(Warning::NonExistentNextLarger { c, next_larger });
        return Ok(CharLink::Plain);
    }
    // Links from smaller characters have already been checked, so any cycle through
    // `c` is found by following the chain while it stays below `c`.
    let mut r = next_larger;
    while r < c {
        match file.char_info(r).map(|info| info.tag) {
            Some(CharTag::List(next)) => r = next,
            _ => break,
        }
    }
    if r == c {
        return Err(Error::CharListCycle(c));
    }
    Ok(CharLink::NextLarger(next_larger))
}

// TFtoPL.2014.85
fn extensible_link(file: &File, c: Char, index: u8, warnings: &mut Warnings) -> CharLink {
    let Some(recipe) = file.extensible_recipes.get(index as usize) else {
        warnings.push(Warning::ExtensibleIndexTooLarge { c, index });
        return CharLink::Plain;
    };
    let mut check = |part: Char| {
        if file.char_exists(part) {
            part
        } else {
            warnings.push(Warning::NonExistentExtensiblePart { c, part });
            file.first_existing_char()
        }
    };
    CharLink::Extensible(ExtensibleRecipe {
        top: recipe.top.map(&mut check),
        middle: recipe.middle.map(&mut check),
        bottom: recipe.bottom.map(&mut check),
        rep: check(recipe.rep),
    })
}
