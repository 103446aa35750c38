//! Value types stored in registers

use std::path::PathBuf;
use std::rc::Rc;

use crate::CatCode;
use texcraft_core::Scaled;

/// A token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Token {
    Character { value: char, cat_code: CatCode },
    ControlSequence(String),
}

impl Token {
    pub fn letter(value: char) -> Token {
        Token::Character {
            value,
            cat_code: CatCode::Letter,
        }
    }

    pub fn other(value: char) -> Token {
        Token::Character {
            value,
            cat_code: CatCode::Other,
        }
    }

    pub fn control_sequence(name: impl Into<String>) -> Token {
        Token::ControlSequence(name.into())
    }
}

/// A list of tokens, like the value of a `\toks` register.
pub type TokenList = Vec<Token>;

/// Interaction mode, as set by `\batchmode` and friends.
///
/// TeX.2021.73
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Interaction {
    Batch,
    NonStop,
    Scroll,
    #[default]
    ErrorStop,
}

/// Kind of a group.
///
/// The numbers are the values of `\currentgrouptype`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GroupType {
    #[default]
    BottomLevel = 0,
    Simple = 1,
    HBox = 2,
    AdjustedHBox = 3,
    VBox = 4,
    VTop = 5,
    Align = 6,
    NoAlign = 7,
    Output = 8,
    Math = 9,
    Disc = 10,
    Insert = 11,
    VCenter = 12,
    MathChoice = 13,
    SemiSimple = 14,
    MathShift = 15,
    MathLeft = 16,
}

/// Identifier of a loaded font.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FontId(pub u32);

/// The null font, which is selected before any font is loaded.
pub const NULL_FONT: FontId = FontId(0);

/// Font and language used when typesetting characters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypesettingContext {
    pub font: FontId,
    pub language: Option<u32>,
}

/// Contents of a box register.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoxContent {
    pub width: Scaled,
    pub height: Scaled,
    pub depth: Scaled,
}

/// A macro definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Definition {
    pub parameter_text: TokenList,
    pub replacement_text: TokenList,
}

/// A box register value; `None` is a void box.
pub type BoxValue = Option<Rc<BoxContent>>;

/// A code binding; `None` means undefined.
pub type Binding = Option<Rc<Definition>>;

/// A file register value; `None` means closed.
pub type FileValue = Option<PathBuf>;
