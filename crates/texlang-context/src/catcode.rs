//! Category codes
use CatCode::*;

/// Enum representing all 16 category codes in TeX.
///
/// Each variant's documentation contains an example character which is mapped to that category code in plainTeX.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CatCode {
    /// Marks the beginning of a control sequence.
    /// Example: `\`.
    Escape = 0,
    /// Begins a new group.
    /// Example: `{`.
    BeginGroup = 1,
    /// Ends an existing new group.
    /// Example: `}`.
    EndGroup = 2,
    /// Starts or ends math mode.
    /// Example: `$`.
    MathShift = 3,
    /// Used in typesetting tables to align cells.
    /// Example: `&`.
    AlignmentTab = 4,
    /// Marks a new line in the input.
    /// Example: `\n`.
    EndOfLine = 5,
    /// Marks the beginning of a parameter number.
    /// Example: `#`.
    Parameter = 6,
    /// Puts following character or group in a superscript.
    /// Example: `^`.
    Superscript = 7,
    /// Puts following character or group in a subscript.
    /// Example: `_`.
    Subscript = 8,
    /// Character that is ignored by the lexer.
    /// Example: ASCII null (0).
    Ignored = 9,
    /// Whitespace. Example: ` `.
    Space = 10,
    /// A character that can be used as a control sequence name.
    /// Examples: `[a-zA-z]`.
    Letter = 11,
    /// A character than cannot be used as a control sequence name.
    /// Example: `@`.
    #[default]
    Other = 12,
    /// A single character that behaves like a control sequence.
    /// Example: `~`.
    Active = 13,
    /// Marks the beginning of a comment.
    /// Example: `%`.
    Comment = 14,
    /// An invalid character.
    /// Example: ASCII delete (127).
    Invalid = 15,
}

impl TryFrom<u8> for CatCode {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Escape),
            1 => Ok(BeginGroup),
            2 => Ok(EndGroup),
            3 => Ok(MathShift),
            4 => Ok(AlignmentTab),
            5 => Ok(EndOfLine),
            6 => Ok(Parameter),
            7 => Ok(Superscript),
            8 => Ok(Subscript),
            9 => Ok(Ignored),
            10 => Ok(Space),
            11 => Ok(Letter),
            12 => Ok(Other),
            13 => Ok(Active),
            14 => Ok(Comment),
            15 => Ok(Invalid),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for CatCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} ({})", self, *self as u8)
    }
}

impl CatCode {
    /// The category code a character has before any assignment.
    ///
    /// This extends the INITEX defaults (TeX.2021.232) to all of Unicode:
    ///     every alphabetic character is a letter.
    ///
    /// ```
    /// # use texlang_context::CatCode;
    /// assert_eq!(CatCode::initial('\\'), CatCode::Escape);
    /// assert_eq!(CatCode::initial('ß'), CatCode::Letter);
    /// assert_eq!(CatCode::initial('{'), CatCode::Other);
    /// ```
    pub fn initial(c: char) -> CatCode {
        match c {
            '\\' => Escape,
            '\r' | '\n' => EndOfLine,
            '%' => Comment,
            ' ' => Space,
            '\0' => Ignored,
            '\u{7f}' => Invalid,
            c if c.is_alphabetic() => Letter,
            _ => Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! initial_tests {
        ( $( ($name: ident, $c: expr, $want: expr), )+ ) => {
            $(
                #[test]
                fn $name() {
                    assert_eq!(CatCode::initial($c), $want);
                }
            )+
        };
    }

    initial_tests!(
        (escape, '\\', Escape),
        (carriage_return, '\r', EndOfLine),
        (newline, '\n', EndOfLine),
        (comment, '%', Comment),
        (space, ' ', Space),
        (null, '\0', Ignored),
        (delete, '\u{7f}', Invalid),
        (lower_letter, 'q', Letter),
        (upper_letter, 'Q', Letter),
        (greek_letter, 'λ', Letter),
        (digit, '7', Other),
        (brace, '}', Other),
        (tilde, '~', Other),
        (tab, '\t', Other),
    );

    #[test]
    fn u8_round_trip() {
        for i in 0..16_u8 {
            let cat_code = CatCode::try_from(i).unwrap();
            assert_eq!(cat_code as u8, i);
        }
        assert_eq!(CatCode::try_from(16), Err(()));
    }

    #[test]
    fn display() {
        assert_eq!(Letter.to_string(), "Letter (11)");
    }
}
