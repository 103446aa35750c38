use super::*;
use crate::format::SubFileSizes;

/// Fatal error encountered while decoding a .tfm file.
///
/// Errors describe problems with the overall structure of the file.
/// When one occurs there is no reasonable way to recover a font from the data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The TFM file is empty (i.e., 0 bytes).
    FileIsEmpty,
    /// The TFM file consists of a single byte.
    FileHasOneByte(u8),
    /// The file length specified inside the TFM file is invalid because it is zero.
    InternalFileLengthIsZero,
    /// The file length specified inside the TFM file is invalid because it is negative.
    InternalFileLengthIsNegative(i16),
    /// The file is smaller than it claims.
    ///
    /// The payload is the claimed length of the file (in words) and the actual file size (in bytes).
    /// One word is 4 bytes.
    InternalFileLengthIsTooBig(i16, usize),
    /// The file length specified inside the TFM file is too small to hold the sub-file sizes.
    ///
    /// TFM files must contain at least 24 bytes of data: the 16-bit file size and the 11
    /// 16-bit numbers in the sub file sizes section.
    InternalFileLengthIsTooSmall(i16, usize),
    /// One of the sub file sizes is negative.
    SubFileSizeIsNegative(SubFileSizes),
    /// The header length is too small (either 0 or 1).
    HeaderLengthIsTooSmall(i16),
    /// The character range is invalid.
    ///
    /// This means either that the smallest character is more than one larger
    ///     than the largest character, or the largest character is bigger than 255.
    InvalidCharacterRange(i16, i16),
    /// The sub-file for either widths, heights, depths or italic corrections is empty.
    IncompleteSubFiles(SubFileSizes),
    /// There are more than 256 extensible characters.
    TooManyExtensibleCharacters(i16),
    /// The sub-file sizes do not add up to the file length.
    InconsistentSubFileSizes(i16, SubFileSizes),
    /// The design size is less than 1 point.
    DesignSizeIsTooSmall(Number),
    /// The first entry of a dimension table is not zero.
    NonZeroFirstDimension(DimensionTable),
    /// A dimension is not strictly between -16 and +16.
    DimensionOutOfRange {
        table: DimensionTable,
        index: usize,
        value: Number,
    },
    /// The boundary character program starts past the end of the lig/kern table.
    BoundaryCharStartTooLarge(usize),
    /// The lig/kern program of a character starts past the end of the lig/kern table.
    LigKernStartTooLarge(Char),
    /// The lig/kern instruction at the given index skips past the end of the table.
    StepSkipsTooFar(usize),
    /// The lig/kern instruction at the given index is a restart pointing
    ///     past the end of the table.
    UnconditionalStopAddressTooBig(usize),
    /// A next-larger list contains a cycle.
    ///
    /// The payload is the largest character in the cycle.
    CharListCycle(Char),
}

impl Error {
    /// Returns the message the TFtoPL program prints for this kind of error.
    pub fn tftopl_message(&self) -> String {
        use Error::*;
        match self {
            FileHasOneByte(0..=127) => "The input file is only one byte long!".into(),
            InternalFileLengthIsZero => {
                "The file claims to have length zero, but that's impossible!".into()
            }
            FileHasOneByte(128..=255) | InternalFileLengthIsNegative(_) | FileIsEmpty => {
                "The first byte of the input file exceeds 127!".into()
            }
            InternalFileLengthIsTooBig(_, _) => "The file has fewer bytes than it claims!".into(),
            InternalFileLengthIsTooSmall(_, _) | SubFileSizeIsNegative(_) => {
                "One of the subfile sizes is negative!".into()
            }
            HeaderLengthIsTooSmall(lh) => format!["The header length is only {lh}!"],
            InvalidCharacterRange(l, u) => {
                format!("The character code range {l}..{u} is illegal!")
            }
            IncompleteSubFiles(_) => "Incomplete subfiles for character dimensions!".into(),
            TooManyExtensibleCharacters(n) => format!["There are {n} extensible recipes!"],
            InconsistentSubFileSizes(_, _) => {
                "Subfile sizes don't add up to the stated total!".into()
            }
            DesignSizeIsTooSmall(_) => "Bad TFM file: Design size too small!".into(),
            NonZeroFirstDimension(table) => {
                format!["Bad TFM file: {}[0] should be zero.", table.short_name()]
            }
            DimensionOutOfRange { table, index, .. } => format![
                "Bad TFM file: {} {} is too big.",
                table.long_name(),
                index
            ],
            BoundaryCharStartTooLarge(_) => {
                "Bad TFM file: Ligature/kern starting index for boundarychar is too large.".into()
            }
            LigKernStartTooLarge(c) => format![
                "Bad TFM file: Ligature/kern starting index for character '{:03o} is too large.",
                c.0
            ],
            StepSkipsTooFar(_) => "Bad TFM file: Ligature/kern step skips too far.".into(),
            UnconditionalStopAddressTooBig(_) => {
                "Bad TFM file: Ligature unconditional stop command address is too big.".into()
            }
            CharListCycle(c) => format![
                "Bad TFM file: Cycle in a character list!\nCharacter '{:03o} now ends the list.",
                c.0
            ],
        }
    }

    /// Returns the section in Knuth's TFtoPL (version 2014) in which this error occurs.
    pub fn tftopl_section(&self) -> u8 {
        use Error::*;
        match self {
            FileIsEmpty
            | FileHasOneByte(_)
            | InternalFileLengthIsZero
            | InternalFileLengthIsNegative(_)
            | InternalFileLengthIsTooBig(_, _) => 20,
            InternalFileLengthIsTooSmall(_, _)
            | SubFileSizeIsNegative(_)
            | HeaderLengthIsTooSmall(_)
            | InvalidCharacterRange(_, _)
            | IncompleteSubFiles(_)
            | TooManyExtensibleCharacters(_)
            | InconsistentSubFileSizes(_, _) => 21,
            DesignSizeIsTooSmall(_) => 51,
            NonZeroFirstDimension(_) | DimensionOutOfRange { .. } => 62,
            BoundaryCharStartTooLarge(_) | LigKernStartTooLarge(_) => 67,
            StepSkipsTooFar(_) => 69,
            UnconditionalStopAddressTooBig(_) => 74,
            CharListCycle(_) => 84,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tftopl_message())
    }
}

impl std::error::Error for Error {}

/// Recoverable problem encountered while decoding a .tfm file.
///
/// Each warning describes a single record that was fixed up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// The file is longer than the length specified inside it.
    ///
    /// Additional data after the file length is ignored.
    InternalFileLengthIsSmall(i16, usize),
    /// The length byte of a header string exceeds the space reserved for it.
    ///
    /// The string is truncated to the maximum length.
    StringIsTooLong {
        field: HeaderString,
        len: u8,
        max_len: u8,
    },
    /// A header string contains a byte that is not printable ASCII.
    ///
    /// The byte is replaced by `?`.
    NonPrintableCharacterInString { field: HeaderString, byte: u8 },
    /// A header string contains a parenthesis.
    ///
    /// The parenthesis is replaced by `/`.
    ParenthesisInString { field: HeaderString },
    /// A math font does not have the expected number of parameters.
    UnusualNumberOfParameters { font_type: FontType, got: usize },
    /// A character refers to a dimension past the end of a table.
    ///
    /// The dimension is reset to zero.
    DimensionIndexTooLarge {
        c: Char,
        table: DimensionTable,
        index: u8,
    },
    /// A next-larger link points to a character that does not exist.
    ///
    /// The link is removed.
    NonExistentNextLarger { c: Char, next_larger: Char },
    /// A character refers to an extensible recipe past the end of the table.
    ///
    /// The recipe is removed.
    ExtensibleIndexTooLarge { c: Char, index: u8 },
    /// An extensible recipe refers to a character that does not exist.
    ///
    /// The piece is replaced by the first character in the font.
    NonExistentExtensiblePart { c: Char, part: Char },
    /// A lig/kern instruction tests for a character that does not exist.
    ///
    /// The instruction is retargeted to the first character in the font.
    NonExistentNextChar { index: usize, next_char: Char },
    /// A ligature instruction inserts a character that does not exist.
    ///
    /// The ligature is retargeted to the first character in the font.
    NonExistentLigatureChar { index: usize, lig_char: Char },
    /// A kern instruction refers to a kern past the end of the kern table.
    ///
    /// The kern is replaced by zero.
    KernIndexTooLarge { index: usize, kern_index: usize },
    /// A ligature instruction moves the cursor past the characters it keeps.
    ///
    /// The ligature is replaced by one that keeps neither character.
    NonstandardLigatureOp { index: usize },
    /// The lig/kern program of a character starts at a restart instruction.
    ///
    /// The character is given no lig/kern program.
    LigKernStartIsRestart(Char),
}

impl Warning {
    /// Returns the warning message the TFtoPL program prints for this kind of warning.
    pub fn tftopl_message(&self) -> String {
        use Warning::*;
        match self {
            InternalFileLengthIsSmall(_, _) => {
                "There's some extra junk at the end of the TFM file,\nbut I'll proceed as if it weren't there.".into()
            }
            StringIsTooLong { .. } => "Bad TFM file: String is too long; I've shortened it drastically.".into(),
            NonPrintableCharacterInString { .. } => {
                "Bad TFM file: Non-printable character in string; I've changed it to '?'.".into()
            }
            ParenthesisInString { .. } => {
                "Bad TFM file: Parenthesis in string has been changed to slash.".into()
            }
            UnusualNumberOfParameters { font_type, got } => {
                let (font_description, expected) = match font_type {
                    FontType::MathExtension => ("an extension", 13),
                    _ => ("a math symbols", 22),
                };
                format!["Unusual number of fontdimen parameters for {font_description} font ({got} not {expected})."]
            }
            DimensionIndexTooLarge { c, table, .. } => format![
                "{} index for character '{:03o} is too large;\nso I reset it to zero.",
                table.long_name(),
                c.0
            ],
            NonExistentNextLarger { next_larger, .. } => format![
                "Bad TFM file: Character list link to nonexistent character '{:03o}.",
                next_larger.0
            ],
            ExtensibleIndexTooLarge { c, .. } => format![
                "Extensible index for character '{:03o} is too large;\nso I reset it to zero.",
                c.0
            ],
            NonExistentExtensiblePart { part, .. } => format![
                "Bad TFM file: Extensible recipe involves the nonexistent character '{:03o}.",
                part.0
            ],
            NonExistentNextChar { next_char, .. } => format![
                "Bad TFM file: Ligature/kern step for nonexistent character '{:03o}.",
                next_char.0
            ],
            NonExistentLigatureChar { lig_char, .. } => format![
                "Bad TFM file: Ligature step produces the nonexistent character '{:03o}.",
                lig_char.0
            ],
            KernIndexTooLarge { .. } => "Bad TFM file: Kern index too large.".into(),
            NonstandardLigatureOp { .. } => {
                "Ligature step with nonstandard code changed to LIG".into()
            }
            LigKernStartIsRestart(c) => format![
                "Bad TFM file: Ligature/kern program for character '{:03o} starts at a restart;\nso I removed it.",
                c.0
            ],
        }
    }

    /// Returns the section in Knuth's TFtoPL (version 2014) in which this warning occurs.
    pub fn tftopl_section(&self) -> u8 {
        use Warning::*;
        match self {
            InternalFileLengthIsSmall(_, _) => 20,
            StringIsTooLong { .. }
            | NonPrintableCharacterInString { .. }
            | ParenthesisInString { .. } => 47,
            UnusualNumberOfParameters { .. } => 59,
            DimensionIndexTooLarge { table, .. } => match table {
                DimensionTable::Width => 79,
                DimensionTable::Height => 80,
                DimensionTable::Depth => 81,
                _ => 82,
            },
            NonExistentNextLarger { .. } => 84,
            ExtensibleIndexTooLarge { .. } | NonExistentExtensiblePart { .. } => 85,
            NonExistentNextChar { .. } | NonExistentLigatureChar { .. } => 77,
            KernIndexTooLarge { .. } => 76,
            NonstandardLigatureOp { .. } => 77,
            LigKernStartIsRestart(_) => 67,
        }
    }
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tftopl_message())
    }
}

/// Sink for warnings produced while decoding.
///
/// Every warning is logged when it is recorded.
#[derive(Debug, Default)]
pub(crate) struct Warnings(Vec<Warning>);

impl Warnings {
    pub(crate) fn push(&mut self, warning: Warning) {
        log::warn!("{}", warning.tftopl_message());
        self.0.push(warning);
    }

    pub(crate) fn into_vec(self) -> Vec<Warning> {
        self.0
    }
}

/// One of the numeric tables in a .tfm file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimensionTable {
    Width,
    Height,
    Depth,
    ItalicCorrection,
    Kern,
    Param,
}

impl DimensionTable {
    fn short_name(&self) -> &'static str {
        match self {
            DimensionTable::Width => "width",
            DimensionTable::Height => "height",
            DimensionTable::Depth => "depth",
            DimensionTable::ItalicCorrection => "italic",
            DimensionTable::Kern => "kern",
            DimensionTable::Param => "param",
        }
    }

    fn long_name(&self) -> &'static str {
        match self {
            DimensionTable::Width => "Width",
            DimensionTable::Height => "Height",
            DimensionTable::Depth => "Depth",
            DimensionTable::ItalicCorrection => "Italic correction",
            DimensionTable::Kern => "Kern",
            DimensionTable::Param => "Parameter",
        }
    }
}

/// One of the strings in the .tfm header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderString {
    CharacterCodingScheme,
    FontFamily,
}
