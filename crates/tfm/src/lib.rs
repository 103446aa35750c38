//! Decoder and validator for the TeX font metric (.tfm) file format
//!
//! Decoding a .tfm file happens in four stages:
//!
//! 1. The raw bytes are split into sub-files and decoded into a [`format::File`]:
//!     the header, the character info records, the dimension tables,
//!     the raw lig/kern instructions, the kerns, the extensible recipes and the parameters.
//!     Structural problems (inconsistent lengths, negative sizes, ...) abort decoding here.
//!
//! 2. The tables are checked: the first entry of each dimension table must be zero,
//!     and every dimension must be strictly between -16 and +16.
//!
//! 3. The raw lig/kern instructions are compacted into a [`ligkern::Program`].
//!     Boundary char markers and restart instructions are dropped,
//!     and the entrypoint redirects they encode are resolved.
//!
//! 4. The character info records are joined with the dimension tables and the
//!     compacted program to give one [`CharInfo`] per character.
//!
//! All four stages are run by [`Font::from_tfm_bytes`].
//!
//! Problems affecting a single record, like a character index pointing past the end
//!     of a table, do not abort decoding.
//! Instead the record is fixed up, a [`Warning`] is returned alongside the font,
//!     and the warning is logged through the [`log`] crate.
//!
//! ```
//! # use tfm::*;
//! let bytes: Vec<u8> = vec![
//!     /* lf */ 0, 14, /* lh */ 0, 2, /* bc */ 0, 65, /* ec */ 0, 65,
//!     /* nw */ 0, 2, /* nh */ 0, 1, /* nd */ 0, 1, /* ni */ 0, 1,
//!     /* nl */ 0, 0, /* nk */ 0, 0, /* ne */ 0, 0, /* np */ 0, 0,
//!     /* checksum */ 0, 0, 0, 0, /* design size */ 0, 160, 0, 0,
//!     /* char info for 'A' */ 1, 0, 0, 0,
//!     /* widths */ 0, 0, 0, 0, 0, 8, 0, 0,
//!     /* heights */ 0, 0, 0, 0, /* depths */ 0, 0, 0, 0, /* italics */ 0, 0, 0, 0,
//! ];
//! let (font, warnings) = Font::from_tfm_bytes(&bytes).unwrap();
//! assert_eq!(warnings, vec![]);
//! assert_eq!(font.header.design_size, Number::UNITY * 10);
//! let chars: Vec<Char> = font.chars.keys().copied().collect();
//! assert_eq!(chars, vec![Char::A]);
//! let a = font.char_info(Char::A).unwrap();
//! assert_eq!(a.width, Number::UNITY / 2);
//! assert_eq!(a.height, Number::ZERO);
//! assert_eq!(a.depth, Number::ZERO);
//! assert_eq!(a.italic_correction, Number::ZERO);
//! assert_eq!(a.link, CharLink::Plain);
//! ```

use texcraft_core::Scaled;

mod chartable;
mod error;
mod factory;
mod metrics;
pub mod format;
pub mod ligkern;

pub use chartable::{CharInfo, CharLink};
pub use error::{DimensionTable, Error, HeaderString, Warning};
pub use factory::{FactoryConfig, FileFontFactory};
pub use metrics::{Font, NextLargerChain, ScaledFont};
pub use format::ExtensibleRecipe;

/// The TFM header, which contains metadata about the file.
///
/// This is defined in TFtoPL.2014.10.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Header {
    /// The font checksum.
    ///
    /// In TeX82, this is stored in the `font_check` array (TeX82.2021.549).
    pub checksum: u32,
    /// The design size, which is always at least 1 point.
    ///
    /// In TeX82, this is stored in the `font_dsize` array (TeX82.2021.549).
    pub design_size: Number,
    /// Character coding scheme, upper-cased.
    ///
    /// This is only present if the header has at least 12 words.
    pub character_coding_scheme: Option<String>,
    /// Font family, upper-cased.
    ///
    /// This is only present if the header has at least 17 words.
    pub font_family: Option<String>,
    pub seven_bit_safe: Option<bool>,
    pub face: Option<Face>,
    /// The TFM format allows the header to contain arbitrary additional data.
    pub additional_data: Vec<u32>,
}

impl Default for Header {
    fn default() -> Self {
        Header {
            checksum: 0,
            design_size: Number::UNITY * 10,
            character_coding_scheme: None,
            font_family: None,
            seven_bit_safe: None,
            face: None,
            additional_data: vec![],
        }
    }
}

/// Kind of font, determined by the character coding scheme.
///
/// Math fonts have a fixed number of parameters that TeX relies on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FontType {
    #[default]
    Vanilla,
    /// Coding scheme starting with `TEX MATH SY`.
    MathSymbols,
    /// Coding scheme starting with `TEX MATH EX`.
    MathExtension,
}

impl FontType {
    pub fn from_coding_scheme(scheme: Option<&str>) -> FontType {
        match scheme {
            Some(s) if s.starts_with("TEX MATH SY") => FontType::MathSymbols,
            Some(s) if s.starts_with("TEX MATH EX") => FontType::MathExtension,
            _ => FontType::Vanilla,
        }
    }

    /// Number of parameters fonts of this type are expected to have.
    pub fn expected_number_of_params(&self) -> Option<usize> {
        match self {
            FontType::Vanilla => None,
            FontType::MathSymbols => Some(22),
            FontType::MathExtension => Some(13),
        }
    }
}

/// A character in a TFM file.
///
/// TFM files only support 1-byte characters.
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Char(pub u8);

impl From<u8> for Char {
    fn from(value: u8) -> Self {
        Char(value)
    }
}

impl TryFrom<char> for Char {
    type Error = std::char::TryFromCharError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        let u: u8 = value.try_into()?;
        Ok(Char(u))
    }
}

impl From<Char> for char {
    fn from(value: Char) -> Self {
        value.0 as char
    }
}

macro_rules! const_chars {
    ( $( ($name: ident, $value: expr), )+ ) => {
        $(
            pub const $name: Char = Char($value);
        )+
    };
}

impl Char {
    const_chars![
        (A, b'A'),
        (B, b'B'),
        (C, b'C'),
        (D, b'D'),
        (X, b'X'),
        (Y, b'Y'),
    ];
}

/// Fixed-width numeric type used in TFM files.
///
/// This numeric type has 11 bits for the integer part,
/// 20 bits for the fractional part, and a single signed bit.
/// The inner value is the number multiplied by 2^20.
/// It is called a `fix_word` in TFtoPL.
///
/// The [`std::fmt::Display`] implementation prints the shortest decimal
///     that parses back to the same number using the [`std::str::FromStr`] implementation:
///
/// ```
/// # use tfm::Number;
/// let n = Number::UNITY * 3 / 2;
/// assert_eq!(n.to_string(), "1.5");
/// assert_eq!("1.5".parse::<Number>(), Ok(n));
/// ```
#[derive(Default, PartialEq, Eq, Debug, Copy, Clone, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Number(pub i32);

impl Number {
    /// Representation of the number 0 as a [Number].
    pub const ZERO: Number = Number(0);

    /// Representation of the number 1 as a [Number].
    pub const UNITY: Number = Number(1 << 20);

    /// Returns true if this number is less than the integer _n_.
    pub fn less_than(&self, n: i32) -> bool {
        (self.0 as i64) < ((n as i64) << 20)
    }

    /// Returns true if this number is greater than the integer _n_.
    pub fn more_than(&self, n: i32) -> bool {
        (self.0 as i64) > ((n as i64) << 20)
    }

    /// Returns true if the number lies strictly between -16 and +16.
    pub fn is_abs_less_than_16(&self) -> bool {
        self.more_than(-16) && self.less_than(16)
    }

    /// Returns the number in thousandths, rounded towards zero.
    ///
    /// This is the unit used when font dimensions are given relative to the design size.
    pub fn to_units(&self) -> i32 {
        let v = self.0 as i64;
        let units = if v > 0 {
            (v * 1000) >> 20
        } else {
            -((-v * 1000) >> 20)
        };
        units as i32
    }

    /// Returns the number closest to the given number of thousandths.
    ///
    /// Returns `None` if the result does not fit in a [Number].
    ///
    /// ```
    /// # use tfm::Number;
    /// let design_size = Number::UNITY * 10;
    /// assert_eq!(design_size.to_units(), 10000);
    /// assert_eq!(Number::from_units(10000), Some(design_size));
    /// ```
    pub fn from_units(units: i32) -> Option<Number> {
        let v = (units as i64) << 20;
        let rounded = if v >= 0 {
            (v + 500) / 1000
        } else {
            (v - 500) / 1000
        };
        i32::try_from(rounded).ok().map(Number)
    }

    /// Converts this number into scaled points, treating it as a multiple of the given size.
    ///
    /// Returns `None` if the number is not in the range `[-16, 16)`.
    pub fn scale(&self, size: Scaled) -> Option<Scaled> {
        Scaled::from_fix_word(self.0, size)
    }
}

impl std::ops::Add<Number> for Number {
    type Output = Number;
    fn add(self, rhs: Number) -> Self::Output {
        Number(self.0 + rhs.0)
    }
}

impl std::ops::Sub<Number> for Number {
    type Output = Number;
    fn sub(self, rhs: Number) -> Self::Output {
        Number(self.0 - rhs.0)
    }
}

impl std::ops::Mul<i32> for Number {
    type Output = Number;
    fn mul(self, rhs: i32) -> Self::Output {
        Number(self.0 * rhs)
    }
}

impl std::ops::Div<i32> for Number {
    type Output = Number;
    fn div(self, rhs: i32) -> Self::Output {
        Number(self.0 / rhs)
    }
}

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // TFtoPL.2014.40-43
        if self.0 < 0 {
            write!(f, "-")?;
        }
        let integer_part = (self.0 as i64).abs() / (Number::UNITY.0 as i64);
        write!(f, "{integer_part}.")?;
        let mut fp = (self.0 % Number::UNITY.0).abs();
        fp = 10 * fp + 5;
        let mut delta = 10;
        loop {
            if delta > 0o4_000_000 {
                fp = fp + 0o2_000_000 - delta / 2;
            }
            write!(f, "{}", fp / 0o4_000_000)?;
            fp = 10 * (fp % 0o4_000_000);
            delta *= 10;
            if fp <= delta {
                break;
            }
        }
        Ok(())
    }
}

/// Error returned when parsing a [Number] from a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseNumberError {
    /// The string is not a decimal number.
    Invalid,
    /// The number is 2048 or more in absolute value.
    TooLarge,
}

impl std::fmt::Display for ParseNumberError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseNumberError::Invalid => write!(f, "invalid decimal number"),
            ParseNumberError::TooLarge => write!(f, "real constants must be less than 2048"),
        }
    }
}

impl std::error::Error for ParseNumberError {}

impl std::str::FromStr for Number {
    type Err = ParseNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars().peekable();
        // PLtoTF.2014.63
        let mut negative = false;
        while let Some(c @ ('+' | '-')) = chars.peek().copied() {
            if c == '-' {
                negative = !negative;
            }
            chars.next();
        }
        let mut seen_digit = false;
        // PLtoTF.2014.64
        let mut integer_part = 0_i32;
        while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
            chars.next();
            seen_digit = true;
            integer_part = (integer_part * 10 + d as i32).min(2048);
        }
        // PLtoTF.2014.66
        let mut fractional_part = 0_i32;
        if chars.peek() == Some(&'.') {
            chars.next();
            let mut fractional_digits = [0_i32; 7];
            for slot in &mut fractional_digits {
                match chars.peek().and_then(|c| c.to_digit(10)) {
                    Some(d) => {
                        chars.next();
                        seen_digit = true;
                        *slot = 0o10000000 * d as i32;
                    }
                    None => break,
                }
            }
            while chars.next_if(|c| c.is_ascii_digit()).is_some() {}
            for digit in fractional_digits.iter().rev() {
                fractional_part = digit + fractional_part / 10;
            }
            fractional_part = (fractional_part + 10) / 20;
        }
        if !seen_digit || chars.next().is_some() {
            return Err(ParseNumberError::Invalid);
        }
        if integer_part >= 2048 || (fractional_part >= Number::UNITY.0 && integer_part == 2047) {
            return Err(ParseNumberError::TooLarge);
        }
        let modulus = integer_part * Number::UNITY.0 + fractional_part;
        Ok(Number(if negative { -modulus } else { modulus }))
    }
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FaceWeight {
    Light,
    Medium,
    Bold,
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FaceSlope {
    Roman,
    Italic,
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FaceExpansion {
    Regular,
    Condensed,
    Extended,
}

/// The face byte of the header.
///
/// Values below 18 encode a weight, slope and expansion (TFtoPL.2014.49);
///     other values are kept as-is.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Face {
    Valid(FaceWeight, FaceSlope, FaceExpansion),
    Other(u8),
}

impl From<u8> for Face {
    fn from(value: u8) -> Self {
        if value >= 18 {
            return Face::Other(value);
        }
        let weight = match (value % 6) / 2 {
            0 => FaceWeight::Medium,
            1 => FaceWeight::Bold,
            _ => FaceWeight::Light,
        };
        let slope = if value % 2 == 0 {
            FaceSlope::Roman
        } else {
            FaceSlope::Italic
        };
        let expansion = match value / 6 {
            0 => FaceExpansion::Regular,
            1 => FaceExpansion::Condensed,
            _ => FaceExpansion::Extended,
        };
        Face::Valid(weight, slope, expansion)
    }
}

/// TeX font metric parameters.
///
/// Parameters are numbered from 1, as in `\fontdimen`.
/// Parameter 1 is the slant, which is a pure number;
///     all other parameters are multiples of the design size.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Params(pub Vec<Number>);

impl Params {
    /// Returns the parameter with the given 1-based number.
    pub fn get(&self, number: usize) -> Option<Number> {
        number
            .checked_sub(1)
            .and_then(|i| self.0.get(i))
            .copied()
    }

    pub fn named(&self, param: NamedParam) -> Option<Number> {
        self.get(param.number())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A named TeX font metric parameter.
///
/// The first seven names apply to all fonts.
/// The remaining names only apply to math symbol fonts (`Num1` to `AxisHeight`)
///     or math extension fonts (`DefaultRuleThickness` to `BigOpSpacing5`),
///     which is why some numbers are shared.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub enum NamedParam {
    Slant,
    Space,
    Stretch,
    Shrink,
    XHeight,
    Quad,
    ExtraSpace,
    Num1,
    Num2,
    Num3,
    Denom1,
    Denom2,
    Sup1,
    Sup2,
    Sup3,
    Sub1,
    Sub2,
    SupDrop,
    SubDrop,
    Delim1,
    Delim2,
    AxisHeight,
    DefaultRuleThickness,
    BigOpSpacing1,
    BigOpSpacing2,
    BigOpSpacing3,
    BigOpSpacing4,
    BigOpSpacing5,
}

impl NamedParam {
    /// The 1-based parameter number.
    pub fn number(&self) -> usize {
        use NamedParam::*;
        match self {
            Slant => 1,
            Space => 2,
            Stretch => 3,
            Shrink => 4,
            XHeight => 5,
            Quad => 6,
            ExtraSpace => 7,
            Num1 | DefaultRuleThickness => 8,
            Num2 | BigOpSpacing1 => 9,
            Num3 | BigOpSpacing2 => 10,
            Denom1 | BigOpSpacing3 => 11,
            Denom2 | BigOpSpacing4 => 12,
            Sup1 | BigOpSpacing5 => 13,
            Sup2 => 14,
            Sup3 => 15,
            Sub1 => 16,
            Sub2 => 17,
            SupDrop => 18,
            SubDrop => 19,
            Delim1 => 20,
            Delim2 => 21,
            AxisHeight => 22,
        }
    }
}
