//! Core numeric types shared by the font and context crates.
//!
//! Everything here is measured in TeX's scaled points.

/// Scaled numbers.
///
/// This is a fixed-width numeric type used in throughout TeX.
/// This type is defined and described in part 7 "arithmetic with scaled
/// dimensions" starting at TeX.2021.99.
///
/// This numeric type has 15 bits for the integer part,
/// 16 bits for the fractional part, and a single signed bit.
/// The inner value is the number multiplied by 2^16.
#[derive(Default, PartialEq, Eq, Debug, Copy, Clone, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scaled(pub i32);

impl Scaled {
    /// Representation of the number 0 as a [Scaled].
    pub const ZERO: Scaled = Scaled(0);

    /// Representation of the number 1 as a [Scaled].
    pub const ONE: Scaled = Scaled(1 << 16);

    /// Maximum possible dimension in TeX, which is (2^30-1)/2^16.
    ///
    /// Defined in TeX.2021.421.
    pub const MAX_DIMEN: Scaled = Scaled((1 << 30) - 1);

    /// Create a scaled number corresponding the provided integer.
    ///
    /// Scaled numbers are in the range `(-2^14, 2^14)`.
    /// If _i_ is outside this range an overflow error is returned.
    pub fn from_integer(i: i32) -> Result<Scaled, OverflowError> {
        if i >= (1 << 14) || i <= -(1 << 14) {
            Err(OverflowError {})
        } else {
            Ok(Scaled(Scaled::ONE.0 * i))
        }
    }

    /// Converts a TFM fix word into scaled points at the given font size.
    ///
    /// The fix word is the raw 32-bit value, i.e. the number multiplied by 2^20.
    /// This is the exact multiplication of TeX.2021.571-572, which avoids
    ///     overflow by splitting the fix word into bytes.
    /// Only fix words in the range `[-16, 16)` can be converted;
    ///     for other values `None` is returned.
    ///
    /// ```
    /// # use texcraft_core::Scaled;
    /// let ten_pt = Scaled::from_integer(10).unwrap();
    /// let half = 1 << 19;
    /// assert_eq!(Scaled::from_fix_word(half, ten_pt), Some(Scaled::from_integer(5).unwrap()));
    /// ```
    pub fn from_fix_word(fix_word: i32, size: Scaled) -> Option<Scaled> {
        let mut z = size.0;
        let mut alpha = 16;
        while z >= 0o40000000 {
            z /= 2;
            alpha += alpha;
        }
        let beta = 256 / alpha;
        let alpha = alpha * z;
        let [a, b, c, d] = fix_word.to_be_bytes();
        let (b, c, d) = (b as i32, c as i32, d as i32);
        let sw = (((d * z) / 256 + c * z) / 256 + b * z) / beta;
        match a {
            0 => Some(Scaled(sw)),
            255 => Some(Scaled(sw - alpha)),
            _ => None,
        }
    }

    /// Calculates the integer division _xn_/_d_ and remainder, where _x_ is this scaled number
    /// and _n_ and _d_ are integers in the range `[0,2^16]`.
    ///
    /// This function appears in TeX.2021.107.
    /// Knuth works with 32-bit integers and needs a special algorithm to avoid overflow;
    ///     we simply use 64-bit integers.
    pub fn xn_over_d(&self, n: i32, d: i32) -> Result<(Scaled, Scaled), OverflowError> {
        debug_assert!(n <= 0o200000);
        debug_assert!(d <= 0o200000);
        let mut b: i64 = self.0.into();
        b *= n as i64;
        let remainder = (b % (d as i64)) as i32;
        b /= d as i64;
        if b < -(Scaled::MAX_DIMEN.0 as i64) || b > Scaled::MAX_DIMEN.0 as i64 {
            return Err(OverflowError {});
        }
        Ok((Scaled(b as i32), Scaled(remainder)))
    }

    pub fn integer_part(self) -> i32 {
        self.0 / Scaled::ONE.0
    }

    pub fn fractional_part(self) -> Scaled {
        self % Scaled::ONE.0
    }

    pub fn abs(self) -> Scaled {
        Scaled(self.0.abs())
    }
}

/// Error returned when a scaled computation leaves the range of valid dimensions.
#[derive(Debug, PartialEq, Eq)]
pub struct OverflowError;

impl std::fmt::Display for OverflowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "arithmetic overflow")
    }
}

impl std::error::Error for OverflowError {}

impl std::fmt::Display for Scaled {
    // TeX.2021.103
    fn fmt(&self, fm: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0 < 0 {
            write!(fm, "-")?;
        }
        let s = self.abs();
        write!(fm, "{}.", s.integer_part())?;
        let mut f = s.fractional_part().0 * 10 + 5;
        let mut delta = 10;
        loop {
            if delta > Scaled::ONE.0 {
                // round the last digit
                f += 0o100000 - 50000;
            }
            write!(fm, "{}", f / Scaled::ONE.0)?;
            f = (f % Scaled::ONE.0) * 10;
            delta *= 10;
            if f <= delta {
                break;
            }
        }
        write!(fm, "pt")
    }
}

impl std::ops::Add<Scaled> for Scaled {
    type Output = Scaled;
    fn add(self, rhs: Scaled) -> Self::Output {
        Scaled(self.0 + rhs.0)
    }
}

impl std::ops::Sub<Scaled> for Scaled {
    type Output = Scaled;
    fn sub(self, rhs: Scaled) -> Self::Output {
        Scaled(self.0 - rhs.0)
    }
}

impl std::ops::Mul<i32> for Scaled {
    type Output = Scaled;
    fn mul(self, rhs: i32) -> Self::Output {
        Scaled(self.0 * rhs)
    }
}

impl std::ops::Div<i32> for Scaled {
    type Output = Scaled;
    fn div(self, rhs: i32) -> Self::Output {
        Scaled(self.0 / rhs)
    }
}

impl std::ops::Rem<i32> for Scaled {
    type Output = Scaled;
    fn rem(self, rhs: i32) -> Self::Output {
        Scaled(self.0 % rhs)
    }
}

impl std::ops::Neg for Scaled {
    type Output = Scaled;
    fn neg(self) -> Self::Output {
        Scaled(-self.0)
    }
}

/// Glue.
///
/// Glue registers (`\skip` and `\muskip`) and the inter-word space of fonts
///     are both values of this type.
/// For `\muskip` the components are in math units rather than points.
///
/// Described in TeX.2021.150.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Glue {
    pub width: Scaled,
    pub stretch: Scaled,
    pub stretch_order: GlueOrder,
    pub shrink: Scaled,
    pub shrink_order: GlueOrder,
}

impl Glue {
    /// Glue with the given width and finite stretch and shrink.
    pub fn new(width: Scaled, stretch: Scaled, shrink: Scaled) -> Glue {
        Glue {
            width,
            stretch,
            stretch_order: GlueOrder::Normal,
            shrink,
            shrink_order: GlueOrder::Normal,
        }
    }
}

impl std::fmt::Display for Glue {
    // TeX.2021.178
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.width)?;
        if self.stretch != Scaled::ZERO {
            write!(f, " plus ")?;
            write_glue_component(f, self.stretch, self.stretch_order)?;
        }
        if self.shrink != Scaled::ZERO {
            write!(f, " minus ")?;
            write_glue_component(f, self.shrink, self.shrink_order)?;
        }
        Ok(())
    }
}

fn write_glue_component(
    f: &mut std::fmt::Formatter<'_>,
    s: Scaled,
    order: GlueOrder,
) -> std::fmt::Result {
    match order {
        GlueOrder::Normal => write!(f, "{s}"),
        _ => {
            let s = format!["{s}"];
            write!(f, "{}{}", s.trim_end_matches("pt"), order.keyword())
        }
    }
}

/// Order of infinity of a glue stretch or shrink.
///
/// If a list contains glue of some order (e.g. [GlueOrder::Fil]),
/// then glues of a lower order (e.g. [GlueOrder::Normal]) are not stretched
/// or shrunk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GlueOrder {
    #[default]
    Normal,
    Fil,
    Fill,
    Filll,
}

impl GlueOrder {
    /// Parses an infinite glue order from a keyword.
    pub fn parse(s: &str) -> Option<Self> {
        use GlueOrder::*;
        Some(match s {
            "fil" => Fil,
            "fill" => Fill,
            "filll" => Filll,
            _ => return None,
        })
    }

    fn keyword(&self) -> &'static str {
        match self {
            GlueOrder::Normal => "pt",
            GlueOrder::Fil => "fil",
            GlueOrder::Fill => "fill",
            GlueOrder::Filll => "filll",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_sizes() {
        assert_eq!(16, std::mem::size_of::<Glue>());
    }

    macro_rules! display_tests {
        ( $( ($name: ident, $input: expr, $want: expr), )+ ) => {
            $(
                #[test]
                fn $name() {
                    let got = format!["{}", $input];
                    assert_eq!(got, $want);
                }
            )+
        };
    }

    display_tests!(
        (display_zero, Scaled::ZERO, "0.0pt"),
        (display_one, Scaled::ONE, "1.0pt"),
        (display_half, Scaled(1 << 15), "0.5pt"),
        (display_negative, Scaled(-(3 << 15)), "-1.5pt"),
        (
            display_glue_finite,
            Glue::new(Scaled::ONE, Scaled(1 << 15), Scaled::ZERO),
            "1.0pt plus 0.5pt"
        ),
        (
            display_glue_infinite,
            Glue {
                width: Scaled::ZERO,
                stretch: Scaled::ONE,
                stretch_order: GlueOrder::Fil,
                shrink: Scaled::ONE * 2,
                shrink_order: GlueOrder::Filll,
            },
            "0.0pt plus 1.0fil minus 2.0filll"
        ),
    );

    macro_rules! from_fix_word_tests {
        ( $( ($name: ident, $fix_word: expr, $size: expr, $want: expr), )+ ) => {
            $(
                #[test]
                fn $name() {
                    assert_eq!(Scaled::from_fix_word($fix_word, $size), $want);
                }
            )+
        };
    }

    from_fix_word_tests!(
        (fix_word_zero, 0, Scaled::ONE * 10, Some(Scaled::ZERO)),
        (fix_word_one, 1 << 20, Scaled::ONE * 10, Some(Scaled::ONE * 10)),
        (fix_word_minus_one, -(1 << 20), Scaled::ONE * 10, Some(Scaled::ONE * -10)),
        (fix_word_quarter, 1 << 18, Scaled::ONE * 12, Some(Scaled::ONE * 3)),
        (fix_word_large_size, 1 << 19, Scaled::ONE * 1000, Some(Scaled::ONE * 500)),
        (fix_word_out_of_range, 16 << 20, Scaled::ONE, None),
    );

    #[test]
    fn xn_over_d() {
        let (q, r) = Scaled(7).xn_over_d(3, 2).unwrap();
        assert_eq!(q, Scaled(10));
        assert_eq!(r, Scaled(1));
        assert_eq!(Scaled::MAX_DIMEN.xn_over_d(2, 1), Err(OverflowError));
    }
}
