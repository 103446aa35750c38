//! Register families
//!
//! Each family of registers (`\count`, `\catcode`, macro definitions, ...) is
//!     represented by an uninhabited marker type implementing [`Register`].
//! The marker type names the key and value types of the family
//!     and the value a register has if it was never assigned.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::types::*;
use crate::CatCode;
use texcraft_core::{Glue, Scaled};

/// Scope of an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Scope {
    /// The assignment is reverted when the current group ends.
    Local,
    /// The assignment is made in every group and survives the end of all of them.
    Global,
}

impl From<bool> for Scope {
    /// Converts a `global` flag into a scope.
    fn from(global: bool) -> Self {
        if global {
            Scope::Global
        } else {
            Scope::Local
        }
    }
}

/// A family of registers.
pub trait Register: 'static {
    type Key: Clone + Eq + Hash + Debug + 'static;
    type Value: Clone + Debug + PartialEq + 'static;

    /// Name of the family, used in log messages.
    const NAME: &'static str;

    /// Value of a register that was never assigned.
    fn initial_value(key: &Self::Key) -> Self::Value;

    fn bindings(bindings: &Bindings) -> &HashMap<Self::Key, Self::Value>;

    fn bindings_mut(bindings: &mut Bindings) -> &mut HashMap<Self::Key, Self::Value>;
}

macro_rules! registers {
    ( $( $(#[$doc: meta])* ($register: ident, $field: ident, $key: ty, $value: ty, $name: expr, $initial: expr), )+ ) => {
        /// Register assignments made in one group.
        ///
        /// Maps are only allocated when the first assignment to the family is made.
        #[derive(Debug, Default, Clone)]
        pub struct Bindings {
            $( $field: HashMap<$key, $value>, )+
        }

        $(
            $(#[$doc])*
            #[derive(Debug)]
            pub enum $register {}

            impl Register for $register {
                type Key = $key;
                type Value = $value;
                const NAME: &'static str = $name;

                fn initial_value(key: &$key) -> $value {
                    let f: fn(&$key) -> $value = $initial;
                    f(key)
                }

                fn bindings(bindings: &Bindings) -> &HashMap<$key, $value> {
                    &bindings.$field
                }

                fn bindings_mut(bindings: &mut Bindings) -> &mut HashMap<$key, $value> {
                    &mut bindings.$field
                }
            }
        )+
    };
}

registers!(
    /// `\count` registers.
    (Count, counts, String, i32, "count", |_| 0),
    /// `\dimen` registers.
    (Dimen, dimens, String, Scaled, "dimen", |_| Scaled::ZERO),
    /// `\skip` registers.
    (Skip, skips, String, Glue, "skip", |_| Glue::default()),
    /// `\muskip` registers.
    (MuSkip, muskips, String, Glue, "muskip", |_| Glue::default()),
    /// `\toks` registers.
    (Toks, toks, String, TokenList, "toks", |_| vec![]),
    /// `\box` registers.
    (BoxRegister, boxes, String, BoxValue, "box", |_| None),
    /// Font identifiers bound to names.
    (FontRegister, fonts, String, FontId, "font", |_| NULL_FONT),
    /// `\catcode`
    (CatCodeRegister, catcodes, char, CatCode, "catcode", |c| CatCode::initial(*c)),
    /// `\mathcode`
    (MathCode, mathcodes, char, u32, "mathcode", |c| initial_mathcode(*c)),
    /// `\delcode`
    (DelCode, delcodes, char, i32, "delcode", |_| -1),
    /// `\sfcode`
    (SfCode, sfcodes, char, i32, "sfcode", |c| if c.is_alphabetic() { 999 } else { 1000 }),
    /// `\lccode`
    (LcCode, lccodes, char, char, "lccode", |c| initial_case_code(*c, char::to_lowercase)),
    /// `\uccode`
    (UcCode, uccodes, char, char, "uccode", |c| initial_case_code(*c, char::to_uppercase)),
    /// Boolean flags, as created by `\newif`.
    (IfFlag, if_flags, String, bool, "if", |_| false),
    /// Macros bound to control sequence names.
    (Macro, macros, String, Binding, "macro", |_| None),
    /// Active character bindings.
    (Active, active_chars, char, Binding, "active", |_| None),
    /// Input file streams.
    (InFile, in_files, String, FileValue, "read", |_| None),
    /// Output file streams.
    (OutFile, out_files, String, FileValue, "write", |_| None),
    /// The interaction mode.
    (InteractionMode, interaction, (), Interaction, "interaction", |_| Interaction::ErrorStop),
    /// The namespace new control sequences are defined in.
    (Namespace, namespace, (), String, "namespace", |_| String::new()),
    /// The current font and language.
    (Typesetting, typesetting_context, (), TypesettingContext, "typesetting context", |_| {
        TypesettingContext::default()
    }),
);

/// TeX.2021.232
fn initial_mathcode(c: char) -> u32 {
    if c.is_ascii_digit() {
        c as u32 + 0x7000
    } else if c.is_alphabetic() {
        c as u32 + 0x7100
    } else {
        c as u32
    }
}

fn initial_case_code<I: Iterator<Item = char>>(c: char, map: fn(char) -> I) -> char {
    if !c.is_alphabetic() {
        return '\0';
    }
    let mut mapped = map(c);
    match (mapped.next(), mapped.next()) {
        (Some(m), None) => m,
        // no single-character mapping
        _ => c,
    }
}
