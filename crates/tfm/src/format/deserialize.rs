use super::*;
use crate::error::HeaderString;

/// Deserialize a TeX font metric (.tfm) file.
pub(crate) fn deserialize(b: &[u8], warnings: &mut Warnings) -> Result<File, Error> {
    let actual_file_length = b.len();
    match actual_file_length {
        0 => return Err(Error::FileIsEmpty),
        1 => return Err(Error::FileHasOneByte(b[0])),
        _ => (),
    };
    let lf = i16::deserialize(b);
    match lf {
        ..=-1 => return Err(Error::InternalFileLengthIsNegative(lf)),
        0 => return Err(Error::InternalFileLengthIsZero),
        1.. => {
            let claimed_file_length = (lf as usize) * 4;
            match actual_file_length.cmp(&claimed_file_length) {
                std::cmp::Ordering::Less => {
                    return Err(Error::InternalFileLengthIsTooBig(lf, actual_file_length))
                }
                std::cmp::Ordering::Equal => (),
                std::cmp::Ordering::Greater => {
                    warnings.push(Warning::InternalFileLengthIsSmall(lf, actual_file_length))
                }
            }
            if lf < 6 {
                return Err(Error::InternalFileLengthIsTooSmall(lf, actual_file_length));
            }
        }
    }
    let sub_file_sizes = SubFileSizes::deserialize(&b[2..24]);
    sub_file_sizes.validate(lf)?;
    log::debug!("sub-file sizes: {sub_file_sizes:?}");
    #[rustfmt::skip]
    let [
        raw_header,
        raw_char_infos,
        raw_widths,
        raw_heights,
        raw_depths,
        raw_italic_corrections,
        raw_lig_kern,
        raw_kerns,
        raw_extensible_recipes,
        raw_params,
    ] = sub_file_sizes.partition(&b[24..]);

    Ok(File {
        header: deserialize_header(raw_header, warnings),
        smallest_char: if sub_file_sizes.bc <= sub_file_sizes.ec {
            // validation guarantees 0 <= bc <= ec <= 255
            Char(sub_file_sizes.bc as u8)
        } else {
            Char(0)
        },
        char_infos: Deserializable::deserialize(raw_char_infos),
        widths: Deserializable::deserialize(raw_widths),
        heights: Deserializable::deserialize(raw_heights),
        depths: Deserializable::deserialize(raw_depths),
        italic_corrections: Deserializable::deserialize(raw_italic_corrections),
        lig_kern_instructions: Deserializable::deserialize(raw_lig_kern),
        kerns: Deserializable::deserialize(raw_kerns),
        extensible_recipes: Deserializable::deserialize(raw_extensible_recipes),
        params: Params(Deserializable::deserialize(raw_params)),
    })
}

trait Deserializable: Sized {
    fn deserialize(b: &[u8]) -> Self;
}

/// Implementations of this trait consume a fixed number of bytes when deserializing.
trait DeserializableFixed: Deserializable {
    const NUM_BYTES: usize;
}

impl Deserializable for i16 {
    #[inline]
    fn deserialize(b: &[u8]) -> Self {
        i16::from_be_bytes([b[0], b[1]])
    }
}

impl Deserializable for u32 {
    #[inline]
    fn deserialize(b: &[u8]) -> Self {
        u32::from_be_bytes([b[0], b[1], b[2], b[3]])
    }
}

impl DeserializableFixed for u32 {
    const NUM_BYTES: usize = 4;
}

impl Deserializable for Number {
    #[inline]
    fn deserialize(b: &[u8]) -> Self {
        Number(u32::deserialize(b) as i32)
    }
}

impl DeserializableFixed for Number {
    const NUM_BYTES: usize = 4;
}

impl Deserializable for SubFileSizes {
    fn deserialize(b: &[u8]) -> Self {
        Self {
            lh: i16::deserialize(&b[0..2]),
            bc: i16::deserialize(&b[2..4]),
            ec: i16::deserialize(&b[4..6]),
            nw: i16::deserialize(&b[6..8]),
            nh: i16::deserialize(&b[8..10]),
            nd: i16::deserialize(&b[10..12]),
            ni: i16::deserialize(&b[12..14]),
            nl: i16::deserialize(&b[14..16]),
            nk: i16::deserialize(&b[16..18]),
            ne: i16::deserialize(&b[18..20]),
            np: i16::deserialize(&b[20..22]),
        }
    }
}

impl SubFileSizes {
    fn validate(&self, lf: i16) -> Result<(), Error> {
        if self.lh < 0
            || self.bc < 0
            || self.ec < 0
            || self.nw < 0
            || self.nh < 0
            || self.nd < 0
            || self.ni < 0
            || self.nl < 0
            || self.nk < 0
            || self.ne < 0
            || self.np < 0
        {
            return Err(Error::SubFileSizeIsNegative(self.clone()));
        }
        if self.lh < 2 {
            return Err(Error::HeaderLengthIsTooSmall(self.lh));
        }
        if self.ec > 255 || self.bc > self.ec + 1 {
            return Err(Error::InvalidCharacterRange(self.bc, self.ec));
        }
        if self.nw == 0 || self.nh == 0 || self.nd == 0 || self.ni == 0 {
            return Err(Error::IncompleteSubFiles(self.clone()));
        }
        if self.ne > 255 {
            return Err(Error::TooManyExtensibleCharacters(self.ne));
        }
        // All sizes are non-negative i16s, so the sum fits in an i32.
        let total: i32 = [
            6,
            self.lh,
            self.ec - self.bc + 1,
            self.nw,
            self.nh,
            self.nd,
            self.ni,
            self.nl,
            self.nk,
            self.ne,
            self.np,
        ]
        .iter()
        .map(|&n| n as i32)
        .sum();
        if lf as i32 != total {
            return Err(Error::InconsistentSubFileSizes(lf, self.clone()));
        }
        Ok(())
    }

    fn partition<'a>(&self, mut b: &'a [u8]) -> [&'a [u8]; 10] {
        let lens = [
            self.lh,
            self.ec - self.bc + 1,
            self.nw,
            self.nh,
            self.nd,
            self.ni,
            self.nl,
            self.nk,
            self.ne,
            self.np,
        ];
        let mut r: [&[u8]; 10] = [&[0_u8; 0]; 10];
        for (slot, len) in r.iter_mut().zip(lens) {
            let len = (len as usize) * 4;
            *slot = &b[..len];
            b = &b[len..];
        }
        r
    }
}

const CODING_SCHEME_LEN: usize = 40;
const FONT_FAMILY_LEN: usize = 20;

fn deserialize_header(b: &[u8], warnings: &mut Warnings) -> Header {
    let mut header = Header {
        checksum: u32::deserialize(b),
        design_size: Number::deserialize(&b[4..]),
        ..Default::default()
    };
    let mut b = &b[8..];
    if b.len() >= CODING_SCHEME_LEN {
        header.character_coding_scheme = Some(deserialize_string(
            &b[..CODING_SCHEME_LEN],
            HeaderString::CharacterCodingScheme,
            warnings,
        ));
        b = &b[CODING_SCHEME_LEN..];
    }
    if b.len() >= FONT_FAMILY_LEN {
        header.font_family = Some(deserialize_string(
            &b[..FONT_FAMILY_LEN],
            HeaderString::FontFamily,
            warnings,
        ));
        b = &b[FONT_FAMILY_LEN..];
    }
    if b.len() >= 4 {
        header.seven_bit_safe = Some(b[0] > 127);
        header.face = Some(b[3].into());
        b = &b[4..];
    }
    header.additional_data = Deserializable::deserialize(b);
    header
}

/// Decodes a BCPL string: a length byte followed by the characters.
///
/// The result is upper-cased.
/// TFtoPL.2014.47-48
fn deserialize_string(b: &[u8], field: HeaderString, warnings: &mut Warnings) -> String {
    let max_len = (b.len() - 1) as u8;
    let mut len = b[0];
    if len > max_len {
        warnings.push(Warning::StringIsTooLong {
            field,
            len,
            max_len,
        });
        len = max_len;
    }
    b[1..=(len as usize)]
        .iter()
        .map(|&byte| match byte {
            b'(' | b')' => {
                warnings.push(Warning::ParenthesisInString { field });
                '/'
            }
            b' '..=b'~' => (byte as char).to_ascii_uppercase(),
            _ => {
                warnings.push(Warning::NonPrintableCharacterInString { field, byte });
                '?'
            }
        })
        .collect()
}

impl<T: DeserializableFixed> Deserializable for Vec<T> {
    fn deserialize(mut b: &[u8]) -> Self {
        let mut r: Self = Vec::with_capacity(b.len() / T::NUM_BYTES);
        while b.len() >= T::NUM_BYTES {
            r.push(T::deserialize(b));
            b = &b[T::NUM_BYTES..]
        }
        r
    }
}

impl Deserializable for CharInfo {
    fn deserialize(b: &[u8]) -> Self {
        CharInfo {
            width_index: b[0],
            height_index: b[1] / (1 << 4),
            depth_index: b[1] % (1 << 4),
            italic_index: b[2] / (1 << 2),
            tag: match b[2] % (1 << 2) {
                0 => CharTag::None,
                1 => CharTag::Ligature(b[3]),
                2 => CharTag::List(Char(b[3])),
                _ => CharTag::Extension(b[3]),
            },
        }
    }
}

impl DeserializableFixed for CharInfo {
    const NUM_BYTES: usize = 4;
}

impl Deserializable for LigKernInstruction {
    fn deserialize(b: &[u8]) -> Self {
        LigKernInstruction::new([b[0], b[1], b[2], b[3]])
    }
}

impl DeserializableFixed for LigKernInstruction {
    const NUM_BYTES: usize = 4;
}

impl Deserializable for ExtensibleRecipe {
    fn deserialize(b: &[u8]) -> Self {
        let char_or = |b: u8| {
            if b == 0 {
                None
            } else {
                Some(Char(b))
            }
        };
        ExtensibleRecipe {
            top: char_or(b[0]),
            middle: char_or(b[1]),
            bottom: char_or(b[2]),
            rep: Char(b[3]),
        }
    }
}

impl DeserializableFixed for ExtensibleRecipe {
    const NUM_BYTES: usize = 4;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(b: &[u8]) -> Result<(File, Vec<Warning>), Error> {
        File::deserialize(b)
    }

    macro_rules! deserialize_error_tests {
        ( $( ($name: ident, $input: expr, $want: expr), )+ ) => {
            $(
                #[test]
                fn $name() {
                    let input = $input;
                    let want = $want;
                    let got = run(&input);
                    assert_eq!(got, Err(want));
                }
            )+
        };
    }

    macro_rules! deserialize_tests {
        ( $( ($name: ident, $bytes: expr, $file: expr, $warnings: expr $(,)? ), )+ ) => {
            $(
                #[test]
                fn $name() {
                    let input = $bytes;
                    let want = $file;
                    let got = run(&input);
                    similar_asserts::assert_eq!(got, Ok((want, $warnings)));
                }
            )+
        };
    }

    deserialize_error_tests!(
        (empty_file, [], Error::FileIsEmpty),
        (single_byte_1, [2], Error::FileHasOneByte(2)),
        (single_byte_2, [255], Error::FileHasOneByte(255)),
        (
            internal_file_length_is_negative,
            [255, 0],
            Error::InternalFileLengthIsNegative(-256)
        ),
        (
            internal_file_length_is_zero,
            [0, 0, 1, 1],
            Error::InternalFileLengthIsZero
        ),
        (
            internal_file_length_is_too_big,
            [0, 2, 1, 1],
            Error::InternalFileLengthIsTooBig(2, 4)
        ),
        (
            internal_file_length_is_too_small,
            extend(&[0, 2, 255, 0], 24),
            Error::InternalFileLengthIsTooSmall(2, 24)
        ),
        (
            internal_file_length_cannot_hold_sub_file_sizes,
            extend(&[0, 5, 0, 0], 20),
            Error::InternalFileLengthIsTooSmall(5, 20)
        ),
        (
            sub_file_size_negative,
            extend(&[0, 6, 255, 0], 24),
            Error::SubFileSizeIsNegative(SubFileSizes {
                lh: -256,
                ..Default::default()
            })
        ),
        (
            header_length_too_small_0,
            extend(&[0, 6, 0, 0], 24),
            Error::HeaderLengthIsTooSmall(0)
        ),
        (
            header_length_too_small_1,
            extend(&[0, 6, 0, 1], 24),
            Error::HeaderLengthIsTooSmall(1)
        ),
        (
            invalid_character_range_1,
            extend(&[0, 6, 0, 2, 0, 2, 0, 0], 24),
            Error::InvalidCharacterRange(2, 0)
        ),
        (
            invalid_character_range_2,
            extend(&[0, 6, 0, 2, 0, 2, 1, 0], 24),
            Error::InvalidCharacterRange(2, 256)
        ),
        (
            incomplete_sub_files,
            extend(
                &[
                    /* lf */ 0, 6, /* lh */ 0, 2, /* bc */ 0, 1, /* ec */ 0, 2,
                    /* nw */ 0, 3, /* nh */ 0, 4, /* nd */ 0, 5, /* ni */ 0, 0,
                ],
                24
            ),
            Error::IncompleteSubFiles(SubFileSizes {
                lh: 2,
                bc: 1,
                ec: 2,
                nw: 3,
                nh: 4,
                nd: 5,
                ..Default::default()
            })
        ),
        (
            too_many_extensible_characters,
            extend(
                &[
                    /* lf */ 0, 6, /* lh */ 0, 2, /* bc */ 0, 1, /* ec */ 0, 2,
                    /* nw */ 0, 3, /* nh */ 0, 4, /* nd */ 0, 5, /* ni */ 0, 6,
                    /* nl */ 0, 0, /* nk */ 0, 0, /* ne */ 1, 1, /* np */ 0, 0,
                ],
                24
            ),
            Error::TooManyExtensibleCharacters(257)
        ),
        (
            inconsistent_sub_file_sizes,
            extend(
                &[
                    /* lf */ 0, 6, /* lh */ 0, 2, /* bc */ 0, 3, /* ec */ 0, 4,
                    /* nw */ 0, 5, /* nh */ 0, 6, /* nd */ 0, 7, /* ni */ 0, 8,
                    /* nl */ 0, 9, /* nk */ 0, 10, /* ne */ 0, 11, /* np */ 0,
                    12,
                ],
                24
            ),
            Error::InconsistentSubFileSizes(
                6,
                SubFileSizes {
                    lh: 2,
                    bc: 3,
                    ec: 4,
                    nw: 5,
                    nh: 6,
                    nd: 7,
                    ni: 8,
                    nl: 9,
                    nk: 10,
                    ne: 11,
                    np: 12,
                }
            )
        ),
        (
            sub_file_sizes_overflow_i16_sum,
            extend(
                &[
                    /* lf */ 0, 6, /* lh */ 0, 2, /* bc */ 0, 1, /* ec */ 0, 0,
                    /* nw */ 0x7f, 0xff, /* nh */ 0x7f, 0xff, /* nd */ 0, 1, /* ni */ 0, 1,
                ],
                24
            ),
            Error::InconsistentSubFileSizes(
                6,
                SubFileSizes {
                    lh: 2,
                    bc: 1,
                    ec: 0,
                    nw: i16::MAX,
                    nh: i16::MAX,
                    nd: 1,
                    ni: 1,
                    ..Default::default()
                }
            )
        ),
    );

    deserialize_tests!(
        (
            minimal_header,
            build_from_header(&[/* checksum */ 0, 0, 0, 7, /* design_size */ 0, 0, 0, 11,]),
            File {
                header: Header {
                    checksum: 7,
                    design_size: Number(11),
                    ..Default::default()
                },
                ..Default::default()
            },
            vec![],
        ),
        (
            full_header,
            build_from_header(&[
                /* checksum */ 0, 0, 0, 7, /* design_size */ 0, 0, 0, 11,
                /* character_coding_scheme */ 3, 65, 98, 67, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
                0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
                /* font_family */ 3, 68, 69, 70, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
                0, /* seven_bit_safe */ 128, 0, 0, /* face */ 9,
                /* additional_data */ 0, 0, 0, 13,
            ]),
            File {
                header: Header {
                    checksum: 7,
                    design_size: Number(11),
                    character_coding_scheme: Some("ABC".into()),
                    font_family: Some("DEF".into()),
                    seven_bit_safe: Some(true),
                    face: Some(Face::Valid(
                        FaceWeight::Bold,
                        FaceSlope::Italic,
                        FaceExpansion::Condensed
                    )),
                    additional_data: vec![13],
                },
                ..Default::default()
            },
            vec![],
        ),
        (
            string_too_long,
            build_from_header(&[
                /* checksum */ 0, 0, 0, 7, /* design_size */ 0, 0, 0, 11,
                /* character_coding_scheme */ 240, 65, 65, 65, 65, 65, 65, 65, 65, 65, 65, 65,
                65, 65, 65, 65, 65, 65, 65, 65, 65, 65, 65, 65, 65, 65, 65, 65, 65, 65, 65, 65, 65,
                65, 65, 65, 65, 65, 65, 65,
            ]),
            File {
                header: Header {
                    checksum: 7,
                    design_size: Number(11),
                    character_coding_scheme: Some("A".repeat(39)),
                    ..Default::default()
                },
                ..Default::default()
            },
            vec![Warning::StringIsTooLong {
                field: HeaderString::CharacterCodingScheme,
                len: 240,
                max_len: 39,
            }],
        ),
        (
            string_with_bad_characters,
            {
                let mut header = vec![/* checksum */ 0, 0, 0, 7, /* design_size */ 0, 0, 0, 11];
                header.extend([4, b'(', b'a', 7, b')']);
                header.resize(8 + 40, 0);
                build_from_header(&header)
            },
            File {
                header: Header {
                    checksum: 7,
                    design_size: Number(11),
                    character_coding_scheme: Some("/A?/".into()),
                    ..Default::default()
                },
                ..Default::default()
            },
            vec![
                Warning::ParenthesisInString {
                    field: HeaderString::CharacterCodingScheme
                },
                Warning::NonPrintableCharacterInString {
                    field: HeaderString::CharacterCodingScheme,
                    byte: 7
                },
                Warning::ParenthesisInString {
                    field: HeaderString::CharacterCodingScheme
                },
            ],
        ),
        (
            char_infos,
            extend(
                &[
                    /* lf */ 0, 14, /* lh */ 0, 2, /* bc */ 0, 70, /* ec */ 0,
                    71, /* nw */ 0, 1, /* nh */ 0, 1, /* nd */ 0, 1,
                    /* ni */ 0, 1, /* nl */ 0, 0, /* nk */ 0, 0, /* ne */ 0, 0,
                    /* np */ 0, 0, /* header.checksum */ 0, 0, 0, 0,
                    /* header.design_size */ 0, 0, 0, 0, /* char_infos */ 13, 35, 16, 0,
                    1, 0, 1, 23,
                ],
                14 * 4
            ),
            File {
                header: Header {
                    design_size: Number::ZERO,
                    ..Default::default()
                },
                smallest_char: Char(70),
                char_infos: vec![
                    CharInfo {
                        width_index: 13,
                        height_index: 2,
                        depth_index: 3,
                        italic_index: 4,
                        tag: CharTag::None,
                    },
                    CharInfo {
                        width_index: 1,
                        height_index: 0,
                        depth_index: 0,
                        italic_index: 0,
                        tag: CharTag::Ligature(23),
                    },
                ],
                ..Default::default()
            },
            vec![],
        ),
        (
            widths_heights_depths_italic_corrections_kerns,
            vec![
                /* lf */ 0, 17, /* lh */ 0, 2, /* bc */ 0, 1, /* ec */ 0, 0,
                /* nw */ 0, 2, /* nh */ 0, 2, /* nd */ 0, 2, /* ni */ 0, 2,
                /* nl */ 0, 0, /* nk */ 0, 1, /* ne */ 0, 0, /* np */ 0, 0,
                /* header.checksum */ 0, 0, 0, 0, /* header.design_size */ 0, 160, 0, 0,
                /* widths */ 0, 0, 0, 0, 0, 0, 0, 23, /* heights */ 0, 0, 0, 0, 0, 0, 0,
                29, /* depths */ 0, 0, 0, 0, 0, 0, 0, 31, /* italic_corrections */ 0, 0,
                0, 0, 0, 0, 0, 37, /* kerns */ 0, 0, 0, 37
            ],
            File {
                widths: vec![Number::ZERO, Number(23)],
                heights: vec![Number::ZERO, Number(29)],
                depths: vec![Number::ZERO, Number(31)],
                italic_corrections: vec![Number::ZERO, Number(37)],
                kerns: vec![Number(37)],
                ..Default::default()
            },
            vec![],
        ),
        (
            lig_kern_instruction,
            tfm_file_with_one_lig_kern_instruction([3, 5, 130, 13]),
            File {
                lig_kern_instructions: vec![LigKernInstruction {
                    skip: 3,
                    next_char: Char(5),
                    op: 130,
                    remainder: 13,
                }],
                ..Default::default()
            },
            vec![],
        ),
        (
            extensible_recipes,
            vec![
                /* lf */ 0, 13, /* lh */ 0, 2, /* bc */ 0, 1, /* ec */ 0, 0,
                /* nw */ 0, 1, /* nh */ 0, 1, /* nd */ 0, 1, /* ni */ 0, 1,
                /* nl */ 0, 0, /* nk */ 0, 0, /* ne */ 0, 1, /* np */ 0, 0,
                /* header.checksum */ 0, 0, 0, 0, /* header.design_size */ 0, 160, 0, 0,
                /* widths */ 0, 0, 0, 0, /* heights */ 0, 0, 0, 0, /* depths */ 0,
                0, 0, 0, /* italic_corrections */ 0, 0, 0, 0,
                /* extensible_recipes */ 17, 0, 23, 27
            ],
            File {
                extensible_recipes: vec![ExtensibleRecipe {
                    top: Some(Char(17)),
                    middle: None,
                    bottom: Some(Char(23)),
                    rep: Char(27),
                }],
                ..Default::default()
            },
            vec![],
        ),
        (
            params,
            vec![
                /* lf */ 0, 15, /* lh */ 0, 2, /* bc */ 0, 1, /* ec */ 0, 0,
                /* nw */ 0, 1, /* nh */ 0, 1, /* nd */ 0, 1, /* ni */ 0, 1,
                /* nl */ 0, 0, /* nk */ 0, 0, /* ne */ 0, 0, /* np */ 0, 3,
                /* header.checksum */ 0, 0, 0, 0, /* header.design_size */ 0, 160, 0, 0,
                /* widths */ 0, 0, 0, 0, /* heights */ 0, 0, 0, 0, /* depths */ 0,
                0, 0, 0, /* italic_corrections */ 0, 0, 0, 0,
                /* params */ 0, 0, 0, 11, 0, 0, 0, 13, 0, 0, 0, 17,
            ],
            File {
                params: Params(vec![Number(11), Number(13), Number(17)]),
                ..Default::default()
            },
            vec![],
        ),
        (
            extra_junk_at_end,
            {
                let mut b = build_from_header(&[0, 0, 0, 7, 0, 0, 0, 11]);
                b.extend([1, 2, 3, 4]);
                b
            },
            File {
                header: Header {
                    checksum: 7,
                    design_size: Number(11),
                    ..Default::default()
                },
                ..Default::default()
            },
            vec![Warning::InternalFileLengthIsSmall(12, 52)],
        ),
    );

    fn extend(input: &[u8], size: usize) -> Vec<u8> {
        let mut v: Vec<u8> = input.into();
        v.resize(size.max(input.len()), 0);
        v
    }

    fn tfm_file_with_one_lig_kern_instruction(instruction: [u8; 4]) -> Vec<u8> {
        let mut v = vec![
            /* lf */ 0, 13, /* lh */ 0, 2, /* bc */ 0, 1, /* ec */ 0, 0,
            /* nw */ 0, 1, /* nh */ 0, 1, /* nd */ 0, 1, /* ni */ 0, 1,
            /* nl */ 0, 1, /* nk */ 0, 0, /* ne */ 0, 0, /* np */ 0, 0,
            /* header.checksum */ 0, 0, 0, 0, /* header.design_size */ 0, 160, 0, 0,
            /* widths */ 0, 0, 0, 0, /* heights */ 0, 0, 0, 0, /* depths */ 0, 0, 0,
            0, /* italic_corrections */ 0, 0, 0, 0,
        ];
        v.extend(instruction);
        v
    }

    fn build_from_header(header: &[u8]) -> Vec<u8> {
        assert_eq!(header.len() % 4, 0);
        let num_words: i16 = (header.len() / 4).try_into().unwrap();
        let lf: u8 = (6 + num_words + 4).try_into().unwrap();
        let lh: u8 = num_words.try_into().unwrap();
        let mut v: Vec<u8> = vec![
            /* lf */ 0, lf, /* lh */ 0, lh, /* bc */ 0, 1, /* ec */ 0, 0,
            /* nw */ 0, 1, /* nh */ 0, 1, /* nd */ 0, 1, /* ni */ 0, 1,
            /* nl */ 0, 0, /* nk */ 0, 0, /* ne */ 0, 0, /* np */ 0, 0,
        ];
        v.extend(header);
        v.extend(&[0_u8; 16]); // the widths etc.
        v
    }
}
