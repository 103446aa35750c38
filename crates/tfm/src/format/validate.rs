use super::*;

/// Checks the header and the numeric tables of a decoded file.
///
/// Out-of-range dimensions and non-zero first entries are fatal:
///     they indicate the file is not a font metric file at all.
/// An unexpected parameter count for a math font only produces a warning.
pub(crate) fn check_tables(file: &File, warnings: &mut Warnings) -> Result<(), Error> {
    if file.header.design_size.less_than(1) {
        return Err(Error::DesignSizeIsTooSmall(file.header.design_size));
    }

    let font_type =
        FontType::from_coding_scheme(file.header.character_coding_scheme.as_deref());
    if let Some(expected) = font_type.expected_number_of_params() {
        let got = file.params.len();
        if got != expected {
            warnings.push(Warning::UnusualNumberOfParameters { font_type, got });
        }
    }

    for (table, values) in [
        (DimensionTable::Width, &file.widths),
        (DimensionTable::Height, &file.heights),
        (DimensionTable::Depth, &file.depths),
        (DimensionTable::ItalicCorrection, &file.italic_corrections),
    ] {
        if values.first().copied().unwrap_or(Number::ZERO) != Number::ZERO {
            return Err(Error::NonZeroFirstDimension(table));
        }
    }

    for (table, values, first_checked) in [
        (DimensionTable::Width, &file.widths, 0),
        (DimensionTable::Height, &file.heights, 0),
        (DimensionTable::Depth, &file.depths, 0),
        (DimensionTable::ItalicCorrection, &file.italic_corrections, 0),
        (DimensionTable::Kern, &file.kerns, 0),
        // the slant is a pure number and may be large
        (DimensionTable::Param, &file.params.0, 1),
    ] {
        for (index, value) in values.iter().enumerate().skip(first_checked) {
            if !value.is_abs_less_than_16() {
                return Err(Error::DimensionOutOfRange {
                    table,
                    index,
                    value: *value,
                });
            }
        }
    }
    Ok(())
}
