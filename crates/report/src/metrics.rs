//! Advance widths of the built-in Helvetica faces, in 1/1000 em, as published
//! in the Adobe core-14 AFM files.

const PT_TO_MM: f32 = 25.4 / 72.0;

/// Width used for glyphs outside the table.
const FALLBACK_WIDTH: u16 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Regular,
    Bold,
}

/// Printable ASCII, `' '` through `'~'`.
#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Latin-1 letters drawn as their unaccented base glyph plus a zero-width
/// accent.
fn base_letter(ch: char) -> Option<char> {
    let base = match ch {
        'À'..='Å' => 'A',
        'Ç' => 'C',
        'È'..='Ë' => 'E',
        'Ì'..='Ï' => 'I',
        'Ñ' => 'N',
        'Ò'..='Ö' | 'Ø' => 'O',
        'Ù'..='Ü' => 'U',
        'Ý' => 'Y',
        'à'..='å' => 'a',
        'ç' => 'c',
        'è'..='ë' => 'e',
        'ì'..='ï' => 'i',
        'ñ' => 'n',
        'ò'..='ö' | 'ø' => 'o',
        'ù'..='ü' => 'u',
        'ý' | 'ÿ' => 'y',
        _ => return None,
    };
    Some(base)
}

pub fn glyph_width(face: Face, ch: char) -> u16 {
    let table = match face {
        Face::Regular => &HELVETICA,
        Face::Bold => &HELVETICA_BOLD,
    };
    let ch = base_letter(ch).unwrap_or(ch);
    match ch {
        ' '..='~' => table[ch as usize - ' ' as usize],
        '\u{a0}' => table[0],
        '¡' => 333,
        '¿' => 611,
        '«' | '»' => 556,
        '°' => 400,
        '\u{2018}' | '\u{2019}' => match face {
            Face::Regular => 222,
            Face::Bold => 278,
        },
        '\u{201c}' | '\u{201d}' => match face {
            Face::Regular => 333,
            Face::Bold => 500,
        },
        '\u{2013}' => 556,
        '\u{2022}' => 350,
        _ => FALLBACK_WIDTH,
    }
}

pub fn text_units(text: &str, face: Face) -> u32 {
    text.chars().map(|ch| u32::from(glyph_width(face, ch))).sum()
}

pub fn units_to_mm(units: u32, font_pt: f32) -> f32 {
    units as f32 / 1000.0 * font_pt * PT_TO_MM
}

/// Rendered width of `text` in millimetres.
pub fn text_width_mm(text: &str, face: Face, font_pt: f32) -> f32 {
    units_to_mm(text_units(text, face), font_pt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_glyphs_match_afm_widths() {
        assert_eq!(glyph_width(Face::Regular, ' '), 278);
        assert_eq!(glyph_width(Face::Regular, 'W'), 944);
        assert_eq!(glyph_width(Face::Regular, 'i'), 222);
        assert_eq!(glyph_width(Face::Regular, '~'), 584);
        assert_eq!(glyph_width(Face::Bold, 'm'), 889);
        assert_eq!(glyph_width(Face::Bold, '@'), 975);
    }

    #[test]
    fn accented_letters_use_their_base_width() {
        assert_eq!(glyph_width(Face::Regular, 'ñ'), glyph_width(Face::Regular, 'n'));
        assert_eq!(glyph_width(Face::Bold, 'Ó'), glyph_width(Face::Bold, 'O'));
        assert_eq!(glyph_width(Face::Regular, 'í'), 222);
    }

    #[test]
    fn unknown_glyphs_take_a_full_em() {
        assert_eq!(glyph_width(Face::Regular, '\u{2014}'), 1000);
        assert_eq!(glyph_width(Face::Bold, '漢'), 1000);
    }

    #[test]
    fn width_scales_with_font_size() {
        let twelve = text_width_mm("Privacidad", Face::Regular, 12.0);
        let twenty_four = text_width_mm("Privacidad", Face::Regular, 24.0);
        assert!((twenty_four - 2.0 * twelve).abs() < 1e-4);
        assert!(text_width_mm("PRIVACIDAD", Face::Bold, 12.0) > twelve);
    }
}
