//! 5-wide bitmap glyphs for chart labels.
//!
//! A glyph cell is 11 rows: two rows of accent space above the capitals,
//! seven rows of body, two rows of descender. Accented letters are built
//! from their decomposition, base glyph plus mark. Anything else draws as `?`.

use unicode_normalization::UnicodeNormalization;

pub const GLYPH_WIDTH: u32 = 5;
pub const GLYPH_HEIGHT: u32 = 11;
/// Horizontal distance between glyph origins, in font pixels.
pub const ADVANCE: u32 = GLYPH_WIDTH + 1;

const CELL: usize = GLYPH_HEIGHT as usize;
/// First row of the capital body.
const CAP_TOP: usize = 2;

const UNKNOWN: [u8; 9] = tall([0x0E, 0x11, 0x01, 0x02, 0x04, 0x00, 0x04]);

const ACUTE: [u8; 2] = [0x02, 0x04];
const GRAVE: [u8; 2] = [0x08, 0x04];
const CIRCUMFLEX: [u8; 2] = [0x04, 0x0A];
const TILDE: [u8; 2] = [0x0D, 0x16];
const DIAERESIS: [u8; 2] = [0x0A, 0x00];
const CEDILLA: [u8; 2] = [0x04, 0x08];

/// A glyph with nothing below the baseline.
const fn tall(r: [u8; 7]) -> [u8; 9] {
    [r[0], r[1], r[2], r[3], r[4], r[5], r[6], 0, 0]
}

/// Body and descender rows of a base character, top to bottom.
fn body(c: char) -> Option<[u8; 9]> {
    let rows = match c {
        'A' => tall([0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11]),
        'B' => tall([0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E]),
        'C' => tall([0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E]),
        'D' => tall([0x1C, 0x12, 0x11, 0x11, 0x11, 0x12, 0x1C]),
        'E' => tall([0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F]),
        'F' => tall([0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10]),
        'G' => tall([0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F]),
        'H' => tall([0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11]),
        'I' => tall([0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E]),
        'J' => tall([0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C]),
        'K' => tall([0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11]),
        'L' => tall([0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F]),
        'M' => tall([0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11]),
        'N' => tall([0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11]),
        'O' => tall([0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E]),
        'P' => tall([0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10]),
        'Q' => tall([0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D]),
        'R' => tall([0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11]),
        'S' => tall([0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E]),
        'T' => tall([0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04]),
        'U' => tall([0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E]),
        'V' => tall([0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04]),
        'W' => tall([0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A]),
        'X' => tall([0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11]),
        'Y' => tall([0x11, 0x11, 0x11, 0x0A, 0x04, 0x04, 0x04]),
        'Z' => tall([0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F]),
        'a' => tall([0x00, 0x00, 0x0E, 0x01, 0x0F, 0x11, 0x0F]),
        'b' => tall([0x10, 0x10, 0x16, 0x19, 0x11, 0x11, 0x1E]),
        'c' => tall([0x00, 0x00, 0x0E, 0x10, 0x10, 0x11, 0x0E]),
        'd' => tall([0x01, 0x01, 0x0D, 0x13, 0x11, 0x11, 0x0F]),
        'e' => tall([0x00, 0x00, 0x0E, 0x11, 0x1F, 0x10, 0x0E]),
        'f' => tall([0x06, 0x09, 0x08, 0x1C, 0x08, 0x08, 0x08]),
        'g' => [0x00, 0x00, 0x0F, 0x11, 0x11, 0x0F, 0x01, 0x11, 0x0E],
        'h' => tall([0x10, 0x10, 0x16, 0x19, 0x11, 0x11, 0x11]),
        'i' => tall([0x04, 0x00, 0x0C, 0x04, 0x04, 0x04, 0x0E]),
        'j' => [0x02, 0x00, 0x06, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'k' => tall([0x10, 0x10, 0x12, 0x14, 0x18, 0x14, 0x12]),
        'l' => tall([0x0C, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E]),
        'm' => tall([0x00, 0x00, 0x1A, 0x15, 0x15, 0x11, 0x11]),
        'n' => tall([0x00, 0x00, 0x16, 0x19, 0x11, 0x11, 0x11]),
        'o' => tall([0x00, 0x00, 0x0E, 0x11, 0x11, 0x11, 0x0E]),
        'p' => [0x00, 0x00, 0x1E, 0x11, 0x11, 0x11, 0x1E, 0x10, 0x10],
        'q' => [0x00, 0x00, 0x0F, 0x11, 0x11, 0x11, 0x0F, 0x01, 0x01],
        'r' => tall([0x00, 0x00, 0x16, 0x19, 0x10, 0x10, 0x10]),
        's' => tall([0x00, 0x00, 0x0F, 0x10, 0x0E, 0x01, 0x1E]),
        't' => tall([0x08, 0x08, 0x1C, 0x08, 0x08, 0x09, 0x06]),
        'u' => tall([0x00, 0x00, 0x11, 0x11, 0x11, 0x13, 0x0D]),
        'v' => tall([0x00, 0x00, 0x11, 0x11, 0x11, 0x0A, 0x04]),
        'w' => tall([0x00, 0x00, 0x11, 0x11, 0x15, 0x15, 0x0A]),
        'x' => tall([0x00, 0x00, 0x11, 0x0A, 0x04, 0x0A, 0x11]),
        'y' => [0x00, 0x00, 0x11, 0x11, 0x11, 0x11, 0x0F, 0x01, 0x0E],
        'z' => tall([0x00, 0x00, 0x1F, 0x02, 0x04, 0x08, 0x1F]),
        '0' => tall([0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E]),
        '1' => tall([0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E]),
        '2' => tall([0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F]),
        '3' => tall([0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E]),
        '4' => tall([0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02]),
        '5' => tall([0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E]),
        '6' => tall([0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E]),
        '7' => tall([0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08]),
        '8' => tall([0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E]),
        '9' => tall([0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C]),
        ' ' => [0x00; 9],
        '$' => tall([0x04, 0x0F, 0x14, 0x0E, 0x05, 0x1E, 0x04]),
        '%' => tall([0x18, 0x19, 0x02, 0x04, 0x08, 0x13, 0x03]),
        ',' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x04, 0x08, 0x00],
        '.' => tall([0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C]),
        '-' => tall([0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00]),
        '+' => tall([0x00, 0x04, 0x04, 0x1F, 0x04, 0x04, 0x00]),
        '/' => tall([0x00, 0x01, 0x02, 0x04, 0x08, 0x10, 0x00]),
        '(' => tall([0x02, 0x04, 0x08, 0x08, 0x08, 0x04, 0x02]),
        ')' => tall([0x08, 0x04, 0x02, 0x02, 0x02, 0x04, 0x08]),
        ':' => tall([0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00]),
        '\'' => tall([0x0C, 0x04, 0x08, 0x00, 0x00, 0x00, 0x00]),
        '_' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x1F],
        '&' => tall([0x0C, 0x12, 0x14, 0x08, 0x15, 0x12, 0x0D]),
        '#' => tall([0x0A, 0x0A, 0x1F, 0x0A, 0x1F, 0x0A, 0x0A]),
        '!' => tall([0x04, 0x04, 0x04, 0x04, 0x04, 0x00, 0x04]),
        '?' => UNKNOWN,
        _ => return None,
    };
    Some(rows)
}

enum Mark {
    Above([u8; 2]),
    Below([u8; 2]),
}

fn mark(c: char) -> Option<Mark> {
    match c {
        '\u{0300}' => Some(Mark::Above(GRAVE)),
        '\u{0301}' => Some(Mark::Above(ACUTE)),
        '\u{0302}' => Some(Mark::Above(CIRCUMFLEX)),
        '\u{0303}' => Some(Mark::Above(TILDE)),
        '\u{0308}' => Some(Mark::Above(DIAERESIS)),
        '\u{0327}' => Some(Mark::Below(CEDILLA)),
        _ => None,
    }
}

/// Rows top to bottom; bit 4 is the leftmost column.
pub fn glyph(c: char) -> [u8; CELL] {
    let mut parts = std::iter::once(c).nfd();
    let base = parts.next().unwrap_or(c);
    let mut cell = [0u8; CELL];
    cell[CAP_TOP..].copy_from_slice(&body(base).unwrap_or(UNKNOWN));

    let marks: Vec<Mark> = parts.filter_map(mark).collect();
    if marks.is_empty() {
        return cell;
    }
    // small letters carry the mark in their own ascender space
    let top = if base.is_lowercase() { CAP_TOP } else { 0 };
    if matches!(base, 'i' | 'j') {
        cell[CAP_TOP] = 0;
        cell[CAP_TOP + 1] = 0;
    }
    for m in marks {
        match m {
            Mark::Above(rows) => {
                cell[top] |= rows[0];
                cell[top + 1] |= rows[1];
            }
            Mark::Below(rows) => {
                cell[CELL - 2] |= rows[0];
                cell[CELL - 1] |= rows[1];
            }
        }
    }
    cell
}

/// Label text in composed form, one glyph per `char`.
pub fn compose(text: &str) -> String {
    text.nfc().collect()
}

/// Pixel width of `text` at `scale` (no trailing gap).
pub fn text_width(text: &str, scale: u32) -> u32 {
    let n = text.nfc().count() as u32;
    if n == 0 {
        0
    } else {
        (n * ADVANCE - 1) * scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyph_rows_fit_width() {
        for c in (' '..='~').chain(['é', 'ñ', 'Á', 'ç', 'ü']) {
            for row in glyph(c) {
                assert!(row < 1 << GLYPH_WIDTH, "glyph {:?}", c);
            }
        }
    }

    #[test]
    fn test_small_letters_differ_from_capitals() {
        for (lower, upper) in ('a'..='z').zip('A'..='Z') {
            assert_ne!(glyph(lower), glyph(upper), "{}", lower);
        }
    }

    #[test]
    fn test_capitals_leave_accent_rows_empty() {
        assert_eq!(&glyph('E')[..CAP_TOP], &[0, 0]);
        assert_eq!(&glyph('e')[..CAP_TOP + 2], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_accents_sit_above_the_base_letter() {
        let e = glyph('e');
        let e_acute = glyph('é');
        assert_eq!(&e_acute[CAP_TOP..CAP_TOP + 2], &ACUTE);
        assert_eq!(&e_acute[CAP_TOP + 2..], &e[CAP_TOP + 2..]);

        let a_upper = glyph('Á');
        assert_eq!(&a_upper[..CAP_TOP], &ACUTE);
        assert_eq!(&a_upper[CAP_TOP..], &glyph('A')[CAP_TOP..]);

        let n_tilde = glyph('ñ');
        assert_eq!(&n_tilde[CAP_TOP..CAP_TOP + 2], &TILDE);
    }

    #[test]
    fn test_accented_i_drops_its_dot() {
        let i_acute = glyph('í');
        assert_eq!(&i_acute[CAP_TOP..CAP_TOP + 2], &ACUTE);
        assert_eq!(&i_acute[CAP_TOP + 2..], &glyph('i')[CAP_TOP + 2..]);
    }

    #[test]
    fn test_cedilla_hangs_below() {
        assert_eq!(&glyph('ç')[CELL - 2..], &CEDILLA);
    }

    #[test]
    fn test_unknown_falls_back_to_question_mark() {
        assert_eq!(glyph('€'), glyph('?'));
        assert_eq!(glyph('ß'), glyph('?'));
    }

    #[test]
    fn test_compose_joins_combining_marks() {
        assert_eq!(compose("Bogota\u{0301}"), "Bogotá");
        assert_eq!(compose("Distribución"), "Distribución");
    }

    #[test]
    fn test_text_width() {
        assert_eq!(text_width("", 2), 0);
        assert_eq!(text_width("A", 1), 5);
        assert_eq!(text_width("Ab", 2), 22);
        assert_eq!(text_width("e\u{0301}", 1), 5);
    }
}
