use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Drop diacritics: decompose, then remove the combining marks.
/// `"Bogotá"` → `"Bogota"`, `"Peñalolén"` → `"Penalolen"`.
pub fn strip_accents(raw: &str) -> String {
    raw.nfd().filter(|c| !is_combining_mark(*c)).nfc().collect()
}

/// `1234567` → `"1,234,567"`.
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Dollar label: integer part only, thousands separated. `1234.9` → `"$1,234"`.
pub fn format_dollars(value: f64) -> String {
    format!("${}", group_thousands(value.trunc() as i64))
}
