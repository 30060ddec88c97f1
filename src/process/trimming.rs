use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Trim the ends and collapse every inner whitespace run to one space.
pub fn collapse_whitespace(raw: &str) -> String {
    WHITESPACE_RUN.replace_all(raw.trim(), " ").into_owned()
}

/// Upper-case a letter that follows a non-letter, lower-case every other letter.
///
/// Digits and punctuation start a new word, so `"3d"` becomes `"3D"` and
/// `"san-josé"` becomes `"San-José"`.
pub fn title_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut prev_is_letter = false;
    for c in raw.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}

/// Whitespace cleanup followed by a second trim and title case.
pub fn normalize_text(raw: &str) -> String {
    title_case(collapse_whitespace(raw).trim())
}
