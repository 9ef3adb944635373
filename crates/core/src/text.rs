//! Small text predicates shared by the pipeline stages.

/// Collapse every whitespace run to a single space and trim both ends.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Number of characters (not bytes).
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// True when the text is non-empty and made only of decimal digits.
///
/// Vulgar fractions and other numeric symbols (`"½"`, `"Ⅻ"`) do not count.
pub fn is_numeric(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_digit())
}

/// True when the text has at least one cased letter and no lower-case ones.
///
/// Digits, punctuation and spaces are ignored, so `"SECTION 2: SCOPE"` is
/// upper-case while `"2024"` is not.
pub fn is_upper_case(text: &str) -> bool {
    let mut has_cased = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            has_cased = true;
        }
    }
    has_cased
}

/// Upper-case the first letter of every alphabetic run and lower-case the rest.
///
/// `"annual REPORT-2024"` becomes `"Annual Report-2024"`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}
