/// Normalize a phone number for registration.
///
/// Spaces, dashes, dots, and parentheses are removed. A number that already
/// starts with `+` keeps its country code; anything else, including an
/// empty number, gets `default_country_code` (e.g. `+1`) prefixed.
#[must_use]
pub fn normalize_phone_number(raw: &str, default_country_code: &str) -> String {
    let compact: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
        .collect();
    if compact.starts_with('+') {
        compact
    } else {
        format!("{default_country_code}{compact}")
    }
}
