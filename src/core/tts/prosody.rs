//! Prosody value canonicalization.
//!
//! Azure's SSML `<prosody>` element expects rate and pitch as signed
//! percentages (`+0%`, `-5%`). Callers often pass bare numbers (`10`,
//! `-1.5`), which are coerced into that form. Anything unparseable falls
//! back to the configured default instead of failing the request; the
//! fallback is reported to the caller so it can be logged.

use std::sync::LazyLock;

use regex::Regex;

/// Signed or unsigned integer or decimal, nothing else.
static NUMERIC_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?\d+(?:\.\d+)?$").expect("prosody pattern is valid"));

/// Normalizes a rate or pitch value into canonical signed-percent form.
///
/// Returns the canonical value and whether the input was invalid and
/// replaced by `default`. Values already ending in `%` pass through
/// unchanged; bare numbers gain an implicit `+` sign and a `%` suffix.
///
/// # Examples
///
/// ```
/// use tts_gateway::core::tts::prosody::normalize_prosody;
///
/// assert_eq!(normalize_prosody(Some("10"), "+0%"), ("+10%".to_string(), false));
/// assert_eq!(normalize_prosody(Some("-1.5"), "+0%"), ("-1.5%".to_string(), false));
/// assert_eq!(normalize_prosody(Some("fast"), "+1%"), ("+1%".to_string(), true));
/// assert_eq!(normalize_prosody(None, "+0%"), ("+0%".to_string(), false));
/// ```
pub fn normalize_prosody(value: Option<&str>, default: &str) -> (String, bool) {
    let Some(value) = value else {
        return (default.to_string(), false);
    };

    let trimmed = value.trim();
    if trimmed.is_empty() {
        return (default.to_string(), false);
    }

    if trimmed.ends_with('%') {
        return (trimmed.to_string(), false);
    }

    if NUMERIC_VALUE.is_match(trimmed) {
        let signed = if trimmed.starts_with('+') || trimmed.starts_with('-') {
            trimmed.to_string()
        } else {
            format!("+{trimmed}")
        };
        return (format!("{signed}%"), false);
    }

    (default.to_string(), true)
}
