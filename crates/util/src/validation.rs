use once_cell::sync::Lazy;
use regex::Regex;

static GUID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("GUID pattern compiles")
});

/// Whether `value` is a GUID in the canonical 8-4-4-4-12 hex form.
///
/// Braces and surrounding whitespace are not accepted.
pub fn is_valid_guid(value: &str) -> bool {
    GUID_PATTERN.is_match(value)
}
