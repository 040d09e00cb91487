//! Secret redaction for text that may reach logs or the terminal.
//!
//! Graph failures can echo request details back (authorization headers,
//! `access_token` query parameters, raw JWTs). Anything written to stderr
//! passes through [`redact_sensitive`] first.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

const REDACTED: &str = "[REDACTED]";

/// Patterns with a kept prefix in group 1 and the secret in group 2.
static PREFIXED_SECRETS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)(authorization:\s*)([^\r\n]+)",
        r"(?i)(\bbearer\s+)([A-Za-z0-9\-._~+/]+=*)",
        r"(?i)([?&](?:access_token|client_secret|refresh_token|code)=)([^&\s]+)",
        r#"(?i)("(?:access_token|refresh_token|client_secret|id_token)"\s*:\s*")([^"]+)"#,
        r"(?i)(GRAPHCTL_ACCESS_TOKEN=)(\S+)",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("redaction pattern compiles"))
    .collect()
});

/// Bare JWTs (three base64url segments starting with `eyJ`).
static BARE_JWT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"eyJ[A-Za-z0-9_-]+\.[A-Za-z0-9_-]+\.[A-Za-z0-9_-]*").expect("jwt pattern compiles"));

/// Replace credentials in `input` with `[REDACTED]`.
///
/// ```rust
/// use graphctl_util::redact_sensitive;
///
/// assert_eq!(redact_sensitive("Authorization: Bearer abc.def"), "Authorization: [REDACTED]");
/// assert_eq!(
///     redact_sensitive("GET https://x/?access_token=abc&x=1"),
///     "GET https://x/?access_token=[REDACTED]&x=1"
/// );
/// ```
pub fn redact_sensitive(input: &str) -> String {
    let mut redacted = input.to_string();
    for pattern in PREFIXED_SECRETS.iter() {
        redacted = pattern
            .replace_all(&redacted, |captures: &Captures| {
                let prefix = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
                format!("{}{}", prefix, REDACTED)
            })
            .into_owned();
    }
    BARE_JWT.replace_all(&redacted, REDACTED).into_owned()
}
