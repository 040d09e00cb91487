//! Encoding helpers for values interpolated into Graph URLs.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Bytes left as-is inside a query parameter value: RFC3986 unreserved.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// Bytes left as-is inside a path segment. Adds the sub-delimiters Graph
/// identifiers use (`@` in user principal names, `,` in site ids, `:` in
/// path-addressed sites).
const PATH_SEGMENT: &AsciiSet = &QUERY_VALUE.remove(b'@').remove(b',').remove(b':');

/// Encode a value for use as a string literal inside an OData `$filter`.
///
/// Single quotes are doubled per OData literal rules, then the result is
/// percent-encoded so it can be embedded in a query string.
///
/// ```rust
/// use graphctl_util::encode_odata_literal;
///
/// assert_eq!(encode_odata_literal("Marketing"), "Marketing");
/// assert_eq!(encode_odata_literal("Bob's team"), "Bob%27%27s%20team");
/// ```
pub fn encode_odata_literal(value: &str) -> String {
    utf8_percent_encode(&value.replace('\'', "''"), QUERY_VALUE).to_string()
}

/// Percent-encode a single path segment (an id or a principal name).
///
/// ```rust
/// use graphctl_util::encode_path_segment;
///
/// assert_eq!(encode_path_segment("john@contoso.com"), "john@contoso.com");
/// assert_eq!(encode_path_segment("team/app name"), "team%2Fapp%20name");
/// ```
pub fn encode_path_segment(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn odata_literal_escapes_quotes_before_percent_encoding() {
        assert_eq!(encode_odata_literal("a'b"), "a%27%27b");
        assert_eq!(encode_odata_literal("R&D"), "R%26D");
    }

    #[test]
    fn path_segment_preserves_site_id_separators() {
        let site_id = "contoso.sharepoint.com,8f9f2b1e-1d7a-4f3e-9a3b-2f6a1b0c9d8e,0d1f2e3c-4b5a-6978-8a9b-0c1d2e3f4a5b";
        assert_eq!(encode_path_segment(site_id), site_id);
        assert_eq!(encode_path_segment("a?b#c"), "a%3Fb%23c");
    }
}
