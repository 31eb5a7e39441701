//! Text helpers used while compiling literal content.

use std::sync::LazyLock;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use regex::Regex;

static LINE_EDGE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]*\n+[ \t]*").unwrap());

static WHITESPACE_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Characters escaped in URLs, besides controls and non-ASCII.
///
/// Reserved characters (`;/?:@&=+$,#`) are left alone; only characters that
/// are never valid in a URL are escaped.
const URI_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Remove spaces and tabs around line endings; runs of line endings collapse to one.
///
/// ```
/// assert_eq!(mdvdom::text::trim_lines("a  \n\t b"), "a\nb");
/// ```
#[must_use]
pub fn trim_lines(value: &str) -> String {
    LINE_EDGE_PATTERN.replace_all(value, "\n").into_owned()
}

/// Collapse every whitespace run, line endings included, into one space.
#[must_use]
pub fn collapse_whitespace(value: &str) -> String {
    WHITESPACE_PATTERN.replace_all(value, " ").into_owned()
}

/// Expand tabs to spaces, aligning to multiples of `tab_size` columns.
#[must_use]
pub fn detab(value: &str, tab_size: usize) -> String {
    let tab_size = tab_size.max(1);
    let mut out = String::with_capacity(value.len());
    let mut column = 0;
    for c in value.chars() {
        match c {
            '\t' => {
                let width = tab_size - column % tab_size;
                out.extend(std::iter::repeat_n(' ', width));
                column += width;
            }
            '\n' | '\r' => {
                out.push(c);
                column = 0;
            }
            _ => {
                out.push(c);
                column += 1;
            }
        }
    }
    out
}

/// Make a URL safe to place in `href`/`src` without changing its meaning.
///
/// Existing `%XX` escapes are kept, a stray `%` becomes `%25`, and spaces,
/// controls, non-ASCII and characters never valid in a URL are escaped.
/// Schemes are not inspected; that is the sanitizer's job.
///
/// ```
/// use mdvdom::text::normalize_uri;
///
/// assert_eq!(normalize_uri("a b.html"), "a%20b.html");
/// assert_eq!(normalize_uri("100%25"), "100%25");
/// assert_eq!(normalize_uri("100%"), "100%25");
/// assert_eq!(normalize_uri("/ü?q=1#x"), "/%C3%BC?q=1#x");
/// ```
#[must_use]
pub fn normalize_uri(uri: &str) -> String {
    let mut out = String::with_capacity(uri.len());
    let mut rest = uri;
    while let Some(index) = rest.find('%') {
        out.extend(utf8_percent_encode(&rest[..index], URI_ENCODE_SET));
        let escape = rest.get(index + 1..index + 3);
        if escape.is_some_and(|hex| hex.bytes().all(|b| b.is_ascii_hexdigit())) {
            out.push_str(&rest[index..index + 3]);
            rest = &rest[index + 3..];
        } else {
            out.push_str("%25");
            rest = &rest[index + 1..];
        }
    }
    out.extend(utf8_percent_encode(rest, URI_ENCODE_SET));
    out
}
