//! HTML escaping for interpolated text.
//!
//! Exactly five characters are replaced: `&`, `<`, `>`, `"` and `'`. Everything else,
//! including non-ASCII text, passes through untouched. Clean input is returned borrowed
//! so the common case costs one scan and no allocation.

use std::borrow::Cow;

#[inline]
fn needs_escape(b: u8) -> bool {
    matches!(b, b'&' | b'<' | b'>' | b'"' | b'\'')
}

/// Escape `text` for use in HTML text or attribute values.
///
/// # Examples
///
/// ```rust
/// use std::borrow::Cow;
/// use html_stream::template::escape_html;
///
/// assert_eq!(escape_html("<b>Tom & Jerry</b>"), "&lt;b&gt;Tom &amp; Jerry&lt;/b&gt;");
/// assert!(matches!(escape_html("plain"), Cow::Borrowed("plain")));
/// ```
pub fn escape_html(text: &str) -> Cow<'_, str> {
    match text.bytes().position(needs_escape) {
        None => Cow::Borrowed(text),
        Some(first) => {
            let mut out = String::with_capacity(text.len() + text.len() / 8 + 8);
            out.push_str(&text[..first]);
            push_escaped(&text[first..], &mut out);
            Cow::Owned(out)
        }
    }
}

/// Like [`escape_html`] but keeps ownership, so a clean `'static` or owned string is
/// passed through without copying.
pub fn escape_owned(text: Cow<'static, str>) -> Cow<'static, str> {
    if text.bytes().any(needs_escape) {
        let mut out = String::with_capacity(text.len() + 16);
        push_escaped(&text, &mut out);
        Cow::Owned(out)
    } else {
        text
    }
}

/// Append the escaped form of `text` to `out`.
pub fn escape_into(text: &str, out: &mut String) {
    if text.bytes().any(needs_escape) {
        push_escaped(text, out);
    } else {
        out.push_str(text);
    }
}

fn push_escaped(text: &str, out: &mut String) {
    // All five targets are ASCII, so byte offsets are always char boundaries.
    let mut start = 0;
    for (i, b) in text.bytes().enumerate() {
        let entity = match b {
            b'&' => "&amp;",
            b'<' => "&lt;",
            b'>' => "&gt;",
            b'"' => "&quot;",
            b'\'' => "&#39;",
            _ => continue,
        };
        out.push_str(&text[start..i]);
        out.push_str(entity);
        start = i + 1;
    }
    out.push_str(&text[start..]);
}
