//! Text cleanup helpers applied to cell content before rendering.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

// CSI sequences (colors, cursor movement) and OSC sequences (hyperlinks, titles)
static RE_ANSI_ESCAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1b\[[0-?]*[ -/]*[@-~]|\x1b\][^\x07\x1b]*(?:\x07|\x1b\\)").unwrap()
});

/// Removes ANSI escape sequences, as emitted in colored tracebacks.
pub fn strip_ansi(text: &str) -> Cow<'_, str> {
    if !text.contains('\x1b') {
        return Cow::Borrowed(text);
    }
    RE_ANSI_ESCAPE.replace_all(text, "")
}

/// Escapes text for use inside an HTML element body.
pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"']) {
        return Cow::Borrowed(text);
    }
    let mut escaped = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

/// Removes ASCII whitespace from a base64 payload.
///
/// Notebook writers wrap long payloads and often append a trailing newline.
pub fn compact_base64(payload: &str) -> Cow<'_, str> {
    if !payload.bytes().any(|b| b.is_ascii_whitespace()) {
        return Cow::Borrowed(payload);
    }
    Cow::Owned(
        payload
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect(),
    )
}
