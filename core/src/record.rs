//! Phrase record format.
//!
//! A phrase file is line oriented. Every record is a key followed by a
//! whitespace run and the phrase:
//!
//! ```text
//! tm  ™
//! sig "Best regards,\nJane"
//! ```
//!
//! The phrase may be written as a single quoted token, in which case `\"`
//! produces a literal quote. Blank lines are ignored and there is no comment
//! syntax. Lines that fail to parse are skipped by the loader, so everything
//! here returns `Option` rather than an error.

use serde::{Deserialize, Serialize};

/// Whitespace recognised between key and phrase and trimmed from line ends.
const WHITESPACE: &[u8] = b" \t\r\n\x0b\x0c";

fn is_space(b: u8) -> bool {
    WHITESPACE.contains(&b)
}

/// A single `key -> phrase` record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entry {
    pub key: String,
    pub phrase: String,
}

impl Entry {
    pub fn new<K: Into<String>, P: Into<String>>(key: K, phrase: P) -> Self {
        Self {
            key: key.into(),
            phrase: phrase.into(),
        }
    }
}

/// Parse one line of text. See [`parse_record`].
pub fn parse_line(line: &str) -> Option<Entry> {
    parse_record(line.as_bytes())
}

/// Parse one raw line (without any guarantee of valid UTF-8).
///
/// Returns `None` for blank lines, lines that are not valid UTF-8 after
/// trimming, lines without a phrase, and lines ending in `"` whose phrase is
/// not exactly one quoted token.
pub fn parse_record(raw: &[u8]) -> Option<Entry> {
    let start = raw.iter().position(|&b| !is_space(b))?;
    let end = raw.iter().rposition(|&b| !is_space(b))? + 1;
    let text = std::str::from_utf8(&raw[start..end]).ok()?;
    let bytes = text.as_bytes();

    let sep = bytes.iter().position(|&b| is_space(b))?;
    let word = sep + bytes[sep..].iter().position(|&b| !is_space(b))?;

    // A trailing quote must close a quote that opens the phrase.
    let quoted = bytes[bytes.len() - 1] == b'"';
    if quoted && (bytes[word] != b'"' || word + 1 == bytes.len()) {
        return None;
    }

    let key = &text[..sep];
    let phrase = if quoted {
        unescape(&text[word + 1..text.len() - 1], true)
    } else {
        unescape(&text[word..], false)
    };
    Some(Entry::new(key, phrase))
}

/// Replace backslash escapes with the characters they stand for.
///
/// `\\`, `\n`, `\t` and `\ ` are always recognised; `\"` only when
/// `unescape_quote` is set. Unknown sequences are kept verbatim.
pub fn unescape(text: &str, unescape_quote: bool) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        let replacement = match chars.peek() {
            Some('\\') => Some('\\'),
            Some('n') => Some('\n'),
            Some('t') => Some('\t'),
            Some(' ') => Some(' '),
            Some('"') if unescape_quote => Some('"'),
            _ => None,
        };
        match replacement {
            Some(r) => {
                out.push(r);
                chars.next();
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Escape a phrase so that [`unescape`] with the same mode restores it.
pub fn escape(text: &str, escape_quote: bool) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' if escape_quote => out.push_str("\\t"),
            '"' if escape_quote => out.push_str("\\\""),
            _ => out.push(ch),
        }
    }
    out
}

fn needs_quotes(phrase: &str) -> bool {
    let bytes = phrase.as_bytes();
    match (bytes.first(), bytes.last()) {
        (Some(&first), Some(&last)) => {
            is_space(first)
                || is_space(last)
                || first == b'"'
                || last == b'"'
                || phrase.contains('\n')
                || phrase.contains('\t')
        }
        _ => true,
    }
}

/// Serialize a record as a single line that [`parse_line`] reads back as
/// the same `(key, phrase)` pair.
///
/// Returns `None` when the key cannot be represented (empty or containing
/// whitespace).
pub fn format_record(key: &str, phrase: &str) -> Option<String> {
    if key.is_empty() || key.bytes().any(is_space) {
        return None;
    }
    if needs_quotes(phrase) {
        Some(format!("{key} \"{}\"", escape(phrase, true)))
    } else {
        Some(format!("{key} {}", escape(phrase, false)))
    }
}
