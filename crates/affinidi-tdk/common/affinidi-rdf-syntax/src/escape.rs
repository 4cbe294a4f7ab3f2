//! String escaping shared by the N-Quads and Turtle codecs.
//!
//! Both syntaxes use the same `ECHAR`/`UCHAR` escapes inside quoted
//! literals, so one routine serves both writers and both readers.

use std::fmt::Write;
use std::str::Chars;

/// Escape a literal value for a double-quoted string.
///
/// Escapes: `\t`, `\n`, `\r`, `\"`, `\\`. Other control characters are
/// written as `\uXXXX`.
pub fn escape_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            c if c < '\u{0020}' || c == '\u{007F}' => {
                let _ = write!(out, "\\u{:04X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}

/// Undo [`escape_literal`] and decode `\uXXXX` / `\UXXXXXXXX` escapes.
///
/// The error string names the offending escape; callers attach a position.
pub fn unescape_literal(s: &str) -> Result<String, String> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('b') => out.push('\u{0008}'),
            Some('f') => out.push('\u{000C}'),
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some('\\') => out.push('\\'),
            Some('u') => {
                let high = read_hex(&mut chars, 4, 'u')?;
                if (0xD800..=0xDBFF).contains(&high) {
                    out.push(read_low_surrogate(&mut chars, high)?);
                } else {
                    out.push(to_char(high)?);
                }
            }
            Some('U') => {
                let cp = read_hex(&mut chars, 8, 'U')?;
                out.push(to_char(cp)?);
            }
            Some(other) => return Err(format!("unknown escape sequence: \\{other}")),
            None => return Err("trailing backslash".to_string()),
        }
    }
    Ok(out)
}

fn read_hex(chars: &mut Chars<'_>, digits: usize, marker: char) -> Result<u32, String> {
    let hex: String = chars.by_ref().take(digits).collect();
    if hex.len() != digits {
        return Err(format!("incomplete \\{marker} escape: \\{marker}{hex}"));
    }
    u32::from_str_radix(&hex, 16).map_err(|_| format!("invalid \\{marker} escape: \\{marker}{hex}"))
}

fn read_low_surrogate(chars: &mut Chars<'_>, high: u32) -> Result<char, String> {
    match (chars.next(), chars.next()) {
        (Some('\\'), Some('u')) => {}
        _ => return Err(format!("expected low surrogate after \\u{high:04X}")),
    }
    let low = read_hex(chars, 4, 'u')?;
    if !(0xDC00..=0xDFFF).contains(&low) {
        return Err(format!("invalid low surrogate: \\u{low:04X}"));
    }
    to_char(0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00))
}

fn to_char(cp: u32) -> Result<char, String> {
    char::from_u32(cp).ok_or_else(|| format!("invalid unicode codepoint: U+{cp:X}"))
}
