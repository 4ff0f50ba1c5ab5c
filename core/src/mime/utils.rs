/*
 * utils.rs
 * Copyright (C) 2026 Chris Burdess
 *
 * This file is part of Intestazione, an email header toolkit.
 *
 * Intestazione is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Intestazione is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Intestazione.  If not, see <http://www.gnu.org/licenses/>.
 */

//! Header parsing utilities (RFC 2045 token, RFC 5322 specials, folding).

/// Line terminator used between header lines.
pub const EOL: &str = "\r\n";

/// Folding sequence inserted inside long header values (CRLF + one space).
pub const FOLDING: &str = "\r\n ";

/// Target length of a folded header line.
pub const MAX_LINE_LENGTH: usize = 78;

/// Checks if a character is valid in an RFC 2045 token.
#[inline]
pub fn is_token_char(c: u8) -> bool {
    matches!(c,
        b'0'..=b'9' | b'A'..=b'Z' | b'a'..=b'z' |
        b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' |
        b'^' | b'_' | b'`' | b'{' | b'|' | b'}' | b'~'
    )
}

/// Checks if the string is a valid RFC 2045 token (1+ token chars).
pub fn is_token(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(is_token_char)
}

/// RFC 5322 specials that force a display name into a quoted string.
/// '.' is left out: unquoted initials ("John Q. Public") are everywhere.
#[inline]
pub fn is_phrase_special(c: char) -> bool {
    matches!(c, '(' | ')' | '<' | '>' | '[' | ']' | ':' | ';' | '@' | '\\' | ',' | '"')
}

/// True if every byte is printable US-ASCII (0x20..=0x7E).
///
/// Tabs, CR and LF count as non-printable, so a value containing them is sent
/// through the encoded-word path when rendered.
pub fn is_printable(s: &str) -> bool {
    s.bytes().all(|b| (0x20..0x7f).contains(&b))
}

/// Registry key: lower case with '-', '_', '.' and spaces removed, so that
/// "Content-Type", "content_type" and "ContentType" collapse together.
pub fn normalize_header_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '-' | '_' | '.' | ' '))
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Render a display name, quoting it when it contains specials.
pub fn quote_phrase(name: &str) -> String {
    if !name.chars().any(is_phrase_special) {
        return name.to_string();
    }
    let mut out = String::with_capacity(name.len() + 2);
    out.push('"');
    for c in name.chars() {
        if matches!(c, '"' | '\\' | '(' | ')') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Wrap `text` at `width` columns, breaking at spaces and inserting `brk`.
///
/// Words longer than `width` are never cut. The space a line is broken at is
/// replaced by `brk`, and breaks already present in the text reset the column.
/// These are the semantics of PHP's `wordwrap()` without `cut`, which many
/// mail producers reproduce bit for bit.
pub fn wordwrap(text: &str, width: usize, brk: &str) -> String {
    let bytes = text.as_bytes();
    let brk_bytes = brk.as_bytes();
    if bytes.is_empty() || brk_bytes.is_empty() {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len() + text.len() / width.max(1) * brk.len());
    let mut last_start = 0;
    let mut last_space = 0;
    let mut current = 0;
    while current < bytes.len() {
        if bytes[current] == brk_bytes[0]
            && current + brk_bytes.len() < bytes.len()
            && bytes[current..].starts_with(brk_bytes)
        {
            out.push_str(&text[last_start..current + brk_bytes.len()]);
            current += brk_bytes.len() - 1;
            last_start = current + 1;
            last_space = current + 1;
        } else if bytes[current] == b' ' {
            if current - last_start >= width {
                out.push_str(&text[last_start..current]);
                out.push_str(brk);
                last_start = current + 1;
            }
            last_space = current;
        } else if current - last_start >= width && last_start < last_space {
            out.push_str(&text[last_start..last_space]);
            out.push_str(brk);
            last_start = last_space + 1;
            last_space = last_start;
        }
        current += 1;
    }
    if last_start < bytes.len() {
        out.push_str(&text[last_start..]);
    }
    out
}
