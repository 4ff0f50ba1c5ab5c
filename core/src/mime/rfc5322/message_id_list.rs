/*
 * message_id_list.rs
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

//! RFC 5322 msg-id list parsing (References, In-Reply-To).

/// Parse a list of message ids from a header value.
///
/// Whitespace, comments and commas separate ids. Angle brackets are removed;
/// ids without brackets or without an `@` are accepted as they are, since
/// many agents produce them.
pub fn parse_message_id_list(value: &str) -> Vec<String> {
    let mut out = Vec::new();
    let bytes = value.as_bytes();
    let len = bytes.len();
    let mut pos = 0;

    while pos < len {
        skip_cfws(bytes, len, &mut pos);
        if pos >= len {
            break;
        }
        let (start, end) = if bytes[pos] == b'<' {
            pos += 1;
            let start = pos;
            while pos < len && bytes[pos] != b'>' {
                pos += 1;
            }
            let end = pos;
            if pos < len {
                pos += 1;
            }
            (start, end)
        } else {
            let start = pos;
            while pos < len && !matches!(bytes[pos], b' ' | b'\t' | b'\r' | b'\n' | b',' | b'(' | b'<') {
                pos += 1;
            }
            (start, pos)
        };
        let id = value[start..end].trim();
        if !id.is_empty() {
            out.push(id.to_string());
        }
    }
    out
}

fn skip_cfws(bytes: &[u8], len: usize, pos: &mut usize) {
    while *pos < len {
        let b = bytes[*pos];
        if b == b' ' || b == b'\t' || b == b'\r' || b == b'\n' {
            *pos += 1;
        } else if b == b'(' {
            *pos += 1;
            let mut depth = 1;
            while *pos < len && depth > 0 {
                if bytes[*pos] == b'(' {
                    depth += 1;
                } else if bytes[*pos] == b')' {
                    depth -= 1;
                } else if bytes[*pos] == b'\\' && *pos + 1 < len {
                    *pos += 2;
                    continue;
                }
                *pos += 1;
            }
        } else if b == b',' {
            *pos += 1;
        } else {
            break;
        }
    }
}
