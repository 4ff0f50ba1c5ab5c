/*
 * quoted_printable.rs
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

//! "Q" encoding for RFC 2047 encoded words (a restricted quoted-printable).

const HEX_DECODE: [i8; 256] = {
    let mut t = [-1i8; 256];
    let mut i = 0u8;
    while i < 10 {
        t[(b'0' + i) as usize] = i as i8;
        i = i.wrapping_add(1);
    }
    let mut i = 0u8;
    while i < 6 {
        t[(b'A' + i) as usize] = (10 + i) as i8;
        t[(b'a' + i) as usize] = (10 + i) as i8;
        i = i.wrapping_add(1);
    }
    t
};

const HEX_ENCODE: &[u8; 16] = b"0123456789ABCDEF";

/// True if `b` must be written as `=XX` inside a Q encoded word.
///
/// Besides controls, DEL and 8-bit bytes this covers the Q syntax itself
/// (`=`, `?`, `_`), space, and the RFC 5322 specials other than `.` so that
/// the word stays safe inside a phrase.
#[inline]
pub fn needs_encoding(b: u8) -> bool {
    b < 0x21
        || b > 0x7e
        || matches!(
            b,
            b'=' | b'?' | b'_' | b'"' | b'(' | b')' | b',' | b':' | b';' | b'<' | b'>' | b'@'
                | b'[' | b'\\' | b']'
        )
}

/// Number of output bytes `b` takes once encoded.
#[inline]
pub fn encoded_len(b: u8) -> usize {
    if needs_encoding(b) {
        3
    } else {
        1
    }
}

/// Append the Q form of `b` to `out`.
pub fn encode_byte(b: u8, out: &mut String) {
    if needs_encoding(b) {
        out.push('=');
        out.push(HEX_ENCODE[(b >> 4) as usize] as char);
        out.push(HEX_ENCODE[(b & 0x0f) as usize] as char);
    } else {
        out.push(b as char);
    }
}

/// Decode a Q payload. `_` is a space, `=XX` a byte; a stray `=` without two
/// hex digits after it is kept as is.
pub fn decode(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len());
    let mut pos = 0;
    while pos < payload.len() {
        let b = payload[pos];
        match b {
            b'_' => {
                out.push(b' ');
                pos += 1;
            }
            b'=' if pos + 2 < payload.len() => {
                let v1 = HEX_DECODE[payload[pos + 1] as usize];
                let v2 = HEX_DECODE[payload[pos + 2] as usize];
                if v1 >= 0 && v2 >= 0 {
                    out.push(((v1 << 4) | v2) as u8);
                    pos += 3;
                } else {
                    out.push(b);
                    pos += 1;
                }
            }
            _ => {
                out.push(b);
                pos += 1;
            }
        }
    }
    out
}
