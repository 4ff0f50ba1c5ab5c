/*
 * header_name.rs
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

//! Header field names (RFC 5322 section 2.2): printable US-ASCII except colon.

use super::error::{HeaderError, Result};

#[inline]
fn is_name_byte(b: u8) -> bool {
    (33..=126).contains(&b) && b != b':'
}

/// Remove every byte that may not appear in a field name (controls, space,
/// DEL, 8-bit and colons).
pub fn filter(name: &str) -> String {
    name.chars()
        .filter(|&c| c.is_ascii() && is_name_byte(c as u8))
        .collect()
}

pub fn is_valid(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(is_name_byte)
}

pub fn assert_valid(name: &str) -> Result<()> {
    if is_valid(name) {
        Ok(())
    } else {
        Err(HeaderError::InvalidHeaderName(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_strips_disallowed_bytes() {
        assert_eq!(filter("Subject"), "Subject");
        assert_eq!(filter("Sub ject:"), "Subject");
        assert_eq!(filter(":X-Test:"), "X-Test");
        assert_eq!(filter("X-\u{7f}T\test\r\n"), "X-Test");
        assert_eq!(filter("X-\u{e9}"), "X-");
    }

    #[test]
    fn validation() {
        assert!(is_valid("Subject"));
        assert!(is_valid("X-Custom_Header.1"));
        assert!(!is_valid(""));
        assert!(!is_valid("Sub ject"));
        assert!(!is_valid("Subject:"));
        assert!(!is_valid("X-\u{7f}"));
        assert!(!is_valid("X-\u{e9}"));
        assert!(matches!(
            assert_valid("Bad Name"),
            Err(HeaderError::InvalidHeaderName(n)) if n == "Bad Name"
        ));
    }
}
