/*
 * header_value.rs
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

//! Header field values: CR and LF may only appear as part of a fold
//! (CRLF followed by SP or HTAB). Everything that accepts a value from the
//! outside goes through [`assert_valid`], which is what stops header injection.

use super::error::{HeaderError, Result};

/// Drop bare CR and LF bytes, keeping only `CRLF SP` folds.
///
/// LF is always dropped on its own; a CR survives only as the start of a
/// `CR LF SP` triple, which is copied as a whole. This table-driven behaviour
/// is relied upon by callers sanitising user input, so do not "improve" it:
/// `"a \r\r\n b"` must become `"a \r\n b"` and `"a \r\n\n b"` must become
/// `"a  b"`.
pub fn filter(value: &str) -> String {
    let bytes = value.as_bytes();
    let total = bytes.len();
    let mut out = String::with_capacity(total);
    let mut start = 0;
    let mut i = 0;
    while i < total {
        match bytes[i] {
            b'\n' => {
                out.push_str(&value[start..i]);
                i += 1;
                start = i;
            }
            b'\r' => {
                out.push_str(&value[start..i]);
                if i + 2 < total && bytes[i + 1] == b'\n' && bytes[i + 2] == b' ' {
                    out.push_str("\r\n ");
                    i += 3;
                } else {
                    i += 1;
                }
                start = i;
            }
            _ => i += 1,
        }
    }
    out.push_str(&value[start..]);
    out
}

/// True when every CR/LF in `value` belongs to a `CRLF (SP|HTAB)` fold.
pub fn is_valid(value: &str) -> bool {
    let bytes = value.as_bytes();
    let total = bytes.len();
    let mut i = 0;
    while i < total {
        match bytes[i] {
            b'\n' => return false,
            b'\r' => {
                if i + 2 >= total
                    || bytes[i + 1] != b'\n'
                    || !matches!(bytes[i + 2], b' ' | b'\t')
                {
                    return false;
                }
                i += 3;
            }
            _ => i += 1,
        }
    }
    true
}

/// Validate a value destined for the header `header`.
pub fn assert_valid(header: &str, value: &str) -> Result<()> {
    if is_valid(value) {
        Ok(())
    } else {
        Err(HeaderError::invalid_value(
            header,
            "must be composed of printable characters and valid folding sequences",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_table() {
        let cases = [
            ("This is a\n test", "This is a test"),
            ("This is a\r test", "This is a test"),
            ("This is a\n\r test", "This is a test"),
            ("This is a\r\n  test", "This is a\r\n  test"),
            ("This is a \r\ntest", "This is a test"),
            ("This is a \r\n\n test", "This is a  test"),
            ("This is a\n\n test", "This is a test"),
            ("This is a\r\r test", "This is a test"),
            ("This is a \r\r\n test", "This is a \r\n test"),
            ("This is a \r\n\r\ntest", "This is a test"),
            ("This is a \r\n\n\r\n test", "This is a \r\n test"),
            ("This is a test\r\n", "This is a test"),
        ];
        for (input, expected) in cases {
            assert_eq!(filter(input), expected, "input {:?}", input);
        }
    }

    #[test]
    fn filter_keeps_non_ascii_and_tabs() {
        assert_eq!(filter("Gr\u{fc}\u{df}e\taus\n M\u{fc}nchen"), "Gr\u{fc}\u{df}e\taus M\u{fc}nchen");
    }

    #[test]
    fn validation_table() {
        let cases = [
            ("This is a\n test", false),
            ("This is a\r test", false),
            ("This is a\n\r test", false),
            ("This is a\r\n  test", true),
            ("This is a\r\n\ttest", true),
            ("This is a \r\ntest", false),
            ("This is a \r\n\n test", false),
            ("This is a\n\n test", false),
            ("This is a\r\r test", false),
            ("This is a \r\r\n test", false),
            ("This is a \r\n\r\ntest", false),
            ("This is a \r\n\n\r\n test", false),
            ("This\tis\ta test", true),
            ("This is\ta \r\n test", true),
            ("This\tis\ta\ntest", false),
            ("The\rtest", false),
            ("The\r\n\ttest", true),
            ("The\r\n \ttest", true),
            ("The\r\n\t test", true),
            ("The\n\r\ttest", false),
            ("The\r\n\r\ttest", false),
            ("trailing\r\n", false),
        ];
        for (input, expected) in cases {
            assert_eq!(is_valid(input), expected, "input {:?}", input);
        }
    }

    #[test]
    fn assert_valid_names_header() {
        let err = assert_valid("Subject", "a\nb").unwrap_err();
        assert!(err.to_string().contains("Subject"));
        assert!(assert_valid("Subject", "a\r\n b").is_ok());
    }
}
