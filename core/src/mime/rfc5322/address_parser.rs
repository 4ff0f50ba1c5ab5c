/*
 * address_parser.rs
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

//! RFC 5322 address-list grammar (section 3.4): mailboxes separated by commas,
//! groups (`label: a, b;`), quoted display names and comments.

use crate::mime::error::Result;
use crate::mime::rfc2047;

use super::address::Address;
use super::address_list::AddressList;

/// Parse an address-list header value.
///
/// Group labels are dropped and their members flattened into the list.
/// Comments are collected into each address' `comment`. Encoded words are
/// decoded in display names and comments only, after the structure has been
/// parsed. The flag is true when any entry contained encoded words.
pub fn parse_address_list(value: &str) -> Result<(AddressList, bool)> {
    let unfolded = value.replace("\r\n ", " ").replace("\r\n\t", " ");
    let mut list = AddressList::new();
    let mut was_encoded = false;
    for token in split_entries(&unfolded) {
        let (text, comments) = extract_comments(token.trim());
        let text = unquote_display_name(text.trim());
        let text = strip_single_quotes(text.trim());
        if text.is_empty() {
            continue;
        }
        let text = match text.rfind('<') {
            Some(lt) => {
                let name = &text[..lt];
                let decoded = rfc2047::mime_decode_value(name);
                was_encoded |= decoded != name;
                format!("{}{}", decoded, &text[lt..])
            }
            None => text.to_string(),
        };
        let comments: Vec<String> = comments
            .iter()
            .map(|c| {
                let decoded = rfc2047::mime_decode_value(c);
                was_encoded |= decoded != *c;
                decoded
            })
            .collect();
        let comment = if comments.is_empty() {
            None
        } else {
            Some(comments.join(", "))
        };
        list.add_address(Address::from_string(&text, comment.as_deref())?);
    }
    Ok((list, was_encoded))
}

/// Split on top-level `,` and `;` (outside quotes, comments, angle brackets
/// and domain literals). A top-level `:` ends a group label, which is
/// discarded.
fn split_entries(s: &str) -> Vec<&str> {
    let bytes = s.as_bytes();
    let mut out = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut in_angle = false;
    let mut in_literal = false;
    let mut depth = 0usize;
    let mut pos = 0;
    while pos < bytes.len() {
        let b = bytes[pos];
        if b == b'\\' && (in_quotes || depth > 0) {
            pos += 2;
            continue;
        }
        if depth > 0 {
            match b {
                b'(' => depth += 1,
                b')' => depth -= 1,
                _ => {}
            }
        } else if in_quotes {
            if b == b'"' {
                in_quotes = false;
            }
        } else {
            match b {
                b'"' => in_quotes = true,
                b'(' => depth = 1,
                b'<' => in_angle = true,
                b'>' => in_angle = false,
                b'[' => in_literal = true,
                b']' => in_literal = false,
                b',' | b';' if !in_angle && !in_literal => {
                    out.push(&s[start..pos]);
                    start = pos + 1;
                }
                b':' if !in_angle && !in_literal => start = pos + 1,
                _ => {}
            }
        }
        pos += 1;
    }
    if start < s.len() {
        out.push(&s[start..]);
    }
    out
}

/// Remove comments, returning the remaining text and each top-level
/// comment's trimmed content. Comments are recognised inside quoted strings
/// too; escaped parentheses are not comment delimiters.
fn extract_comments(s: &str) -> (String, Vec<String>) {
    let mut text = String::with_capacity(s.len());
    let mut comments = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            let target = if depth > 0 { &mut current } else { &mut text };
            target.push(c);
            if let Some(next) = chars.next() {
                target.push(next);
            }
            continue;
        }
        match c {
            '(' => {
                if depth > 0 {
                    current.push(c);
                }
                depth += 1;
            }
            ')' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    let comment = current.trim();
                    if !comment.is_empty() {
                        comments.push(comment.to_string());
                    }
                    current.clear();
                } else {
                    current.push(c);
                }
            }
            c if depth > 0 => current.push(c),
            c => text.push(c),
        }
    }
    (text, comments)
}

/// Unquote the display-name part (everything before the last `<`): quotes
/// are removed and quoted pairs resolved. A bare address is left alone so
/// that quoted local parts survive.
fn unquote_display_name(s: &str) -> String {
    let Some(lt) = s.rfind('<') else {
        return s.to_string();
    };
    let mut out = String::with_capacity(s.len());
    let mut chars = s[..lt].chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            }
            '"' => {}
            c => out.push(c),
        }
    }
    out.push_str(&s[lt..]);
    out
}

fn strip_single_quotes(s: &str) -> &str {
    match s.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')) {
        Some(inner) if !inner.contains('<') => inner.trim(),
        _ => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emails(list: &AddressList) -> Vec<&str> {
        list.iter().map(Address::email).collect()
    }

    #[test]
    fn simple_list() {
        let (list, encoded) =
            parse_address_list("a@example.com, \"B, Person\" <b@example.com>").unwrap();
        assert!(!encoded);
        assert_eq!(emails(&list), ["a@example.com", "b@example.com"]);
        assert_eq!(list.get("b@example.com").unwrap().name(), Some("B, Person"));
    }

    #[test]
    fn comment_inside_quoted_name() {
        let (list, _) =
            parse_address_list("\"Supports (E-mail)\" <support@example.org>").unwrap();
        let a = list.get("support@example.org").unwrap();
        assert_eq!(a.name(), Some("Supports"));
        assert_eq!(a.comment(), Some("E-mail"));
    }

    #[test]
    fn nested_and_multiple_comments() {
        let (list, _) =
            parse_address_list("joe@example.com (Joe (the boss)) (work)").unwrap();
        let a = list.get("joe@example.com").unwrap();
        assert_eq!(a.comment(), Some("Joe (the boss), work"));
        assert_eq!(a.name(), None);
    }

    #[test]
    fn groups_are_flattened() {
        let (list, _) = parse_address_list(
            "friends: john@example.com; enemies: john@example.net, bart@example.net;",
        )
        .unwrap();
        assert_eq!(
            emails(&list),
            ["john@example.com", "john@example.net", "bart@example.net"]
        );
    }

    #[test]
    fn empty_group_and_empty_entries() {
        let (list, _) = parse_address_list("undisclosed-recipients:;").unwrap();
        assert!(list.is_empty());
        let (list, _) = parse_address_list(" , a@example.com,, ").unwrap();
        assert_eq!(emails(&list), ["a@example.com"]);
    }

    #[test]
    fn escaped_quotes_in_name() {
        let (list, _) =
            parse_address_list("\"Joe \\\"The Man\\\" Smith\" <joe@example.com>").unwrap();
        assert_eq!(
            list.get("joe@example.com").unwrap().name(),
            Some("Joe \"The Man\" Smith")
        );
    }

    #[test]
    fn encoded_names_are_decoded() {
        let (list, encoded) =
            parse_address_list("=?UTF-8?Q?J=C3=B6rg?= <jorg@example.com>").unwrap();
        assert!(encoded);
        assert_eq!(list.get("jorg@example.com").unwrap().name(), Some("J\u{f6}rg"));
    }

    #[test]
    fn encoded_word_text_is_not_structure() {
        let (list, encoded) =
            parse_address_list("=?UTF-8?Q?Foo_=28Bar=29?= <a@b.com>").unwrap();
        assert!(encoded);
        let a = list.get("a@b.com").unwrap();
        assert_eq!(a.name(), Some("Foo (Bar)"));
        assert_eq!(a.comment(), None);

        let (list, _) =
            parse_address_list("=?UTF-8?Q?=22Quoted=22?= <q@b.com> (=?UTF-8?Q?caf=C3=A9?=)").unwrap();
        let q = list.get("q@b.com").unwrap();
        assert_eq!(q.name(), Some("\"Quoted\""));
        assert_eq!(q.comment(), Some("caf\u{e9}"));
    }

    #[test]
    fn single_quoted_and_literal_addresses() {
        let (list, _) = parse_address_list("'a@example.com', b@[IPv6:::1]").unwrap();
        assert_eq!(emails(&list), ["a@example.com", "b@[IPv6:::1]"]);
    }

    #[test]
    fn folded_values() {
        let (list, _) = parse_address_list("a@example.com,\r\n b@example.com").unwrap();
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn invalid_entry_fails() {
        assert!(parse_address_list("a@example.com, not an address").is_err());
    }
}
