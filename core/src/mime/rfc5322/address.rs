/*
 * address.rs
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

//! RFC 5322 mailbox: an email address with optional display name and comment.

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

use crate::mime::error::{HeaderError, Result};

const MAX_LOCAL_PART: usize = 64;
const MAX_DOMAIN: usize = 255;
const MAX_LABEL: usize = 63;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    email: String,
    name: Option<String>,
    comment: Option<String>,
}

impl Address {
    /// Validated constructor. Empty names and comments become `None`.
    pub fn new(email: &str, name: Option<&str>, comment: Option<&str>) -> Result<Self> {
        if has_line_break(email) {
            return Err(HeaderError::CrlfInjection("email address".to_string()));
        }
        if name.map_or(false, has_line_break) {
            return Err(HeaderError::CrlfInjection("address display name".to_string()));
        }
        if comment.map_or(false, has_line_break) {
            return Err(HeaderError::CrlfInjection("address comment".to_string()));
        }
        let email = email.trim();
        if email.is_empty() {
            return Err(HeaderError::invalid_address(email, "email address is empty"));
        }
        if !is_valid_email(email) {
            return Err(HeaderError::invalid_address(
                email,
                "not a valid local-part@domain address",
            ));
        }
        Ok(Self {
            email: email.to_string(),
            name: non_empty(name),
            comment: non_empty(comment),
        })
    }

    /// Parse `Display Name <local@domain>` or a bare `local@domain`.
    ///
    /// The display name runs up to the last `<` that is followed by a
    /// non-empty address and a closing `>` at the very end; anything else is
    /// taken as a bare address.
    pub fn from_string(s: &str, comment: Option<&str>) -> Result<Self> {
        let s = s.trim();
        match split_angle_addr(s) {
            Some((name, email)) => Self::new(email, Some(name), comment),
            None => Self::new(s, None, comment),
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn local_part(&self) -> &str {
        match self.email.rfind('@') {
            Some(at) => &self.email[..at],
            None => &self.email,
        }
    }

    pub fn domain(&self) -> &str {
        match self.email.rfind('@') {
            Some(at) => &self.email[at + 1..],
            None => "",
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name {
            Some(ref name) => write!(f, "{} <{}>", name, self.email),
            None => f.write_str(&self.email),
        }
    }
}

fn has_line_break(s: &str) -> bool {
    s.contains('\r') || s.contains('\n')
}

fn non_empty(s: Option<&str>) -> Option<String> {
    s.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn split_angle_addr(s: &str) -> Option<(&str, &str)> {
    let body = s.strip_suffix('>')?;
    // try every '<' from the right: the greedy name
    let mut end = body.len();
    while let Some(lt) = body[..end].rfind('<') {
        let inner = &body[lt + 1..];
        if !inner.is_empty() && !inner.contains('>') {
            return Some((body[..lt].trim(), inner));
        }
        end = lt;
    }
    None
}

/// RFC 5322 atext plus UTF-8 (RFC 6531).
fn is_atext(c: char) -> bool {
    c.is_ascii_alphanumeric() || !c.is_ascii() || "!#$%&'*+-/=?^_`{|}~".contains(c)
}

fn is_valid_local_part(local: &str) -> bool {
    if local.is_empty() || local.len() > MAX_LOCAL_PART {
        return false;
    }
    if let Some(inner) = local.strip_prefix('"').and_then(|l| l.strip_suffix('"')) {
        let mut escaped = false;
        for c in inner.chars() {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                return false;
            }
        }
        return !escaped;
    }
    local
        .split('.')
        .all(|atom| !atom.is_empty() && atom.chars().all(is_atext))
}

fn is_valid_domain(domain: &str) -> bool {
    if let Some(literal) = domain.strip_prefix('[').and_then(|d| d.strip_suffix(']')) {
        return match literal.strip_prefix("IPv6:") {
            Some(v6) => v6.parse::<Ipv6Addr>().is_ok(),
            None => literal.parse::<Ipv4Addr>().is_ok(),
        };
    }
    if domain.is_empty() || domain.len() > MAX_DOMAIN {
        return false;
    }
    domain.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= MAX_LABEL
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || !c.is_ascii())
    })
}

/// True for `local@domain` with a dot-atom or quoted local part and a host
/// name (dots optional, IDN allowed) or address literal.
pub fn is_valid_email(email: &str) -> bool {
    match email.rfind('@') {
        Some(at) => is_valid_local_part(&email[..at]) && is_valid_domain(&email[at + 1..]),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_emails() {
        for email in [
            "user@example.com",
            "first.last+tag@sub.example.co.uk",
            "root@localhost",
            "\"john doe\"@example.com",
            "user@[192.168.0.1]",
            "user@[IPv6:::1]",
            "j\u{f6}rg@b\u{fc}cher.example",
        ] {
            assert!(is_valid_email(email), "{}", email);
        }
    }

    #[test]
    fn invalid_emails() {
        for email in [
            "",
            "plain",
            "@example.com",
            "user@",
            "a..b@example.com",
            ".a@example.com",
            "user@-example.com",
            "user@exa mple.com",
            "us er@example.com",
            "user@[300.1.1.1]",
        ] {
            assert!(!is_valid_email(email), "{}", email);
        }
        assert!(!is_valid_email(&format!("{}@example.com", "a".repeat(65))));
    }

    #[test]
    fn constructor_rejects_injection() {
        assert_eq!(
            Address::new("a@b.com\r\nBcc: c@d.com", None, None),
            Err(HeaderError::CrlfInjection("email address".to_string()))
        );
        assert!(matches!(
            Address::new("a@b.com", Some("Evil\nBcc: c@d.com"), None),
            Err(HeaderError::CrlfInjection(_))
        ));
        assert!(matches!(
            Address::new("  ", None, None),
            Err(HeaderError::InvalidAddress { .. })
        ));
    }

    #[test]
    fn from_string_with_name() {
        let a = Address::from_string("John Doe <john@example.com>", None).unwrap();
        assert_eq!(a.email(), "john@example.com");
        assert_eq!(a.name(), Some("John Doe"));
        assert_eq!(a.local_part(), "john");
        assert_eq!(a.domain(), "example.com");
        assert_eq!(a.to_string(), "John Doe <john@example.com>");
    }

    #[test]
    fn from_string_bare_and_bracketed() {
        let a = Address::from_string("john@example.com", Some("work")).unwrap();
        assert_eq!(a.name(), None);
        assert_eq!(a.comment(), Some("work"));
        let b = Address::from_string("<john@example.com>", None).unwrap();
        assert_eq!(b.email(), "john@example.com");
        assert_eq!(b.name(), None);
    }

    #[test]
    fn from_string_name_scan_is_greedy() {
        let a = Address::from_string("a <b> c <d@example.com>", None).unwrap();
        assert_eq!(a.name(), Some("a <b> c"));
        assert_eq!(a.email(), "d@example.com");
        assert!(Address::from_string("Name <not an address>", None).is_err());
    }
}
