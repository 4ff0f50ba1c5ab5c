/*
 * address_list.rs
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

//! Ordered, de-duplicated list of mailboxes (From, To, Cc, Bcc, Reply-To).

use crate::mime::error::Result;
use crate::mime::header::{Encoding, FieldFormat};
use crate::mime::rfc2047;
use crate::mime::utils::{quote_phrase, MAX_LINE_LENGTH};

use super::address::Address;

/// Joins entries of a rendered list.
const SEPARATOR: &str = ",\r\n ";

/// Addresses in insertion order. An address whose email is already present
/// (exact, case-sensitive comparison) is ignored, whichever method adds it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressList {
    addresses: Vec<Address>,
}

impl AddressList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `email` with an optional display name. Returns whether it was added.
    pub fn add(&mut self, email: &str, name: Option<&str>) -> Result<bool> {
        let address = Address::new(email, name, None)?;
        Ok(self.add_address(address))
    }

    pub fn add_address(&mut self, address: Address) -> bool {
        if self.has(address.email()) {
            return false;
        }
        self.addresses.push(address);
        true
    }

    /// Add several `(email, name)` pairs; stops at the first invalid one.
    pub fn add_many<'a, I>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
    {
        for (email, name) in entries {
            self.add(email, name)?;
        }
        Ok(())
    }

    /// Add an address given as `Name <email>` or a bare email.
    pub fn add_from_string(&mut self, s: &str, comment: Option<&str>) -> Result<bool> {
        let address = Address::from_string(s, comment)?;
        Ok(self.add_address(address))
    }

    /// Append every address of `other` not already present.
    pub fn merge(&mut self, other: &AddressList) {
        for address in &other.addresses {
            self.add_address(address.clone());
        }
    }

    pub fn has(&self, email: &str) -> bool {
        self.addresses.iter().any(|a| a.email() == email)
    }

    pub fn get(&self, email: &str) -> Option<&Address> {
        self.addresses.iter().find(|a| a.email() == email)
    }

    pub fn delete(&mut self, email: &str) -> bool {
        match self.addresses.iter().position(|a| a.email() == email) {
            Some(index) => {
                self.addresses.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Address> {
        self.addresses.iter()
    }

    /// True when some display name needs more than printable ASCII.
    pub(crate) fn needs_utf8(&self) -> bool {
        self.addresses.iter().any(|a| {
            a.name().map_or(false, |n| !n.is_ascii()) || !a.email().is_ascii()
        })
    }

    /// Render as a header field value. Comments are not rendered.
    ///
    /// In encoded form with UTF-8 encoding, display names become encoded words
    /// and internationalized domains are converted to punycode.
    pub fn render(&self, format: FieldFormat, encoding: Encoding) -> String {
        let encode = format == FieldFormat::Encoded && encoding == Encoding::Utf8;
        let entries: Vec<String> = self
            .addresses
            .iter()
            .map(|a| render_address(a, encode))
            .collect();
        entries.join(SEPARATOR)
    }
}

pub(crate) fn render_address(address: &Address, encode: bool) -> String {
    let email = if encode {
        ascii_email(address.email())
    } else {
        address.email().to_string()
    };
    match address.name() {
        Some(name) => {
            let mut name = quote_phrase(name);
            if encode {
                name = rfc2047::encode_utf8(&name, MAX_LINE_LENGTH);
            }
            format!("{} <{}>", name, email)
        }
        None => email,
    }
}

/// Convert the domain of `email` to its ASCII (punycode) form; the local part
/// is left alone.
pub(crate) fn ascii_email(email: &str) -> String {
    let Some(at) = email.rfind('@') else {
        return email.to_string();
    };
    let domain = &email[at + 1..];
    if domain.is_ascii() {
        return email.to_string();
    }
    match idna::domain_to_ascii(domain) {
        Ok(ascii) => format!("{}@{}", &email[..at], ascii),
        Err(_) => email.to_string(),
    }
}

impl<'a> IntoIterator for &'a AddressList {
    type Item = &'a Address;
    type IntoIter = std::slice::Iter<'a, Address>;

    fn into_iter(self) -> Self::IntoIter {
        self.addresses.iter()
    }
}

impl IntoIterator for AddressList {
    type Item = Address;
    type IntoIter = std::vec::IntoIter<Address>;

    fn into_iter(self) -> Self::IntoIter {
        self.addresses.into_iter()
    }
}
