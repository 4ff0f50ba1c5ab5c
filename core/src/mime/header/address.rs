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

//! Address headers: From, To, Cc, Bcc, Reply-To (lists) and Sender (one).

use crate::mime::error::{HeaderError, Result};
use crate::mime::rfc2047;
use crate::mime::rfc5322::{ascii_email, parse_address_list, render_address, Address, AddressList};

use super::{split_expected, unfold, Encoding, FieldFormat, HeaderField};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressKind {
    From,
    To,
    Cc,
    Bcc,
    ReplyTo,
}

impl AddressKind {
    pub fn field_name(self) -> &'static str {
        match self {
            AddressKind::From => "From",
            AddressKind::To => "To",
            AddressKind::Cc => "Cc",
            AddressKind::Bcc => "Bcc",
            AddressKind::ReplyTo => "Reply-To",
        }
    }

    fn key(self) -> &'static str {
        match self {
            AddressKind::From => "from",
            AddressKind::To => "to",
            AddressKind::Cc => "cc",
            AddressKind::Bcc => "bcc",
            AddressKind::ReplyTo => "replyto",
        }
    }
}

/// A header whose value is an address list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressListHeader {
    kind: AddressKind,
    list: AddressList,
    encoding: Option<Encoding>,
}

impl AddressListHeader {
    pub fn new(kind: AddressKind) -> Self {
        Self::with_list(kind, AddressList::new())
    }

    pub fn with_list(kind: AddressKind, list: AddressList) -> Self {
        Self {
            kind,
            list,
            encoding: None,
        }
    }

    /// Parse a line such as `To: a@example.com, B <b@example.com>`. The name
    /// must match `kind`.
    pub fn parse(line: &str, kind: AddressKind) -> Result<Self> {
        let (_, value) = split_expected(line, kind.field_name(), &[kind.key()])?;
        let (list, was_encoded) = parse_address_list(&value)?;
        let mut header = Self::with_list(kind, list);
        if was_encoded {
            header.encoding = Some(Encoding::Utf8);
        }
        Ok(header)
    }

    pub fn kind(&self) -> AddressKind {
        self.kind
    }

    pub fn address_list(&self) -> &AddressList {
        &self.list
    }

    pub fn address_list_mut(&mut self) -> &mut AddressList {
        &mut self.list
    }
}

impl HeaderField for AddressListHeader {
    fn field_name(&self) -> &str {
        self.kind.field_name()
    }

    fn field_value(&self, format: FieldFormat) -> String {
        self.list.render(format, self.encoding())
    }

    fn encoding(&self) -> Encoding {
        let detected = if self.list.needs_utf8() {
            Encoding::Utf8
        } else {
            Encoding::Ascii
        };
        Encoding::resolve(self.encoding, detected)
    }

    fn set_encoding(&mut self, encoding: Encoding) {
        self.encoding = Some(encoding);
    }

    fn delimiter(&self) -> Option<&'static str> {
        Some(",")
    }

    fn clone_box(&self) -> Box<dyn HeaderField> {
        Box::new(self.clone())
    }
}

/// The single mailbox responsible for sending a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    address: Option<Address>,
    encoding: Option<Encoding>,
}

impl Sender {
    pub fn new(address: Address) -> Self {
        Self {
            address: Some(address),
            encoding: None,
        }
    }

    /// Parse `Sender: Name <email>`, `Sender: <email>` or `Sender: email`.
    pub fn parse(line: &str) -> Result<Self> {
        let (_, value) = split_expected(line, "Sender", &["sender"])?;
        let unfolded = unfold(&value);
        let decoded = rfc2047::mime_decode_value(&unfolded);
        let was_encoded = decoded != unfolded;
        let decoded = decoded.trim();
        let address = if decoded.is_empty() {
            None
        } else {
            let (name, email) = split_mailbox(decoded)?;
            Some(Address::new(email, name.as_deref(), None)?)
        };
        Ok(Self {
            address,
            encoding: was_encoded.then_some(Encoding::Utf8),
        })
    }

    pub fn address(&self) -> Option<&Address> {
        self.address.as_ref()
    }

    pub fn set_address(&mut self, address: Address) {
        self.address = Some(address);
    }
}

/// `name <email>` with a whitespace-free address in angle brackets, or an
/// optionally bracketed bare address.
fn split_mailbox(value: &str) -> Result<(Option<String>, &str)> {
    let (name, email) = match value.strip_suffix('>').and_then(|v| v.rfind('<').map(|lt| (v, lt))) {
        Some((body, lt)) => (body[..lt].trim(), &body[lt + 1..]),
        None => ("", value),
    };
    if email.is_empty() || email.chars().any(char::is_whitespace) {
        return Err(HeaderError::invalid_address(value, "invalid Sender header value"));
    }
    let name = if name.is_empty() {
        None
    } else {
        Some(unquote(name))
    };
    Ok((name, email))
}

fn unquote(name: &str) -> String {
    match name.strip_prefix('"').and_then(|n| n.strip_suffix('"')) {
        Some(inner) => {
            let mut out = String::with_capacity(inner.len());
            let mut chars = inner.chars();
            while let Some(c) = chars.next() {
                if c == '\\' {
                    if let Some(next) = chars.next() {
                        out.push(next);
                    }
                } else {
                    out.push(c);
                }
            }
            out
        }
        None => name.to_string(),
    }
}

impl HeaderField for Sender {
    fn field_name(&self) -> &str {
        "Sender"
    }

    fn field_value(&self, format: FieldFormat) -> String {
        let Some(address) = &self.address else {
            return String::new();
        };
        let encode = format == FieldFormat::Encoded && self.encoding() == Encoding::Utf8;
        match address.name() {
            Some(_) => render_address(address, encode),
            None if encode => format!("<{}>", ascii_email(address.email())),
            None => format!("<{}>", address.email()),
        }
    }

    fn encoding(&self) -> Encoding {
        let detected = match &self.address {
            Some(a) if !a.email().is_ascii() || a.name().map_or(false, |n| !n.is_ascii()) => {
                Encoding::Utf8
            }
            _ => Encoding::Ascii,
        };
        Encoding::resolve(self.encoding, detected)
    }

    fn set_encoding(&mut self, encoding: Encoding) {
        self.encoding = Some(encoding);
    }

    fn clone_box(&self) -> Box<dyn HeaderField> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_encoding_keeps_unicode_names_encoded() {
        let mut h = AddressListHeader::new(AddressKind::From);
        h.address_list_mut()
            .add("jorg@example.com", Some("J\u{f6}rg"))
            .unwrap();
        h.set_encoding(Encoding::Ascii);
        assert_eq!(h.encoding(), Encoding::Utf8);
        assert_eq!(h.to_line(), "From: =?UTF-8?Q?J=C3=B6rg?= <jorg@example.com>");

        let mut sender = Sender::new(Address::new("jorg@example.com", Some("J\u{f6}rg"), None).unwrap());
        sender.set_encoding(Encoding::Ascii);
        assert_eq!(sender.to_line(), "Sender: =?UTF-8?Q?J=C3=B6rg?= <jorg@example.com>");
    }

    #[test]
    fn parse_to_with_comment() {
        let h = AddressListHeader::parse(
            "To: \"Supports (E-mail)\" <support@example.org>",
            AddressKind::To,
        )
        .unwrap();
        let a = h.address_list().get("support@example.org").unwrap();
        assert_eq!(a.name(), Some("Supports"));
        assert_eq!(a.comment(), Some("E-mail"));
    }

    #[test]
    fn wrong_name_rejected() {
        let err = AddressListHeader::parse("Cc: a@example.com", AddressKind::To).unwrap_err();
        assert_eq!(
            err,
            HeaderError::UnexpectedHeaderType {
                expected: "To",
                found: "Cc".to_string(),
            }
        );
        assert!(AddressListHeader::parse("reply_to: a@example.com", AddressKind::ReplyTo).is_ok());
    }

    #[test]
    fn round_trip() {
        let line = "From: \"Doe, John\" <john@example.com>,\r\n jane@example.com";
        let h = AddressListHeader::parse(line, AddressKind::From).unwrap();
        assert_eq!(h.to_line(), line);
        assert_eq!(AddressListHeader::parse(&h.to_line(), AddressKind::From).unwrap(), h);
    }

    #[test]
    fn encoded_names_switch_to_utf8() {
        let h = AddressListHeader::parse("To: =?UTF-8?Q?J=C3=B6rg?= <j@example.com>", AddressKind::To)
            .unwrap();
        assert_eq!(h.encoding(), Encoding::Utf8);
        assert_eq!(h.field_value(FieldFormat::Raw), "J\u{f6}rg <j@example.com>");
        assert_eq!(h.to_line(), "To: =?UTF-8?Q?J=C3=B6rg?= <j@example.com>");
    }

    #[test]
    fn sender_round_trips_exactly() {
        let h = Sender::parse("Sender: <foo@bar.com>").unwrap();
        assert_eq!(h.to_line(), "Sender: <foo@bar.com>");
        let h = Sender::parse("Sender: foo@bar.com").unwrap();
        assert_eq!(h.to_line(), "Sender: <foo@bar.com>");
    }

    #[test]
    fn sender_with_name() {
        let h = Sender::parse("Sender: \"Foo Bar\" <foo@bar.com>").unwrap();
        let a = h.address().unwrap();
        assert_eq!(a.name(), Some("Foo Bar"));
        assert_eq!(h.to_line(), "Sender: Foo Bar <foo@bar.com>");
    }

    #[test]
    fn sender_rejects_bad_values() {
        assert!(Sender::parse("Sender: foo bar@baz.com").is_err());
        assert!(Sender::parse("Sender: Name <foo @bar.com>").is_err());
        assert!(Sender::parse("From: <foo@bar.com>").is_err());
    }
}
