/*
 * mod.rs
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

//! Header field variants, the rendering trait they share and the registry
//! that maps field names onto them.

use std::fmt;

use super::error::{HeaderError, Result};
use super::header_name;
use super::header_value;
use super::rfc5322::AddressList;
use super::utils::normalize_header_name;

mod address;
mod content_disposition;
mod content_transfer_encoding;
mod content_type;
mod date;
mod generic;
mod identification;
mod locator;
mod mime_version;
mod received;
mod subject;

pub use address::{AddressKind, AddressListHeader, Sender};
pub use content_disposition::ContentDisposition;
pub use content_transfer_encoding::{ContentTransferEncoding, TransferEncoding};
pub use content_type::ContentType;
pub use date::Date;
pub use generic::{GenericHeader, GenericMultiHeader};
pub use identification::{IdentificationField, IdentificationKind, MessageId};
pub use locator::{CustomHeader, HeaderKind, HeaderLocator};
pub use mime_version::MimeVersion;
pub use received::Received;
pub use subject::Subject;

/// Character encoding of a header value on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// Printable US-ASCII only; values are word-wrapped.
    #[default]
    Ascii,
    /// Values are emitted as RFC 2047 encoded words in UTF-8.
    Utf8,
}

impl Encoding {
    pub fn as_str(self) -> &'static str {
        match self {
            Encoding::Ascii => "ASCII",
            Encoding::Utf8 => "UTF-8",
        }
    }

    /// The explicit choice, except that ASCII is never kept for content that
    /// needs UTF-8.
    pub(crate) fn resolve(explicit: Option<Encoding>, detected: Encoding) -> Encoding {
        match explicit {
            Some(Encoding::Utf8) => Encoding::Utf8,
            _ => detected,
        }
    }

    /// ASCII when every byte is printable or part of a fold, UTF-8 otherwise.
    pub fn detect(value: &str) -> Self {
        let ascii = value
            .bytes()
            .all(|b| matches!(b, b'\t' | b'\r' | b'\n' | 0x20..=0x7e));
        if ascii {
            Encoding::Ascii
        } else {
            Encoding::Utf8
        }
    }
}

/// Which rendering of a field value is wanted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldFormat {
    /// The decoded, in-memory value.
    Raw,
    /// The value as it goes on the wire: folded and encoded.
    Encoded,
}

/// Rendering capability shared by every header variant.
pub trait HeaderField: fmt::Debug + Send + Sync {
    fn field_name(&self) -> &str;

    fn field_value(&self, format: FieldFormat) -> String;

    /// Effective encoding: UTF-8 when set explicitly or when the content is
    /// not ASCII.
    fn encoding(&self) -> Encoding;

    fn set_encoding(&mut self, encoding: Encoding);

    fn allows_multiple(&self) -> bool {
        false
    }

    /// Structured headers fold after this delimiter.
    fn delimiter(&self) -> Option<&'static str> {
        None
    }

    /// Unstructured headers are word-wrapped or encoded as a whole.
    fn is_unstructured(&self) -> bool {
        false
    }

    /// The complete `Name: value` line, encoded, without line terminator.
    fn to_line(&self) -> String {
        format!(
            "{}: {}",
            self.field_name(),
            self.field_value(FieldFormat::Encoded)
        )
    }

    fn clone_box(&self) -> Box<dyn HeaderField>;
}

impl Clone for Box<dyn HeaderField> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Split `Name: value` on the first colon and validate both halves.
/// Leading whitespace of the value is dropped.
pub fn split_header_line(line: &str) -> Result<(String, String)> {
    let Some(colon) = line.find(':') else {
        return Err(HeaderError::MalformedHeaderLine(
            "header must match the format \"name:value\"".to_string(),
        ));
    };
    let name = &line[..colon];
    header_name::assert_valid(name)?;
    let value = line[colon + 1..].trim_start_matches([' ', '\t']);
    header_value::assert_valid(name, value)?;
    Ok((name.to_string(), value.to_string()))
}

/// Split a line and check that its name is one of `keys` (normalized).
pub(crate) fn split_expected(
    line: &str,
    expected: &'static str,
    keys: &[&str],
) -> Result<(String, String)> {
    let (name, value) = split_header_line(line)?;
    let key = normalize_header_name(&name);
    if keys.iter().any(|k| *k == key) {
        Ok((name, value))
    } else {
        Err(HeaderError::UnexpectedHeaderType {
            expected,
            found: name,
        })
    }
}

/// Undo folding: CRLF followed by whitespace becomes that whitespace.
pub(crate) fn unfold(value: &str) -> String {
    value.replace("\r\n ", " ").replace("\r\n\t", "\t")
}

/// A parsed header field.
#[derive(Debug, Clone)]
pub enum Header {
    Generic(GenericHeader),
    GenericMulti(GenericMultiHeader),
    From(AddressListHeader),
    To(AddressListHeader),
    Cc(AddressListHeader),
    Bcc(AddressListHeader),
    ReplyTo(AddressListHeader),
    Sender(Sender),
    MessageId(MessageId),
    InReplyTo(IdentificationField),
    References(IdentificationField),
    ContentType(ContentType),
    ContentDisposition(ContentDisposition),
    ContentTransferEncoding(ContentTransferEncoding),
    Date(Date),
    MimeVersion(MimeVersion),
    Subject(Subject),
    Received(Received),
    Custom(Box<dyn HeaderField>),
}

macro_rules! each_variant {
    ($header:expr, $h:ident => $body:expr) => {
        match $header {
            Header::Generic($h) => $body,
            Header::GenericMulti($h) => $body,
            Header::From($h)
            | Header::To($h)
            | Header::Cc($h)
            | Header::Bcc($h)
            | Header::ReplyTo($h) => $body,
            Header::Sender($h) => $body,
            Header::MessageId($h) => $body,
            Header::InReplyTo($h) | Header::References($h) => $body,
            Header::ContentType($h) => $body,
            Header::ContentDisposition($h) => $body,
            Header::ContentTransferEncoding($h) => $body,
            Header::Date($h) => $body,
            Header::MimeVersion($h) => $body,
            Header::Subject($h) => $body,
            Header::Received($h) => $body,
            Header::Custom($h) => $body,
        }
    };
}

impl Header {
    /// Wrap an address-list header in the variant matching its kind.
    pub fn from_address_list(header: AddressListHeader) -> Self {
        match header.kind() {
            AddressKind::From => Header::From(header),
            AddressKind::To => Header::To(header),
            AddressKind::Cc => Header::Cc(header),
            AddressKind::Bcc => Header::Bcc(header),
            AddressKind::ReplyTo => Header::ReplyTo(header),
        }
    }

    pub fn from_identification(header: IdentificationField) -> Self {
        match header.kind() {
            IdentificationKind::InReplyTo => Header::InReplyTo(header),
            IdentificationKind::References => Header::References(header),
        }
    }

    pub fn as_address_list(&self) -> Option<&AddressList> {
        match self {
            Header::From(h) | Header::To(h) | Header::Cc(h) | Header::Bcc(h) | Header::ReplyTo(h) => {
                Some(h.address_list())
            }
            _ => None,
        }
    }

    pub fn as_address_list_mut(&mut self) -> Option<&mut AddressList> {
        match self {
            Header::From(h) | Header::To(h) | Header::Cc(h) | Header::Bcc(h) | Header::ReplyTo(h) => {
                Some(h.address_list_mut())
            }
            _ => None,
        }
    }

    pub fn as_sender(&self) -> Option<&Sender> {
        match self {
            Header::Sender(h) => Some(h),
            _ => None,
        }
    }

    pub fn as_message_id(&self) -> Option<&MessageId> {
        match self {
            Header::MessageId(h) => Some(h),
            _ => None,
        }
    }

    pub fn as_identification(&self) -> Option<&IdentificationField> {
        match self {
            Header::InReplyTo(h) | Header::References(h) => Some(h),
            _ => None,
        }
    }

    pub fn as_content_type(&self) -> Option<&ContentType> {
        match self {
            Header::ContentType(h) => Some(h),
            _ => None,
        }
    }

    pub fn as_content_disposition(&self) -> Option<&ContentDisposition> {
        match self {
            Header::ContentDisposition(h) => Some(h),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<&Date> {
        match self {
            Header::Date(h) => Some(h),
            _ => None,
        }
    }

    pub fn as_subject(&self) -> Option<&Subject> {
        match self {
            Header::Subject(h) => Some(h),
            _ => None,
        }
    }
}

impl HeaderField for Header {
    fn field_name(&self) -> &str {
        each_variant!(self, h => h.field_name())
    }

    fn field_value(&self, format: FieldFormat) -> String {
        each_variant!(self, h => h.field_value(format))
    }

    fn encoding(&self) -> Encoding {
        each_variant!(self, h => h.encoding())
    }

    fn set_encoding(&mut self, encoding: Encoding) {
        each_variant!(self, h => h.set_encoding(encoding))
    }

    fn allows_multiple(&self) -> bool {
        each_variant!(self, h => h.allows_multiple())
    }

    fn delimiter(&self) -> Option<&'static str> {
        each_variant!(self, h => h.delimiter())
    }

    fn is_unstructured(&self) -> bool {
        each_variant!(self, h => h.is_unstructured())
    }

    fn to_line(&self) -> String {
        each_variant!(self, h => h.to_line())
    }

    fn clone_box(&self) -> Box<dyn HeaderField> {
        Box::new(self.clone())
    }
}

/// Headers are equal when their names match case-insensitively and their
/// raw values are identical.
impl PartialEq for Header {
    fn eq(&self, other: &Self) -> bool {
        self.field_name().eq_ignore_ascii_case(other.field_name())
            && self.field_value(FieldFormat::Raw) == other.field_value(FieldFormat::Raw)
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_lines() {
        assert_eq!(
            split_header_line("Subject:   hello").unwrap(),
            ("Subject".to_string(), "hello".to_string())
        );
        assert_eq!(
            split_header_line("X-Empty:").unwrap(),
            ("X-Empty".to_string(), String::new())
        );
        assert_eq!(
            split_header_line("X-Time: 10:20").unwrap().1,
            "10:20"
        );
    }

    #[test]
    fn split_errors() {
        assert!(matches!(
            split_header_line("no colon here"),
            Err(HeaderError::MalformedHeaderLine(_))
        ));
        assert!(matches!(
            split_header_line("Bad Name: x"),
            Err(HeaderError::InvalidHeaderName(_))
        ));
        assert!(matches!(
            split_header_line("Foo: xxx yyy\n"),
            Err(HeaderError::InvalidHeaderValue { .. })
        ));
        assert!(split_header_line("Foo: xxx\r\n yyy").is_ok());
    }

    #[test]
    fn expected_names_are_alias_tolerant() {
        assert!(split_expected("content_type: text/plain", "Content-Type", &["contenttype"]).is_ok());
        assert_eq!(
            split_expected("To: a@b.c", "Content-Type", &["contenttype"]).unwrap_err(),
            HeaderError::UnexpectedHeaderType {
                expected: "Content-Type",
                found: "To".to_string(),
            }
        );
    }

    #[test]
    fn encoding_detection() {
        assert_eq!(Encoding::detect("plain\r\n text\t"), Encoding::Ascii);
        assert_eq!(Encoding::detect("caf\u{e9}"), Encoding::Utf8);
        assert_eq!(Encoding::detect("bell\u{7}"), Encoding::Utf8);
        assert_eq!(Encoding::Utf8.as_str(), "UTF-8");
    }

    #[test]
    fn equality_by_name_and_raw_value() {
        let a = Header::Generic(GenericHeader::new("X-Test", "one").unwrap());
        let b = Header::GenericMulti(GenericMultiHeader::new("x-test", "one").unwrap());
        let c = Header::Generic(GenericHeader::new("X-Test", "two").unwrap());
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.to_string(), "X-Test: one");
    }
}
