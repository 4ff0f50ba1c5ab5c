/*
 * generic.rs
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

//! Headers without a dedicated type: any name, unstructured value.

use crate::mime::error::{HeaderError, Result};
use crate::mime::header_name;
use crate::mime::header_value;
use crate::mime::rfc2047;

use super::{split_header_line, Encoding, FieldFormat, HeaderField};

/// `x-my_header` becomes `X-My-Header`: words separated by `-` or `_` get an
/// upper-case initial and are joined with `-`.
fn normalize_name(name: &str) -> String {
    name.split(['-', '_', ' '])
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

fn check_value(name: &str, value: &str) -> Result<String> {
    header_value::assert_valid(name, value)?;
    if !rfc2047::can_be_encoded(value, "UTF-8") {
        return Err(HeaderError::Unencodable {
            charset: "UTF-8".to_string(),
        });
    }
    if value.trim().is_empty() {
        return Ok(String::new());
    }
    Ok(value.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericHeader {
    name: String,
    value: String,
    encoding: Option<Encoding>,
}

impl GenericHeader {
    pub fn new(name: &str, value: &str) -> Result<Self> {
        let name = normalize_name(name);
        header_name::assert_valid(&name)?;
        let value = check_value(&name, value)?;
        Ok(Self {
            name,
            value,
            encoding: None,
        })
    }

    /// Parse `Name: value`; encoded words in the value are decoded and mark
    /// the header as UTF-8.
    pub fn parse(line: &str) -> Result<Self> {
        let (name, value) = split_header_line(line)?;
        let decoded = rfc2047::mime_decode_value(&value);
        let mut header = Self::new(&name, &decoded)?;
        if decoded != value {
            header.encoding = Some(Encoding::Utf8);
        }
        Ok(header)
    }

    pub fn set_value(&mut self, value: &str) -> Result<()> {
        self.value = check_value(&self.name, value)?;
        Ok(())
    }
}

impl HeaderField for GenericHeader {
    fn field_name(&self) -> &str {
        &self.name
    }

    fn field_value(&self, format: FieldFormat) -> String {
        match format {
            FieldFormat::Raw => self.value.clone(),
            FieldFormat::Encoded => rfc2047::wrap(&self.value, self),
        }
    }

    fn encoding(&self) -> Encoding {
        Encoding::resolve(self.encoding, Encoding::detect(&self.value))
    }

    fn set_encoding(&mut self, encoding: Encoding) {
        self.encoding = Some(encoding);
    }

    fn is_unstructured(&self) -> bool {
        true
    }

    fn clone_box(&self) -> Box<dyn HeaderField> {
        Box::new(self.clone())
    }
}

/// Generic header that may occur several times; a comma separated value can
/// be split into one header per element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericMultiHeader {
    inner: GenericHeader,
}

impl GenericMultiHeader {
    pub fn new(name: &str, value: &str) -> Result<Self> {
        Ok(Self {
            inner: GenericHeader::new(name, value)?,
        })
    }

    pub fn parse(line: &str) -> Result<Self> {
        Ok(Self {
            inner: GenericHeader::parse(line)?,
        })
    }

    /// Parse `Name: a, b, c` into three headers. A value whose first comma is
    /// at position 0, or that has none, yields a single header.
    pub fn parse_multiple(line: &str) -> Result<Vec<Self>> {
        let (name, value) = split_header_line(line)?;
        let decoded = rfc2047::mime_decode_value(&value);
        let was_encoded = decoded != value;
        let parts: Vec<&str> = match decoded.find(',') {
            Some(i) if i > 0 => decoded.split(',').map(str::trim).collect(),
            _ => vec![decoded.as_str()],
        };
        parts
            .into_iter()
            .map(|part| {
                let mut header = Self::new(&name, part)?;
                if was_encoded {
                    header.set_encoding(Encoding::Utf8);
                }
                Ok(header)
            })
            .collect()
    }
}

impl HeaderField for GenericMultiHeader {
    fn field_name(&self) -> &str {
        self.inner.field_name()
    }

    fn field_value(&self, format: FieldFormat) -> String {
        match format {
            FieldFormat::Raw => self.inner.value.clone(),
            FieldFormat::Encoded => rfc2047::wrap(&self.inner.value, self),
        }
    }

    fn encoding(&self) -> Encoding {
        self.inner.encoding()
    }

    fn set_encoding(&mut self, encoding: Encoding) {
        self.inner.set_encoding(encoding);
    }

    fn allows_multiple(&self) -> bool {
        true
    }

    fn is_unstructured(&self) -> bool {
        true
    }

    fn clone_box(&self) -> Box<dyn HeaderField> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_normalized() {
        assert_eq!(GenericHeader::new("x-my_header", "v").unwrap().field_name(), "X-My-Header");
        assert_eq!(GenericHeader::new("X-MAILER", "v").unwrap().field_name(), "X-MAILER");
        assert!(GenericHeader::new("bad:name", "v").is_err());
    }

    #[test]
    fn ascii_encoding_is_ignored_for_unicode_values() {
        let mut h = GenericHeader::new("X-Note", "na\u{ef}ve").unwrap();
        h.set_encoding(Encoding::Ascii);
        assert_eq!(h.to_line(), "X-Note: =?UTF-8?Q?na=C3=AFve?=");
        let mut plain = GenericHeader::new("X-Note", "plain").unwrap();
        plain.set_encoding(Encoding::Ascii);
        assert_eq!(plain.to_line(), "X-Note: plain");
    }

    #[test]
    fn bare_line_feed_rejected() {
        let err = GenericHeader::parse("Foo: xxx yyy\n").unwrap_err();
        assert!(matches!(err, HeaderError::InvalidHeaderValue { ref header, .. } if header == "Foo"));
        assert!(GenericHeader::new("Foo", "a\rb").is_err());
        assert!(GenericHeader::new("Foo", "a\r\nBcc: x").is_err());
    }

    #[test]
    fn whitespace_only_value_is_empty() {
        let h = GenericHeader::new("X-Blank", "   ").unwrap();
        assert_eq!(h.field_value(FieldFormat::Raw), "");
    }

    #[test]
    fn encoded_values() {
        let h = GenericHeader::parse("X-Note: =?UTF-8?Q?Caf=C3=A9?=").unwrap();
        assert_eq!(h.field_value(FieldFormat::Raw), "Caf\u{e9}");
        assert_eq!(h.encoding(), Encoding::Utf8);
        assert_eq!(h.to_line(), "X-Note: =?UTF-8?Q?Caf=C3=A9?=");
    }

    #[test]
    fn ascii_values_wrap() {
        let value = "word ".repeat(30);
        let h = GenericHeader::new("X-Long", value.trim_end()).unwrap();
        let encoded = h.field_value(FieldFormat::Encoded);
        assert!(encoded.contains("\r\n "));
        assert_eq!(encoded.replace("\r\n ", " "), value.trim_end());
    }

    #[test]
    fn parse_multiple_splits_on_commas() {
        let headers = GenericMultiHeader::parse_multiple("X-Tag: one, two,three").unwrap();
        let values: Vec<_> = headers.iter().map(|h| h.field_value(FieldFormat::Raw)).collect();
        assert_eq!(values, ["one", "two", "three"]);
        assert!(headers.iter().all(|h| h.allows_multiple()));
        let single = GenericMultiHeader::parse_multiple("X-Tag: ,leading").unwrap();
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].field_value(FieldFormat::Raw), ",leading");
    }
}
