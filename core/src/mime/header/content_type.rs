/*
 * content_type.rs
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

//! Content-Type header (RFC 2045 section 5).

use crate::mime::error::{HeaderError, Result};
use crate::mime::parameter::{parse_parameters, serialize_parameters, ParameterMap};

use super::{split_expected, unfold, Encoding, FieldFormat, HeaderField};

/// `type/subtype`: letters and `-` in the type, letters, digits and `.+-`
/// in the subtype.
fn is_valid_mime_type(value: &str) -> bool {
    let Some((primary, sub)) = value.split_once('/') else {
        return false;
    };
    !primary.is_empty()
        && primary.bytes().all(|b| b.is_ascii_alphabetic() || b == b'-')
        && !sub.is_empty()
        && sub
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'+' | b'-'))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType {
    mime_type: String,
    parameters: ParameterMap,
    encoding: Option<Encoding>,
}

impl ContentType {
    pub fn new(mime_type: &str) -> Result<Self> {
        let mut header = Self {
            mime_type: String::new(),
            parameters: ParameterMap::new(),
            encoding: None,
        };
        header.set_type(mime_type)?;
        Ok(header)
    }

    pub fn parse(line: &str) -> Result<Self> {
        let (_, value) = split_expected(line, "Content-Type", &["contenttype"])?;
        let value = unfold(&value);
        let (mime_type, tail) = match value.split_once(';') {
            Some((t, rest)) => (t, Some(rest)),
            None => (value.as_str(), None),
        };
        let mut header = Self::new(mime_type.trim())?;
        if let Some(tail) = tail {
            header.parameters = parse_parameters(tail)?;
        }
        Ok(header)
    }

    pub fn set_type(&mut self, mime_type: &str) -> Result<()> {
        if !is_valid_mime_type(mime_type) {
            return Err(HeaderError::InvalidFieldValue {
                header: "Content-Type",
                value: mime_type.to_string(),
            });
        }
        self.mime_type = mime_type.to_string();
        Ok(())
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn primary_type(&self) -> &str {
        self.mime_type.split('/').next().unwrap_or("")
    }

    pub fn sub_type(&self) -> &str {
        self.mime_type.split_once('/').map_or("", |(_, sub)| sub)
    }

    pub fn is_primary_type(&self, t: &str) -> bool {
        self.primary_type().eq_ignore_ascii_case(t)
    }

    pub fn is_mime_type(&self, primary: &str, sub: &str) -> bool {
        self.is_primary_type(primary) && self.sub_type().eq_ignore_ascii_case(sub)
    }

    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters.get(name)
    }

    pub fn parameters(&self) -> &ParameterMap {
        &self.parameters
    }

    pub fn add_parameter(&mut self, name: &str, value: &str) -> Result<()> {
        self.parameters.insert(name, value)
    }

    pub fn remove_parameter(&mut self, name: &str) -> bool {
        self.parameters.remove(name).is_some()
    }
}

impl HeaderField for ContentType {
    fn field_name(&self) -> &str {
        "Content-Type"
    }

    fn field_value(&self, format: FieldFormat) -> String {
        serialize_parameters("Content-Type", &self.mime_type, &self.parameters, format)
    }

    fn encoding(&self) -> Encoding {
        let detected = if self.parameters.iter().all(|(_, v)| Encoding::detect(v) == Encoding::Ascii) {
            Encoding::Ascii
        } else {
            Encoding::Utf8
        };
        Encoding::resolve(self.encoding, detected)
    }

    fn set_encoding(&mut self, encoding: Encoding) {
        self.encoding = Some(encoding);
    }

    fn delimiter(&self) -> Option<&'static str> {
        Some(";")
    }

    fn clone_box(&self) -> Box<dyn HeaderField> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_with_parameters() {
        let h = ContentType::parse("Content-Type: text/plain; charset=\"UTF-8\"; format=flowed").unwrap();
        assert!(h.is_mime_type("TEXT", "plain"));
        assert_eq!(h.primary_type(), "text");
        assert_eq!(h.sub_type(), "plain");
        assert_eq!(h.parameter("Charset"), Some("UTF-8"));
        assert_eq!(
            h.to_line(),
            "Content-Type: text/plain; charset=\"UTF-8\"; format=\"flowed\""
        );
        assert_eq!(ContentType::parse(&h.to_line()).unwrap(), h);
    }

    #[test]
    fn folded_multipart() {
        let h = ContentType::parse(
            "Content-Type: multipart/alternative;\r\n boundary=\"----=_Part_1\"",
        )
        .unwrap();
        assert_eq!(h.parameter("boundary"), Some("----=_Part_1"));
    }

    #[test]
    fn invalid_types() {
        for t in ["text", "text/", "/plain", "te xt/plain", "text/pl ain", "1text/plain"] {
            assert!(ContentType::new(t).is_err(), "{}", t);
        }
        assert!(ContentType::new("application/vnd.ms-excel").is_ok());
        assert!(ContentType::new("application/atom+xml").is_ok());
        assert!(ContentType::parse("Content-Type: text/plain; a*x=1").is_err());
    }

    #[test]
    fn parameter_edits() {
        let mut h = ContentType::new("text/html").unwrap();
        h.add_parameter("charset", "us-ascii").unwrap();
        assert!(h.add_parameter("charset", "x\r\ny").is_err());
        assert!(h.remove_parameter("CHARSET"));
        assert!(!h.remove_parameter("charset"));
        assert_eq!(h.field_value(FieldFormat::Raw), "text/html");
    }
}
