/*
 * content_disposition.rs
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

//! Content-Disposition header (RFC 2183).

use crate::mime::error::{HeaderError, Result};
use crate::mime::parameter::{parse_parameters, serialize_parameters, ParameterMap};

use super::{split_expected, unfold, Encoding, FieldFormat, HeaderField};

const DEFAULT_DISPOSITION: &str = "inline";

fn is_valid_disposition(value: &str) -> bool {
    let mut bytes = value.bytes();
    match bytes.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    bytes.all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'+' | b'-'))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDisposition {
    disposition: String,
    parameters: ParameterMap,
    encoding: Option<Encoding>,
}

impl Default for ContentDisposition {
    fn default() -> Self {
        Self {
            disposition: DEFAULT_DISPOSITION.to_string(),
            parameters: ParameterMap::new(),
            encoding: None,
        }
    }
}

impl ContentDisposition {
    pub fn new(disposition: &str) -> Result<Self> {
        let mut header = Self::default();
        header.set_disposition(disposition)?;
        Ok(header)
    }

    pub fn parse(line: &str) -> Result<Self> {
        let (_, value) = split_expected(line, "Content-Disposition", &["contentdisposition"])?;
        let value = unfold(&value);
        let (disposition, tail) = match value.split_once(';') {
            Some((d, rest)) => (d.trim(), Some(rest)),
            None => (value.trim(), None),
        };
        let mut header = if disposition.is_empty() {
            Self::default()
        } else {
            Self::new(disposition)?
        };
        if let Some(tail) = tail {
            header.parameters = parse_parameters(tail)?;
        }
        Ok(header)
    }

    pub fn set_disposition(&mut self, disposition: &str) -> Result<()> {
        if !is_valid_disposition(disposition) {
            return Err(HeaderError::InvalidFieldValue {
                header: "Content-Disposition",
                value: disposition.to_string(),
            });
        }
        self.disposition = disposition.to_ascii_lowercase();
        Ok(())
    }

    pub fn disposition(&self) -> &str {
        &self.disposition
    }

    pub fn is_attachment(&self) -> bool {
        self.disposition == "attachment"
    }

    pub fn filename(&self) -> Option<&str> {
        self.parameters.get("filename")
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

impl HeaderField for ContentDisposition {
    fn field_name(&self) -> &str {
        "Content-Disposition"
    }

    fn field_value(&self, format: FieldFormat) -> String {
        serialize_parameters("Content-Disposition", &self.disposition, &self.parameters, format)
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
    fn quoted_semicolon_is_not_a_separator() {
        let h = ContentDisposition::parse(
            "Content-Disposition: attachment; filename=\"foo; bar.txt\"",
        )
        .unwrap();
        assert!(h.is_attachment());
        assert_eq!(h.parameters().len(), 1);
        assert_eq!(h.filename(), Some("foo; bar.txt"));
    }

    #[test]
    fn default_is_inline() {
        assert_eq!(ContentDisposition::default().disposition(), "inline");
        let h = ContentDisposition::parse("Content-Disposition: ; filename=a.txt").unwrap();
        assert_eq!(h.disposition(), "inline");
    }

    #[test]
    fn invalid_disposition() {
        assert!(ContentDisposition::new("1attachment").is_err());
        assert!(ContentDisposition::new("attach ment").is_err());
        assert!(ContentDisposition::new("X-Custom.Type+1").is_ok());
    }

    #[test]
    fn long_unicode_filename_round_trips() {
        let name = format!("{}.pdf", "\u{4e2d}\u{6587}\u{6587}\u{4ef6}".repeat(12));
        let mut h = ContentDisposition::new("attachment").unwrap();
        h.add_parameter("filename", &name).unwrap();
        let line = h.to_line();
        for l in line.split("\r\n") {
            assert!(l.len() <= 78, "{:?}", l);
        }
        let back = ContentDisposition::parse(&line).unwrap();
        assert_eq!(back.filename(), Some(name.as_str()));
    }

    #[test]
    fn continuation_gap_fails() {
        assert!(matches!(
            ContentDisposition::parse("Content-Disposition: attachment; filename*0=\"a\"; filename*2=\"c\""),
            Err(HeaderError::InvalidParameterContinuation { .. })
        ));
    }
}
