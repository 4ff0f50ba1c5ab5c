/*
 * subject.rs
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

//! Subject header: unstructured text, wrapped or encoded on output.

use crate::mime::error::{HeaderError, Result};
use crate::mime::header_value;
use crate::mime::rfc2047;

use super::{split_expected, Encoding, FieldFormat, HeaderField};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Subject {
    subject: String,
    encoding: Option<Encoding>,
}

impl Subject {
    pub fn new(subject: &str) -> Result<Self> {
        let mut header = Self::default();
        header.set_subject(subject)?;
        Ok(header)
    }

    /// Parse `Subject: text`. Encoded words are decoded and switch the header
    /// to UTF-8 so that it is re-encoded on output.
    pub fn parse(line: &str) -> Result<Self> {
        let (_, value) = split_expected(line, "Subject", &["subject"])?;
        let decoded = rfc2047::mime_decode_value(&value);
        let mut header = Self::new(&decoded)?;
        if decoded != value {
            header.encoding = Some(Encoding::Utf8);
        }
        Ok(header)
    }

    pub fn set_subject(&mut self, subject: &str) -> Result<()> {
        header_value::assert_valid("Subject", subject)?;
        if !rfc2047::can_be_encoded(subject, "UTF-8") {
            return Err(HeaderError::Unencodable {
                charset: "UTF-8".to_string(),
            });
        }
        self.subject = subject.to_string();
        Ok(())
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }
}

impl HeaderField for Subject {
    fn field_name(&self) -> &str {
        "Subject"
    }

    fn field_value(&self, format: FieldFormat) -> String {
        match format {
            FieldFormat::Raw => self.subject.clone(),
            FieldFormat::Encoded => rfc2047::wrap(&self.subject, self),
        }
    }

    fn encoding(&self) -> Encoding {
        Encoding::resolve(self.encoding, Encoding::detect(&self.subject))
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
