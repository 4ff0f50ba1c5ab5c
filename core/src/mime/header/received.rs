/*
 * received.rs
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

//! Received trace header (RFC 5322 section 3.6.7); one per hop.

use crate::mime::error::Result;
use crate::mime::header_value;
use crate::mime::rfc2047;

use super::{split_expected, Encoding, FieldFormat, HeaderField};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Received {
    value: String,
}

impl Received {
    pub fn new(value: &str) -> Result<Self> {
        header_value::assert_valid("Received", value)?;
        Ok(Self {
            value: value.to_string(),
        })
    }

    pub fn parse(line: &str) -> Result<Self> {
        let (_, value) = split_expected(line, "Received", &["received"])?;
        Self::new(&rfc2047::mime_decode_value(&value))
    }
}

impl HeaderField for Received {
    fn field_name(&self) -> &str {
        "Received"
    }

    fn field_value(&self, _format: FieldFormat) -> String {
        self.value.clone()
    }

    fn encoding(&self) -> Encoding {
        Encoding::Ascii
    }

    fn set_encoding(&mut self, _encoding: Encoding) {}

    fn allows_multiple(&self) -> bool {
        true
    }

    fn clone_box(&self) -> Box<dyn HeaderField> {
        Box::new(self.clone())
    }
}
