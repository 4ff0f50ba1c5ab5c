/*
 * mime_version.rs
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

//! MIME-Version header (RFC 2045 section 4).

use std::fmt;

use crate::mime::error::{HeaderError, Result};

use super::{split_expected, Encoding, FieldFormat, HeaderField};

const DEFAULT_VERSION: &str = "1.0";

/// `digits.digits`
fn is_valid_version(s: &str) -> bool {
    match s.split_once('.') {
        Some((major, minor)) => {
            !major.is_empty()
                && !minor.is_empty()
                && major.bytes().all(|b| b.is_ascii_digit())
                && minor.bytes().all(|b| b.is_ascii_digit())
        }
        None => false,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MimeVersion {
    version: String,
}

impl Default for MimeVersion {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION.to_string(),
        }
    }
}

impl MimeVersion {
    pub fn new(version: &str) -> Result<Self> {
        let version = version.trim();
        if !is_valid_version(version) {
            return Err(HeaderError::InvalidFieldValue {
                header: "MIME-Version",
                value: version.to_string(),
            });
        }
        Ok(Self {
            version: version.to_string(),
        })
    }

    pub fn parse(line: &str) -> Result<Self> {
        let (_, value) = split_expected(line, "MIME-Version", &["mimeversion"])?;
        // a trailing comment such as "1.0 (produced by X)" is allowed
        let version = value.split('(').next().unwrap_or("");
        Self::new(version)
    }

    pub fn as_str(&self) -> &str {
        &self.version
    }
}

impl fmt::Display for MimeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.version)
    }
}

impl HeaderField for MimeVersion {
    fn field_name(&self) -> &str {
        "MIME-Version"
    }

    fn field_value(&self, _format: FieldFormat) -> String {
        self.version.clone()
    }

    fn encoding(&self) -> Encoding {
        Encoding::Ascii
    }

    fn set_encoding(&mut self, _encoding: Encoding) {}

    fn clone_box(&self) -> Box<dyn HeaderField> {
        Box::new(self.clone())
    }
}
