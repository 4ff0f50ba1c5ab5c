/*
 * content_transfer_encoding.rs
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

//! Content-Transfer-Encoding header (RFC 2045 section 6).

use std::fmt;

use crate::mime::error::{HeaderError, Result};

use super::{split_expected, Encoding, FieldFormat, HeaderField};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferEncoding {
    #[default]
    SevenBit,
    EightBit,
    QuotedPrintable,
    Base64,
    Binary,
}

impl TransferEncoding {
    pub fn as_str(self) -> &'static str {
        match self {
            TransferEncoding::SevenBit => "7bit",
            TransferEncoding::EightBit => "8bit",
            TransferEncoding::QuotedPrintable => "quoted-printable",
            TransferEncoding::Base64 => "base64",
            TransferEncoding::Binary => "binary",
        }
    }

    /// Case-insensitive mechanism name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "7bit" => Some(TransferEncoding::SevenBit),
            "8bit" => Some(TransferEncoding::EightBit),
            "quoted-printable" => Some(TransferEncoding::QuotedPrintable),
            "base64" => Some(TransferEncoding::Base64),
            "binary" => Some(TransferEncoding::Binary),
            _ => None,
        }
    }
}

impl fmt::Display for TransferEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContentTransferEncoding {
    transfer_encoding: TransferEncoding,
}

impl ContentTransferEncoding {
    pub fn new(transfer_encoding: TransferEncoding) -> Self {
        Self { transfer_encoding }
    }

    pub fn parse(line: &str) -> Result<Self> {
        let (_, value) = split_expected(
            line,
            "Content-Transfer-Encoding",
            &["contenttransferencoding"],
        )?;
        let transfer_encoding =
            TransferEncoding::from_name(&value).ok_or_else(|| HeaderError::InvalidFieldValue {
                header: "Content-Transfer-Encoding",
                value: value.clone(),
            })?;
        Ok(Self { transfer_encoding })
    }

    pub fn transfer_encoding(&self) -> TransferEncoding {
        self.transfer_encoding
    }
}

impl HeaderField for ContentTransferEncoding {
    fn field_name(&self) -> &str {
        "Content-Transfer-Encoding"
    }

    fn field_value(&self, _format: FieldFormat) -> String {
        self.transfer_encoding.as_str().to_string()
    }

    fn encoding(&self) -> Encoding {
        Encoding::Ascii
    }

    fn set_encoding(&mut self, _encoding: Encoding) {}

    fn clone_box(&self) -> Box<dyn HeaderField> {
        Box::new(*self)
    }
}
