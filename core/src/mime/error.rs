/*
 * error.rs
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

//! Header errors.

use thiserror::Error;

/// Errors raised while parsing, validating or rendering header fields.
///
/// Every variant names the header, parameter or address that failed so that a
/// caller processing a whole message can report exactly which field was bad.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HeaderError {
    #[error("invalid header name {0:?}: must be printable US-ASCII except colon")]
    InvalidHeaderName(String),
    #[error("invalid header value for {header:?}: {reason}")]
    InvalidHeaderValue { header: String, reason: String },
    #[error("CRLF injection detected in {0}")]
    CrlfInjection(String),
    #[error("malformed header: {0}")]
    MalformedHeaderLine(String),
    #[error("invalid parameter {parameter:?}: {reason}")]
    InvalidParameter { parameter: String, reason: String },
    #[error("invalid continuation of parameter {parameter:?}: {reason}")]
    InvalidParameterContinuation { parameter: String, reason: String },
    #[error("invalid header line for {expected} string: got {found:?}")]
    UnexpectedHeaderType { expected: &'static str, found: String },
    #[error("invalid address {address:?}: {reason}")]
    InvalidAddress { address: String, reason: String },
    #[error("invalid {header} value {value:?}")]
    InvalidFieldValue { header: &'static str, value: String },
    #[error("value cannot be encoded in charset {charset:?}")]
    Unencodable { charset: String },
}

impl HeaderError {
    pub(crate) fn invalid_value(header: &str, reason: impl Into<String>) -> Self {
        HeaderError::InvalidHeaderValue {
            header: header.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_address(address: &str, reason: impl Into<String>) -> Self {
        HeaderError::InvalidAddress {
            address: address.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, HeaderError>;
