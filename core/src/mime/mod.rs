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

//! RFC 5322 header fields: validation, RFC 2047 encoded words, RFC 2231
//! parameters, typed headers and the header collection.

pub mod header;
pub mod header_name;
pub mod header_value;
pub mod parameter;
pub mod rfc2047;
pub mod rfc5322;

mod error;
mod headers;
mod quoted_printable;
mod utils;

pub use error::{HeaderError, Result};
pub use header::{
    AddressKind, AddressListHeader, ContentDisposition, ContentTransferEncoding, ContentType,
    CustomHeader, Date, Encoding, FieldFormat, GenericHeader, GenericMultiHeader, Header,
    HeaderField, HeaderKind, HeaderLocator, IdentificationField, IdentificationKind, MessageId,
    MimeVersion, Received, Sender, Subject, TransferEncoding,
};
pub use headers::{HeaderInput, HeaderMatch, HeaderValues, Headers};
pub use parameter::{ParameterMap, MAX_PARAMETER_LENGTH};
pub use rfc2047::{can_be_encoded, mime_decode_value, mime_encode_value};
pub use rfc5322::{is_valid_email, Address, AddressList};
pub use utils::{is_token, is_token_char, wordwrap, EOL, FOLDING, MAX_LINE_LENGTH};
