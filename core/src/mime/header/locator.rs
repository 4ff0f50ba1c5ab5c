/*
 * locator.rs
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

//! Registry from field names to header types.

use std::collections::HashMap;
use std::fmt;

use log::debug;

use crate::mime::error::Result;
use crate::mime::utils::normalize_header_name;

use super::{
    split_header_line, AddressKind, AddressListHeader, ContentDisposition,
    ContentTransferEncoding, ContentType, Date, GenericHeader, GenericMultiHeader, Header,
    IdentificationField, IdentificationKind, MessageId, MimeVersion, Received, Sender, Subject,
};

/// An application-defined header type: a parser from a complete line to one
/// or more headers, and whether the field may repeat.
#[derive(Clone, Copy)]
pub struct CustomHeader {
    pub parse: fn(&str) -> Result<Vec<Header>>,
    pub multiple: bool,
}

impl fmt::Debug for CustomHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomHeader")
            .field("multiple", &self.multiple)
            .finish_non_exhaustive()
    }
}

/// The header type a field name dispatches to.
#[derive(Debug, Clone, Copy)]
pub enum HeaderKind {
    Generic,
    GenericMulti,
    From,
    To,
    Cc,
    Bcc,
    ReplyTo,
    Sender,
    MessageId,
    InReplyTo,
    References,
    ContentType,
    ContentDisposition,
    ContentTransferEncoding,
    Date,
    MimeVersion,
    Subject,
    Received,
    Custom(CustomHeader),
}

impl HeaderKind {
    /// Parse a complete line as this kind. Most kinds yield exactly one
    /// header; multi-value kinds may yield several.
    pub fn parse(self, line: &str) -> Result<Vec<Header>> {
        let header = match self {
            HeaderKind::Generic => Header::Generic(GenericHeader::parse(line)?),
            HeaderKind::GenericMulti => {
                return Ok(GenericMultiHeader::parse_multiple(line)?
                    .into_iter()
                    .map(Header::GenericMulti)
                    .collect());
            }
            HeaderKind::From => Header::From(AddressListHeader::parse(line, AddressKind::From)?),
            HeaderKind::To => Header::To(AddressListHeader::parse(line, AddressKind::To)?),
            HeaderKind::Cc => Header::Cc(AddressListHeader::parse(line, AddressKind::Cc)?),
            HeaderKind::Bcc => Header::Bcc(AddressListHeader::parse(line, AddressKind::Bcc)?),
            HeaderKind::ReplyTo => {
                Header::ReplyTo(AddressListHeader::parse(line, AddressKind::ReplyTo)?)
            }
            HeaderKind::Sender => Header::Sender(Sender::parse(line)?),
            HeaderKind::MessageId => Header::MessageId(MessageId::parse(line)?),
            HeaderKind::InReplyTo => Header::InReplyTo(IdentificationField::parse(
                line,
                IdentificationKind::InReplyTo,
            )?),
            HeaderKind::References => Header::References(IdentificationField::parse(
                line,
                IdentificationKind::References,
            )?),
            HeaderKind::ContentType => Header::ContentType(ContentType::parse(line)?),
            HeaderKind::ContentDisposition => {
                Header::ContentDisposition(ContentDisposition::parse(line)?)
            }
            HeaderKind::ContentTransferEncoding => {
                Header::ContentTransferEncoding(ContentTransferEncoding::parse(line)?)
            }
            HeaderKind::Date => Header::Date(Date::parse(line)?),
            HeaderKind::MimeVersion => Header::MimeVersion(MimeVersion::parse(line)?),
            HeaderKind::Subject => Header::Subject(Subject::parse(line)?),
            HeaderKind::Received => Header::Received(Received::parse(line)?),
            HeaderKind::Custom(custom) => return (custom.parse)(line),
        };
        Ok(vec![header])
    }

    pub fn allows_multiple(self) -> bool {
        match self {
            HeaderKind::GenericMulti | HeaderKind::Received => true,
            HeaderKind::Custom(custom) => custom.multiple,
            _ => false,
        }
    }
}

const DEFAULT_PLUGINS: &[(&str, HeaderKind)] = &[
    ("bcc", HeaderKind::Bcc),
    ("cc", HeaderKind::Cc),
    ("contentdisposition", HeaderKind::ContentDisposition),
    ("contenttype", HeaderKind::ContentType),
    ("contenttransferencoding", HeaderKind::ContentTransferEncoding),
    ("date", HeaderKind::Date),
    ("from", HeaderKind::From),
    ("inreplyto", HeaderKind::InReplyTo),
    ("messageid", HeaderKind::MessageId),
    ("mimeversion", HeaderKind::MimeVersion),
    ("received", HeaderKind::Received),
    ("references", HeaderKind::References),
    ("replyto", HeaderKind::ReplyTo),
    ("sender", HeaderKind::Sender),
    ("subject", HeaderKind::Subject),
    ("to", HeaderKind::To),
];

/// Maps field names to header kinds.
///
/// Names are looked up case-insensitively with `-`, `_`, `.` and spaces
/// ignored, so `Content-Type`, `content_type` and `ContentType` are one
/// entry. Share it between collections with `Arc`; a collection that changes
/// its registry gets its own copy.
#[derive(Debug, Clone)]
pub struct HeaderLocator {
    plugins: HashMap<String, HeaderKind>,
}

impl Default for HeaderLocator {
    fn default() -> Self {
        Self {
            plugins: DEFAULT_PLUGINS
                .iter()
                .map(|(name, kind)| (name.to_string(), *kind))
                .collect(),
        }
    }
}

impl HeaderLocator {
    /// A registry with the standard header set.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<HeaderKind> {
        self.plugins.get(&normalize_header_name(name)).copied()
    }

    pub fn get_or(&self, name: &str, default: HeaderKind) -> HeaderKind {
        self.get(name).unwrap_or(default)
    }

    pub fn has(&self, name: &str) -> bool {
        self.plugins.contains_key(&normalize_header_name(name))
    }

    pub fn add(&mut self, name: &str, kind: HeaderKind) {
        let key = normalize_header_name(name);
        debug!("registering header {:?} as {:?}", key, kind);
        self.plugins.insert(key, kind);
    }

    pub fn remove(&mut self, name: &str) -> Option<HeaderKind> {
        let key = normalize_header_name(name);
        debug!("unregistering header {:?}", key);
        self.plugins.remove(&key)
    }

    /// The kind a line with field name `name` dispatches to.
    pub fn kind_for(&self, name: &str) -> HeaderKind {
        self.get_or(name, HeaderKind::Generic)
    }

    /// Parse a complete `Name: value` line with the registered type, or as a
    /// generic header when the name is unknown.
    pub fn parse_line(&self, line: &str) -> Result<Vec<Header>> {
        let (name, _) = split_header_line(line)?;
        self.kind_for(&name).parse(line)
    }
}
