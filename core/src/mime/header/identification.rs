/*
 * identification.rs
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

//! Message identification headers (RFC 5322 section 3.6.4): Message-ID,
//! In-Reply-To and References.

use std::env;
use std::fmt::Write as _;
use std::process;

use chrono::Utc;
use sha1::{Digest, Sha1};

use crate::mime::error::{HeaderError, Result};
use crate::mime::rfc2047;
use crate::mime::rfc5322::parse_message_id_list;
use crate::mime::utils::FOLDING;

use super::{split_expected, unfold, Encoding, FieldFormat, HeaderField};

fn check_id(header: &'static str, id: &str) -> Result<()> {
    if id.is_empty() || id.contains(['\r', '\n']) || id.chars().any(char::is_whitespace) {
        return Err(HeaderError::InvalidFieldValue {
            header,
            value: id.to_string(),
        });
    }
    Ok(())
}

fn trim_id(id: &str) -> &str {
    id.trim().trim_start_matches('<').trim_end_matches('>')
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageId {
    id: String,
}

impl MessageId {
    /// Set an explicit id; surrounding angle brackets are optional.
    pub fn new(id: &str) -> Result<Self> {
        let id = trim_id(id);
        check_id("Message-ID", id)?;
        Ok(Self { id: id.to_string() })
    }

    /// A fresh id: SHA-1 of the time, process id and a random number, at
    /// the local host name (`HOSTNAME`, or `localhost`).
    pub fn generate() -> Self {
        let mut hasher = Sha1::new();
        let now = Utc::now();
        hasher.update(now.timestamp().to_string().as_bytes());
        hasher.update(now.timestamp_subsec_nanos().to_string().as_bytes());
        hasher.update(process::id().to_string().as_bytes());
        hasher.update(rand::random::<u64>().to_string().as_bytes());
        let digest = hasher.finalize();
        let mut id = String::with_capacity(digest.len() * 2 + 16);
        for b in digest.iter() {
            let _ = write!(id, "{:02x}", b);
        }
        let host = env::var("HOSTNAME")
            .ok()
            .filter(|h| !h.is_empty() && !h.chars().any(|c| c.is_whitespace() || c == '>'))
            .unwrap_or_else(|| "localhost".to_string());
        id.push('@');
        id.push_str(&host);
        Self { id }
    }

    pub fn parse(line: &str) -> Result<Self> {
        let (_, value) = split_expected(line, "Message-ID", &["messageid"])?;
        Self::new(&unfold(&value))
    }

    /// The id without angle brackets.
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl HeaderField for MessageId {
    fn field_name(&self) -> &str {
        "Message-ID"
    }

    fn field_value(&self, _format: FieldFormat) -> String {
        format!("<{}>", self.id)
    }

    fn encoding(&self) -> Encoding {
        Encoding::Ascii
    }

    /// Message ids are always ASCII.
    fn set_encoding(&mut self, _encoding: Encoding) {}

    fn clone_box(&self) -> Box<dyn HeaderField> {
        Box::new(self.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentificationKind {
    InReplyTo,
    References,
}

impl IdentificationKind {
    pub fn field_name(self) -> &'static str {
        match self {
            IdentificationKind::InReplyTo => "In-Reply-To",
            IdentificationKind::References => "References",
        }
    }

    fn key(self) -> &'static str {
        match self {
            IdentificationKind::InReplyTo => "inreplyto",
            IdentificationKind::References => "references",
        }
    }
}

/// A list of message ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentificationField {
    kind: IdentificationKind,
    ids: Vec<String>,
}

impl IdentificationField {
    pub fn new<I, S>(kind: IdentificationKind, ids: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut header = Self {
            kind,
            ids: Vec::new(),
        };
        header.set_ids(ids)?;
        Ok(header)
    }

    pub fn parse(line: &str, kind: IdentificationKind) -> Result<Self> {
        let (_, value) = split_expected(line, kind.field_name(), &[kind.key()])?;
        let value = rfc2047::mime_decode_value(&unfold(&value));
        Self::new(kind, parse_message_id_list(&value))
    }

    pub fn kind(&self) -> IdentificationKind {
        self.kind
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn set_ids<I, S>(&mut self, ids: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut checked = Vec::new();
        for id in ids {
            let id = trim_id(id.as_ref());
            check_id(self.kind.field_name(), id)?;
            checked.push(id.to_string());
        }
        self.ids = checked;
        Ok(())
    }
}

impl HeaderField for IdentificationField {
    fn field_name(&self) -> &str {
        self.kind.field_name()
    }

    fn field_value(&self, _format: FieldFormat) -> String {
        self.ids
            .iter()
            .map(|id| format!("<{}>", id))
            .collect::<Vec<_>>()
            .join(FOLDING)
    }

    fn encoding(&self) -> Encoding {
        Encoding::Ascii
    }

    fn set_encoding(&mut self, _encoding: Encoding) {}

    fn clone_box(&self) -> Box<dyn HeaderField> {
        Box::new(self.clone())
    }
}
