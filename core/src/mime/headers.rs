/*
 * headers.rs
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

//! An ordered collection of header fields with deferred parsing.
//!
//! Lines are stored as text and only parsed into [`Header`] values when they
//! are read, unless the collection is in a non-ASCII encoding, in which case
//! they are parsed on insertion so the encoding can be applied.

use std::sync::Arc;

use log::debug;

use super::error::{HeaderError, Result};
use super::header::{split_header_line, Encoding, FieldFormat, Header, HeaderField, HeaderLocator};
use super::utils::{normalize_header_name, EOL};

#[derive(Debug, Clone)]
enum Slot {
    Deferred(String),
    Parsed(Header),
}

#[derive(Debug, Clone)]
struct Entry {
    key: String,
    slot: Slot,
}

/// Result of a lookup: the first instance of a single-occurrence header, or
/// every instance of a header that may repeat.
#[derive(Debug)]
pub enum HeaderMatch<'a> {
    Single(&'a Header),
    Multiple(Vec<&'a Header>),
}

impl<'a> HeaderMatch<'a> {
    /// The first matching header.
    pub fn first(&self) -> Option<&'a Header> {
        match self {
            HeaderMatch::Single(h) => Some(h),
            HeaderMatch::Multiple(all) => all.first().copied(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            HeaderMatch::Single(_) => 1,
            HeaderMatch::Multiple(all) => all.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A value of [`Headers::to_array`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderValues {
    Single(String),
    Multiple(Vec<String>),
}

/// Anything [`Headers::add_headers`] accepts.
#[derive(Debug, Clone)]
pub enum HeaderInput {
    Header(Header),
    Line(String),
    Pair(String, String),
}

impl From<Header> for HeaderInput {
    fn from(header: Header) -> Self {
        HeaderInput::Header(header)
    }
}

impl From<&str> for HeaderInput {
    fn from(line: &str) -> Self {
        HeaderInput::Line(line.to_string())
    }
}

impl From<String> for HeaderInput {
    fn from(line: String) -> Self {
        HeaderInput::Line(line)
    }
}

impl From<(&str, &str)> for HeaderInput {
    fn from((name, value): (&str, &str)) -> Self {
        HeaderInput::Pair(name.to_string(), value.to_string())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Headers {
    entries: Vec<Entry>,
    encoding: Option<Encoding>,
    locator: Arc<HeaderLocator>,
}

/// `^[\x21-\x39\x3B-\x7E]+:` : a field name followed by a colon.
fn starts_header(line: &str) -> bool {
    match line.find(':') {
        Some(colon) if colon > 0 => line.as_bytes()[..colon]
            .iter()
            .all(|&b| (0x21..=0x7e).contains(&b) && b != b':'),
        _ => false,
    }
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_locator(locator: Arc<HeaderLocator>) -> Self {
        Self {
            locator,
            ..Self::default()
        }
    }

    /// Parse a header block: one field per line, folded continuation lines
    /// starting with whitespace, optionally terminated by a blank line.
    pub fn parse(raw: &str) -> Result<Self> {
        Self::parse_with_locator(raw, Arc::new(HeaderLocator::new()))
    }

    pub fn parse_with_locator(raw: &str, locator: Arc<HeaderLocator>) -> Result<Self> {
        let mut headers = Self::with_locator(locator);
        let mut current: Option<String> = None;
        let mut blank_lines = 0;
        for line in raw.split('\n') {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if line.is_empty() {
                blank_lines += 1;
                if blank_lines > 2 {
                    return Err(HeaderError::MalformedHeaderLine(
                        "Malformed header detected".to_string(),
                    ));
                }
                continue;
            }
            if blank_lines > 1 {
                return Err(HeaderError::MalformedHeaderLine(
                    "Malformed header detected".to_string(),
                ));
            }
            if starts_header(line) {
                if let Some(previous) = current.take() {
                    headers.add_header_line(&previous)?;
                }
                current = Some(line.to_string());
            } else if line.starts_with([' ', '\t']) {
                match current.as_mut() {
                    Some(previous) => {
                        previous.push(' ');
                        previous.push_str(line.trim());
                    }
                    None => {
                        return Err(HeaderError::MalformedHeaderLine(format!(
                            "Line \"{}\" does not match header format!",
                            line
                        )));
                    }
                }
            } else {
                return Err(HeaderError::MalformedHeaderLine(format!(
                    "Line \"{}\" does not match header format!",
                    line
                )));
            }
        }
        if let Some(previous) = current {
            headers.add_header_line(&previous)?;
        }
        Ok(headers)
    }

    pub fn locator(&self) -> &HeaderLocator {
        &self.locator
    }

    /// Mutable access to the registry; copies it first if it is shared.
    pub fn locator_mut(&mut self) -> &mut HeaderLocator {
        Arc::make_mut(&mut self.locator)
    }

    pub fn set_locator(&mut self, locator: Arc<HeaderLocator>) {
        self.locator = locator;
    }

    /// The collection encoding; ASCII unless set.
    pub fn encoding(&self) -> Encoding {
        self.encoding.unwrap_or_default()
    }

    /// Set the encoding and apply it to every header, parsing deferred ones.
    pub fn set_encoding(&mut self, encoding: Encoding) -> Result<()> {
        self.encoding = Some(encoding);
        self.force_loading()?;
        for entry in &mut self.entries {
            if let Slot::Parsed(header) = &mut entry.slot {
                header.set_encoding(encoding);
            }
        }
        Ok(())
    }

    /// Add a complete `Name: value` line.
    pub fn add_header_line(&mut self, line: &str) -> Result<()> {
        let (name, _) = split_header_line(line)?;
        let key = normalize_header_name(&name);
        if self.encoding() != Encoding::Ascii {
            let parsed = self.locator.parse_line(line)?;
            for header in parsed {
                self.push_parsed(header);
            }
            return Ok(());
        }
        self.entries.push(Entry {
            key,
            slot: Slot::Deferred(line.to_string()),
        });
        Ok(())
    }

    pub fn add_header_value(&mut self, name: &str, value: &str) -> Result<()> {
        self.add_header_line(&format!("{}: {}", name, value))
    }

    /// Append a header. Existing headers of the same name are kept; use
    /// [`Headers::remove_header`] first to replace them.
    pub fn add_header(&mut self, header: Header) -> Result<()> {
        split_header_line(&header.to_line())?;
        self.push_parsed(header);
        Ok(())
    }

    pub fn add_headers<I, T>(&mut self, headers: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<HeaderInput>,
    {
        for input in headers {
            match input.into() {
                HeaderInput::Header(header) => self.add_header(header)?,
                HeaderInput::Line(line) => self.add_header_line(&line)?,
                HeaderInput::Pair(name, value) => self.add_header_value(&name, &value)?,
            }
        }
        Ok(())
    }

    fn push_parsed(&mut self, mut header: Header) {
        if let Some(encoding) = self.encoding {
            header.set_encoding(encoding);
        }
        self.entries.push(Entry {
            key: normalize_header_name(header.field_name()),
            slot: Slot::Parsed(header),
        });
    }

    /// Parse the entry at `index` if it is still deferred. Additional headers
    /// produced by a multi-value line are inserted right after it. Returns
    /// false when the line parsed to nothing and its slot was removed.
    fn materialize(&mut self, index: usize) -> Result<bool> {
        let line = match &self.entries[index].slot {
            Slot::Deferred(line) => line.clone(),
            Slot::Parsed(_) => return Ok(true),
        };
        debug!("parsing deferred header {:?}", self.entries[index].key);
        let mut parsed = self.locator.parse_line(&line)?.into_iter();
        let Some(mut first) = parsed.next() else {
            debug!("dropping empty header {:?}", self.entries[index].key);
            self.entries.remove(index);
            return Ok(false);
        };
        if let Some(encoding) = self.encoding {
            first.set_encoding(encoding);
        }
        self.entries[index].slot = Slot::Parsed(first);
        for (offset, mut extra) in parsed.enumerate() {
            if let Some(encoding) = self.encoding {
                extra.set_encoding(encoding);
            }
            let key = normalize_header_name(extra.field_name());
            self.entries.insert(
                index + 1 + offset,
                Entry {
                    key,
                    slot: Slot::Parsed(extra),
                },
            );
        }
        Ok(true)
    }

    fn materialize_key(&mut self, key: &str) -> Result<()> {
        let mut index = 0;
        while index < self.entries.len() {
            if self.entries[index].key != key || self.materialize(index)? {
                index += 1;
            }
        }
        Ok(())
    }

    /// Parse every deferred line.
    pub fn force_loading(&mut self) -> Result<()> {
        let mut index = 0;
        while index < self.entries.len() {
            if self.materialize(index)? {
                index += 1;
            }
        }
        Ok(())
    }

    /// Look up `name`. Repeatable kinds return every instance; others the
    /// first one.
    pub fn get(&mut self, name: &str) -> Result<Option<HeaderMatch<'_>>> {
        let key = normalize_header_name(name);
        if !self.entries.iter().any(|e| e.key == key) {
            return Ok(None);
        }
        self.materialize_key(&key)?;
        let mut found = self.entries.iter().filter_map(|e| match &e.slot {
            Slot::Parsed(header) if e.key == key => Some(header),
            _ => None,
        });
        if self.locator.kind_for(name).allows_multiple() {
            let all: Vec<&Header> = found.collect();
            Ok((!all.is_empty()).then_some(HeaderMatch::Multiple(all)))
        } else {
            Ok(found.next().map(HeaderMatch::Single))
        }
    }

    pub fn has(&self, name: &str) -> bool {
        let key = normalize_header_name(name);
        self.entries.iter().any(|e| e.key == key)
    }

    /// Remove every instance of `name`; returns how many were removed.
    pub fn remove_header(&mut self, name: &str) -> usize {
        let key = normalize_header_name(name);
        let before = self.entries.len();
        self.entries.retain(|e| e.key != key);
        before - self.entries.len()
    }

    /// Remove the first header equal to `header`.
    pub fn remove_header_instance(&mut self, header: &Header) -> bool {
        let key = normalize_header_name(header.field_name());
        let locator = &self.locator;
        let position = self.entries.iter().position(|e| {
            e.key == key
                && match &e.slot {
                    Slot::Parsed(parsed) => parsed == header,
                    Slot::Deferred(line) => locator
                        .parse_line(line)
                        .map(|parsed| parsed.iter().any(|p| p == header))
                        .unwrap_or(false),
                }
        });
        match position {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn clear_headers(&mut self) {
        self.entries.clear();
    }

    /// Number of entries, deferred lines included.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every header in insertion order, parsing deferred lines first.
    pub fn iter(&mut self) -> Result<impl Iterator<Item = &Header> + '_> {
        self.force_loading()?;
        Ok(self.entries.iter().filter_map(|e| match &e.slot {
            Slot::Parsed(header) => Some(header),
            Slot::Deferred(_) => None,
        }))
    }

    /// The serialized block: one CRLF terminated line per header.
    pub fn to_string_lines(&mut self) -> Result<String> {
        let mut out = String::new();
        for header in self.iter()? {
            out.push_str(&header.to_line());
            out.push_str(EOL);
        }
        Ok(out)
    }

    /// Field name to value(s), in order of first appearance. Repeatable
    /// headers collect all their values.
    pub fn to_array(&mut self, format: FieldFormat) -> Result<Vec<(String, HeaderValues)>> {
        let mut out: Vec<(String, HeaderValues)> = Vec::new();
        for header in self.iter()? {
            let value = header.field_value(format);
            let name = header.field_name();
            if header.allows_multiple() {
                match out.iter_mut().find(|(n, _)| n == name) {
                    Some((_, HeaderValues::Multiple(values))) => values.push(value),
                    _ => out.push((name.to_string(), HeaderValues::Multiple(vec![value]))),
                }
            } else {
                out.push((name.to_string(), HeaderValues::Single(value)));
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mime::header::{CustomHeader, GenericHeader, HeaderKind, Subject};

    #[test]
    fn lines_are_deferred_until_read() {
        let mut headers = Headers::parse("Subject: hi\r\nX-Bad: value\r\n").unwrap();
        assert_eq!(headers.count(), 2);
        assert!(matches!(headers.entries[0].slot, Slot::Deferred(_)));
        let subject = headers.get("subject").unwrap().unwrap();
        assert_eq!(subject.first().unwrap().field_value(FieldFormat::Raw), "hi");
        assert!(matches!(headers.entries[0].slot, Slot::Parsed(_)));
        assert!(matches!(headers.entries[1].slot, Slot::Deferred(_)));
    }

    #[test]
    fn deferred_errors_surface_on_read() {
        let mut headers = Headers::new();
        headers.add_header_line("Content-Type: not a type").unwrap();
        assert!(headers.has("content-type"));
        assert!(matches!(
            headers.get("Content-Type"),
            Err(HeaderError::InvalidFieldValue { .. })
        ));
    }

    #[test]
    fn utf8_collections_parse_eagerly() {
        let mut headers = Headers::new();
        headers.set_encoding(Encoding::Utf8).unwrap();
        headers.add_header_line("Subject: hello").unwrap();
        assert!(matches!(headers.entries[0].slot, Slot::Parsed(_)));
        assert_eq!(
            headers.to_string_lines().unwrap(),
            "Subject: =?UTF-8?Q?hello?=\r\n"
        );
        assert!(headers.add_header_line("Content-Type: bogus").is_err());
    }

    #[test]
    fn multi_value_lines_expand_in_place() {
        let mut locator = HeaderLocator::new();
        locator.add("X-Tag", crate::mime::header::HeaderKind::GenericMulti);
        let mut headers =
            Headers::parse_with_locator("X-Tag: a, b\r\nSubject: s\r\n", Arc::new(locator)).unwrap();
        headers.force_loading().unwrap();
        let names: Vec<_> = headers
            .iter()
            .unwrap()
            .map(|h| h.field_value(FieldFormat::Raw))
            .collect();
        assert_eq!(names, ["a", "b", "s"]);
        assert_eq!(headers.count(), 3);
    }

    #[test]
    fn every_insertion_path_appends() {
        let mut headers = Headers::new();
        headers.add_header(Header::Subject(Subject::new("one").unwrap())).unwrap();
        headers.add_header(Header::Subject(Subject::new("two").unwrap())).unwrap();
        assert_eq!(headers.count(), 2);
        headers.add_header_line("Subject: three").unwrap();
        headers.add_header_value("Subject", "four").unwrap();
        headers.add_headers(["Subject: five"]).unwrap();
        assert_eq!(headers.count(), 5);
        let first = headers.get("subject").unwrap().unwrap();
        assert_eq!(first.first().unwrap().field_value(FieldFormat::Raw), "one");

        headers.add_header_line("Received: a").unwrap();
        headers.add_header_line("Received: b").unwrap();
        match headers.get("received").unwrap().unwrap() {
            HeaderMatch::Multiple(all) => assert_eq!(all.len(), 2),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn lookups_ignore_name_punctuation() {
        let mut headers =
            Headers::parse("Content-Type: text/plain\r\nReply-To: a@b.com\r\nX-0: 0\r\n").unwrap();
        assert!(headers.has("ContentType"));
        assert!(headers.has("content_type"));
        assert!(headers.has("replyto"));
        assert!(headers.has("reply_to"));
        assert!(headers.get("Reply.To").unwrap().is_some());
        assert!(!headers.has("X-000"));
        assert_eq!(headers.remove_header("contenttype"), 1);
    }

    fn parse_nothing(_line: &str) -> Result<Vec<Header>> {
        Ok(Vec::new())
    }

    #[test]
    fn empty_parse_results_do_not_hide_neighbours() {
        let mut locator = HeaderLocator::new();
        locator.add(
            "X-Drop",
            HeaderKind::Custom(CustomHeader {
                parse: parse_nothing,
                multiple: false,
            }),
        );
        let raw = "X-Drop: a\r\nX-Keep: b\r\nX-Drop: c\r\nX-Drop: d\r\nX-Last: e\r\n";
        let mut headers = Headers::parse_with_locator(raw, Arc::new(locator.clone())).unwrap();
        assert_eq!(
            headers.to_string_lines().unwrap(),
            "X-Keep: b\r\nX-Last: e\r\n"
        );
        assert_eq!(headers.count(), 2);

        let mut headers = Headers::parse_with_locator(raw, Arc::new(locator)).unwrap();
        assert!(headers.get("x-drop").unwrap().is_none());
        assert_eq!(headers.count(), 2);
    }

    #[test]
    fn ascii_collection_still_encodes_unicode() {
        let mut headers = Headers::new();
        headers.set_encoding(Encoding::Ascii).unwrap();
        headers
            .add_header_line("Subject: =?UTF-8?Q?Gr=C3=BC=C3=9Fe?=")
            .unwrap();
        headers.add_header_line("X-Plain: hi").unwrap();
        assert_eq!(
            headers.to_string_lines().unwrap(),
            "Subject: =?UTF-8?Q?Gr=C3=BC=C3=9Fe?=\r\nX-Plain: hi\r\n"
        );
    }

    #[test]
    fn remove_instance() {
        let mut headers = Headers::parse("X-A: 1\r\nX-A: 2\r\n").unwrap();
        let target = Header::Generic(GenericHeader::new("X-A", "2").unwrap());
        assert!(headers.remove_header_instance(&target));
        assert!(!headers.remove_header_instance(&target));
        assert_eq!(headers.count(), 1);
        assert_eq!(headers.remove_header("x-a"), 1);
        assert!(headers.is_empty());
    }
}
