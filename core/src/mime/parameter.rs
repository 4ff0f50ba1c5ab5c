/*
 * parameter.rs
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

//! MIME header parameters (RFC 2045 section 5.1) with RFC 2231 continuations
//! and extended values, shared by Content-Type and Content-Disposition.

use log::trace;
use log::warn;
use percent_encoding::{percent_decode_str, percent_encode, AsciiSet, CONTROLS};

use super::error::{HeaderError, Result};
use super::header::FieldFormat;
use super::header_value;
use super::rfc2047;
use super::utils::{is_printable, is_token, FOLDING, MAX_LINE_LENGTH};

/// Longest `name="value"` rendering kept on a single segment.
pub const MAX_PARAMETER_LENGTH: usize = 76;

/// RFC 2231 attribute-char complement: what must be percent-encoded.
const ATTRIBUTE_CHAR: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'*')
    .add(b'\'')
    .add(b'%')
    .add(b'(')
    .add(b')')
    .add(b'<')
    .add(b'>')
    .add(b'@')
    .add(b',')
    .add(b';')
    .add(b':')
    .add(b'\\')
    .add(b'"')
    .add(b'/')
    .add(b'[')
    .add(b']')
    .add(b'?')
    .add(b'=');

/// Insertion-ordered parameters; names are compared case-insensitively and
/// stored lower-cased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterMap {
    entries: Vec<(String, String)>,
}

impl ParameterMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Set a parameter, validating the name and value. An existing parameter
    /// of the same name keeps its position.
    pub fn insert(&mut self, name: &str, value: &str) -> Result<()> {
        validate(name, value)?;
        let name = name.to_ascii_lowercase();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.entries.push((name, value.to_string())),
        }
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        let index = self
            .entries
            .iter()
            .position(|(n, _)| n.eq_ignore_ascii_case(name))?;
        Some(self.entries.remove(index).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

fn validate(name: &str, value: &str) -> Result<()> {
    if !is_token(name) {
        return Err(HeaderError::InvalidParameter {
            parameter: name.to_string(),
            reason: "name must be an RFC 2045 token".to_string(),
        });
    }
    if name.len() + 5 >= MAX_PARAMETER_LENGTH {
        return Err(HeaderError::InvalidParameter {
            parameter: name.to_string(),
            reason: "name too long".to_string(),
        });
    }
    header_value::assert_valid(name, value)
}

/// One `name[*N][*]=value` segment before continuations are resolved.
struct Segment {
    index: usize,
    extended: bool,
    value: String,
}

enum Pending {
    Plain(String, String),
    Extended(String, String),
    Split(String, Vec<Segment>),
}

/// Parse the parameter list following the value of a MIME header, i.e. the
/// text after the first `;`.
pub fn parse_parameters(tail: &str) -> Result<ParameterMap> {
    let mut pending: Vec<Pending> = Vec::new();
    for segment in split_segments(tail) {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        let Some(eq) = segment.find('=') else {
            trace!("skipping parameter segment without value: {:?}", segment);
            continue;
        };
        let name = segment[..eq].trim().to_ascii_lowercase();
        let value = unquote(segment[eq + 1..].trim());
        match name.find('*') {
            None => pending.push(Pending::Plain(name, value)),
            Some(star) => {
                let base = name[..star].to_string();
                let rest = &name[star + 1..];
                if rest.is_empty() {
                    pending.push(Pending::Extended(base, value));
                    continue;
                }
                let (digits, extended) = match rest.strip_suffix('*') {
                    Some(d) => (d, true),
                    None => (rest, false),
                };
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(HeaderError::InvalidParameterContinuation {
                        parameter: name.clone(),
                        reason: format!("invalid segment index {:?}", digits),
                    });
                }
                let index = digits.parse::<usize>().map_err(|_| {
                    HeaderError::InvalidParameterContinuation {
                        parameter: name.clone(),
                        reason: format!("invalid segment index {:?}", digits),
                    }
                })?;
                let segment = Segment {
                    index,
                    extended,
                    value,
                };
                let existing = pending.iter_mut().find_map(|p| match p {
                    Pending::Split(b, segments) if *b == base => Some(segments),
                    _ => None,
                });
                match existing {
                    Some(segments) => segments.push(segment),
                    None => pending.push(Pending::Split(base, vec![segment])),
                }
            }
        }
    }

    let mut map = ParameterMap::new();
    let mut extended_names: Vec<String> = Vec::new();
    for p in pending {
        match p {
            Pending::Plain(name, value) => {
                // an RFC 2231 form of the same parameter takes precedence
                if extended_names.contains(&name) {
                    continue;
                }
                map.insert(&name, &rfc2047::mime_decode_value(&value))?;
            }
            Pending::Extended(name, value) => {
                let decoded = decode_extended(&name, &value);
                map.insert(&name, &decoded)?;
                extended_names.push(name);
            }
            Pending::Split(name, segments) => {
                let joined = join_segments(&name, segments)?;
                map.insert(&name, &joined)?;
                extended_names.push(name);
            }
        }
    }
    Ok(map)
}

/// Split on `;` outside double quotes; backslash escapes inside quotes.
fn split_segments(s: &str) -> Vec<&str> {
    let bytes = s.as_bytes();
    let mut out = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut pos = 0;
    while pos < bytes.len() {
        match bytes[pos] {
            b'\\' if in_quotes => pos += 1,
            b'"' => in_quotes = !in_quotes,
            b';' if !in_quotes => {
                out.push(&s[start..pos]);
                start = pos + 1;
            }
            _ => {}
        }
        pos += 1;
    }
    if start < s.len() {
        out.push(&s[start..]);
    }
    out
}

/// Remove the quotes and quoted pairs of a quoted-string; bare values only
/// lose stray quote characters and whitespace.
fn unquote(raw: &str) -> String {
    let Some(inner) = raw.strip_prefix('"') else {
        return raw
            .trim_matches(|c: char| c == '"' || c.is_whitespace())
            .to_string();
    };
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            }
            '"' => break,
            c => out.push(c),
        }
    }
    out
}

/// Split `charset'language'text`; a value without the two apostrophes has no
/// charset.
fn split_charset(value: &str) -> (Option<&str>, &str) {
    let mut parts = value.splitn(3, '\'');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(charset), Some(_language), Some(text)) => (Some(charset), text),
        _ => (None, value),
    }
}

fn decode_bytes(name: &str, charset: Option<&str>, bytes: &[u8]) -> String {
    let charset = match charset {
        Some(c) if !c.is_empty() => c,
        _ => "utf-8",
    };
    match rfc2047::decode_charset(charset, bytes) {
        Some(text) => text,
        None => {
            warn!("unknown charset {:?} in parameter {:?}, read as UTF-8", charset, name);
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}

fn decode_extended(name: &str, value: &str) -> String {
    let (charset, text) = split_charset(value);
    let bytes: Vec<u8> = percent_decode_str(text).collect();
    decode_bytes(name, charset, &bytes)
}

fn join_segments(name: &str, mut segments: Vec<Segment>) -> Result<String> {
    segments.sort_by_key(|s| s.index);
    for (expected, segment) in segments.iter().enumerate() {
        if segment.index != expected {
            return Err(HeaderError::InvalidParameterContinuation {
                parameter: name.to_string(),
                reason: "incomplete continuation".to_string(),
            });
        }
    }
    let mut charset = None;
    let mut bytes = Vec::new();
    for segment in &segments {
        if segment.extended {
            let text = if segment.index == 0 {
                let (c, text) = split_charset(&segment.value);
                charset = c;
                text
            } else {
                segment.value.as_str()
            };
            bytes.extend(percent_decode_str(text));
        } else {
            bytes.extend_from_slice(segment.value.as_bytes());
        }
    }
    Ok(decode_bytes(name, charset, &bytes))
}

fn escape_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn render_single(name: &str, value: &str, format: FieldFormat) -> String {
    if format == FieldFormat::Encoded && !is_printable(value) {
        // one encoded word, no folding inside the quotes
        format!("{}=\"{}\"", name, rfc2047::encode_utf8(value, usize::MAX))
    } else {
        format!("{}=\"{}\"", name, escape_quoted(value))
    }
}

/// Render `head` followed by its parameters as the value of `header_name`.
///
/// A parameter that fits in fewer than 76 columns goes on the current line
/// when there is room, otherwise on a new folded line. Longer parameters are
/// split into RFC 2231 continuations, one per folded line: percent-encoded
/// UTF-8 segments when encoding non-ASCII values, quoted segments otherwise.
pub fn serialize_parameters(
    header_name: &str,
    head: &str,
    parameters: &ParameterMap,
    format: FieldFormat,
) -> String {
    let mut out = String::from(head);
    let mut column = header_name.len() + 2 + head.len();
    for (name, value) in parameters.iter() {
        let single = render_single(name, value, format);
        if single.len() < MAX_PARAMETER_LENGTH {
            if column + 2 + single.len() <= MAX_LINE_LENGTH {
                out.push_str("; ");
                column += 2 + single.len();
            } else {
                out.push(';');
                out.push_str(FOLDING);
                column = 1 + single.len();
            }
            out.push_str(&single);
            continue;
        }
        let segments = if format == FieldFormat::Encoded && !is_printable(value) {
            encoded_segments(name, value)
        } else {
            quoted_segments(name, value)
        };
        for segment in segments {
            out.push(';');
            out.push_str(FOLDING);
            column = 1 + segment.len();
            out.push_str(&segment);
        }
    }
    out
}

fn quoted_segments(name: &str, value: &str) -> Vec<String> {
    let budget = MAX_PARAMETER_LENGTH.saturating_sub(name.len() + 8).max(1);
    let mut segments = Vec::new();
    let mut chunk = String::new();
    for c in value.chars() {
        let width = if c == '"' || c == '\\' { 2 } else { c.len_utf8() };
        if !chunk.is_empty() && chunk.len() + width > budget {
            segments.push(format!("{}*{}=\"{}\"", name, segments.len(), chunk));
            chunk.clear();
        }
        if c == '"' || c == '\\' {
            chunk.push('\\');
        }
        chunk.push(c);
    }
    if !chunk.is_empty() || segments.is_empty() {
        segments.push(format!("{}*{}=\"{}\"", name, segments.len(), chunk));
    }
    segments
}

fn encoded_segments(name: &str, value: &str) -> Vec<String> {
    const CHARSET_PREFIX: &str = "UTF-8''";
    let budget = MAX_PARAMETER_LENGTH.saturating_sub(name.len() + 6).max(1);
    let mut segments = Vec::new();
    let mut chunk = String::from(CHARSET_PREFIX);
    let mut buf = [0u8; 4];
    for c in value.chars() {
        let piece = percent_encode(c.encode_utf8(&mut buf).as_bytes(), ATTRIBUTE_CHAR).to_string();
        let empty = if segments.is_empty() {
            chunk.len() == CHARSET_PREFIX.len()
        } else {
            chunk.is_empty()
        };
        if !empty && chunk.len() + piece.len() > budget {
            segments.push(format!("{}*{}*={}", name, segments.len(), chunk));
            chunk.clear();
        }
        chunk.push_str(&piece);
    }
    segments.push(format!("{}*{}*={}", name, segments.len(), chunk));
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_parameters() {
        let p = parse_parameters(" charset=us-ascii; format=\"flowed\"").unwrap();
        assert_eq!(p.len(), 2);
        assert_eq!(p.get("charset"), Some("us-ascii"));
        assert_eq!(p.get("FORMAT"), Some("flowed"));
        let names: Vec<_> = p.iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["charset", "format"]);
    }

    #[test]
    fn parse_quoted_semicolons_and_escapes() {
        let p = parse_parameters("name=\"a;b\\\"c\"; other=x").unwrap();
        assert_eq!(p.get("name"), Some("a;b\"c"));
        assert_eq!(p.get("other"), Some("x"));
    }

    #[test]
    fn parse_skips_segments_without_value() {
        let p = parse_parameters("junk; a=1;; b = 2 ").unwrap();
        assert_eq!(p.get("a"), Some("1"));
        assert_eq!(p.get("b"), Some("2"));
        assert_eq!(p.len(), 2);
    }

    #[test]
    fn parse_decodes_encoded_words() {
        let p = parse_parameters("filename=\"=?UTF-8?Q?Caf=C3=A9.txt?=\"").unwrap();
        assert_eq!(p.get("filename"), Some("Caf\u{e9}.txt"));
    }

    #[test]
    fn parse_extended_value() {
        let p = parse_parameters("title*=us-ascii'en-us'This%20is%20%2A%2A%2Afun%2A%2A%2A").unwrap();
        assert_eq!(p.get("title"), Some("This is ***fun***"));
        let p = parse_parameters("filename*=UTF-8''Caf%C3%A9.txt").unwrap();
        assert_eq!(p.get("filename"), Some("Caf\u{e9}.txt"));
        let p = parse_parameters("filename*=iso-8859-1''Andr%E9").unwrap();
        assert_eq!(p.get("filename"), Some("Andr\u{e9}"));
    }

    #[test]
    fn continuations_are_ordered_by_index() {
        let p = parse_parameters(
            "url*1=\"cs/\"; url*0=\"ftp://\"; url*2=\"file.txt\"",
        )
        .unwrap();
        assert_eq!(p.get("url"), Some("ftp://cs/file.txt"));
    }

    #[test]
    fn mixed_continuations() {
        let p = parse_parameters(
            "title*0*=us-ascii'en'This%20is%20even%20more%20; title*1*=%2A%2A%2Afun%2A%2A%2A%20; title*2=\"isn't it!\"",
        )
        .unwrap();
        assert_eq!(p.get("title"), Some("This is even more ***fun*** isn't it!"));
    }

    #[test]
    fn continuation_byte_join_before_charset() {
        // U+00E9 split between two segments
        let p = parse_parameters("name*0*=UTF-8''Caf%C3; name*1*=%A9").unwrap();
        assert_eq!(p.get("name"), Some("Caf\u{e9}"));
    }

    #[test]
    fn continuation_gap_fails() {
        let err = parse_parameters("name*0=\"a\"; name*2=\"c\"").unwrap_err();
        assert_eq!(
            err,
            HeaderError::InvalidParameterContinuation {
                parameter: "name".to_string(),
                reason: "incomplete continuation".to_string(),
            }
        );
    }

    #[test]
    fn continuation_bad_index_fails() {
        let err = parse_parameters("name*x=\"a\"").unwrap_err();
        assert!(matches!(
            err,
            HeaderError::InvalidParameterContinuation { ref parameter, .. } if parameter == "name*x"
        ));
    }

    #[test]
    fn long_names_rejected() {
        let name = "n".repeat(71);
        let err = parse_parameters(&format!("{}=v", name)).unwrap_err();
        assert!(matches!(err, HeaderError::InvalidParameter { ref reason, .. } if reason == "name too long"));
        assert!(parse_parameters(&format!("{}=v", "n".repeat(70))).is_ok());
    }

    #[test]
    fn injection_rejected() {
        let mut p = ParameterMap::new();
        assert!(p.insert("name", "a\r\nBcc: x@y").is_err());
        assert!(p.insert("bad name", "v").is_err());
        assert!(parse_parameters("name*=UTF-8''a%0D%0ABcc:%20x").is_err());
    }

    #[test]
    fn insert_keeps_position() {
        let mut p = ParameterMap::new();
        p.insert("a", "1").unwrap();
        p.insert("B", "2").unwrap();
        p.insert("A", "3").unwrap();
        let all: Vec<_> = p.iter().collect();
        assert_eq!(all, [("a", "3"), ("b", "2")]);
        assert_eq!(p.remove("b"), Some("2".to_string()));
        assert!(!p.contains("b"));
    }

    #[test]
    fn serialize_short_parameters_on_one_line() {
        let mut p = ParameterMap::new();
        p.insert("charset", "us-ascii").unwrap();
        assert_eq!(
            serialize_parameters("Content-Type", "text/plain", &p, FieldFormat::Raw),
            "text/plain; charset=\"us-ascii\""
        );
    }

    #[test]
    fn serialize_folds_when_line_is_full() {
        let mut p = ParameterMap::new();
        p.insert("boundary", &"b".repeat(40)).unwrap();
        p.insert("charset", "utf-8").unwrap();
        let out = serialize_parameters("Content-Type", "multipart/mixed", &p, FieldFormat::Raw);
        assert_eq!(
            out,
            format!(
                "multipart/mixed;\r\n boundary=\"{}\"; charset=\"utf-8\"",
                "b".repeat(40)
            )
        );
    }

    #[test]
    fn serialize_encodes_non_ascii_short_value() {
        let mut p = ParameterMap::new();
        p.insert("filename", "Caf\u{e9}.txt").unwrap();
        let out = serialize_parameters("Content-Disposition", "attachment", &p, FieldFormat::Encoded);
        assert_eq!(out, "attachment; filename=\"=?UTF-8?Q?Caf=C3=A9.txt?=\"");
        let back = parse_parameters(&out["attachment;".len()..]).unwrap();
        assert_eq!(back.get("filename"), Some("Caf\u{e9}.txt"));
    }

    #[test]
    fn serialize_long_ascii_value_as_continuations() {
        let value = "x".repeat(150);
        let mut p = ParameterMap::new();
        p.insert("filename", &value).unwrap();
        let out = serialize_parameters("Content-Disposition", "attachment", &p, FieldFormat::Encoded);
        assert!(out.starts_with("attachment;\r\n filename*0=\""));
        for line in out.split("\r\n").skip(1) {
            assert!(line.len() <= MAX_LINE_LENGTH);
        }
        let back = parse_parameters(&out["attachment;".len()..]).unwrap();
        assert_eq!(back.get("filename"), Some(value.as_str()));
    }

    #[test]
    fn serialize_long_unicode_value_as_extended_continuations() {
        let value = "\u{4e2d}\u{6587}".repeat(20);
        let mut p = ParameterMap::new();
        p.insert("filename", &value).unwrap();
        let out = serialize_parameters("Content-Disposition", "attachment", &p, FieldFormat::Encoded);
        assert!(out.starts_with("attachment;\r\n filename*0*=UTF-8''%E4%B8%AD"));
        assert!(out.contains(";\r\n filename*1*=%"));
        for line in out.split("\r\n").skip(1) {
            assert!(line.len() <= MAX_LINE_LENGTH);
        }
        let back = parse_parameters(&out["attachment;".len()..]).unwrap();
        assert_eq!(back.get("filename"), Some(value.as_str()));
    }
}
