/*
 * rfc2047.rs
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

//! RFC 2047 encoded words: Q encoding of header text and decoding of both Q
//! and B words, plus the folding rules applied to header values on output.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use encoding_rs::{Encoding as Charset, UTF_8};
use log::warn;

use super::error::{HeaderError, Result};
use super::header::{Encoding, HeaderField};
use super::quoted_printable;
use super::utils::{wordwrap, FOLDING, MAX_LINE_LENGTH};

const SUFFIX: &str = "?=";

/// Lenient about padding: plenty of producers drop the trailing `=`.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Fold or encode `value` for output as the value of `header`.
///
/// Unstructured headers are word-wrapped at 78 columns while ASCII, and become
/// Q encoded words once the header is in UTF-8. Structured headers fold after
/// each occurrence of their delimiter. Anything else is returned as is.
pub fn wrap(value: &str, header: &dyn HeaderField) -> String {
    if header.is_unstructured() {
        if header.encoding() == Encoding::Utf8 {
            return encode_utf8(value, MAX_LINE_LENGTH);
        }
        return wordwrap(value, MAX_LINE_LENGTH, FOLDING);
    }
    if let Some(delimiter) = header.delimiter() {
        let mut glue = String::with_capacity(delimiter.len() + FOLDING.len());
        glue.push_str(delimiter);
        glue.push_str(FOLDING);
        return value.split(delimiter).collect::<Vec<_>>().join(&glue);
    }
    value.to_string()
}

/// Encode `value` as a sequence of Q encoded words in `charset`.
///
/// Each word is at most `line_length - 1` bytes so that, preceded by the
/// folding space, every output line fits in `line_length`. Words are only
/// ever split between characters and are joined with CRLF SP.
pub fn mime_encode_value(value: &str, charset: &str, line_length: usize) -> Result<String> {
    let target = CharsetTarget::resolve(charset)?;
    let mut chars = Vec::with_capacity(value.len());
    for c in value.chars() {
        chars.push(target.encode_char(c, charset)?);
    }
    Ok(assemble_words(&chars, charset, line_length))
}

/// True when `value` can be represented in `charset`.
pub fn can_be_encoded(value: &str, charset: &str) -> bool {
    mime_encode_value(value, charset, MAX_LINE_LENGTH).is_ok()
}

pub(crate) fn encode_utf8(value: &str, line_length: usize) -> String {
    let chars: Vec<Vec<u8>> = value
        .chars()
        .map(|c| {
            let mut buf = [0u8; 4];
            c.encode_utf8(&mut buf).as_bytes().to_vec()
        })
        .collect();
    assemble_words(&chars, "UTF-8", line_length)
}

fn assemble_words(chars: &[Vec<u8>], charset: &str, line_length: usize) -> String {
    if chars.is_empty() {
        return String::new();
    }
    let prefix = format!("=?{}?Q?", charset);
    let budget = line_length.saturating_sub(prefix.len() + 3).max(1);
    let mut out = String::new();
    let mut word = String::new();
    for bytes in chars {
        let need: usize = bytes.iter().map(|&b| quoted_printable::encoded_len(b)).sum();
        if !word.is_empty() && word.len() + need > budget {
            push_word(&mut out, &prefix, &word);
            word.clear();
        }
        for &b in bytes {
            quoted_printable::encode_byte(b, &mut word);
        }
    }
    push_word(&mut out, &prefix, &word);
    out
}

fn push_word(out: &mut String, prefix: &str, payload: &str) {
    if !out.is_empty() {
        out.push_str(FOLDING);
    }
    out.push_str(prefix);
    out.push_str(payload);
    out.push_str(SUFFIX);
}

enum CharsetTarget {
    Ascii,
    Other(&'static Charset),
}

impl CharsetTarget {
    fn resolve(charset: &str) -> Result<Self> {
        let label = charset.trim();
        // encoding_rs treats us-ascii as windows-1252, which would let 8-bit through
        if label.eq_ignore_ascii_case("us-ascii") || label.eq_ignore_ascii_case("ascii") {
            return Ok(CharsetTarget::Ascii);
        }
        Charset::for_label_no_replacement(label.as_bytes())
            .map(CharsetTarget::Other)
            .ok_or_else(|| HeaderError::Unencodable {
                charset: charset.to_string(),
            })
    }

    fn encode_char(&self, c: char, charset: &str) -> Result<Vec<u8>> {
        let mut buf = [0u8; 4];
        let s = c.encode_utf8(&mut buf);
        match self {
            CharsetTarget::Ascii if c.is_ascii() => Ok(s.as_bytes().to_vec()),
            CharsetTarget::Other(enc) => {
                let (bytes, _, unmappable) = enc.encode(s);
                if unmappable {
                    Err(HeaderError::Unencodable {
                        charset: charset.to_string(),
                    })
                } else {
                    Ok(bytes.into_owned())
                }
            }
            CharsetTarget::Ascii => Err(HeaderError::Unencodable {
                charset: charset.to_string(),
            }),
        }
    }
}

/// One lexical piece of a header value: literal text or a decoded word.
enum Piece<'a> {
    Text(&'a str),
    Word {
        charset: &'a str,
        bytes: Vec<u8>,
        raw: &'a str,
    },
}

/// Decode every encoded word in `value`.
///
/// Folds are unfolded first. Whitespace between adjacent encoded words is
/// dropped, and adjacent words in the same charset have their bytes joined
/// before conversion so a multi-byte character split across two words comes
/// out whole. Malformed words and words in unknown charsets stay literal.
pub fn mime_decode_value(value: &str) -> String {
    let unfolded = value.replace("\r\n ", " ").replace("\r\n\t", " ");
    if !unfolded.contains("=?") {
        return unfolded;
    }
    let pieces = scan(&unfolded);
    let mut out = String::with_capacity(unfolded.len());
    // pending run of same-charset words, with the raw text they came from
    let mut pending: Option<(&str, Vec<u8>, String)> = None;
    let mut i = 0;
    while i < pieces.len() {
        match &pieces[i] {
            Piece::Text(text) => {
                let between_words = pending.is_some()
                    && text.chars().all(|c| c == ' ' || c == '\t')
                    && matches!(pieces.get(i + 1), Some(Piece::Word { .. }));
                if between_words {
                    if let Some((_, _, raw)) = pending.as_mut() {
                        raw.push_str(text);
                    }
                } else {
                    flush(&mut pending, &mut out);
                    out.push_str(text);
                }
            }
            Piece::Word {
                charset,
                bytes,
                raw,
            } => {
                let same_charset = matches!(
                    &pending,
                    Some((current, _, _)) if current.eq_ignore_ascii_case(charset)
                );
                if same_charset {
                    if let Some((_, acc, acc_raw)) = pending.as_mut() {
                        acc.extend_from_slice(bytes);
                        acc_raw.push_str(raw);
                    }
                } else {
                    flush(&mut pending, &mut out);
                    pending = Some((*charset, bytes.clone(), raw.to_string()));
                }
            }
        }
        i += 1;
    }
    flush(&mut pending, &mut out);
    out
}

fn flush(pending: &mut Option<(&str, Vec<u8>, String)>, out: &mut String) {
    if let Some((charset, bytes, raw)) = pending.take() {
        match decode_charset(charset, &bytes) {
            Some(text) => out.push_str(&text),
            None => {
                warn!("unknown charset {:?} in encoded word, left undecoded", charset);
                // whitespace between the words was only dropped for decoded text
                out.push_str(&raw);
            }
        }
    }
}

/// Convert `bytes` from `charset` (an optional `*lang` suffix is ignored).
pub(crate) fn decode_charset(charset: &str, bytes: &[u8]) -> Option<String> {
    let label = charset.split('*').next().unwrap_or(charset).trim();
    if label.eq_ignore_ascii_case("utf-8") || label.eq_ignore_ascii_case("utf8") {
        return Some(UTF_8.decode_without_bom_handling(bytes).0.into_owned());
    }
    let enc = Charset::for_label_no_replacement(label.as_bytes())?;
    Some(enc.decode_without_bom_handling(bytes).0.into_owned())
}

fn scan(s: &str) -> Vec<Piece<'_>> {
    let bytes = s.as_bytes();
    let mut pieces = Vec::new();
    let mut literal_start = 0;
    let mut pos = 0;
    while let Some(offset) = find(bytes, pos, b"=?") {
        let start = offset;
        match parse_word(s, start) {
            Some((charset, decoded, end)) => {
                if literal_start < start {
                    pieces.push(Piece::Text(&s[literal_start..start]));
                }
                pieces.push(Piece::Word {
                    charset,
                    bytes: decoded,
                    raw: &s[start..end],
                });
                literal_start = end;
                pos = end;
            }
            None => pos = start + 2,
        }
    }
    if literal_start < s.len() {
        pieces.push(Piece::Text(&s[literal_start..]));
    }
    pieces
}

fn find(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    bytes
        .get(from..)?
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|i| from + i)
}

/// Parse `=?charset?X?payload?=` at `start`; returns the charset label, the
/// transfer-decoded bytes and the end offset.
fn parse_word(s: &str, start: usize) -> Option<(&str, Vec<u8>, usize)> {
    let bytes = s.as_bytes();
    let charset_start = start + 2;
    let q1 = charset_start + bytes[charset_start..].iter().position(|&b| b == b'?')?;
    let charset = &s[charset_start..q1];
    if charset.is_empty() || !charset.bytes().all(|b| b.is_ascii_graphic()) {
        return None;
    }
    let encoding = *bytes.get(q1 + 1)?;
    if bytes.get(q1 + 2) != Some(&b'?') {
        return None;
    }
    let payload_start = q1 + 3;
    let payload_end = find(bytes, payload_start, b"?=")?;
    let payload = &bytes[payload_start..payload_end];
    if payload.iter().any(|b| !b.is_ascii_graphic()) {
        return None;
    }
    let decoded = match encoding {
        b'q' | b'Q' => quoted_printable::decode(payload),
        b'b' | b'B' => LENIENT_BASE64.decode(payload).ok()?,
        _ => return None,
    };
    Some((charset, decoded, payload_end + 2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn encode_short_value() {
        assert_eq!(
            mime_encode_value("Caf\u{e9}", "UTF-8", 78).unwrap(),
            "=?UTF-8?Q?Caf=C3=A9?="
        );
        assert_eq!(
            mime_encode_value("a b", "UTF-8", 78).unwrap(),
            "=?UTF-8?Q?a=20b?="
        );
        assert_eq!(mime_encode_value("", "UTF-8", 78).unwrap(), "");
    }

    #[test]
    fn encode_other_charsets() {
        assert_eq!(
            mime_encode_value("Andr\u{e9}", "ISO-8859-1", 78).unwrap(),
            "=?ISO-8859-1?Q?Andr=E9?="
        );
        assert_eq!(
            mime_encode_value("plain", "us-ascii", 78).unwrap(),
            "=?us-ascii?Q?plain?="
        );
        assert!(matches!(
            mime_encode_value("Andr\u{e9}", "us-ascii", 78),
            Err(HeaderError::Unencodable { .. })
        ));
        assert!(mime_encode_value("\u{4e2d}", "ISO-8859-1", 78).is_err());
        assert!(mime_encode_value("x", "no-such-charset", 78).is_err());
        assert!(can_be_encoded("\u{4e2d}\u{6587}", "UTF-8"));
        assert!(!can_be_encoded("\u{4e2d}\u{6587}", "ISO-8859-1"));
    }

    #[test]
    fn long_values_fold_on_char_boundaries() {
        let value = "\u{fc}".repeat(40);
        let encoded = mime_encode_value(&value, "UTF-8", 78).unwrap();
        for (n, line) in encoded.split("\r\n").enumerate() {
            let len = if n == 0 { line.len() + 1 } else { line.len() };
            assert!(len <= 78, "line too long: {:?}", line);
            let body = line.trim_start();
            assert!(body.starts_with("=?UTF-8?Q?") && body.ends_with("?="));
            // =C3=BC never split
            assert_eq!((body.len() - 12) % 6, 0);
        }
        assert_eq!(mime_decode_value(&encoded), value);
    }

    #[test]
    fn decode_words() {
        assert_eq!(mime_decode_value("=?UTF-8?B?SGVsbG8=?="), "Hello");
        assert_eq!(mime_decode_value("=?UTF-8?B?SGVsbG8?="), "Hello");
        assert_eq!(mime_decode_value("=?UTF-8?Q?Hello_World?="), "Hello World");
        assert_eq!(mime_decode_value("Hello =?UTF-8?B?V29ybGQ=?=!"), "Hello World!");
        assert_eq!(
            mime_decode_value("=?ISO-8859-1?Q?Keld_J=F8rn_Simonsen?="),
            "Keld J\u{f8}rn Simonsen"
        );
        assert_eq!(mime_decode_value("=?UTF-8*en?Q?Caf=C3=A9?="), "Caf\u{e9}");
    }

    #[test]
    fn decode_drops_whitespace_between_words_only() {
        assert_eq!(mime_decode_value("=?ISO-8859-1?Q?a?= b"), "a b");
        assert_eq!(mime_decode_value("=?ISO-8859-1?Q?a?= =?ISO-8859-1?Q?b?="), "ab");
        assert_eq!(
            mime_decode_value("=?ISO-8859-1?Q?a?=\r\n =?ISO-8859-1?Q?b?="),
            "ab"
        );
        assert_eq!(mime_decode_value("=?ISO-8859-1?Q?a_b?="), "a b");
    }

    #[test]
    fn decode_joins_split_characters() {
        // U+00E9 split across two words
        assert_eq!(mime_decode_value("=?UTF-8?Q?=C3?= =?UTF-8?Q?=A9?="), "\u{e9}");
    }

    #[test]
    fn consecutive_folded_fields_decode_independently() {
        let first = "=?UTF-8?Q?Gr=C3=BC=C3=9Fe?=\r\n =?UTF-8?Q?_aus_K=C3?=";
        let second = "=?UTF-8?Q?caf=C3=A9?=\r\n =?ISO-8859-1?Q?_na=EFve?=";
        let first_alone = mime_decode_value(first);
        assert_eq!(mime_decode_value(second), "caf\u{e9} na\u{ef}ve");
        assert_eq!(mime_decode_value(first), first_alone);
        assert_eq!(mime_decode_value(second), "caf\u{e9} na\u{ef}ve");
        assert_eq!(
            mime_decode_value("=?UTF-8?Q?one?=\r\n =?UTF-8?Q?_two?="),
            "one two"
        );
    }

    #[test]
    fn decode_leaves_malformed_words() {
        assert_eq!(mime_decode_value("=?UTF-8?X?abc?="), "=?UTF-8?X?abc?=");
        assert_eq!(mime_decode_value("=?UTF-8?Q?abc"), "=?UTF-8?Q?abc");
        assert_eq!(mime_decode_value("=?bogus?Q?abc?="), "=?bogus?Q?abc?=");
        assert_eq!(mime_decode_value("plain text"), "plain text");
        assert_eq!(mime_decode_value("a\r\n b"), "a b");
    }

    proptest! {
        #[test]
        fn encode_decode_round_trip(s in "\\PC*") {
            let encoded = mime_encode_value(&s, "UTF-8", 78).unwrap();
            prop_assert_eq!(mime_decode_value(&encoded), s);
        }

        #[test]
        fn decode_never_panics(s in r"=\?.*\?.*\?.*\?=.*") {
            mime_decode_value(&s);
        }
    }
}
