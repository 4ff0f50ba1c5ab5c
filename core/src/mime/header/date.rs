/*
 * date.rs
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

//! Date header (RFC 5322 section 3.6.1).

use chrono::{DateTime, FixedOffset, TimeZone};

use crate::mime::error::Result;
use crate::mime::header_value;
use crate::mime::rfc2047;
use crate::mime::rfc5322::parse_rfc5322_date;

use super::{split_expected, Encoding, FieldFormat, HeaderField};

/// The origination date. The text is kept as received; [`Date::date_time`]
/// interprets it, accepting the obsolete syntax too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Date {
    value: String,
}

impl Date {
    pub fn new(value: &str) -> Result<Self> {
        header_value::assert_valid("Date", value)?;
        Ok(Self {
            value: value.to_string(),
        })
    }

    pub fn from_date_time<Tz: TimeZone>(date_time: &DateTime<Tz>) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self {
            value: date_time.to_rfc2822(),
        }
    }

    pub fn parse(line: &str) -> Result<Self> {
        let (_, value) = split_expected(line, "Date", &["date"])?;
        Self::new(&rfc2047::mime_decode_value(&value))
    }

    pub fn date_time(&self) -> Option<DateTime<FixedOffset>> {
        parse_rfc5322_date(&self.value)
    }
}

impl HeaderField for Date {
    fn field_name(&self) -> &str {
        "Date"
    }

    fn field_value(&self, _format: FieldFormat) -> String {
        self.value.clone()
    }

    fn encoding(&self) -> Encoding {
        Encoding::Ascii
    }

    fn set_encoding(&mut self, _encoding: Encoding) {}

    fn clone_box(&self) -> Box<dyn HeaderField> {
        Box::new(self.clone())
    }
}
