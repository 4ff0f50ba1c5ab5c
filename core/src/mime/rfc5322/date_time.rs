/*
 * date_time.rs
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

//! RFC 5322 date-time parsing (section 3.3, with the obsolete forms of 4.3).

use chrono::{DateTime, FixedOffset};

/// Parse an RFC 5322 date-time string (e.g. "Fri, 21 Nov 1997 09:55:06 -0600").
/// Returns None on parse failure.
pub fn parse_rfc5322_date(value: &str) -> Option<DateTime<FixedOffset>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc2822(value)
        .ok()
        .or_else(|| parse_obsolete_date(value))
}

/// Obsolete formats: 2-digit year, optional seconds, legacy zone names,
/// trailing comments.
fn parse_obsolete_date(value: &str) -> Option<DateTime<FixedOffset>> {
    let value = match value.find('(') {
        Some(i) => &value[..i],
        None => value,
    };
    // day-of-week is informational
    let value = match value.find(',') {
        Some(i) => &value[i + 1..],
        None => value,
    };
    let mut tokens: Vec<String> = value.split_whitespace().map(str::to_string).collect();
    if tokens.len() < 4 {
        return None;
    }
    if let Some(year) = tokens.get_mut(2) {
        if year.len() == 2 && year.bytes().all(|b| b.is_ascii_digit()) {
            *year = expand_two_digit_year(year)?;
        }
    }
    match tokens.get_mut(4) {
        Some(zone) => *zone = convert_obsolete_timezone(zone).to_string(),
        None => tokens.push("+0000".to_string()),
    }
    let value = tokens.join(" ");
    DateTime::parse_from_str(&value, "%d %b %Y %H:%M:%S %z")
        .or_else(|_| DateTime::parse_from_str(&value, "%d %b %Y %H:%M %z"))
        .ok()
}

/// RFC 5322 4.3: 00-49 -> 2000-2049, 50-99 -> 1950-1999.
fn expand_two_digit_year(yy: &str) -> Option<String> {
    let yy: u32 = yy.parse().ok()?;
    let full = if yy <= 49 { 2000 + yy } else { 1900 + yy };
    Some(full.to_string())
}

fn convert_obsolete_timezone(zone: &str) -> &str {
    match zone.to_ascii_uppercase().as_str() {
        "GMT" | "UT" | "UTC" | "Z" => "+0000",
        "EST" => "-0500",
        "EDT" => "-0400",
        "CST" => "-0600",
        "CDT" => "-0500",
        "MST" => "-0700",
        "MDT" => "-0600",
        "PST" => "-0800",
        "PDT" => "-0700",
        _ => zone,
    }
}
