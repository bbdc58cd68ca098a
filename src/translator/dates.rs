//! End-date parsing for outbound requests.
//!
//! The primary format is an RFC 3339 / ISO-8601 instant. Models written by older
//! templates carry the legacy textual form `EEE MMM dd HH:mm:ss zzz yyyy`
//! (for example `Fri Jan 01 00:00:00 GMT 2100`), which is still accepted. The
//! weekday is not checked against the date.
//! Anything else is treated as "no end date" rather than an error.

use chrono::{DateTime, FixedOffset, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use tracing::{debug, warn};

const LEGACY_FORMAT: &str = "%b %d %H:%M:%S %Y";

/// Parses a caller-supplied end date. `None` means the request should omit it.
pub fn parse_end_date(end_date: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = end_date?.trim();

    match DateTime::parse_from_rfc3339(raw) {
        Ok(instant) => return Some(instant.with_timezone(&Utc)),
        Err(e) => debug!(end_date = raw, error = %e, "Not an ISO-8601 instant, trying legacy format"),
    }

    let parsed = parse_legacy(raw);
    if parsed.is_none() {
        debug!(end_date = raw, "Unparsable end date, treating as absent");
    }
    parsed
}

/// Renders an instant the way Read reports it back (`2100-01-01T00:00:00Z`).
pub fn format_end_date(end_date: &DateTime<Utc>) -> String {
    end_date.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn parse_legacy(raw: &str) -> Option<DateTime<Utc>> {
    let fields: Vec<&str> = raw.split_whitespace().collect();
    let [_weekday, month, day, time, zone, year] = fields.as_slice() else {
        return None;
    };

    let local =
        NaiveDateTime::parse_from_str(&format!("{month} {day} {time} {year}"), LEGACY_FORMAT).ok()?;
    let Some(seconds) = zone_offset_seconds(zone) else {
        warn!(end_date = raw, zone = *zone, "Unrecognized time zone in legacy end date, dropping it");
        return None;
    };
    let offset = FixedOffset::east_opt(seconds)?;
    let instant = offset.from_local_datetime(&local).single()?;
    Some(instant.with_timezone(&Utc))
}

fn zone_offset_seconds(zone: &str) -> Option<i32> {
    let hours = match zone.to_ascii_uppercase().as_str() {
        "UTC" | "GMT" | "UT" | "Z" => 0,
        "EST" => -5,
        "EDT" => -4,
        "CST" => -6,
        "CDT" => -5,
        "MST" => -7,
        "MDT" => -6,
        "PST" => -8,
        "PDT" => -7,
        "CET" => 1,
        "CEST" => 2,
        "JST" => 9,
        other => return numeric_offset_seconds(other),
    };
    Some(hours * 3600)
}

// GMT+05:30, UTC-0800, +0100
fn numeric_offset_seconds(zone: &str) -> Option<i32> {
    let rest = zone
        .strip_prefix("GMT")
        .or_else(|| zone.strip_prefix("UTC"))
        .unwrap_or(zone);
    if rest.is_empty() {
        return Some(0);
    }

    let (sign, digits) = if let Some(digits) = rest.strip_prefix('+') {
        (1, digits)
    } else {
        (-1, rest.strip_prefix('-')?)
    };
    let digits = digits.replace(':', "");
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let (hours, minutes) = match digits.len() {
        1 | 2 => (digits.parse::<i32>().ok()?, 0),
        4 => (digits[..2].parse::<i32>().ok()?, digits[2..].parse::<i32>().ok()?),
        _ => return None,
    };
    Some(sign * (hours * 3600 + minutes * 60))
}
