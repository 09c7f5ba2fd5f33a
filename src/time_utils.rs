// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting and calendar-day arithmetic.

use chrono::{DateTime, Days, FixedOffset, NaiveDate, SecondsFormat, TimeDelta, TimeZone, Utc};

/// Format a UTC timestamp as fixed-width RFC3339 with millisecond precision
/// and a `Z` suffix, so string order matches chronological order.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Serde adapter storing timestamps via [`format_utc_rfc3339`].
pub mod rfc3339_millis {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_utc_rfc3339(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

/// The calendar day `now` falls on in the given offset.
pub fn local_date(now: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    now.with_timezone(&offset).date_naive()
}

/// First instant of `date` in the given offset.
pub fn start_of_day(date: NaiveDate, offset: FixedOffset) -> DateTime<Utc> {
    // A fixed offset has no gaps, so local midnight always maps to one instant.
    offset
        .from_local_datetime(&date.and_time(chrono::NaiveTime::MIN))
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| date.and_time(chrono::NaiveTime::MIN).and_utc())
}

/// Inclusive bounds of a calendar day: start-of-day to 23:59:59.999.
pub fn day_bounds(date: NaiveDate, offset: FixedOffset) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = start_of_day(date, offset);
    let end = start + TimeDelta::days(1) - TimeDelta::milliseconds(1);
    (start, end)
}

/// The day `days` before `today`, saturating at the earliest representable date.
pub fn days_before(today: NaiveDate, days: u32) -> NaiveDate {
    today
        .checked_sub_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MIN)
}

/// Short chart label such as `Oct 19`.
pub fn chart_label(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

/// Parse a client-supplied instant: either a full RFC3339 timestamp or a bare
/// `YYYY-MM-DD` day, which maps to the start of that day in `offset`.
pub fn parse_instant(raw: &str, offset: FixedOffset) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(truncate_to_millis(dt.with_timezone(&Utc)));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|date| start_of_day(date, offset))
}

/// Like [`parse_instant`], but a bare day maps to the last millisecond of
/// that day, for inclusive upper bounds.
pub fn parse_instant_end(raw: &str, offset: FixedOffset) -> Option<DateTime<Utc>> {
    match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
        Ok(date) => Some(day_bounds(date, offset).1),
        Err(_) => parse_instant(raw, offset),
    }
}

/// Parse a client-supplied calendar day. Full timestamps are reduced to the
/// day they fall on in `offset`.
pub fn parse_day(raw: &str, offset: FixedOffset) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| local_date(dt.with_timezone(&Utc), offset))
}

/// Drop sub-millisecond precision so stored and parsed values compare equal.
pub fn truncate_to_millis(date: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(date.timestamp_millis()).unwrap_or(date)
}
