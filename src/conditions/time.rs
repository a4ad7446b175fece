//! time and calendar utilities for conditions
//!
//! supports:
//! - clock times: "16:00", "9:05", "16:00:30"
//! - relations against a time of day: before, after, at
//! - calendar components of a timestamp: weekday, day, month, year, week, dayOfYear
//! - weekday and month names: "mon", "monday", "jan", "january"

use std::cmp::Ordering;
use std::fmt;

use chrono::{Datelike, NaiveDateTime, NaiveTime, Timelike, Weekday};

/// a clock time parsed from a condition spec
///
/// when `second` is absent comparisons are done at minute granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeOfDay {
    pub hour: u32,
    pub minute: u32,
    pub second: Option<u32>,
}

impl TimeOfDay {
    pub fn new(hour: u32, minute: u32, second: Option<u32>) -> Self {
        Self {
            hour,
            minute,
            second,
        }
    }

    /// order `actual` relative to this time
    pub fn compare(&self, actual: NaiveTime) -> Ordering {
        let by_minute = (actual.hour(), actual.minute()).cmp(&(self.hour, self.minute));
        match self.second {
            Some(second) => by_minute.then(actual.second().cmp(&second)),
            None => by_minute,
        }
    }

    /// check if `actual` satisfies `relation` against this time
    pub fn matches(&self, relation: Relation, actual: NaiveTime) -> bool {
        let ordering = self.compare(actual);
        match relation {
            Relation::Before => ordering == Ordering::Less,
            Relation::After => ordering == Ordering::Greater,
            Relation::At => ordering == Ordering::Equal,
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)?;
        if let Some(second) = self.second {
            write!(f, ":{:02}", second)?;
        }
        Ok(())
    }
}

/// parse a clock time: "HH:MM" or "HH:MM:SS" (24h, one-digit hour allowed)
pub fn parse_time(s: &str) -> Option<TimeOfDay> {
    let parts: Vec<&str> = s.trim().split(':').collect();
    if parts.len() != 2 && parts.len() != 3 {
        return None;
    }

    let hour = parse_component(parts[0], 1)?;
    let minute = parse_component(parts[1], 2)?;
    let second = match parts.get(2) {
        Some(s) => Some(parse_component(s, 2)?),
        None => None,
    };

    if hour >= 24 || minute >= 60 || second.is_some_and(|s| s >= 60) {
        return None;
    }

    Some(TimeOfDay::new(hour, minute, second))
}

// one or two ascii digits, at least `min_len` of them
fn parse_component(s: &str, min_len: usize) -> Option<u32> {
    if s.len() < min_len || s.len() > 2 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// how a receipt's time of day relates to a condition's time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Before,
    After,
    At,
}

impl Relation {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "before" => Some(Relation::Before),
            "after" => Some(Relation::After),
            "at" => Some(Relation::At),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Relation::Before => "before",
            Relation::After => "after",
            Relation::At => "at",
        }
    }
}

/// calendar component extracted from a receipt timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateComponent {
    /// ISO weekday, monday = 1 ... sunday = 7
    Weekday,
    /// day of month, 1-31
    Day,
    /// month, 1-12
    Month,
    Year,
    /// ISO week number, 1-53
    Week,
    /// 1-366
    DayOfYear,
}

impl DateComponent {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "weekday" => Some(DateComponent::Weekday),
            "day" => Some(DateComponent::Day),
            "month" => Some(DateComponent::Month),
            "year" => Some(DateComponent::Year),
            "week" => Some(DateComponent::Week),
            "dayOfYear" => Some(DateComponent::DayOfYear),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DateComponent::Weekday => "weekday",
            DateComponent::Day => "day",
            DateComponent::Month => "month",
            DateComponent::Year => "year",
            DateComponent::Week => "week",
            DateComponent::DayOfYear => "dayOfYear",
        }
    }

    /// valid values for this component, `None` when unbounded
    pub fn range(&self) -> Option<(i32, i32)> {
        match self {
            DateComponent::Weekday => Some((1, 7)),
            DateComponent::Day => Some((1, 31)),
            DateComponent::Month => Some((1, 12)),
            DateComponent::Year => None,
            DateComponent::Week => Some((1, 53)),
            DateComponent::DayOfYear => Some((1, 366)),
        }
    }

    /// resolve a symbolic value ("sun", "march") for this component
    pub fn parse_name(&self, s: &str) -> Option<i32> {
        match self {
            DateComponent::Weekday => parse_weekday(s).map(|d| d.number_from_monday() as i32),
            DateComponent::Month => parse_month(s).map(|m| m as i32),
            _ => None,
        }
    }

    pub fn extract(&self, timestamp: &NaiveDateTime) -> i32 {
        match self {
            DateComponent::Weekday => timestamp.weekday().number_from_monday() as i32,
            DateComponent::Day => timestamp.day() as i32,
            DateComponent::Month => timestamp.month() as i32,
            DateComponent::Year => timestamp.year(),
            DateComponent::Week => timestamp.iso_week().week() as i32,
            DateComponent::DayOfYear => timestamp.ordinal() as i32,
        }
    }
}

/// parse a weekday from string
pub fn parse_weekday(s: &str) -> Option<Weekday> {
    match s.to_lowercase().as_str() {
        "mon" | "monday" => Some(Weekday::Mon),
        "tue" | "tuesday" => Some(Weekday::Tue),
        "wed" | "wednesday" => Some(Weekday::Wed),
        "thu" | "thursday" => Some(Weekday::Thu),
        "fri" | "friday" => Some(Weekday::Fri),
        "sat" | "saturday" => Some(Weekday::Sat),
        "sun" | "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

/// parse a month name into 1-12
pub fn parse_month(s: &str) -> Option<u32> {
    match s.to_lowercase().as_str() {
        "jan" | "january" => Some(1),
        "feb" | "february" => Some(2),
        "mar" | "march" => Some(3),
        "apr" | "april" => Some(4),
        "may" => Some(5),
        "jun" | "june" => Some(6),
        "jul" | "july" => Some(7),
        "aug" | "august" => Some(8),
        "sep" | "sept" | "september" => Some(9),
        "oct" | "october" => Some(10),
        "nov" | "november" => Some(11),
        "dec" | "december" => Some(12),
        _ => None,
    }
}
