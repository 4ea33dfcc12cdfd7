//! Tolerant release-date parsing.
//!
//! Dump dates arrive in wildly mixed shapes: `1992-02-12`, `1973-01`,
//! `2013-1`, `100322`, `1990xx`, bare `98`. The parser applies the
//! narrowest format that matches and returns independently-present
//! year/month/day components. Invalid calendar dates yield all-absent.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

fn delimited_ymd() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+)[-_. ](\d+)[-_. ](\d+)$").expect("valid regex"))
}

/// Decompose a loosely formatted date string into optional year, month and
/// day. Zero-valued month/day components do not propagate: `2012-03-00`
/// yields `(2012, 3, None)` and `2012-00-05` yields `(2012, None, None)`.
pub fn parse_ymd(ymd: &str) -> (Option<i16>, Option<i16>, Option<i16>) {
    let mut compact = ymd.trim().to_string();

    // Fully delimited dates are normalized to compact digits first, with
    // zero components suppressed along the way.
    if let Some(caps) = delimited_ymd().captures(&compact) {
        let year = caps[1].to_string();
        let month = pad_two(&caps[2]);
        let day = pad_two(&caps[3]);
        compact = year;
        if month != "00" {
            compact.push_str(&month);
            if day != "00" {
                compact.push_str(&day);
            }
        }
    }

    let digits: String = compact.chars().filter(|c| c.is_ascii_digit()).collect();
    match digits.len() {
        8 => full_date(&digits),
        5 | 6 => year_month_or_short_date(&digits),
        4 => (digits.parse().ok(), None, None),
        2 => (digits.parse().ok().map(expand_two_digit_year), None, None),
        _ => (None, None, None),
    }
}

/// `YYYYMMDD`, validated against the calendar.
fn full_date(digits: &str) -> (Option<i16>, Option<i16>, Option<i16>) {
    let (year, month, day) = (
        parse_part(&digits[..4]),
        parse_part(&digits[4..6]),
        parse_part(&digits[6..]),
    );
    match (year, month, day) {
        (Some(y), Some(m), Some(d)) if valid_date(y, m, d) => (Some(y), Some(m), Some(d)),
        _ => (None, None, None),
    }
}

/// Five or six digits: `YYYYM[M]` when the month part is plausible,
/// otherwise (six digits only) `YYMMDD` with a pivoted 2-digit year.
fn year_month_or_short_date(digits: &str) -> (Option<i16>, Option<i16>, Option<i16>) {
    let year = parse_part(&digits[..4]);
    let month = parse_part(&digits[4..]);
    if let (Some(y), Some(m)) = (year, month) {
        if (1..=12).contains(&m) {
            return (Some(y), Some(m), None);
        }
    }
    if digits.len() == 6 {
        let year = parse_part(&digits[..2]).map(expand_two_digit_year);
        let month = parse_part(&digits[2..4]);
        let day = parse_part(&digits[4..]);
        if let (Some(y), Some(m), Some(d)) = (year, month, day) {
            if valid_date(y, m, d) {
                return (Some(y), Some(m), Some(d));
            }
        }
    }
    (None, None, None)
}

fn parse_part(digits: &str) -> Option<i16> {
    digits.parse().ok()
}

fn valid_date(year: i16, month: i16, day: i16) -> bool {
    NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32).is_some()
}

/// Two-digit years pivot at 69: `69..=99` map to the 1900s, the rest to
/// the 2000s.
fn expand_two_digit_year(year: i16) -> i16 {
    if year >= 69 {
        1900 + year
    } else {
        2000 + year
    }
}

fn pad_two(part: &str) -> String {
    if part.len() == 1 {
        format!("0{part}")
    } else {
        part.to_string()
    }
}
