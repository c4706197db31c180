//! Field extractors for M-PESA confirmation messages.
//!
//! Typical message:
//!   XYZ1234567 Confirmed. Ksh1,500.00 received from JOHN DOE 0712345678 on 5/3/24 at 2:30 PM.
//!
//! Each extractor is independent and best-effort: a pattern that does not
//! match yields `None` and the caller falls back to its default.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

fn transaction_id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*([A-Z0-9]{10,})").expect("invalid transaction id regex"))
}

fn time_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)([0-9]{1,2}):([0-9]{2})(?:\s?([ap]m)|\b)").expect("invalid time regex")
    })
}

fn amount_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)Ksh\s?([0-9][0-9,]*(?:\.[0-9]+)?)").expect("invalid amount regex"))
}

fn date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)on\s+([0-9]{1,2})/([0-9]{1,2})/([0-9]{4}|[0-9]{2})\b").expect("invalid date regex")
    })
}

/// Leading run of 10+ uppercase letters/digits, e.g. "XYZ1234567".
pub fn extract_transaction_id(message: &str) -> Option<String> {
    transaction_id_re()
        .captures(message)
        .map(|caps| caps[1].to_string())
}

/// First "H:MM"/"HH:MM" with optional AM/PM, normalized to 24-hour "HH:MM".
///
/// Without a meridian the digits are taken as 24-hour already.
pub fn extract_time(message: &str) -> Option<String> {
    let caps = time_re().captures(message)?;
    let mut hour: u32 = caps[1].parse().ok()?;
    let minute = &caps[2];

    match caps.get(3).map(|m| m.as_str().to_ascii_lowercase()).as_deref() {
        Some("pm") if hour != 12 => hour += 12,
        Some("am") if hour == 12 => hour = 0,
        _ => {}
    }

    Some(format!("{hour:02}:{minute}"))
}

/// First "Ksh" amount with commas stripped. Decimal digits are kept verbatim.
pub fn extract_amount(message: &str) -> Option<String> {
    amount_re()
        .captures(message)
        .map(|caps| caps[1].replace(',', ""))
}

/// "on D/M/YY" or "on D/M/YYYY". Two-digit years are 20xx.
///
/// Day/month combinations that are not real dates (31/2) give `None`.
pub fn extract_date(message: &str) -> Option<NaiveDate> {
    let caps = date_re().captures(message)?;
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let raw_year = &caps[3];
    let mut year: i32 = raw_year.parse().ok()?;
    if raw_year.len() == 2 {
        year += 2000;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}
