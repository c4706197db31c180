//! Time utilities: injectable clock and timezone-aware "today".

use anyhow::Result;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// M-PESA messages are stamped in East Africa Time.
pub const DEFAULT_TIMEZONE: &str = "Africa/Nairobi";

/// Source of "now". Parsers take one so tests can pin the current date.
pub trait Clock {
    fn now_utc(&self) -> DateTime<Utc>;
}

/// Wall clock. Read on every call, never cached.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at a single instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Freeze at a local time like "2024-03-05 01:00" in an IANA tz like "Africa/Nairobi".
    pub fn at_local(local: &str, tz: &str) -> Result<Self> {
        let tz = parse_timezone(tz)?;

        let ndt = NaiveDateTime::parse_from_str(local, "%Y-%m-%d %H:%M")
            .map_err(|e| anyhow::anyhow!("invalid local datetime '{local}': {e}"))?;

        let local_dt = tz
            .from_local_datetime(&ndt)
            .single()
            .ok_or_else(|| anyhow::anyhow!("ambiguous or invalid local time (DST?): {local} {tz}"))?;

        Ok(Self(local_dt.with_timezone(&Utc)))
    }
}

impl Clock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn parse_timezone(tz: &str) -> Result<Tz> {
    tz.parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))
}

/// Calendar date of `clock`'s current instant as seen in `tz`.
pub fn local_today<C: Clock + ?Sized>(clock: &C, tz: Tz) -> NaiveDate {
    clock.now_utc().with_timezone(&tz).date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nairobi_is_ahead_of_utc() {
        // 22:30 UTC on the 4th is 01:30 EAT on the 5th
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 3, 4, 22, 30, 0).unwrap());
        let tz = parse_timezone(DEFAULT_TIMEZONE).unwrap();
        assert_eq!(local_today(&clock, tz), NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
    }

    #[test]
    fn test_fixed_clock_at_local() {
        let clock = FixedClock::at_local("2025-01-01 02:00", DEFAULT_TIMEZONE).unwrap();
        assert_eq!(clock.now_utc().to_rfc3339(), "2024-12-31T23:00:00+00:00");
    }

    #[test]
    fn test_invalid_timezone() {
        assert!(parse_timezone("Mars/Olympus").is_err());
        assert!(FixedClock::at_local("2025-01-01 02:00", "Nowhere").is_err());
        assert!(FixedClock::at_local("yesterday", DEFAULT_TIMEZONE).is_err());
    }
}
