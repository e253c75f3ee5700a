//! Date parsing and the inclusive sent-time window.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::ConfigError;

const US_FORMAT: &str = "%m/%d/%Y";
const ISO_FORMAT: &str = "%Y-%m-%d";

/// Upper bound on how far a window edge moves to escape a DST gap.
const MAX_GAP_SECS: i64 = 24 * 3600;

/// Parses `MM/DD/YYYY` or `YYYY-MM-DD`.
pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, ConfigError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ConfigError::MissingDate { field });
    }
    NaiveDate::parse_from_str(value, US_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(value, ISO_FORMAT))
        .map_err(|_| ConfigError::InvalidDate {
            field,
            value: value.to_string(),
        })
}

/// Normalizes a stored date to `MM/DD/YYYY`.
///
/// ISO dates are converted, US dates pass through, anything else yields
/// `None`.
pub fn convert_date_format(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, ISO_FORMAT) {
        return Some(date.format(US_FORMAT).to_string());
    }
    if NaiveDate::parse_from_str(value, US_FORMAT).is_ok() {
        return Some(value.to_string());
    }
    tracing::warn!("Invalid date format '{}', clearing date", value);
    None
}

/// Inclusive `[start 00:00:00, end 23:59:59]` window in a given zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateWindow {
    start: DateTime<Tz>,
    end: DateTime<Tz>,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate, tz: Tz) -> Result<Self, ConfigError> {
        if start > end {
            return Err(ConfigError::StartAfterEnd {
                start: start.format(US_FORMAT).to_string(),
                end: end.format(US_FORMAT).to_string(),
            });
        }

        let start_local = start.and_hms_opt(0, 0, 0).expect("00:00:00 is a valid time");
        let end_local = end.and_hms_opt(23, 59, 59).expect("23:59:59 is a valid time");

        let start = resolve_local(tz, start_local, 1).ok_or_else(|| {
            ConfigError::NonexistentLocalTime {
                value: start_local.to_string(),
                timezone: tz.name().to_string(),
            }
        })?;
        let end = resolve_local(tz, end_local, -1).ok_or_else(|| {
            ConfigError::NonexistentLocalTime {
                value: end_local.to_string(),
                timezone: tz.name().to_string(),
            }
        })?;

        Ok(Self { start, end })
    }

    pub fn start(&self) -> &DateTime<Tz> {
        &self.start
    }

    pub fn end(&self) -> &DateTime<Tz> {
        &self.end
    }

    /// Pulls the end of the window back to `now` when it lies in the future.
    /// Returns true if the window changed.
    pub fn clamp_end(&mut self, now: DateTime<Utc>) -> bool {
        let now = now.with_timezone(&self.end.timezone());
        if self.end > now {
            self.end = now;
            true
        } else {
            false
        }
    }

    pub fn contains(&self, sent_at: &DateTime<FixedOffset>) -> bool {
        let sent = sent_at.with_timezone(&Utc);
        sent >= self.start.with_timezone(&Utc) && sent <= self.end.with_timezone(&Utc)
    }

    pub fn is_before(&self, sent_at: &DateTime<FixedOffset>) -> bool {
        sent_at.with_timezone(&Utc) < self.start.with_timezone(&Utc)
    }
}

/// Maps a local wall-clock time to an instant. Times inside a DST gap move
/// in `direction` (+1 forward, -1 backward) to the nearest existing second;
/// ambiguous times pick the edge that keeps the window widest.
fn resolve_local(tz: Tz, local: NaiveDateTime, direction: i64) -> Option<DateTime<Tz>> {
    let step = TimeDelta::seconds(direction);
    let mut candidate = local;
    for _ in 0..=MAX_GAP_SECS {
        let resolved = tz.from_local_datetime(&candidate);
        let instant = if direction > 0 {
            resolved.earliest()
        } else {
            resolved.latest()
        };
        if instant.is_some() {
            return instant;
        }
        candidate = candidate.checked_add_signed(step)?;
    }
    None
}
