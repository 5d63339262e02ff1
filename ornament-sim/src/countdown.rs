//! Countdown arithmetic: time remaining until a target date and its digit
//! formatting. Platform code (DOM, terminal) implements [`CountdownDisplay`]
//! and drives [`Countdown::tick`] once per second.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone};

use crate::error::{SimError, SimResult};

const MS_PER_SECOND: i64 = 1000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Remaining time split into display fields.
///
/// Fields are negative once the target has passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Remaining {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Remaining {
    pub const ZERO: Remaining = Remaining {
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    /// Decompose a millisecond delta. Each field is floored toward negative
    /// infinity first, then reduced with a sign-preserving remainder.
    pub fn from_millis(delta_ms: i64) -> Self {
        Self {
            days: delta_ms.div_euclid(MS_PER_DAY),
            hours: delta_ms.div_euclid(MS_PER_HOUR) % 24,
            minutes: delta_ms.div_euclid(MS_PER_MINUTE) % 60,
            seconds: delta_ms.div_euclid(MS_PER_SECOND) % 60,
        }
    }

    pub fn digits(&self) -> CountdownDigits {
        let days_width = self.days.to_string().len().max(2);
        CountdownDigits {
            days: pad_tail(self.days, days_width),
            hours: pad_tail(self.hours, 2),
            minutes: pad_tail(self.minutes, 2),
            seconds: pad_tail(self.seconds, 2),
        }
    }
}

/// Formatted text for the four display nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownDigits {
    pub days: String,
    pub hours: String,
    pub minutes: String,
    pub seconds: String,
}

/// Sink for countdown output.
pub trait CountdownDisplay {
    fn show(&mut self, digits: &CountdownDigits);
}

/// Last `width` characters of `"00" + value`.
fn pad_tail(value: i64, width: usize) -> String {
    let text = format!("00{value}");
    let start = text.len().saturating_sub(width);
    text[start..].to_string()
}

/// Raw time left between two instants, without the terminal-day override.
pub fn compute_remaining<Tz: TimeZone>(target: &DateTime<Tz>, now: &DateTime<Tz>) -> Remaining {
    Remaining::from_millis(target.timestamp_millis() - now.timestamp_millis())
}

/// True when `target` and `now` share year, month and weekday index
/// (Sunday = 0). This compares the weekday, not the day of month.
pub fn is_terminal_day<Tz: TimeZone>(target: &DateTime<Tz>, now: &DateTime<Tz>) -> bool {
    target.year() == now.year()
        && target.month() == now.month()
        && target.weekday().num_days_from_sunday() == now.weekday().num_days_from_sunday()
}

/// Reject month/day pairs that never exist.
pub fn validate_month_day(month: u32, day: u32) -> SimResult<()> {
    // 2000 is a leap year, so Feb 29 passes.
    if NaiveDate::from_ymd_opt(2000, month, day).is_none() {
        return Err(SimError::InvalidDate { month, day });
    }
    Ok(())
}

/// The first `month/day` on or after `today`.
///
/// Dates that do not exist in the current year (Feb 29) move to the next
/// year that has them.
pub fn next_occurrence_date(month: u32, day: u32, today: NaiveDate) -> SimResult<NaiveDate> {
    validate_month_day(month, day)?;
    let mut year = today.year();
    loop {
        if let Some(candidate) = NaiveDate::from_ymd_opt(year, month, day) {
            if candidate >= today {
                return Ok(candidate);
            }
        }
        year += 1;
    }
}

/// Midnight of the next `month/day` in the time zone of `now`.
pub fn next_occurrence<Tz: TimeZone>(month: u32, day: u32, now: &DateTime<Tz>) -> SimResult<DateTime<Tz>> {
    let date = next_occurrence_date(month, day, now.date_naive())?;
    let midnight = date.and_time(chrono::NaiveTime::MIN);
    let tz = now.timezone();
    Ok(first_valid_local(&tz, midnight))
}

/// The instant for `local`, or the first valid local time after it when a
/// DST gap skips it.
fn first_valid_local<Tz: TimeZone>(tz: &Tz, local: chrono::NaiveDateTime) -> DateTime<Tz> {
    // Gaps start and end on quarter hours and last at most a day.
    (0..=96)
        .find_map(|quarter| {
            tz.from_local_datetime(&(local + chrono::Duration::minutes(15 * quarter)))
                .earliest()
        })
        .unwrap_or_else(|| tz.from_utc_datetime(&local))
}

/// A countdown toward a fixed target instant.
#[derive(Debug, Clone)]
pub struct Countdown<Tz: TimeZone> {
    target: DateTime<Tz>,
}

impl<Tz: TimeZone> Countdown<Tz> {
    pub fn new(target: DateTime<Tz>) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &DateTime<Tz> {
        &self.target
    }

    /// Time left as displayed, including the terminal-day override.
    pub fn remaining_at(&self, now: &DateTime<Tz>) -> Remaining {
        if is_terminal_day(&self.target, now) {
            return Remaining::ZERO;
        }
        compute_remaining(&self.target, now)
    }

    /// Compute and push one update to `display`.
    pub fn tick<D: CountdownDisplay + ?Sized>(&self, now: &DateTime<Tz>, display: &mut D) -> Remaining {
        let remaining = self.remaining_at(now);
        display.show(&remaining.digits());
        remaining
    }
}
