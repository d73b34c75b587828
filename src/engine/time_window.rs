use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use tracing::warn;

use crate::model::attendance::AttendanceStatus;

/// Offset applied when the configured zone cannot be resolved.
const FALLBACK_OFFSET: FixedOffset = match FixedOffset::east_opt(2 * 3600) {
    Some(offset) => offset,
    None => panic!("UTC+2 is a valid offset"),
};

/// Earliest admissible check-in, inclusive.
pub const WINDOW_START: NaiveTime = match NaiveTime::from_hms_opt(7, 30, 0) {
    Some(t) => t,
    None => panic!("07:30:00 is a valid time"),
};

/// Latest admissible check-in, inclusive. Also the on-time cutoff.
pub const WINDOW_END: NaiveTime = match NaiveTime::from_hms_opt(9, 0, 0) {
    Some(t) => t,
    None => panic!("09:00:00 is a valid time"),
};

/// Source of the current UTC instant.
pub trait Clock: Send + Sync {
    fn now_utc(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// The resolved local zone used to turn UTC instants into wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocalZone {
    Named(Tz),
    Fixed(FixedOffset),
}

impl LocalZone {
    /// Resolves an IANA zone id. Unknown ids degrade to UTC+2 with a warning
    /// instead of failing.
    pub fn resolve(time_zone_id: &str) -> Self {
        match time_zone_id.parse::<Tz>() {
            Ok(tz) => LocalZone::Named(tz),
            Err(e) => {
                warn!(
                    time_zone = %time_zone_id,
                    error = %e,
                    "Time zone not found, falling back to fixed UTC+2"
                );
                LocalZone::fallback()
            }
        }
    }

    pub fn fallback() -> Self {
        LocalZone::Fixed(FALLBACK_OFFSET)
    }

    pub fn to_local(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        match self {
            LocalZone::Named(tz) => instant.with_timezone(tz).naive_local(),
            LocalZone::Fixed(offset) => instant.with_timezone(offset).naive_local(),
        }
    }
}

/// Admission and timeliness rules for check-ins.
pub struct TimeWindowPolicy {
    zone: LocalZone,
}

impl TimeWindowPolicy {
    pub fn new(time_zone_id: &str) -> Self {
        Self::with_zone(LocalZone::resolve(time_zone_id))
    }

    pub fn with_zone(zone: LocalZone) -> Self {
        Self { zone }
    }

    pub fn zone(&self) -> LocalZone {
        self.zone
    }

    pub fn local_now(&self, clock: &dyn Clock) -> NaiveDateTime {
        self.zone.to_local(clock.now_utc())
    }

    pub fn is_within_check_in_window(&self, local_time: NaiveTime) -> bool {
        is_within_check_in_window(local_time)
    }
}

/// `07:30:00 <= t <= 09:00:00`.
pub fn is_within_check_in_window(local_time: NaiveTime) -> bool {
    (WINDOW_START..=WINDOW_END).contains(&local_time)
}

/// `OnTime` iff `t <= 09:00:00`. Applies to any stored time, including ones
/// outside the admission window.
pub fn classify(check_in_time: NaiveTime) -> AttendanceStatus {
    if check_in_time <= WINDOW_END {
        AttendanceStatus::OnTime
    } else {
        AttendanceStatus::Late
    }
}

/// Monday of the week containing `date`.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// First and last calendar day of `year`/`month`, or `None` for an invalid month.
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((first, next - Duration::days(1)))
}
