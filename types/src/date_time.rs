use std::fmt;

use chrono::{self, TimeZone, Timelike, Utc};

/// UTC timestamp with chrono's full nanosecond precision. Internal bookkeeping
/// such as publish request ages uses this alias directly.
pub type DateTimeUtc = chrono::DateTime<Utc>;

const NANOS_PER_TICK: i64 = 100;
const TICKS_PER_MICRO: i64 = 10;

/// An OPC UA `DateTime`: a 64-bit count of 100 nanosecond ticks since
/// 1601-01-01 00:00:00 UTC. Values are held as a chrono timestamp truncated
/// to tick precision so that conversions round-trip.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct DateTime {
    date_time: DateTimeUtc,
}

impl Default for DateTime {
    fn default() -> Self {
        DateTime::epoch()
    }
}

impl From<DateTimeUtc> for DateTime {
    fn from(date_time: DateTimeUtc) -> Self {
        // Truncate the subsecond part to a whole number of ticks
        let nanos = (date_time.nanosecond() / NANOS_PER_TICK as u32) * NANOS_PER_TICK as u32;
        let date_time = date_time.with_nanosecond(nanos).unwrap();
        DateTime { date_time }
    }
}

impl From<DateTime> for DateTimeUtc {
    fn from(value: DateTime) -> Self {
        value.date_time
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.date_time.to_rfc3339())
    }
}

impl DateTime {
    /// The current time, truncated to tick precision.
    pub fn now() -> DateTime {
        DateTime::from(Utc::now())
    }

    /// The OPC UA epoch, 1601-01-01 00:00:00 UTC.
    pub fn epoch() -> DateTime {
        DateTime {
            date_time: epoch_chrono(),
        }
    }

    /// A null date time is the epoch by convention.
    pub fn null() -> DateTime {
        DateTime::epoch()
    }

    pub fn is_null(&self) -> bool {
        self.ticks() == 0
    }

    /// Ticks since the epoch. Values before the epoch clamp to 0.
    pub fn ticks(&self) -> i64 {
        let duration = self.date_time.signed_duration_since(epoch_chrono());
        // num_nanoseconds would overflow an i64 for dates this far apart, so
        // count microseconds and scale. Tick precision below the microsecond
        // is dropped, which the truncating constructor already guarantees
        // only happens for hand-built values.
        match duration.num_microseconds() {
            Some(micros) if micros > 0 => micros * TICKS_PER_MICRO,
            _ => 0,
        }
    }

    pub fn as_chrono(&self) -> DateTimeUtc {
        self.date_time
    }
}

fn epoch_chrono() -> DateTimeUtc {
    Utc.with_ymd_and_hms(1601, 1, 1, 0, 0, 0).unwrap()
}
