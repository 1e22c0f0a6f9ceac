//! Departure-time calculation
//!
//! Traffic-aware routes are requested for the next business-day morning.
//! The calculation is pure; "now" is supplied through [`Clock`].

use chrono::{
    DateTime, Datelike, Days, FixedOffset, Local, LocalResult, NaiveDateTime, NaiveTime,
    TimeDelta, TimeZone, Utc, Weekday,
};
use chrono_tz::Tz;

/// Hour of the morning departure, local time
pub const DEPARTURE_HOUR: u32 = 7;

/// Next instant that is on a later calendar day, at 07:00:00, Monday to Friday.
///
/// Works in the zone of `now`, so "local" means whatever zone the caller's
/// clock runs in. The offset comes from the zone's rules on the departure
/// day, not from `now`.
pub fn next_departure<Z: TimeZone>(now: &DateTime<Z>) -> DateTime<Z> {
    let mut date = now.date_naive() + Days::new(1);
    while matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
        date = date + Days::new(1);
    }

    resolve_local(&now.timezone(), &date.and_time(departure_time()))
}

/// Map a wall-clock time onto the zone; folds take the earlier instant,
/// gaps move forward by the length of a standard DST shift.
fn resolve_local<Z: TimeZone>(tz: &Z, wall_clock: &NaiveDateTime) -> DateTime<Z> {
    match tz.from_local_datetime(wall_clock) {
        LocalResult::Single(instant) | LocalResult::Ambiguous(instant, _) => instant,
        LocalResult::None => tz
            .from_local_datetime(&(*wall_clock + TimeDelta::hours(1)))
            .earliest()
            .unwrap_or_else(|| tz.from_utc_datetime(wall_clock)),
    }
}

fn departure_time() -> NaiveTime {
    NaiveTime::from_hms_opt(DEPARTURE_HOUR, 0, 0).unwrap_or(NaiveTime::MIN)
}

/// Source of the current instant and of the zone rules it lives in
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;

    /// [`next_departure`] computed in the clock's own zone
    fn next_departure(&self) -> DateTime<FixedOffset>;
}

/// Wall clock in the configured zone, or the host's local zone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    timezone: Option<Tz>,
}

impl SystemClock {
    pub fn new(timezone: Option<Tz>) -> Self {
        Self { timezone }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        match self.timezone {
            Some(tz) => Utc::now().with_timezone(&tz).fixed_offset(),
            None => Local::now().fixed_offset(),
        }
    }

    fn next_departure(&self) -> DateTime<FixedOffset> {
        match self.timezone {
            Some(tz) => next_departure(&Utc::now().with_timezone(&tz)).fixed_offset(),
            None => next_departure(&Local::now()).fixed_offset(),
        }
    }
}

/// Clock frozen at a single instant in a given zone
#[derive(Debug, Clone)]
pub struct FixedClock<Z: TimeZone> {
    now: DateTime<Z>,
}

impl<Z: TimeZone> FixedClock<Z> {
    pub fn new(now: DateTime<Z>) -> Self {
        Self { now }
    }
}

impl<Z> Clock for FixedClock<Z>
where
    Z: TimeZone + Send + Sync,
    Z::Offset: Send + Sync,
{
    fn now(&self) -> DateTime<FixedOffset> {
        self.now.fixed_offset()
    }

    fn next_departure(&self) -> DateTime<FixedOffset> {
        next_departure(&self.now).fixed_offset()
    }
}
