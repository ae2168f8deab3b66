use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};

/// A day clock that yields the timestamp of every tick from midnight.
///
/// # Examples
///
/// ```
/// use chrono::{NaiveDate, Timelike};
/// use prosumer_engine::sim::clock::DayClock;
///
/// let date = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
/// let hours: Vec<u32> = DayClock::new(date, 6.0).map(|t| t.hour()).collect();
/// assert_eq!(hours, vec![0, 6, 12, 18]);
/// ```
#[derive(Debug, Clone)]
pub struct DayClock {
    /// Midnight of the simulated day.
    start: DateTime<Utc>,
    /// Tick length in seconds.
    tick_secs: i64,
    /// Next tick index.
    current: usize,
    /// Ticks in the day.
    total: usize,
}

impl DayClock {
    /// Creates a clock over `date` with ticks of `tick_hours`.
    ///
    /// # Arguments
    ///
    /// * `date` - Day to walk through (UTC)
    /// * `tick_hours` - Tick duration; the day holds `round(24 / tick_hours)` ticks
    ///
    /// # Panics
    ///
    /// Panics if `tick_hours` is not strictly positive.
    pub fn new(date: NaiveDate, tick_hours: f64) -> Self {
        assert!(tick_hours > 0.0, "tick_hours must be > 0");
        let start = date.and_time(NaiveTime::default()).and_utc();
        Self {
            start,
            tick_secs: (tick_hours * 3600.0).round() as i64,
            current: 0,
            total: ((24.0 / tick_hours).round() as usize).max(1),
        }
    }

    /// Number of ticks not yet yielded.
    pub fn remaining(&self) -> usize {
        self.total - self.current
    }
}

impl Iterator for DayClock {
    type Item = DateTime<Utc>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current >= self.total {
            return None;
        }
        let offset = TimeDelta::seconds(self.tick_secs * self.current as i64);
        self.current += 1;
        Some(self.start + offset)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining(), Some(self.remaining()))
    }
}
