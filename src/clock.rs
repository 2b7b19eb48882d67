use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Local, TimeZone};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;

    fn now_millis(&self) -> i64 {
        self.now().timestamp_millis()
    }

    fn time_of_day(&self) -> String {
        time_of_day(&self.now())
    }
}

/// Wall-clock stamp stored on messages, `HH:mm:ss`.
pub fn time_of_day(at: &DateTime<Local>) -> String {
    at.format("%H:%M:%S").to_string()
}

#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    millis: AtomicI64,
}

impl ManualClock {
    pub fn new(millis: i64) -> Self {
        Self { millis: AtomicI64::new(millis) }
    }

    pub fn advance(&self, millis: i64) {
        self.millis.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Local::now().timestamp_millis())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        let ms = self.millis.load(Ordering::SeqCst);
        // out-of-range values fall back to the epoch
        Local.timestamp_millis_opt(ms).single().unwrap_or_default()
    }

    fn now_millis(&self) -> i64 {
        self.millis.load(Ordering::SeqCst)
    }
}
