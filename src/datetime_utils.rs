use chrono::{Local, NaiveDateTime};

/// Common date/time formats used throughout the application
pub mod formats {
    /// Format for filenames with separator: "20240120_153000"
    pub const FILENAME_WITH_SEPARATOR: &str = "%Y%m%d_%H%M%S";
}

/// Source of the current local wall-clock time
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Clock backed by the system's local time zone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock that always reports the same instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Format a datetime for use in filenames with separator
pub fn format_for_filename(datetime: &NaiveDateTime) -> String {
    datetime
        .format(formats::FILENAME_WITH_SEPARATOR)
        .to_string()
}
