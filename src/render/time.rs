use chrono::{DateTime, FixedOffset, Local, Offset, Utc};

/// Converts backend UTC timestamps into the viewer's local wall clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalClock {
    offset: FixedOffset,
}

impl LocalClock {
    /// Clock using the host's current UTC offset.
    pub fn system() -> Self {
        Self {
            offset: *Local::now().offset(),
        }
    }

    pub fn with_offset(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn utc() -> Self {
        Self { offset: Utc.fix() }
    }

    /// Time of day only, e.g. `14:03:07`.
    pub fn time_of_day(&self, at: &DateTime<Utc>) -> String {
        at.with_timezone(&self.offset).format("%H:%M:%S").to_string()
    }

    /// Full date and time, e.g. `2026-10-15 14:03:07`.
    pub fn date_time(&self, at: &DateTime<Utc>) -> String {
        at.with_timezone(&self.offset)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
    }
}

impl Default for LocalClock {
    fn default() -> Self {
        Self::system()
    }
}
