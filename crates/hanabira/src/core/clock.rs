/// Source of local wall-clock facts the effects depend on.
///
/// Elapsed time is never read from here: every timer is driven by the
/// frame deltas passed to `DecorApp::tick`, so only calendar-level
/// information crosses this seam.
pub trait Clock {
    /// Local hour of day, 0..=23.
    fn local_hour(&self) -> u32;

    /// Today's date as `YYYY-MM-DD`.
    fn today(&self) -> String;

    /// Night window: before 06:00 or after 18:59.
    fn is_night(&self) -> bool {
        is_night_hour(self.local_hour())
    }
}

pub fn is_night_hour(hour: u32) -> bool {
    hour < 6 || hour > 18
}

/// A clock frozen at a given hour and date.
#[derive(Debug, Clone)]
pub struct FixedClock {
    pub hour: u32,
    pub date: String,
}

impl FixedClock {
    pub fn new(hour: u32, date: impl Into<String>) -> Self {
        Self {
            hour: hour % 24,
            date: date.into(),
        }
    }
}

impl Clock for FixedClock {
    fn local_hour(&self) -> u32 {
        self.hour
    }

    fn today(&self) -> String {
        self.date.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn night_window_boundaries() {
        assert!(is_night_hour(0));
        assert!(is_night_hour(5));
        assert!(!is_night_hour(6));
        assert!(!is_night_hour(18));
        assert!(is_night_hour(19));
        assert!(is_night_hour(23));
    }

    #[test]
    fn fixed_clock_reports_given_values() {
        let c = FixedClock::new(21, "2026-10-16");
        assert!(c.is_night());
        assert_eq!(c.today(), "2026-10-16");
    }
}
