use hanabira::Clock;
use js_sys::Date;

/// Wall clock read from `Date`.
pub struct JsClock;

impl Clock for JsClock {
    fn local_hour(&self) -> u32 {
        Date::new_0().get_hours()
    }

    /// UTC calendar date, the date part of `toISOString()`.
    fn today(&self) -> String {
        let iso = String::from(Date::new_0().to_iso_string());
        iso.split('T').next().unwrap_or_default().to_string()
    }
}
