use std::fmt::Display;
use std::time::{Duration, Instant};

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, TimeZone};

use crate::config::PageConfig;
use crate::error::{PretgoError, Result};

/// Live date/time display refreshed on a fixed interval.
#[derive(Debug, Clone)]
pub struct PageClock {
    format: String,
    interval: Duration,
}

impl PageClock {
    pub fn new(format: impl Into<String>, interval: Duration) -> Result<Self> {
        let format = format.into();
        validate_format(&format)?;
        Ok(Self { format, interval })
    }

    pub fn from_config(config: &PageConfig) -> Result<Self> {
        Self::new(
            config.clock_format.clone(),
            Duration::from_millis(config.clock_interval_ms),
        )
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn format_time<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> String
    where
        Tz::Offset: Display,
    {
        at.format(&self.format).to_string()
    }

    pub fn now_text(&self) -> String {
        self.format_time(&Local::now())
    }

    pub fn needs_refresh(&self, last: Instant, now: Instant) -> bool {
        now.saturating_duration_since(last) >= self.interval
    }
}

/// Rejects strftime patterns chrono cannot render.
pub fn validate_format(format: &str) -> Result<()> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(PretgoError::ConfigError(format!(
            "invalid clock format '{format}'"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn clock() -> PageClock {
        PageClock::new("%d/%m/%Y %H:%M:%S", Duration::from_millis(1000)).unwrap()
    }

    #[test]
    fn test_default_format() {
        let at = Utc.with_ymd_and_hms(2024, 9, 3, 8, 5, 9).unwrap();
        assert_eq!(clock().format_time(&at), "03/09/2024 08:05:09");
    }

    #[test]
    fn test_refresh_interval() {
        let clock = clock();
        let start = Instant::now();
        assert!(!clock.needs_refresh(start, start + Duration::from_millis(999)));
        assert!(clock.needs_refresh(start, start + Duration::from_millis(1000)));
        assert!(!clock.needs_refresh(start + Duration::from_secs(1), start));
    }

    #[test]
    fn test_invalid_format_is_rejected() {
        let err = PageClock::new("%Q", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, PretgoError::ConfigError(_)));
    }

    #[test]
    fn test_from_default_config() {
        let clock = PageClock::from_config(&PageConfig::default()).unwrap();
        assert_eq!(clock.interval(), Duration::from_secs(1));
    }
}
