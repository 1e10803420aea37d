//! Calendar windows around a corporate event.

use chrono::{Days, NaiveDate};
use merton_analytics::{AnalyticsError, Result};
use serde::{Deserialize, Serialize};

/// A labeled corporate event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSpec {
    /// Label, unique within a study.
    pub label: String,
    /// Announcement date; need not be a trading day.
    pub event_date: NaiveDate,
}

impl EventSpec {
    /// Create a new event.
    pub fn new(label: impl Into<String>, event_date: NaiveDate) -> Self {
        Self {
            label: label.into(),
            event_date,
        }
    }
}

/// Calendar-day window parameters, all measured relative to the event date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Calendar days before the event included in the event window.
    pub pre_event_days: u64,
    /// Calendar days after the event included in the event window.
    pub post_event_days: u64,
    /// Gap in calendar days between the estimation window end and the
    /// event window start.
    pub estimation_offset_days: u64,
    /// Length of the estimation window in calendar days, measured back
    /// from the event window start.
    pub estimation_length_days: u64,
    /// Extra calendar days requested before the estimation start, so that
    /// providers which snap to the next trading day still cover the whole
    /// estimation window.
    pub fetch_padding_days: u64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            pre_event_days: 5,
            post_event_days: 5,
            estimation_offset_days: 30,
            // Roughly eighteen months of calendar days, enough for a
            // ~250 trading-day estimation sample.
            estimation_length_days: 378,
            fetch_padding_days: 10,
        }
    }
}

/// Resolved window bounds for one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventWindows {
    /// First date of the estimation window (inclusive).
    pub estimation_start: NaiveDate,
    /// End of the estimation window (exclusive, so the estimation sample
    /// never overlaps the event window).
    pub estimation_end: NaiveDate,
    /// First date of the event window (inclusive).
    pub event_start: NaiveDate,
    /// Last date of the event window (inclusive).
    pub event_end: NaiveDate,
}

impl WindowConfig {
    /// Resolve the estimation and event windows around `event_date`.
    ///
    /// Fails if the estimation window would be empty, i.e. the offset is
    /// not strictly smaller than the length.
    pub fn windows_for(&self, event_date: NaiveDate) -> Result<EventWindows> {
        if self.estimation_offset_days >= self.estimation_length_days {
            return Err(AnalyticsError::InvalidInput(format!(
                "estimation window is empty: offset {} >= length {}",
                self.estimation_offset_days, self.estimation_length_days
            )));
        }

        let event_start = sub_days(event_date, self.pre_event_days)?;
        let event_end = add_days(event_date, self.post_event_days)?;
        let estimation_start = sub_days(event_start, self.estimation_length_days)?;
        let estimation_end = sub_days(event_start, self.estimation_offset_days)?;

        Ok(EventWindows {
            estimation_start,
            estimation_end,
            event_start,
            event_end,
        })
    }

    /// Date range to request from the price provider for these windows.
    pub fn fetch_range(&self, windows: &EventWindows) -> Result<(NaiveDate, NaiveDate)> {
        Ok((
            sub_days(windows.estimation_start, self.fetch_padding_days)?,
            windows.event_end,
        ))
    }
}

fn add_days(date: NaiveDate, days: u64) -> Result<NaiveDate> {
    date.checked_add_days(Days::new(days)).ok_or_else(|| {
        AnalyticsError::InvalidInput(format!("date overflow adding {days} days to {date}"))
    })
}

fn sub_days(date: NaiveDate, days: u64) -> Result<NaiveDate> {
    date.checked_sub_days(Days::new(days)).ok_or_else(|| {
        AnalyticsError::InvalidInput(format!("date overflow subtracting {days} days from {date}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_window_derivation() {
        let config = WindowConfig {
            pre_event_days: 5,
            post_event_days: 5,
            estimation_offset_days: 30,
            estimation_length_days: 180,
            fetch_padding_days: 10,
        };
        let windows = config.windows_for(date(2022, 8, 5)).unwrap();

        assert_eq!(windows.event_start, date(2022, 7, 31));
        assert_eq!(windows.event_end, date(2022, 8, 10));
        assert_eq!(windows.estimation_start, date(2022, 2, 1));
        assert_eq!(windows.estimation_end, date(2022, 7, 1));
        assert!(windows.estimation_end <= windows.event_start);

        let (fetch_start, fetch_end) = config.fetch_range(&windows).unwrap();
        assert_eq!(fetch_start, date(2022, 1, 22));
        assert_eq!(fetch_end, windows.event_end);
    }

    #[rstest]
    #[case(30, 30)]
    #[case(31, 30)]
    #[case(0, 0)]
    fn test_empty_estimation_window_rejected(#[case] offset: u64, #[case] length: u64) {
        let config = WindowConfig {
            estimation_offset_days: offset,
            estimation_length_days: length,
            ..WindowConfig::default()
        };
        assert!(config.windows_for(date(2022, 8, 5)).is_err());
    }

    #[test]
    fn test_zero_offset_touches_event_window() {
        let config = WindowConfig {
            estimation_offset_days: 0,
            estimation_length_days: 10,
            ..WindowConfig::default()
        };
        let windows = config.windows_for(date(2022, 8, 20)).unwrap();
        // End-exclusive bound: the estimation sample still stops short of
        // the event window.
        assert_eq!(windows.estimation_end, windows.event_start);
    }
}
