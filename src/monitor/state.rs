use std::time::Instant;

use chrono::{DateTime, NaiveDate, Timelike, Utc};

use crate::config::ReportTime;

/// All mutable state of the monitor loop, mutated only through methods that
/// take `now` explicitly so tests can simulate time.
#[derive(Debug, Default)]
pub struct MonitorState {
    last_alert: Option<Instant>,
    last_report_date: Option<NaiveDate>,
}

impl MonitorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Threshold check on the truncated integer part of the load average: a
    /// load of 14.9 against a threshold of 15 does not trigger. Edge-unaware:
    /// keeps returning true every poll once the cooldown expires, as long as
    /// the load stays at or above the threshold.
    pub fn should_alert(
        &self,
        load_one: f64,
        threshold: u32,
        cooldown_secs: u64,
        now: Instant,
    ) -> bool {
        let current = load_one.max(0.0) as u64;
        if current < threshold as u64 {
            return false;
        }

        match self.last_alert {
            Some(last) => now.duration_since(last).as_secs() >= cooldown_secs,
            None => true,
        }
    }

    pub fn mark_alerted(&mut self, now: Instant) {
        self.last_alert = Some(now);
    }

    /// Minute match with a last-fired-date guard: fires when the wall clock
    /// reads the configured HH:MM and no report has fired for that date yet.
    pub fn should_send_report(&self, now: DateTime<Utc>, report_time: ReportTime) -> bool {
        if now.hour() != report_time.hour as u32 || now.minute() != report_time.minute as u32 {
            return false;
        }

        self.last_report_date != Some(now.date_naive())
    }

    pub fn mark_report_sent(&mut self, date: NaiveDate) {
        self.last_report_date = Some(date);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::TimeZone;

    use super::*;

    const THRESHOLD: u32 = 15;
    const COOLDOWN: u64 = 300;

    #[test]
    fn fractional_load_is_truncated_not_rounded() {
        let state = MonitorState::new();
        let now = Instant::now();

        assert!(!state.should_alert(14.9, THRESHOLD, COOLDOWN, now));
        assert!(state.should_alert(15.0, THRESHOLD, COOLDOWN, now));
        assert!(state.should_alert(15.4, THRESHOLD, COOLDOWN, now));
    }

    #[test]
    fn load_sequence_fires_exactly_once_within_cooldown() {
        // threshold=15, cooldown=300s, loads sampled every 5s
        let mut state = MonitorState::new();
        let start = Instant::now();
        let loads = [10.0, 16.0, 17.0, 15.0, 9.0];

        let mut fired_at = Vec::new();
        for (i, load) in loads.iter().enumerate() {
            let now = start + Duration::from_secs(5 * (i + 1) as u64);
            if state.should_alert(*load, THRESHOLD, COOLDOWN, now) {
                state.mark_alerted(now);
                fired_at.push((5 * (i + 1) as u64, *load));
            }
        }

        assert_eq!(fired_at, vec![(5, 16.0)]);
    }

    #[test]
    fn cooldown_is_monotonic_then_refires() {
        let mut state = MonitorState::new();
        let start = Instant::now();

        assert!(state.should_alert(17.0, THRESHOLD, COOLDOWN, start));
        state.mark_alerted(start);

        assert!(!state.should_alert(17.0, THRESHOLD, COOLDOWN, start + Duration::from_secs(299)));
        assert!(state.should_alert(17.0, THRESHOLD, COOLDOWN, start + Duration::from_secs(300)));
    }

    #[test]
    fn zero_cooldown_refires_every_poll() {
        let mut state = MonitorState::new();
        let start = Instant::now();

        assert!(state.should_alert(20.0, THRESHOLD, 0, start));
        state.mark_alerted(start);
        assert!(state.should_alert(20.0, THRESHOLD, 0, start));
    }

    #[test]
    fn report_fires_once_per_matching_minute() {
        let mut state = MonitorState::new();
        let report_time = ReportTime { hour: 16, minute: 0 };

        let before = Utc.with_ymd_and_hms(2024, 3, 9, 15, 59, 59).unwrap();
        assert!(!state.should_send_report(before, report_time));

        let exact = Utc.with_ymd_and_hms(2024, 3, 9, 16, 0, 0).unwrap();
        assert!(state.should_send_report(exact, report_time));
        state.mark_report_sent(exact.date_naive());

        // rapid re-poll in the same minute must not double-fire
        let same_minute = Utc.with_ymd_and_hms(2024, 3, 9, 16, 0, 30).unwrap();
        assert!(!state.should_send_report(same_minute, report_time));

        // nor later the same day
        let later = Utc.with_ymd_and_hms(2024, 3, 9, 16, 0, 59).unwrap();
        assert!(!state.should_send_report(later, report_time));

        let next_day = Utc.with_ymd_and_hms(2024, 3, 10, 16, 0, 10).unwrap();
        assert!(state.should_send_report(next_day, report_time));
    }
}
