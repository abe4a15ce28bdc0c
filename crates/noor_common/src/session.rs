//! Display session state
//!
//! Holds what the view needs between ticks: the acquired coordinate, the
//! current schedule, the reflection and the location advisory. The session is
//! `Loading` until both coordinate and schedule are present, then `Ready`.
//! A new schedule replaces the old one wholesale.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::sync::Arc;

use crate::error::ScheduleError;
use crate::location::LocationOutcome;
use crate::schedule::{select_next, time_until_next, ScheduleResolver};
use crate::types::{DailySchedule, GeoCoordinate, PrayerName, Reflection};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
}

#[derive(Debug, Default)]
pub struct PrayerSession {
    coordinate: Option<GeoCoordinate>,
    schedule: Option<Arc<DailySchedule>>,
    reflection: Option<Reflection>,
    location_denied: bool,
    location_reason: Option<String>,
}

impl PrayerSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        match (&self.coordinate, &self.schedule) {
            (Some(_), Some(_)) => Phase::Ready,
            _ => Phase::Loading,
        }
    }

    /// Record the location outcome; a new coordinate invalidates the schedule
    pub fn set_location(&mut self, outcome: &LocationOutcome) {
        let coordinate = outcome.coordinate();
        if self.coordinate != Some(coordinate) {
            self.schedule = None;
        }
        self.coordinate = Some(coordinate);
        match outcome {
            LocationOutcome::Granted(_) => {
                self.location_denied = false;
                self.location_reason = None;
            }
            LocationOutcome::Denied { reason, .. } => {
                self.location_denied = true;
                self.location_reason = Some(reason.clone());
            }
        }
    }

    pub fn coordinate(&self) -> Option<GeoCoordinate> {
        self.coordinate
    }

    /// Whether the fallback coordinate is in use because location was denied
    pub fn location_denied(&self) -> bool {
        self.location_denied
    }

    pub fn location_reason(&self) -> Option<&str> {
        self.location_reason.as_deref()
    }

    /// Resolve and install the schedule for `date` at the current coordinate
    ///
    /// Does nothing while no coordinate is known. On failure the previous
    /// schedule is left untouched and the error is returned.
    pub fn refresh_schedule(
        &mut self,
        resolver: &ScheduleResolver,
        date: NaiveDate,
    ) -> Result<Phase, ScheduleError> {
        let Some(coordinate) = self.coordinate else {
            return Ok(Phase::Loading);
        };
        let schedule = resolver.resolve(coordinate, date)?;
        self.schedule = Some(Arc::new(schedule));
        Ok(self.phase())
    }

    /// Shared handle to the current schedule
    pub fn schedule(&self) -> Option<Arc<DailySchedule>> {
        self.schedule.clone()
    }

    /// True when the schedule was built for a day other than `today`
    pub fn is_stale(&self, today: NaiveDate) -> bool {
        self.schedule
            .as_ref()
            .map(|s| s.calendar_date() != today)
            .unwrap_or(false)
    }

    /// Next prayer at `now`; `None` while loading or once Isha has passed
    pub fn next_prayer(&self, now: DateTime<Utc>) -> Option<PrayerName> {
        self.schedule.as_ref().and_then(|s| select_next(s, now))
    }

    pub fn countdown(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.schedule.as_ref().and_then(|s| time_until_next(s, now))
    }

    pub fn set_reflection(&mut self, reflection: Reflection) {
        self.reflection = Some(reflection);
    }

    pub fn reflection(&self) -> Option<&Reflection> {
        self.reflection.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::{CalculationMethod, CalendarOracle, OracleTimes, TimeOracle};
    use crate::reflection::fallback_reflection;
    use chrono::{TimeZone, Timelike};

    /// Same clock times every day, on the requested date
    struct DailyOracle;

    impl TimeOracle for DailyOracle {
        fn prayer_times(
            &self,
            _coordinate: GeoCoordinate,
            date: NaiveDate,
            _method: &CalculationMethod,
        ) -> Result<OracleTimes, ScheduleError> {
            let at = |h, m| date.and_hms_opt(h, m, 0).unwrap().and_utc();
            Ok(vec![
                (PrayerName::Fajr, at(5, 10)),
                (PrayerName::Sunrise, at(6, 30)),
                (PrayerName::Dhuhr, at(12, 15)),
                (PrayerName::Asr, at(15, 45)),
                (PrayerName::Maghrib, at(18, 20)),
                (PrayerName::Isha, at(19, 45)),
            ])
        }
    }

    struct PlainCalendar;

    impl CalendarOracle for PlainCalendar {
        fn hijri_label(&self, date: NaiveDate) -> Result<String, ScheduleError> {
            Ok(format!("hijri-{}", date))
        }
    }

    fn resolver() -> ScheduleResolver {
        ScheduleResolver::new(
            Box::new(DailyOracle),
            Box::new(PlainCalendar),
            CalculationMethod::default(),
        )
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_loading_until_schedule_installed() {
        let mut session = PrayerSession::new();
        assert_eq!(session.phase(), Phase::Loading);

        // No coordinate yet: refresh is a no-op
        assert_eq!(session.refresh_schedule(&resolver(), day(15)).unwrap(), Phase::Loading);
        assert!(session.next_prayer(Utc::now()).is_none());

        let karachi = GeoCoordinate::new(24.8607, 67.0011).unwrap();
        session.set_location(&LocationOutcome::Granted(karachi));
        assert_eq!(session.phase(), Phase::Loading);

        assert_eq!(session.refresh_schedule(&resolver(), day(15)).unwrap(), Phase::Ready);
        let t = Utc.with_ymd_and_hms(2024, 3, 15, 14, 0, 0).unwrap();
        assert_eq!(session.next_prayer(t), Some(PrayerName::Asr));
        assert_eq!(session.countdown(t), Some(Duration::minutes(105)));
    }

    #[test]
    fn test_new_coordinate_invalidates_schedule() {
        let mut session = PrayerSession::new();
        let a = GeoCoordinate::new(24.8607, 67.0011).unwrap();
        let b = GeoCoordinate::new(31.5204, 74.3587).unwrap();

        session.set_location(&LocationOutcome::Granted(a));
        session.refresh_schedule(&resolver(), day(15)).unwrap();
        assert_eq!(session.phase(), Phase::Ready);

        session.set_location(&LocationOutcome::Granted(b));
        assert_eq!(session.phase(), Phase::Loading);
        assert!(session.schedule().is_none());
    }

    #[test]
    fn test_denied_location_sets_advisory() {
        let mut session = PrayerSession::new();
        session.set_location(&LocationOutcome::Denied {
            fallback: crate::location::fallback_coordinate(),
            reason: "timeout".to_string(),
        });
        assert!(session.location_denied());
        assert_eq!(session.location_reason(), Some("timeout"));
    }

    #[test]
    fn test_day_rollover_replaces_schedule() {
        let mut session = PrayerSession::new();
        session.set_location(&LocationOutcome::Granted(
            GeoCoordinate::new(24.8607, 67.0011).unwrap(),
        ));
        session.refresh_schedule(&resolver(), day(15)).unwrap();
        let before = session.schedule().unwrap();

        let late = Utc.with_ymd_and_hms(2024, 3, 15, 23, 0, 0).unwrap();
        assert_eq!(session.next_prayer(late), None);

        assert!(!session.is_stale(day(15)));
        assert!(session.is_stale(day(16)));

        session.refresh_schedule(&resolver(), day(16)).unwrap();
        let after = session.schedule().unwrap();
        assert_eq!(after.calendar_date(), day(16));
        // Readers holding the old Arc still see a complete schedule
        assert_eq!(before.calendar_date(), day(15));
        assert_eq!(after.event(PrayerName::Fajr).instant.hour(), 5);

        let next_morning = Utc.with_ymd_and_hms(2024, 3, 16, 1, 0, 0).unwrap();
        assert_eq!(session.next_prayer(next_morning), Some(PrayerName::Fajr));
    }

    #[test]
    fn test_reflection_presence() {
        let mut session = PrayerSession::new();
        assert!(session.reflection().is_none());
        session.set_reflection(fallback_reflection());
        assert_eq!(session.reflection(), Some(&fallback_reflection()));
    }
}
