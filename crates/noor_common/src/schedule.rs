//! Schedule resolution and next-prayer selection
//!
//! `ScheduleResolver::resolve` turns a coordinate and a civil date into a
//! `DailySchedule` by asking the time oracle for six instants and the
//! calendar oracle for a Hijri label. `select_next` answers "which prayer is
//! next" for a reference instant.
//!
//! Selection never rolls over to tomorrow. After Isha it returns `None` and
//! the caller resolves the next date explicitly.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::info;

use crate::error::ScheduleError;
use crate::oracle::{CalculationMethod, CalendarOracle, TimeOracle};
use crate::types::{DailySchedule, GeoCoordinate, PrayerEvent, PrayerName};

/// Builds daily schedules from the external oracles
pub struct ScheduleResolver {
    time_oracle: Box<dyn TimeOracle>,
    calendar: Box<dyn CalendarOracle>,
    method: CalculationMethod,
}

impl ScheduleResolver {
    pub fn new(
        time_oracle: Box<dyn TimeOracle>,
        calendar: Box<dyn CalendarOracle>,
        method: CalculationMethod,
    ) -> Self {
        Self {
            time_oracle,
            calendar,
            method,
        }
    }

    pub fn method(&self) -> CalculationMethod {
        self.method
    }

    /// Resolve the schedule for `coordinate` on `calendar_date`
    ///
    /// Fails with `ComputationUnavailable` when the oracle errors, omits an
    /// event, or returns instants that are not strictly ascending in
    /// Fajr..Isha order. No substitute schedule is produced.
    pub fn resolve(
        &self,
        coordinate: GeoCoordinate,
        calendar_date: NaiveDate,
    ) -> Result<DailySchedule, ScheduleError> {
        let raw = self
            .time_oracle
            .prayer_times(coordinate, calendar_date, &self.method)?;

        let mut events = Vec::with_capacity(PrayerName::ALL.len());
        for name in PrayerName::ALL {
            let instant = raw
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, t)| *t)
                .ok_or_else(|| {
                    ScheduleError::ComputationUnavailable(format!(
                        "no {} time for {} on {}",
                        name, coordinate, calendar_date
                    ))
                })?;
            events.push(PrayerEvent { name, instant });
        }

        if let Some(pair) = events.windows(2).find(|p| p[0].instant >= p[1].instant) {
            return Err(ScheduleError::ComputationUnavailable(format!(
                "{} ({}) is not before {} ({}) at {} on {}",
                pair[0].name,
                pair[0].instant,
                pair[1].name,
                pair[1].instant,
                coordinate,
                calendar_date
            )));
        }

        let events: [PrayerEvent; 6] = events.try_into().map_err(|_| {
            ScheduleError::ComputationUnavailable("expected exactly six events".to_string())
        })?;

        let hijri_date = self.calendar.hijri_label(calendar_date)?;

        info!(
            %coordinate,
            %calendar_date,
            hijri = %hijri_date,
            method = %self.method,
            "Resolved prayer schedule"
        );

        Ok(DailySchedule::new(calendar_date, hijri_date, coordinate, events))
    }
}

/// First prayer strictly after `reference`, or `None` once Isha has been reached
///
/// An event whose instant equals `reference` counts as elapsed.
pub fn select_next(schedule: &DailySchedule, reference: DateTime<Utc>) -> Option<PrayerName> {
    schedule
        .events()
        .iter()
        .find(|event| event.instant > reference)
        .map(|event| event.name)
}

/// Time left until the selected prayer, if any remains today
pub fn time_until_next(schedule: &DailySchedule, reference: DateTime<Utc>) -> Option<Duration> {
    select_next(schedule, reference).map(|name| schedule.event(name).instant - reference)
}

/// Card highlight rule: the next prayer, or Fajr once the day is done
pub fn is_highlighted(name: PrayerName, next: Option<PrayerName>) -> bool {
    match next {
        Some(n) => n == name,
        None => name == PrayerName::Fajr,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::OracleTimes;
    use chrono::TimeZone;

    struct StubOracle(OracleTimes);

    impl TimeOracle for StubOracle {
        fn prayer_times(
            &self,
            _coordinate: GeoCoordinate,
            _date: NaiveDate,
            _method: &CalculationMethod,
        ) -> Result<OracleTimes, ScheduleError> {
            Ok(self.0.clone())
        }
    }

    struct FailingOracle;

    impl TimeOracle for FailingOracle {
        fn prayer_times(
            &self,
            _coordinate: GeoCoordinate,
            _date: NaiveDate,
            _method: &CalculationMethod,
        ) -> Result<OracleTimes, ScheduleError> {
            Err(ScheduleError::ComputationUnavailable("sun never sets".to_string()))
        }
    }

    struct StubCalendar;

    impl CalendarOracle for StubCalendar {
        fn hijri_label(&self, _date: NaiveDate) -> Result<String, ScheduleError> {
            Ok("5 Ramadan 1445".to_string())
        }
    }

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, h, m, 0).unwrap()
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn karachi() -> GeoCoordinate {
        GeoCoordinate::new(24.8607, 67.0011).unwrap()
    }

    fn standard_times() -> OracleTimes {
        vec![
            (PrayerName::Fajr, at(5, 10)),
            (PrayerName::Sunrise, at(6, 30)),
            (PrayerName::Dhuhr, at(12, 15)),
            (PrayerName::Asr, at(15, 45)),
            (PrayerName::Maghrib, at(18, 20)),
            (PrayerName::Isha, at(19, 45)),
        ]
    }

    fn resolver(times: OracleTimes) -> ScheduleResolver {
        ScheduleResolver::new(
            Box::new(StubOracle(times)),
            Box::new(StubCalendar),
            CalculationMethod::default(),
        )
    }

    #[test]
    fn test_resolve_orders_events() {
        let mut shuffled = standard_times();
        shuffled.reverse();
        let schedule = resolver(shuffled).resolve(karachi(), day()).unwrap();

        let names: Vec<_> = schedule.events().iter().map(|e| e.name).collect();
        assert_eq!(names, PrayerName::ALL.to_vec());
        assert_eq!(schedule.hijri_date(), "5 Ramadan 1445");
        assert_eq!(schedule.calendar_date(), day());
        assert_eq!(schedule.event(PrayerName::Asr).instant, at(15, 45));
    }

    #[test]
    fn test_resolve_rejects_out_of_order_oracle() {
        let mut times = standard_times();
        // Isha before Maghrib, as happens near polar summer
        times[5].1 = at(18, 0);
        let err = resolver(times).resolve(karachi(), day()).unwrap_err();
        assert!(matches!(err, ScheduleError::ComputationUnavailable(_)));
    }

    #[test]
    fn test_resolve_rejects_missing_event() {
        let mut times = standard_times();
        times.retain(|(n, _)| *n != PrayerName::Isha);
        let err = resolver(times).resolve(karachi(), day()).unwrap_err();
        assert!(matches!(err, ScheduleError::ComputationUnavailable(_)));
    }

    #[test]
    fn test_resolve_propagates_oracle_failure() {
        let r = ScheduleResolver::new(
            Box::new(FailingOracle),
            Box::new(StubCalendar),
            CalculationMethod::default(),
        );
        assert_eq!(
            r.resolve(karachi(), day()).unwrap_err(),
            ScheduleError::ComputationUnavailable("sun never sets".to_string())
        );
    }

    #[test]
    fn test_select_next_boundaries() {
        let schedule = resolver(standard_times()).resolve(karachi(), day()).unwrap();

        assert_eq!(select_next(&schedule, at(0, 0)), Some(PrayerName::Fajr));
        assert_eq!(select_next(&schedule, at(5, 10)), Some(PrayerName::Sunrise));
        assert_eq!(select_next(&schedule, at(14, 0)), Some(PrayerName::Asr));
        assert_eq!(select_next(&schedule, at(19, 44)), Some(PrayerName::Isha));
        assert_eq!(select_next(&schedule, at(19, 45)), None);
        assert_eq!(select_next(&schedule, at(23, 59)), None);
    }

    #[test]
    fn test_time_until_next() {
        let schedule = resolver(standard_times()).resolve(karachi(), day()).unwrap();
        assert_eq!(
            time_until_next(&schedule, at(14, 0)),
            Some(Duration::minutes(105))
        );
        assert_eq!(time_until_next(&schedule, at(20, 0)), None);
    }

    #[test]
    fn test_highlight_rule() {
        assert!(is_highlighted(PrayerName::Asr, Some(PrayerName::Asr)));
        assert!(!is_highlighted(PrayerName::Fajr, Some(PrayerName::Asr)));
        assert!(is_highlighted(PrayerName::Fajr, None));
        assert!(!is_highlighted(PrayerName::Isha, None));
    }
}
