//! External oracles for prayer instants and Hijri labels
//!
//! The astronomy and the calendar arithmetic live in `salah` and
//! `icu_calendar`. This module only adapts their shapes to ours, behind
//! traits so the resolver can be driven by fakes in tests.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use icu_calendar::{islamic::IslamicUmmAlQura, Date};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use crate::error::ScheduleError;
use crate::labels::{hijri_label, Language};
use crate::types::{GeoCoordinate, PrayerName};

/// Named angle convention used by the time oracle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodName {
    MuslimWorldLeague,
    Egyptian,
    #[default]
    Karachi,
    UmmAlQura,
    Dubai,
    MoonsightingCommittee,
    NorthAmerica,
    Kuwait,
    Qatar,
    Singapore,
}

impl MethodName {
    pub fn parse(s: &str) -> Option<Self> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "muslimworldleague" | "mwl" => Some(Self::MuslimWorldLeague),
            "egyptian" | "egypt" => Some(Self::Egyptian),
            "karachi" => Some(Self::Karachi),
            "ummalqura" | "makkah" => Some(Self::UmmAlQura),
            "dubai" => Some(Self::Dubai),
            "moonsightingcommittee" | "moonsighting" => Some(Self::MoonsightingCommittee),
            "northamerica" | "isna" => Some(Self::NorthAmerica),
            "kuwait" => Some(Self::Kuwait),
            "qatar" => Some(Self::Qatar),
            "singapore" => Some(Self::Singapore),
            _ => None,
        }
    }

    fn to_salah(self) -> salah::prelude::Method {
        use salah::prelude::Method;
        match self {
            Self::MuslimWorldLeague => Method::MuslimWorldLeague,
            Self::Egyptian => Method::Egyptian,
            Self::Karachi => Method::Karachi,
            Self::UmmAlQura => Method::UmmAlQura,
            Self::Dubai => Method::Dubai,
            Self::MoonsightingCommittee => Method::MoonsightingCommittee,
            Self::NorthAmerica => Method::NorthAmerica,
            Self::Kuwait => Method::Kuwait,
            Self::Qatar => Method::Qatar,
            Self::Singapore => Method::Singapore,
        }
    }
}

impl fmt::Display for MethodName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MuslimWorldLeague => "Muslim World League",
            Self::Egyptian => "Egyptian",
            Self::Karachi => "Karachi",
            Self::UmmAlQura => "Umm al-Qura",
            Self::Dubai => "Dubai",
            Self::MoonsightingCommittee => "Moonsighting Committee",
            Self::NorthAmerica => "North America",
            Self::Kuwait => "Kuwait",
            Self::Qatar => "Qatar",
            Self::Singapore => "Singapore",
        };
        f.write_str(name)
    }
}

/// Asr shadow convention
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Madhab {
    #[default]
    Shafi,
    Hanafi,
}

impl Madhab {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "shafi" | "standard" => Some(Self::Shafi),
            "hanafi" => Some(Self::Hanafi),
            _ => None,
        }
    }

    fn to_salah(self) -> salah::prelude::Madhab {
        match self {
            Self::Shafi => salah::prelude::Madhab::Shafi,
            Self::Hanafi => salah::prelude::Madhab::Hanafi,
        }
    }
}

/// Calculation configuration, selected once per deployment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationMethod {
    #[serde(default)]
    pub method: MethodName,
    #[serde(default)]
    pub madhab: Madhab,
}

impl fmt::Display for CalculationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.madhab {
            Madhab::Shafi => write!(f, "{}", self.method),
            Madhab::Hanafi => write!(f, "{} (Hanafi)", self.method),
        }
    }
}

/// Labelled instants for one day, in whatever order the oracle produced them
pub type OracleTimes = Vec<(PrayerName, DateTime<Utc>)>;

/// Time-calculation oracle: (coordinate, date, method) -> six instants
pub trait TimeOracle: Send + Sync {
    fn prayer_times(
        &self,
        coordinate: GeoCoordinate,
        date: NaiveDate,
        method: &CalculationMethod,
    ) -> Result<OracleTimes, ScheduleError>;
}

/// Calendar-label oracle: civil date -> Hijri label
pub trait CalendarOracle: Send + Sync {
    fn hijri_label(&self, date: NaiveDate) -> Result<String, ScheduleError>;
}

/// Time oracle backed by the `salah` crate
#[derive(Debug, Default, Clone, Copy)]
pub struct SalahOracle;

impl TimeOracle for SalahOracle {
    fn prayer_times(
        &self,
        coordinate: GeoCoordinate,
        date: NaiveDate,
        method: &CalculationMethod,
    ) -> Result<OracleTimes, ScheduleError> {
        use salah::prelude::{Configuration, Coordinates, Prayer, PrayerSchedule};

        tracing::debug!(%coordinate, %date, %method, "Computing prayer times");

        let params = Configuration::with(method.method.to_salah(), method.madhab.to_salah());
        let location = Coordinates::new(coordinate.latitude(), coordinate.longitude());

        // salah unwraps undefined sun events (high latitudes around the
        // solstices) instead of returning an error
        let computed = panic::catch_unwind(AssertUnwindSafe(|| {
            PrayerSchedule::new()
                .on(date)
                .for_location(location)
                .with_configuration(params)
                .calculate()
                .map(|times| {
                    vec![
                        (PrayerName::Fajr, times.time(Prayer::Fajr)),
                        (PrayerName::Sunrise, times.time(Prayer::Sunrise)),
                        (PrayerName::Dhuhr, times.time(Prayer::Dhuhr)),
                        (PrayerName::Asr, times.time(Prayer::Asr)),
                        (PrayerName::Maghrib, times.time(Prayer::Maghrib)),
                        (PrayerName::Isha, times.time(Prayer::Isha)),
                    ]
                })
        }));

        match computed {
            Ok(Ok(times)) => Ok(times),
            Ok(Err(e)) => Err(ScheduleError::ComputationUnavailable(e.to_string())),
            Err(_) => {
                tracing::warn!(%coordinate, %date, "Sun events undefined at this latitude");
                Err(ScheduleError::ComputationUnavailable(format!(
                    "sun events undefined at {} on {}",
                    coordinate, date
                )))
            }
        }
    }
}

/// Umm al-Qura calendar labels via `icu_calendar`
#[derive(Debug, Clone, Copy)]
pub struct UmmAlQuraCalendar {
    language: Language,
}

impl UmmAlQuraCalendar {
    pub fn new(language: Language) -> Self {
        Self { language }
    }
}

impl CalendarOracle for UmmAlQuraCalendar {
    fn hijri_label(&self, date: NaiveDate) -> Result<String, ScheduleError> {
        let iso = Date::try_new_iso_date(date.year(), date.month() as u8, date.day() as u8)
            .map_err(|e| ScheduleError::CalendarUnavailable(format!("{:?}", e)))?;
        let hijri = iso.to_calendar(IslamicUmmAlQura::new());

        Ok(hijri_label(
            hijri.year().number,
            hijri.month().ordinal,
            hijri.day_of_month().0,
            self.language,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parse() {
        assert_eq!(MethodName::parse("Karachi"), Some(MethodName::Karachi));
        assert_eq!(MethodName::parse("umm_al_qura"), Some(MethodName::UmmAlQura));
        assert_eq!(MethodName::parse("Muslim World League"), Some(MethodName::MuslimWorldLeague));
        assert_eq!(MethodName::parse("ISNA"), Some(MethodName::NorthAmerica));
        assert_eq!(MethodName::parse("lunar"), None);
    }

    #[test]
    fn test_method_display() {
        let m = CalculationMethod::default();
        assert_eq!(m.to_string(), "Karachi");

        let hanafi = CalculationMethod {
            method: MethodName::Karachi,
            madhab: Madhab::Hanafi,
        };
        assert_eq!(hanafi.to_string(), "Karachi (Hanafi)");
    }

    #[test]
    fn test_salah_oracle_karachi_day_is_ordered() {
        let karachi = GeoCoordinate::new(24.8607, 67.0011).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let times = SalahOracle
            .prayer_times(karachi, date, &CalculationMethod::default())
            .unwrap();

        assert_eq!(times.len(), 6);
        for pair in times.windows(2) {
            assert!(pair[0].1 < pair[1].1, "{:?} not before {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_salah_oracle_undefined_sun_events_fail() {
        let cases = [
            (59.9, 10.7, NaiveDate::from_ymd_opt(2024, 6, 21).unwrap()),
            (80.0, 15.0, NaiveDate::from_ymd_opt(2024, 12, 21).unwrap()),
            (80.0, 15.0, NaiveDate::from_ymd_opt(2024, 6, 21).unwrap()),
        ];
        for (lat, lon, date) in cases {
            let coordinate = GeoCoordinate::new(lat, lon).unwrap();
            let result = SalahOracle.prayer_times(coordinate, date, &CalculationMethod::default());
            assert!(
                matches!(result, Err(ScheduleError::ComputationUnavailable(_))),
                "({}, {}) on {}: {:?}",
                lat,
                lon,
                date,
                result
            );
        }
    }

    #[test]
    fn test_hijri_label_english() {
        // 1 Ramadan 1445 fell on 11 March 2024 under Umm al-Qura
        let cal = UmmAlQuraCalendar::new(Language::English);
        let label = cal
            .hijri_label(NaiveDate::from_ymd_opt(2024, 3, 11).unwrap())
            .unwrap();
        assert_eq!(label, "1 Ramadan 1445");
    }
}
