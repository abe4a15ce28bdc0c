//! Core data model: coordinates, prayer events, daily schedules, reflections

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ScheduleError;

/// A position on the globe, validated on construction
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoCoordinate {
    latitude: f64,
    longitude: f64,
}

impl GeoCoordinate {
    /// Build a coordinate, rejecting values outside [-90,90] x [-180,180]
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ScheduleError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(ScheduleError::InvalidCoordinate(format!(
                "latitude {} outside [-90, 90]",
                latitude
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(ScheduleError::InvalidCoordinate(format!(
                "longitude {} outside [-180, 180]",
                longitude
            )));
        }
        Ok(Self { latitude, longitude })
    }

    /// For compile-time constants known to be in range
    pub(crate) const fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for GeoCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ns = if self.latitude >= 0.0 { 'N' } else { 'S' };
        let ew = if self.longitude >= 0.0 { 'E' } else { 'W' };
        write!(
            f,
            "{:.4}° {}, {:.4}° {}",
            self.latitude.abs(),
            ns,
            self.longitude.abs(),
            ew
        )
    }
}

/// The six daily markers, declared in chronological order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrayerName {
    Fajr,
    Sunrise,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl PrayerName {
    /// Fixed order, Fajr earliest and Isha latest
    pub const ALL: [PrayerName; 6] = [
        PrayerName::Fajr,
        PrayerName::Sunrise,
        PrayerName::Dhuhr,
        PrayerName::Asr,
        PrayerName::Maghrib,
        PrayerName::Isha,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PrayerName::Fajr => "fajr",
            PrayerName::Sunrise => "sunrise",
            PrayerName::Dhuhr => "dhuhr",
            PrayerName::Asr => "asr",
            PrayerName::Maghrib => "maghrib",
            PrayerName::Isha => "isha",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "fajr" => Some(PrayerName::Fajr),
            "sunrise" => Some(PrayerName::Sunrise),
            "dhuhr" | "zuhr" => Some(PrayerName::Dhuhr),
            "asr" => Some(PrayerName::Asr),
            "maghrib" => Some(PrayerName::Maghrib),
            "isha" => Some(PrayerName::Isha),
            _ => None,
        }
    }
}

impl fmt::Display for PrayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PrayerName::Fajr => "Fajr",
            PrayerName::Sunrise => "Sunrise",
            PrayerName::Dhuhr => "Dhuhr",
            PrayerName::Asr => "Asr",
            PrayerName::Maghrib => "Maghrib",
            PrayerName::Isha => "Isha",
        };
        f.write_str(name)
    }
}

/// One labelled instant of the day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrayerEvent {
    pub name: PrayerName,
    pub instant: DateTime<Utc>,
}

/// Schedule for one (coordinate, civil day) pair
///
/// Only the resolver builds these, so the six events are always present and
/// strictly ascending in `PrayerName::ALL` order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySchedule {
    calendar_date: NaiveDate,
    hijri_date: String,
    coordinate: GeoCoordinate,
    events: [PrayerEvent; 6],
}

impl DailySchedule {
    pub(crate) fn new(
        calendar_date: NaiveDate,
        hijri_date: String,
        coordinate: GeoCoordinate,
        events: [PrayerEvent; 6],
    ) -> Self {
        Self {
            calendar_date,
            hijri_date,
            coordinate,
            events,
        }
    }

    pub fn calendar_date(&self) -> NaiveDate {
        self.calendar_date
    }

    pub fn hijri_date(&self) -> &str {
        &self.hijri_date
    }

    pub fn coordinate(&self) -> GeoCoordinate {
        self.coordinate
    }

    pub fn events(&self) -> &[PrayerEvent; 6] {
        &self.events
    }

    pub fn event(&self, name: PrayerName) -> &PrayerEvent {
        // events[i].name == ALL[i] by construction
        &self.events[name as usize]
    }
}

/// Devotional text shown beside the schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reflection {
    #[serde(rename = "hadith")]
    pub hadith_text: String,
    #[serde(rename = "reference")]
    pub reference_label: String,
    #[serde(rename = "reflection")]
    pub reflection_text: String,
}
