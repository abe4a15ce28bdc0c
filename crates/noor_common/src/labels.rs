//! Display labels in Urdu and English
//!
//! Prayer names, Hijri and Gregorian month names, 12-hour times, countdowns,
//! and the fixed texts shown on the dashboard.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Weekday};
use serde::{Deserialize, Serialize};

use crate::types::PrayerName;

/// Display language
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Urdu,
    English,
}

impl Language {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "urdu" | "ur" => Some(Self::Urdu),
            "english" | "en" => Some(Self::English),
            _ => None,
        }
    }
}

/// Shown when location access fails and the fallback city is used
pub fn location_advisory(language: Language) -> &'static str {
    match language {
        Language::Urdu => "مقام تک رسائی ممکن نہیں ہو سکی۔ کراچی کے اوقات دکھائے جا رہے ہیں۔",
        Language::English => "Location access was not possible. Showing prayer times for Karachi.",
    }
}

/// Daily supplication (Ibrahim 14:40) and its translation
pub const DAILY_DUA: &str = "رَبِّ اجْعَلْنِي مُقِيمَ الصَّلَاةِ وَمِن ذُرِّيَّتِي ۚ رَبَّنَا وَتَقَبَّلْ دُعَاءِ";

pub fn daily_dua_translation(language: Language) -> &'static str {
    match language {
        Language::Urdu => "اے میرے رب، مجھے اور میری اولاد کو نماز قائم کرنے والا بنا۔",
        Language::English => {
            "My Lord, make me an establisher of prayer, and from my descendants. Our Lord, accept my supplication."
        }
    }
}

pub fn app_title(language: Language) -> &'static str {
    match language {
        Language::Urdu => "نور",
        Language::English => "Noor",
    }
}

pub fn loading_text(language: Language) -> &'static str {
    match language {
        Language::Urdu => "نور دعا... براہ کرم انتظار کریں",
        Language::English => "Noor... please wait",
    }
}

pub fn next_prayer_heading(language: Language) -> &'static str {
    match language {
        Language::Urdu => "اگلی نماز",
        Language::English => "Next prayer",
    }
}

pub fn hadith_heading(language: Language) -> &'static str {
    match language {
        Language::Urdu => "آج کی حدیث",
        Language::English => "Hadith of the day",
    }
}

pub fn hijri_suffix(language: Language) -> &'static str {
    match language {
        Language::Urdu => "ھ",
        Language::English => "AH",
    }
}

/// Name of a prayer, or the waiting label when none remains today
pub fn prayer_label(name: Option<PrayerName>, language: Language) -> &'static str {
    match language {
        Language::Urdu => match name {
            Some(PrayerName::Fajr) => "فجر",
            Some(PrayerName::Sunrise) => "طلوعِ آفتاب",
            Some(PrayerName::Dhuhr) => "ظہر",
            Some(PrayerName::Asr) => "عصر",
            Some(PrayerName::Maghrib) => "مغرب",
            Some(PrayerName::Isha) => "عشاء",
            None => "انتظار",
        },
        Language::English => match name {
            Some(PrayerName::Fajr) => "Fajr",
            Some(PrayerName::Sunrise) => "Sunrise",
            Some(PrayerName::Dhuhr) => "Dhuhr",
            Some(PrayerName::Asr) => "Asr",
            Some(PrayerName::Maghrib) => "Maghrib",
            Some(PrayerName::Isha) => "Isha",
            None => "Waiting",
        },
    }
}

const HIJRI_MONTHS_UR: [&str; 12] = [
    "محرم",
    "صفر",
    "ربیع الاول",
    "ربیع الثانی",
    "جمادی الاول",
    "جمادی الثانی",
    "رجب",
    "شعبان",
    "رمضان",
    "شوال",
    "ذوالقعدۃ",
    "ذوالحجۃ",
];

const HIJRI_MONTHS_EN: [&str; 12] = [
    "Muharram",
    "Safar",
    "Rabi al-Awwal",
    "Rabi al-Thani",
    "Jumada al-Ula",
    "Jumada al-Akhirah",
    "Rajab",
    "Sha'ban",
    "Ramadan",
    "Shawwal",
    "Dhu al-Qadah",
    "Dhu al-Hijjah",
];

const GREGORIAN_MONTHS_UR: [&str; 12] = [
    "جنوری", "فروری", "مارچ", "اپریل", "مئی", "جون", "جولائی", "اگست", "ستمبر", "اکتوبر", "نومبر",
    "دسمبر",
];

/// "day month year" for a Hijri date; `month` is 1-based
pub fn hijri_label(year: i32, month: u32, day: u32, language: Language) -> String {
    let names = match language {
        Language::Urdu => &HIJRI_MONTHS_UR,
        Language::English => &HIJRI_MONTHS_EN,
    };
    let month_name = month
        .checked_sub(1)
        .and_then(|i| names.get(i as usize))
        .copied()
        .unwrap_or("?");
    format!("{} {} {}", day, month_name, year)
}

fn weekday_ur(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "پیر",
        Weekday::Tue => "منگل",
        Weekday::Wed => "بدھ",
        Weekday::Thu => "جمعرات",
        Weekday::Fri => "جمعہ",
        Weekday::Sat => "ہفتہ",
        Weekday::Sun => "اتوار",
    }
}

/// Long civil date, e.g. "جمعہ، 15 مارچ 2024" or "Friday, 15 March 2024"
pub fn civil_date_label(date: NaiveDate, language: Language) -> String {
    match language {
        Language::Urdu => format!(
            "{}، {} {} {}",
            weekday_ur(date.weekday()),
            date.day(),
            GREGORIAN_MONTHS_UR[date.month0() as usize],
            date.year()
        ),
        Language::English => date.format("%A, %-d %B %Y").to_string(),
    }
}

/// "05:10 AM" style
pub fn format_time<Tz: TimeZone>(instant: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    instant.format("%I:%M %p").to_string()
}

/// "05:10:42 AM" style, for the ticking clock
pub fn format_clock<Tz: TimeZone>(instant: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    instant.format("%I:%M:%S %p").to_string()
}

/// "HH:MM:SS" countdown, clamped at zero
pub fn format_countdown(remaining: Duration) -> String {
    let secs = remaining.num_seconds().max(0);
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_prayer_labels() {
        assert_eq!(prayer_label(Some(PrayerName::Asr), Language::Urdu), "عصر");
        assert_eq!(prayer_label(None, Language::Urdu), "انتظار");
        assert_eq!(prayer_label(None, Language::English), "Waiting");
        assert_eq!(prayer_label(Some(PrayerName::Isha), Language::English), "Isha");
    }

    #[test]
    fn test_hijri_label() {
        assert_eq!(hijri_label(1445, 9, 1, Language::English), "1 Ramadan 1445");
        assert_eq!(hijri_label(1447, 3, 12, Language::Urdu), "12 ربیع الاول 1447");
        assert_eq!(hijri_label(1447, 13, 1, Language::English), "1 ? 1447");
    }

    #[test]
    fn test_civil_date_label() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(civil_date_label(date, Language::English), "Friday, 15 March 2024");
        assert_eq!(civil_date_label(date, Language::Urdu), "جمعہ، 15 مارچ 2024");
    }

    #[test]
    fn test_time_formatting() {
        let t = Utc.with_ymd_and_hms(2024, 3, 15, 17, 5, 9).unwrap();
        assert_eq!(format_time(&t), "05:05 PM");
        assert_eq!(format_clock(&t), "05:05:09 PM");
    }

    #[test]
    fn test_countdown() {
        assert_eq!(format_countdown(Duration::seconds(3725)), "01:02:05");
        assert_eq!(format_countdown(Duration::seconds(-5)), "00:00:00");
    }

    #[test]
    fn test_language_parse() {
        assert_eq!(Language::parse("EN"), Some(Language::English));
        assert_eq!(Language::parse("urdu"), Some(Language::Urdu));
        assert_eq!(Language::parse("fr"), None);
    }
}
