//! State - Dashboard model driven by messages and clock ticks

use chrono::{DateTime, NaiveDate, Utc};
use noor_common::labels::Language;
use noor_common::location::LocationOutcome;
use noor_common::oracle::CalculationMethod;
use noor_common::schedule::ScheduleResolver;
use noor_common::session::{Phase, PrayerSession};
use noor_common::{PrayerName, Reflection, ScheduleError};

/// Results delivered by background tasks
#[derive(Debug)]
pub enum DashboardMessage {
    Location(LocationOutcome),
    Reflection(Reflection),
}

pub struct DashboardState {
    pub session: PrayerSession,
    pub resolver: ScheduleResolver,
    pub language: Language,
    /// Reference instant of the last tick
    pub now: DateTime<Utc>,
    /// Calendar day the schedule should describe
    pub today: NaiveDate,
    /// Selection at `now`, refreshed on every message and tick
    pub next: Option<PrayerName>,
}

impl DashboardState {
    pub fn new(resolver: ScheduleResolver, language: Language, now: DateTime<Utc>, today: NaiveDate) -> Self {
        Self {
            session: PrayerSession::new(),
            resolver,
            language,
            now,
            today,
            next: None,
        }
    }

    pub fn method(&self) -> CalculationMethod {
        self.resolver.method()
    }

    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    /// Apply a background result
    pub fn handle_message(&mut self, message: DashboardMessage) -> Result<(), ScheduleError> {
        match message {
            DashboardMessage::Location(outcome) => {
                if let LocationOutcome::Denied { reason, .. } = &outcome {
                    tracing::warn!(reason = %reason, "Location denied, using fallback");
                }
                self.session.set_location(&outcome);
                self.session.refresh_schedule(&self.resolver, self.today)?;
            }
            DashboardMessage::Reflection(reflection) => {
                tracing::debug!(reference = %reflection.reference_label, "Reflection received");
                self.session.set_reflection(reflection);
            }
        }
        self.update_selection();
        Ok(())
    }

    /// Advance the clock; a day change re-resolves the schedule
    pub fn tick(&mut self, now: DateTime<Utc>, today: NaiveDate) -> Result<(), ScheduleError> {
        self.now = now;
        self.today = today;
        if self.session.is_stale(today) {
            tracing::info!(%today, "Day changed, resolving new schedule");
            self.session.refresh_schedule(&self.resolver, today)?;
        }
        self.update_selection();
        Ok(())
    }

    fn update_selection(&mut self) {
        let next = self.session.next_prayer(self.now);
        if next != self.next {
            tracing::debug!(?next, now = %self.now, "Next prayer changed");
            self.next = next;
        }
    }
}
