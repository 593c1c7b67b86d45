//! Constraint configuration and runtime settings.
//!
//! [`Constraints`] is what the presentation layer sends: labels, optional caps, loosely shaped
//! lists. [`Constraints::validate`] runs once per request and produces [`ValidatedConstraints`],
//! where every label is resolved to a [`Slot`] and every optional cap has its default applied.

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::data::{BatchId, FacultyId, RoomId, SubjectId};
use crate::error::ConfigError;
use crate::schedule::Slot;

const DEFAULT_DAYS: [&str; 5] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"];
const DEFAULT_PERIODS: [&str; 7] = [
    "09-10", "10-11", "11-12", "12-13", "13-14", "14-15", "15-16",
];

pub const DEFAULT_OPTION_COUNT: usize = 2;
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
pub const BIND_ADDR_ENV: &str = "TIMETABLE_BIND_ADDR";

/// The weekly grid: day labels by period labels.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct WeekTemplate {
    pub days: Vec<String>,
    pub periods: Vec<String>,
}

impl Default for WeekTemplate {
    fn default() -> Self {
        Self {
            days: DEFAULT_DAYS.iter().map(|d| d.to_string()).collect(),
            periods: DEFAULT_PERIODS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl WeekTemplate {
    /// Every slot, day-major.
    pub fn slots(&self) -> impl Iterator<Item = Slot> + '_ {
        (0..self.days.len()).flat_map(|day| (0..self.periods.len()).map(move |p| Slot::new(day, p)))
    }

    pub fn slot_count(&self) -> usize {
        self.days.len() * self.periods.len()
    }

    pub fn day_index(&self, label: &str) -> Option<usize> {
        self.days.iter().position(|d| d == label)
    }

    pub fn period_index(&self, label: &str) -> Option<usize> {
        self.periods.iter().position(|p| p == label)
    }

    /// Human-readable "Day-Period" key, e.g. "Monday-09-10".
    pub fn label(&self, slot: Slot) -> String {
        match (self.days.get(slot.day), self.periods.get(slot.period)) {
            (Some(day), Some(period)) => format!("{day}-{period}"),
            _ => format!("{}-{}", slot.day, slot.period),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.days.is_empty() {
            return Err(ConfigError::NoDays);
        }
        if self.periods.is_empty() {
            return Err(ConfigError::NoPeriods);
        }
        let mut seen = HashSet::new();
        if let Some(day) = self.days.iter().find(|d| !seen.insert(d.as_str())) {
            return Err(ConfigError::DuplicateDay(day.clone()));
        }
        seen.clear();
        if let Some(period) = self.periods.iter().find(|p| !seen.insert(p.as_str())) {
            return Err(ConfigError::DuplicatePeriod(period.clone()));
        }
        Ok(())
    }

    fn resolve(&self, slot: &SlotRef, context: &str) -> Result<Slot, ConfigError> {
        let day = self
            .day_index(&slot.day)
            .ok_or_else(|| ConfigError::UnknownDay {
                label: slot.day.clone(),
                context: context.to_string(),
            })?;
        let period = self.resolve_period(&slot.period, context)?;
        Ok(Slot::new(day, period))
    }

    fn resolve_period(&self, label: &str, context: &str) -> Result<usize, ConfigError> {
        self.period_index(label)
            .ok_or_else(|| ConfigError::UnknownPeriod {
                label: label.to_string(),
                context: context.to_string(),
            })
    }
}

/// A slot named by its labels.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct SlotRef {
    pub day: String,
    pub period: String,
}

/// An administrator-fixed lecture.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PinnedLecture {
    pub subject_id: SubjectId,
    pub faculty_id: FacultyId,
    pub batch_id: BatchId,
    pub room_id: RoomId,
    pub day: String,
    pub period: String,
}

/// Two subjects whose lectures may not share a slot.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubjectRelation {
    pub first: SubjectId,
    pub second: SubjectId,
}

/// Constraint configuration as supplied per generation request. Every field is optional;
/// absent fields, and caps given as 0, mean "no restriction".
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Constraints {
    /// Lectures per batch per day.
    pub max_classes_per_day: Option<u32>,
    /// Lectures per faculty member per week.
    pub max_classes_per_week: Option<u32>,
    pub max_consecutive_faculty_hours: Option<u32>,
    pub max_consecutive_batch_hours: Option<u32>,
    /// Period label kept free of lectures.
    pub lunch_break: Option<String>,
    pub pinned_lectures: Vec<PinnedLecture>,
    pub faculty_unavailability: HashMap<FacultyId, Vec<SlotRef>>,
    pub subject_relations: Vec<SubjectRelation>,
    pub week: WeekTemplate,
}

/// A pin with its slot resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPin {
    pub slot: Slot,
    pub subject_id: SubjectId,
    pub faculty_id: FacultyId,
    pub batch_id: BatchId,
    pub room_id: RoomId,
}

/// Constraint configuration after validation. Read-only for the rest of the run.
#[derive(Debug, Clone, Default)]
pub struct ValidatedConstraints {
    pub week: WeekTemplate,
    pub lunch_period: Option<usize>,
    pub max_classes_per_day: Option<usize>,
    pub max_classes_per_week: Option<usize>,
    pub max_consecutive_faculty_hours: Option<usize>,
    pub max_consecutive_batch_hours: Option<usize>,
    pub pins: Vec<ResolvedPin>,
    pub unavailable: HashMap<FacultyId, HashSet<Slot>>,
    pub relations: HashMap<SubjectId, HashSet<SubjectId>>,
}

impl ValidatedConstraints {
    pub fn is_unavailable(&self, faculty_id: &str, slot: Slot) -> bool {
        self.unavailable
            .get(faculty_id)
            .is_some_and(|slots| slots.contains(&slot))
    }

    pub fn related_subjects(&self, subject_id: &str) -> Option<&HashSet<SubjectId>> {
        self.relations.get(subject_id)
    }
}

fn cap(name: &str, value: Option<u32>) -> Option<usize> {
    match value {
        Some(0) => {
            debug!("{name} is 0, treating it as no restriction");
            None
        }
        other => other.map(|v| v as usize),
    }
}

impl Constraints {
    pub fn validate(&self) -> Result<ValidatedConstraints, ConfigError> {
        self.week.validate()?;

        let lunch_period = self
            .lunch_break
            .as_deref()
            .map(|label| self.week.resolve_period(label, "lunchBreak"))
            .transpose()?;

        let pins = self
            .pinned_lectures
            .iter()
            .map(|pin| {
                let context = format!("pinned lecture {}/{}", pin.subject_id, pin.batch_id);
                let slot_ref = SlotRef {
                    day: pin.day.clone(),
                    period: pin.period.clone(),
                };
                Ok(ResolvedPin {
                    slot: self.week.resolve(&slot_ref, &context)?,
                    subject_id: pin.subject_id.clone(),
                    faculty_id: pin.faculty_id.clone(),
                    batch_id: pin.batch_id.clone(),
                    room_id: pin.room_id.clone(),
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        let mut unavailable: HashMap<FacultyId, HashSet<Slot>> = HashMap::new();
        for (faculty_id, slots) in &self.faculty_unavailability {
            let context = format!("unavailability of {faculty_id}");
            let resolved = slots
                .iter()
                .map(|s| self.week.resolve(s, &context))
                .collect::<Result<HashSet<_>, _>>()?;
            unavailable.insert(faculty_id.clone(), resolved);
        }

        let mut relations: HashMap<SubjectId, HashSet<SubjectId>> = HashMap::new();
        for relation in &self.subject_relations {
            relations
                .entry(relation.first.clone())
                .or_default()
                .insert(relation.second.clone());
            relations
                .entry(relation.second.clone())
                .or_default()
                .insert(relation.first.clone());
        }

        Ok(ValidatedConstraints {
            week: self.week.clone(),
            lunch_period,
            max_classes_per_day: cap("maxClassesPerDay", self.max_classes_per_day),
            max_classes_per_week: cap("maxClassesPerWeek", self.max_classes_per_week),
            max_consecutive_faculty_hours: cap(
                "maxConsecutiveFacultyHours",
                self.max_consecutive_faculty_hours,
            ),
            max_consecutive_batch_hours: cap(
                "maxConsecutiveBatchHours",
                self.max_consecutive_batch_hours,
            ),
            pins,
            unavailable,
            relations,
        })
    }
}

/// Per-request engine knobs.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineSettings {
    pub option_count: usize,
    /// Fixed seed for reproducible runs. A fresh one is drawn when absent.
    pub seed: Option<u64>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            option_count: DEFAULT_OPTION_COUNT,
            seed: None,
        }
    }
}

impl EngineSettings {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_option_count(mut self, option_count: usize) -> Self {
        self.option_count = option_count;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.option_count == 0 {
            return Err(ConfigError::ZeroOptions);
        }
        Ok(())
    }
}

/// HTTP server settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
}

impl ServerConfig {
    /// Reads `TIMETABLE_BIND_ADDR`, falling back to 127.0.0.1:8080.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = std::env::var(BIND_ADDR_ENV).unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let bind_addr = raw
            .parse()
            .map_err(|_| ConfigError::InvalidAddress(raw.to_string()))?;
        Ok(Self { bind_addr })
    }
}
