//! Slots, assignments and the per-run schedule state.
//!
//! A run owns one [`ScheduleBuilder`]. The builder keeps the assignments keyed by slot plus an
//! occupancy index of (slot, resource kind) -> resource ids, so conflict checks are hash lookups.
//! When the run finishes the builder is frozen into a [`Schedule`].

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::config::WeekTemplate;
use crate::data::{BatchId, FacultyId, RoomId, SubjectId};

/// A (day, period) coordinate in the weekly template. Both are zero-based indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub struct Slot {
    pub day: usize,
    pub period: usize,
}

impl Slot {
    pub fn new(day: usize, period: usize) -> Self {
        Self { day, period }
    }
}

/// How an assignment got into the schedule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Placement {
    #[default]
    Search,
    Pinned,
    Manual,
}

/// The resource dimensions a slot can be double-booked on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Teacher,
    Room,
    Batch,
}

/// One lecture occupying one slot.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    #[serde(flatten)]
    pub slot: Slot,
    pub subject_id: SubjectId,
    pub subject: String,
    pub teacher_id: FacultyId,
    pub teacher: String,
    pub room: RoomId,
    pub batch: BatchId,
    #[serde(default)]
    pub source: Placement,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_clash: bool,
    /// The entry this one collided with when it was forced into the slot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original: Option<Box<Assignment>>,
}

impl Assignment {
    /// True if both lectures need the same teacher, room or batch.
    pub fn shares_resource(&self, other: &Assignment) -> bool {
        self.teacher_id == other.teacher_id || self.room == other.room || self.batch == other.batch
    }

    /// Reviewer hint for a flagged clash.
    pub fn clash_suggestion(&self, week: &WeekTemplate) -> Option<String> {
        let original = self.original.as_ref().filter(|_| self.is_clash)?;
        Some(format!(
            "Resolve conflict for \"{}\" and \"{}\" in slot {}. Try moving one to an empty slot.",
            self.subject,
            original.subject,
            week.label(self.slot)
        ))
    }

    fn resource_id(&self, kind: ResourceKind) -> &str {
        match kind {
            ResourceKind::Teacher => &self.teacher_id,
            ResourceKind::Room => &self.room,
            ResourceKind::Batch => &self.batch,
        }
    }
}

const RESOURCE_KINDS: [ResourceKind; 3] =
    [ResourceKind::Teacher, ResourceKind::Room, ResourceKind::Batch];

// Flags every entry that shares a resource with an earlier entry in the same slot.
fn reflag_slot(entries: &mut [Assignment]) {
    for i in 0..entries.len() {
        let (earlier, rest) = entries.split_at_mut(i);
        let current = &mut rest[0];
        match earlier.iter().find(|e| e.shares_resource(current)) {
            Some(first) => {
                let mut original = first.clone();
                original.original = None;
                current.is_clash = true;
                current.original = Some(Box::new(original));
            }
            None => {
                current.is_clash = false;
                current.original = None;
            }
        }
    }
}

/// Mutable schedule state owned by a single generation run.
#[derive(Debug, Default)]
pub struct ScheduleBuilder {
    entries: BTreeMap<Slot, Vec<Assignment>>,
    occupied: HashMap<(Slot, ResourceKind), HashSet<String>>,
}

impl ScheduleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_occupied(&self, slot: Slot, kind: ResourceKind, id: &str) -> bool {
        self.occupied
            .get(&(slot, kind))
            .is_some_and(|ids| ids.contains(id))
    }

    pub fn entries_at(&self, slot: Slot) -> &[Assignment] {
        self.entries.get(&slot).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Length of the contiguous run of occupied periods on `slot.day` for this resource,
    /// counting `slot` itself as occupied.
    pub fn run_length(
        &self,
        slot: Slot,
        kind: ResourceKind,
        id: &str,
        periods_per_day: usize,
    ) -> usize {
        let busy = |period: usize| self.is_occupied(Slot::new(slot.day, period), kind, id);
        let before = (0..slot.period).rev().take_while(|&p| busy(p)).count();
        let after = (slot.period + 1..periods_per_day)
            .take_while(|&p| busy(p))
            .count();
        before + 1 + after
    }

    /// Number of occupied periods for this resource on one day.
    pub fn day_load(&self, day: usize, kind: ResourceKind, id: &str, periods_per_day: usize) -> usize {
        (0..periods_per_day)
            .filter(|&p| self.is_occupied(Slot::new(day, p), kind, id))
            .count()
    }

    /// Number of occupied slots for this resource across the week.
    pub fn week_load(&self, kind: ResourceKind, id: &str) -> usize {
        self.occupied
            .iter()
            .filter(|((_, k), ids)| *k == kind && ids.contains(id))
            .count()
    }

    /// Commits an assignment the caller has already checked for admissibility.
    pub fn place(&mut self, assignment: Assignment) {
        self.mark(&assignment);
        self.entries
            .entry(assignment.slot)
            .or_default()
            .push(assignment);
    }

    /// Places an assignment without any admissibility check. If it shares a resource with an
    /// entry already in the slot it is kept and flagged as a clash. Returns true on clash.
    pub fn force_place(&mut self, assignment: Assignment) -> bool {
        self.mark(&assignment);
        let entries = self.entries.entry(assignment.slot).or_default();
        entries.push(assignment);
        reflag_slot(entries);
        entries.last().is_some_and(|a| a.is_clash)
    }

    fn mark(&mut self, assignment: &Assignment) {
        for kind in RESOURCE_KINDS {
            self.occupied
                .entry((assignment.slot, kind))
                .or_default()
                .insert(assignment.resource_id(kind).to_string());
        }
    }

    /// Freezes the run's state.
    pub fn finish(self) -> Schedule {
        Schedule {
            entries: self.entries,
        }
    }
}

/// A finished schedule: every assignment grouped by slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "Vec<Assignment>", into = "Vec<Assignment>")]
pub struct Schedule {
    entries: BTreeMap<Slot, Vec<Assignment>>,
}

impl Schedule {
    pub fn at(&self, slot: Slot) -> &[Assignment] {
        self.entries.get(&slot).map(Vec::as_slice).unwrap_or_default()
    }

    /// All assignments in slot order.
    pub fn assignments(&self) -> impl Iterator<Item = &Assignment> {
        self.entries.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clash_count(&self) -> usize {
        self.assignments().filter(|a| a.is_clash).count()
    }

    pub fn for_teacher<'a>(&'a self, teacher_id: &'a str) -> impl Iterator<Item = &'a Assignment> {
        self.assignments().filter(move |a| a.teacher_id == teacher_id)
    }

    pub fn for_batch<'a>(&'a self, batch_id: &'a str) -> impl Iterator<Item = &'a Assignment> {
        self.assignments().filter(move |a| a.batch == batch_id)
    }

    /// Lecture counts per slot as a days x periods grid, for density views.
    pub fn density(&self, week: &WeekTemplate) -> Vec<Vec<usize>> {
        let mut grid = vec![vec![0; week.periods.len()]; week.days.len()];
        for (slot, entries) in &self.entries {
            if let Some(cell) = grid
                .get_mut(slot.day)
                .and_then(|row| row.get_mut(slot.period))
            {
                *cell += entries.len();
            }
        }
        grid
    }

    /// Override path for manual edits. Same semantics as [`ScheduleBuilder::force_place`].
    pub fn force_place(&mut self, assignment: Assignment) -> bool {
        let entries = self.entries.entry(assignment.slot).or_default();
        entries.push(assignment);
        reflag_slot(entries);
        entries.last().is_some_and(|a| a.is_clash)
    }

    /// Removes the lecture a batch has in a slot. Remaining entries in the slot are re-flagged.
    pub fn remove(&mut self, slot: Slot, batch_id: &str) -> Option<Assignment> {
        let entries = self.entries.get_mut(&slot)?;
        let index = entries.iter().position(|a| a.batch == batch_id)?;
        let mut removed = entries.remove(index);
        reflag_slot(entries);
        if entries.is_empty() {
            self.entries.remove(&slot);
        }
        removed.is_clash = false;
        removed.original = None;
        Some(removed)
    }
}

impl From<Vec<Assignment>> for Schedule {
    fn from(assignments: Vec<Assignment>) -> Self {
        let mut entries: BTreeMap<Slot, Vec<Assignment>> = BTreeMap::new();
        for assignment in assignments {
            entries.entry(assignment.slot).or_default().push(assignment);
        }
        Self { entries }
    }
}

impl From<Schedule> for Vec<Assignment> {
    fn from(schedule: Schedule) -> Self {
        schedule.entries.into_values().flatten().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::assignment;

    #[test]
    fn test_place_marks_all_three_resources() {
        let mut builder = ScheduleBuilder::new();
        let slot = Slot::new(0, 2);
        builder.place(assignment(slot, "CS101", "F1", "R1", "B1"));

        assert!(builder.is_occupied(slot, ResourceKind::Teacher, "F1"));
        assert!(builder.is_occupied(slot, ResourceKind::Room, "R1"));
        assert!(builder.is_occupied(slot, ResourceKind::Batch, "B1"));
        assert!(!builder.is_occupied(slot, ResourceKind::Teacher, "F2"));
        assert!(!builder.is_occupied(Slot::new(0, 3), ResourceKind::Teacher, "F1"));
    }

    #[test]
    fn test_run_length_counts_candidate_and_neighbours() {
        let mut builder = ScheduleBuilder::new();
        builder.place(assignment(Slot::new(1, 0), "CS101", "F1", "R1", "B1"));
        builder.place(assignment(Slot::new(1, 1), "CS101", "F1", "R1", "B1"));
        builder.place(assignment(Slot::new(1, 3), "CS101", "F1", "R1", "B1"));
        builder.place(assignment(Slot::new(2, 2), "CS101", "F1", "R1", "B1"));

        // Periods 0, 1, 3 are busy on day 1; candidate 2 joins them into a run of four.
        assert_eq!(builder.run_length(Slot::new(1, 2), ResourceKind::Teacher, "F1", 7), 4);
        assert_eq!(builder.run_length(Slot::new(1, 5), ResourceKind::Teacher, "F1", 7), 1);
        assert_eq!(builder.run_length(Slot::new(1, 2), ResourceKind::Teacher, "F2", 7), 1);
    }

    #[test]
    fn test_loads() {
        let mut builder = ScheduleBuilder::new();
        builder.place(assignment(Slot::new(0, 0), "CS101", "F1", "R1", "B1"));
        builder.place(assignment(Slot::new(0, 4), "CS101", "F1", "R1", "B1"));
        builder.place(assignment(Slot::new(3, 1), "CS202", "F1", "R2", "B2"));

        assert_eq!(builder.day_load(0, ResourceKind::Batch, "B1", 7), 2);
        assert_eq!(builder.day_load(3, ResourceKind::Batch, "B1", 7), 0);
        assert_eq!(builder.week_load(ResourceKind::Teacher, "F1"), 3);
    }

    #[test]
    fn test_force_place_flags_clash_and_keeps_both() {
        let mut builder = ScheduleBuilder::new();
        let slot = Slot::new(0, 0);
        assert!(!builder.force_place(assignment(slot, "CS101", "F1", "R1", "B1")));
        assert!(builder.force_place(assignment(slot, "CS202", "F2", "R1", "B2")));

        let schedule = builder.finish();
        let entries = schedule.at(slot);
        assert_eq!(entries.len(), 2);
        assert!(!entries[0].is_clash);
        assert!(entries[1].is_clash);
        assert_eq!(
            entries[1].original.as_ref().map(|o| o.subject_id.as_str()),
            Some("CS101")
        );
        assert_eq!(schedule.clash_count(), 1);
    }

    #[test]
    fn test_remove_clears_clash_on_survivor() {
        let slot = Slot::new(2, 3);
        let mut schedule = Schedule::default();
        schedule.force_place(assignment(slot, "CS101", "F1", "R1", "B1"));
        schedule.force_place(assignment(slot, "CS202", "F1", "R2", "B2"));
        assert_eq!(schedule.clash_count(), 1);

        let removed = schedule.remove(slot, "B1").unwrap();
        assert_eq!(removed.subject_id, "CS101");
        assert_eq!(schedule.clash_count(), 0);
        assert_eq!(schedule.at(slot).len(), 1);
        assert!(schedule.remove(slot, "B1").is_none());
    }

    #[test]
    fn test_views_and_density() {
        let week = WeekTemplate::default();
        let mut builder = ScheduleBuilder::new();
        builder.place(assignment(Slot::new(0, 0), "CS101", "F1", "R1", "B1"));
        builder.place(assignment(Slot::new(0, 0), "CS202", "F2", "R2", "B2"));
        builder.place(assignment(Slot::new(4, 6), "CS202", "F2", "R2", "B2"));
        let schedule = builder.finish();

        assert_eq!(schedule.for_teacher("F2").count(), 2);
        assert_eq!(schedule.for_batch("B1").count(), 1);
        let grid = schedule.density(&week);
        assert_eq!(grid.len(), 5);
        assert_eq!(grid[0][0], 2);
        assert_eq!(grid[4][6], 1);
        assert_eq!(grid.iter().flatten().sum::<usize>(), 3);
    }

    #[test]
    fn test_schedule_serializes_as_flat_list() {
        let mut schedule = Schedule::default();
        schedule.force_place(assignment(Slot::new(1, 2), "CS101", "F1", "R1", "B1"));
        schedule.force_place(assignment(Slot::new(1, 2), "CS202", "F1", "R2", "B2"));

        let json = serde_json::to_value(&schedule).unwrap();
        let list = json.as_array().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0]["day"], 1);
        assert_eq!(list[0]["period"], 2);
        assert!(list[0].get("isClash").is_none());
        assert_eq!(list[1]["isClash"], true);
        assert_eq!(list[1]["original"]["subjectId"], "CS101");

        let back: Schedule = serde_json::from_value(json).unwrap();
        assert_eq!(back, schedule);
    }
}
