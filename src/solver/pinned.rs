use log::{debug, warn};

use crate::config::ValidatedConstraints;
use crate::schedule::{Assignment, Placement, ScheduleBuilder};
use crate::solver::index::ResourceIndex;
use crate::solver::pool::LectureUnit;

/// Outcome of placing the administrator pins for one run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PinReport {
    pub placed: usize,
    /// Pins that stood in for a unit of the lecture pool.
    pub consumed_units: usize,
    pub skipped: usize,
    pub clashes: usize,
}

/// Places every pin before the search runs. Pins bypass the constraint evaluator; a pin that
/// collides with an earlier one is kept and flagged as a clash. Each pin removes at most one
/// matching unit from `units`.
pub fn place_pins<'a>(
    index: &ResourceIndex<'a>,
    constraints: &ValidatedConstraints,
    state: &mut ScheduleBuilder,
    units: &mut Vec<LectureUnit<'a>>,
) -> PinReport {
    let mut report = PinReport::default();

    for pin in &constraints.pins {
        let (Some(subject), Some(teacher)) = (
            index.subject(&pin.subject_id),
            index.faculty_member(&pin.faculty_id),
        ) else {
            warn!(
                "Skipping pin {}/{} by {}: subject or faculty not in roster",
                pin.subject_id, pin.batch_id, pin.faculty_id
            );
            report.skipped += 1;
            continue;
        };

        let assignment = Assignment {
            slot: pin.slot,
            subject_id: subject.id.clone(),
            subject: subject.name.clone(),
            teacher_id: teacher.id.clone(),
            teacher: teacher.name.clone(),
            room: pin.room_id.clone(),
            batch: pin.batch_id.clone(),
            source: Placement::Pinned,
            is_clash: false,
            original: None,
        };
        if state.force_place(assignment) {
            let flagged = state.entries_at(pin.slot).last();
            if let Some(hint) = flagged.and_then(|a| a.clash_suggestion(&constraints.week)) {
                warn!("Pinned lectures collide: {hint}");
            }
            report.clashes += 1;
        }
        report.placed += 1;

        match units
            .iter()
            .position(|u| u.matches(&pin.subject_id, &pin.batch_id))
        {
            Some(position) => {
                units.remove(position);
                report.consumed_units += 1;
            }
            None => debug!(
                "Pin {}/{} has no remaining unit in the pool",
                pin.subject_id, pin.batch_id
            ),
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Constraints, PinnedLecture};
    use crate::schedule::Slot;
    use crate::solver::pool::LecturePool;
    use crate::test_utils::{sample_resources, sample_roster};

    fn pin(subject: &str, faculty: &str, batch: &str, room: &str, day: &str, period: &str) -> PinnedLecture {
        PinnedLecture {
            subject_id: subject.to_string(),
            faculty_id: faculty.to_string(),
            batch_id: batch.to_string(),
            room_id: room.to_string(),
            day: day.to_string(),
            period: period.to_string(),
        }
    }

    #[test]
    fn test_pin_placed_and_unit_consumed() {
        let roster = sample_roster();
        let resources = sample_resources();
        let index = ResourceIndex::build(&roster, &resources).unwrap();
        let mut units = LecturePool::build(&index).units;
        let constraints = Constraints {
            pinned_lectures: vec![pin("CS101", "F1", "B1", "R1", "Monday", "12-13")],
            lunch_break: Some("12-13".to_string()),
            ..Default::default()
        }
        .validate()
        .unwrap();
        let mut state = ScheduleBuilder::new();

        let report = place_pins(&index, &constraints, &mut state, &mut units);

        assert_eq!(report.placed, 1);
        assert_eq!(report.consumed_units, 1);
        assert_eq!(units.len(), 9);
        assert_eq!(units.iter().filter(|u| u.matches("CS101", "B1")).count(), 3);
        // Pins ignore the lunch break.
        let placed = &state.entries_at(Slot::new(0, 3))[0];
        assert_eq!(placed.source, Placement::Pinned);
        assert_eq!(placed.teacher, "Dr. One");
    }

    #[test]
    fn test_pin_with_unknown_faculty_is_skipped() {
        let roster = sample_roster();
        let resources = sample_resources();
        let index = ResourceIndex::build(&roster, &resources).unwrap();
        let mut units = LecturePool::build(&index).units;
        let constraints = Constraints {
            pinned_lectures: vec![
                pin("CS101", "F404", "B1", "R1", "Monday", "09-10"),
                pin("CS404", "F1", "B1", "R1", "Monday", "09-10"),
            ],
            ..Default::default()
        }
        .validate()
        .unwrap();
        let mut state = ScheduleBuilder::new();

        let report = place_pins(&index, &constraints, &mut state, &mut units);
        assert_eq!(report.placed, 0);
        assert_eq!(report.skipped, 2);
        assert!(state.is_empty());
        assert_eq!(units.len(), 10);
    }

    #[test]
    fn test_colliding_pins_are_flagged_not_dropped() {
        let roster = sample_roster();
        let resources = sample_resources();
        let index = ResourceIndex::build(&roster, &resources).unwrap();
        let mut units = LecturePool::build(&index).units;
        let constraints = Constraints {
            pinned_lectures: vec![
                pin("CS101", "F1", "B1", "R1", "Tuesday", "10-11"),
                pin("CS202", "F1", "B2", "R2", "Tuesday", "10-11"),
            ],
            ..Default::default()
        }
        .validate()
        .unwrap();
        let mut state = ScheduleBuilder::new();

        let report = place_pins(&index, &constraints, &mut state, &mut units);
        assert_eq!(report.placed, 2);
        assert_eq!(report.clashes, 1);

        let schedule = state.finish();
        let entries = schedule.at(Slot::new(1, 1));
        assert_eq!(entries.len(), 2);
        assert_eq!(schedule.clash_count(), 1);
        let hint = entries[1].clash_suggestion(&constraints.week).unwrap();
        assert!(hint.contains("Tuesday-10-11"));
    }
}
