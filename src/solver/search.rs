use log::trace;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::data::{Classroom, Faculty, UnplacedLecture, UnplacedReason};
use crate::schedule::{Assignment, Placement, ScheduleBuilder, Slot};
use crate::solver::candidates::CandidateResolver;
use crate::solver::evaluator::{Candidate, ConstraintEvaluator};
use crate::solver::pool::LectureUnit;

/// A way of placing the remaining lecture units into a run's schedule.
///
/// Implementations must leave every unit either placed in `state` or reported in the returned
/// list, and must only use `rng` for randomness so runs replay under a fixed seed.
pub trait PlacementStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn place<'a>(
        &self,
        units: &[LectureUnit<'a>],
        resolver: &mut CandidateResolver<'_, 'a>,
        evaluator: &ConstraintEvaluator<'_>,
        state: &mut ScheduleBuilder,
        slots: &[Slot],
        rng: &mut ChaCha8Rng,
    ) -> Vec<UnplacedLecture>;
}

/// Greedy first-fit: for each unit, walk the slots in a freshly shuffled order and commit the
/// first admissible (slot, teacher, room). Teachers and rooms are tried in roster order.
/// Commitments are never undone.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstFit;

impl PlacementStrategy for FirstFit {
    fn name(&self) -> &'static str {
        "first-fit"
    }

    fn place<'a>(
        &self,
        units: &[LectureUnit<'a>],
        resolver: &mut CandidateResolver<'_, 'a>,
        evaluator: &ConstraintEvaluator<'_>,
        state: &mut ScheduleBuilder,
        slots: &[Slot],
        rng: &mut ChaCha8Rng,
    ) -> Vec<UnplacedLecture> {
        let mut unplaced = Vec::new();
        let mut order = slots.to_vec();

        for unit in units {
            let candidates = match resolver.resolve(unit) {
                Ok(candidates) => candidates,
                Err(reason) => {
                    unplaced.push(unplaced_lecture(unit, reason));
                    continue;
                }
            };

            order.shuffle(rng);
            let found = order.iter().find_map(|&slot| {
                first_admissible(
                    unit,
                    slot,
                    &candidates.teachers,
                    &candidates.rooms,
                    evaluator,
                    &*state,
                )
            });

            match found {
                Some((slot, teacher, room)) => {
                    trace!(
                        "Placed {} hour {} for {} at {:?} with {} in {}",
                        unit.subject.id, unit.sequence, unit.batch.id, slot, teacher.id, room.id
                    );
                    state.place(Assignment {
                        slot,
                        subject_id: unit.subject.id.clone(),
                        subject: unit.subject.name.clone(),
                        teacher_id: teacher.id.clone(),
                        teacher: teacher.name.clone(),
                        room: room.id.clone(),
                        batch: unit.batch.id.clone(),
                        source: Placement::Search,
                        is_clash: false,
                        original: None,
                    });
                }
                None => {
                    trace!(
                        "No slot for {} hour {} of batch {}",
                        unit.subject.id, unit.sequence, unit.batch.id
                    );
                    unplaced.push(unplaced_lecture(unit, UnplacedReason::NoAvailableSlot));
                }
            }
        }

        unplaced
    }
}

fn first_admissible<'a>(
    unit: &LectureUnit<'a>,
    slot: Slot,
    teachers: &[&'a Faculty],
    rooms: &[&'a Classroom],
    evaluator: &ConstraintEvaluator<'_>,
    state: &ScheduleBuilder,
) -> Option<(Slot, &'a Faculty, &'a Classroom)> {
    evaluator
        .check_slot(state, slot, &unit.batch.id, &unit.subject.id)
        .ok()?;

    for &teacher in teachers {
        if evaluator.check_teacher(state, slot, &teacher.id).is_err() {
            continue;
        }
        if let Some(&room) = rooms
            .iter()
            .find(|room| evaluator.check_room(state, slot, &room.id).is_ok())
        {
            debug_assert!(evaluator
                .admits(
                    state,
                    &Candidate {
                        slot,
                        subject: &unit.subject.id,
                        teacher: &teacher.id,
                        room: &room.id,
                        batch: &unit.batch.id,
                    }
                )
                .is_ok());
            return Some((slot, teacher, room));
        }
    }
    None
}

fn unplaced_lecture(unit: &LectureUnit<'_>, reason: UnplacedReason) -> UnplacedLecture {
    UnplacedLecture {
        subject_id: unit.subject.id.clone(),
        subject: unit.subject.name.clone(),
        batch: unit.batch.id.clone(),
        sequence: unit.sequence,
        reason,
    }
}
