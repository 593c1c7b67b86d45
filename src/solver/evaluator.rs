//! Hard-constraint checks for a tentative placement.
//!
//! Every check is read-only against the [`ScheduleBuilder`]. [`ConstraintEvaluator::admits`]
//! evaluates all rules; the search uses the `check_*` stages directly so it can prune a whole
//! slot or teacher before looping over rooms.

use crate::config::ValidatedConstraints;
use crate::schedule::{ResourceKind, ScheduleBuilder, Slot};

/// The rule a candidate failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    LunchBreak,
    BatchBusy,
    TeacherBusy,
    TeacherUnavailable,
    RoomBusy,
    FacultyRunTooLong,
    BatchRunTooLong,
    RelatedSubjectOverlap,
    BatchDailyLimit,
    FacultyWeeklyLimit,
}

/// A tentative (slot, teacher, room, batch) tuple for one subject.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub slot: Slot,
    pub subject: &'a str,
    pub teacher: &'a str,
    pub room: &'a str,
    pub batch: &'a str,
}

#[derive(Debug, Clone, Copy)]
pub struct ConstraintEvaluator<'c> {
    constraints: &'c ValidatedConstraints,
}

impl<'c> ConstraintEvaluator<'c> {
    pub fn new(constraints: &'c ValidatedConstraints) -> Self {
        Self { constraints }
    }

    fn periods_per_day(&self) -> usize {
        self.constraints.week.periods.len()
    }

    pub fn admits(&self, state: &ScheduleBuilder, candidate: &Candidate<'_>) -> Result<(), Rejection> {
        let slot = candidate.slot;
        self.check_lunch(slot)?;
        self.check_batch_free(state, slot, candidate.batch)?;
        self.check_teacher_free(state, slot, candidate.teacher)?;
        self.check_room(state, slot, candidate.room)?;
        self.check_faculty_run(state, slot, candidate.teacher)?;
        self.check_batch_run(state, slot, candidate.batch)?;
        self.check_relations(state, slot, candidate.subject)?;
        self.check_batch_daily_load(state, slot, candidate.batch)?;
        self.check_faculty_weekly_load(state, candidate.teacher)
    }

    /// Rules that depend only on the slot, the batch and the subject.
    pub fn check_slot(
        &self,
        state: &ScheduleBuilder,
        slot: Slot,
        batch: &str,
        subject: &str,
    ) -> Result<(), Rejection> {
        self.check_lunch(slot)?;
        self.check_batch_free(state, slot, batch)?;
        self.check_batch_run(state, slot, batch)?;
        self.check_relations(state, slot, subject)?;
        self.check_batch_daily_load(state, slot, batch)
    }

    /// Rules that depend on the teacher at a slot.
    pub fn check_teacher(
        &self,
        state: &ScheduleBuilder,
        slot: Slot,
        teacher: &str,
    ) -> Result<(), Rejection> {
        self.check_teacher_free(state, slot, teacher)?;
        self.check_faculty_run(state, slot, teacher)?;
        self.check_faculty_weekly_load(state, teacher)
    }

    pub fn check_room(&self, state: &ScheduleBuilder, slot: Slot, room: &str) -> Result<(), Rejection> {
        if state.is_occupied(slot, ResourceKind::Room, room) {
            return Err(Rejection::RoomBusy);
        }
        Ok(())
    }

    fn check_lunch(&self, slot: Slot) -> Result<(), Rejection> {
        if self.constraints.lunch_period == Some(slot.period) {
            return Err(Rejection::LunchBreak);
        }
        Ok(())
    }

    fn check_batch_free(&self, state: &ScheduleBuilder, slot: Slot, batch: &str) -> Result<(), Rejection> {
        if state.is_occupied(slot, ResourceKind::Batch, batch) {
            return Err(Rejection::BatchBusy);
        }
        Ok(())
    }

    fn check_teacher_free(
        &self,
        state: &ScheduleBuilder,
        slot: Slot,
        teacher: &str,
    ) -> Result<(), Rejection> {
        if state.is_occupied(slot, ResourceKind::Teacher, teacher) {
            return Err(Rejection::TeacherBusy);
        }
        if self.constraints.is_unavailable(teacher, slot) {
            return Err(Rejection::TeacherUnavailable);
        }
        Ok(())
    }

    fn check_faculty_run(&self, state: &ScheduleBuilder, slot: Slot, teacher: &str) -> Result<(), Rejection> {
        match self.constraints.max_consecutive_faculty_hours {
            Some(max)
                if state.run_length(slot, ResourceKind::Teacher, teacher, self.periods_per_day())
                    > max =>
            {
                Err(Rejection::FacultyRunTooLong)
            }
            _ => Ok(()),
        }
    }

    fn check_batch_run(&self, state: &ScheduleBuilder, slot: Slot, batch: &str) -> Result<(), Rejection> {
        match self.constraints.max_consecutive_batch_hours {
            Some(max)
                if state.run_length(slot, ResourceKind::Batch, batch, self.periods_per_day()) > max =>
            {
                Err(Rejection::BatchRunTooLong)
            }
            _ => Ok(()),
        }
    }

    fn check_relations(&self, state: &ScheduleBuilder, slot: Slot, subject: &str) -> Result<(), Rejection> {
        let Some(related) = self.constraints.related_subjects(subject) else {
            return Ok(());
        };
        if state
            .entries_at(slot)
            .iter()
            .any(|a| related.contains(&a.subject_id))
        {
            return Err(Rejection::RelatedSubjectOverlap);
        }
        Ok(())
    }

    fn check_batch_daily_load(
        &self,
        state: &ScheduleBuilder,
        slot: Slot,
        batch: &str,
    ) -> Result<(), Rejection> {
        match self.constraints.max_classes_per_day {
            Some(max)
                if state.day_load(slot.day, ResourceKind::Batch, batch, self.periods_per_day())
                    >= max =>
            {
                Err(Rejection::BatchDailyLimit)
            }
            _ => Ok(()),
        }
    }

    fn check_faculty_weekly_load(&self, state: &ScheduleBuilder, teacher: &str) -> Result<(), Rejection> {
        match self.constraints.max_classes_per_week {
            Some(max) if state.week_load(ResourceKind::Teacher, teacher) >= max => {
                Err(Rejection::FacultyWeeklyLimit)
            }
            _ => Ok(()),
        }
    }
}
