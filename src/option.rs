use log::info;
use serde::{Deserialize, Serialize};

use crate::config::WeekTemplate;
use crate::data::UnplacedLecture;
use crate::error::WorkflowError;
use crate::schedule::{Assignment, Placement, Schedule, Slot};
use crate::workflow::{self, Comment, Role, WorkflowAction, WorkflowStatus};

/// One candidate timetable returned by a generation run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableOption {
    pub id: u32,
    /// Seed this option's run used; replaying with it reproduces the schedule.
    pub seed: u64,
    pub week: WeekTemplate,
    pub schedule: Schedule,
    /// Lecture units that are in the schedule, pinned ones included.
    pub placed: usize,
    pub total_units: usize,
    #[serde(rename = "unscheduled", alias = "unplaced")]
    pub unplaced: Vec<UnplacedLecture>,
    pub clashes: usize,
    pub suggestions: Vec<String>,
    pub status: WorkflowStatus,
    pub comments: Vec<Comment>,
}

impl TimetableOption {
    pub fn new(
        id: u32,
        seed: u64,
        week: WeekTemplate,
        schedule: Schedule,
        placed: usize,
        total_units: usize,
        unplaced: Vec<UnplacedLecture>,
    ) -> Self {
        let mut option = Self {
            id,
            seed,
            week,
            schedule,
            placed,
            total_units,
            unplaced,
            clashes: 0,
            suggestions: Vec::new(),
            status: WorkflowStatus::Draft,
            comments: Vec::new(),
        };
        option.refresh();
        option
    }

    fn refresh(&mut self) {
        self.clashes = self.schedule.clash_count();
        self.suggestions = self
            .schedule
            .assignments()
            .filter_map(|a| a.clash_suggestion(&self.week))
            .collect();
    }

    fn ensure_editable(&self) -> Result<(), WorkflowError> {
        if self.status == WorkflowStatus::Approved {
            return Err(WorkflowError::Locked(self.id));
        }
        Ok(())
    }

    /// Manual cell edit. Bypasses every constraint; a collision is flagged as a clash rather
    /// than replacing the existing entry. Returns true if the edit produced a clash.
    pub fn place_manual(&mut self, mut assignment: Assignment) -> Result<bool, WorkflowError> {
        self.ensure_editable()?;
        assignment.source = Placement::Manual;
        let clash = self.schedule.force_place(assignment);
        self.refresh();
        Ok(clash)
    }

    /// Removes the lecture a batch has in a slot.
    pub fn remove_at(&mut self, slot: Slot, batch_id: &str) -> Result<Option<Assignment>, WorkflowError> {
        self.ensure_editable()?;
        let removed = self.schedule.remove(slot, batch_id);
        self.refresh();
        Ok(removed)
    }

    pub fn add_comment(&mut self, role: Role, text: &str) -> Result<(), WorkflowError> {
        self.comments.push(workflow::comment(role, text)?);
        Ok(())
    }

    /// Moves the option through the approval workflow, logging the required comment.
    pub fn apply(
        &mut self,
        action: WorkflowAction,
        role: Role,
        text: &str,
    ) -> Result<WorkflowStatus, WorkflowError> {
        let comment = workflow::comment(role, text)?;
        let next = workflow::transition(self.status, action, role)?;
        info!("Option {} moved from {} to {}", self.id, self.status, next);
        self.status = next;
        self.comments.push(comment);
        Ok(next)
    }
}
