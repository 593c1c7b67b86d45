use std::collections::HashMap;

use itertools::Itertools;

use crate::data::{Batch, Classroom, DepartmentRoster, Faculty, GlobalResources, Subject};
use crate::error::GenerateError;

/// Lookups over one request's roster. Built once, shared read-only by every option run.
#[derive(Debug)]
pub struct ResourceIndex<'a> {
    pub subjects: HashMap<&'a str, &'a Subject>,
    pub faculty: HashMap<&'a str, &'a Faculty>,
    /// Faculty qualified for each subject, in roster order.
    pub faculty_by_subject: HashMap<&'a str, Vec<&'a Faculty>>,
    pub batches: &'a [Batch],
    pub classrooms: &'a [Classroom],
}

impl<'a> ResourceIndex<'a> {
    pub fn build(
        roster: &'a DepartmentRoster,
        resources: &'a GlobalResources,
    ) -> Result<Self, GenerateError> {
        let batches = roster
            .batches
            .as_deref()
            .ok_or(GenerateError::MissingBatches)?;
        let classrooms = resources
            .classrooms
            .as_deref()
            .ok_or(GenerateError::MissingClassrooms)?;

        let subjects: HashMap<&str, &Subject> = roster
            .subjects
            .iter()
            .map(|s| (s.id.as_str(), s))
            .collect();
        let faculty: HashMap<&str, &Faculty> = roster
            .faculty
            .iter()
            .map(|f| (f.id.as_str(), f))
            .collect();
        let faculty_by_subject: HashMap<&str, Vec<&Faculty>> = roster
            .faculty
            .iter()
            .flat_map(|f| f.expertise.iter().unique().map(move |s| (s.as_str(), f)))
            .into_group_map();

        Ok(Self {
            subjects,
            faculty,
            faculty_by_subject,
            batches,
            classrooms,
        })
    }

    pub fn subject(&self, id: &str) -> Option<&'a Subject> {
        self.subjects.get(id).copied()
    }

    pub fn faculty_member(&self, id: &str) -> Option<&'a Faculty> {
        self.faculty.get(id).copied()
    }

    pub fn qualified_faculty(&self, subject_id: &str) -> &[&'a Faculty] {
        self.faculty_by_subject
            .get(subject_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}
