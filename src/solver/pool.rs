use log::warn;

use crate::data::{Batch, BatchId, Subject, SubjectId};
use crate::solver::index::ResourceIndex;

/// One contact hour of a (batch, subject) pairing.
#[derive(Debug, Clone, Copy)]
pub struct LectureUnit<'a> {
    pub batch: &'a Batch,
    pub subject: &'a Subject,
    /// Zero-based hour within the subject's weekly count.
    pub sequence: u32,
}

impl LectureUnit<'_> {
    pub fn matches(&self, subject_id: &str, batch_id: &str) -> bool {
        self.subject.id == subject_id && self.batch.id == batch_id
    }
}

/// The expanded lecture pool plus the subject references that could not be resolved.
#[derive(Debug, Default)]
pub struct LecturePool<'a> {
    pub units: Vec<LectureUnit<'a>>,
    pub dangling: Vec<(BatchId, SubjectId)>,
}

impl<'a> LecturePool<'a> {
    pub fn build(index: &ResourceIndex<'a>) -> Self {
        let mut pool = LecturePool::default();
        for batch in index.batches {
            for subject_id in &batch.subjects {
                match index.subject(subject_id) {
                    Some(subject) => pool.units.extend((0..subject.hours).map(|sequence| {
                        LectureUnit {
                            batch,
                            subject,
                            sequence,
                        }
                    })),
                    None => {
                        warn!(
                            "Batch {} references unknown subject {}; skipping it",
                            batch.id, subject_id
                        );
                        pool.dangling.push((batch.id.clone(), subject_id.clone()));
                    }
                }
            }
        }
        pool
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}
