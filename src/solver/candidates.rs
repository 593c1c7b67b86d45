use std::collections::HashMap;

use crate::data::{Classroom, Faculty, UnplacedReason};
use crate::solver::index::ResourceIndex;
use crate::solver::pool::LectureUnit;

/// Feasible teachers and rooms for a unit. Both lists keep roster order.
#[derive(Debug, Clone)]
pub struct Candidates<'a> {
    pub teachers: Vec<&'a Faculty>,
    pub rooms: Vec<&'a Classroom>,
}

/// Resolves candidates per unit, caching per (subject, batch) pair since they do not depend on
/// the slot.
pub struct CandidateResolver<'i, 'a> {
    index: &'i ResourceIndex<'a>,
    cache: HashMap<(&'a str, &'a str), Result<Candidates<'a>, UnplacedReason>>,
}

impl<'i, 'a> CandidateResolver<'i, 'a> {
    pub fn new(index: &'i ResourceIndex<'a>) -> Self {
        Self {
            index,
            cache: HashMap::new(),
        }
    }

    pub fn resolve(&mut self, unit: &LectureUnit<'a>) -> Result<&Candidates<'a>, UnplacedReason> {
        let index = self.index;
        let key = (unit.subject.id.as_str(), unit.batch.id.as_str());
        self.cache
            .entry(key)
            .or_insert_with(|| compute(index, unit))
            .as_ref()
            .map_err(|reason| *reason)
    }
}

fn compute<'a>(
    index: &ResourceIndex<'a>,
    unit: &LectureUnit<'a>,
) -> Result<Candidates<'a>, UnplacedReason> {
    let teachers = index.qualified_faculty(&unit.subject.id).to_vec();
    if teachers.is_empty() {
        return Err(UnplacedReason::NoQualifiedFaculty);
    }

    let required_type = unit.subject.required_room_type.as_deref();
    let rooms: Vec<&Classroom> = index
        .classrooms
        .iter()
        .filter(|room| room.capacity >= unit.batch.strength)
        .filter(|room| required_type.is_none_or(|t| room.room_type == t))
        .collect();
    if rooms.is_empty() {
        return Err(UnplacedReason::NoSuitableClassroom);
    }

    Ok(Candidates { teachers, rooms })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::GlobalResources;
    use crate::solver::pool::LecturePool;
    use crate::test_utils::{classroom, sample_roster, subject};

    #[test]
    fn test_rooms_filtered_by_capacity_and_type() {
        let mut roster = sample_roster();
        roster.subjects.push(subject("EC201", 2, Some("Electronics Lab")));
        roster.faculty[0].expertise.push("EC201".to_string());
        if let Some(batches) = roster.batches.as_mut() {
            batches[0].subjects = vec!["EC201".to_string(), "CS101".to_string()];
        }
        let resources = GlobalResources {
            classrooms: Some(vec![
                classroom("R101", 100, "Lecture Hall"),
                classroom("E-Lab", 40, "Electronics Lab"),
                classroom("E-Lab2", 80, "Electronics Lab"),
            ]),
        };
        let index = ResourceIndex::build(&roster, &resources).unwrap();
        let pool = LecturePool::build(&index);
        let mut resolver = CandidateResolver::new(&index);

        let lab_unit = pool.units.iter().find(|u| u.subject.id == "EC201").unwrap();
        let rooms: Vec<&str> = resolver
            .resolve(lab_unit)
            .unwrap()
            .rooms
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        // B1 has 60 students: E-Lab is too small, R101 has the wrong type.
        assert_eq!(rooms, vec!["E-Lab2"]);

        let lecture_unit = pool.units.iter().find(|u| u.subject.id == "CS101").unwrap();
        let rooms: Vec<&str> = resolver
            .resolve(lecture_unit)
            .unwrap()
            .rooms
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(rooms, vec!["R101", "E-Lab2"]);
    }

    #[test]
    fn test_missing_faculty_reported_before_rooms() {
        let mut roster = sample_roster();
        roster.faculty.clear();
        let resources = GlobalResources {
            classrooms: Some(vec![]),
        };
        let index = ResourceIndex::build(&roster, &resources).unwrap();
        let pool = LecturePool::build(&index);
        let mut resolver = CandidateResolver::new(&index);

        assert_eq!(
            resolver.resolve(&pool.units[0]).unwrap_err(),
            UnplacedReason::NoQualifiedFaculty
        );
    }

    #[test]
    fn test_no_room_large_enough() {
        let roster = sample_roster();
        let resources = GlobalResources {
            classrooms: Some(vec![classroom("S301", 30, "Seminar Room")]),
        };
        let index = ResourceIndex::build(&roster, &resources).unwrap();
        let pool = LecturePool::build(&index);
        let mut resolver = CandidateResolver::new(&index);

        assert_eq!(
            resolver.resolve(&pool.units[0]).unwrap_err(),
            UnplacedReason::NoSuitableClassroom
        );
        // Cached result is identical.
        assert_eq!(
            resolver.resolve(&pool.units[1]).unwrap_err(),
            UnplacedReason::NoSuitableClassroom
        );
    }
}
