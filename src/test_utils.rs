//! Shared fixtures for unit tests.

use crate::data::{Batch, Classroom, DepartmentRoster, Faculty, GlobalResources, Subject};
use crate::schedule::{Assignment, Placement, Slot};

pub fn subject(id: &str, hours: u32, room_type: Option<&str>) -> Subject {
    Subject {
        id: id.to_string(),
        name: format!("{id} name"),
        semester: 1,
        hours,
        required_room_type: room_type.map(str::to_string),
    }
}

pub fn faculty(id: &str, expertise: &[&str]) -> Faculty {
    Faculty {
        id: id.to_string(),
        name: format!("Dr. {id}"),
        expertise: expertise.iter().map(|s| s.to_string()).collect(),
        max_load: 10,
        current_load: 0,
    }
}

pub fn batch(id: &str, strength: u32, subjects: &[&str]) -> Batch {
    Batch {
        id: id.to_string(),
        program: "UG".to_string(),
        semester: 1,
        strength,
        subjects: subjects.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn classroom(id: &str, capacity: u32, room_type: &str) -> Classroom {
    Classroom {
        id: id.to_string(),
        capacity,
        room_type: room_type.to_string(),
    }
}

/// F1 teaches CS101 and CS202, F2 teaches CS101. B1 (60) takes CS101 (4h) and CS202 (3h),
/// B2 (40) takes CS202. Ten lecture units in total.
pub fn sample_roster() -> DepartmentRoster {
    let mut f1 = faculty("F1", &["CS101", "CS202"]);
    f1.name = "Dr. One".to_string();
    let mut f2 = faculty("F2", &["CS101"]);
    f2.name = "Dr. Two".to_string();
    DepartmentRoster {
        faculty: vec![f1, f2],
        subjects: vec![subject("CS101", 4, None), subject("CS202", 3, None)],
        batches: Some(vec![
            batch("B1", 60, &["CS101", "CS202"]),
            batch("B2", 40, &["CS202"]),
        ]),
    }
}

pub fn sample_resources() -> GlobalResources {
    GlobalResources {
        classrooms: Some(vec![
            classroom("R1", 100, "Lecture Hall"),
            classroom("R2", 50, "Lecture Hall"),
        ]),
    }
}

pub fn assignment(slot: Slot, subject: &str, teacher: &str, room: &str, batch: &str) -> Assignment {
    Assignment {
        slot,
        subject_id: subject.to_string(),
        subject: format!("{subject} name"),
        teacher_id: teacher.to_string(),
        teacher: format!("Dr. {teacher}"),
        room: room.to_string(),
        batch: batch.to_string(),
        source: Placement::Search,
        is_clash: false,
        original: None,
    }
}
