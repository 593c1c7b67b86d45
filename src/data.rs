use serde::{Deserialize, Serialize};
use std::fmt;

// Type aliases for clarity
pub type SubjectId = String;
pub type FacultyId = String;
pub type RoomId = String;
pub type BatchId = String;

/// A subject taught in the department. `hours` is the number of weekly contact hours.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
    #[serde(default)]
    pub semester: u32,
    pub hours: u32,
    /// Room category the subject must be taught in, e.g. "Electronics Lab".
    #[serde(default, alias = "requiresRoomType")]
    pub required_room_type: Option<String>,
}

/// A faculty member and the subjects they are qualified to teach.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Faculty {
    pub id: FacultyId,
    pub name: String,
    #[serde(default)]
    pub expertise: Vec<SubjectId>,
    #[serde(default)]
    pub max_load: u32,
    /// Informational only, the engine does not enforce it.
    #[serde(default)]
    pub current_load: u32,
}

impl Faculty {
    pub fn can_teach(&self, subject_id: &str) -> bool {
        self.expertise.iter().any(|s| s == subject_id)
    }
}

/// Represents a physical room with a given capacity. Shared across departments.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classroom {
    pub id: RoomId,
    pub capacity: u32,
    #[serde(rename = "type", default)]
    pub room_type: String,
}

/// A student group and the subjects it takes this term.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    pub id: BatchId,
    #[serde(default)]
    pub program: String,
    #[serde(default)]
    pub semester: u32,
    pub strength: u32,
    #[serde(default)]
    pub subjects: Vec<SubjectId>,
}

/// Department-level input. `batches` is optional so a missing list can be told apart from an
/// empty one.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentRoster {
    #[serde(default)]
    pub faculty: Vec<Faculty>,
    #[serde(default)]
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub batches: Option<Vec<Batch>>,
}

/// Resources shared by every department.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalResources {
    #[serde(default)]
    pub classrooms: Option<Vec<Classroom>>,
}

/// Why a lecture unit could not be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum UnplacedReason {
    #[serde(rename = "no qualified faculty")]
    NoQualifiedFaculty,
    #[serde(rename = "no suitable classroom")]
    NoSuitableClassroom,
    #[serde(rename = "no available slots found")]
    NoAvailableSlot,
}

impl fmt::Display for UnplacedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            UnplacedReason::NoQualifiedFaculty => "no qualified faculty",
            UnplacedReason::NoSuitableClassroom => "no suitable classroom",
            UnplacedReason::NoAvailableSlot => "no available slots found",
        };
        f.write_str(reason)
    }
}

/// A lecture hour that ended up outside the schedule.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnplacedLecture {
    pub subject_id: SubjectId,
    pub subject: String,
    pub batch: BatchId,
    pub sequence: u32,
    pub reason: UnplacedReason,
}

impl fmt::Display for UnplacedLecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (hour {}) for batch {}: {}",
            self.subject,
            self.sequence + 1,
            self.batch,
            self.reason
        )
    }
}
