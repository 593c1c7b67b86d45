//! Weekly timetable generation for academic departments.
//!
//! [`generate`] takes a department roster, the shared classrooms and a constraint configuration
//! and returns several alternative [`TimetableOption`]s, each with its schedule, the lectures it
//! could not place and any flagged clashes.

pub mod config;
pub mod data;
pub mod error;
pub mod option;
pub mod schedule;
pub mod server;
pub mod solver;
pub mod workflow;

#[cfg(test)]
mod test_utils;

pub use config::{Constraints, EngineSettings};
pub use error::GenerateError;
pub use option::TimetableOption;
pub use solver::{GenerateRequest, generate, try_generate};
