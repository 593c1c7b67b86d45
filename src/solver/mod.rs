//! Timetable generation.
//!
//! Pipeline per request: build the [`ResourceIndex`], expand the [`LecturePool`], then for each
//! option run (in parallel, each with its own state and seeded RNG) place the pins, order the
//! remaining units and hand them to the [`PlacementStrategy`].

pub mod candidates;
pub mod evaluator;
pub mod index;
pub mod pinned;
pub mod pool;
pub mod search;

use std::time::Instant;

use log::{debug, error, info};
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{Constraints, EngineSettings, ValidatedConstraints};
use crate::data::{DepartmentRoster, GlobalResources};
use crate::error::GenerateError;
use crate::option::TimetableOption;
use crate::schedule::{ScheduleBuilder, Slot};

use candidates::CandidateResolver;
use evaluator::ConstraintEvaluator;
use index::ResourceIndex;
use pinned::place_pins;
use pool::LecturePool;
pub use search::{FirstFit, PlacementStrategy};

/// Everything one generation call needs. `constraints` is optional so a missing configuration
/// can be reported instead of silently defaulted.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub roster: DepartmentRoster,
    #[serde(default)]
    pub resources: GlobalResources,
    #[serde(default)]
    pub constraints: Option<Constraints>,
    #[serde(default)]
    pub settings: EngineSettings,
}

impl GenerateRequest {
    pub fn try_generate(&self) -> Result<Vec<TimetableOption>, GenerateError> {
        let constraints = self
            .constraints
            .as_ref()
            .ok_or(GenerateError::MissingConstraints)?;
        try_generate(
            &self.roster,
            &self.resources,
            constraints,
            &self.settings,
            &FirstFit,
        )
    }
}

/// Generates timetable options with the greedy first-fit search. Never fails: a precondition
/// failure is logged and yields no options.
pub fn generate(
    roster: &DepartmentRoster,
    resources: &GlobalResources,
    constraints: &Constraints,
    settings: &EngineSettings,
) -> Vec<TimetableOption> {
    match try_generate(roster, resources, constraints, settings, &FirstFit) {
        Ok(options) => options,
        Err(e) => {
            error!("Timetable generation aborted: {e}");
            Vec::new()
        }
    }
}

/// Like [`generate`], but reports precondition failures and takes the placement strategy.
/// On success exactly `settings.option_count` options are returned.
pub fn try_generate(
    roster: &DepartmentRoster,
    resources: &GlobalResources,
    constraints: &Constraints,
    settings: &EngineSettings,
    strategy: &dyn PlacementStrategy,
) -> Result<Vec<TimetableOption>, GenerateError> {
    let start_time = Instant::now();

    settings.validate()?;
    let constraints = constraints.validate()?;
    let index = ResourceIndex::build(roster, resources)?;
    let pool = LecturePool::build(&index);

    let seed = settings.seed.unwrap_or_else(rand::random);
    info!(
        "Generating {} options for {} lecture units ({} batches, {} faculty, {} classrooms, {} slots) with {} strategy, seed {}",
        settings.option_count,
        pool.len(),
        index.batches.len(),
        index.faculty.len(),
        index.classrooms.len(),
        constraints.week.slot_count(),
        strategy.name(),
        seed
    );
    if !pool.dangling.is_empty() {
        info!(
            "{} subject references could not be resolved and were skipped",
            pool.dangling.len()
        );
    }

    let options: Vec<TimetableOption> = (0..settings.option_count)
        .into_par_iter()
        .map(|ordinal| run_option(ordinal, seed, &index, &pool, &constraints, strategy))
        .collect();

    info!("Generated {} options in {:.2?}", options.len(), start_time.elapsed());
    Ok(options)
}

// One independent pass of pins + search. The first option keeps the natural pool order.
fn run_option<'a>(
    ordinal: usize,
    seed: u64,
    index: &ResourceIndex<'a>,
    pool: &LecturePool<'a>,
    constraints: &ValidatedConstraints,
    strategy: &dyn PlacementStrategy,
) -> TimetableOption {
    let run_seed = seed.wrapping_add(ordinal as u64);
    let mut rng = ChaCha8Rng::seed_from_u64(run_seed);
    let mut state = ScheduleBuilder::new();
    let mut units = pool.units.clone();

    let pins = place_pins(index, constraints, &mut state, &mut units);
    debug!("Option {}: {:?}", ordinal + 1, pins);

    if ordinal > 0 {
        units.shuffle(&mut rng);
    }

    let slots: Vec<Slot> = constraints.week.slots().collect();
    let mut resolver = CandidateResolver::new(index);
    let evaluator = ConstraintEvaluator::new(constraints);
    let unplaced = strategy.place(
        &units,
        &mut resolver,
        &evaluator,
        &mut state,
        &slots,
        &mut rng,
    );

    let placed = pins.consumed_units + (units.len() - unplaced.len());
    let option = TimetableOption::new(
        ordinal as u32 + 1,
        run_seed,
        constraints.week.clone(),
        state.finish(),
        placed,
        pool.len(),
        unplaced,
    );
    info!(
        "Option {}: {} placed, {} unplaced, {} clashes",
        option.id,
        option.placed,
        option.unplaced.len(),
        option.clashes
    );
    option
}
