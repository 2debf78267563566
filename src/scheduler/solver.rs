//! Roster solving pipeline.
//!
//! # Algorithm
//!
//! 1. Validate the configuration against the rule book in use.
//! 2. Build the assignment grid and let every enabled rule emit its
//!    constraint set; compose them into one [`RosterModel`]. A book that
//!    leaves some cohort free to hold two rotations in a week gets the
//!    standard [`OneRotationPerWeek`] rule appended, since the decoded
//!    timelines need one label per week.
//! 3. With a seed roster: if it already satisfies the model it is the
//!    answer; otherwise it becomes the engine's warm start.
//! 4. Run the engine (one blocking feasibility check).
//! 5. Re-check the returned assignment against every posted constraint.
//! 6. Decode into a [`RosterSchedule`].
//!
//! Infeasibility is reported as [`RosterError::Infeasible`] with the
//! labels of the rules that were posted. Relaxing is the caller's call:
//! [`RosterSolver::solve_with`] takes any rule subset.

use std::borrow::Cow;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::RosterDecoder;
use crate::config::RosterConfig;
use crate::cp::{Engine, EngineOutcome, MilpEngine, RawAssignment, RosterModel};
use crate::error::{DecodeError, RosterError, RosterResult};
use crate::models::{Cohort, Roster, RosterSchedule};
use crate::rules::{OneRotationPerWeek, RuleBook, RuleConfig, RuleContext};

/// A solved roster.
#[derive(Debug, Clone)]
pub struct RosterSolution {
    /// Decoded year.
    pub schedule: RosterSchedule,
    /// Raw engine assignment, one value per grid cell.
    pub assignment: RawAssignment,
    /// Labels of the rules the solution satisfies.
    pub active_rules: Vec<String>,
    /// Wall-clock time spent in the engine; zero when a seed was accepted as is.
    pub engine_time: Duration,
}

/// Runs the solving pipeline for one configuration.
///
/// # Usage
///
/// ```no_run
/// use u_roster::config::RosterConfig;
/// use u_roster::models::CohortLists;
/// use u_roster::scheduler::RosterSolver;
///
/// let config = RosterConfig::new(
///     CohortLists::new()
///         .with_junior(["A", "B"])
///         .with_senior(["C", "D"]),
/// );
/// let solution = RosterSolver::standard(config).solve().unwrap();
/// println!("{:?}", solution.schedule.timeline("A"));
/// ```
#[derive(Debug, Clone)]
pub struct RosterSolver<E> {
    config: RosterConfig,
    engine: E,
    decoder: Option<RosterDecoder>,
}

impl RosterSolver<MilpEngine> {
    /// Solver backed by [`MilpEngine`], with the configured time limit.
    pub fn standard(config: RosterConfig) -> Self {
        let engine = match config.solver.time_limit() {
            Some(limit) => MilpEngine::new().with_time_limit(limit),
            None => MilpEngine::new(),
        };
        Self::new(config, engine)
    }
}

impl<E: Engine> RosterSolver<E> {
    /// Creates a solver.
    pub fn new(config: RosterConfig, engine: E) -> Self {
        Self {
            config,
            engine,
            decoder: None,
        }
    }

    /// Replaces the decoder. Without one, slot columns follow the
    /// enabled `SlotCoverage` rule of each solve.
    pub fn with_decoder(mut self, decoder: RosterDecoder) -> Self {
        self.decoder = Some(decoder);
        self
    }

    /// The configuration.
    pub fn config(&self) -> &RosterConfig {
        &self.config
    }

    /// The engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Validates and composes the model for `rules`, with week
    /// exclusivity for every cohort.
    pub fn build_model(&self, rules: &RuleBook) -> RosterResult<RosterModel> {
        self.compose(&with_exclusivity(rules))
    }

    /// Solves with the configured rule book.
    pub fn solve(&self) -> RosterResult<RosterSolution> {
        self.solve_with(&self.config.rules)
    }

    /// Solves with an explicit rule subset.
    ///
    /// One rotation per fellow and week is always enforced: when the
    /// enabled rules leave a cohort uncovered, [`OneRotationPerWeek`] is
    /// added and listed in [`RosterSolution::active_rules`].
    pub fn solve_with(&self, rules: &RuleBook) -> RosterResult<RosterSolution> {
        self.run(rules, None)
    }

    /// Solves starting from an existing roster.
    ///
    /// A seed that satisfies every active rule is returned without running
    /// the engine. Otherwise it is handed to the engine as a warm start;
    /// fellows and rotations the configuration does not know are ignored.
    pub fn solve_from(
        &self,
        rules: &RuleBook,
        seed: &RosterSchedule,
    ) -> RosterResult<RosterSolution> {
        self.run(rules, Some(seed))
    }

    fn compose(&self, rules: &RuleBook) -> RosterResult<RosterModel> {
        let config = RosterConfig {
            rules: rules.clone(),
            ..self.config.clone()
        };
        config.validate()?;

        let roster = Roster::from_lists(&config.fellows);
        let ctx = RuleContext::new(&roster, &config.rotations, &config.vacations);
        let mut model = RosterModel::new(ctx.grid);
        for set in rules.generate(&ctx)? {
            model.add_set(set);
        }
        Ok(model)
    }

    fn run(&self, rules: &RuleBook, seed: Option<&RosterSchedule>) -> RosterResult<RosterSolution> {
        let rules = with_exclusivity(rules);
        let mut model = self.compose(&rules)?;
        let decoder = match &self.decoder {
            Some(d) => Cow::Borrowed(d),
            None => Cow::Owned(RosterDecoder::from_rules(&rules)),
        };
        decoder.require_slots(&self.config.rotations)?;
        let roster = Roster::from_lists(&self.config.fellows);
        let active_rules = rules.enabled_labels();

        if let Some(seed) = seed {
            let hint = decoder.encode(&roster, &self.config.rotations, seed);
            let violations = model.violations(&hint);
            if violations.is_empty() {
                info!(
                    rules = active_rules.len(),
                    "seed roster satisfies the active rules"
                );
                let schedule = decoder.decode(&roster, &self.config.rotations, &hint)?;
                return Ok(RosterSolution {
                    schedule,
                    assignment: hint,
                    active_rules,
                    engine_time: Duration::ZERO,
                });
            }
            debug!(
                broken_rules = violations.len(),
                "seed roster used as warm start"
            );
            model.set_hint(hint);
        }

        info!(
            engine = self.engine.name(),
            fellows = model.grid().fellows(),
            variables = model.grid().len(),
            constraints = model.constraint_count(),
            rules = active_rules.len(),
            warm_start = model.hint().is_some(),
            "solving roster"
        );

        let started = Instant::now();
        let outcome = self.engine.check(&model)?;
        let engine_time = started.elapsed();

        let assignment = match outcome {
            EngineOutcome::Satisfiable(a) => a,
            EngineOutcome::Unsatisfiable => {
                warn!(
                    elapsed_ms = engine_time.as_millis() as u64,
                    "no roster satisfies the active rules"
                );
                return Err(RosterError::Infeasible { active_rules });
            }
        };

        if assignment.len() != model.grid().len() {
            return Err(DecodeError::AssignmentSize {
                expected: model.grid().len(),
                actual: assignment.len(),
            }
            .into());
        }
        if let Some(v) = model.violations(&assignment).into_iter().next() {
            return Err(DecodeError::ModelViolation {
                rule: v.rule,
                count: v.count,
            }
            .into());
        }

        let schedule = decoder.decode(&roster, &self.config.rotations, &assignment)?;
        info!(
            elapsed_ms = engine_time.as_millis() as u64,
            "roster solved"
        );

        Ok(RosterSolution {
            schedule,
            assignment,
            active_rules,
            engine_time,
        })
    }
}

/// `rules`, plus [`OneRotationPerWeek`] over every cohort when the enabled
/// exclusivity rules leave some cohort out.
fn with_exclusivity(rules: &RuleBook) -> Cow<'_, RuleBook> {
    let covered: Vec<Cohort> = rules
        .entries()
        .iter()
        .filter(|e| e.enabled)
        .filter_map(|e| match &e.rule {
            RuleConfig::OneRotationPerWeek(r) => Some(r.cohorts.iter().copied()),
            _ => None,
        })
        .flatten()
        .collect();
    if Cohort::ALL.iter().all(|c| covered.contains(c)) {
        return Cow::Borrowed(rules);
    }
    debug!(?covered, "adding one_rotation_per_week for every cohort");
    Cow::Owned(
        rules
            .clone()
            .with_rule(RuleConfig::OneRotationPerWeek(OneRotationPerWeek::default())),
    )
}
