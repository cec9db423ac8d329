//! Phased greedy construction plus refinement.
//!
//! # Algorithm
//!
//! Each pass runs three phases, always committing the best evaluated move:
//!
//! 1. **Insertion** — while demands are unserved, apply the AddPassenger
//!    with the lowest objective delta. Any accepted insertion qualifies, so
//!    every step serves one more demand.
//! 2. **Absorption** — once every demand is served, apply strictly
//!    improving AbsorbDriver moves while idle drivers remain.
//! 3. **Refinement** — apply strictly improving SwapPassengers moves.
//!
//! Passes repeat until one commits nothing. Every committed move either
//! serves a demand or strictly lowers the objective, so the search ends.

use tracing::{debug, info};

use crate::error::RouteError;
use crate::models::AssignmentState;

use super::{commit, select_best, Phase, SearchObserver, SearchOutcome, SearchStrategy};

/// Canonical deterministic local search.
///
/// # Examples
///
/// ```
/// use u_rideshare::distance::Point;
/// use u_rideshare::evaluation::InsertionEngine;
/// use u_rideshare::models::{AssignmentState, User};
/// use u_rideshare::search::{NoopObserver, PhasedLocalSearch, SearchStrategy};
///
/// let p = |id, a: (i64, i64), b: (i64, i64)| User::new(id, Point::new(a.0, a.1), Point::new(b.0, b.1));
/// let mut state = AssignmentState::from_parts(
///     vec![p(0, (0, 0), (10, 10)), p(1, (1, 1), (9, 9))],
///     vec![p(2, (2, 2), (3, 3))],
///     InsertionEngine::new(300),
/// );
///
/// let outcome = PhasedLocalSearch::default().run(&mut state, &mut NoopObserver).unwrap();
/// assert_eq!(outcome.unserved, 0);
/// assert!(outcome.final_objective < outcome.initial_objective);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PhasedLocalSearch {
    max_passes: Option<usize>,
}

impl PhasedLocalSearch {
    /// Creates a search that runs until convergence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stops after at most `passes` passes.
    pub fn with_max_passes(mut self, passes: usize) -> Self {
        self.max_passes = Some(passes);
        self
    }

    fn insertion_phase(
        &self,
        state: &mut AssignmentState,
        observer: &mut dyn SearchObserver,
    ) -> Result<usize, RouteError> {
        observer.on_phase(Phase::Insertion, state);
        let mut applied = 0;
        while !state.is_final() {
            let Some((mv, plan)) = select_best(state.add_passenger_moves(), state, |_| true) else {
                break;
            };
            commit(state, observer, &mv, &plan)?;
            applied += 1;
        }
        Ok(applied)
    }

    fn absorption_phase(
        &self,
        state: &mut AssignmentState,
        observer: &mut dyn SearchObserver,
    ) -> Result<usize, RouteError> {
        observer.on_phase(Phase::Absorption, state);
        let mut applied = 0;
        while state.is_final() && !state.idle_drivers().is_empty() {
            let Some((mv, plan)) = select_best(state.absorb_moves(), state, |p| p.delta() < 0) else {
                break;
            };
            commit(state, observer, &mv, &plan)?;
            applied += 1;
        }
        Ok(applied)
    }

    fn refinement_phase(
        &self,
        state: &mut AssignmentState,
        observer: &mut dyn SearchObserver,
    ) -> Result<usize, RouteError> {
        observer.on_phase(Phase::Refinement, state);
        let mut applied = 0;
        while let Some((mv, plan)) = select_best(state.swap_moves(), state, |p| p.delta() < 0) {
            commit(state, observer, &mv, &plan)?;
            applied += 1;
        }
        Ok(applied)
    }
}

impl SearchStrategy for PhasedLocalSearch {
    fn name(&self) -> &'static str {
        "phased"
    }

    fn run(
        &self,
        state: &mut AssignmentState,
        observer: &mut dyn SearchObserver,
    ) -> Result<SearchOutcome, RouteError> {
        let initial_objective = state.objective();
        let mut applied_moves = 0;
        let mut passes = 0;

        loop {
            if self.max_passes.is_some_and(|max| passes >= max) {
                debug!(passes, "pass limit reached");
                break;
            }
            passes += 1;

            let inserted = self.insertion_phase(state, observer)?;
            let absorbed = self.absorption_phase(state, observer)?;
            let swapped = self.refinement_phase(state, observer)?;
            let applied = inserted + absorbed + swapped;
            applied_moves += applied;

            info!(
                pass = passes,
                inserted,
                absorbed,
                swapped,
                objective = state.objective(),
                "pass finished"
            );
            if applied == 0 {
                break;
            }
        }

        observer.on_finish(state);
        Ok(SearchOutcome {
            initial_objective,
            final_objective: state.objective(),
            applied_moves,
            passes,
            unserved: state.unserved().len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::Point;
    use crate::evaluation::InsertionEngine;
    use crate::generator::{generate, ProblemConfig};
    use crate::local_search::Move;
    use crate::models::{User, UserId};
    use crate::search::{NoopObserver, RecordingObserver};

    fn user(id: UserId, from: (i64, i64), to: (i64, i64)) -> User {
        User::new(id, Point::new(from.0, from.1), Point::new(to.0, to.1))
    }

    #[test]
    fn test_single_driver_single_demand() {
        let mut state = AssignmentState::from_parts(
            vec![user(0, (0, 0), (10, 10))],
            vec![user(1, (1, 1), (2, 2))],
            InsertionEngine::new(300),
        );
        let outcome = PhasedLocalSearch::new()
            .run(&mut state, &mut NoopObserver)
            .expect("valid");
        assert_eq!(outcome.initial_objective, 320);
        assert_eq!(outcome.final_objective, 20);
        assert_eq!(outcome.applied_moves, 1);
        assert_eq!(outcome.unserved, 0);
        // Second pass applies nothing and terminates.
        assert_eq!(outcome.passes, 2);
    }

    #[test]
    fn test_unservable_demand_is_penalized() {
        let mut state = AssignmentState::from_parts(
            vec![user(0, (0, 0), (0, 0))],
            vec![user(1, (0, 0), (160, 160))],
            InsertionEngine::new(300),
        );
        let outcome = PhasedLocalSearch::new()
            .run(&mut state, &mut NoopObserver)
            .expect("valid");
        assert_eq!(outcome.unserved, 1);
        assert_eq!(outcome.final_objective, 300);
        assert_eq!(state.idle_drivers(), vec![0]);
    }

    #[test]
    fn test_absorbs_idle_driver() {
        let mut state = AssignmentState::from_parts(
            vec![user(0, (0, 0), (10, 10)), user(1, (1, 1), (9, 9))],
            vec![user(2, (2, 2), (3, 3))],
            InsertionEngine::new(300),
        );
        let mut observer = RecordingObserver::default();
        let outcome = PhasedLocalSearch::new()
            .run(&mut state, &mut observer)
            .expect("valid");
        assert_eq!(outcome.unserved, 0);
        assert_eq!(state.absorbed().len(), 1);
        assert_eq!(state.drivers().len(), 1);
        assert_eq!(outcome.final_objective, 20);
        assert!(observer
            .moves
            .iter()
            .any(|m| matches!(m, Move::AbsorbDriver(_))));
    }

    #[test]
    fn test_refinement_untangles_crossed_assignment() {
        let mut state = AssignmentState::from_parts(
            vec![user(0, (0, 0), (0, 10)), user(1, (50, 0), (50, 10))],
            vec![user(2, (50, 2), (50, 8)), user(3, (0, 2), (0, 8))],
            InsertionEngine::new(300),
        );
        crate::local_search::AddPassenger {
            driver: 0,
            passenger: 2,
        }
        .apply(&mut state)
        .expect("valid");
        crate::local_search::AddPassenger {
            driver: 1,
            passenger: 3,
        }
        .apply(&mut state)
        .expect("valid");

        let outcome = PhasedLocalSearch::new()
            .run(&mut state, &mut NoopObserver)
            .expect("valid");
        assert_eq!(outcome.final_objective, 20);
        assert!(state.route(0).expect("in pool").has_passenger(3));
    }

    #[test]
    fn test_objective_never_increases() {
        let config = ProblemConfig {
            population: 30,
            passengers: 15,
            grid_size: 30,
            seed: Some(7),
            ..ProblemConfig::default()
        };
        let problem = generate(&config).expect("valid config");
        let mut state = AssignmentState::new(&problem);
        let mut observer = RecordingObserver::default();
        let outcome = PhasedLocalSearch::new()
            .run(&mut state, &mut observer)
            .expect("valid");

        let mut previous = outcome.initial_objective;
        for &objective in &observer.objectives {
            assert!(objective <= previous);
            previous = objective;
        }
        assert_eq!(observer.finished, Some(outcome.final_objective));
        assert_eq!(observer.moves.len(), outcome.applied_moves);
        assert!(state.routes().all(|r| !r.is_over_occupied()));
        assert!(state.routes().all(|r| r.distance() <= 300 || r.is_empty()));
    }

    #[test]
    fn test_deterministic() {
        let config = ProblemConfig {
            population: 20,
            passengers: 10,
            grid_size: 25,
            seed: Some(11),
            ..ProblemConfig::default()
        };
        let problem = generate(&config).expect("valid config");
        let mut a = AssignmentState::new(&problem);
        let mut b = AssignmentState::new(&problem);
        let out_a = PhasedLocalSearch::new().run(&mut a, &mut NoopObserver).expect("valid");
        let out_b = PhasedLocalSearch::new().run(&mut b, &mut NoopObserver).expect("valid");
        assert_eq!(out_a, out_b);
        assert_eq!(a.to_string(), b.to_string());
    }

    #[test]
    fn test_max_passes() {
        let mut state = AssignmentState::from_parts(
            vec![user(0, (0, 0), (10, 10))],
            vec![user(1, (1, 1), (2, 2))],
            InsertionEngine::new(300),
        );
        let outcome = PhasedLocalSearch::new()
            .with_max_passes(1)
            .run(&mut state, &mut NoopObserver)
            .expect("valid");
        assert_eq!(outcome.passes, 1);
        assert_eq!(outcome.unserved, 0);
    }

    #[test]
    fn test_phase_order() {
        let mut state = AssignmentState::from_parts(
            vec![user(0, (0, 0), (10, 10))],
            vec![],
            InsertionEngine::new(300),
        );
        let mut observer = RecordingObserver::default();
        PhasedLocalSearch::new()
            .run(&mut state, &mut observer)
            .expect("valid");
        assert_eq!(
            observer.phases,
            vec![Phase::Insertion, Phase::Absorption, Phase::Refinement]
        );
    }
}
