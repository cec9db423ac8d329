//! Steepest-descent hill climbing over the full neighborhood.
//!
//! # Algorithm
//!
//! At every step, evaluate all moves from
//! [`AssignmentState::all_moves`] and commit the one with the lowest
//! objective delta. Serving a demand is accepted when it does not raise
//! the objective; other moves must strictly lower it. Stop when no move
//! is accepted.

use tracing::info;

use crate::error::RouteError;
use crate::local_search::Plan;
use crate::models::AssignmentState;

use super::{commit, select_best, SearchObserver, SearchOutcome, SearchStrategy};

/// Textbook hill climbing using the same operators as
/// [`PhasedLocalSearch`](super::PhasedLocalSearch).
///
/// # Examples
///
/// ```
/// use u_rideshare::distance::Point;
/// use u_rideshare::evaluation::InsertionEngine;
/// use u_rideshare::models::{AssignmentState, User};
/// use u_rideshare::search::{HillClimbing, NoopObserver, SearchStrategy};
///
/// let p = |id, a: (i64, i64), b: (i64, i64)| User::new(id, Point::new(a.0, a.1), Point::new(b.0, b.1));
/// let mut state = AssignmentState::from_parts(
///     vec![p(0, (0, 0), (10, 10))],
///     vec![p(1, (1, 1), (2, 2))],
///     InsertionEngine::new(300),
/// );
///
/// let outcome = HillClimbing::default().run(&mut state, &mut NoopObserver).unwrap();
/// assert_eq!(outcome.final_objective, 20);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct HillClimbing {
    max_steps: Option<usize>,
}

impl HillClimbing {
    /// Creates a climber that runs until no move improves.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stops after at most `steps` committed moves.
    pub fn with_max_steps(mut self, steps: usize) -> Self {
        self.max_steps = Some(steps);
        self
    }
}

impl SearchStrategy for HillClimbing {
    fn name(&self) -> &'static str {
        "hill-climbing"
    }

    fn run(
        &self,
        state: &mut AssignmentState,
        observer: &mut dyn SearchObserver,
    ) -> Result<SearchOutcome, RouteError> {
        let initial_objective = state.objective();
        let mut steps = 0;

        while self.max_steps.is_none_or(|max| steps < max) {
            let Some((mv, plan)) = select_best(state.all_moves(), state, accepts) else {
                break;
            };
            commit(state, observer, &mv, &plan)?;
            steps += 1;
        }

        info!(steps, objective = state.objective(), "hill climbing finished");
        observer.on_finish(state);
        Ok(SearchOutcome {
            initial_objective,
            final_objective: state.objective(),
            applied_moves: steps,
            passes: steps,
            unserved: state.unserved().len(),
        })
    }
}

fn accepts(plan: &Plan) -> bool {
    match plan {
        Plan::AddPassenger { delta, .. } => *delta <= 0,
        _ => plan.delta() < 0,
    }
}
