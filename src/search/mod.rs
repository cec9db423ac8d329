//! Search strategies combining the neighborhood operators.
//!
//! - [`PhasedLocalSearch`] — Insertion, absorption, then refinement passes
//!   until a full pass changes nothing
//! - [`HillClimbing`] — Steepest descent over the whole neighborhood
//!
//! Both reuse the same operators; only the orchestration differs.

mod hill_climbing;
mod observer;
mod phased;

pub use hill_climbing::HillClimbing;
pub use observer::{NoopObserver, Phase, RecordingObserver, SearchObserver, TracingObserver};
pub use phased::PhasedLocalSearch;

use crate::distance::Distance;
use crate::error::RouteError;
use crate::local_search::{Move, Plan};
use crate::models::AssignmentState;

/// Summary of a finished search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Objective before the first move.
    pub initial_objective: Distance,
    /// Objective at termination.
    pub final_objective: Distance,
    /// Number of committed moves.
    pub applied_moves: usize,
    /// Passes (phased) or steps (hill climbing) performed.
    pub passes: usize,
    /// Demands left unserved.
    pub unserved: usize,
}

/// Drives the operators over an assignment state until convergence.
pub trait SearchStrategy {
    /// Short name for logging.
    fn name(&self) -> &'static str;

    /// Optimizes `state` in place.
    ///
    /// An error means a committed plan broke a route invariant.
    fn run(
        &self,
        state: &mut AssignmentState,
        observer: &mut dyn SearchObserver,
    ) -> Result<SearchOutcome, RouteError>;
}

/// Evaluates every move and returns the one with the lowest delta
/// (first found on ties), among those `accept` keeps.
pub(crate) fn select_best<F>(
    moves: Vec<Move>,
    state: &AssignmentState,
    accept: F,
) -> Option<(Move, Plan)>
where
    F: Fn(&Plan) -> bool,
{
    let mut best: Option<(Move, Plan)> = None;
    for mv in moves {
        let Some(plan) = mv.evaluate(state) else {
            continue;
        };
        if !accept(&plan) {
            continue;
        }
        if best.is_none_or(|(_, b)| plan.delta() < b.delta()) {
            best = Some((mv, plan));
        }
    }
    best
}

/// Commits a selected move and reports it.
pub(crate) fn commit(
    state: &mut AssignmentState,
    observer: &mut dyn SearchObserver,
    mv: &Move,
    plan: &Plan,
) -> Result<(), RouteError> {
    state.commit(plan)?;
    observer.on_move(mv, plan, state);
    Ok(())
}
