//! Progress reporting hooks.

use tracing::{debug, info};

use crate::distance::Distance;
use crate::local_search::{Move, Plan};
use crate::models::AssignmentState;

/// Search phases of [`PhasedLocalSearch`](super::PhasedLocalSearch).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Serving unserved demands.
    Insertion,
    /// Absorbing idle drivers.
    Absorption,
    /// Exchanging passengers between drivers.
    Refinement,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Insertion => "insertion",
            Phase::Absorption => "absorption",
            Phase::Refinement => "refinement",
        };
        f.write_str(name)
    }
}

/// Receives the search progress. Purely observational.
pub trait SearchObserver {
    /// A phase is about to start.
    fn on_phase(&mut self, _phase: Phase, _state: &AssignmentState) {}

    /// A move was committed; `state` reflects it.
    fn on_move(&mut self, mv: &Move, plan: &Plan, state: &AssignmentState);

    /// The search terminated.
    fn on_finish(&mut self, state: &AssignmentState);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SearchObserver for NoopObserver {
    fn on_move(&mut self, _mv: &Move, _plan: &Plan, _state: &AssignmentState) {}

    fn on_finish(&mut self, _state: &AssignmentState) {}
}

/// Logs progress through `tracing`: one `debug!` per move, the final
/// objective at `info`, and the route dump at `debug`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl SearchObserver for TracingObserver {
    fn on_phase(&mut self, phase: Phase, state: &AssignmentState) {
        debug!(%phase, objective = state.objective(), "phase started");
    }

    fn on_move(&mut self, mv: &Move, plan: &Plan, state: &AssignmentState) {
        debug!(
            %mv,
            delta = plan.delta(),
            objective = state.objective(),
            unserved = state.unserved().len(),
            "applied move"
        );
    }

    fn on_finish(&mut self, state: &AssignmentState) {
        info!(
            objective = state.objective(),
            distance = state.total_distance(),
            unserved = state.unserved().len(),
            drivers = state.drivers().len(),
            "search finished"
        );
        debug!("final routes:\n{state}");
    }
}

/// Keeps the objective after every committed move.
#[derive(Debug, Default, Clone)]
pub struct RecordingObserver {
    /// Objective after each move, in commit order.
    pub objectives: Vec<Distance>,
    /// Committed moves, in order.
    pub moves: Vec<Move>,
    /// Phases entered, in order.
    pub phases: Vec<Phase>,
    /// Final objective, once finished.
    pub finished: Option<Distance>,
}

impl SearchObserver for RecordingObserver {
    fn on_phase(&mut self, phase: Phase, _state: &AssignmentState) {
        self.phases.push(phase);
    }

    fn on_move(&mut self, mv: &Move, _plan: &Plan, state: &AssignmentState) {
        self.moves.push(*mv);
        self.objectives.push(state.objective());
    }

    fn on_finish(&mut self, state: &AssignmentState) {
        self.finished = Some(state.objective());
    }
}
