//! Neighborhood operators over an [`AssignmentState`].
//!
//! - [`AddPassenger`] — Insert an unserved demand into a driver's route
//! - [`SwapPassengers`] — Exchange one passenger between two routes
//! - [`AbsorbDriver`] — Carry an idle driver as a passenger of another
//!
//! Operators are evaluated read-only into a [`Plan`] carrying the exact
//! positions to commit and the objective delta; only
//! [`AssignmentState::commit`] mutates.

mod absorb_driver;
mod add_passenger;
mod swap_passengers;

pub use absorb_driver::AbsorbDriver;
pub use add_passenger::AddPassenger;
pub use swap_passengers::SwapPassengers;

use crate::distance::Distance;
use crate::error::RouteError;
use crate::evaluation::InsertionCandidate;
use crate::models::{AssignmentState, UserId};

/// One driver's half of a passenger exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapSide {
    /// Driver whose route changes.
    pub driver: UserId,
    /// Passenger leaving this route.
    pub outgoing: UserId,
    /// Where the incoming passenger goes, relative to the route without
    /// `outgoing`.
    pub insertion: InsertionCandidate,
}

/// An evaluated, ready-to-commit operator application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plan {
    /// Insert an unserved demand.
    AddPassenger {
        /// Receiving driver.
        driver: UserId,
        /// Demand to insert.
        passenger: UserId,
        /// Insertion positions.
        insertion: InsertionCandidate,
        /// Objective change.
        delta: Distance,
    },
    /// Exchange passengers between two drivers.
    SwapPassengers {
        /// First driver's side.
        first: SwapSide,
        /// Second driver's side.
        second: SwapSide,
        /// Objective change.
        delta: Distance,
    },
    /// Absorb an idle driver into a host route.
    AbsorbDriver {
        /// Receiving driver.
        host: UserId,
        /// Idle driver leaving the pool.
        driver: UserId,
        /// Insertion positions.
        insertion: InsertionCandidate,
        /// Objective change.
        delta: Distance,
    },
}

impl Plan {
    /// Change in objective if committed (negative is better).
    pub fn delta(&self) -> Distance {
        match *self {
            Plan::AddPassenger { delta, .. }
            | Plan::SwapPassengers { delta, .. }
            | Plan::AbsorbDriver { delta, .. } => delta,
        }
    }
}

/// Any of the three operators, as enumerated by the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    /// See [`AddPassenger`].
    AddPassenger(AddPassenger),
    /// See [`SwapPassengers`].
    SwapPassengers(SwapPassengers),
    /// See [`AbsorbDriver`].
    AbsorbDriver(AbsorbDriver),
}

impl Move {
    /// Plans the move without touching the state; `None` if rejected.
    pub fn evaluate(&self, state: &AssignmentState) -> Option<Plan> {
        match self {
            Move::AddPassenger(op) => op.evaluate(state),
            Move::SwapPassengers(op) => op.evaluate(state),
            Move::AbsorbDriver(op) => op.evaluate(state),
        }
    }

    /// Evaluates and commits. Returns whether the state changed.
    pub fn apply(&self, state: &mut AssignmentState) -> Result<bool, RouteError> {
        commit_planned(self.evaluate(state), state)
    }
}

/// Commits `plan` if there is one. Returns whether the state changed.
pub(crate) fn commit_planned(
    plan: Option<Plan>,
    state: &mut AssignmentState,
) -> Result<bool, RouteError> {
    match plan {
        Some(plan) => {
            state.commit(&plan)?;
            Ok(true)
        }
        None => Ok(false),
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Move::AddPassenger(op) => write!(f, "add {} -> driver {}", op.passenger, op.driver),
            Move::SwapPassengers(op) => write!(f, "swap drivers {} <-> {}", op.first, op.second),
            Move::AbsorbDriver(op) => write!(f, "absorb driver {} -> driver {}", op.driver, op.host),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::Point;
    use crate::evaluation::InsertionEngine;
    use crate::models::User;

    fn user(id: UserId, from: (i64, i64), to: (i64, i64)) -> User {
        User::new(id, Point::new(from.0, from.1), Point::new(to.0, to.1))
    }

    #[test]
    fn test_move_display() {
        let add = Move::AddPassenger(AddPassenger {
            driver: 1,
            passenger: 4,
        });
        assert_eq!(add.to_string(), "add 4 -> driver 1");
        let swap = Move::SwapPassengers(SwapPassengers {
            first: 1,
            second: 2,
        });
        assert_eq!(swap.to_string(), "swap drivers 1 <-> 2");
        let absorb = Move::AbsorbDriver(AbsorbDriver { host: 0, driver: 3 });
        assert_eq!(absorb.to_string(), "absorb driver 3 -> driver 0");
    }

    #[test]
    fn test_move_dispatch() {
        let mut state = AssignmentState::from_parts(
            vec![user(0, (0, 0), (10, 10))],
            vec![user(1, (1, 1), (2, 2))],
            InsertionEngine::new(300),
        );
        let mv = state.add_passenger_moves()[0];
        let plan = mv.evaluate(&state).expect("feasible");
        assert_eq!(plan.delta(), -300);
        assert!(mv.apply(&mut state).expect("valid"));
        assert!(!mv.apply(&mut state).expect("valid"));
    }
}
