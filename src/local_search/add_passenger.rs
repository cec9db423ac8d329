//! Assigns an unserved demand to a driver.

use crate::error::RouteError;
use crate::evaluation::InsertionMode;
use crate::models::{AssignmentState, UserId};

use super::{commit_planned, Plan};

/// Inserts an unserved demand into a driver's route at its cheapest
/// position (mandatory mode: only capacity and the distance cap apply).
///
/// On acceptance the demand leaves `unserved` and an idle driver becomes
/// active. On rejection nothing changes.
///
/// # Examples
///
/// ```
/// use u_rideshare::distance::Point;
/// use u_rideshare::evaluation::InsertionEngine;
/// use u_rideshare::local_search::AddPassenger;
/// use u_rideshare::models::{AssignmentState, User};
///
/// let driver = User::new(0, Point::new(0, 0), Point::new(10, 10));
/// let demand = User::new(1, Point::new(1, 1), Point::new(2, 2));
/// let mut state =
///     AssignmentState::from_parts(vec![driver], vec![demand], InsertionEngine::new(300));
///
/// let added = AddPassenger { driver: 0, passenger: 1 }.apply(&mut state).unwrap();
/// assert!(added);
/// assert!(state.is_final());
/// assert_eq!(state.objective(), 20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddPassenger {
    /// Driver receiving the demand.
    pub driver: UserId,
    /// Unserved demand to insert.
    pub passenger: UserId,
}

impl AddPassenger {
    /// Plans the insertion without touching the state.
    ///
    /// Returns `None` when the insertion is rejected or the move no longer
    /// applies (driver gone, demand already served).
    pub fn evaluate(&self, state: &AssignmentState) -> Option<Plan> {
        if !state.unserved().contains(&self.passenger) {
            return None;
        }
        let route = state.route(self.driver)?;
        let passenger = state.user(self.passenger)?;
        let engine = state.engine();
        let insertion = engine.evaluate(route, passenger, InsertionMode::Mandatory)?;

        Some(Plan::AddPassenger {
            driver: self.driver,
            passenger: self.passenger,
            insertion,
            delta: insertion.distance - route.distance() - engine.max_drive_distance(),
        })
    }

    /// Inserts the demand if possible. Returns whether it was accepted.
    pub fn apply(&self, state: &mut AssignmentState) -> Result<bool, RouteError> {
        commit_planned(self.evaluate(state), state)
    }
}
