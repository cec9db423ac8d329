//! Turns an idle driver into a passenger of another driver.

use crate::error::RouteError;
use crate::evaluation::InsertionMode;
use crate::models::{AssignmentState, UserId};

use super::{commit_planned, Plan};

/// Inserts an idle driver's own trip into a host route (non-mandatory mode:
/// the host's new distance must beat the two separate trips).
///
/// On acceptance the idle driver leaves the driver pool for good.
///
/// # Examples
///
/// ```
/// use u_rideshare::distance::Point;
/// use u_rideshare::evaluation::InsertionEngine;
/// use u_rideshare::local_search::AbsorbDriver;
/// use u_rideshare::models::{AssignmentState, User};
///
/// let host = User::new(0, Point::new(0, 0), Point::new(10, 10));
/// let idle = User::new(1, Point::new(1, 1), Point::new(9, 9));
/// let mut state = AssignmentState::from_parts(vec![host, idle], vec![], InsertionEngine::new(300));
///
/// assert!(AbsorbDriver { host: 0, driver: 1 }.apply(&mut state).unwrap());
/// assert_eq!(state.drivers(), vec![0]);
/// assert_eq!(state.objective(), 20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbsorbDriver {
    /// Driver whose route receives the idle driver.
    pub host: UserId,
    /// Idle driver to absorb.
    pub driver: UserId,
}

impl AbsorbDriver {
    /// Plans the absorption without touching the state.
    pub fn evaluate(&self, state: &AssignmentState) -> Option<Plan> {
        if self.host == self.driver {
            return None;
        }
        let host_route = state.route(self.host)?;
        let idle_route = state.route(self.driver)?;
        if !idle_route.is_empty() {
            return None;
        }

        let insertion =
            state
                .engine()
                .evaluate(host_route, idle_route.driver(), InsertionMode::NonMandatory)?;

        Some(Plan::AbsorbDriver {
            host: self.host,
            driver: self.driver,
            insertion,
            delta: insertion.distance - host_route.distance() - idle_route.distance(),
        })
    }

    /// Absorbs the idle driver if it pays off. Returns whether it did.
    pub fn apply(&self, state: &mut AssignmentState) -> Result<bool, RouteError> {
        commit_planned(self.evaluate(state), state)
    }
}
