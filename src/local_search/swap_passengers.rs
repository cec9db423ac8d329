//! Inter-route passenger exchange.
//!
//! # Algorithm
//!
//! For every pair (p1 of route A, p2 of route B), remove both and reinsert
//! each into the other route at its cheapest mandatory position. The pair
//! with the smallest combined distance wins if it is strictly shorter than
//! the current combined distance.
//!
//! Each route is stripped of each of its passengers once, so evaluation
//! copies O(|A| + |B|) routes instead of two per pair.
//!
//! # Complexity
//!
//! O(|A| × |B| × n³) per evaluation, where n = route length.

use crate::error::RouteError;
use crate::evaluation::{InsertionCandidate, InsertionMode};
use crate::models::{AssignmentState, Route, User, UserId};

use super::{Plan, SwapSide};

/// Exchanges one passenger between two active drivers when that shortens
/// their combined distance.
///
/// # Examples
///
/// ```
/// use u_rideshare::distance::Point;
/// use u_rideshare::evaluation::InsertionEngine;
/// use u_rideshare::local_search::{AddPassenger, SwapPassengers};
/// use u_rideshare::models::{AssignmentState, User};
///
/// let p = |id, a: (i64, i64), b: (i64, i64)| User::new(id, Point::new(a.0, a.1), Point::new(b.0, b.1));
/// let mut state = AssignmentState::from_parts(
///     vec![p(0, (0, 0), (0, 10)), p(1, (50, 0), (50, 10))],
///     vec![p(2, (50, 2), (50, 8)), p(3, (0, 2), (0, 8))],
///     InsertionEngine::new(300),
/// );
/// AddPassenger { driver: 0, passenger: 2 }.apply(&mut state).unwrap();
/// AddPassenger { driver: 1, passenger: 3 }.apply(&mut state).unwrap();
///
/// let swapped = SwapPassengers { first: 0, second: 1 }.apply(&mut state).unwrap();
/// assert_eq!(swapped, Some((2, 3)));
/// assert_eq!(state.total_distance(), 20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapPassengers {
    /// First driver.
    pub first: UserId,
    /// Second driver.
    pub second: UserId,
}

impl SwapPassengers {
    /// Plans the best improving exchange without touching the state.
    pub fn evaluate(&self, state: &AssignmentState) -> Option<Plan> {
        if self.first == self.second {
            return None;
        }
        let route1 = state.route(self.first)?;
        let route2 = state.route(self.second)?;
        let engine = state.engine();

        let current = route1.distance() + route2.distance();
        let stripped1 = stripped_routes(route1);
        let stripped2 = stripped_routes(route2);

        let mut best_total = current;
        let mut best: Option<(SwapSide, SwapSide)> = None;

        for (p1, without1) in &stripped1 {
            for (p2, without2) in &stripped2 {
                let Some(into1) = engine.evaluate(without1, p2, InsertionMode::Mandatory) else {
                    continue;
                };
                // Insertion never shortens a route.
                if into1.distance + without2.distance() >= best_total {
                    continue;
                }
                let Some(into2) = engine.evaluate(without2, p1, InsertionMode::Mandatory) else {
                    continue;
                };

                let total = into1.distance + into2.distance;
                if total < best_total {
                    best_total = total;
                    best = Some((
                        side(self.first, p1, into1),
                        side(self.second, p2, into2),
                    ));
                }
            }
        }

        best.map(|(first, second)| Plan::SwapPassengers {
            first,
            second,
            delta: best_total - current,
        })
    }

    /// Performs the best improving exchange.
    ///
    /// Returns the `(passenger leaving first, passenger leaving second)`
    /// pair, or `None` if no exchange improves.
    pub fn apply(&self, state: &mut AssignmentState) -> Result<Option<(UserId, UserId)>, RouteError> {
        let Some(plan) = self.evaluate(state) else {
            return Ok(None);
        };
        state.commit(&plan)?;
        match plan {
            Plan::SwapPassengers { first, second, .. } => Ok(Some((first.outgoing, second.outgoing))),
            _ => Ok(None),
        }
    }
}

fn stripped_routes(route: &Route) -> Vec<(User, Route)> {
    route
        .passengers()
        .into_iter()
        .filter_map(|p| route.without_passenger(p.id()).map(|r| (p, r)))
        .collect()
}

fn side(driver: UserId, outgoing: &User, insertion: InsertionCandidate) -> SwapSide {
    SwapSide {
        driver,
        outgoing: outgoing.id(),
        insertion,
    }
}
