//! Cheapest feasible insertion of a passenger into a route.
//!
//! # Algorithm
//!
//! Scans every legal `(take, drop)` pair of the route and measures the
//! resulting distance without mutating the route. The first pair reaching
//! the minimum wins, so results are deterministic for a given operation
//! order.
//!
//! # Complexity
//!
//! O(n²) candidate pairs, each measured in O(n), where n = route length.

use crate::distance::Distance;
use crate::error::RouteError;
use crate::models::{Route, User};

/// Acceptance rule for an insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertionMode {
    /// The passenger must be served: accept any insertion keeping the route
    /// within the distance cap.
    Mandatory,
    /// The insertion must also beat not inserting at all (used to absorb
    /// idle drivers).
    NonMandatory,
}

/// Baseline a non-mandatory insertion has to beat strictly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AbsorbBaseline {
    /// Host route distance plus the inserted user's direct trip.
    #[default]
    Combined,
    /// Host route distance alone.
    HostOnly,
}

/// A concrete insertion: positions and the resulting route distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertionCandidate {
    /// Index of the Take in the current sequence.
    pub take: usize,
    /// Index of the Drop in the current sequence.
    pub drop: usize,
    /// Route distance after insertion.
    pub distance: Distance,
}

/// Result of [`InsertionEngine::try_insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertionOutcome {
    /// The passenger was inserted.
    Accepted(InsertionCandidate),
    /// No insertion satisfies the acceptance rule; the route is unchanged.
    Rejected,
}

impl InsertionOutcome {
    /// Returns `true` if the passenger was inserted.
    pub fn is_accepted(&self) -> bool {
        matches!(self, InsertionOutcome::Accepted(_))
    }
}

/// Finds and commits cheapest insertions under a per-route distance cap.
///
/// # Examples
///
/// ```
/// use u_rideshare::distance::Point;
/// use u_rideshare::evaluation::{InsertionEngine, InsertionMode};
/// use u_rideshare::models::{Route, User};
///
/// let engine = InsertionEngine::new(300);
/// let mut route = Route::new(User::new(0, Point::new(0, 0), Point::new(10, 10)));
/// let passenger = User::new(1, Point::new(1, 1), Point::new(2, 2));
///
/// let outcome = engine
///     .try_insert(&mut route, passenger, InsertionMode::Mandatory)
///     .unwrap();
/// assert!(outcome.is_accepted());
/// assert_eq!(route.distance(), 20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertionEngine {
    max_drive_distance: Distance,
    absorb_baseline: AbsorbBaseline,
}

impl InsertionEngine {
    /// Creates an engine with the given per-route distance cap.
    pub fn new(max_drive_distance: Distance) -> Self {
        Self {
            max_drive_distance,
            absorb_baseline: AbsorbBaseline::default(),
        }
    }

    /// Sets the baseline used by non-mandatory insertions.
    pub fn with_absorb_baseline(mut self, baseline: AbsorbBaseline) -> Self {
        self.absorb_baseline = baseline;
        self
    }

    /// Per-route distance cap.
    pub fn max_drive_distance(&self) -> Distance {
        self.max_drive_distance
    }

    /// Baseline used by non-mandatory insertions.
    pub fn absorb_baseline(&self) -> AbsorbBaseline {
        self.absorb_baseline
    }

    /// Cheapest legal insertion of `passenger`, ignoring the distance cap.
    ///
    /// Returns `None` only if the passenger is already on the route.
    pub fn best_insertion(&self, route: &Route, passenger: &User) -> Option<InsertionCandidate> {
        if route.has_passenger(passenger.id()) {
            return None;
        }

        if route.is_empty() {
            return Some(InsertionCandidate {
                take: 0,
                drop: 0,
                distance: route.distance_with_insertion(passenger, 0, 0),
            });
        }

        let mut best: Option<InsertionCandidate> = None;
        for (take, drop) in route.legal_insertion_positions() {
            let distance = route.distance_with_insertion(passenger, take, drop);
            if best.is_none_or(|b| distance < b.distance) {
                best = Some(InsertionCandidate {
                    take,
                    drop,
                    distance,
                });
            }
        }
        best
    }

    /// The insertion [`try_insert`](Self::try_insert) would commit, if any.
    pub fn evaluate(
        &self,
        route: &Route,
        passenger: &User,
        mode: InsertionMode,
    ) -> Option<InsertionCandidate> {
        let best = self.best_insertion(route, passenger)?;
        if best.distance > self.max_drive_distance {
            return None;
        }

        match mode {
            InsertionMode::Mandatory => Some(best),
            InsertionMode::NonMandatory => {
                let baseline = match self.absorb_baseline {
                    AbsorbBaseline::Combined => route.distance() + passenger.direct_distance(),
                    AbsorbBaseline::HostOnly => route.distance(),
                };
                (best.distance < baseline).then_some(best)
            }
        }
    }

    /// Inserts `passenger` at its cheapest acceptable position.
    ///
    /// Rejection leaves the route unmodified. An error means the route
    /// refused a position the engine selected, which is a bug.
    pub fn try_insert(
        &self,
        route: &mut Route,
        passenger: User,
        mode: InsertionMode,
    ) -> Result<InsertionOutcome, RouteError> {
        match self.evaluate(route, &passenger, mode) {
            Some(candidate) => {
                route.insert_at(passenger, candidate.take, candidate.drop)?;
                debug_assert_eq!(route.distance(), candidate.distance);
                Ok(InsertionOutcome::Accepted(candidate))
            }
            None => Ok(InsertionOutcome::Rejected),
        }
    }
}
