//! Route and operation types.

use std::iter::once;

use crate::distance::{path_length, Distance, Point};
use crate::error::RouteError;

use super::{User, UserId};

/// Maximum number of passengers on board at any point of a route.
pub const VEHICLE_CAPACITY: usize = 2;

/// Whether an operation picks a passenger up or drops them off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    /// Pick the passenger up at their origin.
    Take,
    /// Drop the passenger off at their destination.
    Drop,
}

/// A single stop of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    kind: OpKind,
    passenger: User,
}

impl Operation {
    /// Pickup of `passenger`.
    pub fn take(passenger: User) -> Self {
        Self {
            kind: OpKind::Take,
            passenger,
        }
    }

    /// Drop-off of `passenger`.
    pub fn drop(passenger: User) -> Self {
        Self {
            kind: OpKind::Drop,
            passenger,
        }
    }

    /// Pickup or drop-off.
    pub fn kind(&self) -> OpKind {
        self.kind
    }

    /// The passenger this stop serves.
    pub fn passenger(&self) -> &User {
        &self.passenger
    }

    /// Where the vehicle has to be for this stop.
    pub fn location(&self) -> Point {
        match self.kind {
            OpKind::Take => self.passenger.origin(),
            OpKind::Drop => self.passenger.destination(),
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            OpKind::Take => write!(f, "T{}", self.passenger.id()),
            OpKind::Drop => write!(f, "D{}", self.passenger.id()),
        }
    }
}

/// An ordered sequence of pickups and drop-offs driven by one driver.
///
/// The route starts at the driver's origin and ends at the driver's
/// destination (neither is stored in `operations`). Every carried passenger
/// has exactly one Take followed later by one Drop, and at most
/// [`VEHICLE_CAPACITY`] passengers are on board at once.
///
/// Insertion positions are indices into the current sequence: inserting at
/// `(take, drop)` places the Take before `operations[take]` and the Drop
/// before `operations[drop]`, so the operations `take..drop` are driven
/// with the new passenger on board.
///
/// # Examples
///
/// ```
/// use u_rideshare::distance::Point;
/// use u_rideshare::models::{Route, User};
///
/// let driver = User::new(0, Point::new(0, 0), Point::new(10, 10));
/// let passenger = User::new(1, Point::new(1, 1), Point::new(2, 2));
///
/// let mut route = Route::new(driver);
/// assert_eq!(route.distance(), 20);
///
/// route.insert_at(passenger, 0, 0).unwrap();
/// assert_eq!(route.len(), 2);
/// assert_eq!(route.distance(), 20);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    driver: User,
    operations: Vec<Operation>,
}

impl Route {
    /// Creates an empty route for the given driver.
    pub fn new(driver: User) -> Self {
        Self {
            driver,
            operations: Vec::new(),
        }
    }

    /// The user driving this route.
    pub fn driver(&self) -> &User {
        &self.driver
    }

    /// The ordered pickup/drop-off sequence.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Number of operations (twice the number of passengers).
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Returns `true` if nobody rides with the driver.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Total driven distance: origin, every stop in order, destination.
    ///
    /// An empty route is the driver's direct trip.
    pub fn distance(&self) -> Distance {
        path_length(
            once(self.driver.origin())
                .chain(self.operations.iter().map(Operation::location))
                .chain(once(self.driver.destination())),
        )
    }

    /// Distance the route would have after inserting `passenger` at
    /// `(take, drop)`, without modifying the route.
    ///
    /// Feasibility is not checked; see [`Route::is_legal_insertion`].
    ///
    /// # Panics
    ///
    /// Panics if `take > drop` or `drop > self.len()`.
    pub fn distance_with_insertion(&self, passenger: &User, take: usize, drop: usize) -> Distance {
        let ops = &self.operations;
        path_length(
            once(self.driver.origin())
                .chain(ops[..take].iter().map(Operation::location))
                .chain(once(passenger.origin()))
                .chain(ops[take..drop].iter().map(Operation::location))
                .chain(once(passenger.destination()))
                .chain(ops[drop..].iter().map(Operation::location))
                .chain(once(self.driver.destination())),
        )
    }

    /// Passengers on board before each operation, plus the final count.
    ///
    /// Entry `i` is the occupancy right before `operations[i]`; the last
    /// entry is the occupancy after the whole sequence (zero for a valid
    /// route).
    pub fn occupancy_profile(&self) -> Vec<usize> {
        let mut profile = Vec::with_capacity(self.operations.len() + 1);
        let mut onboard = 0usize;
        profile.push(onboard);
        for op in &self.operations {
            match op.kind {
                OpKind::Take => onboard += 1,
                OpKind::Drop => onboard = onboard.saturating_sub(1),
            }
            profile.push(onboard);
        }
        profile
    }

    /// Returns `true` if more than [`VEHICLE_CAPACITY`] passengers are ever
    /// on board.
    pub fn is_over_occupied(&self) -> bool {
        self.occupancy_profile()
            .iter()
            .any(|&onboard| onboard > VEHICLE_CAPACITY)
    }

    /// Returns `true` if inserting a passenger at `(take, drop)` keeps the
    /// occupancy within capacity.
    pub fn is_legal_insertion(&self, take: usize, drop: usize) -> bool {
        if take > drop || drop > self.operations.len() {
            return false;
        }
        self.occupancy_profile()[take..=drop]
            .iter()
            .all(|&onboard| onboard < VEHICLE_CAPACITY)
    }

    /// Every `(take, drop)` pair at which a new passenger fits.
    ///
    /// Pairs are produced in ascending `take`, then ascending `drop` order,
    /// and the append-at-end pair `(len, len)` is always last.
    pub fn legal_insertion_positions(&self) -> Vec<(usize, usize)> {
        let profile = self.occupancy_profile();
        let len = self.operations.len();
        let mut positions = Vec::new();

        for take in 0..=len {
            if profile[take] >= VEHICLE_CAPACITY {
                continue;
            }
            positions.push((take, take));
            for drop in (take + 1)..=len {
                // The new passenger rides through every stop up to `drop`.
                if profile[drop] >= VEHICLE_CAPACITY {
                    break;
                }
                positions.push((take, drop));
            }
        }

        positions
    }

    /// Inserts `passenger` with its Take at `take` and Drop at `drop`.
    ///
    /// The route is left untouched on error.
    pub fn insert_at(&mut self, passenger: User, take: usize, drop: usize) -> Result<(), RouteError> {
        let len = self.operations.len();
        if take > drop || drop > len {
            return Err(RouteError::InvalidPosition { take, drop, len });
        }
        if self.has_passenger(passenger.id()) {
            return Err(RouteError::AlreadyOnBoard(passenger.id()));
        }
        if !self.is_legal_insertion(take, drop) {
            return Err(RouteError::OverOccupied { take, drop });
        }

        self.operations.insert(drop, Operation::drop(passenger));
        self.operations.insert(take, Operation::take(passenger));
        debug_assert!(!self.is_over_occupied(), "route over capacity: {self}");
        Ok(())
    }

    /// Removes the passenger's Take and Drop.
    ///
    /// Returns the `(take, drop)` indices the two operations occupied, or
    /// `None` (and no change) if the passenger is not carried.
    pub fn remove_passenger(&mut self, passenger: UserId) -> Option<(usize, usize)> {
        let (take, drop) = self.find_passenger(passenger)?;
        self.operations.remove(drop);
        self.operations.remove(take);
        Some((take, drop))
    }

    /// A copy of this route without the given passenger.
    pub fn without_passenger(&self, passenger: UserId) -> Option<Route> {
        let mut route = self.clone();
        route.remove_passenger(passenger)?;
        Some(route)
    }

    /// Carried passengers in pickup order.
    pub fn passengers(&self) -> Vec<User> {
        self.operations
            .iter()
            .filter(|op| op.kind == OpKind::Take)
            .map(|op| op.passenger)
            .collect()
    }

    /// Number of carried passengers.
    pub fn num_passengers(&self) -> usize {
        self.operations.len() / 2
    }

    /// Returns `true` if the passenger is carried by this route.
    pub fn has_passenger(&self, passenger: UserId) -> bool {
        self.operations
            .iter()
            .any(|op| op.passenger.id() == passenger)
    }

    fn find_passenger(&self, passenger: UserId) -> Option<(usize, usize)> {
        let mut positions = self
            .operations
            .iter()
            .enumerate()
            .filter(|(_, op)| op.passenger.id() == passenger)
            .map(|(i, _)| i);
        let take = positions.next()?;
        let drop = positions.next()?;
        debug_assert!(positions.next().is_none());
        Some((take, drop))
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "driver {}:", self.driver.id())?;
        if self.operations.is_empty() {
            write!(f, " alone")?;
        }
        for op in &self.operations {
            write!(f, " {op}")?;
        }
        write!(f, " (dist {})", self.distance())
    }
}
