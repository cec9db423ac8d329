//! User type.

use serde::{Deserialize, Serialize};

use crate::distance::{Distance, Point};

/// Identifier of a user in the problem population.
pub type UserId = usize;

/// A member of the population: either a passenger demand or a driver.
///
/// Users are immutable once created. A driver absorbed into another route
/// is carried like any passenger, so both roles share this type.
///
/// # Examples
///
/// ```
/// use u_rideshare::distance::Point;
/// use u_rideshare::models::User;
///
/// let u = User::new(4, Point::new(1, 1), Point::new(2, 2));
/// assert_eq!(u.id(), 4);
/// assert_eq!(u.direct_distance(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    origin: Point,
    destination: Point,
}

impl User {
    /// Creates a user travelling from `origin` to `destination`.
    pub fn new(id: UserId, origin: Point, destination: Point) -> Self {
        Self {
            id,
            origin,
            destination,
        }
    }

    /// User ID.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Where the user starts.
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Where the user wants to go.
    pub fn destination(&self) -> Point {
        self.destination
    }

    /// Length of the trip when travelling alone.
    pub fn direct_distance(&self) -> Distance {
        self.origin.manhattan_to(&self.destination)
    }
}
