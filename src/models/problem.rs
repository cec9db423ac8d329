//! Problem instance.

use std::collections::BTreeSet;

use crate::distance::Distance;

use super::{User, UserId};

/// A ride-sharing instance: a population of users split into passenger
/// demands and drivers, plus the per-route distance cap.
///
/// Users are indexed by their ID; every user not listed as a demand drives.
///
/// # Examples
///
/// ```
/// use u_rideshare::distance::Point;
/// use u_rideshare::models::{Problem, User};
///
/// let users = vec![
///     User::new(0, Point::new(0, 0), Point::new(10, 10)),
///     User::new(1, Point::new(1, 1), Point::new(2, 2)),
/// ];
/// let problem = Problem::new(users, vec![1], 300);
/// assert_eq!(problem.drivers(), &[0]);
/// assert_eq!(problem.demands(), &[1]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    users: Vec<User>,
    demands: Vec<UserId>,
    drivers: Vec<UserId>,
    max_drive_distance: Distance,
}

impl Problem {
    /// Creates an instance; users not in `demands` become drivers.
    ///
    /// # Panics
    ///
    /// Panics if a user's ID does not match its index, or if `demands`
    /// names an unknown user or the same user twice.
    pub fn new(users: Vec<User>, demands: Vec<UserId>, max_drive_distance: Distance) -> Self {
        assert!(
            users.iter().enumerate().all(|(i, u)| u.id() == i),
            "user IDs must match their index"
        );
        assert!(
            demands.iter().all(|&id| id < users.len()),
            "demands must refer to existing users"
        );
        let distinct: BTreeSet<UserId> = demands.iter().copied().collect();
        assert_eq!(distinct.len(), demands.len(), "demands must be distinct");
        let drivers = users
            .iter()
            .map(User::id)
            .filter(|id| !demands.contains(id))
            .collect();
        Self {
            users,
            demands,
            drivers,
            max_drive_distance,
        }
    }

    /// The whole population, indexed by ID.
    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Looks up a user by ID.
    pub fn user(&self, id: UserId) -> Option<&User> {
        self.users.get(id)
    }

    /// IDs of the passenger demands.
    pub fn demands(&self) -> &[UserId] {
        &self.demands
    }

    /// IDs of the drivers.
    pub fn drivers(&self) -> &[UserId] {
        &self.drivers
    }

    /// Per-route distance cap.
    pub fn max_drive_distance(&self) -> Distance {
        self.max_drive_distance
    }
}
