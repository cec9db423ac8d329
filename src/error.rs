//! Error types.
//!
//! Infeasible insertions are not errors: operators report them as
//! rejections. The variants here signal misuse of the route API or an
//! invalid problem configuration.

use thiserror::Error;

use crate::models::UserId;

/// A route mutation that would break the route invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// Insertion indices outside `0 <= take <= drop <= len`.
    #[error("invalid insertion position (take {take}, drop {drop}) for route of length {len}")]
    InvalidPosition {
        /// Take index.
        take: usize,
        /// Drop index.
        drop: usize,
        /// Current route length.
        len: usize,
    },
    /// Insertion would push occupancy above vehicle capacity.
    #[error("inserting at (take {take}, drop {drop}) exceeds vehicle capacity")]
    OverOccupied {
        /// Take index.
        take: usize,
        /// Drop index.
        drop: usize,
    },
    /// The user is already carried by this route.
    #[error("user {0} is already on board")]
    AlreadyOnBoard(UserId),
    /// The referenced driver is not in the driver pool.
    #[error("driver {0} is not in the driver pool")]
    UnknownDriver(UserId),
    /// The demand is no longer waiting for a ride.
    #[error("demand {0} is not unserved")]
    NotUnserved(UserId),
    /// An absorbed driver must not be carrying anyone.
    #[error("driver {0} is not idle")]
    DriverNotIdle(UserId),
    /// The referenced passenger is not carried by the route.
    #[error("user {passenger} is not carried by driver {driver}")]
    NotOnBoard {
        /// Driver whose route was searched.
        driver: UserId,
        /// Missing passenger.
        passenger: UserId,
    },
}

/// An invalid problem configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The street grid has no cells.
    #[error("grid size must be positive")]
    EmptyGrid,
    /// More passengers requested than users in the population.
    #[error("passenger count {passengers} exceeds population {population}")]
    TooManyPassengers {
        /// Requested passengers (M).
        passengers: usize,
        /// Population size (N).
        population: usize,
    },
    /// Passengers exist but nobody drives.
    #[error("population {population} leaves no drivers for {passengers} passengers")]
    NoDrivers {
        /// Requested passengers (M).
        passengers: usize,
        /// Population size (N).
        population: usize,
    },
    /// The per-route distance cap must be positive.
    #[error("max drive distance must be positive, got {0}")]
    NonPositiveDistanceCap(i64),
}
