//! # u-rideshare
//!
//! Ride-sharing assignment: matches a pool of passenger demands to drivers
//! whose pickup-and-delivery routes are capped in occupancy and length,
//! minimizing total distance plus a penalty per unserved demand.
//!
//! ## Modules
//!
//! - [`distance`] — Grid points and Manhattan distance
//! - [`models`] — Domain model types (User, Route, Problem, AssignmentState)
//! - [`evaluation`] — Cheapest feasible insertion under the distance cap
//! - [`local_search`] — Operators (AddPassenger, SwapPassengers, AbsorbDriver)
//! - [`search`] — Phased local search and hill climbing over the operators
//! - [`generator`] — Random instance generation
//! - [`error`] — Error types

pub mod distance;
pub mod error;
pub mod evaluation;
pub mod generator;
pub mod local_search;
pub mod models;
pub mod search;
