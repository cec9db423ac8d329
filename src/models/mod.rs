//! Domain model types for ride-sharing assignment.
//!
//! Provides the core abstractions: users travelling between grid points,
//! routes as ordered pickup/drop-off sequences owned by a driver, the
//! problem instance, and the assignment state the search mutates.

mod assignment;
mod problem;
mod route;
mod user;

pub use assignment::AssignmentState;
pub use problem::Problem;
pub use route::{OpKind, Operation, Route, VEHICLE_CAPACITY};
pub use user::{User, UserId};
