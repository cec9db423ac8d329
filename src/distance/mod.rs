//! Grid geometry.
//!
//! Every distance in this crate is the Manhattan distance between integer
//! grid points.

mod manhattan;

pub use manhattan::{manhattan, path_length, Distance, Point};
