//! Insertion feasibility and cost evaluation.

mod insertion;

pub use insertion::{
    AbsorbBaseline, InsertionCandidate, InsertionEngine, InsertionMode, InsertionOutcome,
};
