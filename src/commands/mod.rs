//! Command implementations

pub mod medoids;
