//! Clustering passes

pub mod embedding;
pub mod hybrid;
pub mod tag;

pub use hybrid::cluster_run;
