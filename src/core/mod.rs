//! Core domain types and medoid selection

pub mod cluster;
pub mod medoid;
pub mod record;

pub use cluster::{ClusterType, ResolvedCluster, RunReport};
pub use medoid::{resolve_medoid, MedoidResolution};
pub use record::{Embedding, ImageRecord, TagScore};
