//! Engine configuration and run-layout constants

use anyhow::{bail, Result};
use clap::ValueEnum;

// === Run Layout ===
pub const RUNS_DIR: &str = "runs";
pub const INVENTORY_FILE: &str = "inventory.json";
pub const ARTIFACT_FILE: &str = "medoids.csv";

// === Clustering Defaults ===
pub const DEFAULT_CLUSTER_MIN_SIZE: usize = 2;
pub const DEFAULT_EMBEDDING_THRESHOLD: f32 = 0.86;
pub const DEFAULT_MAX_EMBEDDING_CLUSTERS: usize = 4;

/// Clustering strategy for a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ClusterMode {
	/// Folder pass plus the optional tag pass
	#[default]
	Simple,
	/// Adds the embedding pass over images the tag pass left behind
	Hybrid,
}

/// Parameters for one clustering run
#[derive(Debug, Clone)]
pub struct EngineConfig {
	/// Identifies which inventory snapshot to cluster
	pub run_id: String,
	pub cluster_mode: ClusterMode,
	/// Enables the tag pass
	pub tag_aware: bool,
	/// Minimum members for a surviving tag cluster
	pub cluster_min_size: usize,
	/// Cosine similarity floor for joining a leader cluster [0, 1]
	pub embedding_threshold: f32,
	/// Cap on embedding clusters per folder, 0 = unlimited
	pub max_embedding_clusters: usize,
}

impl EngineConfig {
	/// Rejects invalid parameters before any clustering starts.
	pub fn validate(&self) -> Result<()> {
		if self.run_id.trim().is_empty() {
			bail!("run id must not be empty");
		}
		if !(0.0..=1.0).contains(&self.embedding_threshold) {
			bail!(
				"embedding threshold must be within [0.0, 1.0], got {}",
				self.embedding_threshold
			);
		}
		if self.cluster_min_size < 1 {
			bail!("cluster min size must be at least 1, got {}", self.cluster_min_size);
		}
		Ok(())
	}
}

impl Default for EngineConfig {
	fn default() -> Self {
		Self {
			run_id: String::new(),
			cluster_mode: ClusterMode::Simple,
			tag_aware: false,
			cluster_min_size: DEFAULT_CLUSTER_MIN_SIZE,
			embedding_threshold: DEFAULT_EMBEDDING_THRESHOLD,
			max_embedding_clusters: DEFAULT_MAX_EMBEDDING_CLUSTERS,
		}
	}
}
