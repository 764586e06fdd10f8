//! Cluster result types

use serde::Serialize;

/// Which pass produced a cluster
///
/// The variant order is the canonical row order within a folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClusterType {
	Folder,
	Tag,
	Embedding,
}

impl ClusterType {
	pub fn as_str(&self) -> &'static str {
		match self {
			ClusterType::Folder => "folder",
			ClusterType::Tag => "tag",
			ClusterType::Embedding => "embedding",
		}
	}

	/// Fixed output rank: folder, then tag, then embedding
	pub fn rank(&self) -> u8 {
		match self {
			ClusterType::Folder => 0,
			ClusterType::Tag => 1,
			ClusterType::Embedding => 2,
		}
	}
}

/// One cluster with its medoid resolved
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedCluster {
	pub folder: String,
	pub cluster_type: ClusterType,
	/// Tag name for tag clusters, empty otherwise
	pub cluster_tag: String,
	/// Empty for folder clusters, tag name for tag clusters,
	/// `embedding_<n>` for embedding clusters
	pub label_hint: String,
	/// Member paths in processing order
	pub member_paths: Vec<String>,
	pub medoid_rel_path: String,
	/// Medoid similarity to the cluster centroid; `None` when no
	/// member carried an embedding
	pub cosine_to_centroid: Option<f32>,
}

impl ResolvedCluster {
	pub fn size(&self) -> usize {
		self.member_paths.len()
	}
}

/// Complete clustering result for one run
///
/// A pure value: the writer serializes it, nothing here touches disk.
#[derive(Debug, Default, Serialize)]
pub struct RunReport {
	/// Clusters in canonical order: folder ascending, then type rank,
	/// then creation order within type
	pub clusters: Vec<ResolvedCluster>,
	/// Non-fatal degradations (skipped folders, missing embeddings)
	pub warnings: Vec<String>,
	pub total_images: usize,
	pub folders_processed: usize,
	pub folders_skipped: usize,
}

impl RunReport {
	pub fn medoid_count(&self) -> usize {
		self.clusters.len()
	}
}
