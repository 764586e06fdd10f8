//! Per-run orchestration of the folder, tag, and embedding passes
//!
//! Folders are independent, so they are clustered in parallel and the
//! per-folder results are flattened back in canonical order: folder
//! ascending, then cluster type, then creation order within type. A
//! parallel run is byte-identical to a sequential one.

use std::collections::{BTreeMap, HashSet};

use anyhow::Result;
use rayon::prelude::*;

use crate::config::{ClusterMode, EngineConfig};
use crate::core::medoid::resolve_medoid;
use crate::core::{ClusterType, ImageRecord, ResolvedCluster, RunReport};
use crate::processing::embedding::cluster_by_embedding;
use crate::processing::tag::cluster_by_tag;

/// Clusters one inventory snapshot into a run report.
///
/// Fails fast on invalid configuration. A malformed folder (embedding
/// dimension disagreement, non-finite components) is skipped with a
/// warning; the run still covers every other folder.
pub fn cluster_run(images: &[ImageRecord], config: &EngineConfig) -> Result<RunReport> {
	config.validate()?;

	// BTreeMap fixes ascending folder order for the whole run.
	let mut folders: BTreeMap<&str, Vec<&ImageRecord>> = BTreeMap::new();
	for image in images {
		folders.entry(image.folder.as_str()).or_default().push(image);
	}

	let folder_results: Vec<(&str, Result<FolderOutput, String>)> = folders
		.par_iter()
		.map(|(folder, members)| (*folder, cluster_folder(folder, members, config)))
		.collect();

	let mut report = RunReport {
		total_images: images.len(),
		..RunReport::default()
	};

	for (folder, result) in folder_results {
		match result {
			Ok(output) => {
				report.folders_processed += 1;
				report.clusters.extend(output.clusters);
				report.warnings.extend(output.warnings);
			}
			Err(reason) => {
				report.folders_skipped += 1;
				report.warnings.push(format!("folder '{}' skipped: {}", folder, reason));
			}
		}
	}

	// Stable sort: creation order within a type is preserved.
	report
		.clusters
		.sort_by(|a, b| a.folder.cmp(&b.folder).then(a.cluster_type.rank().cmp(&b.cluster_type.rank())));

	Ok(report)
}

struct FolderOutput {
	clusters: Vec<ResolvedCluster>,
	warnings: Vec<String>,
}

/// Runs the pass sequence for one folder: folder pass always, tag pass
/// when enabled, embedding pass over the leftover pool in hybrid mode.
fn cluster_folder(
	folder: &str,
	members: &[&ImageRecord],
	config: &EngineConfig,
) -> Result<FolderOutput, String> {
	if members.is_empty() {
		return Ok(FolderOutput { clusters: Vec::new(), warnings: Vec::new() });
	}

	validate_folder(members)?;

	let mut clusters = Vec::new();
	let mut warnings = Vec::new();

	// Folder pass: one cluster containing every image.
	clusters.push(resolve_cluster(
		folder,
		ClusterType::Folder,
		String::new(),
		String::new(),
		members,
	));

	let missing = members.iter().filter(|m| m.embedding.is_none()).count();
	if missing > 0 {
		warnings.push(format!(
			"folder '{}': {} image(s) without embeddings excluded from the embedding pass",
			folder, missing
		));
	}

	// Tag pass: one cluster per surviving dominant-tag group. Claimed
	// images leave the pool; tag and embedding membership are exclusive.
	let mut claimed: HashSet<&str> = HashSet::new();
	if config.tag_aware {
		for group in cluster_by_tag(members, config.cluster_min_size) {
			for member in &group.members {
				claimed.insert(member.relative_path.as_str());
			}
			clusters.push(resolve_cluster(
				folder,
				ClusterType::Tag,
				group.tag.clone(),
				group.tag,
				&group.members,
			));
		}
	}

	// Embedding pass over whatever the tag pass left behind.
	if config.cluster_mode == ClusterMode::Hybrid {
		let pool: Vec<&ImageRecord> = members
			.iter()
			.filter(|m| !claimed.contains(m.relative_path.as_str()))
			.copied()
			.collect();

		for group in cluster_by_embedding(
			&pool,
			config.embedding_threshold,
			config.max_embedding_clusters,
		) {
			clusters.push(resolve_cluster(
				folder,
				ClusterType::Embedding,
				String::new(),
				group.label_hint,
				&group.members,
			));
		}
	}

	Ok(FolderOutput { clusters, warnings })
}

fn resolve_cluster(
	folder: &str,
	cluster_type: ClusterType,
	cluster_tag: String,
	label_hint: String,
	members: &[&ImageRecord],
) -> ResolvedCluster {
	let resolution = resolve_medoid(members);
	ResolvedCluster {
		folder: folder.to_string(),
		cluster_type,
		cluster_tag,
		label_hint,
		member_paths: members.iter().map(|m| m.relative_path.clone()).collect(),
		medoid_rel_path: resolution.medoid_rel_path,
		cosine_to_centroid: resolution.cosine_to_centroid,
	}
}

/// Rejects a folder whose records cannot be clustered coherently.
fn validate_folder(members: &[&ImageRecord]) -> Result<(), String> {
	let mut dim: Option<usize> = None;
	for member in members {
		let Some(emb) = member.embedding.as_ref() else {
			continue;
		};
		if !emb.is_finite() {
			return Err(format!(
				"embedding for '{}' contains non-finite values",
				member.relative_path
			));
		}
		match dim {
			None => dim = Some(emb.dim()),
			Some(expected) if expected != emb.dim() => {
				return Err(format!(
					"embedding dimension mismatch: '{}' has {} but folder uses {}",
					member.relative_path,
					emb.dim(),
					expected
				));
			}
			Some(_) => {}
		}
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::core::record::{folder_of, Embedding, TagScore};

	fn record(path: &str, embedding: Option<Vec<f32>>, tags: &[(&str, f32)]) -> ImageRecord {
		ImageRecord {
			relative_path: path.to_string(),
			folder: folder_of(path),
			embedding: embedding.map(Embedding::new),
			top_tags: tags
				.iter()
				.map(|(name, score)| TagScore { name: name.to_string(), score: *score })
				.collect(),
		}
	}

	fn hybrid_config() -> EngineConfig {
		EngineConfig {
			run_id: "test".to_string(),
			cluster_mode: ClusterMode::Hybrid,
			tag_aware: true,
			cluster_min_size: 2,
			embedding_threshold: 0.86,
			max_embedding_clusters: 4,
		}
	}

	/// 12 images, 4 sharing the dominant tag `skyline`: one tag cluster
	/// of size 4, and the folder row is always present.
	#[test]
	fn tag_cluster_alongside_folder_row() {
		let mut images = Vec::new();
		for i in 0..4 {
			images.push(record(
				&format!("atlanta-trip/sky_{i}.jpg"),
				Some(vec![1.0, 0.0, 0.0]),
				&[("skyline", 0.9)],
			));
		}
		for i in 0..8 {
			images.push(record(
				&format!("atlanta-trip/misc_{i}.jpg"),
				Some(vec![0.0, 1.0, 0.0]),
				&[(format!("tag{i}").as_str(), 0.5)],
			));
		}

		let config = EngineConfig {
			cluster_mode: ClusterMode::Simple,
			..hybrid_config()
		};
		let report = cluster_run(&images, &config).unwrap();

		let folder_rows: Vec<_> = report
			.clusters
			.iter()
			.filter(|c| c.cluster_type == ClusterType::Folder)
			.collect();
		assert_eq!(folder_rows.len(), 1);
		assert!(folder_rows[0].cluster_tag.is_empty());
		assert!(folder_rows[0].label_hint.is_empty());
		assert_eq!(folder_rows[0].size(), 12);

		let tag_rows: Vec<_> = report
			.clusters
			.iter()
			.filter(|c| c.cluster_type == ClusterType::Tag)
			.collect();
		assert_eq!(tag_rows.len(), 1);
		assert_eq!(tag_rows[0].label_hint, "skyline");
		assert_eq!(tag_rows[0].size(), 4);
	}

	/// Hybrid mode with a cap of 4: at most 4 embedding clusters over
	/// the 8 images the tag pass left behind.
	#[test]
	fn hybrid_caps_embedding_clusters() {
		let mut images = Vec::new();
		for i in 0..4 {
			images.push(record(
				&format!("atlanta-trip/sky_{i}.jpg"),
				Some(vec![1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
				&[("skyline", 0.9)],
			));
		}
		for i in 0..8 {
			// Mutually dissimilar leftovers: one cluster each until the cap.
			let mut v = vec![0.0; 8];
			v[i] = 1.0;
			images.push(record(&format!("atlanta-trip/misc_{i}.jpg"), Some(v), &[]));
		}

		let report = cluster_run(&images, &hybrid_config()).unwrap();

		let embedding_rows: Vec<_> = report
			.clusters
			.iter()
			.filter(|c| c.cluster_type == ClusterType::Embedding)
			.collect();
		assert_eq!(embedding_rows.len(), 4);
		let labels: Vec<&str> = embedding_rows.iter().map(|c| c.label_hint.as_str()).collect();
		assert_eq!(
			labels,
			vec!["embedding_1", "embedding_2", "embedding_3", "embedding_4"]
		);
	}

	/// A single-image folder yields one folder row with cosine 1.0.
	#[test]
	fn single_image_folder() {
		let images = vec![record("solo/one.jpg", Some(vec![0.6, 0.8]), &[])];
		let config = EngineConfig { run_id: "test".to_string(), ..EngineConfig::default() };
		let report = cluster_run(&images, &config).unwrap();

		assert_eq!(report.clusters.len(), 1);
		assert_eq!(report.clusters[0].size(), 1);
		assert_eq!(report.clusters[0].cosine_to_centroid, Some(1.0));
	}

	#[test]
	fn tag_claimed_images_never_enter_embedding_pool() {
		let images = vec![
			record("f/a.jpg", Some(vec![1.0, 0.0]), &[("cat", 0.9)]),
			record("f/b.jpg", Some(vec![1.0, 0.0]), &[("cat", 0.9)]),
			record("f/c.jpg", Some(vec![1.0, 0.0]), &[]),
		];

		let report = cluster_run(&images, &hybrid_config()).unwrap();

		let embedding_rows: Vec<_> = report
			.clusters
			.iter()
			.filter(|c| c.cluster_type == ClusterType::Embedding)
			.collect();
		assert_eq!(embedding_rows.len(), 1);
		assert_eq!(embedding_rows[0].member_paths, vec!["f/c.jpg".to_string()]);
	}

	#[test]
	fn folders_come_back_in_ascending_order() {
		let images = vec![
			record("zoo/a.jpg", Some(vec![1.0, 0.0]), &[]),
			record("alps/b.jpg", Some(vec![1.0, 0.0]), &[]),
			record("mid/c.jpg", Some(vec![1.0, 0.0]), &[]),
		];
		let config = EngineConfig { run_id: "test".to_string(), ..EngineConfig::default() };
		let report = cluster_run(&images, &config).unwrap();

		let folders: Vec<&str> = report.clusters.iter().map(|c| c.folder.as_str()).collect();
		assert_eq!(folders, vec!["alps", "mid", "zoo"]);
	}

	#[test]
	fn malformed_folder_is_skipped_without_failing_the_run() {
		let images = vec![
			record("bad/a.jpg", Some(vec![1.0, 0.0]), &[]),
			record("bad/b.jpg", Some(vec![1.0, 0.0, 0.0]), &[]),
			record("good/c.jpg", Some(vec![1.0, 0.0]), &[]),
		];
		let config = EngineConfig { run_id: "test".to_string(), ..EngineConfig::default() };
		let report = cluster_run(&images, &config).unwrap();

		assert_eq!(report.folders_processed, 1);
		assert_eq!(report.folders_skipped, 1);
		assert!(report.warnings.iter().any(|w| w.contains("bad")));
		assert!(report.clusters.iter().all(|c| c.folder == "good"));
	}

	#[test]
	fn invalid_config_fails_before_clustering() {
		let images = vec![record("f/a.jpg", None, &[])];
		let config = EngineConfig {
			run_id: "test".to_string(),
			embedding_threshold: 2.0,
			..EngineConfig::default()
		};
		assert!(cluster_run(&images, &config).is_err());
	}

	#[test]
	fn missing_embeddings_produce_a_warning_not_an_error() {
		let images = vec![
			record("f/a.jpg", None, &[]),
			record("f/b.jpg", Some(vec![1.0, 0.0]), &[]),
		];
		let report = cluster_run(&images, &hybrid_config()).unwrap();

		assert!(report.warnings.iter().any(|w| w.contains("without embeddings")));
		// The untagged, unembedded image still sits in the folder row.
		let folder_row = &report.clusters[0];
		assert_eq!(folder_row.size(), 2);
	}

	#[test]
	fn run_is_deterministic() {
		let mut images = Vec::new();
		for folder in ["a", "b", "c", "d"] {
			for i in 0..6 {
				images.push(record(
					&format!("{folder}/img_{i}.jpg"),
					Some(vec![i as f32 * 0.1 + 0.1, 1.0 - i as f32 * 0.1]),
					&[("thing", 0.5)],
				));
			}
		}

		let first = cluster_run(&images, &hybrid_config()).unwrap();
		let second = cluster_run(&images, &hybrid_config()).unwrap();

		let rows = |r: &RunReport| -> Vec<String> {
			r.clusters
				.iter()
				.map(|c| {
					format!(
						"{}|{}|{}|{}|{:?}",
						c.folder,
						c.cluster_type.as_str(),
						c.label_hint,
						c.medoid_rel_path,
						c.cosine_to_centroid
					)
				})
				.collect()
		};
		assert_eq!(rows(&first), rows(&second));
	}
}
