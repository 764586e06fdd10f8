//! Medoids command - cluster a run and write the report artifact

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Result};
use colored::*;

use crate::config::{ClusterMode, EngineConfig, ARTIFACT_FILE};
use crate::core::ClusterType;
use crate::processing::cluster_run;
use crate::storage::{inventory, write_report};
use crate::ui;

#[allow(clippy::too_many_arguments)]
pub fn run(
	run_id: Option<String>,
	runs_dir: &Path,
	cluster_mode: ClusterMode,
	tag_aware: bool,
	cluster_min_size: usize,
	embedding_threshold: f32,
	max_embedding_clusters: usize,
	output: Option<PathBuf>,
) -> Result<()> {
	let run_id = match run_id {
		Some(id) => id,
		None => match inventory::latest_run_id(runs_dir) {
			Some(id) => {
				ui::debug(&format!("No run id given, using latest run '{}'", id));
				id
			}
			None => bail!(
				"No runs with an inventory snapshot found under {}. Run the pipeline first.",
				runs_dir.display()
			),
		},
	};

	let config = EngineConfig {
		run_id: run_id.clone(),
		cluster_mode,
		tag_aware,
		cluster_min_size,
		embedding_threshold,
		max_embedding_clusters,
	};
	config.validate()?;

	let start = Instant::now();

	ui::info(&format!("Loading inventory for run {}", run_id.bright_blue()));
	let images = inventory::load_inventory(runs_dir, &run_id)?;

	if images.is_empty() {
		ui::warn("Inventory is empty, nothing to cluster");
		return Ok(());
	}
	ui::success(&format!("Loaded {} images", images.len()));

	if let Some(record) = images.iter().find(|r| r.embedding.is_some()) {
		let dim = record.embedding.as_ref().map(|e| e.dim()).unwrap_or(0);
		ui::debug(&format!("Embedding dimension: {}D", dim));
	}

	let report = cluster_run(&images, &config)?;

	for warning in &report.warnings {
		ui::warn(warning);
	}

	let by_type = |t: ClusterType| report.clusters.iter().filter(|c| c.cluster_type == t).count();
	ui::debug(&format!(
		"Clusters by type: folder={}, tag={}, embedding={}",
		by_type(ClusterType::Folder),
		by_type(ClusterType::Tag),
		by_type(ClusterType::Embedding)
	));

	let artifact_path =
		output.unwrap_or_else(|| runs_dir.join(&run_id).join(ARTIFACT_FILE));
	write_report(&report, &artifact_path)?;

	ui::success(&format!(
		"Wrote {} rows to {}",
		report.medoid_count(),
		artifact_path.display()
	));

	ui::summary(
		report.medoid_count(),
		report.folders_processed,
		report.folders_skipped,
		report.warnings.len(),
		start.elapsed().as_secs_f32(),
	);

	Ok(())
}
