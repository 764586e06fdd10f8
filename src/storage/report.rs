//! Report artifact writer
//!
//! One CSV row per cluster, in the canonical order the orchestrator
//! already guarantees. The write is atomic: the full content is
//! materialized, written to a temp file in the destination directory,
//! and renamed over the artifact path in one step. An interrupted run
//! never leaves a partial artifact behind, and a failed write leaves
//! any previous artifact untouched.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tempfile::NamedTempFile;

use crate::core::RunReport;

pub const HEADER: &str =
	"folder,cluster_type,cluster_tag,label_hint,cluster_size,medoid_rel_path,cosine_to_centroid";

/// Serializes the report and atomically replaces the artifact at `path`.
pub fn write_report(report: &RunReport, path: &Path) -> Result<()> {
	let content = render_csv(report);

	let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
	if let Some(dir) = dir {
		fs::create_dir_all(dir)
			.with_context(|| format!("Failed to create report directory {}", dir.display()))?;
	}

	// Temp file in the destination directory so the final rename never
	// crosses a filesystem boundary.
	let mut tmp = match dir {
		Some(dir) => NamedTempFile::new_in(dir),
		None => NamedTempFile::new(),
	}
	.context("Failed to create temporary report file")?;

	tmp.write_all(content.as_bytes())
		.context("Failed to write report content")?;
	tmp.persist(path)
		.with_context(|| format!("Failed to replace report at {}", path.display()))?;

	Ok(())
}

fn render_csv(report: &RunReport) -> String {
	let mut out = String::with_capacity(64 * (report.clusters.len() + 1));
	out.push_str(HEADER);
	out.push('\n');

	for cluster in &report.clusters {
		let cosine = match cluster.cosine_to_centroid {
			Some(value) => format!("{:.6}", value),
			None => String::new(),
		};
		let fields = [
			escape_field(&cluster.folder),
			escape_field(cluster.cluster_type.as_str()),
			escape_field(&cluster.cluster_tag),
			escape_field(&cluster.label_hint),
			cluster.size().to_string(),
			escape_field(&cluster.medoid_rel_path),
			cosine,
		];
		out.push_str(&fields.join(","));
		out.push('\n');
	}

	out
}

/// Quotes a field when it contains a comma, quote, or newline
fn escape_field(field: &str) -> String {
	if field.contains(',') || field.contains('"') || field.contains('\n') {
		format!("\"{}\"", field.replace('"', "\"\""))
	} else {
		field.to_string()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::core::{ClusterType, ResolvedCluster};

	fn cluster(folder: &str, cluster_type: ClusterType, cosine: Option<f32>) -> ResolvedCluster {
		ResolvedCluster {
			folder: folder.to_string(),
			cluster_type,
			cluster_tag: String::new(),
			label_hint: String::new(),
			member_paths: vec![format!("{folder}/a.jpg")],
			medoid_rel_path: format!("{folder}/a.jpg"),
			cosine_to_centroid: cosine,
		}
	}

	#[test]
	fn renders_header_and_six_decimal_cosine() {
		let report = RunReport {
			clusters: vec![cluster("trip", ClusterType::Folder, Some(0.987654321))],
			..RunReport::default()
		};
		let csv = render_csv(&report);
		let lines: Vec<&str> = csv.lines().collect();
		assert_eq!(lines[0], HEADER);
		assert_eq!(lines[1], "trip,folder,,,1,trip/a.jpg,0.987654");
	}

	#[test]
	fn undefined_cosine_renders_empty() {
		let report = RunReport {
			clusters: vec![cluster("trip", ClusterType::Folder, None)],
			..RunReport::default()
		};
		let csv = render_csv(&report);
		assert!(csv.lines().nth(1).unwrap().ends_with("trip/a.jpg,"));
	}

	#[test]
	fn fields_with_commas_are_quoted() {
		let mut c = cluster("trip", ClusterType::Tag, Some(1.0));
		c.cluster_tag = "night, city".to_string();
		c.label_hint = "night, city".to_string();
		let report = RunReport { clusters: vec![c], ..RunReport::default() };
		let csv = render_csv(&report);
		assert!(csv.contains("\"night, city\""));
	}

	#[test]
	fn write_is_atomic_and_replaces_previous_artifact() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("medoids.csv");
		fs::write(&path, "stale").unwrap();

		let report = RunReport {
			clusters: vec![cluster("trip", ClusterType::Folder, Some(1.0))],
			..RunReport::default()
		};
		write_report(&report, &path).unwrap();

		let content = fs::read_to_string(&path).unwrap();
		assert!(content.starts_with(HEADER));
		assert!(!content.contains("stale"));

		// No leftover temp files next to the artifact.
		let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
		assert_eq!(entries.len(), 1);
	}

	#[test]
	fn creates_missing_run_directory() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("runs").join("run-9").join("medoids.csv");
		let report = RunReport::default();
		write_report(&report, &path).unwrap();
		assert!(path.exists());
	}
}
