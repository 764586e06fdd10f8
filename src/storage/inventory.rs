//! Inventory snapshot loading
//!
//! The inventory is an external handoff: the scan/embed/tag stages write
//! one JSON file per run and the engine reads it fully into memory
//! before clustering starts. The engine never computes embeddings or
//! tags itself.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::config::INVENTORY_FILE;
use crate::core::record::{folder_of, Embedding, ImageRecord, TagScore};

/// One entry of the snapshot file as written by the upstream pipeline
#[derive(Debug, Deserialize)]
struct InventoryEntry {
	path: String,
	folder: Option<String>,
	embedding: Option<Vec<f32>>,
	#[serde(default)]
	tags: Vec<TagScore>,
}

/// Path of the snapshot for one run
pub fn inventory_path(runs_dir: &Path, run_id: &str) -> PathBuf {
	runs_dir.join(run_id).join(INVENTORY_FILE)
}

/// Loads and validates the snapshot for `run_id`.
///
/// Paths must be unique within a run; a duplicate means the upstream
/// pipeline produced a corrupt snapshot and the run is refused.
pub fn load_inventory(runs_dir: &Path, run_id: &str) -> Result<Vec<ImageRecord>> {
	let path = inventory_path(runs_dir, run_id);
	let content = fs::read_to_string(&path)
		.with_context(|| format!("Failed to read inventory snapshot at {}", path.display()))?;
	let entries: Vec<InventoryEntry> = serde_json::from_str(&content)
		.with_context(|| format!("Failed to parse inventory snapshot at {}", path.display()))?;

	let mut seen: HashSet<&str> = HashSet::new();
	for entry in &entries {
		if !seen.insert(entry.path.as_str()) {
			bail!("duplicate image path '{}' in inventory snapshot", entry.path);
		}
	}

	let records = entries
		.into_iter()
		.map(|entry| {
			let folder = entry.folder.unwrap_or_else(|| folder_of(&entry.path));
			ImageRecord {
				relative_path: entry.path,
				folder,
				embedding: entry.embedding.map(Embedding::new),
				top_tags: entry.tags,
			}
		})
		.collect();

	Ok(records)
}

/// Most recently modified run directory that holds a snapshot
pub fn latest_run_id(runs_dir: &Path) -> Option<String> {
	let entries = fs::read_dir(runs_dir).ok()?;

	let mut candidates: Vec<(std::time::SystemTime, String)> = Vec::new();
	for entry in entries.filter_map(|e| e.ok()) {
		let path = entry.path();
		if !path.is_dir() || !path.join(INVENTORY_FILE).exists() {
			continue;
		}
		let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
			continue;
		};
		let Ok(modified) = entry.metadata().and_then(|m| m.modified()) else {
			continue;
		};
		candidates.push((modified, name.to_string()));
	}

	candidates.into_iter().max_by_key(|(time, _)| *time).map(|(_, name)| name)
}
