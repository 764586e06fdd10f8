//! Core domain types for inventory records
//!
//! This module defines the unit of data the engine operates on:
//! - `Embedding`: vector representation for cosine similarity
//! - `TagScore`: one ranked tag candidate
//! - `ImageRecord`: one image from the inventory snapshot

use serde::Deserialize;

/// Embedding vector for cosine-similarity comparison
///
/// Inventory vectors are not guaranteed to be unit length, so similarity
/// is computed with explicit magnitude normalization rather than a plain
/// dot product.
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding(pub Vec<f32>);

impl Embedding {
	pub fn new(data: Vec<f32>) -> Self {
		Self(data)
	}

	pub fn dim(&self) -> usize {
		self.0.len()
	}

	/// Computes cosine similarity with another embedding [-1.0, 1.0]
	///
	/// Returns 0.0 when either vector has zero magnitude.
	pub fn similarity(&self, other: &Self) -> f32 {
		let dot: f32 = self.0.iter().zip(other.0.iter()).map(|(a, b)| a * b).sum();
		let norm = self.magnitude() * other.magnitude();
		if norm > 0.0 {
			dot / norm
		} else {
			0.0
		}
	}

	pub fn magnitude(&self) -> f32 {
		self.0.iter().map(|x| x * x).sum::<f32>().sqrt()
	}

	/// Whether the vector is (approximately) unit length
	pub fn is_normalized(&self) -> bool {
		(self.magnitude() - 1.0).abs() < 1e-3
	}

	/// Returns a unit-length copy, or the original if magnitude is zero
	pub fn normalized(&self) -> Self {
		let norm = self.magnitude();
		if norm > 0.0 {
			Self(self.0.iter().map(|x| x / norm).collect())
		} else {
			self.clone()
		}
	}

	/// True when every component is a finite number
	pub fn is_finite(&self) -> bool {
		self.0.iter().all(|x| x.is_finite())
	}
}

/// One ranked tag candidate for an image
#[derive(Debug, Clone, Deserialize)]
pub struct TagScore {
	pub name: String,
	pub score: f32,
}

/// One image from the inventory snapshot, immutable for the run
#[derive(Debug, Clone)]
pub struct ImageRecord {
	/// Path relative to the scan root, unique within a run
	pub relative_path: String,
	/// Folder the image lives in (`"."` for root-level images)
	pub folder: String,
	/// Embedding vector, absent when the embed stage skipped this image
	pub embedding: Option<Embedding>,
	/// Tag candidates ordered by descending score
	pub top_tags: Vec<TagScore>,
}

impl ImageRecord {
	/// The highest-scoring tag; ties broken by lexicographically
	/// smallest name. `None` when the image has no tag candidates.
	pub fn dominant_tag(&self) -> Option<&str> {
		self.top_tags
			.iter()
			.max_by(|a, b| {
				a.score
					.partial_cmp(&b.score)
					.unwrap_or(std::cmp::Ordering::Equal)
					.then_with(|| b.name.cmp(&a.name))
			})
			.map(|tag| tag.name.as_str())
	}
}

/// Derives the folder for a relative path (`"."` for root-level files)
pub fn folder_of(relative_path: &str) -> String {
	match relative_path.rsplit_once('/') {
		Some((parent, _)) if !parent.is_empty() => parent.to_string(),
		_ => ".".to_string(),
	}
}
