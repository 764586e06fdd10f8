//! Medoid selection: the member closest to its cluster's centroid

use crate::core::record::{Embedding, ImageRecord};

/// Outcome of resolving one cluster to its representative member
#[derive(Debug, Clone, PartialEq)]
pub struct MedoidResolution {
	pub medoid_rel_path: String,
	/// `None` when no member carried an embedding
	pub cosine_to_centroid: Option<f32>,
}

/// Picks the representative member of a cluster.
///
/// The centroid is the element-wise mean of all present member
/// embeddings, re-normalized to unit length when the members are unit
/// vectors. The medoid is the member with maximum cosine similarity to
/// the centroid; ties break on lexicographically smallest
/// `relative_path`. When no member has an embedding, the first path in
/// lexicographic order is chosen and the similarity is undefined.
///
/// Panics if `members` is empty; callers never build empty clusters.
pub fn resolve_medoid(members: &[&ImageRecord]) -> MedoidResolution {
	assert!(!members.is_empty(), "cluster must have at least one member");

	// Single-member clusters are self-similar by definition.
	if members.len() == 1 {
		return MedoidResolution {
			medoid_rel_path: members[0].relative_path.clone(),
			cosine_to_centroid: members[0].embedding.as_ref().map(|_| 1.0),
		};
	}

	let embedded: Vec<(&ImageRecord, &Embedding)> = members
		.iter()
		.filter_map(|m| m.embedding.as_ref().map(|emb| (*m, emb)))
		.collect();

	let Some(centroid) = compute_centroid(&embedded) else {
		// No embeddings anywhere in the cluster: deterministic fallback.
		let first = members
			.iter()
			.min_by(|a, b| a.relative_path.cmp(&b.relative_path))
			.copied()
			.unwrap_or(members[0]);
		return MedoidResolution {
			medoid_rel_path: first.relative_path.clone(),
			cosine_to_centroid: None,
		};
	};

	let mut best: Option<(&ImageRecord, f32)> = None;
	for (member, emb) in &embedded {
		let sim = emb.similarity(&centroid);
		let better = match best {
			None => true,
			Some((current, best_sim)) => {
				sim > best_sim
					|| (sim == best_sim && member.relative_path < current.relative_path)
			}
		};
		if better {
			best = Some((member, sim));
		}
	}

	// `embedded` is non-empty whenever a centroid exists.
	let (medoid, sim) = best.expect("centroid implies at least one embedded member");
	MedoidResolution {
		medoid_rel_path: medoid.relative_path.clone(),
		cosine_to_centroid: Some(sim),
	}
}

/// Element-wise mean of present member embeddings, unit-normalized when
/// the members themselves are unit vectors. `None` when no member has
/// an embedding.
fn compute_centroid(embedded: &[(&ImageRecord, &Embedding)]) -> Option<Embedding> {
	let (_, first) = embedded.first()?;
	let dim = first.dim();
	let mut sum = vec![0.0f32; dim];
	let mut all_normalized = true;

	for (_, emb) in embedded {
		for (acc, value) in sum.iter_mut().zip(emb.0.iter()) {
			*acc += value;
		}
		all_normalized &= emb.is_normalized();
	}

	let n = embedded.len() as f32;
	for value in &mut sum {
		*value /= n;
	}

	let centroid = Embedding::new(sum);
	if all_normalized {
		Some(centroid.normalized())
	} else {
		Some(centroid)
	}
}
