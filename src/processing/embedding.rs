//! Embedding pass: deterministic greedy leader clustering
//!
//! Single-seed clustering is O(n * k) rather than full pairwise, bounded
//! by the cluster cap, and reproducible: no convergence loop, no
//! randomness. The processing order is fixed by sorting candidates on
//! `relative_path` before the pass starts.

use crate::core::ImageRecord;

/// One leader cluster: the seed plus every candidate within threshold
#[derive(Debug)]
pub struct EmbeddingGroup<'a> {
	/// `embedding_<n>`, numbered from 1 in creation order per folder
	pub label_hint: String,
	pub members: Vec<&'a ImageRecord>,
}

/// Clusters candidates by cosine similarity to a seed image.
///
/// Candidates without an embedding are excluded from this pass
/// entirely. While candidates remain and the cluster count is under
/// `max_clusters` (0 = unlimited), the first remaining image in path
/// order seeds a new cluster and absorbs every remaining image whose
/// similarity to the seed is at least `threshold`. Candidates left over
/// when the cap is reached are simply not reported.
pub fn cluster_by_embedding<'a>(
	candidates: &[&'a ImageRecord],
	threshold: f32,
	max_clusters: usize,
) -> Vec<EmbeddingGroup<'a>> {
	let mut pool: Vec<(&'a ImageRecord, &crate::core::Embedding)> = candidates
		.iter()
		.filter_map(|c| c.embedding.as_ref().map(|emb| (*c, emb)))
		.collect();
	pool.sort_by(|(a, _), (b, _)| a.relative_path.cmp(&b.relative_path));

	let mut groups: Vec<EmbeddingGroup<'a>> = Vec::new();

	while !pool.is_empty() {
		if max_clusters != 0 && groups.len() >= max_clusters {
			break;
		}

		let (seed, seed_emb) = pool.remove(0);

		let mut members = vec![seed];
		let mut remaining = Vec::with_capacity(pool.len());
		for (candidate, emb) in pool {
			if emb.similarity(seed_emb) >= threshold {
				members.push(candidate);
			} else {
				remaining.push((candidate, emb));
			}
		}
		pool = remaining;

		groups.push(EmbeddingGroup {
			label_hint: format!("embedding_{}", groups.len() + 1),
			members,
		});
	}

	groups
}
