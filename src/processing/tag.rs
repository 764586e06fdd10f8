//! Tag pass: group a folder's images by shared dominant tag

use std::collections::HashMap;

use crate::core::ImageRecord;

/// One surviving tag group
#[derive(Debug)]
pub struct TagGroup<'a> {
	pub tag: String,
	pub members: Vec<&'a ImageRecord>,
}

/// Groups images by dominant tag, dropping groups smaller than
/// `min_cluster_size`. Images with no tags never join a group. Pure
/// function of its inputs; dropped members stay available for the
/// embedding pass.
///
/// Groups come back in first-encountered tag order so downstream row
/// ordering is deterministic.
pub fn cluster_by_tag<'a>(
	images: &[&'a ImageRecord],
	min_cluster_size: usize,
) -> Vec<TagGroup<'a>> {
	let mut order: Vec<String> = Vec::new();
	let mut buckets: HashMap<String, Vec<&'a ImageRecord>> = HashMap::new();

	for image in images {
		let Some(tag) = image.dominant_tag() else {
			continue;
		};
		let bucket = buckets.entry(tag.to_string()).or_insert_with(|| {
			order.push(tag.to_string());
			Vec::new()
		});
		bucket.push(image);
	}

	order
		.into_iter()
		.filter_map(|tag| {
			let members = buckets.remove(&tag)?;
			if members.len() >= min_cluster_size {
				Some(TagGroup { tag, members })
			} else {
				None
			}
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::core::record::{folder_of, TagScore};

	fn record(path: &str, tags: &[(&str, f32)]) -> ImageRecord {
		ImageRecord {
			relative_path: path.to_string(),
			folder: folder_of(path),
			embedding: None,
			top_tags: tags
				.iter()
				.map(|(name, score)| TagScore { name: name.to_string(), score: *score })
				.collect(),
		}
	}

	#[test]
	fn groups_by_dominant_tag() {
		let a = record("a.jpg", &[("skyline", 0.9), ("night", 0.3)]);
		let b = record("b.jpg", &[("skyline", 0.8)]);
		let c = record("c.jpg", &[("beach", 0.7)]);
		let d = record("d.jpg", &[("beach", 0.6)]);

		let groups = cluster_by_tag(&[&a, &b, &c, &d], 2);
		assert_eq!(groups.len(), 2);
		assert_eq!(groups[0].tag, "skyline");
		assert_eq!(groups[0].members.len(), 2);
		assert_eq!(groups[1].tag, "beach");
	}

	#[test]
	fn drops_groups_below_min_size() {
		let a = record("a.jpg", &[("skyline", 0.9)]);
		let b = record("b.jpg", &[("beach", 0.8)]);
		let c = record("c.jpg", &[("beach", 0.7)]);

		let groups = cluster_by_tag(&[&a, &b, &c], 2);
		assert_eq!(groups.len(), 1);
		assert_eq!(groups[0].tag, "beach");
	}

	#[test]
	fn untagged_images_never_join() {
		let a = record("a.jpg", &[]);
		let b = record("b.jpg", &[]);
		let groups = cluster_by_tag(&[&a, &b], 1);
		assert!(groups.is_empty());
	}

	#[test]
	fn membership_follows_dominant_tag_only() {
		// `beach` appears in b's tags but is not dominant there.
		let a = record("a.jpg", &[("beach", 0.9)]);
		let b = record("b.jpg", &[("skyline", 0.9), ("beach", 0.8)]);
		let c = record("c.jpg", &[("beach", 0.7)]);

		let groups = cluster_by_tag(&[&a, &b, &c], 2);
		assert_eq!(groups.len(), 1);
		assert_eq!(groups[0].tag, "beach");
		let paths: Vec<&str> = groups[0].members.iter().map(|m| m.relative_path.as_str()).collect();
		assert_eq!(paths, vec!["a.jpg", "c.jpg"]);
	}

	#[test]
	fn group_order_is_first_encountered() {
		let a = record("a.jpg", &[("zoo", 0.9)]);
		let b = record("b.jpg", &[("art", 0.9)]);
		let c = record("c.jpg", &[("zoo", 0.9)]);
		let d = record("d.jpg", &[("art", 0.9)]);

		let groups = cluster_by_tag(&[&a, &b, &c, &d], 2);
		let tags: Vec<&str> = groups.iter().map(|g| g.tag.as_str()).collect();
		assert_eq!(tags, vec!["zoo", "art"]);
	}
}
