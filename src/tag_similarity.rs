// ---------------------------------------------------------------------------
// Tag Similarity Engine -- seed-driven sparse cosine ranking
// ---------------------------------------------------------------------------
//
// Ranks VNs by cosine similarity between sparse tag-weight vectors:
//
//   sim(a, b) = dot(a, b) / (|a| * |b|)
//
// Dot products are accumulated by walking the seed's non-zero tags through
// the inverted postings index, so only VNs sharing at least one tag with
// the seed are ever touched. VNs sharing no tag have similarity 0 and are
// not candidates. The seed itself is excluded.
// ---------------------------------------------------------------------------

use std::collections::HashMap;

use crate::tag_index::TagIndex;
use crate::types::{sort_ranked, RankedCandidate};

/// Rank all VNs sharing at least one tag with `seed` by cosine similarity,
/// highest first, ties by ascending id, truncated to `top_k`.
///
/// A seed with no tag vector, or with a zero-norm vector, yields an empty
/// result.
pub fn rank_by_tags(index: &TagIndex, seed: u32, top_k: usize) -> Vec<RankedCandidate> {
	let seed_vector = match index.vector(seed) {
		Some(v) => v,
		None => return Vec::new(),
	};
	let seed_norm = index.norm(seed);
	if seed_norm == 0.0 {
		return Vec::new();
	}

	let mut dots: HashMap<u32, f64> = HashMap::new();
	for (&tag_id, &seed_weight) in seed_vector {
		if seed_weight == 0.0 {
			continue;
		}
		for &(vn_id, weight) in index.postings(tag_id) {
			if vn_id == seed {
				continue;
			}
			*dots.entry(vn_id).or_insert(0.0) += seed_weight * weight;
		}
	}

	let mut ranked: Vec<RankedCandidate> = dots
		.into_iter()
		.filter_map(|(vn_id, dot)| {
			if dot <= 0.0 {
				return None;
			}
			let norm = index.norm(vn_id);
			if norm == 0.0 {
				return None;
			}
			Some(RankedCandidate {
				vn_id,
				score: dot / (seed_norm * norm),
			})
		})
		.collect();

	sort_ranked(&mut ranked);
	ranked.truncate(top_k);
	ranked
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
