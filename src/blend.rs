// ---------------------------------------------------------------------------
// Recommendation Merger -- blend the two source rankings into one list
// ---------------------------------------------------------------------------
//
// Tag-cosine scores live in [0, 1] while vote aggregates are unbounded, so
// each source list is first normalized to [0, 1] by dividing by its own
// maximum score. The combined score is then a fixed weighted sum of the
// normalized scores; a VN present in only one source keeps that source's
// weighted contribution with no penalty for being absent from the other.
// Pure functions, no state.
// ---------------------------------------------------------------------------

use std::collections::HashMap;

use crate::types::{sort_ranked, RankedCandidate};

/// Scale a ranked list so its best candidate scores exactly 1.0. An empty
/// list stays empty; a non-positive maximum zeroes every score.
pub fn normalize_by_max(candidates: &[RankedCandidate]) -> Vec<RankedCandidate> {
	let max = candidates
		.iter()
		.map(|c| c.score)
		.fold(f64::NEG_INFINITY, f64::max);
	candidates
		.iter()
		.map(|c| RankedCandidate {
			vn_id: c.vn_id,
			score: if max > 0.0 { c.score / max } else { 0.0 },
		})
		.collect()
}

/// Merge the two engines' ranked lists into one combined top-`top_k` list.
pub fn blend_ranked(
	tag_ranked: &[RankedCandidate],
	user_ranked: &[RankedCandidate],
	tag_weight: f64,
	vote_weight: f64,
	top_k: usize,
) -> Vec<RankedCandidate> {
	let mut combined: HashMap<u32, f64> = HashMap::new();
	for candidate in normalize_by_max(tag_ranked) {
		*combined.entry(candidate.vn_id).or_insert(0.0) += tag_weight * candidate.score;
	}
	for candidate in normalize_by_max(user_ranked) {
		*combined.entry(candidate.vn_id).or_insert(0.0) += vote_weight * candidate.score;
	}

	let mut ranked: Vec<RankedCandidate> = combined
		.into_iter()
		.map(|(vn_id, score)| RankedCandidate { vn_id, score })
		.collect();
	sort_ranked(&mut ranked);
	ranked.truncate(top_k);
	ranked
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
