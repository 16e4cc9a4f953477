// ---------------------------------------------------------------------------
// Collaborative Filter Engine -- "users who liked this also liked" ranking
// ---------------------------------------------------------------------------
//
// Gathers every user whose vote on the seed is at or above the positive
// cutoff, then accumulates, per other VN those users voted on, the sum of
// the scores they gave it. The sum equals (mean co-rater score * co-rater
// count), so a candidate rises both with more contributing users and with
// higher scores from them. No minimum-support floor: a single co-rater is
// enough to qualify a candidate.
// ---------------------------------------------------------------------------

use std::collections::HashMap;

use crate::types::{sort_ranked, RankedCandidate};
use crate::vote_index::VoteIndex;

/// Rank VNs co-rated by the seed's positive voters, highest aggregate
/// score first, ties by ascending id, truncated to `top_k`.
///
/// A seed nobody voted on, or whose voters are all below the cutoff,
/// yields an empty result.
pub fn rank_by_covotes(
	index: &VoteIndex,
	seed: u32,
	positive_cutoff: f64,
	top_k: usize,
) -> Vec<RankedCandidate> {
	let voters = match index.voters_of(seed) {
		Some(v) => v,
		None => return Vec::new(),
	};

	let mut sums: HashMap<u32, f64> = HashMap::new();
	for (&user_id, &seed_score) in voters {
		if seed_score < positive_cutoff {
			continue;
		}
		let votes = match index.votes_by_user(user_id) {
			Some(v) => v,
			None => continue,
		};
		for (&vn_id, &score) in votes {
			if vn_id == seed {
				continue;
			}
			*sums.entry(vn_id).or_insert(0.0) += score;
		}
	}

	let mut ranked: Vec<RankedCandidate> = sums
		.into_iter()
		.filter(|&(_, score)| score > 0.0)
		.map(|(vn_id, score)| RankedCandidate { vn_id, score })
		.collect();

	sort_ranked(&mut ranked);
	ranked.truncate(top_k);
	ranked
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
