use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationItem {
	pub id: u32,
	pub title: String,
	pub url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RecommendationSet {
	pub combined_recommendations: Vec<RecommendationItem>,
	pub tag_recommendations: Vec<RecommendationItem>,
	pub user_recommendations: Vec<RecommendationItem>,
}

/// An intermediate ranked candidate before title resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedCandidate {
	pub vn_id: u32,
	pub score: f64,
}

/// Order candidates by score descending, then by ascending VN id so that
/// equal scores always produce the same ordering.
pub fn sort_ranked(candidates: &mut [RankedCandidate]) {
	candidates.sort_by(|a, b| {
		b.score
			.partial_cmp(&a.score)
			.unwrap_or(std::cmp::Ordering::Equal)
			.then_with(|| a.vn_id.cmp(&b.vn_id))
	});
}
