// ---------------------------------------------------------------------------
// RecommendEngine -- session-scoped facade over the indexes and engines
// ---------------------------------------------------------------------------
//
// Owns the three indexes and drives both ranking engines plus the merger
// for each query. One engine instance per caller session; loads take
// `&mut self`, queries take `&self`, so a query can never observe a
// half-rebuilt index: each load parses into fresh structures and swaps
// them in only on success.
// ---------------------------------------------------------------------------

use std::collections::HashSet;

use crate::blend::blend_ranked;
use crate::collab_filter::rank_by_covotes;
use crate::error::DatasetError;
use crate::loader::{self, LoadReport};
use crate::tag_index::TagIndex;
use crate::tag_similarity::rank_by_tags;
use crate::title_catalog::TitleCatalog;
use crate::types::{RankedCandidate, RecommendationItem, RecommendationSet};
use crate::vote_index::VoteIndex;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Fixed per-instance tuning for loading and ranking.
#[derive(Debug, Clone)]
pub struct EngineConfig {
	/// Result list length for all three lists.
	pub top_k: usize,
	/// Blend weight for the tag-similarity source.
	pub tag_weight: f64,
	/// Blend weight for the collaborative-filter source.
	pub vote_weight: f64,
	/// Signed power applied to tag weights at load time (1.0 = identity).
	pub tag_exponent: f64,
	/// Signed power applied to vote scores at load time (1.0 = identity).
	pub vote_exponent: f64,
	/// Minimum seed vote for a user to count as a positive co-rater.
	pub positive_cutoff: f64,
	/// Field delimiter for all three dumps.
	pub delimiter: char,
	/// Tag ids dropped at load time.
	pub ignored_tags: HashSet<u32>,
}

impl Default for EngineConfig {
	fn default() -> Self {
		Self {
			top_k: 10,
			tag_weight: 1.5,
			vote_weight: 1.0,
			tag_exponent: 1.0,
			vote_exponent: 1.0,
			// Midpoint of the 1-10 vote scale.
			positive_cutoff: 6.0,
			delimiter: '\t',
			ignored_tags: HashSet::new(),
		}
	}
}

// ---------------------------------------------------------------------------
// RecommendEngine
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct RecommendEngine {
	config: EngineConfig,
	catalog: TitleCatalog,
	tags: TagIndex,
	votes: VoteIndex,
}

impl RecommendEngine {
	pub fn new(config: EngineConfig) -> Self {
		Self {
			config,
			catalog: TitleCatalog::default(),
			tags: TagIndex::default(),
			votes: VoteIndex::default(),
		}
	}

	pub fn config(&self) -> &EngineConfig {
		&self.config
	}

	// -- Loading -------------------------------------------------------------

	/// Parse and index a titles dump, replacing the current catalog on
	/// success and leaving it untouched on failure.
	pub fn load_vn_titles_report(&mut self, text: &str) -> Result<LoadReport, DatasetError> {
		let parsed = loader::parse_titles(text, self.config.delimiter)?;
		let report = LoadReport {
			records: parsed.records.len(),
			skipped: parsed.skipped,
		};
		self.catalog = TitleCatalog::build(&parsed.records);
		Ok(report)
	}

	/// Parse and index a tags dump, replacing the current tag index on
	/// success and leaving it untouched on failure.
	pub fn load_tags_report(&mut self, text: &str) -> Result<LoadReport, DatasetError> {
		let parsed = loader::parse_tags(
			text,
			self.config.delimiter,
			self.config.tag_exponent,
			&self.config.ignored_tags,
		)?;
		let report = LoadReport {
			records: parsed.records.len(),
			skipped: parsed.skipped,
		};
		self.tags = TagIndex::build(&parsed.records);
		Ok(report)
	}

	/// Parse and index a votes dump, replacing the current vote index on
	/// success and leaving it untouched on failure.
	pub fn load_votes_report(&mut self, text: &str) -> Result<LoadReport, DatasetError> {
		let parsed =
			loader::parse_votes(text, self.config.delimiter, self.config.vote_exponent)?;
		let report = LoadReport {
			records: parsed.records.len(),
			skipped: parsed.skipped,
		};
		self.votes = VoteIndex::build(&parsed.records);
		Ok(report)
	}

	pub fn load_vn_titles(&mut self, text: &str) -> bool {
		Self::report_to_bool("title", self.load_vn_titles_report(text))
	}

	pub fn load_tags(&mut self, text: &str) -> bool {
		Self::report_to_bool("tag", self.load_tags_report(text))
	}

	pub fn load_votes(&mut self, text: &str) -> bool {
		Self::report_to_bool("vote", self.load_votes_report(text))
	}

	fn report_to_bool(dataset: &str, result: Result<LoadReport, DatasetError>) -> bool {
		match result {
			Ok(report) => {
				if report.skipped > 0 {
					tracing::warn!(
						"{} load: {} records, {} malformed lines skipped",
						dataset,
						report.records,
						report.skipped
					);
				} else {
					tracing::debug!("{} load: {} records", dataset, report.records);
				}
				true
			}
			Err(error) => {
				tracing::warn!("{} load rejected: {}", dataset, error);
				false
			}
		}
	}

	// -- Lookups -------------------------------------------------------------

	/// Display title for a VN, or `None` when the id is not in the catalog.
	pub fn title_of(&self, vn_id: u32) -> Option<&str> {
		self.catalog.title(vn_id)
	}

	/// Display title for a VN; empty string when the id is unknown.
	pub fn get_title(&self, vn_id: u32) -> String {
		self.title_of(vn_id).unwrap_or_default().to_string()
	}

	/// Canonical VNDB page for a VN id.
	pub fn vn_url(vn_id: u32) -> String {
		format!("https://vndb.org/v{vn_id}")
	}

	// -- Recommendations -----------------------------------------------------

	/// Compute all three recommendation lists for a seed VN.
	///
	/// Missing datasets or an unknown seed degrade to empty lists. Ranked
	/// ids without a catalog title are dropped from the returned lists.
	pub fn get_recommendations(&self, vn_id: u32) -> RecommendationSet {
		let tag_ranked = rank_by_tags(&self.tags, vn_id, self.config.top_k);
		let user_ranked = rank_by_covotes(
			&self.votes,
			vn_id,
			self.config.positive_cutoff,
			self.config.top_k,
		);
		let combined = blend_ranked(
			&tag_ranked,
			&user_ranked,
			self.config.tag_weight,
			self.config.vote_weight,
			self.config.top_k,
		);

		RecommendationSet {
			combined_recommendations: self.hydrate(&combined),
			tag_recommendations: self.hydrate(&tag_ranked),
			user_recommendations: self.hydrate(&user_ranked),
		}
	}

	/// Resolve titles and urls, dropping ids absent from the catalog: a
	/// result the caller cannot name is not worth showing.
	fn hydrate(&self, ranked: &[RankedCandidate]) -> Vec<RecommendationItem> {
		ranked
			.iter()
			.filter_map(|candidate| {
				self.catalog.title(candidate.vn_id).map(|title| RecommendationItem {
					id: candidate.vn_id,
					title: title.to_string(),
					url: Self::vn_url(candidate.vn_id),
				})
			})
			.collect()
	}
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
