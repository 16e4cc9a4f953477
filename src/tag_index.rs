// ---------------------------------------------------------------------------
// Tag Index -- sparse tag-weight vectors with an inverted postings index
// ---------------------------------------------------------------------------
//
// Holds one sparse vector per VN (tag id -> weight), an inverted index
// from tag id to every (vn, weight) carrying that tag, and precomputed
// L2 norms. The inverted index lets the similarity engine touch only the
// VNs that share at least one tag with a seed instead of scanning the
// whole catalog.
//
// Duplicate (vn, tag) pairs within one load: last value wins.
// ---------------------------------------------------------------------------

use std::collections::HashMap;

use crate::loader::TagRecord;

#[derive(Debug, Default)]
pub struct TagIndex {
	/// vn id -> (tag id -> weight)
	vectors: HashMap<u32, HashMap<u32, f64>>,
	/// tag id -> [(vn id, weight)]
	postings: HashMap<u32, Vec<(u32, f64)>>,
	/// vn id -> L2 norm of its weight vector
	norms: HashMap<u32, f64>,
}

impl TagIndex {
	pub fn build(records: &[TagRecord]) -> Self {
		let mut vectors: HashMap<u32, HashMap<u32, f64>> = HashMap::new();
		for record in records {
			vectors
				.entry(record.vn_id)
				.or_default()
				.insert(record.tag_id, record.weight);
		}

		let mut postings: HashMap<u32, Vec<(u32, f64)>> = HashMap::new();
		let mut norms: HashMap<u32, f64> = HashMap::new();
		for (&vn_id, vector) in &vectors {
			let mut sum_sq = 0.0;
			for (&tag_id, &weight) in vector {
				sum_sq += weight * weight;
				postings.entry(tag_id).or_default().push((vn_id, weight));
			}
			norms.insert(vn_id, sum_sq.sqrt());
		}

		Self { vectors, postings, norms }
	}

	pub fn vector(&self, vn_id: u32) -> Option<&HashMap<u32, f64>> {
		self.vectors.get(&vn_id)
	}

	/// L2 norm of a VN's tag vector. `0.0` for unknown VNs.
	pub fn norm(&self, vn_id: u32) -> f64 {
		self.norms.get(&vn_id).copied().unwrap_or(0.0)
	}

	/// Every (vn, weight) pair carrying the given tag.
	pub fn postings(&self, tag_id: u32) -> &[(u32, f64)] {
		self.postings.get(&tag_id).map(Vec::as_slice).unwrap_or(&[])
	}

	pub fn vn_count(&self) -> usize {
		self.vectors.len()
	}
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
	use super::*;

	fn record(vn_id: u32, tag_id: u32, weight: f64) -> TagRecord {
		TagRecord { vn_id, tag_id, weight }
	}

	#[test]
	fn vector_and_norm() {
		let index = TagIndex::build(&[record(1, 10, 3.0), record(1, 11, 4.0)]);
		let vector = index.vector(1).unwrap();
		assert_eq!(vector.len(), 2);
		assert_eq!(vector[&10], 3.0);
		assert!((index.norm(1) - 5.0).abs() < 1e-10);
	}

	#[test]
	fn unknown_vn_has_zero_norm_and_no_vector() {
		let index = TagIndex::build(&[record(1, 10, 1.0)]);
		assert!(index.vector(99).is_none());
		assert_eq!(index.norm(99), 0.0);
	}

	#[test]
	fn postings_cover_all_carriers() {
		let index = TagIndex::build(&[
			record(1, 10, 2.0),
			record(2, 10, 3.0),
			record(2, 11, 1.0),
		]);
		let mut carriers: Vec<u32> = index.postings(10).iter().map(|&(vn, _)| vn).collect();
		carriers.sort_unstable();
		assert_eq!(carriers, vec![1, 2]);
		assert_eq!(index.postings(11).len(), 1);
		assert!(index.postings(99).is_empty());
	}

	#[test]
	fn duplicate_pair_last_wins() {
		let index = TagIndex::build(&[record(1, 10, 2.0), record(1, 10, 7.0)]);
		assert_eq!(index.vector(1).unwrap()[&10], 7.0);
		assert_eq!(index.postings(10), &[(1, 7.0)]);
	}

	#[test]
	fn all_zero_vector_has_zero_norm() {
		let index = TagIndex::build(&[record(1, 10, 0.0)]);
		assert_eq!(index.norm(1), 0.0);
	}

	#[test]
	fn vn_count() {
		let index = TagIndex::build(&[record(1, 10, 1.0), record(2, 10, 1.0)]);
		assert_eq!(index.vn_count(), 2);
	}
}
