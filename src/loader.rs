// ---------------------------------------------------------------------------
// Dataset Loader -- line-oriented parsers for the three VNDB dump files
// ---------------------------------------------------------------------------
//
// Parses the raw titles, tags and votes dumps into typed records. Parsing
// is per line: malformed lines (wrong field count, non-numeric id, bad
// weight) are skipped and counted rather than failing the whole load. A
// dump from which no record at all can be extracted is rejected with
// `DatasetError::Empty` so callers can keep their previous state.
//
// Schema (v1), split on a configurable delimiter (default TAB):
//
//   titles  vn_id <SEP> title
//           vn_id <SEP> language <SEP> official(t/f) <SEP> title <SEP> latin
//   tags    vn_id <SEP> tag_id <SEP> weight
//           row_id <SEP> tag_id <SEP> vn_id <SEP> user_id <SEP> weight [...]
//   votes   vn_id <SEP> user_id <SEP> score [...]
//
// Ids may carry a single type prefix letter (v17, g23, u101). `\N` marks
// an absent optional field. Trailing columns beyond the documented ones
// are ignored. The public votes dump is space-aligned rather than
// TAB-separated, so a line that splits into too few fields on the
// delimiter is re-split on arbitrary whitespace before being rejected.
// ---------------------------------------------------------------------------

use std::collections::HashSet;

use crate::error::DatasetError;

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One title row. `language == None` marks a direct two-column assignment
/// that bypasses language preference when the catalog is built.
#[derive(Debug, Clone, PartialEq)]
pub struct TitleRecord {
	pub vn_id: u32,
	pub language: Option<String>,
	pub official: bool,
	pub title: String,
	pub latin_title: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TagRecord {
	pub vn_id: u32,
	pub tag_id: u32,
	pub weight: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoteRecord {
	pub user_id: u32,
	pub vn_id: u32,
	pub score: f64,
}

/// A successfully parsed dump: the extracted records plus the number of
/// lines that had to be skipped.
#[derive(Debug, Clone)]
pub struct Parsed<T> {
	pub records: Vec<T>,
	pub skipped: usize,
}

/// Per-load diagnostics surfaced by the engine's `load_*_report` methods.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadReport {
	pub records: usize,
	pub skipped: usize,
}

// ---------------------------------------------------------------------------
// Field helpers
// ---------------------------------------------------------------------------

/// Split a line on `delimiter`, falling back to whitespace splitting when
/// that yields fewer than `min_fields` fields.
fn split_fields(line: &str, delimiter: char, min_fields: usize) -> Vec<&str> {
	let fields: Vec<&str> = line.split(delimiter).collect();
	if fields.len() >= min_fields {
		return fields;
	}
	line.split_whitespace().collect()
}

/// Parse a positive integer id, tolerating a single leading type prefix
/// letter (`v17` -> 17).
fn parse_id(field: &str) -> Option<u32> {
	let trimmed = field.trim();
	let digits = trimmed
		.strip_prefix(|c: char| c.is_ascii_alphabetic())
		.unwrap_or(trimmed);
	match digits.parse::<u32>() {
		Ok(id) if id > 0 => Some(id),
		_ => None,
	}
}

fn parse_score(field: &str) -> Option<f64> {
	match field.trim().parse::<f64>() {
		Ok(value) if value.is_finite() => Some(value),
		_ => None,
	}
}

/// Signed power transform used to sharpen or flatten raw weights.
/// `exponent == 1.0` is the identity.
fn shape(value: f64, exponent: f64) -> f64 {
	if exponent == 1.0 {
		value
	} else {
		value.signum() * value.abs().powf(exponent)
	}
}

fn optional_field(field: &str) -> Option<String> {
	let trimmed = field.trim();
	if trimmed.is_empty() || trimmed == "\\N" {
		None
	} else {
		Some(trimmed.to_string())
	}
}

// ---------------------------------------------------------------------------
// Titles
// ---------------------------------------------------------------------------

/// Parse a titles dump.
///
/// Accepts two-column `vn_id, title` rows and five-plus-column VNDB
/// `vn_id, language, official, title, latin_title` rows. Three- and
/// four-column lines are ambiguous and rejected.
pub fn parse_titles(text: &str, delimiter: char) -> Result<Parsed<TitleRecord>, DatasetError> {
	let mut records = Vec::new();
	let mut skipped = 0usize;

	for line in text.lines() {
		if line.trim().is_empty() {
			continue;
		}
		let fields = split_fields(line, delimiter, 2);

		let record = match fields.len() {
			2 => parse_direct_title(&fields),
			n if n >= 5 => parse_title_variant(&fields),
			_ => None,
		};

		match record {
			Some(record) => records.push(record),
			None => skipped += 1,
		}
	}

	if records.is_empty() {
		return Err(DatasetError::Empty("title"));
	}
	Ok(Parsed { records, skipped })
}

fn parse_direct_title(fields: &[&str]) -> Option<TitleRecord> {
	let vn_id = parse_id(fields[0])?;
	let title = fields[1].trim();
	if title.is_empty() {
		return None;
	}
	Some(TitleRecord {
		vn_id,
		language: None,
		official: true,
		title: title.to_string(),
		latin_title: None,
	})
}

fn parse_title_variant(fields: &[&str]) -> Option<TitleRecord> {
	let vn_id = parse_id(fields[0])?;
	let title = fields[3].trim();
	if title.is_empty() {
		return None;
	}
	Some(TitleRecord {
		vn_id,
		language: Some(fields[1].trim().to_lowercase()),
		official: fields[2].trim() == "t",
		title: title.to_string(),
		latin_title: optional_field(fields[4]),
	})
}

// ---------------------------------------------------------------------------
// Tags
// ---------------------------------------------------------------------------

/// Parse a tag-weight dump.
///
/// Accepts three-column `vn_id, tag_id, weight` rows and five-plus-column
/// VNDB `tags_vn` rows (`row_id, tag_id, vn_id, user_id, weight, ...`).
/// Negative weights are malformed. Records whose tag id is listed in
/// `ignored_tags` are dropped without counting as malformed. Weights pass
/// through the signed power transform with `tag_exponent`.
pub fn parse_tags(
	text: &str,
	delimiter: char,
	tag_exponent: f64,
	ignored_tags: &HashSet<u32>,
) -> Result<Parsed<TagRecord>, DatasetError> {
	let mut records = Vec::new();
	let mut skipped = 0usize;

	for line in text.lines() {
		if line.trim().is_empty() {
			continue;
		}
		let fields = split_fields(line, delimiter, 3);

		let parsed = match fields.len() {
			3 => parse_id(fields[0])
				.zip(parse_id(fields[1]))
				.zip(parse_score(fields[2]))
				.map(|((vn_id, tag_id), weight)| (vn_id, tag_id, weight)),
			n if n >= 5 => parse_id(fields[2])
				.zip(parse_id(fields[1]))
				.zip(parse_score(fields[4]))
				.map(|((vn_id, tag_id), weight)| (vn_id, tag_id, weight)),
			_ => None,
		};

		match parsed {
			Some((_, _, weight)) if weight < 0.0 => skipped += 1,
			Some((_, tag_id, _)) if ignored_tags.contains(&tag_id) => {}
			Some((vn_id, tag_id, weight)) => records.push(TagRecord {
				vn_id,
				tag_id,
				weight: shape(weight, tag_exponent),
			}),
			None => skipped += 1,
		}
	}

	if records.is_empty() {
		return Err(DatasetError::Empty("tag"));
	}
	Ok(Parsed { records, skipped })
}

// ---------------------------------------------------------------------------
// Votes
// ---------------------------------------------------------------------------

/// Parse a votes dump: `vn_id, user_id, score` with any trailing columns
/// (such as the vote date) ignored. Scores pass through the signed power
/// transform with `vote_exponent`.
pub fn parse_votes(
	text: &str,
	delimiter: char,
	vote_exponent: f64,
) -> Result<Parsed<VoteRecord>, DatasetError> {
	let mut records = Vec::new();
	let mut skipped = 0usize;

	for line in text.lines() {
		if line.trim().is_empty() {
			continue;
		}
		let fields = split_fields(line, delimiter, 3);

		let parsed = if fields.len() >= 3 {
			parse_id(fields[0])
				.zip(parse_id(fields[1]))
				.zip(parse_score(fields[2]))
		} else {
			None
		};

		match parsed {
			Some(((vn_id, user_id), score)) => records.push(VoteRecord {
				user_id,
				vn_id,
				score: shape(score, vote_exponent),
			}),
			None => skipped += 1,
		}
	}

	if records.is_empty() {
		return Err(DatasetError::Empty("vote"));
	}
	Ok(Parsed { records, skipped })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
	use super::*;

	fn no_ignored() -> HashSet<u32> {
		HashSet::new()
	}

	// -- titles ---------------------------------------------------------------

	#[test]
	fn titles_two_column() {
		let parsed = parse_titles("1\tGame A\n2\tGame B\n", '\t').unwrap();
		assert_eq!(parsed.records.len(), 2);
		assert_eq!(parsed.skipped, 0);
		assert_eq!(parsed.records[0].vn_id, 1);
		assert_eq!(parsed.records[0].title, "Game A");
		assert!(parsed.records[0].language.is_none());
	}

	#[test]
	fn titles_vndb_layout() {
		let text = "v17\tja\tt\tEver17\tEver Seventeen\nv17\ten\tf\tEver17 EN\t\\N\n";
		let parsed = parse_titles(text, '\t').unwrap();
		assert_eq!(parsed.records.len(), 2);
		let ja = &parsed.records[0];
		assert_eq!(ja.vn_id, 17);
		assert_eq!(ja.language.as_deref(), Some("ja"));
		assert!(ja.official);
		assert_eq!(ja.latin_title.as_deref(), Some("Ever Seventeen"));
		let en = &parsed.records[1];
		assert!(!en.official);
		assert!(en.latin_title.is_none());
	}

	#[test]
	fn titles_malformed_lines_skipped() {
		let text = "1\tGame A\nnot-a-number\tX\n2\t\n3\ta\tb\n4\tGame D\n";
		let parsed = parse_titles(text, '\t').unwrap();
		assert_eq!(parsed.records.len(), 2);
		assert_eq!(parsed.skipped, 3);
	}

	#[test]
	fn titles_all_malformed_fails() {
		let err = parse_titles("garbage\nx\ty\tz\n", '\t').unwrap_err();
		assert!(matches!(err, DatasetError::Empty("title")));
	}

	#[test]
	fn titles_empty_input_fails() {
		assert!(parse_titles("", '\t').is_err());
		assert!(parse_titles("\n\n", '\t').is_err());
	}

	#[test]
	fn titles_comma_delimiter() {
		let parsed = parse_titles("1,Game A\n", ',').unwrap();
		assert_eq!(parsed.records[0].title, "Game A");
	}

	#[test]
	fn titles_zero_id_rejected() {
		let text = "0\tZero\n1\tOne\n";
		let parsed = parse_titles(text, '\t').unwrap();
		assert_eq!(parsed.records.len(), 1);
		assert_eq!(parsed.skipped, 1);
	}

	// -- tags -----------------------------------------------------------------

	#[test]
	fn tags_three_column() {
		let parsed = parse_tags("10\t7\t2.5\n", '\t', 1.0, &no_ignored()).unwrap();
		assert_eq!(
			parsed.records[0],
			TagRecord { vn_id: 10, tag_id: 7, weight: 2.5 }
		);
	}

	#[test]
	fn tags_vndb_layout() {
		// row_id, tag_id, vn_id, user_id, weight, spoiler...
		let parsed =
			parse_tags("1\tg23\tv10\tu5\t2.0\t0\n", '\t', 1.0, &no_ignored()).unwrap();
		assert_eq!(
			parsed.records[0],
			TagRecord { vn_id: 10, tag_id: 23, weight: 2.0 }
		);
	}

	#[test]
	fn tags_negative_weight_is_malformed() {
		let text = "10\t7\t-1.5\n10\t8\t2.0\n";
		let parsed = parse_tags(text, '\t', 1.0, &no_ignored()).unwrap();
		assert_eq!(parsed.records.len(), 1);
		assert_eq!(parsed.skipped, 1);
	}

	#[test]
	fn tags_ignored_tag_dropped_silently() {
		let ignored: HashSet<u32> = [7].into_iter().collect();
		let parsed = parse_tags("10\t7\t2.0\n10\t8\t1.0\n", '\t', 1.0, &ignored).unwrap();
		assert_eq!(parsed.records.len(), 1);
		assert_eq!(parsed.records[0].tag_id, 8);
		assert_eq!(parsed.skipped, 0);
	}

	#[test]
	fn tags_exponent_shapes_weight() {
		let parsed = parse_tags("10\t7\t3.0\n", '\t', 2.0, &no_ignored()).unwrap();
		assert!((parsed.records[0].weight - 9.0).abs() < 1e-10);
	}

	#[test]
	fn tags_four_column_line_rejected() {
		let text = "10\t7\t2.0\t9\n10\t8\t1.0\n";
		let parsed = parse_tags(text, '\t', 1.0, &no_ignored()).unwrap();
		assert_eq!(parsed.records.len(), 1);
		assert_eq!(parsed.skipped, 1);
	}

	#[test]
	fn tags_all_malformed_fails() {
		assert!(parse_tags("x\ty\tz\n", '\t', 1.0, &no_ignored()).is_err());
	}

	// -- votes ----------------------------------------------------------------

	#[test]
	fn votes_basic() {
		let parsed = parse_votes("10\t101\t9\n", '\t', 1.0).unwrap();
		assert_eq!(
			parsed.records[0],
			VoteRecord { user_id: 101, vn_id: 10, score: 9.0 }
		);
	}

	#[test]
	fn votes_whitespace_fallback() {
		// The public dump is space-aligned: vn_id user_id score date
		let parsed = parse_votes("v10 u101 9 2020-01-01\n", '\t', 1.0).unwrap();
		assert_eq!(parsed.records[0].vn_id, 10);
		assert_eq!(parsed.records[0].user_id, 101);
		assert_eq!(parsed.records[0].score, 9.0);
	}

	#[test]
	fn votes_trailing_columns_ignored() {
		let parsed = parse_votes("10\t101\t8\t2020-05-05\textra\n", '\t', 1.0).unwrap();
		assert_eq!(parsed.records[0].score, 8.0);
	}

	#[test]
	fn votes_malformed_score_skipped() {
		let text = "10\t101\tnine\n10\t102\t7\n";
		let parsed = parse_votes(text, '\t', 1.0).unwrap();
		assert_eq!(parsed.records.len(), 1);
		assert_eq!(parsed.skipped, 1);
	}

	#[test]
	fn votes_all_malformed_fails() {
		let err = parse_votes("bad line\nworse\n", '\t', 1.0).unwrap_err();
		assert!(matches!(err, DatasetError::Empty("vote")));
	}

	// -- helpers --------------------------------------------------------------

	#[test]
	fn parse_id_strips_prefix() {
		assert_eq!(parse_id("v17"), Some(17));
		assert_eq!(parse_id("g5"), Some(5));
		assert_eq!(parse_id("17"), Some(17));
		assert_eq!(parse_id("vv17"), None);
		assert_eq!(parse_id("0"), None);
		assert_eq!(parse_id("-3"), None);
	}

	#[test]
	fn shape_identity_and_square() {
		assert_eq!(shape(3.0, 1.0), 3.0);
		assert!((shape(3.0, 2.0) - 9.0).abs() < 1e-10);
		assert!((shape(-3.0, 2.0) + 9.0).abs() < 1e-10);
	}
}
