// ---------------------------------------------------------------------------
// Title Catalog -- vn id to display title lookup
// ---------------------------------------------------------------------------
//
// Built wholesale from the parsed title records of one load. A VN may have
// several language variants; one display title is resolved per VN at build
// time so lookups are a plain map read.
//
// Preference order for variant rows:
//   English title > Japanese latin title > Japanese title >
//   any official latin title > any official title > first variant seen.
// A direct two-column assignment overrides variant resolution entirely;
// the last direct assignment wins.
// ---------------------------------------------------------------------------

use std::collections::HashMap;

use crate::loader::TitleRecord;

#[derive(Debug, Default)]
pub struct TitleCatalog {
	titles: HashMap<u32, String>,
}

impl TitleCatalog {
	/// Build a catalog from one load's records, replacing nothing in place:
	/// the caller swaps the returned value in atomically.
	pub fn build(records: &[TitleRecord]) -> Self {
		let mut variants: HashMap<u32, Vec<&TitleRecord>> = HashMap::new();
		for record in records {
			variants.entry(record.vn_id).or_default().push(record);
		}

		let titles = variants
			.into_iter()
			.map(|(vn_id, variants)| (vn_id, resolve_title(&variants)))
			.collect();
		Self { titles }
	}

	pub fn title(&self, vn_id: u32) -> Option<&str> {
		self.titles.get(&vn_id).map(String::as_str)
	}

	pub fn contains(&self, vn_id: u32) -> bool {
		self.titles.contains_key(&vn_id)
	}

	pub fn len(&self) -> usize {
		self.titles.len()
	}

	pub fn is_empty(&self) -> bool {
		self.titles.is_empty()
	}
}

fn resolve_title(variants: &[&TitleRecord]) -> String {
	// Last direct assignment wins over any variant row.
	if let Some(direct) = variants.iter().rev().find(|v| v.language.is_none()) {
		return direct.title.clone();
	}

	let by_language = |lang: &str| {
		variants
			.iter()
			.find(|v| v.language.as_deref() == Some(lang))
	};

	if let Some(en) = by_language("en") {
		return en.title.clone();
	}
	if let Some(latin) = by_language("ja").and_then(|v| v.latin_title.as_ref()) {
		return latin.clone();
	}
	if let Some(ja) = by_language("ja") {
		return ja.title.clone();
	}
	if let Some(latin) = variants
		.iter()
		.find(|v| v.official && v.latin_title.is_some())
		.and_then(|v| v.latin_title.as_ref())
	{
		return latin.clone();
	}
	if let Some(official) = variants.iter().find(|v| v.official) {
		return official.title.clone();
	}
	variants[0].title.clone()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
	use super::*;

	fn direct(vn_id: u32, title: &str) -> TitleRecord {
		TitleRecord {
			vn_id,
			language: None,
			official: true,
			title: title.to_string(),
			latin_title: None,
		}
	}

	fn variant(
		vn_id: u32,
		language: &str,
		official: bool,
		title: &str,
		latin: Option<&str>,
	) -> TitleRecord {
		TitleRecord {
			vn_id,
			language: Some(language.to_string()),
			official,
			title: title.to_string(),
			latin_title: latin.map(str::to_string),
		}
	}

	#[test]
	fn lookup_and_missing() {
		let catalog = TitleCatalog::build(&[direct(1, "Game A")]);
		assert_eq!(catalog.title(1), Some("Game A"));
		assert_eq!(catalog.title(2), None);
		assert!(catalog.contains(1));
		assert!(!catalog.contains(2));
	}

	#[test]
	fn last_direct_assignment_wins() {
		let catalog = TitleCatalog::build(&[direct(1, "Old"), direct(1, "New")]);
		assert_eq!(catalog.title(1), Some("New"));
	}

	#[test]
	fn english_preferred_over_japanese() {
		let catalog = TitleCatalog::build(&[
			variant(1, "ja", true, "ゲーム", Some("Geemu")),
			variant(1, "en", false, "The Game", None),
		]);
		assert_eq!(catalog.title(1), Some("The Game"));
	}

	#[test]
	fn japanese_latin_preferred_over_japanese() {
		let catalog = TitleCatalog::build(&[variant(1, "ja", true, "ゲーム", Some("Geemu"))]);
		assert_eq!(catalog.title(1), Some("Geemu"));
	}

	#[test]
	fn japanese_title_when_no_latin() {
		let catalog = TitleCatalog::build(&[variant(1, "ja", true, "ゲーム", None)]);
		assert_eq!(catalog.title(1), Some("ゲーム"));
	}

	#[test]
	fn official_fallback_for_other_languages() {
		let catalog = TitleCatalog::build(&[
			variant(1, "de", false, "Unofficial", None),
			variant(1, "fr", true, "Officiel", None),
		]);
		assert_eq!(catalog.title(1), Some("Officiel"));
	}

	#[test]
	fn first_variant_as_last_resort() {
		let catalog = TitleCatalog::build(&[
			variant(1, "de", false, "Erste", None),
			variant(1, "fr", false, "Deuxieme", None),
		]);
		assert_eq!(catalog.title(1), Some("Erste"));
	}

	#[test]
	fn direct_overrides_variants() {
		let catalog = TitleCatalog::build(&[
			variant(1, "en", true, "Variant Title", None),
			direct(1, "Direct Title"),
		]);
		assert_eq!(catalog.title(1), Some("Direct Title"));
	}
}
