use std::collections::HashSet;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;

use vn_recommender::engine::{EngineConfig, RecommendEngine};
use vn_recommender::error::DatasetError;
use vn_recommender::types::{RecommendationItem, RecommendationSet};

#[derive(Parser)]
#[command(author, version, about)]
struct Args {
	/// Path to the VN titles dump.
	#[arg(long)]
	titles: PathBuf,

	/// Path to the VN tags dump.
	#[arg(long)]
	tags: PathBuf,

	/// Path to the votes dump.
	#[arg(long)]
	votes: PathBuf,

	/// Seed VN id to recommend from.
	#[arg(short, long)]
	vn_id: u32,

	/// Length of each recommendation list.
	#[arg(short, long, default_value_t = 10)]
	limit: usize,

	#[arg(long, default_value_t = 1.5)]
	tag_weight: f64,

	#[arg(long, default_value_t = 1.0)]
	vote_weight: f64,

	/// Exponent applied to tag weights at load time.
	#[arg(long, default_value_t = 2.0)]
	tag_exp: f64,

	/// Exponent applied to vote scores at load time.
	#[arg(long, default_value_t = 1.0)]
	vote_exp: f64,

	/// Minimum seed vote for a user to count as a positive co-rater.
	#[arg(long, default_value_t = 6.0)]
	min_vote: f64,

	/// Tag ids to exclude, comma separated.
	#[arg(long, value_delimiter = ',')]
	ignore_tags: Vec<u32>,

	/// Field delimiter for the dump files.
	#[arg(long, default_value_t = '\t')]
	delimiter: char,

	/// Emit one JSON document instead of text sections.
	#[arg(long, default_value_t = false)]
	json: bool,
}

#[derive(Serialize)]
struct QueryOutput {
	seed: RecommendationItem,
	#[serde(flatten)]
	recommendations: RecommendationSet,
}

fn main() -> ExitCode {
	tracing_subscriber::fmt()
		.with_writer(std::io::stderr)
		.with_env_filter(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
		)
		.init();

	let args = Args::parse();
	if args.vn_id == 0 {
		eprintln!("--vn-id must be a positive VN id");
		return ExitCode::from(2);
	}

	match run(&args) {
		Ok(()) => ExitCode::SUCCESS,
		Err(error) => {
			eprintln!("{error}");
			ExitCode::FAILURE
		}
	}
}

fn run(args: &Args) -> Result<(), DatasetError> {
	let config = EngineConfig {
		top_k: args.limit,
		tag_weight: args.tag_weight,
		vote_weight: args.vote_weight,
		tag_exponent: args.tag_exp,
		vote_exponent: args.vote_exp,
		positive_cutoff: args.min_vote,
		delimiter: args.delimiter,
		ignored_tags: args.ignore_tags.iter().copied().collect::<HashSet<u32>>(),
	};
	let mut engine = RecommendEngine::new(config);

	let titles = engine.load_vn_titles_report(&std::fs::read_to_string(&args.titles)?)?;
	tracing::info!("titles: {} records, {} skipped", titles.records, titles.skipped);
	let tags = engine.load_tags_report(&std::fs::read_to_string(&args.tags)?)?;
	tracing::info!("tags: {} records, {} skipped", tags.records, tags.skipped);
	let votes = engine.load_votes_report(&std::fs::read_to_string(&args.votes)?)?;
	tracing::info!("votes: {} records, {} skipped", votes.records, votes.skipped);

	let recommendations = engine.get_recommendations(args.vn_id);

	if args.json {
		let output = QueryOutput {
			seed: RecommendationItem {
				id: args.vn_id,
				title: engine.get_title(args.vn_id),
				url: RecommendEngine::vn_url(args.vn_id),
			},
			recommendations,
		};
		let json = serde_json::to_string_pretty(&output)
			.map_err(|e| DatasetError::Io(std::io::Error::other(e)))?;
		println!("{json}");
	} else {
		print_text(args.vn_id, &engine, &recommendations);
	}
	Ok(())
}

fn print_text(seed: u32, engine: &RecommendEngine, set: &RecommendationSet) {
	let seed_title = engine.get_title(seed);
	if seed_title.is_empty() {
		println!("Recommendations for v{seed}");
	} else {
		println!("Recommendations for v{seed}: {seed_title}");
	}
	print_section("Tag recommendations", &set.tag_recommendations);
	print_section("Vote recommendations", &set.user_recommendations);
	print_section("Combined recommendations", &set.combined_recommendations);
}

fn print_section(heading: &str, items: &[RecommendationItem]) {
	println!("--------------------------------------------------");
	println!("{heading}:");
	if items.is_empty() {
		println!("(none)");
		return;
	}
	for (position, item) in items.iter().enumerate() {
		println!("{}. {} ({})", position + 1, item.title, item.url);
	}
}
