use clap::{builder::Styles, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use crate::config::{
	ClusterMode, DEFAULT_CLUSTER_MIN_SIZE, DEFAULT_EMBEDDING_THRESHOLD,
	DEFAULT_MAX_EMBEDDING_CLUSTERS, RUNS_DIR,
};

fn parse_threshold(s: &str) -> Result<f32, String> {
	let val: f32 = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
	if !(0.0..=1.0).contains(&val) {
		Err(format!("threshold must be between 0.0 and 1.0, got {}", val))
	} else {
		Ok(val)
	}
}

fn styles() -> Styles {
	Styles::styled()
		.header(anstyle::Style::new().bold().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Blue))))
		.usage(anstyle::Style::new().bold().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Blue))))
		.literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Blue))))
		.placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))))
		.valid(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Blue))))
		.invalid(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))))
}

#[derive(Parser, Debug)]
#[command(
	name = "curator",
	author,
	version,
	about = "Medoid clustering engine for photo tag review",
	styles = styles(),
	disable_help_subcommand = true,
	after_help = format!(
		"{title}
  {curator} {medoids}                          {latest_desc}
  {curator} {medoids} {run_args}       {run_desc}
  {curator} {medoids} {hybrid_args}   {hybrid_desc}",
		title = "Examples:".bright_blue().bold(),
		curator = "curator".bright_blue(),
		medoids = "medoids".yellow(),
		latest_desc = "Cluster the latest run".dimmed(),
		run_args = "--run-id 2026-08-20",
		run_desc = "Cluster a specific run".dimmed(),
		hybrid_args = "--tag-aware --cluster-mode hybrid",
		hybrid_desc = "Folder + tag + embedding passes".dimmed(),
	),
)]
pub struct Cli {
	/// Enable verbose debug output
	#[arg(short = 'v', long = "verbose", global = true)]
	pub verbose: bool,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// Select representative images per folder and write the report
	Medoids {
		/// Run to cluster (default: most recent run with an inventory)
		#[arg(long = "run-id")]
		run_id: Option<String>,

		/// Directory holding run snapshots
		#[arg(long = "runs-dir", default_value = RUNS_DIR)]
		runs_dir: PathBuf,

		/// Clustering strategy: simple (folder + optional tags) or hybrid
		/// (adds embedding clusters over leftovers)
		#[arg(long = "cluster-mode", value_enum, default_value = "simple")]
		cluster_mode: ClusterMode,

		/// Group images by shared dominant tag
		#[arg(long = "tag-aware")]
		tag_aware: bool,

		/// Minimum images per surviving tag cluster
		#[arg(long = "cluster-min-size", default_value_t = DEFAULT_CLUSTER_MIN_SIZE)]
		cluster_min_size: usize,

		/// Cosine similarity floor for joining an embedding cluster (0.0-1.0)
		#[arg(long = "embedding-threshold", default_value_t = DEFAULT_EMBEDDING_THRESHOLD, value_parser = parse_threshold)]
		embedding_threshold: f32,

		/// Maximum embedding clusters per folder (0 = unlimited)
		#[arg(long = "max-embedding-clusters", default_value_t = DEFAULT_MAX_EMBEDDING_CLUSTERS)]
		max_embedding_clusters: usize,

		/// Report path (default: <runs-dir>/<run-id>/medoids.csv)
		#[arg(short = 'o', long = "output")]
		output: Option<PathBuf>,
	},

	/// Show help for a subcommand
	Help {
		/// Subcommand name
		subcommand: Option<String>,
	},
}
