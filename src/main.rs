//! Curator - medoid clustering engine for photo tag review
//!
//! Clusters each folder of an inventory run three ways (folder, tag,
//! embedding) and writes a CSV report of representative images for the
//! review gallery.

use anyhow::Result;
use clap::{CommandFactory, Parser};
use colored::Colorize;

use curator::cli::{Cli, Command};
use curator::commands::medoids;
use curator::ui;

fn main() -> Result<()> {
	let cli = Cli::parse();

	ui::set_verbose(cli.verbose);

	match cli.command {
		Command::Medoids {
			run_id,
			runs_dir,
			cluster_mode,
			tag_aware,
			cluster_min_size,
			embedding_threshold,
			max_embedding_clusters,
			output,
		} => {
			print_header();
			medoids::run(
				run_id,
				&runs_dir,
				cluster_mode,
				tag_aware,
				cluster_min_size,
				embedding_threshold,
				max_embedding_clusters,
				output,
			)
		}
		Command::Help { subcommand } => {
			let mut cmd = Cli::command();
			if let Some(sub) = subcommand {
				if let Some(sub_cmd) = cmd.find_subcommand_mut(&sub) {
					sub_cmd.print_help()?;
				} else {
					eprintln!("Unknown subcommand: {}", sub);
					cmd.print_help()?;
				}
			} else {
				cmd.print_help()?;
			}
			Ok(())
		}
	}
}

fn print_header() {
	println!();
	println!(
		"{}",
		format!("─── Curator v{} ───", env!("CARGO_PKG_VERSION"))
			.bright_blue()
			.bold()
	);
}
