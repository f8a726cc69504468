use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about, allow_negative_numbers = true)]
pub struct Args {
  /// Target period: YYYY, YYYY-MM (also YYYY/MM or YYYY.MM) or YYYY-MM-DD.
  pub target: String,

  /// Weekdays to fill, as digits 1 (Monday) to 7 (Sunday) separated by commas
  /// or spaces. Defaults to Monday to Friday.
  pub weekdays: Option<String>,

  /// Probability in [0, 1] of skipping a matching day entirely.
  pub skip_probability: Option<String>,

  /// Optional explicit config file path.
  #[arg(long, short = 'c')]
  pub config: Option<PathBuf>,

  /// Log file to append entries to, relative to the repository root.
  #[arg(long, short = 'l', value_name = "PATH")]
  pub log_file: Option<PathBuf>,

  /// Seed the random generator for a reproducible plan.
  #[arg(long, short = 's')]
  pub seed: Option<u64>,

  /// Print the planned commits without writing files or committing.
  #[arg(long, short = 'd')]
  pub dry_run: bool,

  /// Enable verbose output.
  #[arg(long, short)]
  pub verbose: bool,
}
