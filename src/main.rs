use std::{collections::HashMap, path::Path};

use anyhow::Result;
use backfill::{
  calendar::target_days,
  cli::Args,
  config::{ConfigOverrides, EffectiveConfig, load_file},
  driver::{Driver, nothing_to_do_message},
  git::GitRepository,
  journal::resolve_log_path,
  target::{parse_skip_probability, parse_target, parse_weekdays},
};
use clap::Parser;
use rand::{SeedableRng, rngs::StdRng};

fn main() -> Result<()> {
  let args = match Args::try_parse() {
    Ok(opts) => opts,
    Err(e) => {
      match e.kind() {
        clap::error::ErrorKind::DisplayVersion => {
          println!("{}", env!("CARGO_PKG_VERSION"));
          return Ok(());
        }
        _ => {
          e.exit();
        }
      }
    }
  };

  let file_cfg = load_file(args.config.as_deref())?;

  let overrides = ConfigOverrides {
    log_file: args.log_file.clone(),
    seed: args.seed,
    verbose: args.verbose.then_some(true),
  };

  let config = EffectiveConfig::from_sources(file_cfg, &HashMap::from_iter(std::env::vars()), overrides)?;

  let target = parse_target(&args.target)?;
  let weekdays = parse_weekdays(
    args
      .weekdays
      .as_deref()
      .filter(|raw| !raw.trim().is_empty())
      .or(config.weekdays.as_deref()),
  )?;
  let skip_probability = parse_skip_probability(args.skip_probability.as_deref(), config.skip_probability)?;
  let driver_config = config.driver_config(skip_probability)?;

  if config.verbose {
    eprintln!(
      "Configuration loaded: {} to {}, skip probability {skip_probability}, log file {}.",
      target.range.start,
      target.range.end,
      config.log_file.display()
    );
  }

  let days = target_days(&target.range, &weekdays);
  if days.is_empty() {
    println!("{}", nothing_to_do_message(&target.label));
    return Ok(());
  }

  let mut repo = GitRepository::discover(Path::new("."))?;
  let workdir = repo.workdir()?;
  let log_file = resolve_log_path(&workdir, &config.log_file)?;

  let mut rng = match config.seed {
    Some(seed) => StdRng::seed_from_u64(seed),
    None => StdRng::from_os_rng(),
  };

  Driver::new(&driver_config, &mut repo, &mut rng, &workdir, &log_file)?
    .dry_run(args.dry_run)
    .verbose(config.verbose)
    .run(&target, &weekdays, &days)?;

  Ok(())
}
