use backfill::cli::Args;
use clap::Parser;

#[test]
fn positional_arguments_are_parsed() {
  let args = Args::parse_from(["backfill", "2024-10", "1,3", "0.25"]);

  assert_eq!(args.target, "2024-10");
  assert_eq!(args.weekdays.as_deref(), Some("1,3"));
  assert_eq!(args.skip_probability.as_deref(), Some("0.25"));
  assert!(!args.dry_run);
  assert!(!args.verbose);
}

#[test]
fn optional_positionals_can_be_omitted() {
  let args = Args::parse_from(["backfill", "2024"]);

  assert_eq!(args.target, "2024");
  assert!(args.weekdays.is_none());
  assert!(args.skip_probability.is_none());
}

#[test]
fn target_is_required() {
  assert!(Args::try_parse_from(["backfill"]).is_err());
}

#[test]
fn single_letter_option_aliases_are_parsed() {
  let args = Args::parse_from([
    "backfill",
    "-c",
    "backfill.yml",
    "-l",
    "activity.md",
    "-s",
    "42",
    "-d",
    "-v",
    "2024-10-15",
  ]);

  assert_eq!(
    args.config.as_deref().map(|p| p.to_string_lossy().to_string()),
    Some("backfill.yml".to_string())
  );
  assert_eq!(
    args.log_file.as_deref().map(|p| p.to_string_lossy().to_string()),
    Some("activity.md".to_string())
  );
  assert_eq!(args.seed, Some(42));
  assert!(args.dry_run);
  assert!(args.verbose);
  assert_eq!(args.target, "2024-10-15");
}

#[test]
fn negative_probability_reaches_validation() {
  let args = Args::parse_from(["backfill", "2024", "1", "-0.5"]);
  assert_eq!(args.skip_probability.as_deref(), Some("-0.5"));
}

#[test]
fn non_numeric_seed_is_rejected() {
  assert!(Args::try_parse_from(["backfill", "--seed", "abc", "2024"]).is_err());
}
