use clap::Parser;
use settle_move::cli::Args;
use settle_move::config::types::{Config, LogLevel};
use std::path::PathBuf;
use std::time::Duration;

#[test]
fn parses_bases_and_intervals() {
    let args = Args::parse_from([
        "settle_move",
        "--watch-base",
        "/srv/intake",
        "--landing-base",
        "/srv/landing",
        "--discover-interval",
        "5",
        "--settle-interval",
        "7",
    ]);
    assert_eq!(args.watch_base, Some(PathBuf::from("/srv/intake")));
    assert_eq!(args.landing_base, Some(PathBuf::from("/srv/landing")));
    assert_eq!(args.discover_interval, Some(5));
    assert_eq!(args.settle_interval, Some(7));
}

#[test]
fn effective_log_level_precedence() {
    let args = Args::parse_from(["settle_move", "--debug", "--log-level", "quiet"]);
    let lvl = args.effective_log_level().unwrap();
    assert_eq!(lvl, LogLevel::Debug); // --debug wins

    let args = Args::parse_from(["settle_move", "--log-level", "info"]);
    let lvl = args.effective_log_level().unwrap();
    assert_eq!(lvl, LogLevel::Info);

    let args = Args::parse_from(["settle_move"]);
    assert!(args.effective_log_level().is_none());
}

#[test]
fn apply_overrides_sets_fields() {
    let args = Args::parse_from([
        "settle_move",
        "--watch-base",
        "/wb",
        "--landing-base",
        "/lb",
        "--discover-interval",
        "3",
        "--settle-interval",
        "4",
        "--log-level",
        "info",
        "--log-file",
        "/tmp/sm.log",
    ]);
    let mut cfg = Config::default();
    args.apply_overrides(&mut cfg);
    assert_eq!(cfg.watch_base, PathBuf::from("/wb"));
    assert_eq!(cfg.landing_base, PathBuf::from("/lb"));
    assert_eq!(cfg.discover_interval, Duration::from_secs(3));
    assert_eq!(cfg.settle_interval, Duration::from_secs(4));
    assert_eq!(cfg.log_level, LogLevel::Info);
    assert_eq!(cfg.log_file, Some(PathBuf::from("/tmp/sm.log")));
}

#[test]
fn apply_overrides_is_noop_for_unset_flags() {
    let args = Args::parse_from(["settle_move"]);
    let mut cfg = Config::new("/a", "/b");
    let before = cfg.clone();
    args.apply_overrides(&mut cfg);
    assert_eq!(cfg.watch_base, before.watch_base);
    assert_eq!(cfg.landing_base, before.landing_base);
    assert_eq!(cfg.discover_interval, before.discover_interval);
    assert_eq!(cfg.settle_interval, before.settle_interval);
}

#[test]
fn log_level_parse_aliases() {
    assert_eq!(LogLevel::parse("ERROR"), Some(LogLevel::Quiet));
    assert_eq!(LogLevel::parse("normal"), Some(LogLevel::Normal));
    assert_eq!(LogLevel::parse("verbose"), Some(LogLevel::Info));
    assert_eq!(LogLevel::parse("trace"), Some(LogLevel::Debug));
    assert_eq!(LogLevel::parse("bogus"), None);
}
