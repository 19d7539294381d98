//! Application orchestrator.
//! Loads/merges config, initializes logging, installs signal handlers,
//! validates paths, spawns the watch pipeline, and runs the relocation loop
//! until interrupted.

use anyhow::Result;
use settle_move::output as out;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use settle_move::cli::Args;
use settle_move::config::{
    LoadResult, default_config_path, load_config_from_xml, load_or_init, validate_and_normalize,
};
use settle_move::{
    Config, Outcome, OutcomeSink, Pipeline, SettleOutcome, TracingSink, relocate_file, shutdown,
};

use crate::logging::init_tracing;

/// Run the CLI application. Does not return under normal operation; the
/// relocation loop ends only on a shutdown request.
pub fn run(args: Args) -> Result<()> {
    // Handle --print-config before logging init
    if args.print_config {
        if let Ok(cfg_env) = std::env::var("SETTLE_MOVE_CONFIG") {
            out::print_info(&format!(
                "Using SETTLE_MOVE_CONFIG (explicit):\n  {}\n",
                cfg_env
            ));
            out::print_info("To override, unset SETTLE_MOVE_CONFIG or set it to another file.");
            return Ok(());
        }
        match default_config_path() {
            Ok(p) => {
                out::print_info(&format!(
                    "Default settle_move config path:\n  {}\n",
                    p.display()
                ));
                if p.exists() {
                    out::print_info("A config file already exists at that location.");
                } else {
                    out::print_info(
                        "No config file exists there yet. Run without --print-config to create a template.",
                    );
                }
            }
            Err(e) => {
                out::print_error(&format!("Could not determine a default config path: {e}"));
            }
        }
        return Ok(());
    }

    // Create a template config if none exists (before logging init). Only
    // stop for guidance when the CLI didn't already supply both bases.
    let template = load_or_init()?;
    if args.watch_base.is_none() || args.landing_base.is_none() {
        if let LoadResult::CreatedTemplate(path) = template {
            out::print_success(&format!(
                "A template settle_move config was written to: {}",
                path.display()
            ));
            out::print_info(
                "Edit the file to set `watch_base` and `landing_base`, and optionally `log_level`, `log_file` and the poll intervals. Example:\n\n<config>\n  <watch_base>/srv/intake</watch_base>\n  <landing_base>/srv/landing</landing_base>\n  <log_level>normal</log_level>\n  <discover_interval_seconds>60</discover_interval_seconds>\n  <settle_interval_seconds>60</settle_interval_seconds>\n</config>\n",
            );
            out::print_info(
                "Then re-run this command, or pass --watch-base/--landing-base directly. To use a different location set SETTLE_MOVE_CONFIG.",
            );
            return Ok(());
        }
    }

    // Build config: file values first, then CLI overrides (CLI wins).
    let mut cfg = Config::default();
    if let Some(xml) = load_config_from_xml() {
        if let Some(wb) = xml.watch_base {
            cfg.watch_base = wb;
        }
        if let Some(lb) = xml.landing_base {
            cfg.landing_base = lb;
        }
        if let Some(lvl) = xml.log_level {
            cfg.log_level = lvl;
        }
        if let Some(lf) = xml.log_file {
            cfg.log_file = Some(lf);
        }
        if let Some(iv) = xml.discover_interval {
            cfg.discover_interval = iv;
        }
        if let Some(iv) = xml.settle_interval {
            cfg.settle_interval = iv;
        }
    }
    args.apply_overrides(&mut cfg);

    // Initialize logging and capture the guard so we can drop it on signal
    let guard_opt: Option<tracing_appender::non_blocking::WorkerGuard> =
        init_tracing(&cfg.log_level, cfg.log_file.as_deref(), args.json).map_err(|e| {
            out::print_error(&format!("Failed to initialize logging: {}", e));
            e
        })?;

    // Guard needs to be dropped on SIGINT to flush logs
    let guard_slot = Arc::new(Mutex::new(guard_opt));
    {
        let guard_slot = Arc::clone(&guard_slot);
        ctrlc::set_handler(move || {
            shutdown::request();
            out::print_warn("Received interrupt; shutting down gracefully...");
            if let Ok(mut g) = guard_slot.lock() {
                let _ = g.take(); // drop guard here to flush tracing_appender
            }
        })
        .expect("failed to install signal handler");
    }

    if shutdown::is_requested() {
        return Ok(());
    }

    debug!("Starting settle_move: {:?}", args);

    // Main run (so we can drop guard after)
    let result = (|| -> Result<()> {
        // Fatal on misconfiguration; also makes both bases absolute so the
        // symlinks left behind carry absolute targets.
        validate_and_normalize(&mut cfg)?;

        let pipeline = Pipeline::spawn(
            cfg.watch_base.clone(),
            cfg.discover_interval,
            cfg.settle_interval,
        )?;
        let sink = TracingSink;

        info!(
            watch = %cfg.watch_base.display(),
            landing = %cfg.landing_base.display(),
            "watching for settled files"
        );

        for SettleOutcome { name, result } in pipeline.outcomes().iter() {
            match result {
                Ok(()) => {
                    let src = cfg.watch_base.join(&name);
                    let dest = cfg.landing_base.join(&name);
                    match relocate_file(&src, &dest) {
                        Ok(()) => sink.record(&Outcome::Moved { name, dest }),
                        Err(e) => sink.record(&Outcome::Failed {
                            name,
                            error: e.into(),
                        }),
                    }
                }
                Err(e) => sink.record(&Outcome::Failed {
                    name,
                    error: e.into(),
                }),
            }
        }

        pipeline.join();
        Ok(())
    })();

    // Ensure logs are flushed before exit
    if let Ok(mut g) = guard_slot.lock() {
        let _ = g.take();
    }

    result
}
