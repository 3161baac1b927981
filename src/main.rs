use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod config;
mod content;
mod decision;
mod history;
mod ignore;
mod persist;
mod report;
mod run;
mod scan;
mod store;
mod util;
mod version;

use cli::RootArgs;
use config::RunConfig;
use report::RunReport;

fn main() -> Result<()> {
    let args = RootArgs::parse();
    init_tracing(args.verbose);

    let cwd = std::env::current_dir().context("resolve current directory")?;
    let config = RunConfig::from_args(&args, &cwd)?;
    let report = run::run(&config)?;
    print_summary(&config, &report);

    if config.strict && report.stats.failed > 0 {
        return Err(anyhow!(
            "{} file(s) could not be processed",
            report.stats.failed
        ));
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_summary(config: &RunConfig, report: &RunReport) {
    for line in report.updates() {
        println!("{line}");
    }
    for line in report.failures() {
        eprintln!("{line}");
    }
    let stats = &report.stats;
    let mode = if config.dry_run { " (dry run)" } else { "" };
    println!(
        "processed {}, updated {}, unchanged {}, failed {}, ignored {}{mode}",
        stats.processed, stats.updated, stats.unchanged, stats.failed, stats.ignored
    );
    println!("average version: {}", stats.average);
    if !config.dry_run {
        println!(
            "report: {}",
            util::display_path(&config.report_path, Some(&config.root))
        );
    }
}
