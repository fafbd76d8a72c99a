// src/cli.rs
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};

use crate::config::consts::DEFAULT_LOG_FILE;
use crate::config::options::{EntityKind, ScrapeOptions};
use crate::core::interact::RetryPolicy;
use crate::progress::LogProgress;
use crate::scrape::{self, RunSummary};

/// Scrape Umamusume game data from gametora.com into JSON documents.
#[derive(Debug, Parser)]
#[command(name = "uma_scrape", version)]
pub struct Args {
    /// Entity types to scrape, in order (default: all)
    #[arg(long, value_enum, num_args = 1..)]
    pub only: Vec<EntityKind>,

    /// Output directory for the JSON documents
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// TOML options file; flags override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Fail an entity type on a malformed number instead of skipping the entity
    #[arg(long)]
    pub strict: bool,

    /// Rewrite each document after every entity
    #[arg(long)]
    pub checkpoint: bool,

    /// Click attempts per element
    #[arg(long)]
    pub retries: Option<u32>,

    /// Pause between click attempts
    #[arg(long)]
    pub retry_delay_ms: Option<u64>,

    /// Log file (default: .store/debug.log)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Debug-level logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Options file (if any) with the flags laid over it.
    pub fn options(&self) -> Result<ScrapeOptions> {
        let mut opts = match &self.config {
            Some(path) => ScrapeOptions::load(path)?,
            None => ScrapeOptions::default(),
        };

        if !self.only.is_empty() {
            opts.kinds = self.only.clone();
        }
        if let Some(out) = &self.out {
            opts.out_dir = out.clone();
        }
        if self.headed {
            opts.headless = false;
        }
        if self.strict {
            opts.strict_numbers = true;
        }
        if self.checkpoint {
            opts.checkpoint = true;
        }
        if self.retries.is_some() || self.retry_delay_ms.is_some() {
            opts.retry = RetryPolicy::new(
                self.retries.unwrap_or(opts.retry.max_attempts),
                Duration::from_millis(self.retry_delay_ms.unwrap_or(opts.retry.delay_ms)),
            );
        }
        Ok(opts)
    }
}

pub fn run() -> Result<RunSummary> {
    let args = Args::parse();

    let log_file = args.log_file.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));
    crate::log::init(Some(&log_file), args.verbose)
        .wrap_err_with(|| format!("could not open log file {}", log_file.display()))?;

    let opts = args.options()?;
    logd!("Options: {opts:?}");

    let mut progress = LogProgress::new();
    Ok(scrape::run(&opts, Some(&mut progress)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let args = Args::parse_from([
            "uma_scrape", "--only", "races", "skills", "-o", "out", "--headed", "--strict", "--retries", "5",
        ]);
        let opts = args.options().unwrap();

        assert_eq!(opts.kinds, vec![EntityKind::Races, EntityKind::Skills]);
        assert_eq!(opts.out_dir, PathBuf::from("out"));
        assert!(!opts.headless);
        assert!(opts.strict_numbers);
        assert!(!opts.checkpoint);
        assert_eq!(opts.retry.max_attempts, 5);
        assert_eq!(opts.retry, RetryPolicy::new(5, Duration::from_millis(RetryPolicy::default().delay_ms)));
    }

    #[test]
    fn no_flags_means_defaults() {
        let opts = Args::parse_from(["uma_scrape"]).options().unwrap();
        assert_eq!(opts, ScrapeOptions::default());
    }
}
