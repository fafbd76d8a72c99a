// src/bin/cli.rs
use color_eyre::eyre::{Result, bail};
use uma_scrape::cli;

fn main() -> Result<()> {
    color_eyre::install()?;

    let summary = cli::run()?;
    for path in &summary.files_written {
        println!("Wrote {}", path.display());
    }
    if !summary.is_success() {
        let failed: Vec<String> = summary
            .failed
            .iter()
            .map(|(kind, reason)| format!("{}: {reason}", kind.label()))
            .collect();
        bail!("{} entity type(s) failed\n{}", failed.len(), failed.join("\n"));
    }
    Ok(())
}
