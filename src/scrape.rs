// src/scrape.rs
use std::path::{Path, PathBuf};

use crate::{
    config::options::{EntityKind, ScrapeOptions},
    core::{chrome::ChromeDom, dom::DomSource, session::Session},
    error::ScrapeError,
    progress::{NullProgress, Progress},
    specs::{self, CharacterScraper, EntityScraper, RaceScraper, SkillScraper, SupportCardScraper},
    store::DataStore,
};

/// What a full run produced.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub files_written: Vec<PathBuf>,
    pub failed: Vec<(EntityKind, String)>,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Run one scraper and persist its store to `out_path`.
///
/// When the scraper fails, whatever it collected is still written before
/// the error is returned.
pub fn run_with<D, S>(
    session: &mut Session<D>,
    scraper: &mut S,
    out_path: &Path,
    opts: &ScrapeOptions,
    progress: Option<&mut dyn Progress>,
) -> Result<DataStore<S::Record>, ScrapeError>
where
    D: DomSource,
    S: EntityScraper,
{
    let mut store = DataStore::new();
    if opts.checkpoint {
        store = store.with_checkpoint(out_path);
    }

    let mut null = NullProgress;
    let sink: &mut dyn Progress = match progress {
        Some(p) => p,
        None => &mut null,
    };

    match scraper.run(session, &mut store, sink) {
        Ok(()) => {
            store.save(out_path)?;
            Ok(store)
        }
        Err(e) => {
            loge!("{} failed after {} items: {e}", S::KIND.label(), store.len());
            if let Err(save_err) = store.save(out_path) {
                loge!("Could not save partial {}: {save_err}", S::KIND.label());
            }
            Err(e)
        }
    }
}

/// Dispatch `kind` to its scraper on an existing session. Returns the path written.
pub fn scrape_kind<D: DomSource>(
    kind: EntityKind,
    session: &mut Session<D>,
    opts: &ScrapeOptions,
    progress: Option<&mut dyn Progress>,
) -> Result<PathBuf, ScrapeError> {
    let path = opts.out_path(kind);
    let strict = opts.strict_numbers;
    let written = match kind {
        EntityKind::Skills => run_with(session, &mut SkillScraper::new(strict), &path, opts, progress)?.len(),
        EntityKind::Characters => run_with(session, &mut CharacterScraper, &path, opts, progress)?.len(),
        EntityKind::Supports => run_with(session, &mut SupportCardScraper, &path, opts, progress)?.len(),
        EntityKind::Races => run_with(session, &mut RaceScraper::new(strict), &path, opts, progress)?.len(),
    };
    logf!("{written} {} written to {}", kind.label(), path.display());
    Ok(path)
}

/// Launch a browser for one entity type.
pub fn open_session(opts: &ScrapeOptions) -> Result<Session<ChromeDom>, ScrapeError> {
    let dom = ChromeDom::launch(opts.headless)?;
    Ok(Session::new(dom, specs::SITE_OVERLAYS, opts.timing.clone(), opts.retry.clone()))
}

/// Top-level: scrape every requested entity type, each in its own browser.
/// A failing entity type is recorded and the next one still runs.
pub fn run(opts: &ScrapeOptions, progress: Option<&mut dyn Progress>) -> RunSummary {
    let mut summary = RunSummary::default();
    let mut null = NullProgress;
    let sink: &mut dyn Progress = match progress {
        Some(p) => p,
        None => &mut null,
    };

    for &kind in &opts.kinds {
        sink.log(&format!("Scraping {}...", kind.label()));

        let result = open_session(opts)
            .and_then(|mut session| scrape_kind(kind, &mut session, opts, Some(&mut *sink)));
        match result {
            Ok(path) => summary.files_written.push(path),
            Err(e) => {
                loge!("Scraping {} failed: {e}", kind.label());
                summary.failed.push((kind, e.to_string()));
            }
        }
    }

    summary
}
