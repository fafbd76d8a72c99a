// src/specs/mod.rs
//! # Scraping "specs" module
//!
//! One spec per entity type of the site. Each spec encodes *where the data
//! lives on the rendered page* (its locators, kept here as data) and *how to
//! walk it*: which index view to open, which rows or anchors count, and which
//! fields to read.
//!
//! ## What lives here
//! - Page-specific locators and field extraction.
//! - Name normalization per entity type (via `core::sanitize`).
//! - Driving `events::EventCollector` on detail pages that carry training events.
//!
//! ## What does **not** live here
//! - Browser lifecycle and output paths (`scrape`).
//! - Click retry and overlay handling (`core::interact`, `core::overlay`).
//! - Tooltip text shaping (`tooltip`).
//!
//! ## Conventions
//! - Hidden entries (visibility false) are never scraped.
//! - One broken entity is logged and skipped; page-level breakage (index
//!   view missing) fails the entity type.
//! - Records go into the caller's `DataStore`, so whatever was collected
//!   before a failure is still there for the caller to persist.

use serde::Serialize;

use crate::config::options::EntityKind;
use crate::core::dom::{DomSource, Locator};
use crate::core::overlay::{self, OverlayLocators};
use crate::core::session::Session;
use crate::error::ScrapeError;
use crate::events::EventCollector;
use crate::progress::Progress;
use crate::store::{DataStore, TrainingEvents};

pub mod characters;
pub mod races;
pub mod skills;
pub mod supports;

pub use characters::CharacterScraper;
pub use races::{RaceRecord, RaceScraper};
pub use skills::{SkillRecord, SkillScraper};
pub use supports::SupportCardScraper;

pub const SITE_OVERLAYS: OverlayLocators = OverlayLocators {
    consent: Locator::XPath("//button[contains(@class, 'legal_cookie_banner_button')]"),
    ad_dismiss: Locator::XPath("//div[contains(@class, 'publift-widget-sticky_footer-button')]"),
};

pub const DETAIL_HEADING: Locator = Locator::XPath("//h1[contains(@class, 'utils_headingXl')]");

pub trait EntityScraper {
    type Record: Serialize;
    const KIND: EntityKind;

    /// Walk the entity type's pages and fill `store`.
    fn run<D: DomSource>(
        &mut self,
        session: &mut Session<D>,
        store: &mut DataStore<Self::Record>,
        progress: &mut dyn Progress,
    ) -> Result<(), ScrapeError>;
}

/// Decide whether a per-entity failure ends the run.
/// Malformed numbers do only in strict mode; persistence failures always do.
pub(crate) fn skip_or_fail(err: ScrapeError, what: &str, strict_numbers: bool) -> Result<(), ScrapeError> {
    match err {
        ScrapeError::MalformedNumber { .. } if strict_numbers => Err(err),
        ScrapeError::MalformedNumber { .. } | ScrapeError::Dom(_) | ScrapeError::MissingElement(_) => {
            logw!("Skipping {what}: {err}");
            Ok(())
        }
        other => Err(other),
    }
}

/// `href`s of the visible `item`s inside `grid`, in page order.
///
/// With `shown_by`, visibility is read from the first such descendant of
/// each item rather than from the item itself; an item without one is
/// treated as hidden.
pub(crate) fn visible_links<D: DomSource>(
    dom: &D,
    grid: Locator,
    item: Locator,
    shown_by: Option<Locator>,
) -> Result<Vec<String>, ScrapeError> {
    let grid_el = dom
        .find_one(grid)?
        .ok_or_else(|| ScrapeError::MissingElement(grid.to_string()))?;

    let mut links = Vec::new();
    for el in dom.find_all_within(&grid_el, item)? {
        let shown = match shown_by {
            Some(body) => dom.is_visible(&el.child(body, 0)),
            None => dom.is_visible(&el),
        };
        if !shown.unwrap_or(false) {
            continue;
        }
        match dom.attribute(&el, "href") {
            Ok(Some(href)) if !href.is_empty() => links.push(href),
            Ok(_) => logd!("{el} has no link"),
            Err(e) => logd!("{el} vanished: {e}"),
        }
    }
    Ok(links)
}

/// Visit each detail page, name it with `canonical`, and collect its
/// training events into the matching record.
///
/// Variants of one entity share a canonical name, so their events land in
/// the same record and titles seen before are skipped.
pub(crate) fn scrape_event_pages<D, F>(
    session: &mut Session<D>,
    links: &[String],
    store: &mut DataStore<TrainingEvents>,
    progress: &mut dyn Progress,
    canonical: F,
) -> Result<(), ScrapeError>
where
    D: DomSource,
    F: Fn(&str) -> String,
{
    let total = links.len();
    progress.begin(total);

    for (i, link) in links.iter().enumerate() {
        logf!("Navigating to {link} ({}/{total})", i + 1);
        let settle = session.timing.detail_settle();
        if let Err(e) = session.open(link, settle) {
            logw!("Could not open {link}: {e}");
            progress.item_failed(link);
            continue;
        }
        overlay::ensure_consent_dismissed(session);

        let heading = match session.dom.text_of(DETAIL_HEADING) {
            Ok(Some(h)) => h,
            Ok(None) | Err(_) => {
                logw!("No heading on {link}, skipping.");
                progress.item_failed(link);
                continue;
            }
        };
        let name = canonical(&heading);
        if name.is_empty() {
            logw!("Heading {heading:?} on {link} normalizes to nothing, skipping.");
            progress.item_failed(link);
            continue;
        }

        // Each navigation reloads the ad, so the guard starts fresh per page.
        let mut collector = EventCollector::default();
        let summary = collector.collect(session, &name, store.entry(&name));
        logd!(
            "{name}: {} recorded, {} already known, {} skipped",
            summary.recorded, summary.duplicates, summary.skipped
        );
        progress.item_done(&name);
        store.checkpoint()?;
    }

    progress.finish();
    Ok(())
}
