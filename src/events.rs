// src/events.rs
//! Training events of the character or support card currently on screen.
//!
//! Clicking an event opens a tooltip holding a title and one table row per
//! outcome option. Each tooltip is parsed with [`tooltip::parse_options`]
//! and recorded under its title, once. Anything that goes wrong with one
//! event only skips that event.

use crate::core::dom::{DomSource, Element, Locator};
use crate::core::overlay;
use crate::core::session::Session;
use crate::error::DomResult;
use crate::store::TrainingEvents;
use crate::tooltip;

/// Structural locators of the event list and its tooltip.
#[derive(Clone, Copy, Debug)]
pub struct TooltipLocators {
    pub event: Locator,
    pub tooltip: Locator,
    /// Relative to the tooltip.
    pub title: Locator,
    /// Relative to the tooltip.
    pub row: Locator,
    /// Relative to a row; the option text sits in the second match.
    pub cell: Locator,
    /// Relative to the option cell; one per rendered line.
    pub fragment: Locator,
}

pub const TOOLTIP_LOCATORS: TooltipLocators = TooltipLocators {
    event: Locator::XPath("//div[contains(@class, 'compatibility_viewer_item')]"),
    tooltip: Locator::XPath("//div[@data-tippy-root]"),
    title: Locator::XPath(".//div[contains(@class, 'tooltips_ttable_heading')]"),
    row: Locator::XPath(".//tr"),
    cell: Locator::XPath(".//td[contains(@class, 'tooltips_ttable_cell')]"),
    fragment: Locator::XPath(".//div"),
};

const OPTION_CELL_INDEX: usize = 1;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CollectSummary {
    pub found: usize,
    pub recorded: usize,
    pub duplicates: usize,
    pub skipped: usize,
}

pub struct EventCollector {
    locators: TooltipLocators,
    /// Ad guard state for this call site.
    ad_handled: bool,
}

impl Default for EventCollector {
    fn default() -> Self {
        Self::new(TOOLTIP_LOCATORS)
    }
}

enum Visit {
    Recorded,
    Duplicate,
    Skipped,
}

impl EventCollector {
    pub fn new(locators: TooltipLocators) -> Self {
        Self { locators, ad_handled: false }
    }

    /// Visit every training event in DOM order and record new titles in
    /// `entry`. Titles already in `entry` are left untouched.
    pub fn collect<D: DomSource>(&mut self, session: &mut Session<D>, item: &str, entry: &mut TrainingEvents) -> CollectSummary {
        let events = match session.dom.find_all(self.locators.event) {
            Ok(events) => events,
            Err(e) => {
                logw!("Could not list training events for {item}: {e}");
                return CollectSummary::default();
            }
        };
        let total = events.len();
        logf!("Found {total} training events for {item}.");

        let mut summary = CollectSummary { found: total, ..Default::default() };
        for (j, event) in events.iter().enumerate() {
            let progress = format!("({}/{total})", j + 1);
            match self.visit(session, event, &progress, entry) {
                Visit::Recorded => summary.recorded += 1,
                Visit::Duplicate => summary.duplicates += 1,
                Visit::Skipped => summary.skipped += 1,
            }
            self.ad_handled = overlay::ensure_ad_dismissed(session, self.ad_handled);
        }
        summary
    }

    fn visit<D: DomSource>(&self, session: &mut Session<D>, event: &Element, progress: &str, entry: &mut TrainingEvents) -> Visit {
        if !session.click(event) {
            logw!("Could not open training event {progress}, skipping.");
            return Visit::Skipped;
        }
        let settle = session.timing.click_settle();
        session.dom.wait_settle(settle);

        let dom = &session.dom;
        let tooltip = match dom.find_one(self.locators.tooltip) {
            Ok(Some(t)) => t,
            Ok(None) | Err(_) => {
                logf!("No tooltip opened for training event {progress}.");
                return Visit::Skipped;
            }
        };

        let title = match self.read_title(dom, &tooltip) {
            Some(t) => t,
            None => {
                logf!("No tooltip title found for training event {progress}.");
                return Visit::Skipped;
            }
        };

        let rows = match dom.find_all_within(&tooltip, self.locators.row) {
            Ok(rows) if !rows.is_empty() => rows,
            Ok(_) => {
                logf!("No options found for training event {title} {progress}.");
                return Visit::Skipped;
            }
            Err(e) => {
                logw!("Lost tooltip rows for training event {title} {progress}: {e}");
                return Visit::Skipped;
            }
        };

        if entry.contains_key(&title) {
            logf!("Training event {title} {progress} already exists.");
            return Visit::Duplicate;
        }

        let fragments = match self.read_rows(dom, &rows) {
            Ok(f) => f,
            Err(e) => {
                logw!("Tooltip for {title} {progress} changed while reading: {e}");
                return Visit::Skipped;
            }
        };

        logf!("Found {} options for training event {title} {progress}.", rows.len());
        entry.insert(title, tooltip::parse_options(&fragments));
        Visit::Recorded
    }

    fn read_title<D: DomSource>(&self, dom: &D, tooltip: &Element) -> Option<String> {
        let el = dom.find_one_within(tooltip, self.locators.title).ok()??;
        let text = dom.text(&el).ok()?;
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }

    /// Trimmed fragments of each row's option cell. A row without an option
    /// cell contributes no fragments.
    fn read_rows<D: DomSource>(&self, dom: &D, rows: &[Element]) -> DomResult<Vec<Vec<String>>> {
        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let cells = dom.find_all_within(row, self.locators.cell)?;
            let mut fragments = Vec::new();
            if let Some(cell) = cells.get(OPTION_CELL_INDEX) {
                for div in dom.find_all_within(cell, self.locators.fragment)? {
                    fragments.push(dom.text(&div)?.trim().to_string());
                }
            }
            out.push(fragments);
        }
        Ok(out)
    }
}
