// src/specs/characters.rs

use super::{EntityScraper, scrape_event_pages, visible_links};
use crate::config::options::EntityKind;
use crate::core::dom::{DomSource, Locator};
use crate::core::overlay;
use crate::core::sanitize::character_name;
use crate::core::session::Session;
use crate::error::ScrapeError;
use crate::progress::Progress;
use crate::store::{DataStore, TrainingEvents};

pub const GRID: Locator = Locator::XPath("//div[contains(@class, 'sc-70f2d7f-0')]");
pub const CARD_LINK: Locator = Locator::XPath(".//a[contains(@class, 'sc-73e3e686-1')]");

pub const SORT_ROW: Locator = Locator::XPath("//div[contains(@class, 'filters_sort_row')]");
pub const SORT_FIELD: Locator = Locator::XPath(".//select[1]");
pub const SORT_ORDER: Locator = Locator::XPath(".//select[2]");
pub const BY_NAME: Locator = Locator::XPath(".//option[@value='name']");
pub const ASCENDING: Locator = Locator::XPath(".//option[@value='asc']");

#[derive(Default)]
pub struct CharacterScraper;

/// Sort the grid by name, ascending. Leaves the site order on failure.
fn sort_by_name<D: DomSource>(session: &mut Session<D>) {
    let row = match session.dom.find_one(SORT_ROW) {
        Ok(Some(r)) => r,
        _ => {
            logw!("No sort controls found, keeping site order.");
            return;
        }
    };

    // open the dropdown, then pick
    for (select, option) in [(SORT_FIELD, BY_NAME), (SORT_ORDER, ASCENDING)] {
        let dropdown = row.child(select, 0);
        let choice = dropdown.child(option, 0);
        for target in [dropdown, choice] {
            if !session.click(&target) {
                logw!("Could not click {target}, keeping site order.");
                return;
            }
            let settle = session.timing.toggle_settle();
            session.dom.wait_settle(settle);
        }
    }
}

impl EntityScraper for CharacterScraper {
    type Record = TrainingEvents;
    const KIND: EntityKind = EntityKind::Characters;

    fn run<D: DomSource>(
        &mut self,
        session: &mut Session<D>,
        store: &mut DataStore<TrainingEvents>,
        progress: &mut dyn Progress,
    ) -> Result<(), ScrapeError> {
        let settle = session.timing.index_settle();
        session.open(Self::KIND.url(), settle)?;
        overlay::ensure_consent_dismissed(session);
        sort_by_name(session);

        let links = visible_links(&session.dom, GRID, CARD_LINK, None)?;
        logf!("Found {} characters.", links.len());

        scrape_event_pages(session, &links, store, progress, character_name)
    }
}
