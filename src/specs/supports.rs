// src/specs/supports.rs

use super::{EntityScraper, scrape_event_pages, visible_links};
use crate::config::options::EntityKind;
use crate::core::dom::{DomSource, Locator};
use crate::core::overlay;
use crate::core::sanitize::support_card_name;
use crate::core::session::Session;
use crate::error::ScrapeError;
use crate::progress::Progress;
use crate::store::{DataStore, TrainingEvents};

pub const GRID: Locator = Locator::XPath("//div[contains(@class, 'sc-70f2d7f-0')]");
// The card body carries the class and the visibility; the link is the anchor around it.
pub const CARD_LINK: Locator = Locator::XPath(".//a[.//div[contains(@class, 'sc-73e3e686-3')]]");
pub const CARD_BODY: Locator = Locator::XPath(".//div[contains(@class, 'sc-73e3e686-3')]");

#[derive(Default)]
pub struct SupportCardScraper;

impl EntityScraper for SupportCardScraper {
    type Record = TrainingEvents;
    const KIND: EntityKind = EntityKind::Supports;

    fn run<D: DomSource>(
        &mut self,
        session: &mut Session<D>,
        store: &mut DataStore<TrainingEvents>,
        progress: &mut dyn Progress,
    ) -> Result<(), ScrapeError> {
        let settle = session.timing.index_settle();
        session.open(Self::KIND.url(), settle)?;
        overlay::ensure_consent_dismissed(session);

        let links = visible_links(&session.dom, GRID, CARD_LINK, Some(CARD_BODY))?;
        logf!("Found {} support cards.", links.len());

        scrape_event_pages(session, &links, store, progress, |heading| {
            let card = support_card_name(heading);
            match &card.rarity {
                Some(rarity) => logf!("Support card {} ({rarity})", card.name),
                None => logd!("Support card {} has no rarity in {heading:?}", card.name),
            }
            card.name
        })
    }
}
