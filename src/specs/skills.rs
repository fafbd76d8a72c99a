// src/specs/skills.rs

use serde::Serialize;

use super::{EntityScraper, skip_or_fail};
use crate::config::options::EntityKind;
use crate::core::dom::{DomSource, Element, Locator};
use crate::core::overlay;
use crate::core::sanitize::{normalize_ws, split_skill_description};
use crate::core::session::Session;
use crate::error::ScrapeError;
use crate::progress::Progress;
use crate::store::DataStore;

pub const SETTINGS_BUTTON: Locator = Locator::XPath(
    "//div[contains(@class, 'utils_padbottom_half')]//button[contains(@class, 'filters_button_moreless')]",
);
pub const SHOW_ID_CHECKBOX: Locator = Locator::XPath("//input[contains(@id, 'showIdCheckbox')]");
pub const SHOW_UNIQUE_CHECKBOX: Locator = Locator::XPath("//input[contains(@id, 'showUniqueCharCheckbox')]");

pub const ROW: Locator = Locator::XPath("//div[contains(@class, 'skills_table_row_ja')]");
pub const NAME: Locator = Locator::XPath(".//div[contains(@class, 'skills_table_jpname')]");
pub const DESCRIPTION: Locator = Locator::XPath(".//div[contains(@class, 'skills_table_desc')]");

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillRecord {
    pub id: u32,
    pub english_name: String,
    pub english_description: String,
}

#[derive(Default)]
pub struct SkillScraper {
    pub strict_numbers: bool,
}

impl SkillScraper {
    pub fn new(strict_numbers: bool) -> Self {
        Self { strict_numbers }
    }

    /// Open the table settings and switch on ids and character-specific skills.
    /// A toggle that cannot be clicked is logged; rows then lack ids and are skipped.
    fn show_all_columns<D: DomSource>(&self, session: &mut Session<D>) {
        for (what, locator) in [
            ("settings", SETTINGS_BUTTON),
            ("show skill IDs", SHOW_ID_CHECKBOX),
            ("show character-specific skills", SHOW_UNIQUE_CHECKBOX),
        ] {
            match session.dom.find_one(locator) {
                Ok(Some(el)) => {
                    if session.click(&el) {
                        let settle = session.timing.toggle_settle();
                        session.dom.wait_settle(settle);
                    } else {
                        logw!("Could not toggle {what}.");
                    }
                }
                Ok(None) => logw!("No {what} control found."),
                Err(e) => logw!("Lookup of {what} control failed: {e}"),
            }
        }
    }
}

/// `None` when the row has no usable name or description.
fn read_row<D: DomSource>(dom: &D, row: &Element) -> Result<Option<SkillRecord>, ScrapeError> {
    let Some(name_el) = dom.find_one_within(row, NAME)? else {
        return Ok(None);
    };
    let Some(desc_el) = dom.find_one_within(row, DESCRIPTION)? else {
        return Ok(None);
    };

    let name = normalize_ws(&dom.text(&name_el)?);
    if name.is_empty() {
        return Ok(None);
    }
    let raw_desc = dom.text(&desc_el)?;
    let (id, description) = split_skill_description(raw_desc.trim());

    let id = id
        .as_deref()
        .and_then(|digits| digits.parse::<u32>().ok())
        .ok_or_else(|| ScrapeError::MalformedNumber {
            entity: name.clone(),
            field: "id",
            text: raw_desc.trim().to_string(),
        })?;

    Ok(Some(SkillRecord {
        id,
        english_name: name,
        english_description: description.trim().to_string(),
    }))
}

impl EntityScraper for SkillScraper {
    type Record = SkillRecord;
    const KIND: EntityKind = EntityKind::Skills;

    fn run<D: DomSource>(
        &mut self,
        session: &mut Session<D>,
        store: &mut DataStore<SkillRecord>,
        progress: &mut dyn Progress,
    ) -> Result<(), ScrapeError> {
        let settle = session.timing.index_settle();
        session.open(Self::KIND.url(), settle)?;
        overlay::ensure_consent_dismissed(session);
        self.show_all_columns(session);

        let rows = session.dom.find_visible(ROW)?;
        let total = rows.len();
        logf!("Found {total} skill rows.");
        progress.begin(total);

        for (i, row) in rows.iter().enumerate() {
            match read_row(&session.dom, row) {
                Ok(Some(skill)) => {
                    let name = skill.english_name.clone();
                    if store.put(&name, skill) {
                        logf!("Scraped skill ({}/{total}): {name}", i + 1);
                        store.checkpoint()?;
                    } else {
                        logd!("Skill {name} already recorded.");
                    }
                    progress.item_done(&name);
                }
                Ok(None) => {
                    logd!("Skill row {} has no name or description.", i + 1);
                    progress.item_failed(&row.to_string());
                }
                Err(e) => {
                    progress.item_failed(&row.to_string());
                    skip_or_fail(e, &format!("skill row {}", i + 1), self.strict_numbers)?;
                }
            }
        }

        progress.finish();
        Ok(())
    }
}
