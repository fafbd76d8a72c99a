// src/specs/races.rs
//! Race list rows and their detail box.
//!
//! The list renders a couple of header rows before the races and a block of
//! footer rows after them, all with the same row class. Only the rows in
//! between are races.

use indexmap::IndexMap;
use serde::Serialize;

use super::{EntityScraper, skip_or_fail};
use crate::config::consts::{RACE_ROWS_SKIP_HEAD, RACE_ROWS_SKIP_TAIL};
use crate::config::options::EntityKind;
use crate::core::dom::{DomSource, Element, Locator};
use crate::core::overlay;
use crate::core::sanitize::{normalize_ws, parse_count};
use crate::core::session::Session;
use crate::error::ScrapeError;
use crate::progress::Progress;
use crate::store::DataStore;

pub const ROW: Locator = Locator::XPath("//div[contains(@class, 'races_row')]");
pub const NAME: Locator = Locator::XPath(".//div[contains(@class, 'races_name')]");

pub const DETAIL_BOX: Locator = Locator::XPath("//div[contains(@class, 'races_det_infobox')]");
pub const DETAIL_ITEM: Locator = Locator::XPath(".//div[contains(@class, 'races_det_item')]");
pub const DETAIL_CAPTION: Locator = Locator::XPath(".//div[contains(@class, 'races_det_caption')]");
pub const DETAIL_VALUE: Locator = Locator::XPath(".//div[contains(@class, 'races_det_value')]");
pub const DETAIL_CLOSE: Locator = Locator::XPath("//div[contains(@class, 'races_det_close')]");

const DATE: &str = "Date";
const GRADE: &str = "Grade";
const TERRAIN: &str = "Terrain";
const DISTANCE_TYPE: &str = "Distance (type)";
const DISTANCE_METERS: &str = "Distance (meters)";
const FANS: &str = "Fans";

// Longest phrases first so shorter ones don't eat into them.
const FAN_NOISE: &[&str] = &["Fans gained:", "fans", "Fans"];
const METER_NOISE: &[&str] = &["meters", "m"];

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceRecord {
    pub name: String,
    pub date: String,
    pub grade: String,
    pub terrain: String,
    pub distance_type: String,
    pub distance_meters: u32,
    pub fans: u32,
}

impl RaceRecord {
    /// Build a record from the detail box's caption → value pairs.
    /// Text fields default to empty; numeric ones must parse.
    pub fn from_details(name: &str, details: &IndexMap<String, String>) -> Result<Self, ScrapeError> {
        let text = |caption: &str| details.get(caption).cloned().unwrap_or_default();
        let number = |caption: &str, field: &'static str, noise: &[&str]| {
            let raw = text(caption);
            parse_count(&raw, noise).ok_or_else(|| ScrapeError::MalformedNumber {
                entity: name.to_string(),
                field,
                text: raw,
            })
        };

        Ok(Self {
            name: name.to_string(),
            date: text(DATE),
            grade: text(GRADE),
            terrain: text(TERRAIN),
            distance_type: text(DISTANCE_TYPE),
            distance_meters: number(DISTANCE_METERS, "distanceMeters", METER_NOISE)?,
            fans: number(FANS, "fans", FAN_NOISE)?,
        })
    }
}

/// The race rows among all list rows: `rows[head .. len - tail]`.
pub fn race_rows<T>(rows: &[T]) -> &[T] {
    if rows.len() <= RACE_ROWS_SKIP_HEAD + RACE_ROWS_SKIP_TAIL {
        return &[];
    }
    &rows[RACE_ROWS_SKIP_HEAD..rows.len() - RACE_ROWS_SKIP_TAIL]
}

#[derive(Default)]
pub struct RaceScraper {
    pub strict_numbers: bool,
}

impl RaceScraper {
    pub fn new(strict_numbers: bool) -> Self {
        Self { strict_numbers }
    }

    fn scrape_row<D: DomSource>(&self, session: &mut Session<D>, row: &Element) -> Result<Option<RaceRecord>, ScrapeError> {
        let name = match session.dom.find_one_within(row, NAME)? {
            Some(el) => normalize_ws(&session.dom.text(&el)?),
            None => return Ok(None),
        };
        if name.is_empty() {
            return Ok(None);
        }

        if !session.click(row) {
            logw!("Could not open details for {name}.");
            return Ok(None);
        }
        let settle = session.timing.click_settle();
        session.dom.wait_settle(settle);

        let details = read_details(&session.dom);
        close_details(session);
        let details = details?.ok_or_else(|| ScrapeError::MissingElement(format!("details of {name}")))?;

        RaceRecord::from_details(&name, &details).map(Some)
    }
}

fn read_details<D: DomSource>(dom: &D) -> Result<Option<IndexMap<String, String>>, ScrapeError> {
    let Some(infobox) = dom.find_one(DETAIL_BOX)? else {
        return Ok(None);
    };
    let mut details = IndexMap::new();
    for item in dom.find_all_within(&infobox, DETAIL_ITEM)? {
        let caption = dom.find_one_within(&item, DETAIL_CAPTION)?;
        let value = dom.find_one_within(&item, DETAIL_VALUE)?;
        if let (Some(caption), Some(value)) = (caption, value) {
            details.insert(normalize_ws(&dom.text(&caption)?), normalize_ws(&dom.text(&value)?));
        }
    }
    Ok(Some(details))
}

fn close_details<D: DomSource>(session: &mut Session<D>) {
    match session.dom.find_one(DETAIL_CLOSE) {
        Ok(Some(close)) => {
            if !session.click(&close) {
                logw!("Could not close race details.");
            }
        }
        _ => logd!("No race detail close control."),
    }
}

impl EntityScraper for RaceScraper {
    type Record = RaceRecord;
    const KIND: EntityKind = EntityKind::Races;

    fn run<D: DomSource>(
        &mut self,
        session: &mut Session<D>,
        store: &mut DataStore<RaceRecord>,
        progress: &mut dyn Progress,
    ) -> Result<(), ScrapeError> {
        let settle = session.timing.index_settle();
        session.open(Self::KIND.url(), settle)?;
        overlay::ensure_consent_dismissed(session);

        let all_rows = session.dom.find_visible(ROW)?;
        let rows = race_rows(&all_rows);
        let total = rows.len();
        logf!("Found {} list rows, {total} races.", all_rows.len());
        progress.begin(total);

        let mut ad_handled = false;
        for (i, row) in rows.iter().enumerate() {
            match self.scrape_row(session, row) {
                Ok(Some(race)) => {
                    let name = race.name.clone();
                    if store.put(&name, race) {
                        logf!("Scraped race ({}/{total}): {name}", i + 1);
                        store.checkpoint()?;
                    } else {
                        logd!("Race {name} already recorded.");
                    }
                    progress.item_done(&name);
                }
                Ok(None) => progress.item_failed(&row.to_string()),
                Err(e) => {
                    progress.item_failed(&row.to_string());
                    skip_or_fail(e, &format!("race row {}", i + 1), self.strict_numbers)?;
                }
            }
            ad_handled = overlay::ensure_ad_dismissed(session, ad_handled);
        }

        progress.finish();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn ten_rows_leave_one_race() {
        let rows: Vec<usize> = (0..10).collect();
        assert_eq!(race_rows(&rows), &[2]);
    }

    #[test]
    fn too_few_rows_leave_none() {
        let rows: Vec<usize> = (0..9).collect();
        assert!(race_rows(&rows).is_empty());
        assert!(race_rows::<usize>(&[]).is_empty());
    }

    #[test]
    fn details_parse_with_noise_stripped() {
        let race = RaceRecord::from_details(
            "Japanese Derby (Tokyo Yushun)",
            &details(&[
                ("Date", "Junior Year Late May"),
                ("Grade", "G1"),
                ("Terrain", "Turf"),
                ("Distance (type)", "Medium"),
                ("Distance (meters)", "2400m"),
                ("Fans", "Fans gained: 20,000 fans"),
            ]),
        )
        .unwrap();

        assert_eq!(race.distance_meters, 2400);
        assert_eq!(race.fans, 20_000);
        assert_eq!(race.grade, "G1");
        assert_eq!(race.distance_type, "Medium");
    }

    #[test]
    fn missing_fans_is_malformed() {
        let err = RaceRecord::from_details("Arima Kinen", &details(&[("Distance (meters)", "2500m")])).unwrap_err();
        match err {
            ScrapeError::MalformedNumber { entity, field, .. } => {
                assert_eq!(entity, "Arima Kinen");
                assert_eq!(field, "fans");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn serializes_camel_case() {
        let race = RaceRecord::from_details(
            "Satsuki Sho",
            &details(&[("Distance (meters)", "2000"), ("Fans", "10,500")]),
        )
        .unwrap();
        let json = serde_json::to_value(&race).unwrap();
        assert_eq!(json["distanceMeters"], 2000);
        assert_eq!(json["fans"], 10_500);
        assert_eq!(json["distanceType"], "");
    }
}
