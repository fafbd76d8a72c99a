// src/config/options.rs
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::consts::*;
use crate::core::interact::RetryPolicy;
use crate::error::ScrapeError;

/// The four entity types the site exposes, in default run order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Skills,
    Characters,
    Supports,
    Races,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Skills,
        EntityKind::Characters,
        EntityKind::Supports,
        EntityKind::Races,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Skills => "skills",
            EntityKind::Characters => "characters",
            EntityKind::Supports => "support cards",
            EntityKind::Races => "races",
        }
    }

    pub fn url(&self) -> &'static str {
        match self {
            EntityKind::Skills => SKILLS_URL,
            EntityKind::Characters => CHARACTERS_URL,
            EntityKind::Supports => SUPPORTS_URL,
            EntityKind::Races => RACES_URL,
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            EntityKind::Skills => SKILLS_FILE,
            EntityKind::Characters => CHARACTERS_FILE,
            EntityKind::Supports => SUPPORTS_FILE,
            EntityKind::Races => RACES_FILE,
        }
    }
}

/// Coarse waits around UI-state-dependent actions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
    pub index_settle_ms: u64,
    pub detail_settle_ms: u64,
    pub click_settle_ms: u64,
    pub toggle_settle_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            index_settle_ms: INDEX_SETTLE_MS,
            detail_settle_ms: DETAIL_SETTLE_MS,
            click_settle_ms: CLICK_SETTLE_MS,
            toggle_settle_ms: TOGGLE_SETTLE_MS,
        }
    }
}

impl Timing {
    pub fn index_settle(&self) -> Duration { Duration::from_millis(self.index_settle_ms) }
    pub fn detail_settle(&self) -> Duration { Duration::from_millis(self.detail_settle_ms) }
    pub fn click_settle(&self) -> Duration { Duration::from_millis(self.click_settle_ms) }
    pub fn toggle_settle(&self) -> Duration { Duration::from_millis(self.toggle_settle_ms) }

    /// All waits zeroed; fixture runs use this.
    pub fn immediate() -> Self {
        Self { index_settle_ms: 0, detail_settle_ms: 0, click_settle_ms: 0, toggle_settle_ms: 0 }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeOptions {
    /// Entity types to scrape, in order.
    pub kinds: Vec<EntityKind>,
    /// Directory receiving one JSON document per entity type.
    pub out_dir: PathBuf,
    pub headless: bool,
    /// Fail the entity type on a malformed number instead of skipping the entity.
    pub strict_numbers: bool,
    /// Rewrite the document after every entity, not only at the end.
    pub checkpoint: bool,
    pub retry: RetryPolicy,
    pub timing: Timing,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            kinds: EntityKind::ALL.to_vec(),
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            headless: true,
            strict_numbers: false,
            checkpoint: false,
            retry: RetryPolicy::default(),
            timing: Timing::default(),
        }
    }
}

impl ScrapeOptions {
    /// Read options from a TOML file; absent keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ScrapeError> {
        let text = fs::read_to_string(path).map_err(|e| ScrapeError::Options {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        toml::from_str(&text).map_err(|e| ScrapeError::Options {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    pub fn out_path(&self, kind: EntityKind) -> PathBuf {
        self.out_dir.join(kind.file_name())
    }
}
