// src/config/consts.rs

// Site
pub const SKILLS_URL: &str = "https://gametora.com/umamusume/skills";
pub const CHARACTERS_URL: &str = "https://gametora.com/umamusume/characters";
pub const SUPPORTS_URL: &str = "https://gametora.com/umamusume/supports";
pub const RACES_URL: &str = "https://gametora.com/umamusume/races";

// Output
pub const DEFAULT_OUT_DIR: &str = "data";
pub const SKILLS_FILE: &str = "skills.json";
pub const CHARACTERS_FILE: &str = "characters.json";
pub const SUPPORTS_FILE: &str = "supports.json";
pub const RACES_FILE: &str = "races.json";
pub const DEFAULT_LOG_FILE: &str = ".store/debug.log";

// Settle times (ms); the site renders on its own schedule
pub const INDEX_SETTLE_MS: u64 = 5_000;
pub const DETAIL_SETTLE_MS: u64 = 3_000;
pub const CLICK_SETTLE_MS: u64 = 300;
pub const TOGGLE_SETTLE_MS: u64 = 100;

// Click retry
pub const CLICK_MAX_ATTEMPTS: u32 = 3;
pub const CLICK_RETRY_DELAY_MS: u64 = 500;

// Browser
pub const WINDOW_SIZE: (u32, u32) = (1920, 1080);
pub const BROWSER_IDLE_TIMEOUT_SECS: u64 = 300;

// Races: leading/trailing rows on the index that are not real races
pub const RACE_ROWS_SKIP_HEAD: usize = 2;
pub const RACE_ROWS_SKIP_TAIL: usize = 7;
