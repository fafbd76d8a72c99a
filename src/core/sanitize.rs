// src/core/sanitize.rs

use std::sync::LazyLock;

use regex::Regex;

static PARENTHETICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\(.*?\)").expect("parenthetical pattern"));
static RARITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((SSR|SR|R)\)").expect("rarity pattern"));
static TRAILING_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\((\d+)\)$").expect("trailing id pattern"));

const ORIGINAL_MARKER: &str = "(Original)";
const SUPPORT_CARD_SUFFIX: &str = "Support Card";

pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Drop every `( … )` group together with the whitespace before it.
/// Non-greedy, no nesting.
pub fn strip_parentheticals(s: &str) -> String {
    PARENTHETICAL.replace_all(s, "").trim().to_string()
}

/// Canonical character key: "Special Week (Original)" and
/// "Special Week (Swimsuit)" both become "Special Week".
pub fn character_name(raw: &str) -> String {
    let name = raw.replace(ORIGINAL_MARKER, "");
    strip_parentheticals(name.trim())
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardName {
    pub name: String,
    pub rarity: Option<String>,
}

/// Canonical support card key plus the rarity read from its parenthetical.
pub fn support_card_name(raw: &str) -> CardName {
    let trimmed = raw.replace(SUPPORT_CARD_SUFFIX, "");
    let rarity = RARITY.captures(&trimmed).map(|c| c[1].to_string());
    CardName { name: normalize_ws(&strip_parentheticals(&trimmed)), rarity }
}

/// Split "Increases velocity. (200012)" into `(Some("200012"), "Increases velocity.")`.
/// Descriptions without a trailing id come back unchanged.
pub fn split_skill_description(desc: &str) -> (Option<String>, String) {
    match TRAILING_ID.captures(desc) {
        Some(caps) => {
            let id = caps[1].to_string();
            let clean = TRAILING_ID.replace(desc, "").to_string();
            (Some(id), clean)
        }
        None => (None, desc.to_string()),
    }
}

/// Parse a non-negative count after removing each `noise` phrase and
/// thousands separators. `None` when anything other than digits is left.
pub fn parse_count(text: &str, noise: &[&str]) -> Option<u32> {
    let mut s = text.to_string();
    for phrase in noise {
        s = s.replace(phrase, "");
    }
    let digits: String = s.chars().filter(|c| *c != ',' && !c.is_whitespace()).collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
