// src/tooltip.rs
//! Training-event tooltip rows to outcome option strings.
//!
//! Each tooltip row is a list of text fragments, one per line the site
//! renders. A row is either a plain list of effects, or a "Randomly either"
//! block whose alternatives are separated by a lone `or` fragment:
//!
//! ```text
//! ["Randomly either", "Energy +10", "or", "Energy -10", "Mood -1"]
//!
//! Randomly either
//! ----------
//! Energy +10
//! ----------
//! Energy -10
//! Mood -1
//! ```

pub const RANDOM_MARKER: &str = "Randomly either";
pub const DIVIDER: &str = "----------";
const ALTERNATIVE_SEPARATOR: &str = "or";

/// The site says Wisdom, the game says Wit.
const TERMINOLOGY: &[(&str, &str)] = &[("Wisdom", "Wit")];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Every effect applies.
    Effects(Vec<String>),
    /// Exactly one group applies. Groups are in site order; a group can be
    /// empty when the row has an `or` with nothing before or after it.
    RandomlyEither(Vec<Vec<String>>),
}

impl Outcome {
    pub fn from_fragments(fragments: &[String]) -> Self {
        match fragments.split_first() {
            Some((first, rest)) if first.contains(RANDOM_MARKER) => {
                let groups = rest
                    .split(|f| f == ALTERNATIVE_SEPARATOR)
                    .map(|g| g.to_vec())
                    .collect();
                Outcome::RandomlyEither(groups)
            }
            _ => Outcome::Effects(fragments.to_vec()),
        }
    }

    /// Stored form: newline-joined lines, alternatives fenced by [`DIVIDER`].
    pub fn render(&self) -> String {
        let text = match self {
            Outcome::Effects(lines) => lines.join("\n"),
            Outcome::RandomlyEither(groups) => {
                let body = groups
                    .iter()
                    .map(|g| g.join("\n"))
                    .collect::<Vec<_>>()
                    .join(&format!("\n{DIVIDER}\n"));
                format!("{RANDOM_MARKER}\n{DIVIDER}\n{body}")
            }
        };
        normalize_terms(&text)
    }
}

pub fn normalize_terms(text: &str) -> String {
    TERMINOLOGY
        .iter()
        .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to))
}

/// One option string per tooltip row, in row order.
pub fn parse_options(rows: &[Vec<String>]) -> Vec<String> {
    rows.iter()
        .map(|fragments| Outcome::from_fragments(fragments).render())
        .collect()
}
