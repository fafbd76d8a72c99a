// src/core/dom.rs
//! The page capability the scrapers consume.
//!
//! Element handles never hold a live node. An [`Element`] is the path of
//! `(locator, index)` steps that found it, and every operation re-resolves
//! that path against the current DOM. A node that re-rendered in between
//! simply resolves again; one that disappeared yields [`DomError::Detached`].

use std::fmt;
use std::time::Duration;

use crate::error::DomResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Locator {
    Css(&'static str),
    XPath(&'static str),
}

impl Locator {
    pub fn query(&self) -> &'static str {
        match self {
            Locator::Css(q) | Locator::XPath(q) => q,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(q) => write!(f, "css={q}"),
            Locator::XPath(q) => write!(f, "xpath={q}"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Step {
    pub locator: Locator,
    pub index: usize,
}

/// Opaque, re-resolvable element handle.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Element {
    steps: Vec<Step>,
}

impl Element {
    pub fn root(locator: Locator, index: usize) -> Self {
        Self { steps: vec![Step { locator, index }] }
    }

    pub fn child(&self, locator: Locator, index: usize) -> Self {
        let mut steps = self.steps.clone();
        steps.push(Step { locator, index });
        Self { steps }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str(" >> ")?;
            }
            write!(f, "{}[{}]", step.locator, step.index)?;
        }
        Ok(())
    }
}

/// A rendered page that can be navigated, queried and clicked.
///
/// Implementors provide [`count`](DomSource::count) plus the element
/// operations; lookups returning handles are derived from `count`.
pub trait DomSource {
    fn navigate(&mut self, url: &str) -> DomResult<()>;

    /// Block for `duration`. All waits of a run go through here.
    fn wait_settle(&mut self, duration: Duration);

    fn current_url(&self) -> DomResult<String>;

    /// Number of matches for `locator`, document-wide or inside `scope`.
    /// No match is `Ok(0)`, not an error.
    fn count(&self, scope: Option<&Element>, locator: Locator) -> DomResult<usize>;

    /// Rendered text of the element.
    fn text(&self, el: &Element) -> DomResult<String>;

    fn attribute(&self, el: &Element, name: &str) -> DomResult<Option<String>>;

    fn is_visible(&self, el: &Element) -> DomResult<bool>;

    /// Native click. Fails with `Intercepted` when something covers the target.
    fn click(&mut self, el: &Element) -> DomResult<()>;

    fn scroll_into_view(&mut self, el: &Element) -> DomResult<()>;

    /// Script-level click that ignores whatever is on top.
    fn force_click(&mut self, el: &Element) -> DomResult<()>;

    fn find_all(&self, locator: Locator) -> DomResult<Vec<Element>> {
        let n = self.count(None, locator)?;
        Ok((0..n).map(|i| Element::root(locator, i)).collect())
    }

    fn find_one(&self, locator: Locator) -> DomResult<Option<Element>> {
        Ok(match self.count(None, locator)? {
            0 => None,
            _ => Some(Element::root(locator, 0)),
        })
    }

    fn find_all_within(&self, parent: &Element, locator: Locator) -> DomResult<Vec<Element>> {
        let n = self.count(Some(parent), locator)?;
        Ok((0..n).map(|i| parent.child(locator, i)).collect())
    }

    fn find_one_within(&self, parent: &Element, locator: Locator) -> DomResult<Option<Element>> {
        Ok(match self.count(Some(parent), locator)? {
            0 => None,
            _ => Some(parent.child(locator, 0)),
        })
    }

    /// Elements matching `locator` that are currently displayed.
    /// Handles that vanish while being checked count as hidden.
    fn find_visible(&self, locator: Locator) -> DomResult<Vec<Element>> {
        let all = self.find_all(locator)?;
        Ok(all
            .into_iter()
            .filter(|el| self.is_visible(el).unwrap_or(false))
            .collect())
    }

    /// Trimmed text of the first `locator` match, `None` when absent.
    fn text_of(&self, locator: Locator) -> DomResult<Option<String>> {
        match self.find_one(locator)? {
            Some(el) => Ok(Some(self.text(&el)?.trim().to_string())),
            None => Ok(None),
        }
    }
}
