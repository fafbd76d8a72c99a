// src/core/session.rs
use std::time::Duration;

use crate::config::options::Timing;
use crate::core::dom::{DomSource, Element};
use crate::core::interact::{self, RetryPolicy};
use crate::core::overlay::{OverlayLocators, OverlayState};
use crate::error::DomResult;

/// One browser session, owned by the scraper currently running.
///
/// Every component receives the session explicitly; there is no ambient
/// driver. Dropping the session releases the underlying browser.
pub struct Session<D: DomSource> {
    pub dom: D,
    pub overlays: OverlayState,
    pub timing: Timing,
    pub retry: RetryPolicy,
}

impl<D: DomSource> Session<D> {
    pub fn new(dom: D, overlay_locators: OverlayLocators, timing: Timing, retry: RetryPolicy) -> Self {
        Self {
            dom,
            overlays: OverlayState::new(overlay_locators),
            timing,
            retry,
        }
    }

    /// [`interact::attempt_click`] with the session's retry policy.
    pub fn click(&mut self, target: &Element) -> bool {
        interact::attempt_click(&mut self.dom, target, &self.retry)
    }

    /// Navigate and wait for the page to settle.
    pub fn open(&mut self, url: &str, settle: Duration) -> DomResult<()> {
        self.dom.navigate(url)?;
        self.dom.wait_settle(settle);
        Ok(())
    }

    pub fn into_dom(self) -> D {
        self.dom
    }
}
