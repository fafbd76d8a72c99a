// src/core/overlay.rs
//! Guards against transient UI that sits on top of the content.
//!
//! Both guards are idempotent and treat a missing control as normal:
//! - the consent banner is handled once per session (state in [`OverlayState`]);
//! - the sticky ad can come back, so its flag is tracked by each call site.

use crate::core::dom::{DomSource, Locator};
use crate::core::session::Session;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OverlayLocators {
    pub consent: Locator,
    pub ad_dismiss: Locator,
}

/// Session-scoped overlay state.
#[derive(Clone, Debug)]
pub struct OverlayState {
    pub locators: OverlayLocators,
    consent_handled: bool,
}

impl OverlayState {
    pub fn new(locators: OverlayLocators) -> Self {
        Self { locators, consent_handled: false }
    }

    pub fn consent_handled(&self) -> bool {
        self.consent_handled
    }
}

/// Accept the cookie banner if it is there. Returns whether consent is now
/// considered handled; once it is, later calls do nothing.
pub fn ensure_consent_dismissed<D: DomSource>(session: &mut Session<D>) -> bool {
    if session.overlays.consent_handled {
        return true;
    }

    let button = match session.dom.find_one(session.overlays.locators.consent) {
        Ok(Some(el)) => el,
        Ok(None) => {
            logf!("No cookie consent button found.");
            session.overlays.consent_handled = true;
            return true;
        }
        Err(e) => {
            logd!("Cookie consent lookup failed, will retry: {e}");
            return false;
        }
    };

    if session.click(&button) {
        let settle = session.timing.toggle_settle();
        session.dom.wait_settle(settle);
        session.overlays.consent_handled = true;
        logf!("Cookie consent accepted.");
    } else {
        logw!("Cookie consent button did not respond, will retry.");
    }
    session.overlays.consent_handled
}

/// Close the sticky ad unless the caller already did.
///
/// Returns `true` when handled (now or before), `false` when the close
/// control is absent or hidden so the caller tries again next time.
pub fn ensure_ad_dismissed<D: DomSource>(session: &mut Session<D>, already_handled: bool) -> bool {
    if already_handled {
        return true;
    }

    let close = match session.dom.find_one(session.overlays.locators.ad_dismiss) {
        Ok(Some(el)) => el,
        Ok(None) => return false,
        Err(e) => {
            logd!("Ad close lookup failed: {e}");
            return false;
        }
    };

    if !session.dom.is_visible(&close).unwrap_or(false) {
        return false;
    }

    if session.click(&close) {
        logf!("Dismissed sticky ad.");
        true
    } else {
        false
    }
}
