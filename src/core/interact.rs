// src/core/interact.rs
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::consts::{CLICK_MAX_ATTEMPTS, CLICK_RETRY_DELAY_MS};
use crate::core::dom::{DomSource, Element};
use crate::error::DomError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Attempts in total, including the first one.
    pub max_attempts: u32,
    /// Pause between failed attempts.
    pub delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: CLICK_MAX_ATTEMPTS, delay_ms: CLICK_RETRY_DELAY_MS }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self { max_attempts, delay_ms: delay.as_millis() as u64 }
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Click `target`, falling back to a scripted click when the native one is
/// intercepted by an overlay.
///
/// Returns `false` once `policy.max_attempts` attempts have failed; callers
/// skip the element and carry on. A failed attempt is assumed to have had
/// no effect, so retrying is safe.
pub fn attempt_click<D: DomSource + ?Sized>(dom: &mut D, target: &Element, policy: &RetryPolicy) -> bool {
    for attempt in 1..=policy.max_attempts {
        match dom.click(target) {
            Ok(()) => return true,
            Err(DomError::Intercepted(by)) => {
                logd!("Click on {target} intercepted ({by}), forcing it (attempt {attempt}/{})", policy.max_attempts);
                match dom.scroll_into_view(target).and_then(|_| dom.force_click(target)) {
                    Ok(()) => return true,
                    Err(e) => logd!("Forced click on {target} failed: {e}"),
                }
            }
            Err(e) => logd!("Click on {target} failed (attempt {attempt}/{}): {e}", policy.max_attempts),
        }
        if attempt < policy.max_attempts {
            dom.wait_settle(policy.delay());
        }
    }
    logw!("Giving up on {target} after {} attempts", policy.max_attempts);
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dom::Locator;
    use crate::error::DomResult;

    /// Scripted outcomes for the three click paths.
    #[derive(Default)]
    struct ScriptedDom {
        intercept_first: u32,
        force_fails: bool,
        clicks: u32,
        forced: u32,
        waits: Vec<Duration>,
    }

    impl DomSource for ScriptedDom {
        fn navigate(&mut self, _url: &str) -> DomResult<()> { Ok(()) }
        fn wait_settle(&mut self, d: Duration) { self.waits.push(d); }
        fn current_url(&self) -> DomResult<String> { Ok(s!("about:blank")) }
        fn count(&self, _: Option<&Element>, _: Locator) -> DomResult<usize> { Ok(1) }
        fn text(&self, _: &Element) -> DomResult<String> { Ok(s!()) }
        fn attribute(&self, _: &Element, _: &str) -> DomResult<Option<String>> { Ok(None) }
        fn is_visible(&self, _: &Element) -> DomResult<bool> { Ok(true) }
        fn click(&mut self, el: &Element) -> DomResult<()> {
            self.clicks += 1;
            if self.clicks <= self.intercept_first {
                return Err(DomError::Intercepted(el.to_string()));
            }
            Ok(())
        }
        fn scroll_into_view(&mut self, _: &Element) -> DomResult<()> { Ok(()) }
        fn force_click(&mut self, el: &Element) -> DomResult<()> {
            self.forced += 1;
            if self.force_fails {
                return Err(DomError::Detached(el.to_string()));
            }
            Ok(())
        }
    }

    fn target() -> Element {
        Element::root(Locator::Css("button.go"), 0)
    }

    #[test]
    fn direct_click_needs_no_fallback() {
        let mut dom = ScriptedDom::default();
        assert!(attempt_click(&mut dom, &target(), &RetryPolicy::default()));
        assert_eq!((dom.clicks, dom.forced), (1, 0));
        assert!(dom.waits.is_empty());
    }

    #[test]
    fn intercepted_click_falls_back_to_script() {
        let mut dom = ScriptedDom { intercept_first: 1, ..Default::default() };
        assert!(attempt_click(&mut dom, &target(), &RetryPolicy::default()));
        assert_eq!((dom.clicks, dom.forced), (1, 1));
    }

    #[test]
    fn always_blocked_stops_after_max_attempts() {
        let mut dom = ScriptedDom { intercept_first: u32::MAX, force_fails: true, ..Default::default() };
        let policy = RetryPolicy::new(3, Duration::from_millis(20));

        assert!(!attempt_click(&mut dom, &target(), &policy));
        assert_eq!(dom.clicks, 3);
        assert_eq!(dom.forced, 3);
        // no pause after the last attempt
        assert_eq!(dom.waits, vec![Duration::from_millis(20); 2]);
    }

    #[test]
    fn zero_attempts_never_touches_the_page() {
        let mut dom = ScriptedDom::default();
        assert!(!attempt_click(&mut dom, &target(), &RetryPolicy::new(0, Duration::ZERO)));
        assert_eq!(dom.clicks, 0);
    }
}
