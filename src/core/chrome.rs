// src/core/chrome.rs
//! [`DomSource`] backed by a headless Chromium.
//!
//! Handles are resolved from scratch on every call, so a node the site
//! re-rendered since the last lookup is found again rather than going stale.
//! The whole `(locator, index)` path is walked page-side in one evaluation,
//! with each locator scoped to the previous match.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use headless_chrome::protocol::cdp::DOM;
use headless_chrome::protocol::cdp::Runtime::{RemoteObject, RemoteObjectSubtype};
use headless_chrome::{Browser, Element as ChromeElement, LaunchOptions, Tab};
use serde_json::{Value, json};

use crate::config::consts::{BROWSER_IDLE_TIMEOUT_SECS, WINDOW_SIZE};
use crate::core::dom::{DomSource, Element, Locator, Step};
use crate::error::{DomError, DomResult};

// Walks `steps` from the document, each locator scoped to the previous match.
// Yields the matches of the last step, or null once an index runs past the end.
const JS_WALK: &str = r#"function walk(steps) {
    const all = (scope, kind, q) => {
        if (kind === 'css') return Array.from(scope.querySelectorAll(q));
        const r = document.evaluate(q, scope, null, XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null);
        const out = [];
        for (let k = 0; k < r.snapshotLength; k++) out.push(r.snapshotItem(k));
        return out;
    };
    let scope = document;
    let found = [];
    for (const [kind, q, i] of steps) {
        found = all(scope, kind, q);
        if (i === null) return found;
        if (i >= found.length) return null;
        scope = found[i];
    }
    return scope;
}"#;

const JS_IS_VISIBLE: &str = r#"function() {
    const s = window.getComputedStyle(this);
    if (s.display === 'none' || s.visibility === 'hidden') return false;
    return !!(this.offsetWidth || this.offsetHeight || this.getClientRects().length);
}"#;

// true when the element (or a descendant) is what a click at its centre would hit
const JS_HIT_TEST: &str = r#"function() {
    const r = this.getBoundingClientRect();
    const hit = document.elementFromPoint(r.left + r.width / 2, r.top + r.height / 2);
    return hit === null || hit === this || this.contains(hit);
}"#;

const JS_FORCE_CLICK: &str = "function() { this.click(); return true; }";

// Properties first so `href` comes back absolute.
const JS_ATTRIBUTE: &str = r#"function(name) {
    const v = this[name];
    if (typeof v === 'string') return v;
    return this.getAttribute(name);
}"#;

pub struct ChromeDom {
    // Kept alive for the tab; dropping it terminates the process.
    _browser: Browser,
    tab: Arc<Tab>,
}

/// `[kind, query, index]` triples for [`JS_WALK`]. A `None` index asks for
/// every match of that step.
fn walk_steps(steps: &[Step], last: Option<Locator>) -> Value {
    let mut out: Vec<Value> = steps.iter().map(|s| step_json(s.locator, Some(s.index))).collect();
    if let Some(locator) = last {
        out.push(step_json(locator, None));
    }
    Value::Array(out)
}

fn step_json(locator: Locator, index: Option<usize>) -> Value {
    let kind = match locator {
        Locator::Css(_) => "css",
        Locator::XPath(_) => "xpath",
    };
    json!([kind, locator.query(), index])
}

fn driver(e: anyhow::Error) -> DomError {
    DomError::Driver(e.to_string())
}

impl ChromeDom {
    pub fn launch(headless: bool) -> DomResult<Self> {
        let options = LaunchOptions::default_builder()
            .headless(headless)
            .window_size(Some(WINDOW_SIZE))
            .idle_browser_timeout(Duration::from_secs(BROWSER_IDLE_TIMEOUT_SECS))
            .build()
            .map_err(|e| DomError::Launch(e.to_string()))?;
        let browser = Browser::new(options).map_err(|e| DomError::Launch(e.to_string()))?;
        let tab = browser.new_tab().map_err(|e| DomError::Launch(e.to_string()))?;
        logd!("Browser launched (headless={headless})");
        Ok(Self { _browser: browser, tab })
    }

    fn walk(&self, steps: Value) -> DomResult<RemoteObject> {
        let expression = format!("({JS_WALK})({steps})");
        self.tab.evaluate(&expression, false).map_err(driver)
    }

    /// Resolve `el` to a live node of the current document.
    fn resolve(&self, el: &Element) -> DomResult<ChromeElement<'_>> {
        let found = self.walk(walk_steps(el.steps(), None))?;
        let object_id = match (found.subtype, found.object_id) {
            (Some(RemoteObjectSubtype::Null), _) | (_, None) => return Err(DomError::Detached(el.to_string())),
            (_, Some(id)) => id,
        };
        // requestNode only answers once the document has been handed out
        self.tab.get_document().map_err(driver)?;
        let node_id = self.tab.call_method(DOM::RequestNode { object_id }).map_err(driver)?.node_id;
        ChromeElement::new(&self.tab, node_id).map_err(|_| DomError::Detached(el.to_string()))
    }

    fn call_js(&self, el: &Element, func: &str, args: Vec<Value>) -> DomResult<Option<Value>> {
        let node = self.resolve(el)?;
        let remote = node.call_js_fn(func, args, false).map_err(driver)?;
        Ok(remote.value)
    }
}

impl DomSource for ChromeDom {
    fn navigate(&mut self, url: &str) -> DomResult<()> {
        self.tab
            .navigate_to(url)
            .and_then(|tab| tab.wait_until_navigated())
            .map(|_| ())
            .map_err(|e| DomError::Navigation { url: url.to_string(), reason: e.to_string() })
    }

    fn wait_settle(&mut self, duration: Duration) {
        if !duration.is_zero() {
            thread::sleep(duration);
        }
    }

    fn current_url(&self) -> DomResult<String> {
        Ok(self.tab.get_url())
    }

    fn count(&self, scope: Option<&Element>, locator: Locator) -> DomResult<usize> {
        let steps = walk_steps(scope.map(Element::steps).unwrap_or_default(), Some(locator));
        // -1 when the scope itself no longer resolves
        let expression = format!("(() => {{ const f = ({JS_WALK})({steps}); return f === null ? -1 : f.length; }})()");
        let length = self
            .tab
            .evaluate(&expression, false)
            .map_err(driver)?
            .value
            .and_then(|v| v.as_i64())
            .unwrap_or(0);
        match (usize::try_from(length), scope) {
            (Ok(n), _) => Ok(n),
            (Err(_), Some(parent)) => Err(DomError::Detached(parent.to_string())),
            (Err(_), None) => Ok(0),
        }
    }

    fn text(&self, el: &Element) -> DomResult<String> {
        self.resolve(el)?
            .get_inner_text()
            .map_err(driver)
    }

    fn attribute(&self, el: &Element, name: &str) -> DomResult<Option<String>> {
        let value = self.call_js(el, JS_ATTRIBUTE, vec![Value::String(name.to_string())])?;
        Ok(value.and_then(|v| v.as_str().map(str::to_string)))
    }

    fn is_visible(&self, el: &Element) -> DomResult<bool> {
        let value = self.call_js(el, JS_IS_VISIBLE, Vec::new())?;
        Ok(value.and_then(|v| v.as_bool()).unwrap_or(false))
    }

    fn click(&mut self, el: &Element) -> DomResult<()> {
        let node = self.resolve(el)?;
        node.scroll_into_view().map_err(driver)?;
        let reachable = node
            .call_js_fn(JS_HIT_TEST, Vec::new(), false)
            .map_err(driver)?
            .value
            .and_then(|v| v.as_bool())
            .unwrap_or(true);
        if !reachable {
            return Err(DomError::Intercepted(el.to_string()));
        }
        node.click().map(|_| ()).map_err(driver)
    }

    fn scroll_into_view(&mut self, el: &Element) -> DomResult<()> {
        self.resolve(el)?
            .scroll_into_view()
            .map(|_| ())
            .map_err(driver)
    }

    fn force_click(&mut self, el: &Element) -> DomResult<()> {
        self.call_js(el, JS_FORCE_CLICK, Vec::new()).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::session::Session;
    use crate::specs::DETAIL_HEADING;

    // Type-checks the browser backend through the same generic bounds the
    // scrapers use; launching a real browser is left to the binary.
    fn heading_and_children<D: DomSource>(session: &mut Session<D>) -> DomResult<(Option<String>, usize)> {
        let heading = session.dom.text_of(DETAIL_HEADING)?;
        let mut nested = 0;
        if let Some(root) = session.dom.find_one(DETAIL_HEADING)? {
            nested = session.dom.find_all_within(&root, Locator::Css("span"))?.len();
            session.dom.scroll_into_view(&root)?;
            session.dom.force_click(&root)?;
            let _ = session.click(&root);
        }
        Ok((heading, nested))
    }

    #[test]
    fn chrome_backend_satisfies_the_scraper_bounds() {
        fn is_dom_source<D: DomSource>() {}
        is_dom_source::<ChromeDom>();

        let walk: fn(&mut Session<ChromeDom>) -> DomResult<(Option<String>, usize)> = heading_and_children;
        let _ = walk;
    }
}
