// tests/common/mod.rs
//! In-memory pages standing in for the live site.
#![allow(dead_code)]

use std::collections::HashMap;
use std::time::Duration;

use uma_scrape::config::options::Timing;
use uma_scrape::core::dom::{DomSource, Element, Locator};
use uma_scrape::core::interact::RetryPolicy;
use uma_scrape::core::session::Session;
use uma_scrape::error::{DomError, DomResult};
use uma_scrape::events::TOOLTIP_LOCATORS;
use uma_scrape::specs::{self, DETAIL_HEADING, SITE_OVERLAYS, races};

/// What a successful click does to the page.
#[derive(Clone, Debug, Default)]
pub enum Action {
    #[default]
    Nothing,
    /// Open a floating layer (tooltip, dialog) on top of the page.
    Show(Box<Node>),
    /// Close the floating layer.
    Hide,
    /// The clicked node leaves the page.
    Dismiss,
}

#[derive(Clone, Debug)]
pub struct Node {
    locators: Vec<Locator>,
    text: String,
    attrs: Vec<(&'static str, String)>,
    visible: bool,
    gone: bool,
    children: Vec<Node>,
    action: Action,
    intercepted: bool,
    force_fails: bool,
    failing: u32,
}

impl Node {
    /// A node no locator matches; used for roots and wrappers.
    pub fn bare() -> Self {
        Self {
            locators: Vec::new(),
            text: String::new(),
            attrs: Vec::new(),
            visible: true,
            gone: false,
            children: Vec::new(),
            action: Action::Nothing,
            intercepted: false,
            force_fails: false,
            failing: 0,
        }
    }

    pub fn new(locator: Locator) -> Self {
        Self { locators: vec![locator], ..Self::bare() }
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn attr(mut self, name: &'static str, value: &str) -> Self {
        self.attrs.push((name, value.to_string()));
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn on_click(mut self, action: Action) -> Self {
        self.action = action;
        self
    }

    /// Native clicks report an overlay on top.
    pub fn intercepted(mut self) -> Self {
        self.intercepted = true;
        self
    }

    /// Scripted clicks fail too.
    pub fn force_fails(mut self) -> Self {
        self.force_fails = true;
        self
    }

    /// The first `n` native clicks fail.
    pub fn failing(mut self, n: u32) -> Self {
        self.failing = n;
        self
    }
}

/// (inside the floating layer, child indices from the page root or layer)
type NodePath = (bool, Vec<usize>);

#[derive(Default)]
pub struct FixtureDom {
    pages: HashMap<String, Node>,
    url: Option<String>,
    layer: Option<Node>,
    pub visited: Vec<String>,
    pub clicks: Vec<String>,
    pub forced: usize,
    pub waits: Vec<Duration>,
}

impl FixtureDom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, root: Node) -> Self {
        self.pages.insert(url.to_string(), root);
        self
    }

    /// Load `root` as the current page without going through `navigate`.
    pub fn showing(root: Node) -> Self {
        let mut dom = Self::new().page("fixture://page", root);
        dom.url = Some("fixture://page".to_string());
        dom
    }

    pub fn layer_open(&self) -> bool {
        self.layer.is_some()
    }

    fn root(&self) -> Option<&Node> {
        self.url.as_ref().and_then(|u| self.pages.get(u))
    }

    fn node(&self, path: &NodePath) -> Option<&Node> {
        let mut node = if path.0 { self.layer.as_ref()? } else { self.root()? };
        for &i in &path.1 {
            node = node.children.get(i)?;
        }
        Some(node)
    }

    fn node_mut(&mut self, path: &NodePath) -> Option<&mut Node> {
        let mut node = if path.0 {
            self.layer.as_mut()?
        } else {
            let url = self.url.clone()?;
            self.pages.get_mut(&url)?
        };
        for &i in &path.1 {
            node = node.children.get_mut(i)?;
        }
        Some(node)
    }

    fn collect(node: &Node, prefix: &mut Vec<usize>, in_layer: bool, locator: Locator, out: &mut Vec<NodePath>) {
        for (i, child) in node.children.iter().enumerate() {
            if child.gone {
                continue;
            }
            prefix.push(i);
            if child.locators.contains(&locator) {
                out.push((in_layer, prefix.clone()));
            }
            Self::collect(child, prefix, in_layer, locator, out);
            prefix.pop();
        }
    }

    fn matches(&self, scope: Option<&NodePath>, locator: Locator) -> Vec<NodePath> {
        let mut out = Vec::new();
        match scope {
            Some(path) => {
                if let Some(node) = self.node(path) {
                    Self::collect(node, &mut path.1.clone(), path.0, locator, &mut out);
                }
            }
            None => {
                if let Some(root) = self.root() {
                    Self::collect(root, &mut Vec::new(), false, locator, &mut out);
                }
                if let Some(layer) = &self.layer {
                    if layer.locators.contains(&locator) {
                        out.push((true, Vec::new()));
                    }
                    Self::collect(layer, &mut Vec::new(), true, locator, &mut out);
                }
            }
        }
        out
    }

    fn resolve(&self, el: &Element) -> DomResult<NodePath> {
        let mut current: Option<NodePath> = None;
        for step in el.steps() {
            let found = self.matches(current.as_ref(), step.locator);
            current = Some(
                found
                    .into_iter()
                    .nth(step.index)
                    .ok_or_else(|| DomError::Detached(el.to_string()))?,
            );
        }
        current.ok_or_else(|| DomError::Detached(el.to_string()))
    }

    fn perform(&mut self, path: &NodePath) {
        let action = match self.node(path) {
            Some(node) => node.action.clone(),
            None => return,
        };
        match action {
            Action::Nothing => {}
            Action::Show(layer) => self.layer = Some(*layer),
            Action::Hide => self.layer = None,
            Action::Dismiss => {
                if let Some(node) = self.node_mut(path) {
                    node.gone = true;
                }
            }
        }
    }
}

impl DomSource for FixtureDom {
    fn navigate(&mut self, url: &str) -> DomResult<()> {
        if !self.pages.contains_key(url) {
            return Err(DomError::Navigation { url: url.to_string(), reason: "no such fixture page".to_string() });
        }
        self.url = Some(url.to_string());
        self.layer = None;
        self.visited.push(url.to_string());
        Ok(())
    }

    fn wait_settle(&mut self, duration: Duration) {
        self.waits.push(duration);
    }

    fn current_url(&self) -> DomResult<String> {
        self.url.clone().ok_or_else(|| DomError::Driver("nothing loaded".to_string()))
    }

    fn count(&self, scope: Option<&Element>, locator: Locator) -> DomResult<usize> {
        let scope = scope.map(|el| self.resolve(el)).transpose()?;
        Ok(self.matches(scope.as_ref(), locator).len())
    }

    fn text(&self, el: &Element) -> DomResult<String> {
        let path = self.resolve(el)?;
        Ok(self.node(&path).map(|n| n.text.clone()).unwrap_or_default())
    }

    fn attribute(&self, el: &Element, name: &str) -> DomResult<Option<String>> {
        let path = self.resolve(el)?;
        Ok(self
            .node(&path)
            .and_then(|n| n.attrs.iter().find(|(k, _)| *k == name).map(|(_, v)| v.clone())))
    }

    fn is_visible(&self, el: &Element) -> DomResult<bool> {
        let path = self.resolve(el)?;
        Ok(self.node(&path).is_some_and(|n| n.visible))
    }

    fn click(&mut self, el: &Element) -> DomResult<()> {
        let path = self.resolve(el)?;
        self.clicks.push(el.to_string());
        let Some(node) = self.node_mut(&path) else {
            return Err(DomError::Detached(el.to_string()));
        };
        if node.failing > 0 {
            node.failing -= 1;
            return Err(DomError::Driver(format!("{el} not interactable")));
        }
        if node.intercepted {
            return Err(DomError::Intercepted(el.to_string()));
        }
        self.perform(&path);
        Ok(())
    }

    fn scroll_into_view(&mut self, el: &Element) -> DomResult<()> {
        self.resolve(el).map(|_| ())
    }

    fn force_click(&mut self, el: &Element) -> DomResult<()> {
        let path = self.resolve(el)?;
        self.forced += 1;
        if self.node(&path).is_some_and(|n| n.force_fails) {
            return Err(DomError::Driver(format!("scripted click on {el} failed")));
        }
        self.perform(&path);
        Ok(())
    }
}

pub fn session(dom: FixtureDom) -> Session<FixtureDom> {
    Session::new(dom, SITE_OVERLAYS, Timing::immediate(), RetryPolicy::new(3, Duration::ZERO))
}

/* ---------------- site pieces ---------------- */

pub fn consent_banner() -> Node {
    Node::new(SITE_OVERLAYS.consent).text("Accept").on_click(Action::Dismiss)
}

pub fn sticky_ad() -> Node {
    Node::new(SITE_OVERLAYS.ad_dismiss).on_click(Action::Dismiss)
}

/// A tooltip with one row per entry of `rows`, each row holding its fragments.
pub fn tooltip(title: &str, rows: &[&[&str]]) -> Node {
    let loc = TOOLTIP_LOCATORS;
    let table_rows = rows.iter().map(|fragments| {
        let option_cell = Node::new(loc.cell).children(fragments.iter().map(|f| Node::new(loc.fragment).text(f)));
        Node::new(loc.row).child(Node::new(loc.cell).text("icon")).child(option_cell)
    });
    Node::new(loc.tooltip)
        .child(Node::new(loc.title).text(title))
        .children(table_rows)
}

pub fn event(tip: Node) -> Node {
    Node::new(TOOLTIP_LOCATORS.event).on_click(Action::Show(Box::new(tip)))
}

/// A character or support card detail page.
pub fn detail_page(heading: &str, events: impl IntoIterator<Item = Node>) -> Node {
    Node::bare()
        .child(Node::new(DETAIL_HEADING).text(heading))
        .children(events)
}

pub fn link(locator: Locator, href: &str) -> Node {
    Node::new(locator).attr("href", href)
}

pub fn grid(locator: Locator, links: impl IntoIterator<Item = Node>) -> Node {
    Node::new(locator).children(links)
}

pub fn skill_row(name: &str, description: &str) -> Node {
    Node::new(specs::skills::ROW)
        .child(Node::new(specs::skills::NAME).text(name))
        .child(Node::new(specs::skills::DESCRIPTION).text(description))
}

/// A race list row whose click opens a detail box with `details`.
pub fn race_row(name: &str, details: &[(&str, &str)]) -> Node {
    let items = details.iter().map(|(caption, value)| {
        Node::new(races::DETAIL_ITEM)
            .child(Node::new(races::DETAIL_CAPTION).text(caption))
            .child(Node::new(races::DETAIL_VALUE).text(value))
    });
    let infobox = Node::new(races::DETAIL_BOX)
        .children(items)
        .child(Node::new(races::DETAIL_CLOSE).on_click(Action::Hide));
    Node::new(races::ROW)
        .child(Node::new(races::NAME).text(name))
        .on_click(Action::Show(Box::new(infobox)))
}

/// Header and footer rows share the race row class but open nothing.
pub fn filler_row(label: &str) -> Node {
    Node::new(races::ROW).child(Node::new(races::NAME).text(label))
}

pub fn race_details(fans: &str) -> [(&'static str, &str); 6] {
    [
        ("Date", "Senior Year Late Dec"),
        ("Grade", "G1"),
        ("Terrain", "Turf"),
        ("Distance (type)", "Long"),
        ("Distance (meters)", "2500m"),
        ("Fans", fans),
    ]
}
