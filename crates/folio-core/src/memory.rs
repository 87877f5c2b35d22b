#![forbid(unsafe_code)]

//! In-memory [`Dom`] for tests and headless hosts.
//!
//! Supports the selector subset the page uses: type, `.class`, `#id`,
//! `[attr]`, `[attr="v"]` and `[attr^="v"]` compounds, joined by commas.
//! Descendant combinators are not supported.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::dom::{Dom, ElementId, Rect};

#[derive(Debug, Clone, Default)]
struct Node {
    tag: String,
    attributes: BTreeMap<String, String>,
    classes: Vec<String>,
    styles: BTreeMap<String, String>,
    text: String,
    value: String,
    disabled: bool,
    checked: bool,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    rect: Option<Rect>,
}

#[derive(Debug, Default)]
struct Tree {
    nodes: Vec<Node>,
    document: Option<ElementId>,
    body: Option<ElementId>,
}

impl Tree {
    fn node(&self, el: ElementId) -> Option<&Node> {
        self.nodes.get(el.get() as usize)
    }

    fn node_mut(&mut self, el: ElementId) -> Option<&mut Node> {
        self.nodes.get_mut(el.get() as usize)
    }

    fn alloc(&mut self, tag: &str) -> ElementId {
        let id = ElementId::new(self.nodes.len() as u32);
        self.nodes.push(Node {
            tag: tag.to_ascii_lowercase(),
            ..Node::default()
        });
        id
    }

    fn detach(&mut self, el: ElementId) {
        let Some(parent) = self.node(el).and_then(|n| n.parent) else {
            return;
        };
        if let Some(p) = self.node_mut(parent) {
            p.children.retain(|&c| c != el);
        }
        if let Some(n) = self.node_mut(el) {
            n.parent = None;
        }
    }

    fn connected(&self, el: ElementId) -> bool {
        let mut cursor = Some(el);
        while let Some(current) = cursor {
            if Some(current) == self.document {
                return true;
            }
            cursor = self.node(current).and_then(|n| n.parent);
        }
        false
    }

    /// Depth-first, document order, excluding `start` itself.
    fn descendants(&self, start: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = self
            .node(start)
            .map(|n| n.children.iter().rev().copied().collect())
            .unwrap_or_default();
        while let Some(el) = stack.pop() {
            out.push(el);
            if let Some(n) = self.node(el) {
                stack.extend(n.children.iter().rev().copied());
            }
        }
        out
    }
}

/// Cheaply clonable handle to a shared in-memory document.
#[derive(Debug, Clone)]
pub struct MemoryDom {
    tree: Rc<RefCell<Tree>>,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    /// Create a document containing `<html><head></head><body></body></html>`.
    #[must_use]
    pub fn new() -> Self {
        let mut tree = Tree::default();
        let html = tree.alloc("html");
        let head = tree.alloc("head");
        let body = tree.alloc("body");
        tree.document = Some(html);
        tree.body = Some(body);
        for child in [head, body] {
            if let Some(n) = tree.node_mut(child) {
                n.parent = Some(html);
            }
        }
        if let Some(n) = tree.node_mut(html) {
            n.children.extend([head, body]);
        }
        Self {
            tree: Rc::new(RefCell::new(tree)),
        }
    }

    /// Build an element and append it under `parent` (the body when `None`).
    pub fn element(&self, tag: &str) -> ElementBuilder<'_> {
        let id = self.tree.borrow_mut().alloc(tag);
        ElementBuilder { dom: self, id }
    }

    /// Place an element at a viewport-relative rectangle.
    pub fn set_rect(&self, el: ElementId, rect: Rect) {
        if let Some(n) = self.tree.borrow_mut().node_mut(el) {
            n.rect = Some(rect);
        }
    }

    /// Shift every laid-out element vertically, emulating a page scroll of `dy`.
    pub fn scroll_by(&self, dy: f64) {
        let mut tree = self.tree.borrow_mut();
        for node in &mut tree.nodes {
            if let Some(rect) = node.rect.as_mut() {
                rect.y -= dy;
            }
        }
    }

    #[must_use]
    pub fn tag(&self, el: ElementId) -> Option<String> {
        self.tree.borrow().node(el).map(|n| n.tag.clone())
    }

    #[must_use]
    pub fn children(&self, el: ElementId) -> Vec<ElementId> {
        self.tree
            .borrow()
            .node(el)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn class_name(&self, el: ElementId) -> String {
        self.tree
            .borrow()
            .node(el)
            .map(|n| n.classes.join(" "))
            .unwrap_or_default()
    }

    fn with_node<R>(&self, el: ElementId, f: impl FnOnce(&Node) -> R) -> Option<R> {
        self.tree.borrow().node(el).map(f)
    }

    fn update(&self, el: ElementId, f: impl FnOnce(&mut Node)) {
        if let Some(n) = self.tree.borrow_mut().node_mut(el) {
            f(n);
        }
    }

    fn matches(&self, el: ElementId, selector: &str) -> bool {
        let tree = self.tree.borrow();
        let Some(node) = tree.node(el) else {
            return false;
        };
        selector
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .any(|compound| Compound::parse(compound).is_some_and(|c| c.matches(node)))
    }
}

/// Fluent setup for one [`MemoryDom`] element.
pub struct ElementBuilder<'a> {
    dom: &'a MemoryDom,
    id: ElementId,
}

impl ElementBuilder<'_> {
    #[must_use]
    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    #[must_use]
    pub fn class(self, class: &str) -> Self {
        self.dom.add_class(self.id, class);
        self
    }

    #[must_use]
    pub fn attr(self, name: &str, value: &str) -> Self {
        self.dom.set_attribute(self.id, name, value);
        self
    }

    #[must_use]
    pub fn text(self, text: &str) -> Self {
        self.dom.set_text(self.id, text);
        self
    }

    #[must_use]
    pub fn value(self, value: &str) -> Self {
        self.dom.set_value(self.id, value);
        self
    }

    #[must_use]
    pub fn rect(self, rect: Rect) -> Self {
        self.dom.set_rect(self.id, rect);
        self
    }

    /// Append under the body.
    pub fn append(self) -> ElementId {
        if let Some(body) = self.dom.body() {
            self.dom.append_child(body, self.id);
        }
        self.id
    }

    /// Append under `parent`.
    pub fn append_to(self, parent: ElementId) -> ElementId {
        self.dom.append_child(parent, self.id);
        self.id
    }
}

#[derive(Debug)]
enum AttrTest {
    Present,
    Equals(String),
    Prefix(String),
}

#[derive(Debug, Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, AttrTest)>,
}

impl Compound {
    fn parse(src: &str) -> Option<Self> {
        let mut out = Self::default();
        let mut rest = src;

        let tag_end = rest.find(['.', '#', '[']).unwrap_or(rest.len());
        if tag_end > 0 {
            out.tag = Some(rest[..tag_end].to_ascii_lowercase());
        }
        rest = &rest[tag_end..];

        while let Some(first) = rest.chars().next() {
            match first {
                '.' | '#' => {
                    let body = &rest[1..];
                    let end = body.find(['.', '#', '[']).unwrap_or(body.len());
                    let name = body[..end].to_string();
                    if first == '.' {
                        out.classes.push(name);
                    } else {
                        out.id = Some(name);
                    }
                    rest = &body[end..];
                }
                '[' => {
                    let close = rest.find(']')?;
                    out.attrs.push(parse_attr(&rest[1..close])?);
                    rest = &rest[close + 1..];
                }
                _ => return None,
            }
        }
        Some(out)
    }

    fn matches(&self, node: &Node) -> bool {
        if self.tag.as_ref().is_some_and(|t| *t != node.tag) {
            return false;
        }
        if self
            .id
            .as_ref()
            .is_some_and(|id| node.attributes.get("id") != Some(id))
        {
            return false;
        }
        if !self.classes.iter().all(|c| node.classes.contains(c)) {
            return false;
        }
        self.attrs.iter().all(|(name, test)| {
            let Some(value) = node.attributes.get(name) else {
                return false;
            };
            match test {
                AttrTest::Present => true,
                AttrTest::Equals(expected) => value == expected,
                AttrTest::Prefix(prefix) => value.starts_with(prefix.as_str()),
            }
        })
    }
}

fn parse_attr(src: &str) -> Option<(String, AttrTest)> {
    let unquote = |v: &str| v.trim().trim_matches('"').trim_matches('\'').to_string();
    if let Some((name, value)) = src.split_once("^=") {
        return Some((name.trim().to_string(), AttrTest::Prefix(unquote(value))));
    }
    if let Some((name, value)) = src.split_once('=') {
        return Some((name.trim().to_string(), AttrTest::Equals(unquote(value))));
    }
    let name = src.trim();
    (!name.is_empty()).then(|| (name.to_string(), AttrTest::Present))
}

impl Dom for MemoryDom {
    fn query_all(&self, selector: &str) -> Vec<ElementId> {
        let Some(document) = self.tree.borrow().document else {
            return Vec::new();
        };
        let candidates = self.tree.borrow().descendants(document);
        candidates
            .into_iter()
            .filter(|&el| self.matches(el, selector))
            .collect()
    }

    fn query_within(&self, parent: ElementId, selector: &str) -> Option<ElementId> {
        let candidates = self.tree.borrow().descendants(parent);
        candidates.into_iter().find(|&el| self.matches(el, selector))
    }

    fn by_id(&self, id: &str) -> Option<ElementId> {
        let Some(document) = self.tree.borrow().document else {
            return None;
        };
        let candidates = self.tree.borrow().descendants(document);
        candidates.into_iter().find(|&el| {
            self.with_node(el, |n| n.attributes.get("id").map(String::as_str) == Some(id))
                .unwrap_or(false)
        })
    }

    fn body(&self) -> Option<ElementId> {
        self.tree.borrow().body
    }

    fn root(&self) -> Option<ElementId> {
        self.tree.borrow().document
    }

    fn attribute(&self, el: ElementId, name: &str) -> Option<String> {
        self.with_node(el, |n| n.attributes.get(name).cloned()).flatten()
    }

    fn set_attribute(&self, el: ElementId, name: &str, value: &str) {
        if name == "class" {
            self.set_class_name(el, value);
            return;
        }
        self.update(el, |n| {
            n.attributes.insert(name.to_string(), value.to_string());
        });
    }

    fn remove_attribute(&self, el: ElementId, name: &str) {
        self.update(el, |n| {
            n.attributes.remove(name);
        });
    }

    fn has_class(&self, el: ElementId, class: &str) -> bool {
        self.with_node(el, |n| n.classes.iter().any(|c| c == class))
            .unwrap_or(false)
    }

    fn add_class(&self, el: ElementId, class: &str) {
        self.update(el, |n| {
            if !n.classes.iter().any(|c| c == class) {
                n.classes.push(class.to_string());
            }
        });
    }

    fn remove_class(&self, el: ElementId, class: &str) {
        self.update(el, |n| n.classes.retain(|c| c != class));
    }

    fn set_class_name(&self, el: ElementId, value: &str) {
        self.update(el, |n| {
            n.classes = value.split_whitespace().map(str::to_string).collect();
        });
    }

    fn style(&self, el: ElementId, property: &str) -> Option<String> {
        self.with_node(el, |n| n.styles.get(property).cloned())
            .flatten()
    }

    fn set_style(&self, el: ElementId, property: &str, value: &str) {
        self.update(el, |n| {
            if value.is_empty() {
                n.styles.remove(property);
            } else {
                n.styles.insert(property.to_string(), value.to_string());
            }
        });
    }

    fn text(&self, el: ElementId) -> String {
        self.with_node(el, |n| n.text.clone()).unwrap_or_default()
    }

    fn set_text(&self, el: ElementId, text: &str) {
        self.update(el, |n| n.text = text.to_string());
    }

    fn value(&self, el: ElementId) -> String {
        self.with_node(el, |n| n.value.clone()).unwrap_or_default()
    }

    fn set_value(&self, el: ElementId, value: &str) {
        self.update(el, |n| n.value = value.to_string());
    }

    fn is_disabled(&self, el: ElementId) -> bool {
        self.with_node(el, |n| n.disabled).unwrap_or(false)
    }

    fn set_disabled(&self, el: ElementId, disabled: bool) {
        self.update(el, |n| n.disabled = disabled);
    }

    fn is_checked(&self, el: ElementId) -> bool {
        self.with_node(el, |n| n.checked).unwrap_or(false)
    }

    fn set_checked(&self, el: ElementId, checked: bool) {
        self.update(el, |n| n.checked = checked);
    }

    fn create_element(&self, tag: &str) -> ElementId {
        self.tree.borrow_mut().alloc(tag)
    }

    fn append_child(&self, parent: ElementId, child: ElementId) {
        let mut tree = self.tree.borrow_mut();
        if tree.node(parent).is_none() || tree.node(child).is_none() || parent == child {
            return;
        }
        tree.detach(child);
        if let Some(p) = tree.node_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = tree.node_mut(child) {
            c.parent = Some(parent);
        }
    }

    fn remove(&self, el: ElementId) {
        self.tree.borrow_mut().detach(el);
    }

    fn is_connected(&self, el: ElementId) -> bool {
        self.tree.borrow().connected(el)
    }

    fn bounding_rect(&self, el: ElementId) -> Option<Rect> {
        let tree = self.tree.borrow();
        if !tree.connected(el) {
            return None;
        }
        tree.node(el).and_then(|n| n.rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn query_all_matches_class_lists_in_document_order() {
        let dom = MemoryDom::new();
        let a = dom.element("div").class("project-card").append();
        let b = dom.element("div").class("stat-item").append();
        let _c = dom.element("div").class("other").append();
        let d = dom.element("div").class("project-card").append_to(b);

        let found = dom.query_all(".project-card, .stat-item");
        assert_eq!(found, vec![a, b, d]);
    }

    #[test]
    fn attribute_prefix_selector_matches_mailto_links() {
        let dom = MemoryDom::new();
        let mail = dom
            .element("a")
            .attr("href", "mailto:me@example.com")
            .append();
        let _web = dom.element("a").attr("href", "https://example.com").append();

        assert_eq!(dom.query_all("a[href^=\"mailto:\"]"), vec![mail]);
    }

    #[test]
    fn named_field_lookup_within_form() {
        let dom = MemoryDom::new();
        let form = dom.element("form").id("contact-form").append();
        let field = dom
            .element("input")
            .attr("name", "from_name")
            .append_to(form);

        assert_eq!(dom.by_id("contact-form"), Some(form));
        assert_eq!(dom.query_within(form, "[name=\"from_name\"]"), Some(field));
        assert_eq!(dom.query_within(form, "[name=\"message\"]"), None);
    }

    #[test]
    fn detached_elements_lose_geometry_and_connection() {
        let dom = MemoryDom::new();
        let el = dom
            .element("div")
            .rect(Rect::new(0.0, 0.0, 10.0, 10.0))
            .append();
        assert!(dom.is_connected(el));
        assert!(dom.bounding_rect(el).is_some());

        dom.remove(el);
        assert!(!dom.is_connected(el));
        assert_eq!(dom.bounding_rect(el), None);
    }

    #[test]
    fn empty_style_value_removes_property() {
        let dom = MemoryDom::new();
        let el = dom.element("div").append();
        dom.set_style(el, "transition", "opacity 1s");
        assert_eq!(dom.style(el, "transition").as_deref(), Some("opacity 1s"));
        dom.set_style(el, "transition", "");
        assert_eq!(dom.style(el, "transition"), None);
    }

    #[test]
    fn scroll_by_shifts_rects_up() {
        let dom = MemoryDom::new();
        let el = dom
            .element("section")
            .rect(Rect::new(0.0, 900.0, 800.0, 400.0))
            .append();
        dom.scroll_by(300.0);
        assert_eq!(dom.bounding_rect(el).map(|r| r.y), Some(600.0));
    }
}
