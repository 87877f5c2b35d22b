#![forbid(unsafe_code)]

//! Element capabilities consumed by every page behavior.
//!
//! Components never reach for a global document. They receive a [`Dom`]
//! implementation and address elements through opaque [`ElementId`]
//! handles, so the same logic runs against the browser (`folio-web`) and
//! against [`crate::memory::MemoryDom`] in tests.
//!
//! All methods take `&self`: browser element handles are shared references
//! and the in-memory fake uses interior mutability. Operations on an
//! element that no longer exists are silently ignored, matching how the
//! page script treated detached nodes.

use std::fmt;

/// Opaque handle to one element of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u32);

impl ElementId {
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Axis-aligned rectangle in CSS pixels, relative to the viewport origin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Overlap of two rectangles, or `None` when they do not touch.
    ///
    /// Edge-adjacent rectangles intersect with zero area.
    #[must_use]
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right < left || bottom < top {
            return None;
        }
        Some(Rect::new(left, top, right - left, bottom - top))
    }
}

/// Capability set over the page's elements.
pub trait Dom {
    /// All elements matching a CSS selector, in document order.
    fn query_all(&self, selector: &str) -> Vec<ElementId>;

    /// First element matching a CSS selector.
    fn query(&self, selector: &str) -> Option<ElementId> {
        self.query_all(selector).into_iter().next()
    }

    /// First descendant of `parent` matching a CSS selector.
    fn query_within(&self, parent: ElementId, selector: &str) -> Option<ElementId>;

    fn by_id(&self, id: &str) -> Option<ElementId>;

    /// The `<body>` element.
    fn body(&self) -> Option<ElementId>;

    /// The document root (`<html>`) element.
    fn root(&self) -> Option<ElementId>;

    /// The `<head>` element.
    fn head(&self) -> Option<ElementId> {
        self.query("head")
    }

    fn attribute(&self, el: ElementId, name: &str) -> Option<String>;
    fn set_attribute(&self, el: ElementId, name: &str, value: &str);
    fn remove_attribute(&self, el: ElementId, name: &str);

    fn has_class(&self, el: ElementId, class: &str) -> bool;
    fn add_class(&self, el: ElementId, class: &str);
    fn remove_class(&self, el: ElementId, class: &str);
    /// Replace the whole class list.
    fn set_class_name(&self, el: ElementId, value: &str);

    /// Toggle a class; returns whether it is now present.
    fn toggle_class(&self, el: ElementId, class: &str) -> bool {
        if self.has_class(el, class) {
            self.remove_class(el, class);
            false
        } else {
            self.add_class(el, class);
            true
        }
    }

    /// Inline style property (CSS property name, custom properties allowed).
    fn style(&self, el: ElementId, property: &str) -> Option<String>;
    /// Set an inline style property. An empty value removes it.
    fn set_style(&self, el: ElementId, property: &str, value: &str);

    fn text(&self, el: ElementId) -> String;
    fn set_text(&self, el: ElementId, text: &str);

    /// Current value of a form control.
    fn value(&self, el: ElementId) -> String;
    fn set_value(&self, el: ElementId, value: &str);

    fn is_disabled(&self, el: ElementId) -> bool;
    fn set_disabled(&self, el: ElementId, disabled: bool);

    fn is_checked(&self, el: ElementId) -> bool;
    fn set_checked(&self, el: ElementId, checked: bool);

    /// Create a detached element.
    fn create_element(&self, tag: &str) -> ElementId;
    fn append_child(&self, parent: ElementId, child: ElementId);
    /// Detach an element from its parent.
    fn remove(&self, el: ElementId);
    /// Whether the element is attached to the document.
    fn is_connected(&self, el: ElementId) -> bool;

    /// Border box relative to the viewport.
    fn bounding_rect(&self, el: ElementId) -> Option<Rect>;

    /// `(clientWidth, clientHeight)`.
    fn client_size(&self, el: ElementId) -> (f64, f64) {
        self.bounding_rect(el)
            .map_or((0.0, 0.0), |rect| (rect.width, rect.height))
    }
}

/// Selectors and ids of the page markup contract.
pub mod selectors {
    pub const THEME_SWITCH_ID: &str = "theme-switch";
    pub const NAV: &str = ".nav";
    pub const NAV_LINK: &str = ".nav-link";
    pub const NAV_MENU: &str = ".nav-menu";
    pub const NAV_HAMBURGER: &str = ".nav-hamburger";
    pub const SECTION: &str = "section";
    pub const REVEAL_SET: &str = ".project-card, .skill-category, .contact-item, .stat-item";
    pub const COUNTER: &str = ".stat-number";
    pub const SKILL_BAR: &str = ".skill-progress";
    pub const CONTACT_FORM_ID: &str = "contact-form";
    pub const SUBMIT_BUTTON_ID: &str = "submit-btn";
    pub const FORM_STATUS_ID: &str = "form-status";
    pub const FLOATING_ELEMENT: &str = ".floating-element";
    pub const ORBIT_ITEM: &str = ".orbit-item";
    pub const HERO_TEXT: &str = ".hero-text";
    pub const HERO_VISUAL: &str = ".hero-visual";
    pub const TITLE_NAME: &str = ".title-name";
    pub const MAILTO_LINK: &str = "a[href^=\"mailto:\"]";

    pub const COUNTER_CLASS: &str = "stat-number";
    pub const SKILL_BAR_CLASS: &str = "skill-progress";
    pub const BUTTON_CLASS: &str = "btn";
    pub const RIPPLE_CLASS: &str = "ripple";
    pub const ACTIVE_CLASS: &str = "active";
    pub const MOBILE_ACTIVE_CLASS: &str = "mobile-active";
    pub const SCROLLED_CLASS: &str = "scrolled";
    pub const LOADED_CLASS: &str = "loaded";

    pub const DATA_TARGET: &str = "data-target";
    pub const DATA_PROGRESS: &str = "data-progress";
    pub const DATA_THEME: &str = "data-theme";
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn intersection_of_overlapping_rects() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(50.0, 80.0, 100.0, 100.0);
        assert_eq!(a.intersection(&b), Some(Rect::new(50.0, 80.0, 50.0, 20.0)));
    }

    #[test]
    fn edge_adjacent_rects_touch_with_zero_area() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(0.0, 10.0, 10.0, 10.0);
        let touch = a.intersection(&b).expect("edges touch");
        assert_eq!(touch.area(), 0.0);
    }

    #[test]
    fn disjoint_rects_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(0.0, 10.5, 10.0, 10.0);
        assert_eq!(a.intersection(&b), None);
    }

    #[test]
    fn element_id_displays_with_hash() {
        assert_eq!(ElementId::new(42).to_string(), "#42");
    }
}
