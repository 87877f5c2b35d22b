#![forbid(unsafe_code)]

//! Navigation: in-page link scrolling, active-link tracking and the mobile
//! menu.
//!
//! Geometry arrives viewport-relative from [`Dom::bounding_rect`]; document
//! positions are recovered by adding the current scroll offset.

use crate::config::NavConfig;
use crate::dom::{Dom, ElementId, selectors};

/// Document offset to scroll to so a section starts just below the fixed nav.
#[must_use]
pub fn scroll_target(section_top: f64, scroll_y: f64, nav_height: f64) -> f64 {
    section_top + scroll_y - nav_height
}

/// A section's document-space vertical extent.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionSpan {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

impl SectionSpan {
    #[must_use]
    pub fn contains(&self, y: f64) -> bool {
        y >= self.top && y < self.top + self.height
    }
}

/// Id of the section containing `probe`. When spans overlap, the last one in
/// document order wins.
#[must_use]
pub fn active_section(spans: &[SectionSpan], probe: f64) -> Option<&str> {
    spans
        .iter()
        .rev()
        .find(|span| span.contains(probe))
        .map(|span| span.id.as_str())
}

/// Fragment target of a link: `#about` yields `about`.
#[must_use]
pub fn fragment(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

/// The page's navigation bar.
#[derive(Debug, Clone)]
pub struct Navigation {
    config: NavConfig,
    nav: Option<ElementId>,
    links: Vec<ElementId>,
    menu: Option<ElementId>,
    hamburger: Option<ElementId>,
    sections: Vec<ElementId>,
}

impl Navigation {
    pub fn bind<D: Dom + ?Sized>(dom: &D, config: NavConfig) -> Self {
        let nav = Self {
            config,
            nav: dom.query(selectors::NAV),
            links: dom.query_all(selectors::NAV_LINK),
            menu: dom.query(selectors::NAV_MENU),
            hamburger: dom.query(selectors::NAV_HAMBURGER),
            sections: dom.query_all(selectors::SECTION),
        };
        tracing::debug!(
            target: "folio.nav",
            links = nav.links.len(),
            sections = nav.sections.len(),
            has_hamburger = nav.hamburger.is_some(),
            "navigation bound"
        );
        nav
    }

    #[must_use]
    pub fn links(&self) -> &[ElementId] {
        &self.links
    }

    #[must_use]
    pub const fn hamburger(&self) -> Option<ElementId> {
        self.hamburger
    }

    /// Handle a click on a nav link.
    ///
    /// Returns the document offset the host should smooth-scroll to, or
    /// `None` when the link does not point at a section on this page.
    pub fn on_link_click<D: Dom + ?Sized>(&self, dom: &D, link: ElementId, scroll_y: f64) -> Option<f64> {
        let href = dom.attribute(link, "href")?;
        let section = fragment(&href).and_then(|id| dom.by_id(id))?;
        let top = dom.bounding_rect(section)?.y;
        let nav_height = self
            .nav
            .and_then(|nav| dom.bounding_rect(nav))
            .map_or(0.0, |rect| rect.height);

        self.set_active_link(dom, link);
        self.close_menu(dom);

        let target = scroll_target(top, scroll_y, nav_height);
        tracing::debug!(target: "folio.nav", href = %href, target, "nav link scroll");
        Some(target)
    }

    /// Toggle the mobile menu. Returns whether it is now open.
    pub fn toggle_menu<D: Dom + ?Sized>(&self, dom: &D) -> bool {
        let (Some(menu), Some(hamburger)) = (self.menu, self.hamburger) else {
            return false;
        };
        dom.toggle_class(hamburger, selectors::ACTIVE_CLASS);
        dom.toggle_class(menu, selectors::MOBILE_ACTIVE_CLASS)
    }

    pub fn close_menu<D: Dom + ?Sized>(&self, dom: &D) {
        if let Some(menu) = self.menu {
            dom.remove_class(menu, selectors::MOBILE_ACTIVE_CLASS);
        }
        if let Some(hamburger) = self.hamburger {
            dom.remove_class(hamburger, selectors::ACTIVE_CLASS);
        }
    }

    /// Mark `active` as the only active link.
    pub fn set_active_link<D: Dom + ?Sized>(&self, dom: &D, active: ElementId) {
        for &link in &self.links {
            dom.remove_class(link, selectors::ACTIVE_CLASS);
        }
        dom.add_class(active, selectors::ACTIVE_CLASS);
    }

    /// Highlight the link of the section under `scroll_y + probe`.
    ///
    /// Returns the active section id.
    pub fn update_active<D: Dom + ?Sized>(&self, dom: &D, scroll_y: f64) -> Option<String> {
        let spans: Vec<SectionSpan> = self
            .sections
            .iter()
            .filter_map(|&section| {
                let id = dom.attribute(section, "id")?;
                let rect = dom.bounding_rect(section)?;
                Some(SectionSpan {
                    id,
                    top: rect.y + scroll_y,
                    height: rect.height,
                })
            })
            .collect();
        let current = active_section(&spans, scroll_y + self.config.active_probe_px).map(str::to_string);

        for &link in &self.links {
            let matches = current.as_deref().is_some_and(|id| {
                dom.attribute(link, "href")
                    .and_then(|href| fragment(&href).map(|f| f == id))
                    .unwrap_or(false)
            });
            if matches {
                dom.add_class(link, selectors::ACTIVE_CLASS);
            } else {
                dom.remove_class(link, selectors::ACTIVE_CLASS);
            }
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Rect;
    use crate::memory::MemoryDom;

    use pretty_assertions::assert_eq;

    struct Page {
        dom: MemoryDom,
        about: ElementId,
        work: ElementId,
        menu: ElementId,
        hamburger: ElementId,
    }

    fn page() -> Page {
        let dom = MemoryDom::new();
        let nav = dom
            .element("nav")
            .class("nav")
            .rect(Rect::new(0.0, 0.0, 1200.0, 70.0))
            .append();
        let menu = dom.element("ul").class("nav-menu").append_to(nav);
        let about = dom
            .element("a")
            .class("nav-link")
            .attr("href", "#about")
            .append_to(menu);
        let work = dom
            .element("a")
            .class("nav-link")
            .attr("href", "#work")
            .append_to(menu);
        let hamburger = dom.element("div").class("nav-hamburger").append_to(nav);
        dom.element("section")
            .id("about")
            .rect(Rect::new(0.0, 0.0, 1200.0, 800.0))
            .append();
        dom.element("section")
            .id("work")
            .rect(Rect::new(0.0, 800.0, 1200.0, 600.0))
            .append();
        Page {
            dom,
            about,
            work,
            menu,
            hamburger,
        }
    }

    #[test]
    fn link_click_targets_section_below_nav() {
        let p = page();
        let nav = Navigation::bind(&p.dom, NavConfig::default());
        p.dom.add_class(p.menu, "mobile-active");
        p.dom.add_class(p.hamburger, "active");

        assert_eq!(nav.on_link_click(&p.dom, p.work, 0.0), Some(730.0));
        assert!(p.dom.has_class(p.work, "active"));
        assert!(!p.dom.has_class(p.about, "active"));
        assert!(!p.dom.has_class(p.menu, "mobile-active"));
        assert!(!p.dom.has_class(p.hamburger, "active"));
    }

    #[test]
    fn link_to_missing_section_does_nothing() {
        let p = page();
        let broken = p
            .dom
            .element("a")
            .class("nav-link")
            .attr("href", "#nowhere")
            .append();
        let nav = Navigation::bind(&p.dom, NavConfig::default());
        assert_eq!(nav.on_link_click(&p.dom, broken, 0.0), None);
        assert!(!p.dom.has_class(broken, "active"));
    }

    #[test]
    fn hamburger_toggles_both_classes() {
        let p = page();
        let nav = Navigation::bind(&p.dom, NavConfig::default());
        assert!(nav.toggle_menu(&p.dom));
        assert!(p.dom.has_class(p.hamburger, "active"));
        assert!(!nav.toggle_menu(&p.dom));
        assert!(!p.dom.has_class(p.menu, "mobile-active"));
    }

    #[test]
    fn active_link_follows_probe_below_scroll_top() {
        let p = page();
        let nav = Navigation::bind(&p.dom, NavConfig::default());
        assert_eq!(nav.update_active(&p.dom, 0.0).as_deref(), Some("about"));
        assert!(p.dom.has_class(p.about, "active"));

        p.dom.scroll_by(700.0);
        assert_eq!(nav.update_active(&p.dom, 700.0).as_deref(), Some("work"));
        assert!(p.dom.has_class(p.work, "active"));
        assert!(!p.dom.has_class(p.about, "active"));
    }

    #[test]
    fn overlapping_sections_prefer_the_later_one() {
        let spans = vec![
            SectionSpan {
                id: "a".into(),
                top: 0.0,
                height: 500.0,
            },
            SectionSpan {
                id: "b".into(),
                top: 100.0,
                height: 500.0,
            },
        ];
        assert_eq!(active_section(&spans, 200.0), Some("b"));
        assert_eq!(active_section(&spans, 50.0), Some("a"));
        assert_eq!(active_section(&spans, 900.0), None);
    }

    #[test]
    fn fragment_requires_hash_and_name() {
        assert_eq!(fragment("#about"), Some("about"));
        assert_eq!(fragment("#"), None);
        assert_eq!(fragment("https://x.com"), None);
    }
}
