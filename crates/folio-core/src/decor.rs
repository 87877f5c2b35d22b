#![forbid(unsafe_code)]

//! Decorative handlers: tech-orbit hover, button ripples, the hero entrance
//! and mailto click feedback.

use std::time::Duration;

use crate::config::DecorConfig;
use crate::dom::{Dom, ElementId, Rect, selectors};
use crate::timer::{Scheduler, TimerTask};

pub const RIPPLE_KEYFRAMES_ID: &str = "ripple-keyframes";
const RIPPLE_KEYFRAMES: &str =
    "@keyframes ripple-animation { to { transform: scale(4); opacity: 0; } }";

pub const MAILTO_OPENING_LABEL: &str = "📧 Opening...";

/// Append a `<style id=..>` to the head unless one with that id exists.
///
/// Returns whether a style element was added.
pub fn inject_style_once<D: Dom + ?Sized>(dom: &D, id: &str, css: &str) -> bool {
    if dom.by_id(id).is_some() {
        return false;
    }
    let Some(parent) = dom.head().or_else(|| dom.body()) else {
        return false;
    };
    let style = dom.create_element("style");
    dom.set_attribute(style, "id", id);
    dom.set_text(style, css);
    dom.append_child(parent, style);
    true
}

/// Hover and click effects on the orbit items.
#[derive(Debug, Clone)]
pub struct TechOrbit {
    items: Vec<ElementId>,
    pulse: Duration,
}

impl TechOrbit {
    pub fn bind<D: Dom + ?Sized>(dom: &D, config: &DecorConfig) -> Self {
        Self {
            items: dom.query_all(selectors::ORBIT_ITEM),
            pulse: Duration::from_millis(config.pulse_ms),
        }
    }

    #[must_use]
    pub fn items(&self) -> &[ElementId] {
        &self.items
    }

    pub fn on_enter<D: Dom + ?Sized>(&self, dom: &D, item: ElementId) {
        dom.set_style(item, "transform", "scale(1.2)");
        dom.set_style(item, "z-index", "10");
    }

    pub fn on_leave<D: Dom + ?Sized>(&self, dom: &D, item: ElementId) {
        dom.set_style(item, "transform", "scale(1)");
        dom.set_style(item, "z-index", "1");
    }

    /// Play the pulse animation once.
    pub fn on_click<D: Dom + ?Sized>(&self, dom: &D, scheduler: &Scheduler, item: ElementId) {
        let secs = self.pulse.as_secs_f64();
        dom.set_style(item, "animation", &format!("pulse {secs}s ease"));
        scheduler.schedule_in(self.pulse, TimerTask::set_style(item, "animation", ""));
    }
}

/// Size and button-relative position of a ripple.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RippleGeometry {
    pub diameter: f64,
    pub left: f64,
    pub top: f64,
}

impl RippleGeometry {
    /// Circle covering the larger button side, centered on the click.
    #[must_use]
    pub fn new(client_size: (f64, f64), button: Rect, click_x: f64, click_y: f64) -> Self {
        let diameter = client_size.0.max(client_size.1);
        let radius = diameter / 2.0;
        Self {
            diameter,
            left: click_x - button.x - radius,
            top: click_y - button.y - radius,
        }
    }
}

/// Spawn a ripple inside `button` at the viewport point of the click.
///
/// Any ripple still on the button is replaced.
pub fn create_ripple<D: Dom + ?Sized>(
    dom: &D,
    scheduler: &Scheduler,
    config: &DecorConfig,
    button: ElementId,
    click_x: f64,
    click_y: f64,
) -> ElementId {
    let rect = dom
        .bounding_rect(button)
        .unwrap_or(Rect::new(0.0, 0.0, 0.0, 0.0));
    let geometry = RippleGeometry::new(dom.client_size(button), rect, click_x, click_y);
    let secs = config.ripple_ms as f64 / 1000.0;

    let circle = dom.create_element("span");
    dom.add_class(circle, selectors::RIPPLE_CLASS);
    for (property, value) in [
        ("width", format!("{}px", geometry.diameter)),
        ("height", format!("{}px", geometry.diameter)),
        ("left", format!("{}px", geometry.left)),
        ("top", format!("{}px", geometry.top)),
        ("position", "absolute".to_string()),
        ("border-radius", "50%".to_string()),
        ("background", "rgba(255, 255, 255, 0.6)".to_string()),
        ("transform", "scale(0)".to_string()),
        ("animation", format!("ripple-animation {secs}s linear")),
        ("pointer-events", "none".to_string()),
    ] {
        dom.set_style(circle, property, &value);
    }

    inject_style_once(dom, RIPPLE_KEYFRAMES_ID, RIPPLE_KEYFRAMES);
    if let Some(existing) = dom.query_within(button, ".ripple") {
        dom.remove(existing);
    }
    dom.append_child(button, circle);
    scheduler.schedule_in(
        Duration::from_millis(config.ripple_ms),
        TimerTask::Remove(circle),
    );
    circle
}

/// Page `load`: mark the body and slide the hero content in.
pub fn on_page_load<D: Dom + ?Sized>(dom: &D) {
    if let Some(body) = dom.body() {
        dom.add_class(body, selectors::LOADED_CLASS);
    }
    for selector in [selectors::HERO_TEXT, selectors::HERO_VISUAL] {
        if let Some(el) = dom.query(selector) {
            dom.set_style(el, "opacity", "1");
            dom.set_style(el, "transform", "translateX(0)");
        }
    }
}

/// Mailto click: log it and, on button-styled links, show a short
/// "opening" label.
///
/// Returns whether the label was swapped.
pub fn on_mailto_click<D: Dom + ?Sized>(
    dom: &D,
    scheduler: &Scheduler,
    config: &DecorConfig,
    link: ElementId,
) -> bool {
    let href = dom.attribute(link, "href").unwrap_or_default();
    tracing::info!(target: "folio.mailto", href = %href, "mailto link clicked");

    if !dom.has_class(link, selectors::BUTTON_CLASS) {
        return false;
    }
    let original = dom.text(link);
    if original == MAILTO_OPENING_LABEL {
        return false;
    }
    dom.set_text(link, MAILTO_OPENING_LABEL);
    dom.set_style(link, "opacity", "0.7");

    let restore = Duration::from_millis(config.mailto_feedback_ms);
    scheduler.schedule_in(
        restore,
        TimerTask::SetText {
            element: link,
            text: original,
        },
    );
    scheduler.schedule_in(restore, TimerTask::set_style(link, "opacity", "1"));
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryDom;

    use pretty_assertions::assert_eq;

    #[test]
    fn orbit_hover_and_pulse() {
        let dom = MemoryDom::new();
        let item = dom.element("div").class("orbit-item").append();
        let scheduler = Scheduler::new();
        let orbit = TechOrbit::bind(&dom, &DecorConfig::default());
        assert_eq!(orbit.items(), &[item]);

        orbit.on_enter(&dom, item);
        assert_eq!(dom.style(item, "transform").as_deref(), Some("scale(1.2)"));
        assert_eq!(dom.style(item, "z-index").as_deref(), Some("10"));
        orbit.on_leave(&dom, item);
        assert_eq!(dom.style(item, "z-index").as_deref(), Some("1"));

        orbit.on_click(&dom, &scheduler, item);
        assert_eq!(dom.style(item, "animation").as_deref(), Some("pulse 0.3s ease"));
        scheduler.run_due(&dom, Duration::from_millis(300));
        assert_eq!(dom.style(item, "animation"), None);
    }

    #[test]
    fn ripple_geometry_centers_on_click() {
        let geometry = RippleGeometry::new(
            (120.0, 40.0),
            Rect::new(100.0, 200.0, 120.0, 40.0),
            130.0,
            210.0,
        );
        assert_eq!(
            geometry,
            RippleGeometry {
                diameter: 120.0,
                left: -30.0,
                top: -50.0,
            }
        );
    }

    #[test]
    fn ripple_replaces_previous_and_expires() {
        let dom = MemoryDom::new();
        let button = dom
            .element("button")
            .class("btn")
            .rect(Rect::new(0.0, 0.0, 100.0, 40.0))
            .append();
        let scheduler = Scheduler::new();
        let config = DecorConfig::default();

        let first = create_ripple(&dom, &scheduler, &config, button, 10.0, 10.0);
        assert_eq!(dom.style(first, "width").as_deref(), Some("100px"));
        let second = create_ripple(&dom, &scheduler, &config, button, 20.0, 20.0);
        assert!(!dom.is_connected(first));
        assert_eq!(dom.children(button), vec![second]);
        assert_eq!(dom.query_all("#ripple-keyframes").len(), 1);

        scheduler.run_due(&dom, Duration::from_millis(600));
        assert!(dom.children(button).is_empty());
    }

    #[test]
    fn page_load_reveals_hero() {
        let dom = MemoryDom::new();
        let text = dom.element("div").class("hero-text").append();
        on_page_load(&dom);
        assert!(dom.has_class(dom.body().unwrap(), "loaded"));
        assert_eq!(dom.style(text, "opacity").as_deref(), Some("1"));
        assert_eq!(dom.style(text, "transform").as_deref(), Some("translateX(0)"));
    }

    #[test]
    fn mailto_button_shows_feedback_then_restores() {
        let dom = MemoryDom::new();
        let link = dom
            .element("a")
            .class("btn")
            .attr("href", "mailto:me@example.com")
            .text("Email me")
            .append();
        let scheduler = Scheduler::new();
        let config = DecorConfig::default();

        assert!(on_mailto_click(&dom, &scheduler, &config, link));
        assert_eq!(dom.text(link), MAILTO_OPENING_LABEL);
        assert!(!on_mailto_click(&dom, &scheduler, &config, link), "no relabel while opening");

        scheduler.run_due(&dom, Duration::from_millis(2000));
        assert_eq!(dom.text(link), "Email me");
        assert_eq!(dom.style(link, "opacity").as_deref(), Some("1"));
    }

    #[test]
    fn plain_mailto_link_is_only_logged() {
        let dom = MemoryDom::new();
        let link = dom
            .element("a")
            .attr("href", "mailto:me@example.com")
            .text("me@example.com")
            .append();
        let scheduler = Scheduler::new();
        assert!(!on_mailto_click(&dom, &scheduler, &DecorConfig::default(), link));
        assert_eq!(dom.text(link), "me@example.com");
        assert_eq!(scheduler.pending(), 0);
    }
}
