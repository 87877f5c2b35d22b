#![forbid(unsafe_code)]

//! Visibility-driven animations.
//!
//! [`AnimationCoordinator`] owns three [`VisibilityObserver`]s and routes
//! their transitions:
//!
//! | Observer | Watches | On visible |
//! |---|---|---|
//! | reveal | reveal set | reveal, plus counter / skill bar if the element is one |
//! | strict | skill bars | set bar width (every time) |
//! | counters | counters | start ramp once, then unobserve |
//!
//! The animators share no state with each other. Attribute errors on a
//! single element are logged and only disable that element.

pub mod counter;
pub mod reveal;
pub mod skill_bar;

pub use counter::{CounterAnimator, CounterRamp, RampFrame};
pub use reveal::RevealCoordinator;
pub use skill_bar::SkillBarAnimator;

use crate::config::FolioConfig;
use crate::dom::{Dom, ElementId, selectors};
use crate::observer::{Viewport, VisibilityObserver, VisibilityTransition};

/// What one evaluation pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvaluationSummary {
    pub transitions: usize,
    pub revealed: usize,
    pub counters_started: usize,
    pub bars_updated: usize,
}

/// Routes visibility transitions to the reveal, counter and skill-bar
/// animators.
#[derive(Debug, Clone)]
pub struct AnimationCoordinator {
    reveal_observer: VisibilityObserver,
    bar_observer: VisibilityObserver,
    counter_observer: VisibilityObserver,
    reveal: RevealCoordinator,
    counters: CounterAnimator,
    bars: SkillBarAnimator,
}

impl AnimationCoordinator {
    #[must_use]
    pub fn new(config: &FolioConfig) -> Self {
        Self {
            reveal_observer: VisibilityObserver::new(config.observers.reveal),
            bar_observer: VisibilityObserver::new(config.observers.strict),
            counter_observer: VisibilityObserver::new(config.observers.strict),
            reveal: RevealCoordinator::new(config.reveal.clone()),
            counters: CounterAnimator::new(config.counter.steps),
            bars: SkillBarAnimator,
        }
    }

    /// Register the page's reveal set, skill bars and counters.
    pub fn install<D: Dom + ?Sized>(&mut self, dom: &D) {
        for el in dom.query_all(selectors::REVEAL_SET) {
            self.reveal.prepare(dom, el);
            self.reveal_observer.observe(el);
        }
        for el in dom.query_all(selectors::SKILL_BAR) {
            self.bar_observer.observe(el);
        }
        for el in dom.query_all(selectors::COUNTER) {
            self.counter_observer.observe(el);
        }
        tracing::debug!(
            target: "folio.animate",
            reveal = self.reveal_observer.len(),
            skill_bars = self.bar_observer.len(),
            counters = self.counter_observer.len(),
            "animation observers installed"
        );
    }

    /// Re-evaluate visibility against the current layout.
    pub fn evaluate<D: Dom + ?Sized>(&mut self, dom: &D, viewport: Viewport) -> EvaluationSummary {
        let mut summary = EvaluationSummary::default();

        let reveal = self
            .reveal_observer
            .evaluate(viewport, |el| dom.bounding_rect(el));
        let bars = self.bar_observer.evaluate(viewport, |el| dom.bounding_rect(el));
        let counters = self
            .counter_observer
            .evaluate(viewport, |el| dom.bounding_rect(el));
        summary.transitions = reveal.len() + bars.len() + counters.len();

        for t in visible(&reveal) {
            if self.reveal.on_visible(dom, t.element) {
                summary.revealed += 1;
            }
            if dom.has_class(t.element, selectors::COUNTER_CLASS) && self.start_counter(dom, t.element) {
                summary.counters_started += 1;
            }
            if dom.has_class(t.element, selectors::SKILL_BAR_CLASS) && self.update_bar(dom, t.element) {
                summary.bars_updated += 1;
            }
        }
        for t in visible(&bars) {
            if self.update_bar(dom, t.element) {
                summary.bars_updated += 1;
            }
        }
        for t in visible(&counters) {
            if self.start_counter(dom, t.element) {
                summary.counters_started += 1;
            }
            self.counter_observer.unobserve(t.element);
        }
        summary
    }

    /// Advance counter ramps by one animation frame.
    ///
    /// Returns whether any ramp is still running.
    pub fn on_frame<D: Dom + ?Sized>(&mut self, dom: &D) -> bool {
        self.counters.step(dom)
    }

    #[must_use]
    pub fn counters(&self) -> &CounterAnimator {
        &self.counters
    }

    #[must_use]
    pub fn reveal(&self) -> &RevealCoordinator {
        &self.reveal
    }

    #[must_use]
    pub fn is_watching_counter(&self, el: ElementId) -> bool {
        self.counter_observer.is_observing(el)
    }

    fn start_counter<D: Dom + ?Sized>(&mut self, dom: &D, el: ElementId) -> bool {
        match self.counters.start(dom, el) {
            Ok(started) => started,
            Err(err) => {
                tracing::warn!(target: "folio.counter", element = %el, error = %err, "counter disabled");
                false
            }
        }
    }

    fn update_bar<D: Dom + ?Sized>(&self, dom: &D, el: ElementId) -> bool {
        match self.bars.animate(dom, el) {
            Ok(changed) => changed,
            Err(err) => {
                tracing::warn!(target: "folio.skill_bar", element = %el, error = %err, "skill bar disabled");
                false
            }
        }
    }
}

fn visible(transitions: &[VisibilityTransition]) -> impl Iterator<Item = &VisibilityTransition> {
    transitions.iter().filter(|t| t.is_intersecting)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Rect;
    use crate::memory::MemoryDom;

    use pretty_assertions::assert_eq;

    const VIEWPORT: Viewport = Viewport::new(1200.0, 800.0);

    struct Page {
        dom: MemoryDom,
        card: ElementId,
        counter: ElementId,
        bar: ElementId,
    }

    fn page() -> Page {
        let dom = MemoryDom::new();
        let card = dom
            .element("div")
            .class("project-card")
            .rect(Rect::new(0.0, 1000.0, 300.0, 200.0))
            .append();
        let stat = dom
            .element("div")
            .class("stat-item")
            .rect(Rect::new(0.0, 1400.0, 200.0, 100.0))
            .append();
        let counter = dom
            .element("span")
            .class("stat-number")
            .attr("data-target", "150")
            .text("0")
            .rect(Rect::new(0.0, 1400.0, 200.0, 60.0))
            .append_to(stat);
        let bar = dom
            .element("div")
            .class("skill-progress")
            .attr("data-progress", "90")
            .rect(Rect::new(0.0, 1800.0, 400.0, 10.0))
            .append();
        Page {
            dom,
            card,
            counter,
            bar,
        }
    }

    #[test]
    fn install_hides_reveal_set_only() {
        let p = page();
        let mut anim = AnimationCoordinator::new(&FolioConfig::default());
        anim.install(&p.dom);
        assert_eq!(p.dom.style(p.card, "opacity").as_deref(), Some("0"));
        assert_eq!(p.dom.style(p.counter, "opacity"), None);
        assert!(anim.is_watching_counter(p.counter));
    }

    #[test]
    fn scrolling_down_triggers_each_animation() {
        let p = page();
        let mut anim = AnimationCoordinator::new(&FolioConfig::default());
        anim.install(&p.dom);

        let first = anim.evaluate(&p.dom, VIEWPORT);
        assert_eq!(first.revealed, 0);

        p.dom.scroll_by(500.0);
        let second = anim.evaluate(&p.dom, VIEWPORT);
        assert_eq!(second.revealed, 1);
        assert_eq!(p.dom.style(p.card, "opacity").as_deref(), Some("1"));

        p.dom.scroll_by(600.0);
        let third = anim.evaluate(&p.dom, VIEWPORT);
        assert_eq!(third.counters_started, 1);
        assert_eq!(third.bars_updated, 1);
        assert_eq!(p.dom.style(p.bar, "width").as_deref(), Some("90%"));
        assert!(!anim.is_watching_counter(p.counter));

        while anim.on_frame(&p.dom) {}
        assert_eq!(p.dom.text(p.counter), "150");
    }

    #[test]
    fn counter_does_not_restart_after_scrolling_back() {
        let p = page();
        let mut anim = AnimationCoordinator::new(&FolioConfig::default());
        anim.install(&p.dom);
        p.dom.scroll_by(1100.0);
        assert_eq!(anim.evaluate(&p.dom, VIEWPORT).counters_started, 1);
        while anim.on_frame(&p.dom) {}

        p.dom.scroll_by(-1100.0);
        anim.evaluate(&p.dom, VIEWPORT);
        p.dom.scroll_by(1100.0);
        let again = anim.evaluate(&p.dom, VIEWPORT);
        assert_eq!(again.counters_started, 0);
        assert_eq!(p.dom.text(p.counter), "150");
    }

    #[test]
    fn bad_progress_attribute_only_disables_that_bar() {
        let p = page();
        let broken = p
            .dom
            .element("div")
            .class("skill-progress")
            .attr("data-progress", "n/a")
            .rect(Rect::new(0.0, 1150.0, 400.0, 10.0))
            .append();
        let mut anim = AnimationCoordinator::new(&FolioConfig::default());
        anim.install(&p.dom);
        p.dom.scroll_by(1100.0);
        let summary = anim.evaluate(&p.dom, VIEWPORT);
        assert_eq!(summary.bars_updated, 1);
        assert_eq!(p.dom.style(broken, "width"), None);
    }
}
