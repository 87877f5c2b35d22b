#![forbid(unsafe_code)]

//! Property tests for counter ramps, skill bars and the visibility observer.

use folio_core::animate::{CounterAnimator, CounterRamp, SkillBarAnimator};
use folio_core::dom::Rect;
use folio_core::memory::MemoryDom;
use folio_core::observer::{ObserverOptions, Viewport, VisibilityObserver};
use folio_core::{Dom, ElementId};
use proptest::prelude::*;

proptest! {
    #[test]
    fn ramp_ends_exactly_at_target(target in 0u64..1_000_000, steps in 1u32..200) {
        let frames: Vec<_> = CounterRamp::new(target, steps).collect();
        prop_assert!(!frames.is_empty());
        prop_assert!(frames.len() <= steps as usize + 1);

        let last = frames[frames.len() - 1];
        prop_assert!(last.last);
        prop_assert_eq!(last.value, target);
        prop_assert!(frames[..frames.len() - 1].iter().all(|f| !f.last));
    }

    #[test]
    fn ramp_never_overshoots_or_decreases(target in 0u64..100_000) {
        let values: Vec<u64> = CounterRamp::new(target, 50).map(|f| f.value).collect();
        prop_assert!(values.iter().all(|&v| v <= target));
        prop_assert!(values.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn counter_element_shows_target_after_driving(target in 0u64..10_000) {
        let dom = MemoryDom::new();
        let el = dom
            .element("span")
            .class("stat-number")
            .attr("data-target", &target.to_string())
            .text("0")
            .append();
        let mut counters = CounterAnimator::new(50);
        prop_assert!(counters.start(&dom, el).unwrap());

        let mut frames = 1;
        while counters.step(&dom) {
            frames += 1;
            prop_assert!(dom.text(el).parse::<u64>().unwrap() <= target);
        }
        prop_assert!(frames <= 51);
        prop_assert_eq!(dom.text(el), target.to_string());
        prop_assert!(!counters.start(&dom, el).unwrap());
    }

    #[test]
    fn skill_bar_width_matches_progress(progress in 0u8..=100) {
        let dom = MemoryDom::new();
        let bar = dom
            .element("div")
            .class("skill-progress")
            .attr("data-progress", &progress.to_string())
            .append();
        SkillBarAnimator.animate(&dom, bar).unwrap();
        prop_assert_eq!(dom.style(bar, "width"), Some(format!("{progress}%")));
        prop_assert!(!SkillBarAnimator.animate(&dom, bar).unwrap());
    }

    #[test]
    fn observer_reports_each_crossing_once(offsets in proptest::collection::vec(-2000.0f64..2000.0, 1..40)) {
        let el = ElementId::new(7);
        let mut observer = VisibilityObserver::new(ObserverOptions {
            threshold: 0.5,
            ..ObserverOptions::default()
        });
        observer.observe(el);
        let viewport = Viewport::new(1000.0, 800.0);

        let mut last: Option<bool> = None;
        for y in offsets {
            let rect = Rect::new(0.0, y, 200.0, 100.0);
            let transitions = observer.evaluate(viewport, |_| Some(rect));
            let visible = observer
                .intersection_ratio(viewport, rect)
                .is_some_and(|ratio| ratio >= 0.5);
            if last == Some(visible) {
                prop_assert!(transitions.is_empty());
            } else {
                prop_assert_eq!(transitions.len(), 1);
                prop_assert_eq!(transitions[0].is_intersecting, visible);
            }
            last = Some(visible);
        }
    }
}
