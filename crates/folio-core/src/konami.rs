#![forbid(unsafe_code)]

//! Key-sequence easter egg.

use std::time::Duration;

use crate::config::{DecorConfig, FeedbackConfig};
use crate::decor::inject_style_once;
use crate::dom::{Dom, ElementId, selectors};
use crate::feedback::{self, StatusKind};
use crate::timer::{Scheduler, TimerTask};

/// Up, up, down, down, left, right, left, right, B, A.
pub const KONAMI_SEQUENCE: [u32; 10] = [38, 38, 40, 40, 37, 39, 37, 39, 66, 65];

pub const EASTER_EGG_MESSAGE: &str = "🎉 Easter egg activated! You found the secret!";
pub const RAINBOW_KEYFRAMES_ID: &str = "rainbow-keyframes";
const RAINBOW_KEYFRAMES: &str = "@keyframes rainbow { \
    0% { background-position: 0% 50%; } \
    50% { background-position: 100% 50%; } \
    100% { background-position: 0% 50%; } }";

/// Progress through [`KONAMI_SEQUENCE`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KonamiTracker {
    index: usize,
}

impl KonamiTracker {
    #[must_use]
    pub const fn new() -> Self {
        Self { index: 0 }
    }

    #[must_use]
    pub const fn progress(&self) -> usize {
        self.index
    }

    /// Feed one key code. Returns `true` when it completes the sequence.
    ///
    /// A wrong key resets progress to the start; it is not itself matched
    /// against the first key.
    pub fn feed(&mut self, key_code: u32) -> bool {
        if KONAMI_SEQUENCE.get(self.index) != Some(&key_code) {
            self.index = 0;
            return false;
        }
        self.index += 1;
        if self.index == KONAMI_SEQUENCE.len() {
            self.index = 0;
            return true;
        }
        false
    }
}

/// Turn the title into a rainbow and announce it.
///
/// Returns the title element, or `None` when the page has none.
pub fn activate_easter_egg<D: Dom + ?Sized>(
    dom: &D,
    scheduler: &Scheduler,
    feedback_config: &FeedbackConfig,
    config: &DecorConfig,
) -> Option<ElementId> {
    let Some(title) = dom.query(selectors::TITLE_NAME) else {
        tracing::debug!(target: "folio.konami", "title missing; easter egg skipped");
        return None;
    };
    for (property, value) in [
        (
            "background",
            "linear-gradient(45deg, #ff0000, #ff7f00, #ffff00, #00ff00, #0000ff, #4b0082, #9400d3)",
        ),
        ("background-size", "400% 400%"),
        ("-webkit-background-clip", "text"),
        ("background-clip", "text"),
        ("animation", "rainbow 2s ease-in-out infinite"),
    ] {
        dom.set_style(title, property, value);
    }
    inject_style_once(dom, RAINBOW_KEYFRAMES_ID, RAINBOW_KEYFRAMES);
    feedback::notify(dom, scheduler, feedback_config, EASTER_EGG_MESSAGE, StatusKind::Success);

    let reset = Duration::from_millis(config.easter_egg_ms);
    scheduler.schedule_in(
        reset,
        TimerTask::set_style(title, "animation", "glow 2s ease-in-out infinite alternate"),
    );
    scheduler.schedule_in(
        reset,
        TimerTask::set_style(title, "background", "var(--accent-gradient)"),
    );
    tracing::info!(target: "folio.konami", "easter egg activated");
    Some(title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryDom;

    use pretty_assertions::assert_eq;

    #[test]
    fn full_sequence_activates_once_and_resets() {
        let mut tracker = KonamiTracker::new();
        let hits: Vec<bool> = KONAMI_SEQUENCE.iter().map(|&k| tracker.feed(k)).collect();
        assert_eq!(hits.iter().filter(|&&h| h).count(), 1);
        assert!(hits[9]);
        assert_eq!(tracker.progress(), 0);
    }

    #[test]
    fn wrong_key_resets_progress() {
        let mut tracker = KonamiTracker::new();
        tracker.feed(38);
        tracker.feed(38);
        assert_eq!(tracker.progress(), 2);
        assert!(!tracker.feed(38));
        assert_eq!(tracker.progress(), 0);
    }

    #[test]
    fn activation_styles_title_and_restores_glow() {
        let dom = MemoryDom::new();
        let title = dom.element("span").class("title-name").append();
        let scheduler = Scheduler::new();
        let result = activate_easter_egg(
            &dom,
            &scheduler,
            &FeedbackConfig::default(),
            &DecorConfig::default(),
        );
        assert_eq!(result, Some(title));
        assert_eq!(
            dom.style(title, "animation").as_deref(),
            Some("rainbow 2s ease-in-out infinite")
        );
        assert_eq!(dom.query_all("#rainbow-keyframes").len(), 1);
        assert_eq!(dom.query_all(".notification").len(), 1);

        scheduler.run_due(&dom, Duration::from_millis(5000));
        assert_eq!(
            dom.style(title, "animation").as_deref(),
            Some("glow 2s ease-in-out infinite alternate")
        );
        assert_eq!(
            dom.style(title, "background").as_deref(),
            Some("var(--accent-gradient)")
        );
    }

    #[test]
    fn missing_title_is_a_no_op() {
        let dom = MemoryDom::new();
        let scheduler = Scheduler::new();
        assert_eq!(
            activate_easter_egg(&dom, &scheduler, &FeedbackConfig::default(), &DecorConfig::default()),
            None
        );
        assert_eq!(scheduler.pending(), 0);
    }
}
