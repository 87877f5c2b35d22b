#![forbid(unsafe_code)]

//! Entrance reveal for the reveal set.

use std::collections::HashSet;

use crate::config::RevealConfig;
use crate::dom::{Dom, ElementId};

/// Moves elements from their hidden, offset state to their settled state.
#[derive(Debug, Clone)]
pub struct RevealCoordinator {
    config: RevealConfig,
    revealed: HashSet<ElementId>,
}

impl RevealCoordinator {
    #[must_use]
    pub fn new(config: RevealConfig) -> Self {
        Self {
            config,
            revealed: HashSet::new(),
        }
    }

    /// Put an element in its hidden state with the eased transition declared.
    pub fn prepare<D: Dom + ?Sized>(&self, dom: &D, el: ElementId) {
        let secs = self.config.duration_ms as f64 / 1000.0;
        dom.set_style(el, "opacity", "0");
        dom.set_style(
            el,
            "transform",
            &format!("translateY({}px)", self.config.offset_px),
        );
        dom.set_style(
            el,
            "transition",
            &format!("opacity {secs}s ease, transform {secs}s ease"),
        );
    }

    /// Settle an element. Safe to call repeatedly.
    ///
    /// Returns `true` the first time an element is revealed.
    pub fn on_visible<D: Dom + ?Sized>(&mut self, dom: &D, el: ElementId) -> bool {
        dom.set_style(el, "opacity", "1");
        dom.set_style(el, "transform", "translateY(0)");
        self.revealed.insert(el)
    }

    #[must_use]
    pub fn is_revealed(&self, el: ElementId) -> bool {
        self.revealed.contains(&el)
    }
}
