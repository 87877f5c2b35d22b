#![forbid(unsafe_code)]

//! Scroll-driven chrome: nav styling, hide-on-scroll and parallax.

use crate::config::ScrollConfig;
use crate::dom::{Dom, ElementId, selectors};

/// Whether the nav bar should be shown after a scroll event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavVisibility {
    Shown,
    Hidden,
}

impl NavVisibility {
    #[must_use]
    pub const fn transform(self) -> &'static str {
        match self {
            Self::Shown => "translateY(0)",
            Self::Hidden => "translateY(-100%)",
        }
    }
}

/// Remembers the previous scroll top to tell scroll direction.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScrollTracker {
    last_scroll_top: f64,
}

impl ScrollTracker {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last_scroll_top: 0.0,
        }
    }

    #[must_use]
    pub const fn last_scroll_top(&self) -> f64 {
        self.last_scroll_top
    }

    /// Record `scroll_top`. Scrolling down past `hide_threshold` hides the
    /// nav; anything else shows it.
    pub fn observe(&mut self, scroll_top: f64, hide_threshold: f64) -> NavVisibility {
        let down = scroll_top > self.last_scroll_top;
        self.last_scroll_top = scroll_top;
        if down && scroll_top > hide_threshold {
            NavVisibility::Hidden
        } else {
            NavVisibility::Shown
        }
    }
}

/// Vertical parallax offset of the floating element at `index`.
#[must_use]
pub fn parallax_offset(config: &ScrollConfig, scroll_y: f64, index: usize) -> f64 {
    let speed = config.parallax_base_speed + index as f64 * config.parallax_speed_step;
    scroll_y * config.parallax_factor * speed
}

/// Nav styling and floating-element parallax.
#[derive(Debug, Clone)]
pub struct ScrollEffects {
    config: ScrollConfig,
    nav: Option<ElementId>,
    floating: Vec<ElementId>,
    tracker: ScrollTracker,
}

impl ScrollEffects {
    pub fn bind<D: Dom + ?Sized>(dom: &D, config: ScrollConfig) -> Self {
        let nav = dom.query(selectors::NAV);
        if nav.is_none() {
            tracing::debug!(target: "folio.scroll", "nav missing; nav effects disabled");
        }
        Self {
            config,
            nav,
            floating: dom.query_all(selectors::FLOATING_ELEMENT),
            tracker: ScrollTracker::new(),
        }
    }

    #[must_use]
    pub const fn tracker(&self) -> &ScrollTracker {
        &self.tracker
    }

    /// Apply every effect for the scroll position `scroll_y`.
    pub fn on_scroll<D: Dom + ?Sized>(&mut self, dom: &D, scroll_y: f64) -> NavVisibility {
        let visibility = self
            .tracker
            .observe(scroll_y, self.config.hide_threshold_px);
        if let Some(nav) = self.nav {
            if scroll_y > self.config.scrolled_threshold_px {
                dom.add_class(nav, selectors::SCROLLED_CLASS);
            } else {
                dom.remove_class(nav, selectors::SCROLLED_CLASS);
            }
            dom.set_style(nav, "transform", visibility.transform());
        }
        for (index, &el) in self.floating.iter().enumerate() {
            let offset = parallax_offset(&self.config, scroll_y, index);
            dom.set_style(el, "transform", &format!("translateY({offset}px)"));
        }
        visibility
    }
}
