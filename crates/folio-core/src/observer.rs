#![forbid(unsafe_code)]

//! Visibility observer: geometry in, edge-crossing transitions out.
//!
//! A [`VisibilityObserver`] holds a set of registered elements and, each time
//! the host re-evaluates layout, reports a [`VisibilityTransition`] for every
//! element whose "sufficiently visible" state changed since the previous
//! evaluation. The first evaluation after registration always reports the
//! element's current state, mirroring the initial callback of a browser
//! intersection observer.
//!
//! # Visibility rule
//!
//! The root is the viewport grown (or shrunk, for negative values) by the
//! [`RootMargin`]. An element's ratio is the share of its area inside the
//! root. It counts as visible when it touches the root and its ratio is at
//! least the threshold. A zero-area element inside the root has ratio 1.
//!
//! # Invariants
//!
//! 1. At most one transition per element per evaluation.
//! 2. Transitions for one element alternate (`true`, `false`, `true`, ...).
//! 3. After `unobserve`, an element never produces another transition.

use serde::{Deserialize, Serialize};

use crate::dom::{ElementId, Rect};

/// Margin applied to the viewport before intersecting, in CSS pixels.
///
/// Negative values shrink the root.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RootMargin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl RootMargin {
    /// Apply the margin to a viewport rectangle.
    #[must_use]
    pub fn apply(&self, viewport: Rect) -> Rect {
        Rect::new(
            viewport.x - self.left,
            viewport.y - self.top,
            (viewport.width + self.left + self.right).max(0.0),
            (viewport.height + self.top + self.bottom).max(0.0),
        )
    }
}

/// Observer configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObserverOptions {
    /// Minimum visible share in `[0, 1]`.
    pub threshold: f64,
    pub root_margin: RootMargin,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            root_margin: RootMargin::default(),
        }
    }
}

/// Viewport size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

/// One edge crossing for one element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityTransition {
    pub element: ElementId,
    pub is_intersecting: bool,
    pub ratio: f64,
}

#[derive(Debug, Clone)]
struct Entry {
    element: ElementId,
    last: Option<bool>,
}

/// Tracks visibility state for a set of elements under one configuration.
#[derive(Debug, Clone)]
pub struct VisibilityObserver {
    options: ObserverOptions,
    entries: Vec<Entry>,
}

impl VisibilityObserver {
    #[must_use]
    pub fn new(options: ObserverOptions) -> Self {
        Self {
            options,
            entries: Vec::new(),
        }
    }

    #[must_use]
    pub const fn options(&self) -> &ObserverOptions {
        &self.options
    }

    /// Register an element. Registering twice is a no-op.
    pub fn observe(&mut self, element: ElementId) {
        if !self.is_observing(element) {
            self.entries.push(Entry {
                element,
                last: None,
            });
        }
    }

    /// Stop observing an element. Returns whether it was registered.
    pub fn unobserve(&mut self, element: ElementId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.element != element);
        self.entries.len() != before
    }

    #[must_use]
    pub fn is_observing(&self, element: ElementId) -> bool {
        self.entries.iter().any(|e| e.element == element)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Visible share of `target` inside the margin-adjusted root, or `None`
    /// when it does not touch the root at all.
    #[must_use]
    pub fn intersection_ratio(&self, viewport: Viewport, target: Rect) -> Option<f64> {
        let root = self.options.root_margin.apply(viewport.rect());
        let overlap = target.intersection(&root)?;
        let area = target.area();
        if area <= 0.0 {
            return Some(1.0);
        }
        Some((overlap.area() / area).clamp(0.0, 1.0))
    }

    /// Re-evaluate every registered element.
    ///
    /// `rect_of` returns the viewport-relative bounds of an element, or
    /// `None` when it is not laid out; such elements count as not visible.
    pub fn evaluate(
        &mut self,
        viewport: Viewport,
        mut rect_of: impl FnMut(ElementId) -> Option<Rect>,
    ) -> Vec<VisibilityTransition> {
        let threshold = self.options.threshold;
        let mut transitions = Vec::new();
        for index in 0..self.entries.len() {
            let element = self.entries[index].element;
            let ratio = rect_of(element).and_then(|rect| self.intersection_ratio(viewport, rect));
            let visible = ratio.is_some_and(|r| r >= threshold);
            let entry = &mut self.entries[index];
            if entry.last != Some(visible) {
                entry.last = Some(visible);
                transitions.push(VisibilityTransition {
                    element,
                    is_intersecting: visible,
                    ratio: ratio.unwrap_or(0.0),
                });
            }
        }
        transitions
    }
}
