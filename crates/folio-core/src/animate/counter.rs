#![forbid(unsafe_code)]

//! Statistic counters: ramp a displayed integer from 0 to its target.
//!
//! A [`CounterRamp`] is a pure iterator of [`RampFrame`]s, one per animation
//! frame; [`CounterAnimator`] owns the ramps in flight and writes each frame
//! to its element when the host steps it.
//!
//! # Invariants
//!
//! 1. Displayed values never decrease and never exceed the target.
//! 2. The last frame displays exactly the target.
//! 3. A ramp yields at most `steps + 1` frames (one extra absorbs rounding
//!    drift of the accumulated float).
//! 4. An element is ramped at most once per animator.

use std::collections::HashSet;

use crate::dom::{Dom, ElementId, selectors};
use crate::error::{FolioError, Result};

/// One step of a ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RampFrame {
    /// 1-based frame index.
    pub frame: u32,
    /// Value to display on this frame.
    pub value: u64,
    /// Whether this frame completes the ramp.
    pub last: bool,
}

/// Step-wise ramp from 0 to `target`.
#[derive(Debug, Clone)]
pub struct CounterRamp {
    target: u64,
    increment: f64,
    current: f64,
    frame: u32,
    done: bool,
}

impl CounterRamp {
    /// `steps` of zero is treated as one.
    #[must_use]
    pub fn new(target: u64, steps: u32) -> Self {
        Self {
            target,
            increment: target as f64 / f64::from(steps.max(1)),
            current: 0.0,
            frame: 0,
            done: false,
        }
    }

    #[must_use]
    pub const fn target(&self) -> u64 {
        self.target
    }

    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.done
    }
}

impl Iterator for CounterRamp {
    type Item = RampFrame;

    fn next(&mut self) -> Option<RampFrame> {
        if self.done {
            return None;
        }
        self.frame += 1;
        self.current += self.increment;
        let target = self.target as f64;
        if self.current >= target {
            self.done = true;
            return Some(RampFrame {
                frame: self.frame,
                value: self.target,
                last: true,
            });
        }
        Some(RampFrame {
            frame: self.frame,
            value: (self.current.ceil() as u64).min(self.target),
            last: false,
        })
    }
}

/// Parse a `data-target` value: an unsigned integer, surrounding whitespace
/// allowed.
pub fn parse_target(el: ElementId, raw: &str) -> Result<u64> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| FolioError::invalid_attribute(el, selectors::DATA_TARGET, raw))
}

/// Drives every counter ramp on the page.
#[derive(Debug, Clone)]
pub struct CounterAnimator {
    steps: u32,
    triggered: HashSet<ElementId>,
    active: Vec<(ElementId, CounterRamp)>,
}

impl CounterAnimator {
    #[must_use]
    pub fn new(steps: u32) -> Self {
        Self {
            steps,
            triggered: HashSet::new(),
            active: Vec::new(),
        }
    }

    /// Start the ramp for `el` and display its first frame immediately.
    ///
    /// Returns `Ok(false)` if the element was already triggered. A missing
    /// or malformed `data-target` is an error and the element is not
    /// marked as triggered.
    pub fn start<D: Dom + ?Sized>(&mut self, dom: &D, el: ElementId) -> Result<bool> {
        if self.triggered.contains(&el) {
            return Ok(false);
        }
        let raw = dom
            .attribute(el, selectors::DATA_TARGET)
            .ok_or(FolioError::MissingAttribute {
                element: el,
                name: selectors::DATA_TARGET,
            })?;
        let target = parse_target(el, &raw)?;
        self.triggered.insert(el);

        let mut ramp = CounterRamp::new(target, self.steps);
        if let Some(frame) = ramp.next() {
            dom.set_text(el, &frame.value.to_string());
        }
        tracing::debug!(target: "folio.counter", element = %el, target, "counter ramp started");
        if !ramp.is_done() {
            self.active.push((el, ramp));
        }
        Ok(true)
    }

    /// Advance every active ramp by one frame.
    ///
    /// Returns whether any ramp is still in flight.
    pub fn step<D: Dom + ?Sized>(&mut self, dom: &D) -> bool {
        self.active.retain_mut(|(el, ramp)| {
            match ramp.next() {
                Some(frame) => dom.set_text(*el, &frame.value.to_string()),
                None => return false,
            }
            !ramp.is_done()
        });
        !self.active.is_empty()
    }

    #[must_use]
    pub fn has_triggered(&self, el: ElementId) -> bool {
        self.triggered.contains(&el)
    }

    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.active.len()
    }
}
