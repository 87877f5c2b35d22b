#![forbid(unsafe_code)]

//! User feedback: the inline form status panel and floating notifications.
//!
//! Every status shown through [`Feedback::show`] updates the panel (when the
//! page has one) and also spawns a floating notification. Lifetimes run on
//! the shared [`Scheduler`]:
//!
//! | Element | t = 0 | fade-in | display | display + fade-out |
//! |---|---|---|---|---|
//! | notification | appended, opacity 0 | opacity 1 | opacity 0 | removed |
//! | success panel | shown | | | hidden at `status_hide` |
//!
//! Error statuses stay on the panel until replaced. Each status stamps a
//! sequence number on the panel so a stale hide timer never hides a newer
//! message.

use std::cell::Cell;
use std::rc::Rc;

use crate::config::FeedbackConfig;
use crate::dom::{Dom, ElementId};
use crate::timer::{Scheduler, TimerTask};

/// Panel attribute carrying the sequence number of the visible status.
pub const STATUS_SEQUENCE_ATTR: &str = "data-status-seq";

/// Kind of status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusKind {
    Success,
    Error,
}

impl StatusKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }

    /// `(background, text, border)` colors for the inline panel.
    const fn panel_colors(self) -> (&'static str, &'static str, &'static str) {
        match self {
            Self::Success => ("#d4edda", "#155724", "1px solid #c3e6cb"),
            Self::Error => ("#f8d7da", "#721c24", "1px solid #f5c6cb"),
        }
    }

    const fn notification_background(self) -> &'static str {
        match self {
            Self::Success => "#10b981",
            Self::Error => "#ef4444",
        }
    }
}

/// Status panel plus floating notification presenter.
#[derive(Debug)]
pub struct Feedback {
    panel: Option<ElementId>,
    config: FeedbackConfig,
    scheduler: Rc<Scheduler>,
    sequence: Cell<u64>,
}

impl Feedback {
    #[must_use]
    pub fn new(panel: Option<ElementId>, config: FeedbackConfig, scheduler: Rc<Scheduler>) -> Self {
        Self {
            panel,
            config,
            scheduler,
            sequence: Cell::new(0),
        }
    }

    #[must_use]
    pub const fn panel(&self) -> Option<ElementId> {
        self.panel
    }

    /// Show `message` on the panel and as a floating notification.
    ///
    /// Returns the notification element.
    pub fn show<D: Dom + ?Sized>(&self, dom: &D, message: &str, kind: StatusKind) -> Option<ElementId> {
        if let Some(panel) = self.panel {
            self.show_panel(dom, panel, message, kind);
        }
        notify(dom, &self.scheduler, &self.config, message, kind)
    }

    fn show_panel<D: Dom + ?Sized>(&self, dom: &D, panel: ElementId, message: &str, kind: StatusKind) {
        let sequence = self.sequence.get().wrapping_add(1);
        self.sequence.set(sequence);

        let (background, color, border) = kind.panel_colors();
        dom.set_text(panel, message);
        dom.set_class_name(panel, &format!("form-status {}", kind.as_str()));
        dom.set_style(panel, "display", "block");
        dom.set_style(panel, "background-color", background);
        dom.set_style(panel, "color", color);
        dom.set_style(panel, "border", border);
        dom.set_attribute(panel, STATUS_SEQUENCE_ATTR, &sequence.to_string());

        if kind == StatusKind::Success {
            self.scheduler.schedule_in(
                self.config.status_hide(),
                TimerTask::HideStatus { panel, sequence },
            );
        }
    }
}

/// Spawn a floating notification and schedule its fade and removal.
///
/// Returns `None` when the page has no body to attach to.
pub fn notify<D: Dom + ?Sized>(
    dom: &D,
    scheduler: &Scheduler,
    config: &FeedbackConfig,
    message: &str,
    kind: StatusKind,
) -> Option<ElementId> {
    let body = dom.body()?;
    let el = dom.create_element("div");
    dom.set_class_name(el, &format!("notification {}", kind.as_str()));
    dom.set_text(el, message);
    for (property, value) in [
        ("position", "fixed"),
        ("top", "20px"),
        ("left", "50%"),
        ("transform", "translateX(-50%)"),
        ("background-color", kind.notification_background()),
        ("color", "white"),
        ("padding", "1rem 2rem"),
        ("border-radius", "8px"),
        ("z-index", "10000"),
        ("opacity", "0"),
        ("transition", "opacity 0.3s ease"),
        ("box-shadow", "0 4px 12px rgba(0, 0, 0, 0.2)"),
    ] {
        dom.set_style(el, property, value);
    }
    dom.append_child(body, el);

    scheduler.schedule_in(config.notification_fade_in(), TimerTask::set_style(el, "opacity", "1"));
    scheduler.schedule_in(config.notification_display(), TimerTask::set_style(el, "opacity", "0"));
    scheduler.schedule_in(config.notification_lifetime(), TimerTask::Remove(el));

    tracing::debug!(target: "folio.feedback", kind = kind.as_str(), element = %el, "notification shown");
    Some(el)
}
