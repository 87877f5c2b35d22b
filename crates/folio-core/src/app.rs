#![forbid(unsafe_code)]

//! The page facade: one [`Portfolio`] owns every feature and exposes one
//! method per browser event.
//!
//! The host calls [`Portfolio::on_frame`] once per animation frame with its
//! monotonic time; timers, counter ramps and any throttled scroll work run
//! from there. Event methods that schedule delayed edits take the same
//! monotonic `now`, since the host stops requesting frames while idle and
//! the last frame time may be long past.

use std::rc::Rc;
use std::time::Duration;

use tracing::Instrument;

use crate::animate::{AnimationCoordinator, EvaluationSummary};
use crate::config::FolioConfig;
use crate::decor::{self, TechOrbit};
use crate::dom::{Dom, ElementId, selectors};
use crate::feedback::Feedback;
use crate::form::{ContactForm, EmailSender, SendError, SendResponse, SubmitOutcome, TemplateParams};
use crate::konami::{self, KonamiTracker};
use crate::nav::Navigation;
use crate::observer::Viewport;
use crate::scroll::ScrollEffects;
use crate::theme::{PreferenceStore, Theme, ThemeController};
use crate::throttle::Throttle;
use crate::timer::Scheduler;

/// Every page behavior, bound to one document.
#[derive(Debug)]
pub struct Portfolio<D: Dom + Clone> {
    config: FolioConfig,
    dom: D,
    scheduler: Rc<Scheduler>,
    viewport: Viewport,
    theme: ThemeController,
    nav: Navigation,
    scroll: ScrollEffects,
    scroll_throttle: Throttle,
    pending_scroll: Option<f64>,
    animations: AnimationCoordinator,
    orbit: TechOrbit,
    konami: KonamiTracker,
    feedback: Rc<Feedback>,
    form: Option<Rc<ContactForm>>,
}

impl<D: Dom + Clone> Portfolio<D> {
    /// Bind every feature to the document and run the first visibility
    /// pass.
    pub fn install<S>(dom: D, config: FolioConfig, store: &S, viewport: Viewport) -> Self
    where
        S: PreferenceStore + ?Sized,
    {
        let scheduler = Rc::new(Scheduler::new());
        let theme = ThemeController::init(&dom, store, config.theme.clone());
        let nav = Navigation::bind(&dom, config.nav.clone());
        let mut animations = AnimationCoordinator::new(&config);
        animations.install(&dom);

        let feedback = Rc::new(Feedback::new(
            dom.by_id(selectors::FORM_STATUS_ID),
            config.feedback.clone(),
            Rc::clone(&scheduler),
        ));
        let form = ContactForm::bind(&dom, config.email.clone()).map(Rc::new);
        let scroll = ScrollEffects::bind(&dom, config.scroll.clone());
        let orbit = TechOrbit::bind(&dom, &config.decor);
        let scroll_throttle = Throttle::new(Duration::from_millis(config.scroll.throttle_ms));

        let mut page = Self {
            config,
            dom,
            scheduler,
            viewport,
            theme,
            nav,
            scroll,
            scroll_throttle,
            pending_scroll: None,
            animations,
            orbit,
            konami: KonamiTracker::new(),
            feedback,
            form,
        };
        let summary = page.animations.evaluate(&page.dom, viewport);
        tracing::info!(
            target: "folio.app",
            theme = page.theme.theme().as_str(),
            has_form = page.form.is_some(),
            revealed = summary.revealed,
            "portfolio installed"
        );
        page
    }

    #[must_use]
    pub const fn config(&self) -> &FolioConfig {
        &self.config
    }

    #[must_use]
    pub const fn dom(&self) -> &D {
        &self.dom
    }

    #[must_use]
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub const fn theme(&self) -> Theme {
        self.theme.theme()
    }

    #[must_use]
    pub const fn navigation(&self) -> &Navigation {
        &self.nav
    }

    #[must_use]
    pub const fn animations(&self) -> &AnimationCoordinator {
        &self.animations
    }

    #[must_use]
    pub const fn orbit(&self) -> &TechOrbit {
        &self.orbit
    }

    #[must_use]
    pub fn form(&self) -> Option<&ContactForm> {
        self.form.as_deref()
    }

    #[must_use]
    pub fn feedback(&self) -> &Feedback {
        &self.feedback
    }

    /// Animation frame: run due timers, flush deferred scroll work and
    /// advance counter ramps.
    ///
    /// Returns whether anything is still pending.
    pub fn on_frame(&mut self, now: Duration) -> bool {
        self.scheduler.run_due(&self.dom, now);
        if let Some(scroll_y) = self.pending_scroll {
            if self.scroll_throttle.admit(now) {
                self.pending_scroll = None;
                self.apply_scroll(scroll_y);
            }
        }
        let ramps = self.animations.on_frame(&self.dom);
        ramps || self.pending_scroll.is_some() || self.scheduler.pending() > 0
    }

    /// Window scroll. Work beyond one pass per throttle interval is
    /// deferred to the next admitted frame, keeping only the latest offset.
    pub fn on_scroll(&mut self, scroll_y: f64, now: Duration) -> Option<EvaluationSummary> {
        if self.scroll_throttle.admit(now) {
            self.pending_scroll = None;
            Some(self.apply_scroll(scroll_y))
        } else {
            self.pending_scroll = Some(scroll_y);
            None
        }
    }

    /// Window resize: re-evaluate visibility against the new viewport.
    pub fn on_resize(&mut self, viewport: Viewport) -> EvaluationSummary {
        self.viewport = viewport;
        self.animations.evaluate(&self.dom, viewport)
    }

    fn apply_scroll(&mut self, scroll_y: f64) -> EvaluationSummary {
        self.nav.update_active(&self.dom, scroll_y);
        self.scroll.on_scroll(&self.dom, scroll_y);
        let summary = self.animations.evaluate(&self.dom, self.viewport);
        tracing::trace!(
            target: "folio.app",
            scroll_y,
            transitions = summary.transitions,
            "scroll pass"
        );
        summary
    }

    pub fn on_theme_change<S>(&mut self, store: &S, checked: bool, now: Duration) -> Theme
    where
        S: PreferenceStore + ?Sized,
    {
        self.scheduler.sync(now);
        self.theme
            .on_change(&self.dom, store, &self.scheduler, checked)
    }

    /// Nav link click. Returns the document offset to smooth-scroll to.
    pub fn on_nav_click(&self, link: ElementId, scroll_y: f64) -> Option<f64> {
        self.nav.on_link_click(&self.dom, link, scroll_y)
    }

    pub fn on_hamburger_click(&self) -> bool {
        self.nav.toggle_menu(&self.dom)
    }

    /// Document `keydown`. Returns whether the easter egg fired.
    pub fn on_key(&mut self, key_code: u32, now: Duration) -> bool {
        if !self.konami.feed(key_code) {
            return false;
        }
        self.scheduler.sync(now);
        konami::activate_easter_egg(
            &self.dom,
            &self.scheduler,
            &self.config.feedback,
            &self.config.decor,
        )
        .is_some()
    }

    /// Document click at viewport point `(x, y)`. Buttons get a ripple.
    pub fn on_click(&self, target: ElementId, x: f64, y: f64, now: Duration) -> Option<ElementId> {
        if !self.dom.has_class(target, selectors::BUTTON_CLASS) {
            return None;
        }
        self.scheduler.sync(now);
        Some(decor::create_ripple(
            &self.dom,
            &self.scheduler,
            &self.config.decor,
            target,
            x,
            y,
        ))
    }

    pub fn on_orbit_enter(&self, item: ElementId) {
        self.orbit.on_enter(&self.dom, item);
    }

    pub fn on_orbit_leave(&self, item: ElementId) {
        self.orbit.on_leave(&self.dom, item);
    }

    pub fn on_orbit_click(&self, item: ElementId, now: Duration) {
        self.scheduler.sync(now);
        self.orbit.on_click(&self.dom, &self.scheduler, item);
    }

    pub fn on_mailto_click(&self, link: ElementId, now: Duration) -> bool {
        self.scheduler.sync(now);
        decor::on_mailto_click(&self.dom, &self.scheduler, &self.config.decor, link)
    }

    /// Window `load`.
    pub fn on_load(&self) {
        decor::on_page_load(&self.dom);
    }

    /// A detached handle for one submit event, so the host can await the
    /// send without borrowing the page.
    #[must_use]
    pub fn submission(&self) -> Option<Submission<D>> {
        let form = self.form.as_ref()?;
        Some(Submission {
            dom: self.dom.clone(),
            form: Rc::clone(form),
            feedback: Rc::clone(&self.feedback),
            scheduler: Rc::clone(&self.scheduler),
        })
    }
}

/// One contact form submission.
#[derive(Debug)]
pub struct Submission<D: Dom + Clone> {
    dom: D,
    form: Rc<ContactForm>,
    feedback: Rc<Feedback>,
    scheduler: Rc<Scheduler>,
}

impl<D: Dom + Clone> Submission<D> {
    /// Run the submit workflow.
    ///
    /// `now` reads the host's monotonic clock. It is sampled when the
    /// submission starts and again when the send settles, so feedback
    /// timers count from the moment they are shown.
    pub async fn run<S, C>(&self, sender: &S, now: C) -> SubmitOutcome
    where
        S: EmailSender,
        C: Fn() -> Duration,
    {
        self.scheduler.sync(now());
        let sender = SyncOnSettle {
            inner: sender,
            scheduler: &self.scheduler,
            now: &now,
        };
        let span = tracing::info_span!("folio.submit");
        self.form
            .submit(&self.dom, &sender, &self.feedback)
            .instrument(span)
            .await
    }
}

/// Re-syncs the scheduler once the wrapped send settles.
struct SyncOnSettle<'a, S, C> {
    inner: &'a S,
    scheduler: &'a Scheduler,
    now: &'a C,
}

impl<S, C> EmailSender for SyncOnSettle<'_, S, C>
where
    S: EmailSender,
    C: Fn() -> Duration,
{
    async fn send(
        &self,
        service_id: &str,
        template_id: &str,
        params: &TemplateParams,
    ) -> Result<SendResponse, SendError> {
        let result = self.inner.send(service_id, template_id, params).await;
        self.scheduler.sync((self.now)());
        result
    }
}
