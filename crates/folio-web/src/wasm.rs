#![forbid(unsafe_code)]

//! `wasm-bindgen` entry point.
//!
//! `mountPortfolio` binds every behavior to the live page and returns a
//! handle that owns the listeners; dropping the handle (`free()` from JS)
//! detaches them. Timers and counter ramps run on `requestAnimationFrame`,
//! requested only while something is pending.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use folio_core::dom::selectors;
use folio_core::{Dom, ElementId, Portfolio};
use js_sys::{Object, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Element, Event, EventTarget, KeyboardEvent, MouseEvent, ScrollBehavior, ScrollToOptions,
    Window,
};
use web_time::Instant;

use crate::bridge;
use crate::console;
use crate::emailjs::EmailJsSender;
use crate::storage::LocalStorage;
use crate::web_dom::WebDom;

type Page = Rc<RefCell<Portfolio<WebDom>>>;

fn set_js(obj: &Object, key: &str, value: impl Into<JsValue>) {
    let _ = Reflect::set(obj, &JsValue::from_str(key), &value.into());
}

/// An attached event listener, detached on drop.
struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(
        target: &EventTarget,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Option<Self> {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target
            .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
            .ok()?;
        Some(Self {
            target: target.clone(),
            event,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}

/// `requestAnimationFrame` driver. At most one frame is outstanding.
struct FrameLoop {
    window: Window,
    scheduled: Cell<bool>,
    callback: RefCell<Option<Closure<dyn FnMut(f64)>>>,
}

impl FrameLoop {
    fn new(window: Window, page: Page, epoch: Instant) -> Rc<Self> {
        let frames = Rc::new(Self {
            window,
            scheduled: Cell::new(false),
            callback: RefCell::new(None),
        });
        let weak: Weak<Self> = Rc::downgrade(&frames);
        let callback = Closure::wrap(Box::new(move |_timestamp: f64| {
            let Some(frames) = weak.upgrade() else {
                return;
            };
            frames.scheduled.set(false);
            let busy = match page.try_borrow_mut() {
                Ok(mut page) => page.on_frame(epoch.elapsed()),
                Err(_) => true,
            };
            if busy {
                frames.request();
            }
        }) as Box<dyn FnMut(f64)>);
        *frames.callback.borrow_mut() = Some(callback);
        frames
    }

    fn request(&self) {
        if self.scheduled.get() {
            return;
        }
        let callback = self.callback.borrow();
        let Some(callback) = callback.as_ref() else {
            return;
        };
        match self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())
        {
            Ok(_) => self.scheduled.set(true),
            Err(err) => {
                tracing::warn!(target: "folio.web", error = ?err, "requestAnimationFrame failed");
            }
        }
    }
}

/// Wrap a page callback as an event handler. A frame is requested after
/// every event since most of them schedule timers.
fn page_handler(
    page: Page,
    frames: Rc<FrameLoop>,
    mut f: impl FnMut(&mut Portfolio<WebDom>, &Event) + 'static,
) -> impl FnMut(Event) + 'static {
    move |event: Event| {
        match page.try_borrow_mut() {
            Ok(mut page) => f(&mut page, &event),
            Err(_) => {
                tracing::debug!(target: "folio.web", event = %event.type_(), "page busy; event dropped");
            }
        }
        frames.request();
    }
}

struct Wiring {
    dom: WebDom,
    page: Page,
    frames: Rc<FrameLoop>,
    listeners: Vec<Listener>,
}

impl Wiring {
    fn listen(&mut self, target: &EventTarget, event: &'static str, handler: impl FnMut(Event) + 'static) {
        match Listener::attach(target, event, handler) {
            Some(listener) => self.listeners.push(listener),
            None => tracing::debug!(target: "folio.web", event, "listener not attached"),
        }
    }

    fn on_element(
        &mut self,
        el: ElementId,
        event: &'static str,
        f: impl FnMut(&mut Portfolio<WebDom>, &Event) + 'static,
    ) {
        let Some(target) = self.dom.element(el) else {
            return;
        };
        let handler = page_handler(Rc::clone(&self.page), Rc::clone(&self.frames), f);
        self.listen(target.as_ref(), event, handler);
    }

    fn on_window(&mut self, event: &'static str, f: impl FnMut(&mut Portfolio<WebDom>, &Event) + 'static) {
        let window = self.dom.window().clone();
        let handler = page_handler(Rc::clone(&self.page), Rc::clone(&self.frames), f);
        self.listen(window.as_ref(), event, handler);
    }

    fn on_document(&mut self, event: &'static str, f: impl FnMut(&mut Portfolio<WebDom>, &Event) + 'static) {
        let document = self.dom.document().clone();
        let handler = page_handler(Rc::clone(&self.page), Rc::clone(&self.frames), f);
        self.listen(document.as_ref(), event, handler);
    }
}

/// Live page returned by [`mount_portfolio`].
#[wasm_bindgen]
pub struct PortfolioHandle {
    page: Page,
    frames: Rc<FrameLoop>,
    _listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl PortfolioHandle {
    /// `"light"` or `"dark"`.
    pub fn theme(&self) -> String {
        self.page.borrow().theme().as_str().to_string()
    }

    /// Diagnostic snapshot for the devtools console.
    pub fn stats(&self) -> JsValue {
        let page = self.page.borrow();
        let obj = Object::new();
        set_js(&obj, "theme", page.theme().as_str());
        set_js(
            &obj,
            "countersInFlight",
            page.animations().counters().in_flight() as f64,
        );
        set_js(&obj, "pendingTimers", page.scheduler().pending() as f64);
        set_js(&obj, "navLinks", page.navigation().links().len() as f64);
        set_js(&obj, "contactForm", page.form().is_some());
        obj.into()
    }

    /// Re-run the scroll pass at the current offset, e.g. after the host
    /// changed the layout.
    pub fn refresh(&self) {
        let dom = self.page.borrow().dom().clone();
        if let Ok(mut page) = self.page.try_borrow_mut() {
            page.on_resize(dom.viewport());
        }
        self.frames.request();
    }
}

#[wasm_bindgen(js_name = mountPortfolio)]
pub fn mount_portfolio(config_json: Option<String>) -> Result<PortfolioHandle, JsValue> {
    console::install_panic_hook();
    console::install_tracing(tracing::Level::INFO);

    let config = bridge::parse_config(config_json.as_deref())
        .map_err(|err| JsValue::from_str(&err.to_string()))?;
    let dom = WebDom::new().ok_or_else(|| JsValue::from_str("no browser document"))?;
    let window = dom.window().clone();
    let store = Rc::new(LocalStorage::new(&window));
    let sender = EmailJsSender::init(&config.email.public_key);
    let epoch = Instant::now();

    let viewport = dom.viewport();
    let page: Page = Rc::new(RefCell::new(Portfolio::install(
        dom.clone(),
        config,
        &*store,
        viewport,
    )));
    let frames = FrameLoop::new(window.clone(), Rc::clone(&page), epoch);

    let mut wiring = Wiring {
        dom: dom.clone(),
        page: Rc::clone(&page),
        frames: Rc::clone(&frames),
        listeners: Vec::new(),
    };

    if let Some(switch) = dom.by_id(selectors::THEME_SWITCH_ID) {
        let dom = dom.clone();
        let store = Rc::clone(&store);
        wiring.on_element(switch, "change", move |page, _| {
            page.on_theme_change(&*store, dom.is_checked(switch), epoch.elapsed());
        });
    }

    let (links, hamburger, orbit) = {
        let page = page.borrow();
        (
            page.navigation().links().to_vec(),
            page.navigation().hamburger(),
            page.orbit().items().to_vec(),
        )
    };
    for link in links {
        let dom = dom.clone();
        wiring.on_element(link, "click", move |page, event| {
            event.prevent_default();
            if let Some(top) = page.on_nav_click(link, dom.scroll_y()) {
                let options = ScrollToOptions::new();
                options.set_top(top);
                options.set_behavior(ScrollBehavior::Smooth);
                dom.window().scroll_to_with_scroll_to_options(&options);
            }
        });
    }
    if let Some(hamburger) = hamburger {
        wiring.on_element(hamburger, "click", |page, _| {
            page.on_hamburger_click();
        });
    }

    {
        let dom = dom.clone();
        wiring.on_window("scroll", move |page, _| {
            page.on_scroll(dom.scroll_y(), epoch.elapsed());
        });
    }
    {
        let dom = dom.clone();
        wiring.on_window("resize", move |page, _| {
            page.on_resize(dom.viewport());
        });
    }

    for item in orbit {
        wiring.on_element(item, "mouseenter", move |page, _| page.on_orbit_enter(item));
        wiring.on_element(item, "mouseleave", move |page, _| page.on_orbit_leave(item));
        wiring.on_element(item, "click", move |page, _| {
            page.on_orbit_click(item, epoch.elapsed());
        });
    }

    {
        let dom = dom.clone();
        wiring.on_document("click", move |page, event| {
            let Some(target) = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .filter(|el| el.class_list().contains(selectors::BUTTON_CLASS))
            else {
                return;
            };
            let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            let target = dom.handle(&target);
            page.on_click(
                target,
                f64::from(mouse.client_x()),
                f64::from(mouse.client_y()),
                epoch.elapsed(),
            );
        });
    }
    wiring.on_document("keydown", move |page, event| {
        if let Some(key) = event.dyn_ref::<KeyboardEvent>() {
            page.on_key(key.key_code(), epoch.elapsed());
        }
    });

    for link in dom.query_all(selectors::MAILTO_LINK) {
        wiring.on_element(link, "click", move |page, _| {
            page.on_mailto_click(link, epoch.elapsed());
        });
    }

    if dom.document().ready_state() == "complete" {
        page.borrow().on_load();
    } else {
        wiring.on_window("load", |page, _| page.on_load());
    }

    let form = page.borrow().form().map(|form| form.element());
    if let Some(form) = form {
        let submit_frames = Rc::clone(&frames);
        wiring.on_element(form, "submit", move |page, event| {
            event.prevent_default();
            let Some(submission) = page.submission() else {
                return;
            };
            let frames = Rc::clone(&submit_frames);
            wasm_bindgen_futures::spawn_local(async move {
                let outcome = submission.run(&sender, || epoch.elapsed()).await;
                tracing::debug!(target: "folio.web", outcome = ?outcome, "submission settled");
                frames.request();
            });
        });
    }

    frames.request();
    tracing::info!(
        target: "folio.web",
        listeners = wiring.listeners.len(),
        "portfolio mounted"
    );

    Ok(PortfolioHandle {
        page,
        frames,
        _listeners: wiring.listeners,
    })
}
