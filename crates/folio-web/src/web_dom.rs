#![forbid(unsafe_code)]

//! [`Dom`] over the live document.
//!
//! Elements are registered on first sight and stamped with a
//! `data-folio-id` attribute, so the same node always maps to the same
//! [`ElementId`]. [`Dom::remove`] releases the node; its id is never handed
//! out again, so a timer still holding it becomes a no-op. Operations on
//! unknown or released ids are no-ops.

use std::cell::RefCell;
use std::rc::Rc;

use folio_core::{Dom, ElementId, Rect};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, HtmlTextAreaElement, Window};

const HANDLE_ATTR: &str = "data-folio-id";

/// Id handed out when an element could not be created.
const DANGLING: ElementId = ElementId::new(u32::MAX);

/// Cheaply clonable handle to the browser document.
#[derive(Debug, Clone)]
pub struct WebDom {
    window: Window,
    document: Document,
    elements: Rc<RefCell<Vec<Option<Element>>>>,
}

impl WebDom {
    /// `None` outside a browsing context.
    #[must_use]
    pub fn new() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self {
            window,
            document,
            elements: Rc::new(RefCell::new(Vec::new())),
        })
    }

    #[must_use]
    pub fn window(&self) -> &Window {
        &self.window
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Id of `el`, registering it if needed.
    pub fn handle(&self, el: &Element) -> ElementId {
        if let Some(id) = el
            .get_attribute(HANDLE_ATTR)
            .and_then(|raw| raw.parse::<u32>().ok())
            .filter(|&raw| {
                self.elements
                    .borrow()
                    .get(raw as usize)
                    .and_then(Option::as_ref)
                    .is_some_and(|known| known == el)
            })
        {
            return ElementId::new(id);
        }
        let mut elements = self.elements.borrow_mut();
        let id = elements.len() as u32;
        let _ = el.set_attribute(HANDLE_ATTR, &id.to_string());
        elements.push(Some(el.clone()));
        ElementId::new(id)
    }

    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<Element> {
        self.elements.borrow().get(id.get() as usize).cloned().flatten()
    }

    /// Number of registered elements not yet released.
    #[must_use]
    pub fn live_handles(&self) -> usize {
        self.elements.borrow().iter().flatten().count()
    }

    fn release(&self, id: ElementId) -> Option<Element> {
        let el = self.elements.borrow_mut().get_mut(id.get() as usize)?.take()?;
        let _ = el.remove_attribute(HANDLE_ATTR);
        Some(el)
    }

    fn html(&self, id: ElementId) -> Option<HtmlElement> {
        self.element(id)?.dyn_into::<HtmlElement>().ok()
    }

    /// Current vertical scroll offset of the window.
    #[must_use]
    pub fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    /// Current window size.
    #[must_use]
    pub fn viewport(&self) -> folio_core::observer::Viewport {
        let width = self
            .window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        let height = self
            .window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        folio_core::observer::Viewport::new(width, height)
    }

    fn collect(&self, list: web_sys::NodeList) -> Vec<ElementId> {
        (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|el| self.handle(&el))
            .collect()
    }
}

impl Dom for WebDom {
    fn query_all(&self, selector: &str) -> Vec<ElementId> {
        match self.document.query_selector_all(selector) {
            Ok(list) => self.collect(list),
            Err(err) => {
                tracing::warn!(target: "folio.web", selector, error = ?err, "invalid selector");
                Vec::new()
            }
        }
    }

    fn query_within(&self, parent: ElementId, selector: &str) -> Option<ElementId> {
        let parent = self.element(parent)?;
        let found = parent.query_selector(selector).ok().flatten()?;
        Some(self.handle(&found))
    }

    fn by_id(&self, id: &str) -> Option<ElementId> {
        let el = self.document.get_element_by_id(id)?;
        Some(self.handle(&el))
    }

    fn body(&self) -> Option<ElementId> {
        let body: Element = self.document.body()?.into();
        Some(self.handle(&body))
    }

    fn root(&self) -> Option<ElementId> {
        let root = self.document.document_element()?;
        Some(self.handle(&root))
    }

    fn head(&self) -> Option<ElementId> {
        let head: Element = self.document.head()?.into();
        Some(self.handle(&head))
    }

    fn attribute(&self, el: ElementId, name: &str) -> Option<String> {
        self.element(el)?.get_attribute(name)
    }

    fn set_attribute(&self, el: ElementId, name: &str, value: &str) {
        if let Some(el) = self.element(el) {
            let _ = el.set_attribute(name, value);
        }
    }

    fn remove_attribute(&self, el: ElementId, name: &str) {
        if let Some(el) = self.element(el) {
            let _ = el.remove_attribute(name);
        }
    }

    fn has_class(&self, el: ElementId, class: &str) -> bool {
        self.element(el)
            .is_some_and(|el| el.class_list().contains(class))
    }

    fn add_class(&self, el: ElementId, class: &str) {
        if let Some(el) = self.element(el) {
            let _ = el.class_list().add_1(class);
        }
    }

    fn remove_class(&self, el: ElementId, class: &str) {
        if let Some(el) = self.element(el) {
            let _ = el.class_list().remove_1(class);
        }
    }

    fn set_class_name(&self, el: ElementId, value: &str) {
        if let Some(el) = self.element(el) {
            el.set_class_name(value);
        }
    }

    fn style(&self, el: ElementId, property: &str) -> Option<String> {
        self.html(el)?
            .style()
            .get_property_value(property)
            .ok()
            .filter(|value| !value.is_empty())
    }

    fn set_style(&self, el: ElementId, property: &str, value: &str) {
        let Some(el) = self.html(el) else {
            return;
        };
        let style = el.style();
        if value.is_empty() {
            let _ = style.remove_property(property);
        } else {
            let _ = style.set_property(property, value);
        }
    }

    fn text(&self, el: ElementId) -> String {
        self.element(el)
            .and_then(|el| el.text_content())
            .unwrap_or_default()
    }

    fn set_text(&self, el: ElementId, text: &str) {
        if let Some(el) = self.element(el) {
            el.set_text_content(Some(text));
        }
    }

    fn value(&self, el: ElementId) -> String {
        let Some(el) = self.element(el) else {
            return String::new();
        };
        if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
            return input.value();
        }
        if let Some(area) = el.dyn_ref::<HtmlTextAreaElement>() {
            return area.value();
        }
        el.get_attribute("value").unwrap_or_default()
    }

    fn set_value(&self, el: ElementId, value: &str) {
        let Some(el) = self.element(el) else {
            return;
        };
        if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
            input.set_value(value);
        } else if let Some(area) = el.dyn_ref::<HtmlTextAreaElement>() {
            area.set_value(value);
        } else {
            let _ = el.set_attribute("value", value);
        }
    }

    fn is_disabled(&self, el: ElementId) -> bool {
        self.element(el)
            .is_some_and(|el| el.has_attribute("disabled"))
    }

    fn set_disabled(&self, el: ElementId, disabled: bool) {
        let Some(el) = self.element(el) else {
            return;
        };
        if disabled {
            let _ = el.set_attribute("disabled", "");
        } else {
            let _ = el.remove_attribute("disabled");
        }
    }

    fn is_checked(&self, el: ElementId) -> bool {
        self.element(el)
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            .is_some_and(|input| input.checked())
    }

    fn set_checked(&self, el: ElementId, checked: bool) {
        if let Some(input) = self
            .element(el)
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            input.set_checked(checked);
        }
    }

    fn create_element(&self, tag: &str) -> ElementId {
        match self.document.create_element(tag) {
            Ok(el) => self.handle(&el),
            Err(err) => {
                tracing::warn!(target: "folio.web", tag, error = ?err, "create_element failed");
                DANGLING
            }
        }
    }

    fn append_child(&self, parent: ElementId, child: ElementId) {
        if let (Some(parent), Some(child)) = (self.element(parent), self.element(child)) {
            let _ = parent.append_child(&child);
        }
    }

    fn remove(&self, el: ElementId) {
        if let Some(el) = self.release(el) {
            el.remove();
        }
    }

    fn is_connected(&self, el: ElementId) -> bool {
        self.element(el).is_some_and(|el| el.is_connected())
    }

    fn bounding_rect(&self, el: ElementId) -> Option<Rect> {
        let el = self.element(el).filter(|el| el.is_connected())?;
        let r = el.get_bounding_client_rect();
        Some(Rect::new(r.x(), r.y(), r.width(), r.height()))
    }

    fn client_size(&self, el: ElementId) -> (f64, f64) {
        self.element(el).map_or((0.0, 0.0), |el| {
            (f64::from(el.client_width()), f64::from(el.client_height()))
        })
    }
}
