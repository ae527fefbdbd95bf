//! Thin helpers over web-sys shared by every behavior.

use log::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::Array;
use web_sys::{
    AddEventListenerOptions, Document, Element, Event, EventTarget, HtmlElement,
    IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit, ScrollBehavior,
    ScrollToOptions, Window,
};

use crate::error::DomError;

pub fn window() -> Result<Window, DomError> {
    web_sys::window().ok_or(DomError::NoWindow)
}

pub fn document() -> Result<Document, DomError> {
    window()?.document().ok_or(DomError::NoDocument)
}

pub fn body(document: &Document) -> Result<HtmlElement, DomError> {
    document.body().ok_or(DomError::NoBody)
}

/// Every element under `root` matching `selector`, in document order.
pub fn query_all(root: &JsValue, selector: &str) -> Result<Vec<Element>, DomError> {
    let list = if let Some(document) = root.dyn_ref::<Document>() {
        document.query_selector_all(selector)?
    } else if let Some(element) = root.dyn_ref::<Element>() {
        element.query_selector_all(selector)?
    } else {
        return Err(DomError::Cast("Document or Element"));
    };

    Ok((0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

pub fn scroll_y(window: &Window) -> f64 {
    window.scroll_y().unwrap_or(0.0)
}

pub fn smooth_scroll_to(window: &Window, top: f64) {
    let options = ScrollToOptions::new();
    options.set_top(top);
    options.set_behavior(ScrollBehavior::Smooth);
    window.scroll_to_with_scroll_to_options(&options);
}

pub fn smooth_scroll_by(element: &Element, left: f64) {
    let options = ScrollToOptions::new();
    options.set_left(left);
    options.set_behavior(ScrollBehavior::Smooth);
    element.scroll_by_with_scroll_to_options(&options);
}

pub fn set_style(element: &Element, property: &str, value: &str) -> Result<(), DomError> {
    let element = element
        .dyn_ref::<HtmlElement>()
        .ok_or(DomError::Cast("HtmlElement"))?;
    element.style().set_property(property, value)?;
    Ok(())
}

/// Logs a failed handler instead of letting it escape into the event loop.
pub fn report(context: &str, result: Result<(), DomError>) {
    if let Err(e) = result {
        warn!("{}: {}", context, e);
    }
}

/// An event listener that is removed from its target when dropped.
pub struct EventBinding {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl EventBinding {
    pub fn new<F>(target: &EventTarget, event: &'static str, handler: F) -> Result<Self, DomError>
    where
        F: FnMut(Event) + 'static,
    {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }

    /// Like `new`, but the browser drops the listener after its first dispatch.
    pub fn once<F>(target: &EventTarget, event: &'static str, handler: F) -> Result<Self, DomError>
    where
        F: FnMut(Event) + 'static,
    {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        let options = AddEventListenerOptions::new();
        options.set_once(true);
        target.add_event_listener_with_callback_and_add_event_listener_options(
            event,
            callback.as_ref().unchecked_ref(),
            &options,
        )?;
        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }
}

impl Drop for EventBinding {
    fn drop(&mut self) {
        let callback = self.callback.as_ref().unchecked_ref();
        let _ = self.target.remove_event_listener_with_callback(self.event, callback);
    }
}

/// Runs `f` once the window `load` event has fired, or right away if it
/// already has. The returned binding must be kept alive until then.
pub fn when_loaded<F>(window: &Window, mut f: F) -> Result<Option<EventBinding>, DomError>
where
    F: FnMut() + 'static,
{
    let ready = window
        .document()
        .map(|d| d.ready_state() == "complete")
        .unwrap_or(false);
    if ready {
        f();
        return Ok(None);
    }
    EventBinding::once(window, "load", move |_| f()).map(Some)
}

/// An intersection observer that reports targets as they become visible.
/// Disconnects when dropped.
pub struct Visibility {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(Array, IntersectionObserver)>,
}

impl Visibility {
    pub fn new<F>(
        threshold: f64,
        root_margin: Option<&str>,
        mut on_visible: F,
    ) -> Result<Self, DomError>
    where
        F: FnMut(&Element, &IntersectionObserver) + 'static,
    {
        let report = move |entries: Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let entry: IntersectionObserverEntry = entry.unchecked_into();
                if entry.is_intersecting() {
                    on_visible(&entry.target(), &observer);
                }
            }
        };
        let callback =
            Closure::wrap(Box::new(report) as Box<dyn FnMut(Array, IntersectionObserver)>);

        let options = IntersectionObserverInit::new();
        options.set_threshold(&JsValue::from_f64(threshold));
        if let Some(margin) = root_margin {
            options.set_root_margin(margin);
        }
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;

        Ok(Self {
            observer,
            _callback: callback,
        })
    }

    pub fn observe(&self, target: &Element) {
        self.observer.observe(target);
    }
}

impl Drop for Visibility {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}
