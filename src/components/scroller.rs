use std::cell::Cell;
use std::rc::Rc;

use log::debug;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, TouchEvent};

use super::Behavior;
use crate::dom::{self, EventBinding};
use crate::error::DomError;
use crate::gesture::{Direction, SwipeTracker};

pub const VIDEOS_SELECTOR: &str = ".videos-grid";
pub const GALLERY_SELECTOR: &str = ".gallery-grid";

/// A horizontally scrolling strip that moves by a fixed step, from arrow
/// buttons or from touch swipes.
pub struct HorizontalScroller {
    name: &'static str,
    container: Element,
    step: f64,
    swipe_threshold: f64,
    swipe: Rc<Cell<SwipeTracker>>,
    bindings: Vec<EventBinding>,
}

impl HorizontalScroller {
    pub fn from_document(
        document: &Document,
        name: &'static str,
        selector: &str,
        step: f64,
        swipe_threshold: f64,
    ) -> Result<Option<Self>, DomError> {
        Ok(document.query_selector(selector)?.map(|container| Self {
            name,
            container,
            step,
            swipe_threshold,
            swipe: Rc::new(Cell::new(SwipeTracker::default())),
            bindings: Vec::new(),
        }))
    }
}

fn touch_x(event: &Event) -> Option<f64> {
    event
        .dyn_ref::<TouchEvent>()?
        .changed_touches()
        .get(0)
        .map(|touch| touch.screen_x() as f64)
}

impl Behavior for HorizontalScroller {
    fn name(&self) -> &'static str {
        self.name
    }

    fn attach(&mut self) -> Result<(), DomError> {
        {
            let swipe = self.swipe.clone();
            self.bindings.push(EventBinding::new(&self.container, "touchstart", move |e| {
                if let Some(x) = touch_x(&e) {
                    let mut tracker = swipe.get();
                    tracker.begin(x);
                    swipe.set(tracker);
                }
            })?);
        }

        let swipe = self.swipe.clone();
        let container = self.container.clone();
        let step = self.step;
        let threshold = self.swipe_threshold;
        self.bindings.push(EventBinding::new(&self.container, "touchend", move |e| {
            let Some(x) = touch_x(&e) else { return };
            let mut tracker = swipe.get();
            let direction = tracker.finish(x, threshold);
            swipe.set(tracker);
            if let Some(direction) = direction {
                debug!("Swipe {:?}", direction);
                dom::smooth_scroll_by(&container, direction.offset(step));
            }
        })?);
        Ok(())
    }

    fn detach(&mut self) {
        self.bindings.clear();
    }
}

/// Scrolls the first element matching `selector`, if there is one. Backs the
/// arrow buttons in the page markup.
pub fn scroll_strip(selector: &str, step: f64, direction: Direction) -> Result<(), DomError> {
    if let Some(container) = dom::document()?.query_selector(selector)? {
        dom::smooth_scroll_by(&container, direction.offset(step));
    }
    Ok(())
}
