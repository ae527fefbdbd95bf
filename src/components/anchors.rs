use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, Window};

use super::Behavior;
use crate::dom::{self, EventBinding};
use crate::error::DomError;

/// Smooth scrolling for in-page `#id` links, leaving room for the fixed nav.
pub struct SmoothAnchors {
    window: Window,
    document: Document,
    anchors: Vec<Element>,
    bindings: Vec<EventBinding>,
}

impl SmoothAnchors {
    pub fn from_document(window: &Window, document: &Document) -> Result<Option<Self>, DomError> {
        let anchors = dom::query_all(document, "a[href^=\"#\"]")?;
        if anchors.is_empty() {
            return Ok(None);
        }
        Ok(Some(Self {
            window: window.clone(),
            document: document.clone(),
            anchors,
            bindings: Vec::new(),
        }))
    }
}

/// Page offset to scroll to so `target` lands just below the nav bar.
fn destination(document: &Document, href: &str) -> Option<f64> {
    let id = href.strip_prefix('#')?;
    if id.is_empty() {
        return None;
    }
    let target = document.get_element_by_id(id)?.dyn_into::<HtmlElement>().ok()?;
    let nav_height = document
        .get_element_by_id("navbar")
        .and_then(|nav| nav.dyn_into::<HtmlElement>().ok())
        .map(|nav| nav.offset_height())
        .unwrap_or(0);
    Some((target.offset_top() - nav_height) as f64)
}

impl Behavior for SmoothAnchors {
    fn name(&self) -> &'static str {
        "Smooth scrolling"
    }

    fn attach(&mut self) -> Result<(), DomError> {
        for anchor in &self.anchors {
            let window = self.window.clone();
            let document = self.document.clone();
            let link = anchor.clone();
            self.bindings.push(EventBinding::new(anchor, "click", move |e| {
                e.prevent_default();
                let top = link
                    .get_attribute("href")
                    .and_then(|href| destination(&document, &href));
                if let Some(top) = top {
                    dom::smooth_scroll_to(&window, top);
                }
            })?);
        }
        Ok(())
    }

    fn detach(&mut self) {
        self.bindings.clear();
    }
}
