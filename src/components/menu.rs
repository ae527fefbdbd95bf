use log::debug;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, KeyboardEvent};

use super::Behavior;
use crate::dom::{self, EventBinding};
use crate::error::DomError;

const OPEN: &str = "active";
const ICON_CLOSED: &str = "fa-bars";
const ICON_OPEN: &str = "fa-times";

/// Hamburger toggle for the collapsed navigation links.
pub struct MobileMenu {
    document: Document,
    toggle: Element,
    links: Element,
    bindings: Vec<EventBinding>,
}

impl MobileMenu {
    pub fn from_document(document: &Document) -> Result<Option<Self>, DomError> {
        let toggle = document.query_selector(".menu-toggle")?;
        let links = document.query_selector(".nav-links")?;
        Ok(match (toggle, links) {
            (Some(toggle), Some(links)) => Some(Self {
                document: document.clone(),
                toggle,
                links,
                bindings: Vec::new(),
            }),
            _ => None,
        })
    }
}

fn icon(toggle: &Element) -> Option<Element> {
    toggle.query_selector("i").ok().flatten()
}

fn flip(toggle: &Element, links: &Element) -> Result<(), DomError> {
    links.class_list().toggle(OPEN)?;
    if let Some(icon) = icon(toggle) {
        icon.class_list().toggle(ICON_CLOSED)?;
        icon.class_list().toggle(ICON_OPEN)?;
    }
    Ok(())
}

fn close(toggle: &Element, links: &Element) -> Result<(), DomError> {
    links.class_list().remove_1(OPEN)?;
    if let Some(icon) = icon(toggle) {
        icon.class_list().add_1(ICON_CLOSED)?;
        icon.class_list().remove_1(ICON_OPEN)?;
    }
    Ok(())
}

impl Behavior for MobileMenu {
    fn name(&self) -> &'static str {
        "Mobile menu"
    }

    fn attach(&mut self) -> Result<(), DomError> {
        {
            let toggle = self.toggle.clone();
            let links = self.links.clone();
            self.bindings.push(EventBinding::new(&self.toggle, "click", move |_| {
                dom::report("menu toggle", flip(&toggle, &links));
            })?);
        }

        for link in dom::query_all(&self.links, "a")? {
            let toggle = self.toggle.clone();
            let links = self.links.clone();
            self.bindings.push(EventBinding::new(&link, "click", move |_| {
                dom::report("menu close", close(&toggle, &links));
            })?);
        }

        let toggle = self.toggle.clone();
        let links = self.links.clone();
        self.bindings.push(EventBinding::new(&self.document, "keydown", move |e| {
            let escape = e
                .dyn_ref::<KeyboardEvent>()
                .map(|k| k.key() == "Escape")
                .unwrap_or(false);
            if escape && links.class_list().contains(OPEN) {
                debug!("Escape pressed, closing menu");
                dom::report("menu escape", close(&toggle, &links));
            }
        })?);

        Ok(())
    }

    fn detach(&mut self) {
        self.bindings.clear();
    }
}
