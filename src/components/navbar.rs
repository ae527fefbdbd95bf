use web_sys::{Document, Element, Window};

use super::Behavior;
use crate::dom::{self, EventBinding};
use crate::error::DomError;

const SCROLLED: &str = "scrolled";

/// Switches the nav bar to its compact style once the page is scrolled.
pub struct NavbarStyle {
    window: Window,
    nav: Element,
    threshold: f64,
    bindings: Vec<EventBinding>,
}

impl NavbarStyle {
    pub fn from_document(window: &Window, document: &Document, threshold: f64) -> Option<Self> {
        document.get_element_by_id("navbar").map(|nav| Self {
            window: window.clone(),
            nav,
            threshold,
            bindings: Vec::new(),
        })
    }
}

impl Behavior for NavbarStyle {
    fn name(&self) -> &'static str {
        "Navbar scroll style"
    }

    fn attach(&mut self) -> Result<(), DomError> {
        let window = self.window.clone();
        let nav = self.nav.clone();
        let threshold = self.threshold;
        self.bindings.push(EventBinding::new(&self.window, "scroll", move |_| {
            let classes = nav.class_list();
            let result = if dom::scroll_y(&window) > threshold {
                classes.add_1(SCROLLED)
            } else {
                classes.remove_1(SCROLLED)
            };
            dom::report("navbar style", result.map_err(DomError::from));
        })?);
        Ok(())
    }

    fn detach(&mut self) {
        self.bindings.clear();
    }
}
