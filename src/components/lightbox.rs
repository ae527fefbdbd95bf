use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, HtmlElement, HtmlImageElement, Node};

use super::Behavior;
use crate::dom::{self, EventBinding};
use crate::error::DomError;

/// An overlay currently attached to the page.
struct OpenModal {
    id: u32,
    overlay: Element,
    _bindings: Vec<EventBinding>,
}

/// Every overlay opened from the gallery.
///
/// Opening a second overlay while one is showing is not prevented; both stay
/// in the page. Body `overflow` is saved when the first one opens and stays
/// `hidden` until the last one closes.
#[derive(Clone)]
struct Modals {
    document: Document,
    body: HtmlElement,
    open: Rc<RefCell<Vec<OpenModal>>>,
    /// Body `overflow` from before the first open modal.
    saved_overflow: Rc<RefCell<Option<String>>>,
    next_id: Rc<Cell<u32>>,
}

impl Modals {
    fn show(&self, image: &HtmlImageElement) -> Result<(), DomError> {
        if !self.open.borrow().is_empty() {
            warn!("Opening a lightbox while another is still open");
        }

        let overlay = self.document.create_element("div")?;
        overlay.set_class_name("image-modal");
        let content = self.document.create_element("div")?;
        content.set_class_name("modal-content");
        let close = self.document.create_element("span")?;
        close.set_class_name("close-modal");
        close.set_text_content(Some("\u{00d7}"));
        let enlarged = self.document.create_element("img")?;
        enlarged.set_attribute("src", &image.src())?;
        enlarged.set_attribute("alt", &image.alt())?;
        content.append_child(&close)?;
        content.append_child(&enlarged)?;
        overlay.append_child(&content)?;

        if self.saved_overflow.borrow().is_none() {
            let current = self.body.style().get_property_value("overflow")?;
            *self.saved_overflow.borrow_mut() = Some(current);
        }
        self.body.append_child(&overlay)?;
        self.body.style().set_property("overflow", "hidden")?;

        let id = self.next_id.get();
        self.next_id.set(id.wrapping_add(1));

        let mut bindings = Vec::with_capacity(2);
        {
            let modals = self.clone();
            bindings.push(EventBinding::new(&close, "click", move |_| {
                dom::report("lightbox close", modals.close(id));
            })?);
        }
        {
            let modals = self.clone();
            let backdrop: Node = overlay.clone().into();
            bindings.push(EventBinding::new(&overlay, "click", move |e| {
                let target = e.target().and_then(|t| t.dyn_into::<Node>().ok());
                if backdrop.is_same_node(target.as_ref()) {
                    dom::report("lightbox backdrop", modals.close(id));
                }
            })?);
        }

        self.open.borrow_mut().push(OpenModal {
            id,
            overlay,
            _bindings: bindings,
        });
        debug!("Lightbox {} opened", id);
        Ok(())
    }

    fn close(&self, id: u32) -> Result<(), DomError> {
        let (modal, last) = {
            let mut open = self.open.borrow_mut();
            match open.iter().position(|m| m.id == id) {
                Some(index) => {
                    let modal = open.remove(index);
                    (modal, open.is_empty())
                }
                None => return Ok(()),
            }
        };
        modal.overlay.remove();
        if last {
            let saved = self.saved_overflow.borrow_mut().take().unwrap_or_default();
            if saved.is_empty() {
                self.body.style().remove_property("overflow")?;
            } else {
                self.body.style().set_property("overflow", &saved)?;
            }
        }
        debug!("Lightbox {} closed", id);
        // The listener running right now belongs to this modal, so its
        // bindings are released after the handler returns.
        spawn_local(async move { drop(modal) });
        Ok(())
    }

    fn close_all(&self) {
        let ids: Vec<u32> = self.open.borrow().iter().map(|m| m.id).collect();
        for id in ids {
            dom::report("lightbox close", self.close(id));
        }
    }
}

/// Enlarged image overlay for gallery items.
pub struct Lightbox {
    items: Vec<Element>,
    modals: Modals,
    bindings: Vec<EventBinding>,
}

impl Lightbox {
    pub fn from_document(document: &Document) -> Result<Option<Self>, DomError> {
        let items = dom::query_all(document, ".gallery-item")?;
        if items.is_empty() {
            return Ok(None);
        }
        Ok(Some(Self {
            items,
            modals: Modals {
                document: document.clone(),
                body: dom::body(document)?,
                open: Rc::new(RefCell::new(Vec::new())),
                saved_overflow: Rc::new(RefCell::new(None)),
                next_id: Rc::new(Cell::new(0)),
            },
            bindings: Vec::new(),
        }))
    }
}

impl Behavior for Lightbox {
    fn name(&self) -> &'static str {
        "Gallery lightbox"
    }

    fn attach(&mut self) -> Result<(), DomError> {
        for item in &self.items {
            let modals = self.modals.clone();
            let item_ref = item.clone();
            self.bindings.push(EventBinding::new(item, "click", move |_| {
                let image = item_ref
                    .query_selector("img")
                    .ok()
                    .flatten()
                    .and_then(|img| img.dyn_into::<HtmlImageElement>().ok());
                if let Some(image) = image {
                    dom::report("lightbox open", modals.show(&image));
                }
            })?);
        }
        Ok(())
    }

    fn detach(&mut self) {
        self.bindings.clear();
        self.modals.close_all();
    }
}
