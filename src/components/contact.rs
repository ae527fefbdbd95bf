use std::collections::BTreeMap;
use std::rc::Rc;

use log::{debug, warn};
use serde::Deserialize;
use wasm_bindgen::JsCast;
use web_sys::js_sys::Object;
use web_sys::{Document, FormData, HtmlFormElement, Window};

use super::Behavior;
use crate::dom::{self, EventBinding};
use crate::error::DomError;

/// Field values of one contact form submission. Only kept long enough to
/// log which fields were filled in; nothing is sent anywhere.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct ContactMessage(BTreeMap<String, String>);

impl ContactMessage {
    pub fn filled_fields(&self) -> Vec<&str> {
        self.0
            .iter()
            .filter(|(_, value)| !value.trim().is_empty())
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

/// Shows the acknowledgement text to the visitor.
type Notice = Rc<dyn Fn(&str) -> Result<(), DomError>>;

/// Local acknowledgement for the contact form.
pub struct ContactForm {
    form: HtmlFormElement,
    acknowledgement: String,
    notice: Notice,
    bindings: Vec<EventBinding>,
}

impl ContactForm {
    /// Binds `#contactForm`, acknowledging submissions with `window.alert`.
    pub fn from_document(
        window: &Window,
        document: &Document,
        acknowledgement: &str,
    ) -> Option<Self> {
        let form = document
            .get_element_by_id("contactForm")?
            .dyn_into::<HtmlFormElement>()
            .ok()?;
        let window = window.clone();
        Some(Self {
            form,
            acknowledgement: acknowledgement.to_string(),
            notice: Rc::new(move |message: &str| {
                window.alert_with_message(message).map_err(DomError::from)
            }),
            bindings: Vec::new(),
        })
    }

    /// Replaces the alert with another way of showing the acknowledgement.
    pub fn with_notice<F>(mut self, notice: F) -> Self
    where
        F: Fn(&str) -> Result<(), DomError> + 'static,
    {
        self.notice = Rc::new(notice);
        self
    }
}

fn collect(form: &HtmlFormElement) -> Result<ContactMessage, DomError> {
    let data = FormData::new_with_form(form)?;
    let entries = Object::from_entries(&data)?;
    serde_wasm_bindgen::from_value(entries.into()).map_err(|e| DomError::Js(e.to_string()))
}

fn acknowledge(notice: &Notice, form: &HtmlFormElement, message: &str) -> Result<(), DomError> {
    match collect(form) {
        Ok(submission) => debug!("Contact form submitted: {:?}", submission.filled_fields()),
        Err(e) => warn!("Could not read contact form fields: {}", e),
    }
    notice(message)?;
    form.reset();
    Ok(())
}

impl Behavior for ContactForm {
    fn name(&self) -> &'static str {
        "Contact form"
    }

    fn attach(&mut self) -> Result<(), DomError> {
        let notice = self.notice.clone();
        let form = self.form.clone();
        let acknowledgement = self.acknowledgement.clone();
        self.bindings.push(EventBinding::new(&self.form, "submit", move |e| {
            e.prevent_default();
            dom::report("contact form", acknowledge(&notice, &form, &acknowledgement));
        })?);
        Ok(())
    }

    fn detach(&mut self) {
        self.bindings.clear();
    }
}
