use web_sys::{Document, Element};

use super::Behavior;
use crate::config::Settings;
use crate::dom::{self, Visibility};
use crate::error::DomError;

/// Adds `visible` to each `.fade-in` element once it scrolls into view.
pub struct FadeIn {
    targets: Vec<Element>,
    threshold: f64,
    root_margin: String,
    observer: Option<Visibility>,
}

impl FadeIn {
    pub fn from_document(
        document: &Document,
        settings: &Settings,
    ) -> Result<Option<Self>, DomError> {
        let targets = dom::query_all(document, ".fade-in")?;
        if targets.is_empty() {
            return Ok(None);
        }
        Ok(Some(Self {
            targets,
            threshold: settings.fade_threshold,
            root_margin: settings.fade_root_margin.clone(),
            observer: None,
        }))
    }
}

impl Behavior for FadeIn {
    fn name(&self) -> &'static str {
        "Animations"
    }

    fn attach(&mut self) -> Result<(), DomError> {
        let margin = Some(self.root_margin.as_str());
        let observer = Visibility::new(self.threshold, margin, |target, _| {
            dom::report(
                "fade-in",
                target.class_list().add_1("visible").map_err(DomError::from),
            );
        })?;
        for target in &self.targets {
            observer.observe(target);
        }
        self.observer = Some(observer);
        Ok(())
    }

    fn detach(&mut self) {
        self.observer = None;
    }
}
