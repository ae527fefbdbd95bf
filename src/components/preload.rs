use log::debug;
use web_sys::{HtmlImageElement, Window};

use super::Behavior;
use crate::dom::{self, EventBinding};
use crate::error::DomError;

/// Warms the browser cache with the page's large images after load.
pub struct Preloader {
    window: Window,
    assets: Vec<String>,
    bindings: Vec<EventBinding>,
}

impl Preloader {
    pub fn new(window: &Window, assets: &[String]) -> Option<Self> {
        if assets.is_empty() {
            return None;
        }
        Some(Self {
            window: window.clone(),
            assets: assets.to_vec(),
            bindings: Vec::new(),
        })
    }
}

fn preload(assets: &[String]) -> Result<(), DomError> {
    for src in assets {
        let image = HtmlImageElement::new()?;
        image.set_src(src);
        debug!("Preloading {}", src);
    }
    Ok(())
}

impl Behavior for Preloader {
    fn name(&self) -> &'static str {
        "Image preloading"
    }

    fn attach(&mut self) -> Result<(), DomError> {
        let assets = self.assets.clone();
        let binding = dom::when_loaded(&self.window, move || {
            dom::report("image preload", preload(&assets));
        })?;
        self.bindings.extend(binding);
        Ok(())
    }

    fn detach(&mut self) {
        self.bindings.clear();
    }
}
