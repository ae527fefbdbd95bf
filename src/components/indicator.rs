use web_sys::{Document, Element};

use super::scroller::{GALLERY_SELECTOR, VIDEOS_SELECTOR};
use super::Behavior;
use crate::dom::{self, EventBinding};
use crate::error::DomError;

/// Fades out the "swipe for more" hints after the first horizontal scroll.
pub struct ScrollIndicators {
    strips: Vec<Element>,
    indicators: Vec<Element>,
    bindings: Vec<EventBinding>,
}

impl ScrollIndicators {
    pub fn from_document(document: &Document) -> Result<Option<Self>, DomError> {
        let indicators = dom::query_all(document, ".scroll-indicator")?;
        let mut strips = Vec::new();
        for selector in [VIDEOS_SELECTOR, GALLERY_SELECTOR] {
            if let Some(strip) = document.query_selector(selector)? {
                strips.push(strip);
            }
        }
        if strips.is_empty() || indicators.is_empty() {
            return Ok(None);
        }
        Ok(Some(Self {
            strips,
            indicators,
            bindings: Vec::new(),
        }))
    }
}

fn hide(indicators: &[Element]) -> Result<(), DomError> {
    for indicator in indicators {
        dom::set_style(indicator, "opacity", "0")?;
        dom::set_style(indicator, "transition", "opacity 0.5s ease")?;
    }
    Ok(())
}

impl Behavior for ScrollIndicators {
    fn name(&self) -> &'static str {
        "Scroll indicators"
    }

    fn attach(&mut self) -> Result<(), DomError> {
        for strip in &self.strips {
            let indicators = self.indicators.clone();
            self.bindings.push(EventBinding::once(strip, "scroll", move |_| {
                dom::report("scroll indicators", hide(&indicators));
            })?);
        }
        Ok(())
    }

    fn detach(&mut self) {
        self.bindings.clear();
    }
}
