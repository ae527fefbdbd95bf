//! Embedded video handling: lazy iframe loading and a link fallback for
//! embeds that never become interactive.

use gloo_timers::callback::Timeout;
use log::{debug, info};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlIFrameElement};

use super::Behavior;
use crate::dom::{self, EventBinding, Visibility};
use crate::error::DomError;

const INTERACTED: &str = "data-interacted";
const WRAPPER: &str = ".video-wrapper";
const OVERLAY: &str = ".video-link-overlay";

/// The `src` to give an iframe once its card is visible: the deferred
/// `data-src`, unless the iframe already has a source.
pub fn deferred_source(src: Option<String>, data_src: Option<String>) -> Option<String> {
    match src {
        Some(src) if !src.is_empty() => None,
        _ => data_src.filter(|s| !s.is_empty()),
    }
}

/// Hides the embed and shows the plain link in its place.
fn show_fallback(iframe: &Element, overlay: &Element) -> Result<(), DomError> {
    dom::set_style(iframe, "display", "none")?;
    dom::set_style(overlay, "display", "block")?;
    Ok(())
}

struct ShortEmbed {
    iframe: Element,
    overlay: Element,
}

/// Swaps Shorts embeds for a link when they look blocked, and any embed
/// whose iframe reports a load error.
pub struct VideoFallback {
    shorts: Vec<ShortEmbed>,
    iframes: Vec<Element>,
    delay_ms: u32,
    bindings: Vec<EventBinding>,
    timers: Vec<Timeout>,
}

impl VideoFallback {
    pub fn from_document(document: &Document, delay_ms: u32) -> Result<Option<Self>, DomError> {
        let mut shorts = Vec::new();
        for card in dom::query_all(document, "[data-video-type=\"short\"]")? {
            let Some(wrapper) = card.query_selector(WRAPPER)? else {
                continue;
            };
            let iframe = wrapper.query_selector(".video-iframe")?;
            let overlay = wrapper.query_selector(OVERLAY)?;
            if let (Some(iframe), Some(overlay)) = (iframe, overlay) {
                shorts.push(ShortEmbed { iframe, overlay });
            }
        }
        let iframes = dom::query_all(document, ".video-wrapper iframe")?;
        if shorts.is_empty() && iframes.is_empty() {
            return Ok(None);
        }
        Ok(Some(Self {
            shorts,
            iframes,
            delay_ms,
            bindings: Vec::new(),
            timers: Vec::new(),
        }))
    }
}

impl Behavior for VideoFallback {
    fn name(&self) -> &'static str {
        "Video fallback"
    }

    fn attach(&mut self) -> Result<(), DomError> {
        for short in &self.shorts {
            let iframe = short.iframe.clone();
            self.bindings.push(EventBinding::new(&short.iframe, "click", move |_| {
                dom::report(
                    "video interaction",
                    iframe.set_attribute(INTERACTED, "true").map_err(DomError::from),
                );
            })?);

            let iframe = short.iframe.clone();
            let overlay = short.overlay.clone();
            self.timers.push(Timeout::new(self.delay_ms, move || {
                if !iframe.has_attribute(INTERACTED) {
                    info!("Embed looks blocked, showing link instead");
                    dom::report("video fallback", show_fallback(&iframe, &overlay));
                }
            }));
        }

        for iframe in &self.iframes {
            let failed = iframe.clone();
            self.bindings.push(EventBinding::new(iframe, "error", move |_| {
                let overlay = failed
                    .closest(WRAPPER)
                    .ok()
                    .flatten()
                    .and_then(|wrapper| wrapper.query_selector(OVERLAY).ok().flatten());
                if let Some(overlay) = overlay {
                    dom::report("video error", show_fallback(&failed, &overlay));
                }
            })?);
        }
        Ok(())
    }

    fn detach(&mut self) {
        self.bindings.clear();
        self.timers.clear();
    }
}

/// Gives the card's iframe its deferred source. Returns the source that was
/// set, or `None` when the iframe already had one.
pub fn load_deferred(card: &Element) -> Option<String> {
    let iframe = card
        .query_selector("iframe")
        .ok()
        .flatten()?
        .dyn_into::<HtmlIFrameElement>()
        .ok()?;
    let source = deferred_source(iframe.get_attribute("src"), iframe.get_attribute("data-src"))?;
    debug!("Loading video {}", source);
    iframe.set_src(&source);
    Some(source)
}

/// Defers loading each video card's iframe until the card scrolls into view.
pub struct LazyVideos {
    cards: Vec<Element>,
    threshold: f64,
    observer: Option<Visibility>,
}

impl LazyVideos {
    pub fn from_document(document: &Document, threshold: f64) -> Result<Option<Self>, DomError> {
        let cards = dom::query_all(document, ".video-card")?;
        if cards.is_empty() {
            return Ok(None);
        }
        Ok(Some(Self {
            cards,
            threshold,
            observer: None,
        }))
    }
}

impl Behavior for LazyVideos {
    fn name(&self) -> &'static str {
        "Video lazy loading"
    }

    fn attach(&mut self) -> Result<(), DomError> {
        let observer = Visibility::new(self.threshold, None, |card, observer| {
            observer.unobserve(card);
            load_deferred(card);
        })?;
        for card in &self.cards {
            observer.observe(card);
        }
        self.observer = Some(observer);
        Ok(())
    }

    fn detach(&mut self) {
        self.observer = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_iframe_takes_data_src() {
        assert_eq!(
            deferred_source(None, Some("https://www.youtube.com/embed/abc".to_string())),
            Some("https://www.youtube.com/embed/abc".to_string())
        );
        assert_eq!(
            deferred_source(Some(String::new()), Some("clip.mp4".to_string())),
            Some("clip.mp4".to_string())
        );
    }

    #[test]
    fn loaded_iframe_is_left_alone() {
        assert_eq!(
            deferred_source(Some("clip.mp4".to_string()), Some("other.mp4".to_string())),
            None
        );
    }

    #[test]
    fn missing_data_src_does_nothing() {
        assert_eq!(deferred_source(None, None), None);
        assert_eq!(deferred_source(None, Some(String::new())), None);
    }
}
