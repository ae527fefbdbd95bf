//! Interactive behavior for the portfolio page: navigation, scroll effects,
//! media strips, the stats counter, the contact form and the lightbox.
//!
//! Each feature is a [`Behavior`] bound to the DOM nodes it finds at startup.
//! A feature whose markup is missing is skipped.

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{Document, Window};

pub mod components;
pub mod config;
pub mod debounce;
pub mod dom;
pub mod error;
pub mod gesture;

use components::anchors::SmoothAnchors;
use components::contact::ContactForm;
use components::counter::StatCounters;
use components::fade_in::FadeIn;
use components::highlight::ActiveSection;
use components::indicator::ScrollIndicators;
use components::lightbox::Lightbox;
use components::menu::MobileMenu;
use components::navbar::NavbarStyle;
use components::preload::Preloader;
use components::scroll_top::ScrollTopButton;
use components::scroller::{self, HorizontalScroller, GALLERY_SELECTOR, VIDEOS_SELECTOR};
use components::video::{LazyVideos, VideoFallback};
use components::Behavior;
use config::Settings;
use error::DomError;
use gesture::Direction;

thread_local! {
    static PAGE: RefCell<Option<Page>> = RefCell::new(None);
}

pub struct Page {
    settings: Rc<Settings>,
    behaviors: Vec<Box<dyn Behavior>>,
    attached: bool,
}

impl Page {
    pub fn assemble(
        window: &Window,
        document: &Document,
        settings: Settings,
    ) -> Result<Self, DomError> {
        let settings = Rc::new(settings);
        let mut behaviors: Vec<Box<dyn Behavior>> = Vec::new();
        let mut skipped = Vec::new();

        fn push<B: Behavior + 'static>(
            behaviors: &mut Vec<Box<dyn Behavior>>,
            skipped: &mut Vec<&'static str>,
            name: &'static str,
            behavior: Option<B>,
        ) {
            match behavior {
                Some(b) => behaviors.push(Box::new(b)),
                None => skipped.push(name),
            }
        }

        push(&mut behaviors, &mut skipped, "Mobile menu", MobileMenu::from_document(document)?);
        push(
            &mut behaviors,
            &mut skipped,
            "Active menu highlighting",
            ActiveSection::from_document(window, document, settings.clone())?,
        );
        push(
            &mut behaviors,
            &mut skipped,
            "Navbar scroll style",
            NavbarStyle::from_document(window, document, settings.navbar_scrolled_after),
        );
        push(
            &mut behaviors,
            &mut skipped,
            "Animations",
            FadeIn::from_document(document, &settings)?,
        );
        push(
            &mut behaviors,
            &mut skipped,
            "Smooth scrolling",
            SmoothAnchors::from_document(window, document)?,
        );
        push(
            &mut behaviors,
            &mut skipped,
            "Video strip",
            HorizontalScroller::from_document(
                document,
                "Video strip",
                VIDEOS_SELECTOR,
                settings.video_step,
                settings.swipe_threshold,
            )?,
        );
        push(
            &mut behaviors,
            &mut skipped,
            "Gallery strip",
            HorizontalScroller::from_document(
                document,
                "Gallery strip",
                GALLERY_SELECTOR,
                settings.gallery_step,
                settings.swipe_threshold,
            )?,
        );
        push(
            &mut behaviors,
            &mut skipped,
            "Scroll indicators",
            ScrollIndicators::from_document(document)?,
        );
        push(
            &mut behaviors,
            &mut skipped,
            "Stat counters",
            StatCounters::from_document(window, document, &settings),
        );
        push(
            &mut behaviors,
            &mut skipped,
            "Contact form",
            ContactForm::from_document(window, document, &settings.contact_acknowledgement),
        );
        push(
            &mut behaviors,
            &mut skipped,
            "Image preloading",
            Preloader::new(window, &settings.preload),
        );
        push(
            &mut behaviors,
            &mut skipped,
            "Video fallback",
            VideoFallback::from_document(document, settings.fallback_delay_ms)?,
        );
        push(
            &mut behaviors,
            &mut skipped,
            "Video lazy loading",
            LazyVideos::from_document(document, settings.lazy_threshold)?,
        );
        push(&mut behaviors, &mut skipped, "Gallery lightbox", Lightbox::from_document(document)?);
        push(
            &mut behaviors,
            &mut skipped,
            "Scroll to top",
            Some(ScrollTopButton::from_document(document, settings.scroll_top_after)?),
        );

        for name in skipped {
            debug!("{}: markup not found, skipped", name);
        }

        Ok(Self {
            settings,
            behaviors,
            attached: false,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn attach(&mut self) {
        if self.attached {
            return;
        }
        for behavior in self.behaviors.iter_mut() {
            match behavior.attach() {
                Ok(()) => info!("{}: enabled", behavior.name()),
                Err(e) => {
                    warn!("{}: failed to attach: {}", behavior.name(), e);
                    behavior.detach();
                }
            }
        }
        self.attached = true;
    }

    pub fn detach(&mut self) {
        for behavior in self.behaviors.iter_mut().rev() {
            behavior.detach();
        }
        self.attached = false;
    }
}

/// Builds the page behaviors and keeps them alive for the document's lifetime.
pub fn run() -> Result<(), DomError> {
    let window = dom::window()?;
    let document = window.document().ok_or(DomError::NoDocument)?;
    let settings = Settings::from_document(&document);

    teardown();
    let mut page = Page::assemble(&window, &document, settings)?;
    page.attach();
    PAGE.with(|slot| *slot.borrow_mut() = Some(page));
    info!("Website initialized");
    Ok(())
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(config::log_level()).is_err() {
        web_sys::console::warn_1(&"logger already initialized".into());
    }

    let document = dom::document()?;
    if document.ready_state() == "loading" {
        let pending = dom::EventBinding::once(&document, "DOMContentLoaded", |_| {
            dom::report("startup", run());
        })?;
        // Fires exactly once; the listener lives as long as the page.
        std::mem::forget(pending);
        return Ok(());
    }
    run().map_err(JsValue::from)
}

/// Builds the page again from the current markup. Exported to JavaScript.
#[wasm_bindgen]
pub fn rebuild() -> Result<(), JsValue> {
    run().map_err(JsValue::from)
}

/// Detaches every behavior. The page can be built again with [`rebuild`].
#[wasm_bindgen]
pub fn teardown() {
    PAGE.with(|slot| {
        if let Some(mut page) = slot.borrow_mut().take() {
            page.detach();
            info!("Website behaviors detached");
        }
    });
}

fn configured_step(pick: fn(&Settings) -> f64) -> f64 {
    PAGE.with(|slot| slot.borrow().as_ref().map(|page| pick(page.settings())))
        .unwrap_or_else(|| pick(&Settings::default()))
}

/// Called from the video strip's arrow buttons.
#[wasm_bindgen(js_name = scrollVideos)]
pub fn scroll_videos(direction: &str) {
    let step = configured_step(|s| s.video_step);
    dom::report(
        "scroll videos",
        scroller::scroll_strip(VIDEOS_SELECTOR, step, Direction::from_label(direction)),
    );
}

/// Called from the gallery strip's arrow buttons.
#[wasm_bindgen(js_name = scrollGallery)]
pub fn scroll_gallery(direction: &str) {
    let step = configured_step(|s| s.gallery_step);
    dom::report(
        "scroll gallery",
        scroller::scroll_strip(GALLERY_SELECTOR, step, Direction::from_label(direction)),
    );
}
