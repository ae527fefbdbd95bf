#![cfg(target_arch = "wasm32")]

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::future::TimeoutFuture;
use portfolio_frontend::components::contact::ContactForm;
use portfolio_frontend::components::lightbox::Lightbox;
use portfolio_frontend::components::scroll_top::HOST_CLASS;
use portfolio_frontend::components::video::{load_deferred, LazyVideos, VideoFallback};
use portfolio_frontend::components::Behavior;
use portfolio_frontend::config::Settings;
use portfolio_frontend::{dom, rebuild, teardown};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{
    Document, Element, Event, EventInit, HtmlElement, HtmlFormElement, HtmlInputElement,
    HtmlTextAreaElement, Window,
};

wasm_bindgen_test_configure!(run_in_browser);

const PIXEL: &str = "data:image/gif;base64,R0lGODlhAQABAAAAACw=";

/// Markup appended to `<body>` for one test and removed when dropped.
struct Fixture {
    root: Element,
}

impl Fixture {
    fn new(markup: &str) -> Self {
        let document = document();
        let root = document.create_element("div").unwrap();
        root.set_inner_html(markup);
        dom::body(&document).unwrap().append_child(&root).unwrap();
        Self { root }
    }

    fn find<T: JsCast>(&self, selector: &str) -> T {
        self.root
            .query_selector(selector)
            .unwrap()
            .unwrap_or_else(|| panic!("no {} in fixture", selector))
            .dyn_into::<T>()
            .unwrap()
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        self.root.remove();
    }
}

fn window() -> Window {
    dom::window().unwrap()
}

fn document() -> Document {
    dom::document().unwrap()
}

fn count(selector: &str) -> u32 {
    document().query_selector_all(selector).unwrap().length()
}

fn style(element: &Element, property: &str) -> String {
    element
        .dyn_ref::<HtmlElement>()
        .unwrap()
        .style()
        .get_property_value(property)
        .unwrap()
}

fn body_overflow() -> String {
    style(&dom::body(&document()).unwrap(), "overflow")
}

fn resource_requests() -> u32 {
    window()
        .performance()
        .unwrap()
        .get_entries_by_type("resource")
        .length()
}

const CONTACT: &str = r#"
    <form id="contactForm">
        <input name="name">
        <input name="email">
        <input name="subject">
        <textarea name="message"></textarea>
        <button type="submit">Send</button>
    </form>"#;

#[wasm_bindgen_test]
fn contact_submission_is_acknowledged_locally_and_cleared() {
    let page = Fixture::new(CONTACT);
    for (field, value) in [("name", "Ada"), ("email", "ada@example.com"), ("subject", "Hi")] {
        page.find::<HtmlInputElement>(&format!("input[name={}]", field))
            .set_value(value);
    }
    let message: HtmlTextAreaElement = page.find("textarea");
    message.set_value("Loved the gallery");

    let notices = Rc::new(RefCell::new(Vec::<String>::new()));
    let seen = notices.clone();
    let mut form = ContactForm::from_document(&window(), &document(), "Thanks!")
        .unwrap()
        .with_notice(move |text| {
            seen.borrow_mut().push(text.to_string());
            Ok(())
        });
    form.attach().unwrap();

    let requests = resource_requests();
    let init = EventInit::new();
    init.set_bubbles(true);
    init.set_cancelable(true);
    let submit = Event::new_with_event_init_dict("submit", &init).unwrap();
    let proceeded = page.find::<HtmlFormElement>("#contactForm").dispatch_event(&submit).unwrap();

    assert!(!proceeded, "submission must not navigate");
    assert_eq!(*notices.borrow(), vec!["Thanks!".to_string()]);
    for field in ["name", "email", "subject"] {
        let input: HtmlInputElement = page.find(&format!("input[name={}]", field));
        assert_eq!(input.value(), "", "{} was not cleared", field);
    }
    assert_eq!(message.value(), "");
    assert_eq!(resource_requests(), requests);
    form.detach();
}

fn gallery() -> Fixture {
    Fixture::new(&format!(
        r#"<div class="gallery-item"><img src="{0}" alt="Harbor"></div>
           <div class="gallery-item"><img src="{0}" alt="Dunes"></div>"#,
        PIXEL
    ))
}

fn overlay() -> HtmlElement {
    document()
        .query_selector(".image-modal")
        .unwrap()
        .unwrap()
        .dyn_into()
        .unwrap()
}

#[wasm_bindgen_test]
fn gallery_click_opens_one_overlay_that_survives_image_clicks() {
    let page = gallery();
    let mut lightbox = Lightbox::from_document(&document()).unwrap().unwrap();
    lightbox.attach().unwrap();

    page.find::<HtmlElement>(".gallery-item").click();
    assert_eq!(count(".image-modal"), 1);
    assert_eq!(body_overflow(), "hidden");

    let enlarged: HtmlElement = overlay().query_selector("img").unwrap().unwrap().unchecked_into();
    assert_eq!(enlarged.get_attribute("alt").as_deref(), Some("Harbor"));
    enlarged.click();
    assert_eq!(count(".image-modal"), 1);

    lightbox.detach();
    assert_eq!(count(".image-modal"), 0);
}

#[wasm_bindgen_test]
fn close_button_and_backdrop_both_close_and_restore_scrolling() {
    let page = gallery();
    let mut lightbox = Lightbox::from_document(&document()).unwrap().unwrap();
    lightbox.attach().unwrap();
    let item: HtmlElement = page.find(".gallery-item");

    item.click();
    let close = overlay().query_selector(".close-modal").unwrap().unwrap();
    close.unchecked_into::<HtmlElement>().click();
    assert_eq!(count(".image-modal"), 0);
    assert_eq!(body_overflow(), "");

    item.click();
    overlay().click();
    assert_eq!(count(".image-modal"), 0);
    assert_eq!(body_overflow(), "");

    lightbox.detach();
}

#[wasm_bindgen_test]
fn scrolling_stays_locked_until_the_last_overlay_closes() {
    let page = gallery();
    let mut lightbox = Lightbox::from_document(&document()).unwrap().unwrap();
    lightbox.attach().unwrap();

    let items = page.root.query_selector_all(".gallery-item").unwrap();
    for i in 0..items.length() {
        items.item(i).unwrap().unchecked_into::<HtmlElement>().click();
    }
    assert_eq!(count(".image-modal"), 2);

    overlay().click();
    assert_eq!(count(".image-modal"), 1);
    assert_eq!(body_overflow(), "hidden");

    overlay().click();
    assert_eq!(count(".image-modal"), 0);
    assert_eq!(body_overflow(), "");

    lightbox.detach();
}

const VIDEO_CARD: &str = r#"
    <div class="video-card">
        <iframe data-src="about:blank#first"></iframe>
    </div>"#;

#[wasm_bindgen_test]
fn deferred_source_is_only_assigned_once() {
    let page = Fixture::new(VIDEO_CARD);
    let card: Element = page.find(".video-card");
    let iframe: Element = page.find("iframe");

    assert_eq!(load_deferred(&card).as_deref(), Some("about:blank#first"));
    iframe.set_attribute("data-src", "about:blank#second").unwrap();
    assert_eq!(load_deferred(&card), None);
    assert_eq!(iframe.get_attribute("src").as_deref(), Some("about:blank#first"));
}

#[wasm_bindgen_test]
async fn visible_card_loads_once_across_repeated_intersections() {
    let page = Fixture::new(VIDEO_CARD);
    let card: Element = page.find(".video-card");
    let iframe: Element = page.find("iframe");
    card.scroll_into_view();

    let mut lazy = LazyVideos::from_document(&document(), 0.1).unwrap().unwrap();
    lazy.attach().unwrap();
    TimeoutFuture::new(100).await;
    assert_eq!(iframe.get_attribute("src").as_deref(), Some("about:blank#first"));

    // A fresh observer reports the card again.
    iframe.set_attribute("data-src", "about:blank#second").unwrap();
    lazy.detach();
    lazy.attach().unwrap();
    TimeoutFuture::new(100).await;
    assert_eq!(iframe.get_attribute("src").as_deref(), Some("about:blank#first"));
    lazy.detach();
}

const SHORT: &str = r#"
    <div data-video-type="short">
        <div class="video-wrapper">
            <iframe class="video-iframe" src="about:blank"></iframe>
            <a class="video-link-overlay" href="https://example.com" style="display: none">Watch</a>
        </div>
    </div>"#;

fn quick_fallback() -> VideoFallback {
    let settings = Settings {
        fallback_delay_ms: 20,
        ..Settings::default()
    };
    VideoFallback::from_document(&document(), settings.fallback_delay_ms)
        .unwrap()
        .unwrap()
}

#[wasm_bindgen_test]
async fn untouched_short_swaps_to_its_link_after_the_delay() {
    let page = Fixture::new(SHORT);
    let iframe: Element = page.find(".video-iframe");
    let link: Element = page.find(".video-link-overlay");
    let mut fallback = quick_fallback();
    fallback.attach().unwrap();

    assert_eq!(style(&iframe, "display"), "");
    TimeoutFuture::new(80).await;
    assert_eq!(style(&iframe, "display"), "none");
    assert_eq!(style(&link, "display"), "block");
    fallback.detach();
}

#[wasm_bindgen_test]
async fn clicked_short_keeps_its_embed() {
    let page = Fixture::new(SHORT);
    let iframe: HtmlElement = page.find(".video-iframe");
    let link: Element = page.find(".video-link-overlay");
    let mut fallback = quick_fallback();
    fallback.attach().unwrap();

    iframe.click();
    TimeoutFuture::new(80).await;
    assert_eq!(style(&iframe, "display"), "");
    assert_eq!(style(&link, "display"), "none");
    fallback.detach();
}

#[wasm_bindgen_test]
fn rebuild_replaces_the_attached_page() {
    let host = format!(".{}", HOST_CLASS);
    teardown();
    assert_eq!(count(&host), 0);

    rebuild().unwrap();
    rebuild().unwrap();
    assert_eq!(count(&host), 1);

    teardown();
    assert_eq!(count(&host), 0);
}
