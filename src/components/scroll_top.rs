use web_sys::{Document, Element, Event, HtmlElement, MouseEvent};
use yew::prelude::*;
use yew::AppHandle;
use yew_hooks::prelude::*;

use super::Behavior;
use crate::dom;
use crate::error::DomError;

/// Class of the element the button is rendered into.
pub const HOST_CLASS: &str = "scroll-to-top-host";

#[derive(Properties, PartialEq)]
pub struct ScrollToTopProps {
    pub show_after: f64,
}

#[function_component(ScrollToTop)]
pub fn scroll_to_top(props: &ScrollToTopProps) -> Html {
    let visible = use_state(|| false);

    {
        let visible = visible.clone();
        let show_after = props.show_after;
        use_event_with_window("scroll", move |_: Event| {
            let scroll_y = web_sys::window().map(|w| dom::scroll_y(&w)).unwrap_or(0.0);
            visible.set(scroll_y > show_after);
        });
    }

    let onclick = Callback::from(|_: MouseEvent| {
        if let Some(window) = web_sys::window() {
            dom::smooth_scroll_to(&window, 0.0);
        }
    });

    let style = if *visible { "display: flex;" } else { "display: none;" };

    html! {
        <button class="scroll-to-top" {style} {onclick}>
            <i class="fas fa-arrow-up"></i>
        </button>
    }
}

/// Mounts [`ScrollToTop`] in its own host element at the end of `<body>`.
pub struct ScrollTopButton {
    document: Document,
    body: HtmlElement,
    show_after: f64,
    host: Option<Element>,
    app: Option<AppHandle<ScrollToTop>>,
}

impl ScrollTopButton {
    pub fn from_document(document: &Document, show_after: f64) -> Result<Self, DomError> {
        Ok(Self {
            document: document.clone(),
            body: dom::body(document)?,
            show_after,
            host: None,
            app: None,
        })
    }
}

impl Behavior for ScrollTopButton {
    fn name(&self) -> &'static str {
        "Scroll to top"
    }

    fn attach(&mut self) -> Result<(), DomError> {
        let host = self.document.create_element("div")?;
        host.set_class_name(HOST_CLASS);
        self.body.append_child(&host)?;
        let props = ScrollToTopProps {
            show_after: self.show_after,
        };
        let renderer = yew::Renderer::<ScrollToTop>::with_root_and_props(host.clone(), props);
        self.app = Some(renderer.render());
        self.host = Some(host);
        Ok(())
    }

    fn detach(&mut self) {
        if let Some(app) = self.app.take() {
            app.destroy();
        }
        if let Some(host) = self.host.take() {
            host.remove();
        }
    }
}
