use std::rc::Rc;

use log::debug;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, Window};

use super::Behavior;
use crate::config::Settings;
use crate::debounce::Debounce;
use crate::dom::{self, EventBinding};
use crate::error::DomError;

const ACTIVE: &str = "active";

/// Vertical extent of one `section[id]` on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionSpan {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

impl SectionSpan {
    pub fn contains(&self, y: f64) -> bool {
        y >= self.top && y < self.top + self.height
    }
}

/// Picks the section whose nav link should be highlighted.
///
/// Near the very top the home section always wins. Otherwise the first span
/// containing `scroll_y + offset` is chosen; `None` means no section matched
/// and the current highlight should stay as it is.
pub fn active_section<'a>(
    scroll_y: f64,
    offset: f64,
    home: &'a str,
    sections: &'a [SectionSpan],
) -> Option<&'a str> {
    if scroll_y < offset {
        return Some(home);
    }
    let lookahead = scroll_y + offset;
    sections
        .iter()
        .find(|s| s.contains(lookahead))
        .map(|s| s.id.as_str())
}

/// Highlights the nav link of the section currently in view.
pub struct ActiveSection {
    window: Window,
    sections: Vec<HtmlElement>,
    links: Vec<Element>,
    settings: Rc<Settings>,
    debounce: Option<Debounce>,
    bindings: Vec<EventBinding>,
}

impl ActiveSection {
    pub fn from_document(
        window: &Window,
        document: &Document,
        settings: Rc<Settings>,
    ) -> Result<Option<Self>, DomError> {
        let links = dom::query_all(document, ".nav-link")?;
        if links.is_empty() {
            return Ok(None);
        }
        let sections = dom::query_all(document, "section[id]")?
            .into_iter()
            .filter_map(|s| s.dyn_into::<HtmlElement>().ok())
            .collect();
        Ok(Some(Self {
            window: window.clone(),
            sections,
            links,
            settings,
            debounce: None,
            bindings: Vec::new(),
        }))
    }
}

fn measure(sections: &[HtmlElement]) -> Vec<SectionSpan> {
    sections
        .iter()
        .map(|s| SectionSpan {
            id: s.id(),
            top: s.offset_top() as f64,
            height: s.offset_height() as f64,
        })
        .collect()
}

/// Index of the first link pointing at `#id`. Later duplicates stay inactive.
pub fn active_link_index(hrefs: &[Option<String>], id: &str) -> Option<usize> {
    let href = format!("#{}", id);
    hrefs.iter().position(|h| h.as_deref() == Some(href.as_str()))
}

fn highlight(links: &[Element], id: &str) -> Result<(), DomError> {
    let hrefs: Vec<Option<String>> = links.iter().map(|l| l.get_attribute("href")).collect();
    for link in links {
        link.class_list().remove_1(ACTIVE)?;
    }
    if let Some(link) = active_link_index(&hrefs, id).and_then(|i| links.get(i)) {
        link.class_list().add_1(ACTIVE)?;
    }
    Ok(())
}

impl Behavior for ActiveSection {
    fn name(&self) -> &'static str {
        "Active menu highlighting"
    }

    fn attach(&mut self) -> Result<(), DomError> {
        let update: Rc<dyn Fn()> = {
            let window = self.window.clone();
            let sections = self.sections.clone();
            let links = self.links.clone();
            let settings = self.settings.clone();
            Rc::new(move || {
                let spans = measure(&sections);
                let scroll_y = dom::scroll_y(&window);
                if let Some(id) = active_section(
                    scroll_y,
                    settings.section_offset,
                    &settings.home_section,
                    &spans,
                ) {
                    debug!("Active section: {}", id);
                    dom::report("nav highlight", highlight(&links, id));
                }
            })
        };

        let debounce = Debounce::new(self.settings.highlight_debounce_ms, update.clone());
        {
            let debounce = debounce.clone();
            self.bindings
                .push(EventBinding::new(&self.window, "scroll", move |_| debounce.trigger())?);
        }
        self.debounce = Some(debounce);

        if let Some(binding) = dom::when_loaded(&self.window, move || update())? {
            self.bindings.push(binding);
        }
        Ok(())
    }

    fn detach(&mut self) {
        self.bindings.clear();
        if let Some(debounce) = self.debounce.take() {
            debounce.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Vec<SectionSpan> {
        [("home", 0.0, 800.0), ("about", 800.0, 600.0), ("videos", 1400.0, 900.0)]
            .iter()
            .map(|(id, top, height)| SectionSpan {
                id: id.to_string(),
                top: *top,
                height: *height,
            })
            .collect()
    }

    #[test]
    fn top_of_page_is_home() {
        let sections = page();
        assert_eq!(active_section(0.0, 100.0, "home", &sections), Some("home"));
        assert_eq!(active_section(99.9, 100.0, "home", &sections), Some("home"));
    }

    #[test]
    fn lookahead_offset_moves_the_boundary() {
        let sections = page();
        assert_eq!(active_section(699.0, 100.0, "home", &sections), Some("home"));
        assert_eq!(active_section(700.0, 100.0, "home", &sections), Some("about"));
        assert_eq!(active_section(1300.0, 100.0, "home", &sections), Some("videos"));
    }

    #[test]
    fn past_the_last_section_keeps_current() {
        let sections = page();
        assert_eq!(active_section(5000.0, 100.0, "home", &sections), None);
    }

    #[test]
    fn first_overlapping_section_wins() {
        let mut sections = page();
        sections.push(SectionSpan {
            id: "overlap".to_string(),
            top: 800.0,
            height: 600.0,
        });
        assert_eq!(active_section(900.0, 100.0, "home", &sections), Some("about"));
    }

    fn hrefs(raw: &[Option<&str>]) -> Vec<Option<String>> {
        raw.iter().map(|h| h.map(str::to_string)).collect()
    }

    #[test]
    fn only_the_first_matching_link_is_activated() {
        let links = hrefs(&[Some("#home"), Some("#about"), None, Some("#about")]);
        assert_eq!(active_link_index(&links, "about"), Some(1));
        assert_eq!(active_link_index(&links, "home"), Some(0));
    }

    #[test]
    fn unmatched_section_activates_nothing() {
        let links = hrefs(&[Some("#home"), None, Some("about")]);
        assert_eq!(active_link_index(&links, "about"), None);
        assert_eq!(active_link_index(&[], "home"), None);
    }
}
