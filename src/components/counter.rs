use std::cell::RefCell;
use std::rc::Rc;

use log::debug;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::Function;
use web_sys::{Document, Element, Window};

use super::Behavior;
use crate::config::Settings;
use crate::dom::{self, Visibility};
use crate::error::DomError;

/// Text a stat number must still show for its animation to start.
const UNANIMATED: &str = "0";

/// Linear count-up from zero to `target`, one display string per frame.
///
/// Every frame adds `target / (duration / frame)`. While below the target the
/// frame shows `floor(current)+`; the last frame is exactly `"{target}+"`.
/// A duration shorter than one frame, or a non-positive timing, jumps straight
/// to the target.
#[derive(Debug, Clone)]
pub struct CountUp {
    target: u32,
    increment: f64,
    current: f64,
    finished: bool,
}

impl CountUp {
    pub fn new(target: u32, duration_ms: f64, frame_ms: f64) -> Self {
        let frames = duration_ms / frame_ms;
        let frames = if frames.is_finite() && frames >= 1.0 { frames } else { 1.0 };
        Self {
            target,
            increment: target as f64 / frames,
            current: 0.0,
            finished: false,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl Iterator for CountUp {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.finished {
            return None;
        }
        self.current += self.increment;
        if self.current < self.target as f64 {
            Some(format!("{}+", self.current.floor() as u32))
        } else {
            self.finished = true;
            Some(format!("{}+", self.target))
        }
    }
}

pub fn parse_target(raw: Option<&str>) -> Option<u32> {
    raw?.trim().parse().ok()
}

/// Counts the numbers in the stats block up once it is half visible.
pub struct StatCounters {
    window: Window,
    stats: Element,
    threshold: f64,
    duration_ms: f64,
    frame_ms: f64,
    observer: Option<Visibility>,
}

impl StatCounters {
    pub fn from_document(
        window: &Window,
        document: &Document,
        settings: &Settings,
    ) -> Option<Self> {
        document.get_element_by_id("stats").map(|stats| Self {
            window: window.clone(),
            stats,
            threshold: settings.stats_threshold,
            duration_ms: settings.counter_duration_ms,
            frame_ms: settings.counter_frame_ms,
            observer: None,
        })
    }
}

/// Drives `count` with `requestAnimationFrame`, applying the first frame now.
fn animate(window: Window, element: Element, mut count: CountUp) -> Result<(), DomError> {
    let frame: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let next = frame.clone();

    *frame.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        if let Some(text) = count.next() {
            element.set_text_content(Some(&text));
        }
        if count.is_finished() {
            // Drop our own handle so the closure is freed once it returns.
            next.borrow_mut().take();
            return;
        }
        if let Some(callback) = next.borrow().as_ref() {
            if let Err(e) = window.request_animation_frame(callback.as_ref().unchecked_ref()) {
                dom::report("counter frame", Err(e.into()));
            }
        }
    }) as Box<dyn FnMut()>));

    let first: Option<Function> = frame
        .borrow()
        .as_ref()
        .map(|callback| callback.as_ref().unchecked_ref::<Function>().clone());
    if let Some(first) = first {
        first.call0(&JsValue::NULL)?;
    }
    Ok(())
}

impl Behavior for StatCounters {
    fn name(&self) -> &'static str {
        "Stat counters"
    }

    fn attach(&mut self) -> Result<(), DomError> {
        let window = self.window.clone();
        let duration_ms = self.duration_ms;
        let frame_ms = self.frame_ms;
        let observer = Visibility::new(self.threshold, None, move |block, observer| {
            observer.unobserve(block);
            let numbers = match dom::query_all(block, ".stat-number") {
                Ok(numbers) => numbers,
                Err(e) => return dom::report("stat counters", Err(e)),
            };
            for number in numbers {
                if number.text_content().as_deref() != Some(UNANIMATED) {
                    continue;
                }
                let Some(target) = parse_target(number.get_attribute("data-target").as_deref())
                else {
                    continue;
                };
                debug!("Counting up to {}", target);
                let count = CountUp::new(target, duration_ms, frame_ms);
                dom::report("stat counter", animate(window.clone(), number, count));
            }
        })?;
        observer.observe(&self.stats);
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
    fn ends_exactly_on_target() {
        let frames: Vec<String> = CountUp::new(120, 2000.0, 16.0).collect();
        assert_eq!(frames.last().map(String::as_str), Some("120+"));
        assert_eq!(frames.iter().filter(|f| f.as_str() == "120+").count(), 1);
    }

    #[test]
    fn roughly_one_frame_per_sixteen_ms() {
        let frames = CountUp::new(120, 2000.0, 16.0).count();
        assert!((124..=126).contains(&frames), "got {} frames", frames);
    }

    #[test]
    fn zero_target_finishes_immediately() {
        let mut count = CountUp::new(0, 2000.0, 16.0);
        assert_eq!(count.next().as_deref(), Some("0+"));
        assert!(count.is_finished());
        assert_eq!(count.next(), None);
    }

    #[test]
    fn zero_frame_length_does_not_stall() {
        let frames: Vec<String> = CountUp::new(50, 2000.0, 0.0).collect();
        assert_eq!(frames, vec!["50+".to_string()]);
    }

    #[test]
    fn zero_duration_jumps_to_target() {
        let mut count = CountUp::new(50, 0.0, 16.0);
        assert_eq!(count.next().as_deref(), Some("50+"));
        assert!(count.is_finished());
    }

    #[test]
    fn target_parsing() {
        assert_eq!(parse_target(Some("120")), Some(120));
        assert_eq!(parse_target(Some(" 45 ")), Some(45));
        assert_eq!(parse_target(Some("-3")), None);
        assert_eq!(parse_target(Some("many")), None);
        assert_eq!(parse_target(None), None);
    }
}
