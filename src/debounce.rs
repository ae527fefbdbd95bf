use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;

/// Delays `action` until `wait_ms` have passed without another trigger.
///
/// Dropping a pending [`Timeout`] cancels it, so each trigger simply replaces
/// the previous one.
#[derive(Clone)]
pub struct Debounce {
    wait_ms: u32,
    action: Rc<dyn Fn()>,
    pending: Rc<RefCell<Option<Timeout>>>,
}

impl Debounce {
    pub fn new(wait_ms: u32, action: Rc<dyn Fn()>) -> Self {
        Self {
            wait_ms,
            action,
            pending: Rc::new(RefCell::new(None)),
        }
    }

    pub fn trigger(&self) {
        let action = self.action.clone();
        let timeout = Timeout::new(self.wait_ms, move || action());
        *self.pending.borrow_mut() = Some(timeout);
    }

    pub fn cancel(&self) {
        self.pending.borrow_mut().take();
    }
}
