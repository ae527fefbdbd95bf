pub mod anchors;
pub mod contact;
pub mod counter;
pub mod fade_in;
pub mod highlight;
pub mod indicator;
pub mod lightbox;
pub mod menu;
pub mod navbar;
pub mod preload;
pub mod scroll_top;
pub mod scroller;
pub mod video;

use crate::error::DomError;

/// One independent piece of page behavior, bound to the DOM nodes it owns.
pub trait Behavior {
    fn name(&self) -> &'static str;

    fn attach(&mut self) -> Result<(), DomError>;

    /// Removes every listener, observer and timer registered by `attach`.
    fn detach(&mut self);
}
