//! Horizontal swipe classification, kept free of DOM types.

use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Horizontal delta for one step in this direction.
    pub fn offset(self, step: f64) -> f64 {
        match self {
            Direction::Left => -step,
            Direction::Right => step,
        }
    }

    /// Markup buttons pass `"left"` or `"right"`; anything but `"left"` goes right.
    pub fn from_label(label: &str) -> Self {
        label.parse().unwrap_or(Direction::Right)
    }
}

impl FromStr for Direction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(()),
        }
    }
}

/// Start and end x-coordinates of the last touch gesture on one scroller.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct SwipeTracker {
    start_x: f64,
    end_x: f64,
}

impl SwipeTracker {
    pub fn begin(&mut self, x: f64) {
        self.start_x = x;
    }

    /// Records the end of a gesture and returns which way to scroll, if the
    /// finger travelled further than `threshold`.
    pub fn finish(&mut self, x: f64, threshold: f64) -> Option<Direction> {
        self.end_x = x;
        classify(self.start_x, self.end_x, threshold)
    }
}

/// Swiping towards the left reveals content on the right, and vice versa.
pub fn classify(start_x: f64, end_x: f64, threshold: f64) -> Option<Direction> {
    if end_x < start_x - threshold {
        Some(Direction::Right)
    } else if end_x > start_x + threshold {
        Some(Direction::Left)
    } else {
        None
    }
}
