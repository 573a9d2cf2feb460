//! Gesture classifier: turns a pointer stream on the active card into one
//! discrete swipe outcome.
//!
//! Classification uses displacement at release only. There is no velocity
//! term and no timeout, so a drag can stay open indefinitely.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Displacement (px) a release must exceed to count as a swipe.
pub const SWIPE_THRESHOLD: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
    Up,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Running drag offset relative to the anchor. Presentation uses it to
/// translate and rotate the card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Offset {
    pub dx: f64,
    pub dy: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureState {
    Idle,
    Dragging { anchor: Point, offset: Offset },
}

/// Result of lifting the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    Resolved(Direction),
    Cancelled,
}

#[derive(Debug)]
pub struct GestureClassifier {
    state: GestureState,
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureClassifier {
    pub fn new() -> Self {
        Self {
            state: GestureState::Idle,
        }
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn offset(&self) -> Offset {
        match self.state {
            GestureState::Idle => Offset::default(),
            GestureState::Dragging { offset, .. } => offset,
        }
    }

    /// Starts a gesture. A second press while already dragging keeps the
    /// original anchor.
    pub fn press(&mut self, at: Point) {
        if let GestureState::Idle = self.state {
            debug!("gesture anchored at ({}, {})", at.x, at.y);
            self.state = GestureState::Dragging {
                anchor: at,
                offset: Offset::default(),
            };
        }
    }

    /// Updates the running offset. Ignored unless a gesture is in progress.
    pub fn track(&mut self, at: Point) -> Offset {
        if let GestureState::Dragging { anchor, offset } = &mut self.state {
            *offset = Offset {
                dx: at.x - anchor.x,
                dy: at.y - anchor.y,
            };
        }
        self.offset()
    }

    /// Ends the gesture and classifies it. The classifier is back to `Idle`
    /// with a zero offset afterwards, whatever the outcome.
    pub fn release(&mut self) -> Release {
        let offset = self.offset();
        self.state = GestureState::Idle;
        let release = classify(offset);
        debug!(
            "gesture released at dx={} dy={}: {:?}",
            offset.dx, offset.dy, release
        );
        release
    }

    /// Drops any gesture in progress without classifying it.
    pub fn reset(&mut self) {
        self.state = GestureState::Idle;
    }
}

/// Horizontal thresholds win over the vertical one, so a fast diagonal
/// flick resolves left/right rather than up.
pub fn classify(offset: Offset) -> Release {
    if offset.dx > SWIPE_THRESHOLD {
        Release::Resolved(Direction::Right)
    } else if offset.dx < -SWIPE_THRESHOLD {
        Release::Resolved(Direction::Left)
    } else if offset.dy < -SWIPE_THRESHOLD {
        Release::Resolved(Direction::Up)
    } else {
        Release::Cancelled
    }
}
