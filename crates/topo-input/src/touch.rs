//! Touch gestures: one finger orbits, two fingers pinch to zoom.

use std::collections::BTreeMap;

use glam::Vec2;
use winit::event::TouchPhase;

/// Pinches closer than this many pixels are ignored.
const MIN_PINCH_SPAN: f32 = 1.0;

#[derive(Debug, Clone)]
pub struct TouchState {
    active: BTreeMap<u64, Vec2>,
    drag: Vec2,
    pinch: f32,
}

impl Default for TouchState {
    fn default() -> Self {
        Self {
            active: BTreeMap::new(),
            drag: Vec2::ZERO,
            pinch: 1.0,
        }
    }
}

impl TouchState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_touch(&mut self, id: u64, phase: TouchPhase, x: f64, y: f64) {
        let position = Vec2::new(x as f32, y as f32);
        match phase {
            TouchPhase::Started => {
                self.active.insert(id, position);
            }
            TouchPhase::Moved => {
                let span_before = self.span();
                let Some(slot) = self.active.get_mut(&id) else {
                    return;
                };
                let previous = std::mem::replace(slot, position);
                match self.active.len() {
                    1 => self.drag += position - previous,
                    2 => {
                        if let (Some(before), Some(after)) = (span_before, self.span()) {
                            self.pinch *= after / before;
                        }
                    }
                    _ => {}
                }
            }
            TouchPhase::Ended | TouchPhase::Cancelled => {
                self.active.remove(&id);
            }
        }
    }

    /// Distance between the two active touches, if exactly two are down.
    fn span(&self) -> Option<f32> {
        if self.active.len() != 2 {
            return None;
        }
        let mut points = self.active.values();
        let a = points.next()?;
        let b = points.next()?;
        let span = a.distance(*b);
        (span >= MIN_PINCH_SPAN).then_some(span)
    }

    /// Number of fingers down.
    #[must_use]
    pub fn touch_count(&self) -> usize {
        self.active.len()
    }

    /// Single-finger movement this frame.
    #[must_use]
    pub fn drag_delta(&self) -> Vec2 {
        self.drag
    }

    /// Product of span changes this frame; > 1 when the fingers spread.
    #[must_use]
    pub fn pinch_ratio(&self) -> f32 {
        self.pinch
    }

    pub fn cancel_all(&mut self) {
        self.active.clear();
    }

    pub fn clear_transients(&mut self) {
        self.drag = Vec2::ZERO;
        self.pinch = 1.0;
    }
}
