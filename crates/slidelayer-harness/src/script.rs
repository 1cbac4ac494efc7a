#![forbid(unsafe_code)]

//! Fluent builder for pointer event sequences.
//!
//! A [`GestureScript`] tracks which pointers are down and where, so every
//! emitted [`PointerEvent`] carries the full pointer list the way a real
//! input system would deliver it.
//!
//! ```rust,ignore
//! let events = GestureScript::new()
//!     .down(0, 300.0, 100.0)
//!     .drag_to(0, 30.0, 100.0, 27, Duration::from_millis(270))
//!     .pause(Duration::from_millis(200))
//!     .up(0)
//!     .build();
//! ```

use std::time::Duration;

use slidelayer_core::{PointerAction, PointerEvent, PointerId, PointerSample};

#[derive(Debug, Clone, Default)]
pub struct GestureScript {
    now: Duration,
    down: Vec<PointerSample>,
    events: Vec<PointerEvent>,
}

impl GestureScript {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the script at `at` instead of zero.
    #[must_use]
    pub fn starting_at(at: Duration) -> Self {
        Self {
            now: at,
            ..Self::default()
        }
    }

    /// Current script time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// First pointer touches down. Pointers still down are forgotten.
    #[must_use]
    pub fn down(mut self, id: u32, x: f32, y: f32) -> Self {
        self.down = vec![PointerSample::new(id, x, y)];
        self.push(PointerAction::Down);
        self
    }

    /// Move pointer `id` to `(x, y)` in one event.
    #[must_use]
    pub fn move_to(mut self, id: u32, x: f32, y: f32) -> Self {
        if let Some(p) = self.sample_mut(id) {
            p.x = x;
            p.y = y;
        }
        self.push(PointerAction::Move);
        self
    }

    /// Move pointer `id` by `(dx, dy)` in one event.
    #[must_use]
    pub fn move_by(self, id: u32, dx: f32, dy: f32) -> Self {
        let (x, y) = self.position(id).unwrap_or((0.0, 0.0));
        self.move_to(id, x + dx, y + dy)
    }

    /// Linear drag of pointer `id` to `(x, y)` in `steps` evenly spaced
    /// moves spread over `over`.
    #[must_use]
    pub fn drag_to(mut self, id: u32, x: f32, y: f32, steps: u32, over: Duration) -> Self {
        let steps = steps.max(1);
        let (x0, y0) = self.position(id).unwrap_or((x, y));
        let tick = over / steps;
        let n = steps as f32;
        for i in 1..=steps {
            let k = i as f32;
            self.now += tick;
            // Scale before dividing so whole-pixel steps stay exact.
            self = self.move_to(id, x0 + (x - x0) * k / n, y0 + (y - y0) * k / n);
        }
        self
    }

    /// Advance the clock without emitting anything.
    #[must_use]
    pub fn pause(mut self, by: Duration) -> Self {
        self.now += by;
        self
    }

    /// Advance the clock before the next event.
    #[must_use]
    pub fn wait_ms(self, ms: u64) -> Self {
        self.pause(Duration::from_millis(ms))
    }

    /// Another pointer touches down and is appended to the list.
    #[must_use]
    pub fn secondary_down(mut self, id: u32, x: f32, y: f32) -> Self {
        self.down.push(PointerSample::new(id, x, y));
        let index = self.down.len() - 1;
        self.push(PointerAction::SecondaryDown { index });
        self
    }

    /// Pointer `id` lifts while others stay down.
    #[must_use]
    pub fn secondary_up(mut self, id: u32) -> Self {
        if let Some(index) = self.index_of(id) {
            self.push(PointerAction::SecondaryUp { index });
            self.down.remove(index);
        }
        self
    }

    /// Last pointer lifts.
    #[must_use]
    pub fn up(mut self, id: u32) -> Self {
        if let Some(index) = self.index_of(id) {
            self.down.swap(0, index);
            self.down.truncate(1);
        }
        self.push(PointerAction::Up);
        self.down.clear();
        self
    }

    /// Host aborts the gesture.
    #[must_use]
    pub fn cancel(mut self) -> Self {
        self.push(PointerAction::Cancel);
        self.down.clear();
        self
    }

    /// Down then up at the same spot after `hold`.
    #[must_use]
    pub fn tap(self, id: u32, x: f32, y: f32, hold: Duration) -> Self {
        self.down(id, x, y).pause(hold).up(id)
    }

    #[must_use]
    pub fn build(self) -> Vec<PointerEvent> {
        self.events
    }

    fn push(&mut self, action: PointerAction) {
        self.events
            .push(PointerEvent::new(action, self.down.clone(), self.now));
    }

    fn index_of(&self, id: u32) -> Option<usize> {
        self.down.iter().position(|p| p.id == PointerId(id))
    }

    fn position(&self, id: u32) -> Option<(f32, f32)> {
        self.down
            .iter()
            .find(|p| p.id == PointerId(id))
            .map(|p| (p.x, p.y))
    }

    fn sample_mut(&mut self, id: u32) -> Option<&mut PointerSample> {
        self.down.iter_mut().find(|p| p.id == PointerId(id))
    }
}
