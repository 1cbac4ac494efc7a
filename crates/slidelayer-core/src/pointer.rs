#![forbid(unsafe_code)]

//! Pointer events as delivered by the host.
//!
//! Positions are in the container's local frame, before the layer's content
//! scroll is applied. Every event carries the full set of pointers that are
//! down at that instant, mirroring platform multi-touch event streams.

use std::time::Duration;

/// Host-assigned pointer identifier, stable for the life of one contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PointerId(pub u32);

/// One pointer's position within an event.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointerSample {
    pub id: PointerId,
    pub x: f32,
    pub y: f32,
}

impl PointerSample {
    #[inline]
    #[must_use]
    pub const fn new(id: u32, x: f32, y: f32) -> Self {
        Self {
            id: PointerId(id),
            x,
            y,
        }
    }
}

/// What happened in a [`PointerEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum PointerAction {
    /// First pointer touched down.
    Down,
    /// One or more pointers moved.
    Move,
    /// Last pointer lifted.
    Up,
    /// The host aborted the gesture.
    Cancel,
    /// An additional pointer touched down; `index` locates it in `pointers`.
    SecondaryDown { index: usize },
    /// A non-final pointer lifted; `index` locates it in `pointers`.
    SecondaryUp { index: usize },
}

/// A pointer lifecycle event.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointerEvent {
    pub action: PointerAction,
    /// Every pointer currently down, including the one that changed.
    pub pointers: Vec<PointerSample>,
    /// Monotonic host time of the event.
    pub timestamp: Duration,
}

impl PointerEvent {
    #[must_use]
    pub fn new(action: PointerAction, pointers: Vec<PointerSample>, timestamp: Duration) -> Self {
        Self {
            action,
            pointers,
            timestamp,
        }
    }

    /// Single-pointer convenience constructor.
    #[must_use]
    pub fn single(action: PointerAction, id: u32, x: f32, y: f32, timestamp: Duration) -> Self {
        Self::new(action, vec![PointerSample::new(id, x, y)], timestamp)
    }

    /// Look up a pointer by id.
    #[inline]
    #[must_use]
    pub fn find(&self, id: PointerId) -> Option<&PointerSample> {
        self.pointers.iter().find(|p| p.id == id)
    }

    /// Pointer at `index`, as referenced by secondary actions.
    #[inline]
    #[must_use]
    pub fn at(&self, index: usize) -> Option<&PointerSample> {
        self.pointers.get(index)
    }

    /// The first pointer in the event, used to seed a new gesture.
    #[inline]
    #[must_use]
    pub fn primary(&self) -> Option<&PointerSample> {
        self.pointers.first()
    }
}
