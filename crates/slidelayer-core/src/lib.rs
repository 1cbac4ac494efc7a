#![forbid(unsafe_code)]

//! Core: gesture-to-state engine for an edge-anchored sliding panel.
//!
//! # Role in slidelayer
//! `slidelayer-core` decides where a sliding panel goes. It owns the touch
//! state machine, the fling/settle decision, the settle animation and the
//! edge geometry. Rendering and event delivery belong to the host toolkit,
//! which talks to the engine through [`LayerHost`].
//!
//! # Primary responsibilities
//! - **Geometry**: destination offsets and scroll bounds per [`Edge`].
//! - **TouchMachine**: slop, direction and pointer-handoff handling.
//! - **Decision**: fling vs. settle state selection and tap rotation.
//! - **ScrollAnimation**: distance/velocity shaped duration with quintic
//!   ease-out.
//! - **SlidingLayer**: the composition root a host adapter drives.
//!
//! # Driving a layer
//!
//! ```rust,ignore
//! let mut layer = SlidingLayer::new(LayerConfig::default(), host)?;
//! layer.set_size(PanelSize::new(320, 640));
//! if layer.on_pointer_event(&event) {
//!     // consumed by the panel
//! }
//! while layer.on_frame() { /* wait for the next vsync */ }
//! ```

pub mod animation;
pub mod config;
pub mod decision;
pub mod error;
pub mod event;
pub mod geometry;
pub mod host;
pub mod layer;
pub mod persist;
pub mod pointer;
pub mod progress;
pub mod touch;
pub mod velocity;

pub use config::LayerConfig;
#[cfg(feature = "config-file")]
pub use config::ConfigLoadError;
pub use decision::{DragOutcome, TapPolicy};
pub use error::{ConfigIssue, LayerError};
pub use event::LayerEvent;
pub use geometry::{Axis, Edge, PanelSize, PanelState, ScrollBounds, ScrollOffset};
pub use host::{CallbackHost, LayerHost, MonotonicClock};
pub use layer::{Motion, SlidingLayer};
pub use persist::SavedLayerState;
pub use pointer::{PointerAction, PointerEvent, PointerId, PointerSample};
pub use progress::LayerProgress;
pub use touch::ScrollQuery;
