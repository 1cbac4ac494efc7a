#![forbid(unsafe_code)]

//! Notifications emitted to the host.

use crate::geometry::PanelState;
use crate::progress::LayerProgress;

/// One observable change of the layer.
///
/// Start/finish pairs bracket every transition. `Scrolled` fires on every
/// offset change with the exposed distance and normalized progress.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "event", rename_all = "snake_case"))]
pub enum LayerEvent {
    OpenStarted,
    OpenFinished,
    CloseStarted,
    CloseFinished,
    PreviewStarted,
    PreviewFinished,
    Scrolled { progress: LayerProgress },
}

impl LayerEvent {
    /// Event announcing a transition toward `state`.
    #[must_use]
    pub const fn started_for(state: PanelState) -> Self {
        match state {
            PanelState::Closed => Self::CloseStarted,
            PanelState::Preview => Self::PreviewStarted,
            PanelState::Opened => Self::OpenStarted,
        }
    }

    /// Event announcing that the layer came to rest in `state`.
    #[must_use]
    pub const fn finished_for(state: PanelState) -> Self {
        match state {
            PanelState::Closed => Self::CloseFinished,
            PanelState::Preview => Self::PreviewFinished,
            PanelState::Opened => Self::OpenFinished,
        }
    }

    /// Exposed pixels for `Scrolled`, `None` otherwise.
    #[must_use]
    pub const fn scroll_delta(&self) -> Option<u32> {
        match self {
            Self::Scrolled { progress } => Some(progress.absolute),
            _ => None,
        }
    }

    /// Whether this is one of the start/finish transition events.
    #[must_use]
    pub const fn is_transition(&self) -> bool {
        !matches!(self, Self::Scrolled { .. })
    }
}
