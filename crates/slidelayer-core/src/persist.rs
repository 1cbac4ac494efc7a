#![forbid(unsafe_code)]

//! Persisted layer state.
//!
//! The host stores this blob across its own lifecycle. Only the nominal
//! panel state survives; offsets are recomputed from the configuration.

use crate::error::LayerError;
use crate::geometry::PanelState;

/// Opaque saved state: a single integer tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SavedLayerState {
    pub state_tag: i32,
}

impl SavedLayerState {
    #[must_use]
    pub const fn new(state: PanelState) -> Self {
        Self {
            state_tag: state.tag(),
        }
    }

    /// Decode the tag.
    pub fn state(self) -> Result<PanelState, LayerError> {
        PanelState::from_tag(self.state_tag).ok_or(LayerError::UnknownStateTag(self.state_tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_known_and_unknown_tags() {
        assert_eq!(
            SavedLayerState::new(PanelState::Preview).state(),
            Ok(PanelState::Preview)
        );
        assert_eq!(
            SavedLayerState { state_tag: 9 }.state(),
            Err(LayerError::UnknownStateTag(9))
        );
    }

    #[cfg(feature = "config-file")]
    #[test]
    fn json_shape_is_a_single_field() {
        let json = serde_json::to_string(&SavedLayerState::new(PanelState::Opened))
            .expect("serialize");
        assert_eq!(json, r#"{"state_tag":2}"#);
    }
}
