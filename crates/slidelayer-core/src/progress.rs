#![forbid(unsafe_code)]

//! Normalized scroll progress for observers such as visual transformers.

use crate::geometry::exposed_distance;

/// Progress snapshot derived from a scroll offset.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayerProgress {
    /// Exposed fraction of the whole panel, `[0, 1]`.
    pub layer: f32,
    /// Exposed fraction of the preview sliver, `[0, 1]`. Zero when Preview
    /// is disabled.
    pub preview: f32,
    /// Exposed pixels.
    pub absolute: u32,
}

/// Progress of a panel `extent` pixels long at main-axis `offset`.
#[must_use]
pub fn compute_progress(extent: u32, offset: i32, preview_distance: Option<u32>) -> LayerProgress {
    let absolute = exposed_distance(extent, offset);
    let layer = if extent == 0 {
        0.0
    } else {
        (absolute as f32 / extent as f32).clamp(0.0, 1.0)
    };
    let preview = match preview_distance {
        Some(px) if px > 0 => (absolute as f32 / px as f32).min(1.0),
        _ => 0.0,
    };
    LayerProgress {
        layer,
        preview,
        absolute,
    }
}

/// Remembers the last published progress so unchanged values are skipped.
#[derive(Debug, Clone, Default)]
pub struct ProgressNotifier {
    last: Option<LayerProgress>,
}

impl ProgressNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the new progress if it differs from the last one published.
    pub fn update(&mut self, progress: LayerProgress) -> Option<LayerProgress> {
        if self.last == Some(progress) {
            return None;
        }
        self.last = Some(progress);
        Some(progress)
    }

    /// Last published progress.
    #[must_use]
    pub fn last(&self) -> Option<LayerProgress> {
        self.last
    }

    /// Forget the last value so the next update always publishes.
    pub fn invalidate(&mut self) {
        self.last = None;
    }
}
