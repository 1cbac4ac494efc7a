#![forbid(unsafe_code)]

//! Edge-relative geometry for the sliding panel.
//!
//! The panel is never moved; its *content* is scrolled. An offset of
//! `(0, 0)` means fully opened. A panel stuck to the right edge scrolls into
//! negative `x` to hide, one stuck to the left edge into positive `x`.
//!
//! # Invariants
//!
//! 1. Only the main axis of an [`Edge`] ever carries a non-zero offset.
//! 2. [`destination_offset`] always lies inside [`scroll_bounds`] for the
//!    same edge and extent.
//! 3. [`ScrollBounds::clamp`] is saturating and idempotent.

/// Side of the container the panel is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Edge {
    Left,
    #[default]
    Right,
    Top,
    Bottom,
}

impl Edge {
    /// All edges, in declaration order.
    pub const ALL: [Self; 4] = [Self::Left, Self::Right, Self::Top, Self::Bottom];

    /// The single axis the panel travels along.
    #[inline]
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::Left | Self::Right => Axis::Horizontal,
            Self::Top | Self::Bottom => Axis::Vertical,
        }
    }

    /// Sign of the main-axis offset while the panel is hidden.
    ///
    /// This is also the sign of pointer motion that opens the panel: moving
    /// the finger by `+d` scrolls the content by `-d`.
    #[inline]
    #[must_use]
    pub const fn hidden_sign(self) -> i32 {
        match self {
            Self::Left | Self::Top => 1,
            Self::Right | Self::Bottom => -1,
        }
    }
}

/// Scroll axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// Pick the component of `(x, y)` that lies on this axis.
    #[inline]
    #[must_use]
    pub fn pick<T>(self, x: T, y: T) -> T {
        match self {
            Self::Horizontal => x,
            Self::Vertical => y,
        }
    }
}

/// Discrete resting position of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PanelState {
    #[default]
    Closed,
    Preview,
    Opened,
}

impl PanelState {
    /// Integer tag used by persisted state blobs.
    #[inline]
    #[must_use]
    pub const fn tag(self) -> i32 {
        match self {
            Self::Closed => 0,
            Self::Preview => 1,
            Self::Opened => 2,
        }
    }

    /// Inverse of [`PanelState::tag`].
    #[must_use]
    pub const fn from_tag(tag: i32) -> Option<Self> {
        match tag {
            0 => Some(Self::Closed),
            1 => Some(Self::Preview),
            2 => Some(Self::Opened),
            _ => None,
        }
    }
}

/// Measured panel size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PanelSize {
    pub width: u32,
    pub height: u32,
}

impl PanelSize {
    #[inline]
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Extent along `axis`.
    #[inline]
    #[must_use]
    pub const fn extent(self, axis: Axis) -> u32 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }
}

/// Absolute content scroll offset in whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollOffset {
    pub x: i32,
    pub y: i32,
}

impl ScrollOffset {
    pub const ZERO: Self = Self { x: 0, y: 0 };

    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset with only the `axis` component set.
    #[inline]
    #[must_use]
    pub const fn along(axis: Axis, value: i32) -> Self {
        match axis {
            Axis::Horizontal => Self { x: value, y: 0 },
            Axis::Vertical => Self { x: 0, y: value },
        }
    }

    /// Component along `axis`.
    #[inline]
    #[must_use]
    pub const fn main(self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }
}

/// Inclusive scroll range per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollBounds {
    pub min: ScrollOffset,
    pub max: ScrollOffset,
}

impl ScrollBounds {
    /// Saturating clamp of `offset` into the bounds.
    #[inline]
    #[must_use]
    pub fn clamp(&self, offset: ScrollOffset) -> ScrollOffset {
        ScrollOffset {
            x: offset.x.clamp(self.min.x, self.max.x),
            y: offset.y.clamp(self.min.y, self.max.y),
        }
    }

    /// Float clamp of a single main-axis position, for sub-pixel drag math.
    #[inline]
    #[must_use]
    pub fn clamp_main(&self, axis: Axis, value: f32) -> f32 {
        value.clamp(self.min.main(axis) as f32, self.max.main(axis) as f32)
    }

    /// Whether `offset` lies inside the bounds.
    #[inline]
    #[must_use]
    pub fn contains(&self, offset: ScrollOffset) -> bool {
        self.clamp(offset) == offset
    }
}

/// Main-axis extent as a signed pixel count.
#[inline]
fn signed_extent(extent: u32) -> i32 {
    i32::try_from(extent).unwrap_or(i32::MAX)
}

/// Scroll offset that parks the panel in `state`.
///
/// Opened is always `(0, 0)`. Closed and Preview leave `offset_distance`
/// or `preview_distance` pixels exposed. A missing preview distance parks
/// Preview like Closed. Slivers wider than the panel saturate at fully
/// opened.
#[must_use]
pub fn destination_offset(
    state: PanelState,
    edge: Edge,
    extent: u32,
    offset_distance: u32,
    preview_distance: Option<u32>,
) -> ScrollOffset {
    let sliver = match state {
        PanelState::Opened => return ScrollOffset::ZERO,
        PanelState::Closed => offset_distance,
        PanelState::Preview => preview_distance.unwrap_or(offset_distance),
    };
    let hidden = signed_extent(extent.saturating_sub(sliver));
    ScrollOffset::along(edge.axis(), hidden * edge.hidden_sign())
}

/// Scroll range for a panel on `edge`.
///
/// The single non-zero bound is `-extent` for Right/Bottom and `+extent`
/// for Left/Top. The orthogonal axis is pinned to zero.
#[must_use]
pub fn scroll_bounds(edge: Edge, extent: u32) -> ScrollBounds {
    let far = ScrollOffset::along(edge.axis(), signed_extent(extent) * edge.hidden_sign());
    ScrollBounds {
        min: ScrollOffset::new(far.x.min(0), far.y.min(0)),
        max: ScrollOffset::new(far.x.max(0), far.y.max(0)),
    }
}

/// Saturating clamp, free-function form.
#[inline]
#[must_use]
pub fn clamp(offset: ScrollOffset, bounds: ScrollBounds) -> ScrollOffset {
    bounds.clamp(offset)
}

/// Whether a container-local touch point hits the exposed part of the panel.
///
/// `touch` is the main-axis coordinate, `scroll` the current main-axis
/// offset. A fully opened panel accepts every point inside it.
#[must_use]
pub fn touch_within_sliver(edge: Edge, size: PanelSize, scroll: i32, touch: f32) -> bool {
    let scroll = scroll as f32;
    match edge {
        Edge::Right | Edge::Bottom => touch >= -scroll,
        Edge::Left => touch <= size.width as f32 - scroll,
        Edge::Top => touch <= size.height as f32 - scroll,
    }
}

/// Distance from the hidden bound toward fully opened, i.e. how much of the
/// panel is exposed at `offset`.
#[inline]
#[must_use]
pub fn exposed_distance(extent: u32, offset: i32) -> u32 {
    (i64::from(extent) - i64::from(offset).abs()).unsigned_abs() as u32
}
