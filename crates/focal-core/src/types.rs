//! Shared types for focal point selection.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lowest percentage a rendered focal point component can take.
pub const MIN_PERCENT: i32 = 0;

/// Highest percentage a rendered focal point component can take.
pub const MAX_PERCENT: i32 = 100;

/// A focal point as a percentage offset from the image's left/top edge.
///
/// Points produced by the geometry conversions are always within
/// [`MIN_PERCENT`]`..=`[`MAX_PERCENT`]. Points parsed from a field value
/// are not clamped (a user may type `150,-20`); call
/// [`clamped`](Self::clamped) before rendering or storing them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FocalPoint {
    /// Horizontal percentage (0 = left edge, 100 = right edge).
    pub x: i32,
    /// Vertical percentage (0 = top edge, 100 = bottom edge).
    pub y: i32,
}

impl FocalPoint {
    /// The image center, used whenever the field holds no usable value.
    pub const CENTER: Self = Self::new(50, 50);

    /// Create a new focal point. Components are taken as-is.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Clamp both components into the valid percentage range.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            x: self.x.clamp(MIN_PERCENT, MAX_PERCENT),
            y: self.y.clamp(MIN_PERCENT, MAX_PERCENT),
        }
    }

    /// Returns `true` if both components are within the valid range.
    #[must_use]
    pub const fn is_in_range(self) -> bool {
        self.x >= MIN_PERCENT
            && self.x <= MAX_PERCENT
            && self.y >= MIN_PERCENT
            && self.y <= MAX_PERCENT
    }
}

impl Default for FocalPoint {
    fn default() -> Self {
        Self::CENTER
    }
}

/// Field wire format: `"<x>,<y>"`.
impl fmt::Display for FocalPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// Rendered image size in CSS pixels.
///
/// Browsers report layout sizes as fractional pixels, so both axes are
/// `f64`. A hidden image reports zero on at least one axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Dimensions {
    /// The degenerate size of an image that failed to load.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Create new dimensions.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Returns `true` if both axes are positive, i.e. the image is laid
    /// out and visible.
    #[must_use]
    pub fn is_visible(self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Pixel offset of the indicator relative to the image's top-left corner.
///
/// Always derived from a [`FocalPoint`] and the current [`Dimensions`];
/// the field value stays the source of truth.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelOffset {
    /// Distance from the image's left edge.
    pub left: f64,
    /// Distance from the image's top edge.
    pub top: f64,
}

impl PixelOffset {
    /// The image's top-left corner.
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    /// Create a new pixel offset.
    #[must_use]
    pub const fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }

    /// Clamp the offset into the image's bounding box.
    ///
    /// This is the drag containment rule: an indicator can never be
    /// dragged outside the image. `NaN` components collapse to zero.
    #[must_use]
    pub fn contained(self, dimensions: Dimensions) -> Self {
        Self {
            left: self.left.max(0.0).min(dimensions.width.max(0.0)),
            top: self.top.max(0.0).min(dimensions.height.max(0.0)),
        }
    }
}

/// Identifier shared by an indicator, its field and its preview link.
///
/// The indicator carries it as its `id`; the field and the preview link
/// carry it in the configured id attribute (`data-focal-point-id`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FocalPointId(String);

impl FocalPointId {
    /// Wrap an identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key of this widget's preview request in a
    /// [`RequestRegistry`](crate::preview::RequestRegistry).
    ///
    /// The key is the identifier followed by `suffix`
    /// (`-preview-link` by default).
    #[must_use]
    pub fn request_key(&self, suffix: &str) -> String {
        format!("{}{suffix}", self.0)
    }
}

impl fmt::Display for FocalPointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
