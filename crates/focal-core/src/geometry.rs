//! Pixel <-> percentage conversion and image dimension resolution.
//!
//! The indicator is positioned in CSS pixels relative to the image's
//! top-left corner, while the field stores whole percentages. Converting
//! pixels to percent rounds half away from zero ([`f64::round`]) and then
//! clamps into `0..=100`; converting percent to pixels never rounds, so
//! the indicator may sit on a sub-pixel position.

use crate::types::{Dimensions, FocalPoint, MAX_PERCENT, MIN_PERCENT, PixelOffset};

/// An image element whose size can be measured.
///
/// Implemented by the browser layer over a real `<img>` and by tests over
/// plain values.
pub trait ImageSurface {
    /// The size the image currently occupies in the layout.
    ///
    /// Zero on at least one axis when the image is hidden or not yet laid
    /// out.
    fn rendered_size(&self) -> Dimensions;

    /// The natural size of the image's source, measured out-of-band.
    ///
    /// Returns [`Dimensions::ZERO`] when the source cannot be loaded.
    fn intrinsic_size(&self) -> Dimensions;
}

/// Resolve the effective dimensions of an image.
///
/// Uses the rendered size when both axes are nonzero. Otherwise the image
/// is hidden (e.g. inside a collapsed fieldset) and the intrinsic size of
/// its source is used instead. An unreachable source resolves to
/// [`Dimensions::ZERO`], which anchors the indicator at the origin.
#[must_use]
pub fn resolve_dimensions<S: ImageSurface + ?Sized>(image: &S) -> Dimensions {
    let rendered = image.rendered_size();
    if rendered.is_visible() {
        rendered
    } else {
        image.intrinsic_size()
    }
}

/// Convert a pixel distance along one axis into a whole percentage.
///
/// Computes `100 * delta / dimension`, rounds half away from zero, then
/// clamps to `0..=100`. A non-finite ratio (zero or non-finite
/// `dimension`) yields `0`.
#[must_use]
#[allow(clippy::cast_possible_truncation)] // clamped to 0..=100 before the cast
pub fn pixels_to_percent(delta: f64, dimension: f64) -> i32 {
    let ratio = 100.0 * delta / dimension;
    if !ratio.is_finite() {
        return MIN_PERCENT;
    }
    ratio
        .round()
        .clamp(f64::from(MIN_PERCENT), f64::from(MAX_PERCENT)) as i32
}

/// Convert a percentage along one axis into a pixel distance.
///
/// Computes `(percent / 100) * dimension` without rounding.
#[must_use]
pub fn percent_to_pixels(percent: i32, dimension: f64) -> f64 {
    f64::from(percent) / 100.0 * dimension
}

/// Indicator offset for `point` on an image of the given size.
///
/// The point is used as-is; clamp it first if it came from user input.
#[must_use]
pub fn point_to_offset(point: FocalPoint, dimensions: Dimensions) -> PixelOffset {
    PixelOffset::new(
        percent_to_pixels(point.x, dimensions.width),
        percent_to_pixels(point.y, dimensions.height),
    )
}

/// Focal point for an indicator at `offset` on an image of the given size.
///
/// The result is always within range.
#[must_use]
pub fn offset_to_point(offset: PixelOffset, dimensions: Dimensions) -> FocalPoint {
    FocalPoint::new(
        pixels_to_percent(offset.left, dimensions.width),
        pixels_to_percent(offset.top, dimensions.height),
    )
}
