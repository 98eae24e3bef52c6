//! Image dimension measurement in the browser.
//!
//! The rendered size comes from the image's layout box. When the image
//! is hidden (e.g. inside a collapsed fieldset or a modal that is not yet
//! shown) its box is empty, so the intrinsic size is read from a fresh,
//! detached `<img>` pointed at the same source. A cached source answers
//! synchronously; an unreachable one reports zero.

use focal_core::{Dimensions, ImageSurface};

/// A live `<img>` element measured for focal point placement.
pub struct ImageElement<'a>(pub &'a web_sys::HtmlImageElement);

impl ImageSurface for ImageElement<'_> {
    fn rendered_size(&self) -> Dimensions {
        let rect = self.0.get_bounding_client_rect();
        Dimensions::new(rect.width(), rect.height())
    }

    fn intrinsic_size(&self) -> Dimensions {
        probe_intrinsic_size(&self.0.src())
    }
}

/// Natural size of the image at `src`, measured with a detached probe.
///
/// Returns [`Dimensions::ZERO`] if the probe cannot be created or the
/// source has not been (and cannot synchronously be) decoded.
#[must_use]
pub fn probe_intrinsic_size(src: &str) -> Dimensions {
    let Ok(probe) = web_sys::HtmlImageElement::new() else {
        log::warn!("could not create an image probe for {src}");
        return Dimensions::ZERO;
    };
    probe.set_src(src);
    Dimensions::new(
        f64::from(probe.natural_width()),
        f64::from(probe.natural_height()),
    )
}

/// Resolve the effective dimensions of `image`.
#[must_use]
pub fn measure(image: &web_sys::HtmlImageElement) -> Dimensions {
    focal_core::resolve_dimensions(&ImageElement(image))
}
