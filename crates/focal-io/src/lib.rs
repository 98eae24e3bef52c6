//! focal-io: Browser bindings and Dioxus component for the focal point
//! picker.
//!
//! Binds the [`focal_core::Synchronizer`] to live DOM elements: pointer
//! drag of the crosshair, clicks on the image, edits of the text field
//! and the preview link. Provides the [`FocalPointPicker`] component that
//! renders the expected markup and binds it on mount.

pub mod components;
pub mod dimensions;
pub mod dom;
pub mod drag;
pub mod listener;
pub mod widget;

pub use components::FocalPointPicker;
pub use dom::DomError;
pub use widget::{Widget, attach_all};
