//! Dioxus UI components for the focal point picker.

mod picker;

pub use picker::FocalPointPicker;
