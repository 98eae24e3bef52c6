//! DOM lookup and style helpers shared by the widget bindings.
//!
//! All functions in this module require a browser environment
//! (`wasm32-unknown-unknown` target).

use wasm_bindgen::{JsCast, JsValue};

/// Errors that can occur while binding a widget to the DOM.
#[derive(Debug, thiserror::Error)]
pub enum DomError {
    /// A browser API call returned an error or a required object was missing.
    #[error("browser API error: {0}")]
    JsError(String),

    /// The indicator has no `id`, so nothing can be correlated with it.
    #[error("focal point indicator has no id")]
    MissingId,

    /// A required element of the widget is absent.
    #[error("no {what} found for focal point {id:?}")]
    MissingElement {
        /// Which element was looked for.
        what: &'static str,
        /// The widget id.
        id: String,
    },

    /// An element was found but is of the wrong kind.
    #[error("{what} for focal point {id:?} is not a {expected}")]
    WrongElement {
        /// Which element was looked for.
        what: &'static str,
        /// The widget id.
        id: String,
        /// The expected element interface.
        expected: &'static str,
    },
}

impl From<JsValue> for DomError {
    fn from(value: JsValue) -> Self {
        Self::JsError(format!("{value:?}"))
    }
}

/// The global `document`.
///
/// # Errors
///
/// Returns [`DomError::JsError`] outside a browser window.
pub fn document() -> Result<web_sys::Document, DomError> {
    web_sys::window()
        .ok_or_else(|| DomError::JsError("no global window".into()))?
        .document()
        .ok_or_else(|| DomError::JsError("no document".into()))
}

/// All elements under `root` matching `selector`.
///
/// # Errors
///
/// Returns [`DomError::JsError`] if `selector` is invalid.
pub fn select_all(root: &web_sys::Element, selector: &str) -> Result<Vec<web_sys::Element>, DomError> {
    let nodes = root.query_selector_all(selector)?;
    Ok((0..nodes.length())
        .filter_map(|i| nodes.get(i))
        .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
        .collect())
}

/// The first element under `root` matching `selector` whose `attribute`
/// equals `id`.
///
/// Compares attribute values directly instead of building an attribute
/// selector, so ids never need CSS escaping.
///
/// # Errors
///
/// Returns [`DomError::JsError`] if `selector` is invalid.
pub fn find_correlated(
    root: &web_sys::Element,
    selector: &str,
    attribute: &str,
    id: &str,
) -> Result<Option<web_sys::Element>, DomError> {
    Ok(select_all(root, selector)?
        .into_iter()
        .find(|element| element.get_attribute(attribute).as_deref() == Some(id)))
}

/// Cast `element` to a concrete element interface.
///
/// # Errors
///
/// Returns [`DomError::WrongElement`] if the cast fails.
pub fn cast<T: JsCast>(
    element: web_sys::Element,
    what: &'static str,
    id: &str,
    expected: &'static str,
) -> Result<T, DomError> {
    element.dyn_into::<T>().map_err(|_| DomError::WrongElement {
        what,
        id: id.to_owned(),
        expected,
    })
}

/// Set an inline style property.
///
/// # Errors
///
/// Returns [`DomError::JsError`] if the property cannot be set.
pub fn set_style(element: &web_sys::HtmlElement, property: &str, value: &str) -> Result<(), DomError> {
    element.style().set_property(property, value)?;
    Ok(())
}

/// Show an element by dropping its inline `display`, or hide it with
/// `display: none`.
///
/// # Errors
///
/// Returns [`DomError::JsError`] if the style cannot be changed.
pub fn set_visible(element: &web_sys::HtmlElement, visible: bool) -> Result<(), DomError> {
    if visible {
        element.style().remove_property("display")?;
    } else {
        element.style().set_property("display", "none")?;
    }
    Ok(())
}

/// Dispatch a bubbling `change` event on `target`.
///
/// # Errors
///
/// Returns [`DomError::JsError`] if the event cannot be created or
/// dispatched.
pub fn dispatch_change(target: &web_sys::EventTarget) -> Result<(), DomError> {
    let init = web_sys::EventInit::new();
    init.set_bubbles(true);
    let event = web_sys::Event::new_with_event_init_dict("change", &init)?;
    target.dispatch_event(&event)?;
    Ok(())
}
