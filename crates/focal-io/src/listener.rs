//! DOM event listeners that unregister themselves when dropped.

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;

use crate::dom::DomError;

/// A registered event listener.
///
/// Keeps the Rust closure alive for as long as the listener exists and
/// removes it from the target on drop, so a widget's listeners live
/// exactly as long as the widget.
pub struct EventListener {
    target: web_sys::EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(web_sys::Event)>,
}

impl EventListener {
    /// Register `handler` for `event` on `target`.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::JsError`] if the browser rejects the listener.
    pub fn new(
        target: &web_sys::EventTarget,
        event: &'static str,
        handler: impl FnMut(web_sys::Event) + 'static,
    ) -> Result<Self, DomError> {
        let callback = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
        target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}
