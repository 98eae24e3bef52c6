//! A focal point widget bound to live DOM elements.
//!
//! [`Widget`] owns one [`Synchronizer`] and the event listeners feeding
//! it. Every listener measures the image, runs the matching handler while
//! the synchronizer is borrowed, releases the borrow, and only then
//! applies the returned effects. Applying [`Effect::Changed`] dispatches a
//! real `change` event on the field, which reaches this widget's own
//! `change` listener as an echo the synchronizer ignores.
//!
//! Listeners hold only weak references to the widget. Dropping the last
//! [`Rc<Widget>`] unregisters them and clears the attached marker.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use focal_core::{
    Dimensions, Effect, FocalPoint, FocalPointId, PixelOffset, PreviewLink, RequestRegistry,
    Synchronizer, WidgetConfig,
};
use wasm_bindgen::JsCast;

use crate::dimensions;
use crate::dom::{self, DomError};
use crate::drag::DragGesture;
use crate::listener::EventListener;

/// The DOM elements making up one widget.
struct Elements {
    indicator: web_sys::HtmlElement,
    image: web_sys::HtmlImageElement,
    field: web_sys::HtmlInputElement,
    /// The element shown and hidden with the field: its enclosing form
    /// item, or the field itself.
    form_item: web_sys::HtmlElement,
    preview_link: Option<web_sys::HtmlAnchorElement>,
}

impl Elements {
    /// Locate the image next to `indicator` and the field and preview link
    /// correlated with `id` under `scope`.
    fn find(
        indicator: &web_sys::Element,
        scope: &web_sys::Element,
        config: &WidgetConfig,
        id: &str,
    ) -> Result<Self, DomError> {
        let missing = |what| DomError::MissingElement {
            what,
            id: id.to_owned(),
        };

        let image = indicator
            .parent_element()
            .ok_or_else(|| missing("image"))?
            .query_selector(":scope > img")?
            .ok_or_else(|| missing("image"))?;

        let field = dom::find_correlated(scope, &config.field_selector(), &config.id_attribute, id)?
            .ok_or_else(|| missing("field"))?;
        let form_item = field
            .closest(&config.form_item_selector())?
            .unwrap_or_else(|| field.clone());

        let preview_link = dom::find_correlated(
            scope,
            &config.preview_link_selector(),
            &config.id_attribute,
            id,
        )?
        .map(|link| dom::cast(link, "preview link", id, "HtmlAnchorElement"))
        .transpose()?;

        Ok(Self {
            indicator: dom::cast(indicator.clone(), "indicator", id, "HtmlElement")?,
            image: dom::cast(image, "image", id, "HtmlImageElement")?,
            field: dom::cast(field, "field", id, "HtmlInputElement")?,
            form_item: dom::cast(form_item, "form item", id, "HtmlElement")?,
            preview_link,
        })
    }
}

type Subscriber = Box<dyn Fn(FocalPoint)>;

/// One attached focal point widget.
pub struct Widget {
    id: FocalPointId,
    elements: Elements,
    attached_attribute: String,
    sync: RefCell<Synchronizer>,
    drag: RefCell<Option<DragGesture>>,
    registry: Rc<RefCell<RequestRegistry>>,
    subscribers: RefCell<Vec<Subscriber>>,
    listeners: RefCell<Vec<EventListener>>,
}

impl Widget {
    /// Bind the widget whose indicator is `indicator`, looking up its field
    /// and preview link under `scope`.
    ///
    /// Returns `Ok(None)` if the indicator is already bound, so repeated
    /// scans of the same markup are harmless. If the image has already
    /// loaded, the indicator is placed immediately; otherwise it is placed
    /// when the image fires `load` (or `error`).
    ///
    /// # Errors
    ///
    /// Returns a [`DomError`] if the indicator has no id, a required
    /// element is missing or of the wrong kind, or a browser call fails.
    pub fn attach(
        indicator: &web_sys::Element,
        scope: &web_sys::Element,
        config: &WidgetConfig,
        registry: Rc<RefCell<RequestRegistry>>,
    ) -> Result<Option<Rc<Self>>, DomError> {
        if indicator.has_attribute(&config.attached_attribute) {
            return Ok(None);
        }
        let id = indicator.id();
        if id.is_empty() {
            return Err(DomError::MissingId);
        }
        let elements = Elements::find(indicator, scope, config, &id)?;

        let id = FocalPointId::new(id);
        let has_error = elements.field.class_list().contains(&config.error_class);
        let preview = elements.preview_link.as_ref().map(|link| {
            PreviewLink::new(
                link.get_attribute("href").unwrap_or_default(),
                id.request_key(&config.request_key_suffix),
            )
        });
        let (sync, effects) =
            Synchronizer::attach(id.clone(), Some(elements.field.value()), has_error, preview);

        let widget = Rc::new(Self {
            id,
            elements,
            attached_attribute: config.attached_attribute.clone(),
            sync: RefCell::new(sync),
            drag: RefCell::new(None),
            registry,
            subscribers: RefCell::new(Vec::new()),
            listeners: RefCell::new(Vec::new()),
        });

        widget.prepare(&config.wrapper_class)?;
        widget.apply(&effects);
        Self::listen(&widget)?;
        indicator.set_attribute(&config.attached_attribute, "")?;

        if widget.elements.image.complete() {
            widget.image_ready();
        }
        log::debug!("{}: widget attached", widget.id);
        Ok(Some(widget))
    }

    /// The widget id.
    #[must_use]
    pub const fn id(&self) -> &FocalPointId {
        &self.id
    }

    /// The current focal point.
    #[must_use]
    pub fn point(&self) -> FocalPoint {
        self.sync.borrow().point()
    }

    /// Call `subscriber` whenever the focal point changes, from any
    /// source.
    ///
    /// Subscribers must not subscribe further subscribers from within the
    /// callback.
    pub fn subscribe(&self, subscriber: impl Fn(FocalPoint) + 'static) {
        self.subscribers.borrow_mut().push(Box::new(subscriber));
    }

    /// Wrap indicator and image, and set the inline styles the
    /// interaction relies on.
    fn prepare(&self, wrapper_class: &str) -> Result<(), DomError> {
        let indicator = &self.elements.indicator;
        if let Some(parent) = indicator.parent_element()
            && !parent.class_list().contains(wrapper_class)
        {
            let wrapper: web_sys::HtmlElement = dom::cast(
                dom::document()?.create_element("div")?,
                "wrapper",
                self.id.as_str(),
                "HtmlElement",
            )?;
            wrapper.set_class_name(wrapper_class);
            dom::set_style(&wrapper, "position", "relative")?;
            let anchor: &web_sys::Node = indicator;
            parent.insert_before(&wrapper, Some(anchor))?;
            wrapper.append_child(&self.elements.image)?;
            wrapper.append_child(indicator)?;
        }
        dom::set_style(&self.elements.image, "cursor", "crosshair")?;
        dom::set_style(indicator, "touch-action", "none")?;
        Ok(())
    }

    fn listen(this: &Rc<Self>) -> Result<(), DomError> {
        let image = &this.elements.image;
        let indicator = &this.elements.indicator;
        let field = &this.elements.field;
        let listeners = vec![
            Self::listener(this, image, "load", |w, _| w.image_ready())?,
            Self::listener(this, image, "error", |w, _| w.image_ready())?,
            Self::listener(this, image, "click", Self::image_clicked)?,
            Self::listener(this, indicator, "pointerdown", Self::drag_started)?,
            Self::listener(this, indicator, "pointermove", Self::drag_moved)?,
            Self::listener(this, indicator, "pointerup", Self::drag_ended)?,
            Self::listener(this, indicator, "pointercancel", Self::drag_ended)?,
            Self::listener(this, indicator, "dblclick", |w, _| {
                w.dispatch(|sync, _| sync.on_indicator_double_click());
            })?,
            Self::listener(this, field, "change", |w, _| w.field_changed())?,
        ];
        this.listeners.borrow_mut().extend(listeners);
        Ok(())
    }

    fn listener(
        this: &Rc<Self>,
        target: &web_sys::EventTarget,
        event: &'static str,
        handler: impl Fn(&Self, &web_sys::Event) + 'static,
    ) -> Result<EventListener, DomError> {
        let widget: Weak<Self> = Rc::downgrade(this);
        EventListener::new(target, event, move |e| {
            if let Some(widget) = widget.upgrade() {
                handler(&widget, &e);
            }
        })
    }

    fn image_ready(&self) {
        self.dispatch(|sync, dims| sync.on_image_ready(dims));
    }

    fn image_clicked(&self, event: &web_sys::Event) {
        let Some(event) = event.dyn_ref::<web_sys::MouseEvent>() else {
            return;
        };
        let rect = self.elements.image.get_bounding_client_rect();
        let x = f64::from(event.client_x()) - rect.left();
        let y = f64::from(event.client_y()) - rect.top();
        self.dispatch(|sync, dims| sync.on_image_click(x, y, dims));
    }

    fn drag_started(&self, event: &web_sys::Event) {
        let Some(event) = event.dyn_ref::<web_sys::PointerEvent>() else {
            return;
        };
        if event.button() != 0 {
            return;
        }
        // Nothing to drag until the image has placed the indicator.
        let Some(origin) = self.sync.borrow().indicator() else {
            return;
        };
        event.prevent_default();
        let _ = self.elements.indicator.set_pointer_capture(event.pointer_id());
        *self.drag.borrow_mut() = Some(DragGesture::begin(
            event.pointer_id(),
            f64::from(event.client_x()),
            f64::from(event.client_y()),
            origin,
        ));
    }

    fn drag_moved(&self, event: &web_sys::Event) {
        let Some(event) = event.dyn_ref::<web_sys::PointerEvent>() else {
            return;
        };
        let dims = self.dimensions();
        let offset = {
            let mut drag = self.drag.borrow_mut();
            let Some(gesture) = drag
                .as_mut()
                .filter(|g| g.pointer_id() == event.pointer_id())
            else {
                return;
            };
            gesture.move_to(f64::from(event.client_x()), f64::from(event.client_y()), dims)
        };
        if let Err(e) = self.place(offset) {
            log::warn!("{}: could not move indicator: {e}", self.id);
        }
    }

    fn drag_ended(&self, event: &web_sys::Event) {
        let Some(event) = event.dyn_ref::<web_sys::PointerEvent>() else {
            return;
        };
        let gesture = self
            .drag
            .borrow_mut()
            .take_if(|g| g.pointer_id() == event.pointer_id());
        if let Some(gesture) = gesture {
            self.dispatch(|sync, dims| sync.on_drag_end(gesture.current(), dims));
        }
    }

    fn field_changed(&self) {
        let value = self.elements.field.value();
        self.dispatch(|sync, dims| sync.on_field_change(Some(&value), dims));
    }

    fn dimensions(&self) -> Dimensions {
        dimensions::measure(&self.elements.image)
    }

    /// Run one synchronizer handler, then apply its effects and notify
    /// subscribers once the borrow is released.
    fn dispatch(&self, handler: impl FnOnce(&mut Synchronizer, Dimensions) -> Vec<Effect>) {
        let dims = self.dimensions();
        let (effects, before, after) = {
            let mut sync = self.sync.borrow_mut();
            let before = sync.point();
            let effects = handler(&mut *sync, dims);
            (effects, before, sync.point())
        };
        self.apply(&effects);
        if before != after {
            for subscriber in self.subscribers.borrow().iter() {
                subscriber(after);
            }
        }
    }

    fn apply(&self, effects: &[Effect]) {
        for effect in effects {
            if let Err(e) = self.apply_one(effect) {
                log::warn!("{}: could not apply {effect:?}: {e}", self.id);
            }
        }
    }

    fn apply_one(&self, effect: &Effect) -> Result<(), DomError> {
        match effect {
            Effect::PlaceIndicator(offset) => self.place(*offset),
            Effect::SetFieldValue(value) => {
                self.elements.field.set_value(value);
                Ok(())
            }
            Effect::Changed(_) => dom::dispatch_change(&self.elements.field),
            Effect::SetFieldVisible(visible) => dom::set_visible(&self.elements.form_item, *visible),
            Effect::RetargetPreview { request_key, href } => {
                if let Some(link) = &self.elements.preview_link {
                    link.set_attribute("href", href)?;
                }
                match self.registry.try_borrow_mut() {
                    Ok(mut registry) => {
                        registry.retarget(request_key, href);
                    }
                    Err(_) => log::warn!("{}: request registry busy, {request_key:?} not retargeted", self.id),
                }
                Ok(())
            }
        }
    }

    fn place(&self, offset: PixelOffset) -> Result<(), DomError> {
        dom::set_style(&self.elements.indicator, "left", &format!("{}px", offset.left))?;
        dom::set_style(&self.elements.indicator, "top", &format!("{}px", offset.top))
    }
}

impl Drop for Widget {
    fn drop(&mut self) {
        let _ = self
            .elements
            .indicator
            .remove_attribute(&self.attached_attribute);
    }
}

/// Bind every not-yet-bound widget under `scope`.
///
/// Widgets that cannot be bound are logged and skipped. The returned
/// handles keep the widgets alive; drop them to unbind.
#[must_use]
pub fn attach_all(
    scope: &web_sys::Element,
    config: &WidgetConfig,
    registry: &Rc<RefCell<RequestRegistry>>,
) -> Vec<Rc<Widget>> {
    let indicators = match dom::select_all(scope, &config.indicator_selector()) {
        Ok(indicators) => indicators,
        Err(e) => {
            log::warn!("could not scan for focal point indicators: {e}");
            return Vec::new();
        }
    };
    indicators
        .iter()
        .filter_map(
            |indicator| match Widget::attach(indicator, scope, config, Rc::clone(registry)) {
                Ok(widget) => widget,
                Err(e) => {
                    log::warn!("focal point widget not attached: {e}");
                    None
                }
            },
        )
        .collect()
}
