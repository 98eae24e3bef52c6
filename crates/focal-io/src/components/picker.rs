//! Focal point picker component.

use std::cell::RefCell;
use std::rc::Rc;

use dioxus::prelude::*;
use focal_core::{FocalPoint, RequestRegistry, WidgetConfig};

use crate::dom;
use crate::widget::{self, Widget};

/// Inline style of the crosshair indicator. `left`/`top` are owned by the
/// widget binding.
const INDICATOR_STYLE: &str = "position: absolute; width: 20px; height: 20px; \
    transform: translate(-50%, -50%); border: 2px solid #fff; border-radius: 50%; \
    box-shadow: 0 0 0 1px #000; cursor: move;";

/// Props for the [`FocalPointPicker`] component.
#[derive(Props, Clone)]
pub struct FocalPointPickerProps {
    /// Widget id; correlates indicator, field and preview link.
    #[props(into)]
    id: String,
    /// Image source URL.
    #[props(into)]
    src: String,
    /// Form field name.
    #[props(into)]
    name: String,
    /// Initial field value (`"left,top"`). Empty means centered.
    #[props(default, into)]
    value: String,
    /// Validation error for the field. When present the raw field starts
    /// out visible.
    #[props(default)]
    error: Option<String>,
    /// Preview link target; its last path segment is rewritten to the
    /// current focal point.
    #[props(default)]
    preview_href: Option<String>,
    /// Registry holding the preview request, shared with the page.
    registry: Rc<RefCell<RequestRegistry>>,
    /// Called with the new point whenever the focal point changes.
    #[props(default)]
    on_change: Option<EventHandler<FocalPoint>>,
}

impl PartialEq for FocalPointPickerProps {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.src == other.src
            && self.name == other.name
            && self.value == other.value
            && self.error == other.error
            && self.preview_href == other.preview_href
            && Rc::ptr_eq(&self.registry, &other.registry)
            && self.on_change == other.on_change
    }
}

/// An image with a draggable crosshair and the text field it edits.
///
/// Renders the markup the widget binding expects, then binds it once the
/// container is mounted. The raw field is hidden unless it carries an
/// error; double-clicking the crosshair toggles it.
#[component]
pub fn FocalPointPicker(props: FocalPointPickerProps) -> Element {
    let config = WidgetConfig::default();
    let mut bound: Signal<Option<Rc<Widget>>> = use_signal(|| None);

    let container_id = format!("{}-widget", props.id);
    let field_id = format!("{}-value", props.id);
    let field_class = if props.error.is_some() {
        format!("{} {}", config.field_class, config.error_class)
    } else {
        config.field_class.clone()
    };

    let on_mounted = {
        let container_id = container_id.clone();
        let registry = Rc::clone(&props.registry);
        let on_change = props.on_change;
        move |_: MountedEvent| {
            if bound.peek().is_some() {
                return;
            }
            let scope = match dom::document() {
                Ok(document) => document.get_element_by_id(&container_id),
                Err(e) => {
                    log::warn!("{container_id}: {e}");
                    return;
                }
            };
            let Some(scope) = scope else {
                log::warn!("{container_id}: mounted container not found");
                return;
            };
            let Some(widget) = widget::attach_all(&scope, &WidgetConfig::default(), &registry)
                .into_iter()
                .next()
            else {
                return;
            };
            if let Some(on_change) = on_change {
                widget.subscribe(move |point| on_change.call(point));
            }
            bound.set(Some(widget));
        }
    };

    rsx! {
        div {
            id: "{container_id}",
            class: "focal-point-picker",
            onmounted: on_mounted,

            div {
                class: "{config.wrapper_class}",
                style: "position: relative; display: inline-block;",
                div {
                    id: "{props.id}",
                    class: "{config.indicator_class}",
                    style: INDICATOR_STYLE,
                    title: "Drag to set the focal point, double-click to edit it",
                }
                img {
                    src: "{props.src}",
                    alt: "",
                    style: "display: block; max-width: 100%;",
                }
            }

            div { class: "{config.form_item_class}",
                label { r#for: "{field_id}", "Focal point" }
                input {
                    r#type: "text",
                    id: "{field_id}",
                    name: "{props.name}",
                    class: "{field_class}",
                    "data-focal-point-id": "{props.id}",
                    initial_value: "{props.value}",
                }
                if let Some(ref err) = props.error {
                    p { class: "description", "{err}" }
                }
            }

            if let Some(ref href) = props.preview_href {
                a {
                    class: "{config.preview_link_class}",
                    "data-focal-point-id": "{props.id}",
                    href: "{href}",
                    target: "_blank",
                    "Preview"
                }
            }
        }
    }
}
