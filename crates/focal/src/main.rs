use std::cell::RefCell;
use std::rc::Rc;

use dioxus::prelude::*;
use focal_core::{FocalPoint, FocalPointId, RequestDescriptor, RequestRegistry, WidgetConfig};
use focal_io::FocalPointPicker;

/// Widget id of the demo picker.
const PICKER_ID: &str = "hero-image";

/// Demo image.
const IMAGE_SRC: &str = "https://picsum.photos/id/1015/800/500";

/// Preview target; the last segment carries the focal point.
const PREVIEW_HREF: &str = "/preview/hero-image/50,50";

/// Registry key of the demo picker's preview request.
fn preview_request_key() -> String {
    FocalPointId::new(PICKER_ID).request_key(&WidgetConfig::default().request_key_suffix)
}

fn main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    dioxus::launch(app);
}

/// Root application component.
///
/// Plays the part of the surrounding page: it owns the request registry
/// the picker retargets, tracks the current point, and can re-issue the
/// preview request.
fn app() -> Element {
    let registry = use_hook(|| {
        let mut registry = RequestRegistry::new();
        registry.register(preview_request_key(), RequestDescriptor::new(PREVIEW_HREF));
        Rc::new(RefCell::new(registry))
    });
    let mut point = use_signal(|| FocalPoint::CENTER);
    let mut preview_url = use_signal(|| Option::<String>::None);

    let on_change = move |new_point: FocalPoint| {
        log::info!("focal point is now {new_point}");
        point.set(new_point);
    };

    let on_refresh = {
        let registry = Rc::clone(&registry);
        move |_| {
            let key = preview_request_key();
            let url = registry.borrow().get(&key).map(|request| request.url.clone());
            if url.is_none() {
                log::warn!("no preview request registered under {key:?}");
            }
            preview_url.set(url);
        }
    };

    rsx! {
        div { class: "focal-demo",
            header {
                h1 { "focal" }
                p { "Drag the crosshair or click the image to choose its focal point." }
            }

            FocalPointPicker {
                id: PICKER_ID,
                src: IMAGE_SRC,
                name: "focal_point",
                value: "50,50",
                preview_href: PREVIEW_HREF.to_owned(),
                registry: Rc::clone(&registry),
                on_change: on_change,
            }

            p { "Current focal point: {point}" }

            button { onclick: on_refresh, "Refresh preview" }

            if let Some(url) = preview_url() {
                p { "Preview request: {url}" }
            }
        }
    }
}
