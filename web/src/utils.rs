use gloo::utils::window;
use minigames_core::{PointerEvent, PointerType};
use wasm_bindgen::JsCast;
use web_sys::Element;

/// Helper function to use JavaScript's Math.random
pub(crate) fn js_random_seed() -> u64 {
    use js_sys::Math::random;
    u64::from_be_bytes([
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
    ])
}

/// Whether the primary input is coarse, i.e. a finger rather than a mouse.
pub(crate) fn is_touch_like() -> bool {
    window()
        .match_media("(pointer: coarse)")
        .ok()
        .flatten()
        .is_some_and(|query| query.matches())
}

pub(crate) fn set_hash(hash: &str) {
    if let Err(err) = window().location().set_hash(hash) {
        log::warn!("could not set location hash: {:?}", err);
    }
}

/// Translates a DOM pointer event into coordinates local to the element it hit.
/// Uses `target` since yew delegates listeners and `current_target` is not the canvas.
pub(crate) fn local_pointer_event(e: &web_sys::PointerEvent) -> PointerEvent {
    local_event(e, PointerType::from_dom(&e.pointer_type()))
}

/// Same as [`local_pointer_event`] for plain mouse events such as `contextmenu`.
pub(crate) fn local_mouse_event(e: &web_sys::MouseEvent) -> PointerEvent {
    local_event(e, PointerType::Mouse)
}

fn local_event(e: &web_sys::MouseEvent, pointer_type: PointerType) -> PointerEvent {
    let (left, top) = e
        .target()
        .and_then(|target| target.dyn_into::<Element>().ok())
        .map(|element| {
            let rect = element.get_bounding_client_rect();
            (rect.left(), rect.top())
        })
        .unwrap_or_default();

    PointerEvent {
        x: f64::from(e.client_x()) - left,
        y: f64::from(e.client_y()) - top,
        pointer_type,
        button: e.button(),
        timestamp: e.time_stamp(),
    }
}
