use dioxus::prelude::*;
use dioxus_web::WebEventExt;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// Browser viewport size in CSS pixels
pub fn current_viewport_size() -> Option<(i32, i32)> {
    let window = web_sys::window()?;
    let width = window.inner_width().ok()?.as_f64()?;
    let height = window.inner_height().ok()?.as_f64()?;

    if width > 0.0 && height > 0.0 {
        return Some((width.round() as i32, height.round() as i32));
    }

    let document = window.document()?;
    let root = document.document_element()?;
    Some((root.client_width().max(0), root.client_height().max(0)))
}

/// Client coordinates of a pointer event, read from the DOM event when available.
pub fn pointer_point(e: &PointerEvent) -> (i32, i32) {
    if let Some((x, y)) = e.data().try_as_web_event().and_then(|event| {
        event
            .dyn_ref::<web_sys::PointerEvent>()
            .map(|pointer| (pointer.client_x(), pointer.client_y()))
    }) {
        return (x, y);
    }

    let point = e.data().client_coordinates();
    (point.x as i32, point.y as i32)
}

/// Pointer position relative to the element that received the event
pub fn pointer_offset(e: &PointerEvent) -> (f64, f64) {
    let point = e.data().element_coordinates();
    (point.x, point.y)
}

fn closest_element(e: &PointerEvent, selector: &str) -> Option<web_sys::Element> {
    e.data()
        .try_as_web_event()
        .and_then(|event| event.current_target())
        .and_then(|target| target.dyn_into::<web_sys::Element>().ok())
        .and_then(|element| element.closest(selector).ok().flatten())
}

pub fn capture_pointer(e: &PointerEvent, selector: &str) {
    let pointer_id = e.data().pointer_id();
    if let Some(element) = closest_element(e, selector) {
        let _ = element.set_pointer_capture(pointer_id);
    }
}

pub fn release_pointer(e: &PointerEvent, selector: &str) {
    let pointer_id = e.data().pointer_id();
    if let Some(element) = closest_element(e, selector) {
        let _ = element.release_pointer_capture(pointer_id);
    }
}

/// 2D context of the canvas with the given element id
pub fn canvas_context(id: &str) -> Option<CanvasRenderingContext2d> {
    let document = web_sys::window()?.document()?;
    let canvas = document
        .get_element_by_id(id)?
        .dyn_into::<HtmlCanvasElement>()
        .ok()?;
    canvas
        .get_context("2d")
        .ok()??
        .dyn_into::<CanvasRenderingContext2d>()
        .ok()
}

/// First file picked in a file input, with a fresh object URL for it.
/// Returns `(name, mime, url)`.
pub fn selected_file(e: &FormEvent) -> Option<(String, String, String)> {
    let input = e
        .data()
        .try_as_web_event()?
        .target()?
        .dyn_into::<web_sys::HtmlInputElement>()
        .ok()?;
    let file = input.files()?.get(0)?;
    let url = web_sys::Url::create_object_url_with_blob(&file).ok()?;
    Some((file.name(), file.type_(), url))
}

pub fn focus_element(id: &str) {
    let Some(element) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(id))
        .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok())
    else {
        return;
    };
    let _ = element.focus();
}
