//! Mobile navigation drawer collaborator.
//!
//! The drawer owns its own open/closed state via the `open` class; the
//! registry and FAB stack only ever ask it to toggle. The drawer is not a
//! modal: it takes no overlay, no scroll lock and no focus capture.

#![cfg(target_arch = "wasm32")]

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, MouseEvent};

const DRAWER_ID: &str = "mobile-nav";
const TOGGLE_ID: &str = "toggle-nav";

/// Toggle the drawer and keep `aria-expanded` on the toggle button in sync.
pub fn toggle() {
  let Some(document) = web_sys::window().and_then(|w| w.document()) else {
    return;
  };
  let Some(drawer) = document.get_element_by_id(DRAWER_ID) else {
    return;
  };
  let is_open = drawer.class_list().toggle("open").unwrap_or(false);
  if let Some(button) = document.get_element_by_id(TOGGLE_ID) {
    let _ = button.set_attribute("aria-expanded", if is_open { "true" } else { "false" });
  }
}

/// Wire the drawer's own toggle button, when the page has one.
pub fn init(document: &Document) {
  let Some(button) = document.get_element_by_id(TOGGLE_ID) else {
    return;
  };
  wire_toggle(&button);
}

fn wire_toggle(button: &Element) {
  let on_click = Closure::wrap(Box::new(move |_event: MouseEvent| {
    toggle();
  }) as Box<dyn FnMut(MouseEvent)>);
  let _ = button.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref());
  on_click.forget();
}
