//! Backdrop overlay and document scroll lock.
//!
//! Exactly one `.backdrop` node exists while a modal is visible, and it
//! exists only then. The overlay click handler routes through the
//! registry's hide path, so a backdrop click behaves like the close button.
//! `data-lock` markers on `<html>` and `<body>` let the stylesheet freeze
//! background scrolling.

#![cfg(target_arch = "wasm32")]

use std::cell::RefCell;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, MouseEvent};

const LOCK_ATTR: &str = "data-lock";
const BACKDROP_CLASS: &str = "backdrop";

/// Owns the overlay node and its click closure; dropping the closure when
/// the node goes away keeps the listener from leaking.
#[derive(Default)]
pub struct OverlayController {
  active: RefCell<Option<(Element, Closure<dyn FnMut(MouseEvent)>)>>,
}

impl OverlayController {
  /// Create the backdrop and engage the scroll lock. Any stale overlay is
  /// removed first, so at most one node ever exists.
  pub fn show(&self, document: &Document, on_click: impl FnMut(MouseEvent) + 'static) {
    self.hide(document);

    let Ok(node) = document.create_element("div") else {
      return;
    };
    node.set_class_name(BACKDROP_CLASS);
    let _ = node.set_attribute("data-open", "true");

    let closure = Closure::wrap(Box::new(on_click) as Box<dyn FnMut(MouseEvent)>);
    let _ = node.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());

    if let Some(body) = document.body() {
      let _ = body.append_child(&node);
      let _ = body.set_attribute(LOCK_ATTR, "true");
    }
    if let Some(root) = document.document_element() {
      let _ = root.set_attribute(LOCK_ATTR, "true");
    }

    *self.active.borrow_mut() = Some((node, closure));
  }

  /// Remove the overlay and clear the scroll lock. Safe to call when no
  /// overlay exists.
  pub fn hide(&self, document: &Document) {
    if let Some((node, _closure)) = self.active.borrow_mut().take() {
      node.remove();
    }
    // A stale node can exist if something outside the controller created
    // one; sweep by class to keep the invariant.
    if let Ok(nodes) = document.query_selector_all(&format!(".{}", BACKDROP_CLASS)) {
      for i in 0..nodes.length() {
        if let Some(stale) = nodes.get(i).and_then(|n| n.dyn_into::<Element>().ok()) {
          stale.remove();
        }
      }
    }
    if let Some(body) = document.body() {
      let _ = body.remove_attribute(LOCK_ATTR);
    }
    if let Some(root) = document.document_element() {
      let _ = root.remove_attribute(LOCK_ATTR);
    }
  }

  pub fn is_visible(&self) -> bool {
    self.active.borrow().is_some()
  }
}
