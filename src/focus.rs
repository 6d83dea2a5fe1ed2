//! Focus capture, placement and best-effort restoration.
//!
//! The trigger element is captured before any DOM mutation; when the modal
//! closes, focus returns to it if it is still attached. A trigger that was
//! torn down meanwhile (the FAB stack rebuilds on resize) simply loses its
//! restoration; that is never an error.

#[cfg(target_arch = "wasm32")]
use crate::descriptor::ModalDescriptor;

/// Standard focusable-descendant list, used when a descriptor has no
/// dedicated focus target.
pub const FOCUSABLE_SELECTOR: &str =
  "button, [href], input, select, textarea, [tabindex]:not([tabindex=\"-1\"])";

/// Capture the currently focused element (the trigger about to be covered).
#[cfg(target_arch = "wasm32")]
pub fn capture(document: &web_sys::Document) -> Option<web_sys::HtmlElement> {
  use wasm_bindgen::JsCast;
  document
    .active_element()
    .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok())
}

/// Move focus into a freshly shown modal: the descriptor's dedicated target
/// (the chat input) when it names one, otherwise the first focusable
/// descendant. No focusable descendant means focus stays where it is.
#[cfg(target_arch = "wasm32")]
pub fn focus_into(modal: &web_sys::Element, desc: &ModalDescriptor) {
  use wasm_bindgen::JsCast;

  let selector = desc.focus_selector.unwrap_or(FOCUSABLE_SELECTOR);
  let target = modal
    .query_selector(selector)
    .ok()
    .flatten()
    .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok());
  if let Some(target) = target {
    let _ = target.focus();
  }
}

/// Return focus to the captured trigger if it is still in the document.
#[cfg(target_arch = "wasm32")]
pub fn restore(document: &web_sys::Document, captured: Option<web_sys::HtmlElement>) {
  if let Some(el) = captured {
    let node: &web_sys::Node = el.as_ref();
    if document.contains(Some(node)) {
      let _ = el.focus();
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::descriptor::{descriptor, ModalKey};

  #[test]
  fn test_selector_covers_standard_controls() {
    for control in ["button", "input", "select", "textarea", "[href]"] {
      assert!(FOCUSABLE_SELECTOR.contains(control));
    }
    // Programmatically unfocusable elements stay excluded.
    assert!(FOCUSABLE_SELECTOR.contains("[tabindex]:not([tabindex=\"-1\"])"));
  }

  #[test]
  fn test_chatbot_overrides_the_generic_target() {
    assert_eq!(
      descriptor(ModalKey::Chatbot).focus_selector,
      Some("#chatbot-input")
    );
    assert_eq!(descriptor(ModalKey::Contact).focus_selector, None);
    assert_eq!(descriptor(ModalKey::Join).focus_selector, None);
  }
}
