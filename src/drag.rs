//! Draggable modal positioning (desktop affordance).
//!
//! Below `DRAG_MIN_WIDTH` the modal stays centered and `attach` installs
//! nothing. Above it, a mousedown on the modal header records the pointer
//! offset from the modal's top-left, drops the centering transform and
//! switches to explicit `left`/`top` positioning. Document-level move/up
//! listeners are installed once per modal and guarded by the drag flag, so
//! they are inert between drags.

#[cfg(target_arch = "wasm32")]
use std::cell::RefCell;
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;

/// Viewport width below which dragging is disabled.
pub const DRAG_MIN_WIDTH: f64 = 768.0;

/// Selector for the drag handle inside a modal. The chatbot header carries
/// its own id instead of the shared class.
pub const HANDLE_SELECTOR: &str = ".modal-header, #chatbot-header";

#[cfg(target_arch = "wasm32")]
const ATTACHED_ATTR: &str = "data-draggable";

/// Per-drag pointer offset, created on mousedown and discarded on mouseup.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragState {
  offset_x: f64,
  offset_y: f64,
}

impl DragState {
  /// Offset of the pointer from the modal's current top-left corner; keeps
  /// the modal from jumping so its corner lands under the cursor.
  pub fn begin(pointer_x: f64, pointer_y: f64, modal_left: f64, modal_top: f64) -> Self {
    Self {
      offset_x: pointer_x - modal_left,
      offset_y: pointer_y - modal_top,
    }
  }

  /// New top-left for the modal given the current pointer position.
  pub fn position(&self, pointer_x: f64, pointer_y: f64) -> (f64, f64) {
    (pointer_x - self.offset_x, pointer_y - self.offset_y)
  }
}

/// Whether dragging is available at the given viewport width.
pub fn drag_enabled(viewport_width: f64) -> bool {
  viewport_width >= DRAG_MIN_WIDTH
}

/// Make `modal` draggable by its header. No-ops when the viewport is below
/// the threshold, when the modal has no handle, or when it is already
/// wired (re-invocations on resize are expected).
#[cfg(target_arch = "wasm32")]
pub fn attach(modal: &web_sys::Element) {
  use wasm_bindgen::closure::Closure;
  use wasm_bindgen::JsCast;
  use web_sys::MouseEvent;

  if !drag_enabled(viewport_width()) {
    return;
  }
  if modal.get_attribute(ATTACHED_ATTR).is_some() {
    return;
  }
  let Some(handle) = modal.query_selector(HANDLE_SELECTOR).ok().flatten() else {
    return;
  };
  let Some(document) = web_sys::window().and_then(|w| w.document()) else {
    return;
  };

  let session: Rc<RefCell<Option<DragState>>> = Rc::new(RefCell::new(None));

  let on_down = {
    let session = Rc::clone(&session);
    let modal = modal.clone();
    Closure::wrap(Box::new(move |event: MouseEvent| {
      // The threshold can be crossed after attach; check live.
      if !drag_enabled(viewport_width()) {
        return;
      }
      // A mousedown on a control inside the header (close button) is a
      // click, not a drag.
      if let Some(target) = event.target().and_then(|t| t.dyn_into::<web_sys::Element>().ok()) {
        if target.closest(crate::focus::FOCUSABLE_SELECTOR).ok().flatten().is_some() {
          return;
        }
      }
      let rect = modal.get_bounding_client_rect();
      let state = DragState::begin(
        event.client_x() as f64,
        event.client_y() as f64,
        rect.left(),
        rect.top(),
      );
      *session.borrow_mut() = Some(state);
      if let Some(html) = modal.dyn_ref::<web_sys::HtmlElement>() {
        // Centering transform off; position is explicit from here on.
        let _ = html.style().set_property("transform", "none");
        let _ = html.style().set_property("cursor", "grabbing");
      }
    }) as Box<dyn FnMut(MouseEvent)>)
  };

  let on_move = {
    let session = Rc::clone(&session);
    let modal = modal.clone();
    Closure::wrap(Box::new(move |event: MouseEvent| {
      let Some(state) = *session.borrow() else {
        return;
      };
      // Text selection fights the drag.
      event.prevent_default();
      let (left, top) = state.position(event.client_x() as f64, event.client_y() as f64);
      if let Some(html) = modal.dyn_ref::<web_sys::HtmlElement>() {
        let _ = html.style().set_property("left", &format!("{}px", left));
        let _ = html.style().set_property("top", &format!("{}px", top));
      }
    }) as Box<dyn FnMut(MouseEvent)>)
  };

  let on_up = {
    let session = Rc::clone(&session);
    let modal = modal.clone();
    Closure::wrap(Box::new(move |_event: MouseEvent| {
      if session.borrow_mut().take().is_some() {
        if let Some(html) = modal.dyn_ref::<web_sys::HtmlElement>() {
          let _ = html.style().set_property("cursor", "move");
        }
      }
    }) as Box<dyn FnMut(MouseEvent)>)
  };

  let _ = handle.add_event_listener_with_callback("mousedown", on_down.as_ref().unchecked_ref());
  let _ = document.add_event_listener_with_callback("mousemove", on_move.as_ref().unchecked_ref());
  let _ = document.add_event_listener_with_callback("mouseup", on_up.as_ref().unchecked_ref());
  let _ = modal.set_attribute(ATTACHED_ATTR, "true");

  // Listeners live as long as the cached modal element (page lifetime).
  on_down.forget();
  on_move.forget();
  on_up.forget();
}

#[cfg(target_arch = "wasm32")]
fn viewport_width() -> f64 {
  web_sys::window()
    .and_then(|w| w.inner_width().ok())
    .and_then(|v| v.as_f64())
    .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_threshold() {
    assert!(!drag_enabled(320.0));
    assert!(!drag_enabled(767.9));
    assert!(drag_enabled(768.0));
    assert!(drag_enabled(1920.0));
  }

  #[test]
  fn test_no_jump_on_grab() {
    // Grabbing the header 40,12 into the modal keeps that grip point.
    let state = DragState::begin(140.0, 92.0, 100.0, 80.0);
    assert_eq!(state.position(140.0, 92.0), (100.0, 80.0));
  }

  #[test]
  fn test_position_follows_pointer() {
    let state = DragState::begin(140.0, 92.0, 100.0, 80.0);
    assert_eq!(state.position(200.0, 150.0), (160.0, 138.0));
    // Dragging past the viewport edge is allowed; CSS clamps visually.
    assert_eq!(state.position(10.0, 5.0), (-30.0, -7.0));
  }

  #[test]
  fn test_handle_selector_covers_both_header_styles() {
    assert!(HANDLE_SELECTOR.contains(".modal-header"));
    assert!(HANDLE_SELECTOR.contains("#chatbot-header"));
  }
}
