//! Modal registry: the single owner of modal visibility.
//!
//! One registry instance exists per page session (a `thread_local`
//! singleton; WASM is single-threaded). All visibility changes go through
//! `show`/`hide`: FAB clicks, close buttons, backdrop clicks, Escape and
//! the exported escape hatch all land here, which is what keeps the
//! at-most-one-modal and overlay-iff-visible invariants honest.
//!
//! Loaded modal elements are cached in the DOM by id and reused; `hide`
//! only flips visibility, never tears the subtree down.

#![cfg(target_arch = "wasm32")]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::wasm_bindgen;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, HtmlElement, KeyboardEvent, MouseEvent};

use crate::audit;
use crate::chat::{self, LaunchLimiter};
use crate::descriptor::{descriptor, ModalDescriptor, ModalKey};
use crate::drag;
use crate::focus;
use crate::forms;
use crate::loader;
use crate::overlay::OverlayController;
use crate::state::{completion_wins, decide_show, ModalPhase, ShowAction};

const WIRED_ATTR: &str = "data-wired";

pub struct ModalRegistry {
  phase: Cell<ModalPhase>,
  last_focused: RefCell<Option<HtmlElement>>,
  overlay: OverlayController,
  chatbot_limiter: RefCell<LaunchLimiter>,
}

thread_local! {
  static REGISTRY: Rc<ModalRegistry> = Rc::new(ModalRegistry::new());
}

/// Run `f` against the page's registry.
pub fn with<R>(f: impl FnOnce(&Rc<ModalRegistry>) -> R) -> R {
  REGISTRY.with(f)
}

/// Open the modal for `key` (FAB click entry point).
pub fn show(key: ModalKey) {
  with(|r| r.show(key));
}

/// Force-close whatever modal is currently active. Exported so collaborators
/// outside this crate (and legacy inline scripts) can dismiss the modal.
#[wasm_bindgen(js_name = hideActiveFabModal)]
pub fn hide_active_modal() {
  with(|r| r.hide());
}

impl ModalRegistry {
  fn new() -> Self {
    Self {
      phase: Cell::new(ModalPhase::Closed),
      last_focused: RefCell::new(None),
      overlay: OverlayController::default(),
      chatbot_limiter: RefCell::new(LaunchLimiter::default()),
    }
  }

  pub fn phase(&self) -> ModalPhase {
    self.phase.get()
  }

  pub fn overlay_visible(&self) -> bool {
    self.overlay.is_visible()
  }

  /// Show the modal for `key`, loading its fragment on first use.
  pub fn show(self: &Rc<Self>, key: ModalKey) {
    let Some(document) = document() else {
      return;
    };
    if key == ModalKey::Chatbot && !self.chatbot_limiter.borrow_mut().allow(js_sys::Date::now())
    {
      audit::warn("Chatbot launch rate limited");
      return;
    }

    let desc = descriptor(key);
    let cached = document.get_element_by_id(desc.dom_id);
    let decision = decide_show(self.phase.get(), key, cached.is_some());
    if decision.action == ShowAction::AlreadyPending {
      return;
    }

    // Capture the trigger before any mutation; closing the previous modal
    // restores ITS trigger, then the new capture takes the slot.
    let trigger = focus::capture(&document);
    if decision.close_current {
      self.hide();
    }
    *self.last_focused.borrow_mut() = trigger;

    match decision.action {
      ShowAction::Reuse => {
        if let Some(modal) = cached {
          self.finish_open(&document, &modal, desc);
        }
      }
      ShowAction::Load => {
        self.phase.set(ModalPhase::Opening(key));
        let registry = Rc::clone(self);
        spawn_local(async move {
          let result = loader::load(desc).await;
          registry.complete_load(desc, result);
        });
      }
      ShowAction::AlreadyPending => unreachable!("handled above"),
    }
  }

  /// Landing point for a finished fragment load: cache the element, wire
  /// it once and surface it only if its key is still the one being opened.
  pub fn complete_load(
    self: &Rc<Self>,
    desc: &'static ModalDescriptor,
    result: Result<Element, crate::error::LoadError>,
  ) {
    let Some(document) = document() else {
      return;
    };
    match result {
      Ok(modal) => {
        // Inserted hidden; the winner check below flips it visible. A
        // late arrival must stay invisible without stylesheet help.
        if let Some(html) = modal.dyn_ref::<HtmlElement>() {
          let _ = html.style().set_property("display", "none");
        }
        if let Some(body) = document.body() {
          let _ = body.append_child(&modal);
        }
        self.wire_inserted(&modal, desc);
        audit::audit(
          "modal_loaded",
          serde_json::json!({ "modal": desc.key.as_str() }),
        );
        // The user may have opened something else while we fetched; the
        // element stays cached either way, visibility goes to the winner.
        if completion_wins(self.phase.get(), desc.key) {
          self.finish_open(&document, &modal, desc);
        }
      }
      Err(err) => {
        audit::error(&format!("Failed to load modal for {}: {}", desc.key, err));
        if completion_wins(self.phase.get(), desc.key) {
          // Revert silently: no element, no backdrop, no stale focus slot.
          self.phase.set(ModalPhase::Closed);
          self.overlay.hide(&document);
          self.last_focused.borrow_mut().take();
        }
      }
    }
  }

  /// Make an inserted-or-cached modal visible and surround it with the
  /// overlay, drag and focus machinery.
  fn finish_open(self: &Rc<Self>, document: &Document, modal: &Element, desc: &ModalDescriptor) {
    if let Some(html) = modal.dyn_ref::<HtmlElement>() {
      let _ = html.style().set_property("display", "flex");
    }
    let registry = Rc::clone(self);
    self.overlay.show(document, move |_event: MouseEvent| registry.hide());
    drag::attach(modal);
    focus::focus_into(modal, desc);
    self.phase.set(ModalPhase::Open(desc.key));
  }

  /// One-time wiring of a freshly inserted modal: close button plus the
  /// key-specific component (chat form or contact/join forms).
  fn wire_inserted(self: &Rc<Self>, modal: &Element, desc: &ModalDescriptor) {
    if modal.get_attribute(WIRED_ATTR).is_some() {
      return;
    }
    let _ = modal.set_attribute(WIRED_ATTR, "true");

    if let Some(button) = modal.query_selector(".modal-close").ok().flatten() {
      let registry = Rc::clone(self);
      let on_close = Closure::wrap(Box::new(move |_event: MouseEvent| {
        registry.hide();
      }) as Box<dyn FnMut(MouseEvent)>);
      let _ =
        button.add_event_listener_with_callback("click", on_close.as_ref().unchecked_ref());
      // The cached element lives for the rest of the page session.
      on_close.forget();
    }

    match desc.key {
      ModalKey::Chatbot => chat::wire(modal),
      ModalKey::Contact | ModalKey::Join => forms::wire(modal, desc.key),
    }
  }

  /// Close the active modal. Re-entrant calls are no-ops; the overlay and
  /// scroll lock are cleared unconditionally so no failure path can leave
  /// them behind.
  pub fn hide(&self) {
    let Some(document) = document() else {
      return;
    };
    let phase = self.phase.get();
    if let Some(key) = phase.open_key() {
      if let Some(modal) = document.get_element_by_id(descriptor(key).dom_id) {
        if let Some(html) = modal.dyn_ref::<HtmlElement>() {
          let _ = html.style().set_property("display", "none");
        }
      }
    }
    self.phase.set(ModalPhase::Closed);
    self.overlay.hide(&document);
    focus::restore(&document, self.last_focused.borrow_mut().take());
  }
}

/// Install the document-level handlers the registry relies on: Escape to
/// close, and drag re-evaluation when the viewport is resized across the
/// desktop threshold.
pub fn init_document_handlers(document: &Document) {
  let on_keydown = Closure::wrap(Box::new(move |event: KeyboardEvent| {
    if event.key() == "Escape" {
      with(|r| {
        if !r.phase().is_closed() {
          r.hide();
        }
      });
    }
  }) as Box<dyn FnMut(KeyboardEvent)>);
  let _ =
    document.add_event_listener_with_callback("keydown", on_keydown.as_ref().unchecked_ref());
  on_keydown.forget();

  if let Some(window) = web_sys::window() {
    let on_resize = Closure::wrap(Box::new(move |_event: web_sys::Event| {
      with(|r| {
        if let Some(key) = r.phase().open_key() {
          if let Some(modal) =
            document().and_then(|d| d.get_element_by_id(descriptor(key).dom_id))
          {
            drag::attach(&modal);
          }
        }
      });
    }) as Box<dyn FnMut(web_sys::Event)>);
    let _ =
      window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref());
    on_resize.forget();
  }
}

fn document() -> Option<Document> {
  web_sys::window().and_then(|w| w.document())
}
