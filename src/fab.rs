//! Floating action button stack.
//!
//! On narrow viewports a fixed-order cluster of trigger buttons (contact,
//! join, chatbot, menu) sits over the page; above the mobile threshold the
//! whole stack is torn down. Build and teardown are idempotent and
//! re-evaluated on every resize. Content buttons route through the modal
//! registry; the menu button delegates to the nav drawer, which owns its
//! own state.

use crate::descriptor::ModalKey;

/// Viewport width at or below which the FAB stack is shown.
pub const MOBILE_MAX_WIDTH: f64 = 768.0;

/// What a FAB does when clicked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FabAction {
  OpenModal(ModalKey),
  ToggleMenu,
}

/// Static description of one button in the stack.
#[derive(Debug)]
pub struct FabSpec {
  pub id: &'static str,
  pub action: FabAction,
  pub icon: &'static str,
  pub title: &'static str,
  pub class: &'static str,
}

/// The stack, in its fixed display order.
pub static FAB_BUTTONS: [FabSpec; 4] = [
  FabSpec {
    id: "fab-contact",
    action: FabAction::OpenModal(ModalKey::Contact),
    icon: "<i class=\"fa fa-envelope\"></i>",
    title: "Contact Us",
    class: "fab-stack__contact",
  },
  FabSpec {
    id: "fab-join",
    action: FabAction::OpenModal(ModalKey::Join),
    icon: "<i class=\"fa fa-user-plus\"></i>",
    title: "Join Us",
    class: "fab-stack__join",
  },
  FabSpec {
    id: "fab-chatbot",
    action: FabAction::OpenModal(ModalKey::Chatbot),
    icon: "<i class=\"fa fa-comments\"></i>",
    title: "Chatbot",
    class: "fab-stack__chatbot",
  },
  FabSpec {
    id: "fab-menu",
    action: FabAction::ToggleMenu,
    icon: "<i class=\"fa fa-bars\"></i>",
    title: "Menu",
    class: "fab-stack__menu",
  },
];

/// Whether the stack belongs on screen at this viewport width.
pub fn stack_visible(viewport_width: f64) -> bool {
  viewport_width <= MOBILE_MAX_WIDTH
}

#[cfg(target_arch = "wasm32")]
mod dom {
  use std::cell::RefCell;

  use wasm_bindgen::closure::Closure;
  use wasm_bindgen::JsCast;
  use web_sys::{Document, Element, MouseEvent};

  use super::{FabAction, FabSpec, FAB_BUTTONS};

  struct FabStack {
    root: Element,
    // Click closures stay alive exactly as long as the stack.
    _handlers: Vec<Closure<dyn FnMut(MouseEvent)>>,
  }

  thread_local! {
    static STACK: RefCell<Option<FabStack>> = const { RefCell::new(None) };
  }

  /// Build the stack unless it already exists.
  pub fn build(document: &Document) {
    STACK.with(|stack| {
      let mut stack = stack.borrow_mut();
      if stack.is_some() {
        return;
      }
      let Ok(root) = document.create_element("div") else {
        return;
      };
      root.set_class_name("fab-stack");

      let mut handlers = Vec::with_capacity(FAB_BUTTONS.len());
      for spec in &FAB_BUTTONS {
        if let Some(handler) = append_button(document, &root, spec) {
          handlers.push(handler);
        }
      }
      if let Some(body) = document.body() {
        let _ = body.append_child(&root);
      }
      *stack = Some(FabStack {
        root,
        _handlers: handlers,
      });
    });
  }

  /// Remove the stack if present.
  pub fn teardown() {
    STACK.with(|stack| {
      if let Some(stack) = stack.borrow_mut().take() {
        stack.root.remove();
      }
    });
  }

  fn append_button(
    document: &Document,
    root: &Element,
    spec: &'static FabSpec,
  ) -> Option<Closure<dyn FnMut(MouseEvent)>> {
    let button = document.create_element("button").ok()?;
    button.set_id(spec.id);
    button.set_class_name(&format!("fab-stack__button {}", spec.class));
    button.set_inner_html(spec.icon);
    let _ = button.set_attribute("title", spec.title);
    let _ = button.set_attribute("aria-label", spec.title);

    let action = spec.action;
    let on_click = Closure::wrap(Box::new(move |_event: MouseEvent| match action {
      FabAction::OpenModal(key) => crate::registry::show(key),
      FabAction::ToggleMenu => crate::nav::toggle(),
    }) as Box<dyn FnMut(MouseEvent)>);
    let _ = button.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref());

    root.append_child(&button).ok()?;
    Some(on_click)
  }
}

/// Build or tear down the stack to match the current viewport width.
#[cfg(target_arch = "wasm32")]
pub fn sync(document: &web_sys::Document) {
  let width = web_sys::window()
    .and_then(|w| w.inner_width().ok())
    .and_then(|v| v.as_f64())
    .unwrap_or(0.0);
  if stack_visible(width) {
    dom::build(document);
  } else {
    dom::teardown();
  }
}

/// Initial sync plus re-evaluation on every resize.
#[cfg(target_arch = "wasm32")]
pub fn init(document: &web_sys::Document) {
  use wasm_bindgen::closure::Closure;
  use wasm_bindgen::JsCast;

  sync(document);

  let Some(window) = web_sys::window() else {
    return;
  };
  let document = document.clone();
  let on_resize = Closure::wrap(Box::new(move |_event: web_sys::Event| {
    sync(&document);
  }) as Box<dyn FnMut(web_sys::Event)>);
  let _ = window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref());
  on_resize.forget();
}
