//! Client-side interactive layer for the OPS marketing site.
//!
//! Compiled to WebAssembly and loaded as a progressive enhancement over
//! the static pages. The core is the modal lifecycle: the FAB stack
//! triggers the registry, the registry lazily fetches modal fragments
//! (contact / join / chatbot) from same-origin paths, and the overlay,
//! focus and drag machinery wraps whichever modal is visible. Satellite
//! modules cover the chat client, form submission with anti-abuse checks,
//! the mobile nav drawer, language/theme preferences and audit logging.
//!
//! Decision logic is target-independent (and tested on the host); DOM
//! effects are gated behind `cfg(target_arch = "wasm32")`.

pub mod audit;
pub mod chat;
pub mod descriptor;
pub mod drag;
pub mod error;
pub mod fab;
pub mod focus;
pub mod forms;
pub mod loader;
pub mod nav;
pub mod overlay;
pub mod prefs;
pub mod registry;
pub mod sanitize;
pub mod state;

pub use descriptor::{descriptor, ModalDescriptor, ModalKey};
pub use error::LoadError;
pub use state::{ModalPhase, ShowAction};

/// Entry point; runs once when the module is instantiated on the page.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
  console_error_panic_hook::set_once();

  let Some(document) = web_sys::window().and_then(|w| w.document()) else {
    return;
  };
  prefs::init(&document);
  nav::init(&document);
  registry::init_document_handlers(&document);
  fab::init(&document);
}
