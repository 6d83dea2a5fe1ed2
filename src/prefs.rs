//! Language and theme preferences.
//!
//! Two independent toggles, persisted to LocalStorage so a returning
//! visitor keeps their choice. Applying a preference mutates the document
//! shell only (`lang` attribute, `dark` body class, toggle button labels);
//! translation string tables live with the page, not here.

use serde::{Deserialize, Serialize};

pub const LANG_STORAGE_KEY: &str = "ops_site_lang";
pub const THEME_STORAGE_KEY: &str = "ops_site_theme";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
  #[default]
  En,
  Es,
}

impl Language {
  pub fn toggled(self) -> Self {
    match self {
      Self::En => Self::Es,
      Self::Es => Self::En,
    }
  }

  pub fn tag(self) -> &'static str {
    match self {
      Self::En => "en",
      Self::Es => "es",
    }
  }

  /// Label shown on the toggle button: the language you would switch TO.
  pub fn toggle_label(self) -> &'static str {
    match self {
      Self::En => "ES",
      Self::Es => "EN",
    }
  }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Theme {
  #[default]
  Light,
  Dark,
}

impl Theme {
  pub fn toggled(self) -> Self {
    match self {
      Self::Light => Self::Dark,
      Self::Dark => Self::Light,
    }
  }

  pub fn is_dark(self) -> bool {
    self == Self::Dark
  }

  /// Label shown on the toggle button: the theme you would switch TO.
  pub fn toggle_label(self) -> &'static str {
    match self {
      Self::Light => "Dark",
      Self::Dark => "Light",
    }
  }
}

#[cfg(target_arch = "wasm32")]
mod dom {
  use std::cell::Cell;

  use gloo_storage::{LocalStorage, Storage};
  use wasm_bindgen::closure::Closure;
  use wasm_bindgen::JsCast;
  use web_sys::{Document, MouseEvent};

  use super::{Language, Theme, LANG_STORAGE_KEY, THEME_STORAGE_KEY};

  const LANG_TOGGLE_ID: &str = "lang-toggle";
  const THEME_TOGGLE_ID: &str = "theme-toggle";

  thread_local! {
    static LANGUAGE: Cell<Language> = const { Cell::new(Language::En) };
    static THEME: Cell<Theme> = const { Cell::new(Theme::Light) };
  }

  /// Restore persisted preferences and wire the toggle buttons.
  pub fn init(document: &Document) {
    let language: Language = LocalStorage::get(LANG_STORAGE_KEY).unwrap_or_default();
    let theme: Theme = LocalStorage::get(THEME_STORAGE_KEY).unwrap_or_default();
    LANGUAGE.with(|slot| slot.set(language));
    THEME.with(|slot| slot.set(theme));
    apply(document);

    wire(document, LANG_TOGGLE_ID, || {
      let next = LANGUAGE.with(Cell::get).toggled();
      LANGUAGE.with(|slot| slot.set(next));
      let _ = LocalStorage::set(LANG_STORAGE_KEY, next);
    });
    wire(document, THEME_TOGGLE_ID, || {
      let next = THEME.with(Cell::get).toggled();
      THEME.with(|slot| slot.set(next));
      let _ = LocalStorage::set(THEME_STORAGE_KEY, next);
    });
  }

  fn wire(document: &Document, id: &str, mut flip: impl FnMut() + 'static) {
    let Some(button) = document.get_element_by_id(id) else {
      return;
    };
    let on_click = Closure::wrap(Box::new(move |_event: MouseEvent| {
      flip();
      if let Some(document) = web_sys::window().and_then(|w| w.document()) {
        apply(&document);
      }
    }) as Box<dyn FnMut(MouseEvent)>);
    let _ = button.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref());
    on_click.forget();
  }

  /// Reflect the current preferences onto the document shell.
  fn apply(document: &Document) {
    let language = LANGUAGE.with(Cell::get);
    let theme = THEME.with(Cell::get);

    if let Some(root) = document.document_element() {
      let _ = root.set_attribute("lang", language.tag());
    }
    if let Some(body) = document.body() {
      let _ = body.class_list().toggle_with_force("dark", theme.is_dark());
    }
    if let Some(button) = document.get_element_by_id(LANG_TOGGLE_ID) {
      button.set_text_content(Some(language.toggle_label()));
    }
    if let Some(button) = document.get_element_by_id(THEME_TOGGLE_ID) {
      button.set_text_content(Some(theme.toggle_label()));
    }
  }
}

#[cfg(target_arch = "wasm32")]
pub use dom::init;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_language_toggle_round_trip() {
    assert_eq!(Language::En.toggled(), Language::Es);
    assert_eq!(Language::Es.toggled(), Language::En);
    assert_eq!(Language::En.toggled().toggled(), Language::En);
  }

  #[test]
  fn test_toggle_labels_point_at_the_other_option() {
    assert_eq!(Language::En.toggle_label(), "ES");
    assert_eq!(Language::Es.toggle_label(), "EN");
    assert_eq!(Theme::Light.toggle_label(), "Dark");
    assert_eq!(Theme::Dark.toggle_label(), "Light");
  }

  #[test]
  fn test_defaults() {
    assert_eq!(Language::default(), Language::En);
    assert_eq!(Theme::default(), Theme::Light);
    assert!(!Theme::default().is_dark());
  }
}
