//! Contact / join form submission with anti-abuse checks.
//!
//! Loaded fragments carry their forms; this module wires them: a filled
//! honeypot field blocks the submission outright, every field value is
//! sanitized, and the JSON POST carries the CSRF token issued by the
//! opaque session endpoint. A successful submission resets the form and
//! dismisses the modal through the registry.

use crate::descriptor::ModalKey;
use crate::sanitize;

#[cfg(target_arch = "wasm32")]
use serde::Deserialize;

#[cfg(target_arch = "wasm32")]
const CSRF_ENDPOINT: &str = "/api/csrf-token";

/// Hidden field legitimate users never fill; bots do.
pub fn honeypot_id(key: ModalKey) -> String {
  format!("honeypot-{}", key.as_str())
}

pub fn form_endpoint(key: ModalKey) -> String {
  format!("/api/{}", key.as_str())
}

/// A honeypot with any non-whitespace content marks an automated
/// submission.
pub fn honeypot_tripped(value: Option<&str>) -> bool {
  value.map(|v| !v.trim().is_empty()).unwrap_or(false)
}

/// Sanitize a collected field map for serialization.
pub fn sanitize_fields<I>(fields: I) -> serde_json::Map<String, serde_json::Value>
where
  I: IntoIterator<Item = (String, String)>,
{
  fields
    .into_iter()
    .map(|(name, value)| {
      (
        name,
        serde_json::Value::String(sanitize::sanitize_field(&value)),
      )
    })
    .collect()
}

/// Next cached CSRF token after a submission. A rotated token replaces the
/// cache, a rejected submission clears it (the issuer expires tokens, and a
/// stale one would wedge every later attempt), and an accepted submission
/// without rotation keeps the current token.
pub fn next_cached_token(
  accepted: bool,
  rotated: Option<String>,
  current: Option<String>,
) -> Option<String> {
  if !accepted {
    return None;
  }
  rotated.or(current)
}

#[cfg(target_arch = "wasm32")]
#[derive(Deserialize)]
struct TokenResponse {
  token: String,
}

#[cfg(target_arch = "wasm32")]
thread_local! {
  static CSRF_TOKEN: std::cell::RefCell<Option<String>> = const { std::cell::RefCell::new(None) };
}

/// Wire every form inside a freshly inserted contact/join modal.
#[cfg(target_arch = "wasm32")]
pub fn wire(modal: &web_sys::Element, key: ModalKey) {
  use wasm_bindgen::closure::Closure;
  use wasm_bindgen::JsCast;
  use web_sys::{Event, HtmlFormElement};

  let Ok(forms) = modal.query_selector_all("form") else {
    return;
  };
  for i in 0..forms.length() {
    let Some(form) = forms
      .get(i)
      .and_then(|n| n.dyn_into::<HtmlFormElement>().ok())
    else {
      continue;
    };

    let modal = modal.clone();
    let form_for_closure = form.clone();
    let on_submit = Closure::wrap(Box::new(move |event: Event| {
      event.prevent_default();
      handle_submit(&modal, &form_for_closure, key);
    }) as Box<dyn FnMut(Event)>);
    let _ = form.add_event_listener_with_callback("submit", on_submit.as_ref().unchecked_ref());
    on_submit.forget();
  }
}

#[cfg(target_arch = "wasm32")]
fn handle_submit(modal: &web_sys::Element, form: &web_sys::HtmlFormElement, key: ModalKey) {
  use wasm_bindgen::JsCast;

  let honeypot = modal
    .query_selector(&format!("#{}", honeypot_id(key)))
    .ok()
    .flatten()
    .and_then(|el| el.dyn_into::<web_sys::HtmlInputElement>().ok())
    .map(|el| el.value());
  if honeypot_tripped(honeypot.as_deref()) {
    crate::audit::warn("Honeypot filled. Blocking form submission.");
    crate::audit::audit(
      "form_blocked",
      serde_json::json!({ "form": key.as_str(), "reason": "honeypot" }),
    );
    // Clear whatever the bot typed.
    form.reset();
    return;
  }

  let fields = sanitize_fields(collect_fields(form));
  let form = form.clone();
  wasm_bindgen_futures::spawn_local(async move {
    match submit(key, fields).await {
      Ok(()) => {
        crate::audit::audit("form_submitted", serde_json::json!({ "form": key.as_str() }));
        form.reset();
        crate::registry::hide_active_modal();
      }
      Err(err) => {
        crate::audit::error(&format!("{} form submission failed: {}", key, err));
      }
    }
  });
}

/// Read every named control in the form. Values are raw here; the caller
/// sanitizes.
#[cfg(target_arch = "wasm32")]
fn collect_fields(form: &web_sys::HtmlFormElement) -> Vec<(String, String)> {
  use wasm_bindgen::JsCast;
  use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};

  let mut fields = Vec::new();
  let Ok(controls) = form.query_selector_all("input[name], select[name], textarea[name]") else {
    return fields;
  };
  for i in 0..controls.length() {
    let Some(node) = controls.get(i) else {
      continue;
    };
    if let Some(input) = node.dyn_ref::<HtmlInputElement>() {
      let ty = input.type_();
      if ty == "submit" || ty == "button" {
        continue;
      }
      if ty == "checkbox" && !input.checked() {
        continue;
      }
      fields.push((input.name(), input.value()));
    } else if let Some(select) = node.dyn_ref::<HtmlSelectElement>() {
      fields.push((select.name(), select.value()));
    } else if let Some(area) = node.dyn_ref::<HtmlTextAreaElement>() {
      fields.push((area.name(), area.value()));
    }
  }
  fields
}

#[cfg(target_arch = "wasm32")]
async fn submit(
  key: ModalKey,
  mut fields: serde_json::Map<String, serde_json::Value>,
) -> Result<(), String> {
  let token = csrf_token().await?;
  fields.insert("csrfToken".to_string(), serde_json::Value::String(token));

  let resp = gloo_net::http::Request::post(&form_endpoint(key))
    .json(&serde_json::Value::Object(fields))
    .map_err(|e| e.to_string())?
    .send()
    .await
    .map_err(|e| e.to_string())?;
  // The issuer rotates the token on acceptance and expires it otherwise;
  // a rejection drops the cache so the next attempt refetches.
  let accepted = resp.ok();
  let rotated = resp.headers().get("X-CSRF-Token");
  CSRF_TOKEN.with(|slot| {
    let current = slot.borrow_mut().take();
    *slot.borrow_mut() = next_cached_token(accepted, rotated, current);
  });
  if !accepted {
    return Err(format!("HTTP error: {}", resp.status()));
  }
  Ok(())
}

/// Fetch the CSRF token from the opaque session issuer, caching it for the
/// page session.
#[cfg(target_arch = "wasm32")]
async fn csrf_token() -> Result<String, String> {
  if let Some(token) = CSRF_TOKEN.with(|slot| slot.borrow().clone()) {
    return Ok(token);
  }
  let resp = gloo_net::http::Request::get(CSRF_ENDPOINT)
    .credentials(web_sys::RequestCredentials::SameOrigin)
    .send()
    .await
    .map_err(|e| e.to_string())?;
  if !resp.ok() {
    return Err(format!("HTTP error: {}", resp.status()));
  }
  let body: TokenResponse = resp.json().await.map_err(|e| e.to_string())?;
  CSRF_TOKEN.with(|slot| *slot.borrow_mut() = Some(body.token.clone()));
  Ok(body.token)
}
