//! Client-side audit logging.
//!
//! Structured `{ event, details, timestamp }` records go to the browser
//! console always, and to the audit endpoint as a fire-and-forget POST when
//! the page is served over HTTPS. Delivery failures are swallowed; auditing
//! must never affect the UI.

use serde::Serialize;

#[cfg(target_arch = "wasm32")]
const AUDIT_ENDPOINT: &str = "/api/audit";

/// One audit record.
#[derive(Clone, Debug, Serialize)]
pub struct AuditEvent {
  pub event: String,
  pub details: serde_json::Value,
  pub timestamp: String,
}

impl AuditEvent {
  pub fn new(event: &str, details: serde_json::Value, timestamp: String) -> Self {
    Self {
      event: event.to_string(),
      details,
      timestamp,
    }
  }
}

/// Record an audit event.
#[cfg(target_arch = "wasm32")]
pub fn audit(event: &str, details: serde_json::Value) {
  use wasm_bindgen::JsValue;

  let timestamp: String = js_sys::Date::new_0().to_iso_string().into();
  let record = AuditEvent::new(event, details, timestamp);
  let payload = serde_json::to_string(&record).unwrap_or_default();
  web_sys::console::log_2(&JsValue::from_str("audit"), &JsValue::from_str(&payload));

  if page_is_https() {
    wasm_bindgen_futures::spawn_local(async move {
      let req = match gloo_net::http::Request::post(AUDIT_ENDPOINT)
        .header("Content-Type", "application/json")
        .body(payload)
      {
        Ok(req) => req,
        Err(_) => return,
      };
      let _ = req.send().await;
    });
  }
}

/// Console warning helper for degraded-mode paths.
#[cfg(target_arch = "wasm32")]
pub fn warn(message: &str) {
  web_sys::console::warn_1(&wasm_bindgen::JsValue::from_str(message));
}

/// Console error helper for aborted operations.
#[cfg(target_arch = "wasm32")]
pub fn error(message: &str) {
  web_sys::console::error_1(&wasm_bindgen::JsValue::from_str(message));
}

#[cfg(target_arch = "wasm32")]
fn page_is_https() -> bool {
  web_sys::window()
    .and_then(|w| w.location().protocol().ok())
    .map(|p| p == "https:")
    .unwrap_or(false)
}
