//! HTML and form-field sanitization.
//!
//! Two levels:
//! - `clean` scrubs fetched HTML fragments before they touch the DOM. When
//!   the page ships DOMPurify, that does the work; otherwise a conservative
//!   regex strip removes script blocks, inline handlers and `javascript:`
//!   URIs. The fallback is deliberately lossy; dropped content is never
//!   executed.
//! - `sanitize_field` scrubs user-entered text (form fields, chat input)
//!   and additionally escapes angle brackets so the value is inert when
//!   echoed back into markup.
//!
//! Both are total functions; sanitization cannot fail.

use once_cell::sync::Lazy;
use regex::Regex;

static SCRIPT_BLOCK: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"(?is)<script[^>]*>.*?</script>").unwrap());

// Unclosed or stray script tags left over after block removal.
static SCRIPT_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)</?script[^>]*>").unwrap());

// HTML allows `/` as an attribute separator, so `<svg/onload=...>` is as
// live as the whitespace form.
static EVENT_HANDLER_ATTR: Lazy<Regex> =
  Lazy::new(|| Regex::new(r#"(?i)[\s/]on\w+\s*=\s*("[^"]*"|'[^']*'|[^\s>]+)"#).unwrap());

static JS_URI: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)javascript\s*:").unwrap());

/// Sanitize an HTML fragment for insertion into the live document.
pub fn clean(raw: &str) -> String {
  #[cfg(target_arch = "wasm32")]
  if let Some(purified) = dompurify(raw) {
    return purified;
  }
  strip_scripts(raw)
}

/// Regex fallback: remove every script-injection vector we know how to
/// match. Same-origin fragments go through this too; origin is not trust.
pub fn strip_scripts(raw: &str) -> String {
  let out = SCRIPT_BLOCK.replace_all(raw, "");
  let out = SCRIPT_TAG.replace_all(&out, "");
  let out = EVENT_HANDLER_ATTR.replace_all(&out, "");
  JS_URI.replace_all(&out, "").into_owned()
}

/// Sanitize a user-entered field value before it is serialized or echoed.
pub fn sanitize_field(value: &str) -> String {
  let stripped = strip_scripts(value);
  stripped.replace('<', "&lt;").replace('>', "&gt;")
}

/// Use the page's DOMPurify global when one is loaded.
#[cfg(target_arch = "wasm32")]
fn dompurify(raw: &str) -> Option<String> {
  use wasm_bindgen::{JsCast, JsValue};

  let window = web_sys::window()?;
  let purifier = js_sys::Reflect::get(&window, &JsValue::from_str("DOMPurify")).ok()?;
  if purifier.is_undefined() || purifier.is_null() {
    return None;
  }
  let sanitize = js_sys::Reflect::get(&purifier, &JsValue::from_str("sanitize")).ok()?;
  let sanitize = sanitize.dyn_into::<js_sys::Function>().ok()?;
  sanitize
    .call1(&purifier, &JsValue::from_str(raw))
    .ok()?
    .as_string()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_script_block_removed_text_kept() {
    let out = strip_scripts("<script>alert(1)</script><p>hi</p>");
    assert!(!out.to_lowercase().contains("<script"));
    assert!(!out.contains("alert(1)"));
    assert!(out.contains("hi"));
  }

  #[test]
  fn test_script_block_case_and_attributes() {
    let out = strip_scripts("<SCRIPT type=\"text/javascript\">steal()</SCRIPT><div>ok</div>");
    assert!(!out.to_lowercase().contains("script"));
    assert!(out.contains("<div>ok</div>"));
  }

  #[test]
  fn test_unclosed_script_tag_removed() {
    let out = strip_scripts("<script src=\"https://evil.example/x.js\">");
    assert!(!out.to_lowercase().contains("<script"));
  }

  #[test]
  fn test_inline_event_handlers_removed() {
    let out = strip_scripts("<img src=\"x.png\" onerror=\"alert(1)\" alt=\"x\">");
    assert!(!out.to_lowercase().contains("onerror"));
    assert!(out.contains("x.png"));

    let out = strip_scripts("<div onclick='doEvil()'>click</div>");
    assert!(!out.to_lowercase().contains("onclick"));
    assert!(out.contains("click"));
  }

  #[test]
  fn test_slash_separated_handler_removed() {
    let out = strip_scripts("<svg/onload=alert(1)>");
    assert!(!out.to_lowercase().contains("onload"));

    let out = strip_scripts("<img/src=x/onerror=evil()>");
    assert!(!out.to_lowercase().contains("onerror"));
    assert!(out.contains("src=x"));
  }

  #[test]
  fn test_javascript_uri_removed() {
    let out = strip_scripts("<a href=\"javascript:alert(1)\">go</a>");
    assert!(!out.to_lowercase().contains("javascript:"));
    assert!(out.contains("go"));
  }

  #[test]
  fn test_plain_markup_untouched() {
    let fragment = "<div class=\"modal-container\"><h2>Contact</h2><input name=\"email\"></div>";
    assert_eq!(strip_scripts(fragment), fragment);
  }

  #[test]
  fn test_field_escaping() {
    let out = sanitize_field("<b>name</b>");
    assert_eq!(out, "&lt;b&gt;name&lt;/b&gt;");

    let out = sanitize_field("<script>alert(1)</script>bob");
    assert!(!out.contains("alert"));
    assert!(out.contains("bob"));
  }

  #[test]
  fn test_sanitization_is_total() {
    // Degenerate inputs must never panic.
    for input in ["", "<", "<script", "javascript:", "onload=", "<<>>"] {
      let _ = strip_scripts(input);
      let _ = sanitize_field(input);
    }
  }
}
