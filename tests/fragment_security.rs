//! Security tests for the fragment pipeline.
//!
//! These verify that untrusted content is defanged before it can reach the
//! live document:
//! - script/handler/URI stripping in the sanitizer
//! - cross-origin redirect rejection in the loader
//! - content-type validation in the loader
//! - honeypot detection and field escaping in the form path

use pretty_assertions::assert_eq;

use ops_site::forms::{honeypot_tripped, sanitize_fields};
use ops_site::loader::{validate_content_type, validate_final_origin};
use ops_site::sanitize::{sanitize_field, strip_scripts};
use ops_site::LoadError;

// =============================================================================
// Sanitizer
// =============================================================================

#[test]
fn test_script_stripped_text_kept() {
  // The text survives; the executable part does not.
  let out = strip_scripts("<script>alert(1)</script><p>hi</p>");
  assert!(!out.to_lowercase().contains("<script"));
  assert!(out.contains("hi"));
}

#[test]
fn test_nested_and_repeated_script_blocks() {
  let out = strip_scripts("<p>a</p><script>x()</script><p>b</p><script>y()</script>");
  assert!(!out.contains("x()"));
  assert!(!out.contains("y()"));
  assert!(out.contains("<p>a</p>"));
  assert!(out.contains("<p>b</p>"));
}

#[test]
fn test_handler_attribute_variants() {
  for payload in [
    "<body onload=\"evil()\">",
    "<img src=x onerror=evil()>",
    "<div onmouseover='evil()'>hover</div>",
    // Slash-separated form: no whitespace anywhere in the tag.
    "<svg/onload=evil()>",
  ] {
    let out = strip_scripts(payload);
    assert!(
      !out.to_lowercase().contains("evil"),
      "handler survived: {}",
      out
    );
  }
}

#[test]
fn test_same_origin_is_not_trust() {
  // A fragment fetched from our own origin still goes through the full
  // strip; this is the exact shape a compromised fragment would take.
  let fragment = r#"<div class="modal-container"><script>fetch('/steal')</script><form></form></div>"#;
  let out = strip_scripts(fragment);
  assert!(!out.contains("steal"));
  assert!(out.contains("<form></form>"));
}

// =============================================================================
// Loader validation
// =============================================================================

#[test]
fn test_redirect_to_foreign_origin_rejected() {
  let err = validate_final_origin("https://ops.example", "https://cdn.attacker.example/fabs/contact.html");
  assert!(matches!(err, Err(LoadError::OriginMismatch { .. })));
}

#[test]
fn test_same_origin_subpath_accepted() {
  assert!(validate_final_origin("https://ops.example", "https://ops.example/fabs/join.html").is_ok());
}

#[test]
fn test_json_error_page_rejected() {
  // A session-expired JSON body must never be parsed as a modal.
  let err = validate_content_type(Some("application/json; charset=utf-8")).unwrap_err();
  assert!(matches!(err, LoadError::UnexpectedContentType(_)));
}

#[test]
fn test_html_with_parameters_accepted() {
  assert!(validate_content_type(Some("text/html; charset=utf-8")).is_ok());
}

// =============================================================================
// Form path
// =============================================================================

#[test]
fn test_honeypot_blocks_bots() {
  assert!(honeypot_tripped(Some("https://spam.example")));
  assert!(!honeypot_tripped(Some("")));
  assert!(!honeypot_tripped(None));
}

#[test]
fn test_submitted_fields_are_inert() {
  let fields = sanitize_fields(vec![
    (
      "name".to_string(),
      "Robert'); <script>drop()</script>".to_string(),
    ),
    ("email".to_string(), "a@b.example".to_string()),
  ]);
  let name = fields["name"].as_str().unwrap();
  assert!(!name.contains("<script>"));
  assert!(!name.contains("drop()"));
  assert_eq!(fields["email"], "a@b.example");
}

#[test]
fn test_field_sanitizer_is_total_on_junk() {
  for junk in ["", "<", ">", "<script", "javascript:", "\u{0}"] {
    let _ = sanitize_field(junk);
  }
}
