//! Fragment loader: same-origin fetch, response validation, parse.
//!
//! Fetches a modal's HTML fragment, refuses cross-origin redirects and
//! non-HTML payloads, runs the text through the sanitizer and parses it
//! into a detached `<template>` before handing the registry the root
//! element. The response-metadata checks are pure so they run on the host.

#[cfg(target_arch = "wasm32")]
use crate::descriptor::ModalDescriptor;
use crate::error::LoadError;

/// Reject responses whose final URL left the page origin (a same-origin
/// fetch that followed a redirect elsewhere). An empty final URL is
/// tolerated; some environments do not expose one.
pub fn validate_final_origin(page_origin: &str, final_url: &str) -> Result<(), LoadError> {
  if final_url.is_empty() || final_url.starts_with(page_origin) {
    Ok(())
  } else {
    Err(LoadError::OriginMismatch {
      page: page_origin.to_string(),
      response: final_url.to_string(),
    })
  }
}

/// Reject anything that declares itself non-HTML (a JSON error page, for
/// instance). A missing header is tolerated.
pub fn validate_content_type(content_type: Option<&str>) -> Result<(), LoadError> {
  match content_type {
    None => Ok(()),
    Some(ty) => {
      if ty.trim().to_ascii_lowercase().starts_with("text/html") {
        Ok(())
      } else {
        Err(LoadError::UnexpectedContentType(ty.to_string()))
      }
    }
  }
}

/// Fetch, validate, sanitize and parse the fragment for `desc`.
///
/// On success the returned element is detached; the caller owns insertion.
#[cfg(target_arch = "wasm32")]
pub async fn load(desc: &ModalDescriptor) -> Result<web_sys::Element, LoadError> {
  use gloo_net::http::Request;

  let resp = Request::get(desc.source_path)
    .credentials(web_sys::RequestCredentials::SameOrigin)
    .send()
    .await
    .map_err(|e| LoadError::Network(e.to_string()))?;

  let page_origin = page_origin().unwrap_or_default();
  validate_final_origin(&page_origin, &resp.url())?;
  validate_content_type(resp.headers().get("Content-Type").as_deref())?;

  let text = resp
    .text()
    .await
    .map_err(|e| LoadError::Network(e.to_string()))?;
  let cleaned = crate::sanitize::clean(&text);
  parse_fragment(&cleaned, desc)
}

/// Parse sanitized HTML into a detached fragment and pull out the modal
/// root. Contact/join roots are renamed to their cache id here; the chatbot
/// keeps its fixed id.
#[cfg(target_arch = "wasm32")]
pub fn parse_fragment(html: &str, desc: &ModalDescriptor) -> Result<web_sys::Element, LoadError> {
  use wasm_bindgen::JsCast;

  let missing = || LoadError::MissingRootElement {
    selector: desc.root_selector.to_string(),
  };

  let document = web_sys::window()
    .and_then(|w| w.document())
    .ok_or_else(missing)?;
  let template: web_sys::HtmlTemplateElement = document
    .create_element("template")
    .map_err(|_| missing())?
    .dyn_into()
    .map_err(|_| missing())?;
  template.set_inner_html(html.trim());

  let root = template
    .content()
    .query_selector(desc.root_selector)
    .ok()
    .flatten()
    .ok_or_else(missing)?;
  if desc.renames_root() {
    root.set_id(desc.dom_id);
  }
  Ok(root)
}

#[cfg(target_arch = "wasm32")]
fn page_origin() -> Option<String> {
  web_sys::window()?.location().origin().ok()
}
