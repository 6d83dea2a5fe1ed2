//! Chatbot modal wiring and chat endpoint client.
//!
//! Once the chatbot fragment is inserted, this module owns its form: the
//! human-check checkbox gates the send button, a submitted message is
//! echoed to the log with a typing placeholder, and the reply from the
//! chat endpoint replaces the placeholder. The endpoint is an opaque
//! remote collaborator; transient failures get three attempts with
//! exponential backoff before the canned apology.

use serde::{Deserialize, Serialize};

/// `POST /api/chat` request body.
#[derive(Debug, Serialize)]
pub struct ChatRequest {
  pub message: String,
}

/// `POST /api/chat` response body.
#[derive(Debug, Deserialize)]
pub struct ChatReply {
  pub reply: Option<String>,
}

#[cfg(target_arch = "wasm32")]
const CHAT_ENDPOINT: &str = "/api/chat";

#[cfg(target_arch = "wasm32")]
const MAX_ATTEMPTS: u32 = 3;

#[cfg(target_arch = "wasm32")]
const EMPTY_REPLY_TEXT: &str = "No reply.";
#[cfg(target_arch = "wasm32")]
const UNREACHABLE_TEXT: &str = "Error: can't reach AI.";

/// Delay before retry `attempt` (0-based): 1s, 2s, 4s.
pub fn backoff_delay_ms(attempt: u32) -> u32 {
  1000u32 << attempt.min(4)
}

/// Rate limit on chatbot launches: one per five seconds.
#[derive(Debug)]
pub struct LaunchLimiter {
  min_interval_ms: f64,
  last: Option<f64>,
}

impl Default for LaunchLimiter {
  fn default() -> Self {
    Self {
      min_interval_ms: 5000.0,
      last: None,
    }
  }
}

impl LaunchLimiter {
  /// Record a launch attempt at `now` (milliseconds); `false` means the
  /// attempt is inside the cool-down and must be dropped.
  pub fn allow(&mut self, now: f64) -> bool {
    if let Some(last) = self.last {
      if now - last < self.min_interval_ms {
        return false;
      }
    }
    self.last = Some(now);
    true
  }
}

/// Wire the chat form inside a freshly inserted chatbot modal.
#[cfg(target_arch = "wasm32")]
pub fn wire(modal: &web_sys::Element) {
  use wasm_bindgen::closure::Closure;
  use wasm_bindgen::JsCast;
  use web_sys::{Event, HtmlButtonElement, HtmlInputElement};

  let input = modal
    .query_selector("#chatbot-input")
    .ok()
    .flatten()
    .and_then(|el| el.dyn_into::<HtmlInputElement>().ok());
  let send = modal
    .query_selector("#chatbot-send")
    .ok()
    .flatten()
    .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok());
  let guard = modal
    .query_selector("#human-check")
    .ok()
    .flatten()
    .and_then(|el| el.dyn_into::<HtmlInputElement>().ok());
  let log = modal.query_selector("#chat-log").ok().flatten();
  let form = modal.query_selector("#chatbot-input-row").ok().flatten();

  // The human check gates the send button until ticked.
  if let (Some(guard_el), Some(send_el)) = (guard.clone(), send.clone()) {
    send_el.set_disabled(!guard_el.checked());
    let send_for_change = send_el.clone();
    let guard_for_change = guard_el.clone();
    let on_change = Closure::wrap(Box::new(move |_event: Event| {
      send_for_change.set_disabled(!guard_for_change.checked());
    }) as Box<dyn FnMut(Event)>);
    let _ =
      guard_el.add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref());
    on_change.forget();
  }

  let (Some(form), Some(input), Some(log)) = (form, input, log) else {
    return;
  };

  let on_submit = Closure::wrap(Box::new(move |event: Event| {
    event.prevent_default();
    if let Some(guard) = &guard {
      if !guard.checked() {
        return;
      }
    }
    let message = input.value().trim().to_string();
    if message.is_empty() {
      return;
    }
    let message = crate::sanitize::sanitize_field(&message);

    append_message(&log, &message, "user");
    input.set_value("");
    if let Some(send) = &send {
      send.set_disabled(true);
    }
    let Some(placeholder) = append_message(&log, "…", "bot") else {
      return;
    };

    let send = send.clone();
    wasm_bindgen_futures::spawn_local(async move {
      let reply = send_message(&message).await;
      placeholder.set_text_content(Some(&reply));
      if let Some(send) = &send {
        send.set_disabled(false);
      }
      // The conversation turn is done; let the page come back.
      crate::registry::hide_active_modal();
    });
  }) as Box<dyn FnMut(Event)>);
  let _ = form.add_event_listener_with_callback("submit", on_submit.as_ref().unchecked_ref());
  on_submit.forget();
}

/// POST the message, retrying transient failures with backoff. Always
/// resolves to displayable text.
#[cfg(target_arch = "wasm32")]
async fn send_message(message: &str) -> String {
  for attempt in 0..MAX_ATTEMPTS {
    match post_message(message).await {
      Ok(reply) => {
        return reply
          .reply
          .filter(|r| !r.is_empty())
          .unwrap_or_else(|| EMPTY_REPLY_TEXT.to_string());
      }
      Err(_) if attempt + 1 < MAX_ATTEMPTS => {
        gloo_timers::future::TimeoutFuture::new(backoff_delay_ms(attempt)).await;
      }
      Err(err) => {
        crate::audit::error(&format!("Chat endpoint unreachable: {}", err));
      }
    }
  }
  UNREACHABLE_TEXT.to_string()
}

#[cfg(target_arch = "wasm32")]
async fn post_message(message: &str) -> Result<ChatReply, String> {
  let body = ChatRequest {
    message: message.to_string(),
  };
  let resp = gloo_net::http::Request::post(CHAT_ENDPOINT)
    .json(&body)
    .map_err(|e| e.to_string())?
    .send()
    .await
    .map_err(|e| e.to_string())?;
  if !resp.ok() {
    return Err(format!("HTTP error: {}", resp.status()));
  }
  resp.json().await.map_err(|e| e.to_string())
}

/// Append one message bubble to the chat log and keep it scrolled to the
/// bottom. Text content only; chat text never becomes markup.
#[cfg(target_arch = "wasm32")]
fn append_message(log: &web_sys::Element, text: &str, sender: &str) -> Option<web_sys::Element> {
  let document = web_sys::window()?.document()?;
  let bubble = document.create_element("div").ok()?;
  bubble.set_class_name(&format!("chat-msg {}", sender));
  bubble.set_text_content(Some(text));
  log.append_child(&bubble).ok()?;
  log.set_scroll_top(log.scroll_height());
  Some(bubble)
}
