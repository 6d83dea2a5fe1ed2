//! Error taxonomy for the modal fragment loader.
//!
//! Every way a fragment load can go wrong collapses into one enum. Callers
//! treat all variants identically (log, abort the open, leave the page in
//! its pre-click state), but the variants keep diagnostics precise.

/// Failure modes of `loader::load`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
  /// The fetch itself rejected (network down, DNS, abort).
  Network(String),
  /// The response's final URL is not same-origin (cross-origin redirect).
  OriginMismatch { page: String, response: String },
  /// The response carried a Content-Type that is not HTML.
  UnexpectedContentType(String),
  /// The sanitized fragment parsed, but the expected root was not in it.
  MissingRootElement { selector: String },
}

impl std::fmt::Display for LoadError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Network(cause) => write!(f, "Fragment fetch failed: {}", cause),
      Self::OriginMismatch { page, response } => {
        write!(
          f,
          "Cross-origin fetch blocked: page origin {} but response from {}",
          page, response
        )
      }
      Self::UnexpectedContentType(ty) => {
        write!(f, "Unexpected content type: {}", ty)
      }
      Self::MissingRootElement { selector } => {
        write!(f, "Fragment has no element matching {}", selector)
      }
    }
  }
}

impl std::error::Error for LoadError {}
