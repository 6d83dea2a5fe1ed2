//! Static modal descriptor table.
//!
//! The site grew several near-identical modal loaders that each recomputed
//! `fabs/${key}.html` and `${key}-modal` inline. This table resolves the
//! key → DOM id → fragment path → selectors mapping exactly once.

/// The fixed set of lazily loaded modals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModalKey {
  Contact,
  Join,
  Chatbot,
}

impl ModalKey {
  pub const ALL: [ModalKey; 3] = [ModalKey::Contact, ModalKey::Join, ModalKey::Chatbot];

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Contact => "contact",
      Self::Join => "join",
      Self::Chatbot => "chatbot",
    }
  }

  pub fn parse(s: &str) -> Option<Self> {
    match s {
      "contact" => Some(Self::Contact),
      "join" => Some(Self::Join),
      "chatbot" => Some(Self::Chatbot),
      _ => None,
    }
  }
}

impl std::fmt::Display for ModalKey {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Static mapping from a logical modal key to its DOM identity and source.
#[derive(Debug)]
pub struct ModalDescriptor {
  pub key: ModalKey,
  /// Id the live modal element carries once inserted (cache lookup key).
  pub dom_id: &'static str,
  /// Same-origin path the fragment is fetched from.
  pub source_path: &'static str,
  /// Selector locating the modal root inside the parsed fragment.
  pub root_selector: &'static str,
  /// Preferred focus target inside the modal; `None` means "first
  /// focusable descendant".
  pub focus_selector: Option<&'static str>,
}

impl ModalDescriptor {
  /// Contact and join fragments ship a generic `.modal-container` root that
  /// is renamed to the cache id on insertion. The chatbot fragment already
  /// carries its fixed id and must keep it.
  pub fn renames_root(&self) -> bool {
    self.key != ModalKey::Chatbot
  }
}

pub static DESCRIPTORS: [ModalDescriptor; 3] = [
  ModalDescriptor {
    key: ModalKey::Contact,
    dom_id: "contact-modal",
    source_path: "fabs/contact.html",
    root_selector: ".modal-container",
    focus_selector: None,
  },
  ModalDescriptor {
    key: ModalKey::Join,
    dom_id: "join-modal",
    source_path: "fabs/join.html",
    root_selector: ".modal-container",
    focus_selector: None,
  },
  ModalDescriptor {
    key: ModalKey::Chatbot,
    dom_id: "chatbot-container",
    source_path: "fabs/chatbot.html",
    root_selector: "#chatbot-container",
    focus_selector: Some("#chatbot-input"),
  },
];

/// Resolve the descriptor for a key.
pub fn descriptor(key: ModalKey) -> &'static ModalDescriptor {
  match key {
    ModalKey::Contact => &DESCRIPTORS[0],
    ModalKey::Join => &DESCRIPTORS[1],
    ModalKey::Chatbot => &DESCRIPTORS[2],
  }
}
