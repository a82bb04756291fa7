use std::fmt;

use serde::{
  Deserialize,
  Serialize
};
use serde_json::{
  Map,
  Value
};

#[derive(
  Debug,
  Clone,
  Copy,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
  Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
  #[default]
  Info,
  Success,
  Warning,
  Error
}

impl Severity {
  pub fn as_key(
    self
  ) -> &'static str {
    match self {
      | Self::Info => "info",
      | Self::Success => "success",
      | Self::Warning => "warning",
      | Self::Error => "error"
    }
  }

  /// Unknown keys fall back to `Info`.
  pub fn from_key(
    raw: &str
  ) -> Self {
    match raw.trim() {
      | "success" => Self::Success,
      | "warning" => Self::Warning,
      | "error" => Self::Error,
      | _ => Self::Info
    }
  }
}

impl fmt::Display for Severity {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(self.as_key())
  }
}

/// A notification row as the server
/// reports it. Everything beyond `id` and
/// `is_read` is kept untouched in
/// `payload`.
#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
)]
pub struct ServerNotification {
  pub id:      i64,
  #[serde(default)]
  pub is_read: bool,
  #[serde(flatten)]
  pub payload: Map<String, Value>
}

impl ServerNotification {
  pub fn text_field(
    &self,
    key: &str
  ) -> Option<&str> {
    self
      .payload
      .get(key)
      .and_then(Value::as_str)
  }
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Default,
)]
pub struct RecentNotifications {
  #[serde(default)]
  pub notifications:
    Vec<ServerNotification>
}

#[derive(
  Debug,
  Clone,
  Copy,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
  Default,
)]
pub struct UnreadCount {
  #[serde(default)]
  pub count: u64
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Default,
)]
pub struct SearchResults {
  #[serde(default)]
  pub results: Vec<Value>
}

/// Opaque key/value stats rendered as-is.
pub type DashboardStats =
  Map<String, Value>;
