use std::time::Duration;

use chrono_tz::Tz;
use serde::Deserialize;
use tracing::{
  debug,
  warn
};

use crate::datetime::parse_timezone;
use crate::error::ConfigError;

pub const BUILTIN_CONFIG: &str =
  include_str!("../assets/campus.toml");

#[derive(
  Debug,
  Clone,
  PartialEq,
  Deserialize,
  Default,
)]
#[serde(default)]
pub struct UiConfig {
  pub endpoints: EndpointConfig,
  pub toast:     ToastConfig,
  pub upload:    UploadConfig,
  pub search:    SearchConfig,
  pub page:      PageConfig,
  pub display:   DisplayConfig
}

#[derive(
  Debug, Clone, PartialEq, Deserialize,
)]
#[serde(default)]
pub struct EndpointConfig {
  pub recent_notifications: String,
  pub unread_count:         String,
  /// Path template; `{id}` is replaced
  /// by the notification id.
  pub mark_read:            String,
  pub dashboard_stats:      String
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Deserialize,
)]
#[serde(default)]
pub struct ToastConfig {
  pub duration_ms:   u32,
  pub show_delay_ms: u32,
  pub exit_ms:       u32
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Deserialize,
)]
#[serde(default)]
pub struct UploadConfig {
  pub max_size:      u64,
  pub allowed_types: Vec<String>,
  pub multiple:      bool
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Deserialize,
)]
#[serde(default)]
pub struct SearchConfig {
  pub min_length:  usize,
  pub debounce_ms: u32,
  pub url:         String
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Deserialize,
)]
#[serde(default)]
pub struct PageConfig {
  pub alert_hide_ms:       u32,
  pub alert_fade_ms:       u32,
  pub refresh_interval_ms: u32
}

#[derive(
  Debug, Clone, PartialEq, Deserialize,
)]
#[serde(default)]
pub struct DisplayConfig {
  pub timezone:     String,
  pub date_pattern: String
}

impl Default for EndpointConfig {
  fn default() -> Self {
    Self {
      recent_notifications:
        "/notifications/ajax/recent-notifications/"
          .to_string(),
      unread_count:
        "/notifications/ajax/unread-count/"
          .to_string(),
      mark_read:
        "/notifications/{id}/mark-read/"
          .to_string(),
      dashboard_stats:
        "/staff-panel/ajax/dashboard-stats/"
          .to_string()
    }
  }
}

impl Default for ToastConfig {
  fn default() -> Self {
    Self {
      duration_ms:   5_000,
      show_delay_ms: 100,
      exit_ms:       300
    }
  }
}

impl Default for UploadConfig {
  fn default() -> Self {
    Self {
      max_size:      5 * 1024 * 1024,
      allowed_types: vec![],
      multiple:      false
    }
  }
}

impl Default for SearchConfig {
  fn default() -> Self {
    Self {
      min_length:  2,
      debounce_ms: 300,
      url:         String::new()
    }
  }
}

impl Default for PageConfig {
  fn default() -> Self {
    Self {
      alert_hide_ms:       5_000,
      alert_fade_ms:       300,
      refresh_interval_ms: 30_000
    }
  }
}

impl Default for DisplayConfig {
  fn default() -> Self {
    Self {
      timezone:     "UTC".to_string(),
      date_pattern: "YYYY-MM-DD"
        .to_string()
    }
  }
}

impl UiConfig {
  /// Parses the built-in document and
  /// layers `overrides` on top of it key
  /// by key.
  #[tracing::instrument(skip(overrides))]
  pub fn load(
    overrides: Option<&str>
  ) -> Result<Self, ConfigError> {
    let mut base = toml::from_str::<
      toml::Table
    >(BUILTIN_CONFIG)?;

    if let Some(raw) = overrides {
      let layer = toml::from_str::<
        toml::Table
      >(raw)?;
      debug!(
        sections = layer.len(),
        "applying config overrides"
      );
      merge_tables(&mut base, layer)?;
    }

    Ok(
      toml::Value::Table(base)
        .try_into::<Self>()?
    )
  }

  /// Same as [`UiConfig::load`], but a
  /// broken override is logged and the
  /// built-in defaults win.
  pub fn load_or_default(
    overrides: Option<&str>
  ) -> Self {
    match Self::load(overrides) {
      | Ok(config) => config,
      | Err(error) => {
        warn!(
          %error,
          "ignoring config overrides"
        );
        Self::load(None)
          .unwrap_or_default()
      }
    }
  }

  pub fn display_timezone(&self) -> Tz {
    parse_timezone(
      &self.display.timezone,
      "display.timezone"
    )
    .unwrap_or(chrono_tz::UTC)
  }
}

impl ToastConfig {
  pub fn duration(&self) -> Duration {
    Duration::from_millis(u64::from(
      self.duration_ms
    ))
  }

  pub fn show_delay(&self) -> Duration {
    Duration::from_millis(u64::from(
      self.show_delay_ms
    ))
  }

  pub fn exit(&self) -> Duration {
    Duration::from_millis(u64::from(
      self.exit_ms
    ))
  }
}

impl SearchConfig {
  pub fn debounce(&self) -> Duration {
    Duration::from_millis(u64::from(
      self.debounce_ms
    ))
  }
}

fn merge_tables(
  base: &mut toml::Table,
  layer: toml::Table
) -> Result<(), ConfigError> {
  for (key, value) in layer {
    match (base.get_mut(&key), value) {
      | (
        Some(toml::Value::Table(
          existing
        )),
        toml::Value::Table(incoming)
      ) => {
        merge_tables(existing, incoming)?;
      }
      | (
        Some(toml::Value::Table(_)),
        _
      ) => {
        return Err(
          ConfigError::NotATable(key)
        );
      }
      | (_, value) => {
        base.insert(key, value);
      }
    }
  }
  Ok(())
}
