//! Declarative page behaviors: which
//! markup attributes trigger what, and a
//! registry that runs the handlers once
//! over the elements present at startup.

use std::time::Duration;

use tracing::{
  debug,
  info
};

use crate::config::PageConfig;

pub const CONFIRM_ATTR: &str =
  "data-confirm";
pub const AUTO_REFRESH_ATTR: &str =
  "data-auto-refresh";
pub const REFRESH_URL_ATTR: &str =
  "data-refresh-url";
pub const COMPONENT_ATTR: &str =
  "data-component";

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
)]
pub enum Behavior {
  AlertAutoHide,
  FormValidation,
  ConfirmAction,
  AutoRefresh,
  MountComponent
}

impl Behavior {
  pub fn selector(
    self
  ) -> &'static str {
    match self {
      | Self::AlertAutoHide => ".alert",
      | Self::FormValidation => {
        "form[data-validate]"
      }
      | Self::ConfirmAction => {
        "[data-confirm]"
      }
      | Self::AutoRefresh => {
        "[data-auto-refresh]"
      }
      | Self::MountComponent => {
        "[data-component]"
      }
    }
  }
}

type Handler<E, C> = Box<dyn Fn(&E, &C)>;

/// Handlers keyed by behavior. `run`
/// queries each selector once and hands
/// every match to its handler.
pub struct BehaviorRegistry<E, C> {
  handlers: Vec<(Behavior, Handler<E, C>)>
}

impl<E, C> Default
  for BehaviorRegistry<E, C>
{
  fn default() -> Self {
    Self { handlers: vec![] }
  }
}

impl<E, C> BehaviorRegistry<E, C> {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn register(
    &mut self,
    behavior: Behavior,
    handler: impl Fn(&E, &C) + 'static
  ) -> &mut Self {
    self.handlers.retain(|(existing, _)| {
      *existing != behavior
    });
    self
      .handlers
      .push((behavior, Box::new(handler)));
    self
  }

  pub fn behaviors(
    &self
  ) -> Vec<Behavior> {
    let mut out: Vec<Behavior> = self
      .handlers
      .iter()
      .map(|(behavior, _)| *behavior)
      .collect();
    out.sort();
    out
  }

  /// Returns how many elements were wired.
  pub fn run<Q>(
    &self,
    mut query: Q,
    ctx: &C
  ) -> usize
  where
    Q: FnMut(&str) -> Vec<E>
  {
    let mut wired = 0;
    for (behavior, handler) in
      &self.handlers
    {
      let elements =
        query(behavior.selector());
      debug!(
        ?behavior,
        matches = elements.len(),
        "wiring page behavior"
      );
      for element in &elements {
        handler(element, ctx);
      }
      wired += elements.len();
    }
    info!(wired, "page behaviors wired");
    wired
  }
}

#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub struct AutoRefreshSpec {
  pub url:      String,
  pub interval: Duration
}

impl AutoRefreshSpec {
  /// `None` when the element names no
  /// URL to poll.
  pub fn from_attrs(
    interval: Option<&str>,
    url: Option<&str>,
    page: &PageConfig
  ) -> Option<Self> {
    let url = url
      .map(str::trim)
      .filter(|url| !url.is_empty())?;
    let millis = interval
      .and_then(leading_integer)
      .filter(|ms| *ms > 0)
      .unwrap_or(u64::from(
        page.refresh_interval_ms
      ));

    Some(Self {
      url:      url.to_string(),
      interval: Duration::from_millis(
        millis
      )
    })
  }
}

/// Leading decimal digits after optional
/// whitespace, so `"15000ms"` reads as
/// 15000. Negative values are rejected.
fn leading_integer(raw: &str) -> Option<u64> {
  let trimmed = raw.trim_start();
  let digits = trimmed
    .strip_prefix('+')
    .unwrap_or(trimmed);
  let end = digits
    .find(|ch: char| !ch.is_ascii_digit())
    .unwrap_or(digits.len());
  digits[..end].parse().ok()
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum ComponentKind {
  NotificationCenter,
  FileUpload,
  Search,
  DashboardStats
}

impl ComponentKind {
  pub fn from_key(
    raw: &str
  ) -> Option<Self> {
    match raw.trim() {
      | "notification-center" => {
        Some(Self::NotificationCenter)
      }
      | "file-upload" => {
        Some(Self::FileUpload)
      }
      | "search" => Some(Self::Search),
      | "dashboard-stats" => {
        Some(Self::DashboardStats)
      }
      | _ => None
    }
  }
}

/// Reads a comma separated attribute such
/// as `data-allowed-types`.
pub fn split_list(raw: &str) -> Vec<String> {
  raw
    .split(',')
    .map(str::trim)
    .filter(|item| !item.is_empty())
    .map(str::to_string)
    .collect()
}

/// HTML boolean attribute semantics:
/// present means true unless spelled
/// `"false"`.
pub fn flag_attr(raw: Option<&str>) -> bool {
  match raw {
    | None => false,
    | Some(value) => {
      !value.trim().eq_ignore_ascii_case(
        "false"
      )
    }
  }
}

#[cfg(test)]
mod tests {
  use std::cell::RefCell;
  use std::collections::BTreeMap;

  use super::*;

  #[test]
  fn refresh_interval_follows_leading_digits()
   {
    let page = PageConfig::default();
    let spec = |interval: Option<&str>| {
      AutoRefreshSpec::from_attrs(
        interval,
        Some("/staff-panel/queue/"),
        &page
      )
      .expect("has url")
      .interval
    };

    assert_eq!(
      spec(Some("15000")),
      Duration::from_millis(15_000)
    );
    assert_eq!(
      spec(Some(" 2500ms")),
      Duration::from_millis(2_500)
    );
    assert_eq!(
      spec(Some("soon")),
      Duration::from_secs(30)
    );
    assert_eq!(
      spec(Some("0")),
      Duration::from_secs(30)
    );
    assert_eq!(
      spec(Some("-5")),
      Duration::from_secs(30)
    );
    assert_eq!(
      spec(None),
      Duration::from_secs(30)
    );
  }

  #[test]
  fn refresh_without_url_is_skipped() {
    let page = PageConfig::default();
    assert!(
      AutoRefreshSpec::from_attrs(
        Some("1000"),
        None,
        &page
      )
      .is_none()
    );
    assert!(
      AutoRefreshSpec::from_attrs(
        Some("1000"),
        Some("  "),
        &page
      )
      .is_none()
    );
  }

  #[test]
  fn registry_runs_each_handler_over_its_matches()
   {
    let page: BTreeMap<&str, Vec<&str>> =
      BTreeMap::from([
        (".alert", vec!["a1", "a2"]),
        ("[data-confirm]", vec!["delete"]),
      ]);
    let log = RefCell::new(Vec::new());

    let mut registry =
      BehaviorRegistry::<&str, RefCell<Vec<String>>>::new();
    registry
      .register(
        Behavior::AlertAutoHide,
        |el, log| {
          log
            .borrow_mut()
            .push(format!("hide:{el}"));
        }
      )
      .register(
        Behavior::ConfirmAction,
        |el, log| {
          log
            .borrow_mut()
            .push(format!("confirm:{el}"));
        }
      )
      .register(
        Behavior::AutoRefresh,
        |el, log| {
          log
            .borrow_mut()
            .push(format!("poll:{el}"));
        }
      );

    let wired = registry.run(
      |selector| {
        page
          .get(selector)
          .cloned()
          .unwrap_or_default()
      },
      &log
    );

    assert_eq!(wired, 3);
    assert_eq!(
      *log.borrow(),
      vec![
        "hide:a1".to_string(),
        "hide:a2".to_string(),
        "confirm:delete".to_string()
      ]
    );
  }

  #[test]
  fn registering_twice_replaces_handler() {
    let mut registry =
      BehaviorRegistry::<(), ()>::new();
    registry
      .register(
        Behavior::AutoRefresh,
        |_, _| {}
      )
      .register(
        Behavior::AutoRefresh,
        |_, _| {}
      );
    assert_eq!(
      registry.behaviors(),
      vec![Behavior::AutoRefresh]
    );
  }

  #[test]
  fn component_keys_and_option_attrs() {
    assert_eq!(
      ComponentKind::from_key(
        "notification-center"
      ),
      Some(
        ComponentKind::NotificationCenter
      )
    );
    assert_eq!(
      ComponentKind::from_key("carousel"),
      None
    );
    assert_eq!(
      split_list(
        "image/png, image/jpeg,,"
      ),
      vec![
        "image/png".to_string(),
        "image/jpeg".to_string()
      ]
    );
    assert!(flag_attr(Some("")));
    assert!(!flag_attr(Some("false")));
    assert!(!flag_attr(None));
  }
}
