use std::collections::BTreeMap;
use std::time::Duration;

pub use campus_shared::Severity;
use chrono::{
  DateTime,
  Utc
};

use crate::config::ToastConfig;

/// Anything that can put a toast in front
/// of the user.
pub trait Notifier {
  /// `duration` of `None` means the
  /// notifier's configured default.
  fn notify_with(
    &self,
    message: &str,
    severity: Severity,
    duration: Option<Duration>
  );

  fn notify(
    &self,
    message: &str,
    severity: Severity
  ) {
    self.notify_with(
      message, severity, None
    );
  }
}

pub const TOAST_BASE_CLASS: &str = "fixed top-20 right-4 z-50 bg-white \
                                    border-l-4 p-4 shadow-lg rounded-r-lg \
                                    max-w-sm toast";
pub const TOAST_SHOW_CLASS: &str =
  "show";

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct ToastStyle {
  pub border_class: &'static str,
  pub icon_class:   &'static str
}

#[must_use]
pub fn toast_style(
  severity: Severity
) -> ToastStyle {
  match severity {
    | Severity::Success => ToastStyle {
      border_class: "border-green-500",
      icon_class:   "fas fa-check-circle \
                     text-green-500"
    },
    | Severity::Error => ToastStyle {
      border_class: "border-red-500",
      icon_class:   "fas \
                     fa-exclamation-circle \
                     text-red-500"
    },
    | Severity::Warning => ToastStyle {
      border_class: "border-yellow-500",
      icon_class:   "fas \
                     fa-exclamation-triangle \
                     text-yellow-500"
    },
    | Severity::Info => ToastStyle {
      border_class: "border-blue-500",
      icon_class:   "fas fa-info-circle \
                     text-blue-500"
    }
  }
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum ToastPhase {
  Entering,
  Visible,
  Leaving,
  Removed
}

/// Offsets from insertion at which a toast
/// changes phase.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct ToastTimeline {
  pub show_at:   Duration,
  pub hide_at:   Duration,
  pub remove_at: Duration
}

impl ToastTimeline {
  pub fn new(
    timing: &ToastConfig,
    duration: Duration
  ) -> Self {
    Self {
      show_at: timing.show_delay(),
      hide_at: duration,
      remove_at: duration
        .saturating_add(timing.exit())
    }
  }

  pub fn phase_at(
    &self,
    elapsed: Duration
  ) -> ToastPhase {
    if elapsed >= self.remove_at {
      ToastPhase::Removed
    } else if elapsed >= self.hide_at {
      ToastPhase::Leaving
    } else if elapsed >= self.show_at {
      ToastPhase::Visible
    } else {
      ToastPhase::Entering
    }
  }
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
)]
pub struct ToastId(u64);

impl ToastId {
  pub fn dom_id(&self) -> String {
    format!("toast-{}", self.0)
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
  pub id:         ToastId,
  pub message:    String,
  pub severity:   Severity,
  pub created_at: DateTime<Utc>,
  pub timeline:   ToastTimeline,
  pub phase:      ToastPhase
}

/// Live toasts. Every transition reports
/// whether it applied, so a toast that the
/// close button already removed is not
/// removed again by its timer.
#[derive(Debug, Default)]
pub struct ToastRegistry {
  live:    BTreeMap<ToastId, Toast>,
  next_id: u64
}

impl ToastRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert(
    &mut self,
    message: &str,
    severity: Severity,
    timeline: ToastTimeline,
    created_at: DateTime<Utc>
  ) -> ToastId {
    self.next_id += 1;
    let id = ToastId(self.next_id);
    self.live.insert(id, Toast {
      id,
      message: message.to_string(),
      severity,
      created_at,
      timeline,
      phase: ToastPhase::Entering
    });
    tracing::debug!(
      toast = id.0,
      %severity,
      "toast inserted"
    );
    id
  }

  pub fn get(
    &self,
    id: ToastId
  ) -> Option<&Toast> {
    self.live.get(&id)
  }

  pub fn show(
    &mut self,
    id: ToastId
  ) -> bool {
    self.advance(
      id,
      ToastPhase::Entering,
      ToastPhase::Visible
    )
  }

  /// Starts the exit animation. Works from
  /// `Entering` too, for durations shorter
  /// than the show delay.
  pub fn begin_hide(
    &mut self,
    id: ToastId
  ) -> bool {
    match self.live.get_mut(&id) {
      | Some(toast)
        if toast.phase
          != ToastPhase::Leaving =>
      {
        toast.phase = ToastPhase::Leaving;
        true
      }
      | _ => false
    }
  }

  pub fn remove(
    &mut self,
    id: ToastId
  ) -> Option<Toast> {
    let mut toast =
      self.live.remove(&id)?;
    toast.phase = ToastPhase::Removed;
    tracing::debug!(
      toast = id.0,
      "toast removed"
    );
    Some(toast)
  }

  pub fn len(&self) -> usize {
    self.live.len()
  }

  pub fn is_empty(&self) -> bool {
    self.live.is_empty()
  }

  fn advance(
    &mut self,
    id: ToastId,
    from: ToastPhase,
    to: ToastPhase
  ) -> bool {
    match self.live.get_mut(&id) {
      | Some(toast)
        if toast.phase == from =>
      {
        toast.phase = to;
        true
      }
      | _ => false
    }
  }
}
