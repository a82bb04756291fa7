use std::time::Duration;

use web_sys::Element;

/// Browsers fire any delay above
/// `i32::MAX` ms immediately.
pub const MAX_TIMER_DELAY_MS: u32 =
  i32::MAX as u32;

pub fn timer_delay(duration: Duration) -> u32 {
  u32::try_from(duration.as_millis())
    .unwrap_or(MAX_TIMER_DELAY_MS)
    .min(MAX_TIMER_DELAY_MS)
}

pub fn timer_delay_ms(millis: u32) -> u32 {
  millis.min(MAX_TIMER_DELAY_MS)
}

/// Adds or removes `class`, logging a
/// rejected token instead of failing.
pub fn set_class(
  element: &Element,
  class: &str,
  on: bool
) {
  if let Err(error) = element
    .class_list()
    .toggle_with_force(class, on)
  {
    tracing::warn!(
      ?error,
      class,
      "failed to update class list"
    );
  }
}
