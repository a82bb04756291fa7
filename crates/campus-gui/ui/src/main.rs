mod api;
mod bootstrap;
mod components;
mod dom;
mod dropzone;
mod form;
mod notifier;

use std::rc::Rc;

use anyhow::Context;
use campus_core::{
  Services,
  UiConfig
};
use gloo::events::EventListener;

use crate::api::HttpClient;
use crate::notifier::DomNotifier;

pub type AppServices =
  Services<HttpClient, DomNotifier>;

/// Optional page-supplied TOML layered
/// over the built-in defaults.
const CONFIG_SCRIPT_ID: &str =
  "campus-config";

fn main() {
  console_error_panic_hook::set_once();
  wasm_tracing::set_as_global_default();

  tracing::info!(
    "starting campus page runtime"
  );

  if let Err(err) = start() {
    tracing::error!(
      error = %err,
      "page runtime failed to start"
    );
  }
}

fn start() -> anyhow::Result<()> {
  let document = web_sys::window()
    .and_then(|window| window.document())
    .context("no document to attach to")?;

  let overrides = document
    .get_element_by_id(CONFIG_SCRIPT_ID)
    .and_then(|script| script.text_content());
  let config = UiConfig::load_or_default(
    overrides.as_deref()
  );
  tracing::debug!(
    timezone = %config.display_timezone(),
    "config loaded"
  );

  let notifier =
    Rc::new(DomNotifier::new(config.toast));
  let services = Services::new(
    HttpClient,
    notifier,
    config
  );

  if still_loading(&document.ready_state()) {
    EventListener::once(
      &document,
      "DOMContentLoaded",
      move |_| {
        bootstrap::run(&services);
      }
    )
    .forget();
  } else {
    bootstrap::run(&services);
  }

  Ok(())
}

/// `document.readyState` before
/// `DOMContentLoaded` has fired.
fn still_loading(ready_state: &str) -> bool {
  ready_state == "loading"
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn only_loading_state_defers_wiring() {
    assert!(still_loading("loading"));
    assert!(!still_loading("interactive"));
    assert!(!still_loading("complete"));
  }
}
