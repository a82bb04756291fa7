use std::cell::RefCell;
use std::rc::Rc;

use campus_core::Notifier;
use campus_core::bootstrap::{
  AUTO_REFRESH_ATTR,
  AutoRefreshSpec,
  Behavior,
  BehaviorRegistry,
  CONFIRM_ATTR,
  REFRESH_URL_ATTR
};
use campus_core::form::FORM_INVALID_MESSAGE;
use campus_core::http::Api;
use campus_core::notify::Severity;
use gloo::events::{
  EventListener,
  EventListenerOptions
};
use gloo::timers::callback::{
  Interval,
  Timeout
};
use wasm_bindgen::JsCast;
use web_sys::{
  Element,
  HtmlElement,
  HtmlFormElement
};

use crate::AppServices;
use crate::components;
use crate::dom::{
  timer_delay,
  timer_delay_ms
};

pub fn registry()
-> BehaviorRegistry<Element, AppServices> {
  let mut registry = BehaviorRegistry::new();
  registry
    .register(
      Behavior::AlertAutoHide,
      auto_hide_alert
    )
    .register(
      Behavior::FormValidation,
      validate_on_submit
    )
    .register(
      Behavior::ConfirmAction,
      confirm_on_click
    )
    .register(
      Behavior::AutoRefresh,
      poll_refresh
    )
    .register(
      Behavior::MountComponent,
      components::mount
    );
  registry
}

/// Wires every behavior over the elements
/// currently in the document.
pub fn run(services: &AppServices) -> usize {
  registry().run(query_all, services)
}

fn query_all(
  selector: &str
) -> Vec<Element> {
  let Ok(nodes) = gloo::utils::document()
    .query_selector_all(selector)
  else {
    tracing::warn!(
      selector,
      "invalid behavior selector"
    );
    return vec![];
  };

  (0..nodes.length())
    .filter_map(|idx| nodes.get(idx))
    .filter_map(|node| {
      node.dyn_into::<Element>().ok()
    })
    .collect()
}

fn auto_hide_alert(
  alert: &Element,
  services: &AppServices
) {
  let page = services.config.page;
  let alert = alert.clone();
  let fade = move || {
    if let Some(html) =
      alert.dyn_ref::<HtmlElement>()
      && let Err(error) = html
        .style()
        .set_property("opacity", "0")
    {
      tracing::warn!(
        ?error,
        "failed to fade alert"
      );
    }
    Timeout::new(
      timer_delay_ms(page.alert_fade_ms),
      move || alert.remove()
    )
    .forget();
  };
  Timeout::new(
    timer_delay_ms(page.alert_hide_ms),
    fade
  )
  .forget();
}

fn validate_on_submit(
  form: &Element,
  services: &AppServices
) {
  let Some(form) = form
    .dyn_ref::<HtmlFormElement>()
    .cloned()
  else {
    return;
  };
  let notifier =
    Rc::clone(&services.notifier);

  EventListener::new_with_options(
    &form.clone(),
    "submit",
    EventListenerOptions::enable_prevent_default(),
    move |event| {
      if crate::form::validate(&form) {
        let fields =
          crate::form::serialize(&form);
        tracing::debug!(
          fields = ?fields.keys().collect::<Vec<_>>(),
          "submitting validated form"
        );
        return;
      }
      event.prevent_default();
      notifier.notify(
        FORM_INVALID_MESSAGE,
        Severity::Error
      );
    }
  )
  .forget();
}

fn confirm_on_click(
  element: &Element,
  _services: &AppServices
) {
  let target = element.clone();
  EventListener::new_with_options(
    element,
    "click",
    EventListenerOptions::enable_prevent_default(),
    move |event| {
      let message = target
        .get_attribute(CONFIRM_ATTR)
        .unwrap_or_default();
      if !gloo::dialogs::confirm(&message) {
        event.prevent_default();
      }
    }
  )
  .forget();
}

/// Polls until the element leaves the
/// document, then cancels its interval.
fn poll_refresh(
  element: &Element,
  services: &AppServices
) {
  let Some(spec) =
    AutoRefreshSpec::from_attrs(
      element
        .get_attribute(AUTO_REFRESH_ATTR)
        .as_deref(),
      element
        .get_attribute(REFRESH_URL_ATTR)
        .as_deref(),
      &services.config.page
    )
  else {
    tracing::debug!(
      "auto-refresh element has no url"
    );
    return;
  };

  let period = timer_delay(spec.interval);
  let slot: Rc<RefCell<Option<Interval>>> =
    Rc::new(RefCell::new(None));

  let interval = {
    let slot = Rc::clone(&slot);
    let element = element.clone();
    let api = Rc::clone(&services.api);
    let url = spec.url.clone();
    Interval::new(period, move || {
      if !element.is_connected() {
        if let Some(interval) =
          slot.borrow_mut().take()
        {
          tracing::info!(
            url = %url,
            "element detached; polling stopped"
          );
          Timeout::new(0, move || {
            drop(interval)
          })
          .forget();
        }
        return;
      }

      let element = element.clone();
      let api = Rc::clone(&api);
      let url = url.clone();
      wasm_bindgen_futures::spawn_local(
        async move {
          match api.get_text(&url).await {
            | Ok(html) => {
              element.set_inner_html(&html);
            }
            | Err(err) => {
              tracing::error!(
                url = %url,
                error = %err,
                "auto-refresh failed"
              );
            }
          }
        }
      );
    })
  };

  tracing::debug!(
    url = %spec.url,
    period,
    "auto-refresh armed"
  );
  *slot.borrow_mut() = Some(interval);
}
