use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

use campus_core::Notifier;
use campus_core::config::ToastConfig;
use campus_core::notify::{
  Severity,
  TOAST_BASE_CLASS,
  TOAST_SHOW_CLASS,
  ToastId,
  ToastRegistry,
  ToastTimeline,
  toast_style
};
use chrono::Utc;
use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use wasm_bindgen::JsValue;
use web_sys::Element;

use crate::dom::{
  set_class,
  timer_delay
};

type Listeners =
  Rc<RefCell<BTreeMap<ToastId, EventListener>>>;

/// Renders toasts straight into
/// `document.body`.
pub struct DomNotifier {
  timing:    ToastConfig,
  registry:  Rc<RefCell<ToastRegistry>>,
  listeners: Listeners
}

impl DomNotifier {
  pub fn new(timing: ToastConfig) -> Self {
    Self {
      timing,
      registry: Rc::new(RefCell::new(
        ToastRegistry::new()
      )),
      listeners: Rc::new(RefCell::new(
        BTreeMap::new()
      ))
    }
  }
}

impl Notifier for DomNotifier {
  fn notify_with(
    &self,
    message: &str,
    severity: Severity,
    duration: Option<Duration>
  ) {
    let duration = duration
      .unwrap_or_else(|| {
        self.timing.duration()
      });
    let timeline = ToastTimeline::new(
      &self.timing,
      duration
    );
    let id =
      self.registry.borrow_mut().insert(
        message,
        severity,
        timeline,
        Utc::now()
      );

    let (toast, close) = match build_toast(
      id, message, severity
    ) {
      | Ok(parts) => parts,
      | Err(error) => {
        tracing::error!(
          ?error,
          "failed to build toast element"
        );
        self.registry.borrow_mut().remove(id);
        return;
      }
    };
    if let Err(error) = gloo::utils::body()
      .append_child(&toast)
    {
      tracing::error!(
        ?error,
        "failed to attach toast"
      );
      self.registry.borrow_mut().remove(id);
      return;
    }

    let on_close = {
      let registry =
        Rc::clone(&self.registry);
      let listeners =
        Rc::clone(&self.listeners);
      let toast = toast.clone();
      EventListener::new(
        &close,
        "click",
        move |_| {
          dismiss(
            &registry, &listeners, id, &toast
          );
        }
      )
    };
    self
      .listeners
      .borrow_mut()
      .insert(id, on_close);

    {
      let registry =
        Rc::clone(&self.registry);
      let toast = toast.clone();
      Timeout::new(
        timer_delay(timeline.show_at),
        move || {
          if registry.borrow_mut().show(id) {
            set_class(
              &toast,
              TOAST_SHOW_CLASS,
              true
            );
          }
        }
      )
      .forget();
    }

    {
      let registry =
        Rc::clone(&self.registry);
      let toast = toast.clone();
      Timeout::new(
        timer_delay(timeline.hide_at),
        move || {
          if registry
            .borrow_mut()
            .begin_hide(id)
          {
            set_class(
              &toast,
              TOAST_SHOW_CLASS,
              false
            );
          }
        }
      )
      .forget();
    }

    {
      let registry =
        Rc::clone(&self.registry);
      let listeners =
        Rc::clone(&self.listeners);
      Timeout::new(
        timer_delay(timeline.remove_at),
        move || {
          dismiss(
            &registry, &listeners, id, &toast
          );
        }
      )
      .forget();
    }
  }
}

/// Takes the toast off the page unless
/// something already did.
fn dismiss(
  registry: &RefCell<ToastRegistry>,
  listeners: &Listeners,
  id: ToastId,
  toast: &Element
) {
  if registry.borrow_mut().remove(id).is_none()
  {
    return;
  }
  toast.remove();

  // The close listener may be the caller;
  // release it after this tick.
  if let Some(listener) =
    listeners.borrow_mut().remove(&id)
  {
    Timeout::new(0, move || drop(listener))
      .forget();
  }
}

fn build_toast(
  id: ToastId,
  message: &str,
  severity: Severity
) -> Result<(Element, Element), JsValue> {
  let document = gloo::utils::document();
  let style = toast_style(severity);

  let toast = document.create_element("div")?;
  toast.set_id(&id.dom_id());
  toast.set_class_name(TOAST_BASE_CLASS);
  toast.class_list().add_1(style.border_class)?;

  let row = document.create_element("div")?;
  row.set_class_name("flex items-center");

  let icon = document.create_element("i")?;
  icon.set_class_name(&format!(
    "{} mr-2",
    style.icon_class
  ));

  let text =
    document.create_element("span")?;
  text.set_class_name("text-gray-800");
  text.set_text_content(Some(message));

  let close =
    document.create_element("button")?;
  close.set_class_name(
    "ml-auto text-gray-400 \
     hover:text-gray-600"
  );
  close.set_attribute("type", "button")?;
  close.set_attribute(
    "aria-label",
    "Dismiss"
  )?;
  let close_icon =
    document.create_element("i")?;
  close_icon.set_class_name("fas fa-times");
  close.append_child(&close_icon)?;

  row.append_child(&icon)?;
  row.append_child(&text)?;
  row.append_child(&close)?;
  toast.append_child(&row)?;

  Ok((toast, close))
}
