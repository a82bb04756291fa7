mod dashboard_stats;
mod file_uploader;
mod notification_center;
mod search_box;

use campus_core::Store;
use campus_core::bootstrap::{
  COMPONENT_ATTR,
  ComponentKind,
  flag_attr,
  split_list
};
use campus_core::config::{
  SearchConfig,
  UploadConfig
};
pub use dashboard_stats::{
  DashboardStats,
  DashboardStatsProps
};
pub use file_uploader::{
  FileUploader,
  FileUploaderProps
};
pub use notification_center::{
  NotificationCenter,
  NotificationCenterProps
};
pub use search_box::{
  SearchBox,
  SearchBoxProps
};
use serde_json::Value;
use web_sys::Element;
use yew::{
  Callback,
  hook,
  use_effect_with,
  use_state_eq
};

use crate::AppServices;

/// Mirrors a store into component state;
/// the component re-renders whenever the
/// store publishes a different value.
#[hook]
pub fn use_store<S>(store: &Store<S>) -> S
where
  S: Clone + PartialEq + 'static
{
  let state = use_state_eq(|| {
    store.snapshot()
  });

  {
    let state = state.clone();
    use_effect_with(
      store.clone(),
      move |store| {
        state.set(store.snapshot());
        let subscription =
          store.subscribe(move |next| {
            state.set(next.clone());
          });
        move || drop(subscription)
      }
    );
  }

  (*state).clone()
}

/// Mounts the widget named by the
/// element's `data-component`.
pub fn mount(
  host: &Element,
  services: &AppServices
) {
  let key = host
    .get_attribute(COMPONENT_ATTR)
    .unwrap_or_default();
  let Some(kind) =
    ComponentKind::from_key(&key)
  else {
    tracing::warn!(
      component = %key,
      "unknown component"
    );
    return;
  };
  let attr =
    |name: &str| host.get_attribute(name);
  let services = services.clone();

  tracing::info!(?kind, "mounting component");
  match kind {
    | ComponentKind::NotificationCenter => {
      yew::Renderer::<NotificationCenter>::with_root_and_props(
        host.clone(),
        NotificationCenterProps { services }
      )
      .render();
    }
    | ComponentKind::FileUpload => {
      let options = upload_options(
        attr,
        &services.config.upload
      );
      yew::Renderer::<FileUploader>::with_root_and_props(
        host.clone(),
        FileUploaderProps { services, options }
      )
      .render();
    }
    | ComponentKind::Search => {
      let options = search_options(
        attr,
        &services.config.search
      );
      let target = host.clone();
      yew::Renderer::<SearchBox>::with_root_and_props(
        host.clone(),
        SearchBoxProps {
          services,
          options,
          on_select: Callback::from(
            move |result: Value| {
              search_box::dispatch_selected(
                &target, &result
              );
            }
          )
        }
      )
      .render();
    }
    | ComponentKind::DashboardStats => {
      yew::Renderer::<DashboardStats>::with_root_and_props(
        host.clone(),
        DashboardStatsProps { services }
      )
      .render();
    }
  }
}

fn upload_options(
  attr: impl Fn(&str) -> Option<String>,
  base: &UploadConfig
) -> UploadConfig {
  UploadConfig {
    max_size:      attr("data-max-size")
      .and_then(|raw| {
        raw.trim().parse().ok()
      })
      .unwrap_or(base.max_size),
    allowed_types: attr(
      "data-allowed-types"
    )
    .map(|raw| split_list(&raw))
    .unwrap_or_else(|| {
      base.allowed_types.clone()
    }),
    multiple:      match attr(
      "data-multiple"
    ) {
      | Some(raw) => flag_attr(Some(&raw)),
      | None => base.multiple
    }
  }
}

fn search_options(
  attr: impl Fn(&str) -> Option<String>,
  base: &SearchConfig
) -> SearchConfig {
  SearchConfig {
    min_length:  attr("data-min-length")
      .and_then(|raw| {
        raw.trim().parse().ok()
      })
      .unwrap_or(base.min_length),
    debounce_ms: base.debounce_ms,
    url:         attr("data-search-url")
      .unwrap_or_else(|| base.url.clone())
  }
}

/// `pending_fees` -> `Pending fees`.
pub fn humanize_key(key: &str) -> String {
  let spaced = key.replace(['_', '-'], " ");
  let mut chars = spaced.trim().chars();
  match chars.next() {
    | Some(first) => first
      .to_uppercase()
      .chain(chars)
      .collect(),
    | None => String::new()
  }
}
