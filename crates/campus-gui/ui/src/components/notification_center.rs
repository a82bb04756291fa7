use std::rc::Rc;

use campus_core::components as model;
use campus_core::UiConfig;
use campus_core::datetime::{
  format_date,
  parse_timestamp,
  time_ago
};
use campus_shared::ServerNotification;
use chrono::Utc;
use yew::{
  Callback,
  Html,
  Properties,
  function_component,
  html,
  use_effect_with,
  use_memo
};

use super::use_store;
use crate::AppServices;

#[derive(Properties, PartialEq)]
pub struct NotificationCenterProps {
  pub services: AppServices
}

#[function_component(NotificationCenter)]
pub fn notification_center(
  props: &NotificationCenterProps
) -> Html {
  let center = use_memo(
    props.services.clone(),
    |services| {
      model::NotificationCenter::new(
        Rc::clone(&services.api),
        services.config.endpoints.clone()
      )
    }
  );
  let state = use_store(center.store());

  {
    let center = Rc::clone(&center);
    use_effect_with(
      props.services.clone(),
      move |_| {
        wasm_bindgen_futures::spawn_local(
          async move {
            center.activate().await;
          }
        );
        || ()
      }
    );
  }

  let on_read = {
    let center = Rc::clone(&center);
    Callback::from(move |id: i64| {
      let center = Rc::clone(&center);
      wasm_bindgen_futures::spawn_local(
        async move {
          center.mark_as_read(id).await;
        }
      );
    })
  };

  html! {
      <div class="notification-center">
          <button class="notification-bell" type="button">
              <i class="fas fa-bell"></i>
              {
                  if state.unread_count > 0 {
                      html! { <span class="badge">{ state.unread_count.to_string() }</span> }
                  } else {
                      html! {}
                  }
              }
          </button>
          <div class="notification-list">
              {
                  if state.loading {
                      html! { <div class="notification-empty">{ "Loading..." }</div> }
                  } else if state.notifications.is_empty() {
                      html! { <div class="notification-empty">{ "No notifications" }</div> }
                  } else {
                      html! {
                          <>
                              { for state.notifications.iter().map(|item| {
                                  notification_row(item, &on_read, &props.services.config)
                              }) }
                          </>
                      }
                  }
              }
          </div>
      </div>
  }
}

fn notification_row(
  item: &ServerNotification,
  on_read: &Callback<i64>,
  config: &UiConfig
) -> Html {
  let id = item.id;
  let class = if item.is_read {
    "notification-item read"
  } else {
    "notification-item unread"
  };
  let onclick = {
    let on_read = on_read.clone();
    let unread = !item.is_read;
    Callback::from(move |_: yew::MouseEvent| {
      if unread {
        on_read.emit(id);
      }
    })
  };
  let created = item
    .text_field("created_at")
    .and_then(parse_timestamp);
  let when = created
    .map(|then| time_ago(then, Utc::now()))
    .unwrap_or_default();
  let date = created
    .map(|then| {
      format_date(
        then,
        &config.display.date_pattern,
        &config.display_timezone()
      )
    })
    .unwrap_or_default();

  html! {
      <div key={id.to_string()} class={class} {onclick}>
          <div class="notification-title">
              { item.text_field("title").unwrap_or_default() }
          </div>
          <div class="notification-message">
              { item.text_field("message").unwrap_or_default() }
          </div>
          {
              if when.is_empty() {
                  html! {}
              } else {
                  html! { <div class="notification-time" title={date}>{ when }</div> }
              }
          }
      </div>
  }
}
