use std::rc::Rc;

use campus_core::components::StatsPanel;
use serde_json::Value;
use yew::{
  Callback,
  Html,
  MouseEvent,
  Properties,
  function_component,
  html,
  use_effect_with,
  use_memo
};

use super::{
  humanize_key,
  use_store
};
use crate::AppServices;

#[derive(Properties, PartialEq)]
pub struct DashboardStatsProps {
  pub services: AppServices
}

#[function_component(DashboardStats)]
pub fn dashboard_stats(
  props: &DashboardStatsProps
) -> Html {
  let panel = use_memo(
    props.services.clone(),
    |services| {
      StatsPanel::new(
        Rc::clone(&services.api),
        services
          .config
          .endpoints
          .dashboard_stats
          .clone()
      )
    }
  );
  let state = use_store(panel.store());

  {
    let panel = Rc::clone(&panel);
    use_effect_with(
      props.services.clone(),
      move |_| {
        wasm_bindgen_futures::spawn_local(
          async move {
            panel.activate().await;
          }
        );
        || ()
      }
    );
  }

  let onclick = {
    let panel = Rc::clone(&panel);
    let notifier =
      Rc::clone(&props.services.notifier);
    Callback::from(move |_: MouseEvent| {
      let panel = Rc::clone(&panel);
      let notifier = Rc::clone(&notifier);
      wasm_bindgen_futures::spawn_local(
        async move {
          panel
            .refresh(notifier.as_ref())
            .await;
        }
      );
    })
  };

  html! {
      <div class="dashboard-stats">
          <div class="stats-toolbar">
              <button
                  type="button"
                  class="stats-refresh"
                  disabled={state.loading}
                  {onclick}
              >
                  <i class={if state.loading { "fas fa-sync fa-spin" } else { "fas fa-sync" }}></i>
                  { " Refresh" }
              </button>
          </div>
          <div class="stats-grid">
              {
                  for state.stats.iter().map(|(key, value)| html! {
                      <div key={key.clone()} class="stat-card">
                          <div class="stat-label">{ humanize_key(key) }</div>
                          <div class="stat-value">{ stat_text(value) }</div>
                      </div>
                  })
              }
          </div>
      </div>
  }
}

fn stat_text(value: &Value) -> String {
  match value {
    | Value::String(text) => text.clone(),
    | Value::Null => "—".to_string(),
    | other => other.to_string()
  }
}
