use std::rc::Rc;

use campus_core::components::{
  self as model,
  SearchStep
};
use campus_core::config::SearchConfig;
use gloo::timers::callback::Timeout;
use serde::Serialize;
use serde_json::Value;
use web_sys::{
  CustomEvent,
  CustomEventInit,
  Element,
  HtmlInputElement
};
use yew::{
  Callback,
  Html,
  InputEvent,
  MouseEvent,
  Properties,
  TargetCast,
  function_component,
  html,
  use_memo,
  use_mut_ref
};

use super::use_store;
use crate::AppServices;
use crate::dom::timer_delay_ms;

/// Bubbles from the mount element when a
/// result is picked; `detail` holds the
/// result.
pub const RESULT_SELECTED_EVENT: &str =
  "result-selected";

#[derive(Properties, PartialEq)]
pub struct SearchBoxProps {
  pub services:  AppServices,
  pub options:   SearchConfig,
  pub on_select: Callback<Value>
}

#[function_component(SearchBox)]
pub fn search_box(
  props: &SearchBoxProps
) -> Html {
  let search = use_memo(
    (
      props.services.clone(),
      props.options.clone()
    ),
    |(services, options)| {
      model::SearchBox::new(
        Rc::clone(&services.api),
        options.clone()
      )
    }
  );
  let state = use_store(search.store());
  let pending =
    use_mut_ref(|| None::<Timeout>);
  let debounce_ms =
    timer_delay_ms(props.options.debounce_ms);

  let oninput = {
    let search = Rc::clone(&search);
    let pending = pending.clone();
    Callback::from(move |event: InputEvent| {
      let input: HtmlInputElement =
        event.target_unchecked_into();
      // Replacing the timer drops, and so
      // cancels, the one still waiting.
      let next = match search.input(input.value())
      {
        | SearchStep::Cleared => None,
        | SearchStep::Scheduled(ticket) => {
          let search = Rc::clone(&search);
          Some(Timeout::new(
            debounce_ms,
            move || {
              wasm_bindgen_futures::spawn_local(
                async move {
                  search.run(ticket).await;
                }
              );
            }
          ))
        }
      };
      *pending.borrow_mut() = next;
    })
  };

  let on_pick = {
    let search = Rc::clone(&search);
    let pending = pending.clone();
    let on_select = props.on_select.clone();
    Callback::from(move |index: usize| {
      pending.borrow_mut().take();
      if let Some(result) =
        search.select(index)
      {
        on_select.emit(result);
      }
    })
  };

  html! {
      <div class="search-box">
          <input
              type="search"
              class="search-input"
              placeholder="Search..."
              value={state.query.clone()}
              {oninput}
          />
          {
              if state.loading {
                  html! { <i class="fas fa-spinner fa-spin search-spinner"></i> }
              } else {
                  html! {}
              }
          }
          {
              if state.results.is_empty() {
                  html! {}
              } else {
                  html! {
                      <ul class="search-results">
                          { for state.results.iter().enumerate().map(|(index, result)| {
                              result_row(index, result, &on_pick)
                          }) }
                      </ul>
                  }
              }
          }
      </div>
  }
}

fn result_row(
  index: usize,
  result: &Value,
  on_pick: &Callback<usize>
) -> Html {
  let onclick = {
    let on_pick = on_pick.clone();
    Callback::from(move |_: MouseEvent| {
      on_pick.emit(index)
    })
  };

  html! {
      <li class="search-result" {onclick}>
          { result_label(result) }
      </li>
  }
}

/// Display text for one result: a `title`
/// or `name` field, else the raw value.
fn result_label(result: &Value) -> String {
  ["title", "name", "label"]
    .iter()
    .find_map(|key| {
      result.get(*key).and_then(Value::as_str)
    })
    .map(str::to_string)
    .unwrap_or_else(|| match result {
      | Value::String(text) => text.clone(),
      | other => other.to_string()
    })
}

/// Announces a picked result to the page.
pub fn dispatch_selected(
  target: &Element,
  result: &Value
) {
  let detail = match result.serialize(
    &serde_wasm_bindgen::Serializer::json_compatible()
  ) {
    | Ok(detail) => detail,
    | Err(error) => {
      tracing::error!(
        error = %error,
        "failed to convert search result"
      );
      return;
    }
  };

  let init = CustomEventInit::new();
  init.set_bubbles(true);
  init.set_detail(&detail);

  match CustomEvent::new_with_event_init_dict(
    RESULT_SELECTED_EVENT,
    &init
  ) {
    | Ok(event) => {
      if let Err(error) =
        target.dispatch_event(&event)
      {
        tracing::error!(
          ?error,
          "failed to dispatch selection"
        );
      }
    }
    | Err(error) => {
      tracing::error!(
        ?error,
        "failed to build selection event"
      );
    }
  }
}
