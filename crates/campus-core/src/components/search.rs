use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use campus_shared::SearchResults;
use serde_json::Value;
use tracing::{
  debug,
  error
};

use crate::config::SearchConfig;
use crate::http::{
  Api,
  search_url
};
use crate::store::Store;

#[derive(
  Debug, Clone, PartialEq, Default,
)]
pub struct SearchState {
  pub query:   String,
  pub results: Vec<Value>,
  pub loading: bool
}

/// Identifies one scheduled query. Only
/// the newest ticket may reach the server
/// or touch the results.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct SearchTicket(u64);

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum SearchStep {
  /// Query too short: results were
  /// cleared, nothing to schedule.
  Cleared,
  /// Arm the debounce timer and call
  /// [`SearchBox::run`] with this ticket
  /// when it fires.
  Scheduled(SearchTicket)
}

pub struct SearchBox<A> {
  api:        Rc<A>,
  options:    SearchConfig,
  store:      Store<SearchState>,
  generation: Cell<u64>
}

impl<A: Api> SearchBox<A> {
  pub fn new(
    api: Rc<A>,
    options: SearchConfig
  ) -> Self {
    Self {
      api,
      options,
      store: Store::new(
        SearchState::default()
      ),
      generation: Cell::new(0)
    }
  }

  pub fn store(&self) -> &Store<SearchState> {
    &self.store
  }

  pub fn debounce(&self) -> Duration {
    self.options.debounce()
  }

  /// Records a keystroke. Every call
  /// invalidates whatever was scheduled
  /// before it.
  pub fn input(
    &self,
    query: impl Into<String>
  ) -> SearchStep {
    let query = query.into();
    let ticket = self.bump();
    let too_short = query.chars().count()
      < self.options.min_length;

    self.store.update(|state| {
      state.query = query;
      if too_short {
        state.results.clear();
        state.loading = false;
      }
    });

    if too_short {
      SearchStep::Cleared
    } else {
      SearchStep::Scheduled(ticket)
    }
  }

  /// Runs the query for `ticket` if it is
  /// still the newest. A response that
  /// arrives after a newer keystroke is
  /// dropped. Returns whether a request
  /// was sent.
  pub async fn run(
    &self,
    ticket: SearchTicket
  ) -> bool {
    if !self.is_current(ticket) {
      debug!(
        ?ticket,
        "skipping superseded search"
      );
      return false;
    }

    let query = self.store.update(|state| {
      state.loading = true;
      state.query.clone()
    });
    let url =
      search_url(&self.options.url, &query);

    let outcome = self
      .api
      .get_as::<SearchResults>(&url)
      .await;

    if !self.is_current(ticket) {
      debug!(
        query = %query,
        "discarding stale search response"
      );
      return true;
    }

    self.store.update(|state| {
      match outcome {
        | Ok(found) => {
          debug!(
            query = %query,
            results = found.results.len(),
            "search finished"
          );
          state.results = found.results;
        }
        | Err(err) => {
          error!(
            query = %query,
            error = %err,
            "search failed"
          );
          state.results.clear();
        }
      }
      state.loading = false;
    });
    true
  }

  /// Hands the picked result back and
  /// resets the box. Any pending query is
  /// cancelled.
  pub fn select(
    &self,
    index: usize
  ) -> Option<Value> {
    self.bump();
    self.store.update(|state| {
      let picked =
        state.results.get(index).cloned();
      state.query.clear();
      state.results.clear();
      state.loading = false;
      picked
    })
  }

  fn bump(&self) -> SearchTicket {
    let next = self.generation.get() + 1;
    self.generation.set(next);
    SearchTicket(next)
  }

  fn is_current(
    &self,
    ticket: SearchTicket
  ) -> bool {
    ticket.0 == self.generation.get()
  }
}
