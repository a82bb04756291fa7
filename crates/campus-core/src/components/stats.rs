use std::rc::Rc;

use campus_shared::{
  DashboardStats,
  Severity
};
use tracing::{
  debug,
  error
};

use crate::http::Api;
use crate::notify::Notifier;
use crate::store::Store;

pub const STATS_REFRESHED_MESSAGE: &str =
  "Stats refreshed";

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStatsState {
  pub stats:   DashboardStats,
  pub loading: bool
}

impl Default for DashboardStatsState {
  fn default() -> Self {
    Self {
      stats:   DashboardStats::new(),
      loading: true
    }
  }
}

pub struct StatsPanel<A> {
  api:   Rc<A>,
  url:   String,
  store: Store<DashboardStatsState>
}

impl<A: Api> StatsPanel<A> {
  pub fn new(
    api: Rc<A>,
    url: impl Into<String>
  ) -> Self {
    Self {
      api,
      url: url.into(),
      store: Store::new(
        DashboardStatsState::default()
      )
    }
  }

  pub fn store(
    &self
  ) -> &Store<DashboardStatsState> {
    &self.store
  }

  pub async fn activate(&self) {
    self.load_stats().await;
  }

  /// Replaces the stats wholesale. On
  /// failure the previous stats stay.
  #[tracing::instrument(skip(self))]
  pub async fn load_stats(&self) -> bool {
    self.store.update(|state| {
      state.loading = true;
    });

    let outcome = self
      .api
      .get_as::<DashboardStats>(&self.url)
      .await;

    self.store.update(|state| {
      state.loading = false;
      match outcome {
        | Ok(stats) => {
          state.stats = stats;
          true
        }
        | Err(err) => {
          error!(
            error = %err,
            "failed to load dashboard stats"
          );
          false
        }
      }
    })
  }

  /// Reloads, then confirms with a success
  /// toast. A failed load is only logged.
  pub async fn refresh<N>(
    &self,
    notifier: &N
  ) where
    N: Notifier + ?Sized
  {
    let loaded = self.load_stats().await;
    debug!(loaded, "stats refresh finished");
    notifier.notify(
      STATS_REFRESHED_MESSAGE,
      Severity::Success
    );
  }
}
