use std::rc::Rc;

use campus_shared::{
  RecentNotifications,
  ServerNotification,
  UnreadCount
};
use serde_json::json;
use tracing::{
  debug,
  error
};

use crate::config::EndpointConfig;
use crate::http::{
  Api,
  mark_read_url
};
use crate::store::Store;

#[derive(
  Debug, Clone, PartialEq, Default,
)]
pub struct NotificationCenterState {
  pub notifications:
    Vec<ServerNotification>,
  pub unread_count:  u64,
  pub loading:       bool
}

pub struct NotificationCenter<A> {
  api:       Rc<A>,
  endpoints: EndpointConfig,
  store:     Store<NotificationCenterState>
}

impl<A: Api> NotificationCenter<A> {
  pub fn new(
    api: Rc<A>,
    endpoints: EndpointConfig
  ) -> Self {
    Self {
      api,
      endpoints,
      store: Store::new(
        NotificationCenterState::default()
      )
    }
  }

  pub fn store(
    &self
  ) -> &Store<NotificationCenterState> {
    &self.store
  }

  /// Loads the list, then the count.
  pub async fn activate(&self) {
    self.load_notifications().await;
    self.update_unread_count().await;
  }

  #[tracing::instrument(skip(self))]
  pub async fn load_notifications(&self) {
    self.store.update(|state| {
      state.loading = true;
    });

    let url =
      &self.endpoints.recent_notifications;
    match self
      .api
      .get_as::<RecentNotifications>(url)
      .await
    {
      | Ok(recent) => {
        debug!(
          count = recent.notifications.len(),
          "loaded notifications"
        );
        self.store.update(|state| {
          state.notifications =
            recent.notifications;
          state.loading = false;
        });
      }
      | Err(err) => {
        error!(
          error = %err,
          "failed to load notifications"
        );
        self.store.update(|state| {
          state.loading = false;
        });
      }
    }
  }

  #[tracing::instrument(skip(self))]
  pub async fn update_unread_count(
    &self
  ) {
    let url = &self.endpoints.unread_count;
    match self
      .api
      .get_as::<UnreadCount>(url)
      .await
    {
      | Ok(unread) => {
        self.store.update(|state| {
          state.unread_count = unread.count;
        });
      }
      | Err(err) => {
        error!(
          error = %err,
          "failed to update unread count"
        );
      }
    }
  }

  /// Local state changes only after the
  /// server acknowledged the request, so a
  /// failure needs no rollback.
  #[tracing::instrument(skip(self))]
  pub async fn mark_as_read(
    &self,
    notification_id: i64
  ) {
    let url = mark_read_url(
      &self.endpoints.mark_read,
      notification_id
    );
    if let Err(err) =
      self.api.post(&url, &json!({})).await
    {
      error!(
        error = %err,
        notification_id,
        "failed to mark notification as \
         read"
      );
      return;
    }

    self.store.update(|state| {
      let Some(item) = state
        .notifications
        .iter_mut()
        .find(|n| n.id == notification_id)
      else {
        debug!(
          notification_id,
          "acknowledged id not in local \
           list"
        );
        return;
      };
      // Even if already read locally.
      item.is_read = true;
      state.unread_count =
        state.unread_count.saturating_sub(1);
    });
  }
}
