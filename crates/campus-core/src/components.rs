//! Browser-independent state machines
//! behind the page widgets. Each owns a
//! [`Store`](crate::Store) the view layer
//! subscribes to.

pub mod notification_center;
pub mod search;
pub mod stats;
pub mod uploader;

pub use notification_center::{
  NotificationCenter,
  NotificationCenterState
};
pub use search::{
  SearchBox,
  SearchState,
  SearchStep,
  SearchTicket
};
pub use stats::{
  DashboardStatsState,
  StatsPanel
};
pub use uploader::{
  StagedFile,
  Uploader,
  UploaderState
};
