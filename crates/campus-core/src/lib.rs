pub mod bootstrap;
pub mod components;
pub mod config;
pub mod datetime;
pub mod error;
pub mod form;
pub mod http;
pub mod intake;
pub mod notify;
pub mod store;

use std::rc::Rc;

pub use config::UiConfig;
pub use error::{
  ApiError,
  ConfigError,
  FileRejection
};
pub use http::Api;
pub use notify::Notifier;
pub use store::{
  Store,
  Subscription
};

/// Everything a component or page
/// behavior needs, handed over explicitly
/// instead of living in a page-wide
/// global.
pub struct Services<A, N: ?Sized> {
  pub api:      Rc<A>,
  pub notifier: Rc<N>,
  pub config:   Rc<UiConfig>
}

impl<A, N: ?Sized> Services<A, N> {
  pub fn new(
    api: A,
    notifier: Rc<N>,
    config: UiConfig
  ) -> Self {
    Self {
      api: Rc::new(api),
      notifier,
      config: Rc::new(config)
    }
  }
}

impl<A, N: ?Sized> Clone
  for Services<A, N>
{
  fn clone(&self) -> Self {
    Self {
      api:      Rc::clone(&self.api),
      notifier: Rc::clone(
        &self.notifier
      ),
      config:   Rc::clone(&self.config)
    }
  }
}

impl<A, N: ?Sized> PartialEq
  for Services<A, N>
{
  fn eq(&self, other: &Self) -> bool {
    Rc::ptr_eq(&self.api, &other.api)
      && Rc::ptr_eq(
        &self.notifier,
        &other.notifier
      )
      && Rc::ptr_eq(
        &self.config,
        &other.config
      )
  }
}
