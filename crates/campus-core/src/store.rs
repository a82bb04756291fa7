use std::cell::{
  Cell,
  RefCell
};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{
  Rc,
  Weak
};

type Listener<S> = Rc<dyn Fn(&S)>;

struct Inner<S> {
  state:     RefCell<S>,
  listeners: RefCell<BTreeMap<u64, Listener<S>>>,
  next_id:   Cell<u64>
}

/// Observable state holder. Mutations go
/// through [`Store::update`], after which
/// every subscriber sees a snapshot of the
/// new state.
pub struct Store<S> {
  inner: Rc<Inner<S>>
}

impl<S: Clone + 'static> Store<S> {
  pub fn new(initial: S) -> Self {
    Self {
      inner: Rc::new(Inner {
        state:     RefCell::new(initial),
        listeners: RefCell::new(
          BTreeMap::new()
        ),
        next_id:   Cell::new(0)
      })
    }
  }

  pub fn snapshot(&self) -> S {
    self.inner.state.borrow().clone()
  }

  pub fn read<R>(
    &self,
    f: impl FnOnce(&S) -> R
  ) -> R {
    f(&self.inner.state.borrow())
  }

  pub fn update<R>(
    &self,
    f: impl FnOnce(&mut S) -> R
  ) -> R {
    let out = {
      let mut state =
        self.inner.state.borrow_mut();
      f(&mut state)
    };
    self.publish();
    out
  }

  pub fn subscribe(
    &self,
    listener: impl Fn(&S) + 'static
  ) -> Subscription {
    let id = self.inner.next_id.get();
    self.inner.next_id.set(id + 1);
    self
      .inner
      .listeners
      .borrow_mut()
      .insert(id, Rc::new(listener));

    let weak: Weak<Inner<S>> =
      Rc::downgrade(&self.inner);
    Subscription {
      cancel: Some(Box::new(move || {
        if let Some(inner) = weak.upgrade()
        {
          inner
            .listeners
            .borrow_mut()
            .remove(&id);
        }
      }))
    }
  }

  pub fn subscriber_count(
    &self
  ) -> usize {
    self.inner.listeners.borrow().len()
  }

  // Listeners get a snapshot so they may
  // call `update` themselves.
  fn publish(&self) {
    let listeners: Vec<Listener<S>> = self
      .inner
      .listeners
      .borrow()
      .values()
      .cloned()
      .collect();
    if listeners.is_empty() {
      return;
    }

    let snapshot = self.snapshot();
    for listener in listeners {
      listener(&snapshot);
    }
  }
}

impl<S> Clone for Store<S> {
  fn clone(&self) -> Self {
    Self {
      inner: Rc::clone(&self.inner)
    }
  }
}

impl<S> PartialEq for Store<S> {
  fn eq(&self, other: &Self) -> bool {
    Rc::ptr_eq(&self.inner, &other.inner)
  }
}

impl<S: fmt::Debug> fmt::Debug
  for Store<S>
{
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.debug_struct("Store")
      .field(
        "state",
        &*self.inner.state.borrow()
      )
      .finish()
  }
}

/// Keeps a listener registered; dropping
/// it unsubscribes.
pub struct Subscription {
  cancel: Option<Box<dyn FnOnce()>>
}

impl Drop for Subscription {
  fn drop(&mut self) {
    if let Some(cancel) = self.cancel.take()
    {
      cancel();
    }
  }
}
