//! Typed publish/subscribe channel.
//!
//! An [`EventBus`] is an explicit value handed to both the publisher (the
//! click dispatcher) and the subscribers (the PDF viewer). Cloning a bus
//! yields another handle to the same channel. Each event type names its topic
//! through [`Event::TOPIC`].
//!
//! The bus is single-threaded, matching the UI event loop it serves.
//! Handlers run synchronously inside [`EventBus::publish`].
use std::{
  cell::RefCell,
  fmt,
  panic::{AssertUnwindSafe, catch_unwind},
  rc::Rc,
};

use log::{debug, error};

/// An event that can travel over an [`EventBus`].
pub trait Event: 'static {
  /// Name of the topic this event is published on.
  const TOPIC: &'static str;
}

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionToken(u64);

type Handler<E> = Rc<dyn Fn(&E)>;

struct Registry<E> {
  next_id:  u64,
  handlers: Vec<(SubscriptionToken, Handler<E>)>,
}

/// A typed publish/subscribe channel for events of type `E`.
pub struct EventBus<E: Event> {
  registry: Rc<RefCell<Registry<E>>>,
}

impl<E: Event> EventBus<E> {
  /// Create an empty bus.
  #[must_use]
  pub fn new() -> Self {
    Self {
      registry: Rc::new(RefCell::new(Registry {
        next_id:  0,
        handlers: Vec::new(),
      })),
    }
  }

  /// Topic name of this bus.
  #[must_use]
  pub const fn topic(&self) -> &'static str {
    E::TOPIC
  }

  /// Register a handler. It receives every event published after this call
  /// until it is unsubscribed.
  pub fn subscribe<F>(&self, handler: F) -> SubscriptionToken
  where
    F: Fn(&E) + 'static,
  {
    let mut registry = self.registry.borrow_mut();
    let token = SubscriptionToken(registry.next_id);
    registry.next_id += 1;
    registry.handlers.push((token, Rc::new(handler)));
    debug!("Subscribed {token:?} to {}", E::TOPIC);
    token
  }

  /// Remove a handler. Returns `false` if the token was not subscribed.
  pub fn unsubscribe(&self, token: SubscriptionToken) -> bool {
    let mut registry = self.registry.borrow_mut();
    let before = registry.handlers.len();
    registry.handlers.retain(|(t, _)| *t != token);
    let removed = registry.handlers.len() != before;
    if removed {
      debug!("Unsubscribed {token:?} from {}", E::TOPIC);
    }
    removed
  }

  /// Whether `token` is currently subscribed.
  #[must_use]
  pub fn is_subscribed(&self, token: SubscriptionToken) -> bool {
    self
      .registry
      .borrow()
      .handlers
      .iter()
      .any(|(t, _)| *t == token)
  }

  /// Number of live subscriptions.
  #[must_use]
  pub fn subscriber_count(&self) -> usize {
    self.registry.borrow().handlers.len()
  }

  /// Deliver `event` to every subscriber and return how many received it.
  ///
  /// Handlers may subscribe or unsubscribe while being called. A handler
  /// unsubscribed by an earlier one in the same round is skipped. A
  /// panicking handler is logged and does not stop delivery to the rest.
  pub fn publish(&self, event: &E) -> usize {
    let snapshot: Vec<(SubscriptionToken, Handler<E>)> = self
      .registry
      .borrow()
      .handlers
      .iter()
      .map(|(token, handler)| (*token, Rc::clone(handler)))
      .collect();

    debug!(
      "Publishing on {} to {} subscriber(s)",
      E::TOPIC,
      snapshot.len()
    );

    let mut delivered = 0;
    for (token, handler) in snapshot {
      if !self.is_subscribed(token) {
        continue;
      }
      match catch_unwind(AssertUnwindSafe(|| handler(event))) {
        Ok(()) => delivered += 1,
        Err(_) => {
          error!("Subscriber {token:?} on {} panicked; skipping it", E::TOPIC);
        },
      }
    }
    delivered
  }
}

impl<E: Event> Clone for EventBus<E> {
  fn clone(&self) -> Self {
    Self {
      registry: Rc::clone(&self.registry),
    }
  }
}

impl<E: Event> Default for EventBus<E> {
  fn default() -> Self {
    Self::new()
  }
}

impl<E: Event> fmt::Debug for EventBus<E> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("EventBus")
      .field("topic", &E::TOPIC)
      .field("subscribers", &self.subscriber_count())
      .finish()
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::panic, reason = "Fine in tests")]
  use std::cell::{Cell, RefCell};

  use super::*;

  #[derive(Debug, Clone, PartialEq, Eq)]
  struct Ping(u32);

  impl Event for Ping {
    const TOPIC: &'static str = "PING";
  }

  #[test]
  fn test_publish_reaches_all_subscribers() {
    let bus = EventBus::<Ping>::new();
    let seen = Rc::new(RefCell::new(Vec::new()));

    for _ in 0..2 {
      let seen = Rc::clone(&seen);
      bus.subscribe(move |ping: &Ping| seen.borrow_mut().push(ping.0));
    }

    assert_eq!(bus.publish(&Ping(7)), 2);
    assert_eq!(*seen.borrow(), vec![7, 7]);
    assert_eq!(bus.topic(), "PING");
  }

  #[test]
  fn test_unsubscribe_stops_delivery() {
    let bus = EventBus::<Ping>::new();
    let count = Rc::new(Cell::new(0));
    let token = {
      let count = Rc::clone(&count);
      bus.subscribe(move |_| count.set(count.get() + 1))
    };

    assert!(bus.unsubscribe(token));
    assert!(!bus.unsubscribe(token));
    assert_eq!(bus.publish(&Ping(1)), 0);
    assert_eq!(count.get(), 0);
  }

  #[test]
  fn test_clones_share_the_channel() {
    let bus = EventBus::<Ping>::new();
    let other = bus.clone();
    let count = Rc::new(Cell::new(0));
    {
      let count = Rc::clone(&count);
      other.subscribe(move |_| count.set(count.get() + 1));
    }

    assert_eq!(bus.subscriber_count(), 1);
    bus.publish(&Ping(1));
    assert_eq!(count.get(), 1);
  }

  #[test]
  fn test_panicking_subscriber_is_isolated() {
    let bus = EventBus::<Ping>::new();
    let count = Rc::new(Cell::new(0));
    bus.subscribe(|_| panic!("subscriber failure"));
    {
      let count = Rc::clone(&count);
      bus.subscribe(move |_| count.set(count.get() + 1));
    }

    assert_eq!(bus.publish(&Ping(1)), 1);
    assert_eq!(count.get(), 1);
  }

  #[test]
  fn test_handler_may_unsubscribe_a_later_one() {
    let bus = EventBus::<Ping>::new();
    let late_token = Rc::new(Cell::new(None));
    let late_calls = Rc::new(Cell::new(0));

    {
      let bus = bus.clone();
      let late_token = Rc::clone(&late_token);
      bus.clone().subscribe(move |_| {
        if let Some(token) = late_token.get() {
          bus.unsubscribe(token);
        }
      });
    }
    let token = {
      let late_calls = Rc::clone(&late_calls);
      bus.subscribe(move |_| late_calls.set(late_calls.get() + 1))
    };
    late_token.set(Some(token));

    assert_eq!(bus.publish(&Ping(1)), 1);
    assert_eq!(late_calls.get(), 0);
    assert_eq!(bus.subscriber_count(), 1);
  }
}
