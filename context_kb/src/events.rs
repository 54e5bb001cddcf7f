//! Events - publish/subscribe plumbing between the store and its observers.
//!
//! Three listener levels exist:
//! - **ContextPointListener**: one per point, held weakly, told about content changes
//! - **KnowledgeListener**: the single internal sink of a `Knowledge` store
//! - **KnowledgeBaseListener**: external subscribers of a knowledge base
//!
//! `EventBus` delivers to subscribers in registration order and isolates them: a
//! listener that returns an error or panics is logged and skipped, the rest still
//! receive the event.

use semantic_tags::SemanticTag;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use crate::knowledge_base::{ContextPoint, ContextPointId, Information};

/// Failure reported by a listener.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ListenerError(pub String);

impl ListenerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

pub type ListenerResult = Result<(), ListenerError>;

/// External subscriber to knowledge base changes.
///
/// Callbacks run synchronously on the mutating caller's thread. Every method
/// defaults to doing nothing.
pub trait KnowledgeBaseListener: Send + Sync {
    fn context_point_added(&self, _cp: &ContextPoint) -> ListenerResult {
        Ok(())
    }

    fn cp_changed(&self, _cp: &ContextPoint) -> ListenerResult {
        Ok(())
    }

    fn context_point_removed(&self, _cp: &ContextPoint) -> ListenerResult {
        Ok(())
    }

    fn topic_added(&self, _tag: &SemanticTag) -> ListenerResult {
        Ok(())
    }

    fn topic_removed(&self, _tag: &SemanticTag) -> ListenerResult {
        Ok(())
    }

    fn peer_added(&self, _tag: &SemanticTag) -> ListenerResult {
        Ok(())
    }

    fn peer_removed(&self, _tag: &SemanticTag) -> ListenerResult {
        Ok(())
    }

    fn location_added(&self, _tag: &SemanticTag) -> ListenerResult {
        Ok(())
    }

    fn location_removed(&self, _tag: &SemanticTag) -> ListenerResult {
        Ok(())
    }

    fn timespan_added(&self, _tag: &SemanticTag) -> ListenerResult {
        Ok(())
    }

    fn timespan_removed(&self, _tag: &SemanticTag) -> ListenerResult {
        Ok(())
    }

    fn predicate_created(
        &self,
        _subject: &SemanticTag,
        _predicate: &str,
        _object: &SemanticTag,
    ) -> ListenerResult {
        Ok(())
    }

    fn predicate_removed(
        &self,
        _subject: &SemanticTag,
        _predicate: &str,
        _object: &SemanticTag,
    ) -> ListenerResult {
        Ok(())
    }
}

/// The internal sink a `Knowledge` store reports to.
pub trait KnowledgeListener {
    fn context_point_added(&self, cp: &ContextPoint);
    fn cp_changed(&self, cp: &ContextPoint);
    fn context_point_removed(&self, cp: &ContextPoint);
}

/// Observer of a single context point.
pub trait ContextPointListener: Send + Sync {
    fn information_added(&self, _info: &Information, _cp: &ContextPoint) {}
    fn information_removed(&self, _info: &Information, _cp: &ContextPoint) {}
    fn coordinates_changed(&self, _cp: &ContextPoint) {}
}

/// Low-level change recorded by a `Knowledge` store until it is dispatched.
#[derive(Debug, Clone)]
pub enum KnowledgeEvent {
    Added(ContextPointId),
    Changed(ContextPointId),
    /// Carries the point itself, which is no longer in the store.
    Removed(ContextPoint),
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Outcome of one publish.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delivery {
    pub delivered: usize,
    pub failed: usize,
}

/// Ordered, failure-isolating fan-out to a list of subscribers.
pub struct EventBus<L: ?Sized> {
    subscribers: Vec<(ListenerId, Arc<L>)>,
    next_id: u64,
}

impl<L: ?Sized> EventBus<L> {
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
            next_id: 0,
        }
    }

    /// Append a subscriber. It receives events after all earlier subscribers.
    pub fn subscribe(&mut self, listener: Arc<L>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, listener));
        id
    }

    /// Remove a subscriber. Returns false if it was not subscribed.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(own, _)| *own != id);
        self.subscribers.len() != before
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Deliver an event to every subscriber in registration order.
    pub fn publish<F>(&self, event: &'static str, deliver: F) -> Delivery
    where
        F: Fn(&L) -> ListenerResult,
    {
        let mut delivery = Delivery::default();
        for (id, listener) in &self.subscribers {
            match catch_unwind(AssertUnwindSafe(|| deliver(listener.as_ref()))) {
                Ok(Ok(())) => delivery.delivered += 1,
                Ok(Err(err)) => {
                    delivery.failed += 1;
                    tracing::warn!(
                        target: "context_kb::events",
                        listener = id.0,
                        event = event,
                        error = %err,
                        "listener failed, continuing with the next one"
                    );
                }
                Err(_) => {
                    delivery.failed += 1;
                    tracing::warn!(
                        target: "context_kb::events",
                        listener = id.0,
                        event = event,
                        "listener panicked, continuing with the next one"
                    );
                }
            }
        }
        delivery
    }
}

impl<L: ?Sized> Default for EventBus<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: ?Sized> std::fmt::Debug for EventBus<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

/// A knowledge base's subscriber list is the sink of its `Knowledge` store:
/// low-level point events are forwarded as knowledge base events.
impl KnowledgeListener for EventBus<dyn KnowledgeBaseListener> {
    fn context_point_added(&self, cp: &ContextPoint) {
        self.publish("context_point_added", |l| l.context_point_added(cp));
    }

    fn cp_changed(&self, cp: &ContextPoint) {
        self.publish("cp_changed", |l| l.cp_changed(cp));
    }

    fn context_point_removed(&self, cp: &ContextPoint) {
        self.publish("context_point_removed", |l| l.context_point_removed(cp));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    trait Ping: Send + Sync {
        fn hit(&self) -> ListenerResult;
    }

    struct Recorder {
        name: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    impl Ping for Recorder {
        fn hit(&self) -> ListenerResult {
            self.log.lock().unwrap().push(self.name);
            Ok(())
        }
    }

    struct Failing;

    impl Ping for Failing {
        fn hit(&self) -> ListenerResult {
            Err(ListenerError::new("refused"))
        }
    }

    struct Panicking;

    impl Ping for Panicking {
        fn hit(&self) -> ListenerResult {
            panic!("listener bug");
        }
    }

    fn recorder(name: &'static str, log: &Arc<Mutex<Vec<&'static str>>>) -> Arc<dyn Ping> {
        Arc::new(Recorder {
            name,
            log: Arc::clone(log),
        })
    }

    #[test]
    fn test_publish_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut bus: EventBus<dyn Ping> = EventBus::new();
        bus.subscribe(recorder("first", &log));
        bus.subscribe(recorder("second", &log));
        bus.subscribe(recorder("third", &log));

        let delivery = bus.publish("hit", |p| p.hit());

        assert_eq!(delivery, Delivery { delivered: 3, failed: 0 });
        assert_eq!(*log.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_failure_is_isolated() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut bus: EventBus<dyn Ping> = EventBus::new();
        bus.subscribe(recorder("before", &log));
        bus.subscribe(Arc::new(Failing));
        bus.subscribe(Arc::new(Panicking));
        bus.subscribe(recorder("after", &log));

        let delivery = bus.publish("hit", |p| p.hit());

        assert_eq!(delivery, Delivery { delivered: 2, failed: 2 });
        assert_eq!(*log.lock().unwrap(), vec!["before", "after"]);
    }

    #[test]
    fn test_unsubscribe() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut bus: EventBus<dyn Ping> = EventBus::new();
        let first = bus.subscribe(recorder("first", &log));
        bus.subscribe(recorder("second", &log));

        assert!(bus.unsubscribe(first));
        assert!(!bus.unsubscribe(first));
        assert_eq!(bus.len(), 1);

        bus.publish("hit", |p| p.hit());
        assert_eq!(*log.lock().unwrap(), vec!["second"]);
    }
}
