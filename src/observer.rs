//! Diagnostic observers for collection resolution and constructor selection.
//!
//! Observers see the decisions the resolver makes silently: open-generic
//! items that were closed for a request, items that were discarded because
//! closing failed, collections that were assembled, and constructors that
//! were selected.

use std::sync::Arc;
use std::time::Duration;

use crate::constructor::ConstructorCandidate;
use crate::generics::ClosingFailure;
use crate::phase::ContainerPhase;
use crate::types::TypeDescriptor;

/// Observer trait for resolution events.
///
/// Calls are made synchronously on the resolving thread. Keep
/// implementations lightweight; queue expensive work elsewhere.
///
/// # Examples
///
/// ```
/// use ferrous_generics::{ResolutionObserver, ServiceCollection, TypeDescriptor, ClosingFailure};
/// use std::sync::{Arc, Mutex};
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct DiscardCounter {
///     discarded: Mutex<usize>,
/// }
///
/// impl ResolutionObserver for DiscardCounter {
///     fn item_closed(&self, _: &TypeDescriptor, _: &TypeDescriptor, _: &TypeDescriptor) {}
///
///     fn item_discarded(&self, _: &TypeDescriptor, _: &TypeDescriptor, _: &ClosingFailure) {
///         *self.discarded.lock().unwrap() += 1;
///     }
///
///     fn collection_built(&self, _: &TypeDescriptor, _: usize, _: Duration) {}
/// }
///
/// let mut services = ServiceCollection::new();
/// services.add_observer(Arc::new(DiscardCounter::default()));
/// let provider = services.build();
/// ```
pub trait ResolutionObserver: Send + Sync {
    /// An open implementation was closed for `service`.
    fn item_closed(&self, service: &TypeDescriptor, open: &TypeDescriptor, closed: &TypeDescriptor);

    /// An item was left out of the collection for `service`.
    fn item_discarded(&self, service: &TypeDescriptor, implementation: &TypeDescriptor, failure: &ClosingFailure);

    /// A collection producer for `service` was assembled.
    fn collection_built(&self, service: &TypeDescriptor, item_count: usize, duration: Duration);

    /// A constructor was selected for `implementation`.
    ///
    /// Default implementation does nothing.
    fn constructor_selected(
        &self,
        _implementation: &TypeDescriptor,
        _candidate: &ConstructorCandidate,
        _phase: ContainerPhase,
    ) {
    }
}

/// Container for registered observers.
///
/// Designed to have minimal overhead when no observers are registered.
#[derive(Default, Clone)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn ResolutionObserver>>,
}

/// Shared empty set for resolution outside a provider.
pub(crate) static NO_OBSERVERS: Observers = Observers {
    observers: Vec::new(),
};

impl Observers {
    pub(crate) fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    pub(crate) fn add(&mut self, observer: Arc<dyn ResolutionObserver>) {
        self.observers.push(observer);
    }

    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    #[inline]
    pub(crate) fn item_closed(&self, service: &TypeDescriptor, open: &TypeDescriptor, closed: &TypeDescriptor) {
        for observer in &self.observers {
            observer.item_closed(service, open, closed);
        }
    }

    #[inline]
    pub(crate) fn item_discarded(&self, service: &TypeDescriptor, implementation: &TypeDescriptor, failure: &ClosingFailure) {
        for observer in &self.observers {
            observer.item_discarded(service, implementation, failure);
        }
    }

    #[inline]
    pub(crate) fn collection_built(&self, service: &TypeDescriptor, item_count: usize, duration: Duration) {
        for observer in &self.observers {
            observer.collection_built(service, item_count, duration);
        }
    }

    #[inline]
    pub(crate) fn constructor_selected(
        &self,
        implementation: &TypeDescriptor,
        candidate: &ConstructorCandidate,
        phase: ContainerPhase,
    ) {
        for observer in &self.observers {
            observer.constructor_selected(implementation, candidate, phase);
        }
    }
}

/// Built-in observer that forwards events to `tracing`.
///
/// Useful during development; events are emitted at `debug` level with a
/// configurable prefix so they can be told apart from the crate's own
/// `trace` output.
///
/// # Examples
///
/// ```
/// use ferrous_generics::{ServiceCollection, TracingObserver};
/// use std::sync::Arc;
///
/// let mut services = ServiceCollection::new();
/// services.add_observer(Arc::new(TracingObserver::with_prefix("[orders]")));
/// ```
pub struct TracingObserver {
    prefix: String,
}

impl TracingObserver {
    pub fn new() -> Self {
        Self {
            prefix: "[ferrous-generics]".to_string(),
        }
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolutionObserver for TracingObserver {
    fn item_closed(&self, service: &TypeDescriptor, open: &TypeDescriptor, closed: &TypeDescriptor) {
        tracing::debug!(%service, %open, %closed, "{} closed implementation", self.prefix);
    }

    fn item_discarded(&self, service: &TypeDescriptor, implementation: &TypeDescriptor, failure: &ClosingFailure) {
        tracing::debug!(%service, %implementation, %failure, "{} discarded implementation", self.prefix);
    }

    fn collection_built(&self, service: &TypeDescriptor, item_count: usize, duration: Duration) {
        tracing::debug!(%service, item_count, ?duration, "{} built collection", self.prefix);
    }

    fn constructor_selected(
        &self,
        implementation: &TypeDescriptor,
        candidate: &ConstructorCandidate,
        phase: ContainerPhase,
    ) {
        tracing::debug!(
            %implementation,
            index = candidate.index(),
            arity = candidate.arity(),
            ?phase,
            "{} selected constructor",
            self.prefix
        );
    }
}
