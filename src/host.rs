//! Hosting-framework capabilities a view model is built on.

#[cfg(any(test, feature = "testing"))]
use std::any::Any;

use flume::{Receiver, Sender};
use portable_atomic_util::Arc;

use crate::{Deps, Effect};

#[cfg(any(test, feature = "testing"))]
use crate::Cleanup;

/// Errors reported by a [`Host`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum HostError {
    /// The slot at `index` was created for another type, which means hooks
    /// were called in a different order than on the first render.
    #[error("persistent slot {index} does not hold a `{expected}`; hook order changed between renders")]
    SlotTypeMismatch { index: usize, expected: &'static str },
}

/// Handle that signals "re-render needed" to its host.
///
/// Cheap to clone and safe to use from any thread; requests are queued on a
/// channel and collected by the host through [`RenderRequests`].
pub struct RenderRequester(Sender<()>);

impl Clone for RenderRequester {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl RenderRequester {
    /// Create a connected requester and receiving end.
    pub fn channel() -> (Self, RenderRequests) {
        let (sender, receiver) = flume::unbounded();
        (
            Self(sender),
            RenderRequests {
                receiver,
                received: 0,
            },
        )
    }

    /// Ask for a re-render. Dropped silently once the host is gone.
    pub fn request(&self) {
        self.0.send(()).ok();
    }
}

/// Receiving end of a [`RenderRequester`], owned by the host.
pub struct RenderRequests {
    receiver: Receiver<()>,
    received: usize,
}

impl RenderRequests {
    /// Collect queued requests without blocking and return how many arrived.
    pub fn drain(&mut self) -> usize {
        let count = self.receiver.try_iter().count();
        self.received += count;
        count
    }

    /// Block until a request arrives. Returns `false` once every requester
    /// has been dropped.
    pub fn wait(&mut self) -> bool {
        match self.receiver.recv() {
            Ok(()) => {
                self.received += 1;
                true
            }
            Err(_) => false,
        }
    }

    /// Requests received over the lifetime of this host. Only ever grows.
    pub fn total(&self) -> usize {
        self.received
    }
}

/// Component-lifecycle primitives supplied by the hosting framework.
///
/// A host drives one component instance. During a render pass, the n-th call
/// to [`persistent`](Self::persistent) or [`schedule_effect`](Self::schedule_effect)
/// refers to the same slot as the n-th call of every other pass.
pub trait Host {
    /// Return the cell at the current position, creating it with `init` on
    /// the first render.
    fn persistent<T, F>(&mut self, init: F) -> Result<Arc<T>, HostError>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> T;

    /// A handle for requesting re-renders of this component.
    fn render_requester(&mut self) -> RenderRequester;

    /// Register `effect` for the current render. The host runs it after the
    /// render commits when `deps` changed since the previous render (see
    /// [`Deps::changed_from`]).
    fn schedule_effect(&mut self, effect: Effect, deps: Deps);
}

#[cfg(any(test, feature = "testing"))]
struct EffectSlot {
    deps: Deps,
    cleanup: Option<Cleanup>,
}

#[cfg(any(test, feature = "testing"))]
struct PendingEffect {
    index: usize,
    effect: Effect,
    deps: Deps,
}

#[cfg(any(test, feature = "testing"))]
/// In-memory [`Host`] for tests.
///
/// Only available with the `testing` feature.
///
/// Wrap each render in [`TestHost::render`]; scheduled effects whose deps
/// changed run when the closure returns, previous cleanups first.
///
/// ```rust
/// use oxide_viewmodel::{ActionKey, ActionPayload, TestHost, ViewModel, ViewModelDefinition};
///
/// #[derive(Clone)]
/// struct Counter { count: i32 }
///
/// const INCREMENT: ActionKey<()> = ActionKey::new("increment");
///
/// let use_counter = ViewModel::new(
///     ViewModelDefinition::new(Counter { count: 0 })
///         .action(INCREMENT, |s: &mut Counter, _: ActionPayload<()>| s.count += 1),
/// )
/// .build();
///
/// let mut host = TestHost::new();
/// let first = host.render(|h| use_counter.call(h, None)).unwrap();
/// first.actions.call(INCREMENT, ());
/// first.actions.call(INCREMENT, ());
///
/// assert_eq!(host.pending_renders(), 2);
/// let second = host.render(|h| use_counter.call(h, None)).unwrap();
/// assert_eq!(second.state.count, 2);
/// ```
pub struct TestHost {
    slots: Vec<Box<dyn Any + Send>>,
    slot_cursor: usize,
    effects: Vec<EffectSlot>,
    effect_cursor: usize,
    pending: Vec<PendingEffect>,
    requester: RenderRequester,
    requests: RenderRequests,
    consumed: usize,
    renders: usize,
}

#[cfg(any(test, feature = "testing"))]
impl Default for TestHost {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "testing"))]
impl TestHost {
    pub fn new() -> Self {
        let (requester, requests) = RenderRequester::channel();
        Self {
            slots: Vec::new(),
            slot_cursor: 0,
            effects: Vec::new(),
            effect_cursor: 0,
            pending: Vec::new(),
            requester,
            requests,
            consumed: 0,
            renders: 0,
        }
    }

    /// Run one render pass and commit its effects.
    ///
    /// Render requests queued before the pass are consumed by it.
    pub fn render<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.requests.drain();
        self.consumed = self.requests.total();
        self.slot_cursor = 0;
        self.effect_cursor = 0;

        let output = f(self);

        self.renders += 1;
        self.commit();
        output
    }

    fn commit(&mut self) {
        for PendingEffect { index, effect, deps } in core::mem::take(&mut self.pending) {
            match self.effects.get_mut(index) {
                Some(slot) if !deps.changed_from(&slot.deps) => {
                    tracing::trace!(index, "effect deps unchanged, skipping");
                }
                Some(slot) => {
                    tracing::trace!(index, "re-running effect");
                    if let Some(cleanup) = slot.cleanup.take() {
                        cleanup.run();
                    }
                    slot.cleanup = effect.execute();
                    slot.deps = deps;
                }
                None => {
                    tracing::trace!(index, "running effect for the first time");
                    let cleanup = effect.execute();
                    self.effects.push(EffectSlot { deps, cleanup });
                }
            }
        }
    }

    /// Number of render passes run so far.
    pub fn render_count(&self) -> usize {
        self.renders
    }

    /// Re-render requests received since the last render pass.
    pub fn pending_renders(&mut self) -> usize {
        self.requests.drain();
        self.requests.total() - self.consumed
    }

    /// Tear the component down, running every outstanding cleanup in
    /// registration order.
    pub fn unmount(mut self) {
        for slot in self.effects.drain(..) {
            if let Some(cleanup) = slot.cleanup {
                cleanup.run();
            }
        }
    }
}

#[cfg(any(test, feature = "testing"))]
impl Host for TestHost {
    fn persistent<T, F>(&mut self, init: F) -> Result<Arc<T>, HostError>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> T,
    {
        let index = self.slot_cursor;
        self.slot_cursor += 1;

        match self.slots.get(index) {
            Some(slot) => slot
                .downcast_ref::<Arc<T>>()
                .cloned()
                .ok_or(HostError::SlotTypeMismatch {
                    index,
                    expected: core::any::type_name::<T>(),
                }),
            None => {
                let cell = Arc::new(init());
                self.slots.push(Box::new(cell.clone()));
                Ok(cell)
            }
        }
    }

    fn render_requester(&mut self) -> RenderRequester {
        self.requester.clone()
    }

    fn schedule_effect(&mut self, effect: Effect, deps: Deps) {
        let index = self.effect_cursor;
        self.effect_cursor += 1;
        self.pending.push(PendingEffect {
            index,
            effect,
            deps,
        });
    }
}
