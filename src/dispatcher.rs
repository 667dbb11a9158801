//! Stable dispatch handle turning an action and a payload into a state change.

use std::cell::RefCell;

use portable_atomic_util::Arc;
use spin::Mutex;

use crate::{Action, RenderRequester};

#[allow(clippy::type_complexity)]
pub(crate) type Cloner<S> = Arc<Box<dyn Fn(&S) -> S + Send + Sync + 'static>>;

thread_local! {
    /// Live states with a dispatch in progress on this thread.
    static DISPATCHING: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
}

/// Marks one live state as dispatching on the current thread until dropped.
struct DispatchGuard(usize);

impl DispatchGuard {
    fn enter(id: usize, action: &'static str) -> Self {
        DISPATCHING.with(|active| {
            let mut active = active.borrow_mut();
            if active.contains(&id) {
                panic!(
                    "dispatch of `{action}` re-entered from inside an action of the same view model instance"
                );
            }
            active.push(id);
        });
        Self(id)
    }
}

impl Drop for DispatchGuard {
    fn drop(&mut self) {
        DISPATCHING.with(|active| {
            let mut active = active.borrow_mut();
            if let Some(position) = active.iter().rposition(|id| *id == self.0) {
                active.remove(position);
            }
        });
    }
}

/// Applies actions to the live state of one component instance.
///
/// Cloning is cheap: every clone shares the same live state and render
/// requester, so it can be stored in callbacks or handed to effects.
///
/// Dispatching runs the action against the live state in place, replaces the
/// live state with a fresh copy of itself and asks the host for a re-render.
///
/// # Panics
///
/// Dispatching from inside an action to the same instance panics. Dispatches
/// from effects, stored callbacks or other threads are fine.
pub struct Dispatcher<S> {
    live: Arc<Mutex<S>>,
    cloner: Cloner<S>,
    requester: RenderRequester,
}

impl<S> Clone for Dispatcher<S> {
    fn clone(&self) -> Self {
        Self {
            live: self.live.clone(),
            cloner: self.cloner.clone(),
            requester: self.requester.clone(),
        }
    }
}

impl<S: 'static> Dispatcher<S> {
    pub(crate) fn new(live: Arc<Mutex<S>>, cloner: Cloner<S>, requester: RenderRequester) -> Self {
        Self {
            live,
            cloner,
            requester,
        }
    }

    /// Apply `action` with `payload` and request a re-render.
    ///
    /// A panicking action leaves the live state as the action left it and
    /// requests nothing.
    pub fn dispatch<Q: 'static>(&self, action: &Action<S, Q>, payload: Q) {
        tracing::debug!(action = action.name(), "dispatching action");
        let _guard = DispatchGuard::enter(&*self.live as *const Mutex<S> as usize, action.name());
        {
            let mut state = self.live.lock();
            action.apply(&mut state, payload);
            *state = (self.cloner)(&*state);
        }
        self.requester.request();
    }

    /// The curried form: bind `action` now, supply the payload later.
    pub fn bind<Q: 'static>(&self, action: &Action<S, Q>) -> impl Fn(Q) + Send + Sync + 'static
    where
        S: Send,
    {
        let dispatcher = self.clone();
        let action = action.clone();
        move |payload| dispatcher.dispatch(&action, payload)
    }
}
