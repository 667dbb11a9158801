//! Named state-mutating actions and the stable wrappers handed to components.

use std::any::Any;
use std::marker::PhantomData;

use portable_atomic_util::Arc;

use crate::Dispatcher;

/// The `{ payload }` wrapper every action receives.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionPayload<Q> {
    pub payload: Q,
}

/// Typed name of an action taking a `Q` payload.
///
/// Declare keys as constants and use them both to register the handler and to
/// call the wrapper, so a misspelt action or a wrong payload type is a compile
/// error rather than a lookup miss.
///
/// ```rust
/// use oxide_viewmodel::ActionKey;
///
/// const INCREMENT: ActionKey<()> = ActionKey::new("increment");
/// const ADD: ActionKey<i32> = ActionKey::new("add");
///
/// assert_eq!(ADD.name(), "add");
/// ```
pub struct ActionKey<Q> {
    name: &'static str,
    _payload: PhantomData<fn(Q)>,
}

impl<Q> Clone for ActionKey<Q> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Q> Copy for ActionKey<Q> {}

impl<Q> core::fmt::Debug for ActionKey<Q> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("ActionKey").field(&self.name).finish()
    }
}

impl<Q> ActionKey<Q> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _payload: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

struct ActionInner<S, Q> {
    name: &'static str,
    #[allow(clippy::type_complexity)]
    handler: Box<dyn Fn(&mut S, ActionPayload<Q>) + Send + Sync + 'static>,
}

/// A named, synchronous mutation of `S` taking a `Q` payload.
///
/// Actions hold no state of their own and run against whichever state is
/// live when they are dispatched.
pub struct Action<S, Q>(Arc<ActionInner<S, Q>>);

impl<S, Q> Clone for Action<S, Q> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<S, Q> Action<S, Q> {
    pub fn new<F>(key: ActionKey<Q>, handler: F) -> Self
    where
        F: Fn(&mut S, ActionPayload<Q>) + Send + Sync + 'static,
    {
        Self(Arc::new(ActionInner {
            name: key.name,
            handler: Box::new(handler),
        }))
    }

    pub fn name(&self) -> &'static str {
        self.0.name
    }

    /// Apply the action to `state` in place.
    pub fn apply(&self, state: &mut S, payload: Q) {
        (self.0.handler)(state, ActionPayload { payload });
    }
}

/// An action with its payload type erased, so actions of different payload
/// types share one table.
trait ErasedAction<S>: Send + Sync {
    fn name(&self) -> &'static str;
    fn as_any(&self) -> &dyn Any;
    fn wrap(&self, dispatch: &Dispatcher<S>) -> Box<dyn Any + Send + Sync>;
}

impl<S: Send + 'static, Q: 'static> ErasedAction<S> for Action<S, Q> {
    fn name(&self) -> &'static str {
        self.0.name
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn wrap(&self, dispatch: &Dispatcher<S>) -> Box<dyn Any + Send + Sync> {
        Box::new(ActionWrapper::new(self.name(), dispatch.bind(self)))
    }
}

/// The actions of a view model, in declaration order.
pub struct Actions<S> {
    entries: Vec<Box<dyn ErasedAction<S>>>,
}

impl<S> Default for Actions<S> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<S: Send + 'static> Actions<S> {
    /// Add an action; a name seen before keeps its position but takes the new
    /// handler (and payload type).
    pub(crate) fn insert<Q: 'static>(&mut self, action: Action<S, Q>) {
        let action: Box<dyn ErasedAction<S>> = Box::new(action);
        match self.entries.iter_mut().find(|a| a.name() == action.name()) {
            Some(existing) => *existing = action,
            None => self.entries.push(action),
        }
    }

    /// The declared action for `key`, if one was registered under that name
    /// with the same payload type.
    pub fn get<Q: 'static>(&self, key: ActionKey<Q>) -> Option<&Action<S, Q>> {
        self.entries
            .iter()
            .find(|a| a.name() == key.name)
            .and_then(|a| a.as_any().downcast_ref::<Action<S, Q>>())
    }

    /// One wrapper per action, bound to `dispatch`.
    pub(crate) fn wrap_all(&self, dispatch: &Dispatcher<S>) -> ActionWrappers {
        ActionWrappers {
            wrappers: self
                .entries
                .iter()
                .map(|a| (a.name(), a.wrap(dispatch)))
                .collect(),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|a| a.name())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

struct WrapperInner<Q> {
    name: &'static str,
    call: Box<dyn Fn(Q) + Send + Sync + 'static>,
}

/// A callable bound to one action and a dispatcher.
///
/// Created once per component instance; every render hands back the same
/// wrapper, which [`ActionWrapper::ptr_eq`] can confirm.
pub struct ActionWrapper<Q>(Arc<WrapperInner<Q>>);

impl<Q> Clone for ActionWrapper<Q> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<Q> ActionWrapper<Q> {
    pub(crate) fn new<F>(name: &'static str, call: F) -> Self
    where
        F: Fn(Q) + Send + Sync + 'static,
    {
        Self(Arc::new(WrapperInner {
            name,
            call: Box::new(call),
        }))
    }

    pub fn name(&self) -> &'static str {
        self.0.name
    }

    /// Dispatch the bound action with `payload`.
    pub fn call(&self, payload: Q) {
        (self.0.call)(payload);
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// The wrapped actions returned to a component.
pub struct ActionWrappers {
    wrappers: Vec<(&'static str, Box<dyn Any + Send + Sync>)>,
}

impl ActionWrappers {
    /// The wrapper for `key`. `None` when the view model declares no action
    /// under that name and payload type.
    pub fn get<Q: 'static>(&self, key: ActionKey<Q>) -> Option<&ActionWrapper<Q>> {
        self.wrappers
            .iter()
            .find(|(name, _)| *name == key.name)
            .and_then(|(_, wrapper)| wrapper.downcast_ref::<ActionWrapper<Q>>())
    }

    /// Call the wrapper for `key`.
    ///
    /// Returns `false` when the key belongs to no declared action.
    pub fn call<Q: 'static>(&self, key: ActionKey<Q>, payload: Q) -> bool {
        match self.get(key) {
            Some(wrapper) => {
                wrapper.call(payload);
                true
            }
            None => {
                tracing::warn!(action = key.name, "no action declared for this key");
                false
            }
        }
    }

    pub fn len(&self) -> usize {
        self.wrappers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wrappers.is_empty()
    }
}
