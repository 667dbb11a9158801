//! Effect registrations and the dependency lists that gate them.

use std::any::Any;

use crate::{Actions, Dispatcher};

/// Teardown returned by an [`Effect`].
///
/// The host runs it before the effect runs again and when the component is
/// torn down.
pub struct Cleanup(Box<dyn FnOnce() + Send + 'static>);

impl Cleanup {
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self(Box::new(f))
    }

    pub fn run(self) {
        (self.0)();
    }
}

/// A side-effecting callback, run by the host after a render commits.
///
/// # Example
///
/// ```rust
/// use oxide_viewmodel::{Cleanup, Effect};
///
/// let effect = Effect::new(|| println!("mounted"));
///
/// let subscription = Effect::with_cleanup(|| {
///     println!("subscribe");
///     Cleanup::new(|| println!("unsubscribe"))
/// });
/// ```
#[allow(clippy::type_complexity)]
pub struct Effect(Box<dyn FnOnce() -> Option<Cleanup> + Send + 'static>);

impl Effect {
    /// An effect without teardown.
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self(Box::new(move || {
            f();
            None
        }))
    }

    /// An effect that hands back a [`Cleanup`].
    pub fn with_cleanup<F>(f: F) -> Self
    where
        F: FnOnce() -> Cleanup + Send + 'static,
    {
        Self(Box::new(move || Some(f())))
    }

    /// An effect that does nothing.
    pub fn none() -> Self {
        Self(Box::new(|| None))
    }

    pub fn execute(self) -> Option<Cleanup> {
        (self.0)()
    }
}

trait DynDeps: Send {
    fn as_any(&self) -> &dyn Any;
    fn same_as(&self, other: &dyn DynDeps) -> bool;
}

impl<T: PartialEq + Send + 'static> DynDeps for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn same_as(&self, other: &dyn DynDeps) -> bool {
        other.as_any().downcast_ref::<T>() == Some(self)
    }
}

/// Dependency list controlling when an [`Effect`] re-runs.
///
/// - [`Deps::always`]: re-run after every render.
/// - [`Deps::once`]: run after the first render only.
/// - [`Deps::on`]: re-run whenever the value differs from the previous render's.
///
/// Values are compared with `PartialEq`; a tuple stands in for a list of
/// several dependencies.
pub struct Deps(Option<Box<dyn DynDeps>>);

impl Deps {
    pub fn always() -> Self {
        Self(None)
    }

    pub fn once() -> Self {
        Self::on(())
    }

    pub fn on<T: PartialEq + Send + 'static>(value: T) -> Self {
        Self(Some(Box::new(value)))
    }

    /// Whether an effect gated by `self` must run given the deps it was
    /// last run with. Absent deps always count as changed, and so does a
    /// change in the dependency type.
    pub fn changed_from(&self, previous: &Deps) -> bool {
        match (&self.0, &previous.0) {
            (Some(next), Some(prev)) => !next.same_as(prev.as_ref()),
            _ => true,
        }
    }
}

impl core::fmt::Debug for Deps {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.0 {
            Some(_) => f.write_str("Deps::on(..)"),
            None => f.write_str("Deps::always()"),
        }
    }
}

/// What an effect creator produces on each render: the callback and the deps
/// gating it.
pub struct EffectSpec {
    pub effect: Effect,
    pub deps: Deps,
}

impl EffectSpec {
    pub fn new(effect: Effect, deps: Deps) -> Self {
        Self { effect, deps }
    }
}

/// Everything an effect creator sees on a render.
///
/// `actions` are the declared handlers, not the wrappers returned to the
/// component; pair them with `dispatch` to apply one.
pub struct EffectContext<'a, S> {
    pub state: &'a S,
    pub actions: &'a Actions<S>,
    pub dispatch: &'a Dispatcher<S>,
}

pub(crate) type EffectCreator<S> =
    Box<dyn for<'a> Fn(EffectContext<'a, S>) -> EffectSpec + Send + Sync + 'static>;

/// Collects effect creators while a view model is being constructed.
///
/// Creators are replayed in registration order on every render.
pub struct EffectProvider<S> {
    pub(crate) effects: Vec<EffectCreator<S>>,
}

impl<S> Default for EffectProvider<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> EffectProvider<S> {
    pub fn new() -> Self {
        Self {
            effects: Vec::new(),
        }
    }

    /// Register an effect creator.
    pub fn add<F>(&mut self, creator: F)
    where
        F: for<'a> Fn(EffectContext<'a, S>) -> EffectSpec + Send + Sync + 'static,
    {
        self.effects.push(Box::new(creator));
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}
