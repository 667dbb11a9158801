//! View-model definitions and the per-component hook built from them.

use portable_atomic_util::Arc;
use spin::Mutex;

use crate::dispatcher::Cloner;
use crate::{
    Action, ActionKey, ActionPayload, ActionWrappers, Actions, Dispatcher, EffectContext,
    EffectProvider, EffectSpec, Host, HostError,
};

/// Where the first live state of a component instance comes from.
pub enum InitialState<S, Props> {
    /// Cloned into every new component instance.
    Value(S),
    /// Called once per component instance with the props of its first render.
    #[allow(clippy::type_complexity)]
    Init(Box<dyn Fn(Option<&Props>) -> S + Send + Sync + 'static>),
}

#[allow(clippy::type_complexity)]
type EffectsRegistration<S> = Box<dyn FnOnce(&mut EffectProvider<S>) + 'static>;

/// The blueprint of a view model: initial state, named actions and the
/// effect registrations replayed on every render.
///
/// # Example
///
/// ```rust
/// use oxide_viewmodel::{ActionKey, ActionPayload, Deps, Effect, EffectSpec, ViewModelDefinition};
///
/// #[derive(Clone)]
/// struct Search { query: String, results: Vec<String> }
///
/// const SET_QUERY: ActionKey<String> = ActionKey::new("set_query");
/// const CLEAR: ActionKey<()> = ActionKey::new("clear");
///
/// let definition = ViewModelDefinition::new(Search { query: String::new(), results: Vec::new() })
///     .action(SET_QUERY, |s: &mut Search, a: ActionPayload<String>| s.query = a.payload)
///     .action(CLEAR, |s: &mut Search, _: ActionPayload<()>| s.results.clear())
///     .effects(|provider| {
///         provider.add(|cx| {
///             let query = cx.state.query.clone();
///             EffectSpec::new(Effect::new(move || println!("searching {query}")), Deps::on(cx.state.query.clone()))
///         });
///     });
/// ```
pub struct ViewModelDefinition<S, Props = ()> {
    state: InitialState<S, Props>,
    actions: Actions<S>,
    effects: Option<EffectsRegistration<S>>,
    cloner: Cloner<S>,
}

fn default_cloner<S: Clone + 'static>() -> Cloner<S> {
    let cloner: Box<dyn Fn(&S) -> S + Send + Sync> = Box::new(S::clone);
    Arc::new(cloner)
}

impl<S> ViewModelDefinition<S, ()>
where
    S: Clone + Send + 'static,
{
    /// A definition whose instances all start from a clone of `state`.
    pub fn new(state: S) -> Self {
        Self::from_state(InitialState::Value(state))
    }
}

impl<S, Props> ViewModelDefinition<S, Props>
where
    S: Clone + Send + 'static,
{
    /// A definition whose instances start from `init(props)`.
    pub fn from_initializer<F>(init: F) -> Self
    where
        F: Fn(Option<&Props>) -> S + Send + Sync + 'static,
    {
        Self::from_state(InitialState::Init(Box::new(init)))
    }

    pub fn from_state(state: InitialState<S, Props>) -> Self {
        Self {
            state,
            actions: Actions::default(),
            effects: None,
            cloner: default_cloner(),
        }
    }

    /// Declare an action under `key`. Actions without a payload use
    /// `ActionKey<()>`.
    pub fn action<Q, F>(mut self, key: ActionKey<Q>, handler: F) -> Self
    where
        Q: 'static,
        F: Fn(&mut S, ActionPayload<Q>) + Send + Sync + 'static,
    {
        self.actions.insert(Action::new(key, handler));
        self
    }

    /// Set the callback that registers effects. It runs once, when the
    /// [`ViewModel`] is constructed.
    pub fn effects<F>(mut self, register: F) -> Self
    where
        F: FnOnce(&mut EffectProvider<S>) + 'static,
    {
        self.effects = Some(Box::new(register));
        self
    }

    /// Replace the copy made of the state after each dispatch and for each
    /// render's snapshot. Defaults to `Clone::clone`.
    pub fn with_cloner<F>(mut self, cloner: F) -> Self
    where
        F: Fn(&S) -> S + Send + Sync + 'static,
    {
        let cloner: Box<dyn Fn(&S) -> S + Send + Sync> = Box::new(cloner);
        self.cloner = Arc::new(cloner);
        self
    }
}

/// What a component receives from each render of a view model.
pub struct ViewModelRender<S> {
    /// Copy of the live state taken for this render.
    pub state: Arc<S>,
    /// Wrapped actions, identical across renders of one component instance.
    pub actions: Arc<ActionWrappers>,
}

struct ViewModelInner<S, Props> {
    state: InitialState<S, Props>,
    actions: Actions<S>,
    effects: EffectProvider<S>,
    cloner: Cloner<S>,
}

/// A constructed view model. One view model serves any number of component
/// instances, each with its own isolated state.
pub struct ViewModel<S, Props = ()> {
    inner: Arc<ViewModelInner<S, Props>>,
}

impl<S, Props> Clone for ViewModel<S, Props> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<S, Props> ViewModel<S, Props>
where
    S: Send + 'static,
{
    /// Store `definition` and run its effects registration against an empty
    /// [`EffectProvider`]. A panic in the registration reaches the caller.
    pub fn new(definition: ViewModelDefinition<S, Props>) -> Self {
        let ViewModelDefinition {
            state,
            actions,
            effects: register,
            cloner,
        } = definition;

        let mut effects = EffectProvider::new();
        if let Some(register) = register {
            register(&mut effects);
        }

        tracing::debug!(
            actions = ?actions.names().collect::<Vec<_>>(),
            effects = effects.len(),
            "constructed view model"
        );

        Self {
            inner: Arc::new(ViewModelInner {
                state,
                actions,
                effects,
                cloner,
            }),
        }
    }

    /// Produce a fresh state: the initializer's result, or a copy of the
    /// stored value.
    pub fn initialize_state(&self, props: Option<&Props>) -> S {
        match &self.inner.state {
            InitialState::Value(state) => (self.inner.cloner)(state),
            InitialState::Init(init) => init(props),
        }
    }

    /// Wrap every declared action so that calling it forwards the payload
    /// through `dispatch`.
    pub fn initialize_actions(&self, dispatch: &Dispatcher<S>) -> ActionWrappers {
        self.inner.actions.wrap_all(dispatch)
    }

    /// The declared actions, unwrapped.
    pub fn actions(&self) -> &Actions<S> {
        &self.inner.actions
    }

    /// The per-component hook.
    pub fn build(&self) -> UseViewModel<S, Props> {
        UseViewModel {
            view_model: self.clone(),
        }
    }
}

/// The per-component hook returned by [`ViewModel::build`].
///
/// Call it exactly once per render of the hosting component.
pub struct UseViewModel<S, Props = ()> {
    view_model: ViewModel<S, Props>,
}

impl<S, Props> Clone for UseViewModel<S, Props> {
    fn clone(&self) -> Self {
        Self {
            view_model: self.view_model.clone(),
        }
    }
}

impl<S, Props> UseViewModel<S, Props>
where
    S: Send + 'static,
{
    /// Run one render of the view model inside `host`.
    ///
    /// `props` only matter on the first render, where they seed the state
    /// initializer. Occupies three persistent slots followed by one effect
    /// slot per registered effect.
    pub fn call<H: Host>(
        &self,
        host: &mut H,
        props: Option<&Props>,
    ) -> Result<ViewModelRender<S>, HostError> {
        let view_model = &self.view_model;
        let inner = &*view_model.inner;

        let live = host.persistent(|| {
            tracing::debug!("creating live state for component instance");
            Mutex::new(view_model.initialize_state(props))
        })?;
        let snapshot = Arc::new((inner.cloner)(&*live.lock()));

        let requester = host.render_requester();
        let dispatch = host.persistent(|| Dispatcher::new(live.clone(), inner.cloner.clone(), requester))?;
        let actions = host.persistent(|| view_model.initialize_actions(&dispatch))?;

        for creator in &inner.effects.effects {
            let EffectSpec { effect, deps } = creator(EffectContext {
                state: &*snapshot,
                actions: &inner.actions,
                dispatch: &*dispatch,
            });
            tracing::trace!(?deps, "scheduling effect");
            host.schedule_effect(effect, deps);
        }

        Ok(ViewModelRender {
            state: snapshot,
            actions,
        })
    }
}
