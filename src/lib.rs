//! View-model hooks for Rust UI components.
//!
//! A [`ViewModelDefinition`] bundles a component's initial state, its named
//! actions and its effect registrations. [`ViewModel::build`] turns it into a
//! hook that a component calls once per render through a [`Host`], receiving
//! a snapshot of the state and stable action wrappers in return.
//!
//! The host supplies the component-lifecycle primitives: create-once cells,
//! re-render requests and dependency-gated effect scheduling. Hosts for real
//! UI frameworks implement [`Host`]; [`TestHost`] (feature `testing`) is an
//! in-memory one.
//!
//! ## Example
//!
//! ```rust
//! use oxide_viewmodel::{
//!     ActionKey, ActionPayload, Deps, Effect, EffectSpec, TestHost, ViewModel,
//!     ViewModelDefinition,
//! };
//!
//! #[derive(Clone)]
//! struct Counter { count: i32 }
//!
//! const ADD: ActionKey<i32> = ActionKey::new("add");
//! const RESET: ActionKey<()> = ActionKey::new("reset");
//!
//! let use_counter = ViewModel::new(
//!     ViewModelDefinition::new(Counter { count: 0 })
//!         .action(ADD, |s: &mut Counter, a: ActionPayload<i32>| s.count += a.payload)
//!         .action(RESET, |s: &mut Counter, _: ActionPayload<()>| s.count = 0)
//!         .effects(|provider| {
//!             provider.add(|cx| {
//!                 let count = cx.state.count;
//!                 EffectSpec::new(
//!                     Effect::new(move || println!("count is now {count}")),
//!                     Deps::on(count),
//!                 )
//!             });
//!         }),
//! )
//! .build();
//!
//! let mut host = TestHost::new();
//! let render = host.render(|h| use_counter.call(h, None)).unwrap();
//! assert_eq!(render.state.count, 0);
//!
//! render.actions.call(ADD, 5);
//! let render = host.render(|h| use_counter.call(h, None)).unwrap();
//! assert_eq!(render.state.count, 5);
//!
//! render.actions.call(RESET, ());
//! let render = host.render(|h| use_counter.call(h, None)).unwrap();
//! assert_eq!(render.state.count, 0);
//! ```
//!
//! Alongside the view model, [`shallow_equal`] and [`use_derived_props`] detect
//! one-level changes in values between renders.

// Module declarations
mod action;
mod derived;
mod dispatcher;
mod effect;
mod equality;
mod host;
mod view_model;

// Public re-exports
pub use action::{Action, ActionKey, ActionPayload, ActionWrapper, ActionWrappers, Actions};
pub use derived::{use_derived_props, ChangeNotifier};
pub use dispatcher::Dispatcher;
pub use effect::{Cleanup, Deps, Effect, EffectContext, EffectProvider, EffectSpec};
pub use equality::{shallow_equal, shallow_equal_with, EqualityMode, Kind, ShallowEq, Value};
pub use host::{Host, HostError, RenderRequester, RenderRequests};
pub use view_model::{InitialState, UseViewModel, ViewModel, ViewModelDefinition, ViewModelRender};

// Test utilities (only available with 'testing' feature or during tests)
#[cfg(any(test, feature = "testing"))]
pub use host::TestHost;
