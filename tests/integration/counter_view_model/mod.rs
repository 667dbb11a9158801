use std::sync::Arc;

use oxide_viewmodel::{
    ActionKey, ActionPayload, Cleanup, Deps, Effect, EffectSpec, ViewModel, ViewModelDefinition,
};

pub(crate) const INCREMENT: ActionKey<()> = ActionKey::new("increment");
pub(crate) const ADD: ActionKey<i32> = ActionKey::new("add");
pub(crate) const SET_STEP: ActionKey<i32> = ActionKey::new("set_step");

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Counter {
    pub(crate) count: i32,
    pub(crate) step: i32,
}

#[cfg_attr(test, mockall::automock)]
pub(crate) trait CountObserver {
    fn count_changed(&self, count: i32);
    fn count_released(&self, count: i32);
}

#[cfg_attr(test, mockall::automock)]
pub(crate) trait MountDependency {
    fn initial_step(&self) -> i32;
}

/// A counter with two effects: one observing `count`, one loading the step
/// size on mount through the dispatcher.
pub(crate) fn counter_view_model(
    observer: Arc<dyn CountObserver + Send + Sync>,
    mount: Arc<dyn MountDependency + Send + Sync>,
) -> ViewModel<Counter> {
    ViewModel::new(
        ViewModelDefinition::new(Counter { count: 0, step: 1 })
            .action(INCREMENT, |s: &mut Counter, _: ActionPayload<()>| s.count += s.step)
            .action(ADD, |s: &mut Counter, a: ActionPayload<i32>| s.count += a.payload)
            .action(SET_STEP, |s: &mut Counter, a: ActionPayload<i32>| s.step = a.payload)
            .effects(move |provider| {
                provider.add(move |cx| {
                    let count = cx.state.count;
                    let observer = observer.clone();
                    EffectSpec::new(
                        Effect::with_cleanup(move || {
                            observer.count_changed(count);
                            Cleanup::new(move || observer.count_released(count))
                        }),
                        Deps::on(count),
                    )
                });
                provider.add(move |cx| {
                    let dispatch = cx.dispatch.clone();
                    let set_step = cx.actions.get(SET_STEP).cloned();
                    let mount = mount.clone();
                    EffectSpec::new(
                        Effect::new(move || {
                            if let Some(set_step) = set_step {
                                dispatch.dispatch(&set_step, mount.initial_step());
                            }
                        }),
                        Deps::once(),
                    )
                });
            }),
    )
}
