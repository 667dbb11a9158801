mod counter_view_model;

use std::sync::Arc;
use oxide_viewmodel::{TestHost, UseViewModel, ViewModelRender};
pub(crate) use counter_view_model::*;

mod dispatch_and_render_tests;
mod effect_scheduling_tests;

pub(crate) struct CounterTest {
    pub(crate) host: TestHost,
    pub(crate) use_counter: UseViewModel<Counter>,
}

impl CounterTest {
    pub(crate) fn render(&mut self) -> ViewModelRender<Counter> {
        let use_counter = self.use_counter.clone();
        self.host
            .render(|host| use_counter.call(host, None))
            .expect("hook order never changes in these tests")
    }
}

pub(crate) fn build_counter_test(
    observer: MockCountObserver,
    mount: MockMountDependency,
) -> CounterTest {
    let view_model = counter_view_model(Arc::new(observer), Arc::new(mount));

    CounterTest {
        host: TestHost::new(),
        use_counter: view_model.build(),
    }
}

// For tests that only care about state; effects still run but are not asserted.
pub(crate) fn given_quiet_effects_with_step(step: i32) -> CounterTest {
    let mut observer = MockCountObserver::new();
    observer.expect_count_changed().returning(|_| ());
    observer.expect_count_released().returning(|_| ());

    let mut mount = MockMountDependency::new();
    mount.expect_initial_step().return_const(step);

    build_counter_test(observer, mount)
}
