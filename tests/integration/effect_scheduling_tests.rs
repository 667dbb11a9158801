use mockall::predicate::eq;
use mockall::Sequence;

use super::{build_counter_test, MockCountObserver, MockMountDependency, ADD};

fn mount_with_step(step: i32) -> MockMountDependency {
    let mut mount = MockMountDependency::new();
    mount.expect_initial_step().times(1).return_const(step);
    mount
}

#[test]
fn given_first_render_should_run_every_effect_once() {
    let mut observer = MockCountObserver::new();
    observer.expect_count_changed().with(eq(0)).times(1).return_const(());
    observer.expect_count_released().never();

    let mut test = build_counter_test(observer, mount_with_step(1));

    test.render();
}

#[test]
fn given_unchanged_deps_should_not_rerun_effects() {
    let mut observer = MockCountObserver::new();
    observer.expect_count_changed().with(eq(0)).times(1).return_const(());
    observer.expect_count_released().never();

    let mut test = build_counter_test(observer, mount_with_step(2));

    // The mount effect changes the step but not the count.
    test.render();
    test.render();
    test.render();

    assert_eq!(test.host.render_count(), 3);
}

#[test]
fn given_count_changed_should_release_previous_effect_before_rerunning() {
    let mut seq = Sequence::new();
    let mut observer = MockCountObserver::new();
    observer
        .expect_count_changed()
        .with(eq(0))
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());
    observer
        .expect_count_released()
        .with(eq(0))
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());
    observer
        .expect_count_changed()
        .with(eq(5))
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());

    let mut test = build_counter_test(observer, mount_with_step(1));

    test.render().actions.call(ADD, 5);
    test.render();
}

#[test]
fn given_unmount_should_release_last_effect() {
    let mut observer = MockCountObserver::new();
    observer.expect_count_changed().times(2).return_const(());
    observer.expect_count_released().with(eq(0)).times(1).return_const(());
    observer.expect_count_released().with(eq(3)).times(1).return_const(());

    let mut test = build_counter_test(observer, mount_with_step(1));

    test.render().actions.call(ADD, 3);
    test.render();
    test.host.unmount();
}
