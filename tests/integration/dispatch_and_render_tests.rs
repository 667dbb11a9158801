use oxide_viewmodel::ActionKey;
use portable_atomic_util::Arc;

use super::{given_quiet_effects_with_step, ADD, INCREMENT, SET_STEP};

#[test]
fn given_first_render_should_expose_initial_state() {
    let mut test = given_quiet_effects_with_step(1);

    let render = test.render();

    assert_eq!(render.state.count, 0);
    assert_eq!(render.state.step, 1);
    assert_eq!(render.actions.len(), 3);
}

#[test]
fn given_mount_effect_dispatches_should_request_render_with_loaded_step() {
    let mut test = given_quiet_effects_with_step(3);

    test.render();
    assert_eq!(test.host.pending_renders(), 1);

    let render = test.render();
    assert_eq!(render.state.step, 3);
    assert_eq!(test.host.pending_renders(), 0);
}

#[test]
fn given_add_dispatched_should_render_new_snapshot() {
    let mut test = given_quiet_effects_with_step(1);

    let before = test.render();
    before.actions.call(ADD, 5);
    let after = test.render();

    assert_eq!(after.state.count, 5);
    assert!(!Arc::ptr_eq(&before.state, &after.state));
    // Earlier snapshots never observe later mutations.
    assert_eq!(before.state.count, 0);
}

#[test]
fn given_increment_after_step_loaded_should_use_loaded_step() {
    let mut test = given_quiet_effects_with_step(4);

    test.render();
    let render = test.render();
    render.actions.call(INCREMENT, ());
    render.actions.call(INCREMENT, ());

    assert_eq!(test.host.pending_renders(), 2);
    assert_eq!(test.render().state.count, 8);
}

#[test]
fn given_several_renders_should_return_identical_action_wrappers() {
    let mut test = given_quiet_effects_with_step(1);

    let first = test.render();
    first.actions.call(ADD, 1);
    let second = test.render();

    assert!(Arc::ptr_eq(&first.actions, &second.actions));
    let increment = first.actions.get(INCREMENT).unwrap();
    assert_eq!(increment.name(), "increment");
    assert!(increment.ptr_eq(second.actions.get(INCREMENT).unwrap()));
    for key in [ADD, SET_STEP] {
        let a = first.actions.get(key).unwrap();
        let b = second.actions.get(key).unwrap();
        assert!(a.ptr_eq(b));
    }
}

#[test]
fn given_two_component_instances_should_keep_state_isolated() {
    let mut left = given_quiet_effects_with_step(1);
    let mut right = given_quiet_effects_with_step(1);
    right.use_counter = left.use_counter.clone();

    left.render().actions.call(ADD, 10);

    assert_eq!(left.render().state.count, 10);
    assert_eq!(right.render().state.count, 0);
}

#[test]
fn given_unknown_action_name_should_not_request_render() {
    const DECREMENT: ActionKey<i32> = ActionKey::new("decrement");
    let mut test = given_quiet_effects_with_step(1);

    test.render();
    test.render();
    let render = test.render();

    assert!(!render.actions.call(DECREMENT, 1));
    assert_eq!(test.host.pending_renders(), 0);
}

#[test]
fn given_known_name_with_other_payload_type_should_not_request_render() {
    const INCREMENT_BY: ActionKey<i32> = ActionKey::new("increment");
    let mut test = given_quiet_effects_with_step(1);

    test.render();
    test.render();
    let render = test.render();

    assert!(render.actions.get(INCREMENT_BY).is_none());
    assert!(!render.actions.call(INCREMENT_BY, 2));
    assert_eq!(test.host.pending_renders(), 0);
}
