use buildandchill::input::{HeldDirections, InputTracker, KeyCode, MoveDirection::*};

#[test]
fn wasd_and_arrows_are_equivalent() {
    let pairs = [
        (KeyCode::ArrowUp, KeyCode::KeyW, Up),
        (KeyCode::ArrowDown, KeyCode::KeyS, Down),
        (KeyCode::ArrowLeft, KeyCode::KeyA, Left),
        (KeyCode::ArrowRight, KeyCode::KeyD, Right),
    ];
    for (arrow, letter, dir) in pairs {
        let mut a = InputTracker::new();
        a.on_key_down(arrow);
        let mut b = InputTracker::new();
        b.on_key_down(letter);
        assert_eq!(a.held_directions(), HeldDirections::from_slice(&[dir]));
        assert_eq!(a.held_directions(), b.held_directions());
    }
}

#[test]
fn repeated_key_down_is_idempotent() {
    let mut input = InputTracker::new();
    input.on_key_down(KeyCode::KeyD);
    input.clear_frame_state();
    input.on_key_down(KeyCode::KeyD);
    assert!(input.is_key_held(KeyCode::KeyD));
    assert!(!input.is_key_pressed(KeyCode::KeyD), "auto-repeat is not a new press");
    input.on_key_up(KeyCode::KeyD);
    assert!(!input.held_directions().any());
}

#[test]
fn alias_keeps_direction_held_until_both_released() {
    let mut input = InputTracker::new();
    input.on_key_down(KeyCode::ArrowRight);
    input.on_key_down(KeyCode::KeyD);
    input.on_key_up(KeyCode::ArrowRight);
    assert!(input.held_directions().right);
    input.on_key_up(KeyCode::KeyD);
    assert!(!input.held_directions().right);
}

#[test]
fn unrelated_keys_do_not_move() {
    let mut input = InputTracker::new();
    input.on_key_down(KeyCode::Space);
    input.on_key_down(KeyCode::KeyQ);
    assert_eq!(input.held_directions(), HeldDirections::default());
}

#[test]
fn release_all_clears_held_keys() {
    let mut input = InputTracker::new();
    input.on_key_down(KeyCode::ArrowUp);
    input.on_key_down(KeyCode::ArrowLeft);
    input.release_all();
    assert!(!input.held_directions().any());
    assert!(input.keys_held.is_empty());
}

#[test]
fn custom_bindings_extend_movement() {
    let mut input = InputTracker::new();
    input.bindings_mut().bind(Up, KeyCode::KeyK);
    input.on_key_down(KeyCode::KeyK);
    assert!(input.held_directions().up);
}
