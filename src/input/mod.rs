use std::collections::{HashMap, HashSet};
use std::hash::Hash;
pub use winit::keyboard::KeyCode;

/// The four cardinal movement directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveDirection {
    Up,
    Down,
    Left,
    Right,
}

/// Snapshot of which movement directions are held this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldDirections {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl HeldDirections {
    pub fn any(&self) -> bool {
        self.up || self.down || self.left || self.right
    }

    pub fn from_slice(dirs: &[MoveDirection]) -> Self {
        let mut held = Self::default();
        for d in dirs {
            match d {
                MoveDirection::Up => held.up = true,
                MoveDirection::Down => held.down = true,
                MoveDirection::Left => held.left = true,
                MoveDirection::Right => held.right = true,
            }
        }
        held
    }
}

/// Keyboard state mutated by key events and read once per tick.
#[derive(Debug)]
pub struct InputTracker {
    pub keys_held: HashSet<KeyCode>,
    /// Keys that went down since the last `clear_frame_state`.
    pub keys_pressed: HashSet<KeyCode>,
    bindings: ActionMap<MoveDirection>,
}

impl InputTracker {
    /// Tracker with arrow keys and WASD bound to the four directions.
    pub fn new() -> Self {
        Self {
            keys_held: HashSet::new(),
            keys_pressed: HashSet::new(),
            bindings: ActionMap::movement(),
        }
    }

    /// Holding a key that is already held is a no-op.
    pub fn on_key_down(&mut self, key: KeyCode) {
        if self.keys_held.insert(key) {
            self.keys_pressed.insert(key);
        }
    }

    pub fn on_key_up(&mut self, key: KeyCode) {
        self.keys_held.remove(&key);
    }

    /// Drop every held key (window lost focus, key-ups will never arrive).
    pub fn release_all(&mut self) {
        self.keys_held.clear();
    }

    pub fn clear_frame_state(&mut self) {
        self.keys_pressed.clear();
    }

    pub fn is_key_held(&self, key: KeyCode) -> bool { self.keys_held.contains(&key) }
    pub fn is_key_pressed(&self, key: KeyCode) -> bool { self.keys_pressed.contains(&key) }

    pub fn held_directions(&self) -> HeldDirections {
        HeldDirections {
            up: self.bindings.is_held(MoveDirection::Up, self),
            down: self.bindings.is_held(MoveDirection::Down, self),
            left: self.bindings.is_held(MoveDirection::Left, self),
            right: self.bindings.is_held(MoveDirection::Right, self),
        }
    }

    pub fn bindings_mut(&mut self) -> &mut ActionMap<MoveDirection> {
        &mut self.bindings
    }
}

/// Maps logical actions to one or more physical keys.
#[derive(Debug, Clone)]
pub struct ActionMap<A: Hash + Eq + Copy> {
    bindings: HashMap<A, Vec<KeyCode>>,
}

impl<A: Hash + Eq + Copy> ActionMap<A> {
    pub fn new() -> Self {
        Self { bindings: HashMap::new() }
    }

    pub fn bind(&mut self, action: A, key: KeyCode) {
        self.bindings.entry(action).or_default().push(key);
    }

    /// Returns true if any key bound to the action is currently held.
    pub fn is_held(&self, action: A, input: &InputTracker) -> bool {
        self.bindings
            .get(&action)
            .is_some_and(|keys| keys.iter().any(|k| input.is_key_held(*k)))
    }
}

impl ActionMap<MoveDirection> {
    /// Arrow keys plus the WASD aliases.
    pub fn movement() -> Self {
        let mut map = Self::new();
        map.bind(MoveDirection::Up, KeyCode::ArrowUp);
        map.bind(MoveDirection::Up, KeyCode::KeyW);
        map.bind(MoveDirection::Down, KeyCode::ArrowDown);
        map.bind(MoveDirection::Down, KeyCode::KeyS);
        map.bind(MoveDirection::Left, KeyCode::ArrowLeft);
        map.bind(MoveDirection::Left, KeyCode::KeyA);
        map.bind(MoveDirection::Right, KeyCode::ArrowRight);
        map.bind(MoveDirection::Right, KeyCode::KeyD);
        map
    }
}

impl Default for InputTracker {
    fn default() -> Self { Self::new() }
}

impl<A: Hash + Eq + Copy> Default for ActionMap<A> {
    fn default() -> Self { Self::new() }
}
