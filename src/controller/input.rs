/// Event-driven decoding of raw device events into a latched controller state.
use std::collections::HashMap;

use winit::keyboard::KeyCode;

/// Mouse button bitflags, combined via bitwise OR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MouseButtons(pub u8);

impl MouseButtons {
    pub const NONE: Self = Self(0);
    pub const LEFT: Self = Self(1 << 0);
    pub const MIDDLE: Self = Self(1 << 1);
    pub const RIGHT: Self = Self(1 << 2);

    /// Returns true if `self` contains all bits in `other`.
    #[must_use]
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }
}

impl std::ops::BitOr for MouseButtons {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Platform-independent input events
#[derive(Debug, Clone)]
pub enum InputEvent {
    KeyDown(KeyCode),
    KeyUp(KeyCode),
    /// One mouse-state sample: cursor position plus held buttons.
    MouseAxes { x: f32, y: f32, buttons: MouseButtons },
}

/// Movement actions a key can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveForward,
    MoveBackward,
    StrafeLeft,
    StrafeRight,
}

/// Explicit key-code to action mapping. Unmapped keys decode to nothing.
#[derive(Debug, Clone)]
pub struct KeyMap {
    bindings: HashMap<KeyCode, Action>,
}

impl Default for KeyMap {
    fn default() -> Self {
        let mut bindings = HashMap::new();
        bindings.insert(KeyCode::KeyW, Action::MoveForward);
        bindings.insert(KeyCode::KeyS, Action::MoveBackward);
        bindings.insert(KeyCode::KeyA, Action::StrafeLeft);
        bindings.insert(KeyCode::KeyD, Action::StrafeRight);
        bindings.insert(KeyCode::ArrowUp, Action::MoveForward);
        bindings.insert(KeyCode::ArrowDown, Action::MoveBackward);
        bindings.insert(KeyCode::ArrowLeft, Action::StrafeLeft);
        bindings.insert(KeyCode::ArrowRight, Action::StrafeRight);
        Self { bindings }
    }
}

impl KeyMap {
    pub fn action_for(&self, code: KeyCode) -> Option<Action> {
        self.bindings.get(&code).copied()
    }
}

/// Request to move the OS cursor back to the drag anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorWarp {
    pub x: f32,
    pub y: f32,
}

/// Latched movement flags plus the accumulated look delta.
///
/// Mutated only by discrete events via [`InputState::process_event`]; the
/// integration step reads the flags and drains the look delta once per tick.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub forward: bool,
    pub backward: bool,
    pub strafe_left: bool,
    pub strafe_right: bool,
    pub look_delta: (f32, f32),
    /// Cursor position where the current middle-drag gesture started.
    pub drag_anchor: Option<(f32, f32)>,
    keymap: KeyMap,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event. Returns a [`CursorWarp`] when the cursor should be
    /// moved back to the drag anchor, so each drag sample reports a small
    /// delta relative to a fixed reference instead of running off-screen.
    pub fn process_event(&mut self, event: &InputEvent) -> Option<CursorWarp> {
        match event {
            InputEvent::KeyDown(code) => {
                if let Some(action) = self.keymap.action_for(*code) {
                    self.set_action(action, true);
                }
                None
            }
            InputEvent::KeyUp(code) => {
                if let Some(action) = self.keymap.action_for(*code) {
                    self.set_action(action, false);
                }
                None
            }
            InputEvent::MouseAxes { x, y, buttons } => {
                if buttons.contains(MouseButtons::MIDDLE) {
                    // First sample of a drag is the reference point, not a delta.
                    let (ax, ay) = *self.drag_anchor.get_or_insert((*x, *y));
                    self.look_delta.0 += x - ax;
                    self.look_delta.1 += y - ay;
                    Some(CursorWarp { x: ax, y: ay })
                } else {
                    if self.drag_anchor.is_some() {
                        self.drag_anchor = None;
                    }
                    None
                }
            }
        }
    }

    /// Take the accumulated look delta, leaving zero behind.
    pub fn consume_look(&mut self) -> (f32, f32) {
        std::mem::take(&mut self.look_delta)
    }

    fn set_action(&mut self, action: Action, held: bool) {
        match action {
            Action::MoveForward => self.forward = held,
            Action::MoveBackward => self.backward = held,
            Action::StrafeLeft => self.strafe_left = held,
            Action::StrafeRight => self.strafe_right = held,
        }
    }
}
