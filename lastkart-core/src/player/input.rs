use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::control_intent::ControlIntent;

const GAMEPAD_DEAD_ZONE: f32 = 0.2;

// The state of the (single) attached gamepad as last polled by whatever owns
// the device: stick axes in [-1, 1] (y grows downwards) and the face button
// used as the handbrake.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct GamepadState {
    pub stick_x: f32,
    pub stick_y: f32,
    pub handbrake_pressed: bool,
}

impl GamepadState {
    pub fn control_intent(&self) -> ControlIntent {
        ControlIntent {
            throttle: self.stick_y < -GAMEPAD_DEAD_ZONE,
            brake_reverse: self.stick_y > GAMEPAD_DEAD_ZONE,
            steer_left: self.stick_x < -GAMEPAD_DEAD_ZONE,
            steer_right: self.stick_x > GAMEPAD_DEAD_ZONE,
            handbrake: self.handbrake_pressed,
        }
    }
}

// InputSnapshot is an explicit copy of the input devices for one tick. Key
// names are stored lowercased so "W" and "w" are the same key.
#[derive(Clone, Debug, Default)]
pub struct InputSnapshot {
    pressed: HashSet<String>,
    pub gamepad: Option<GamepadState>,
}

impl InputSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: &str) {
        self.pressed.insert(key.to_lowercase());
    }

    pub fn release(&mut self, key: &str) {
        self.pressed.remove(&key.to_lowercase());
    }

    pub fn is_pressed(&self, key: &str) -> bool {
        self.pressed.contains(&key.to_lowercase())
    }
}

// Which keys drive which vehicle.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct KeyBindings {
    pub throttle: String,
    pub brake_reverse: String,
    pub steer_left: String,
    pub steer_right: String,
    pub handbrake: Option<String>,
    pub reads_gamepad: bool,
}

impl KeyBindings {
    pub fn player_one() -> Self {
        KeyBindings {
            throttle: "w".to_string(),
            brake_reverse: "s".to_string(),
            steer_left: "a".to_string(),
            steer_right: "d".to_string(),
            handbrake: Some(" ".to_string()),
            reads_gamepad: true,
        }
    }

    pub fn player_two() -> Self {
        KeyBindings {
            throttle: "arrowup".to_string(),
            brake_reverse: "arrowdown".to_string(),
            steer_left: "arrowleft".to_string(),
            steer_right: "arrowright".to_string(),
            handbrake: None,
            reads_gamepad: false,
        }
    }

    // bindings for the n-th human seat; anything past the second seat has
    // nothing left on the keyboard
    pub fn for_seat(seat: usize) -> Option<Self> {
        match seat {
            0 => Some(KeyBindings::player_one()),
            1 => Some(KeyBindings::player_two()),
            _ => None,
        }
    }

    pub fn control_intent(&self, input: &InputSnapshot) -> ControlIntent {
        let keyboard = ControlIntent {
            throttle: input.is_pressed(&self.throttle),
            brake_reverse: input.is_pressed(&self.brake_reverse),
            steer_left: input.is_pressed(&self.steer_left),
            steer_right: input.is_pressed(&self.steer_right),
            handbrake: self
                .handbrake
                .as_ref()
                .map_or(false, |key| input.is_pressed(key)),
        };

        match (self.reads_gamepad, input.gamepad) {
            (true, Some(gamepad)) => keyboard.merge(gamepad.control_intent()),
            _ => keyboard,
        }
    }
}
