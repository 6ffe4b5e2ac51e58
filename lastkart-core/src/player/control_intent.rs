use serde::{Deserialize, Serialize};

// ControlIntent is what a driver (a person on a keyboard or a rule-based
// driver) wants a vehicle to do for one tick. Anything the source doesn't
// mention is off.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ControlIntent {
    pub throttle: bool,
    pub brake_reverse: bool,
    pub steer_left: bool,
    pub steer_right: bool,
    pub handbrake: bool,
}

impl ControlIntent {
    pub const IDLE: ControlIntent = ControlIntent {
        throttle: false,
        brake_reverse: false,
        steer_left: false,
        steer_right: false,
        handbrake: false,
    };

    // net steering input: +1 is right, -1 is left, both at once cancel out
    pub fn turn(&self) -> f64 {
        let mut turn = 0.0;
        if self.steer_right {
            turn += 1.0;
        }
        if self.steer_left {
            turn -= 1.0;
        }
        turn
    }

    // combine two sources for the same vehicle (keyboard and gamepad)
    pub fn merge(self, other: ControlIntent) -> ControlIntent {
        ControlIntent {
            throttle: self.throttle || other.throttle,
            brake_reverse: self.brake_reverse || other.brake_reverse,
            steer_left: self.steer_left || other.steer_left,
            steer_right: self.steer_right || other.steer_right,
            handbrake: self.handbrake || other.handbrake,
        }
    }
}
