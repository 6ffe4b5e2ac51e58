use std::f64::consts::{PI, TAU};

use glam::DVec2;

use lastkart_core::player::control_intent::ControlIntent;
use lastkart_core::player::input::{InputSnapshot, KeyBindings};
use lastkart_core::player::lap_info::LapRecord;
use lastkart_core::replay::DriverKind;
use lastkart_core::track::Track;

use crate::physics::vehicle_entity::VehicleEntity;

// Anything that can decide what a vehicle does this tick. Implementations
// must not keep state between calls: asking twice gives the same answer.
pub trait Driver {
    fn control_intent(&self, vehicle: &VehicleEntity, input: &InputSnapshot) -> ControlIntent;
}

// a person at the keyboard (and maybe a gamepad)
impl Driver for KeyBindings {
    fn control_intent(&self, _vehicle: &VehicleEntity, input: &InputSnapshot) -> ControlIntent {
        KeyBindings::control_intent(self, input)
    }
}

// Drives towards the middle of the lowest-numbered checkpoint it hasn't
// crossed this lap, then towards the finish line.
#[derive(Clone, Debug)]
pub struct RuleBasedDriver {
    checkpoint_targets: Vec<DVec2>,
    finish_target: DVec2,
    // heading error (radians) that is close enough to not bother steering
    steer_dead_band: f64,
    // heading error above which it's worth slowing down for the corner
    brake_angle: f64,
    // only brake above this fraction of top speed, so braking never
    // turns into reversing
    brake_speed_fraction: f64,
}

fn wrap_angle(angle: f64) -> f64 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

impl RuleBasedDriver {
    pub fn new(track: &Track) -> Self {
        RuleBasedDriver {
            checkpoint_targets: track.checkpoints.iter().map(|c| c.midpoint()).collect(),
            finish_target: track.finish_line.midpoint(),
            steer_dead_band: 0.05,
            brake_angle: 0.6,
            brake_speed_fraction: 0.4,
        }
    }

    pub fn target(&self, lap_record: &LapRecord) -> DVec2 {
        lap_record
            .next_unvisited()
            .and_then(|id| self.checkpoint_targets.get(id).copied())
            .unwrap_or(self.finish_target)
    }

    pub fn decide(&self, vehicle: &VehicleEntity) -> ControlIntent {
        let to_target = self.target(&vehicle.lap_record) - vehicle.position();
        if to_target.length_squared() == 0.0 {
            return ControlIntent {
                throttle: true,
                ..ControlIntent::IDLE
            };
        }

        // invert forward() = (sin h, -cos h)
        let desired_heading = to_target.x.atan2(-to_target.y);
        let error = wrap_angle(desired_heading - vehicle.heading());

        let sharp_turn = error.abs() > self.brake_angle;
        let fast = vehicle.velocity > vehicle.stats().max_speed * self.brake_speed_fraction;
        let braking = sharp_turn && fast;

        ControlIntent {
            throttle: !braking,
            brake_reverse: braking,
            steer_left: error < -self.steer_dead_band,
            steer_right: error > self.steer_dead_band,
            handbrake: false,
        }
    }
}

impl Driver for RuleBasedDriver {
    fn control_intent(&self, vehicle: &VehicleEntity, _input: &InputSnapshot) -> ControlIntent {
        self.decide(vehicle)
    }
}

pub enum Controller {
    Human(KeyBindings),
    RuleBased(RuleBasedDriver),
}

impl Controller {
    pub fn kind(&self) -> DriverKind {
        match self {
            Controller::Human(_) => DriverKind::Human,
            Controller::RuleBased(_) => DriverKind::RuleBased,
        }
    }
}

impl Driver for Controller {
    fn control_intent(&self, vehicle: &VehicleEntity, input: &InputSnapshot) -> ControlIntent {
        match self {
            Controller::Human(bindings) => Driver::control_intent(bindings, vehicle, input),
            Controller::RuleBased(driver) => driver.control_intent(vehicle, input),
        }
    }
}
