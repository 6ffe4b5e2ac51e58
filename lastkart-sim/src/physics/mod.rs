use std::f64::consts::TAU;

use log::trace;

use lastkart_core::player::control_intent::ControlIntent;
use lastkart_core::WallPolicy;

pub mod vehicle_entity;


use vehicle_entity::VehicleEntity;

// The per-tick constants are tuned for a 60Hz loop; other tick lengths are
// scaled against it so a vehicle behaves the same at any frame rate.
pub const REFERENCE_DT: f64 = 1.0 / 60.0;

// coasting below this is treated as standing still
const REST_SPEED: f64 = 0.01;

impl VehicleEntity {
    /* Integrate one tick of driving: speed from the pedals, heading from the
     * steering, then position from both. dt is in seconds. */
    pub fn advance(&mut self, control: ControlIntent, dt: f64) {
        let scale = dt.max(0.0) / REFERENCE_DT;
        let stats = self.stats;
        let position_before = self.location.position;

        self.control_intent = control;

        // throttle and brake stack; friction only acts when both are released
        if control.throttle {
            self.velocity += stats.accel_rate * scale;
        }
        if control.brake_reverse {
            self.velocity -= stats.brake_rate * scale;
        }
        if !control.throttle && !control.brake_reverse {
            self.velocity *= stats.friction_coefficient.powf(scale);
            if self.velocity.abs() < REST_SPEED {
                self.velocity = 0.0;
            }
        }
        // the handbrake bites on top of whatever the pedals did
        if control.handbrake {
            self.velocity *= stats.handbrake_coefficient.powf(scale);
        }
        self.clamp_velocity();

        // steering is stronger at speed, and flips when reversing so the
        // front of the car still swings the way the wheel is turned
        let direction = if self.velocity >= 0.0 { 1.0 } else { -1.0 };
        let steering = control.turn()
            * stats.turn_rate
            * (1.0 + self.velocity.abs() / stats.speed_normalizer)
            * direction
            * scale;
        self.location.heading = (self.location.heading + steering).rem_euclid(TAU);

        self.location.position += self.location.forward() * self.velocity * scale;

        let (clamped, hit_wall) = self.play_area.clamp(self.location.position);
        if hit_wall {
            trace!(target: "physics", "vehicle {} touched the wall at {:?}", self.id, clamped);
            self.location.position = clamped;
            if self.play_area.wall_policy == WallPolicy::Stop {
                self.velocity = 0.0;
            }
        }

        self.previous_position = Some(position_before);
    }
}
