use glam::DVec2;

use lastkart_core::player::{control_intent::ControlIntent, lap_info::LapRecord, VehicleID};
use lastkart_core::vehicle_location::VehicleLocation;
use lastkart_core::{Settings, WallPolicy};

// Per-vehicle tuning. Fixed when the vehicle is spawned.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VehicleStats {
    pub max_speed: f64,
    pub accel_rate: f64,
    pub brake_rate: f64,
    pub turn_rate: f64,
    pub reverse_cap: f64,
    pub friction_coefficient: f64,
    pub handbrake_coefficient: f64,
    pub speed_normalizer: f64,
}

impl VehicleStats {
    pub fn from_settings(settings: &Settings) -> Self {
        VehicleStats {
            max_speed: settings.max_speed,
            accel_rate: settings.accel_rate,
            brake_rate: settings.brake_rate,
            turn_rate: settings.turn_rate,
            reverse_cap: settings.reverse_cap,
            friction_coefficient: settings.friction_coefficient,
            handbrake_coefficient: settings.handbrake_coefficient,
            speed_normalizer: settings.speed_normalizer,
        }
    }
}

// The rectangle vehicles are kept inside: the drawable surface minus an
// inset on every edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayArea {
    pub min: DVec2,
    pub max: DVec2,
    pub wall_policy: WallPolicy,
}

impl PlayArea {
    pub fn new(surface_width: f64, surface_height: f64, inset: f64, wall_policy: WallPolicy) -> Self {
        PlayArea {
            min: DVec2::new(inset, inset),
            max: DVec2::new(surface_width - inset, surface_height - inset),
            wall_policy,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        PlayArea::new(
            settings.surface_width,
            settings.surface_height,
            settings.boundary_inset,
            settings.wall_policy,
        )
    }

    // returns the clamped position and whether any wall was touched
    pub fn clamp(&self, position: DVec2) -> (DVec2, bool) {
        let clamped = DVec2::new(
            position.x.max(self.min.x).min(self.max.x),
            position.y.max(self.min.y).min(self.max.y),
        );
        (clamped, clamped != position)
    }
}

pub struct VehicleEntity {
    pub id: VehicleID,
    pub location: VehicleLocation,
    // signed speed along the heading; negative is reversing
    pub velocity: f64,
    // where the vehicle was before the last tick; None until it has moved once
    pub previous_position: Option<DVec2>,
    // what the vehicle was last told to do
    pub control_intent: ControlIntent,
    pub lap_record: LapRecord,

    pub(super) stats: VehicleStats,
    pub(super) play_area: PlayArea,
}

impl VehicleEntity {
    pub fn new(
        id: VehicleID,
        location: VehicleLocation,
        stats: VehicleStats,
        play_area: PlayArea,
        checkpoint_count: usize,
    ) -> Self {
        VehicleEntity {
            id,
            location,
            velocity: 0.0,
            previous_position: None,
            control_intent: ControlIntent::IDLE,
            lap_record: LapRecord::new(checkpoint_count),
            stats,
            play_area,
        }
    }

    pub fn stats(&self) -> &VehicleStats {
        &self.stats
    }

    #[cfg(test)]
    pub fn play_area(&self) -> &PlayArea {
        &self.play_area
    }

    pub fn position(&self) -> DVec2 {
        self.location.position
    }

    pub fn heading(&self) -> f64 {
        self.location.heading
    }

    pub fn clamp_velocity(&mut self) {
        self.velocity = self
            .velocity
            .max(-self.stats.reverse_cap)
            .min(self.stats.max_speed);
    }

    // multiply the current speed (in whichever direction) and keep the
    // speed limits intact
    pub fn scale_speed(&mut self, factor: f64) {
        self.velocity *= factor;
        self.clamp_velocity();
    }

    pub fn cap_forward_speed(&mut self, limit: f64) {
        if self.velocity > limit {
            self.velocity = limit;
        }
    }
}
