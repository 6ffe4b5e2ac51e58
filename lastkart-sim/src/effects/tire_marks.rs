use std::collections::HashMap;
use std::time::Duration;

use glam::DVec2;
use log::trace;

use lastkart_core::player::VehicleID;

use super::EffectSettings;
use crate::physics::vehicle_entity::VehicleEntity;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TireMark {
    pub position: DVec2,
    pub laid_by: VehicleID,
    pub laid_at: Duration,
}

// Skid marks left behind by handbraking vehicles. Anyone else who drives
// over a fresh one picks up a burst of speed and wipes it out.
#[derive(Default)]
pub struct TireMarks {
    marks: Vec<TireMark>,
    last_laid: HashMap<VehicleID, DVec2>,
}

impl TireMarks {
    pub fn new() -> Self {
        TireMarks::default()
    }

    #[cfg(test)]
    pub fn marks(&self) -> &[TireMark] {
        &self.marks
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.marks.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    // Drops a mark under the vehicle if it is skidding and has moved far
    // enough from the last mark it laid.
    pub fn lay(&mut self, vehicle: &VehicleEntity, now: Duration, settings: &EffectSettings) {
        if !vehicle.control_intent.handbrake || vehicle.velocity == 0.0 {
            return;
        }

        let position = vehicle.position();
        let far_enough = self
            .last_laid
            .get(&vehicle.id)
            .map_or(true, |last| last.distance(position) >= settings.tire_mark_spacing);

        if far_enough {
            self.marks.push(TireMark {
                position,
                laid_by: vehicle.id,
                laid_at: now,
            });
            self.last_laid.insert(vehicle.id, position);
        }
    }

    pub fn expire(&mut self, now: Duration, lifetime: Duration) {
        self.marks
            .retain(|mark| now.saturating_sub(mark.laid_at) <= lifetime);
    }

    // Consumes every mark the vehicle is sitting on (other than its own) and
    // boosts it once per mark. Returns how many were picked up.
    pub fn collect(&mut self, vehicle: &mut VehicleEntity, settings: &EffectSettings) -> usize {
        let position = vehicle.position();
        let id = vehicle.id;
        let before = self.marks.len();

        self.marks.retain(|mark| {
            mark.laid_by == id || mark.position.distance(position) >= settings.tire_mark_radius
        });

        let collected = before - self.marks.len();
        if collected > 0 {
            vehicle.scale_speed(settings.tire_mark_boost.powi(collected as i32));
            trace!(target: "effects", "vehicle {} drove over {} tire mark(s)", id, collected);
        }
        collected
    }
}
