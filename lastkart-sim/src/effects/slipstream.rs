use glam::DVec2;

use crate::physics::vehicle_entity::VehicleEntity;
use crate::physics::REFERENCE_DT;

// For every position, the speed multiplier it earns from drafting over one
// reference tick: one `boost` for each other vehicle closer than `range`.
pub fn slipstream_factors(positions: &[DVec2], range: f64, boost: f64) -> Vec<f64> {
    positions
        .iter()
        .enumerate()
        .map(|(index, position)| {
            let nearby = positions
                .iter()
                .enumerate()
                .filter(|(other_index, other)| {
                    *other_index != index && position.distance(**other) < range
                })
                .count();
            boost.powi(nearby as i32)
        })
        .collect()
}

// The boost compounds over time like friction does, so a tick of length dt
// (seconds) gets factor^(dt / REFERENCE_DT).
pub fn apply_slipstream(vehicles: &mut [&mut VehicleEntity], range: f64, boost: f64, dt: f64) {
    let scale = dt.max(0.0) / REFERENCE_DT;
    let positions: Vec<DVec2> = vehicles.iter().map(|vehicle| vehicle.position()).collect();
    let factors = slipstream_factors(&positions, range, boost);

    for (vehicle, factor) in vehicles.iter_mut().zip(factors) {
        if factor != 1.0 {
            vehicle.scale_speed(factor.powf(scale));
        }
    }
}
