use lastkart_core::weather::Weather;

use crate::physics::vehicle_entity::VehicleEntity;

// Bad weather lowers the top forward speed; reversing is already slow
// enough that it is left alone.
pub fn apply_weather(vehicle: &mut VehicleEntity, weather: Weather) {
    let factor = weather.speed_factor();
    if factor < 1.0 {
        let limit = vehicle.stats().max_speed * factor;
        vehicle.cap_forward_speed(limit);
    }
}
