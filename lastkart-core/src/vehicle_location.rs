use std::f64::consts::FRAC_PI_2;

use glam::DVec2;
use serde::{Deserialize, Serialize};

// VehicleLocation is the part of a vehicle the outside world draws: where it
// is and which way it points. Heading 0 points up-screen and grows
// clockwise (the surface's y axis points down).
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq)]
pub struct VehicleLocation {
    pub position: DVec2,
    pub heading: f64,
}

impl VehicleLocation {
    pub fn new(position: DVec2, heading: f64) -> Self {
        Self { position, heading }
    }

    // unit vector the vehicle drives along when its velocity is positive
    pub fn forward(&self) -> DVec2 {
        let angle = self.heading - FRAC_PI_2;
        DVec2::new(angle.cos(), angle.sin())
    }
}
