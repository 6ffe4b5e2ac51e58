pub mod control_intent;
pub mod input;
pub mod lap_info;

pub type VehicleID = usize;
