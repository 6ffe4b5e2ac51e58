pub mod player;
pub mod replay;
mod settings;
pub mod track;
pub mod vehicle_location;
pub mod weather;

pub use settings::{Settings, WallPolicy, GLOBAL_CONFIG};
