use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File};
use lazy_static::lazy_static;
use serde::Deserialize;

use crate::weather::Weather;

// What happens to a vehicle's speed when it runs into the edge of the
// playable area. The position is always clamped; only the speed differs.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WallPolicy {
    Clamp,
    Stop,
}

#[derive(Deserialize)]
pub struct Settings {
    // loop cadence
    pub tick_ms: u64,
    pub max_tick_ms: u64,
    pub realtime: bool,

    // race shape
    pub player_amount: usize,
    pub ai_amount: usize,
    pub lap_goal: u32,
    pub countdown_ms: u64,
    pub max_race_ms: u64,
    pub headless_autopilot: bool,

    // drawable surface
    pub surface_width: f64,
    pub surface_height: f64,
    pub boundary_inset: f64,

    // vehicle tunables
    pub max_speed: f64,
    pub accel_rate: f64,
    pub brake_rate: f64,
    pub turn_rate: f64,
    pub reverse_cap: f64,
    pub friction_coefficient: f64,
    pub handbrake_coefficient: f64,
    pub speed_normalizer: f64,
    pub wall_policy: WallPolicy,

    // effects
    pub slipstream_range: f64,
    pub slipstream_boost: f64,
    pub tire_mark_lifetime_ms: u64,
    pub tire_mark_radius: f64,
    pub tire_mark_boost: f64,
    pub tire_mark_spacing: f64,
    pub weather: Option<Weather>,
    pub weather_seed: Option<u64>,

    pub track_file: Option<String>,
    pub replay_path: Option<String>,
    pub log_level: String,
}

impl Settings {
    fn new() -> Result<Settings, ConfigError> {
        Settings::build(
            Settings::defaults()?.add_source(File::with_name("config.yaml").required(false)),
        )
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("tick_ms", 16)?
            .set_default("max_tick_ms", 32)?
            .set_default("realtime", false)?
            .set_default("player_amount", 2)?
            .set_default("ai_amount", 1)?
            .set_default("lap_goal", 3)?
            .set_default("countdown_ms", 3000)?
            .set_default("max_race_ms", 600_000)?
            .set_default("headless_autopilot", true)?
            .set_default("surface_width", 800.0)?
            .set_default("surface_height", 600.0)?
            .set_default("boundary_inset", 60.0)?
            .set_default("max_speed", 5.0)?
            .set_default("accel_rate", 0.1)?
            .set_default("brake_rate", 0.15)?
            .set_default("turn_rate", 0.04)?
            .set_default("reverse_cap", 2.5)?
            .set_default("friction_coefficient", 0.985)?
            .set_default("handbrake_coefficient", 0.92)?
            .set_default("speed_normalizer", 8.0)?
            .set_default("wall_policy", "clamp")?
            .set_default("slipstream_range", 50.0)?
            .set_default("slipstream_boost", 1.01)?
            .set_default("tire_mark_lifetime_ms", 5000)?
            .set_default("tire_mark_radius", 10.0)?
            .set_default("tire_mark_boost", 1.1)?
            .set_default("tire_mark_spacing", 12.0)?
            .set_default("log_level", "info")
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Settings, ConfigError> {
        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    // a zero tick would never move the race clock forward
    fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_ms == 0 {
            return Err(ConfigError::Message("tick_ms must be at least 1".to_string()));
        }
        if self.max_tick_ms == 0 {
            return Err(ConfigError::Message(
                "max_tick_ms must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

lazy_static! {
    pub static ref GLOBAL_CONFIG: Settings = Settings::new().expect("failed to read config file");
}
