use std::time::Duration;

use lastkart_core::Settings;

pub mod slipstream;
pub mod tire_marks;
pub mod weather;

// Tuning for the speed modifiers applied after each integration step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectSettings {
    pub slipstream_range: f64,
    pub slipstream_boost: f64,
    pub tire_mark_lifetime: Duration,
    pub tire_mark_radius: f64,
    pub tire_mark_boost: f64,
    pub tire_mark_spacing: f64,
}

impl EffectSettings {
    pub fn from_settings(settings: &Settings) -> Self {
        EffectSettings {
            slipstream_range: settings.slipstream_range,
            slipstream_boost: settings.slipstream_boost,
            tire_mark_lifetime: Duration::from_millis(settings.tire_mark_lifetime_ms),
            tire_mark_radius: settings.tire_mark_radius,
            tire_mark_boost: settings.tire_mark_boost,
            tire_mark_spacing: settings.tire_mark_spacing,
        }
    }
}

impl Default for EffectSettings {
    fn default() -> Self {
        EffectSettings {
            slipstream_range: 50.0,
            slipstream_boost: 1.01,
            tire_mark_lifetime: Duration::from_millis(5000),
            tire_mark_radius: 10.0,
            tire_mark_boost: 1.1,
            tire_mark_spacing: 12.0,
        }
    }
}
