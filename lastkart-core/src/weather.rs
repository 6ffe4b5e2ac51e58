use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Weather {
    Sun,
    Rain,
    Night,
    Snow,
}

impl Weather {
    pub const ALL: [Weather; 4] = [Weather::Sun, Weather::Rain, Weather::Night, Weather::Snow];

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Weather {
        Weather::ALL[rng.gen_range(0..Weather::ALL.len())]
    }

    // fraction of a vehicle's top speed that is reachable in this weather;
    // night is only darker, it doesn't make the track slippery
    pub fn speed_factor(&self) -> f64 {
        match self {
            Weather::Sun | Weather::Night => 1.0,
            Weather::Rain => 0.8,
            Weather::Snow => 0.7,
        }
    }
}

impl Default for Weather {
    fn default() -> Self {
        Weather::Sun
    }
}
