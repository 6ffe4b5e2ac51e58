use std::cmp::Ordering;
use std::time::Duration;

use lastkart_core::player::lap_info::LapNumber;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VehicleProgress {
    Racing { lap: LapNumber, checkpoints: usize },
    Finished { finish_time: Duration },
}

impl VehicleProgress {
    pub fn is_finished(&self) -> bool {
        matches!(self, VehicleProgress::Finished { .. })
    }

    pub fn finish_time(&self) -> Option<Duration> {
        match self {
            VehicleProgress::Finished { finish_time } => Some(*finish_time),
            VehicleProgress::Racing { .. } => None,
        }
    }

    // Less means ahead in the standings
    pub fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (
                VehicleProgress::Racing {
                    lap: self_lap,
                    checkpoints: self_checkpoints,
                },
                VehicleProgress::Racing {
                    lap: other_lap,
                    checkpoints: other_checkpoints,
                },
            ) => {
                if self_lap != other_lap {
                    self_lap.cmp(other_lap).reverse()
                } else {
                    self_checkpoints.cmp(other_checkpoints).reverse()
                }
            }
            (VehicleProgress::Finished { .. }, VehicleProgress::Racing { .. }) => Ordering::Less,
            (VehicleProgress::Racing { .. }, VehicleProgress::Finished { .. }) => Ordering::Greater,
            (
                VehicleProgress::Finished { finish_time },
                VehicleProgress::Finished {
                    finish_time: other_finish_time,
                },
            ) => finish_time.cmp(other_finish_time),
        }
    }
}
