use std::time::Duration;

use lastkart_core::player::lap_info::{CheckpointID, LapNumber};
use lastkart_core::player::VehicleID;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RacePhase {
    // Vehicles sit on the grid and controls are ignored until the
    // countdown runs out
    CountingDown { remaining: Duration },
    // The race clock is running
    Racing,
    // Every competitor reached the lap goal; show standings
    AllFinished,
    // The race clock hit its limit before everyone finished
    TimedOut,
}

impl RacePhase {
    pub fn is_over(&self) -> bool {
        matches!(self, RacePhase::AllFinished | RacePhase::TimedOut)
    }
}

// Things that happened during a tick, in the order they happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RaceEvent {
    Started,
    CheckpointVisited {
        vehicle: VehicleID,
        checkpoint: CheckpointID,
    },
    FalseFinish {
        vehicle: VehicleID,
    },
    LapCompleted {
        vehicle: VehicleID,
        lap: LapNumber,
    },
    Finished {
        vehicle: VehicleID,
        finish_time: Duration,
    },
    AllFinished,
    TimedOut,
}
