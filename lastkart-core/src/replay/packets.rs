use std::io::{Read, Write};

use bincode::{DefaultOptions, Options, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::player::lap_info::{LapNumber, Placement};
use crate::player::VehicleID;
use crate::track::Track;
use crate::vehicle_location::VehicleLocation;
use crate::weather::Weather;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverKind {
    Human,
    RuleBased,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct VehicleSnapshot {
    pub id: VehicleID,
    pub location: VehicleLocation,
    pub velocity: f64,
    pub lap: LapNumber,
    pub visited: Vec<bool>,
    pub finished: bool,
}

// Everything a renderer needs to draw one tick of the race.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RaceSnapshot {
    pub tick: u64,
    pub race_time_ms: u64,
    pub vehicles: Vec<VehicleSnapshot>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum ReplayPacket {
    // Before the first tick
    RaceStart {
        track: Track,
        weather: Weather,
        drivers: Vec<DriverKind>,
        lap_goal: LapNumber,
    },

    // Once per tick
    Tick(RaceSnapshot),

    // After the last tick; finish time is None for anyone who didn't finish
    RaceEnd {
        placements: Vec<(Placement, VehicleID, Option<u64>)>,
    },
}

pub trait Packet: Serialize + DeserializeOwned {
    fn parse_packet<R: Read>(reader: &mut R) -> Result<Self> {
        DefaultOptions::new().deserialize_from(reader)
    }
    fn packet_size(&self) -> Result<u64> {
        DefaultOptions::new().serialized_size(self)
    }
    fn write_packet<W: Write>(&self, write: &mut W) -> Result<()> {
        DefaultOptions::new().serialize_into(write, self)
    }
}

impl Packet for ReplayPacket {}
