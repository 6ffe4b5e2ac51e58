use glam::DVec2;

use lastkart_core::player::VehicleID;
use lastkart_core::track::Track;
use lastkart_core::vehicle_location::VehicleLocation;

use crate::physics::vehicle_entity::{PlayArea, VehicleEntity, VehicleStats};

// distance of the first grid row behind the finish line
const GRID_LEAD: f64 = 40.0;
// extra distance for each grid slot after the first
const GRID_ROW_GAP: f64 = 25.0;
// sideways spacing of the three grid columns
const GRID_COLUMN_GAP: f64 = 35.0;

// Grid slots are staggered behind the middle of the finish line, three
// across, all facing the track's start heading. The first crossing of the
// finish line from the grid is a false finish.
pub fn get_starting_location(track: &Track, slot: usize) -> VehicleLocation {
    let facing = VehicleLocation::new(DVec2::ZERO, track.start_heading).forward();
    let finish = track.finish_line;
    let across = (finish.b - finish.a).normalize_or_zero();

    let column = (slot % 3) as f64 - 1.0;
    let behind = GRID_LEAD + GRID_ROW_GAP * slot as f64;

    VehicleLocation::new(
        finish.midpoint() - facing * behind + across * column * GRID_COLUMN_GAP,
        track.start_heading,
    )
}

pub fn spawn_vehicle(
    id: VehicleID,
    track: &Track,
    stats: VehicleStats,
    play_area: PlayArea,
) -> VehicleEntity {
    let location = get_starting_location(track, id);
    let (position, _) = play_area.clamp(location.position);

    VehicleEntity::new(
        id,
        VehicleLocation::new(position, location.heading),
        stats,
        play_area,
        track.checkpoint_count(),
    )
}
