use std::process;

use log::{error, info};

use lastkart_core::player::input::InputSnapshot;
use lastkart_core::replay::ReplayWriter;
use lastkart_core::track::Track;
use lastkart_core::GLOBAL_CONFIG;

mod checkpoints;
mod drivers;
mod effects;
mod game;
mod logging;
mod physics;
mod progress;
mod spawn;

fn main() {
    if let Err(e) = logging::setup_logging(&GLOBAL_CONFIG.log_level) {
        eprintln!("could not set up logging: {}", e);
    }

    let track = match &GLOBAL_CONFIG.track_file {
        Some(path) => match Track::load(path) {
            Ok(track) => track,
            Err(e) => {
                error!(target: "setup", "could not load track {}: {}", path, e);
                process::exit(1);
            }
        },
        None => Track::default_oval(
            GLOBAL_CONFIG.surface_width,
            GLOBAL_CONFIG.surface_height,
            GLOBAL_CONFIG.boundary_inset,
        ),
    };
    info!(
        target: "setup",
        "racing {} laps on {} with {} checkpoints",
        GLOBAL_CONFIG.lap_goal,
        track.name,
        track.checkpoint_count()
    );

    let mut race = game::Race::from_settings(track, &GLOBAL_CONFIG);
    info!(
        target: "setup",
        "{} vehicles on the grid, weather is {:?}",
        race.competitors().len(),
        race.weather()
    );

    // there is no window to read keys from, so every tick sees an idle keyboard
    let mut input = |_tick: u64| InputSnapshot::new();

    let result = match &GLOBAL_CONFIG.replay_path {
        Some(path) => match ReplayWriter::create(path) {
            Ok(mut writer) => race.run(&mut input, Some(&mut writer)),
            Err(e) => {
                error!(target: "setup", "could not create replay {}: {}", path, e);
                process::exit(1);
            }
        },
        None => race.run::<_, std::io::Sink>(&mut input, None),
    };

    if let Err(e) = result {
        error!(target: "replay", "replay could not be written: {}", e);
        process::exit(1);
    }

    info!(
        target: "race",
        "race ended: {:?} after {} ticks, {:.3}s of racing",
        race.phase(),
        race.tick_count(),
        race.race_time().as_secs_f64()
    );
    for (placement, id, finish_time) in race.placements() {
        match finish_time {
            Some(time) => info!(target: "race", "{}. vehicle {} in {:.3}s", placement, id, time.as_secs_f64()),
            None => info!(target: "race", "{}. vehicle {} did not finish", placement, id),
        }
    }
}
