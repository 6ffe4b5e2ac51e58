use std::io::Write;
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use lastkart_core::player::control_intent::ControlIntent;
use lastkart_core::player::input::{InputSnapshot, KeyBindings};
use lastkart_core::player::lap_info::{LapNumber, Placement};
use lastkart_core::player::VehicleID;
use lastkart_core::replay::{
    RaceSnapshot, ReplayError, ReplayPacket, ReplayWriter, VehicleSnapshot,
};
use lastkart_core::track::Track;
use lastkart_core::weather::Weather;
use lastkart_core::Settings;

use crate::checkpoints::{FinishOutcome, LapTracker};
use crate::drivers::{Controller, Driver, RuleBasedDriver};
use crate::effects::slipstream::apply_slipstream;
use crate::effects::tire_marks::TireMarks;
use crate::effects::weather::apply_weather;
use crate::effects::EffectSettings;
use crate::physics::vehicle_entity::{PlayArea, VehicleEntity, VehicleStats};
use crate::progress::VehicleProgress;
use crate::spawn::spawn_vehicle;

pub use self::phase::{RaceEvent, RacePhase};

mod phase;


pub struct RaceConfig {
    pub tick: Duration,
    // longest dt a single tick may simulate, however late it runs
    pub max_tick: Duration,
    pub realtime: bool,
    pub lap_goal: LapNumber,
    pub countdown: Duration,
    pub max_race_time: Duration,
    pub stats: VehicleStats,
    pub play_area: PlayArea,
    pub effects: EffectSettings,
}

impl RaceConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        RaceConfig {
            tick: Duration::from_millis(settings.tick_ms),
            max_tick: Duration::from_millis(settings.max_tick_ms),
            realtime: settings.realtime,
            lap_goal: settings.lap_goal,
            countdown: Duration::from_millis(settings.countdown_ms),
            max_race_time: Duration::from_millis(settings.max_race_ms),
            stats: VehicleStats::from_settings(settings),
            play_area: PlayArea::from_settings(settings),
            effects: EffectSettings::from_settings(settings),
        }
    }
}

// Where a race gets the keyboard and gamepad state for each tick.
pub trait InputSource {
    fn poll(&mut self, tick: u64) -> InputSnapshot;
}

impl<F: FnMut(u64) -> InputSnapshot> InputSource for F {
    fn poll(&mut self, tick: u64) -> InputSnapshot {
        self(tick)
    }
}

pub struct Competitor {
    pub vehicle: VehicleEntity,
    pub controller: Controller,
    pub progress: VehicleProgress,
}

pub struct Race {
    config: RaceConfig,
    track: Track,
    lap_tracker: LapTracker,
    competitors: Vec<Competitor>,
    weather: Weather,
    tire_marks: TireMarks,
    phase: RacePhase,
    tick_count: u64,
    // simulated time since the countdown ended
    race_time: Duration,
}

impl Race {
    // One competitor per controller, placed on the grid in order.
    pub fn new(track: Track, config: RaceConfig, controllers: Vec<Controller>, weather: Weather) -> Self {
        let lap_tracker = LapTracker::new(&track);

        let competitors = controllers
            .into_iter()
            .enumerate()
            .map(|(id, controller)| Competitor {
                vehicle: spawn_vehicle(id, &track, config.stats, config.play_area),
                controller,
                progress: VehicleProgress::Racing {
                    lap: 0,
                    checkpoints: 0,
                },
            })
            .collect();

        let phase = if config.countdown.is_zero() {
            RacePhase::Racing
        } else {
            RacePhase::CountingDown {
                remaining: config.countdown,
            }
        };

        Race {
            config,
            track,
            lap_tracker,
            competitors,
            weather,
            tire_marks: TireMarks::new(),
            phase,
            tick_count: 0,
            race_time: Duration::ZERO,
        }
    }

    // Human seats come first (at most two, one per keyboard layout), then the
    // computer drivers. Without anyone at the keyboard the human seats are
    // driven by the computer too.
    pub fn from_settings(track: Track, settings: &Settings) -> Self {
        let mut controllers: Vec<Controller> = (0..settings.player_amount)
            .filter_map(KeyBindings::for_seat)
            .map(|bindings| {
                if settings.headless_autopilot {
                    Controller::RuleBased(RuleBasedDriver::new(&track))
                } else {
                    Controller::Human(bindings)
                }
            })
            .collect();
        controllers.extend(
            (0..settings.ai_amount).map(|_| Controller::RuleBased(RuleBasedDriver::new(&track))),
        );

        let weather = settings.weather.unwrap_or_else(|| {
            let mut rng = match settings.weather_seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            Weather::random(&mut rng)
        });

        Race::new(track, RaceConfig::from_settings(settings), controllers, weather)
    }

    pub fn phase(&self) -> RacePhase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        self.phase.is_over()
    }

    pub fn weather(&self) -> Weather {
        self.weather
    }

    pub fn competitors(&self) -> &[Competitor] {
        &self.competitors
    }

    pub fn race_time(&self) -> Duration {
        self.race_time
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    // Advance the race by dt (capped at max_tick) with the given input.
    pub fn tick(&mut self, dt: Duration, input: &InputSnapshot) -> Vec<RaceEvent> {
        let dt = dt.min(self.config.max_tick);
        let mut events = Vec::new();
        self.tick_count += 1;

        match self.phase {
            RacePhase::CountingDown { remaining } => {
                if dt >= remaining {
                    info!(target: "race", "race started in {:?} weather", self.weather);
                    self.phase = RacePhase::Racing;
                    events.push(RaceEvent::Started);
                } else {
                    self.phase = RacePhase::CountingDown {
                        remaining: remaining - dt,
                    };
                }
            }
            RacePhase::Racing => self.simulate(dt, input, &mut events),
            RacePhase::AllFinished | RacePhase::TimedOut => {}
        }

        events
    }

    fn simulate(&mut self, dt: Duration, input: &InputSnapshot, events: &mut Vec<RaceEvent>) {
        self.race_time += dt;
        let now = self.race_time;
        let dt_seconds = dt.as_secs_f64();
        let effects = self.config.effects;

        // finished vehicles roll to a stop past the line
        for competitor in &mut self.competitors {
            let intent = if competitor.progress.is_finished() {
                ControlIntent::IDLE
            } else {
                competitor
                    .controller
                    .control_intent(&competitor.vehicle, input)
            };
            competitor.vehicle.advance(intent, dt_seconds);
        }

        self.tire_marks.expire(now, effects.tire_mark_lifetime);
        {
            let mut vehicles: Vec<&mut VehicleEntity> = self
                .competitors
                .iter_mut()
                .map(|competitor| &mut competitor.vehicle)
                .collect();
            apply_slipstream(
                &mut vehicles,
                effects.slipstream_range,
                effects.slipstream_boost,
                dt_seconds,
            );
        }
        for competitor in &mut self.competitors {
            let vehicle = &mut competitor.vehicle;
            self.tire_marks.lay(vehicle, now, &effects);
            self.tire_marks.collect(vehicle, &effects);
            apply_weather(vehicle, self.weather);
            vehicle.clamp_velocity();
        }

        for competitor in &mut self.competitors {
            if competitor.progress.is_finished() {
                continue;
            }

            let vehicle = &mut competitor.vehicle;
            let outcome = self.lap_tracker.evaluate_crossing(vehicle);

            events.extend(
                outcome
                    .newly_visited
                    .iter()
                    .map(|&checkpoint| RaceEvent::CheckpointVisited {
                        vehicle: vehicle.id,
                        checkpoint,
                    }),
            );

            match outcome.finish {
                FinishOutcome::LapCompleted(lap) => {
                    events.push(RaceEvent::LapCompleted {
                        vehicle: vehicle.id,
                        lap,
                    });
                    if lap >= self.config.lap_goal {
                        info!(target: "race", "vehicle {} finished in {:?}", vehicle.id, now);
                        competitor.progress = VehicleProgress::Finished { finish_time: now };
                        events.push(RaceEvent::Finished {
                            vehicle: vehicle.id,
                            finish_time: now,
                        });
                        continue;
                    }
                }
                FinishOutcome::FalseFinish => events.push(RaceEvent::FalseFinish { vehicle: vehicle.id }),
                FinishOutcome::NotCrossed => {}
            }

            competitor.progress = VehicleProgress::Racing {
                lap: vehicle.lap_record.lap_count(),
                checkpoints: vehicle.lap_record.visited_count(),
            };
        }

        if self
            .competitors
            .iter()
            .all(|competitor| competitor.progress.is_finished())
        {
            info!(target: "race", "all vehicles finished");
            self.phase = RacePhase::AllFinished;
            events.push(RaceEvent::AllFinished);
        } else if now >= self.config.max_race_time {
            warn!(target: "race", "race timed out after {:?}", now);
            self.phase = RacePhase::TimedOut;
            events.push(RaceEvent::TimedOut);
        }
    }

    // Standings, best first; finish time is None for anyone still racing.
    pub fn placements(&self) -> Vec<(Placement, VehicleID, Option<Duration>)> {
        let mut order: Vec<&Competitor> = self.competitors.iter().collect();
        // stable, so ties keep grid order
        order.sort_by(|a, b| a.progress.cmp(&b.progress));

        order
            .into_iter()
            .enumerate()
            .map(|(index, competitor)| {
                (
                    (index + 1) as Placement,
                    competitor.vehicle.id,
                    competitor.progress.finish_time(),
                )
            })
            .collect()
    }

    pub fn snapshot(&self) -> RaceSnapshot {
        RaceSnapshot {
            tick: self.tick_count,
            race_time_ms: self.race_time.as_millis() as u64,
            vehicles: self
                .competitors
                .iter()
                .map(|competitor| VehicleSnapshot {
                    id: competitor.vehicle.id,
                    location: competitor.vehicle.location,
                    velocity: competitor.vehicle.velocity,
                    lap: competitor.vehicle.lap_record.lap_count(),
                    visited: competitor.vehicle.lap_record.visited().to_vec(),
                    finished: competitor.progress.is_finished(),
                })
                .collect(),
        }
    }

    fn start_packet(&self) -> ReplayPacket {
        ReplayPacket::RaceStart {
            track: self.track.clone(),
            weather: self.weather,
            drivers: self
                .competitors
                .iter()
                .map(|competitor| competitor.controller.kind())
                .collect(),
            lap_goal: self.config.lap_goal,
        }
    }

    fn end_packet(&self) -> ReplayPacket {
        ReplayPacket::RaceEnd {
            placements: self
                .placements()
                .into_iter()
                .map(|(placement, id, finish_time)| {
                    (placement, id, finish_time.map(|time| time.as_millis() as u64))
                })
                .collect(),
        }
    }

    // Tick until everyone finishes or the clock runs out. In realtime mode
    // each tick is padded out to the configured tick length; otherwise the
    // race runs as fast as it can with the same fixed dt.
    pub fn run<S: InputSource, W: Write>(
        &mut self,
        input: &mut S,
        mut replay: Option<&mut ReplayWriter<W>>,
    ) -> Result<(), ReplayError> {
        if let Some(writer) = replay.as_deref_mut() {
            writer.write(&self.start_packet())?;
        }

        while !self.is_over() {
            let start_time = Instant::now();

            let snapshot = input.poll(self.tick_count);
            for event in self.tick(self.config.tick, &snapshot) {
                debug!(target: "race", "tick {}: {:?}", self.tick_count, event);
            }

            if let Some(writer) = replay.as_deref_mut() {
                writer.write(&ReplayPacket::Tick(self.snapshot()))?;
            }

            if self.config.realtime {
                // wait until the tick time has elapsed
                match self.config.tick.checked_sub(start_time.elapsed()) {
                    Some(remaining) => thread::sleep(remaining),
                    None => warn!(target: "race", "tick {} ran long", self.tick_count),
                }
            }
        }

        if let Some(writer) = replay.as_deref_mut() {
            writer.write(&self.end_packet())?;
            writer.flush()?;
        }
        Ok(())
    }
}
