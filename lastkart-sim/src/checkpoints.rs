use glam::DVec2;
use log::{debug, info};

use lastkart_core::player::lap_info::{CheckpointID, LapNumber, LapRecord};
use lastkart_core::track::{Segment, Track};

use crate::physics::vehicle_entity::VehicleEntity;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FinishOutcome {
    NotCrossed,
    // crossed with every checkpoint visited; carries the new lap count
    LapCompleted(LapNumber),
    // crossed with something left unvisited, so nothing happened
    FalseFinish,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CrossingOutcome {
    pub newly_visited: Vec<CheckpointID>,
    pub finish: FinishOutcome,
}

impl CrossingOutcome {
    pub fn nothing() -> Self {
        CrossingOutcome {
            newly_visited: Vec::new(),
            finish: FinishOutcome::NotCrossed,
        }
    }
}

#[derive(Clone, Copy)]
pub struct Checkpoint {
    pub id: CheckpointID,
    pub segment: Segment,
}

impl Checkpoint {
    pub fn new(id: CheckpointID, segment: Segment) -> Self {
        Self { id, segment }
    }

    // returns true if this crossing is what visited the checkpoint
    fn trigger(&self, motion: &Segment, lap_record: &mut LapRecord) -> bool {
        !lap_record.is_visited(self.id)
            && motion.intersects(&self.segment)
            && lap_record.mark_visited(self.id)
    }
}

#[derive(Clone, Copy)]
pub struct FinishLine {
    pub segment: Segment,
}

impl FinishLine {
    pub fn new(segment: Segment) -> Self {
        Self { segment }
    }

    fn trigger(&self, motion: &Segment, lap_record: &mut LapRecord) -> FinishOutcome {
        if !motion.intersects(&self.segment) {
            return FinishOutcome::NotCrossed;
        }

        // only a lap that went through every checkpoint counts; this is what
        // stops anyone from looping back and forth over the line
        if lap_record.all_visited() {
            FinishOutcome::LapCompleted(lap_record.complete_lap())
        } else {
            FinishOutcome::FalseFinish
        }
    }
}

// LapTracker holds a track's checkpoints and finish line and decides, from
// each vehicle's motion over a tick, what it crossed.
pub struct LapTracker {
    checkpoints: Vec<Checkpoint>,
    finish_line: FinishLine,
}

impl LapTracker {
    pub fn new(track: &Track) -> Self {
        LapTracker {
            checkpoints: track
                .checkpoints
                .iter()
                .enumerate()
                .map(|(id, segment)| Checkpoint::new(id, *segment))
                .collect(),
            finish_line: FinishLine::new(track.finish_line),
        }
    }

    pub fn checkpoint_count(&self) -> usize {
        self.checkpoints.len()
    }

    #[cfg(test)]
    pub fn new_lap_record(&self) -> LapRecord {
        LapRecord::new(self.checkpoint_count())
    }

    // Checkpoints are tested first and in any order, so a tick that sweeps
    // over the last checkpoint and the finish line completes the lap.
    pub fn evaluate_motion(
        &self,
        lap_record: &mut LapRecord,
        previous: Option<DVec2>,
        current: DVec2,
    ) -> CrossingOutcome {
        let previous = match previous {
            Some(previous) => previous,
            // hasn't moved since spawning
            None => return CrossingOutcome::nothing(),
        };
        let motion = Segment::new(previous, current);

        let newly_visited = self
            .checkpoints
            .iter()
            .filter(|checkpoint| checkpoint.trigger(&motion, lap_record))
            .map(|checkpoint| checkpoint.id)
            .collect();

        CrossingOutcome {
            newly_visited,
            finish: self.finish_line.trigger(&motion, lap_record),
        }
    }

    pub fn evaluate_crossing(&self, vehicle: &mut VehicleEntity) -> CrossingOutcome {
        let outcome = self.evaluate_motion(
            &mut vehicle.lap_record,
            vehicle.previous_position,
            vehicle.location.position,
        );

        for checkpoint in &outcome.newly_visited {
            debug!(target: "laps", "vehicle {} crossed checkpoint {}", vehicle.id, checkpoint);
        }
        match outcome.finish {
            FinishOutcome::LapCompleted(lap) => {
                info!(target: "laps", "vehicle {} completed lap {}", vehicle.id, lap)
            }
            FinishOutcome::FalseFinish => debug!(
                target: "laps",
                "vehicle {} crossed the finish line with {}/{} checkpoints, ignoring",
                vehicle.id,
                vehicle.lap_record.visited_count(),
                self.checkpoint_count()
            ),
            FinishOutcome::NotCrossed => {}
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use glam::DVec2;

    use super::*;

    fn p(x: f64, y: f64) -> DVec2 {
        DVec2::new(x, y)
    }

    // a square course: finish line on the top edge, one checkpoint on each
    // of the other three edges
    fn square_track() -> Track {
        Track::new(
            vec![
                Segment::from_coords(250.0, 150.0, 350.0, 150.0),
                Segment::from_coords(200.0, 250.0, 200.0, 350.0),
                Segment::from_coords(50.0, 150.0, 150.0, 150.0),
            ],
            Segment::from_coords(200.0, 0.0, 200.0, 100.0),
        )
    }

    fn drive(
        tracker: &LapTracker,
        record: &mut LapRecord,
        path: &[DVec2],
    ) -> Vec<CrossingOutcome> {
        path.windows(2)
            .map(|step| tracker.evaluate_motion(record, Some(step[0]), step[1]))
            .collect()
    }

    // clockwise around the square, starting just before the finish line
    fn one_loop() -> Vec<DVec2> {
        vec![
            p(150.0, 50.0),
            p(300.0, 50.0),
            p(300.0, 200.0),
            p(300.0, 300.0),
            p(100.0, 300.0),
            p(100.0, 100.0),
            p(100.0, 50.0),
        ]
    }

    #[test]
    fn first_tick_after_spawn_is_skipped() {
        let tracker = LapTracker::new(&square_track());
        let mut record = tracker.new_lap_record();
        let outcome = tracker.evaluate_motion(&mut record, None, p(300.0, 150.0));
        assert_eq!(outcome, CrossingOutcome::nothing());
        assert_eq!(record.visited_count(), 0);
    }

    #[test]
    fn crossing_one_checkpoint_marks_only_that_one() {
        let tracker = LapTracker::new(&square_track());
        let mut record = tracker.new_lap_record();
        let outcome = tracker.evaluate_motion(&mut record, Some(p(300.0, 100.0)), p(300.0, 200.0));

        assert_eq!(outcome.newly_visited, vec![0]);
        assert_eq!(outcome.finish, FinishOutcome::NotCrossed);
        assert_eq!(record.visited(), &[true, false, false]);
    }

    #[test]
    fn collinear_motion_along_a_checkpoint_visits_it() {
        let track = Track::new(
            vec![Segment::from_coords(200.0, 120.0, 600.0, 120.0)],
            Segment::from_coords(0.0, 500.0, 10.0, 500.0),
        );
        let tracker = LapTracker::new(&track);
        let mut record = tracker.new_lap_record();
        let outcome = tracker.evaluate_motion(&mut record, Some(p(100.0, 120.0)), p(300.0, 120.0));

        assert_eq!(outcome.newly_visited, vec![0]);
        assert!(record.is_visited(0));
    }

    #[test]
    fn standing_still_never_crosses() {
        let tracker = LapTracker::new(&Track::new(
            vec![Segment::from_coords(0.0, 50.0, 100.0, 50.0)],
            Segment::from_coords(50.0, 0.0, 50.0, 100.0),
        ));
        let mut record = tracker.new_lap_record();
        record.mark_visited(0);
        let before = record.clone();

        for _ in 0..10 {
            let outcome = tracker.evaluate_motion(&mut record, Some(p(50.0, 50.0)), p(50.0, 50.0));
            assert_eq!(outcome, CrossingOutcome::nothing());
        }
        assert_eq!(record, before);
    }

    #[test]
    fn finishing_with_everything_visited_completes_a_lap() {
        let tracker = LapTracker::new(&square_track());
        let mut record = tracker.new_lap_record();
        for id in 0..3 {
            record.mark_visited(id);
        }

        let outcome = tracker.evaluate_motion(&mut record, Some(p(150.0, 50.0)), p(250.0, 50.0));
        assert_eq!(outcome.finish, FinishOutcome::LapCompleted(1));
        assert_eq!(record.lap_count(), 1);
        assert_eq!(record.visited(), &[false, false, false]);
    }

    #[test]
    fn false_finish_changes_nothing() {
        let tracker = LapTracker::new(&square_track());
        let mut record = tracker.new_lap_record();
        record.mark_visited(0);
        record.mark_visited(2);
        let before = record.clone();

        let outcome = tracker.evaluate_motion(&mut record, Some(p(150.0, 50.0)), p(250.0, 50.0));
        assert_eq!(outcome.finish, FinishOutcome::FalseFinish);
        assert_eq!(record, before);

        // backing over the line again doesn't help either
        let outcome = tracker.evaluate_motion(&mut record, Some(p(250.0, 50.0)), p(150.0, 50.0));
        assert_eq!(outcome.finish, FinishOutcome::FalseFinish);
        assert_eq!(record, before);
    }

    #[test]
    fn checkpoints_may_be_visited_in_any_order() {
        let tracker = LapTracker::new(&square_track());
        let mut record = tracker.new_lap_record();

        // counter-clockwise: 2, then 1, then 0
        let path = [
            p(250.0, 50.0),
            p(100.0, 50.0),
            p(100.0, 200.0),
            p(100.0, 300.0),
            p(300.0, 300.0),
            p(300.0, 100.0),
            p(300.0, 50.0),
            p(150.0, 50.0),
        ];
        let outcomes = drive(&tracker, &mut record, &path);

        assert_eq!(outcomes[0].finish, FinishOutcome::FalseFinish);
        assert_eq!(outcomes.last().unwrap().finish, FinishOutcome::LapCompleted(1));
        assert_eq!(record.lap_count(), 1);
    }

    #[test]
    fn one_long_tick_can_visit_several_checkpoints() {
        let tracker = LapTracker::new(&square_track());
        let mut record = tracker.new_lap_record();

        // a low frame rate diagonal that sweeps across the right and bottom
        // checkpoints at once
        let outcome = tracker.evaluate_motion(&mut record, Some(p(350.0, 100.0)), p(150.0, 400.0));
        assert_eq!(outcome.newly_visited, vec![0, 1]);
        assert_eq!(outcome.finish, FinishOutcome::NotCrossed);
        assert_eq!(record.visited(), &[true, true, false]);
    }

    #[test]
    fn last_checkpoint_and_finish_in_the_same_tick() {
        let track = Track::new(
            vec![Segment::from_coords(100.0, 0.0, 100.0, 100.0)],
            Segment::from_coords(150.0, 0.0, 150.0, 100.0),
        );
        let tracker = LapTracker::new(&track);
        let mut record = tracker.new_lap_record();

        let outcome = tracker.evaluate_motion(&mut record, Some(p(50.0, 50.0)), p(200.0, 50.0));
        assert_eq!(outcome.newly_visited, vec![0]);
        assert_eq!(outcome.finish, FinishOutcome::LapCompleted(1));
    }

    #[test]
    fn lap_count_matches_loops_driven() {
        let tracker = LapTracker::new(&square_track());
        let mut record = tracker.new_lap_record();

        let mut path = vec![p(100.0, 50.0)];
        for _ in 0..5 {
            path.extend(one_loop());
        }
        // the fifth loop only counts once it crosses the line again
        path.push(p(300.0, 50.0));
        drive(&tracker, &mut record, &path);

        assert_eq!(record.lap_count(), 5);
    }

    #[test]
    fn shortcut_back_over_the_line_does_not_count() {
        let tracker = LapTracker::new(&square_track());
        let mut record = tracker.new_lap_record();

        // go round once properly, then wiggle over the finish line
        let mut path = vec![p(100.0, 50.0)];
        path.extend(one_loop());
        for _ in 0..10 {
            path.push(p(250.0, 50.0));
            path.push(p(150.0, 50.0));
        }
        drive(&tracker, &mut record, &path);

        assert_eq!(record.lap_count(), 1);
    }

    #[test]
    fn track_without_checkpoints_counts_every_finish() {
        let track = Track::new(Vec::new(), Segment::from_coords(0.0, 0.0, 0.0, 10.0));
        let tracker = LapTracker::new(&track);
        let mut record = tracker.new_lap_record();

        tracker.evaluate_motion(&mut record, Some(p(-1.0, 5.0)), p(1.0, 5.0));
        tracker.evaluate_motion(&mut record, Some(p(1.0, 5.0)), p(-1.0, 5.0));
        assert_eq!(record.lap_count(), 2);
    }
}
