use serde::{Deserialize, Serialize};

pub type LapNumber = u32;
pub type CheckpointID = usize;
pub type Placement = u8;

// LapRecord is the per-vehicle lap bookkeeping: which checkpoints have been
// crossed on the current lap, and how many laps have been validated. Only the
// lap tracker changes it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LapRecord {
    visited: Vec<bool>,
    lap_count: LapNumber,
}

impl LapRecord {
    pub fn new(checkpoint_count: usize) -> Self {
        LapRecord {
            visited: vec![false; checkpoint_count],
            lap_count: 0,
        }
    }

    pub fn lap_count(&self) -> LapNumber {
        self.lap_count
    }

    pub fn visited(&self) -> &[bool] {
        &self.visited
    }

    pub fn is_visited(&self, id: CheckpointID) -> bool {
        self.visited.get(id).copied().unwrap_or(false)
    }

    pub fn visited_count(&self) -> usize {
        self.visited.iter().filter(|&&v| v).count()
    }

    // vacuously true for a track without checkpoints
    pub fn all_visited(&self) -> bool {
        self.visited.iter().all(|&v| v)
    }

    // lowest index that still needs crossing this lap
    pub fn next_unvisited(&self) -> Option<CheckpointID> {
        self.visited.iter().position(|&v| !v)
    }

    // returns true if this call is what flipped the checkpoint
    pub fn mark_visited(&mut self, id: CheckpointID) -> bool {
        match self.visited.get_mut(id) {
            Some(slot) if !*slot => {
                *slot = true;
                true
            }
            _ => false,
        }
    }

    // validated lap: bump the counter and make the next lap re-earn everything
    pub fn complete_lap(&mut self) -> LapNumber {
        self.lap_count += 1;
        self.visited.iter_mut().for_each(|v| *v = false);
        self.lap_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visiting_is_monotonic_until_lap_completes() {
        let mut record = LapRecord::new(3);
        assert!(record.mark_visited(1));
        assert!(!record.mark_visited(1));
        assert_eq!(record.visited(), &[false, true, false]);
        assert_eq!(record.next_unvisited(), Some(0));

        record.mark_visited(0);
        record.mark_visited(2);
        assert!(record.all_visited());

        assert_eq!(record.complete_lap(), 1);
        assert_eq!(record.visited_count(), 0);
        assert_eq!(record.lap_count(), 1);
    }

    #[test]
    fn out_of_range_checkpoints_are_ignored() {
        let mut record = LapRecord::new(2);
        assert!(!record.mark_visited(5));
        assert!(!record.is_visited(5));
        assert_eq!(record.visited_count(), 0);
    }

    #[test]
    fn empty_track_is_always_complete() {
        let record = LapRecord::new(0);
        assert!(record.all_visited());
        assert_eq!(record.next_unvisited(), None);
    }
}
