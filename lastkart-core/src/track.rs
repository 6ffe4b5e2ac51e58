use std::f64::consts::FRAC_PI_2;
use std::fs;
use std::path::Path;

use glam::DVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// below this, a segment is a point and a direction pair is parallel
const EPSILON: f64 = 1e-9;

// how far the lanes of the built-in oval are from the playable edge
const OVAL_LANE_WIDTH: f64 = 140.0;

#[derive(Debug, Error)]
pub enum TrackError {
    #[error("could not read track file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid YAML track definition: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid JSON track definition: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported track file extension {0:?} (expected .yaml, .yml or .json)")]
    UnsupportedFormat(String),
    #[error("{0} has zero length")]
    DegenerateSegment(String),
}

fn cross(a: DVec2, b: DVec2) -> f64 {
    a.x * b.y - a.y * b.x
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub a: DVec2,
    pub b: DVec2,
}

impl Segment {
    pub fn new(a: DVec2, b: DVec2) -> Self {
        Self { a, b }
    }

    pub fn from_coords(ax: f64, ay: f64, bx: f64, by: f64) -> Self {
        Self::new(DVec2::new(ax, ay), DVec2::new(bx, by))
    }

    pub fn midpoint(&self) -> DVec2 {
        (self.a + self.b) / 2.0
    }

    pub fn length(&self) -> f64 {
        (self.b - self.a).length()
    }

    pub fn is_degenerate(&self) -> bool {
        (self.b - self.a).length_squared() < EPSILON
    }

    // Parametric segment/segment test: solve a + t*r = c + u*s and accept
    // t, u in [0, 1], endpoints included. A zero-length segment never
    // intersects anything, and neither do parallel segments unless they lie
    // on the same line and overlap.
    pub fn intersects(&self, other: &Segment) -> bool {
        if self.is_degenerate() || other.is_degenerate() {
            return false;
        }

        let r = self.b - self.a;
        let s = other.b - other.a;
        let offset = other.a - self.a;
        let denominator = cross(r, s);

        // |r x s| = |r||s|sin(angle), so this is a tolerance on the angle
        if denominator.abs() <= EPSILON * r.length() * s.length() {
            return self.overlaps_collinear(other);
        }

        let t = cross(offset, s) / denominator;
        let u = cross(offset, r) / denominator;

        (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u)
    }

    fn overlaps_collinear(&self, other: &Segment) -> bool {
        let r = self.b - self.a;
        let offset = other.a - self.a;

        // parallel but on a different line
        if cross(offset, r).abs() / r.length() > EPSILON.sqrt() {
            return false;
        }

        // project the other segment onto ours; same parameterisation as t
        let r_squared = r.length_squared();
        let t0 = offset.dot(r) / r_squared;
        let t1 = (other.b - self.a).dot(r) / r_squared;

        t0.max(t1) >= 0.0 && t0.min(t1) <= 1.0
    }
}

// The static geometry of a race: an ordered list of checkpoint segments, the
// finish line, and the way vehicles face on the starting grid.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Track {
    #[serde(default)]
    pub name: String,
    pub checkpoints: Vec<Segment>,
    pub finish_line: Segment,
    #[serde(default)]
    pub start_heading: f64,
}

impl Track {
    pub fn new(checkpoints: Vec<Segment>, finish_line: Segment) -> Self {
        Track {
            name: String::new(),
            checkpoints,
            finish_line,
            start_heading: 0.0,
        }
    }

    // A rectangular ring fitted to the playable area, driven clockwise on
    // screen: finish line across the top straight, then one checkpoint on the
    // right, bottom and left straights.
    pub fn default_oval(surface_width: f64, surface_height: f64, inset: f64) -> Self {
        let min = DVec2::new(inset, inset);
        let max = DVec2::new(surface_width - inset, surface_height - inset);
        let center = (min + max) / 2.0;
        let lane = OVAL_LANE_WIDTH.min((max.x - min.x) / 3.0).min((max.y - min.y) / 3.0);

        Track {
            name: "oval".to_string(),
            checkpoints: vec![
                Segment::from_coords(max.x - lane, center.y, max.x, center.y),
                Segment::from_coords(center.x, max.y - lane, center.x, max.y),
                Segment::from_coords(min.x, center.y, min.x + lane, center.y),
            ],
            finish_line: Segment::from_coords(center.x, min.y, center.x, min.y + lane),
            start_heading: FRAC_PI_2,
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Track, TrackError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_lowercase();

        let contents = fs::read_to_string(path)?;
        let track: Track = match extension.as_str() {
            "yaml" | "yml" => serde_yaml::from_str(&contents)?,
            "json" => serde_json::from_str(&contents)?,
            _ => return Err(TrackError::UnsupportedFormat(extension)),
        };

        track.validate()?;
        Ok(track)
    }

    pub fn validate(&self) -> Result<(), TrackError> {
        if self.finish_line.is_degenerate() {
            return Err(TrackError::DegenerateSegment("finish line".to_string()));
        }
        if let Some(index) = self.checkpoints.iter().position(|c| c.is_degenerate()) {
            return Err(TrackError::DegenerateSegment(format!("checkpoint {}", index)));
        }
        Ok(())
    }

    pub fn checkpoint_count(&self) -> usize {
        self.checkpoints.len()
    }
}
