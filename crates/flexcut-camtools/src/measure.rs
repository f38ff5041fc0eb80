//! Arc-length measurement of polylines
//!
//! Filters that work by distance along a path (perforation, dashing) need
//! two things from a geometry backend: the total length of a polyline and
//! the point reached after travelling a given distance from its start.
//! [`PathMeasurer`] is that seam. Two backends are provided:
//!
//! - [`ChordMeasurer`]: exact straight-chord arithmetic in `f64`
//! - [`LyonMeasurer`]: `lyon`'s flattened path measurements (`f32`)

use crate::error::{MeasureError, MeasureResult};
use flexcut_core::{Point, Polyline};
use lyon::algorithms::measure::{PathMeasurements, SampleType};
use lyon::math::point;
use lyon::path::Path;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// A polyline prepared for repeated distance queries
pub trait MeasuredPath {
    /// Arc length along straight chords between consecutive points
    fn total_length(&self) -> f64;

    /// Point reached after travelling `distance` from the start.
    ///
    /// Distances outside `[0, total_length]` clamp to the first/last point.
    fn point_at(&self, distance: f64) -> MeasureResult<Point>;

    /// Straight two-point chord between two distances along the path.
    ///
    /// Returns `None` when the range is empty or starts at or past the end
    /// of the path. Intermediate vertices are not resampled.
    fn extract_chord(&self, start: f64, end: f64) -> MeasureResult<Option<Polyline>> {
        if start >= end {
            return Ok(None);
        }
        let total = self.total_length();
        if start >= total {
            return Ok(None);
        }
        let from = self.point_at(start)?;
        let to = self.point_at(end.min(total))?;
        Ok(Some(Polyline::chord(from, to)))
    }
}

/// Geometry backend able to measure polylines by arc length
pub trait PathMeasurer: Send + Sync + fmt::Debug {
    /// Short identifier used in logs and settings
    fn name(&self) -> &str;

    /// Prepare `poly` for distance queries
    fn measure<'a>(&self, poly: &'a Polyline) -> MeasureResult<Box<dyn MeasuredPath + 'a>>;

    /// Total arc length of `poly`
    fn total_length(&self, poly: &Polyline) -> MeasureResult<f64> {
        Ok(self.measure(poly)?.total_length())
    }

    /// Point on `poly` at `distance` from its start, clamped to the path
    fn point_at(&self, poly: &Polyline, distance: f64) -> MeasureResult<Point> {
        self.measure(poly)?.point_at(distance)
    }
}

/// Shared measurer handle
pub type MeasurerHandle = Arc<dyn PathMeasurer>;

fn check_finite(poly: &Polyline) -> MeasureResult<()> {
    match poly.first_non_finite() {
        Some(index) => Err(MeasureError::NonFiniteCoordinate { index }),
        None => Ok(()),
    }
}

fn check_distance(distance: f64) -> MeasureResult<()> {
    if distance.is_nan() {
        return Err(MeasureError::NonFiniteDistance(distance));
    }
    Ok(())
}

// ============================================================================
// Straight chord measurer
// ============================================================================

/// Exact straight-segment measurer
#[derive(Debug, Clone, Copy, Default)]
pub struct ChordMeasurer;

impl ChordMeasurer {
    pub fn new() -> Self {
        Self
    }
}

/// Cumulative chord lengths of one polyline
#[derive(Debug)]
struct ChordPath<'a> {
    points: &'a [Point],
    /// `cumulative[i]` is the arc length from the start to `points[i]`
    cumulative: Vec<f64>,
}

impl<'a> ChordPath<'a> {
    fn new(points: &'a [Point]) -> Self {
        let mut cumulative = Vec::with_capacity(points.len());
        let mut length = 0.0;
        for (i, p) in points.iter().enumerate() {
            if i > 0 {
                length += points[i - 1].distance_to(p);
            }
            cumulative.push(length);
        }
        Self { points, cumulative }
    }
}

impl MeasuredPath for ChordPath<'_> {
    fn total_length(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    fn point_at(&self, distance: f64) -> MeasureResult<Point> {
        check_distance(distance)?;
        let first = *self.points.first().ok_or(MeasureError::EmptyPath)?;

        let distance = distance.clamp(0.0, self.total_length());
        let idx = self.cumulative.partition_point(|&c| c < distance);
        if idx == 0 {
            return Ok(first);
        }

        let (from, to) = match (self.points.get(idx - 1), self.points.get(idx)) {
            (Some(from), Some(to)) => (from, to),
            _ => {
                return Err(MeasureError::Inconsistent(format!(
                    "distance {} maps past the last point",
                    distance
                )))
            }
        };
        let start = self.cumulative[idx - 1];
        let span = self.cumulative[idx] - start;
        if span <= 0.0 {
            return Ok(*to);
        }
        Ok(from.lerp(to, (distance - start) / span))
    }
}

impl PathMeasurer for ChordMeasurer {
    fn name(&self) -> &str {
        "chord"
    }

    fn measure<'a>(&self, poly: &'a Polyline) -> MeasureResult<Box<dyn MeasuredPath + 'a>> {
        check_finite(poly)?;
        Ok(Box::new(ChordPath::new(poly.points())))
    }
}

// ============================================================================
// Lyon measurer
// ============================================================================

/// Measurer backed by `lyon`'s path measurements
#[derive(Debug, Clone, Copy)]
pub struct LyonMeasurer {
    /// Flattening tolerance passed to `PathMeasurements`
    pub tolerance: f32,
}

impl LyonMeasurer {
    pub fn new(tolerance: f32) -> Self {
        Self { tolerance }
    }
}

impl Default for LyonMeasurer {
    fn default() -> Self {
        Self::new(0.01)
    }
}

struct LyonPath {
    path: Path,
    measurements: PathMeasurements,
    first: Option<Point>,
}

impl MeasuredPath for LyonPath {
    fn total_length(&self) -> f64 {
        self.measurements.length() as f64
    }

    fn point_at(&self, distance: f64) -> MeasureResult<Point> {
        check_distance(distance)?;
        let first = self.first.ok_or(MeasureError::EmptyPath)?;

        let length = self.measurements.length();
        if length <= 0.0 {
            return Ok(first);
        }

        let distance = (distance as f32).clamp(0.0, length);
        let mut sampler = self
            .measurements
            .create_sampler(&self.path, SampleType::Distance);
        let position = sampler.sample(distance).position();

        let sampled = Point::new(position.x as f64, position.y as f64);
        if !sampled.is_finite() {
            return Err(MeasureError::Inconsistent(format!(
                "lyon sampled a non-finite point at distance {}",
                distance
            )));
        }
        Ok(sampled)
    }
}

impl PathMeasurer for LyonMeasurer {
    fn name(&self) -> &str {
        "lyon"
    }

    fn measure<'a>(&self, poly: &'a Polyline) -> MeasureResult<Box<dyn MeasuredPath + 'a>> {
        check_finite(poly)?;

        let mut builder = Path::builder();
        if let Some((head, tail)) = poly.points().split_first() {
            builder.begin(point(head.x as f32, head.y as f32));
            for p in tail {
                builder.line_to(point(p.x as f32, p.y as f32));
            }
            builder.end(false);
        }
        let path = builder.build();
        let measurements = PathMeasurements::from_path(&path, self.tolerance);

        Ok(Box::new(LyonPath {
            path,
            measurements,
            first: poly.first().copied(),
        }))
    }
}

// ============================================================================
// Backend selection
// ============================================================================

/// Selectable measuring backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurerKind {
    /// Exact straight-chord measurement
    #[default]
    Chord,
    /// `lyon` path measurements
    Lyon,
}

impl MeasurerKind {
    /// Build a shared measurer; `tolerance` only applies to `Lyon`
    pub fn build(self, tolerance: f64) -> MeasurerHandle {
        match self {
            Self::Chord => Arc::new(ChordMeasurer::new()),
            Self::Lyon => Arc::new(LyonMeasurer::new(tolerance as f32)),
        }
    }
}

impl fmt::Display for MeasurerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chord => write!(f, "chord"),
            Self::Lyon => write!(f, "lyon"),
        }
    }
}

impl FromStr for MeasurerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "chord" | "line" => Ok(Self::Chord),
            "lyon" => Ok(Self::Lyon),
            _ => Err(format!("Unknown measurer: {}", s)),
        }
    }
}
