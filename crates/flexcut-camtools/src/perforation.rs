//! Perforation (flex-cut) filter
//!
//! Splits continuous cutting paths into alternating cut and bridge runs,
//! measured by arc length. Bridges are left uncut so pieces stay attached to
//! the surrounding material until they are pulled out by hand. Only the cut
//! runs are emitted; a bridge is the gap between two consecutive outputs and
//! becomes a pen-up travel move downstream.
//!
//! The pattern never leaves the tool engaged at the end of a path: when the
//! plain cut/bridge alternation would finish inside a cut, the final bridge
//! length is reserved before any output is produced.

use crate::error::{ParameterError, ParameterResult, PerforationError, PerforationResult};
use crate::filter::PolypathFilter;
use crate::measure::{ChordMeasurer, MeasuredPath, MeasurerHandle};
use flexcut_core::Polyline;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Upper bound on cut/bridge phases for one polyline
pub const MAX_PHASES: usize = 100_000_000;

/// Relative slack below which leftover arc length counts as used up
const LENGTH_EPSILON: f64 = 1e-12;

fn length_slack(length: f64) -> f64 {
    length.abs() * LENGTH_EPSILON
}

/// Perforation parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerforationConfig {
    /// Arc length of each cut run
    pub cut_length: f64,
    /// Arc length of each uncut bridge
    pub bridge_length: f64,
    /// Whether traversal starts in the cutting phase
    pub start_with_cut: bool,
}

impl Default for PerforationConfig {
    fn default() -> Self {
        Self {
            cut_length: 5.0,
            bridge_length: 2.0,
            start_with_cut: true,
        }
    }
}

impl PerforationConfig {
    pub fn new(cut_length: f64, bridge_length: f64, start_with_cut: bool) -> Self {
        Self {
            cut_length,
            bridge_length,
            start_with_cut,
        }
    }

    /// Length of one full cut + bridge cycle
    pub fn period(&self) -> f64 {
        self.cut_length + self.bridge_length
    }

    /// Whether these parameters fragment paths at all.
    ///
    /// A bridge length of zero means a continuous cut.
    pub fn is_active(&self) -> bool {
        self.bridge_length > 0.0
    }

    /// Check that both lengths are finite and non-negative
    pub fn validate(&self) -> ParameterResult<()> {
        for (name, value) in [
            ("cut_length", self.cut_length),
            ("bridge_length", self.bridge_length),
        ] {
            if !value.is_finite() {
                return Err(ParameterError::InvalidValue {
                    name: name.to_string(),
                    reason: format!("must be finite, got {}", value),
                });
            }
            if value < 0.0 {
                return Err(ParameterError::InvalidValue {
                    name: name.to_string(),
                    reason: format!("must not be negative, got {}", value),
                });
            }
        }
        Ok(())
    }
}

/// Tool state while walking a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Pen down
    Cutting,
    /// Pen up
    Bridging,
}

impl Phase {
    /// Phase a traversal starts in
    pub fn initial(start_with_cut: bool) -> Self {
        if start_with_cut {
            Self::Cutting
        } else {
            Self::Bridging
        }
    }

    pub fn flip(self) -> Self {
        match self {
            Self::Cutting => Self::Bridging,
            Self::Bridging => Self::Cutting,
        }
    }

    pub fn is_cutting(self) -> bool {
        self == Self::Cutting
    }

    /// Arc length this phase consumes under `config`
    pub fn length(self, config: &PerforationConfig) -> f64 {
        match self {
            Self::Cutting => config.cut_length,
            Self::Bridging => config.bridge_length,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cutting => write!(f, "cutting"),
            Self::Bridging => write!(f, "bridging"),
        }
    }
}

/// How a path of a given length gets perforated
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PerforationPlan {
    /// Nothing on the path is cut
    Skip,
    /// One cut from the start of the path to `end`
    Single { end: f64 },
    /// Alternate cuts and bridges from 0 up to `effective_length`
    Pattern { effective_length: f64 },
}

/// Phase active when the plain alternation runs out of path.
///
/// Each phase consumes `min(phase_length, remaining)`. A rounding leftover
/// no larger than `total_length * 1e-12` counts as no path left.
pub fn final_phase(total_length: f64, config: &PerforationConfig) -> PerforationResult<Phase> {
    let slack = length_slack(total_length);
    let mut remaining = total_length;
    let mut phase = Phase::initial(config.start_with_cut);
    let mut phases = 0usize;

    while remaining > slack {
        remaining -= phase.length(config).min(remaining);
        if remaining <= slack {
            break;
        }
        phase = phase.flip();

        phases += 1;
        if phases > MAX_PHASES {
            return Err(PerforationError::TooManyPhases {
                limit: MAX_PHASES,
                length: total_length,
            });
        }
    }

    Ok(phase)
}

/// Decide how a path of `total_length` is perforated.
///
/// Short paths (no longer than one cut + bridge cycle):
/// - no longer than a cut and starting on a bridge: nothing is cut
/// - no longer than a cut and starting on a cut: the cut is trimmed to
///   `total_length - bridge_length`, or skipped when that leaves nothing
/// - longer than a cut: one full cut, the rest is bridge
///
/// Longer paths alternate; if the alternation would end inside a cut, the
/// last `bridge_length` of the path is reserved as a trailing bridge.
pub fn plan(total_length: f64, config: &PerforationConfig) -> PerforationResult<PerforationPlan> {
    config.validate()?;

    let cut = config.cut_length;
    let bridge = config.bridge_length;
    let period = config.period();

    if total_length <= period {
        if total_length <= cut {
            if !config.start_with_cut {
                return Ok(PerforationPlan::Skip);
            }
            if total_length > bridge {
                return Ok(PerforationPlan::Single {
                    end: total_length - bridge,
                });
            }
            return Ok(PerforationPlan::Skip);
        }
        return Ok(PerforationPlan::Single { end: cut });
    }

    if period <= 0.0 {
        return Err(ParameterError::Incompatible(
            "cut and bridge lengths are both zero".to_string(),
        )
        .into());
    }

    let estimated_phases = (total_length / period).ceil() * 2.0 + 2.0;
    if estimated_phases > MAX_PHASES as f64 {
        return Err(PerforationError::TooManyPhases {
            limit: MAX_PHASES,
            length: total_length,
        });
    }

    let ends_cutting = final_phase(total_length, config)?.is_cutting();
    let effective_length = if ends_cutting && total_length > bridge {
        total_length - bridge
    } else {
        total_length
    };

    Ok(PerforationPlan::Pattern { effective_length })
}

/// Splits one polyline into its cut runs
#[derive(Debug, Clone)]
pub struct PerforationSegmenter {
    measurer: MeasurerHandle,
}

impl PerforationSegmenter {
    pub fn new(measurer: MeasurerHandle) -> Self {
        Self { measurer }
    }

    pub fn measurer(&self) -> &MeasurerHandle {
        &self.measurer
    }

    /// Perforate one polyline.
    ///
    /// Polylines with fewer than two points come back unchanged. When the
    /// pattern pass emits nothing, the original polyline is returned.
    pub fn segment(
        &self,
        poly: &Polyline,
        config: &PerforationConfig,
    ) -> PerforationResult<Vec<Polyline>> {
        if !poly.is_traversable() {
            return Ok(vec![poly.clone()]);
        }

        let measured = self.measurer.measure(poly)?;
        let total_length = measured.total_length();
        let plan = plan(total_length, config)?;
        debug!(
            "Perforating {} points, length {:.3} with {}: {:?}",
            poly.len(),
            total_length,
            self.measurer.name(),
            plan
        );

        match plan {
            PerforationPlan::Skip => Ok(Vec::new()),
            PerforationPlan::Single { end } => Ok(measured
                .extract_chord(0.0, end)?
                .filter(|chord| chord.is_traversable())
                .into_iter()
                .collect()),
            PerforationPlan::Pattern { effective_length } => {
                let segments = emit_pattern(measured.as_ref(), config, effective_length)?;
                if segments.is_empty() {
                    debug!("Pattern pass emitted nothing, keeping original polyline");
                    return Ok(vec![poly.clone()]);
                }
                Ok(segments)
            }
        }
    }

    /// Perforate one polyline, falling back to the unmodified polyline on
    /// any error
    pub fn segment_or_original(&self, poly: &Polyline, config: &PerforationConfig) -> Vec<Polyline> {
        match self.segment(poly, config) {
            Ok(segments) => segments,
            Err(e) => {
                warn!(
                    "Perforation failed for polyline with {} points, keeping it unchanged: {}",
                    poly.len(),
                    e
                );
                vec![poly.clone()]
            }
        }
    }
}

impl Default for PerforationSegmenter {
    fn default() -> Self {
        Self::new(Arc::new(ChordMeasurer::new()))
    }
}

fn emit_pattern(
    measured: &dyn MeasuredPath,
    config: &PerforationConfig,
    effective_length: f64,
) -> PerforationResult<Vec<Polyline>> {
    let slack = length_slack(effective_length);
    let mut segments = Vec::new();
    let mut distance = 0.0;
    let mut phase = Phase::initial(config.start_with_cut);

    while effective_length - distance > slack {
        match phase {
            Phase::Cutting => {
                let end = (distance + config.cut_length).min(effective_length);
                if end - distance > slack {
                    if let Some(chord) = measured.extract_chord(distance, end)? {
                        if chord.is_traversable() {
                            trace!("Cut {:.3}..{:.3}", distance, end);
                            segments.push(chord);
                        }
                    }
                }
                distance = end;
            }
            Phase::Bridging => {
                distance = (distance + config.bridge_length).min(effective_length);
            }
        }
        phase = phase.flip();
    }

    Ok(segments)
}

/// Filter that applies perforation to every polyline of a polypath
#[derive(Debug, Clone)]
pub struct PerforationFilter {
    config: PerforationConfig,
    segmenter: PerforationSegmenter,
    enabled: bool,
    parallel: bool,
}

impl PerforationFilter {
    /// Create a filter using straight-chord measurement
    pub fn new(config: PerforationConfig) -> Self {
        Self {
            config,
            segmenter: PerforationSegmenter::default(),
            enabled: true,
            parallel: false,
        }
    }

    /// Create a filter with a specific measuring backend
    pub fn with_measurer(config: PerforationConfig, measurer: MeasurerHandle) -> Self {
        Self {
            config,
            segmenter: PerforationSegmenter::new(measurer),
            enabled: true,
            parallel: false,
        }
    }

    pub fn config(&self) -> &PerforationConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: PerforationConfig) {
        self.config = config;
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Run on the rayon pool when applied through [`PolypathFilter`]
    pub fn set_parallel(&mut self, parallel: bool) {
        self.parallel = parallel;
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    pub fn segmenter(&self) -> &PerforationSegmenter {
        &self.segmenter
    }

    /// Apply perforation to a polypath, preserving polyline order.
    ///
    /// A polyline that fails to perforate is emitted unchanged. If the batch
    /// cannot be processed at all, the input is returned unchanged.
    pub fn apply_to_polypath(&self, polypath: &[Polyline]) -> Vec<Polyline> {
        if !self.config.is_active() {
            debug!(
                "Perforation inactive (cut {}, bridge {}), passing {} polylines through",
                self.config.cut_length,
                self.config.bridge_length,
                polypath.len()
            );
            return polypath.to_vec();
        }

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let mut output = Vec::with_capacity(polypath.len());
            for poly in polypath {
                output.extend(self.process_polyline(poly));
            }
            output
        }));

        self.finish(polypath, result)
    }

    /// Same as [`apply_to_polypath`](Self::apply_to_polypath), processing
    /// polylines on the rayon thread pool
    pub fn apply_to_polypath_parallel(&self, polypath: &[Polyline]) -> Vec<Polyline> {
        if !self.config.is_active() {
            return polypath.to_vec();
        }

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            polypath
                .par_iter()
                .map(|poly| self.process_polyline(poly))
                .collect::<Vec<_>>()
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
        }));

        self.finish(polypath, result)
    }

    fn process_polyline(&self, poly: &Polyline) -> Vec<Polyline> {
        if !poly.is_traversable() {
            return vec![poly.clone()];
        }
        self.segmenter.segment_or_original(poly, &self.config)
    }

    fn finish(
        &self,
        polypath: &[Polyline],
        result: std::thread::Result<Vec<Polyline>>,
    ) -> Vec<Polyline> {
        match result {
            Ok(output) => {
                debug!(
                    "Perforated {} polylines into {}",
                    polypath.len(),
                    output.len()
                );
                output
            }
            Err(_) => {
                warn!("Panic during perforation, returning polypath unchanged");
                polypath.to_vec()
            }
        }
    }
}

impl Default for PerforationFilter {
    fn default() -> Self {
        Self::new(PerforationConfig::default())
    }
}

impl PolypathFilter for PerforationFilter {
    fn name(&self) -> &str {
        "perforation"
    }

    fn description(&self) -> &str {
        "Splits paths into alternating cuts and uncut bridges (flex-cut)"
    }

    fn apply_to_polypath(&self, polypath: &[Polyline]) -> Vec<Polyline> {
        if self.parallel {
            PerforationFilter::apply_to_polypath_parallel(self, polypath)
        } else {
            PerforationFilter::apply_to_polypath(self, polypath)
        }
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}
