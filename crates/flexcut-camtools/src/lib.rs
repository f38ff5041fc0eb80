//! # Flexcut CAM Tools
//!
//! This crate provides the path filters Flexcut applies to a cutting job
//! before it is sent to a pen or blade plotter.
//!
//! ## Filters Included
//!
//! - **Perforation**: Splits continuous paths into alternating cuts and uncut
//!   bridges measured by arc length (flex-cut)
//!
//! ## Supporting Infrastructure
//!
//! - **Measurement**: Arc-length measurement backends (straight chords, lyon)
//! - **Filter Pipeline**: Ordered filter chains and a name-based registry

pub mod error;
pub mod filter;
pub mod measure;
pub mod perforation;

// Re-export commonly used items
pub use error::{
    CamToolError, CamToolResult, MeasureError, MeasureResult, ParameterError, PerforationError,
    PerforationResult,
};
pub use filter::{FilterHandle, FilterPipeline, FilterRegistry, PolypathFilter};
pub use measure::{
    ChordMeasurer, LyonMeasurer, MeasuredPath, MeasurerHandle, MeasurerKind, PathMeasurer,
};
pub use perforation::{
    PerforationConfig, PerforationFilter, PerforationPlan, PerforationSegmenter, Phase,
};
