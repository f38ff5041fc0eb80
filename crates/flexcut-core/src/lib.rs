//! # Flexcut Core
//!
//! Core types and utilities for Flexcut.
//! Provides the plain geometry shapes every filter consumes
//! (points and polylines), polypath file I/O and the shared error type.

pub mod data;
pub mod error;

pub use data::{
    polypath::{read_polypath, read_polypath_file, write_polypath, write_polypath_file},
    BoundingBox, Point, Polyline,
};

pub use error::{Error, GeometryError, Result};
