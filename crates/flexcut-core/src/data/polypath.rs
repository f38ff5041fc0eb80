//! Polypath file I/O
//!
//! A polypath is the ordered list of polylines a cutting job is made of.
//! On disk it is a JSON array of polylines, each an array of `{x, y}` points.

use super::Polyline;
use crate::error::{GeometryError, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Read a polypath from any reader
///
/// Every coordinate must be finite.
pub fn read_polypath<R: Read>(reader: R) -> Result<Vec<Polyline>> {
    let polypath: Vec<Polyline> = serde_json::from_reader(reader)?;

    for (polyline, poly) in polypath.iter().enumerate() {
        if let Some(index) = poly.first_non_finite() {
            return Err(GeometryError::NonFiniteCoordinate { polyline, index }.into());
        }
    }

    tracing::debug!("Read polypath with {} polylines", polypath.len());
    Ok(polypath)
}

/// Read a polypath from a JSON file
pub fn read_polypath_file(path: &Path) -> Result<Vec<Polyline>> {
    let file = File::open(path)?;
    read_polypath(BufReader::new(file))
}

/// Write a polypath to any writer
pub fn write_polypath<W: Write>(writer: W, polypath: &[Polyline], pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(writer, polypath)?;
    } else {
        serde_json::to_writer(writer, polypath)?;
    }
    Ok(())
}

/// Write a polypath to a JSON file, replacing any existing file
pub fn write_polypath_file(path: &Path, polypath: &[Polyline], pretty: bool) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_polypath(&mut writer, polypath, pretty)?;
    writer.flush()?;
    Ok(())
}
