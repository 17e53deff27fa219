//! ESRI ASCII grid (`.asc`) reading and writing.
//!
//! Used for the resource-unit index raster that accompanies every
//! full-landscape snapshot. Rows are stored north to south.

use crate::{
    error::{SnapshotError, SnapshotResult},
    grid::Grid,
    types::{GisTransform, PixelPos},
};
use std::fmt::Write as _;
use std::path::Path;

pub const DEFAULT_NODATA: f64 = -9999.0;

#[derive(Debug, Clone, PartialEq)]
pub struct AsciiRaster {
    pub ncols: usize,
    pub nrows: usize,
    /// Real-world coordinate of the south-west corner.
    pub xll: f64,
    pub yll: f64,
    pub cell_size: f64,
    pub nodata: f64,
    /// Row-major, south row first (same layout as `Grid`).
    values: Vec<f64>,
}

impl AsciiRaster {
    /// Snapshot a model grid into a raster in real-world coordinates.
    pub fn from_grid<T>(grid: &Grid<T>, gis: &GisTransform, value: impl Fn(&T) -> f64) -> Self {
        let extent = grid.extent();
        let (xll, yll) = gis.model_to_gis(extent.x_min, extent.y_min);
        Self {
            ncols: grid.size_x() as usize,
            nrows: grid.size_y() as usize,
            xll,
            yll,
            cell_size: grid.cell_size(),
            nodata: DEFAULT_NODATA,
            values: grid.values().iter().map(value).collect(),
        }
    }

    pub fn read(path: &Path) -> SnapshotResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text).map_err(|reason| SnapshotError::Raster {
            path: path.to_path_buf(),
            reason,
        })
    }

    pub fn write(&self, path: &Path) -> SnapshotResult<()> {
        std::fs::write(path, self.to_ascii())?;
        Ok(())
    }

    pub fn parse(text: &str) -> Result<Self, String> {
        let mut ncols = None;
        let mut nrows = None;
        let mut xll = None;
        let mut yll = None;
        let mut cell_size = None;
        let mut nodata = DEFAULT_NODATA;
        let mut rows: Vec<Vec<f64>> = Vec::new();

        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let first = line.split_whitespace().next().unwrap_or_default();
            if first.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
                let value = line
                    .split_whitespace()
                    .nth(1)
                    .ok_or_else(|| format!("line {}: header '{first}' has no value", line_no + 1))?;
                let parsed: f64 = value
                    .parse()
                    .map_err(|_| format!("line {}: bad header value '{value}'", line_no + 1))?;
                match first.to_ascii_lowercase().as_str() {
                    "ncols" => ncols = Some(parsed as usize),
                    "nrows" => nrows = Some(parsed as usize),
                    "xllcorner" => xll = Some(parsed),
                    "yllcorner" => yll = Some(parsed),
                    "cellsize" => cell_size = Some(parsed),
                    "nodata_value" => nodata = parsed,
                    other => return Err(format!("line {}: unknown header '{other}'", line_no + 1)),
                }
                continue;
            }
            let row = line
                .split_whitespace()
                .map(|v| v.parse::<f64>().map_err(|_| format!("line {}: bad value '{v}'", line_no + 1)))
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(row);
        }

        let ncols = ncols.ok_or("missing ncols")?;
        let nrows = nrows.ok_or("missing nrows")?;
        let xll = xll.ok_or("missing xllcorner")?;
        let yll = yll.ok_or("missing yllcorner")?;
        let cell_size = cell_size.ok_or("missing cellsize")?;
        if cell_size <= 0.0 {
            return Err(format!("cellsize must be positive, got {cell_size}"));
        }
        if rows.len() != nrows || rows.iter().any(|r| r.len() != ncols) {
            return Err(format!("expected {nrows} rows of {ncols} values"));
        }

        // File rows run north to south; flip into south-first order.
        let values = rows.into_iter().rev().flatten().collect();
        Ok(Self { ncols, nrows, xll, yll, cell_size, nodata, values })
    }

    pub fn to_ascii(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "ncols {}", self.ncols);
        let _ = writeln!(out, "nrows {}", self.nrows);
        let _ = writeln!(out, "xllcorner {}", self.xll);
        let _ = writeln!(out, "yllcorner {}", self.yll);
        let _ = writeln!(out, "cellsize {}", self.cell_size);
        let _ = writeln!(out, "NODATA_value {}", self.nodata);
        for y in (0..self.nrows).rev() {
            let row = &self.values[y * self.ncols..(y + 1) * self.ncols];
            let line: Vec<String> = row.iter().map(|v| v.to_string()).collect();
            let _ = writeln!(out, "{}", line.join(" "));
        }
        out
    }

    pub fn cell(&self, pos: PixelPos) -> Option<f64> {
        if pos.x < 0 || pos.y < 0 || pos.x as usize >= self.ncols || pos.y as usize >= self.nrows {
            return None;
        }
        Some(self.values[pos.y as usize * self.ncols + pos.x as usize])
    }

    /// Value at a real-world coordinate; `None` outside the raster or on nodata.
    pub fn value_at(&self, x: f64, y: f64) -> Option<f64> {
        let pos = PixelPos::new(
            ((x - self.xll) / self.cell_size).floor() as i32,
            ((y - self.yll) / self.cell_size).floor() as i32,
        );
        self.cell(pos).filter(|v| *v != self.nodata)
    }
}
