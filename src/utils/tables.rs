//! Conversion between event records and Polars tables

use crate::error::{LxePetError, Result};
use crate::types::event::{CoincidencePair, Position, SingleEvent};
use polars::prelude::*;
use polars_io::prelude::ParquetWriter;
use std::fs::File;
use std::path::Path;

/// Singles columns as exported by the simulation's digitizer
pub mod singles_columns {
    pub const TIME: &str = "GlobalTime";
    pub const X: &str = "PostPosition_X";
    pub const Y: &str = "PostPosition_Y";
    pub const Z: &str = "PostPosition_Z";
    pub const ENERGY: &str = "TotalEnergyDeposit";

    pub const ALL: [&str; 5] = [TIME, X, Y, Z, ENERGY];
}

/// Coincidence table columns, in file order
pub mod coincidence_columns {
    pub const X1: &str = "globalPosX1";
    pub const Y1: &str = "globalPosY1";
    pub const Z1: &str = "globalPosZ1";
    pub const X2: &str = "globalPosX2";
    pub const Y2: &str = "globalPosY2";
    pub const Z2: &str = "globalPosZ2";
    pub const TIME1: &str = "time1";
    pub const TIME2: &str = "time2";
    pub const ENERGY1: &str = "energy1";
    pub const ENERGY2: &str = "energy2";
    pub const DISTANCE: &str = "distance";
}

/// Read a CSV (with header) or Parquet table, chosen by file extension
pub fn read_table(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    let is_parquet = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("parquet"));

    let df = if is_parquet {
        let file = File::open(path).map_err(|e| LxePetError::io(path, e))?;
        ParquetReader::new(file).finish()?
    } else {
        CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()?
    };
    Ok(df)
}

/// Write a table as CSV with a header row, replacing any existing file
pub fn write_csv(df: &mut DataFrame, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut file = File::create(path).map_err(|e| LxePetError::io(path, e))?;
    CsvWriter::new(&mut file).include_header(true).finish(df)?;
    Ok(())
}

/// Write a table as Parquet when the extension says so, CSV otherwise
pub fn write_table(df: &mut DataFrame, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("parquet"))
    {
        let mut file = File::create(path).map_err(|e| LxePetError::io(path, e))?;
        ParquetWriter::new(&mut file).finish(df)?;
        return Ok(());
    }
    write_csv(df, path)
}

/// Extract a numeric column as f64, rejecting nulls
fn float_column(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let column = df.column(name).map_err(|_| LxePetError::InvalidColumn {
        column: name.to_string(),
        reason: "column not found".to_string(),
    })?;
    let series = column
        .as_materialized_series()
        .cast(&DataType::Float64)
        .map_err(|e| LxePetError::InvalidColumn {
            column: name.to_string(),
            reason: e.to_string(),
        })?;

    series
        .f64()?
        .iter()
        .enumerate()
        .map(|(row, value)| {
            value.ok_or_else(|| LxePetError::InvalidColumn {
                column: name.to_string(),
                reason: format!("null value in row {row}"),
            })
        })
        .collect()
}

/// Convert a singles table into events; row `k` becomes event `k`
pub fn singles_from_dataframe(df: &DataFrame) -> Result<Vec<SingleEvent>> {
    use singles_columns::*;

    // Validate presence first so a missing column gets a readable error
    for name in ALL {
        if df.column(name).is_err() {
            return Err(LxePetError::InvalidColumn {
                column: name.to_string(),
                reason: "column not found in singles table".to_string(),
            });
        }
    }

    let selected = df
        .clone()
        .lazy()
        .select(ALL.map(|name| col(name).cast(DataType::Float64)))
        .collect()?;

    let time = float_column(&selected, TIME)?;
    let x = float_column(&selected, X)?;
    let y = float_column(&selected, Y)?;
    let z = float_column(&selected, Z)?;
    let energy = float_column(&selected, ENERGY)?;

    Ok(itertools::izip!(time, x, y, z, energy)
        .map(|(time, x, y, z, energy)| SingleEvent {
            time,
            position: [x, y, z],
            energy,
        })
        .collect())
}

/// Build the coincidence table written between sorting and conversion
pub fn coincidences_to_dataframe(pairs: &[CoincidencePair]) -> Result<DataFrame> {
    use coincidence_columns::*;

    let pick = |f: fn(&CoincidencePair) -> f64| -> Vec<f64> { pairs.iter().map(f).collect() };

    let df = DataFrame::new(vec![
        Series::new(X1.into(), &pick(|p| p.position1[0])).into(),
        Series::new(Y1.into(), &pick(|p| p.position1[1])).into(),
        Series::new(Z1.into(), &pick(|p| p.position1[2])).into(),
        Series::new(X2.into(), &pick(|p| p.position2[0])).into(),
        Series::new(Y2.into(), &pick(|p| p.position2[1])).into(),
        Series::new(Z2.into(), &pick(|p| p.position2[2])).into(),
        Series::new(TIME1.into(), &pick(|p| p.time1)).into(),
        Series::new(TIME2.into(), &pick(|p| p.time2)).into(),
        Series::new(ENERGY1.into(), &pick(|p| p.energy1)).into(),
        Series::new(ENERGY2.into(), &pick(|p| p.energy2)).into(),
        Series::new(DISTANCE.into(), &pick(|p| p.distance)).into(),
    ])?;
    Ok(df)
}

/// Read the two hit positions of every row of a coincidence table
pub fn coincidence_positions(df: &DataFrame) -> Result<(Vec<Position>, Vec<Position>)> {
    use coincidence_columns::*;

    let positions = |cx: &str, cy: &str, cz: &str| -> Result<Vec<Position>> {
        let xs = float_column(df, cx)?;
        let ys = float_column(df, cy)?;
        let zs = float_column(df, cz)?;
        Ok(itertools::izip!(xs, ys, zs).map(|(x, y, z)| [x, y, z]).collect())
    };

    Ok((positions(X1, Y1, Z1)?, positions(X2, Y2, Z2)?))
}
