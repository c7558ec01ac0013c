//! Python bindings, built with the `python` feature

use crate::error::LxePetError;
use crate::pipeline::{CoincidenceSorter, ListModeConverter};
use crate::types::{CoincidenceConfig, ConfigOption};
use crate::utils::tables::{coincidences_to_dataframe, read_table, singles_from_dataframe};
use crate::utils::{resolve_run_metadata, resolve_single_input};
use pyo3::{
    Bound, PyErr, PyResult, exceptions::PyFileNotFoundError, exceptions::PyValueError, pyfunction,
    pymodule, types::PyModule, types::PyModuleMethods, wrap_pyfunction,
};
use pyo3_polars::PyDataFrame;
use std::path::PathBuf;

impl From<LxePetError> for PyErr {
    fn from(err: LxePetError) -> PyErr {
        match err {
            LxePetError::Io { .. } | LxePetError::NoInputFound { .. } => {
                PyFileNotFoundError::new_err(err.to_string())
            }
            _ => PyValueError::new_err(err.to_string()),
        }
    }
}

/// Sorts a singles table into coincidences.
///
/// Args:
///     file_path (str): CSV or Parquet singles table.
///     time_window_ns (float): Coincidence window in ns.
///     min_separation_mm (float): Minimum distance between the two hits in mm.
///
/// Returns:
///     polars.DataFrame: One row per coincidence.
///
/// Raises:
///     FileNotFoundError: If the table cannot be opened.
///     ValueError: If a column is missing or a parameter is invalid.
#[pyfunction]
#[pyo3(signature = (file_path, time_window_ns = 4.5, min_separation_mm = 20.0))]
fn find_coincidences_to_py_df(
    file_path: PathBuf,
    time_window_ns: f64,
    min_separation_mm: f64,
) -> PyResult<PyDataFrame> {
    let config = CoincidenceConfig::builder()
        .time_window_ns(time_window_ns)
        .min_separation_mm(min_separation_mm)
        .build();
    let sorter = CoincidenceSorter::new(config)?;

    let singles = singles_from_dataframe(&read_table(&file_path)?)?;
    let (pairs, _) = sorter.sort(&singles);
    Ok(PyDataFrame(coincidences_to_dataframe(&pairs)?))
}

/// Converts the single coincidence table in `input_dir` to list-mode data.
///
/// Returns:
///     tuple[str, str, int]: Data path, header path and number of events.
#[pyfunction]
#[pyo3(signature = (input_dir, config_path, output_dir, option = "original", material = None, source_distance_cm = None))]
fn convert_to_castor(
    input_dir: PathBuf,
    config_path: PathBuf,
    output_dir: PathBuf,
    option: &str,
    material: Option<&str>,
    source_distance_cm: Option<f64>,
) -> PyResult<(String, String, u64)> {
    let option: ConfigOption = option.parse()?;
    let input = resolve_single_input(&input_dir, material, source_distance_cm)?;
    let (material, distance) = resolve_run_metadata(&input, material, source_distance_cm)?;

    let converter = ListModeConverter::for_option(&config_path, option, None)?;
    let output = converter.convert_file(&input, &output_dir, &material, distance, option)?;
    Ok((
        output.data_path.display().to_string(),
        output.header_path.display().to_string(),
        output.num_events,
    ))
}

/// A Python module implemented in Rust. The name of this function must match
/// the `lib.name` setting in the `Cargo.toml`, else Python will not be able to
/// import the module.
#[pymodule]
fn lxepet(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(find_coincidences_to_py_df, m)?)?;
    m.add_function(wrap_pyfunction!(convert_to_castor, m)?)?;
    Ok(())
}
