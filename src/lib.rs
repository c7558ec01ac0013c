//! Coincidence sorting of simulated PET singles and export to list-mode data.

pub mod error;
pub mod listmode_file;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod processing;
#[cfg(feature = "python")]
pub mod python;
pub mod spatial_index;
pub mod types;
pub mod utils;

pub use error::{LxePetError, Result};
pub use listmode_file::ListModeFile;
pub use pipeline::{CoincidenceSorter, ConversionOutput, ListModeConverter};
pub use processing::{CoincidenceStats, find_coincidences, quantize};
pub use spatial_index::SpatialIndex;
pub use types::{
    CoincidenceConfig, CoincidencePair, ConfigOption, ListModeHeader, LookupTable, LutEntry,
    QuantizedEvent, ScannerName, SingleEvent,
};
