//! Type definitions for singles, coincidences, the LUT and list-mode metadata

pub mod config;
pub mod event;
pub mod header;
pub mod lut;

// Re-export the main types for convenience
pub use config::CoincidenceConfig;
pub use event::{CoincidencePair, Position, QuantizedEvent, SingleEvent};
pub use header::{ConfigOption, ListModeHeader, ScannerName};
pub use lut::{LookupTable, LutEntry};
