use crate::error::{LxePetError, Result};
use bon::Builder;
use std::fmt;
use std::str::FromStr;

/// Config name of the baseline (unsubdivided) virtual-crystal LUT
pub const BASELINE_CONFIG_NAME: &str = "philips_vereos_virtual_crystals";

/// Header keys, in the order they are written
pub mod keys {
    pub const DATA_FILENAME: &str = "Data filename";
    pub const NUM_EVENTS: &str = "Number of events";
    pub const DATA_MODE: &str = "Data mode";
    pub const DATA_TYPE: &str = "Data type";
    pub const START_TIME: &str = "Start time (s)";
    pub const DURATION: &str = "Duration (s)";
    pub const SCANNER_NAME: &str = "Scanner name";
    pub const CALIBRATION_FACTOR: &str = "Calibration factor";
    pub const ISOTOPE: &str = "Isotope";
    pub const TOF_FLAG: &str = "TOF information flag";
    pub const ATTENUATION_FLAG: &str = "Attenuation correction flag";
    pub const NORMALIZATION_FLAG: &str = "Normalization correction flag";
    pub const SCATTER_FLAG: &str = "Scatter correction flag";
    pub const RANDOM_FLAG: &str = "Random correction flag";
    pub const MAX_LINES_PER_EVENT: &str = "Maximum number of lines per event";

    /// Correction flags, all written as 0
    pub const CORRECTION_FLAGS: [&str; 5] = [
        TOF_FLAG,
        ATTENUATION_FLAG,
        NORMALIZATION_FLAG,
        SCATTER_FLAG,
        RANDOM_FLAG,
    ];
}

/// Scanner the reconstruction software should model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScannerName {
    PhilipsVereos,
    PhilipsVereosFine,
    PhilipsVereosSuperFine,
}

impl ScannerName {
    /// Classify a configuration variant name.
    ///
    /// Checked in order: contains `super_fine`, contains `fine`, equals the
    /// baseline name. Anything else is rejected.
    pub fn from_config_name(config_name: &str) -> Result<Self> {
        if config_name.contains("super_fine") {
            Ok(Self::PhilipsVereosSuperFine)
        } else if config_name.contains("fine") {
            Ok(Self::PhilipsVereosFine)
        } else if config_name == BASELINE_CONFIG_NAME {
            Ok(Self::PhilipsVereos)
        } else {
            Err(LxePetError::UnknownConfigVariant(config_name.to_string()))
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PhilipsVereos => "PET_PHILIPS_VEREOS",
            Self::PhilipsVereosFine => "PET_PHILIPS_VEREOS_FINE",
            Self::PhilipsVereosSuperFine => "PET_PHILIPS_VEREOS_SUPER_FINE",
        }
    }
}

impl fmt::Display for ScannerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScannerName {
    type Err = LxePetError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "PET_PHILIPS_VEREOS" => Ok(Self::PhilipsVereos),
            "PET_PHILIPS_VEREOS_FINE" => Ok(Self::PhilipsVereosFine),
            "PET_PHILIPS_VEREOS_SUPER_FINE" => Ok(Self::PhilipsVereosSuperFine),
            other => Err(LxePetError::UnknownConfigVariant(other.to_string())),
        }
    }
}

/// LUT granularity selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigOption {
    #[default]
    Original,
    Fine,
    SuperFine,
}

impl ConfigOption {
    /// Name of the scanner configuration this option refers to
    pub fn config_name(&self) -> &'static str {
        match self {
            Self::Original => BASELINE_CONFIG_NAME,
            Self::Fine => "philips_vereos_virtual_crystals_fine",
            Self::SuperFine => "philips_vereos_virtual_crystals_super_fine",
        }
    }

    /// File name of the binary LUT for this option
    pub fn lut_file_name(&self) -> String {
        format!("{}_binary.lut", self.config_name())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Original => "original",
            Self::Fine => "fine",
            Self::SuperFine => "super_fine",
        }
    }
}

impl fmt::Display for ConfigOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigOption {
    type Err = LxePetError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "original" => Ok(Self::Original),
            "fine" => Ok(Self::Fine),
            "super_fine" => Ok(Self::SuperFine),
            other => Err(LxePetError::UnknownConfigOption(other.to_string())),
        }
    }
}

/// Metadata written alongside list-mode data.
///
/// Only the data filename, event count and scanner vary between runs. The
/// remaining fields default to the values the downstream reconstruction
/// expects for uncorrected F-18 list-mode data.
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct ListModeHeader {
    pub data_filename: String,
    pub num_events: u64,
    pub scanner: ScannerName,
    #[builder(default = 0)]
    pub start_time_s: u32,
    #[builder(default = 10)]
    pub duration_s: u32,
    #[builder(default = 1.0)]
    pub calibration_factor: f64,
    #[builder(default = String::from("F-18"))]
    pub isotope: String,
    #[builder(default = 1)]
    pub max_lines_per_event: u32,
}

impl ListModeHeader {
    /// Data mode written to every header
    pub const DATA_MODE: &'static str = "list-mode";
    /// Data type written to every header
    pub const DATA_TYPE: &'static str = "PET";
}
