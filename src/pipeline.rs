//! Run-level entry points: singles to coincidence table, coincidence table to
//! list-mode data.

use crate::error::{LxePetError, Result};
use crate::output::{write_header, write_listmode_data};
use crate::processing::{CoincidenceStats, find_coincidences_with_stats, quantize, quantize_positions};
use crate::spatial_index::SpatialIndex;
use crate::types::{
    CoincidenceConfig, CoincidencePair, ConfigOption, ListModeHeader, LookupTable, Position,
    QuantizedEvent, ScannerName, SingleEvent,
};
use crate::utils::tables::{
    coincidence_positions, coincidences_to_dataframe, read_table, singles_from_dataframe, write_table,
};
use crate::utils::{output_prefix, read_lookup_table};
use bon::bon;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Sorts singles into coincidences
pub struct CoincidenceSorter {
    config: CoincidenceConfig,
}

impl CoincidenceSorter {
    pub fn new(config: CoincidenceConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CoincidenceConfig {
        &self.config
    }

    pub fn sort(&self, singles: &[SingleEvent]) -> (Vec<CoincidencePair>, CoincidenceStats) {
        find_coincidences_with_stats(singles, &self.config)
    }

    /// Read a singles table, sort it and write the coincidence table
    pub fn sort_file(&self, input: &Path, output: &Path) -> Result<CoincidenceStats> {
        let singles = singles_from_dataframe(&read_table(input)?)?;
        info!(
            input = %input.display(),
            singles = singles.len(),
            window_ns = self.config.time_window_ns,
            min_separation_mm = self.config.min_separation_mm,
            "searching for coincidences"
        );

        let (pairs, stats) = self.sort(&singles);
        if pairs.is_empty() {
            warn!(singles = stats.singles, "no coincidences found");
        }

        let mut df = coincidences_to_dataframe(&pairs)?;
        write_table(&mut df, output)?;
        info!(
            output = %output.display(),
            coincidences = stats.coincidences,
            unpaired = stats.unpaired,
            "saved coincidences"
        );
        Ok(stats)
    }
}

/// Paths and size of one written `.cdf`/`.cdh` pair
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionOutput {
    pub data_path: PathBuf,
    pub header_path: PathBuf,
    pub num_events: u64,
}

/// Turns coincidences into list-mode data for one scanner configuration.
///
/// The spatial index over the LUT is built once and reused for every
/// conversion done with this converter.
pub struct ListModeConverter {
    config_name: String,
    index: SpatialIndex,
    thread_pool: Option<rayon::ThreadPool>,
}

#[bon]
impl ListModeConverter {
    /// The scanner label is resolved from `config_name` only when a header is
    /// written, so an unknown name fails after the data file exists.
    #[builder]
    pub fn new(
        lookup_table: LookupTable,
        config_name: String,
        threads: Option<usize>,
    ) -> Result<Self> {
        let index = SpatialIndex::build(&lookup_table)?;
        let thread_pool = match threads {
            Some(n) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| LxePetError::InvalidParameter(format!("thread pool: {e}")))?,
            ),
            None => None,
        };
        info!(config = %config_name, elements = index.len(), "built element index");

        Ok(Self {
            config_name,
            index,
            thread_pool,
        })
    }

    /// Load `<config_path>/<config name>_binary.lut` for a configuration option
    pub fn for_option(config_path: &Path, option: ConfigOption, threads: Option<usize>) -> Result<Self> {
        let lut_path = config_path.join(option.lut_file_name());
        let lookup_table = read_lookup_table(&lut_path)?;
        Self::builder()
            .lookup_table(lookup_table)
            .config_name(option.config_name().to_string())
            .maybe_threads(threads)
            .build()
    }

    pub fn config_name(&self) -> &str {
        &self.config_name
    }

    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    fn in_pool<T: Send>(&self, op: impl FnOnce() -> T + Send) -> T {
        match &self.thread_pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }

    pub fn quantize(&self, pairs: &[CoincidencePair]) -> Result<Vec<QuantizedEvent>> {
        self.in_pool(|| quantize(pairs, &self.index))
    }

    pub fn quantize_positions(&self, positions1: &[Position], positions2: &[Position]) -> Result<Vec<QuantizedEvent>> {
        self.in_pool(|| quantize_positions(positions1, positions2, &self.index))
    }

    /// Write events to `<output_dir>/<prefix>.cdf` and its header to `<prefix>.cdh`.
    ///
    /// The header is written last since it needs the final event count.
    pub fn write(&self, events: &[QuantizedEvent], output_dir: &Path, prefix: &str) -> Result<ConversionOutput> {
        std::fs::create_dir_all(output_dir).map_err(|e| LxePetError::io(output_dir, e))?;
        let data_path = output_dir.join(format!("{prefix}.cdf"));
        let header_path = output_dir.join(format!("{prefix}.cdh"));

        write_listmode_data(&data_path, events)?;
        let num_events = events.len() as u64;
        info!(output = %data_path.display(), events = num_events, "wrote list-mode data");

        let header = ListModeHeader::builder()
            .data_filename(data_path.display().to_string())
            .num_events(num_events)
            .scanner(ScannerName::from_config_name(&self.config_name)?)
            .build();
        write_header(&header_path, &header)?;
        info!(output = %header_path.display(), "wrote header");

        Ok(ConversionOutput {
            data_path,
            header_path,
            num_events,
        })
    }

    pub fn convert_pairs(&self, pairs: &[CoincidencePair], output_dir: &Path, prefix: &str) -> Result<ConversionOutput> {
        let events = self.quantize(pairs)?;
        self.write(&events, output_dir, prefix)
    }

    /// Convert a coincidence table into a `.cdf`/`.cdh` pair named after the
    /// run's material, source distance and configuration option.
    pub fn convert_file(
        &self,
        input: &Path,
        output_dir: &Path,
        material: &str,
        source_distance_cm: f64,
        option: ConfigOption,
    ) -> Result<ConversionOutput> {
        let df = read_table(input)?;
        let (positions1, positions2) = coincidence_positions(&df)?;
        info!(input = %input.display(), coincidences = positions1.len(), "loaded coincidences");
        if positions1.is_empty() {
            warn!(input = %input.display(), "coincidence table is empty");
        }

        let events = self.quantize_positions(&positions1, &positions2)?;
        let prefix = output_prefix(material, source_distance_cm, option);
        self.write(&events, output_dir, &prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LutEntry;

    fn line_table() -> LookupTable {
        let entries: Vec<LutEntry> = (0..3)
            .map(|i| {
                LutEntry::builder()
                    .position([i as f32 * 10.0, 0.0, 0.0])
                    .orientation([1.0, 0.0, 0.0])
                    .build()
            })
            .collect();
        LookupTable::from_entries(&entries)
    }

    #[test]
    fn test_sorter_rejects_invalid_config() {
        let config = CoincidenceConfig::builder().time_window_ns(f64::INFINITY).build();
        assert!(CoincidenceSorter::new(config).is_err());
    }

    #[test]
    fn test_unknown_config_name_fails_at_header() -> Result<()> {
        let converter = ListModeConverter::builder()
            .lookup_table(line_table())
            .config_name("siemens_vision".to_string())
            .build()?;
        let dir = tempfile::tempdir().unwrap();

        let err = converter.write(&[], dir.path(), "run").unwrap_err();
        assert!(matches!(err, LxePetError::UnknownConfigVariant(_)));
        assert!(dir.path().join("run.cdf").exists());
        assert!(!dir.path().join("run.cdh").exists());
        Ok(())
    }

    #[test]
    fn test_empty_lut_is_a_configuration_error() {
        let result = ListModeConverter::builder()
            .lookup_table(LookupTable::from_entries(&[]))
            .config_name(ConfigOption::Original.config_name().to_string())
            .build();
        assert!(matches!(result, Err(LxePetError::EmptyLookupTable)));
    }

    #[test]
    fn test_thread_pool_gives_same_result() -> Result<()> {
        let pairs: Vec<CoincidencePair> = (0..50)
            .map(|i| {
                CoincidencePair::builder()
                    .position1([i as f64, 0.0, 0.0])
                    .position2([20.0 - i as f64 / 5.0, 0.0, 0.0])
                    .time1(0.0)
                    .time2(0.0)
                    .energy1(511.0)
                    .energy2(511.0)
                    .distance(0.0)
                    .build()
            })
            .collect();

        let default_pool = ListModeConverter::builder()
            .lookup_table(line_table())
            .config_name(ConfigOption::Fine.config_name().to_string())
            .build()?;
        let two_threads = ListModeConverter::builder()
            .lookup_table(line_table())
            .config_name(ConfigOption::Fine.config_name().to_string())
            .threads(2)
            .build()?;

        assert_eq!(default_pool.quantize(&pairs)?, two_threads.quantize(&pairs)?);
        Ok(())
    }
}
