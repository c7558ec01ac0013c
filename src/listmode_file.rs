use crate::error::{LxePetError, Result};
use crate::parser::{parse_listmode_data, parse_listmode_header, parse_listmode_record};
use crate::types::{ListModeHeader, QuantizedEvent};
use crate::utils::file_utils::{MappedFile, read_binary_file_mmap};
use std::path::Path;

/// A `.cdf` data file opened for reading, with its `.cdh` header if given
pub struct ListModeFile {
    pub header: Option<ListModeHeader>,
    mmap_data: MappedFile,
}

impl ListModeFile {
    /// Map the data file and parse the optional header.
    ///
    /// Fails when the data is not a whole number of 12-byte records.
    pub fn open(data_path: impl AsRef<Path>, header_path: Option<&Path>) -> Result<Self> {
        let mmap_data = read_binary_file_mmap(data_path)?;
        if mmap_data.len() % QuantizedEvent::RECORD_SIZE != 0 {
            return Err(LxePetError::MalformedListModeData {
                len: mmap_data.len(),
            });
        }

        let header = match header_path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|e| LxePetError::io(path, e))?;
                Some(parse_listmode_header(&text)?)
            }
            None => None,
        };

        Ok(Self { header, mmap_data })
    }

    pub fn num_events(&self) -> usize {
        self.mmap_data.len() / QuantizedEvent::RECORD_SIZE
    }

    /// Decode the `index`-th record without touching the rest of the file
    pub fn get_event(&self, index: usize) -> Option<QuantizedEvent> {
        let start = index.checked_mul(QuantizedEvent::RECORD_SIZE)?;
        let end = start.checked_add(QuantizedEvent::RECORD_SIZE)?;
        let mut record = self.mmap_data.get(start..end)?;
        parse_listmode_record(&mut record).ok()
    }

    pub fn events(&self) -> Result<Vec<QuantizedEvent>> {
        parse_listmode_data(&self.mmap_data)
    }

    /// Whether the header's event count matches the data, `true` without a header
    pub fn is_consistent(&self) -> bool {
        self.header
            .as_ref()
            .is_none_or(|h| h.num_events == self.num_events() as u64)
    }

    pub fn get_summary(&self) -> String {
        let mut result = String::new();

        result.push_str("List-mode data:\n");
        result.push_str(&format!("  Events: {}\n", self.num_events()));
        if let Some(first) = self.get_event(0) {
            result.push_str(&format!(
                "  First event: #{} elements {} / {}\n",
                first.sequence_index, first.element_index1, first.element_index2
            ));
        }

        match &self.header {
            Some(header) => {
                result.push_str("\nHeader:\n");
                result.push_str(&format!("  Data file: {}\n", header.data_filename));
                result.push_str(&format!("  Scanner: {}\n", header.scanner));
                result.push_str(&format!("  Events: {}\n", header.num_events));
                result.push_str(&format!("  Isotope: {}\n", header.isotope));
                if !self.is_consistent() {
                    result.push_str("  WARNING: header event count does not match data\n");
                }
            }
            None => result.push_str("\nNo header\n"),
        }

        result
    }
}
