use crate::error::{LxePetError, Result};
use crate::types::header::{ListModeHeader, keys};
use std::fmt::Write as _;
use std::path::Path;

/// Render a header in the line order the reconstruction software reads.
///
/// Every line is `Key: Value` terminated by `\n`. The correction and TOF flags
/// are always 0: no correction data accompanies the events.
pub fn format_header(header: &ListModeHeader) -> String {
    let mut text = String::new();
    let mut line = |key: &str, value: &dyn std::fmt::Display| {
        // writing to a String cannot fail
        let _ = writeln!(text, "{key}: {value}");
    };

    line(keys::DATA_FILENAME, &header.data_filename);
    line(keys::NUM_EVENTS, &header.num_events);
    line(keys::DATA_MODE, &ListModeHeader::DATA_MODE);
    line(keys::DATA_TYPE, &ListModeHeader::DATA_TYPE);
    line(keys::START_TIME, &header.start_time_s);
    line(keys::DURATION, &header.duration_s);
    line(keys::SCANNER_NAME, &header.scanner);
    line(keys::CALIBRATION_FACTOR, &format!("{:?}", header.calibration_factor));
    line(keys::ISOTOPE, &header.isotope);
    for flag in keys::CORRECTION_FLAGS {
        line(flag, &0);
    }
    line(keys::MAX_LINES_PER_EVENT, &header.max_lines_per_event);

    text
}

/// Write the header to `path`, replacing any existing file
pub fn write_header(path: impl AsRef<Path>, header: &ListModeHeader) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, format_header(header)).map_err(|e| LxePetError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_listmode_header;
    use crate::types::header::ScannerName;

    fn header(num_events: u64, scanner: ScannerName) -> ListModeHeader {
        ListModeHeader::builder()
            .data_filename("/out/coincidence_LXe_src0.0cm_original.cdf".to_string())
            .num_events(num_events)
            .scanner(scanner)
            .build()
    }

    #[test]
    fn test_header_text_is_exact() {
        let expected = "\
Data filename: /out/coincidence_LXe_src0.0cm_original.cdf
Number of events: 1234
Data mode: list-mode
Data type: PET
Start time (s): 0
Duration (s): 10
Scanner name: PET_PHILIPS_VEREOS
Calibration factor: 1.0
Isotope: F-18
TOF information flag: 0
Attenuation correction flag: 0
Normalization correction flag: 0
Scatter correction flag: 0
Random correction flag: 0
Maximum number of lines per event: 1
";
        assert_eq!(format_header(&header(1234, ScannerName::PhilipsVereos)), expected);
    }

    #[test]
    fn test_header_round_trip() -> Result<()> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.cdh");
        let written = header(0, ScannerName::PhilipsVereosSuperFine);

        write_header(&path, &written)?;
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("Number of events: 0\n"));
        assert!(text.contains("Scanner name: PET_PHILIPS_VEREOS_SUPER_FINE\n"));
        assert_eq!(text.lines().count(), 15);

        assert_eq!(parse_listmode_header(&text)?, written);
        Ok(())
    }
}
