use crate::error::{LxePetError, Result};
use crate::types::header::{ListModeHeader, ScannerName, keys};
use std::collections::HashMap;
use std::str::FromStr;
use winnow::{
    Parser,
    combinator::separated_pair,
    error::ContextError,
    token::{rest, take_till},
};

/// Parses one `Key: Value` header line.
///
/// The key runs up to the first colon; the value is everything after the
/// `": "` separator, so values may contain colons themselves.
pub fn parse_header_line<'a>(input: &mut &'a str) -> std::result::Result<(&'a str, &'a str), ContextError> {
    separated_pair(take_till(1.., ':'), ": ", rest).parse_next(input)
}

/// Parses the text of a list-mode header file.
///
/// Data filename, event count and scanner name are required; the remaining
/// keys fall back to their defaults when absent.
pub fn parse_listmode_header(text: &str) -> Result<ListModeHeader> {
    // key -> (1-based line number, value)
    let mut fields: HashMap<&str, (usize, &str)> = HashMap::new();

    for (line_no, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let (key, value) = parse_header_line
            .parse(line)
            .map_err(|_| LxePetError::MalformedHeader {
                line: line_no + 1,
                content: line.to_string(),
            })?;
        fields.insert(key.trim(), (line_no + 1, value.trim()));
    }

    let required = |key: &str| -> Result<(usize, &str)> {
        fields
            .get(key)
            .copied()
            .ok_or_else(|| LxePetError::MissingHeaderKey(key.to_string()))
    };

    let data_filename = required(keys::DATA_FILENAME)?.1.to_string();
    let num_events = parse_value::<u64>(keys::NUM_EVENTS, required(keys::NUM_EVENTS)?)?;
    let scanner = ScannerName::from_str(required(keys::SCANNER_NAME)?.1)?;

    let mut header = ListModeHeader::builder()
        .data_filename(data_filename)
        .num_events(num_events)
        .scanner(scanner)
        .build();

    if let Some(&field) = fields.get(keys::START_TIME) {
        header.start_time_s = parse_value(keys::START_TIME, field)?;
    }
    if let Some(&field) = fields.get(keys::DURATION) {
        header.duration_s = parse_value(keys::DURATION, field)?;
    }
    if let Some(&field) = fields.get(keys::CALIBRATION_FACTOR) {
        header.calibration_factor = parse_value(keys::CALIBRATION_FACTOR, field)?;
    }
    if let Some(&(_, value)) = fields.get(keys::ISOTOPE) {
        header.isotope = value.to_string();
    }
    if let Some(&field) = fields.get(keys::MAX_LINES_PER_EVENT) {
        header.max_lines_per_event = parse_value(keys::MAX_LINES_PER_EVENT, field)?;
    }

    Ok(header)
}

fn parse_value<T: FromStr>(key: &str, (line, value): (usize, &str)) -> Result<T> {
    value.parse().map_err(|_| LxePetError::MalformedHeader {
        line,
        content: format!("{key}: {value}"),
    })
}
