//! Parser for list-mode event data (`.cdf`)

use crate::error::{LxePetError, Result};
use crate::types::event::QuantizedEvent;
use winnow::{
    Parser,
    binary::le_u32,
    combinator::repeat,
    error::ContextError,
};

/// Parses a single list-mode record (12 bytes):
/// - u32: sequence index
/// - u32: first detector element
/// - u32: second detector element
pub fn parse_listmode_record(input: &mut &[u8]) -> std::result::Result<QuantizedEvent, ContextError> {
    (le_u32, le_u32, le_u32)
        .map(|(sequence_index, element_index1, element_index2)| {
            QuantizedEvent::builder()
                .sequence_index(sequence_index)
                .element_index1(element_index1)
                .element_index2(element_index2)
                .build()
        })
        .parse_next(input)
}

/// Decodes a whole list-mode data buffer.
///
/// The format carries no count or trailer, so the byte length must be an exact
/// multiple of the record size.
pub fn parse_listmode_data(data: &[u8]) -> Result<Vec<QuantizedEvent>> {
    if data.len() % QuantizedEvent::RECORD_SIZE != 0 {
        return Err(LxePetError::MalformedListModeData { len: data.len() });
    }
    let num_records = data.len() / QuantizedEvent::RECORD_SIZE;

    let mut input = data;
    repeat(num_records, parse_listmode_record)
        .parse_next(&mut input)
        .map_err(|_: ContextError| LxePetError::MalformedListModeData { len: data.len() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_listmode_data() -> Result<()> {
        let bytes: Vec<u8> = [[0u32, 17, 42], [1, 3, 900_000]]
            .iter()
            .flatten()
            .flat_map(|v| v.to_le_bytes())
            .collect();

        let events = parse_listmode_data(&bytes)?;
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].sequence_index, 1);
        assert_eq!(events[1].element_index1, 3);
        assert_eq!(events[1].element_index2, 900_000);
        Ok(())
    }

    #[test]
    fn test_truncated_data_is_rejected() {
        let bytes = vec![0u8; 13];
        assert!(matches!(
            parse_listmode_data(&bytes),
            Err(LxePetError::MalformedListModeData { len: 13 })
        ));
    }

    #[test]
    fn test_empty_data_has_no_events() -> Result<()> {
        assert!(parse_listmode_data(&[])?.is_empty());
        Ok(())
    }
}
