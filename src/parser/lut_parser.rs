//! Parser for binary detector-element lookup tables

use crate::types::lut::{LUT_RECORD_BYTES, LookupTable, LutEntry};
use winnow::{
    Parser,
    binary::le_f32,
    combinator::repeat,
    error::ContextError,
};

/// Parses one LUT record (24 bytes):
/// - 3 little-endian f32: element centre x, y, z (mm)
/// - 3 little-endian f32: orientation vx, vy, vz
pub fn parse_lut_entry(input: &mut &[u8]) -> Result<LutEntry, ContextError> {
    (le_f32, le_f32, le_f32, le_f32, le_f32, le_f32)
        .map(|(x, y, z, vx, vy, vz)| {
            LutEntry::builder()
                .position([x, y, z])
                .orientation([vx, vy, vz])
                .build()
        })
        .parse_next(input)
}

/// Parses every complete record in `input` into a lookup table.
///
/// Bytes past the last complete record are left in `input`; callers decide
/// whether a remainder is an error.
pub fn parse_lookup_table(input: &mut &[u8]) -> Result<LookupTable, ContextError> {
    let num_records = input.len() / LUT_RECORD_BYTES;
    repeat(num_records, parse_lut_entry)
        .map(|entries: Vec<LutEntry>| LookupTable::from_entries(&entries))
        .parse_next(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(values: &[f32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    #[test]
    fn test_parse_lut_entry() {
        let bytes = encode(&[1.5, -2.0, 3.25, 0.0, 1.0, 0.0]);
        let mut input = bytes.as_slice();
        let entry = parse_lut_entry(&mut input).unwrap();
        assert_eq!(entry.position, [1.5, -2.0, 3.25]);
        assert_eq!(entry.orientation, [0.0, 1.0, 0.0]);
        assert!(input.is_empty());
    }

    #[test]
    fn test_parse_lookup_table_leaves_remainder() {
        let mut bytes = encode(&[
            0.0, 0.0, 0.0, 1.0, 0.0, 0.0, //
            10.0, 0.0, 0.0, 1.0, 0.0, 0.0,
        ]);
        bytes.extend_from_slice(&[0xAA, 0xBB]);

        let mut input = bytes.as_slice();
        let table = parse_lookup_table(&mut input).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(1).unwrap().position, [10.0, 0.0, 0.0]);
        assert_eq!(input, &[0xAA, 0xBB]);
    }

    #[test]
    fn test_parse_empty_lookup_table() {
        let mut input: &[u8] = &[];
        let table = parse_lookup_table(&mut input).unwrap();
        assert!(table.is_empty());
    }
}
