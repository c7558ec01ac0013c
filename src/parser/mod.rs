//! Decoders for LUT files, list-mode data and headers, and input file names

mod filename_parser;
mod header_parser;
mod listmode_parser;
mod lut_parser;

// Re-export the parsing functions
pub use filename_parser::{parse_coincidence_filename, parse_coincidence_name};
pub use header_parser::{parse_header_line, parse_listmode_header};
pub use listmode_parser::{parse_listmode_data, parse_listmode_record};
pub use lut_parser::{parse_lookup_table, parse_lut_entry};
