//! Writers for list-mode data (`.cdf`) and its text header (`.cdh`)

mod data_writer;
mod header_writer;

pub use data_writer::{write_listmode_data, write_listmode_records};
pub use header_writer::{format_header, write_header};
