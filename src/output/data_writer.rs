use crate::error::{LxePetError, Result};
use crate::types::event::QuantizedEvent;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Encode events as back-to-back 12-byte little-endian records.
///
/// No count, padding or trailer is written; the number of events is the
/// byte length divided by 12.
pub fn write_listmode_records<W: Write>(writer: &mut W, events: &[QuantizedEvent]) -> std::io::Result<()> {
    for event in events {
        writer.write_all(&event.to_le_bytes())?;
    }
    Ok(())
}

/// Write list-mode data to `path`, replacing any existing file.
///
/// Returns the number of bytes written.
pub fn write_listmode_data(path: impl AsRef<Path>, events: &[QuantizedEvent]) -> Result<u64> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| LxePetError::io(path, e))?;
    let mut writer = BufWriter::new(file);

    write_listmode_records(&mut writer, events).map_err(|e| LxePetError::io(path, e))?;
    writer.flush().map_err(|e| LxePetError::io(path, e))?;

    Ok((events.len() * QuantizedEvent::RECORD_SIZE) as u64)
}
