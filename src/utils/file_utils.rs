use crate::error::{LxePetError, Result};
use crate::parser::{parse_coincidence_filename, parse_lookup_table};
use crate::types::lut::{LUT_RECORD_BYTES, LookupTable};
use crate::utils::misc::coincidence_table_name;
use memmap2::Mmap;
use std::fs::File;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Read-only view of a whole file; empty files are not mapped
pub enum MappedFile {
    Empty,
    Mapped(Mmap),
}

impl Deref for MappedFile {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            MappedFile::Empty => &[],
            MappedFile::Mapped(mmap) => &mmap[..],
        }
    }
}

/// Read a binary file using memory mapping for improved performance
/// This is more efficient for large files as it doesn't load the entire file into RAM
pub fn read_binary_file_mmap(path: impl AsRef<Path>) -> Result<MappedFile> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| LxePetError::io(path, e))?;
    let len = file.metadata().map_err(|e| LxePetError::io(path, e))?.len();
    if len == 0 {
        return Ok(MappedFile::Empty);
    }
    // Safety: The file is not modified while the mmap is active
    let mmap = unsafe { Mmap::map(&file) }.map_err(|e| LxePetError::io(path, e))?;
    Ok(MappedFile::Mapped(mmap))
}

/// Load a binary LUT of consecutive `(x, y, z, vx, vy, vz)` f32 records
pub fn read_lookup_table(path: impl AsRef<Path>) -> Result<LookupTable> {
    let path = path.as_ref();
    let data = read_binary_file_mmap(path)?;
    if data.len() % LUT_RECORD_BYTES != 0 {
        return Err(LxePetError::MalformedLookupTable {
            path: path.to_path_buf(),
            len: data.len(),
        });
    }

    let mut input: &[u8] = &data;
    let table = parse_lookup_table(&mut input).map_err(|_| LxePetError::MalformedLookupTable {
        path: path.to_path_buf(),
        len: data.len(),
    })?;

    debug!(path = %path.display(), elements = table.len(), "loaded lookup table");
    Ok(table)
}

/// Find the one coincidence table to convert.
///
/// With both `material` and `source_distance_cm` the exact table name is
/// looked up, otherwise any `coincidence_*.csv` in `dir` qualifies. Zero or
/// several candidates abort the run.
pub fn resolve_single_input(
    dir: impl AsRef<Path>,
    material: Option<&str>,
    source_distance_cm: Option<f64>,
) -> Result<PathBuf> {
    let dir = dir.as_ref();
    let (pattern, exact) = match (material, source_distance_cm) {
        (Some(material), Some(distance)) => (coincidence_table_name(material, distance), true),
        _ => ("coincidence_*.csv".to_string(), false),
    };

    let entries = std::fs::read_dir(dir).map_err(|e| LxePetError::io(dir, e))?;
    let mut candidates: Vec<String> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| LxePetError::io(dir, e))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let matches = if exact {
            name == pattern
        } else {
            name.starts_with("coincidence_") && name.ends_with(".csv")
        };
        if matches {
            candidates.push(name);
        }
    }
    candidates.sort();

    match candidates.len() {
        0 => Err(LxePetError::NoInputFound {
            pattern,
            dir: dir.to_path_buf(),
        }),
        1 => {
            let path = dir.join(&candidates[0]);
            info!(input = %candidates[0], "using input file");
            Ok(path)
        }
        _ => Err(LxePetError::AmbiguousInput { candidates }),
    }
}

/// Material and source distance of a run, from its file name with optional overrides
pub fn resolve_run_metadata(
    input: &Path,
    material: Option<&str>,
    source_distance_cm: Option<f64>,
) -> Result<(String, f64)> {
    let file_name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let (parsed_material, parsed_distance) = parse_coincidence_filename(&file_name)?;
    Ok((
        material.map(str::to_string).unwrap_or(parsed_material),
        source_distance_cm.unwrap_or(parsed_distance),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_lut(path: &Path, values: &[f32]) {
        let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        std::fs::write(path, bytes).unwrap();
    }

    #[test]
    fn test_read_lookup_table() -> Result<()> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scanner_binary.lut");
        write_lut(
            &path,
            &[
                0.0, 0.0, 0.0, 1.0, 0.0, 0.0, //
                10.0, 0.0, 0.0, 1.0, 0.0, 0.0, //
                20.0, 0.0, 0.0, 1.0, 0.0, 0.0,
            ],
        );
        let table = read_lookup_table(&path)?;
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(2).unwrap().position, [20.0, 0.0, 0.0]);
        Ok(())
    }

    #[test]
    fn test_lut_length_must_be_whole_records() {
        let dir = tempfile::tempdir().unwrap();
        for len in [23usize, 25] {
            let path = dir.path().join(format!("bad_{len}.lut"));
            std::fs::write(&path, vec![0u8; len]).unwrap();
            assert!(matches!(
                read_lookup_table(&path),
                Err(LxePetError::MalformedLookupTable { len: l, .. }) if l == len
            ));
        }
    }

    #[test]
    fn test_empty_lut_file_reads_as_empty_table() -> Result<()> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.lut");
        std::fs::write(&path, b"").unwrap();
        assert!(read_lookup_table(&path)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_missing_file_names_the_path() {
        let err = read_lookup_table("/definitely/not/here.lut").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.lut"));
    }

    #[test]
    fn test_resolve_single_input() -> Result<()> {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("coincidence_LXe_src25.0cm.csv"), "").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();

        let path = resolve_single_input(dir.path(), None, None)?;
        assert!(path.ends_with("coincidence_LXe_src25.0cm.csv"));

        let path = resolve_single_input(dir.path(), Some("LXe"), Some(25.0))?;
        assert!(path.ends_with("coincidence_LXe_src25.0cm.csv"));

        assert!(matches!(
            resolve_single_input(dir.path(), Some("LYSO"), Some(25.0)),
            Err(LxePetError::NoInputFound { .. })
        ));

        std::fs::write(dir.path().join("coincidence_LYSO_src0.0cm.csv"), "").unwrap();
        match resolve_single_input(dir.path(), None, None) {
            Err(err @ LxePetError::AmbiguousInput { .. }) => {
                assert!(err.to_string().contains("expected exactly one input file, but found 2"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn test_resolve_run_metadata_overrides() -> Result<()> {
        let path = Path::new("/data/coincidence_LXe_src25.0cm.csv");
        assert_eq!(resolve_run_metadata(path, None, None)?, ("LXe".to_string(), 25.0));
        assert_eq!(
            resolve_run_metadata(path, Some("BGO"), Some(50.0))?,
            ("BGO".to_string(), 50.0)
        );
        assert!(resolve_run_metadata(Path::new("/data/other.csv"), None, None).is_err());
        Ok(())
    }
}
