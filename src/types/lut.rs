use bon::{Builder, bon};
use ndarray::{Array2, ArrayView1, Axis};

/// Number of f32 values per LUT record: x, y, z, vx, vy, vz
pub const LUT_RECORD_FLOATS: usize = 6;
/// Number of bytes per LUT record
pub const LUT_RECORD_BYTES: usize = LUT_RECORD_FLOATS * 4;

/// One detector element: centre position and orientation
#[derive(Debug, Clone, Copy, PartialEq, Builder)]
pub struct LutEntry {
    pub position: [f32; 3],
    pub orientation: [f32; 3],
}

impl LutEntry {
    fn from_row(row: ArrayView1<'_, f32>) -> Self {
        Self {
            position: [row[0], row[1], row[2]],
            orientation: [row[3], row[4], row[5]],
        }
    }
}

/// Detector element lookup table.
///
/// Row `k` of `entries` is element `k`; the row order is the element index.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupTable {
    pub entries: Array2<f32>,
}

#[bon]
impl LookupTable {
    /// Build a table from consecutive `(x, y, z, vx, vy, vz)` groups.
    ///
    /// A trailing partial group is dropped; the parser rejects such input
    /// before it gets here.
    #[builder]
    pub fn new(values: Vec<f32>) -> Self {
        let rows = values.len() / LUT_RECORD_FLOATS;
        let mut values = values;
        values.truncate(rows * LUT_RECORD_FLOATS);
        let entries = Array2::from_shape_vec((rows, LUT_RECORD_FLOATS), values)
            .unwrap_or_else(|_| Array2::zeros((0, LUT_RECORD_FLOATS)));
        Self { entries }
    }

    pub fn from_entries(entries: &[LutEntry]) -> Self {
        let values = entries
            .iter()
            .flat_map(|e| e.position.into_iter().chain(e.orientation))
            .collect();
        Self::builder().values(values).build()
    }

    /// Number of detector elements
    pub fn len(&self) -> usize {
        self.entries.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the entry for a specific element index
    pub fn get(&self, index: usize) -> Option<LutEntry> {
        if index >= self.len() {
            return None;
        }
        Some(LutEntry::from_row(self.entries.row(index)))
    }

    pub fn iter(&self) -> impl Iterator<Item = LutEntry> + '_ {
        self.entries.axis_iter(Axis(0)).map(LutEntry::from_row)
    }

    /// Element centres widened to f64 for distance computations
    pub fn positions(&self) -> Vec<[f64; 3]> {
        self.iter()
            .map(|e| e.position.map(f64::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_table_rows_are_elements() {
        let table = LookupTable::builder()
            .values(vec![
                1.0, 2.0, 3.0, 0.0, 0.0, 1.0, //
                4.0, 5.0, 6.0, 1.0, 0.0, 0.0,
            ])
            .build();

        assert_eq!(table.len(), 2);
        let second = table.get(1).unwrap();
        assert_eq!(second.position, [4.0, 5.0, 6.0]);
        assert_eq!(second.orientation, [1.0, 0.0, 0.0]);
        assert!(table.get(2).is_none());
        assert_eq!(table.positions()[0], [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_from_entries_preserves_order() {
        let entries: Vec<LutEntry> = (0..4)
            .map(|i| {
                LutEntry::builder()
                    .position([i as f32, 0.0, 0.0])
                    .orientation([0.0, 0.0, 1.0])
                    .build()
            })
            .collect();
        let table = LookupTable::from_entries(&entries);
        assert_eq!(table.iter().collect::<Vec<_>>(), entries);
    }
}
