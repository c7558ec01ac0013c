//! Event records flowing through the pipeline

use bon::Builder;

/// Cartesian position in millimetres
pub type Position = [f64; 3];

/// Euclidean distance between two positions
#[inline]
pub fn distance(a: &Position, b: &Position) -> f64 {
    squared_distance(a, b).sqrt()
}

#[inline]
pub fn squared_distance(a: &Position, b: &Position) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    dx * dx + dy * dy + dz * dz
}

/// One recorded detector interaction before coincidence sorting.
///
/// `time` is in ns, `position` in mm and `energy` in keV.
#[derive(Debug, Clone, Copy, PartialEq, Builder)]
pub struct SingleEvent {
    pub time: f64,
    pub position: Position,
    pub energy: f64,
}

/// Two singles accepted as originating from the same annihilation.
///
/// `source1`/`source2` are the indices of the two singles in the collection
/// handed to the detector. Event 1 is always the earlier one in sort order.
#[derive(Debug, Clone, Copy, PartialEq, Builder)]
pub struct CoincidencePair {
    pub position1: Position,
    pub position2: Position,
    pub time1: f64,
    pub time2: f64,
    pub energy1: f64,
    pub energy2: f64,
    pub distance: f64,
    #[builder(default)]
    pub source1: usize,
    #[builder(default)]
    pub source2: usize,
}

impl CoincidencePair {
    /// Build a pair from two singles, recording where they came from
    pub fn from_singles(
        first: &SingleEvent,
        first_index: usize,
        second: &SingleEvent,
        second_index: usize,
        distance: f64,
    ) -> Self {
        Self {
            position1: first.position,
            position2: second.position,
            time1: first.time,
            time2: second.time,
            energy1: first.energy,
            energy2: second.energy,
            distance,
            source1: first_index,
            source2: second_index,
        }
    }

    /// Signed arrival-time difference `time2 - time1`
    pub fn time_difference(&self) -> f64 {
        self.time2 - self.time1
    }
}

/// A coincidence reduced to the two detector elements it hit.
///
/// This is the unit stored in list-mode data: 12 bytes, three little-endian u32.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Builder)]
pub struct QuantizedEvent {
    pub sequence_index: u32,
    pub element_index1: u32,
    pub element_index2: u32,
}

impl QuantizedEvent {
    /// Size of one encoded record in bytes
    pub const RECORD_SIZE: usize = 12;

    pub fn to_le_bytes(&self) -> [u8; Self::RECORD_SIZE] {
        let mut bytes = [0u8; Self::RECORD_SIZE];
        bytes[0..4].copy_from_slice(&self.sequence_index.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.element_index1.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.element_index2.to_le_bytes());
        bytes
    }
}
