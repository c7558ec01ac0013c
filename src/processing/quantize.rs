use crate::error::{LxePetError, Result};
use crate::spatial_index::SpatialIndex;
use crate::types::event::{CoincidencePair, Position, QuantizedEvent};
use rayon::prelude::*;

/// Sequence indices are u32 on disk, so larger batches cannot be numbered
fn check_event_count(n: usize) -> Result<()> {
    if u32::try_from(n).is_err() {
        return Err(LxePetError::InvalidParameter(format!(
            "{n} coincidences exceed the u32 sequence index range"
        )));
    }
    Ok(())
}

/// Replace both hit positions of every coincidence by their nearest element.
///
/// Lookups run in parallel; the output keeps the input order and numbers the
/// events `0..n`.
pub fn quantize(pairs: &[CoincidencePair], index: &SpatialIndex) -> Result<Vec<QuantizedEvent>> {
    check_event_count(pairs.len())?;
    Ok(pairs
        .par_iter()
        .enumerate()
        .map(|(i, pair)| {
            QuantizedEvent::builder()
                .sequence_index(i as u32)
                .element_index1(index.nearest(pair.position1))
                .element_index2(index.nearest(pair.position2))
                .build()
        })
        .collect())
}

/// Quantize raw position columns, as read back from a coincidence table.
///
/// `positions1[i]` and `positions2[i]` are the two hits of coincidence `i`;
/// both slices must have the same length.
pub fn quantize_positions(
    positions1: &[Position],
    positions2: &[Position],
    index: &SpatialIndex,
) -> Result<Vec<QuantizedEvent>> {
    if positions1.len() != positions2.len() {
        return Err(LxePetError::InvalidParameter(format!(
            "position columns differ in length: {} vs {}",
            positions1.len(),
            positions2.len()
        )));
    }
    check_event_count(positions1.len())?;

    Ok(positions1
        .par_iter()
        .zip(positions2.par_iter())
        .enumerate()
        .map(|(i, (p1, p2))| {
            QuantizedEvent::builder()
                .sequence_index(i as u32)
                .element_index1(index.nearest(*p1))
                .element_index2(index.nearest(*p2))
                .build()
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::izip;

    fn line_index() -> SpatialIndex {
        let points: Vec<Position> = (0..100).map(|i| [i as f64 * 10.0, 0.0, 0.0]).collect();
        SpatialIndex::from_points(&points).unwrap()
    }

    fn pair(p1: Position, p2: Position) -> CoincidencePair {
        CoincidencePair::builder()
            .position1(p1)
            .position2(p2)
            .time1(0.0)
            .time2(1.0)
            .energy1(511.0)
            .energy2(511.0)
            .distance(0.0)
            .build()
    }

    #[test]
    fn test_quantize_preserves_order() {
        let index = line_index();
        let pairs: Vec<CoincidencePair> = (0..1000)
            .map(|i| {
                let a = (i % 100) as f64 * 10.0 + 1.0;
                let b = ((i * 7) % 100) as f64 * 10.0 - 2.0;
                pair([a, 0.0, 0.0], [b, 3.0, 0.0])
            })
            .collect();

        let events = quantize(&pairs, &index).unwrap();
        assert_eq!(events.len(), pairs.len());
        for (i, event) in events.iter().enumerate() {
            assert_eq!(event.sequence_index, i as u32);
            assert_eq!(event.element_index1, (i % 100) as u32);
            // 2 mm short of element k is still closest to k
            assert_eq!(event.element_index2, ((i * 7) % 100) as u32);
        }
    }

    #[test]
    fn test_quantize_positions_matches_quantize() {
        let index = line_index();
        let pairs = vec![
            pair([12.0, 0.0, 0.0], [988.0, 0.0, 0.0]),
            pair([500.0, 1.0, 1.0], [-40.0, 0.0, 0.0]),
        ];
        let positions1: Vec<Position> = pairs.iter().map(|p| p.position1).collect();
        let positions2: Vec<Position> = pairs.iter().map(|p| p.position2).collect();

        let from_pairs = quantize(&pairs, &index).unwrap();
        let from_columns = quantize_positions(&positions1, &positions2, &index).unwrap();
        for (a, b) in izip!(&from_pairs, &from_columns) {
            assert_eq!(a, b);
        }
        assert_eq!(from_columns[0].element_index1, 1);
        assert_eq!(from_columns[0].element_index2, 99);
        assert_eq!(from_columns[1].element_index2, 0);
    }

    #[test]
    fn test_quantize_empty() {
        assert!(quantize(&[], &line_index()).unwrap().is_empty());
    }

    #[test]
    fn test_mismatched_columns_are_rejected() {
        let index = line_index();
        let positions1 = vec![[0.0; 3], [10.0, 0.0, 0.0]];
        let positions2 = vec![[20.0, 0.0, 0.0]];
        assert!(matches!(
            quantize_positions(&positions1, &positions2, &index),
            Err(LxePetError::InvalidParameter(_))
        ));
        assert!(matches!(
            quantize_positions(&positions2, &positions1, &index),
            Err(LxePetError::InvalidParameter(_))
        ));
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_event_count_limited_to_u32() {
        assert!(check_event_count(u32::MAX as usize).is_ok());
        assert!(matches!(
            check_event_count(u32::MAX as usize + 1),
            Err(LxePetError::InvalidParameter(_))
        ));
    }
}
