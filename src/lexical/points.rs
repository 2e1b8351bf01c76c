//! One-dimensional long point values.

use bit_vec::BitVec;

/// Sorted `(value, doc)` pairs for one point field of one segment.
#[derive(Debug, Clone, Default)]
pub struct PointValues {
    points: Vec<(i64, u64)>,
}

impl PointValues {
    /// Build from unsorted `(value, doc)` pairs.
    pub fn from_unsorted(mut points: Vec<(i64, u64)>) -> Self {
        points.sort_unstable();
        points.dedup();
        PointValues { points }
    }

    /// Number of indexed points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Documents holding exactly `value`.
    pub fn docs_with_value(&self, value: i64) -> impl Iterator<Item = u64> + '_ {
        let start = self.points.partition_point(|(v, _)| *v < value);
        self.points[start..]
            .iter()
            .take_while(move |(v, _)| *v == value)
            .map(|(_, doc)| *doc)
    }

    /// Mark every document holding any of `values` (sorted ascending).
    pub fn matching_docs(&self, values: &[i64], max_doc: u64) -> BitVec {
        let mut docs = BitVec::from_elem(max_doc as usize, false);
        let mut low = 0;

        for &value in values {
            low += self.points[low..].partition_point(|(v, _)| *v < value);
            while let Some(&(v, doc)) = self.points.get(low) {
                if v != value {
                    break;
                }
                if (doc as usize) < docs.len() {
                    docs.set(doc as usize, true);
                }
                low += 1;
            }
            if low >= self.points.len() {
                break;
            }
        }

        docs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_docs_with_value() {
        let points = PointValues::from_unsorted(vec![(5, 2), (-1, 0), (5, 1), (9, 3)]);

        assert_eq!(points.len(), 4);
        assert_eq!(points.docs_with_value(5).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(points.docs_with_value(7).count(), 0);
    }

    #[test]
    fn test_matching_docs() {
        let points = PointValues::from_unsorted(vec![(5, 2), (-1, 0), (5, 1), (9, 3)]);
        let docs = points.matching_docs(&[-1, 7, 9], 4);

        assert!(docs[0]);
        assert!(!docs[1]);
        assert!(!docs[2]);
        assert!(docs[3]);
    }
}
