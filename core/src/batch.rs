//! Column-to-row transposition for `?multiple=true` calls.
//!
//! A batched call receives one list per parameter ("columns") and sends one
//! argument tuple per item ("rows"). Row `i` holds element `i` of every
//! column. Columns of different lengths are truncated to the shortest one;
//! callers are expected to pass equal lengths and this layer does not
//! reject them.

use std::vec;

/// Lazy iterator over per-call argument tuples. See [`transpose`].
#[derive(Debug)]
pub struct Transpose<T> {
    columns: Vec<vec::IntoIter<T>>,
}

/// Pair up element `i` of every column into row `i`.
///
/// Yields `min(column lengths)` rows, and nothing at all when `columns` is
/// empty.
pub fn transpose<T>(columns: Vec<Vec<T>>) -> Transpose<T> {
    Transpose {
        columns: columns.into_iter().map(Vec::into_iter).collect(),
    }
}

/// Whether every column has the same length.
pub fn is_rectangular<T>(columns: &[Vec<T>]) -> bool {
    columns.windows(2).all(|pair| pair[0].len() == pair[1].len())
}

impl<T> Iterator for Transpose<T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Vec<T>> {
        if self.columns.is_empty() {
            return None;
        }
        let mut row = Vec::with_capacity(self.columns.len());
        for column in &mut self.columns {
            row.push(column.next()?);
        }
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.columns.iter().map(|column| column.len()).min().unwrap_or(0);
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for Transpose<T> {}
