/// Sparse row-major feature matrix produced by a vectorizer.
///
/// Each row holds `(column, value)` pairs sorted by column with no duplicates
/// and no explicit zeros. Every column index is `< width`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureMatrix {
    width: usize,
    rows: Vec<Vec<(usize, f32)>>,
}

impl FeatureMatrix {
    #[must_use]
    pub fn new(width: usize) -> Self {
        Self {
            width,
            rows: Vec::new(),
        }
    }

    /// Append a row.
    ///
    /// Entries are sorted by column and repeated columns are summed. Columns
    /// outside the matrix width and entries that end up zero are dropped.
    pub fn push_row(&mut self, mut entries: Vec<(usize, f32)>) {
        let width = self.width;
        entries.retain(|&(col, _)| col < width);
        entries.sort_by_key(|&(col, _)| col);

        let mut row: Vec<(usize, f32)> = Vec::with_capacity(entries.len());
        for (col, value) in entries {
            match row.last_mut() {
                Some((last, sum)) if *last == col => *sum += value,
                _ => row.push((col, value)),
            }
        }
        row.retain(|&(_, value)| value != 0.0);
        self.rows.push(row);
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn row(&self, index: usize) -> Option<&[(usize, f32)]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[(usize, f32)]> + '_ {
        self.rows.iter().map(Vec::as_slice)
    }
}

/// Dot product of a sparse row with a dense weight vector.
pub(crate) fn sparse_dot(row: &[(usize, f32)], weights: &[f32]) -> f32 {
    row.iter()
        .map(|&(col, value)| value * weights.get(col).copied().unwrap_or(0.0))
        .sum()
}
