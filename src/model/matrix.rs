use ndarray::Array2;

use super::{CoreError, Result};

/// Boolean segmentation mask indexed `[row, col]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    cells: Array2<bool>,
}

impl Mask {
    pub fn new(cells: Array2<bool>) -> Self {
        Self { cells }
    }

    pub fn filled(width: usize, height: usize, value: bool) -> Self {
        Self {
            cells: Array2::from_elem((height, width), value),
        }
    }

    pub fn from_rows(rows: Vec<Vec<bool>>) -> Result<Self> {
        Ok(Self {
            cells: rows_to_array(rows)?,
        })
    }

    pub fn to_rows(&self) -> Vec<Vec<bool>> {
        self.cells.rows().into_iter().map(|row| row.to_vec()).collect()
    }

    pub fn width(&self) -> usize {
        self.cells.ncols()
    }

    pub fn height(&self) -> usize {
        self.cells.nrows()
    }

    /// `(width, height)`
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    pub fn get(&self, row: usize, col: usize) -> Option<bool> {
        self.cells.get((row, col)).copied()
    }

    pub fn set(&mut self, row: usize, col: usize, value: bool) -> bool {
        match self.cells.get_mut((row, col)) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    pub fn count_set(&self) -> usize {
        self.cells.iter().filter(|cell| **cell).count()
    }

    pub fn cells(&self) -> &Array2<bool> {
        &self.cells
    }
}

/// Grayscale intensity matrix indexed `[row, col]`, values in `0..=255`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelMatrix {
    values: Array2<u8>,
}

impl PixelMatrix {
    pub fn new(values: Array2<u8>) -> Self {
        Self { values }
    }

    pub fn from_rows(rows: Vec<Vec<u8>>) -> Result<Self> {
        Ok(Self {
            values: rows_to_array(rows)?,
        })
    }

    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.values
            .rows()
            .into_iter()
            .map(|row| row.to_vec())
            .collect()
    }

    pub fn width(&self) -> usize {
        self.values.ncols()
    }

    pub fn height(&self) -> usize {
        self.values.nrows()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        self.values.get((row, col)).copied()
    }

    pub fn values(&self) -> &Array2<u8> {
        &self.values
    }

    pub fn min_max(&self) -> Option<(u8, u8)> {
        let mut iter = self.values.iter().copied();
        let first = iter.next()?;
        Some(iter.fold((first, first), |(min, max), value| {
            (min.min(value), max.max(value))
        }))
    }

    pub fn mean(&self) -> Option<f64> {
        if self.values.is_empty() {
            return None;
        }
        let sum = self.values.iter().map(|value| f64::from(*value)).sum::<f64>();
        Some(sum / self.values.len() as f64)
    }
}

fn rows_to_array<T: Clone>(rows: Vec<Vec<T>>) -> Result<Array2<T>> {
    let height = rows.len();
    let width = rows.first().map(Vec::len).unwrap_or(0);
    let mut flat = Vec::with_capacity(height * width);
    for (row, values) in rows.into_iter().enumerate() {
        if values.len() != width {
            return Err(CoreError::RaggedRows {
                row,
                expected: width,
                found: values.len(),
            });
        }
        flat.extend(values);
    }
    Array2::from_shape_vec((height, width), flat).map_err(|_| CoreError::RaggedRows {
        row: 0,
        expected: width,
        found: 0,
    })
}
