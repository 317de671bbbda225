//! Tabular data container consumed by the estimators.

use crate::utils::{normalize, standardize};
use faer::{Col, Mat};
use thiserror::Error;

/// Errors raised by `DataFrame` construction and access.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("row {row} has {got} values, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("{values} values cannot be split into rows of {columns} columns")]
    ShapeMismatch { values: usize, columns: usize },

    #[error("got {labels} labels for {columns} columns")]
    LabelCountMismatch { labels: usize, columns: usize },

    #[error("duplicate column label '{0}'")]
    DuplicateLabel(String),

    #[error("unknown column label '{0}'")]
    UnknownLabel(String),

    #[error("row index {index} out of range for {rows} rows")]
    RowOutOfBounds { index: usize, rows: usize },

    #[error("column index {index} out of range for {columns} columns")]
    ColumnOutOfBounds { index: usize, columns: usize },

    #[error("expected {expected} values, got {got}")]
    LengthMismatch { expected: usize, got: usize },
}

/// Axis selector for [`DataFrame::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Margin {
    /// Apply the reduction to each selected row.
    Rows,
    /// Apply the reduction to each selected column.
    Columns,
}

/// An n × p numeric table with optional unique column labels.
///
/// The shape never changes after construction: in-place operations replace
/// values, and row/column removal returns a new container.
#[derive(Debug, Clone)]
pub struct DataFrame {
    data: Mat<f64>,
    labels: Option<Vec<String>>,
}

impl DataFrame {
    /// Wrap a matrix without column labels.
    pub fn new(data: Mat<f64>) -> Self {
        Self { data, labels: None }
    }

    /// Wrap a matrix with one unique label per column.
    pub fn with_labels<S: Into<String>>(
        data: Mat<f64>,
        labels: impl IntoIterator<Item = S>,
    ) -> Result<Self, FrameError> {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        validate_labels(&labels, data.ncols())?;
        Ok(Self {
            data,
            labels: Some(labels),
        })
    }

    /// Build from row-major values; the number of columns is the label count.
    pub fn from_row_major<S: Into<String>>(
        values: &[f64],
        labels: impl IntoIterator<Item = S>,
    ) -> Result<Self, FrameError> {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        let cols = labels.len();
        if cols == 0 || values.len() % cols != 0 {
            return Err(FrameError::ShapeMismatch {
                values: values.len(),
                columns: cols,
            });
        }
        let rows = values.len() / cols;
        let data = Mat::from_fn(rows, cols, |i, j| values[i * cols + j]);
        Self::with_labels(data, labels)
    }

    /// Build from a slice of equally sized rows.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self, FrameError> {
        let n = rows.len();
        let p = rows.first().map_or(0, |r| r.as_ref().len());

        for (i, row) in rows.iter().enumerate() {
            let got = row.as_ref().len();
            if got != p {
                return Err(FrameError::RaggedRows {
                    row: i,
                    expected: p,
                    got,
                });
            }
        }

        Ok(Self::new(Mat::from_fn(n, p, |i, j| rows[i].as_ref()[j])))
    }

    /// Build from a slice of equally sized columns.
    pub fn from_columns<C: AsRef<[f64]>>(columns: &[C]) -> Result<Self, FrameError> {
        let p = columns.len();
        let n = columns.first().map_or(0, |c| c.as_ref().len());

        for column in columns {
            let got = column.as_ref().len();
            if got != n {
                return Err(FrameError::LengthMismatch { expected: n, got });
            }
        }

        Ok(Self::new(Mat::from_fn(n, p, |i, j| columns[j].as_ref()[i])))
    }

    /// Number of rows and columns.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.data.nrows(), self.data.ncols())
    }

    /// Number of rows (observations).
    pub fn nrows(&self) -> usize {
        self.data.nrows()
    }

    /// Number of columns (predictors).
    pub fn ncols(&self) -> usize {
        self.data.ncols()
    }

    /// Borrow the underlying matrix.
    pub fn as_mat(&self) -> &Mat<f64> {
        &self.data
    }

    /// Column labels, if any.
    pub fn labels(&self) -> Option<&[String]> {
        self.labels.as_deref()
    }

    /// Index of the column carrying `label`.
    pub fn column_index(&self, label: &str) -> Result<usize, FrameError> {
        self.labels
            .as_ref()
            .and_then(|labels| labels.iter().position(|l| l == label))
            .ok_or_else(|| FrameError::UnknownLabel(label.to_string()))
    }

    /// Copy out column `index`.
    pub fn column(&self, index: usize) -> Result<Col<f64>, FrameError> {
        self.check_column(index)?;
        Ok(Col::from_fn(self.nrows(), |i| self.data[(i, index)]))
    }

    /// Copy out the column carrying `label`.
    pub fn column_by_label(&self, label: &str) -> Result<Col<f64>, FrameError> {
        let index = self.column_index(label)?;
        self.column(index)
    }

    /// Replace the values of column `index`.
    pub fn set_column(&mut self, index: usize, values: &Col<f64>) -> Result<(), FrameError> {
        self.check_column(index)?;
        if values.nrows() != self.nrows() {
            return Err(FrameError::LengthMismatch {
                expected: self.nrows(),
                got: values.nrows(),
            });
        }
        for i in 0..self.nrows() {
            self.data[(i, index)] = values[i];
        }
        Ok(())
    }

    /// Copy out row `index`.
    pub fn row(&self, index: usize) -> Result<Vec<f64>, FrameError> {
        self.check_row(index)?;
        Ok((0..self.ncols()).map(|j| self.data[(index, j)]).collect())
    }

    /// Apply `f` elementwise to the given columns in place.
    pub fn transform<F>(&mut self, f: F, columns: &[usize]) -> Result<(), FrameError>
    where
        F: Fn(f64) -> f64,
    {
        for &j in columns {
            self.check_column(j)?;
        }
        for &j in columns {
            for i in 0..self.nrows() {
                self.data[(i, j)] = f(self.data[(i, j)]);
            }
        }
        Ok(())
    }

    /// Reduce each selected row or column to a scalar.
    pub fn apply<F>(&self, f: F, margin: Margin, indices: &[usize]) -> Result<Vec<f64>, FrameError>
    where
        F: Fn(&[f64]) -> f64,
    {
        indices
            .iter()
            .map(|&idx| match margin {
                Margin::Rows => self.row(idx).map(|row| f(row.as_slice())),
                Margin::Columns => {
                    self.check_column(idx)?;
                    let column: Vec<f64> =
                        (0..self.nrows()).map(|i| self.data[(i, idx)]).collect();
                    Ok(f(column.as_slice()))
                }
            })
            .collect()
    }

    /// Standardize every column in place to zero mean and unit variance.
    ///
    /// Returns the per-column `(mean, standard deviation)` that was removed.
    pub fn standardize_columns(&mut self) -> Vec<(f64, f64)> {
        (0..self.ncols())
            .map(|j| {
                let column = Col::from_fn(self.nrows(), |i| self.data[(i, j)]);
                let (scaled, m, sd) = standardize(&column);
                for i in 0..self.nrows() {
                    self.data[(i, j)] = scaled[i];
                }
                (m, sd)
            })
            .collect()
    }

    /// Min-max scale every column in place into [0, 1].
    pub fn normalize_columns(&mut self) {
        for j in 0..self.ncols() {
            let column = Col::from_fn(self.nrows(), |i| self.data[(i, j)]);
            let scaled = normalize(&column);
            for i in 0..self.nrows() {
                self.data[(i, j)] = scaled[i];
            }
        }
    }

    /// A copy of this container without row `index`.
    pub fn remove_row(&self, index: usize) -> Result<DataFrame, FrameError> {
        self.check_row(index)?;
        let data = Mat::from_fn(self.nrows() - 1, self.ncols(), |i, j| {
            let src = if i < index { i } else { i + 1 };
            self.data[(src, j)]
        });
        Ok(Self {
            data,
            labels: self.labels.clone(),
        })
    }

    /// A copy of this container without column `index`.
    pub fn drop_column(&self, index: usize) -> Result<DataFrame, FrameError> {
        self.check_column(index)?;
        let data = Mat::from_fn(self.nrows(), self.ncols() - 1, |i, j| {
            let src = if j < index { j } else { j + 1 };
            self.data[(i, src)]
        });
        let labels = self.labels.as_ref().map(|labels| {
            labels
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != index)
                .map(|(_, l)| l.clone())
                .collect()
        });
        Ok(Self { data, labels })
    }

    fn check_row(&self, index: usize) -> Result<(), FrameError> {
        if index >= self.nrows() {
            return Err(FrameError::RowOutOfBounds {
                index,
                rows: self.nrows(),
            });
        }
        Ok(())
    }

    fn check_column(&self, index: usize) -> Result<(), FrameError> {
        if index >= self.ncols() {
            return Err(FrameError::ColumnOutOfBounds {
                index,
                columns: self.ncols(),
            });
        }
        Ok(())
    }
}

fn validate_labels(labels: &[String], columns: usize) -> Result<(), FrameError> {
    if labels.len() != columns {
        return Err(FrameError::LabelCountMismatch {
            labels: labels.len(),
            columns,
        });
    }
    for (i, label) in labels.iter().enumerate() {
        if labels[..i].contains(label) {
            return Err(FrameError::DuplicateLabel(label.clone()));
        }
    }
    Ok(())
}
