use crate::{Error, Result};
use serde::Serialize;

/// Cells the encoder had to substitute while building a matrix
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EncodeDiagnostics {
    /// Missing categorical/ordinal/binary values replaced by the `Unknown` sentinel
    pub unknown_filled: usize,
    /// Undefined cells (missing numerics) replaced by 0
    pub undefined_filled: usize,
}

impl EncodeDiagnostics {
    pub fn is_clean(&self) -> bool {
        self.unknown_filled == 0 && self.undefined_filled == 0
    }
}

/// Row-aligned numeric encoding of a record set.
///
/// Row `i` encodes input record `i`. The matrix is immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncodedMatrix {
    rows: usize,
    dim: usize,
    data: Vec<f32>,
    columns: Vec<String>,
    diagnostics: EncodeDiagnostics,
}

impl EncodedMatrix {
    pub fn new(
        rows: usize,
        dim: usize,
        data: Vec<f32>,
        columns: Vec<String>,
        diagnostics: EncodeDiagnostics,
    ) -> Result<Self> {
        if data.len() != rows * dim || columns.len() != dim {
            return Err(Error::InvalidShape {
                rows,
                dim,
                len: data.len(),
            });
        }
        Ok(Self {
            rows,
            dim,
            data,
            columns,
            diagnostics,
        })
    }

    /// Build from explicit rows with generated column names
    pub fn from_rows(rows: &[Vec<f32>]) -> Result<Self> {
        let dim = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * dim);
        for row in rows {
            if row.len() != dim {
                return Err(Error::InvalidShape {
                    rows: rows.len(),
                    dim,
                    len: data.len() + row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        let columns = (0..dim).map(|c| format!("c{c}")).collect();
        Self::new(rows.len(), dim, data, columns, EncodeDiagnostics::default())
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    #[inline]
    pub fn row(&self, i: usize) -> &[f32] {
        &self.data[i * self.dim..(i + 1) * self.dim]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f32]> + '_ {
        (0..self.rows).map(move |i| self.row(i))
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn diagnostics(&self) -> EncodeDiagnostics {
        self.diagnostics
    }
}
