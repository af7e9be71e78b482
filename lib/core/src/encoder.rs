//! Feature encoder
//!
//! Turns mixed categorical/numeric/ordinal records into an [`EncodedMatrix`].
//!
//! Column layout for a field list `[f1, f2, ...]`:
//!
//! ```text
//! | scalar columns (numeric, ordinal, binary) | one-hot blocks            |
//! | in field-list order                       | per field, discovery order |
//! ```
//!
//! Numeric fields are min-max scaled over the records passed to
//! [`FeatureEncoder::fit`]; nothing is persisted between fits.

use crate::matrix::{EncodeDiagnostics, EncodedMatrix};
use crate::record::{Field, FieldKind, FieldValue, Record, UNKNOWN};
use crate::{Error, Result};
use ahash::AHashMap;
use tracing::warn;

/// Sentinel for ordinal/binary values outside the lookup table
pub const UNMAPPED: f32 = -1.0;

/// Encoder configuration: the ordered list of fields to encode
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureEncoder {
    fields: Vec<Field>,
}

impl FeatureEncoder {
    pub fn new(fields: &[Field]) -> Self {
        Self {
            fields: fields.to_vec(),
        }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Learn scaling ranges and category vocabularies from `records`
    pub fn fit<R: Record>(&self, records: &[R]) -> Result<FittedEncoder> {
        if self.fields.is_empty() {
            return Err(Error::EmptyFieldList);
        }
        if let Some(&field) = self.fields.iter().find(|f| !R::FIELDS.contains(f)) {
            return Err(Error::FieldNotApplicable {
                field,
                kind: R::KIND,
            });
        }

        let mut scalars = Vec::new();
        let mut blocks = Vec::new();

        for &field in &self.fields {
            match field.kind() {
                FieldKind::Numeric => {
                    let (min, max) = observed_range(records, field);
                    scalars.push(ScalarColumn::Scaled { field, min, max });
                }
                FieldKind::Ordinal(table) | FieldKind::Binary(table) => {
                    scalars.push(ScalarColumn::Mapped { field, table });
                }
                FieldKind::Categorical => {
                    let mut block = OneHotBlock::new(field);
                    for record in records {
                        block.observe(&category_key(read(record, field)));
                    }
                    blocks.push(block);
                }
            }
        }

        Ok(FittedEncoder { scalars, blocks })
    }

    /// Fit on `records` and encode them in one step
    pub fn encode<R: Record>(&self, records: &[R]) -> Result<EncodedMatrix> {
        self.fit(records)?.transform(records)
    }
}

/// Encoder state learned from one record set
#[derive(Debug, Clone)]
pub struct FittedEncoder {
    scalars: Vec<ScalarColumn>,
    blocks: Vec<OneHotBlock>,
}

#[derive(Debug, Clone)]
enum ScalarColumn {
    Scaled { field: Field, min: f64, max: f64 },
    Mapped { field: Field, table: &'static [(&'static str, f32)] },
}

#[derive(Debug, Clone)]
struct OneHotBlock {
    field: Field,
    categories: Vec<String>,
    positions: AHashMap<String, usize>,
}

impl OneHotBlock {
    fn new(field: Field) -> Self {
        Self {
            field,
            categories: Vec::new(),
            positions: AHashMap::new(),
        }
    }

    fn observe(&mut self, category: &str) {
        if !self.positions.contains_key(category) {
            self.positions.insert(category.to_string(), self.categories.len());
            self.categories.push(category.to_string());
        }
    }
}

impl FittedEncoder {
    /// Number of output columns
    pub fn width(&self) -> usize {
        self.scalars.len() + self.blocks.iter().map(|b| b.categories.len()).sum::<usize>()
    }

    pub fn column_names(&self) -> Vec<String> {
        let scalar_names = self.scalars.iter().map(|column| match column {
            ScalarColumn::Scaled { field, .. } | ScalarColumn::Mapped { field, .. } => {
                field.name().to_string()
            }
        });
        let one_hot_names = self.blocks.iter().flat_map(|block| {
            block
                .categories
                .iter()
                .map(move |category| format!("{}={}", block.field, category))
        });
        scalar_names.chain(one_hot_names).collect()
    }

    /// Encode `records`. Categories not seen during fit encode as all-zero blocks.
    pub fn transform<R: Record>(&self, records: &[R]) -> Result<EncodedMatrix> {
        let width = self.width();
        let mut data = Vec::with_capacity(records.len() * width);
        let mut diagnostics = EncodeDiagnostics::default();

        for record in records {
            for column in &self.scalars {
                let cell = match *column {
                    ScalarColumn::Scaled { field, min, max } => match read(record, field) {
                        FieldValue::Number(v) => scale(v, min, max),
                        _ => f32::NAN,
                    },
                    ScalarColumn::Mapped { field, table } => {
                        let value = read(record, field);
                        if value == FieldValue::Missing {
                            diagnostics.unknown_filled += 1;
                        }
                        lookup(table, &category_key(value))
                    }
                };
                if cell.is_finite() {
                    data.push(cell);
                } else {
                    diagnostics.undefined_filled += 1;
                    data.push(0.0);
                }
            }

            for block in &self.blocks {
                let start = data.len();
                data.resize(start + block.categories.len(), 0.0);
                let value = read(record, block.field);
                if value == FieldValue::Missing {
                    diagnostics.unknown_filled += 1;
                }
                if let Some(&position) = block.positions.get(category_key(value).as_str()) {
                    data[start + position] = 1.0;
                }
            }
        }

        if !diagnostics.is_clean() {
            warn!(
                unknown_filled = diagnostics.unknown_filled,
                undefined_filled = diagnostics.undefined_filled,
                "encoder substituted missing values"
            );
        }

        EncodedMatrix::new(records.len(), width, data, self.column_names(), diagnostics)
    }
}

fn read<R: Record>(record: &R, field: Field) -> FieldValue<'_> {
    // fit() has already checked that R carries every configured field
    record.value(field).unwrap_or(FieldValue::Missing)
}

fn category_key(value: FieldValue<'_>) -> String {
    match value {
        FieldValue::Missing => UNKNOWN.to_string(),
        FieldValue::Number(v) => v.to_string(),
        FieldValue::Text(s) => s.to_string(),
    }
}

fn lookup(table: &[(&str, f32)], key: &str) -> f32 {
    table
        .iter()
        .find(|(name, _)| *name == key)
        .map_or(UNMAPPED, |&(_, rank)| rank)
}

fn observed_range<R: Record>(records: &[R], field: Field) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for record in records {
        if let FieldValue::Number(v) = read(record, field) {
            min = min.min(v);
            max = max.max(v);
        }
    }
    (min, max)
}

fn scale(value: f64, min: f64, max: f64) -> f32 {
    let range = max - min;
    if !range.is_finite() {
        // no observed values for this field
        return f32::NAN;
    }
    if range <= 0.0 {
        return 0.0;
    }
    ((value - min) / range) as f32
}
