//! Column statistics for the shared side panel

use std::collections::HashSet;
use std::fmt;

use crate::data::{CellValue, Column};
use crate::format::coerce_number;

/// Summary of one column's values
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnStats {
    pub key: String,
    pub count: usize,
    pub nulls: usize,
    pub distinct: usize,
    /// Numeric summaries, present when at least one value coerces to a number
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
}

impl ColumnStats {
    pub fn compute(column: &Column, values: &[CellValue]) -> Self {
        let mut nulls = 0;
        let mut distinct = HashSet::new();
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        let mut numeric = 0usize;

        for value in values {
            if value.is_null() {
                nulls += 1;
                continue;
            }
            distinct.insert(distinct_key(value));
            if !column.data_type.is_numeric() {
                continue;
            }
            if let Some(n) = coerce_number(value).filter(|n| n.is_finite()) {
                min = min.min(n);
                max = max.max(n);
                sum += n;
                numeric += 1;
            }
        }

        let has_numeric = numeric > 0;
        Self {
            key: column.key.clone(),
            count: values.len(),
            nulls,
            distinct: distinct.len(),
            min: has_numeric.then_some(min),
            max: has_numeric.then_some(max),
            mean: has_numeric.then(|| sum / numeric as f64),
        }
    }
}

/// One-line panel summary, e.g. `count: 3 values, 1 null, 2 distinct, min 7, max 9, mean 8`
impl fmt::Display for ColumnStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} values, {} null, {} distinct",
            self.key, self.count, self.nulls, self.distinct
        )?;
        if let (Some(min), Some(max), Some(mean)) = (self.min, self.max, self.mean) {
            write!(f, ", min {}, max {}, mean {}", min, max, mean)?;
        }
        Ok(())
    }
}

/// Hashable identity for distinct counting (floats compare by bit pattern)
fn distinct_key(value: &CellValue) -> String {
    match value {
        CellValue::Float(f) => format!("f:{}", f.to_bits()),
        other => format!("{:?}", other),
    }
}
