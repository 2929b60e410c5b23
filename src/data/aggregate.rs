use std::collections::BTreeMap;

use crate::error::{AnalysisError, Result};

use super::model::{AggregatedSeries, GroupKey, SampleTable};

// ---------------------------------------------------------------------------
// Grouped mean reduction
// ---------------------------------------------------------------------------

/// Running mean and count for one group.
///
/// Updates the mean incrementally so large values cannot overflow a sum.
#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    mean: f64,
    count: usize,
}

impl Accumulator {
    fn push(&mut self, value: f64) {
        self.count += 1;
        self.mean += (value - self.mean) / self.count as f64;
    }

    fn mean(&self) -> f64 {
        self.mean
    }
}

/// Mean of `value_col` per distinct value of `key_col`, keys ascending.
pub fn group_mean(table: &SampleTable, key_col: usize, value_col: usize) -> Result<AggregatedSeries> {
    let mut series = group_means(table, key_col, &[value_col])?;
    Ok(series.remove(0))
}

/// Like [`group_mean`] for several value columns at once.
///
/// Returns one series per entry of `value_cols`, in the same order. All
/// series share the same key set.
pub fn group_means(
    table: &SampleTable,
    key_col: usize,
    value_cols: &[usize],
) -> Result<Vec<AggregatedSeries>> {
    check_non_empty(table)?;
    check_column(table, key_col)?;
    for &col in value_cols {
        check_column(table, col)?;
    }

    let mut groups: BTreeMap<GroupKey, Vec<Accumulator>> = BTreeMap::new();
    for row in &table.rows {
        let accs = groups
            .entry(GroupKey(row.values[key_col]))
            .or_insert_with(|| vec![Accumulator::default(); value_cols.len()]);
        for (acc, &col) in accs.iter_mut().zip(value_cols) {
            acc.push(row.values[col]);
        }
    }

    let series = (0..value_cols.len())
        .map(|i| {
            AggregatedSeries::from_map(
                groups
                    .iter()
                    .map(|(key, accs)| (*key, accs[i].mean()))
                    .collect(),
            )
        })
        .collect();
    Ok(series)
}

/// Mean of `value_col` over the whole table (a single implicit group).
pub fn overall_mean(table: &SampleTable, value_col: usize) -> Result<f64> {
    check_non_empty(table)?;
    check_column(table, value_col)?;

    let mut acc = Accumulator::default();
    for row in &table.rows {
        acc.push(row.values[value_col]);
    }
    Ok(acc.mean())
}

/// Group by `key_col`, then average the per-group means of `value_col`.
///
/// Differs from [`overall_mean`] when groups have unequal row counts.
pub fn mean_of_group_means(table: &SampleTable, key_col: usize, value_col: usize) -> Result<f64> {
    let series = group_mean(table, key_col, value_col)?;
    let mut acc = Accumulator::default();
    for (_, mean) in series.iter() {
        acc.push(mean);
    }
    Ok(acc.mean())
}

fn check_non_empty(table: &SampleTable) -> Result<()> {
    if table.is_empty() {
        return Err(AnalysisError::EmptyDataset {
            path: table.source.clone(),
        });
    }
    Ok(())
}

fn check_column(table: &SampleTable, column: usize) -> Result<()> {
    if column >= table.width {
        return Err(AnalysisError::ColumnOutOfRange {
            path: table.source.clone(),
            column,
            width: table.width,
        });
    }
    Ok(())
}
