use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// GroupKey – the swept configuration parameter
// ---------------------------------------------------------------------------

/// A numeric group key (e.g. sample size) usable as a `BTreeMap` key.
///
/// Ordering uses `f64::total_cmp`, so equal keys always merge and the
/// ordering is total even for values the reader would never produce.
#[derive(Debug, Clone, Copy)]
pub struct GroupKey(pub f64);

impl PartialEq for GroupKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0).is_eq()
    }
}

impl Eq for GroupKey {}

impl PartialOrd for GroupKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GroupKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl std::hash::Hash for GroupKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.fract() == 0.0 && self.0.abs() < 1e15 {
            write!(f, "{}", self.0 as i64)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

// ---------------------------------------------------------------------------
// ColumnSchema – fixed positional layout of a harness file
// ---------------------------------------------------------------------------

/// Expected column count of a header-less sample file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSchema {
    pub columns: usize,
}

impl ColumnSchema {
    /// `group key, throughput count, latency cumulative, byte count`
    pub const SWEPT: ColumnSchema = ColumnSchema { columns: 4 };
    /// `throughput count, latency cumulative, byte count`
    pub const BASELINE: ColumnSchema = ColumnSchema { columns: 3 };

    pub const fn new(columns: usize) -> Self {
        ColumnSchema { columns }
    }
}

// ---------------------------------------------------------------------------
// SampleTable – one raw harness file
// ---------------------------------------------------------------------------

/// One measurement row, addressed by column index.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRow {
    pub values: Vec<f64>,
}

impl SampleRow {
    pub fn new(values: Vec<f64>) -> Self {
        SampleRow { values }
    }
}

/// All rows of one sample file, in file order.
#[derive(Debug, Clone)]
pub struct SampleTable {
    /// Where the rows came from (used in error messages).
    pub source: PathBuf,
    /// Number of columns every row carries.
    pub width: usize,
    pub rows: Vec<SampleRow>,
}

impl SampleTable {
    pub fn new(source: impl Into<PathBuf>, width: usize, rows: Vec<SampleRow>) -> Self {
        SampleTable {
            source: source.into(),
            width,
            rows,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// AggregatedSeries – group key → scalar
// ---------------------------------------------------------------------------

/// Per-key values of a swept dataset, ordered by key ascending.
///
/// Keys are only ever the ones observed in the input; nothing is
/// interpolated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregatedSeries {
    points: BTreeMap<GroupKey, f64>,
}

impl AggregatedSeries {
    pub fn from_map(points: BTreeMap<GroupKey, f64>) -> Self {
        AggregatedSeries { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn get(&self, key: f64) -> Option<f64> {
        self.points.get(&GroupKey(key)).copied()
    }

    pub fn keys(&self) -> impl Iterator<Item = GroupKey> + '_ {
        self.points.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (GroupKey, f64)> + '_ {
        self.points.iter().map(|(k, v)| (*k, *v))
    }

    /// `[x, y]` pairs for plotting.
    pub fn plot_points(&self) -> Vec<[f64; 2]> {
        self.points.iter().map(|(k, v)| [k.0, *v]).collect()
    }

    /// Apply a fallible transform to every value, keeping the keys.
    pub fn try_map<E>(&self, mut f: impl FnMut(f64) -> Result<f64, E>) -> Result<Self, E> {
        let points = self
            .points
            .iter()
            .map(|(k, v)| Ok((*k, f(*v)?)))
            .collect::<Result<BTreeMap<_, _>, E>>()?;
        Ok(AggregatedSeries { points })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_key_display_drops_integral_fraction() {
        assert_eq!(GroupKey(100.0).to_string(), "100");
        assert_eq!(GroupKey(2.5).to_string(), "2.5");
    }

    #[test]
    fn group_keys_sort_numerically() {
        let mut keys = vec![GroupKey(200.0), GroupKey(-1.0), GroupKey(50.0)];
        keys.sort();
        let raw: Vec<f64> = keys.iter().map(|k| k.0).collect();
        assert_eq!(raw, vec![-1.0, 50.0, 200.0]);
    }

    #[test]
    fn try_map_keeps_keys_and_stops_at_first_error() {
        let series = AggregatedSeries::from_map(BTreeMap::from([
            (GroupKey(1.0), 10.0),
            (GroupKey(2.0), 20.0),
        ]));
        let doubled = series.try_map(|v| Ok::<_, ()>(v * 2.0)).unwrap();
        assert_eq!(doubled.plot_points(), vec![[1.0, 20.0], [2.0, 40.0]]);

        let failed = series.try_map(|v| if v > 15.0 { Err(v) } else { Ok(v) });
        assert_eq!(failed, Err(20.0));
    }
}
