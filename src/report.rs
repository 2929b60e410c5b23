use crate::compare::ComparisonChart;
use crate::data::model::GroupKey;

/// Render a chart as an aligned text table for terminals without a display.
///
/// One column per load level, one row per group key, and a final row with
/// each level's baseline. Keys a level never observed show as `-`.
pub fn render_text(chart: &ComparisonChart) -> String {
    let mut header = vec![chart.x_label.clone()];
    header.extend(chart.pairs.iter().map(|p| p.label.clone()));

    let mut rows: Vec<Vec<String>> = chart
        .x_ticks()
        .into_iter()
        .map(|x| {
            let mut row = vec![GroupKey(x).to_string()];
            row.extend(chart.pairs.iter().map(|p| {
                p.series
                    .get(x)
                    .map_or_else(|| "-".to_string(), |v| format!("{v:.3}"))
            }));
            row
        })
        .collect();

    let mut baseline_row = vec![chart.baseline_name.clone()];
    baseline_row.extend(chart.pairs.iter().map(|p| format!("{:.3}", p.baseline)));
    rows.push(baseline_row);

    let widths: Vec<usize> = (0..header.len())
        .map(|col| {
            std::iter::once(&header)
                .chain(rows.iter())
                .map(|r| r[col].len())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    out.push_str(&format!("== {} ({}) ==\n", chart.title, chart.y_label));
    out.push_str(&format_row(&header, &widths));
    out.push('\n');
    let rule: usize = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
    out.push_str(&"-".repeat(rule));
    out.push('\n');
    for row in &rows {
        out.push_str(&format_row(row, &widths));
        out.push('\n');
    }
    for warning in &chart.warnings {
        out.push_str(&format!("warning: {warning}\n"));
    }
    out
}

fn format_row(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(i, (cell, &w))| {
            if i == 0 {
                format!("{cell:<w$}")
            } else {
                format!("{cell:>w$}")
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::compare::{SchemaDivergence, SeriesPair};
    use crate::config::Marker;
    use crate::data::model::AggregatedSeries;
    use crate::metric::Metric;
    use std::collections::BTreeMap;

    fn chart() -> ComparisonChart {
        let series = |points: &[(f64, f64)]| {
            AggregatedSeries::from_map(
                points.iter().map(|&(k, v)| (GroupKey(k), v)).collect::<BTreeMap<_, _>>(),
            )
        };
        ComparisonChart {
            metric: Metric::Throughput,
            title: "Throughput comparison".into(),
            x_label: "Sample size".into(),
            y_label: "Blocks per second".into(),
            swept_name: "Sparse Bullshark".into(),
            baseline_name: "Bullshark".into(),
            y_bounds: None,
            pairs: vec![
                SeriesPair {
                    load: 2000,
                    label: "2Gb/sec".into(),
                    color: Rgb::RED,
                    marker: Marker::Diamond,
                    series: series(&[(100.0, 8.0 + 1.0 / 3.0), (200.0, 15.0)]),
                    baseline: 20.0,
                },
                SeriesPair {
                    load: 4000,
                    label: "4Gb/sec".into(),
                    color: Rgb::GREEN,
                    marker: Marker::Square,
                    series: series(&[(100.0, 9.0)]),
                    baseline: 21.5,
                },
            ],
            warnings: vec![SchemaDivergence {
                reference: "2Gb/sec".into(),
                level: "4Gb/sec".into(),
                missing: vec![GroupKey(200.0)],
                extra: Vec::new(),
            }],
        }
    }

    #[test]
    fn renders_one_row_per_key_plus_baseline() {
        let text = render_text(&chart());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "== Throughput comparison (Blocks per second) ==");
        assert!(lines[1].starts_with("Sample size"));
        assert!(lines[3].starts_with("100"));
        assert!(lines[3].contains("8.333"));
        assert!(lines[4].starts_with("200"));
        assert!(lines[4].trim_end().ends_with('-'));
        assert!(lines[5].starts_with("Bullshark"));
        assert!(lines[5].contains("21.500"));
        assert_eq!(
            lines[6],
            "warning: 4Gb/sec keys differ from 2Gb/sec; missing [200]"
        );
    }

    #[test]
    fn columns_are_aligned() {
        let text = render_text(&chart());
        let lines: Vec<&str> = text.lines().skip(1).filter(|l| !l.starts_with("warning")).collect();
        let width = lines[0].len();
        assert!(lines.iter().all(|l| l.len() == width), "{text}");
    }
}
