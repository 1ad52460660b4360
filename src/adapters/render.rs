use crate::core::chart::CHART_TITLE;
use crate::core::record_store::RecordStore;
use crate::core::{ChartSink, ResourceField, StaffPercentage};
use crate::domain::model::NAME_LABEL;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::fmt::Write;

const BAR_WIDTH: usize = 50;

/// Plain-text table of the store. Rows missing from `visible` are hidden.
pub fn render_table(store: &RecordStore, visible: Option<&BTreeSet<usize>>) -> String {
    let shown: Vec<usize> = (0..store.len())
        .filter(|row| visible.map_or(true, |rows| rows.contains(row)))
        .collect();

    let row_width = store.len().saturating_sub(1).to_string().len().max(1);
    let name_width = shown
        .iter()
        .map(|&row| store.records()[row].name.chars().count())
        .chain(std::iter::once(NAME_LABEL.len()))
        .max()
        .unwrap_or(NAME_LABEL.len());
    let field_widths: Vec<usize> = ResourceField::ALL
        .iter()
        .map(|field| {
            shown
                .iter()
                .map(|&row| store.records()[row].get(*field).to_string().len())
                .chain(std::iter::once(field.label().len()))
                .max()
                .unwrap_or(field.label().len())
        })
        .collect();

    let mut out = String::new();
    let _ = write!(out, "{:>row_width$}  {:<name_width$}", "#", NAME_LABEL);
    for (field, width) in ResourceField::ALL.iter().zip(field_widths.iter().copied()) {
        let _ = write!(out, "  {:>width$}", field.label());
    }
    out.push('\n');

    for &row in &shown {
        let record = &store.records()[row];
        let _ = write!(out, "{:>row_width$}  {:<name_width$}", row, record.name);
        for (field, width) in ResourceField::ALL.iter().zip(field_widths.iter().copied()) {
            let _ = write!(out, "  {:>width$}", record.get(*field));
        }
        out.push('\n');
    }

    if shown.len() < store.len() {
        let _ = writeln!(out, "({} of {} rows hidden)", store.len() - shown.len(), store.len());
    }
    out
}

/// One horizontal bar per hospital, full width at 100%.
pub fn render_chart(data: &[StaffPercentage]) -> String {
    let name_width = data
        .iter()
        .map(|entry| entry.name.chars().count())
        .max()
        .unwrap_or(0);

    let bar_width = BAR_WIDTH;
    let mut out = String::new();
    let _ = writeln!(out, "{}", CHART_TITLE);
    for entry in data {
        let filled = (entry.percentage.clamp(0.0, 100.0) / 100.0 * bar_width as f64).round() as usize;
        let _ = writeln!(
            out,
            "{:<name_width$} | {:<bar_width$} {:.1}%",
            entry.name,
            "#".repeat(filled),
            entry.percentage
        );
    }
    out
}

pub fn render_chart_json(data: &[StaffPercentage]) -> Result<String> {
    Ok(serde_json::to_string_pretty(data)?)
}

/// Prints every refreshed chart to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutChartSink;

#[async_trait]
impl ChartSink for StdoutChartSink {
    async fn refresh(&self, data: &[StaffPercentage]) -> Result<()> {
        println!("{}", render_chart(data));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::HospitalRecord;

    fn store() -> RecordStore {
        RecordStore::new(vec![
            HospitalRecord::new("A", 5, 2, 10, 1, 1),
            HospitalRecord::new("Bellevue", 20, 5, 15, 2, 2),
        ])
    }

    #[test]
    fn test_table_has_labels_and_rows() {
        let table = render_table(&store(), None);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("Hospital Name"));
        assert!(lines[0].contains("Number of MRI Machines"));
        assert!(lines[2].contains("Bellevue"));
        assert!(lines[2].trim_end().ends_with('2'));
    }

    #[test]
    fn test_hidden_rows_are_omitted() {
        let visible = BTreeSet::from([1]);
        let table = render_table(&store(), Some(&visible));

        assert!(table.contains("Bellevue"));
        assert!(!table.lines().any(|line| line.starts_with("0 ")));
        assert!(table.contains("(1 of 2 rows hidden)"));
    }

    #[test]
    fn test_chart_bars_scale_with_percentage() {
        let data = vec![
            StaffPercentage {
                name: "Full".to_string(),
                percentage: 100.0,
            },
            StaffPercentage {
                name: "Half".to_string(),
                percentage: 50.0,
            },
            StaffPercentage {
                name: "Neg".to_string(),
                percentage: -20.0,
            },
        ];
        let chart = render_chart(&data);
        let lines: Vec<&str> = chart.lines().collect();

        assert_eq!(lines[0], CHART_TITLE);
        assert_eq!(lines[1].matches('#').count(), 50);
        assert_eq!(lines[2].matches('#').count(), 25);
        assert_eq!(lines[3].matches('#').count(), 0);
        assert!(lines[3].ends_with("-20.0%"));
    }

    #[test]
    fn test_chart_json() {
        let data = vec![StaffPercentage {
            name: "C".to_string(),
            percentage: 20.0,
        }];
        let json: serde_json::Value = serde_json::from_str(&render_chart_json(&data).unwrap()).unwrap();
        assert_eq!(json[0]["name"], "C");
        assert_eq!(json[0]["percentage"], 20.0);
    }
}
