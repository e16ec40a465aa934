//! Formatted terminal output for a fetched series.
//!
//! We keep formatting code in one place so the fetch code stays clean and
//! output changes are localized.

use crate::catalog::Resolved;
use crate::data::format_bcb_date;
use crate::domain::SeriesTable;
use crate::report::stats::Summary;

pub const NO_DATA_NOTICE: &str = "No data found for this period.";

/// Header block: title, series, requested range, unit and chunk bookkeeping.
pub fn format_header(selection: &Resolved, table: &SeriesTable) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== {} ===\n", selection.title()));
    out.push_str(&format!("Series: SGS {}\n", table.series));
    out.push_str(&format!(
        "Period: {} to {}\n",
        format_bcb_date(table.start),
        format_bcb_date(table.end)
    ));
    out.push_str(&format!("Unit: {}\n", selection.unit()));
    out.push_str(&format!(
        "Windows: {} requested | {} with data | {} empty | {} failed\n",
        table.chunks.issued, table.chunks.with_rows, table.chunks.empty, table.chunks.failed
    ));
    out
}

/// Data table. `max_rows` keeps the most recent rows when the table is long.
pub fn format_table(table: &SeriesTable, max_rows: Option<usize>) -> String {
    if table.is_empty() {
        return format!("{NO_DATA_NOTICE}\n");
    }

    let mut out = String::new();
    out.push_str(&format!("{:<10} {:>14}\n", "date", "value"));
    out.push_str(&format!("{:-<10} {:-<14}\n", "", ""));

    let skip = match max_rows {
        Some(n) if n < table.len() => table.len() - n,
        _ => 0,
    };
    if skip > 0 {
        out.push_str(&format!("... {skip} earlier row(s) omitted\n"));
    }

    for row in table.rows.iter().skip(skip) {
        out.push_str(&format!(
            "{:<10} {:>14}\n",
            format_bcb_date(row.date),
            fmt_value(row.value)
        ));
    }
    out
}

/// Mean / median / standard deviation lines, e.g. `Mean: 4.52 %`.
pub fn format_summary(summary: &Summary, unit: &str) -> String {
    let mut out = String::new();
    out.push_str("Descriptive statistics:\n");
    out.push_str(&format!("Mean: {}\n", fmt_stat(summary.mean, unit)));
    out.push_str(&format!("Median: {}\n", fmt_stat(summary.median, unit)));
    out.push_str(&format!("Std dev: {}\n", fmt_stat(summary.std_dev, unit)));
    if summary.missing > 0 {
        out.push_str(&format!(
            "({} of {} values missing and excluded)\n",
            summary.missing, summary.rows
        ));
    }
    out
}

/// Complete report for `painel fetch`.
pub fn format_report(selection: &Resolved, table: &SeriesTable, summary: &Summary, max_rows: Option<usize>) -> String {
    let mut out = format_header(selection, table);
    out.push('\n');
    out.push_str(&format_table(table, max_rows));
    if !table.is_empty() {
        out.push('\n');
        out.push_str(&format_summary(summary, selection.unit()));
    }
    out
}

pub fn fmt_value(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.2}")).unwrap_or_else(|| "-".to_string())
}

fn fmt_stat(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{v:.2} {unit}"),
        None => "n/a".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::catalog::Indicator;
    use crate::domain::Observation;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn ipca_table() -> (Resolved, SeriesTable) {
        let selection = Indicator::Ipca.resolve(None).unwrap();
        let mut table = SeriesTable::empty(selection.series, day(1), day(31));
        table.rows = vec![
            Observation::new(day(1), Some(0.40)),
            Observation::new(day(2), None),
            Observation::new(day(3), Some(0.80)),
        ];
        table.chunks.issued = 1;
        table.chunks.with_rows = 1;
        (selection, table)
    }

    #[test]
    fn empty_table_shows_notice_only() {
        let selection = Indicator::Selic.resolve(None).unwrap();
        let table = SeriesTable::empty(selection.series, day(1), day(2));
        let report = format_report(&selection, &table, &Summary::from_table(&table), None);

        assert!(report.contains(NO_DATA_NOTICE));
        assert!(!report.contains("Mean:"));
    }

    #[test]
    fn table_rows_use_bcb_dates_and_dash_for_missing() {
        let (_, table) = ipca_table();
        let text = format_table(&table, None);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 5);
        assert!(lines[2].starts_with("01/01/2024"));
        assert!(lines[2].ends_with("0.40"));
        assert!(lines[3].ends_with('-'));
    }

    #[test]
    fn max_rows_keeps_the_latest() {
        let (_, table) = ipca_table();
        let text = format_table(&table, Some(1));
        assert!(text.contains("2 earlier row(s) omitted"));
        assert!(text.contains("03/01/2024"));
        assert!(!text.contains("01/01/2024"));
    }

    #[test]
    fn summary_lines_carry_the_unit() {
        let (selection, table) = ipca_table();
        let text = format_summary(&Summary::from_table(&table), selection.unit());
        assert!(text.contains("Mean: 0.60 %"));
        assert!(text.contains("Median: 0.60 %"));
        assert!(text.contains("1 of 3 values missing"));
    }

    #[test]
    fn header_names_series_and_period() {
        let (selection, table) = ipca_table();
        let header = format_header(&selection, &table);
        assert!(header.contains("=== IPCA ==="));
        assert!(header.contains("SGS 433"));
        assert!(header.contains("01/01/2024 to 31/01/2024"));
    }
}
