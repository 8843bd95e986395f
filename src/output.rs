use serde::Serialize;
use std::error::Error;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), Box<dyn Error>> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), Box<dyn Error>> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

pub fn render_table<T>(rows: &[T]) -> String
where
    T: Tabled + Clone,
{
    if rows.is_empty() {
        return "(no rows)".to_string();
    }
    Table::new(rows.to_vec()).with(Style::markdown()).to_string()
}

pub fn preview_table<T: Tabled + Clone>(title: &str, note: Option<&str>, rows: &[T]) {
    println!("{}", title);
    if let Some(n) = note {
        println!("({})", n);
    }
    println!();
    println!("{}\n", render_table(rows));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TrendRow;

    fn trend_row(date: &str) -> TrendRow {
        TrendRow {
            date: date.to_string(),
            service: "1,200".to_string(),
            accident: "3".to_string(),
            fatality: "0".to_string(),
        }
    }

    #[test]
    fn renders_markdown_with_renamed_headers() {
        let table = render_table(&[trend_row("2026-01-01")]);
        assert!(table.contains("| Date"));
        assert!(table.contains("ServiceUsers"));
        assert!(table.contains("1,200"));
        assert_eq!(render_table::<TrendRow>(&[]), "(no rows)");
    }

    #[test]
    fn csv_and_json_land_on_disk() {
        let dir = tempfile::tempdir().unwrap();

        let csv_path = dir.path().join("trend.csv");
        write_csv(&csv_path, &[trend_row("2026-01-01"), trend_row("2026-01-02")]).unwrap();
        let text = std::fs::read_to_string(&csv_path).unwrap();
        assert!(text.starts_with("Date,ServiceUsers,Accidents,Fatalities"));
        assert_eq!(text.lines().count(), 3);

        let json_path = dir.path().join("value.json");
        write_json(&json_path, &serde_json::json!({ "isMock": true })).unwrap();
        assert!(std::fs::read_to_string(&json_path).unwrap().contains("\"isMock\": true"));
    }
}
