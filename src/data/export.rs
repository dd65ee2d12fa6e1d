//! Derived table output
//!
//! CSV, JSON and terminal renderings of derived rows.

use std::fmt::Write as _;
use std::io::Write;

use serde_json::{Map, Value};

use crate::features::row::{derived_columns, Metric, Side};
use crate::features::DerivedRow;
use crate::{ColumnConfig, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use table, json, or csv.", s)),
        }
    }
}

/// Write rows as CSV: input columns first, then derived columns
pub fn write_csv<W: Write>(rows: &[DerivedRow], columns: &ColumnConfig, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    if let Some(first) = rows.first() {
        let cells = first.to_columns(columns);
        wtr.write_record(cells.iter().map(|(k, _)| k.as_str()))?;
    } else {
        wtr.write_record(derived_columns())?;
    }

    for row in rows {
        let cells = row.to_columns(columns);
        wtr.write_record(cells.iter().map(|(_, v)| v.as_str()))?;
    }

    wtr.flush()?;
    Ok(())
}

/// Derived columns that are not strings on the wire
fn typed_value(name: &str, value: String) -> Value {
    for side in Side::ALL {
        if Metric::Streak.column(side) == name {
            if let Ok(n) = value.parse::<i64>() {
                return Value::from(n);
            }
        }
        if Metric::Covered.column(side) == name || Metric::Won.column(side) == name {
            return Value::Bool(value == "true");
        }
    }
    Value::String(value)
}

/// Rows as a JSON array of flat objects
pub fn to_json(rows: &[DerivedRow], columns: &ColumnConfig) -> Value {
    let objects = rows
        .iter()
        .map(|row| {
            let mut obj = Map::new();
            for (name, value) in row.to_columns(columns) {
                let value = typed_value(&name, value);
                obj.insert(name, value);
            }
            Value::Object(obj)
        })
        .collect();
    Value::Array(objects)
}

pub fn write_json<W: Write>(rows: &[DerivedRow], columns: &ColumnConfig, writer: W) -> Result<()> {
    serde_json::to_writer_pretty(writer, &to_json(rows, columns))?;
    Ok(())
}

/// Write rows in the given format and flush the writer
pub fn write_rows<W: Write>(
    rows: &[DerivedRow],
    columns: &ColumnConfig,
    format: OutputFormat,
    mut writer: W,
) -> Result<()> {
    match format {
        OutputFormat::Table => writer.write_all(render_table(rows).as_bytes())?,
        OutputFormat::Json => write_json(rows, columns, &mut writer)?,
        OutputFormat::Csv => write_csv(rows, columns, &mut writer)?,
    }
    writer.flush()?;
    Ok(())
}

/// Compact terminal table of the home/away context
pub fn render_table(rows: &[DerivedRow]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<10} {:<5} {:<5} {:<5} | {:>4} {:<4} {:<9} {:<3} {:<5} | {:>4} {:<4} {:<9} {:<3} {:<5}",
        "Date", "Home", "Away", "Pick",
        "Strk", "Rest", "Travel", "ATS", "OU",
        "Strk", "Rest", "Travel", "ATS", "OU"
    );
    let _ = writeln!(out, "{}", "─".repeat(100));

    for row in rows {
        let _ = writeln!(
            out,
            "{:<10} {:<5} {:<5} {:<5} | {:>4} {:<4} {:<9} {:<3} {:<5} | {:>4} {:<4} {:<9} {:<3} {:<5}",
            row.record.date.format("%Y-%m-%d"),
            row.home.team,
            row.away.team,
            row.record.pick,
            row.home.streak,
            row.home.rest,
            row.home.travel,
            row.home.prev_ats,
            row.home.prev_ou,
            row.away.streak,
            row.away.rest,
            row.away.travel,
            row.away.prev_ats,
            row.away.prev_ou,
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CsvSource;
    use crate::features::FeatureEngine;

    const SHEET: &str = "\
Fecha,Partido (Local vs Visitante),Selección Modelo,Resultado ATS,Resultado ML,Resultado O/U,Tipo de Momio,H2H_Season
2024-01-02,BOS vs NYK,BOS,SI,SI,Over,Favorito Pesado,1-0
2024-01-04,MIA vs BOS,MIA,NO,SI,Under,Underdog,0-0
";

    fn derive() -> Vec<DerivedRow> {
        let loaded = CsvSource::read(SHEET.as_bytes(), &ColumnConfig::default()).unwrap();
        FeatureEngine::new().run(loaded.games).rows
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert!("xlsx".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_csv_columns() {
        let rows = derive();
        let mut buf = Vec::new();
        write_csv(&rows, &ColumnConfig::default(), &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("Fecha,Selección Modelo"));
        assert!(header.contains("H2H_Season"));
        assert!(header.contains("Calc_Home_Rest"));
        assert!(header.contains("Real_Opp_Class"));
        assert!(header.ends_with("Real_Opp_Won"));
        assert_eq!(lines.count(), 2);
    }

    #[test]
    fn test_json_types() {
        let rows = derive();
        let json = to_json(&rows, &ColumnConfig::default());
        let second = &json[1];

        assert_eq!(second["Calc_Away_Streak"], Value::from(1));
        assert_eq!(second["Calc_Away_Rest"], Value::from("1"));
        assert_eq!(second["Calc_Away_Travel"], Value::from("Leaves"));
        assert_eq!(second["Real_Home_Class"], Value::from("Underdog"));
        assert_eq!(second["Real_Away_Class"], Value::from("Favorito"));
        assert_eq!(second["Real_Home_Won"], Value::Bool(true));
        assert_eq!(second["Real_Pick_Covered"], Value::Bool(false));
        assert_eq!(second["Fecha_Str"], Value::from("2024-01-04"));
    }

    #[test]
    fn test_empty_csv_has_header() {
        let mut buf = Vec::new();
        write_csv(&[], &ColumnConfig::default(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("HomeTeam,AwayTeam,Fecha_Str"));
    }

    #[test]
    fn test_missing_class_exported_as_na() {
        let sheet = "\
Fecha,HomeTeam,AwayTeam,Selección Modelo,Resultado ATS,Resultado ML,Resultado O/U,Tipo de Momio
2024-01-02,BOS,NYK,BOS,SI,SI,Over,
";
        let loaded = CsvSource::read(sheet.as_bytes(), &ColumnConfig::default()).unwrap();
        let rows = FeatureEngine::new().run(loaded.games).rows;
        let columns = ColumnConfig::default();

        let exported = rows[0]
            .to_columns(&columns)
            .into_iter()
            .find(|(k, _)| k == "Tipo de Momio")
            .map(|(_, v)| v);
        assert_eq!(exported.as_deref(), Some("N/A"));
        assert_eq!(rows[0].field("Tipo de Momio", &columns), exported);

        let mut buf = Vec::new();
        write_csv(&rows, &columns, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.lines().nth(1).unwrap().starts_with("2024-01-02,BOS,SI,SI,Over,N/A,"));
    }

    /// Accepts writes, fails on flush
    struct FlushFails(Vec<u8>);

    impl Write for FlushFails {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
        }
    }

    #[test]
    fn test_write_rows_reports_flush_failure() {
        let rows = derive();
        let columns = ColumnConfig::default();

        for format in [OutputFormat::Table, OutputFormat::Json, OutputFormat::Csv] {
            let err = write_rows(&rows, &columns, format, FlushFails(Vec::new())).unwrap_err();
            assert!(matches!(err, crate::CourtsideError::Io(_) | crate::CourtsideError::Csv(_)));
        }

        let mut buf = Vec::new();
        write_rows(&rows, &columns, OutputFormat::Json, &mut buf).unwrap();
        assert!(String::from_utf8(buf).unwrap().contains("Calc_Pick_Travel"));
    }

    #[test]
    fn test_table_render() {
        let table = render_table(&derive());
        assert!(table.contains("Leaves"));
        assert_eq!(table.lines().count(), 4);
    }
}
