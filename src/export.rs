//! CSV export of the catalog and result views.

use std::io::Write;

use serde::Serialize;

use crate::error::SeedError;
use crate::search::{FontWeight, ResultLine, SelectionItem};

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    power: u32,
    cast: u32,
    effect: &'a str,
    times: u32,
    weight: &'static str,
    line: &'a str,
}

impl<'a> From<&'a ResultLine> for CsvRow<'a> {
    fn from(line: &'a ResultLine) -> Self {
        Self {
            power: line.power,
            cast: line.cast,
            effect: &line.effect,
            times: line.times,
            weight: match line.weight {
                FontWeight::Regular => "regular",
                FontWeight::Thin => "thin",
            },
            line: &line.text,
        }
    }
}

/// Write `lines` as CSV with a `power,cast,effect,times,weight,line` header.
pub fn write_results_csv<W: Write>(writer: W, lines: &[ResultLine]) -> Result<(), SeedError> {
    let mut csv = csv::Writer::from_writer(writer);
    if lines.is_empty() {
        csv.write_record(["power", "cast", "effect", "times", "weight", "line"])?;
    }
    for line in lines {
        csv.serialize(CsvRow::from(line))?;
    }
    csv.flush().map_err(|err| SeedError::io("csv output", err))?;
    Ok(())
}

/// Write the catalog view as CSV with a `value,label` header.
pub fn write_catalog_csv<W: Write>(writer: W, items: &[SelectionItem]) -> Result<(), SeedError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["value", "label"])?;
    for item in items {
        csv.write_record([item.value.as_str(), item.label.as_str()])?;
    }
    csv.flush().map_err(|err| SeedError::io("csv output", err))?;
    Ok(())
}

pub fn results_csv_string(lines: &[ResultLine]) -> Result<String, SeedError> {
    let mut buffer = Vec::new();
    write_results_csv(&mut buffer, lines)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_header_and_quoted_rows() {
        let lines = vec![ResultLine {
            power: 10,
            cast: 1,
            effect: "Alpha".into(),
            times: 3,
            weight: FontWeight::Regular,
            text: "Power: 10, Cast: 1 for Alpha (x3)".into(),
        }];
        let csv = results_csv_string(&lines).expect("csv should render");
        let mut rows = csv.lines();
        assert_eq!(rows.next(), Some("power,cast,effect,times,weight,line"));
        assert_eq!(rows.next(), Some("10,1,Alpha,3,regular,\"Power: 10, Cast: 1 for Alpha (x3)\""));
        assert_eq!(rows.next(), None);
    }

    #[test]
    fn catalog_csv_quotes_labels_with_commas() {
        let items = vec![
            SelectionItem { label: "Alpha".into(), value: "a".into() },
            SelectionItem { label: "Burn, Greater".into(), value: "burn".into() },
        ];
        let mut buffer = Vec::new();
        write_catalog_csv(&mut buffer, &items).expect("csv should render");
        let csv = String::from_utf8(buffer).expect("csv should be utf-8");
        assert_eq!(csv, "value,label\na,Alpha\nburn,\"Burn, Greater\"\n");
    }

    #[test]
    fn empty_export_still_has_header() {
        let csv = results_csv_string(&[]).expect("csv should render");
        assert_eq!(csv.trim_end(), "power,cast,effect,times,weight,line");
    }
}
