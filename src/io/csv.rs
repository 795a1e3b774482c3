use csv::{ReaderBuilder, Writer};
use std::fs::File;
use std::path::Path;

use crate::column::Column;
use crate::error::{Error, Result};
use crate::index::{DatetimeIndex, Index};
use crate::temporal::{format_datetimes, parse_datetime};
use crate::DataFrame;

/// Read a CSV file whose first column holds datetime row labels
///
/// Every other column is parsed as f64; an empty cell becomes NaN.
pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
    let file = File::open(path.as_ref())?;

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();
    if headers.is_empty() {
        return Ok(DataFrame::new());
    }

    let mut labels = Vec::new();
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); headers.len() - 1];

    for (row, result) in rdr.records().enumerate() {
        let record = result?;
        if record.len() != headers.len() {
            return Err(Error::LengthMismatch {
                expected: headers.len(),
                actual: record.len(),
            });
        }

        labels.push(parse_datetime(&record[0])?);
        for (i, values) in columns.iter_mut().enumerate() {
            let cell = &record[i + 1];
            let value = if cell.is_empty() {
                f64::NAN
            } else {
                cell.parse::<f64>().map_err(|e| {
                    Error::Format(format!(
                        "row {}, column '{}': cannot parse '{}' as a number: {}",
                        row,
                        headers[i + 1],
                        cell,
                        e
                    ))
                })?
            };
            values.push(value);
        }
    }

    let index_name = if headers[0].is_empty() {
        None
    } else {
        Some(headers[0].clone())
    };
    let mut df = DataFrame::with_index(DatetimeIndex::with_name(labels, index_name));
    for (name, values) in headers.into_iter().skip(1).zip(columns) {
        df.add_column(name, values)?;
    }

    Ok(df)
}

/// Write a DataFrame to a CSV file, overwriting any existing file
///
/// With `include_index`, the row labels go first under the index name
/// (empty header when unnamed).
pub fn write_csv<P: AsRef<Path>>(df: &DataFrame, path: P, include_index: bool) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut wtr = Writer::from_writer(file);

    let index_labels: Option<(String, Vec<String>)> = if include_index {
        Some(match df.index() {
            Index::Datetime(index) => (
                index.name().unwrap_or_default().to_string(),
                format_datetimes(index.values()),
            ),
            Index::Range(len) => (String::new(), (0..*len).map(|i| i.to_string()).collect()),
        })
    } else {
        None
    };

    let mut header: Vec<String> = Vec::with_capacity(df.column_count() + 1);
    if let Some((name, _)) = &index_labels {
        header.push(name.clone());
    }
    header.extend(df.column_names().iter().cloned());
    wtr.write_record(&header)?;

    let rendered: Vec<Vec<String>> = df
        .iter_columns()
        .map(|(_, column)| match column {
            Column::Float64(values) => values.iter().map(|v| format_float(*v)).collect(),
            Column::DateTime(values) => format_datetimes(values),
        })
        .collect();

    for row in 0..df.row_count() {
        let mut record = Vec::with_capacity(header.len());
        if let Some((_, labels)) = &index_labels {
            record.push(labels[row].clone());
        }
        for column in &rendered {
            record.push(column[row].clone());
        }
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

fn format_float(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        value.to_string()
    }
}
