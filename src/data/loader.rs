use std::path::Path;

use anyhow::{Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value as JsonValue};

use super::error::DatasetError;
use super::model::{
    LaunchDataset, LaunchRecord, Outcome, CLASS_COLUMN, PAYLOAD_COLUMN, SITE_COLUMN,
};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a launch dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row containing `Launch Site`, `Payload Mass (kg)`, `class`
/// * `.json`    – `[{ "Launch Site": ..., "Payload Mass (kg)": ..., "class": ... }, ...]`
/// * `.parquet` – columns with the same names
///
/// Any other columns are ignored.
pub fn load_file(path: &Path) -> Result<LaunchDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(DatasetError::UnsupportedFormat(other.to_string()).into()),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    let dataset = LaunchDataset::from_records(records)
        .with_context(|| format!("loading {}", path.display()))?;
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Row validation shared by all formats
// ---------------------------------------------------------------------------

fn validate_site(row: usize, site: &str) -> Result<String, DatasetError> {
    let site = site.trim();
    if site.is_empty() {
        return Err(DatasetError::MissingValue {
            row,
            column: SITE_COLUMN,
        });
    }
    Ok(site.to_string())
}

fn validate_payload(row: usize, payload: f64) -> Result<f64, DatasetError> {
    if payload.is_finite() && payload >= 0.0 {
        Ok(payload)
    } else {
        Err(DatasetError::InvalidValue {
            row,
            column: PAYLOAD_COLUMN,
            value: payload.to_string(),
        })
    }
}

fn validate_class(row: usize, class: f64) -> Result<Outcome, DatasetError> {
    Outcome::from_class(class).ok_or_else(|| DatasetError::InvalidValue {
        row,
        column: CLASS_COLUMN,
        value: class.to_string(),
    })
}

fn parse_number(row: usize, column: &'static str, raw: &str) -> Result<f64, DatasetError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(DatasetError::MissingValue { row, column });
    }
    raw.parse::<f64>().map_err(|_| DatasetError::InvalidValue {
        row,
        column,
        value: raw.to_string(),
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one launch per row.
/// Columns are located by name, so order and extra columns don't matter.
fn load_csv(path: &Path) -> Result<Vec<LaunchRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .context("opening CSV")?;
    let headers = reader.headers().context("reading CSV headers")?.clone();

    let column = |name: &'static str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or(DatasetError::MissingColumn(name))
    };
    let site_idx = column(SITE_COLUMN)?;
    let payload_idx = column(PAYLOAD_COLUMN)?;
    let class_idx = column(CLASS_COLUMN)?;

    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let row = row_no + 1;
        let record = result.with_context(|| format!("CSV row {row}"))?;

        let site = validate_site(row, record.get(site_idx).unwrap_or(""))?;
        let payload = parse_number(row, PAYLOAD_COLUMN, record.get(payload_idx).unwrap_or(""))?;
        let class = parse_number(row, CLASS_COLUMN, record.get(class_idx).unwrap_or(""))?;

        records.push(LaunchRecord {
            site,
            payload_mass_kg: validate_payload(row, payload)?,
            outcome: validate_class(row, class)?,
        });
    }

    Ok(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Launch Site": "CCAFS LC-40", "Payload Mass (kg)": 525.0, "class": 0 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<LaunchRecord>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let rows = root.as_array().context("Expected top-level JSON array")?;

    let mut records = Vec::with_capacity(rows.len());
    for (row_no, value) in rows.iter().enumerate() {
        let row = row_no + 1;
        let obj = value
            .as_object()
            .with_context(|| format!("Row {row} is not a JSON object"))?;

        let site = match json_field(obj, row, SITE_COLUMN)? {
            JsonValue::String(s) => validate_site(row, s)?,
            other => {
                return Err(DatasetError::InvalidValue {
                    row,
                    column: SITE_COLUMN,
                    value: other.to_string(),
                }
                .into())
            }
        };
        let payload = json_number(json_field(obj, row, PAYLOAD_COLUMN)?, row, PAYLOAD_COLUMN)?;
        let class = json_number(json_field(obj, row, CLASS_COLUMN)?, row, CLASS_COLUMN)?;

        records.push(LaunchRecord {
            site,
            payload_mass_kg: validate_payload(row, payload)?,
            outcome: validate_class(row, class)?,
        });
    }

    Ok(records)
}

/// A key absent from the first row is a missing column; later it is a
/// missing value, like an explicit `null`.
fn json_field<'a>(
    obj: &'a Map<String, JsonValue>,
    row: usize,
    column: &'static str,
) -> Result<&'a JsonValue, DatasetError> {
    match obj.get(column) {
        Some(JsonValue::Null) => Err(DatasetError::MissingValue { row, column }),
        Some(value) => Ok(value),
        None if row == 1 => Err(DatasetError::MissingColumn(column)),
        None => Err(DatasetError::MissingValue { row, column }),
    }
}

fn json_number(value: &JsonValue, row: usize, column: &'static str) -> Result<f64, DatasetError> {
    match value {
        JsonValue::Number(n) => n.as_f64().ok_or_else(|| DatasetError::InvalidValue {
            row,
            column,
            value: n.to_string(),
        }),
        JsonValue::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        JsonValue::String(s) => parse_number(row, column, s),
        other => Err(DatasetError::InvalidValue {
            row,
            column,
            value: other.to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of launch records.
///
/// Expected schema:
/// - `Launch Site`: Utf8 or LargeUtf8
/// - `Payload Mass (kg)`: any integer or float column
/// - `class`: any integer, float or boolean column
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Vec<LaunchRecord>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let column = |name: &'static str| {
            schema
                .index_of(name)
                .map(|idx| batch.column(idx))
                .map_err(|_| DatasetError::MissingColumn(name))
        };
        let first_row = records.len() + 1;
        let site_col = column(SITE_COLUMN)?;
        let payload_col = float_column(column(PAYLOAD_COLUMN)?, first_row, PAYLOAD_COLUMN)?;
        let class_col = float_column(column(CLASS_COLUMN)?, first_row, CLASS_COLUMN)?;

        for i in 0..batch.num_rows() {
            let row = records.len() + 1;

            let site = arrow_string(site_col, i, row, SITE_COLUMN)?;
            let payload = arrow_number(&payload_col, i, row, PAYLOAD_COLUMN)?;
            let class = arrow_number(&class_col, i, row, CLASS_COLUMN)?;

            records.push(LaunchRecord {
                site: validate_site(row, &site)?,
                payload_mass_kg: validate_payload(row, payload)?,
                outcome: validate_class(row, class)?,
            });
        }
    }

    Ok(records)
}

// -- Arrow helpers --

fn arrow_string(
    col: &ArrayRef,
    i: usize,
    row: usize,
    column: &'static str,
) -> Result<String, DatasetError> {
    if col.is_null(i) {
        return Err(DatasetError::MissingValue { row, column });
    }
    match col.data_type() {
        DataType::Utf8 => Ok(col.as_string::<i32>().value(i).to_string()),
        DataType::LargeUtf8 => Ok(col.as_string::<i64>().value(i).to_string()),
        other => Err(DatasetError::InvalidValue {
            row,
            column,
            value: format!("{other:?} column"),
        }),
    }
}

/// Widen any numeric or boolean column to Float64 so rows can be read uniformly.
fn float_column(
    col: &ArrayRef,
    first_row: usize,
    column: &'static str,
) -> Result<ArrayRef, DatasetError> {
    let data_type = col.data_type();
    if !(data_type.is_numeric() || *data_type == DataType::Boolean) {
        return Err(DatasetError::InvalidValue {
            row: first_row,
            column,
            value: format!("{data_type:?} column"),
        });
    }
    cast(col.as_ref(), &DataType::Float64).map_err(|e| DatasetError::InvalidValue {
        row: first_row,
        column,
        value: e.to_string(),
    })
}

/// Read one value from a column already widened by [`float_column`].
fn arrow_number(
    col: &ArrayRef,
    i: usize,
    row: usize,
    column: &'static str,
) -> Result<f64, DatasetError> {
    if col.is_null(i) {
        return Err(DatasetError::MissingValue { row, column });
    }
    Ok(col.as_primitive::<Float64Type>().value(i))
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{
        BooleanArray, Float64Array, Int64Array, Int8Array, StringArray, UInt16Array,
    };
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use tempfile::NamedTempFile;

    use super::*;

    fn write_temp(suffix: &str, contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn root_cause(err: &anyhow::Error) -> Option<&DatasetError> {
        err.chain().find_map(|e| e.downcast_ref::<DatasetError>())
    }

    #[test]
    fn csv_with_extra_columns_loads_by_header_name() {
        let file = write_temp(
            ".csv",
            "Unnamed: 0,Flight Number,Launch Site,class,Payload Mass (kg),Booster Version\n\
             0,1,CCAFS LC-40,0,0.0,F9 v1.0  B0003\n\
             1,2,CCAFS LC-40,0,525.0,F9 v1.0  B0005\n\
             2,3,VAFB SLC-4E,1,9600.0,F9 FT B1029.1\n",
        );

        let dataset = load_file(file.path()).unwrap();
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.sites(), ["CCAFS LC-40", "VAFB SLC-4E"]);
        assert_eq!(dataset.min_payload(), 0);
        assert_eq!(dataset.max_payload(), 9600);
        assert_eq!(dataset.records()[2].outcome, Outcome::Success);
        assert_eq!(dataset.records()[1].payload_mass_kg, 525.0);
    }

    #[test]
    fn csv_missing_column_is_fatal() {
        let file = write_temp(".csv", "Launch Site,class\nCCAFS LC-40,1\n");
        let err = load_file(file.path()).unwrap_err();
        assert!(matches!(
            root_cause(&err),
            Some(DatasetError::MissingColumn(PAYLOAD_COLUMN))
        ));
    }

    #[test]
    fn csv_rejects_bad_cells() {
        let file = write_temp(
            ".csv",
            "Launch Site,Payload Mass (kg),class\nCCAFS LC-40,heavy,1\n",
        );
        let err = load_file(file.path()).unwrap_err();
        assert!(matches!(
            root_cause(&err),
            Some(DatasetError::InvalidValue { row: 1, column: PAYLOAD_COLUMN, .. })
        ));

        let file = write_temp(
            ".csv",
            "Launch Site,Payload Mass (kg),class\nCCAFS LC-40,100,1\nVAFB,200,2\n",
        );
        let err = load_file(file.path()).unwrap_err();
        assert!(matches!(
            root_cause(&err),
            Some(DatasetError::InvalidValue { row: 2, column: CLASS_COLUMN, .. })
        ));

        let file = write_temp(
            ".csv",
            "Launch Site,Payload Mass (kg),class\n,100,1\n",
        );
        let err = load_file(file.path()).unwrap_err();
        assert!(matches!(
            root_cause(&err),
            Some(DatasetError::MissingValue { row: 1, column: SITE_COLUMN })
        ));
    }

    #[test]
    fn csv_without_rows_is_empty_dataset() {
        let file = write_temp(".csv", "Launch Site,Payload Mass (kg),class\n");
        let err = load_file(file.path()).unwrap_err();
        assert!(matches!(root_cause(&err), Some(DatasetError::Empty)));
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load_file(Path::new("/nonexistent/spacex_launch_dash.csv")).unwrap_err();
        assert!(format!("{err:#}").contains("spacex_launch_dash.csv"));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let file = write_temp(".xlsx", "");
        let err = load_file(file.path()).unwrap_err();
        assert!(matches!(
            root_cause(&err),
            Some(DatasetError::UnsupportedFormat(ext)) if ext == "xlsx"
        ));
    }

    #[test]
    fn json_records_load() {
        let file = write_temp(
            ".json",
            r#"[
                {"Launch Site": "KSC LC-39A", "Payload Mass (kg)": 2490.0, "class": 1},
                {"Launch Site": "KSC LC-39A", "Payload Mass (kg)": 5300, "class": 0}
            ]"#,
        );
        let dataset = load_file(file.path()).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.sites(), ["KSC LC-39A"]);
        assert_eq!(dataset.max_payload(), 5300);
    }

    #[test]
    fn json_missing_key_and_null() {
        let file = write_temp(".json", r#"[{"Launch Site": "KSC LC-39A", "class": 1}]"#);
        let err = load_file(file.path()).unwrap_err();
        assert!(matches!(
            root_cause(&err),
            Some(DatasetError::MissingColumn(PAYLOAD_COLUMN))
        ));

        let file = write_temp(
            ".json",
            r#"[{"Launch Site": "KSC LC-39A", "Payload Mass (kg)": null, "class": 1}]"#,
        );
        let err = load_file(file.path()).unwrap_err();
        assert!(matches!(
            root_cause(&err),
            Some(DatasetError::MissingValue { row: 1, column: PAYLOAD_COLUMN })
        ));
    }

    fn write_parquet(columns: Vec<(&str, ArrayRef)>) -> NamedTempFile {
        let batch = RecordBatch::try_from_iter(columns).unwrap();
        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let out = std::fs::File::create(file.path()).unwrap();
        let mut writer = ArrowWriter::try_new(out, batch.schema(), None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
        file
    }

    #[test]
    fn parquet_records_load() {
        let schema = Arc::new(Schema::new(vec![
            Field::new(SITE_COLUMN, DataType::Utf8, false),
            Field::new(PAYLOAD_COLUMN, DataType::Float64, false),
            Field::new(CLASS_COLUMN, DataType::Int64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["CCAFS SLC-40", "VAFB SLC-4E"])),
                Arc::new(Float64Array::from(vec![3669.0, 475.0])),
                Arc::new(Int64Array::from(vec![1, 0])),
            ],
        )
        .unwrap();

        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let out = std::fs::File::create(file.path()).unwrap();
        let mut writer = ArrowWriter::try_new(out, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let dataset = load_file(file.path()).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.sites(), ["CCAFS SLC-40", "VAFB SLC-4E"]);
        assert_eq!(dataset.min_payload(), 475);
        assert_eq!(dataset.records()[0].outcome, Outcome::Success);
    }

    #[test]
    fn parquet_narrow_integer_columns_load() {
        let file = write_parquet(vec![
            (
                SITE_COLUMN,
                Arc::new(StringArray::from(vec!["KSC LC-39A", "KSC LC-39A"])) as ArrayRef,
            ),
            (PAYLOAD_COLUMN, Arc::new(UInt16Array::from(vec![5300u16, 2490])) as ArrayRef),
            (CLASS_COLUMN, Arc::new(Int8Array::from(vec![1i8, 0])) as ArrayRef),
        ]);

        let dataset = load_file(file.path()).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.min_payload(), 2490);
        assert_eq!(dataset.max_payload(), 5300);
        assert_eq!(dataset.records()[0].outcome, Outcome::Success);
        assert_eq!(dataset.records()[1].outcome, Outcome::Failure);
    }

    #[test]
    fn parquet_boolean_class_loads() {
        let file = write_parquet(vec![
            (SITE_COLUMN, Arc::new(StringArray::from(vec!["CCAFS LC-40"])) as ArrayRef),
            (PAYLOAD_COLUMN, Arc::new(Int64Array::from(vec![500i64])) as ArrayRef),
            (CLASS_COLUMN, Arc::new(BooleanArray::from(vec![true])) as ArrayRef),
        ]);

        let dataset = load_file(file.path()).unwrap();
        assert_eq!(dataset.records()[0].outcome, Outcome::Success);
    }

    #[test]
    fn parquet_text_class_column_is_rejected() {
        let file = write_parquet(vec![
            (SITE_COLUMN, Arc::new(StringArray::from(vec!["CCAFS LC-40"])) as ArrayRef),
            (PAYLOAD_COLUMN, Arc::new(Float64Array::from(vec![500.0])) as ArrayRef),
            (CLASS_COLUMN, Arc::new(StringArray::from(vec!["1"])) as ArrayRef),
        ]);

        let err = load_file(file.path()).unwrap_err();
        assert!(matches!(
            root_cause(&err),
            Some(DatasetError::InvalidValue { row: 1, column: CLASS_COLUMN, .. })
        ));
    }
}
