use std::fs::File;
use std::path::Path;

use polars::prelude::*;

use crate::table::TableError;

/// Strings read back as null, matching the default markers of common
/// data-frame tooling.
const NULL_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn read_options() -> CsvReadOptions {
    let null_values = NullValues::AllColumns(NULL_MARKERS.iter().map(|m| (*m).into()).collect());
    CsvReadOptions::default()
        .with_has_header(true)
        // Every column comes in as text; numbers are parsed where they are used.
        .with_infer_schema_length(Some(0))
        .with_parse_options(CsvParseOptions::default().with_null_values(Some(null_values)))
}

pub fn read_csv(path: &Path) -> Result<DataFrame, TableError> {
    read_options()
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .and_then(|reader| reader.finish())
        .map_err(|source| TableError::File {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
pub(crate) fn read_csv_str(data: &str) -> Result<DataFrame, TableError> {
    let cursor = std::io::Cursor::new(data.as_bytes().to_vec());
    Ok(read_options().into_reader_with_file_handle(cursor).finish()?)
}

/// Writes `frame` with a header; nulls become empty fields.
pub fn write_csv(frame: &mut DataFrame, path: &Path) -> Result<(), TableError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).include_header(true).finish(frame)?;
    Ok(())
}
