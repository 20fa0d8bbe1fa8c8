use polars::prelude::*;

use crate::table::TableError;

const VALUE_COUNT: &str = "n";

pub fn null_count(frame: &DataFrame, name: &str) -> Result<usize, TableError> {
    Ok(frame.column(name)?.null_count())
}

/// Occurrences of each non-null value, most frequent first. Ties are
/// ordered by value.
pub fn value_counts(frame: &DataFrame, name: &str) -> Result<Vec<(String, usize)>, TableError> {
    let counts = frame
        .clone()
        .lazy()
        .select([col(name).cast(DataType::String)])
        .filter(col(name).is_not_null())
        .group_by([col(name)])
        .agg([len().alias(VALUE_COUNT)])
        .sort_by_exprs(
            [col(VALUE_COUNT), col(name)],
            SortMultipleOptions::default().with_order_descending_multi([true, false]),
        )
        .collect()?;

    let values = counts.column(name)?.str()?;
    let totals = counts.column(VALUE_COUNT)?.cast(&DataType::UInt64)?;
    Ok(values
        .into_iter()
        .zip(totals.u64()?.into_iter())
        .filter_map(|(value, n)| Some((value?.to_string(), n? as usize)))
        .collect())
}

/// Logs row and column counts, then one line per column.
pub fn log_summary(frame: &DataFrame, label: &str) {
    log::info!(
        "{}: {} rows, {} columns",
        label,
        frame.height(),
        frame.width()
    );
    for column in frame.get_columns() {
        log::info!(
            "  {:<32} {} non-null",
            column.name().as_str(),
            column.len() - column.null_count()
        );
    }
}
