use polars::prelude::*;

use crate::table::TableError;

const ROW_INDEX: &str = "__row_index";

#[cfg(test)]
pub(crate) fn column_names(frame: &DataFrame) -> Vec<String> {
    frame
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect()
}

pub fn has_column(frame: &DataFrame, name: &str) -> bool {
    frame.get_column_index(name).is_some()
}

/// Values of one column as text, whatever its dtype.
pub fn text_column(frame: &DataFrame, name: &str) -> Result<Vec<Option<String>>, TableError> {
    let column = frame.column(name)?.cast(&DataType::String)?;
    Ok(column
        .str()?
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect())
}

/// Parses a text column as floats; nulls stay null, anything else that is
/// not a number is an error.
pub fn numeric_column(frame: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, TableError> {
    text_column(frame, name)?
        .into_iter()
        .map(|value| value.map(|v| parse_number(name, &v)).transpose())
        .collect()
}

/// Adds or replaces a text column.
pub fn with_text_column(
    frame: &mut DataFrame,
    name: &str,
    values: Vec<Option<String>>,
) -> Result<(), TableError> {
    frame.with_column(Series::new(name.into(), values))?;
    Ok(())
}

pub fn map_text_column<F>(frame: &mut DataFrame, name: &str, f: F) -> Result<(), TableError>
where
    F: Fn(Option<&str>) -> Result<Option<String>, TableError>,
{
    let values = text_column(frame, name)?
        .iter()
        .map(|value| f(value.as_deref()))
        .collect::<Result<Vec<_>, _>>()?;
    with_text_column(frame, name, values)
}

/// Sets every row of `name` to `value`, adding the column when needed.
pub fn with_constant(frame: DataFrame, name: &str, value: &str) -> Result<DataFrame, TableError> {
    Ok(frame.lazy().with_column(lit(value).alias(name)).collect()?)
}

/// Adds an all-null text column unless `name` already exists.
pub fn ensure_column(mut frame: DataFrame, name: &str) -> Result<DataFrame, TableError> {
    if !has_column(&frame, name) {
        let height = frame.height();
        frame.with_column(Series::full_null(name.into(), height, &DataType::String))?;
    }
    Ok(frame)
}

pub fn select(frame: &DataFrame, names: &[&str]) -> Result<DataFrame, TableError> {
    Ok(frame.select(names.iter().copied())?)
}

/// Rows where every column of `subset` is present.
pub fn drop_nulls(frame: &DataFrame, subset: &[&str]) -> Result<DataFrame, TableError> {
    let keep = subset
        .iter()
        .map(|name| col(*name).is_not_null())
        .fold(lit(true), |acc, present| acc.and(present));
    Ok(frame.clone().lazy().filter(keep).collect()?)
}

/// Exact-duplicate rows removed, first occurrences kept in order.
pub fn unique_rows(frame: &DataFrame) -> Result<DataFrame, TableError> {
    Ok(frame
        .clone()
        .lazy()
        .unique_stable(None, UniqueKeepStrategy::First)
        .collect()?)
}

/// Stacks frames row-wise. Columns are the union in first-appearance order
/// and cells a frame lacks are null.
pub fn concat_diagonal(frames: &[DataFrame]) -> Result<DataFrame, TableError> {
    let lazy: Vec<LazyFrame> = frames.iter().cloned().map(DataFrame::lazy).collect();
    Ok(concat_lf_diagonal(lazy, UnionArgs::default())?.collect()?)
}

/// Left join on equal, non-null keys.
///
/// Every left row appears at least once and in left order; a row with
/// several matches is repeated once per match. Unmatched rows get nulls for
/// the right-hand columns.
pub fn left_join(
    left: &DataFrame,
    right: &DataFrame,
    on: &[&str],
) -> Result<DataFrame, TableError> {
    let keys: Vec<Expr> = on.iter().map(|name| col(*name)).collect();
    Ok(left
        .clone()
        .lazy()
        .with_row_index(ROW_INDEX, None)
        .join(
            right.clone().lazy(),
            keys.clone(),
            keys,
            JoinArgs::new(JoinType::Left),
        )
        .sort_by_exprs(
            [col(ROW_INDEX)],
            SortMultipleOptions::default().with_maintain_order(true),
        )
        .drop([ROW_INDEX])
        .collect()?)
}

pub(crate) fn parse_number(column: &str, value: &str) -> Result<f64, TableError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| TableError::InvalidNumber {
            column: column.to_string(),
            value: value.to_string(),
        })
}

/// Text frame from literal rows; empty strings are null.
#[cfg(test)]
pub(crate) fn table_of(columns: &[&str], rows: &[&[&str]]) -> DataFrame {
    let columns: Vec<Column> = columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let values: Vec<Option<&str>> = rows
                .iter()
                .map(|row| Some(row[i]).filter(|v| !v.is_empty()))
                .collect();
            Column::from(Series::new((*name).into(), values))
        })
        .collect();
    DataFrame::new(columns).unwrap()
}

/// Column as text with nulls shown as empty strings.
#[cfg(test)]
pub(crate) fn column_of(frame: &DataFrame, name: &str) -> Vec<String> {
    text_column(frame, name)
        .unwrap()
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect()
}
