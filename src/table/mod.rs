mod csv_io;
mod error;
mod ops;
mod summary;

pub use csv_io::{read_csv, write_csv};
pub use error::TableError;
pub use ops::{
    concat_diagonal, drop_nulls, ensure_column, has_column, left_join, map_text_column,
    numeric_column, select, text_column, unique_rows, with_constant, with_text_column,
};
pub use summary::{log_summary, null_count, value_counts};

#[cfg(test)]
pub(crate) use ops::{column_names, column_of, table_of};
