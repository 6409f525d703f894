use incident_core::MasterTable;
use incident_model::SourceName;
use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};

use crate::ReportError;
use crate::master::{MERGED_IDS_COLUMN, SOURCES_COLUMN};

/// String-typed `DataFrame` with the same columns as `master.csv`. Blank cells
/// are nulls.
pub fn to_dataframe(table: &MasterTable) -> Result<DataFrame, ReportError> {
    let mut columns: Vec<Column> = table
        .columns()
        .iter()
        .map(|column| {
            let values: Vec<Option<String>> = table
                .records()
                .iter()
                .map(|record| table.cell(record, column.as_str()))
                .collect();
            Series::new(column.as_str().into(), values).into_column()
        })
        .collect();

    let sources: Vec<String> = table
        .records()
        .iter()
        .map(|record| {
            let names: Vec<&str> = record.sources().iter().map(SourceName::as_str).collect();
            names.join(";")
        })
        .collect();
    let merged: Vec<Option<String>> = table
        .records()
        .iter()
        .map(|record| {
            let ids: Vec<String> = record.absorbed().iter().map(ToString::to_string).collect();
            (!ids.is_empty()).then(|| ids.join(";"))
        })
        .collect();
    columns.push(Series::new(SOURCES_COLUMN.into(), sources).into_column());
    columns.push(Series::new(MERGED_IDS_COLUMN.into(), merged).into_column());

    Ok(DataFrame::new(columns)?)
}
