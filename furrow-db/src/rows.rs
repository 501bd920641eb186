//! Dict-like row materialization.
//!
//! The default row shape for callers that don't want typed rows: a JSON
//! object keyed by column name. Typed alternatives (`sqlx::FromRow`,
//! tuples) stay available at the query site; the strategy is chosen per
//! call, not baked into the pool.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};
use sqlx::postgres::PgRow;
use sqlx::{Column, Row, TypeInfo};
use uuid::Uuid;

use crate::error::{DbError, Result};

/// Materialize one row as a JSON object keyed by column name.
///
/// NULLs become `Value::Null`. A column of a type this module doesn't
/// cover is an [`DbError::UnsupportedColumn`] naming column and type.
pub fn document(row: &PgRow) -> Result<Map<String, Value>> {
    let mut doc = Map::with_capacity(row.len());
    for column in row.columns() {
        let value = column_value(row, column.ordinal(), column.name(), column.type_info().name())?;
        doc.insert(column.name().to_string(), value);
    }
    Ok(doc)
}

/// Materialize a batch of rows.
pub fn documents(rows: &[PgRow]) -> Result<Vec<Map<String, Value>>> {
    rows.iter().map(document).collect()
}

fn column_value(row: &PgRow, ordinal: usize, column: &str, type_name: &str) -> Result<Value> {
    let value = match type_name {
        "BOOL" => row.try_get::<Option<bool>, _>(ordinal)?.map(Value::Bool),
        "INT2" => row.try_get::<Option<i16>, _>(ordinal)?.map(Value::from),
        "INT4" => row.try_get::<Option<i32>, _>(ordinal)?.map(Value::from),
        "INT8" => row.try_get::<Option<i64>, _>(ordinal)?.map(Value::from),
        // non-finite floats have no JSON form and come through as null
        "FLOAT4" => row
            .try_get::<Option<f32>, _>(ordinal)?
            .map(|v| Value::from(f64::from(v))),
        "FLOAT8" => row.try_get::<Option<f64>, _>(ordinal)?.map(Value::from),
        "TEXT" | "VARCHAR" | "CHAR" | "NAME" => row
            .try_get::<Option<String>, _>(ordinal)?
            .map(Value::String),
        "UUID" => row
            .try_get::<Option<Uuid>, _>(ordinal)?
            .map(|v| Value::String(v.to_string())),
        "JSON" | "JSONB" => row.try_get::<Option<Value>, _>(ordinal)?,
        "TIMESTAMPTZ" => row
            .try_get::<Option<DateTime<Utc>>, _>(ordinal)?
            .map(|v| Value::String(v.to_rfc3339())),
        "TIMESTAMP" => row
            .try_get::<Option<NaiveDateTime>, _>(ordinal)?
            .map(|v| Value::String(v.to_string())),
        "DATE" => row
            .try_get::<Option<NaiveDate>, _>(ordinal)?
            .map(|v| Value::String(v.to_string())),
        other => return Err(DbError::unsupported_column(column, other)),
    };
    Ok(value.unwrap_or(Value::Null))
}
