//! Database gateway: parameterized SQL in, normalized outcomes out.
//!
//! The [`Store`] trait is the single seam between the application and
//! PostgreSQL. Statements always travel with positional `$n` placeholders and
//! a separate parameter list; values are never spliced into statement text.
//! Read failures normalize to [`QueryError`], write failures to [`WriteError`]
//! carrying the raw message (and SQLSTATE when the driver reports one)
//! uninterpreted - classification happens in [`crate::db::classify`], not
//! here.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sqlx::postgres::PgArguments;
use sqlx::query::Query;
use sqlx::{Column, PgPool, Postgres, Row as _, TypeInfo};
use thiserror::Error;

/// A positional SQL parameter. The inner `Option` models SQL NULL so that
/// nulls stay typed on the wire (Postgres rejects parameters it cannot
/// resolve a type for).
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Bool(Option<bool>),
    Int(Option<i64>),
    Float(Option<f64>),
    Text(Option<String>),
    Date(Option<NaiveDate>),
    Timestamp(Option<DateTime<Utc>>),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        match self {
            Self::Bool(v) => v.is_none(),
            Self::Int(v) => v.is_none(),
            Self::Float(v) => v.is_none(),
            Self::Text(v) => v.is_none(),
            Self::Date(v) => v.is_none(),
            Self::Timestamp(v) => v.is_none(),
        }
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        Self::Int(Some(v))
    }
}

impl From<Option<i64>> for SqlValue {
    fn from(v: Option<i64>) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        Self::Float(Some(v))
    }
}

impl From<Option<f64>> for SqlValue {
    fn from(v: Option<f64>) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        Self::Text(Some(v.to_owned()))
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        Self::Text(Some(v))
    }
}

impl From<Option<String>> for SqlValue {
    fn from(v: Option<String>) -> Self {
        Self::Text(v)
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(v: NaiveDate) -> Self {
        Self::Date(Some(v))
    }
}

impl From<Option<NaiveDate>> for SqlValue {
    fn from(v: Option<NaiveDate>) -> Self {
        Self::Date(v)
    }
}

/// A read failed (or a result row could not be decoded).
#[derive(Debug, Clone, Error)]
#[error("query failed: {message}")]
pub struct QueryError {
    pub message: String,
}

impl QueryError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    fn from_sqlx(err: sqlx::Error) -> Self {
        match err.as_database_error() {
            Some(db) => Self::new(db.message()),
            None => Self::new(err.to_string()),
        }
    }
}

/// A write failed. Carries the raw store-reported message and the SQLSTATE
/// code when one was reported; no interpretation happens at this layer.
#[derive(Debug, Clone, Error)]
#[error("write failed: {message}")]
pub struct WriteError {
    pub message: String,
    pub code: Option<String>,
}

impl WriteError {
    pub fn new(message: impl Into<String>, code: Option<String>) -> Self {
        Self {
            message: message.into(),
            code,
        }
    }

    fn from_sqlx(err: sqlx::Error) -> Self {
        match err.as_database_error() {
            Some(db) => Self::new(db.message(), db.code().map(|c| c.to_string())),
            None => Self::new(err.to_string(), None),
        }
    }
}

/// One result row as an ordered column-name -> value mapping.
#[derive(Debug, Clone, Default)]
pub struct Row {
    columns: Vec<(String, SqlValue)>,
}

impl Row {
    pub fn from_pairs(columns: Vec<(String, SqlValue)>) -> Self {
        Self { columns }
    }

    pub fn get(&self, name: &str) -> Option<&SqlValue> {
        self.columns
            .iter()
            .find(|(col, _)| col == name)
            .map(|(_, value)| value)
    }

    fn required(&self, name: &str) -> Result<&SqlValue, QueryError> {
        self.get(name)
            .ok_or_else(|| QueryError::new(format!("missing column '{name}' in result row")))
    }

    fn type_mismatch(name: &str, expected: &str, got: &SqlValue) -> QueryError {
        QueryError::new(format!("column '{name}': expected {expected}, got {got:?}"))
    }

    pub fn opt_int(&self, name: &str) -> Result<Option<i64>, QueryError> {
        match self.required(name)? {
            SqlValue::Int(v) => Ok(*v),
            other => Err(Self::type_mismatch(name, "integer", other)),
        }
    }

    pub fn int(&self, name: &str) -> Result<i64, QueryError> {
        self.opt_int(name)?
            .ok_or_else(|| QueryError::new(format!("column '{name}' is unexpectedly NULL")))
    }

    pub fn opt_float(&self, name: &str) -> Result<Option<f64>, QueryError> {
        match self.required(name)? {
            SqlValue::Float(v) => Ok(*v),
            SqlValue::Int(v) => Ok(v.map(|n| n as f64)),
            other => Err(Self::type_mismatch(name, "float", other)),
        }
    }

    pub fn opt_text(&self, name: &str) -> Result<Option<String>, QueryError> {
        match self.required(name)? {
            SqlValue::Text(v) => Ok(v.clone()),
            other => Err(Self::type_mismatch(name, "text", other)),
        }
    }

    pub fn text(&self, name: &str) -> Result<String, QueryError> {
        self.opt_text(name)?
            .ok_or_else(|| QueryError::new(format!("column '{name}' is unexpectedly NULL")))
    }

    pub fn opt_date(&self, name: &str) -> Result<Option<NaiveDate>, QueryError> {
        match self.required(name)? {
            SqlValue::Date(v) => Ok(*v),
            other => Err(Self::type_mismatch(name, "date", other)),
        }
    }

    pub fn timestamp(&self, name: &str) -> Result<DateTime<Utc>, QueryError> {
        match self.required(name)? {
            SqlValue::Timestamp(Some(v)) => Ok(*v),
            SqlValue::Timestamp(None) => {
                Err(QueryError::new(format!("column '{name}' is unexpectedly NULL")))
            }
            other => Err(Self::type_mismatch(name, "timestamp", other)),
        }
    }
}

/// The gateway contract. Writes are pass-through: visibility of their effects
/// is decided entirely by the store's own trigger and transaction semantics,
/// and nothing here retries or rolls back.
#[async_trait]
pub trait Store: Send + Sync {
    /// Execute a read and return all matching rows.
    async fn query(&self, statement: &str, params: &[SqlValue]) -> Result<Vec<Row>, QueryError>;

    /// Execute a write (insert/update/delete/routine call) with no returned
    /// rows.
    async fn execute(&self, statement: &str, params: &[SqlValue]) -> Result<(), WriteError>;
}

/// Production [`Store`] over a sqlx connection pool. Each call checks a
/// connection out of the pool for exactly the duration of the statement.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn bind_params<'q>(
    statement: &'q str,
    params: &[SqlValue],
) -> Query<'q, Postgres, PgArguments> {
    let mut query = sqlx::query(statement);
    for param in params {
        query = match param {
            SqlValue::Bool(v) => query.bind(*v),
            SqlValue::Int(v) => query.bind(*v),
            SqlValue::Float(v) => query.bind(*v),
            SqlValue::Text(v) => query.bind(v.clone()),
            SqlValue::Date(v) => query.bind(*v),
            SqlValue::Timestamp(v) => query.bind(*v),
        };
    }
    query
}

fn decode_row(row: &sqlx::postgres::PgRow) -> Result<Row, QueryError> {
    let mut columns = Vec::with_capacity(row.columns().len());
    for (idx, column) in row.columns().iter().enumerate() {
        let name = column.name().to_owned();
        let decode_err =
            |e: sqlx::Error| QueryError::new(format!("column '{name}': {e}"));
        let value = match column.type_info().name() {
            "BOOL" => SqlValue::Bool(row.try_get(idx).map_err(decode_err)?),
            "INT2" => SqlValue::Int(
                row.try_get::<Option<i16>, _>(idx)
                    .map_err(decode_err)?
                    .map(i64::from),
            ),
            "INT4" => SqlValue::Int(
                row.try_get::<Option<i32>, _>(idx)
                    .map_err(decode_err)?
                    .map(i64::from),
            ),
            "INT8" => SqlValue::Int(row.try_get(idx).map_err(decode_err)?),
            "FLOAT4" => SqlValue::Float(
                row.try_get::<Option<f32>, _>(idx)
                    .map_err(decode_err)?
                    .map(f64::from),
            ),
            "FLOAT8" => SqlValue::Float(row.try_get(idx).map_err(decode_err)?),
            "TEXT" | "VARCHAR" | "BPCHAR" | "CHAR" | "NAME" => {
                SqlValue::Text(row.try_get(idx).map_err(decode_err)?)
            }
            "DATE" => SqlValue::Date(row.try_get(idx).map_err(decode_err)?),
            "TIMESTAMPTZ" => SqlValue::Timestamp(row.try_get(idx).map_err(decode_err)?),
            "TIMESTAMP" => SqlValue::Timestamp(
                row.try_get::<Option<NaiveDateTime>, _>(idx)
                    .map_err(decode_err)?
                    .map(|naive| naive.and_utc()),
            ),
            other => {
                return Err(QueryError::new(format!(
                    "unsupported column type {other} for column '{name}'"
                )))
            }
        };
        columns.push((name, value));
    }
    Ok(Row { columns })
}

#[async_trait]
impl Store for PgStore {
    async fn query(&self, statement: &str, params: &[SqlValue]) -> Result<Vec<Row>, QueryError> {
        let rows = bind_params(statement, params)
            .fetch_all(&self.pool)
            .await
            .map_err(QueryError::from_sqlx)?;

        rows.iter().map(decode_row).collect()
    }

    async fn execute(&self, statement: &str, params: &[SqlValue]) -> Result<(), WriteError> {
        bind_params(statement, params)
            .execute(&self.pool)
            .await
            .map_err(WriteError::from_sqlx)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_lookup_by_name() {
        let row = Row::from_pairs(vec![
            ("chno".into(), SqlValue::Int(Some(3))),
            ("chnom".into(), SqlValue::Text(Some("Durand".into()))),
            ("supno".into(), SqlValue::Int(None)),
        ]);

        assert_eq!(row.int("chno").unwrap(), 3);
        assert_eq!(row.text("chnom").unwrap(), "Durand");
        assert_eq!(row.opt_int("supno").unwrap(), None);
    }

    #[test]
    fn missing_column_is_an_error() {
        let row = Row::from_pairs(vec![("chno".into(), SqlValue::Int(Some(1)))]);
        let err = row.text("chnom").unwrap_err();
        assert!(err.message.contains("chnom"));
    }

    #[test]
    fn null_in_non_null_getter_is_an_error() {
        let row = Row::from_pairs(vec![("chnom".into(), SqlValue::Text(None))]);
        assert!(row.text("chnom").is_err());
        assert_eq!(row.opt_text("chnom").unwrap(), None);
    }

    #[test]
    fn null_params_stay_typed() {
        assert!(SqlValue::Int(None).is_null());
        assert!(!SqlValue::from(42i64).is_null());
        assert_eq!(SqlValue::from(None::<i64>), SqlValue::Int(None));
    }
}
