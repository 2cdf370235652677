use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::error::ApiError;

/// ===============================
/// SQL bindable value enum
/// ===============================
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    I64(i64),
    Date(NaiveDate),
}

/// ===============================
/// SQL update container
/// ===============================
#[derive(Debug)]
pub struct SqlUpdate {
    pub sql: String,
    pub values: Vec<SqlValue>,
}

/// Collects `column = value` pairs for a partial update, skipping `None`s.
///
/// Column names are always `&'static str` chosen by the caller, never taken
/// from the request payload.
#[derive(Debug, Default)]
pub struct Assignments(Vec<(&'static str, SqlValue)>);

impl Assignments {
    pub fn text(mut self, column: &'static str, value: Option<&String>) -> Self {
        if let Some(v) = value {
            self.0.push((column, SqlValue::Text(v.trim().to_string())));
        }
        self
    }

    pub fn int(mut self, column: &'static str, value: Option<i64>) -> Self {
        if let Some(v) = value {
            self.0.push((column, SqlValue::I64(v)));
        }
        self
    }

    pub fn date(mut self, column: &'static str, value: Option<NaiveDate>) -> Self {
        if let Some(v) = value {
            self.0.push((column, SqlValue::Date(v)));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// ===============================
/// Build dynamic UPDATE SQL
/// ===============================
pub fn build_update_sql(
    table: &str,
    assignments: Assignments,
    id_column: &str,
    id_value: i64,
) -> Result<SqlUpdate, ApiError> {
    if assignments.is_empty() {
        return Err(ApiError::invalid_input("No fields provided for update"));
    }

    let set_clause = assignments
        .0
        .iter()
        .map(|(column, _)| format!("{column} = ?"))
        .collect::<Vec<_>>()
        .join(", ");

    let sql = format!("UPDATE {table} SET {set_clause} WHERE {id_column} = ?");

    let mut values: Vec<SqlValue> = assignments.0.into_iter().map(|(_, v)| v).collect();
    values.push(SqlValue::I64(id_value));

    Ok(SqlUpdate { sql, values })
}

/// ===============================
/// Execute the update
/// ===============================
pub async fn execute_update(pool: &SqlitePool, update: SqlUpdate) -> Result<u64, sqlx::Error> {
    let mut query = sqlx::query(&update.sql);

    for value in update.values {
        query = match value {
            SqlValue::Text(v) => query.bind(v),
            SqlValue::I64(v) => query.bind(v),
            SqlValue::Date(v) => query.bind(v),
        };
    }

    let result = query.execute(pool).await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_absent_fields() {
        let name = "Jane".to_string();
        let assignments = Assignments::default()
            .text("name", Some(&name))
            .int("salary", None)
            .date("join_date", NaiveDate::from_ymd_opt(2024, 1, 1));

        let update = build_update_sql("users", assignments, "id", 7).unwrap();
        assert_eq!(update.sql, "UPDATE users SET name = ?, join_date = ? WHERE id = ?");
        assert_eq!(update.values.len(), 3);
        assert_eq!(update.values[2], SqlValue::I64(7));
    }

    #[test]
    fn empty_update_is_rejected() {
        let err = build_update_sql("users", Assignments::default(), "id", 1).unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }
}
