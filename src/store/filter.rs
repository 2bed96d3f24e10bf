use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgArguments;
use sqlx::FromRow;
use uuid::Uuid;

use super::error::StoreError;

/// A value bound into a parameterized query. Typed at the seam so the store
/// never guesses column types from JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Decimal(Decimal),
    Uuid(Uuid),
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<Uuid> for SqlValue {
    fn from(v: Uuid) -> Self {
        SqlValue::Uuid(v)
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Int(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Int(v as i64)
    }
}

impl From<Decimal> for SqlValue {
    fn from(v: Decimal) -> Self {
        SqlValue::Decimal(v)
    }
}

impl From<Option<String>> for SqlValue {
    fn from(v: Option<String>) -> Self {
        match v {
            Some(s) => SqlValue::Text(s),
            None => SqlValue::Null,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

impl SortDir {
    pub fn to_sql(self) -> &'static str {
        match self {
            SortDir::Asc => "ASC",
            SortDir::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone)]
pub struct OrderSpec {
    pub column: String,
    pub dir: SortDir,
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<SqlValue>,
}

/// Declarative select filter: validated identifiers, equality conditions,
/// order and limit. Compiles to parameterized SQL.
#[derive(Debug, Clone)]
pub struct Filter {
    table: String,
    conditions: Vec<(String, SqlValue)>,
    order: Vec<OrderSpec>,
    limit: Option<i64>,
}

impl Filter {
    pub fn new(table: impl Into<String>) -> Result<Self, StoreError> {
        let table = table.into();
        validate_identifier(&table)?;
        Ok(Self {
            table,
            conditions: vec![],
            order: vec![],
            limit: None,
        })
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl Into<SqlValue>) -> Result<Self, StoreError> {
        let column = column.into();
        validate_identifier(&column)?;
        self.conditions.push((column, value.into()));
        Ok(self)
    }

    /// Order spec in the `"column asc|desc"` form, comma-separated for
    /// multiple keys. Direction defaults to ascending.
    pub fn order_by(mut self, spec: &str) -> Result<Self, StoreError> {
        for part in spec.split(',') {
            let trimmed = part.trim();
            if trimmed.is_empty() {
                continue;
            }
            let mut it = trimmed.split_whitespace();
            let column = it.next().unwrap_or_default().to_string();
            validate_identifier(&column)?;
            let dir = match it.next() {
                Some(d) if d.eq_ignore_ascii_case("desc") => SortDir::Desc,
                _ => SortDir::Asc,
            };
            self.order.push(OrderSpec { column, dir });
        }
        Ok(self)
    }

    pub fn limit(mut self, limit: i64) -> Self {
        let max = crate::config::config().catalog.max_fetch;
        self.limit = Some(limit.clamp(0, max));
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn to_sql(&self) -> SqlResult {
        let mut query = format!("SELECT * FROM \"{}\"", self.table);
        let params = self.push_where(&mut query);
        if !self.order.is_empty() {
            let parts: Vec<String> = self
                .order
                .iter()
                .map(|o| format!("\"{}\" {}", o.column, o.dir.to_sql()))
                .collect();
            query.push_str(&format!(" ORDER BY {}", parts.join(", ")));
        }
        if let Some(limit) = self.limit {
            query.push_str(&format!(" LIMIT {}", limit));
        }
        SqlResult { query, params }
    }

    pub fn to_count_sql(&self) -> SqlResult {
        let mut query = format!("SELECT COUNT(*) FROM \"{}\"", self.table);
        let params = self.push_where(&mut query);
        SqlResult { query, params }
    }

    fn push_where(&self, query: &mut String) -> Vec<SqlValue> {
        if self.conditions.is_empty() {
            return vec![];
        }
        let mut params = Vec::with_capacity(self.conditions.len());
        let mut clauses = Vec::with_capacity(self.conditions.len());
        for (column, value) in &self.conditions {
            if *value == SqlValue::Null {
                clauses.push(format!("\"{}\" IS NULL", column));
            } else {
                clauses.push(format!("\"{}\" = ${}", column, params.len() + 1));
                params.push(value.clone());
            }
        }
        query.push_str(&format!(" WHERE {}", clauses.join(" AND ")));
        params
    }
}

/// Table and column names must be plain snake_case identifiers.
pub fn validate_identifier(name: &str) -> Result<(), StoreError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidIdentifier(name.to_string()))
    }
}

pub fn bind_query<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    v: &'q SqlValue,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match v {
        SqlValue::Null => q.bind(Option::<String>::None),
        SqlValue::Bool(b) => q.bind(*b),
        SqlValue::Int(i) => q.bind(*i),
        SqlValue::Float(f) => q.bind(*f),
        SqlValue::Decimal(d) => q.bind(*d),
        SqlValue::Uuid(u) => q.bind(*u),
        SqlValue::Text(s) => q.bind(s),
        SqlValue::Timestamp(t) => q.bind(*t),
    }
}

pub fn bind_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    v: &'q SqlValue,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, sqlx::postgres::PgRow>,
{
    match v {
        SqlValue::Null => q.bind(Option::<String>::None),
        SqlValue::Bool(b) => q.bind(*b),
        SqlValue::Int(i) => q.bind(*i),
        SqlValue::Float(f) => q.bind(*f),
        SqlValue::Decimal(d) => q.bind(*d),
        SqlValue::Uuid(u) => q.bind(*u),
        SqlValue::Text(s) => q.bind(s),
        SqlValue::Timestamp(t) => q.bind(*t),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_identifiers() {
        assert!(validate_identifier("car_models").is_ok());
        assert!(validate_identifier("_hidden").is_ok());
        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("1table").is_err());
        assert!(validate_identifier("brands; DROP TABLE brands").is_err());
        assert!(validate_identifier("brands\"").is_err());
    }

    #[test]
    fn builds_parameterized_select() {
        let f = Filter::new("car_models")
            .unwrap()
            .eq("brand_id", Uuid::nil())
            .unwrap()
            .order_by("created_at desc")
            .unwrap();
        let sql = f.to_sql();
        assert_eq!(
            sql.query,
            "SELECT * FROM \"car_models\" WHERE \"brand_id\" = $1 ORDER BY \"created_at\" DESC"
        );
        assert_eq!(sql.params, vec![SqlValue::Uuid(Uuid::nil())]);
    }

    #[test]
    fn null_condition_uses_is_null() {
        let f = Filter::new("brands").unwrap().eq("logo_url", SqlValue::Null).unwrap();
        let sql = f.to_sql();
        assert_eq!(sql.query, "SELECT * FROM \"brands\" WHERE \"logo_url\" IS NULL");
        assert!(sql.params.is_empty());
    }

    #[test]
    fn count_sql_keeps_conditions() {
        let f = Filter::new("brands").unwrap().eq("name", "Toyota").unwrap();
        let sql = f.to_count_sql();
        assert_eq!(sql.query, "SELECT COUNT(*) FROM \"brands\" WHERE \"name\" = $1");
        assert_eq!(sql.params.len(), 1);
    }

    #[test]
    fn multi_key_order_spec() {
        let f = Filter::new("car_models").unwrap().order_by("name, year desc").unwrap();
        let sql = f.to_sql();
        assert!(sql.query.ends_with("ORDER BY \"name\" ASC, \"year\" DESC"));
    }
}
