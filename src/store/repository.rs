use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Row};
use uuid::Uuid;

use crate::models::CarListing;

use super::error::StoreError;
use super::filter::{bind_query, bind_query_as, validate_identifier, Filter, SqlValue};

/// A named-column record for insert/update writes. Column names are
/// identifier-validated before SQL is built; values are always bound.
pub type WriteRecord = Vec<(String, SqlValue)>;

/// Generic accessor for one table: declarative select/insert/update/delete.
pub struct Repository<T> {
    table: String,
    pool: PgPool,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Repository<T>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    pub fn new(table: impl Into<String>, pool: PgPool) -> Result<Self, StoreError> {
        let table = table.into();
        validate_identifier(&table)?;
        Ok(Self {
            table,
            pool,
            _phantom: std::marker::PhantomData,
        })
    }

    pub fn filter(&self) -> Result<Filter, StoreError> {
        Filter::new(&self.table)
    }

    pub async fn select_any(&self, filter: Filter) -> Result<Vec<T>, StoreError> {
        let sql = filter.to_sql();
        let mut q = sqlx::query_as::<_, T>(&sql.query);
        for p in &sql.params {
            q = bind_query_as(q, p);
        }
        Ok(q.fetch_all(&self.pool).await?)
    }

    pub async fn select_one(&self, filter: Filter) -> Result<Option<T>, StoreError> {
        let sql = filter.to_sql();
        let mut q = sqlx::query_as::<_, T>(&sql.query);
        for p in &sql.params {
            q = bind_query_as(q, p);
        }
        Ok(q.fetch_optional(&self.pool).await?)
    }

    pub async fn select_404(&self, filter: Filter) -> Result<T, StoreError> {
        self.select_one(filter).await?.ok_or(StoreError::NotFound)
    }

    pub async fn count(&self, filter: Filter) -> Result<i64, StoreError> {
        let sql = filter.to_count_sql();
        let mut q = sqlx::query(&sql.query);
        for p in &sql.params {
            q = bind_query(q, p);
        }
        let row = q.fetch_one(&self.pool).await?;
        Ok(row.try_get::<i64, _>(0)?)
    }

    pub async fn insert(&self, record: WriteRecord) -> Result<T, StoreError> {
        let (columns, values) = split_record(record)?;
        let placeholders: Vec<String> = (1..=values.len()).map(|i| format!("${}", i)).collect();
        let query = format!(
            "INSERT INTO \"{}\" ({}) VALUES ({}) RETURNING *",
            self.table,
            columns.join(", "),
            placeholders.join(", ")
        );
        let mut q = sqlx::query_as::<_, T>(&query);
        for p in &values {
            q = bind_query_as(q, p);
        }
        Ok(q.fetch_one(&self.pool).await?)
    }

    pub async fn update(&self, id: Uuid, patch: WriteRecord) -> Result<T, StoreError> {
        let (columns, values) = split_record(patch)?;
        let assignments: Vec<String> = columns
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{} = ${}", c, i + 1))
            .collect();
        let query = format!(
            "UPDATE \"{}\" SET {} WHERE id = ${} RETURNING *",
            self.table,
            assignments.join(", "),
            values.len() + 1
        );
        let mut q = sqlx::query_as::<_, T>(&query);
        for p in &values {
            q = bind_query_as(q, p);
        }
        q = q.bind(id);
        match q.fetch_optional(&self.pool).await? {
            Some(row) => Ok(row),
            None => Err(StoreError::NotFound),
        }
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let query = format!("DELETE FROM \"{}\" WHERE id = $1", self.table);
        let result = sqlx::query(&query).bind(id).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

fn split_record(record: WriteRecord) -> Result<(Vec<String>, Vec<SqlValue>), StoreError> {
    if record.is_empty() {
        return Err(StoreError::InvalidIdentifier("empty record".to_string()));
    }
    let mut columns = Vec::with_capacity(record.len());
    let mut values = Vec::with_capacity(record.len());
    for (column, value) in record {
        validate_identifier(&column)?;
        columns.push(format!("\"{}\"", column));
        values.push(value);
    }
    Ok((columns, values))
}

/// Ordering for the joined listing read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingOrder {
    /// `created_at` descending; the catalog's "newest" baseline.
    CreatedDesc,
    NameAsc,
}

impl ListingOrder {
    fn to_sql(self) -> &'static str {
        match self {
            ListingOrder::CreatedDesc => "cm.created_at DESC",
            ListingOrder::NameAsc => "cm.name ASC",
        }
    }
}

/// Car-model accessor with the one joined read surface: listings carry the
/// brand name for display and search.
pub struct CarModelRepo {
    pool: PgPool,
}

impl CarModelRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn select_listings(
        &self,
        order: ListingOrder,
        limit: Option<i64>,
    ) -> Result<Vec<CarListing>, StoreError> {
        let mut query = format!(
            "SELECT cm.*, b.name AS brand_name \
             FROM car_models cm LEFT JOIN brands b ON b.id = cm.brand_id \
             ORDER BY {}",
            order.to_sql()
        );
        if let Some(limit) = limit {
            query.push_str(&format!(" LIMIT {}", limit.max(0)));
        }
        Ok(sqlx::query_as::<_, CarListing>(&query)
            .fetch_all(&self.pool)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_record_quotes_and_validates() {
        let record: WriteRecord = vec![
            ("name".to_string(), SqlValue::from("Acme")),
            ("logo_url".to_string(), SqlValue::Null),
        ];
        let (columns, values) = split_record(record).unwrap();
        assert_eq!(columns, vec!["\"name\"", "\"logo_url\""]);
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn split_record_rejects_injection() {
        let record: WriteRecord = vec![("name\" = 'x', admin".to_string(), SqlValue::from("v"))];
        assert!(split_record(record).is_err());
    }

    #[test]
    fn split_record_rejects_empty() {
        assert!(split_record(vec![]).is_err());
    }
}
