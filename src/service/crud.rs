//! Generic read helpers over `Table` rows: paginated listing, fetch by id, batch loading.

use crate::error::AppError;
use crate::pagination::{PageRequest, PageSlice};
use crate::schema::Table;
use crate::sql::{bind_all, select_by_column_in, select_by_id, ListQuery};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool};
use std::collections::HashMap;

pub struct CrudService;

impl CrudService {
    /// Count, resolve the requested page against the count, then fetch that page.
    pub async fn page<T>(
        pool: &PgPool,
        query: &ListQuery<'_>,
        request: &PageRequest,
    ) -> Result<PageSlice<T>, AppError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let count_q = query.count();
        tracing::debug!(sql = %count_q.sql, params = ?count_q.params, "query");
        let (count,): (i64,) = bind_all(sqlx::query_as(&count_q.sql), &count_q.params)
            .fetch_one(pool)
            .await?;
        let count = count.max(0) as u64;
        let page = request.resolve(count)?;

        let q = query.page(page.size, page.offset());
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let items: Vec<T> = bind_all(sqlx::query_as(&q.sql), &q.params)
            .fetch_all(pool)
            .await?;
        Ok(PageSlice { count, page, items })
    }

    /// Fetch one row by primary key.
    pub async fn read<T>(pool: &PgPool, id: i64) -> Result<Option<T>, AppError>
    where
        T: Table + for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let sql = select_by_id(T::TABLE, T::COLUMNS);
        tracing::debug!(sql = %sql, id, "query");
        let row = sqlx::query_as::<_, T>(&sql).bind(id).fetch_optional(pool).await?;
        Ok(row)
    }

    /// Fetch rows where `column` is one of `values`.
    pub async fn fetch_where_column_in<T>(
        pool: &PgPool,
        column: &str,
        values: &[i64],
    ) -> Result<Vec<T>, AppError>
    where
        T: Table + for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        if values.is_empty() {
            return Ok(Vec::new());
        }
        let sql = select_by_column_in(T::TABLE, T::COLUMNS, column);
        tracing::debug!(sql = %sql, values = ?values, "query");
        let rows = sqlx::query_as::<_, T>(&sql).bind(values).fetch_all(pool).await?;
        Ok(rows)
    }

    /// Batch-load rows by primary key, keyed by id. Duplicate ids are fetched once.
    pub async fn fetch_map<T>(pool: &PgPool, ids: impl IntoIterator<Item = i64>) -> Result<HashMap<i64, T>, AppError>
    where
        T: Table + for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let mut ids: Vec<i64> = ids.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();
        let rows = Self::fetch_where_column_in::<T>(pool, "id", &ids).await?;
        Ok(rows.into_iter().map(|r| (r.id(), r)).collect())
    }
}

/// Take a related row out of a batch-loaded map. Foreign keys guarantee presence, so a
/// miss means the rows changed underneath the request.
pub fn related<T: Clone>(map: &HashMap<i64, T>, id: i64, kind: &str) -> Result<T, AppError> {
    map.get(&id)
        .cloned()
        .ok_or_else(|| AppError::Integrity(format!("{} {} referenced but missing", kind, id)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn related_reports_missing_rows() {
        let mut map = HashMap::new();
        map.insert(1_i64, "France".to_string());
        assert_eq!(related(&map, 1, "country").unwrap(), "France");
        let err = related(&map, 2, "country").unwrap_err();
        assert!(matches!(err, AppError::Integrity(ref m) if m == "country 2 referenced but missing"));
    }
}
