//! Orders, always scoped to the calling user. Writes run in one transaction; views are
//! loaded after commit with `total_price` derived from the current items.

use crate::dto::{OrderItemView, OrderView, ProductListView};
use crate::error::AppError;
use crate::pagination::{PageRequest, PageSlice};
use crate::schema::{Order, PriceRange, Table};
use crate::service::crud::CrudService;
use crate::service::validation::ItemInput;
use crate::sql::{ListQuery, OrderTerm};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgConnection, PgPool};
use std::collections::{HashMap, HashSet};

#[derive(FromRow)]
struct OrderItemRow {
    id: i64,
    order_id: i64,
    quantity: i32,
    product_id: i64,
    name_of_product: Option<String>,
    price: Decimal,
    price_range: PriceRange,
}

const ITEMS_SQL: &str = "SELECT oi.\"id\", oi.\"order_id\", oi.\"quantity\", p.\"id\" AS \"product_id\", \
     p.\"name_of_product\", p.\"price\", p.\"price_range\" FROM \"order_items\" oi \
     JOIN \"products\" p ON p.\"id\" = oi.\"product_id\" WHERE oi.\"order_id\" = ANY($1) ORDER BY oi.\"id\"";

const SELECT_OWNED_SQL: &str =
    "SELECT \"id\", \"user_id\", \"created_at\" FROM \"orders\" WHERE \"id\" = $1 AND \"user_id\" = $2";

/// Writers to the same order take its row lock first, so a replacement item set is
/// applied whole and a concurrent delete either wins outright or waits.
const LOCK_OWNED_SQL: &str = "SELECT \"id\", \"user_id\", \"created_at\" FROM \"orders\" \
     WHERE \"id\" = $1 AND \"user_id\" = $2 FOR UPDATE";

pub struct OrderService;

impl OrderService {
    pub async fn list(pool: &PgPool, user_id: i64, request: &PageRequest) -> Result<PageSlice<OrderView>, AppError> {
        let query = ListQuery::new(Order::TABLE, Order::COLUMNS)
            .filter_eq("user_id", user_id)
            .order_by([OrderTerm::asc("created_at")]);
        let mut slice = CrudService::page::<Order>(pool, &query, request).await?;
        let views = Self::views(pool, std::mem::take(&mut slice.items)).await?;
        Ok(PageSlice {
            count: slice.count,
            page: slice.page,
            items: views,
        })
    }

    /// Another user's order is indistinguishable from a missing one.
    pub async fn retrieve(pool: &PgPool, user_id: i64, id: i64) -> Result<Option<OrderView>, AppError> {
        let order: Option<Order> = sqlx::query_as(SELECT_OWNED_SQL)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
        match order {
            Some(order) => Ok(Self::views(pool, vec![order]).await?.pop()),
            None => Ok(None),
        }
    }

    /// Insert the order stamped with `user_id` and its items.
    pub async fn create(pool: &PgPool, user_id: i64, items: &[ItemInput]) -> Result<OrderView, AppError> {
        let mut tx = pool.begin().await?;
        ensure_products_exist(&mut tx, items).await?;
        let order: Order = sqlx::query_as(
            "INSERT INTO \"orders\" (\"user_id\") VALUES ($1) RETURNING \"id\", \"user_id\", \"created_at\"",
        )
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;
        insert_items(&mut tx, order.id, items).await?;
        tx.commit().await?;
        tracing::info!(order_id = order.id, user_id, items = items.len(), "order created");

        Self::views(pool, vec![order])
            .await?
            .pop()
            .ok_or_else(|| AppError::Integrity("created order vanished".into()))
    }

    /// Replace the item set when `items` is given; `user` and `created_at` never change.
    pub async fn update(
        pool: &PgPool,
        user_id: i64,
        id: i64,
        items: Option<&[ItemInput]>,
    ) -> Result<Option<OrderView>, AppError> {
        let mut tx = pool.begin().await?;
        let order: Option<Order> = sqlx::query_as(LOCK_OWNED_SQL)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(order) = order else {
            return Ok(None);
        };
        if let Some(items) = items {
            ensure_products_exist(&mut tx, items).await?;
            sqlx::query("DELETE FROM \"order_items\" WHERE \"order_id\" = $1")
                .bind(order.id)
                .execute(&mut *tx)
                .await?;
            insert_items(&mut tx, order.id, items).await?;
        }
        tx.commit().await?;
        tracing::info!(order_id = order.id, user_id, "order updated");
        Ok(Self::views(pool, vec![order]).await?.pop())
    }

    /// Delete an owned order (items cascade). Returns whether a row was removed.
    pub async fn delete(pool: &PgPool, user_id: i64, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM \"orders\" WHERE \"id\" = $1 AND \"user_id\" = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::info!(order_id = id, user_id, "order deleted");
        }
        Ok(deleted)
    }

    async fn views(pool: &PgPool, orders: Vec<Order>) -> Result<Vec<OrderView>, AppError> {
        if orders.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
        tracing::debug!(sql = ITEMS_SQL, orders = ?ids, "query");
        let rows: Vec<OrderItemRow> = sqlx::query_as(ITEMS_SQL)
            .bind(ids.as_slice())
            .fetch_all(pool)
            .await?;
        let mut by_order: HashMap<i64, Vec<OrderItemView>> = HashMap::new();
        for row in rows {
            by_order.entry(row.order_id).or_default().push(OrderItemView {
                id: row.id,
                product: ProductListView {
                    id: row.product_id,
                    name_of_product: row.name_of_product,
                    price: row.price,
                    price_range: row.price_range,
                },
                quantity: row.quantity,
            });
        }
        Ok(orders
            .into_iter()
            .map(|o| {
                let items = by_order.remove(&o.id).unwrap_or_default();
                OrderView::new(o, items)
            })
            .collect())
    }
}

/// Shared locks keep the checked products alive until the items referencing them are in.
const LOCK_PRODUCTS_SQL: &str = "SELECT \"id\" FROM \"products\" WHERE \"id\" = ANY($1) FOR SHARE";

/// Unknown product ids are a validation failure, reported for the first offending line.
async fn ensure_products_exist(conn: &mut PgConnection, items: &[ItemInput]) -> Result<(), AppError> {
    if items.is_empty() {
        return Ok(());
    }
    let wanted: Vec<i64> = items.iter().map(|i| i.product).collect();
    let found: Vec<(i64,)> = sqlx::query_as(LOCK_PRODUCTS_SQL)
        .bind(wanted.as_slice())
        .fetch_all(&mut *conn)
        .await?;
    let found: HashSet<i64> = found.into_iter().map(|(id,)| id).collect();
    match missing_product(items, &found) {
        Some((index, product)) => Err(AppError::Validation(format!(
            "items[{}].product: Invalid pk \"{}\" - object does not exist.",
            index, product
        ))),
        None => Ok(()),
    }
}

fn missing_product(items: &[ItemInput], found: &HashSet<i64>) -> Option<(usize, i64)> {
    items
        .iter()
        .enumerate()
        .find(|(_, i)| !found.contains(&i.product))
        .map(|(index, i)| (index, i.product))
}

async fn insert_items(conn: &mut PgConnection, order_id: i64, items: &[ItemInput]) -> Result<(), AppError> {
    for item in items {
        sqlx::query("INSERT INTO \"order_items\" (\"order_id\", \"product_id\", \"quantity\") VALUES ($1, $2, $3)")
            .bind(order_id)
            .bind(item.product)
            .bind(item.quantity)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_missing_product_is_reported() {
        let items = vec![
            ItemInput { product: 3, quantity: 2 },
            ItemInput { product: 8, quantity: 1 },
            ItemInput { product: 9, quantity: 1 },
        ];
        let found: HashSet<i64> = [3, 9].into_iter().collect();
        assert_eq!(missing_product(&items, &found), Some((1, 8)));
        let found: HashSet<i64> = [3, 8, 9].into_iter().collect();
        assert_eq!(missing_product(&items, &found), None);
    }
}
