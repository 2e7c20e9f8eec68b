//! Bind values collected while building a query.

use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::QueryAs;

/// A value bound to a `$n` placeholder.
#[derive(Clone, Debug, PartialEq)]
pub enum SqlParam {
    BigInt(i64),
    Text(String),
}

/// Bind params in placeholder order.
pub fn bind_all<'q, O>(
    mut query: QueryAs<'q, Postgres, O, PgArguments>,
    params: &'q [SqlParam],
) -> QueryAs<'q, Postgres, O, PgArguments> {
    for p in params {
        query = match p {
            SqlParam::BigInt(n) => query.bind(*n),
            SqlParam::Text(s) => query.bind(s.as_str()),
        };
    }
    query
}
