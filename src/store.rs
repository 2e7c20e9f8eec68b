//! Database bootstrap: create the target database when missing, then open the pool.

use crate::config::Settings;
use crate::error::{AppError, ConfigError};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;

/// Connect to the `postgres` maintenance database on the same server and create the
/// database named in `database_url` if it does not exist yet.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = PgConnectOptions::from_str(&admin_url).map_err(|e| ConfigError::InvalidSetting {
        name: "DATABASE_URL",
        reason: e.to_string(),
    })?;
    let mut conn = opts.connect().await?;
    let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists {
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
        tracing::info!(database = %db_name, "database created");
    }
    Ok(())
}

pub async fn connect(settings: &Settings) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .connect(&settings.database_url)
        .await?;
    Ok(pool)
}

/// Split a connection URL into the maintenance URL (same server, `postgres` database,
/// same query string) and the target database name.
fn parse_db_name_from_url(url: &str) -> Result<(String, String), ConfigError> {
    let (without_query, query) = match url.split_once('?') {
        Some((u, q)) => (u, Some(q)),
        None => (url, None),
    };
    let scheme_end = without_query.find("://").map(|i| i + 3).unwrap_or(0);
    let path_start = without_query[scheme_end..]
        .find('/')
        .map(|i| scheme_end + i + 1)
        .ok_or_else(|| ConfigError::InvalidSetting {
            name: "DATABASE_URL",
            reason: "no database path".into(),
        })?;
    let db_name = without_query[path_start..].trim().to_string();
    let mut admin_url = format!("{}postgres", &without_query[..path_start]);
    if let Some(q) = query {
        admin_url.push('?');
        admin_url.push_str(q);
    }
    Ok((admin_url, db_name))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_database_name() {
        let (admin, db) = parse_db_name_from_url("postgres://u:p@localhost:5432/wine_shop?sslmode=disable").unwrap();
        assert_eq!(admin, "postgres://u:p@localhost:5432/postgres?sslmode=disable");
        assert_eq!(db, "wine_shop");
    }

    #[test]
    fn url_without_path_is_rejected() {
        assert!(parse_db_name_from_url("postgres://localhost").is_err());
        let (_, db) = parse_db_name_from_url("postgres://localhost/").unwrap();
        assert!(db.is_empty());
    }

    #[test]
    fn quotes_identifiers() {
        assert_eq!(quote_ident("wine\"shop"), "\"wine\"\"shop\"");
    }
}
