//! Apply the shop schema to the database: enum types, tables, foreign keys and indexes.
//! Statements are ordered by dependency and are safe to re-run.

use crate::error::AppError;
use crate::schema::{ProductKind, ALL_CHOICES};
use sqlx::PgPool;

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

fn literal(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// `CREATE TYPE ... AS ENUM`, skipped when the type already exists.
pub fn create_enum_sql(name: &str, values: &[&str]) -> String {
    let values: Vec<String> = values.iter().map(|v| literal(v)).collect();
    format!(
        "DO $$ BEGIN CREATE TYPE {} AS ENUM ({}); EXCEPTION WHEN duplicate_object THEN NULL; END $$",
        quote(name),
        values.join(", ")
    )
}

/// Columns shared by every variant extension table. The pinned `product_type` and the
/// composite key onto `products (id, product_type)` keep an extension from attaching to a
/// product tagged with a different kind.
fn variant_table_sql(table: &str, kind: ProductKind, body: &[&str]) -> String {
    let tag = literal(kind.as_str());
    let mut cols = vec![
        "\"id\" BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY".to_string(),
        "\"product_id\" BIGINT NOT NULL UNIQUE".to_string(),
        format!(
            "\"product_type\" product_kind NOT NULL DEFAULT {tag} CHECK (\"product_type\" = {tag})"
        ),
    ];
    cols.extend(body.iter().map(|c| c.to_string()));
    cols.push(
        "FOREIGN KEY (\"product_id\", \"product_type\") REFERENCES \"products\" (\"id\", \"product_type\") ON DELETE CASCADE"
            .to_string(),
    );
    format!("CREATE TABLE IF NOT EXISTS {} (\n  {}\n)", quote(table), cols.join(",\n  "))
}

/// Ordered DDL for all shop tables.
pub fn table_statements() -> Vec<String> {
    vec![
        "CREATE TABLE IF NOT EXISTS \"countries\" (
  \"id\" BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
  \"name\" VARCHAR(100) NOT NULL
)"
        .to_string(),
        "CREATE TABLE IF NOT EXISTS \"producers\" (
  \"id\" BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
  \"country_id\" BIGINT NOT NULL REFERENCES \"countries\" (\"id\") ON DELETE CASCADE,
  \"name_of_region\" VARCHAR(200)
)"
        .to_string(),
        "CREATE TABLE IF NOT EXISTS \"moods\" (
  \"id\" BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
  \"name\" mood_type NOT NULL DEFAULT 'festive'
)"
        .to_string(),
        "CREATE TABLE IF NOT EXISTS \"products\" (
  \"id\" BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
  \"name_of_product\" VARCHAR(200),
  \"product_type\" product_kind NOT NULL DEFAULT 'wine',
  \"description\" TEXT NOT NULL DEFAULT '',
  \"price\" NUMERIC(10, 2) NOT NULL DEFAULT 0,
  \"stock_quantity\" INTEGER,
  \"price_range\" price_range NOT NULL DEFAULT 'budget',
  \"image\" VARCHAR(255),
  UNIQUE (\"id\", \"product_type\")
)"
        .to_string(),
        variant_table_sql(
            "wines",
            ProductKind::Wine,
            &[
                "\"wine_type\" wine_type NOT NULL DEFAULT 'dessert'",
                "\"color\" wine_color NOT NULL DEFAULT 'red'",
                "\"country_id\" BIGINT NOT NULL REFERENCES \"countries\" (\"id\") ON DELETE CASCADE",
                "\"producer_id\" BIGINT NOT NULL REFERENCES \"producers\" (\"id\") ON DELETE CASCADE",
                "\"vintage_year\" INTEGER",
                "\"alcohol\" NUMERIC(4, 1)",
            ],
        ),
        "CREATE TABLE IF NOT EXISTS \"wine_moods\" (
  \"wine_id\" BIGINT NOT NULL REFERENCES \"wines\" (\"id\") ON DELETE CASCADE,
  \"mood_id\" BIGINT NOT NULL REFERENCES \"moods\" (\"id\") ON DELETE CASCADE,
  PRIMARY KEY (\"wine_id\", \"mood_id\")
)"
        .to_string(),
        variant_table_sql(
            "glasses",
            ProductKind::Glass,
            &[
                "\"capacity\" INTEGER",
                "\"country_id\" BIGINT NOT NULL REFERENCES \"countries\" (\"id\") ON DELETE CASCADE",
                "\"height\" NUMERIC(10, 2) NOT NULL DEFAULT 0",
                "\"diameter\" NUMERIC(10, 2) NOT NULL DEFAULT 0",
                "\"material\" glass_material NOT NULL DEFAULT 'glass'",
            ],
        ),
        variant_table_sql(
            "corkscrews",
            ProductKind::Corkscrew,
            &[
                "\"dimensions\" VARCHAR(200)",
                "\"material\" corkscrew_material NOT NULL DEFAULT 'stainless steel'",
            ],
        ),
        "CREATE TABLE IF NOT EXISTS \"orders\" (
  \"id\" BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
  \"user_id\" BIGINT NOT NULL,
  \"created_at\" TIMESTAMPTZ NOT NULL DEFAULT NOW()
)"
        .to_string(),
        "CREATE TABLE IF NOT EXISTS \"order_items\" (
  \"id\" BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
  \"order_id\" BIGINT NOT NULL REFERENCES \"orders\" (\"id\") ON DELETE CASCADE,
  \"product_id\" BIGINT NOT NULL REFERENCES \"products\" (\"id\") ON DELETE CASCADE,
  \"quantity\" INTEGER NOT NULL DEFAULT 1 CHECK (\"quantity\" > 0)
)"
        .to_string(),
    ]
}

const INDEXES: &[(&str, &str, &str)] = &[
    ("orders_user_created_idx", "orders", "\"user_id\", \"created_at\""),
    ("order_items_order_idx", "order_items", "\"order_id\""),
    ("wines_vintage_idx", "wines", "\"vintage_year\""),
];

/// Apply the schema in one transaction. Idempotent: enum types are guarded and tables
/// and indexes use IF NOT EXISTS.
pub async fn apply_migrations(pool: &PgPool) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    for (name, values) in ALL_CHOICES {
        sqlx::query(&create_enum_sql(name, values)).execute(&mut *tx).await?;
    }

    for sql in table_statements() {
        tracing::debug!(sql = %sql, "migrate");
        sqlx::query(&sql).execute(&mut *tx).await?;
    }

    for (name, table, columns) in INDEXES {
        let sql = format!(
            "CREATE INDEX IF NOT EXISTS {} ON {} ({})",
            quote(name),
            quote(table),
            columns
        );
        sqlx::query(&sql).execute(&mut *tx).await?;
    }

    tx.commit().await?;
    tracing::info!("shop schema applied");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_sql_escapes_values() {
        let sql = create_enum_sql("corkscrew_material", &["wood", "stainless steel", "o'neil"]);
        assert!(sql.contains("CREATE TYPE \"corkscrew_material\" AS ENUM ('wood', 'stainless steel', 'o''neil')"));
        assert!(sql.contains("duplicate_object"));
    }

    #[test]
    fn variant_tables_pin_their_kind() {
        let statements = table_statements();
        let glasses = statements
            .iter()
            .find(|s| s.contains("\"glasses\""))
            .expect("glasses table");
        assert!(glasses.contains("CHECK (\"product_type\" = 'glass')"));
        assert!(glasses.contains("REFERENCES \"products\" (\"id\", \"product_type\") ON DELETE CASCADE"));
    }

    #[test]
    fn tables_are_created_before_their_dependents() {
        let statements = table_statements();
        let pos = |table: &str| {
            statements
                .iter()
                .position(|s| s.starts_with(&format!("CREATE TABLE IF NOT EXISTS \"{}\"", table)))
                .unwrap()
        };
        assert!(pos("countries") < pos("producers"));
        assert!(pos("products") < pos("wines"));
        assert!(pos("wines") < pos("wine_moods"));
        assert!(pos("orders") < pos("order_items"));
    }
}
