//! Catalog writes used by the back office and the fixture seeder. Callers pass a
//! connection inside their own transaction so a product and its extension row land
//! together or not at all.

use crate::error::AppError;
use crate::schema::*;
use sqlx::PgConnection;

/// A freshly inserted product plus its back-office label.
#[derive(Clone, Debug)]
pub struct CreatedProduct {
    pub product: Product,
    pub label: String,
}

fn returning(columns: &[&str]) -> String {
    columns
        .iter()
        .map(|c| format!("\"{}\"", c))
        .collect::<Vec<_>>()
        .join(", ")
}

pub struct CatalogWriter;

impl CatalogWriter {
    pub async fn create_country(conn: &mut PgConnection, name: &str) -> Result<Country, AppError> {
        let sql = format!(
            "INSERT INTO \"countries\" (\"name\") VALUES ($1) RETURNING {}",
            returning(Country::COLUMNS)
        );
        Ok(sqlx::query_as(&sql).bind(name).fetch_one(conn).await?)
    }

    pub async fn create_producer(
        conn: &mut PgConnection,
        country_id: i64,
        name_of_region: Option<&str>,
    ) -> Result<Producer, AppError> {
        let sql = format!(
            "INSERT INTO \"producers\" (\"country_id\", \"name_of_region\") VALUES ($1, $2) RETURNING {}",
            returning(Producer::COLUMNS)
        );
        Ok(sqlx::query_as(&sql)
            .bind(country_id)
            .bind(name_of_region)
            .fetch_one(conn)
            .await?)
    }

    pub async fn create_mood(conn: &mut PgConnection, name: MoodType) -> Result<Mood, AppError> {
        let sql = format!(
            "INSERT INTO \"moods\" (\"name\") VALUES ($1) RETURNING {}",
            returning(Mood::COLUMNS)
        );
        Ok(sqlx::query_as(&sql).bind(name).fetch_one(conn).await?)
    }

    /// Insert the product row with `product_type` taken from the variant, then exactly one
    /// extension row of that kind (and the wine's moods).
    pub async fn create_product(conn: &mut PgConnection, new: &NewProduct) -> Result<CreatedProduct, AppError> {
        let sql = format!(
            "INSERT INTO \"products\" (\"name_of_product\", \"product_type\", \"description\", \"price\", \
             \"stock_quantity\", \"price_range\", \"image\") VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
            returning(Product::COLUMNS)
        );
        let product: Product = sqlx::query_as(&sql)
            .bind(new.name_of_product.as_deref())
            .bind(new.product_type())
            .bind(new.description.as_str())
            .bind(new.price)
            .bind(new.stock_quantity)
            .bind(new.price_range)
            .bind(new.image.as_deref())
            .fetch_one(&mut *conn)
            .await?;

        let label = match &new.variant {
            ProductVariant::Wine(spec) => {
                let sql = format!(
                    "INSERT INTO \"wines\" (\"product_id\", \"product_type\", \"wine_type\", \"color\", \"country_id\", \
                     \"producer_id\", \"vintage_year\", \"alcohol\") VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {}",
                    returning(Wine::COLUMNS)
                );
                let wine: Wine = sqlx::query_as(&sql)
                    .bind(product.id)
                    .bind(ProductKind::Wine)
                    .bind(spec.wine_type)
                    .bind(spec.color)
                    .bind(spec.country_id)
                    .bind(spec.producer_id)
                    .bind(spec.vintage_year)
                    .bind(spec.alcohol)
                    .fetch_one(&mut *conn)
                    .await?;
                for mood_id in &spec.mood_ids {
                    sqlx::query("INSERT INTO \"wine_moods\" (\"wine_id\", \"mood_id\") VALUES ($1, $2) ON CONFLICT DO NOTHING")
                        .bind(wine.id)
                        .bind(*mood_id)
                        .execute(&mut *conn)
                        .await?;
                }
                wine.label(&product)
            }
            ProductVariant::Glass(spec) => {
                let sql = format!(
                    "INSERT INTO \"glasses\" (\"product_id\", \"product_type\", \"capacity\", \"country_id\", \
                     \"height\", \"diameter\", \"material\") VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
                    returning(Glass::COLUMNS)
                );
                let glass: Glass = sqlx::query_as(&sql)
                    .bind(product.id)
                    .bind(ProductKind::Glass)
                    .bind(spec.capacity)
                    .bind(spec.country_id)
                    .bind(spec.height)
                    .bind(spec.diameter)
                    .bind(spec.material)
                    .fetch_one(&mut *conn)
                    .await?;
                glass.label(&product)
            }
            ProductVariant::Corkscrew(spec) => {
                let sql = format!(
                    "INSERT INTO \"corkscrews\" (\"product_id\", \"product_type\", \"dimensions\", \"material\") \
                     VALUES ($1, $2, $3, $4) RETURNING {}",
                    returning(Corkscrew::COLUMNS)
                );
                let corkscrew: Corkscrew = sqlx::query_as(&sql)
                    .bind(product.id)
                    .bind(ProductKind::Corkscrew)
                    .bind(spec.dimensions.as_deref())
                    .bind(spec.material)
                    .fetch_one(&mut *conn)
                    .await?;
                corkscrew.label(&product)
            }
        };
        tracing::debug!(product_id = product.id, kind = %product.product_type, "product created");
        Ok(CreatedProduct { product, label })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returning_quotes_every_column() {
        assert_eq!(returning(Country::COLUMNS), "\"id\", \"name\"");
    }
}
