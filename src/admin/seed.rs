//! Catalog fixture seeding. The fixture is validated up front, then applied in a single
//! transaction. A catalog that already has products is left untouched.

use crate::admin::writer::CatalogWriter;
use crate::config::{validate, CatalogFixture, ProductFixture, VariantFixture};
use crate::error::{AppError, ConfigError};
use crate::media::product_image_path;
use crate::schema::*;
use sqlx::PgPool;
use std::collections::HashMap;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub countries: usize,
    pub producers: usize,
    pub moods: usize,
    pub products: usize,
    pub skipped: bool,
}

fn lookup<'a, T>(map: &'a HashMap<String, T>, kind: &'static str, key: &str) -> Result<&'a T, ConfigError> {
    map.get(key).ok_or_else(|| ConfigError::MissingReference {
        kind,
        key: key.to_string(),
    })
}

/// Turn a fixture product into an insertable product, resolving keys to row ids.
fn new_product(
    fixture: &ProductFixture,
    countries: &HashMap<String, Country>,
    producers: &HashMap<String, Producer>,
    moods: &HashMap<MoodType, i64>,
) -> Result<NewProduct, ConfigError> {
    let variant = match &fixture.variant {
        VariantFixture::Wine {
            wine_type,
            color,
            country,
            producer,
            vintage_year,
            alcohol,
            moods: wine_moods,
        } => ProductVariant::Wine(WineSpec {
            wine_type: *wine_type,
            color: *color,
            country_id: lookup(countries, "country", country)?.id,
            producer_id: lookup(producers, "producer", producer)?.id,
            vintage_year: *vintage_year,
            alcohol: *alcohol,
            mood_ids: wine_moods
                .iter()
                .map(|m| {
                    moods.get(m).copied().ok_or_else(|| ConfigError::MissingReference {
                        kind: "mood",
                        key: m.as_str().to_string(),
                    })
                })
                .collect::<Result<_, _>>()?,
        }),
        VariantFixture::Glass {
            capacity,
            country,
            height,
            diameter,
            material,
        } => ProductVariant::Glass(GlassSpec {
            capacity: *capacity,
            country_id: lookup(countries, "country", country)?.id,
            height: *height,
            diameter: *diameter,
            material: *material,
        }),
        VariantFixture::Corkscrew { dimensions, material } => ProductVariant::Corkscrew(CorkscrewSpec {
            dimensions: dimensions.clone(),
            material: *material,
        }),
    };
    Ok(NewProduct {
        name_of_product: fixture.name_of_product.clone(),
        description: fixture.description.clone(),
        price: fixture.price,
        stock_quantity: fixture.stock_quantity,
        price_range: fixture.price_range,
        image: fixture
            .image_file
            .as_deref()
            .map(|f| product_image_path(fixture.name_of_product.as_deref(), f)),
        variant,
    })
}

pub async fn seed_catalog(pool: &PgPool, fixture: &CatalogFixture) -> Result<SeedReport, AppError> {
    validate(fixture)?;

    let (existing,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM \"products\"")
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        tracing::info!(existing, "catalog already populated, skipping seed");
        return Ok(SeedReport {
            skipped: true,
            ..SeedReport::default()
        });
    }

    let mut tx = pool.begin().await?;

    let mut countries = HashMap::new();
    for c in &fixture.countries {
        let country = CatalogWriter::create_country(&mut tx, &c.name).await?;
        tracing::debug!(country = %country, "seeded");
        countries.insert(c.key.clone(), country);
    }

    let mut producers = HashMap::new();
    for p in &fixture.producers {
        let country = lookup(&countries, "country", &p.country)?;
        let producer = CatalogWriter::create_producer(&mut tx, country.id, p.name_of_region.as_deref()).await?;
        tracing::debug!(producer = %producer.label(country), "seeded");
        producers.insert(p.key.clone(), producer);
    }

    let mut moods = HashMap::new();
    for name in &fixture.moods {
        let mood = CatalogWriter::create_mood(&mut tx, *name).await?;
        tracing::debug!(mood = %mood, "seeded");
        moods.insert(mood.name, mood.id);
    }

    for p in &fixture.products {
        let new = new_product(p, &countries, &producers, &moods)?;
        let created = CatalogWriter::create_product(&mut tx, &new).await?;
        tracing::debug!(product = %created.label, "seeded");
    }

    tx.commit().await?;
    let report = SeedReport {
        countries: countries.len(),
        producers: producers.len(),
        moods: moods.len(),
        products: fixture.products.len(),
        skipped: false,
    };
    tracing::info!(
        countries = report.countries,
        producers = report.producers,
        moods = report.moods,
        products = report.products,
        "catalog seeded"
    );
    Ok(report)
}
