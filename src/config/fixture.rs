//! Catalog fixture: reference data and products in one JSON document, cross-referenced by
//! fixture-local keys. Loaded from a file by the back-office seeding path.

use crate::error::ConfigError;
use crate::schema::{
    CorkscrewMaterial, GlassMaterial, MoodType, PriceRange, ProductKind, WineColor, WineType,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct CatalogFixture {
    #[serde(default)]
    pub countries: Vec<CountryFixture>,
    #[serde(default)]
    pub producers: Vec<ProducerFixture>,
    #[serde(default)]
    pub moods: Vec<MoodType>,
    #[serde(default)]
    pub products: Vec<ProductFixture>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CountryFixture {
    pub key: String,
    pub name: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ProducerFixture {
    pub key: String,
    pub country: String,
    #[serde(default)]
    pub name_of_region: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ProductFixture {
    #[serde(default)]
    pub name_of_product: Option<String>,
    /// Optional; when given it must agree with the variant.
    #[serde(default)]
    pub product_type: Option<ProductKind>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub stock_quantity: Option<i32>,
    #[serde(default)]
    pub price_range: PriceRange,
    /// Original upload filename; stored under a generated asset path.
    #[serde(default)]
    pub image_file: Option<String>,
    pub variant: VariantFixture,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum VariantFixture {
    Wine {
        #[serde(default)]
        wine_type: WineType,
        #[serde(default)]
        color: WineColor,
        country: String,
        producer: String,
        #[serde(default)]
        vintage_year: Option<i32>,
        #[serde(default)]
        alcohol: Option<Decimal>,
        #[serde(default)]
        moods: Vec<MoodType>,
    },
    Glass {
        #[serde(default)]
        capacity: Option<i32>,
        country: String,
        #[serde(default)]
        height: Decimal,
        #[serde(default)]
        diameter: Decimal,
        #[serde(default)]
        material: GlassMaterial,
    },
    Corkscrew {
        #[serde(default)]
        dimensions: Option<String>,
        #[serde(default)]
        material: CorkscrewMaterial,
    },
}

impl VariantFixture {
    pub fn kind(&self) -> ProductKind {
        match self {
            VariantFixture::Wine { .. } => ProductKind::Wine,
            VariantFixture::Glass { .. } => ProductKind::Glass,
            VariantFixture::Corkscrew { .. } => ProductKind::Corkscrew,
        }
    }
}

impl ProductFixture {
    pub fn display_name(&self) -> &str {
        self.name_of_product.as_deref().unwrap_or("Unnamed Product")
    }
}

impl CatalogFixture {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|e| ConfigError::Load(e.to_string()))
    }

    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&text)
    }
}
