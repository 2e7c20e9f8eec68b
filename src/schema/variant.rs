//! Product variants as a tagged union keyed by `product_type`.
//!
//! The write path takes a product together with exactly one variant, so the stored
//! `product_type` is always derived from the variant rather than supplied alongside it.

use super::choices::*;
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct WineSpec {
    #[serde(default)]
    pub wine_type: WineType,
    #[serde(default)]
    pub color: WineColor,
    pub country_id: i64,
    pub producer_id: i64,
    #[serde(default)]
    pub vintage_year: Option<i32>,
    #[serde(default)]
    pub alcohol: Option<Decimal>,
    #[serde(default)]
    pub mood_ids: Vec<i64>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GlassSpec {
    #[serde(default)]
    pub capacity: Option<i32>,
    pub country_id: i64,
    #[serde(default)]
    pub height: Decimal,
    #[serde(default)]
    pub diameter: Decimal,
    #[serde(default)]
    pub material: GlassMaterial,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CorkscrewSpec {
    #[serde(default)]
    pub dimensions: Option<String>,
    #[serde(default)]
    pub material: CorkscrewMaterial,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "product_type", rename_all = "lowercase")]
pub enum ProductVariant {
    Wine(WineSpec),
    Glass(GlassSpec),
    Corkscrew(CorkscrewSpec),
}

impl ProductVariant {
    pub fn kind(&self) -> ProductKind {
        match self {
            ProductVariant::Wine(_) => ProductKind::Wine,
            ProductVariant::Glass(_) => ProductKind::Glass,
            ProductVariant::Corkscrew(_) => ProductKind::Corkscrew,
        }
    }
}

/// A product ready to be written with its single extension.
#[derive(Clone, Debug, PartialEq)]
pub struct NewProduct {
    pub name_of_product: Option<String>,
    pub description: String,
    pub price: Decimal,
    pub stock_quantity: Option<i32>,
    pub price_range: PriceRange,
    pub image: Option<String>,
    pub variant: ProductVariant,
}

impl NewProduct {
    pub fn product_type(&self) -> ProductKind {
        self.variant.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_tag_selects_payload() {
        let v: ProductVariant = serde_json::from_value(serde_json::json!({
            "product_type": "glass",
            "country_id": 4,
            "capacity": 350,
            "material": "crystal"
        }))
        .unwrap();
        assert_eq!(v.kind(), ProductKind::Glass);
        match v {
            ProductVariant::Glass(g) => {
                assert_eq!(g.capacity, Some(350));
                assert_eq!(g.height, Decimal::ZERO);
            }
            other => panic!("unexpected variant {:?}", other),
        }
    }

    #[test]
    fn corkscrew_defaults_to_stainless() {
        let v: ProductVariant =
            serde_json::from_value(serde_json::json!({ "product_type": "corkscrew" })).unwrap();
        assert_eq!(
            v,
            ProductVariant::Corkscrew(CorkscrewSpec {
                dimensions: None,
                material: CorkscrewMaterial::StainlessSteel
            })
        );
    }
}
