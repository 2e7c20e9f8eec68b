//! Persisted row types and their back-office renderings.

use super::choices::*;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use std::fmt;

/// A table-backed row with a `BIGINT` primary key named `id`.
pub trait Table {
    const TABLE: &'static str;
    /// Columns selected into the row type, in declaration order.
    const COLUMNS: &'static [&'static str];

    fn id(&self) -> i64;
}

macro_rules! table {
    ($ty:ty, $table:literal, [$($col:literal),+ $(,)?]) => {
        impl Table for $ty {
            const TABLE: &'static str = $table;
            const COLUMNS: &'static [&'static str] = &[$($col),+];

            fn id(&self) -> i64 {
                self.id
            }
        }
    };
}

#[derive(Clone, Debug, PartialEq, FromRow)]
pub struct Country {
    pub id: i64,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, FromRow)]
pub struct Producer {
    pub id: i64,
    pub country_id: i64,
    pub name_of_region: Option<String>,
}

#[derive(Clone, Debug, PartialEq, FromRow)]
pub struct Mood {
    pub id: i64,
    pub name: MoodType,
}

#[derive(Clone, Debug, PartialEq, FromRow)]
pub struct Product {
    pub id: i64,
    pub name_of_product: Option<String>,
    pub product_type: ProductKind,
    pub description: String,
    pub price: Decimal,
    pub stock_quantity: Option<i32>,
    pub price_range: PriceRange,
    /// Asset path relative to the media root.
    pub image: Option<String>,
}

#[derive(Clone, Debug, PartialEq, FromRow)]
pub struct Wine {
    pub id: i64,
    pub product_id: i64,
    pub wine_type: WineType,
    pub color: WineColor,
    pub country_id: i64,
    pub producer_id: i64,
    pub vintage_year: Option<i32>,
    pub alcohol: Option<Decimal>,
}

#[derive(Clone, Debug, PartialEq, FromRow)]
pub struct Glass {
    pub id: i64,
    pub product_id: i64,
    pub capacity: Option<i32>,
    pub country_id: i64,
    pub height: Decimal,
    pub diameter: Decimal,
    pub material: GlassMaterial,
}

#[derive(Clone, Debug, PartialEq, FromRow)]
pub struct Corkscrew {
    pub id: i64,
    pub product_id: i64,
    pub dimensions: Option<String>,
    pub material: CorkscrewMaterial,
}

#[derive(Clone, Debug, PartialEq, FromRow)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, FromRow)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i32,
}

table!(Country, "countries", ["id", "name"]);
table!(Producer, "producers", ["id", "country_id", "name_of_region"]);
table!(Mood, "moods", ["id", "name"]);
table!(
    Product,
    "products",
    [
        "id",
        "name_of_product",
        "product_type",
        "description",
        "price",
        "stock_quantity",
        "price_range",
        "image",
    ]
);
table!(
    Wine,
    "wines",
    [
        "id",
        "product_id",
        "wine_type",
        "color",
        "country_id",
        "producer_id",
        "vintage_year",
        "alcohol",
    ]
);
table!(
    Glass,
    "glasses",
    ["id", "product_id", "capacity", "country_id", "height", "diameter", "material"]
);
table!(Corkscrew, "corkscrews", ["id", "product_id", "dimensions", "material"]);
table!(Order, "orders", ["id", "user_id", "created_at"]);
table!(OrderItem, "order_items", ["id", "order_id", "product_id", "quantity"]);

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name.label())
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name_of_product.as_deref().unwrap_or("Unnamed Product"))
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Order #{} at {}", self.id, self.created_at)
    }
}

impl Producer {
    pub fn label(&self, country: &Country) -> String {
        format!(
            "{} of {}",
            self.name_of_region.as_deref().unwrap_or("Unknown region"),
            country
        )
    }
}

impl Wine {
    pub fn label(&self, product: &Product) -> String {
        format!("{} ({}, {})", product, self.wine_type.label(), self.color.label())
    }
}

impl Glass {
    pub fn label(&self, product: &Product) -> String {
        match self.capacity {
            Some(ml) => format!("{} ({}ml)", product, ml),
            None => format!("{} (unknown capacity)", product),
        }
    }
}

impl Corkscrew {
    pub fn label(&self, product: &Product) -> String {
        format!("{} ({})", product, self.dimensions.as_deref().unwrap_or("no dimensions"))
    }
}

impl OrderItem {
    pub fn label(&self, product: &Product) -> String {
        format!("{} x{}", product, self.quantity)
    }
}
