//! Wire representations. Related rows are embedded read-only; none of these shapes is
//! accepted as input except the order payload in `service::validation`.

use crate::media::media_url;
use crate::schema::*;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CountryView {
    pub id: i64,
    pub name: String,
}

impl From<Country> for CountryView {
    fn from(c: Country) -> Self {
        CountryView { id: c.id, name: c.name }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProducerView {
    pub id: i64,
    pub name_of_country: CountryView,
    pub name_of_region: Option<String>,
}

impl ProducerView {
    pub fn new(producer: Producer, country: CountryView) -> Self {
        ProducerView {
            id: producer.id,
            name_of_country: country,
            name_of_region: producer.name_of_region,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MoodView {
    pub id: i64,
    pub name: MoodType,
}

impl From<Mood> for MoodView {
    fn from(m: Mood) -> Self {
        MoodView { id: m.id, name: m.name }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WineView {
    pub id: i64,
    pub product: i64,
    pub wine_type: WineType,
    pub color: WineColor,
    pub country: CountryView,
    pub producer: ProducerView,
    pub vintage_year: Option<i32>,
    pub alcohol: Option<Decimal>,
    pub moods: Vec<MoodView>,
}

impl WineView {
    pub fn new(wine: Wine, country: CountryView, producer: ProducerView, moods: Vec<MoodView>) -> Self {
        WineView {
            id: wine.id,
            product: wine.product_id,
            wine_type: wine.wine_type,
            color: wine.color,
            country,
            producer,
            vintage_year: wine.vintage_year,
            alcohol: wine.alcohol,
            moods,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GlassView {
    pub id: i64,
    pub product: i64,
    pub capacity: Option<i32>,
    pub country: CountryView,
    pub height: Decimal,
    pub diameter: Decimal,
    pub material: GlassMaterial,
}

impl GlassView {
    pub fn new(glass: Glass, country: CountryView) -> Self {
        GlassView {
            id: glass.id,
            product: glass.product_id,
            capacity: glass.capacity,
            country,
            height: glass.height,
            diameter: glass.diameter,
            material: glass.material,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CorkscrewView {
    pub id: i64,
    pub product: i64,
    pub dimensions: Option<String>,
    pub material: CorkscrewMaterial,
}

impl From<Corkscrew> for CorkscrewView {
    fn from(c: Corkscrew) -> Self {
        CorkscrewView {
            id: c.id,
            product: c.product_id,
            dimensions: c.dimensions,
            material: c.material,
        }
    }
}

/// Lean product projection for catalog browsing and order lines.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProductListView {
    pub id: i64,
    pub name_of_product: Option<String>,
    pub price: Decimal,
    pub price_range: PriceRange,
}

impl From<Product> for ProductListView {
    fn from(p: Product) -> Self {
        ProductListView {
            id: p.id,
            name_of_product: p.name_of_product,
            price: p.price,
            price_range: p.price_range,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProductDetailView {
    pub id: i64,
    pub name_of_product: Option<String>,
    pub description: String,
    pub price: Decimal,
    pub stock_quantity: Option<i32>,
    pub price_range: PriceRange,
    pub product_type: ProductKind,
    /// Public URL of the image, if one is stored.
    pub image: Option<String>,
}

impl ProductDetailView {
    pub fn new(p: Product, media_base: &str, origin: Option<&str>) -> Self {
        ProductDetailView {
            id: p.id,
            image: p.image.as_deref().map(|path| media_url(media_base, origin, path)),
            name_of_product: p.name_of_product,
            description: p.description,
            price: p.price,
            stock_quantity: p.stock_quantity,
            price_range: p.price_range,
            product_type: p.product_type,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OrderItemView {
    pub id: i64,
    pub product: ProductListView,
    pub quantity: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OrderView {
    pub id: i64,
    pub user: i64,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItemView>,
    pub total_price: Decimal,
}

impl OrderView {
    /// Build the view; `total_price` is derived from the items every time.
    pub fn new(order: Order, items: Vec<OrderItemView>) -> Self {
        let total_price = order_total(&items);
        OrderView {
            id: order.id,
            user: order.user_id,
            created_at: order.created_at,
            items,
            total_price,
        }
    }
}

/// Σ price × quantity, with exactly two fraction digits.
pub fn order_total(items: &[OrderItemView]) -> Decimal {
    let mut total: Decimal = items
        .iter()
        .map(|i| i.product.price * Decimal::from(i.quantity))
        .sum();
    total = total.round_dp(2);
    total.rescale(2);
    total
}
