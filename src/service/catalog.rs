//! Read-only catalog resources. Each resource lists a page of rows and retrieves one by
//! id, assembling embedded related rows with batch loads rather than per-row queries.

use crate::dto::*;
use crate::error::AppError;
use crate::extractors::{ListRequest, RequestUrl};
use crate::pagination::PageSlice;
use crate::schema::*;
use crate::service::crud::{related, CrudService};
use crate::service::filters::{ordering_terms, search_terms, ORDERING_PARAM, SEARCH_PARAM};
use crate::sql::ListQuery;
use crate::state::AppState;
use async_trait::async_trait;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use std::collections::HashMap;

/// A read-only catalog endpoint set mounted under `PREFIX`.
#[async_trait]
pub trait CatalogResource: Send + Sync + 'static {
    const PREFIX: &'static str;
    type ListItem: Serialize + Send;
    type Detail: Serialize + Send;

    async fn list(state: &AppState, request: &ListRequest) -> Result<PageSlice<Self::ListItem>, AppError>;

    async fn retrieve(state: &AppState, id: i64, url: &RequestUrl) -> Result<Option<Self::Detail>, AppError>;
}

fn plain_listing<T: Table>() -> ListQuery<'static> {
    ListQuery::new(T::TABLE, T::COLUMNS)
}

async fn country_views(pool: &PgPool, ids: impl IntoIterator<Item = i64>) -> Result<HashMap<i64, CountryView>, AppError> {
    let countries = CrudService::fetch_map::<Country>(pool, ids).await?;
    Ok(countries.into_iter().map(|(id, c)| (id, c.into())).collect())
}

async fn producer_views(pool: &PgPool, producers: Vec<Producer>) -> Result<Vec<ProducerView>, AppError> {
    let countries = country_views(pool, producers.iter().map(|p| p.country_id)).await?;
    producers
        .into_iter()
        .map(|p| {
            let country = related(&countries, p.country_id, "country")?;
            Ok(ProducerView::new(p, country))
        })
        .collect()
}

#[derive(FromRow)]
struct WineMoodRow {
    wine_id: i64,
    id: i64,
    name: MoodType,
}

const WINE_MOODS_SQL: &str = "SELECT wm.\"wine_id\", m.\"id\", m.\"name\" FROM \"wine_moods\" wm \
     JOIN \"moods\" m ON m.\"id\" = wm.\"mood_id\" WHERE wm.\"wine_id\" = ANY($1) ORDER BY m.\"id\"";

async fn wine_views(pool: &PgPool, wines: Vec<Wine>) -> Result<Vec<WineView>, AppError> {
    if wines.is_empty() {
        return Ok(Vec::new());
    }
    let wine_ids: Vec<i64> = wines.iter().map(|w| w.id).collect();
    let countries = country_views(pool, wines.iter().map(|w| w.country_id)).await?;
    let producers = CrudService::fetch_map::<Producer>(pool, wines.iter().map(|w| w.producer_id)).await?;
    let producers: HashMap<i64, ProducerView> = producer_views(pool, producers.into_values().collect())
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    tracing::debug!(sql = WINE_MOODS_SQL, wines = ?wine_ids, "query");
    let mood_rows: Vec<WineMoodRow> = sqlx::query_as(WINE_MOODS_SQL)
        .bind(wine_ids.as_slice())
        .fetch_all(pool)
        .await?;
    let mut moods: HashMap<i64, Vec<MoodView>> = HashMap::new();
    for row in mood_rows {
        moods.entry(row.wine_id).or_default().push(MoodView {
            id: row.id,
            name: row.name,
        });
    }

    wines
        .into_iter()
        .map(|w| {
            let country = related(&countries, w.country_id, "country")?;
            let producer = related(&producers, w.producer_id, "producer")?;
            let wine_moods = moods.remove(&w.id).unwrap_or_default();
            Ok(WineView::new(w, country, producer, wine_moods))
        })
        .collect()
}

async fn glass_views(pool: &PgPool, glasses: Vec<Glass>) -> Result<Vec<GlassView>, AppError> {
    let countries = country_views(pool, glasses.iter().map(|g| g.country_id)).await?;
    glasses
        .into_iter()
        .map(|g| {
            let country = related(&countries, g.country_id, "country")?;
            Ok(GlassView::new(g, country))
        })
        .collect()
}

/// Swap the items of a page for their assembled views.
fn with_items<T, U>(slice: PageSlice<T>, items: Vec<U>) -> PageSlice<U> {
    PageSlice {
        count: slice.count,
        page: slice.page,
        items,
    }
}

pub struct Products;
pub struct Wines;
pub struct Moods;
pub struct Countries;
pub struct Producers;
pub struct Glasses;
pub struct Corkscrews;

/// Wine listing accepts these `ordering` fields.
pub const WINE_ORDERING_FIELDS: &[&str] = &["vintage_year", "alcohol"];

#[async_trait]
impl CatalogResource for Products {
    const PREFIX: &'static str = "products";
    type ListItem = ProductListView;
    type Detail = ProductDetailView;

    async fn list(state: &AppState, request: &ListRequest) -> Result<PageSlice<ProductListView>, AppError> {
        let query = plain_listing::<Product>();
        let slice = CrudService::page::<Product>(&state.pool, &query, &request.page).await?;
        Ok(slice.map(ProductListView::from))
    }

    async fn retrieve(state: &AppState, id: i64, url: &RequestUrl) -> Result<Option<ProductDetailView>, AppError> {
        let product = CrudService::read::<Product>(&state.pool, id).await?;
        Ok(product.map(|p| ProductDetailView::new(p, &state.settings.media_url, url.origin.as_deref())))
    }
}

#[async_trait]
impl CatalogResource for Wines {
    const PREFIX: &'static str = "wine";
    type ListItem = WineView;
    type Detail = WineView;

    /// `search` matches the owning product's name; `ordering` takes vintage_year/alcohol.
    async fn list(state: &AppState, request: &ListRequest) -> Result<PageSlice<WineView>, AppError> {
        let mut query = plain_listing::<Wine>();
        let terms = request
            .params
            .get(SEARCH_PARAM)
            .map(|s| search_terms(s))
            .unwrap_or_default();
        if !terms.is_empty() {
            query = query
                .join(Product::TABLE, "p", "id", "product_id")
                .filter_contains_all("p", "name_of_product", &terms);
        }
        if let Some(raw) = request.params.get(ORDERING_PARAM) {
            query = query.order_by(ordering_terms(raw, WINE_ORDERING_FIELDS));
        }
        let mut slice = CrudService::page::<Wine>(&state.pool, &query, &request.page).await?;
        let views = wine_views(&state.pool, std::mem::take(&mut slice.items)).await?;
        Ok(with_items(slice, views))
    }

    async fn retrieve(state: &AppState, id: i64, _url: &RequestUrl) -> Result<Option<WineView>, AppError> {
        let Some(wine) = CrudService::read::<Wine>(&state.pool, id).await? else {
            return Ok(None);
        };
        Ok(wine_views(&state.pool, vec![wine]).await?.pop())
    }
}

#[async_trait]
impl CatalogResource for Moods {
    const PREFIX: &'static str = "mood";
    type ListItem = MoodView;
    type Detail = MoodView;

    async fn list(state: &AppState, request: &ListRequest) -> Result<PageSlice<MoodView>, AppError> {
        let query = plain_listing::<Mood>();
        let slice = CrudService::page::<Mood>(&state.pool, &query, &request.page).await?;
        Ok(slice.map(MoodView::from))
    }

    async fn retrieve(state: &AppState, id: i64, _url: &RequestUrl) -> Result<Option<MoodView>, AppError> {
        Ok(CrudService::read::<Mood>(&state.pool, id).await?.map(MoodView::from))
    }
}

#[async_trait]
impl CatalogResource for Countries {
    const PREFIX: &'static str = "country";
    type ListItem = CountryView;
    type Detail = CountryView;

    async fn list(state: &AppState, request: &ListRequest) -> Result<PageSlice<CountryView>, AppError> {
        let query = plain_listing::<Country>();
        let slice = CrudService::page::<Country>(&state.pool, &query, &request.page).await?;
        Ok(slice.map(CountryView::from))
    }

    async fn retrieve(state: &AppState, id: i64, _url: &RequestUrl) -> Result<Option<CountryView>, AppError> {
        Ok(CrudService::read::<Country>(&state.pool, id).await?.map(CountryView::from))
    }
}

#[async_trait]
impl CatalogResource for Producers {
    const PREFIX: &'static str = "producer";
    type ListItem = ProducerView;
    type Detail = ProducerView;

    async fn list(state: &AppState, request: &ListRequest) -> Result<PageSlice<ProducerView>, AppError> {
        let query = plain_listing::<Producer>();
        let mut slice = CrudService::page::<Producer>(&state.pool, &query, &request.page).await?;
        let views = producer_views(&state.pool, std::mem::take(&mut slice.items)).await?;
        Ok(with_items(slice, views))
    }

    async fn retrieve(state: &AppState, id: i64, _url: &RequestUrl) -> Result<Option<ProducerView>, AppError> {
        let Some(producer) = CrudService::read::<Producer>(&state.pool, id).await? else {
            return Ok(None);
        };
        Ok(producer_views(&state.pool, vec![producer]).await?.pop())
    }
}

#[async_trait]
impl CatalogResource for Glasses {
    const PREFIX: &'static str = "glass";
    type ListItem = GlassView;
    type Detail = GlassView;

    async fn list(state: &AppState, request: &ListRequest) -> Result<PageSlice<GlassView>, AppError> {
        let query = plain_listing::<Glass>();
        let mut slice = CrudService::page::<Glass>(&state.pool, &query, &request.page).await?;
        let views = glass_views(&state.pool, std::mem::take(&mut slice.items)).await?;
        Ok(with_items(slice, views))
    }

    async fn retrieve(state: &AppState, id: i64, _url: &RequestUrl) -> Result<Option<GlassView>, AppError> {
        let Some(glass) = CrudService::read::<Glass>(&state.pool, id).await? else {
            return Ok(None);
        };
        Ok(glass_views(&state.pool, vec![glass]).await?.pop())
    }
}

#[async_trait]
impl CatalogResource for Corkscrews {
    const PREFIX: &'static str = "corkscrew";
    type ListItem = CorkscrewView;
    type Detail = CorkscrewView;

    async fn list(state: &AppState, request: &ListRequest) -> Result<PageSlice<CorkscrewView>, AppError> {
        let query = plain_listing::<Corkscrew>();
        let slice = CrudService::page::<Corkscrew>(&state.pool, &query, &request.page).await?;
        Ok(slice.map(CorkscrewView::from))
    }

    async fn retrieve(state: &AppState, id: i64, _url: &RequestUrl) -> Result<Option<CorkscrewView>, AppError> {
        Ok(CrudService::read::<Corkscrew>(&state.pool, id).await?.map(CorkscrewView::from))
    }
}
