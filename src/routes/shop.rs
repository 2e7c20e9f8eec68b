//! The `/shop` namespace: API root, read-only catalog resources and orders. Every path
//! is registered with and without its trailing slash.

use crate::extractors::RequestUrl;
use crate::handlers::{catalog, orders};
use crate::service::catalog::{Corkscrews, Countries, Glasses, Moods, Producers, Products, Wines};
use crate::service::CatalogResource;
use crate::state::AppState;
use axum::{
    routing::{get, MethodRouter},
    Json, Router,
};
use serde_json::{Map, Value};

pub const NAMESPACE: &str = "/shop";
pub const ORDERS_PREFIX: &str = "orders";

/// Collection prefixes in the order the API root lists them.
pub const PREFIXES: &[&str] = &[
    Products::PREFIX,
    Wines::PREFIX,
    Moods::PREFIX,
    Countries::PREFIX,
    Producers::PREFIX,
    Glasses::PREFIX,
    Corkscrews::PREFIX,
    ORDERS_PREFIX,
];

fn collection_path(prefix: &str) -> String {
    format!("{}/{}/", NAMESPACE, prefix)
}

fn item_path(prefix: &str) -> String {
    format!("{}/{}/:id/", NAMESPACE, prefix)
}

/// Route `path` (which ends in `/`) and its slash-less twin to the same handlers.
fn route_both(router: Router<AppState>, path: &str, method_router: MethodRouter<AppState>) -> Router<AppState> {
    router
        .route(path, method_router.clone())
        .route(path.trim_end_matches('/'), method_router)
}

fn catalog_routes<R: CatalogResource>(router: Router<AppState>) -> Router<AppState> {
    let router = route_both(router, &collection_path(R::PREFIX), get(catalog::list::<R>));
    route_both(router, &item_path(R::PREFIX), get(catalog::retrieve::<R>))
}

async fn api_root(url: RequestUrl) -> Json<Value> {
    let origin = url.origin.unwrap_or_default();
    let links: Map<String, Value> = PREFIXES
        .iter()
        .map(|p| (p.to_string(), Value::String(format!("{}{}", origin, collection_path(p)))))
        .collect();
    Json(Value::Object(links))
}

pub fn shop_routes() -> Router<AppState> {
    let mut router = route_both(Router::new(), &format!("{}/", NAMESPACE), get(api_root));
    router = catalog_routes::<Products>(router);
    router = catalog_routes::<Wines>(router);
    router = catalog_routes::<Moods>(router);
    router = catalog_routes::<Countries>(router);
    router = catalog_routes::<Producers>(router);
    router = catalog_routes::<Glasses>(router);
    router = catalog_routes::<Corkscrews>(router);
    router = route_both(
        router,
        &collection_path(ORDERS_PREFIX),
        get(orders::list).post(orders::create),
    );
    route_both(
        router,
        &item_path(ORDERS_PREFIX),
        get(orders::retrieve)
            .put(orders::update)
            .patch(orders::partial_update)
            .delete(orders::destroy),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_end_with_slash() {
        assert_eq!(collection_path("wine"), "/shop/wine/");
        assert_eq!(item_path("orders"), "/shop/orders/:id/");
        assert_eq!(item_path("orders").trim_end_matches('/'), "/shop/orders/:id");
    }

    #[test]
    fn root_lists_every_prefix_once() {
        let unique: std::collections::HashSet<_> = PREFIXES.iter().collect();
        assert_eq!(unique.len(), PREFIXES.len());
        assert!(PREFIXES.contains(&"orders"));
    }
}
