//! Absolute request URL and list parameters.

use crate::error::AppError;
use crate::pagination::PageRequest;
use crate::state::AppState;
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, OriginalUri, Query},
    http::{header, request::Parts},
};
use std::collections::HashMap;

/// The request URL split into `origin` (scheme and host, if known), path and raw query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestUrl {
    pub origin: Option<String>,
    pub path: String,
    pub query: Option<String>,
}

impl RequestUrl {
    /// Absolute URL without the query string (relative when no origin is known).
    pub fn base(&self) -> String {
        format!("{}{}", self.origin.as_deref().unwrap_or(""), self.path)
    }

    fn from_parts(parts: &Parts, public_base_url: Option<&str>) -> Self {
        let uri = parts
            .extensions
            .get::<OriginalUri>()
            .map(|o| o.0.clone())
            .unwrap_or_else(|| parts.uri.clone());
        let origin = public_base_url.map(str::to_string).or_else(|| {
            parts
                .headers
                .get(header::HOST)
                .and_then(|h| h.to_str().ok())
                .map(|host| format!("{}://{}", forwarded_scheme(parts), host))
        });
        RequestUrl {
            origin,
            path: uri.path().to_string(),
            query: uri.query().map(str::to_string),
        }
    }
}

/// Scheme reported by a TLS-terminating proxy in `X-Forwarded-Proto`, else `http`.
fn forwarded_scheme(parts: &Parts) -> &'static str {
    let proto = parts
        .headers
        .get("x-forwarded-proto")
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim);
    match proto {
        Some(p) if p.eq_ignore_ascii_case("https") => "https",
        _ => "http",
    }
}

#[async_trait]
impl FromRequestParts<AppState> for RequestUrl {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(RequestUrl::from_parts(
            parts,
            state.settings.public_base_url.as_deref(),
        ))
    }
}

/// Everything a list endpoint needs: the requested page, the raw query params (for
/// resource-specific filters) and the URL for building page links.
#[derive(Clone, Debug)]
pub struct ListRequest {
    pub page: PageRequest,
    pub params: HashMap<String, String>,
    pub url: RequestUrl,
}

#[async_trait]
impl FromRequestParts<AppState> for ListRequest {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        let page = PageRequest::from_query(&params)?;
        let url = RequestUrl::from_parts(parts, state.settings.public_base_url.as_deref());
        Ok(ListRequest { page, params, url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(uri: &str, host: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri(uri);
        if let Some(h) = host {
            builder = builder.header(header::HOST, h);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn origin_from_host_header() {
        let url = RequestUrl::from_parts(&parts("/shop/wine/?page=2", Some("shop.test")), None);
        assert_eq!(url.base(), "http://shop.test/shop/wine/");
        assert_eq!(url.query.as_deref(), Some("page=2"));
    }

    #[test]
    fn forwarded_proto_sets_scheme() {
        let mut p = parts("/shop/products/?page=2", Some("shop.test"));
        p.headers.insert("x-forwarded-proto", "https".parse().unwrap());
        let url = RequestUrl::from_parts(&p, None);
        assert_eq!(url.base(), "https://shop.test/shop/products/");

        p.headers.insert("x-forwarded-proto", "ftp".parse().unwrap());
        assert_eq!(RequestUrl::from_parts(&p, None).base(), "http://shop.test/shop/products/");
    }

    #[test]
    fn public_base_url_wins() {
        let url = RequestUrl::from_parts(
            &parts("/shop/orders/", Some("internal:3000")),
            Some("https://shop.example"),
        );
        assert_eq!(url.base(), "https://shop.example/shop/orders/");
    }

    #[test]
    fn relative_without_host() {
        let url = RequestUrl::from_parts(&parts("/shop/mood/", None), None);
        assert_eq!(url.base(), "/shop/mood/");
        assert!(url.query.is_none());
    }
}
