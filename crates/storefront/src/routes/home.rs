//! Home page route handler.

use askama::Template;
use axum::{extract::State, response::Response};
use tracing::instrument;

use crate::deferred::{Deferred, DeferredChunk, streamed_html};
use crate::error::Result;
use crate::filters;
use crate::middleware::CspNonce;
use crate::shopify::types::RecommendedProduct;
use crate::shopify::{ShopifyError, StorefrontClient};
use crate::state::AppState;

use super::collections::{CollectionView, ProductCardView};
use super::render;

/// Element id of the recommended products section.
pub const RECOMMENDED_TARGET: &str = "recommended-products";

const RECOMMENDED_ERROR: &str = "There was a problem loading recommended products";

/// Home page shell.
#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    /// Featured collections, newest first.
    pub collections: Vec<CollectionView>,
    pub recommended_target: &'static str,
}

/// The recommended products grid, streamed after the shell.
#[derive(Template)]
#[template(path = "partials/recommended_products.html")]
pub struct RecommendedProductsTemplate {
    pub target: &'static str,
    pub products: Vec<ProductCardView>,
    pub error: Option<&'static str>,
}

/// Display the home page.
///
/// Featured collections are awaited; recommended products stream in after
/// the shell behind a "Loading..." placeholder.
#[instrument(skip(state, nonce))]
pub async fn home(State(state): State<AppState>, nonce: CspNonce) -> Result<Response> {
    let recommended = spawn_recommended(state.storefront().clone());

    let collections = state.storefront().featured_collections().await?;

    let shell = render(&HomeTemplate {
        collections: collections.iter().map(CollectionView::from).collect(),
        recommended_target: RECOMMENDED_TARGET,
    })?;

    Ok(streamed_html(shell, async move {
        let content = recommended_products(recommended).await;
        DeferredChunk {
            target: RECOMMENDED_TARGET,
            nonce: nonce.value(),
            content: &content,
        }
        .to_html()
    }))
}

fn spawn_recommended(
    storefront: StorefrontClient,
) -> Deferred<std::result::Result<Vec<RecommendedProduct>, ShopifyError>> {
    Deferred::spawn(async move { storefront.recommended_products().await })
}

async fn recommended_products(
    recommended: Deferred<std::result::Result<Vec<RecommendedProduct>, ShopifyError>>,
) -> String {
    let template = match recommended.resolve().await {
        Ok(Ok(products)) => RecommendedProductsTemplate {
            target: RECOMMENDED_TARGET,
            products: products.iter().map(ProductCardView::from).collect(),
            error: None,
        },
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Failed to fetch recommended products");
            RecommendedProductsTemplate {
                target: RECOMMENDED_TARGET,
                products: Vec::new(),
                error: Some(RECOMMENDED_ERROR),
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Recommended products task failed");
            RecommendedProductsTemplate {
                target: RECOMMENDED_TARGET,
                products: Vec::new(),
                error: Some(RECOMMENDED_ERROR),
            }
        }
    };

    template.render().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to render recommended products");
        String::new()
    })
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::test_support::{body_string, get, test_app};

    async fn mount_collections(server: &MockServer) {
        Mock::given(method("POST"))
            .and(body_partial_json(
                serde_json::json!({"operationName": "FeaturedCollection"}),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {"collections": {"nodes": [{
                    "id": "gid://shopify/Collection/1",
                    "title": "Summer",
                    "description": "Warm days",
                    "handle": "summer",
                    "image": {
                        "id": null,
                        "url": "https://cdn.shopify.com/summer.jpg",
                        "altText": "Beach",
                        "width": 1200,
                        "height": 800
                    }
                }]}}
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_home_streams_recommended_products() {
        let server = MockServer::start().await;
        mount_collections(&server).await;
        Mock::given(method("POST"))
            .and(body_partial_json(
                serde_json::json!({"operationName": "RecommendedProducts"}),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {"products": {"nodes": [{
                    "id": "gid://shopify/Product/1",
                    "title": "The Tee",
                    "handle": "the-tee",
                    "priceRange": {"minVariantPrice": {"amount": "25.0", "currencyCode": "USD"}},
                    "featuredImage": null,
                    "images": {"nodes": []}
                }]}}
            })))
            .mount(&server)
            .await;

        let response = get(test_app(&server), "/").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;

        let (shell, tail) = body
            .split_once(r#"<template id="deferred-recommended-products">"#)
            .expect("deferred chunk");
        assert!(shell.contains(r#"href="/collections/summer""#));
        assert!(shell.contains("Loading..."));
        assert!(tail.contains(r#"href="/products/the-tee""#));
        assert!(tail.contains("$25.00"));
    }

    #[tokio::test]
    async fn test_recommended_failure_is_inline() {
        let server = MockServer::start().await;
        mount_collections(&server).await;
        Mock::given(method("POST"))
            .and(body_partial_json(
                serde_json::json!({"operationName": "RecommendedProducts"}),
            ))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "2"))
            .mount(&server)
            .await;

        let response = get(test_app(&server), "/").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("Summer"));
        assert!(body.contains(RECOMMENDED_ERROR));
    }

    #[tokio::test]
    async fn test_featured_collections_failure_is_bad_gateway() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("down"))
            .mount(&server)
            .await;

        let response = get(test_app(&server), "/").await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
