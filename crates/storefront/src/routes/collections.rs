//! Collection route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{OriginalUri, Path, State},
    response::{IntoResponse, Response},
};
use impact_core::pagination::{PageLinks, PaginationVariables};
use impact_core::variant::ProductLocation;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::shopify::ShopifyError;
use crate::shopify::types::{CollectionSummary, ProductItem, RecommendedProduct};
use crate::state::AppState;

use super::found;
pub use super::products::ImageView;

/// Collections per page on the listing.
const COLLECTIONS_PER_PAGE: i64 = 4;

/// Products per page on a collection.
const PRODUCTS_PER_PAGE: i64 = 8;

/// Collection display data for templates.
#[derive(Clone)]
pub struct CollectionView {
    pub handle: String,
    pub title: String,
    pub description: Option<String>,
    pub image: Option<ImageView>,
}

/// A product card in a grid.
#[derive(Clone)]
pub struct ProductCardView {
    pub title: String,
    /// Link target; collection cards link straight to the first variant.
    pub url: String,
    pub price: String,
    pub image: Option<ImageView>,
}

// =============================================================================
// Type Conversions
// =============================================================================

impl From<&CollectionSummary> for CollectionView {
    fn from(collection: &CollectionSummary) -> Self {
        Self {
            handle: collection.handle.clone(),
            title: collection.title.clone(),
            description: if collection.description.is_empty() {
                None
            } else {
                Some(collection.description.clone())
            },
            image: collection.image.as_ref().map(ImageView::from),
        }
    }
}

impl From<&ProductItem> for ProductCardView {
    fn from(product: &ProductItem) -> Self {
        Self {
            title: product.title.clone(),
            url: ProductLocation::for_handle(product.handle.as_str())
                .variant_url(&product.first_variant_options),
            price: product.price_range.min_variant_price.display(),
            image: product.featured_image.as_ref().map(ImageView::from),
        }
    }
}

impl From<&RecommendedProduct> for ProductCardView {
    fn from(product: &RecommendedProduct) -> Self {
        Self {
            title: product.title.clone(),
            url: ProductLocation::for_handle(product.handle.as_str()).product_path(),
            price: product.min_price.display(),
            image: product
                .featured_image
                .as_ref()
                .or_else(|| product.images.first())
                .map(ImageView::from),
        }
    }
}

/// Collection listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "collections/index.html")]
pub struct CollectionsIndexTemplate {
    pub collections: Vec<CollectionView>,
    pub links: PageLinks,
}

/// Collection detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "collections/show.html")]
pub struct CollectionShowTemplate {
    pub collection: CollectionView,
    pub products: Vec<ProductCardView>,
    pub links: PageLinks,
}

/// Display collection listing page.
#[instrument(skip(state, uri))]
pub async fn index(State(state): State<AppState>, OriginalUri(uri): OriginalUri) -> Result<Response> {
    let query = uri.query().unwrap_or_default();
    let page = PaginationVariables::from_query(query, COLLECTIONS_PER_PAGE);

    let connection = state.storefront().collections(&page).await?;

    Ok(CollectionsIndexTemplate {
        collections: connection.nodes.iter().map(CollectionView::from).collect(),
        links: connection.links(uri.path(), query),
    }
    .into_response())
}

/// Display collection detail page with products.
#[instrument(skip(state, uri), fields(handle = %handle))]
pub async fn show(
    State(state): State<AppState>,
    Path(handle): Path<String>,
    OriginalUri(uri): OriginalUri,
) -> Result<Response> {
    if handle.is_empty() {
        return Ok(found("/collections"));
    }

    let query = uri.query().unwrap_or_default();
    let page = PaginationVariables::from_query(query, PRODUCTS_PER_PAGE);

    let collection = match state.storefront().collection(&handle, &page).await {
        Ok(collection) => collection,
        Err(ShopifyError::NotFound(_)) => {
            return Err(AppError::NotFound(format!("Collection {handle} not found")));
        }
        Err(e) => return Err(e.into()),
    };

    let links = collection.products.links(uri.path(), query);
    let products = collection
        .products
        .nodes
        .iter()
        .map(ProductCardView::from)
        .collect();
    let collection = CollectionView {
        handle: collection.handle,
        title: collection.title,
        description: Some(collection.description).filter(|d| !d.is_empty()),
        image: None,
    };

    Ok(CollectionShowTemplate {
        collection,
        products,
        links,
    }
    .into_response())
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::test_support::{body_string, get, test_app};

    fn page_info(has_next: bool, has_previous: bool) -> serde_json::Value {
        serde_json::json!({
            "hasNextPage": has_next,
            "hasPreviousPage": has_previous,
            "startCursor": "start",
            "endCursor": "end"
        })
    }

    #[tokio::test]
    async fn test_collection_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({"operationName": "Collection"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"data": {"collection": null}})),
            )
            .mount(&server)
            .await;

        let response = get(test_app(&server), "/collections/ghost").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_string(response).await, "Collection ghost not found");
    }

    #[tokio::test]
    async fn test_collection_cards_link_to_first_variant() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({
                "operationName": "Collection",
                "variables": {"handle": "tees", "first": 8}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {"collection": {
                    "id": "gid://shopify/Collection/1",
                    "handle": "tees",
                    "title": "Tees",
                    "description": "Soft cotton",
                    "products": {
                        "nodes": [{
                            "id": "gid://shopify/Product/1",
                            "handle": "the-tee",
                            "title": "The Tee",
                            "featuredImage": null,
                            "priceRange": {
                                "minVariantPrice": {"amount": "25.0", "currencyCode": "USD"},
                                "maxVariantPrice": {"amount": "30.0", "currencyCode": "USD"}
                            },
                            "variants": {"nodes": [{"selectedOptions": [
                                {"name": "Color", "value": "Blue"},
                                {"name": "Size", "value": "M"}
                            ]}]}
                        }],
                        "pageInfo": page_info(true, false)
                    }
                }}
            })))
            .mount(&server)
            .await;

        let response = get(test_app(&server), "/collections/tees").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains(r#"href="/products/the-tee?Color=Blue&#38;Size=M""#));
        assert!(body.contains("$25.00"));
        assert!(body.contains(r#"href="/collections/tees?cursor=end&#38;direction=next""#));
        assert!(!body.contains("direction=previous"));
    }

    #[tokio::test]
    async fn test_collections_index_pages_backwards() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({
                "operationName": "StoreCollections",
                "variables": {"last": 4, "startCursor": "abc"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {"collections": {
                    "nodes": [{
                        "id": "gid://shopify/Collection/2",
                        "title": "Hats",
                        "description": "",
                        "handle": "hats",
                        "image": null
                    }],
                    "pageInfo": page_info(true, true)
                }}
            })))
            .mount(&server)
            .await;

        let response = get(test_app(&server), "/collections?cursor=abc&direction=previous").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains(r#"href="/collections/hats""#));
        assert!(body.contains("cursor=start&#38;direction=previous"));
        assert!(body.contains("cursor=end&#38;direction=next"));
    }
}
