//! Shopify Storefront API client implementation.
//!
//! Uses `graphql_client` for typed operations with `reqwest` 0.13 for HTTP.
//! Catalog reads are cached using `moka`.

mod cache;
mod conversions;
pub mod queries;

use std::sync::Arc;
use std::time::Duration;

use graphql_client::{GraphQLQuery, Response};
use impact_core::pagination::{Connection, PaginationVariables};
use impact_core::types::ProductVariant;
use impact_core::variant::SelectedOptions;
use moka::future::Cache;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};

use crate::config::ShopifyStorefrontConfig;
use crate::shopify::types::{
    Collection, CollectionSummary, Product, RecommendedProduct,
};
use crate::shopify::{GraphQLError, GraphQLErrorLocation, ShopifyError};

use cache::{CacheKey, CacheValue};
use conversions::{
    convert_collection, convert_collection_connection, convert_collection_summary,
    convert_product, convert_recommended_product, convert_variants,
};

const CACHE_CAPACITY: u64 = 1000;
const PRIVATE_TOKEN_HEADER: &str = "Shopify-Storefront-Private-Token";

// =============================================================================
// StorefrontClient
// =============================================================================

/// Client for the Shopify Storefront API.
///
/// Provides typed access to products and collections. Successful catalog
/// reads are cached for the configured TTL; errors are never cached.
#[derive(Clone)]
pub struct StorefrontClient {
    inner: Arc<StorefrontClientInner>,
}

struct StorefrontClientInner {
    client: reqwest::Client,
    endpoint: String,
    access_token: SecretString,
    cache: Cache<CacheKey, CacheValue>,
}

impl StorefrontClient {
    /// Create a new Storefront API client.
    #[must_use]
    pub fn new(config: &ShopifyStorefrontConfig, cache_ttl: Duration) -> Self {
        Self::with_endpoint(
            config.endpoint(),
            config.storefront_private_token.clone(),
            cache_ttl,
        )
    }

    /// Create a client for an explicit GraphQL endpoint.
    #[must_use]
    pub fn with_endpoint(
        endpoint: impl Into<String>,
        access_token: SecretString,
        cache_ttl: Duration,
    ) -> Self {
        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(cache_ttl)
            .build();

        Self {
            inner: Arc::new(StorefrontClientInner {
                client: reqwest::Client::new(),
                endpoint: endpoint.into(),
                access_token,
                cache,
            }),
        }
    }

    /// Execute a GraphQL operation.
    async fn execute<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, ShopifyError> {
        let request_body = Q::build_query(variables);
        let operation = request_body.operation_name;

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            // Private access tokens use a different header than public tokens
            .header(PRIVATE_TOKEN_HEADER, self.inner.access_token.expose_secret())
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            tracing::warn!(operation, retry_after, "Storefront API rate limited");
            return Err(ShopifyError::RateLimited(retry_after));
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                operation,
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Shopify API returned non-success status"
            );
            return Err(ShopifyError::GraphQL(vec![GraphQLError::message(format!(
                "HTTP {status}: {}",
                response_text.chars().take(200).collect::<String>()
            ))]));
        }

        let response: Response<Q::ResponseData> = match serde_json::from_str(&response_text) {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(
                    operation,
                    error = %e,
                    body = %response_text.chars().take(500).collect::<String>(),
                    "Failed to parse Shopify GraphQL response"
                );
                return Err(ShopifyError::Parse(e));
            }
        };

        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            debug!(operation, errors = ?errors, "GraphQL errors in response");

            return Err(ShopifyError::GraphQL(
                errors
                    .into_iter()
                    .map(|e| GraphQLError {
                        message: e.message,
                        locations: e.locations.map_or_else(Vec::new, |locs| {
                            locs.into_iter()
                                .map(|l| GraphQLErrorLocation {
                                    line: i64::from(l.line),
                                    column: i64::from(l.column),
                                })
                                .collect()
                        }),
                        path: e.path.map_or_else(Vec::new, |p| {
                            p.into_iter()
                                .map(|fragment| match fragment {
                                    graphql_client::PathFragment::Key(s) => {
                                        serde_json::Value::String(s)
                                    }
                                    graphql_client::PathFragment::Index(i) => {
                                        serde_json::Value::Number(i.into())
                                    }
                                })
                                .collect()
                        }),
                    })
                    .collect(),
            ));
        }

        response.data.ok_or_else(|| {
            tracing::error!(
                operation,
                body = %response_text.chars().take(500).collect::<String>(),
                "Shopify GraphQL response has no data and no errors"
            );
            ShopifyError::GraphQL(vec![GraphQLError::message("No data in response")])
        })
    }

    // =========================================================================
    // Home Page
    // =========================================================================

    /// The six most recently updated collections.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn featured_collections(&self) -> Result<Vec<CollectionSummary>, ShopifyError> {
        let cache_key = CacheKey::FeaturedCollections;
        if let Some(CacheValue::FeaturedCollections(collections)) =
            self.inner.cache.get(&cache_key).await
        {
            debug!("Cache hit for featured collections");
            return Ok(collections);
        }

        let data = self
            .execute::<queries::FeaturedCollection>(queries::featured_collection::Variables)
            .await?;
        let collections: Vec<CollectionSummary> = data
            .collections
            .nodes
            .into_iter()
            .map(convert_collection_summary)
            .collect();

        self.inner
            .cache
            .insert(
                cache_key,
                CacheValue::FeaturedCollections(collections.clone()),
            )
            .await;

        Ok(collections)
    }

    /// The four most recently updated products.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn recommended_products(&self) -> Result<Vec<RecommendedProduct>, ShopifyError> {
        let cache_key = CacheKey::RecommendedProducts;
        if let Some(CacheValue::RecommendedProducts(products)) =
            self.inner.cache.get(&cache_key).await
        {
            debug!("Cache hit for recommended products");
            return Ok(products);
        }

        let data = self
            .execute::<queries::RecommendedProducts>(queries::recommended_products::Variables)
            .await?;
        let products: Vec<RecommendedProduct> = data
            .products
            .nodes
            .into_iter()
            .map(convert_recommended_product)
            .collect();

        self.inner
            .cache
            .insert(cache_key, CacheValue::RecommendedProducts(products.clone()))
            .await;

        Ok(products)
    }

    // =========================================================================
    // Collection Methods
    // =========================================================================

    /// One page of the store's collections.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn collections(
        &self,
        page: &PaginationVariables,
    ) -> Result<Connection<CollectionSummary>, ShopifyError> {
        let cache_key = CacheKey::Collections(page.clone());
        if let Some(CacheValue::Collections(collections)) = self.inner.cache.get(&cache_key).await
        {
            debug!("Cache hit for collections");
            return Ok(collections);
        }

        let data = self
            .execute::<queries::StoreCollections>(queries::store_collections::Variables {
                page: page.clone(),
            })
            .await?;
        let connection = convert_collection_connection(data.collections);

        self.inner
            .cache
            .insert(cache_key, CacheValue::Collections(connection.clone()))
            .await;

        Ok(connection)
    }

    /// A collection by handle, with one page of its products.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::NotFound` if no collection has this handle, or
    /// an error if the API request fails.
    #[instrument(skip(self, page), fields(handle = %handle))]
    pub async fn collection(
        &self,
        handle: &str,
        page: &PaginationVariables,
    ) -> Result<Collection, ShopifyError> {
        let cache_key = CacheKey::Collection {
            handle: handle.to_string(),
            page: page.clone(),
        };
        if let Some(CacheValue::Collection(collection)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for collection");
            return Ok(*collection);
        }

        let data = self
            .execute::<queries::Collection>(queries::collection::Variables {
                handle: handle.to_string(),
                page: page.clone(),
            })
            .await?;
        let collection = data
            .collection
            .map(convert_collection)
            .ok_or_else(|| ShopifyError::NotFound(format!("Collection {handle}")))?;

        self.inner
            .cache
            .insert(
                cache_key,
                CacheValue::Collection(Box::new(collection.clone())),
            )
            .await;

        Ok(collection)
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// A product by handle, with the variant matching `selection` resolved
    /// server-side and its first variant.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::NotFound` if no product has this handle, or an
    /// error if the API request fails.
    #[instrument(skip(self, selection), fields(handle = %handle, options = selection.len()))]
    pub async fn product(
        &self,
        handle: &str,
        selection: &SelectedOptions,
    ) -> Result<Product, ShopifyError> {
        let options_key = CacheKey::ProductOptions(handle.to_string());
        let selection = match self.inner.cache.get(&options_key).await {
            Some(CacheValue::ProductOptions(options)) => selection.retain_known(&options),
            _ => selection.clone(),
        };

        let cache_key = CacheKey::Product {
            handle: handle.to_string(),
            selection: selection.canonical_key(),
        };
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let data = self
            .execute::<queries::Product>(queries::product::Variables {
                handle: handle.to_string(),
                selected_options: selection.clone(),
            })
            .await?;
        let product = data
            .product
            .map(convert_product)
            .ok_or_else(|| ShopifyError::NotFound(format!("Product {handle}")))?;

        let cache_key = CacheKey::Product {
            handle: handle.to_string(),
            selection: selection.retain_known(&product.options).canonical_key(),
        };
        self.inner
            .cache
            .insert(options_key, CacheValue::ProductOptions(product.options.clone()))
            .await;
        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Every variant of a product (up to 250).
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::NotFound` if no product has this handle, or an
    /// error if the API request fails.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn product_variants(&self, handle: &str) -> Result<Vec<ProductVariant>, ShopifyError> {
        let cache_key = CacheKey::ProductVariants(handle.to_string());
        if let Some(CacheValue::ProductVariants(variants)) = self.inner.cache.get(&cache_key).await
        {
            debug!("Cache hit for product variants");
            return Ok(variants);
        }

        let data = self
            .execute::<queries::ProductVariants>(queries::product_variants::Variables {
                handle: handle.to_string(),
            })
            .await?;
        let variants = data
            .product
            .map(|product| convert_variants(product.variants.nodes))
            .ok_or_else(|| ShopifyError::NotFound(format!("Product {handle}")))?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::ProductVariants(variants.clone()))
            .await;

        Ok(variants)
    }

    // =========================================================================
    // Health
    // =========================================================================

    /// Fetch the shop name. Never cached; used as a readiness probe.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn shop_name(&self) -> Result<String, ShopifyError> {
        let data = self
            .execute::<queries::ShopName>(queries::shop_name::Variables)
            .await?;
        Ok(data.shop.name)
    }
}
