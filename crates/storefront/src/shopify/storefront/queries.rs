//! GraphQL operations for the Shopify Storefront API.
//!
//! Each operation is a unit struct implementing `GraphQLQuery`, with its
//! query text, variables and response shapes in a snake_case module of the
//! same name, the layout `graphql_client` codegen produces. Response structs
//! only declare the fields the storefront reads.

use graphql_client::{GraphQLQuery, QueryBody};

macro_rules! operation {
    ($name:ident, $module:ident) => {
        impl GraphQLQuery for $name {
            type Variables = $module::Variables;
            type ResponseData = $module::ResponseData;

            fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
                QueryBody {
                    variables,
                    query: $module::QUERY,
                    operation_name: $module::OPERATION_NAME,
                }
            }
        }
    };
}

// Fragment text, spliced into queries with `concat!`.

macro_rules! image_fields {
    () => {
        "id url altText width height"
    };
}

macro_rules! money_fields {
    () => {
        "amount currencyCode"
    };
}

macro_rules! page_info_fields {
    () => {
        "pageInfo { hasNextPage hasPreviousPage startCursor endCursor }"
    };
}

macro_rules! collection_fragment {
    () => {
        concat!(
            "fragment Collection on Collection { id title description handle image { ",
            image_fields!(),
            " } }"
        )
    };
}

macro_rules! product_item_fragment {
    () => {
        concat!(
            "fragment ProductItem on Product { id handle title featuredImage { ",
            image_fields!(),
            " } priceRange { minVariantPrice { ",
            money_fields!(),
            " } maxVariantPrice { ",
            money_fields!(),
            " } } variants(first: 1) { nodes { selectedOptions { name value } } } }"
        )
    };
}

macro_rules! product_variant_fragment {
    () => {
        concat!(
            "fragment ProductVariant on ProductVariant { availableForSale compareAtPrice { ",
            money_fields!(),
            " } id image { __typename ",
            image_fields!(),
            " } price { ",
            money_fields!(),
            " } selectedOptions { name value } sku title unitPrice { ",
            money_fields!(),
            " } }"
        )
    };
}

/// Response shapes shared by several operations.
pub mod fragments {
    use impact_core::pagination::PageInfo;
    use impact_core::types::{Image, Money, ProductOption};
    use impact_core::variant::SelectedOptions;
    use serde::Deserialize;

    /// `{ nodes: [...] }` wrapper.
    #[derive(Debug, Clone, Deserialize)]
    pub struct Nodes<T> {
        pub nodes: Vec<T>,
    }

    impl<T> Default for Nodes<T> {
        fn default() -> Self {
            Self { nodes: Vec::new() }
        }
    }

    /// A connection page as returned on the wire.
    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ConnectionFields<T> {
        pub nodes: Vec<T>,
        pub page_info: PageInfo,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CollectionFields {
        pub id: String,
        pub title: String,
        pub description: String,
        pub handle: String,
        pub image: Option<Image>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PriceRangeFields {
        pub min_variant_price: Money,
        pub max_variant_price: Money,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct VariantOptionsFields {
        pub selected_options: SelectedOptions,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductItemFields {
        pub id: String,
        pub handle: String,
        pub title: String,
        pub featured_image: Option<Image>,
        pub price_range: PriceRangeFields,
        pub variants: Nodes<VariantOptionsFields>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductVariantFields {
        pub available_for_sale: bool,
        pub compare_at_price: Option<Money>,
        pub id: String,
        pub image: Option<Image>,
        pub price: Money,
        pub selected_options: SelectedOptions,
        pub sku: Option<String>,
        pub title: String,
        pub unit_price: Option<Money>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct SeoFields {
        pub title: Option<String>,
        pub description: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductFields {
        pub id: String,
        pub title: String,
        pub vendor: String,
        pub handle: String,
        pub images: Nodes<Image>,
        pub description_html: String,
        pub description: String,
        pub options: Vec<ProductOption>,
        pub selected_variant: Option<ProductVariantFields>,
        pub variants: Nodes<ProductVariantFields>,
        pub seo: SeoFields,
    }
}

// =============================================================================
// Home page
// =============================================================================

pub struct FeaturedCollection;

pub mod featured_collection {
    use serde::{Deserialize, Serialize};

    use super::fragments::{CollectionFields, Nodes};

    pub const OPERATION_NAME: &str = "FeaturedCollection";
    pub const QUERY: &str = concat!(
        collection_fragment!(),
        " query FeaturedCollection { collections(first: 6, sortKey: UPDATED_AT, reverse: true) { nodes { ...Collection } } }"
    );

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables;

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub collections: Nodes<CollectionFields>,
    }
}

operation!(FeaturedCollection, featured_collection);

pub struct RecommendedProducts;

pub mod recommended_products {
    use impact_core::types::{Image, Money};
    use serde::{Deserialize, Serialize};

    use super::fragments::Nodes;

    pub const OPERATION_NAME: &str = "RecommendedProducts";
    pub const QUERY: &str = concat!(
        "fragment RecommendedProduct on Product { id title handle priceRange { minVariantPrice { ",
        money_fields!(),
        " } } featuredImage { ",
        image_fields!(),
        " } images(first: 5) { nodes { ",
        image_fields!(),
        " } } } query RecommendedProducts { products(first: 4, sortKey: UPDATED_AT, reverse: true) { nodes { ...RecommendedProduct } } }"
    );

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables;

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub products: Nodes<RecommendedProductFields>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MinPriceRange {
        pub min_variant_price: Money,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RecommendedProductFields {
        pub id: String,
        pub title: String,
        pub handle: String,
        pub price_range: MinPriceRange,
        pub featured_image: Option<Image>,
        #[serde(default)]
        pub images: Nodes<Image>,
    }
}

operation!(RecommendedProducts, recommended_products);

// =============================================================================
// Collections
// =============================================================================

pub struct StoreCollections;

pub mod store_collections {
    use impact_core::pagination::PaginationVariables;
    use serde::{Deserialize, Serialize};

    use super::fragments::{CollectionFields, ConnectionFields};

    pub const OPERATION_NAME: &str = "StoreCollections";
    pub const QUERY: &str = concat!(
        collection_fragment!(),
        " query StoreCollections($endCursor: String, $first: Int, $last: Int, $startCursor: String) { collections(first: $first, last: $last, before: $startCursor, after: $endCursor) { nodes { ...Collection } ",
        page_info_fields!(),
        " } }"
    );

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        #[serde(flatten)]
        pub page: PaginationVariables,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub collections: ConnectionFields<CollectionFields>,
    }
}

operation!(StoreCollections, store_collections);

pub struct Collection;

pub mod collection {
    use impact_core::pagination::PaginationVariables;
    use serde::{Deserialize, Serialize};

    use super::fragments::{ConnectionFields, ProductItemFields};

    pub const OPERATION_NAME: &str = "Collection";
    pub const QUERY: &str = concat!(
        product_item_fragment!(),
        " query Collection($handle: String!, $first: Int, $last: Int, $startCursor: String, $endCursor: String) { collection(handle: $handle) { id handle title description products(first: $first, last: $last, before: $startCursor, after: $endCursor) { nodes { ...ProductItem } ",
        page_info_fields!(),
        " } } }"
    );

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub handle: String,
        #[serde(flatten)]
        pub page: PaginationVariables,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub collection: Option<CollectionData>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct CollectionData {
        pub id: String,
        pub handle: String,
        pub title: String,
        pub description: String,
        pub products: ConnectionFields<ProductItemFields>,
    }
}

operation!(Collection, collection);

// =============================================================================
// Products
// =============================================================================

pub struct Product;

pub mod product {
    use impact_core::variant::SelectedOptions;
    use serde::{Deserialize, Serialize};

    use super::fragments::ProductFields;

    pub const OPERATION_NAME: &str = "Product";
    pub const QUERY: &str = concat!(
        product_variant_fragment!(),
        " fragment Product on Product { id title vendor handle images(first: 10) { nodes { ",
        image_fields!(),
        " } } descriptionHtml description options { name values } selectedVariant: variantBySelectedOptions(selectedOptions: $selectedOptions, ignoreUnknownOptions: true) { ...ProductVariant } variants(first: 1) { nodes { ...ProductVariant } } seo { description title } }",
        " query Product($handle: String!, $selectedOptions: [SelectedOptionInput!]!) { product(handle: $handle) { ...Product } }"
    );

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub handle: String,
        pub selected_options: SelectedOptions,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub product: Option<ProductFields>,
    }
}

operation!(Product, product);

pub struct ProductVariants;

pub mod product_variants {
    use serde::{Deserialize, Serialize};

    use super::fragments::{Nodes, ProductVariantFields};

    pub const OPERATION_NAME: &str = "ProductVariants";
    pub const QUERY: &str = concat!(
        product_variant_fragment!(),
        " query ProductVariants($handle: String!) { product(handle: $handle) { variants(first: 250) { nodes { ...ProductVariant } } } }"
    );

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub handle: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub product: Option<ProductVariantsData>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ProductVariantsData {
        pub variants: Nodes<ProductVariantFields>,
    }
}

operation!(ProductVariants, product_variants);

// =============================================================================
// Health
// =============================================================================

pub struct ShopName;

pub mod shop_name {
    use serde::{Deserialize, Serialize};

    pub const OPERATION_NAME: &str = "ShopName";
    pub const QUERY: &str = "query ShopName { shop { name } }";

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables;

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub shop: Shop,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct Shop {
        pub name: String,
    }
}

operation!(ShopName, shop_name);
