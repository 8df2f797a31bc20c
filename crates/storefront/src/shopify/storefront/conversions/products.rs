//! Product type conversion functions.

use impact_core::types::{ProductId, ProductVariant, VariantId};

use crate::shopify::types::{PriceRange, Product, ProductItem, RecommendedProduct, Seo};

use super::super::queries::fragments::{ProductFields, ProductItemFields, ProductVariantFields};
use super::super::queries::recommended_products::RecommendedProductFields;

pub fn convert_variant(variant: ProductVariantFields) -> ProductVariant {
    ProductVariant {
        id: VariantId::new(variant.id),
        title: variant.title,
        available_for_sale: variant.available_for_sale,
        selected_options: variant.selected_options,
        price: variant.price,
        compare_at_price: variant.compare_at_price,
        unit_price: variant.unit_price,
        image: variant.image,
        sku: variant.sku.filter(|sku| !sku.is_empty()),
    }
}

pub fn convert_variants(variants: Vec<ProductVariantFields>) -> Vec<ProductVariant> {
    variants.into_iter().map(convert_variant).collect()
}

pub fn convert_product(product: ProductFields) -> Product {
    Product {
        id: ProductId::new(product.id),
        handle: product.handle,
        title: product.title,
        vendor: product.vendor,
        description: product.description,
        description_html: product.description_html,
        options: product.options,
        images: product.images.nodes,
        seo: Seo {
            title: product.seo.title,
            description: product.seo.description,
        },
        selected_variant: product.selected_variant.map(convert_variant),
        first_variant: product.variants.nodes.into_iter().next().map(convert_variant),
    }
}

pub fn convert_product_item(item: ProductItemFields) -> ProductItem {
    ProductItem {
        id: ProductId::new(item.id),
        handle: item.handle,
        title: item.title,
        featured_image: item.featured_image,
        price_range: PriceRange {
            min_variant_price: item.price_range.min_variant_price,
            max_variant_price: item.price_range.max_variant_price,
        },
        first_variant_options: item
            .variants
            .nodes
            .into_iter()
            .next()
            .map(|variant| variant.selected_options)
            .unwrap_or_default(),
    }
}

pub fn convert_recommended_product(product: RecommendedProductFields) -> RecommendedProduct {
    RecommendedProduct {
        id: ProductId::new(product.id),
        handle: product.handle,
        title: product.title,
        min_price: product.price_range.min_variant_price,
        featured_image: product.featured_image,
        images: product.images.nodes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product_json() -> serde_json::Value {
        serde_json::json!({
            "id": "gid://shopify/Product/7",
            "title": "The Tee",
            "vendor": "Impact",
            "handle": "the-tee",
            "images": {"nodes": []},
            "descriptionHtml": "<p>Soft.</p>",
            "description": "Soft.",
            "options": [{"name": "Size", "values": ["S", "M"]}],
            "selectedVariant": null,
            "variants": {"nodes": [{
                "availableForSale": true,
                "compareAtPrice": {"amount": "30.0", "currencyCode": "USD"},
                "id": "gid://shopify/ProductVariant/1",
                "image": null,
                "price": {"amount": "25.0", "currencyCode": "USD"},
                "selectedOptions": [{"name": "Size", "value": "S"}],
                "sku": "",
                "title": "S",
                "unitPrice": null
            }]},
            "seo": {"title": null, "description": "A soft tee"}
        })
    }

    #[test]
    fn test_convert_product_takes_first_variant() {
        let fields: ProductFields = serde_json::from_value(product_json()).expect("parse");
        let product = convert_product(fields);

        assert_eq!(product.id.as_str(), "gid://shopify/Product/7");
        assert!(product.selected_variant.is_none());
        let first = product.first_variant.expect("first variant");
        assert_eq!(first.selected_options.get("Size"), Some("S"));
        assert!(first.is_on_sale());
        // empty SKUs are dropped
        assert!(first.sku.is_none());
        assert_eq!(product.seo.description.as_deref(), Some("A soft tee"));
    }

    #[test]
    fn test_convert_product_item_without_variants() {
        let fields: ProductItemFields = serde_json::from_value(serde_json::json!({
            "id": "gid://shopify/Product/8",
            "handle": "gift-card",
            "title": "Gift Card",
            "featuredImage": null,
            "priceRange": {
                "minVariantPrice": {"amount": "10.0", "currencyCode": "USD"},
                "maxVariantPrice": {"amount": "100.0", "currencyCode": "USD"}
            },
            "variants": {"nodes": []}
        }))
        .expect("parse");

        let item = convert_product_item(fields);
        assert!(item.first_variant_options.is_empty());
        assert_eq!(item.price_range.max_variant_price.display(), "$100.00");
    }
}
